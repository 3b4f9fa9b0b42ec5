pub mod asset;
pub mod events;
pub mod runtime;
pub mod token;
pub mod vault;
