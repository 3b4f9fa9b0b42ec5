pub mod address;
pub mod errors;

pub use address::{Address, ZERO_ADDRESS};
pub use errors::AddressError;
