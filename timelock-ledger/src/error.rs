use thiserror::Error;
use timelock_common::Address;

use crate::core::vault::DepositId;

pub type Result<T> = std::result::Result<T, VaultError>;

/// Failures raised by the asset custody collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CustodyError {
    #[error("Insufficient funds for {holder}: balance {balance}, requested {requested}")]
    InsufficientFunds {
        holder: Address,
        balance: u128,
        requested: u128,
    },

    /// Assets can never be moved to or from the null identity.
    #[error("Invalid holder: {0}")]
    InvalidHolder(Address),

    #[error("Balance overflow")]
    Overflow,
}

/// Failures raised by the claim token collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClaimTokenError {
    #[error("Insufficient claim balance for {holder}: balance {balance}, requested {requested}")]
    InsufficientBalance {
        holder: Address,
        balance: u128,
        requested: u128,
    },

    /// Claim tokens are bound to their recipient; every transfer is refused.
    #[error("Invalid transfer of {amount} claim tokens from {from} to {to}")]
    InvalidTransfer {
        from: Address,
        to: Address,
        amount: u128,
    },

    #[error("Claim token supply overflow")]
    SupplyOverflow,
}

/// Every error the vault surfaces to its callers.
#[derive(Debug, Error)]
pub enum VaultError {
    /// A deposit was attempted with a zero amount.
    #[error("Deposit amount must be greater than zero")]
    InvalidAmount,

    /// A deposit named the null identity as its recipient.
    #[error("Deposit recipient cannot be the zero address")]
    InvalidRecipient,

    /// `batch_withdraw` was called without any deposit ids.
    #[error("Deposit id list is empty")]
    EmptyBatch,

    #[error("Invalid deposit id range: start {start}, length {length}, total {total}")]
    InvalidRange { start: u64, length: u64, total: u64 },

    /// The deposit does not exist, is not owned by the caller, or has
    /// already been withdrawn. The three cases are deliberately not told
    /// apart.
    #[error("Deposit {id} is not an active deposit of the caller")]
    InactiveDeposit { id: DepositId },

    #[error("Deposit {id} matures at {redeem_timestamp}, current time is {now}")]
    NotMatured {
        id: DepositId,
        redeem_timestamp: u64,
        now: u64,
    },

    #[error("Custody error: {0}")]
    Custody(#[from] CustodyError),

    #[error("Claim token error: {0}")]
    ClaimToken(#[from] ClaimTokenError),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A loaded snapshot violates the ledger invariants.
    #[error("Corrupt vault state: {0}")]
    CorruptState(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
