use clap::{Parser, Subcommand};
use std::path::PathBuf;
use timelock_common::Address;
use timelock_ledger::{Amount, DepositId};

#[derive(Parser)]
#[command(name = "timelock")]
#[command(about = "Time-lock custody vault")]
pub struct Cli {
    /// Directory holding the vault snapshot
    #[arg(long, value_name = "DIR", default_value = "./vault-data", global = true)]
    pub data_dir: PathBuf,

    /// Use this UNIX timestamp instead of the system clock
    #[arg(long, value_name = "UNIX", global = true)]
    pub at: Option<u64>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create an empty vault
    Init {
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,
        /// Overrides the configured lock period (seconds)
        #[arg(long, value_name = "SECS")]
        lock_period: Option<u64>,
    },
    /// Credit a holder with asset outside the vault
    Fund { holder: Address, amount: Amount },
    /// Lock asset from FROM for RECIPIENT
    Deposit {
        from: Address,
        recipient: Address,
        amount: Amount,
    },
    /// Redeem a matured deposit
    Withdraw { caller: Address, id: DepositId },
    /// Redeem several matured deposits, all or nothing
    BatchWithdraw {
        caller: Address,
        #[arg(required = true)]
        ids: Vec<DepositId>,
    },
    /// Show which deposits could be withdrawn now
    Preview {
        recipient: Address,
        #[arg(required = true)]
        ids: Vec<DepositId>,
    },
    /// Redeem a deposit early, sending the asset to DESTINATION
    PrematureWithdraw {
        caller: Address,
        destination: Address,
        id: DepositId,
    },
    /// List deposit ids of a recipient
    Ids {
        recipient: Address,
        #[arg(long, conflicts_with_all = ["start", "length"])]
        active: bool,
        #[arg(long, requires = "length")]
        start: Option<u64>,
        #[arg(long, requires = "start")]
        length: Option<u64>,
    },
    /// Print deposit records
    Show {
        #[arg(required = true)]
        ids: Vec<DepositId>,
    },
    /// Asset and claim balances of a holder
    Balance { holder: Address },
    /// Vault totals
    Stats,
}
