mod cli;

use std::error::Error;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use clap::Parser;
use timelock_common::{Clock, ManualClock, SystemClock};
use timelock_ledger::{Deposit, SnapshotStore, TimeLockVault, Vault, VaultConfig};
use tracing::info;
use tracing_subscriber::prelude::*;

use crate::cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,timelock_ledger=debug".into()),
        );
    tracing_subscriber::registry().with(stderr_layer).init();

    let clock: Arc<dyn Clock> = match cli.at {
        Some(at) => Arc::new(ManualClock::new(at)),
        None => Arc::new(SystemClock),
    };
    let store = SnapshotStore::open(&cli.data_dir).await?;

    if let Commands::Init {
        config,
        lock_period,
    } = &cli.command
    {
        if store.exists().await {
            return Err(format!("vault already initialised at {:?}", store.path()).into());
        }
        let mut config = match config {
            Some(path) => VaultConfig::load_from_file(path)?,
            None => VaultConfig::default(),
        };
        if let Some(lock_period) = lock_period {
            config.lock_period = *lock_period;
        }
        let vault = Vault::new(config)?;
        store.save(&vault).await?;
        info!(path = ?store.path(), "Vault initialised");
        print_json(vault.config())?;
        return Ok(());
    }

    let Some(vault) = store.load().await? else {
        return Err(format!("no vault at {:?}, run `init` first", store.path()).into());
    };
    let vault = TimeLockVault::from_vault(vault, clock);

    if run(&vault, cli.command).await? {
        for event in vault.drain_events().await {
            println!("{}", serde_json::to_string(&event)?);
        }
        vault.save(&store).await?;
    }
    Ok(())
}

/// Executes one command. Returns `true` if the vault changed.
async fn run(vault: &TimeLockVault, command: Commands) -> Result<bool, Box<dyn Error>> {
    match command {
        Commands::Init { .. } => Ok(false),
        Commands::Fund { holder, amount } => {
            let balance = vault.fund(&holder, amount).await?;
            println!("{} balance: {}", holder, balance);
            Ok(true)
        }
        Commands::Deposit {
            from,
            recipient,
            amount,
        } => {
            let id = vault.deposit(&from, &recipient, amount).await?;
            println!("deposit id: {}", id);
            Ok(true)
        }
        Commands::Withdraw { caller, id } => {
            print_json(&vault.withdraw(&caller, id).await?)?;
            Ok(true)
        }
        Commands::BatchWithdraw { caller, ids } => {
            print_json(&vault.batch_withdraw(&caller, &ids).await?)?;
            Ok(true)
        }
        Commands::PrematureWithdraw {
            caller,
            destination,
            id,
        } => {
            print_json(&vault.premature_withdraw(&caller, &destination, id).await?)?;
            Ok(true)
        }
        Commands::Preview { recipient, ids } => {
            print_json(&vault.preview_withdraw(&recipient, &ids).await)?;
            Ok(false)
        }
        Commands::Ids {
            recipient,
            active,
            start,
            length,
        } => {
            let ids = match (start, length) {
                (Some(start), Some(length)) => {
                    vault.deposit_ids(&recipient, start, length).await?
                }
                _ if active => vault.active_deposit_ids(&recipient).await,
                _ => vault.all_deposit_ids(&recipient).await,
            };
            print_json(&ids)?;
            Ok(false)
        }
        Commands::Show { ids } => {
            let now = vault.now();
            for (id, deposit) in ids.iter().zip(vault.deposits_by_ids(&ids).await) {
                match deposit {
                    Some(deposit) => println!("{}", describe(&deposit, now)),
                    None => println!("#{} unknown", id),
                }
            }
            Ok(false)
        }
        Commands::Balance { holder } => {
            println!("asset: {}", vault.asset_balance_of(&holder).await);
            println!("claim: {}", vault.claim_balance_of(&holder).await);
            Ok(false)
        }
        Commands::Stats => {
            let snapshot = vault.snapshot().await;
            let claim = snapshot.claims().metadata();
            println!("asset: {}", snapshot.asset().id());
            println!("claim token: {} ({}, {} decimals)", claim.symbol, claim.name, claim.decimals);
            println!("lock period: {}s", snapshot.lock_period());
            println!("total deposits: {}", snapshot.total_deposits());
            println!("total asset: {}", snapshot.total_asset());
            println!("claim supply: {}", snapshot.claim_total_supply());
            Ok(false)
        }
    }
}

fn describe(deposit: &Deposit, now: u64) -> String {
    let status = if !deposit.active {
        "withdrawn".to_string()
    } else if deposit.is_matured(now) {
        "matured".to_string()
    } else {
        format!("locked, {}s remaining", deposit.time_remaining(now))
    };
    format!(
        "#{} {} -> {} amount {} redeemable {} ({})",
        deposit.id,
        deposit.depositor,
        deposit.recipient,
        deposit.amount,
        format_timestamp(deposit.redeem_timestamp),
        status
    )
}

fn format_timestamp(secs: u64) -> String {
    i64::try_from(secs)
        .ok()
        .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0))
        .map(|dt| dt.to_rfc3339())
        .unwrap_or_else(|| secs.to_string())
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<(), Box<dyn Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
