use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use timelock_common::Address;
use tracing::{debug, info, warn};

use super::deposit::DepositId;
use super::Vault;
use crate::core::asset::{Amount, AssetCustody};
use crate::core::events::VaultEvent;
use crate::core::token::ClaimLedger;
use crate::error::{ClaimTokenError, CustodyError, Result, VaultError};

/// Parameters that distinguish a regular withdrawal from a premature one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WithdrawalTerms {
    /// Skip the maturity check.
    pub allow_premature: bool,
    /// Where the asset goes. `None` sends it back to the recipient.
    pub destination: Option<Address>,
}

impl WithdrawalTerms {
    pub fn at_maturity() -> Self {
        Self {
            allow_premature: false,
            destination: None,
        }
    }

    pub fn premature(destination: Address) -> Self {
        Self {
            allow_premature: true,
            destination: Some(destination),
        }
    }

    fn destination_for(&self, recipient: &Address) -> Address {
        self.destination
            .clone()
            .unwrap_or_else(|| recipient.clone())
    }
}

/// Outcome of one settled deposit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithdrawalReceipt {
    pub id: DepositId,
    pub recipient: Address,
    pub destination: Address,
    pub amount: Amount,
    /// Whether the deposit had matured when it was settled.
    pub matured: bool,
}

/// Read-only summary returned by `preview_withdraw`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithdrawalPreview {
    pub total_amount: Amount,
    /// One flag per requested id, in request order.
    pub included: Vec<bool>,
}

/// A validated withdrawal that has not been applied yet.
#[derive(Debug, Clone, Copy)]
struct Step {
    id: DepositId,
    amount: Amount,
    matured: bool,
}

impl<A: AssetCustody, T: ClaimLedger> Vault<A, T> {
    /// Redeems a matured deposit back to its recipient.
    pub fn withdraw(
        &mut self,
        caller: &Address,
        id: DepositId,
        now: u64,
    ) -> Result<WithdrawalReceipt> {
        self.settle_one(caller, id, &WithdrawalTerms::at_maturity(), now)
    }

    /// Redeems a deposit before (or after) maturity, sending the asset to
    /// `destination`. The receipt and event report whether it had matured.
    pub fn premature_withdraw(
        &mut self,
        recipient: &Address,
        destination: &Address,
        id: DepositId,
        now: u64,
    ) -> Result<WithdrawalReceipt> {
        self.settle_one(
            recipient,
            id,
            &WithdrawalTerms::premature(destination.clone()),
            now,
        )
    }

    /// Redeems every id in `ids` or none of them.
    pub fn batch_withdraw(
        &mut self,
        caller: &Address,
        ids: &[DepositId],
        now: u64,
    ) -> Result<Vec<WithdrawalReceipt>> {
        self.settle_batch(caller, ids, &WithdrawalTerms::at_maturity(), now)
    }

    /// Single withdrawal routine shared by every variant.
    pub fn settle_one(
        &mut self,
        caller: &Address,
        id: DepositId,
        terms: &WithdrawalTerms,
        now: u64,
    ) -> Result<WithdrawalReceipt> {
        let step = self.plan(caller, id, terms, now)?;
        let destination = terms.destination_for(caller);
        self.preflight(caller, &destination, step.amount)?;

        self.ledger.settle(step.id)?;
        let receipt = self.apply(caller, &destination, step)?;

        info!(
            id,
            %caller,
            %destination,
            amount = receipt.amount,
            matured = receipt.matured,
            "Deposit settled"
        );
        Ok(receipt)
    }

    /// Batch form of [`Vault::settle_one`]. Every id is validated before
    /// any state changes.
    pub fn settle_batch(
        &mut self,
        caller: &Address,
        ids: &[DepositId],
        terms: &WithdrawalTerms,
        now: u64,
    ) -> Result<Vec<WithdrawalReceipt>> {
        if ids.is_empty() {
            warn!(%caller, "Rejected empty batch withdrawal");
            return Err(VaultError::EmptyBatch);
        }

        let mut seen = BTreeSet::new();
        let mut steps = Vec::with_capacity(ids.len());
        for &id in ids {
            // A repeated id would settle the same deposit twice.
            if !seen.insert(id) {
                warn!(id, %caller, "Duplicate id in batch withdrawal");
                return Err(VaultError::InactiveDeposit { id });
            }
            steps.push(self.plan(caller, id, terms, now)?);
        }

        let destination = terms.destination_for(caller);
        let total = steps
            .iter()
            .try_fold(0u128, |acc, step| acc.checked_add(step.amount))
            .ok_or(CustodyError::Overflow)?;
        self.preflight(caller, &destination, total)?;

        for step in &steps {
            self.ledger.settle(step.id)?;
        }
        let mut receipts = Vec::with_capacity(steps.len());
        for step in steps {
            receipts.push(self.apply(caller, &destination, step)?);
        }

        info!(
            %caller,
            count = receipts.len(),
            total,
            "Batch withdrawal settled"
        );
        Ok(receipts)
    }

    /// Best-effort summary of which `ids` `recipient` could withdraw at
    /// `now`. Never fails and never mutates.
    pub fn preview_withdraw(
        &self,
        recipient: &Address,
        ids: &[DepositId],
        now: u64,
    ) -> WithdrawalPreview {
        let mut preview = WithdrawalPreview {
            total_amount: 0,
            included: Vec::with_capacity(ids.len()),
        };
        for &id in ids {
            let withdrawable = self
                .ledger
                .get(id)
                .filter(|d| d.is_redeemable_by(recipient) && d.is_matured(now));
            match withdrawable {
                Some(deposit) => {
                    preview.total_amount = preview.total_amount.saturating_add(deposit.amount);
                    preview.included.push(true);
                }
                None => preview.included.push(false),
            }
        }

        debug!(
            %recipient,
            requested = ids.len(),
            total_amount = preview.total_amount,
            "Withdrawal preview evaluated"
        );
        preview
    }

    /// Ownership and liveness first, then maturity.
    fn plan(
        &self,
        caller: &Address,
        id: DepositId,
        terms: &WithdrawalTerms,
        now: u64,
    ) -> Result<Step> {
        let Some(deposit) = self
            .ledger
            .get(id)
            .filter(|d| d.is_redeemable_by(caller))
        else {
            warn!(id, %caller, "Withdrawal of inactive or foreign deposit");
            return Err(VaultError::InactiveDeposit { id });
        };

        let matured = deposit.is_matured(now);
        if !matured && !terms.allow_premature {
            warn!(
                id,
                %caller,
                redeem_timestamp = deposit.redeem_timestamp,
                now,
                "Withdrawal before maturity"
            );
            return Err(VaultError::NotMatured {
                id,
                redeem_timestamp: deposit.redeem_timestamp,
                now,
            });
        }

        Ok(Step {
            id,
            amount: deposit.amount,
            matured,
        })
    }

    /// Checks the collaborators can honour `total` before anything moves.
    fn preflight(&self, caller: &Address, destination: &Address, total: Amount) -> Result<()> {
        if destination.is_zero() {
            return Err(CustodyError::InvalidHolder(destination.clone()).into());
        }

        let claims = self.claims.balance_of(caller);
        if claims < total {
            return Err(ClaimTokenError::InsufficientBalance {
                holder: caller.clone(),
                balance: claims,
                requested: total,
            }
            .into());
        }

        let custody = self.custody.custody_balance();
        if custody < total {
            return Err(VaultError::CorruptState(format!(
                "custody holds {} but withdrawal requires {}",
                custody, total
            )));
        }
        Ok(())
    }

    /// Burns the claim and releases the asset for an already settled step.
    fn apply(
        &mut self,
        caller: &Address,
        destination: &Address,
        step: Step,
    ) -> Result<WithdrawalReceipt> {
        self.claims.burn(caller, step.amount)?;
        self.custody.push(destination, step.amount)?;

        self.events.push(VaultEvent::Transfer {
            from: caller.clone(),
            to: Address::zero(),
            amount: step.amount,
        });
        self.events.push(VaultEvent::Withdrawal {
            id: step.id,
            recipient: caller.clone(),
            destination: destination.clone(),
            amount: step.amount,
            matured: step.matured,
        });

        Ok(WithdrawalReceipt {
            id: step.id,
            recipient: caller.clone(),
            destination: destination.clone(),
            amount: step.amount,
            matured: step.matured,
        })
    }
}
