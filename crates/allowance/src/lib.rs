//! Active allowance discovery.
//!
//! An owner's `Approval` events name every spender that was ever approved,
//! but the approved values go stale as spenders use them. The events are only
//! used to find spender candidates; each candidate's current allowance is then
//! read live from the contract and zero allowances are dropped.

use alloy_primitives::{Address, U256};
use futures::future::try_join_all;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use token::{ApprovalEvent, EventLogSource, TokenContract, TokenError};
use tracing::debug;

/// A spender with a non-zero live allowance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllowanceRecord {
    pub spender: Address,
    /// Live allowance in base units
    pub amount: U256,
}

/// Result of an allowance check. None of these is an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "allowances", rename_all = "snake_case")]
pub enum AllowanceOutcome {
    /// The owner never approved anyone in the scanned window.
    NoApprovals,
    /// Spenders were approved, but every live allowance is zero.
    NoneActive,
    /// Spenders with a remaining allowance, in first-approval order.
    Active(Vec<AllowanceRecord>),
}

impl AllowanceOutcome {
    pub fn records(&self) -> &[AllowanceRecord] {
        match self {
            Self::Active(records) => records,
            Self::NoApprovals | Self::NoneActive => &[],
        }
    }
}

/// Distinct spenders in order of first appearance.
pub fn distinct_spenders(events: &[ApprovalEvent]) -> Vec<Address> {
    let mut seen = HashSet::new();
    events
        .iter()
        .map(|event| event.spender)
        .filter(|spender| seen.insert(*spender))
        .collect()
}

/// Reduce `events` to the owner's active allowances.
///
/// One live lookup is issued per distinct spender, all concurrently. Any
/// failed lookup fails the whole check.
pub async fn aggregate<T>(
    token: &T,
    owner: Address,
    events: &[ApprovalEvent],
) -> Result<AllowanceOutcome, TokenError>
where
    T: TokenContract,
{
    let spenders = distinct_spenders(events);
    if spenders.is_empty() {
        return Ok(AllowanceOutcome::NoApprovals);
    }

    debug!(
        owner = %owner,
        spenders = spenders.len(),
        "Looking up live allowances"
    );

    let lookups = spenders.iter().map(|&spender| async move {
        let amount = token.allowance(owner, spender).await?;
        Ok::<_, TokenError>(AllowanceRecord { spender, amount })
    });
    let records: Vec<AllowanceRecord> = try_join_all(lookups)
        .await?
        .into_iter()
        .filter(|record| !record.amount.is_zero())
        .collect();

    debug!(active = records.len(), "Active allowances after filtering");

    if records.is_empty() {
        Ok(AllowanceOutcome::NoneActive)
    } else {
        Ok(AllowanceOutcome::Active(records))
    }
}

/// Scan an owner's approvals over a block window and aggregate them.
pub async fn scan_allowances<T>(
    token: &T,
    owner: Address,
    from_block: u64,
    to_block: u64,
) -> Result<AllowanceOutcome, TokenError>
where
    T: TokenContract + EventLogSource,
{
    debug!(
        from = from_block,
        to = to_block,
        owner = %owner,
        "Scanning for approvals"
    );

    let events = token.approvals(owner, from_block, to_block).await?;
    aggregate(token, owner, &events).await
}
