//! Transfer history for one account.
//!
//! Sent and received transfers are fetched separately over the same block
//! window and merged into a single feed, newest block first.

use alloy_primitives::Address;
use futures::try_join;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use token::{EventLogSource, TokenError, TransferEvent, TransferFilter};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Sent,
    Received,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub direction: Direction,
    #[serde(flatten)]
    pub event: TransferEvent,
}

/// Merge sent and received transfers into one feed.
///
/// Entries are ordered by block number, descending. The sort is stable, so
/// entries in the same block keep fetch order: sent before received, each in
/// the order the source returned them. An entry counts as sent when its
/// `from` is `user`.
///
/// A transfer from `user` to itself appears in both inputs and is kept twice.
pub fn merge(
    sent: Vec<TransferEvent>,
    received: Vec<TransferEvent>,
    user: Address,
) -> Vec<HistoryEntry> {
    let mut entries: Vec<HistoryEntry> = sent
        .into_iter()
        .chain(received)
        .map(|event| HistoryEntry {
            direction: if event.from == user {
                Direction::Sent
            } else {
                Direction::Received
            },
            event,
        })
        .collect();

    entries.sort_by_key(|entry| Reverse(entry.event.block_number));
    entries
}

/// Fetch and merge `user`'s transfers over the inclusive block range
/// `[from_block, to_block]`.
///
/// The range is resolved by the caller so both queries cover exactly the
/// same blocks.
pub async fn fetch_history<S>(
    source: &S,
    user: Address,
    from_block: u64,
    to_block: u64,
) -> Result<Vec<HistoryEntry>, TokenError>
where
    S: EventLogSource,
{
    debug!(
        from = from_block,
        to = to_block,
        user = %user,
        "Fetching transfer history"
    );

    let (sent, received) = try_join!(
        source.transfers(TransferFilter::sent_by(user), from_block, to_block),
        source.transfers(TransferFilter::received_by(user), from_block, to_block),
    )?;

    debug!(
        sent = sent.len(),
        received = received.len(),
        "Fetched transfers"
    );

    Ok(merge(sent, received, user))
}
