//! Block range chunking for event log queries.
//!
//! Many RPC providers cap `eth_getLogs` at 10,000 blocks per request, so
//! ranges are split into 9,500 block chunks (500 block safety margin).

/// Maximum number of blocks covered by one log query.
pub const CHUNK_SIZE: u64 = 9_500;

/// Split the inclusive range `[from_block, to_block]` into inclusive chunks
/// of at most `chunk_size` blocks. An inverted range yields no chunks.
pub fn block_chunks(from_block: u64, to_block: u64, chunk_size: u64) -> Vec<(u64, u64)> {
    let chunk_size = chunk_size.max(1);
    let mut chunks = Vec::new();
    let mut current = from_block;

    while current <= to_block {
        let chunk_end = current.saturating_add(chunk_size - 1).min(to_block);
        chunks.push((current, chunk_end));
        if chunk_end == u64::MAX {
            break;
        }
        current = chunk_end + 1;
    }

    chunks
}
