//! Single-flight guard for state-changing actions.

use crate::ActionError;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::warn;

/// Allows at most one action in flight at a time.
#[derive(Debug, Default)]
pub struct InFlight {
    busy: AtomicBool,
}

impl InFlight {
    pub const fn new() -> Self {
        Self {
            busy: AtomicBool::new(false),
        }
    }

    /// Claim the slot, or fail with [`ActionError::Busy`] if it is taken.
    ///
    /// The slot is released when the returned [`Ticket`] is dropped.
    pub fn try_acquire(&self) -> Result<Ticket<'_>, ActionError> {
        if self
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            warn!("Rejected submission while another transaction is pending");
            return Err(ActionError::Busy);
        }

        Ok(Ticket { slot: &self.busy })
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

/// Proof of holding the [`InFlight`] slot.
#[derive(Debug)]
pub struct Ticket<'a> {
    slot: &'a AtomicBool,
}

impl Drop for Ticket<'_> {
    fn drop(&mut self) {
        self.slot.store(false, Ordering::Release);
    }
}
