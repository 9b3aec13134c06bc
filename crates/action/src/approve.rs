use crate::{Action, ActionError};
use alloy_primitives::{Address, U256};
use token::{PendingTransaction, Receipt, TokenContract};
use tracing::info;

/// Input for an approve action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Approval {
    /// Address allowed to spend the signer's tokens
    pub spender: Address,
    /// Allowance in base units. Zero revokes.
    pub amount: U256,
}

/// Approve action setting a spender's allowance.
pub struct ApproveAction<'a, T> {
    token: &'a T,
    approval: Approval,
}

impl<'a, T> ApproveAction<'a, T>
where
    T: TokenContract,
{
    pub const fn new(token: &'a T, approval: Approval) -> Self {
        Self { token, approval }
    }
}

impl<T> Action for ApproveAction<'_, T>
where
    T: TokenContract,
{
    fn validate(&self) -> Result<(), ActionError> {
        if self.approval.spender == Address::ZERO {
            return Err(ActionError::ZeroSpender);
        }

        Ok(())
    }

    async fn execute(&self) -> Result<Receipt, ActionError> {
        self.validate()?;

        let pending = self
            .token
            .approve(self.approval.spender, self.approval.amount)
            .await?;
        info!(tx_hash = %pending.tx_hash(), "Approval pending confirmation");

        let receipt = pending.wait().await?;
        info!(
            tx_hash = %receipt.tx_hash,
            block_number = ?receipt.block_number,
            "Approval confirmed"
        );

        Ok(receipt)
    }

    fn description(&self) -> String {
        if self.approval.amount.is_zero() {
            return format!(
                "Revoke allowance of {} on {}",
                self.approval.spender,
                self.token.address(),
            );
        }
        format!(
            "Approve {} to spend {} base units of {}",
            self.approval.spender,
            self.approval.amount,
            self.token.address(),
        )
    }
}
