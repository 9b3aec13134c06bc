use crate::{Action, ActionError};
use alloy_primitives::{Address, U256};
use token::{PendingTransaction, Receipt, TokenContract};
use tracing::info;

/// Input for a transfer action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transfer {
    /// Address receiving the tokens
    pub recipient: Address,
    /// Amount in base units
    pub amount: U256,
}

/// Transfer action moving tokens from the signer to a recipient.
pub struct TransferAction<'a, T> {
    token: &'a T,
    transfer: Transfer,
}

impl<'a, T> TransferAction<'a, T>
where
    T: TokenContract,
{
    pub const fn new(token: &'a T, transfer: Transfer) -> Self {
        Self { token, transfer }
    }
}

impl<T> Action for TransferAction<'_, T>
where
    T: TokenContract,
{
    fn validate(&self) -> Result<(), ActionError> {
        if self.transfer.recipient == Address::ZERO {
            return Err(ActionError::ZeroRecipient);
        }

        if self.transfer.amount.is_zero() {
            return Err(ActionError::ZeroAmount);
        }

        Ok(())
    }

    async fn execute(&self) -> Result<Receipt, ActionError> {
        self.validate()?;

        let pending = self
            .token
            .transfer(self.transfer.recipient, self.transfer.amount)
            .await?;
        info!(tx_hash = %pending.tx_hash(), "Transfer pending confirmation");

        let receipt = pending.wait().await?;
        info!(
            tx_hash = %receipt.tx_hash,
            block_number = ?receipt.block_number,
            "Transfer confirmed"
        );

        Ok(receipt)
    }

    fn description(&self) -> String {
        format!(
            "Transfer {} base units of {} to {}",
            self.transfer.amount,
            self.token.address(),
            self.transfer.recipient,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{Call, MockToken, Outcome};
    use token::TokenError;

    fn valid_transfer() -> Transfer {
        Transfer {
            recipient: Address::repeat_byte(2),
            amount: U256::from(1_000u64),
        }
    }

    #[test]
    fn test_transfer_validation() {
        let token = MockToken::new(Outcome::Mined);
        let action = TransferAction::new(&token, valid_transfer());
        assert!(action.validate().is_ok());
    }

    #[test]
    fn test_transfer_validation_zero_recipient() {
        let token = MockToken::new(Outcome::Mined);
        let action = TransferAction::new(
            &token,
            Transfer {
                recipient: Address::ZERO,
                ..valid_transfer()
            },
        );
        assert_eq!(action.validate(), Err(ActionError::ZeroRecipient));
    }

    #[test]
    fn test_transfer_validation_zero_amount() {
        let token = MockToken::new(Outcome::Mined);
        let action = TransferAction::new(
            &token,
            Transfer {
                amount: U256::ZERO,
                ..valid_transfer()
            },
        );
        assert_eq!(action.validate(), Err(ActionError::ZeroAmount));
    }

    #[tokio::test]
    async fn test_invalid_transfer_is_never_submitted() {
        let token = MockToken::new(Outcome::Mined);
        let action = TransferAction::new(
            &token,
            Transfer {
                amount: U256::ZERO,
                ..valid_transfer()
            },
        );

        assert!(action.execute().await.is_err());
        assert!(token.calls().is_empty());
    }

    #[tokio::test]
    async fn test_transfer_returns_receipt() {
        let token = MockToken::new(Outcome::Mined);
        let action = TransferAction::new(&token, valid_transfer());

        let receipt = action.execute().await.unwrap();
        assert_eq!(receipt.block_number, Some(42));
        assert_eq!(
            token.calls(),
            vec![Call::Transfer(Address::repeat_byte(2), U256::from(1_000u64))]
        );
    }

    #[tokio::test]
    async fn test_reverted_transfer_is_an_error() {
        let token = MockToken::new(Outcome::Reverted);
        let action = TransferAction::new(&token, valid_transfer());

        let result = action.execute().await;
        assert!(matches!(
            result,
            Err(ActionError::Token(TokenError::Reverted { .. }))
        ));
    }

    #[tokio::test]
    async fn test_rejected_transfer_is_an_error() {
        let token = MockToken::new(Outcome::Rejected);
        let action = TransferAction::new(&token, valid_transfer());

        assert_eq!(
            action.execute().await,
            Err(ActionError::Token(TokenError::UserRejected))
        );
    }

    #[test]
    fn test_description() {
        let token = MockToken::new(Outcome::Mined);
        let action = TransferAction::new(&token, valid_transfer());
        let desc = action.description();

        assert!(desc.contains("Transfer 1000"));
        assert!(desc.contains("0xEeeeeEeeeEeEeeEeEeEeeEEEeeeeEeeeeeeeEEeE")); // token
        assert!(desc.contains("0x0202020202020202020202020202020202020202")); // recipient
    }
}
