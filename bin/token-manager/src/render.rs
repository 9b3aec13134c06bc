//! Plain-text rendering.
//!
//! Every function here is a pure function of already computed values.

use crate::{
    ApprovalOutcome, AssetBalance, Connection, SwapBalances, SwapQuote, TokenInfo, TransferOutcome,
};
use allowance::AllowanceOutcome;
use history::{Direction, HistoryEntry};
use swap::SwapSimulation;
use token::{Receipt, Token};
use units::{format_decimal, shorten, shorten_address, to_exact_units, to_human_units, Precision};

fn block_line(receipt: &Receipt) -> String {
    receipt
        .block_number
        .map_or_else(|| "Block: unknown".to_string(), |block| format!("Block: {block}"))
}

pub fn connected(connection: &Connection) -> String {
    format!(
        "Connected to {}\nNetwork: {} (Chain ID: {})",
        shorten_address(&connection.user),
        connection.network.name,
        connection.network.chain_id
    )
}

pub fn token_info(info: &TokenInfo) -> String {
    let token = &info.token;
    format!(
        "Token Information:\n\
         Name: {}\n\
         Symbol: {}\n\
         Decimals: {}\n\
         Total Supply: {}\n\
         Your Balance: {} {}",
        token.name,
        token.symbol,
        token.decimals,
        to_exact_units(token.total_supply, token.decimals),
        to_exact_units(info.balance, token.decimals),
        token.symbol,
    )
}

pub fn transfer(outcome: &TransferOutcome, token: &Token) -> String {
    let balance = match outcome.balance {
        Some(balance) => format!(
            "{} {}",
            to_human_units(balance, token.decimals, Precision::Balance),
            token.symbol
        ),
        None => "unavailable, refresh token info".to_string(),
    };

    format!(
        "Transfer successful!\nSent {} {} to {}\n{}\nTx: {}\nBalance: {balance}",
        to_exact_units(outcome.amount, token.decimals),
        token.symbol,
        shorten_address(&outcome.recipient),
        block_line(&outcome.receipt),
        outcome.receipt.tx_hash,
    )
}

pub fn approval(outcome: &ApprovalOutcome, token: &Token) -> String {
    let headline = if outcome.amount.is_zero() {
        format!(
            "Allowance revoked for {}",
            shorten_address(&outcome.spender)
        )
    } else {
        format!(
            "Approved {} {} for {}",
            to_exact_units(outcome.amount, token.decimals),
            token.symbol,
            shorten_address(&outcome.spender),
        )
    };

    format!(
        "Approval successful!\n{headline}\n{}\nTx: {}",
        block_line(&outcome.receipt),
        outcome.receipt.tx_hash,
    )
}

pub fn allowances(outcome: &AllowanceOutcome, token: &Token) -> String {
    match outcome {
        AllowanceOutcome::NoApprovals => "No allowances found".to_string(),
        AllowanceOutcome::NoneActive => "No active allowances".to_string(),
        AllowanceOutcome::Active(records) => {
            let mut lines: Vec<String> = records
                .iter()
                .map(|record| {
                    format!(
                        "Spender: {}\nApproved Amount: {} {}",
                        record.spender,
                        to_human_units(record.amount, token.decimals, Precision::Balance),
                        token.symbol,
                    )
                })
                .collect();
            lines.push(format!("Found {} active allowance(s)", records.len()));
            lines.join("\n\n")
        }
    }
}

pub fn history(entries: &[HistoryEntry], token: &Token) -> String {
    if entries.is_empty() {
        return "No transfer history found".to_string();
    }

    let mut lines: Vec<String> = entries
        .iter()
        .map(|entry| {
            let label = match entry.direction {
                Direction::Sent => "Sent",
                Direction::Received => "Received",
            };
            let event = &entry.event;
            format!(
                "{label} {} {}\n  From: {}\n  To: {}\n  Block: {}\n  Tx: {}",
                to_human_units(event.value, token.decimals, Precision::Balance),
                token.symbol,
                shorten_address(&event.from),
                shorten_address(&event.to),
                event.block_number,
                shorten(&event.tx_hash.to_string()),
            )
        })
        .collect();
    lines.push(format!("Found {} transaction(s)", entries.len()));
    lines.join("\n\n")
}

pub fn swap_quote(swap: &SwapQuote) -> String {
    let quote = &swap.quote;
    let mut lines = vec![
        format!("{} -> {}", swap.from_token, swap.to_token),
        format!("Rate: {}", swap.rate_label),
        format!("Slippage tolerance: {}%", swap.slippage_percent),
    ];

    if quote.is_empty() {
        lines.push(format!("Minimum received: 0 {}", swap.to_token));
        return lines.join("\n");
    }

    lines.push(format!(
        "You receive: {} {}",
        format_decimal(quote.output_amount, Precision::Quote),
        swap.to_token
    ));
    lines.push(format!(
        "Minimum received: {} {}",
        format_decimal(quote.minimum_received, Precision::Quote),
        swap.to_token
    ));
    lines.push(format!(
        "Price impact: {} ({})",
        quote.impact.format_percent(quote.price_impact_percent),
        quote.impact.severity()
    ));
    lines.join("\n")
}

pub fn swap_simulation(simulation: &SwapSimulation) -> String {
    format!(
        "DEMO MODE: swaps are simulated, no transaction was sent\n\n\
         You want to swap: {} {}\n\
         You will receive: ~{} {}\n\n\
         Real swaps need a DEX router with a liquidity pool for this token.",
        simulation.quote.input_amount,
        simulation.from_token,
        format_decimal(simulation.quote.output_amount, Precision::Quote),
        simulation.to_token,
    )
}

fn balance_line(side: &str, balance: &AssetBalance) -> String {
    format!(
        "{side} balance: {} {}",
        to_human_units(balance.amount, balance.decimals, Precision::Balance),
        balance.symbol
    )
}

pub fn swap_balances(balances: &SwapBalances) -> String {
    format!(
        "{}\n{}",
        balance_line("From", &balances.from),
        balance_line("To", &balances.to)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use allowance::AllowanceRecord;
    use alloy_primitives::{Address, TxHash, U256};
    use client::NetworkInfo;
    use swap::{ImpactLevel, Quote};
    use token::TransferEvent;

    fn token() -> Token {
        Token {
            address: Address::repeat_byte(0xee),
            name: "Test Token".to_string(),
            symbol: "TST".to_string(),
            decimals: 18,
            total_supply: U256::from(1_000_000u64) * U256::from(10u64).pow(U256::from(18u8)),
        }
    }

    fn base(amount: &str) -> U256 {
        units::to_base_units(amount, 18).unwrap()
    }

    #[test]
    fn test_connected() {
        let connection = Connection {
            user: Address::repeat_byte(0x11),
            network: NetworkInfo::from_chain_id(11155111),
        };
        assert_eq!(
            connected(&connection),
            "Connected to 0x1111...1111\nNetwork: sepolia (Chain ID: 11155111)"
        );
    }

    #[test]
    fn test_token_info_is_lossless() {
        let info = TokenInfo {
            token: token(),
            balance: base("12.345678901"),
        };
        let text = token_info(&info);

        assert!(text.contains("Name: Test Token"));
        assert!(text.contains("Decimals: 18"));
        assert!(text.contains("Total Supply: 1000000.0"));
        assert!(text.contains("Your Balance: 12.345678901 TST"));
    }

    #[test]
    fn test_transfer_receipt() {
        let outcome = TransferOutcome {
            receipt: Receipt {
                tx_hash: TxHash::repeat_byte(0xab),
                block_number: Some(77),
                gas_used: Some(51_000),
            },
            recipient: Address::repeat_byte(0x22),
            amount: base("1.5"),
            balance: Some(base("8.5")),
        };
        let text = transfer(&outcome, &token());

        assert!(text.starts_with("Transfer successful!"));
        assert!(text.contains("Sent 1.5 TST to 0x2222...2222"));
        assert!(text.contains("Block: 77"));
        assert!(text.contains("Balance: 8.5000 TST"));

        let text = transfer(
            &TransferOutcome {
                balance: None,
                ..outcome
            },
            &token(),
        );
        assert!(text.starts_with("Transfer successful!"));
        assert!(text.contains("Balance: unavailable"));
    }

    #[test]
    fn test_revoke_wording() {
        let outcome = ApprovalOutcome {
            receipt: Receipt {
                tx_hash: TxHash::repeat_byte(0xab),
                block_number: None,
                gas_used: None,
            },
            spender: Address::repeat_byte(0x33),
            amount: U256::ZERO,
        };
        let text = approval(&outcome, &token());

        assert!(text.contains("Allowance revoked for 0x3333...3333"));
        assert!(text.contains("Block: unknown"));
    }

    #[test]
    fn test_allowance_outcomes() {
        assert_eq!(
            allowances(&AllowanceOutcome::NoApprovals, &token()),
            "No allowances found"
        );
        assert_eq!(
            allowances(&AllowanceOutcome::NoneActive, &token()),
            "No active allowances"
        );

        let active = AllowanceOutcome::Active(vec![AllowanceRecord {
            spender: Address::repeat_byte(0x44),
            amount: base("2.00005"),
        }]);
        let text = allowances(&active, &token());
        assert!(text.contains("Spender: 0x4444444444444444444444444444444444444444"));
        assert!(text.contains("Approved Amount: 2.0001 TST"));
        assert!(text.ends_with("Found 1 active allowance(s)"));
    }

    #[test]
    fn test_history_feed() {
        assert_eq!(history(&[], &token()), "No transfer history found");

        let entries = vec![HistoryEntry {
            direction: Direction::Received,
            event: TransferEvent {
                from: Address::repeat_byte(0x55),
                to: Address::repeat_byte(0x66),
                value: base("3"),
                block_number: 1234,
                tx_hash: TxHash::repeat_byte(0xcd),
                log_index: 0,
            },
        }];
        let text = history(&entries, &token());

        assert!(text.starts_with("Received 3.0000 TST"));
        assert!(text.contains("From: 0x5555...5555"));
        assert!(text.contains("Block: 1234"));
        assert!(text.contains("Tx: 0xcdcd...cdcd"));
        assert!(text.ends_with("Found 1 transaction(s)"));
    }

    #[test]
    fn test_swap_quote_panel() {
        let panel = SwapQuote {
            from_token: "ETH".to_string(),
            to_token: "TST".to_string(),
            slippage_percent: 1.0,
            rate_label: "1 ETH = 1000 TST".to_string(),
            quote: Quote {
                input_amount: 5.0,
                output_amount: 5000.0,
                minimum_received: 4950.0,
                price_impact_percent: 0.05,
                impact: ImpactLevel::Low,
            },
        };
        let text = swap_quote(&panel);

        assert!(text.contains("You receive: 5000.000000 TST"));
        assert!(text.contains("Minimum received: 4950.000000 TST"));
        assert!(text.contains("Price impact: 0.05% (low)"));
    }

    #[test]
    fn test_empty_swap_quote() {
        let panel = SwapQuote {
            from_token: "ETH".to_string(),
            to_token: "TST".to_string(),
            slippage_percent: 0.5,
            rate_label: "1 ETH = 1000 TST".to_string(),
            quote: Quote::empty(),
        };
        let text = swap_quote(&panel);

        assert!(text.contains("Minimum received: 0 TST"));
        assert!(!text.contains("Price impact"));
    }

    #[test]
    fn test_swap_balances_follow_direction() {
        let balances = SwapBalances {
            from: AssetBalance {
                symbol: "TST".to_string(),
                amount: base("10"),
                decimals: 18,
            },
            to: AssetBalance {
                symbol: "ETH".to_string(),
                amount: base("0.25"),
                decimals: 18,
            },
        };
        assert_eq!(
            swap_balances(&balances),
            "From balance: 10.0000 TST\nTo balance: 0.2500 ETH"
        );
    }
}
