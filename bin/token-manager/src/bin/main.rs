use clap::{Parser, Subcommand};
use client::WalletConnector;
use serde::Serialize;
use std::path::PathBuf;
use token::{erc20::ProviderBinder, Token, TokenBinder};
use token_manager::{
    config::Config, metrics::install_prometheus_exporter, render, Error, TokenManager,
};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "token-manager", version, about = "Inspect and manage an ERC20 token")]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Signing key. Without it only swap quotes are available.
    #[arg(long, env = "PRIVATE_KEY", hide_env_values = true)]
    private_key: Option<String>,

    /// Print results as JSON
    #[arg(long)]
    json: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show token metadata and the connected account's balance
    Info { token: String },

    /// Send tokens to a recipient
    Transfer {
        token: String,
        recipient: String,
        /// Amount in display units, e.g. 1.5
        amount: String,
    },

    /// Set a spender's allowance. An amount of 0 revokes it.
    Approve {
        token: String,
        spender: String,
        amount: String,
    },

    /// List spenders with a remaining allowance
    Allowances { token: String },

    /// Show sent and received transfers, newest first
    History { token: String },

    /// Quote a swap against the placeholder rate
    Quote {
        amount: String,
        #[command(flatten)]
        pane: SwapPane,
    },

    /// Simulate a swap. Nothing is submitted.
    Swap {
        token: String,
        amount: String,
        #[command(flatten)]
        pane: SwapPane,
    },

    /// Show both swap side balances
    Balances {
        #[arg(long)]
        token: Option<String>,
        #[command(flatten)]
        pane: SwapPane,
    },
}

#[derive(clap::Args, Debug)]
struct SwapPane {
    /// Sell the token for the base asset instead of buying it
    #[arg(long)]
    reverse: bool,

    /// Slippage tolerance in percent
    #[arg(long)]
    slippage: Option<f64>,
}

fn init_tracing(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
}

fn emit<T: Serialize>(json: bool, value: &T, text: impl FnOnce(&T) -> String) -> eyre::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        println!("{}", text(value));
    }
    Ok(())
}

fn apply_pane<W, B>(manager: &mut TokenManager<W, B>, pane: &SwapPane) -> Result<(), Error>
where
    W: WalletConnector,
    B: TokenBinder,
{
    if pane.reverse {
        manager.flip_swap_direction();
    }
    if let Some(slippage) = pane.slippage {
        manager.set_slippage(slippage)?;
    }
    Ok(())
}

async fn connect_and_load<W, B>(
    manager: &mut TokenManager<W, B>,
    token: &str,
) -> eyre::Result<Token>
where
    W: WalletConnector,
    B: TokenBinder,
{
    let connection = manager.connect().await?;
    info!("{}", render::connected(&connection));
    let info = manager.load_token(token).await?;
    Ok(info.token)
}

async fn run<W, B>(mut manager: TokenManager<W, B>, command: Command, json: bool) -> eyre::Result<()>
where
    W: WalletConnector,
    B: TokenBinder,
{
    match command {
        Command::Info { token } => {
            connect_and_load(&mut manager, &token).await?;
            let info = manager.token_info().await?;
            emit(json, &info, render::token_info)
        }
        Command::Transfer {
            token,
            recipient,
            amount,
        } => {
            let token = connect_and_load(&mut manager, &token).await?;
            let outcome = manager.transfer(&recipient, &amount).await?;
            emit(json, &outcome, |outcome| render::transfer(outcome, &token))
        }
        Command::Approve {
            token,
            spender,
            amount,
        } => {
            let token = connect_and_load(&mut manager, &token).await?;
            let outcome = manager.approve(&spender, &amount).await?;
            emit(json, &outcome, |outcome| render::approval(outcome, &token))
        }
        Command::Allowances { token } => {
            let token = connect_and_load(&mut manager, &token).await?;
            let outcome = manager.check_allowances().await?;
            emit(json, &outcome, |outcome| render::allowances(outcome, &token))
        }
        Command::History { token } => {
            let token = connect_and_load(&mut manager, &token).await?;
            let entries = manager.refresh_history().await?;
            emit(json, &entries, |entries| render::history(entries, &token))
        }
        Command::Quote { amount, pane } => {
            apply_pane(&mut manager, &pane)?;
            let quote = manager.quote_swap(&amount);
            emit(json, &quote, render::swap_quote)
        }
        Command::Swap {
            token,
            amount,
            pane,
        } => {
            connect_and_load(&mut manager, &token).await?;
            apply_pane(&mut manager, &pane)?;
            let simulation = manager.execute_swap(&amount)?;
            emit(json, &simulation, render::swap_simulation)
        }
        Command::Balances { token, pane } => {
            match token {
                Some(token) => {
                    connect_and_load(&mut manager, &token).await?;
                }
                None => {
                    manager.connect().await?;
                }
            }
            apply_pane(&mut manager, &pane)?;
            let balances = manager.swap_balances().await?;
            emit(json, &balances, render::swap_balances)
        }
    }
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    info!("Loading config: {}", cli.config.display());
    let config = Config::from_file(&cli.config)?;
    let network = config.network_config();

    info!("Loaded config:");
    info!("  RPC URL: {}", config.rpc_url);
    info!("  Chain ID: {}", network.chain_id);
    info!("  History window: {} blocks", network.history_window_blocks);

    if let Some(port) = config.metrics_port {
        install_prometheus_exporter(port)?;
        info!("Serving metrics on port {}", port);
    }

    match cli.private_key.as_deref() {
        Some(private_key) => {
            let wallet = client::create_local_wallet(&config.rpc_url, private_key)?;
            let binder = ProviderBinder::new(wallet.provider().clone());
            let manager = TokenManager::new(wallet, binder, network, &config.swap)?;
            run(manager, cli.command, cli.json).await
        }
        None => {
            let wallet = client::create_read_only_wallet(&config.rpc_url)?;
            let binder = ProviderBinder::new(wallet.provider().clone());
            let manager = TokenManager::new(wallet, binder, network, &config.swap)?;
            run(manager, cli.command, cli.json).await
        }
    }
}
