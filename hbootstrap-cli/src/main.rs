//! `hbootstrap` — interactive bootstrap for a Hedera operator environment.
//!
//! `hbootstrap init` walks the user through validating operator
//! credentials against the testnet mirror node, resolving a BIP-39 seed
//! phrase, and writing the operator `.env`. `hbootstrap relay-env`
//! renders the companion JSON-RPC relay configuration from credentials
//! persisted by a previous `init`.

use std::env;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use eyre::WrapErr;
use tracing_subscriber::EnvFilter;

use hbootstrap_core::{
    commit, CredentialValidator, MirrorClient, RelayConfig, Session, SessionOptions, StdioPrompt,
};

#[derive(Debug, Parser)]
#[command(name = "hbootstrap", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Interactively validate operator credentials and write the operator `.env`.
    Init {
        /// Relay endpoint the generated config should point at; defaults to
        /// a local relay instance when unset.
        #[arg(long, env = "RPC_RELAY_URL")]
        rpc_url: Option<String>,

        /// Target path for the rendered document.
        #[arg(long, default_value = ".env")]
        out: PathBuf,
    },

    /// Render the relay service env file from previously persisted credentials.
    RelayEnv {
        /// Target path for the rendered document.
        #[arg(long, default_value = ".rpcrelay.env")]
        out: PathBuf,
    },
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    // Make a previously written .env visible both to clap's env-backed
    // flags and to `relay-env`. A missing file is fine.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    match cli.command {
        Command::Init { rpc_url, out } => {
            let mut session = Session::new(
                StdioPrompt,
                CredentialValidator::new(MirrorClient::testnet()),
                SessionOptions {
                    target: out,
                    rpc_url_override: rpc_url,
                },
            );
            let outcome = session.run().await?;
            tracing::debug!(?outcome, "session finished");
            Ok(())
        }

        Command::RelayEnv { out } => {
            let operator_id = env::var("OPERATOR_ACCOUNT_ID")
                .wrap_err("OPERATOR_ACCOUNT_ID is not set; run `hbootstrap init` first")?;
            let operator_key = env::var("OPERATOR_ACCOUNT_PRIVATE_KEY")
                .wrap_err("OPERATOR_ACCOUNT_PRIVATE_KEY is not set; run `hbootstrap init` first")?;

            let config = RelayConfig {
                operator_id,
                operator_key,
            };
            commit(&out, &config.render())
                .wrap_err("could not write the relay configuration")?;
            tracing::info!(path = %out.display(), "relay configuration written");
            Ok(())
        }
    }
}
