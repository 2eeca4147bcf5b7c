//! Rendering and persistence of the two dotenv artifacts: the operator's
//! own `.env` and the relay service's `.rpcrelay.env`.
//!
//! Rendering is pure string templating with fixed field order, so output
//! is byte-identical for identical input. Persistence is a single-shot
//! overwrite of the target path.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::mirror::TESTNET_MIRROR_URL;

/// Relay endpoint used when no override is supplied.
pub const DEFAULT_RPC_URL: &str = "http://localhost:7546/";

/// Network name baked into the relay configuration.
pub const NETWORK_NAME: &str = "testnet";

/// EVM chain id of the test network.
pub const CHAIN_ID: &str = "0x128";

/// Placeholder for the secondary account id the user derives later.
pub const ACCOUNT_ID_PLACEHOLDER: &str = "YOUR_ACCOUNT_ID";

/// Placeholder for the secondary account key the user derives later.
pub const ACCOUNT_KEY_PLACEHOLDER: &str = "YOUR_HEX_ENCODED_PRIVATE_KEY";

/// Writing a rendered document failed.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The document could not be written to the target path.
    #[error("failed to write {}: {source}", .path.display())]
    Write {
        /// The target path.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },
}

/// Field values rendered into the operator's own `.env`.
///
/// The secondary-account fields are deliberately unresolved placeholders:
/// deriving that account from the seed phrase is future work the user
/// completes by hand, not something this tool infers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootstrapConfig {
    /// Validated operator account id.
    pub operator_id: String,
    /// Validated operator private key, exactly as the user supplied it.
    pub operator_key: String,
    /// Accepted or freshly generated seed phrase.
    pub seed_phrase: String,
    /// Resolved relay endpoint.
    pub rpc_url: String,
}

impl BootstrapConfig {
    /// Resolves the relay endpoint: an explicit override wins, otherwise
    /// the local default. Deterministic and side-effect free; callers pass
    /// the override in rather than reading ambient environment state here.
    #[must_use]
    pub fn resolve_rpc_url(override_url: Option<String>) -> String {
        override_url.unwrap_or_else(|| DEFAULT_RPC_URL.to_string())
    }

    /// Renders the dotenv document.
    #[must_use]
    pub fn render(&self) -> String {
        format!(
            r#"
OPERATOR_ACCOUNT_ID="{operator_id}"
OPERATOR_ACCOUNT_PRIVATE_KEY="{operator_key}"

SEED_PHRASE="{seed_phrase}"
ACCOUNT_ID="{ACCOUNT_ID_PLACEHOLDER}"
ACCOUNT_PRIVATE_KEY="{ACCOUNT_KEY_PLACEHOLDER}"

RPC_URL="{rpc_url}"
"#,
            operator_id = self.operator_id,
            operator_key = self.operator_key,
            seed_phrase = self.seed_phrase,
            rpc_url = self.rpc_url,
        )
    }
}

/// Field values rendered into the relay service's env file.
///
/// Drawn from previously persisted operator credentials plus fixed network
/// constants; no interactive validation is involved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayConfig {
    /// Persisted operator account id.
    pub operator_id: String,
    /// Persisted operator private key.
    pub operator_key: String,
}

impl RelayConfig {
    /// Renders the relay dotenv document.
    #[must_use]
    pub fn render(&self) -> String {
        format!(
            r#"
HEDERA_NETWORK="{NETWORK_NAME}"
OPERATOR_ID_MAIN="{operator_id}"
OPERATOR_KEY_MAIN="{operator_key}"
CHAIN_ID="{CHAIN_ID}"
MIRROR_NODE_URL="{TESTNET_MIRROR_URL}/"
"#,
            operator_id = self.operator_id,
            operator_key = self.operator_key,
        )
    }
}

/// Writes `contents` to `path`, replacing any prior file.
///
/// All-or-nothing from the caller's perspective: either the full document
/// lands on disk or the error is surfaced. No partial-write recovery and
/// no locking; concurrent writers are last-one-wins.
///
/// # Errors
/// Returns [`ConfigError::Write`] when the write fails.
pub fn commit(path: &Path, contents: &str) -> Result<(), ConfigError> {
    fs::write(path, contents).map_err(|source| ConfigError::Write {
        path: path.to_path_buf(),
        source,
    })
}
