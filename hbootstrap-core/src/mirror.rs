//! Read-only account lookup against a Hedera mirror node.
//!
//! The mirror node is a query-only service that reports network state
//! without participating in consensus. The bootstrap uses exactly one of
//! its endpoints: the account search keyed by public key.

use serde::Deserialize;
use thiserror::Error;

/// REST endpoint of the public testnet mirror node.
pub const TESTNET_MIRROR_URL: &str = "https://testnet.mirrornode.hedera.com";

/// One account entry from the mirror node, reduced to the two fields the
/// bootstrap validates against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountRecord {
    /// Account identifier in `shard.realm.num` form, e.g. `0.0.12345`.
    pub account_id: String,
    /// Account balance in tinybar, when the mirror node reports one.
    pub balance_tinybar: Option<u64>,
}

/// Errors from a mirror node lookup.
///
/// The session controller reacts to all of these the same way (restart),
/// but the causes stay distinguishable for diagnostics.
#[derive(Debug, Error)]
pub enum MirrorError {
    /// The HTTP request could not be completed, or the mirror node
    /// responded with an error status.
    #[error("mirror request failed: {0}")]
    Transport(#[from] reqwest::Error),
    /// The response body was not the expected JSON shape.
    #[error("mirror response could not be decoded: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Read-only account lookup keyed by public key.
///
/// The production implementation is [`MirrorClient`]; tests substitute
/// doubles to script outcomes and count calls.
#[allow(async_fn_in_trait)]
pub trait AccountLookup {
    /// Returns the most recently modified account holding `public_key_hex`
    /// together with its balance, or `None` when no account matches.
    ///
    /// # Errors
    /// Returns [`MirrorError`] on transport or decode failure.
    async fn account_by_public_key(
        &self,
        public_key_hex: &str,
    ) -> Result<Option<AccountRecord>, MirrorError>;
}

/// HTTP client for the mirror node REST API.
#[derive(Debug, Clone)]
pub struct MirrorClient {
    client: reqwest::Client,
    base_url: String,
}

impl MirrorClient {
    /// Creates a client against an arbitrary mirror node base URL
    /// (no trailing slash).
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Creates a client against the public testnet mirror node.
    #[must_use]
    pub fn testnet() -> Self {
        Self::new(TESTNET_MIRROR_URL)
    }
}

impl AccountLookup for MirrorClient {
    async fn account_by_public_key(
        &self,
        public_key_hex: &str,
    ) -> Result<Option<AccountRecord>, MirrorError> {
        // Single result, most recently modified first: the canonical
        // account for this key.
        let url = format!(
            "{}/api/v1/accounts?account.publickey={public_key_hex}&balance=true&limit=1&order=desc",
            self.base_url
        );
        tracing::debug!(%url, "querying mirror node");

        let response = self
            .client
            .get(&url)
            .header(
                "User-Agent",
                format!("hbootstrap/{}", env!("CARGO_PKG_VERSION")),
            )
            .send()
            .await?
            .error_for_status()?;

        let body = response.text().await?;
        let page: AccountsPage = serde_json::from_str(&body)?;
        Ok(page.accounts.into_iter().next().map(Into::into))
    }
}

#[derive(Debug, Deserialize)]
struct AccountsPage {
    #[serde(default)]
    accounts: Vec<AccountEntry>,
}

#[derive(Debug, Deserialize)]
struct AccountEntry {
    account: String,
    balance: Option<BalanceEntry>,
}

#[derive(Debug, Deserialize)]
struct BalanceEntry {
    balance: Option<u64>,
}

impl From<AccountEntry> for AccountRecord {
    fn from(entry: AccountEntry) -> Self {
        Self {
            account_id: entry.account,
            balance_tinybar: entry.balance.and_then(|b| b.balance),
        }
    }
}
