//! Operator credential parsing and validation against live network state.

use k256::ecdsa::SigningKey;
use thiserror::Error;

use crate::mirror::{AccountLookup, AccountRecord};

/// The account id / private key pair collected from the user.
///
/// Created fresh each iteration of the bootstrap loop, dropped on
/// rejection, and only promoted to persisted state on a confirmed write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperatorCredential {
    /// Account identifier in `shard.realm.num` form.
    pub account_id: String,
    /// Hex-encoded ECDSA secp256k1 private key, optionally `0x`-prefixed.
    pub private_key_hex: String,
}

/// Reasons a credential fails validation.
///
/// The session controller restarts on every one of these; the variants
/// exist so diagnostics and console messages can name the actual cause.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CredentialRejection {
    /// The private key is not valid hex or not a valid secp256k1 scalar.
    /// Raised locally; no network call is made.
    #[error("the private key is not a valid hex-encoded ECDSA secp256k1 key")]
    MalformedKey,
    /// No account on the network holds the derived public key.
    #[error("no account on the network holds the key's public key")]
    NotFound,
    /// An account holds the key, but it is not the one the user named.
    #[error("the account holding this key is {found}, not {expected}")]
    IdentifierMismatch {
        /// The account id the user supplied.
        expected: String,
        /// The account id the mirror node reported.
        found: String,
    },
    /// The account exists and matches, but its balance is zero or unknown.
    #[error("account {0} exists but is currently unfunded")]
    Unfunded(String),
    /// The mirror node lookup itself failed (transport or decode).
    #[error("account lookup failed: {0}")]
    LookupFailed(String),
}

/// Derives the `0x`-prefixed compressed public key for a hex-encoded
/// secp256k1 private key.
///
/// This is the format the mirror node expects in `account.publickey`
/// queries. Deterministic and side-effect free.
///
/// # Errors
/// Returns [`CredentialRejection::MalformedKey`] when the input is not
/// valid hex or not a valid curve scalar.
pub fn derive_public_key(private_key_hex: &str) -> Result<String, CredentialRejection> {
    let trimmed = private_key_hex.trim();
    let stripped = trimmed.strip_prefix("0x").unwrap_or(trimmed);
    let bytes = hex::decode(stripped).map_err(|_| CredentialRejection::MalformedKey)?;
    let key = SigningKey::from_slice(&bytes).map_err(|_| CredentialRejection::MalformedKey)?;
    let point = key.verifying_key().to_encoded_point(true);
    Ok(format!("0x{}", hex::encode(point.as_bytes())))
}

/// Validates operator credentials against the network.
///
/// One lookup per call, no internal retries: retrying is the session
/// controller's job, via a full restart of the interactive loop.
#[derive(Debug)]
pub struct CredentialValidator<L> {
    lookup: L,
}

impl<L: AccountLookup> CredentialValidator<L> {
    /// Wraps an account lookup source.
    pub const fn new(lookup: L) -> Self {
        Self { lookup }
    }

    /// Confirms that `credential`'s key belongs to the named account and
    /// that the account is funded.
    ///
    /// A malformed key rejects synchronously, before any network call.
    ///
    /// # Errors
    /// Returns a [`CredentialRejection`] naming the first check that
    /// failed.
    pub async fn validate(
        &self,
        credential: &OperatorCredential,
    ) -> Result<AccountRecord, CredentialRejection> {
        let public_key = derive_public_key(&credential.private_key_hex)?;
        tracing::debug!(%public_key, "derived operator public key");

        let record = self
            .lookup
            .account_by_public_key(&public_key)
            .await
            .map_err(|err| CredentialRejection::LookupFailed(err.to_string()))?
            .ok_or(CredentialRejection::NotFound)?;
        tracing::debug!(account_id = %record.account_id, balance = ?record.balance_tinybar, "mirror node match");

        if record.account_id != credential.account_id {
            return Err(CredentialRejection::IdentifierMismatch {
                expected: credential.account_id.clone(),
                found: record.account_id,
            });
        }
        match record.balance_tinybar {
            Some(balance) if balance > 0 => Ok(record),
            _ => Err(CredentialRejection::Unfunded(record.account_id)),
        }
    }
}
