//! Bootstrap logic for provisioning a Hedera operator environment.
//!
//! The crate validates operator credentials against a mirror node,
//! resolves a BIP-39 seed phrase, and renders two dotenv artifacts: the
//! operator's own `.env` and the JSON-RPC relay's `.rpcrelay.env`. The
//! interactive loop that ties these together lives in [`session`].

#![deny(clippy::all, clippy::pedantic, clippy::nursery)]

pub mod config;
pub mod credential;
pub mod mirror;
pub mod mnemonic;
pub mod session;

pub use config::{commit, BootstrapConfig, ConfigError, RelayConfig};
pub use credential::{CredentialRejection, CredentialValidator, OperatorCredential};
pub use mirror::{AccountLookup, AccountRecord, MirrorClient, MirrorError};
pub use mnemonic::MnemonicRejection;
pub use session::{
    Prompt, ReviewDecision, Session, SessionError, SessionOptions, SessionOutcome, StdioPrompt,
};
