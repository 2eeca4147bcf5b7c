//! The interactive bootstrap session: an explicit state machine over
//! prompting, validation, mnemonic resolution and the confirmation-gated
//! write.
//!
//! All user interaction flows through the [`Prompt`] trait so tests can
//! script an entire session. The only state with an externally observable
//! side effect is the commit; every rejection restarts the loop from
//! scratch with no partial state carried over.

use std::io;
use std::io::Write as _;
use std::path::PathBuf;

use thiserror::Error;

use crate::config::{commit, BootstrapConfig, ConfigError};
use crate::credential::{CredentialValidator, OperatorCredential};
use crate::mirror::AccountLookup;
use crate::mnemonic;

/// Line-oriented interactive console.
pub trait Prompt {
    /// Prints one line of user-facing output.
    fn say(&mut self, line: &str);

    /// Reads one line of user input, without its trailing newline.
    ///
    /// # Errors
    /// Returns an error when the input stream fails or is closed.
    fn ask(&mut self) -> io::Result<String>;
}

/// [`Prompt`] over the process's stdin/stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdioPrompt;

impl Prompt for StdioPrompt {
    fn say(&mut self, line: &str) {
        println!("{line}");
    }

    fn ask(&mut self) -> io::Result<String> {
        print!("> ");
        io::stdout().flush()?;
        let mut line = String::new();
        if io::stdin().read_line(&mut line)? == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "input stream closed",
            ));
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }
}

/// What the user chose at the overwrite confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewDecision {
    /// Write the rendered document.
    Commit,
    /// Throw everything away and re-prompt from the start.
    Restart,
    /// Decline; leave the target untouched.
    Abandon,
}

impl ReviewDecision {
    /// Classifies confirmation input by its first character,
    /// case-insensitively: `y` commits, `r` restarts, anything else
    /// (blank included) declines. Silence means decline, not retry.
    #[must_use]
    pub fn parse(input: &str) -> Self {
        match input.chars().next().map(|c| c.to_ascii_lowercase()) {
            Some('y') => Self::Commit,
            Some('r') => Self::Restart,
            _ => Self::Abandon,
        }
    }
}

/// Terminal outcome of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    /// The rendered document was written to the target path.
    Committed,
    /// The user declined; nothing was written.
    Abandoned,
}

/// Inputs fixed for the lifetime of one session.
#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// Target path for the rendered operator `.env`.
    pub target: PathBuf,
    /// Relay endpoint override, when the caller's environment supplies one.
    pub rpc_url_override: Option<String>,
}

/// Errors that end a session abnormally.
///
/// Validation failures never appear here; those are contained by the loop
/// and converted into restarts. Only console I/O failure and the final
/// commit's write failure are hard errors.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The interactive console failed.
    #[error("console i/o failed: {0}")]
    Io(#[from] io::Error),
    /// The confirmed write to the target path failed.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Session states. Transitions are driven exclusively by `Session::run`;
/// rejected iterations pass through `Restarting` and re-enter `Prompting`
/// with nothing carried over.
enum State {
    Prompting,
    Validating(OperatorCredential),
    MnemonicCheck(OperatorCredential),
    Reviewing {
        credential: OperatorCredential,
        seed_phrase: String,
    },
    Restarting,
}

/// The interactive bootstrap state machine.
pub struct Session<P, L> {
    prompt: P,
    validator: CredentialValidator<L>,
    options: SessionOptions,
}

impl<P: Prompt, L: AccountLookup> Session<P, L> {
    /// Assembles a session from its collaborators.
    pub const fn new(
        prompt: P,
        validator: CredentialValidator<L>,
        options: SessionOptions,
    ) -> Self {
        Self {
            prompt,
            validator,
            options,
        }
    }

    /// Runs the session to a terminal outcome.
    ///
    /// Blocks indefinitely on interactive input and on the single
    /// outstanding mirror lookup; there is no timeout on either.
    ///
    /// # Errors
    /// Returns [`SessionError`] on console I/O failure or when the
    /// confirmed write fails. Validation rejections do not error; they
    /// restart the loop.
    pub async fn run(&mut self) -> Result<SessionOutcome, SessionError> {
        let mut state = State::Prompting;
        loop {
            state = match state {
                State::Prompting => {
                    self.prompt
                        .say("What is your operator account ID? e.g. \"0.0.12345\"");
                    let account_id = self.prompt.ask()?;
                    self.prompt.say(
                        "What is your operator account private key? e.g. \"0x1234abcdef5678abcdef90d7edc0242ce802d1c3d5a2bccf7a9aa0cae63632d\"",
                    );
                    let private_key_hex = self.prompt.ask()?;
                    State::Validating(OperatorCredential {
                        account_id,
                        private_key_hex,
                    })
                }

                State::Validating(credential) => {
                    match self.validator.validate(&credential).await {
                        Ok(_) => State::MnemonicCheck(credential),
                        Err(rejection) => {
                            tracing::debug!(%rejection, "credential rejected");
                            self.prompt
                                .say(&format!("Cannot use this operator account: {rejection}."));
                            State::Restarting
                        }
                    }
                }

                State::MnemonicCheck(credential) => {
                    self.prompt.say(
                        "What is your BIP-39 seed phrase? (leave blank if you do not have one, a new one will be generated for you)",
                    );
                    self.prompt.say(
                        "e.g. \"produce youth second tiger social diagram area jeans frequent casual kingdom major\"",
                    );
                    let input = self.prompt.ask()?;
                    match mnemonic::resolve(&input) {
                        Ok(seed_phrase) => State::Reviewing {
                            credential,
                            seed_phrase,
                        },
                        Err(rejection) => {
                            tracing::debug!(%rejection, "seed phrase rejected");
                            self.prompt.say("Specified seed phrase is invalid.");
                            State::Restarting
                        }
                    }
                }

                State::Reviewing {
                    credential,
                    seed_phrase,
                } => {
                    let config = BootstrapConfig {
                        operator_id: credential.account_id,
                        operator_key: credential.private_key_hex,
                        seed_phrase,
                        rpc_url: BootstrapConfig::resolve_rpc_url(
                            self.options.rpc_url_override.clone(),
                        ),
                    };
                    let document = config.render();
                    self.prompt.say(&document);
                    self.prompt.say(&format!(
                        "Are you OK to overwrite {} with the above? (restart/yes/No)",
                        self.options.target.display()
                    ));
                    match ReviewDecision::parse(&self.prompt.ask()?) {
                        ReviewDecision::Commit => {
                            self.prompt.say("OK, overwriting");
                            commit(&self.options.target, &document)?;
                            return Ok(SessionOutcome::Committed);
                        }
                        ReviewDecision::Restart => {
                            self.prompt.say("OK, restarting");
                            State::Restarting
                        }
                        ReviewDecision::Abandon => {
                            self.prompt.say("OK, doing nothing");
                            return Ok(SessionOutcome::Abandoned);
                        }
                    }
                }

                // Full re-prompt; deliberately drops every input from the
                // failed iteration so stale credential/mnemonic pairings
                // cannot survive.
                State::Restarting => State::Prompting,
            };
        }
    }
}
