//! End-to-end scripted sessions: the state machine driven by a scripted
//! console and a static account lookup, writing into temp directories.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::io;
use std::path::Path;
use std::rc::Rc;

use hbootstrap_core::{
    AccountLookup, AccountRecord, CredentialValidator, MirrorError, Prompt, Session,
    SessionOptions, SessionOutcome,
};

const OPERATOR_ID: &str = "0.0.12345";
const OPERATOR_KEY: &str =
    "0x2e1d968b041d84dd120a5860cee60cd83f9374ef527ca86996317ada3d0d03e7";
const SEED_PHRASE: &str =
    "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

/// Console double: scripted answers in, shared transcript out.
struct ScriptedPrompt {
    answers: VecDeque<String>,
    transcript: Rc<RefCell<Vec<String>>>,
}

impl ScriptedPrompt {
    fn new(answers: &[&str]) -> (Self, Rc<RefCell<Vec<String>>>) {
        let transcript = Rc::new(RefCell::new(Vec::new()));
        let prompt = Self {
            answers: answers.iter().map(ToString::to_string).collect(),
            transcript: Rc::clone(&transcript),
        };
        (prompt, transcript)
    }
}

impl Prompt for ScriptedPrompt {
    fn say(&mut self, line: &str) {
        self.transcript.borrow_mut().push(line.to_string());
    }

    fn ask(&mut self) -> io::Result<String> {
        self.answers
            .pop_front()
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "script exhausted"))
    }
}

/// Lookup double returning the same record on every call, with a shared
/// call counter.
struct StaticLookup {
    record: Option<AccountRecord>,
    calls: Rc<Cell<usize>>,
}

impl StaticLookup {
    fn funded(account_id: &str) -> (Self, Rc<Cell<usize>>) {
        let calls = Rc::new(Cell::new(0));
        let lookup = Self {
            record: Some(AccountRecord {
                account_id: account_id.to_string(),
                balance_tinybar: Some(500),
            }),
            calls: Rc::clone(&calls),
        };
        (lookup, calls)
    }
}

impl AccountLookup for StaticLookup {
    async fn account_by_public_key(
        &self,
        _public_key_hex: &str,
    ) -> Result<Option<AccountRecord>, MirrorError> {
        self.calls.set(self.calls.get() + 1);
        Ok(self.record.clone())
    }
}

fn options(target: &Path, rpc_url_override: Option<&str>) -> SessionOptions {
    SessionOptions {
        target: target.to_path_buf(),
        rpc_url_override: rpc_url_override.map(ToString::to_string),
    }
}

#[tokio::test]
async fn confirmed_session_writes_the_document() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join(".env");

    let (prompt, _) = ScriptedPrompt::new(&[OPERATOR_ID, OPERATOR_KEY, SEED_PHRASE, "yes"]);
    let (lookup, _) = StaticLookup::funded(OPERATOR_ID);
    let mut session = Session::new(
        prompt,
        CredentialValidator::new(lookup),
        options(&target, None),
    );
    let outcome = session.run().await.unwrap();

    assert_eq!(outcome, SessionOutcome::Committed);
    let written = std::fs::read_to_string(&target).unwrap();
    assert!(written.contains(&format!("OPERATOR_ACCOUNT_ID=\"{OPERATOR_ID}\"")));
    assert!(written.contains(&format!("OPERATOR_ACCOUNT_PRIVATE_KEY=\"{OPERATOR_KEY}\"")));
    assert!(written.contains(&format!("SEED_PHRASE=\"{SEED_PHRASE}\"")));
    assert!(written.contains("ACCOUNT_ID=\"YOUR_ACCOUNT_ID\""));
    assert!(written.contains("RPC_URL=\"http://localhost:7546/\""));
}

#[tokio::test]
async fn blank_seed_phrase_commits_a_generated_one() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join(".env");

    let (prompt, _) = ScriptedPrompt::new(&[OPERATOR_ID, OPERATOR_KEY, "", "y"]);
    let (lookup, _) = StaticLookup::funded(OPERATOR_ID);
    let mut session = Session::new(
        prompt,
        CredentialValidator::new(lookup),
        options(&target, None),
    );
    assert_eq!(session.run().await.unwrap(), SessionOutcome::Committed);

    let written = std::fs::read_to_string(&target).unwrap();
    let phrase = written
        .lines()
        .find_map(|line| line.strip_prefix("SEED_PHRASE=\""))
        .and_then(|rest| rest.strip_suffix('"'))
        .unwrap();
    assert_eq!(phrase.split_whitespace().count(), 12);
}

#[tokio::test]
async fn rpc_override_flows_into_the_document() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join(".env");

    let (prompt, _) = ScriptedPrompt::new(&[OPERATOR_ID, OPERATOR_KEY, SEED_PHRASE, "y"]);
    let (lookup, _) = StaticLookup::funded(OPERATOR_ID);
    let mut session = Session::new(
        prompt,
        CredentialValidator::new(lookup),
        options(&target, Some("https://relay.example:7546/")),
    );
    assert_eq!(session.run().await.unwrap(), SessionOutcome::Committed);

    let written = std::fs::read_to_string(&target).unwrap();
    assert!(written.contains("RPC_URL=\"https://relay.example:7546/\""));
}

#[tokio::test]
async fn identifier_mismatch_restarts_and_the_second_pass_can_commit() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join(".env");

    // First iteration: the key belongs to a different account, so the
    // session restarts and re-prompts from the top. Second iteration: the
    // user corrects the account id and commits.
    let (prompt, transcript) = ScriptedPrompt::new(&[
        OPERATOR_ID,
        OPERATOR_KEY,
        "0.0.99999",
        OPERATOR_KEY,
        SEED_PHRASE,
        "y",
    ]);
    let (lookup, calls) = StaticLookup::funded("0.0.99999");
    let mut session = Session::new(
        prompt,
        CredentialValidator::new(lookup),
        options(&target, None),
    );
    let outcome = session.run().await.unwrap();

    assert_eq!(outcome, SessionOutcome::Committed);
    assert_eq!(calls.get(), 2);
    let written = std::fs::read_to_string(&target).unwrap();
    assert!(written.contains("OPERATOR_ACCOUNT_ID=\"0.0.99999\""));

    // The first rejection was explained to the user in plain language.
    assert!(transcript
        .borrow()
        .iter()
        .any(|line| line.contains("0.0.99999") && line.contains("0.0.12345")));
}

#[tokio::test]
async fn blank_confirmation_abandons_and_leaves_the_target_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join(".env");
    std::fs::write(&target, "PRIOR=\"contents\"\n").unwrap();

    let (prompt, _) = ScriptedPrompt::new(&[OPERATOR_ID, OPERATOR_KEY, SEED_PHRASE, ""]);
    let (lookup, _) = StaticLookup::funded(OPERATOR_ID);
    let mut session = Session::new(
        prompt,
        CredentialValidator::new(lookup),
        options(&target, None),
    );
    let outcome = session.run().await.unwrap();

    assert_eq!(outcome, SessionOutcome::Abandoned);
    assert_eq!(
        std::fs::read_to_string(&target).unwrap(),
        "PRIOR=\"contents\"\n"
    );
}

#[tokio::test]
async fn restart_at_review_reprompts_from_scratch() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join(".env");

    // "restart" at the confirmation, then a full second pass ending in a
    // decline. The target must never be created.
    let (prompt, transcript) = ScriptedPrompt::new(&[
        OPERATOR_ID,
        OPERATOR_KEY,
        SEED_PHRASE,
        "restart",
        OPERATOR_ID,
        OPERATOR_KEY,
        SEED_PHRASE,
        "No",
    ]);
    let (lookup, _) = StaticLookup::funded(OPERATOR_ID);
    let mut session = Session::new(
        prompt,
        CredentialValidator::new(lookup),
        options(&target, None),
    );
    let outcome = session.run().await.unwrap();

    assert_eq!(outcome, SessionOutcome::Abandoned);
    assert!(!target.exists());

    let account_prompts = transcript
        .borrow()
        .iter()
        .filter(|line| line.starts_with("What is your operator account ID?"))
        .count();
    assert_eq!(account_prompts, 2);
}

#[tokio::test]
async fn invalid_seed_phrase_restarts_the_whole_loop() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join(".env");

    let (prompt, _) = ScriptedPrompt::new(&[
        OPERATOR_ID,
        OPERATOR_KEY,
        "these words are not a valid phrase",
        OPERATOR_ID,
        OPERATOR_KEY,
        SEED_PHRASE,
        "y",
    ]);
    let (lookup, calls) = StaticLookup::funded(OPERATOR_ID);
    let mut session = Session::new(
        prompt,
        CredentialValidator::new(lookup),
        options(&target, None),
    );
    let outcome = session.run().await.unwrap();

    assert_eq!(outcome, SessionOutcome::Committed);
    // The credential was re-validated on the second pass; nothing carried
    // over from the rejected iteration.
    assert_eq!(calls.get(), 2);
}
