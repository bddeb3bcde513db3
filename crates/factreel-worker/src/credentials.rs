//! Credential resolution from the environment.

use factreel_models::Credentials;
use tracing::debug;

use crate::error::{WorkerError, WorkerResult};

/// Bearer token for the chat and image endpoints.
pub const OPENAI_TOKEN_VAR: &str = "OAI_KEY";
/// AWS secret access key for Polly.
pub const AWS_ACCESS_KEY_VAR: &str = "AWS_KEY";
/// AWS access key ID for Polly.
pub const AWS_ACCESS_ID_VAR: &str = "AWS_ID";

/// Resolve the three credentials through `lookup`.
///
/// Variables are checked in a fixed order (LLM token, speech key, speech
/// id) and the first unset or blank one is reported. Later variables are not
/// inspected once one is missing.
pub fn resolve_credentials<F>(lookup: F) -> WorkerResult<Credentials>
where
    F: Fn(&str) -> Option<String>,
{
    let require = |name: &str| -> WorkerResult<String> {
        match lookup(name) {
            Some(value) if !value.trim().is_empty() => Ok(value),
            _ => Err(WorkerError::missing_credential(name)),
        }
    };

    let token = require(OPENAI_TOKEN_VAR)?;
    let access_key = require(AWS_ACCESS_KEY_VAR)?;
    let access_id = require(AWS_ACCESS_ID_VAR)?;

    debug!("Resolved API credentials");
    Ok(Credentials::new(token, access_id, access_key))
}

/// Credential lookup backed by the process environment.
pub fn env_lookup(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

/// Resolve credentials from process environment variables.
pub fn credentials_from_env() -> WorkerResult<Credentials> {
    resolve_credentials(env_lookup)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_all_present() {
        let vars = env(&[("OAI_KEY", "sk-1"), ("AWS_KEY", "secret"), ("AWS_ID", "AKIA")]);
        let creds = resolve_credentials(|k| vars.get(k).cloned()).unwrap();
        assert_eq!(creds.openai_token(), "sk-1");
        assert_eq!(creds.aws_access_key(), "secret");
        assert_eq!(creds.aws_access_id(), "AKIA");
    }

    #[test]
    fn test_reports_first_missing_in_order() {
        let vars = env(&[]);
        match resolve_credentials(|k| vars.get(k).cloned()) {
            Err(WorkerError::MissingCredential(name)) => assert_eq!(name, "OAI_KEY"),
            other => panic!("unexpected result: {other:?}"),
        }

        let vars = env(&[("OAI_KEY", "sk-1")]);
        match resolve_credentials(|k| vars.get(k).cloned()) {
            Err(WorkerError::MissingCredential(name)) => assert_eq!(name, "AWS_KEY"),
            other => panic!("unexpected result: {other:?}"),
        }

        let vars = env(&[("OAI_KEY", "sk-1"), ("AWS_KEY", "secret")]);
        match resolve_credentials(|k| vars.get(k).cloned()) {
            Err(WorkerError::MissingCredential(name)) => assert_eq!(name, "AWS_ID"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_blank_value_counts_as_missing() {
        let vars = env(&[("OAI_KEY", "  "), ("AWS_KEY", "secret"), ("AWS_ID", "AKIA")]);
        let err = resolve_credentials(|k| vars.get(k).cloned()).unwrap_err();
        assert_eq!(err.to_string(), "Missing credential: OAI_KEY not set");
    }

    #[test]
    fn test_stops_at_first_miss() {
        let seen = RefCell::new(Vec::new());
        let _ = resolve_credentials(|k| {
            seen.borrow_mut().push(k.to_string());
            None
        });
        assert_eq!(*seen.borrow(), vec!["OAI_KEY".to_string()]);
    }

    #[test]
    fn test_env_lookup_reads_process_environment() {
        std::env::set_var("FACTREEL_TEST_LOOKUP_PRESENT", "value");
        assert_eq!(
            env_lookup("FACTREEL_TEST_LOOKUP_PRESENT").as_deref(),
            Some("value")
        );
        assert_eq!(env_lookup("FACTREEL_TEST_LOOKUP_ABSENT"), None);
    }
}
