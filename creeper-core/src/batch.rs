use std::time::Duration;

use serde::Serialize;
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::output::ValidWriter;
use crate::validator::{Classification, Validator};

/// Default delay after each validation attempt. The provider throttles
/// aggressive callers and starts returning false positives, so pacing is on
/// by default.
pub const DEFAULT_THROTTLE: Duration = Duration::from_millis(500);

pub type ReportCallback = Box<dyn Fn(usize, usize, &Outcome) + Send + Sync>;

/// Result of one validation attempt.
#[derive(Debug, Clone, Serialize)]
pub struct Outcome {
    pub email: String,
    pub classification: Classification,
}

/// Split file content into candidate addresses, one per line.
///
/// Lines are trimmed of surrounding whitespace but blank lines are NOT
/// skipped: they become empty-string candidates and get submitted like any
/// other, matching the original tool's behavior.
pub fn parse_candidates(content: &str) -> Vec<String> {
    content.lines().map(|line| line.trim().to_string()).collect()
}

/// Sequential driver: one request in flight at a time, fixed delay between
/// candidates, VALID results appended to the configured writer as they come.
pub struct BatchRunner {
    validator: Validator,
    throttle: Duration,
    valid_writer: Option<ValidWriter>,
}

impl BatchRunner {
    pub fn new(validator: Validator) -> Self {
        Self {
            validator,
            throttle: DEFAULT_THROTTLE,
            valid_writer: None,
        }
    }

    /// Set the delay applied after each validation attempt
    pub fn with_throttle(mut self, throttle: Duration) -> Self {
        self.throttle = throttle;
        self
    }

    /// Append positively classified addresses to this writer
    pub fn with_valid_writer(mut self, writer: ValidWriter) -> Self {
        self.valid_writer = Some(writer);
        self
    }

    /// Validate every candidate in order.
    ///
    /// A transport failure on one candidate is downgraded to UNKNOWN with a
    /// warning and the batch continues; only startup errors abort a run. The
    /// report callback fires once per outcome, in input order, before the
    /// throttle delay for that candidate elapses.
    pub async fn run(&self, candidates: &[String], report: Option<ReportCallback>) -> Vec<Outcome> {
        let total = candidates.len();
        debug!(total, throttle_ms = self.throttle.as_millis() as u64, "Starting batch run");

        let mut outcomes = Vec::with_capacity(total);

        for (index, email) in candidates.iter().enumerate() {
            let classification = match self.validator.check(email).await {
                Ok(classification) => classification,
                Err(e) => {
                    warn!(email = %email, error = %e, "Request failed, classifying as UNKNOWN");
                    Classification::Unknown
                }
            };

            if classification == Classification::Valid {
                if let Some(writer) = &self.valid_writer {
                    if let Err(e) = writer.append(email) {
                        warn!(email = %email, error = %e, "Failed to record valid address");
                    }
                }
            }

            let outcome = Outcome {
                email: email.clone(),
                classification,
            };

            if let Some(report) = &report {
                report(index + 1, total, &outcome);
            }
            outcomes.push(outcome);

            // The original tool sleeps unconditionally, including after the
            // final candidate.
            if !self.throttle.is_zero() {
                sleep(self.throttle).await;
            }
        }

        outcomes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_candidates() {
        let content = "alice@example.com\n  bob@example.com  \ncarol@example.com\n";
        let candidates = parse_candidates(content);
        assert_eq!(
            candidates,
            vec!["alice@example.com", "bob@example.com", "carol@example.com"]
        );
    }

    #[test]
    fn test_parse_candidates_keeps_blank_lines() {
        // Blank lines become empty candidates, same as the original tool
        let candidates = parse_candidates("alice@example.com\n\nbob@example.com\n");
        assert_eq!(candidates, vec!["alice@example.com", "", "bob@example.com"]);
    }

    #[test]
    fn test_parse_candidates_empty_input() {
        assert!(parse_candidates("").is_empty());
    }
}
