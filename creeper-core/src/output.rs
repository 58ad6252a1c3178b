use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::batch::Outcome;
use crate::error::{CreeperError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Human,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = CreeperError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "human" | "text" => Ok(OutputFormat::Human),
            "json" => Ok(OutputFormat::Json),
            _ => Err(CreeperError::InvalidInput(format!(
                "Unknown output format: {}",
                s
            ))),
        }
    }
}

/// Console line for one outcome, e.g. `alice@example.com - VALID`
pub fn format_outcome(outcome: &Outcome) -> String {
    format!("{} - {}", outcome.email, outcome.classification)
}

/// Append-only sink for positively classified addresses.
///
/// Each append opens the file (created on first use), writes the address
/// plus a newline, and closes it again, so a partial run still leaves every
/// VALID address recorded so far on disk.
#[derive(Debug, Clone)]
pub struct ValidWriter {
    path: PathBuf,
}

impl ValidWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append(&self, email: &str) -> Result<()> {
        let mut file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.path)?;
        writeln!(file, "{}", email)?;
        Ok(())
    }
}
