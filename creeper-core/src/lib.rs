pub mod batch;
pub mod error;
pub mod output;
pub mod validator;

pub use error::{CreeperError, Result};

pub use batch::{parse_candidates, BatchRunner, Outcome, ReportCallback};
pub use output::{format_outcome, OutputFormat, ValidWriter};
pub use validator::{classify_body, Classification, Validator};
