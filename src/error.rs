use thiserror::Error;

pub type ReportResult<T> = Result<T, ReportError>;

/// Everything that can abort a load or a render.
///
/// Cleaning is all-or-nothing: the first bad value stops the load and no
/// partial dataset is handed to the views.
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Missing column: {column}")]
    Schema { column: String },

    #[error("Parse error at line {line}: {column} = {value:?} ({reason})")]
    Parse {
        line: usize,
        column: &'static str,
        value: String,
        reason: String,
    },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl ReportError {
    pub fn parse(
        line: usize,
        column: &'static str,
        value: &str,
        reason: impl Into<String>,
    ) -> Self {
        ReportError::Parse {
            line,
            column,
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}
