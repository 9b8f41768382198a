/// Error types for hierarchy parsing and layout conversion
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub enum ConvertError {
    // Input Errors
    EmptyInput,
    InvalidUtf8 { valid_up_to: usize },
    Io { source: Arc<std::io::Error> },

    // Parsing Errors
    Parse {
        line: usize,
        column: usize,
        details: String,
    },

    // Configuration Errors
    InvalidMetrics { details: String },

    // Assembly Errors
    DuplicateId { id: String, first: usize, second: usize },
}

pub type ConvertResult<T> = Result<T, ConvertError>;

impl ConvertError {
    /// Build a parse error positioned at `offset` bytes into `input`.
    pub fn parse_at(input: &str, offset: usize, details: impl Into<String>) -> Self {
        let (line, column) = line_column(input, offset);
        ConvertError::Parse {
            line,
            column,
            details: details.into(),
        }
    }

    pub fn is_parse_error(&self) -> bool {
        matches!(
            self,
            ConvertError::Parse { .. } | ConvertError::EmptyInput | ConvertError::InvalidUtf8 { .. }
        )
    }
}

/// 1-based line and column (in characters) of a byte offset.
fn line_column(input: &str, offset: usize) -> (usize, usize) {
    let mut end = offset.min(input.len());
    while !input.is_char_boundary(end) {
        end -= 1;
    }
    let before = &input[..end];
    let line = before.matches('\n').count() + 1;
    let line_start = before.rfind('\n').map(|pos| pos + 1).unwrap_or(0);
    let column = before[line_start..].chars().count() + 1;
    (line, column)
}

impl fmt::Display for ConvertError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConvertError::EmptyInput => write!(f, "Hierarchy dump is empty"),
            ConvertError::InvalidUtf8 { valid_up_to } => {
                write!(f, "Hierarchy dump is not valid UTF-8 (valid up to byte {valid_up_to})")
            }
            ConvertError::Io { source } => write!(f, "Failed to read hierarchy dump: {source}"),
            ConvertError::Parse {
                line,
                column,
                details,
            } => write!(f, "Parse error at {line}:{column}: {details}"),
            ConvertError::InvalidMetrics { details } => {
                write!(f, "Invalid screen metrics: {details}")
            }
            ConvertError::DuplicateId { id, first, second } => write!(
                f,
                "Duplicate identifier '{id}' on fields {first} and {second}"
            ),
        }
    }
}

impl std::error::Error for ConvertError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConvertError::Io { source } => Some(source.as_ref()),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ConvertError {
    fn from(err: std::io::Error) -> Self {
        ConvertError::Io {
            source: Arc::new(err),
        }
    }
}
