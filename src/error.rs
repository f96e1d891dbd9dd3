use thiserror::Error;

/// Malformed Narsese text. Always surfaced to the caller.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("empty term")]
    Empty,
    #[error("unbalanced brackets at byte {position}")]
    Unbalanced { position: usize },
    #[error("unexpected character {found:?} at byte {position}")]
    UnexpectedCharacter { found: char, position: usize },
    #[error("unknown connector in {0:?}")]
    UnknownConnector(String),
    #[error("missing operand in {0:?}")]
    MissingOperand(String),
    #[error("invalid variable {0:?}")]
    InvalidVariable(String),
    #[error("invalid atom {0:?}")]
    InvalidAtom(String),
    #[error("missing punctuation in {0:?}")]
    MissingPunctuation(String),
    #[error("invalid truth value {0:?}")]
    InvalidTruthValue(String),
}

#[derive(Error, Debug)]
pub enum NarsError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// A statement does not have the shape an operation assumed.
    #[error("statement {statement} has unexpected shape: {reason}")]
    InvalidShape { statement: String, reason: &'static str },
    #[error("unknown personality parameter {0:?}")]
    UnknownParameter(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl NarsError {
    pub(crate) fn shape(statement: impl ToString, reason: &'static str) -> Self {
        NarsError::InvalidShape {
            statement: statement.to_string(),
            reason,
        }
    }
}

pub type Result<T> = std::result::Result<T, NarsError>;
