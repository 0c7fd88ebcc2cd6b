pub type StereorigResult<T> = Result<T, StereorigError>;

#[derive(thiserror::Error, Debug)]
pub enum StereorigError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("waypoint record at line {line}: {msg}")]
    Waypoint { line: usize, msg: String },

    #[error("process error: {0}")]
    Process(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl StereorigError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn waypoint(line: usize, msg: impl Into<String>) -> Self {
        Self::Waypoint {
            line,
            msg: msg.into(),
        }
    }

    pub fn process(msg: impl Into<String>) -> Self {
        Self::Process(msg.into())
    }
}
