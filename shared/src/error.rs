use thiserror::Error;

/// Board mutation refused by the movement rules
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum RulesError {
    #[error("invalid move from ({from_row},{from_col}) to ({to_row},{to_col})")]
    InvalidMove {
        from_row: i32,
        from_col: i32,
        to_row: i32,
        to_col: i32,
    },
    #[error("invalid capture from ({from_row},{from_col}) to ({to_row},{to_col})")]
    InvalidCapture {
        from_row: i32,
        from_col: i32,
        to_row: i32,
        to_col: i32,
    },
}

/// Incoming text that does not decode into a known message
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("malformed message: {0}")]
    Malformed(#[from] serde_json::Error),
}
