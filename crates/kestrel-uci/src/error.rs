//! UCI protocol errors.

use kestrel_core::PositionError;

/// Errors that can occur while handling UCI input.
#[derive(Debug, thiserror::Error)]
pub enum UciError {
    /// The `position` command has neither `startpos` nor `fen`.
    #[error("malformed position command: missing startpos or fen keyword")]
    MalformedPosition,

    /// The FEN in a `position fen` command could not be parsed.
    #[error("invalid FEN \"{fen}\": {reason}")]
    InvalidFen {
        /// The FEN string that failed to parse.
        fen: String,
        /// Why it was rejected.
        reason: String,
    },

    /// A move in the `position ... moves` list is not legal.
    #[error("invalid move: {uci_move}")]
    InvalidMove {
        /// The offending move as received.
        uci_move: String,
    },

    /// A `go` parameter was given without a value.
    #[error("missing value for go parameter {param}")]
    MissingGoValue {
        /// Name of the parameter.
        param: String,
    },

    /// A `go` parameter value is not a number.
    #[error("invalid value for go parameter {param}: {value}")]
    InvalidGoValue {
        /// Name of the parameter.
        param: String,
        /// The value that failed to parse.
        value: String,
    },

    /// A `setoption` command without `name`, or with an unusable value.
    #[error("malformed setoption command: {line}")]
    MalformedOption {
        /// The arguments following `setoption`.
        line: String,
    },

    /// Reading from stdin failed.
    #[error("I/O error: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },
}

impl From<PositionError> for UciError {
    fn from(err: PositionError) -> Self {
        match err {
            PositionError::InvalidFen { fen, reason } => UciError::InvalidFen { fen, reason },
            PositionError::IllegalMove { uci_move } => UciError::InvalidMove { uci_move },
        }
    }
}

#[cfg(test)]
mod tests {
    use kestrel_core::PositionError;

    use super::UciError;

    #[test]
    fn position_errors_map_to_uci_errors() {
        let err: UciError = PositionError::IllegalMove {
            uci_move: "e2e5".to_string(),
        }
        .into();
        assert!(matches!(err, UciError::InvalidMove { ref uci_move } if uci_move == "e2e5"));
        assert_eq!(err.to_string(), "invalid move: e2e5");
    }

    #[test]
    fn io_errors_convert() {
        let err: UciError = std::io::Error::other("closed").into();
        assert!(err.to_string().starts_with("I/O error"));
    }
}
