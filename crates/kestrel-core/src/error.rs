//! Error types for position setup.

/// Errors raised while building or advancing a [`Position`](crate::Position)
/// from external input (FEN strings, UCI move lists).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PositionError {
    /// The FEN string was rejected by the board parser.
    #[error("invalid FEN \"{fen}\": {reason}")]
    InvalidFen {
        /// The FEN string that failed to parse.
        fen: String,
        /// Parser diagnostic.
        reason: String,
    },

    /// A UCI move string does not name a legal move in the position.
    #[error("illegal move: {uci_move}")]
    IllegalMove {
        /// The offending UCI move string.
        uci_move: String,
    },
}
