//! Board collaborator for the kestrel search: move encoding, move lists and a
//! position with a make/restore journal, built on the `cozy-chess` generator.

mod chess_move;
mod error;
mod move_list;
pub mod perft;
mod position;

pub use chess_move::Move;
pub use error::PositionError;
pub use move_list::{MAX_MOVES, MoveList};
pub use position::{Position, STARTING_FEN};

pub use cozy_chess::{Board, Color, File, Piece, Rank, Square};
