//! Search-side move representation, bit-packed into a u32.
//!
//! The generator hands out `cozy_chess::Move` values, which only carry the
//! squares and the promotion. The search needs the moving piece and the
//! captured piece for ordering and heuristics, so every generated move is
//! re-encoded here together with that context.

use std::fmt;

use cozy_chess::{File, Piece, Square};

const FROM_MASK: u32 = 0x3F;
const TO_SHIFT: u32 = 6;
const PIECE_SHIFT: u32 = 12;
const CAPTURE_SHIFT: u32 = 15;
const PROMOTION_SHIFT: u32 = 18;
const CASTLE_BIT: u32 = 1 << 21;
const PIECE_FIELD: u32 = 0x7;

/// Encode an optional piece as a 3-bit field (0 = none, 1..=6 = piece).
const fn piece_bits(piece: Option<Piece>) -> u32 {
    match piece {
        Some(p) => p as u32 + 1,
        None => 0,
    }
}

fn decode_piece(bits: u32) -> Option<Piece> {
    match bits & PIECE_FIELD {
        0 => None,
        n => Piece::ALL.get(n as usize - 1).copied(),
    }
}

/// A chess move together with the board context the search needs.
///
/// ```text
/// bits  0-5:  origin square
/// bits  6-11: target square
/// bits 12-14: moving piece    (piece index + 1)
/// bits 15-17: captured piece  (0 = none)
/// bits 18-20: promotion piece (0 = none)
/// bit  21:    castling
/// ```
///
/// Castling keeps the generator's king-takes-rook convention internally;
/// [`Move::to_uci`] renders the standard king destination.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Move(u32);

impl Move {
    /// "No move" sentinel. Never produced by the generator.
    pub const NULL: Move = Move(0);

    /// Create a non-capturing, non-promoting move.
    pub const fn quiet(from: Square, to: Square, piece: Piece) -> Move {
        Move(
            (from as u32)
                | ((to as u32) << TO_SHIFT)
                | (piece_bits(Some(piece)) << PIECE_SHIFT),
        )
    }

    /// Return a copy of this move marked as capturing `victim`.
    pub const fn with_capture(self, victim: Piece) -> Move {
        Move(self.0 | (piece_bits(Some(victim)) << CAPTURE_SHIFT))
    }

    /// Return a copy of this move marked as promoting to `piece`.
    pub const fn with_promotion(self, piece: Piece) -> Move {
        Move(self.0 | (piece_bits(Some(piece)) << PROMOTION_SHIFT))
    }

    /// Return a copy of this move marked as castling.
    pub const fn with_castling(self) -> Move {
        Move(self.0 | CASTLE_BIT)
    }

    /// Rebuild a move from its raw encoding.
    pub const fn from_raw(raw: u32) -> Move {
        Move(raw)
    }

    /// The raw encoding.
    pub const fn raw(self) -> u32 {
        self.0
    }

    pub fn from(self) -> Square {
        Square::ALL[(self.0 & FROM_MASK) as usize]
    }

    pub fn to(self) -> Square {
        Square::ALL[((self.0 >> TO_SHIFT) & FROM_MASK) as usize]
    }

    /// The moving piece. Pawn for the null move.
    pub fn piece(self) -> Piece {
        decode_piece(self.0 >> PIECE_SHIFT).unwrap_or(Piece::Pawn)
    }

    /// The captured piece, if any. En passant reports a pawn.
    pub fn capture(self) -> Option<Piece> {
        decode_piece(self.0 >> CAPTURE_SHIFT)
    }

    pub fn promotion(self) -> Option<Piece> {
        decode_piece(self.0 >> PROMOTION_SHIFT)
    }

    pub const fn is_null(self) -> bool {
        self.0 == 0
    }

    pub const fn is_capture(self) -> bool {
        (self.0 >> CAPTURE_SHIFT) & PIECE_FIELD != 0
    }

    pub const fn is_promotion(self) -> bool {
        (self.0 >> PROMOTION_SHIFT) & PIECE_FIELD != 0
    }

    pub const fn is_castling(self) -> bool {
        self.0 & CASTLE_BIT != 0
    }

    /// Captures and promotions.
    pub const fn is_tactical(self) -> bool {
        self.is_capture() || self.is_promotion()
    }

    /// The move in the generator's own representation.
    pub fn to_cozy(self) -> cozy_chess::Move {
        cozy_chess::Move {
            from: self.from(),
            to: self.to(),
            promotion: self.promotion(),
        }
    }

    /// UCI long algebraic notation (`e2e4`, `e7e8q`, `e1g1`).
    pub fn to_uci(self) -> String {
        self.to_string()
    }

    /// Target square as written in UCI: castling moves land on the c/g file.
    fn uci_target(self) -> Square {
        let (from, to) = (self.from(), self.to());
        if !self.is_castling() {
            return to;
        }
        let file = if to.file() as u8 > from.file() as u8 {
            File::G
        } else {
            File::C
        };
        Square::new(file, from.rank())
    }
}

fn promotion_char(piece: Piece) -> char {
    match piece {
        Piece::Knight => 'n',
        Piece::Bishop => 'b',
        Piece::Rook => 'r',
        _ => 'q',
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            return write!(f, "0000");
        }
        write!(f, "{}{}", self.from(), self.uci_target())?;
        if let Some(piece) = self.promotion() {
            write!(f, "{}", promotion_char(piece))?;
        }
        Ok(())
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Move({self} {:?}", self.piece())?;
        if let Some(victim) = self.capture() {
            write!(f, " x{victim:?}")?;
        }
        write!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use cozy_chess::{Piece, Square};

    use super::Move;

    #[test]
    fn quiet_move_fields() {
        let mv = Move::quiet(Square::G1, Square::F3, Piece::Knight);
        assert_eq!(mv.from(), Square::G1);
        assert_eq!(mv.to(), Square::F3);
        assert_eq!(mv.piece(), Piece::Knight);
        assert_eq!(mv.capture(), None);
        assert_eq!(mv.promotion(), None);
        assert!(!mv.is_tactical());
        assert!(!mv.is_null());
    }

    #[test]
    fn capture_promotion_fields() {
        let mv = Move::quiet(Square::B7, Square::A8, Piece::Pawn)
            .with_capture(Piece::Rook)
            .with_promotion(Piece::Queen);
        assert_eq!(mv.capture(), Some(Piece::Rook));
        assert_eq!(mv.promotion(), Some(Piece::Queen));
        assert!(mv.is_capture());
        assert!(mv.is_promotion());
        assert_eq!(mv.to_uci(), "b7a8q");
    }

    #[test]
    fn moving_piece_distinguishes_encodings() {
        let knight = Move::quiet(Square::E2, Square::E4, Piece::Knight);
        let pawn = Move::quiet(Square::E2, Square::E4, Piece::Pawn);
        assert_ne!(knight, pawn);
        assert_eq!(knight.to_uci(), pawn.to_uci());
    }

    #[test]
    fn castling_renders_king_destination() {
        let short = Move::quiet(Square::E1, Square::H1, Piece::King).with_castling();
        let long = Move::quiet(Square::E8, Square::A8, Piece::King).with_castling();
        assert_eq!(short.to_uci(), "e1g1");
        assert_eq!(long.to_uci(), "e8c8");
        assert_eq!(short.to_cozy().to, Square::H1);
    }

    #[test]
    fn null_move_sentinel() {
        assert!(Move::NULL.is_null());
        assert_eq!(Move::NULL.to_string(), "0000");
        assert_eq!(Move::default(), Move::NULL);
    }

    #[test]
    fn raw_roundtrip() {
        let mv = Move::quiet(Square::D7, Square::D5, Piece::Pawn);
        assert_eq!(Move::from_raw(mv.raw()), mv);
    }
}
