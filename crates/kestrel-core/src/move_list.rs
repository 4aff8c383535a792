//! Fixed-capacity move list filled by the generator.

use std::ops::{Index, IndexMut};

use crate::chess_move::Move;

/// Upper bound on the number of moves in any legal chess position (218).
pub const MAX_MOVES: usize = 256;

/// Stack-allocated list of moves.
///
/// Filled by [`Position::generate_moves`](crate::Position::generate_moves);
/// afterwards only the move sorter permutes it.
#[derive(Clone)]
pub struct MoveList {
    moves: [Move; MAX_MOVES],
    len: usize,
}

impl MoveList {
    /// Create an empty list.
    pub const fn new() -> Self {
        Self {
            moves: [Move::NULL; MAX_MOVES],
            len: 0,
        }
    }

    /// Append a move. Moves past the capacity are dropped.
    #[inline]
    pub fn push(&mut self, mv: Move) {
        debug_assert!(self.len < MAX_MOVES, "move list overflow");
        if self.len < MAX_MOVES {
            self.moves[self.len] = mv;
            self.len += 1;
        }
    }

    pub fn clear(&mut self) {
        self.len = 0;
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn as_slice(&self) -> &[Move] {
        &self.moves[..self.len]
    }

    pub fn as_mut_slice(&mut self) -> &mut [Move] {
        &mut self.moves[..self.len]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Move> {
        self.as_slice().iter()
    }

    pub fn contains(&self, mv: Move) -> bool {
        self.as_slice().contains(&mv)
    }
}

impl Default for MoveList {
    fn default() -> Self {
        Self::new()
    }
}

impl Index<usize> for MoveList {
    type Output = Move;

    fn index(&self, index: usize) -> &Move {
        &self.as_slice()[index]
    }
}

impl IndexMut<usize> for MoveList {
    fn index_mut(&mut self, index: usize) -> &mut Move {
        &mut self.as_mut_slice()[index]
    }
}

impl<'a> IntoIterator for &'a MoveList {
    type Item = &'a Move;
    type IntoIter = std::slice::Iter<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl std::fmt::Debug for MoveList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

#[cfg(test)]
mod tests {
    use cozy_chess::{Piece, Square};

    use super::*;

    #[test]
    fn push_and_index() {
        let mut list = MoveList::new();
        assert!(list.is_empty());
        let mv = Move::quiet(Square::E2, Square::E4, Piece::Pawn);
        list.push(mv);
        assert_eq!(list.len(), 1);
        assert_eq!(list[0], mv);
        assert!(list.contains(mv));
    }

    #[test]
    fn clear_resets_length() {
        let mut list = MoveList::new();
        list.push(Move::quiet(Square::A2, Square::A3, Piece::Pawn));
        list.clear();
        assert_eq!(list.len(), 0);
        assert!(list.as_slice().is_empty());
    }
}
