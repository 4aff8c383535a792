//! Middlegame/endgame score pair used by the evaluation.

use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

use crate::eval::phase::MAX_PHASE;

/// A pair of middlegame and endgame centipawn values.
///
/// Terms are accumulated separately and blended by game phase at the end
/// with [`Score::taper`].
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug, Hash)]
pub struct Score {
    pub mg: i32,
    pub eg: i32,
}

impl Score {
    pub const ZERO: Score = Score { mg: 0, eg: 0 };

    pub const fn new(mg: i32, eg: i32) -> Score {
        Score { mg, eg }
    }

    /// Blend into a single value: `phase == MAX_PHASE` is pure middlegame,
    /// `phase == 0` pure endgame.
    pub fn taper(self, phase: i32) -> i32 {
        let phase = phase.clamp(0, MAX_PHASE);
        (self.mg * phase + self.eg * (MAX_PHASE - phase)) / MAX_PHASE
    }
}

/// Shorthand constructor, `S(mg, eg)`.
#[allow(non_snake_case)]
pub const fn S(mg: i32, eg: i32) -> Score {
    Score::new(mg, eg)
}

impl Add for Score {
    type Output = Score;

    fn add(self, rhs: Score) -> Score {
        Score::new(self.mg + rhs.mg, self.eg + rhs.eg)
    }
}

impl AddAssign for Score {
    fn add_assign(&mut self, rhs: Score) {
        *self = *self + rhs;
    }
}

impl Sub for Score {
    type Output = Score;

    fn sub(self, rhs: Score) -> Score {
        Score::new(self.mg - rhs.mg, self.eg - rhs.eg)
    }
}

impl SubAssign for Score {
    fn sub_assign(&mut self, rhs: Score) {
        *self = *self - rhs;
    }
}

impl Neg for Score {
    type Output = Score;

    fn neg(self) -> Score {
        Score::new(-self.mg, -self.eg)
    }
}

impl Mul<i32> for Score {
    type Output = Score;

    fn mul(self, rhs: i32) -> Score {
        Score::new(self.mg * rhs, self.eg * rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::{S, Score};

    #[test]
    fn arithmetic() {
        assert_eq!(S(10, 20) + S(1, 2), S(11, 22));
        assert_eq!(S(10, 20) - S(1, 2), S(9, 18));
        assert_eq!(-S(10, -20), S(-10, 20));
        assert_eq!(S(3, -4) * -2, S(-6, 8));
    }

    #[test]
    fn taper_endpoints() {
        let s = S(100, 300);
        assert_eq!(s.taper(24), 100);
        assert_eq!(s.taper(0), 300);
        assert_eq!(s.taper(12), 200);
    }

    #[test]
    fn taper_clamps_phase() {
        assert_eq!(S(100, 300).taper(40), 100);
        assert_eq!(Score::ZERO.taper(-3), 0);
    }
}
