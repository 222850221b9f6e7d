//! HardSoftDecimalScore - two-level score with arbitrary-precision levels
//!
//! Levels are `rust_decimal::Decimal`, so converting them to `f64` for
//! probabilistic acceptors loses precision. Ordering and arithmetic never
//! go through that conversion.

use std::fmt;

use num_traits::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};

use super::traits::Score;

/// A hard/soft score whose levels keep their decimal scale.
///
/// ```
/// use searchforge_core::{HardSoftDecimalScore, ParseableScore};
/// use rust_decimal::Decimal;
///
/// let score = HardSoftDecimalScore::parse("-1.5hard/-20.25soft").unwrap();
/// assert_eq!(score.hard(), Decimal::new(-15, 1));
/// assert_eq!(score.to_string(), "-1.5hard/-20.25soft");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HardSoftDecimalScore {
    hard: Decimal,
    soft: Decimal,
}

impl HardSoftDecimalScore {
    pub const ZERO: HardSoftDecimalScore = HardSoftDecimalScore {
        hard: Decimal::ZERO,
        soft: Decimal::ZERO,
    };

    #[inline]
    pub const fn of(hard: Decimal, soft: Decimal) -> Self {
        HardSoftDecimalScore { hard, soft }
    }

    #[inline]
    pub const fn hard(&self) -> Decimal {
        self.hard
    }

    #[inline]
    pub const fn soft(&self) -> Decimal {
        self.soft
    }
}

// Keeps the level's own scale so a ratio-scaled water level stays comparable.
fn scale_level(level: Decimal, multiplicand: f64) -> Decimal {
    let factor = Decimal::from_f64(multiplicand).unwrap_or(Decimal::ZERO);
    (level * factor).round_dp_with_strategy(level.scale(), RoundingStrategy::MidpointAwayFromZero)
}

impl Score for HardSoftDecimalScore {
    #[inline]
    fn is_feasible(&self) -> bool {
        self.hard >= Decimal::ZERO
    }

    #[inline]
    fn zero() -> Self {
        HardSoftDecimalScore::ZERO
    }

    #[inline]
    fn levels_count() -> usize {
        2
    }

    fn to_level_doubles(&self) -> Vec<f64> {
        vec![
            self.hard.to_f64().unwrap_or(f64::NAN),
            self.soft.to_f64().unwrap_or(f64::NAN),
        ]
    }

    fn multiply(&self, multiplicand: f64) -> Self {
        HardSoftDecimalScore::of(
            scale_level(self.hard, multiplicand),
            scale_level(self.soft, multiplicand),
        )
    }

    fn abs(&self) -> Self {
        HardSoftDecimalScore::of(self.hard.abs(), self.soft.abs())
    }
}

impl_score_ops!(HardSoftDecimalScore { hard, soft } => of);

impl fmt::Debug for HardSoftDecimalScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HardSoftDecimalScore({}, {})", self.hard, self.soft)
    }
}

impl fmt::Display for HardSoftDecimalScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}hard/{}soft", self.hard, self.soft)
    }
}

impl_score_parse!(HardSoftDecimalScore { hard => "hard", soft => "soft" } as Decimal => of);
