//! Letter grades and the fixed thresholds that produce them.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::normalize::TrimLevel;

/// Ordered letter grade. `A` is best; the derived `Ord` sorts best first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Grade {
    A,
    B,
    C,
    D,
    F,
}

impl Grade {
    /// All grades, best first.
    pub const ALL: [Grade; 5] = [Grade::A, Grade::B, Grade::C, Grade::D, Grade::F];

    /// Neutral grade used when a dimension has no usable data.
    pub const NEUTRAL: Grade = Grade::C;

    #[must_use]
    pub fn is_better_than(self, other: Grade) -> bool {
        self < other
    }

    /// One step towards `A`, saturating at `A`.
    #[must_use]
    pub fn promote(self) -> Grade {
        match self {
            Grade::A | Grade::B => Grade::A,
            Grade::C => Grade::B,
            Grade::D => Grade::C,
            Grade::F => Grade::D,
        }
    }

    /// One step towards `F`, saturating at `F`.
    #[must_use]
    pub fn demote(self) -> Grade {
        match self {
            Grade::A => Grade::B,
            Grade::B => Grade::C,
            Grade::C => Grade::D,
            Grade::D | Grade::F => Grade::F,
        }
    }

    /// Grades kilometres driven per year.
    ///
    /// `< 12 000` → A, `[12 000, 18 000)` → B, `[18 000, 22 000)` → C,
    /// `[22 000, 28 000)` → D, `≥ 28 000` → F.
    #[must_use]
    pub fn for_mileage_per_year(km_per_year: Decimal) -> Grade {
        if km_per_year < dec!(12000) {
            Grade::A
        } else if km_per_year < dec!(18000) {
            Grade::B
        } else if km_per_year < dec!(22000) {
            Grade::C
        } else if km_per_year < dec!(28000) {
            Grade::D
        } else {
            Grade::F
        }
    }

    /// Grades the signed deviation of the asking price from the expected
    /// value. Negative means the car is priced below the curve.
    ///
    /// `≤ −10%` → A, `(−10%, −5%]` → B, `(−5%, 5%)` → C, `[5%, 10%)` → D,
    /// `≥ 10%` → F.
    #[must_use]
    pub fn for_price_deviation(deviation: Decimal) -> Grade {
        if deviation <= dec!(-0.10) {
            Grade::A
        } else if deviation <= dec!(-0.05) {
            Grade::B
        } else if deviation < dec!(0.05) {
            Grade::C
        } else if deviation < dec!(0.10) {
            Grade::D
        } else {
            Grade::F
        }
    }

    #[must_use]
    pub fn for_trim(trim: TrimLevel) -> Grade {
        match trim {
            TrimLevel::Executive => Grade::A,
            TrimLevel::Style => Grade::B,
            TrimLevel::Active | TrimLevel::Unknown => Grade::C,
            TrimLevel::Life => Grade::D,
        }
    }

    #[must_use]
    pub fn letter(self) -> char {
        match self {
            Grade::A => 'A',
            Grade::B => 'B',
            Grade::C => 'C',
            Grade::D => 'D',
            Grade::F => 'F',
        }
    }
}

impl std::fmt::Display for Grade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// Combines the three dimension grades into the overall grade.
///
/// Precedence is mileage, then price, then trim:
/// 1. The mileage grade is the baseline.
/// 2. A price grade better than `C` lifts the baseline one step, worse than
///    `C` lowers it one step; `C` leaves it unchanged.
/// 3. A trim grade better than `C` that is also strictly better than the
///    grade so far promotes one more step. Trims at or below `C` never move
///    the grade.
///
/// Every step saturates at `A` and `F`.
#[must_use]
pub fn combine_grades(mileage: Grade, price: Grade, trim: Grade) -> Grade {
    let mut grade = mileage;

    if price.is_better_than(Grade::NEUTRAL) {
        grade = grade.promote();
    } else if Grade::NEUTRAL.is_better_than(price) {
        grade = grade.demote();
    }

    if trim.is_better_than(Grade::NEUTRAL) && trim.is_better_than(grade) {
        grade = grade.promote();
    }

    grade
}

/// Buy/skip verdict keyed off the overall grade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    Recommended,
    Consider,
    Avoid,
}

impl Recommendation {
    #[must_use]
    pub fn for_grade(grade: Grade) -> Recommendation {
        match grade {
            Grade::A | Grade::B => Recommendation::Recommended,
            Grade::C => Recommendation::Consider,
            Grade::D | Grade::F => Recommendation::Avoid,
        }
    }

    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            Recommendation::Recommended => "recommended: good value for the mileage and price",
            Recommendation::Consider => "consider: an average car at an expected price",
            Recommendation::Avoid => "avoid: mileage or price is worse than the market",
        }
    }
}

impl std::fmt::Display for Recommendation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mileage_boundaries_are_lower_inclusive() {
        assert_eq!(Grade::for_mileage_per_year(dec!(11999.99)), Grade::A);
        assert_eq!(Grade::for_mileage_per_year(dec!(12000)), Grade::B);
        assert_eq!(Grade::for_mileage_per_year(dec!(17999)), Grade::B);
        assert_eq!(Grade::for_mileage_per_year(dec!(18000)), Grade::C);
        assert_eq!(Grade::for_mileage_per_year(dec!(22000)), Grade::D);
        assert_eq!(Grade::for_mileage_per_year(dec!(27999)), Grade::D);
        assert_eq!(Grade::for_mileage_per_year(dec!(28000)), Grade::F);
        assert_eq!(Grade::for_mileage_per_year(Decimal::ZERO), Grade::A);
    }

    #[test]
    fn price_boundaries_follow_documented_ranges() {
        assert_eq!(Grade::for_price_deviation(dec!(-0.25)), Grade::A);
        assert_eq!(Grade::for_price_deviation(dec!(-0.10)), Grade::A);
        assert_eq!(Grade::for_price_deviation(dec!(-0.0999)), Grade::B);
        assert_eq!(Grade::for_price_deviation(dec!(-0.05)), Grade::B);
        assert_eq!(Grade::for_price_deviation(dec!(-0.0499)), Grade::C);
        assert_eq!(Grade::for_price_deviation(Decimal::ZERO), Grade::C);
        assert_eq!(Grade::for_price_deviation(dec!(0.0499)), Grade::C);
        assert_eq!(Grade::for_price_deviation(dec!(0.05)), Grade::D);
        assert_eq!(Grade::for_price_deviation(dec!(0.0999)), Grade::D);
        assert_eq!(Grade::for_price_deviation(dec!(0.10)), Grade::F);
    }

    #[test]
    fn price_grade_never_improves_as_deviation_grows() {
        let mut previous = Grade::A;
        let mut deviation = dec!(-0.30);
        while deviation <= dec!(0.30) {
            let grade = Grade::for_price_deviation(deviation);
            assert!(
                !grade.is_better_than(previous),
                "grade improved from {previous} to {grade} at {deviation}"
            );
            previous = grade;
            deviation += dec!(0.005);
        }
    }

    #[test]
    fn trim_grades_follow_fixed_lookup() {
        assert_eq!(Grade::for_trim(TrimLevel::Executive), Grade::A);
        assert_eq!(Grade::for_trim(TrimLevel::Style), Grade::B);
        assert_eq!(Grade::for_trim(TrimLevel::Active), Grade::C);
        assert_eq!(Grade::for_trim(TrimLevel::Life), Grade::D);
        assert_eq!(Grade::for_trim(TrimLevel::Unknown), Grade::C);
    }

    #[test]
    fn promote_and_demote_saturate() {
        assert_eq!(Grade::A.promote(), Grade::A);
        assert_eq!(Grade::F.demote(), Grade::F);
        assert_eq!(Grade::C.promote(), Grade::B);
        assert_eq!(Grade::D.demote(), Grade::F);
    }

    #[test]
    fn neutral_price_and_trim_keep_mileage_grade() {
        for mileage in Grade::ALL {
            assert_eq!(combine_grades(mileage, Grade::C, Grade::C), mileage);
        }
    }

    #[test]
    fn price_moves_grade_at_most_one_step() {
        assert_eq!(combine_grades(Grade::C, Grade::A, Grade::C), Grade::B);
        assert_eq!(combine_grades(Grade::C, Grade::B, Grade::C), Grade::B);
        assert_eq!(combine_grades(Grade::C, Grade::D, Grade::C), Grade::D);
        assert_eq!(combine_grades(Grade::C, Grade::F, Grade::C), Grade::D);
    }

    #[test]
    fn top_grades_do_not_overflow() {
        assert_eq!(combine_grades(Grade::A, Grade::A, Grade::A), Grade::A);
        assert_eq!(combine_grades(Grade::F, Grade::F, Grade::D), Grade::F);
    }

    #[test]
    fn trim_only_promotes_when_strictly_better() {
        // Executive lifts a B to A.
        assert_eq!(combine_grades(Grade::B, Grade::C, Grade::A), Grade::A);
        // Style does not lift a B: not strictly better.
        assert_eq!(combine_grades(Grade::B, Grade::C, Grade::B), Grade::B);
        // Style lifts a D to C.
        assert_eq!(combine_grades(Grade::D, Grade::C, Grade::B), Grade::C);
    }

    #[test]
    fn weak_trims_never_move_the_grade() {
        // Life (D) and Active (C) neither demote an A nor promote an F.
        assert_eq!(combine_grades(Grade::A, Grade::C, Grade::D), Grade::A);
        assert_eq!(combine_grades(Grade::F, Grade::C, Grade::C), Grade::F);
        assert_eq!(combine_grades(Grade::F, Grade::C, Grade::D), Grade::F);
    }

    #[test]
    fn price_is_applied_before_trim() {
        // Mileage B, overpriced (F) drops to C; Style (B) is strictly better
        // than C and lifts it back to B.
        assert_eq!(combine_grades(Grade::B, Grade::F, Grade::B), Grade::B);
        // Mileage B, underpriced lifts to A; Executive cannot lift further.
        assert_eq!(combine_grades(Grade::B, Grade::A, Grade::A), Grade::A);
    }

    #[test]
    fn recommendation_tracks_overall_grade() {
        assert_eq!(Recommendation::for_grade(Grade::A), Recommendation::Recommended);
        assert_eq!(Recommendation::for_grade(Grade::B), Recommendation::Recommended);
        assert_eq!(Recommendation::for_grade(Grade::C), Recommendation::Consider);
        assert_eq!(Recommendation::for_grade(Grade::D), Recommendation::Avoid);
        assert_eq!(Recommendation::for_grade(Grade::F), Recommendation::Avoid);
    }
}
