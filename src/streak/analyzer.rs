use chrono::NaiveDate;

use crate::types::{DatedOutcome, Outcome};

/// Qualifying run length.
pub const STREAK_TARGET: u32 = 5;

/// Verdict for one team's ordered outcome sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreakVerdict {
    pub has_streak: bool,
    /// Longest run of consecutive wins anywhere in the sequence, whether or
    /// not it reached the qualifying length.
    pub max_streak: u32,
    /// Date of the fifth win of the FIRST qualifying run. Absent unless
    /// `has_streak`.
    pub achieved_date: Option<NaiveDate>,
}

/// Scan a chronologically ordered outcome sequence for a qualifying win
/// streak. Pure — same input always yields the same verdict.
pub fn analyze(outcomes: &[DatedOutcome]) -> StreakVerdict {
    let mut consecutive = 0u32;
    let mut max_streak = 0u32;
    let mut achieved_date: Option<NaiveDate> = None;

    for o in outcomes {
        match o.outcome {
            Outcome::W => {
                consecutive += 1;
                if consecutive >= STREAK_TARGET && achieved_date.is_none() {
                    achieved_date = Some(o.date.date_naive());
                }
            }
            Outcome::D | Outcome::L => {
                max_streak = max_streak.max(consecutive);
                consecutive = 0;
            }
        }
    }
    // A run still open at sequence end must not be lost.
    max_streak = max_streak.max(consecutive);

    StreakVerdict {
        has_streak: achieved_date.is_some(),
        max_streak,
        achieved_date,
    }
}
