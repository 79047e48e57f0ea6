use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Competition
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Competition {
    /// Provider code, e.g. "PL" for the Premier League.
    pub code: String,
    pub name: String,
    pub country: String,
    pub tier: Tier,
}

/// Priority tier used to bias scheduling toward higher-value competitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    /// The handful of big-five leagues — scanned on a short staleness leash.
    Top,
    Secondary,
    Other,
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Tier::Top => "top",
            Tier::Secondary => "secondary",
            Tier::Other => "other",
        };
        write!(f, "{s}")
    }
}

// ---------------------------------------------------------------------------
// Provider match data
// ---------------------------------------------------------------------------

/// One raw fixture from the provider. Ephemeral — never persisted as-is.
#[derive(Debug, Clone)]
pub struct MatchRecord {
    pub home: TeamMeta,
    pub away: TeamMeta,
    pub home_goals: u32,
    pub away_goals: u32,
    pub utc_date: DateTime<Utc>,
    pub finished: bool,
}

/// Team display metadata captured at first sighting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamMeta {
    pub id: i64,
    pub name: String,
    pub crest: Option<String>,
}

// ---------------------------------------------------------------------------
// Outcomes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    W,
    D,
    L,
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Outcome::W => "W",
            Outcome::D => "D",
            Outcome::L => "L",
        };
        write!(f, "{s}")
    }
}

/// An outcome pinned to the match it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DatedOutcome {
    pub date: DateTime<Utc>,
    pub outcome: Outcome,
}
