use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

/// Durable per-team streak record. Identity key is
/// (team_id, competition_id, sport) — repeated upserts overwrite in place.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct TeamStreakRecord {
    pub team_id: i64,
    pub sport: String,
    pub competition_id: String,
    pub name: String,
    pub crest: Option<String>,
    pub country_name: Option<String>,
    pub country_flag: Option<String>,
    pub competition_name: String,
    /// Outcome sequence in chronological order, e.g. "WWDLWWWWW".
    pub form: String,
    pub has_streak: bool,
    pub max_streak: i64,
    /// Date of the fifth win of the first qualifying run.
    pub streak_achieved_date: Option<NaiveDate>,
    pub last_checked: DateTime<Utc>,
}

/// Scan-log row as read back from storage.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ScanLogRow {
    pub id: i64,
    pub sport: String,
    pub competition_id: String,
    pub competition_name: String,
    pub teams_scanned: i64,
    pub teams_qualified: i64,
    pub created_at: DateTime<Utc>,
}

/// Scan-log entry to append; `created_at` defaults to insertion time.
#[derive(Debug, Clone)]
pub struct NewScanLog {
    pub sport: String,
    pub competition_id: String,
    pub competition_name: String,
    pub teams_scanned: i64,
    pub teams_qualified: i64,
}
