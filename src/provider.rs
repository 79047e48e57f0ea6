use std::time::Duration;

use chrono::{DateTime, NaiveDate, Utc};
use tracing::debug;

use crate::config::{Config, PROVIDER_TIMEOUT_SECS};
use crate::error::{AppError, Result};
use crate::types::{MatchRecord, TeamMeta};

/// One competition's worth of fixtures plus the competition header the
/// provider attaches to the payload (name, country, flag).
#[derive(Debug, Default)]
pub struct FetchedMatches {
    pub matches: Vec<MatchRecord>,
    pub competition_name: Option<String>,
    pub country_name: Option<String>,
    pub country_flag: Option<String>,
}

pub struct ProviderClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl ProviderClient {
    pub fn new(cfg: &Config) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(PROVIDER_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            client,
            base_url: cfg.provider_url.clone(),
            api_key: cfg.api_key.clone(),
        })
    }

    /// Fetch finished matches for one competition over `[from, to]`.
    /// Non-success responses become a structured provider error — the caller
    /// decides whether that aborts (single mode) or is recorded and skipped
    /// (batch mode).
    pub async fn finished_matches(
        &self,
        code: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<FetchedMatches> {
        let url = format!(
            "{}/v4/competitions/{}/matches?dateFrom={}&dateTo={}&status=FINISHED",
            self.base_url, code, from, to
        );

        let resp = self
            .client
            .get(&url)
            .header("X-Auth-Token", &self.api_key)
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(AppError::Provider {
                competition: code.to_string(),
                message: format!("HTTP {}", resp.status().as_u16()),
            });
        }

        let body: serde_json::Value = resp.json().await?;
        Ok(parse_matches_payload(code, &body))
    }
}

/// Parse a /v4/competitions/{code}/matches payload. Structurally unusable
/// fixtures are dropped; a missing `matches` array yields an empty result.
pub fn parse_matches_payload(code: &str, body: &serde_json::Value) -> FetchedMatches {
    let items = body.get("matches").and_then(|m| m.as_array());

    let mut fetched = FetchedMatches::default();
    if let Some(comp) = body.get("competition") {
        fetched.competition_name = comp
            .get("name")
            .and_then(|n| n.as_str())
            .map(|s| s.to_string());
        fetched.country_name = comp
            .get("area")
            .and_then(|a| a.get("name"))
            .and_then(|n| n.as_str())
            .map(|s| s.to_string());
        fetched.country_flag = comp
            .get("area")
            .and_then(|a| a.get("flag"))
            .and_then(|f| f.as_str())
            .map(|s| s.to_string());
    }

    let Some(items) = items else {
        debug!(competition = code, "payload had no matches array");
        return fetched;
    };

    for item in items {
        if let Some(m) = parse_match(item) {
            fetched.matches.push(m);
        }
    }
    fetched
}

/// Parse a single fixture object. Returns None only when team identity or the
/// match date is missing; absent goals default to 0.
pub fn parse_match(v: &serde_json::Value) -> Option<MatchRecord> {
    let home = parse_team(v.get("homeTeam")?)?;
    let away = parse_team(v.get("awayTeam")?)?;

    let utc_date = v
        .get("utcDate")
        .and_then(|d| d.as_str())
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|d| d.with_timezone(&Utc))?;

    let full_time = v.get("score").and_then(|s| s.get("fullTime"));
    let home_goals = full_time
        .and_then(|ft| ft.get("home"))
        .and_then(|g| g.as_u64())
        .unwrap_or(0) as u32;
    let away_goals = full_time
        .and_then(|ft| ft.get("away"))
        .and_then(|g| g.as_u64())
        .unwrap_or(0) as u32;

    let finished = v
        .get("status")
        .and_then(|s| s.as_str())
        .map(|s| s == "FINISHED")
        .unwrap_or(false);

    Some(MatchRecord {
        home,
        away,
        home_goals,
        away_goals,
        utc_date,
        finished,
    })
}

fn parse_team(v: &serde_json::Value) -> Option<TeamMeta> {
    Some(TeamMeta {
        id: v.get("id")?.as_i64()?,
        name: v
            .get("name")
            .and_then(|n| n.as_str())
            .unwrap_or("")
            .to_string(),
        crest: v
            .get("crest")
            .and_then(|c| c.as_str())
            .map(|s| s.to_string()),
    })
}
