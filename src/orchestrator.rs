use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::SqlitePool;
use tokio::time::interval;
use tracing::{info, warn};

use crate::catalog::default_catalog;
use crate::config::{Config, SPORT};
use crate::db::models::{NewScanLog, TeamStreakRecord};
use crate::db::store;
use crate::error::Result;
use crate::provider::{FetchedMatches, ProviderClient};
use crate::scheduler::{self, ScanMode};
use crate::streak::{analyze, normalize};
use crate::types::{Competition, Tier};

// ---------------------------------------------------------------------------
// Outcome shapes
// ---------------------------------------------------------------------------

/// Per-competition result within one batch. Skipped entries are explicit so
/// callers can tell "not yet attempted" from "attempted and failed".
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CompetitionOutcome {
    Scanned {
        competition_id: String,
        competition_name: String,
        fixtures_analyzed: usize,
        teams_scanned: usize,
        teams_qualified: usize,
    },
    Error {
        competition_id: String,
        category: String,
        message: String,
    },
    Skipped {
        competition_id: String,
        reason: String,
    },
}

#[derive(Debug, Serialize)]
pub struct BatchSummary {
    pub success: bool,
    pub message: String,
    pub elapsed_ms: u64,
    pub competitions_scanned: usize,
    pub competitions_total: usize,
    pub total_teams_qualified: usize,
    pub results: Vec<CompetitionOutcome>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CompetitionSummary {
    pub id: String,
    pub name: String,
    pub country: String,
}

/// Single-competition scan response.
#[derive(Debug, Serialize)]
pub struct ScanReport {
    pub success: bool,
    pub competition: CompetitionSummary,
    pub fixtures_analyzed: usize,
    pub teams_scanned: usize,
    pub teams_qualified: usize,
    /// Top-tier competitions still never scanned (excluding this target).
    pub priority_remaining: usize,
    pub next_priority: Option<CompetitionSummary>,
    /// Teams with a qualifying streak from this scan.
    pub teams: Vec<TeamStreakRecord>,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ScanStats {
    pub fixtures_analyzed: usize,
    pub teams_scanned: usize,
    pub teams_qualified: usize,
}

// ---------------------------------------------------------------------------
// Scanner
// ---------------------------------------------------------------------------

pub struct Scanner {
    cfg: Config,
    catalog: Vec<Competition>,
    provider: ProviderClient,
    pool: SqlitePool,
}

impl Scanner {
    pub fn new(cfg: Config, provider: ProviderClient, pool: SqlitePool) -> Self {
        Self {
            cfg,
            catalog: default_catalog(),
            provider,
            pool,
        }
    }

    /// Background loop: one batch scan per interval. Manual triggers arrive
    /// over HTTP and run the same code path.
    pub async fn run_periodic(&self) {
        if self.cfg.scan_interval_secs == 0 {
            info!("SCAN_INTERVAL_SECS=0 — background scanning disabled");
            return;
        }

        let mut ticker = interval(Duration::from_secs(self.cfg.scan_interval_secs));
        ticker.tick().await; // consume immediate first tick

        loop {
            ticker.tick().await;
            let summary = self.scan_all().await;
            info!(
                scanned = summary.competitions_scanned,
                total = summary.competitions_total,
                qualified = summary.total_teams_qualified,
                elapsed_ms = summary.elapsed_ms,
                "{}",
                summary.message,
            );
        }
    }

    /// Scan as many competitions as the wall-clock budget allows, in fixed
    /// catalog order. One competition's failure never aborts the batch.
    pub async fn scan_all(&self) -> BatchSummary {
        let started = Instant::now();
        let budget = Duration::from_millis(self.cfg.scan_budget_ms);
        let mut results = Vec::with_capacity(self.catalog.len());

        for comp in &self.catalog {
            // Budget is only checked between competitions; a slow provider
            // call may overshoot by its own duration.
            if started.elapsed() >= budget {
                results.push(CompetitionOutcome::Skipped {
                    competition_id: comp.code.clone(),
                    reason: "timeout".to_string(),
                });
                continue;
            }

            match self.scan_competition(comp).await {
                Ok((stats, _records)) => results.push(CompetitionOutcome::Scanned {
                    competition_id: comp.code.clone(),
                    competition_name: comp.name.clone(),
                    fixtures_analyzed: stats.fixtures_analyzed,
                    teams_scanned: stats.teams_scanned,
                    teams_qualified: stats.teams_qualified,
                }),
                Err(e) => {
                    warn!(competition = %comp.code, "scan failed: {e}");
                    results.push(CompetitionOutcome::Error {
                        competition_id: comp.code.clone(),
                        category: e.category().to_string(),
                        message: e.to_string(),
                    });
                }
            }
        }

        let elapsed_ms = started.elapsed().as_millis() as u64;
        let scanned = results
            .iter()
            .filter(|r| matches!(r, CompetitionOutcome::Scanned { .. }))
            .count();
        let total_qualified = results
            .iter()
            .map(|r| match r {
                CompetitionOutcome::Scanned { teams_qualified, .. } => *teams_qualified,
                _ => 0,
            })
            .sum();

        BatchSummary {
            success: true,
            message: format!(
                "Scanned {scanned}/{} competitions in {elapsed_ms}ms",
                self.catalog.len()
            ),
            elapsed_ms,
            competitions_scanned: scanned,
            competitions_total: self.catalog.len(),
            total_teams_qualified: total_qualified,
            results,
        }
    }

    /// Scan a single competition, picked by the scheduler unless an operator
    /// override names one. A provider error here is the sole failure and
    /// propagates to the caller.
    pub async fn scan_one(
        &self,
        override_code: Option<&str>,
        mode: ScanMode,
    ) -> Result<ScanReport> {
        let last_scans = store::last_scan_map(&self.pool).await?;
        let target = scheduler::select_next(
            &self.catalog,
            &last_scans,
            Utc::now(),
            override_code,
            mode,
            &self.cfg.scheduler,
        );

        let (stats, records) = self.scan_competition(&target).await?;

        let remaining: Vec<&Competition> = self
            .catalog
            .iter()
            .filter(|c| {
                c.tier == Tier::Top && !last_scans.contains_key(&c.code) && c.code != target.code
            })
            .collect();

        Ok(ScanReport {
            success: true,
            competition: CompetitionSummary {
                id: target.code.clone(),
                name: target.name.clone(),
                country: target.country.clone(),
            },
            fixtures_analyzed: stats.fixtures_analyzed,
            teams_scanned: stats.teams_scanned,
            teams_qualified: stats.teams_qualified,
            priority_remaining: remaining.len(),
            next_priority: remaining.first().map(|c| CompetitionSummary {
                id: c.code.clone(),
                name: c.name.clone(),
                country: c.country.clone(),
            }),
            teams: records.into_iter().filter(|r| r.has_streak).collect(),
        })
    }

    /// fetch → normalize → analyze → upsert → log, fully sequential. The
    /// scan-log append follows the upserts and happens even for an empty
    /// match list, so the competition counts as visited now.
    async fn scan_competition(
        &self,
        comp: &Competition,
    ) -> Result<(ScanStats, Vec<TeamStreakRecord>)> {
        let today = Utc::now().date_naive();
        let fetched = self
            .provider
            .finished_matches(&comp.code, self.cfg.start_date, today)
            .await?;

        let (records, stats) = build_records(comp, &fetched, Utc::now());

        if !records.is_empty() {
            // Persistence failure is logged, not fatal: the scan-log append
            // below still runs and earlier writes stay in place.
            if let Err(e) = store::upsert_teams(&self.pool, &records).await {
                warn!(competition = %comp.code, "team upsert failed: {e}");
            }
        }

        let log = NewScanLog {
            sport: SPORT.to_string(),
            competition_id: comp.code.clone(),
            competition_name: fetched
                .competition_name
                .clone()
                .unwrap_or_else(|| comp.name.clone()),
            teams_scanned: stats.teams_scanned as i64,
            teams_qualified: stats.teams_qualified as i64,
        };
        if let Err(e) = store::insert_scan_log(&self.pool, &log).await {
            warn!(competition = %comp.code, "scan log insert failed: {e}");
        }

        info!(
            competition = %comp.code,
            fixtures = stats.fixtures_analyzed,
            teams = stats.teams_scanned,
            qualified = stats.teams_qualified,
            "scan complete",
        );

        Ok((stats, records))
    }
}

/// Turn one fetched payload into upsertable team records. Pure except for the
/// supplied `now`. Every scanned team is included, qualifying or not, so
/// non-qualifying form strings stay current in storage.
pub fn build_records(
    comp: &Competition,
    fetched: &FetchedMatches,
    now: DateTime<Utc>,
) -> (Vec<TeamStreakRecord>, ScanStats) {
    let teams = normalize(&fetched.matches);

    let competition_name = fetched
        .competition_name
        .clone()
        .unwrap_or_else(|| comp.name.clone());
    let country_name = fetched
        .country_name
        .clone()
        .unwrap_or_else(|| comp.country.clone());

    let mut records = Vec::with_capacity(teams.len());
    let mut qualified = 0usize;

    for (team_id, form) in &teams {
        let verdict = analyze(&form.outcomes);
        if verdict.has_streak {
            qualified += 1;
        }
        records.push(TeamStreakRecord {
            team_id: *team_id,
            sport: SPORT.to_string(),
            competition_id: comp.code.clone(),
            name: form.meta.name.clone(),
            crest: form.meta.crest.clone(),
            country_name: Some(country_name.clone()),
            country_flag: fetched.country_flag.clone(),
            competition_name: competition_name.clone(),
            form: form.form_string(),
            has_streak: verdict.has_streak,
            max_streak: verdict.max_streak as i64,
            streak_achieved_date: verdict.achieved_date,
            last_checked: now,
        });
    }

    let stats = ScanStats {
        fixtures_analyzed: fetched.matches.iter().filter(|m| m.finished).count(),
        teams_scanned: records.len(),
        teams_qualified: qualified,
    };
    (records, stats)
}
