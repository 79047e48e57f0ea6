//! Next-competition selection. Pure: no clock reads, no I/O — the caller
//! supplies the catalog, the last-scan map, the current time, and thresholds.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::catalog;
use crate::config::SchedulerConfig;
use crate::types::{Competition, Tier};

/// Selection mode for a scan request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanMode {
    /// Full tiered ordering: top-tier competitions get the short staleness
    /// leash. The default.
    Priority,
    /// Tier-blind: never-scanned and anti-starvation rules still apply, then
    /// plain oldest-first.
    Auto,
}

impl ScanMode {
    pub fn parse(s: Option<&str>) -> Self {
        match s {
            Some("auto") => ScanMode::Auto,
            _ => ScanMode::Priority,
        }
    }
}

/// Urgency classes, most urgent first. Anti-starvation (`SuperStale`)
/// deliberately outranks tier-based urgency (`PriorityLive`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Urgency {
    NeverScanned,
    SuperStale,
    PriorityLive,
    Fallback,
}

/// Pick the single next competition to poll.
///
/// Strict total order: never-scanned competitions first (catalog order among
/// themselves); then any competition past the super-stale threshold, oldest
/// first; then, in `Priority` mode, top-tier competitions past the live
/// threshold, oldest first; then oldest-scanned-first, catalog order breaking
/// exact timestamp ties.
///
/// An operator override bypasses the ordering entirely; an unknown override
/// code yields a synthetic placeholder so the pipeline still runs.
pub fn select_next(
    catalog: &[Competition],
    last_scans: &HashMap<String, DateTime<Utc>>,
    now: DateTime<Utc>,
    override_code: Option<&str>,
    mode: ScanMode,
    cfg: &SchedulerConfig,
) -> Competition {
    if let Some(code) = override_code {
        return catalog
            .iter()
            .find(|c| c.code == code)
            .cloned()
            .unwrap_or_else(|| catalog::synthetic(code));
    }

    catalog
        .iter()
        .enumerate()
        .min_by_key(|&(idx, comp)| {
            let last = last_scans.get(&comp.code).copied();
            let urgency = classify(comp, last, now, mode, cfg);
            // Oldest-first within a class; never-scanned entries carry no
            // timestamp and fall back to catalog order via idx.
            let age_key = last.map(|t| t.timestamp_millis()).unwrap_or(i64::MIN);
            (urgency, age_key, idx)
        })
        .map(|(_, comp)| comp.clone())
        .expect("catalog is never empty")
}

fn classify(
    comp: &Competition,
    last: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
    mode: ScanMode,
    cfg: &SchedulerConfig,
) -> Urgency {
    let Some(last) = last else {
        return Urgency::NeverScanned;
    };
    let age = now - last;
    if age > cfg.super_stale_after {
        Urgency::SuperStale
    } else if mode == ScanMode::Priority && comp.tier == Tier::Top && age > cfg.live_after {
        Urgency::PriorityLive
    } else {
        Urgency::Fallback
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::default_catalog;
    use chrono::Duration;

    fn now() -> DateTime<Utc> {
        "2025-03-01T12:00:00Z".parse().unwrap()
    }

    /// Every competition scanned `mins` minutes ago, except the listed overrides.
    fn scans_with(mins: i64, overrides: &[(&str, i64)]) -> HashMap<String, DateTime<Utc>> {
        let mut map: HashMap<String, DateTime<Utc>> = default_catalog()
            .iter()
            .map(|c| (c.code.clone(), now() - Duration::minutes(mins)))
            .collect();
        for (code, m) in overrides {
            map.insert(code.to_string(), now() - Duration::minutes(*m));
        }
        map
    }

    fn pick(scans: &HashMap<String, DateTime<Utc>>, mode: ScanMode) -> Competition {
        select_next(
            &default_catalog(),
            scans,
            now(),
            None,
            mode,
            &SchedulerConfig::default(),
        )
    }

    #[test]
    fn never_scanned_precedes_any_scanned() {
        let mut scans = scans_with(10_000, &[]);
        scans.remove("WC"); // lowest-tier, last in catalog — still wins
        assert_eq!(pick(&scans, ScanMode::Priority).code, "WC");
    }

    #[test]
    fn all_fresh_falls_back_to_oldest_first() {
        let scans = scans_with(5, &[("PPL", 20)]);
        assert_eq!(pick(&scans, ScanMode::Priority).code, "PPL");
    }

    #[test]
    fn top_tier_past_live_threshold_outranks_fresh_competitions() {
        // PD is 45 min stale (past the 30 min live leash); ELC is older but
        // neither top-tier nor super-stale.
        let scans = scans_with(5, &[("PD", 45), ("ELC", 120)]);
        assert_eq!(pick(&scans, ScanMode::Priority).code, "PD");
    }

    #[test]
    fn auto_mode_is_tier_blind() {
        // Same staleness picture as above: auto mode ignores the live leash
        // and goes straight to oldest-first.
        let scans = scans_with(5, &[("PD", 45), ("ELC", 120)]);
        assert_eq!(pick(&scans, ScanMode::Auto).code, "ELC");
    }

    #[test]
    fn auto_mode_keeps_anti_starvation_and_never_scanned() {
        let mut scans = scans_with(5, &[("WC", 7 * 60)]);
        assert_eq!(pick(&scans, ScanMode::Auto).code, "WC");

        scans.remove("EC");
        assert_eq!(pick(&scans, ScanMode::Auto).code, "EC");
    }

    #[test]
    fn anti_starvation_dominates_tier_urgency() {
        // WC (Other tier) past the 6h super-stale threshold beats a top-tier
        // league merely past the live threshold.
        let scans = scans_with(5, &[("PL", 45), ("WC", 7 * 60)]);
        assert_eq!(pick(&scans, ScanMode::Priority).code, "WC");
    }

    #[test]
    fn oldest_wins_within_a_class() {
        let scans = scans_with(5, &[("SA", 50), ("PL", 90)]);
        assert_eq!(pick(&scans, ScanMode::Priority).code, "PL");
    }

    #[test]
    fn override_bypasses_ordering() {
        let catalog = default_catalog();
        let mut scans = scans_with(5, &[]);
        scans.remove("PL"); // never-scanned, would otherwise win
        let picked = select_next(
            &catalog,
            &scans,
            now(),
            Some("BSA"),
            ScanMode::Priority,
            &SchedulerConfig::default(),
        );
        assert_eq!(picked.code, "BSA");
    }

    #[test]
    fn unknown_override_builds_a_synthetic_entry() {
        let catalog = default_catalog();
        let picked = select_next(
            &catalog,
            &HashMap::new(),
            now(),
            Some("XYZ"),
            ScanMode::Priority,
            &SchedulerConfig::default(),
        );
        assert_eq!(picked.code, "XYZ");
        assert_eq!(picked.name, "Custom");
        assert_eq!(picked.tier, Tier::Other);
    }

    #[test]
    fn mode_parsing_defaults_to_priority() {
        assert_eq!(ScanMode::parse(None), ScanMode::Priority);
        assert_eq!(ScanMode::parse(Some("priority")), ScanMode::Priority);
        assert_eq!(ScanMode::parse(Some("auto")), ScanMode::Auto);
        assert_eq!(ScanMode::parse(Some("nonsense")), ScanMode::Priority);
    }

    #[test]
    fn selection_is_deterministic() {
        let scans = scans_with(5, &[("DED", 5)]);
        let a = pick(&scans, ScanMode::Priority);
        let b = pick(&scans, ScanMode::Priority);
        assert_eq!(a.code, b.code);
    }
}
