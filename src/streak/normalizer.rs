use std::collections::BTreeMap;

use crate::types::{DatedOutcome, MatchRecord, Outcome, TeamMeta};

/// One team's accumulated state for a single competition poll.
#[derive(Debug, Clone)]
pub struct TeamForm {
    pub meta: TeamMeta,
    /// Chronologically ascending after `normalize` returns.
    pub outcomes: Vec<DatedOutcome>,
}

impl TeamForm {
    /// Outcome sequence serialized oldest-first, e.g. "WWDLW".
    pub fn form_string(&self) -> String {
        self.outcomes.iter().map(|o| o.outcome.to_string()).collect()
    }
}

/// Turn one poll's raw fixtures into per-team ordered outcome sequences.
/// Unfinished fixtures are discarded silently. Keyed by team id in a BTreeMap
/// so downstream iteration order is deterministic. Sorting is stable, so two
/// matches with equal timestamps keep their input order.
pub fn normalize(matches: &[MatchRecord]) -> BTreeMap<i64, TeamForm> {
    let mut teams: BTreeMap<i64, TeamForm> = BTreeMap::new();

    for m in matches {
        if !m.finished {
            continue;
        }

        let (home_outcome, away_outcome) = if m.home_goals > m.away_goals {
            (Outcome::W, Outcome::L)
        } else if m.home_goals < m.away_goals {
            (Outcome::L, Outcome::W)
        } else {
            (Outcome::D, Outcome::D)
        };

        for (meta, outcome) in [(&m.home, home_outcome), (&m.away, away_outcome)] {
            teams
                .entry(meta.id)
                .or_insert_with(|| TeamForm {
                    meta: meta.clone(),
                    outcomes: Vec::new(),
                })
                .outcomes
                .push(DatedOutcome {
                    date: m.utc_date,
                    outcome,
                });
        }
    }

    for form in teams.values_mut() {
        form.outcomes.sort_by_key(|o| o.date);
    }

    teams
}
