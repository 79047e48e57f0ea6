//! Fixed competition catalog — football-data.org v4 codes. Reference data
//! defined at process start, never mutated.

use crate::types::{Competition, Tier};

pub fn default_catalog() -> Vec<Competition> {
    fn comp(code: &str, name: &str, country: &str, tier: Tier) -> Competition {
        Competition {
            code: code.to_string(),
            name: name.to_string(),
            country: country.to_string(),
            tier,
        }
    }

    vec![
        comp("PL", "Premier League", "England", Tier::Top),
        comp("PD", "La Liga", "Spain", Tier::Top),
        comp("BL1", "Bundesliga", "Germany", Tier::Top),
        comp("SA", "Serie A", "Italy", Tier::Top),
        comp("FL1", "Ligue 1", "France", Tier::Top),
        comp("DED", "Eredivisie", "Netherlands", Tier::Secondary),
        comp("PPL", "Primeira Liga", "Portugal", Tier::Secondary),
        comp("ELC", "Championship", "England", Tier::Secondary),
        comp("BSA", "Brasileirão", "Brazil", Tier::Secondary),
        comp("CL", "Champions League", "Europe", Tier::Other),
        comp("EC", "Euro Championship", "Europe", Tier::Other),
        comp("WC", "World Cup", "World", Tier::Other),
    ]
}

/// Placeholder entry for an operator override that names an unknown code.
/// Keeps the pipeline runnable even for competitions outside the catalog.
pub fn synthetic(code: &str) -> Competition {
    Competition {
        code: code.to_string(),
        name: "Custom".to_string(),
        country: "Unknown".to_string(),
        tier: Tier::Other,
    }
}
