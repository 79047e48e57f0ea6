//! Thin persistence gateway over SQLite. Two tables only: `teams`
//! (upsert-by-composite-key) and the append-only `scan_log`.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use crate::db::models::{NewScanLog, ScanLogRow, TeamStreakRecord};
use crate::error::Result;

/// Upsert one competition's scanned teams. A team absent from `records` is
/// left untouched; a repeated key overwrites, never duplicates.
pub async fn upsert_teams(pool: &SqlitePool, records: &[TeamStreakRecord]) -> Result<()> {
    for r in records {
        sqlx::query(
            r#"
            INSERT INTO teams (
                team_id, sport, competition_id, name, crest,
                country_name, country_flag, competition_name,
                form, has_streak, max_streak, streak_achieved_date, last_checked
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(team_id, competition_id, sport) DO UPDATE SET
                name = excluded.name,
                crest = excluded.crest,
                country_name = excluded.country_name,
                country_flag = excluded.country_flag,
                competition_name = excluded.competition_name,
                form = excluded.form,
                has_streak = excluded.has_streak,
                max_streak = excluded.max_streak,
                streak_achieved_date = excluded.streak_achieved_date,
                last_checked = excluded.last_checked
            "#,
        )
        .bind(r.team_id)
        .bind(&r.sport)
        .bind(&r.competition_id)
        .bind(&r.name)
        .bind(&r.crest)
        .bind(&r.country_name)
        .bind(&r.country_flag)
        .bind(&r.competition_name)
        .bind(&r.form)
        .bind(r.has_streak)
        .bind(r.max_streak)
        .bind(r.streak_achieved_date)
        .bind(r.last_checked)
        .execute(pool)
        .await?;
    }
    Ok(())
}

/// Append one scan-log entry. Inserted even for zero-match scans so the
/// scheduler's staleness clock advances.
pub async fn insert_scan_log(pool: &SqlitePool, entry: &NewScanLog) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO scan_log (sport, competition_id, competition_name,
                              teams_scanned, teams_qualified, created_at)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&entry.sport)
    .bind(&entry.competition_id)
    .bind(&entry.competition_name)
    .bind(entry.teams_scanned)
    .bind(entry.teams_qualified)
    .bind(Utc::now())
    .execute(pool)
    .await?;
    Ok(())
}

/// Most recent scan time per competition — the scheduler's staleness input.
pub async fn last_scan_map(pool: &SqlitePool) -> Result<HashMap<String, DateTime<Utc>>> {
    let rows: Vec<(String, DateTime<Utc>)> = sqlx::query_as(
        r#"
        SELECT competition_id, MAX(created_at) AS last_scan
        FROM scan_log
        GROUP BY competition_id
        "#,
    )
    .fetch_all(pool)
    .await?;
    Ok(rows.into_iter().collect())
}

pub async fn recent_scans(pool: &SqlitePool, limit: i64) -> Result<Vec<ScanLogRow>> {
    let rows = sqlx::query_as::<_, ScanLogRow>(
        r#"
        SELECT id, sport, competition_id, competition_name,
               teams_scanned, teams_qualified, created_at
        FROM scan_log
        ORDER BY created_at DESC
        LIMIT ?
        "#,
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Stored team records, most recently checked first. `qualified_only` is the
/// presentation filter — storage always holds every scanned team.
pub async fn teams(pool: &SqlitePool, qualified_only: bool) -> Result<Vec<TeamStreakRecord>> {
    let sql = if qualified_only {
        r#"
        SELECT team_id, sport, competition_id, name, crest,
               country_name, country_flag, competition_name,
               form, has_streak, max_streak, streak_achieved_date, last_checked
        FROM teams
        WHERE has_streak = 1
        ORDER BY last_checked DESC
        "#
    } else {
        r#"
        SELECT team_id, sport, competition_id, name, crest,
               country_name, country_flag, competition_name,
               form, has_streak, max_streak, streak_achieved_date, last_checked
        FROM teams
        ORDER BY last_checked DESC
        "#
    };
    let rows = sqlx::query_as::<_, TeamStreakRecord>(sql)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn test_pool() -> SqlitePool {
        // Single connection so every query hits the same in-memory database.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("in-memory sqlite");
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .expect("migrations");
        pool
    }

    fn record(team_id: i64, competition_id: &str, form: &str, max_streak: i64) -> TeamStreakRecord {
        TeamStreakRecord {
            team_id,
            sport: "football".to_string(),
            competition_id: competition_id.to_string(),
            name: format!("Team {team_id}"),
            crest: Some("crest.png".to_string()),
            country_name: Some("England".to_string()),
            country_flag: None,
            competition_name: "Premier League".to_string(),
            form: form.to_string(),
            has_streak: max_streak >= 5,
            max_streak,
            streak_achieved_date: (max_streak >= 5)
                .then(|| NaiveDate::from_ymd_opt(2024, 11, 9).unwrap()),
            last_checked: Utc::now(),
        }
    }

    #[tokio::test]
    async fn upsert_overwrites_instead_of_duplicating() {
        let pool = test_pool().await;

        upsert_teams(&pool, &[record(66, "PL", "WWWW", 4)]).await.unwrap();
        upsert_teams(&pool, &[record(66, "PL", "WWWWW", 5)]).await.unwrap();

        let all = teams(&pool, false).await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].form, "WWWWW");
        assert!(all[0].has_streak);
        assert_eq!(all[0].streak_achieved_date, Some(NaiveDate::from_ymd_opt(2024, 11, 9).unwrap()));
    }

    #[tokio::test]
    async fn same_team_in_two_competitions_keeps_both_rows() {
        let pool = test_pool().await;

        upsert_teams(&pool, &[record(66, "PL", "WWWWW", 5)]).await.unwrap();
        upsert_teams(&pool, &[record(66, "CL", "LLD", 0)]).await.unwrap();

        assert_eq!(teams(&pool, false).await.unwrap().len(), 2);
        let qualified = teams(&pool, true).await.unwrap();
        assert_eq!(qualified.len(), 1);
        assert_eq!(qualified[0].competition_id, "PL");
    }

    #[tokio::test]
    async fn last_scan_map_returns_the_most_recent_entry() {
        let pool = test_pool().await;
        let entry = |code: &str| NewScanLog {
            sport: "football".to_string(),
            competition_id: code.to_string(),
            competition_name: "x".to_string(),
            teams_scanned: 0,
            teams_qualified: 0,
        };

        insert_scan_log(&pool, &entry("PL")).await.unwrap();
        insert_scan_log(&pool, &entry("PL")).await.unwrap();
        insert_scan_log(&pool, &entry("SA")).await.unwrap();

        let map = last_scan_map(&pool).await.unwrap();
        assert_eq!(map.len(), 2);

        let scans = recent_scans(&pool, 10).await.unwrap();
        assert_eq!(scans.len(), 3);
        assert_eq!(map[&"PL".to_string()], scans.iter().filter(|s| s.competition_id == "PL").map(|s| s.created_at).max().unwrap());
    }
}
