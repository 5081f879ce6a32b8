use crate::models::{DifficultyBreakdown, PieSlice, Problem, RankPoint, Record, StatsResponse};
use chrono::{DateTime, Local, TimeZone, Utc};

const INVALID_DATE: &str = "Invalid Date";

pub fn build_stats(records: &[Record]) -> StatsResponse {
    build_stats_in(records, &Local)
}

pub fn build_stats_in<Tz: TimeZone>(records: &[Record], tz: &Tz) -> StatsResponse {
    StatsResponse {
        rank_series: rank_series(records, tz),
        breakdown: difficulty_breakdown(records),
    }
}

/// One point per record, in collection order.
pub fn rank_series<Tz: TimeZone>(records: &[Record], tz: &Tz) -> Vec<RankPoint> {
    records
        .iter()
        .map(|record| RankPoint {
            label: date_label(&record.date, tz),
            rank: parse_rank(&record.rank),
        })
        .collect()
}

/// Solved/remaining split for each tier of the latest record only.
pub fn difficulty_breakdown(records: &[Record]) -> Vec<DifficultyBreakdown> {
    let Some(latest) = records.last() else {
        return Vec::new();
    };
    latest.problems.iter().map(breakdown_for).collect()
}

fn breakdown_for(problem: &Problem) -> DifficultyBreakdown {
    DifficultyBreakdown {
        difficulty: problem.difficulty,
        slices: [
            PieSlice {
                name: "Solved".to_string(),
                value: problem.solved,
            },
            PieSlice {
                name: "Remaining".to_string(),
                value: problem.total.saturating_sub(problem.solved),
            },
        ],
    }
}

pub fn date_label<Tz: TimeZone>(raw: &str, tz: &Tz) -> String {
    let Ok(millis) = raw.trim().parse::<i64>() else {
        return INVALID_DATE.to_string();
    };
    match DateTime::<Utc>::from_timestamp_millis(millis) {
        Some(utc) => utc.with_timezone(tz).date_naive().format("%-m/%-d/%Y").to_string(),
        None => INVALID_DATE.to_string(),
    }
}

fn parse_rank(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|rank| rank.is_finite())
}
