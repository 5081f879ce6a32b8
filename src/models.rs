use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// Display order of the tiers in a freshly seeded record.
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Problem {
    pub difficulty: Difficulty,
    #[serde(default, deserialize_with = "lenient_count")]
    pub solved: u64,
    #[serde(default, deserialize_with = "lenient_count")]
    pub total: u64,
}

impl Problem {
    pub fn zeroed(difficulty: Difficulty) -> Self {
        Self {
            difficulty,
            solved: 0,
            total: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    #[serde(default)]
    pub id: u64,
    pub date: String,
    pub rank: String,
    pub problems: Vec<Problem>,
}

/// Full history, in insertion order.
pub type Collection = Vec<Record>;

/// Body returned by a bin read: `{ "record": { "leetcode": [...] } }`.
#[derive(Debug, Deserialize)]
pub struct BinDocument {
    pub record: BinRecord,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BinRecord {
    pub leetcode: Collection,
}

/// Body sent on a bin write.
#[derive(Debug, Serialize)]
pub struct BinWrite<'a> {
    pub leetcode: &'a [Record],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Stats,
    Form,
}

impl ViewMode {
    pub fn as_str(self) -> &'static str {
        match self {
            ViewMode::Stats => "stats",
            ViewMode::Form => "form",
        }
    }
}

impl FromStr for ViewMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "stats" => Ok(ViewMode::Stats),
            "form" => Ok(ViewMode::Form),
            other => Err(format!("unknown view '{other}'")),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ViewRequest {
    pub view: ViewMode,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct RankPoint {
    pub label: String,
    pub rank: Option<f64>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PieSlice {
    pub name: String,
    pub value: u64,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct DifficultyBreakdown {
    pub difficulty: Difficulty,
    pub slices: [PieSlice; 2],
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StatsResponse {
    pub rank_series: Vec<RankPoint>,
    pub breakdown: Vec<DifficultyBreakdown>,
}

/// Accepts any JSON number or `null`; older writers stored NaN as `null`.
/// Integers are taken as-is, so large counts survive unchanged.
fn lenient_count<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(number) = Option::<serde_json::Number>::deserialize(deserializer)? else {
        return Ok(0);
    };
    if let Some(count) = number.as_u64() {
        return Ok(count);
    }
    Ok(match number.as_f64() {
        Some(v) if v.is_finite() && v > 0.0 => v.trunc() as u64,
        _ => 0,
    })
}
