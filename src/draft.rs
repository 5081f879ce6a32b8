use crate::errors::DraftError;
use crate::models::{Difficulty, Problem, Record};
use serde::{Deserialize, Serialize};

/// One field change coming from the entry form.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "field", rename_all = "lowercase")]
pub enum DraftEdit {
    Rank { value: String },
    Date { value: String },
    Solved { difficulty: Difficulty, value: String },
    Total { difficulty: Difficulty, value: String },
}

/// The record being built by the entry form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Draft(Record);

impl Draft {
    pub fn seeded(next_id: usize, now_millis: i64) -> Self {
        Self(Record {
            id: next_id as u64,
            date: now_millis.to_string(),
            rank: String::new(),
            problems: Difficulty::ALL.into_iter().map(Problem::zeroed).collect(),
        })
    }

    pub fn record(&self) -> &Record {
        &self.0
    }

    pub fn into_record(self) -> Record {
        self.0
    }

    pub fn set_rank(&mut self, value: impl Into<String>) {
        self.0.rank = value.into();
    }

    pub fn set_date(&mut self, value: impl Into<String>) {
        self.0.date = value.into();
    }

    pub fn set_solved(&mut self, difficulty: Difficulty, raw: &str) -> Result<(), DraftError> {
        let solved = parse_count(&format!("{difficulty} solved"), raw)?;
        self.update_problem(difficulty, |problem| problem.solved = solved);
        Ok(())
    }

    pub fn set_total(&mut self, difficulty: Difficulty, raw: &str) -> Result<(), DraftError> {
        let total = parse_count(&format!("{difficulty} total"), raw)?;
        self.update_problem(difficulty, |problem| problem.total = total);
        Ok(())
    }

    pub fn apply(&mut self, edit: DraftEdit) -> Result<(), DraftError> {
        match edit {
            DraftEdit::Rank { value } => self.set_rank(value),
            DraftEdit::Date { value } => self.set_date(value),
            DraftEdit::Solved { difficulty, value } => self.set_solved(difficulty, &value)?,
            DraftEdit::Total { difficulty, value } => self.set_total(difficulty, &value)?,
        }
        Ok(())
    }

    fn update_problem(&mut self, difficulty: Difficulty, update: impl Fn(&mut Problem)) {
        self.0
            .problems
            .iter_mut()
            .filter(|problem| problem.difficulty == difficulty)
            .for_each(update);
    }
}

/// Blank input counts as zero; anything but a non-negative integer is rejected.
pub fn parse_count(field: &str, raw: &str) -> Result<u64, DraftError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(0);
    }
    trimmed.parse::<u64>().map_err(|_| DraftError::InvalidCount {
        field: field.to_string(),
        value: raw.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn problem(draft: &Draft, difficulty: Difficulty) -> &Problem {
        draft
            .record()
            .problems
            .iter()
            .find(|p| p.difficulty == difficulty)
            .expect("missing tier")
    }

    #[test]
    fn seeded_draft_has_zeroed_tiers_in_order() {
        let draft = Draft::seeded(4, 1_700_000_000_000);
        let record = draft.record();
        assert_eq!(record.id, 4);
        assert_eq!(record.date, "1700000000000");
        assert_eq!(record.rank, "");
        let tiers: Vec<_> = record.problems.iter().map(|p| p.difficulty).collect();
        assert_eq!(tiers, Difficulty::ALL);
        assert!(record.problems.iter().all(|p| p.solved == 0 && p.total == 0));
    }

    #[test]
    fn editing_medium_solved_leaves_everything_else() {
        let mut draft = Draft::seeded(2, 1_700_000_000_000);
        draft.set_rank("480");
        draft.set_solved(Difficulty::Easy, "12").unwrap();
        draft.set_total(Difficulty::Easy, "50").unwrap();
        draft.set_total(Difficulty::Hard, "20").unwrap();
        let before = draft.clone();

        draft.set_solved(Difficulty::Medium, "5").unwrap();

        assert_eq!(problem(&draft, Difficulty::Medium).solved, 5);
        assert_eq!(problem(&draft, Difficulty::Medium).total, 0);
        assert_eq!(problem(&draft, Difficulty::Easy), problem(&before, Difficulty::Easy));
        assert_eq!(problem(&draft, Difficulty::Hard), problem(&before, Difficulty::Hard));
        assert_eq!(draft.record().rank, "480");
        assert_eq!(draft.record().date, before.record().date);
        assert_eq!(draft.record().id, 2);
    }

    #[test]
    fn invalid_count_is_rejected_without_change() {
        let mut draft = Draft::seeded(0, 1);
        draft.set_solved(Difficulty::Hard, "3").unwrap();
        let before = draft.clone();

        for raw in ["abc", "-1", "2.5", "NaN"] {
            let err = draft.set_solved(Difficulty::Hard, raw).unwrap_err();
            assert_eq!(
                err,
                DraftError::InvalidCount {
                    field: "hard solved".into(),
                    value: raw.into(),
                }
            );
        }
        assert_eq!(draft, before);
    }

    #[test]
    fn blank_count_becomes_zero() {
        let mut draft = Draft::seeded(0, 1);
        draft.set_total(Difficulty::Easy, "40").unwrap();
        draft.set_total(Difficulty::Easy, "  ").unwrap();
        assert_eq!(problem(&draft, Difficulty::Easy).total, 0);
        assert_eq!(parse_count("x", " 17 "), Ok(17));
    }

    #[test]
    fn edits_decode_from_tagged_json() {
        let mut draft = Draft::seeded(0, 1);
        let edits: Vec<DraftEdit> = serde_json::from_str(
            r#"[
                {"field": "rank", "value": "480"},
                {"field": "date", "value": "1700100000000"},
                {"field": "solved", "difficulty": "medium", "value": "5"},
                {"field": "total", "difficulty": "medium", "value": "30"}
            ]"#,
        )
        .unwrap();
        for edit in edits {
            draft.apply(edit).unwrap();
        }
        assert_eq!(draft.record().rank, "480");
        assert_eq!(draft.record().date, "1700100000000");
        assert_eq!(
            problem(&draft, Difficulty::Medium),
            &Problem {
                difficulty: Difficulty::Medium,
                solved: 5,
                total: 30,
            }
        );
    }

    #[test]
    fn draft_serializes_as_plain_record() {
        let draft = Draft::seeded(1, 5);
        let value = serde_json::to_value(&draft).unwrap();
        assert_eq!(value["id"], 1);
        assert_eq!(value["date"], "5");
        assert_eq!(value["problems"].as_array().unwrap().len(), 3);
    }
}
