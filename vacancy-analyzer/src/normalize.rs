use serde_json::{Number, Value};
use vacancy_scraper::RawVacancy;

use crate::types::{NormalizedRow, VacancyTable};

/// Flatten raw detail records into the fixed schema, keeping their order
pub fn normalize(records: &[RawVacancy]) -> VacancyTable {
    records.iter().map(normalize_record).collect()
}

/// Extract a single row. Missing, null or mistyped values become absent,
/// this never fails.
pub fn normalize_record(record: &RawVacancy) -> NormalizedRow {
    NormalizedRow {
        id: record.id(),
        name: text(record.get("name")),
        salary_from: number(record.nested("salary", "from")),
        salary_to: number(record.nested("salary", "to")),
        salary_currency: text(record.nested("salary", "currency")),
        experience: text(record.nested("experience", "name")),
        schedule: text(record.nested("schedule", "name")),
        employment: text(record.nested("employment", "name")),
        requirements: text(record.nested("snippet", "requirement")),
        responsibility: text(record.nested("snippet", "responsibility")),
        skills: skills(record),
        published_at: text(record.get("published_at")),
    }
}

fn text(value: Option<&Value>) -> Option<String> {
    value?.as_str().map(str::to_owned)
}

fn number(value: Option<&Value>) -> Option<Number> {
    match value? {
        Value::Number(n) => Some(n.clone()),
        _ => None,
    }
}

fn skills(record: &RawVacancy) -> Vec<String> {
    record
        .get("key_skills")
        .and_then(Value::as_array)
        .map(|skills| {
            skills
                .iter()
                .filter_map(|skill| skill.get("name").and_then(Value::as_str))
                .map(str::to_owned)
                .collect()
        })
        .unwrap_or_default()
}
