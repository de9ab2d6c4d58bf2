use std::collections::HashMap;

use chrono::{DateTime, FixedOffset};
use serde::Serialize;

use crate::text::{frequency_text, tokenize};
use crate::types::VacancyTable;

/// Share of the salary distribution kept by the outlier trim
pub const OUTLIER_QUANTILE: f64 = 0.95;

/// Frequencies ordered by count, ties keep first-seen order
pub fn value_counts<I, S>(values: I) -> Vec<(String, usize)>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut counts: Vec<(String, usize)> = Vec::new();
    for value in values {
        let value = value.as_ref();
        match positions.get(value) {
            Some(&i) => counts[i].1 += 1,
            None => {
                positions.insert(value.to_owned(), counts.len());
                counts.push((value.to_owned(), 1));
            }
        }
    }
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

pub fn experience_distribution(table: &VacancyTable) -> Vec<(String, usize)> {
    value_counts(table.iter().filter_map(|row| row.experience.as_deref()))
}

pub fn top_skills(table: &VacancyTable, n: usize) -> Vec<(String, usize)> {
    let mut skills = value_counts(table.iter().flat_map(|row| row.skills.iter()));
    skills.truncate(n);
    skills
}

pub fn average_salaries(table: &VacancyTable) -> Vec<f64> {
    table.iter().filter_map(|row| row.average_salary()).collect()
}

/// Quantile with linear interpolation between the closest ranks
pub fn quantile(values: &[f64], q: f64) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let position = (sorted.len() - 1) as f64 * q.clamp(0.0, 1.0);
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;
    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * fraction)
}

/// Drop values above the `q` quantile, keeping order
pub fn trim_outliers(values: &[f64], q: f64) -> Vec<f64> {
    match quantile(values, q) {
        Some(threshold) => values.iter().copied().filter(|v| *v <= threshold).collect(),
        None => Vec::new(),
    }
}

/// Trimmed average salaries grouped by experience label, groups in
/// first-seen order. Rows without an experience label are left out.
pub fn salary_by_experience(table: &VacancyTable) -> Vec<(String, Vec<f64>)> {
    let Some(threshold) = quantile(&average_salaries(table), OUTLIER_QUANTILE) else {
        return Vec::new();
    };
    let mut groups: Vec<(String, Vec<f64>)> = Vec::new();
    for row in table {
        let (Some(experience), Some(salary)) = (row.experience.as_deref(), row.average_salary())
        else {
            continue;
        };
        if salary > threshold {
            continue;
        }
        match groups.iter_mut().find(|(label, _)| label == experience) {
            Some((_, salaries)) => salaries.push(salary),
            None => groups.push((experience.to_owned(), vec![salary])),
        }
    }
    groups
}

/// Most frequent words over the requirement and responsibility snippets
pub fn word_frequencies(table: &VacancyTable, n: usize) -> Vec<(String, usize)> {
    let texts: Vec<String> = table
        .iter()
        .flat_map(|row| [row.requirements.as_deref(), row.responsibility.as_deref()])
        .flatten()
        .map(frequency_text)
        .filter(|text| !text.is_empty())
        .collect();
    let mut words = value_counts(texts.iter().flat_map(|text| tokenize(text)));
    words.truncate(n);
    words
}

fn parse_published(value: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%z")
        .or_else(|_| DateTime::parse_from_rfc3339(value))
        .ok()
}

/// Aggregate figures for one run
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Summary {
    pub vacancies: usize,
    pub with_salary: usize,
    /// Mean and median of the trimmed average salaries
    pub salary_mean: Option<f64>,
    pub salary_median: Option<f64>,
    pub currencies: Vec<(String, usize)>,
    pub experience: Vec<(String, usize)>,
    pub top_skills: Vec<(String, usize)>,
    pub earliest_published: Option<String>,
    pub latest_published: Option<String>,
}

impl Summary {
    pub fn from_table(table: &VacancyTable, top_n: usize) -> Self {
        let salaries = average_salaries(table);
        let trimmed = trim_outliers(&salaries, OUTLIER_QUANTILE);
        let salary_mean = if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.iter().sum::<f64>() / trimmed.len() as f64)
        };
        let published: Vec<_> = table
            .iter()
            .filter_map(|row| row.published_at.as_deref())
            .filter_map(parse_published)
            .collect();
        Self {
            vacancies: table.len(),
            with_salary: salaries.len(),
            salary_mean,
            salary_median: quantile(&trimmed, 0.5),
            currencies: value_counts(table.iter().filter_map(|row| row.salary_currency.as_deref())),
            experience: experience_distribution(table),
            top_skills: top_skills(table, top_n),
            earliest_published: published.iter().min().map(DateTime::to_rfc3339),
            latest_published: published.iter().max().map(DateTime::to_rfc3339),
        }
    }
}
