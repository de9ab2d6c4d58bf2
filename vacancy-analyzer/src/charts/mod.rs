//! Chart files rendered from a normalized table.
//!
//! Every chart is independent: when its column has no data it is skipped
//! with a warning, and a failure in one never prevents the others.

mod bars;
mod salary;
mod word_cloud;

use std::fmt::{self, Display};
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::stats;
use crate::types::VacancyTable;

type DrawResult = Result<(), Box<dyn std::error::Error>>;

const FONT: &str = "sans-serif";
const SIZE: (u32, u32) = (1200, 600);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartKind {
    Experience,
    TopSkills,
    WordCloud,
    SalaryDistribution,
    SalaryByExperience,
}

impl ChartKind {
    pub const ALL: [ChartKind; 5] = [
        ChartKind::Experience,
        ChartKind::TopSkills,
        ChartKind::WordCloud,
        ChartKind::SalaryDistribution,
        ChartKind::SalaryByExperience,
    ];

    pub fn file_name(&self) -> &'static str {
        match self {
            ChartKind::Experience => "experience_distribution.svg",
            ChartKind::TopSkills => "top_skills.svg",
            ChartKind::WordCloud => "combined_wordcloud.svg",
            ChartKind::SalaryDistribution => "salary_distribution.svg",
            ChartKind::SalaryByExperience => "salary_by_experience.svg",
        }
    }
}

impl Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ChartKind::Experience => "experience distribution",
            ChartKind::TopSkills => "top skills",
            ChartKind::WordCloud => "word cloud",
            ChartKind::SalaryDistribution => "salary distribution",
            ChartKind::SalaryByExperience => "salary by experience",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChartOutcome {
    Written(PathBuf),
    /// Nothing to plot, the reason has been logged
    Skipped(&'static str),
}

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("Failed to render {kind} chart to '{}': {message}", .path.display())]
    Render {
        kind: ChartKind,
        path: PathBuf,
        message: String,
    },
    #[error("Rendering the {kind} chart panicked: {message}")]
    Panicked { kind: ChartKind, message: String },
}

#[derive(Debug, Clone, Copy)]
pub struct ChartOptions {
    pub top_skills: usize,
    pub word_cloud_words: usize,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            top_skills: 15,
            word_cloud_words: 100,
        }
    }
}

/// Render a single chart into `dir`
pub fn render(
    kind: ChartKind,
    table: &VacancyTable,
    dir: &Path,
    options: &ChartOptions,
) -> Result<ChartOutcome, ChartError> {
    let result = panic::catch_unwind(AssertUnwindSafe(|| match kind {
        ChartKind::Experience => experience_distribution(table, dir),
        ChartKind::TopSkills => top_skills(table, dir, options.top_skills),
        ChartKind::WordCloud => word_cloud(table, dir, options.word_cloud_words),
        ChartKind::SalaryDistribution => salary_distribution(table, dir),
        ChartKind::SalaryByExperience => salary_by_experience(table, dir),
    }));
    result.unwrap_or_else(|payload| {
        let message = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown panic".to_owned());
        Err(ChartError::Panicked { kind, message })
    })
}

/// Render every chart, logging each outcome
pub fn render_all(
    table: &VacancyTable,
    dir: &Path,
    options: &ChartOptions,
) -> Vec<(ChartKind, Result<ChartOutcome, ChartError>)> {
    ChartKind::ALL
        .iter()
        .map(|&kind| {
            let result = render(kind, table, dir, options);
            match &result {
                Ok(ChartOutcome::Written(path)) => {
                    log::info!("saved {} chart to {}", kind, path.display())
                }
                Ok(ChartOutcome::Skipped(_)) => {}
                Err(e) => log::error!("{}", e),
            }
            (kind, result)
        })
        .collect()
}

fn skip(kind: ChartKind, reason: &'static str) -> ChartOutcome {
    log::warn!("skipping {} chart: {}", kind, reason);
    ChartOutcome::Skipped(reason)
}

fn write<F>(kind: ChartKind, dir: &Path, draw: F) -> Result<ChartOutcome, ChartError>
where
    F: FnOnce(&Path) -> DrawResult,
{
    let path = dir.join(kind.file_name());
    match draw(&path) {
        Ok(()) => Ok(ChartOutcome::Written(path)),
        Err(e) => Err(ChartError::Render {
            kind,
            message: e.to_string(),
            path,
        }),
    }
}

pub fn experience_distribution(table: &VacancyTable, dir: &Path) -> Result<ChartOutcome, ChartError> {
    let kind = ChartKind::Experience;
    let counts = stats::experience_distribution(table);
    if counts.is_empty() {
        return Ok(skip(kind, "no experience data"));
    }
    write(kind, dir, |path| {
        bars::vertical(path, "Required work experience", "Experience", "Vacancies", &counts)
    })
}

pub fn top_skills(table: &VacancyTable, dir: &Path, n: usize) -> Result<ChartOutcome, ChartError> {
    let kind = ChartKind::TopSkills;
    let mut skills = stats::top_skills(table, n);
    if skills.is_empty() {
        return Ok(skip(kind, "no skills data"));
    }
    // most frequent skill on top
    skills.reverse();
    let caption = format!("Top {} skills", n);
    write(kind, dir, |path| {
        bars::horizontal(path, &caption, "Mentions", "Skill", &skills)
    })
}

pub fn word_cloud(table: &VacancyTable, dir: &Path, max_words: usize) -> Result<ChartOutcome, ChartError> {
    let kind = ChartKind::WordCloud;
    let words = stats::word_frequencies(table, max_words);
    if words.is_empty() {
        return Ok(skip(kind, "no requirement or responsibility text"));
    }
    write(kind, dir, |path| word_cloud::draw(path, &words))
}

pub fn salary_distribution(table: &VacancyTable, dir: &Path) -> Result<ChartOutcome, ChartError> {
    let kind = ChartKind::SalaryDistribution;
    let salaries = stats::trim_outliers(&stats::average_salaries(table), stats::OUTLIER_QUANTILE);
    if salaries.is_empty() {
        return Ok(skip(kind, "no salary data"));
    }
    write(kind, dir, |path| salary::histogram(path, &salaries))
}

pub fn salary_by_experience(table: &VacancyTable, dir: &Path) -> Result<ChartOutcome, ChartError> {
    let kind = ChartKind::SalaryByExperience;
    let groups = stats::salary_by_experience(table);
    if groups.is_empty() {
        return Ok(skip(kind, "no salary data"));
    }
    write(kind, dir, |path| salary::boxplot(path, &groups))
}
