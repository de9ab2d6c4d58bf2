use persistence::OutputDirs;
use vacancy_analyzer::charts::{self, ChartOptions, ChartOutcome};
use vacancy_analyzer::{normalize, Summary, VacancyTable};
use vacancy_scraper::{OutputConfig, RawVacancy};

/// Normalize, export and chart the fetched vacancies.
/// Returns `None` when there was nothing to analyze.
pub fn analyze(
    vacancies: &[RawVacancy],
    dirs: &OutputDirs,
    output: &OutputConfig,
) -> Option<VacancyTable> {
    let table = normalize(vacancies);
    if table.is_empty() {
        log::warn!("no vacancies to analyze, skipping export and charts");
        return None;
    }
    log::info!("normalized {} vacancies", table.len());

    if let Err(e) = persistence::export_csv(&table, &dirs.csv_path()) {
        log::error!("csv export failed: {}", e);
    }
    if let Err(e) = persistence::export_json(&table, &dirs.json_path()) {
        log::error!("json export failed: {}", e);
    }

    let summary = Summary::from_table(&table, output.top_skills);
    log_summary(&summary);
    if let Err(e) = persistence::save_summary(&summary, &dirs.summary_path()) {
        log::error!("saving summary failed: {}", e);
    }

    let options = ChartOptions {
        top_skills: output.top_skills,
        word_cloud_words: output.word_cloud_words,
    };
    let written = charts::render_all(&table, &dirs.figures, &options)
        .into_iter()
        .filter(|(_, result)| matches!(result, Ok(ChartOutcome::Written(_))))
        .count();
    log::info!("{} charts saved to {}", written, dirs.figures.display());
    Some(table)
}

fn log_summary(summary: &Summary) {
    log::info!(
        "{} vacancies, {} with salary",
        summary.vacancies,
        summary.with_salary
    );
    if let (Some(mean), Some(median)) = (summary.salary_mean, summary.salary_median) {
        log::info!("average salary {:.0}, median {:.0}", mean, median);
    }
    if let Some((skill, count)) = summary.top_skills.first() {
        log::info!("most requested skill: {} ({} vacancies)", skill, count);
    }
}
