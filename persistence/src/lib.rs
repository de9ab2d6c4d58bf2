use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use vacancy_analyzer::{Summary, VacancyTable, COLUMNS};

pub const CSV_FILE: &str = "processed_vacancies.csv";
pub const JSON_FILE: &str = "processed_vacancies.json";
pub const SUMMARY_FILE: &str = "summary.json";

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error on '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to write csv: {0}")]
    Csv(#[from] csv::Error),
    #[error("Failed to serialize json: {0}")]
    Json(#[from] serde_json::Error),
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> Error + '_ {
    move |source| Error::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Output locations of one run, created up front
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputDirs {
    pub processed: PathBuf,
    pub figures: PathBuf,
}

impl OutputDirs {
    pub fn prepare(processed: impl Into<PathBuf>, figures: impl Into<PathBuf>) -> Result<Self> {
        let dirs = Self {
            processed: processed.into(),
            figures: figures.into(),
        };
        for dir in [&dirs.processed, &dirs.figures] {
            fs::create_dir_all(dir).map_err(io_error(dir))?;
        }
        Ok(dirs)
    }

    pub fn csv_path(&self) -> PathBuf {
        self.processed.join(CSV_FILE)
    }

    pub fn json_path(&self) -> PathBuf {
        self.processed.join(JSON_FILE)
    }

    pub fn summary_path(&self) -> PathBuf {
        self.processed.join(SUMMARY_FILE)
    }
}

/// Write the table as CSV. The header is written even for an empty table.
pub fn export_csv(table: &VacancyTable, path: &Path) -> Result<()> {
    let file = File::create(path).map_err(io_error(path))?;
    let mut writer = csv::Writer::from_writer(file);
    writer.write_record(COLUMNS)?;
    for row in table {
        writer.write_record(row.to_record())?;
    }
    writer.flush().map_err(io_error(path))?;
    log::info!("saved {} rows to {}", table.len(), path.display());
    Ok(())
}

fn write_json<T: Serialize + ?Sized>(value: &T, path: &Path) -> Result<()> {
    let file = File::create(path).map_err(io_error(path))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.flush().map_err(io_error(path))?;
    Ok(())
}

/// Write the table as a pretty printed JSON array of rows
pub fn export_json(table: &VacancyTable, path: &Path) -> Result<()> {
    write_json(table, path)?;
    log::info!("saved {} rows to {}", table.len(), path.display());
    Ok(())
}

pub fn save_summary(summary: &Summary, path: &Path) -> Result<()> {
    write_json(summary, path)?;
    log::info!("saved summary to {}", path.display());
    Ok(())
}
