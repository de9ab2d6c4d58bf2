pub mod api;
pub mod config;
pub mod hh;

pub use api::VacancyApi;
pub use config::{ApiConfig, Config, ConfigError, OutputConfig, PER_PAGE};
pub use hh::types::{ListingSummary, RawVacancy, SearchPage, SearchQuery};
