pub mod charts;
pub mod normalize;
pub mod stats;
pub mod text;
pub mod types;

pub use charts::{ChartError, ChartKind, ChartOptions, ChartOutcome};
pub use normalize::{normalize, normalize_record};
pub use stats::Summary;
pub use types::{NormalizedRow, VacancyTable, COLUMNS};
