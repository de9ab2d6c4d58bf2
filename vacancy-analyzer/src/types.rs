use serde::{Deserialize, Serialize};
use serde_json::Number;

/// Column order of the exported table
pub const COLUMNS: [&str; 12] = [
    "id",
    "name",
    "salary_from",
    "salary_to",
    "salary_currency",
    "experience",
    "schedule",
    "employment",
    "requirements",
    "responsibility",
    "skills",
    "published_at",
];

/// Separator used when the skills list is flattened into a single cell
pub const SKILL_SEPARATOR: &str = "; ";

/// One vacancy flattened into the fixed output schema.
/// Anything missing in the source record is `None` or an empty list.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct NormalizedRow {
    pub id: Option<String>,
    pub name: Option<String>,
    /// Salary bounds keep the JSON number the API sent
    pub salary_from: Option<Number>,
    pub salary_to: Option<Number>,
    pub salary_currency: Option<String>,
    pub experience: Option<String>,
    pub schedule: Option<String>,
    pub employment: Option<String>,
    pub requirements: Option<String>,
    pub responsibility: Option<String>,
    pub skills: Vec<String>,
    pub published_at: Option<String>,
}

impl NormalizedRow {
    /// Midpoint of the salary range, only when both bounds are known
    pub fn average_salary(&self) -> Option<f64> {
        let from = self.salary_from.as_ref()?.as_f64()?;
        let to = self.salary_to.as_ref()?.as_f64()?;
        Some((from + to) / 2.0)
    }

    /// Cells in `COLUMNS` order, absent values as empty cells
    pub fn to_record(&self) -> Vec<String> {
        fn cell<T: ToString>(value: &Option<T>) -> String {
            value.as_ref().map(ToString::to_string).unwrap_or_default()
        }
        vec![
            cell(&self.id),
            cell(&self.name),
            cell(&self.salary_from),
            cell(&self.salary_to),
            cell(&self.salary_currency),
            cell(&self.experience),
            cell(&self.schedule),
            cell(&self.employment),
            cell(&self.requirements),
            cell(&self.responsibility),
            self.skills.join(SKILL_SEPARATOR),
            cell(&self.published_at),
        ]
    }
}

/// Ordered collection of normalized rows with a fixed column set
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(transparent)]
pub struct VacancyTable {
    rows: Vec<NormalizedRow>,
}

impl VacancyTable {
    pub fn new(rows: Vec<NormalizedRow>) -> Self {
        Self { rows }
    }

    pub fn columns(&self) -> &'static [&'static str] {
        &COLUMNS
    }

    pub fn iter(&self) -> std::slice::Iter<'_, NormalizedRow> {
        self.rows.iter()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl<'a> IntoIterator for &'a VacancyTable {
    type Item = &'a NormalizedRow;
    type IntoIter = std::slice::Iter<'a, NormalizedRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

impl FromIterator<NormalizedRow> for VacancyTable {
    fn from_iter<I: IntoIterator<Item = NormalizedRow>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_average_salary_needs_both_bounds() {
        let mut row = NormalizedRow {
            salary_from: Some(Number::from(100_000)),
            ..Default::default()
        };
        assert_eq!(row.average_salary(), None);
        row.salary_to = Some(Number::from(200_000));
        assert_eq!(row.average_salary(), Some(150_000.0));
    }

    #[test]
    fn test_record_matches_columns() {
        let row = NormalizedRow {
            id: Some("1".to_owned()),
            salary_from: Some(Number::from(90_000)),
            skills: vec!["Python".to_owned(), "SQL".to_owned()],
            ..Default::default()
        };
        let record = row.to_record();
        assert_eq!(record.len(), COLUMNS.len());
        assert_eq!(record[0], "1");
        assert_eq!(record[1], "");
        assert_eq!(record[2], "90000");
        assert_eq!(record[10], "Python; SQL");
    }
}
