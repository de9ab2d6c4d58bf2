use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::config::{ApiConfig, PER_PAGE};

/// Search filters shared by every page request of a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub text: String,
    pub area: String,
    pub period: u32,
    pub per_page: u32,
}

impl SearchQuery {
    pub fn new(text: impl Into<String>, area: impl Into<String>, period: u32) -> Self {
        Self {
            text: text.into(),
            area: area.into(),
            period,
            per_page: PER_PAGE,
        }
    }

    /// Query string parameters for the given page
    pub fn params(&self, page: u32) -> Vec<(&'static str, String)> {
        vec![
            ("text", self.text.clone()),
            ("area", self.area.clone()),
            ("period", self.period.to_string()),
            ("per_page", self.per_page.to_string()),
            ("page", page.to_string()),
        ]
    }
}

impl From<&ApiConfig> for SearchQuery {
    fn from(config: &ApiConfig) -> Self {
        Self::new(&config.query, &config.area, config.period)
    }
}

/// Abbreviated vacancy as returned by the search endpoint
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct ListingSummary {
    #[serde(default)]
    id: Option<Value>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl ListingSummary {
    pub fn id(&self) -> Option<String> {
        self.id.as_ref().and_then(identifier)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct SearchPage {
    #[serde(default)]
    pub items: Vec<ListingSummary>,
    /// Total number of pages the server reports for the query.
    /// Null, negative or non-numeric counts read as 0, the last page.
    #[serde(default, deserialize_with = "page_count")]
    pub pages: u32,
}

fn page_count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let count = match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(n)) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 1.0).map(|f| f as u64))
            .unwrap_or(0),
        _ => 0,
    };
    Ok(count.min(u64::from(u32::MAX)) as u32)
}

/// Full vacancy record from the detail endpoint, kept loosely typed.
///
/// Nested objects such as `salary`, `snippet` or `key_skills` are frequently
/// missing or null, so all access goes through the optional accessors below.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(transparent)]
pub struct RawVacancy(Value);

impl RawVacancy {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// Top level field, `None` when missing or null
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key).filter(|v| !v.is_null())
    }

    /// Field of a nested object, `None` when either segment is missing, null
    /// or not an object
    pub fn nested(&self, object: &str, key: &str) -> Option<&Value> {
        self.get(object)?.get(key).filter(|v| !v.is_null())
    }

    pub fn id(&self) -> Option<String> {
        self.get("id").and_then(identifier)
    }

    /// A usable record is a JSON object with at least one field
    pub fn is_empty(&self) -> bool {
        self.0.as_object().map_or(true, |fields| fields.is_empty())
    }
}

/// Identifiers arrive as strings but numbers are accepted too;
/// empty strings count as missing
pub fn identifier(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
