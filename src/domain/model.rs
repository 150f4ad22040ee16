use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Integer key of a contaminant type in the backend schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContaminantId(pub i64);

impl ContaminantId {
    /// Array literal accepted by the `cs` (contains) operator, e.g. `{42}`.
    pub fn as_array_literal(&self) -> String {
        format!("{{{}}}", self.0)
    }
}

impl fmt::Display for ContaminantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for ContaminantId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

/// A filter product row as returned by `select=*`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaterFilter {
    pub id: serde_json::Value,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub contaminants_filtered: Vec<ContaminantId>,

    /// Every other column, kept as returned.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// Column name the contaminant list is stored under in [`WaterFilter`].
pub const CONTAMINANTS_FIELD: &str = "contaminants_filtered";

impl WaterFilter {
    pub fn filters(&self, contaminant: ContaminantId) -> bool {
        self.contaminants_filtered.contains(&contaminant)
    }

    /// Builds a filter from a raw row whose contaminant list lives under
    /// `column`. The value is moved into `contaminants_filtered`; a missing
    /// column yields an empty list.
    pub fn from_row(
        mut row: serde_json::Map<String, serde_json::Value>,
        column: &str,
    ) -> serde_json::Result<Self> {
        if column != CONTAMINANTS_FIELD {
            let value = row.remove(column).unwrap_or(serde_json::Value::Null);
            row.insert(CONTAMINANTS_FIELD.to_string(), value);
        }
        serde_json::from_value(serde_json::Value::Object(row))
    }
}

pub fn filters_from_rows(
    rows: Vec<serde_json::Map<String, serde_json::Value>>,
    column: &str,
) -> serde_json::Result<Vec<WaterFilter>> {
    rows.into_iter()
        .map(|row| WaterFilter::from_row(row, column))
        .collect()
}

fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<Vec<ContaminantId>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<ContaminantId>>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Serialize)]
pub struct LookupReport {
    pub contaminant: ContaminantId,
    pub source: String,
    pub queried_at: DateTime<Utc>,
    pub filters: Vec<WaterFilter>,
}
