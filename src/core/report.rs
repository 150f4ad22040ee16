use crate::core::{ContaminantId, LookupReport, WaterFilter};
use crate::utils::error::{LookupError, Result};
use std::collections::BTreeSet;
use std::str::FromStr;

pub const OUTPUT_FORMATS: [&str; 3] = ["json", "csv", "tsv"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Csv,
    Tsv,
}

impl FromStr for OutputFormat {
    type Err = LookupError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            "tsv" => Ok(OutputFormat::Tsv),
            other => Err(LookupError::InvalidConfigValueError {
                field: "format".to_string(),
                value: other.to_string(),
                reason: format!("Allowed values: {}", OUTPUT_FORMATS.join(", ")),
            }),
        }
    }
}

impl LookupReport {
    pub fn new(contaminant: ContaminantId, source: String, filters: Vec<WaterFilter>) -> Self {
        Self {
            contaminant,
            source,
            queried_at: chrono::Utc::now(),
            filters,
        }
    }

    pub fn render(&self, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(self)?),
            OutputFormat::Csv => render_delimited(&self.filters, b','),
            OutputFormat::Tsv => render_delimited(&self.filters, b'\t'),
        }
    }
}

fn render_delimited(filters: &[WaterFilter], delimiter: u8) -> Result<String> {
    // Union of extra columns so rows with sparse columns still line up.
    let extra_columns: BTreeSet<&str> = filters
        .iter()
        .flat_map(|f| f.extra.keys().map(String::as_str))
        .collect();

    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    let mut header = vec!["id", "contaminants_filtered"];
    header.extend(extra_columns.iter().copied());
    writer.write_record(&header)?;

    for filter in filters {
        let mut row = vec![
            scalar(&filter.id),
            filter
                .contaminants_filtered
                .iter()
                .map(ContaminantId::to_string)
                .collect::<Vec<_>>()
                .join(";"),
        ];
        for column in &extra_columns {
            row.push(filter.extra.get(*column).map(scalar).unwrap_or_default());
        }
        writer.write_record(&row)?;
    }

    let bytes = writer.into_inner().map_err(|e| LookupError::IoError(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| LookupError::ResponseParseError {
        message: e.to_string(),
    })
}

fn scalar(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::Null => String::new(),
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
