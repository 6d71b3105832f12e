//! Export of analysis results as JSON, YAML or CSV.
//!
//! CSV output flattens the value into `path,value` rows, with nested keys and
//! array indices joined by dots (`elements.button.0.background`). Lists of flat
//! records, such as ranked font tables, become one row per record instead.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SerializeError {
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML serialization failed: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("CSV serialization failed: {0}")]
    Csv(String),

    #[error("unknown export format '{0}' (expected json, yaml or csv)")]
    UnknownFormat(String),
}

impl From<csv::Error> for SerializeError {
    fn from(e: csv::Error) -> Self {
        SerializeError::Csv(e.to_string())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Json,
    Yaml,
    Csv,
}

impl FromStr for ExportFormat {
    type Err = SerializeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "yaml" | "yml" => Ok(ExportFormat::Yaml),
            "csv" => Ok(ExportFormat::Csv),
            other => Err(SerializeError::UnknownFormat(other.to_string())),
        }
    }
}

/// Serializes `data` in the given format.
pub fn export<T: Serialize>(data: &T, format: ExportFormat) -> Result<String, SerializeError> {
    match format {
        ExportFormat::Json => to_json(data),
        ExportFormat::Yaml => to_yaml(data),
        ExportFormat::Csv => to_csv(data),
    }
}

/// Pretty-printed JSON.
pub fn to_json<T: Serialize>(data: &T) -> Result<String, SerializeError> {
    Ok(serde_json::to_string_pretty(data)?)
}

pub fn to_yaml<T: Serialize>(data: &T) -> Result<String, SerializeError> {
    Ok(serde_yaml::to_string(data)?)
}

pub fn to_csv<T: Serialize>(data: &T) -> Result<String, SerializeError> {
    let value = serde_json::to_value(data)?;
    let mut wtr = csv::Writer::from_writer(vec![]);

    match &value {
        Value::Array(records) if is_flat_table(records) => write_table(&mut wtr, records)?,
        _ => {
            wtr.write_record(["path", "value"])?;
            let mut rows = Vec::new();
            flatten("", &value, &mut rows);
            for (path, cell) in rows {
                wtr.write_record([path.as_str(), cell.as_str()])?;
            }
        }
    }

    let bytes = wtr
        .into_inner()
        .map_err(|e| SerializeError::Csv(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| SerializeError::Csv(e.to_string()))
}

/// A non-empty list of objects whose values are all scalars.
fn is_flat_table(records: &[Value]) -> bool {
    !records.is_empty()
        && records.iter().all(|record| match record {
            Value::Object(fields) => fields
                .values()
                .all(|v| !matches!(v, Value::Object(_) | Value::Array(_))),
            _ => false,
        })
}

fn write_table(wtr: &mut csv::Writer<Vec<u8>>, records: &[Value]) -> Result<(), SerializeError> {
    let mut headers: Vec<&str> = Vec::new();
    for record in records {
        if let Value::Object(fields) = record {
            for key in fields.keys() {
                if !headers.contains(&key.as_str()) {
                    headers.push(key);
                }
            }
        }
    }
    wtr.write_record(&headers)?;

    for record in records {
        let row: Vec<String> = headers
            .iter()
            .map(|h| record.get(*h).map(scalar_to_string).unwrap_or_default())
            .collect();
        wtr.write_record(&row)?;
    }
    Ok(())
}

fn flatten(prefix: &str, value: &Value, rows: &mut Vec<(String, String)>) {
    let join = |key: &str| {
        if prefix.is_empty() {
            key.to_string()
        } else {
            format!("{}.{}", prefix, key)
        }
    };

    match value {
        Value::Object(fields) if !fields.is_empty() => {
            for (key, child) in fields {
                flatten(&join(key), child, rows);
            }
        }
        Value::Array(items) if !items.is_empty() => {
            for (i, child) in items.iter().enumerate() {
                flatten(&join(&i.to_string()), child, rows);
            }
        }
        Value::Object(_) | Value::Array(_) => rows.push((prefix.to_string(), String::new())),
        scalar => rows.push((prefix.to_string(), scalar_to_string(scalar))),
    }
}

fn scalar_to_string(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Serialize)]
    struct Border {
        radius: String,
        width: String,
    }

    #[test]
    fn test_to_json_is_pretty() {
        let data = Border {
            radius: "8px".into(),
            width: "1px".into(),
        };
        let result = to_json(&data).unwrap();
        assert!(result.contains("\"radius\": \"8px\""));
        assert!(result.contains('\n'));
    }

    #[test]
    fn test_to_yaml() {
        let data = Border {
            radius: "8px".into(),
            width: "1px".into(),
        };
        let result = to_yaml(&data).unwrap();
        assert!(result.contains("radius: 8px"));
        assert!(result.contains("width: 1px"));
    }

    #[test]
    fn test_csv_nested_value_flattens_to_paths() {
        let data = json!({
            "theme": "dark",
            "colors": { "button": [{ "background": "#0055ff", "score": 3 }] },
            "borders": null,
            "tags": []
        });
        let result = to_csv(&data).unwrap();
        assert!(result.starts_with("path,value\n"));
        assert!(result.contains("theme,dark\n"));
        assert!(result.contains("colors.button.0.background,#0055ff\n"));
        assert!(result.contains("colors.button.0.score,3\n"));
        assert!(result.contains("borders,\n"));
        assert!(result.contains("tags,\n"));
    }

    #[test]
    fn test_csv_flat_records_become_rows() {
        let data = json!([
            { "fontFamily": "Inter", "count": 12 },
            { "fontFamily": "Georgia, serif", "count": 3 }
        ]);
        let result = to_csv(&data).unwrap();
        let lines: Vec<&str> = result.lines().collect();
        assert_eq!(lines[0], "count,fontFamily");
        assert_eq!(lines[1], "12,Inter");
        assert_eq!(lines[2], "3,\"Georgia, serif\"");
    }

    #[test]
    fn test_export_format_parsing() {
        assert_eq!("YAML".parse::<ExportFormat>().unwrap(), ExportFormat::Yaml);
        assert_eq!("yml".parse::<ExportFormat>().unwrap(), ExportFormat::Yaml);
        assert!(matches!(
            "xml".parse::<ExportFormat>(),
            Err(SerializeError::UnknownFormat(f)) if f == "xml"
        ));
    }

    #[test]
    fn test_export_dispatches_on_format() {
        let data = json!({ "theme": "light" });
        assert!(export(&data, ExportFormat::Json).unwrap().contains("\"theme\""));
        assert!(export(&data, ExportFormat::Csv).unwrap().contains("theme,light"));
    }
}
