use crate::domain::model::{Dataset, Record};
use crate::schema::TableSchema;
use crate::utils::error::{EtlError, Result};
use chrono::NaiveDate;
use serde_json::{Map, Number, Value};

/// Transforms a raw dataset into the schema's target shape: renames
/// columns, normalizes missing values to null, infers numeric types,
/// converts date encodings, coerces the integer allow-list, and
/// projects each record onto the declared column list in declared
/// order. Fails on the first bad date cell; no partial output.
pub fn apply(records: Dataset, schema: &TableSchema) -> Result<Dataset> {
    records
        .into_iter()
        .map(|record| transform_record(record, schema))
        .collect()
}

fn transform_record(record: Record, schema: &TableSchema) -> Result<Record> {
    let mut renamed: Map<String, Value> = Map::new();
    for (key, value) in record.data {
        let target = schema.target_name(&key).to_string();
        renamed.insert(target, normalize_cell(value));
    }

    // Projection onto the declared columns drops renamed-away and
    // administrative source fields and materializes absent columns as
    // null, so every output record carries the identical key set.
    let mut data = Map::new();
    for column in &schema.columns {
        let mut value = renamed.remove(column.as_str()).unwrap_or(Value::Null);
        if schema.is_date_column(column) {
            value = coerce_date(column, value)?;
        }
        if schema.is_integer_column(column) {
            value = coerce_integer(column, value)?;
        }
        data.insert(column.clone(), value);
    }

    Ok(Record { data })
}

/// Empty-string and NaN cells become null so serialization emits a
/// database NULL. Everything else is type-inferred: integer, then
/// finite float, else the string preserved exactly.
fn normalize_cell(value: Value) -> Value {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() || trimmed == "NaN" || trimmed == "nan" {
                return Value::Null;
            }
            if let Ok(n) = trimmed.parse::<i64>() {
                return Value::Number(n.into());
            }
            if let Ok(f) = trimmed.parse::<f64>() {
                // from_f64 rejects non-finite values ("inf" and friends).
                return match Number::from_f64(f) {
                    Some(n) => Value::Number(n),
                    None => Value::Null,
                };
            }
            Value::String(s)
        }
        other => other,
    }
}

/// `20240115` -> "2024-01-15". Null passes through; anything that is
/// not a valid 8-digit YYYYMMDD encoding aborts the transform.
fn coerce_date(field: &str, value: Value) -> Result<Value> {
    let digits = match &value {
        Value::Null => return Ok(Value::Null),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.trim().to_string(),
        other => other.to_string(),
    };

    if digits.len() != 8 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(EtlError::DateFormatError {
            field: field.to_string(),
            value: digits,
        });
    }

    match NaiveDate::parse_from_str(&digits, "%Y%m%d") {
        Ok(date) => Ok(Value::String(date.format("%Y-%m-%d").to_string())),
        Err(_) => Err(EtlError::DateFormatError {
            field: field.to_string(),
            value: digits,
        }),
    }
}

/// Lossy narrowing for statistical count columns: null becomes 0,
/// fractional values truncate.
fn coerce_integer(field: &str, value: Value) -> Result<Value> {
    match value {
        Value::Null => Ok(Value::Number(0.into())),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(Value::Number(i.into()))
            } else if let Some(f) = n.as_f64() {
                Ok(Value::Number((f as i64).into()))
            } else {
                Err(EtlError::ProcessingError {
                    message: format!("field '{}' holds a non-integer number: {}", field, n),
                })
            }
        }
        other => Err(EtlError::ProcessingError {
            message: format!("field '{}' expects an integer, got {}", field, other),
        }),
    }
}
