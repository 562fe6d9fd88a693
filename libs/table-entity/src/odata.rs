//! Table service JSON entity payloads.
//!
//! Strings, booleans, Int32 and fractional doubles travel as plain JSON.
//! Int64, DateTime, Guid, Binary and whole-number doubles carry a
//! `"<column>@odata.type"` annotation and travel as strings.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Number, Value};
use uuid::Uuid;

use crate::error::ConvertError;
use crate::record::Record;
use crate::schema::{PARTITION_KEY, ROW_KEY};
use crate::value::{EdmType, EntityValue};

const TYPE_SUFFIX: &str = "@odata.type";
const METADATA_PREFIX: &str = "odata.";

impl Record {
    /// Serialize into the service's JSON entity payload.
    pub fn to_odata(&self) -> Value {
        let mut out = Map::new();
        out.insert(PARTITION_KEY.to_string(), Value::String(self.partition_key().to_string()));
        out.insert(ROW_KEY.to_string(), Value::String(self.row_key().to_string()));

        for (column, value) in self {
            let (json, annotated) = to_json(value);
            if annotated {
                out.insert(
                    format!("{column}{TYPE_SUFFIX}"),
                    Value::String(value.edm_type().odata_name().to_string()),
                );
            }
            out.insert(column.clone(), json);
        }
        Value::Object(out)
    }

    /// Parse a JSON entity payload. `odata.*` metadata and null properties are dropped.
    pub fn from_odata(payload: &Value) -> Result<Self, ConvertError> {
        let Value::Object(map) = payload else {
            return Err(invalid("entity payload must be a JSON object"));
        };

        let key = |name: &str| -> Result<String, ConvertError> {
            match map.get(name) {
                Some(Value::String(s)) => Ok(s.clone()),
                Some(_) => Err(invalid(format!("{name} must be a string"))),
                None => Err(invalid(format!("missing {name}"))),
            }
        };
        let mut record = Record::new(key(PARTITION_KEY)?, key(ROW_KEY)?);

        for (name, json) in map {
            if name == PARTITION_KEY
                || name == ROW_KEY
                || name.starts_with(METADATA_PREFIX)
                || name.ends_with(TYPE_SUFFIX)
                || json.is_null()
            {
                continue;
            }

            let annotation = match map.get(&format!("{name}{TYPE_SUFFIX}")) {
                Some(Value::String(type_name)) => Some(
                    EdmType::from_odata_name(type_name)
                        .ok_or_else(|| invalid(format!("unsupported type '{type_name}'")))?,
                ),
                Some(_) => return Err(invalid("type annotation must be a string")),
                None => None,
            };

            let value = match annotation {
                Some(ty) => from_annotated(ty, json),
                None => from_plain(json),
            }
            .map_err(|e| e.with_context(format!("column '{name}'")))?;
            record.insert(name.clone(), value)?;
        }
        Ok(record)
    }
}

/// JSON form and whether it needs a type annotation.
fn to_json(value: &EntityValue) -> (Value, bool) {
    match value {
        EntityValue::String(s) => (Value::String(s.clone()), false),
        EntityValue::Boolean(b) => (Value::Bool(*b), false),
        EntityValue::Int32(i) => (Value::from(*i), false),
        EntityValue::Double(f) => match Number::from_f64(*f) {
            Some(n) => (Value::Number(n), f.fract() == 0.0),
            None => (Value::String(non_finite_name(*f).to_string()), true),
        },
        EntityValue::Int64(i) => (Value::String(i.to_string()), true),
        EntityValue::DateTime(dt) => {
            (Value::String(dt.to_rfc3339_opts(SecondsFormat::AutoSi, true)), true)
        }
        EntityValue::Guid(g) => (Value::String(g.to_string()), true),
        EntityValue::Binary(b) => (Value::String(STANDARD.encode(b)), true),
    }
}

fn non_finite_name(f: f64) -> &'static str {
    if f.is_nan() {
        "NaN"
    } else if f.is_sign_positive() {
        "Infinity"
    } else {
        "-Infinity"
    }
}

fn from_annotated(ty: EdmType, json: &Value) -> Result<EntityValue, ConvertError> {
    let mismatch = || invalid(format!("value {json} is not a valid {ty}"));
    let value = match (ty, json) {
        (EdmType::String, Value::String(s)) => EntityValue::String(s.clone()),
        (EdmType::Boolean, Value::Bool(b)) => EntityValue::Boolean(*b),
        (EdmType::Int32, Value::Number(n)) => n
            .as_i64()
            .and_then(|i| i32::try_from(i).ok())
            .map(EntityValue::Int32)
            .ok_or_else(mismatch)?,
        (EdmType::Int64, Value::String(s)) => {
            EntityValue::Int64(s.parse().map_err(|_| mismatch())?)
        }
        (EdmType::Double, Value::Number(n)) => {
            EntityValue::Double(n.as_f64().ok_or_else(mismatch)?)
        }
        (EdmType::Double, Value::String(s)) => EntityValue::Double(match s.as_str() {
            "NaN" => f64::NAN,
            "Infinity" => f64::INFINITY,
            "-Infinity" => f64::NEG_INFINITY,
            other => other.parse().map_err(|_| mismatch())?,
        }),
        (EdmType::DateTime, Value::String(s)) => EntityValue::DateTime(
            DateTime::parse_from_rfc3339(s)
                .map_err(|_| mismatch())?
                .with_timezone(&Utc),
        ),
        (EdmType::Guid, Value::String(s)) => {
            EntityValue::Guid(Uuid::parse_str(s).map_err(|_| mismatch())?)
        }
        (EdmType::Binary, Value::String(s)) => {
            EntityValue::Binary(STANDARD.decode(s).map_err(|_| mismatch())?)
        }
        _ => return Err(mismatch()),
    };
    Ok(value)
}

fn from_plain(json: &Value) -> Result<EntityValue, ConvertError> {
    match json {
        Value::String(s) => Ok(EntityValue::String(s.clone())),
        Value::Bool(b) => Ok(EntityValue::Boolean(*b)),
        Value::Number(n) => match n.as_i64() {
            Some(i) => Ok(i32::try_from(i).map_or(EntityValue::Int64(i), EntityValue::Int32)),
            None => n
                .as_f64()
                .map(EntityValue::Double)
                .ok_or_else(|| invalid(format!("number {n} out of range"))),
        },
        other => Err(invalid(format!("unsupported property value {other}"))),
    }
}

fn invalid(msg: impl Into<String>) -> ConvertError {
    ConvertError::InvalidInput(msg.into())
}
