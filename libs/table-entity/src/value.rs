use std::fmt;

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Column types the table store holds without any encoding.
///
/// Anything else is persisted as a `String` column carrying JSON text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdmType {
    Binary,
    Boolean,
    /// Always UTC once stored.
    DateTime,
    Double,
    Guid,
    Int32,
    Int64,
    String,
}

impl EdmType {
    /// Name used in `@odata.type` annotations.
    pub fn odata_name(self) -> &'static str {
        match self {
            EdmType::Binary => "Edm.Binary",
            EdmType::Boolean => "Edm.Boolean",
            EdmType::DateTime => "Edm.DateTime",
            EdmType::Double => "Edm.Double",
            EdmType::Guid => "Edm.Guid",
            EdmType::Int32 => "Edm.Int32",
            EdmType::Int64 => "Edm.Int64",
            EdmType::String => "Edm.String",
        }
    }

    pub fn from_odata_name(name: &str) -> Option<Self> {
        let ty = match name {
            "Edm.Binary" => EdmType::Binary,
            "Edm.Boolean" => EdmType::Boolean,
            "Edm.DateTime" => EdmType::DateTime,
            "Edm.Double" => EdmType::Double,
            "Edm.Guid" => EdmType::Guid,
            "Edm.Int32" => EdmType::Int32,
            "Edm.Int64" => EdmType::Int64,
            "Edm.String" => EdmType::String,
            _ => return None,
        };
        Some(ty)
    }
}

impl fmt::Display for EdmType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.odata_name())
    }
}

/// A single typed column value.
#[derive(Debug, Clone, PartialEq)]
pub enum EntityValue {
    Binary(Vec<u8>),
    Boolean(bool),
    DateTime(DateTime<Utc>),
    Double(f64),
    Guid(Uuid),
    Int32(i32),
    Int64(i64),
    String(String),
}

impl EntityValue {
    pub fn edm_type(&self) -> EdmType {
        match self {
            EntityValue::Binary(_) => EdmType::Binary,
            EntityValue::Boolean(_) => EdmType::Boolean,
            EntityValue::DateTime(_) => EdmType::DateTime,
            EntityValue::Double(_) => EdmType::Double,
            EntityValue::Guid(_) => EdmType::Guid,
            EntityValue::Int32(_) => EdmType::Int32,
            EntityValue::Int64(_) => EdmType::Int64,
            EntityValue::String(_) => EdmType::String,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            EntityValue::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            EntityValue::Boolean(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_i32(&self) -> Option<i32> {
        match self {
            EntityValue::Int32(v) => Some(*v),
            _ => None,
        }
    }

    /// Accepts `Int32` as well; widening is lossless.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            EntityValue::Int64(v) => Some(*v),
            EntityValue::Int32(v) => Some(i64::from(*v)),
            _ => None,
        }
    }

    /// Accepts `Int32` as well; widening is lossless.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            EntityValue::Double(v) => Some(*v),
            EntityValue::Int32(v) => Some(f64::from(*v)),
            _ => None,
        }
    }

    pub fn as_datetime(&self) -> Option<DateTime<Utc>> {
        match self {
            EntityValue::DateTime(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_guid(&self) -> Option<Uuid> {
        match self {
            EntityValue::Guid(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_binary(&self) -> Option<&[u8]> {
        match self {
            EntityValue::Binary(v) => Some(v.as_slice()),
            _ => None,
        }
    }
}

impl From<&str> for EntityValue {
    fn from(v: &str) -> Self {
        EntityValue::String(v.to_string())
    }
}

impl From<String> for EntityValue {
    fn from(v: String) -> Self {
        EntityValue::String(v)
    }
}

impl From<bool> for EntityValue {
    fn from(v: bool) -> Self {
        EntityValue::Boolean(v)
    }
}

impl From<i32> for EntityValue {
    fn from(v: i32) -> Self {
        EntityValue::Int32(v)
    }
}

impl From<i64> for EntityValue {
    fn from(v: i64) -> Self {
        EntityValue::Int64(v)
    }
}

impl From<f64> for EntityValue {
    fn from(v: f64) -> Self {
        EntityValue::Double(v)
    }
}

impl From<Uuid> for EntityValue {
    fn from(v: Uuid) -> Self {
        EntityValue::Guid(v)
    }
}

impl From<DateTime<Utc>> for EntityValue {
    fn from(v: DateTime<Utc>) -> Self {
        EntityValue::DateTime(v)
    }
}

impl From<Vec<u8>> for EntityValue {
    fn from(v: Vec<u8>) -> Self {
        EntityValue::Binary(v)
    }
}
