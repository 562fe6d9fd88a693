//! Typed field accessors.
//!
//! `#[derive(Entity)]` picks one read/write pair per field, depending on
//! whether the declared type is native (`Property`) or falls back to JSON,
//! and whether it is wrapped in `Option`.

use chrono::{DateTime, TimeZone, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::codec;
use crate::error::FieldError;
use crate::value::{EdmType, EntityValue};

/// A Rust type stored natively in a single column.
pub trait Property: Sized {
    const EDM_TYPE: EdmType;

    fn to_value(&self) -> EntityValue;

    /// Typed accessor. Fails when the column holds an incompatible kind.
    fn from_value(value: EntityValue) -> Result<Self, FieldError>;
}

fn mismatch(expected: EdmType, value: &EntityValue) -> FieldError {
    FieldError::TypeMismatch { expected, found: value.edm_type() }
}

impl Property for String {
    const EDM_TYPE: EdmType = EdmType::String;

    fn to_value(&self) -> EntityValue {
        EntityValue::String(self.clone())
    }

    fn from_value(value: EntityValue) -> Result<Self, FieldError> {
        match value {
            EntityValue::String(s) => Ok(s),
            other => Err(mismatch(Self::EDM_TYPE, &other)),
        }
    }
}

impl Property for bool {
    const EDM_TYPE: EdmType = EdmType::Boolean;

    fn to_value(&self) -> EntityValue {
        EntityValue::Boolean(*self)
    }

    fn from_value(value: EntityValue) -> Result<Self, FieldError> {
        value.as_bool().ok_or_else(|| mismatch(Self::EDM_TYPE, &value))
    }
}

impl Property for i32 {
    const EDM_TYPE: EdmType = EdmType::Int32;

    fn to_value(&self) -> EntityValue {
        EntityValue::Int32(*self)
    }

    fn from_value(value: EntityValue) -> Result<Self, FieldError> {
        value.as_i32().ok_or_else(|| mismatch(Self::EDM_TYPE, &value))
    }
}

impl Property for i64 {
    const EDM_TYPE: EdmType = EdmType::Int64;

    fn to_value(&self) -> EntityValue {
        EntityValue::Int64(*self)
    }

    fn from_value(value: EntityValue) -> Result<Self, FieldError> {
        value.as_i64().ok_or_else(|| mismatch(Self::EDM_TYPE, &value))
    }
}

impl Property for f64 {
    const EDM_TYPE: EdmType = EdmType::Double;

    fn to_value(&self) -> EntityValue {
        EntityValue::Double(*self)
    }

    fn from_value(value: EntityValue) -> Result<Self, FieldError> {
        value.as_f64().ok_or_else(|| mismatch(Self::EDM_TYPE, &value))
    }
}

impl Property for Uuid {
    const EDM_TYPE: EdmType = EdmType::Guid;

    fn to_value(&self) -> EntityValue {
        EntityValue::Guid(*self)
    }

    fn from_value(value: EntityValue) -> Result<Self, FieldError> {
        value.as_guid().ok_or_else(|| mismatch(Self::EDM_TYPE, &value))
    }
}

impl Property for Vec<u8> {
    const EDM_TYPE: EdmType = EdmType::Binary;

    fn to_value(&self) -> EntityValue {
        EntityValue::Binary(self.clone())
    }

    fn from_value(value: EntityValue) -> Result<Self, FieldError> {
        match value {
            EntityValue::Binary(b) => Ok(b),
            other => Err(mismatch(Self::EDM_TYPE, &other)),
        }
    }
}

/// Date-times of any zone are normalized to UTC on the way in and
/// converted back into the declared zone on the way out.
impl<Tz: TimeZone> Property for DateTime<Tz>
where
    DateTime<Tz>: From<DateTime<Utc>>,
{
    const EDM_TYPE: EdmType = EdmType::DateTime;

    fn to_value(&self) -> EntityValue {
        EntityValue::DateTime(self.with_timezone(&Utc))
    }

    fn from_value(value: EntityValue) -> Result<Self, FieldError> {
        value
            .as_datetime()
            .map(DateTime::<Tz>::from)
            .ok_or_else(|| mismatch(Self::EDM_TYPE, &value))
    }
}

// ---------------------------------------------------------------------------
// Read: field → optional column value
// ---------------------------------------------------------------------------

pub fn read_native<T: Property>(field: &T) -> Result<Option<EntityValue>, FieldError> {
    Ok(Some(field.to_value()))
}

pub fn read_native_opt<T: Property>(field: &Option<T>) -> Result<Option<EntityValue>, FieldError> {
    Ok(field.as_ref().map(T::to_value))
}

pub fn read_json<T: Serialize>(field: &T) -> Result<Option<EntityValue>, FieldError> {
    Ok(Some(EntityValue::String(codec::to_text(field)?)))
}

pub fn read_json_opt<T: Serialize>(field: &Option<T>) -> Result<Option<EntityValue>, FieldError> {
    match field {
        Some(v) => read_json(v),
        None => Ok(None),
    }
}

// ---------------------------------------------------------------------------
// Write: optional column value → field. `None` resets to the zero value.
// ---------------------------------------------------------------------------

pub fn write_native<T: Property + Default>(
    field: &mut T,
    value: Option<EntityValue>,
) -> Result<(), FieldError> {
    *field = match value {
        Some(v) => T::from_value(v)?,
        None => T::default(),
    };
    Ok(())
}

pub fn write_native_opt<T: Property>(
    field: &mut Option<T>,
    value: Option<EntityValue>,
) -> Result<(), FieldError> {
    *field = value.map(T::from_value).transpose()?;
    Ok(())
}

pub fn write_json<T: DeserializeOwned + Default>(
    field: &mut T,
    value: Option<EntityValue>,
) -> Result<(), FieldError> {
    *field = match value {
        Some(v) => codec::from_text(json_text(&v)?)?,
        None => T::default(),
    };
    Ok(())
}

pub fn write_json_opt<T: DeserializeOwned>(
    field: &mut Option<T>,
    value: Option<EntityValue>,
) -> Result<(), FieldError> {
    *field = match value {
        Some(v) => Some(codec::from_text(json_text(&v)?)?),
        None => None,
    };
    Ok(())
}

/// JSON-fallback columns must be text.
fn json_text(value: &EntityValue) -> Result<&str, FieldError> {
    value.as_str().ok_or_else(|| mismatch(EdmType::String, value))
}
