use std::collections::BTreeMap;
use std::collections::btree_map;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::ConvertError;
use crate::schema::{PARTITION_KEY, ROW_KEY};
use crate::value::{EdmType, EntityValue};

/// One stored row: the two keys plus a sparse set of typed columns.
///
/// Keys are always present. Columns iterate in name order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
    partition_key: String,
    row_key: String,
    columns: BTreeMap<String, EntityValue>,
}

impl Record {
    pub fn new(partition_key: impl Into<String>, row_key: impl Into<String>) -> Self {
        Self {
            partition_key: partition_key.into(),
            row_key: row_key.into(),
            columns: BTreeMap::new(),
        }
    }

    pub fn partition_key(&self) -> &str {
        &self.partition_key
    }

    pub fn row_key(&self) -> &str {
        &self.row_key
    }

    pub fn set_partition_key(&mut self, key: impl Into<String>) {
        self.partition_key = key.into();
    }

    pub fn set_row_key(&mut self, key: impl Into<String>) {
        self.row_key = key.into();
    }

    /// Insert a column, returning the previous value.
    ///
    /// The reserved key names are routed to the key fields and only accept text.
    pub fn insert(
        &mut self,
        column: impl Into<String>,
        value: impl Into<EntityValue>,
    ) -> Result<Option<EntityValue>, ConvertError> {
        let column = column.into();
        let value = value.into();
        let slot = if column == PARTITION_KEY {
            &mut self.partition_key
        } else if column == ROW_KEY {
            &mut self.row_key
        } else {
            return Ok(self.columns.insert(column, value));
        };
        match value {
            EntityValue::String(key) => {
                let previous = std::mem::replace(slot, key);
                Ok(Some(EntityValue::String(previous)))
            }
            other => Err(ConvertError::InvalidInput(format!(
                "{column} must be {}, found {}",
                EdmType::String,
                other.edm_type()
            ))),
        }
    }

    /// Column value. Key columns are not reachable here; use the key accessors.
    pub fn get(&self, column: &str) -> Option<&EntityValue> {
        self.columns.get(column)
    }

    pub fn remove(&mut self, column: &str) -> Option<EntityValue> {
        self.columns.remove(column)
    }

    /// True for the reserved key names and every stored column.
    pub fn contains_key(&self, column: &str) -> bool {
        column == PARTITION_KEY || column == ROW_KEY || self.columns.contains_key(column)
    }

    /// Number of non-key columns.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, EntityValue> {
        self.columns.iter()
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    pub fn get_string(&self, column: &str) -> Option<&str> {
        self.get(column).and_then(EntityValue::as_str)
    }

    pub fn get_bool(&self, column: &str) -> Option<bool> {
        self.get(column).and_then(EntityValue::as_bool)
    }

    pub fn get_i32(&self, column: &str) -> Option<i32> {
        self.get(column).and_then(EntityValue::as_i32)
    }

    pub fn get_i64(&self, column: &str) -> Option<i64> {
        self.get(column).and_then(EntityValue::as_i64)
    }

    pub fn get_f64(&self, column: &str) -> Option<f64> {
        self.get(column).and_then(EntityValue::as_f64)
    }

    pub fn get_datetime(&self, column: &str) -> Option<DateTime<Utc>> {
        self.get(column).and_then(EntityValue::as_datetime)
    }

    pub fn get_guid(&self, column: &str) -> Option<Uuid> {
        self.get(column).and_then(EntityValue::as_guid)
    }

    pub fn get_binary(&self, column: &str) -> Option<&[u8]> {
        self.get(column).and_then(EntityValue::as_binary)
    }
}

impl<'a> IntoIterator for &'a Record {
    type Item = (&'a String, &'a EntityValue);
    type IntoIter = btree_map::Iter<'a, String, EntityValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
