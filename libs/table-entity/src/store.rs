//! Table store seam.
//!
//! The converter never talks to the service itself; callers hand records to
//! whatever implements `TableStore`. `MemoryTable` stands in for the service.

use std::collections::BTreeMap;
use std::sync::RwLock;

use tracing::debug;

use crate::converter::EntityConverter;
use crate::entity::Entity;
use crate::error::ConvertError;
use crate::record::Record;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error(transparent)]
    Convert(#[from] ConvertError),

    #[error("table lock poisoned")]
    Poisoned,
}

/// Point reads and insert-or-replace writes, addressed by partition and row key.
pub trait TableStore: Send + Sync {
    fn get(&self, partition_key: &str, row_key: &str) -> Result<Option<Record>, StoreError>;

    /// Insert or replace the record stored under its keys.
    fn put(&self, record: Record) -> Result<(), StoreError>;
}

/// Encode `entity` and store it. Returns the stored record (with any synthesized keys).
pub fn put_entity<S, T>(
    store: &S,
    converter: &EntityConverter,
    entity: &T,
) -> Result<Record, StoreError>
where
    S: TableStore + ?Sized,
    T: Entity,
{
    let record = converter.encode(entity)?;
    store.put(record.clone())?;
    Ok(record)
}

/// Fetch and decode. `Ok(None)` when nothing is stored under the keys.
pub fn get_entity<S, T>(
    store: &S,
    converter: &EntityConverter,
    partition_key: &str,
    row_key: &str,
) -> Result<Option<T>, StoreError>
where
    S: TableStore + ?Sized,
    T: Entity,
{
    match store.get(partition_key, row_key)? {
        Some(record) => Ok(Some(converter.decode(&record)?)),
        None => Ok(None),
    }
}

/// In-memory table keyed by `(partition_key, row_key)`.
#[derive(Debug, Default)]
pub struct MemoryTable {
    rows: RwLock<BTreeMap<(String, String), Record>>,
}

impl MemoryTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> Result<usize, StoreError> {
        Ok(self.rows.read().map_err(|_| StoreError::Poisoned)?.len())
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }
}

impl TableStore for MemoryTable {
    fn get(&self, partition_key: &str, row_key: &str) -> Result<Option<Record>, StoreError> {
        let rows = self.rows.read().map_err(|_| StoreError::Poisoned)?;
        Ok(rows
            .get(&(partition_key.to_string(), row_key.to_string()))
            .cloned())
    }

    fn put(&self, record: Record) -> Result<(), StoreError> {
        let key = (record.partition_key().to_string(), record.row_key().to_string());
        let mut rows = self.rows.write().map_err(|_| StoreError::Poisoned)?;
        let replaced = rows.insert(key, record).is_some();
        debug!(rows = rows.len(), replaced, "stored record");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn put_replaces_by_key() {
        let table = MemoryTable::new();
        let mut record = Record::new("p", "r");
        record.insert("n", 1_i32).unwrap();
        table.put(record.clone()).unwrap();

        record.insert("n", 2_i32).unwrap();
        table.put(record).unwrap();

        assert_eq!(table.len().unwrap(), 1);
        let stored = table.get("p", "r").unwrap().unwrap();
        assert_eq!(stored.get_i32("n"), Some(2));
    }

    #[test]
    fn missing_row_is_none() {
        let table = MemoryTable::new();
        assert!(table.is_empty().unwrap());
        assert!(table.get("p", "r").unwrap().is_none());
    }
}
