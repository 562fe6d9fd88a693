use std::sync::{Arc, LazyLock};

use tracing::{debug, trace};

use crate::config::ConverterConfig;
use crate::entity::Entity;
use crate::error::{ConvertError, FieldError};
use crate::keys::{KeySource, SystemKeys};
use crate::record::Record;
use crate::schema::{EntitySchema, FieldDescriptor, FieldRole, PARTITION_KEY, ROW_KEY};
use crate::validate;
use crate::value::EntityValue;

/// Maps `Entity` types to and from `Record`s.
///
/// Stateless apart from its configuration and key source; safe to share
/// between threads.
#[derive(Clone)]
pub struct EntityConverter {
    config: ConverterConfig,
    keys: Arc<dyn KeySource>,
}

impl Default for EntityConverter {
    fn default() -> Self {
        Self::new(ConverterConfig::default())
    }
}

impl std::fmt::Debug for EntityConverter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntityConverter")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl EntityConverter {
    pub fn new(config: ConverterConfig) -> Self {
        Self {
            keys: Arc::new(SystemKeys::new(config.clock)),
            config,
        }
    }

    /// Replace the source of synthesized keys (the configured clock is then unused).
    pub fn with_key_source(mut self, keys: impl KeySource + 'static) -> Self {
        self.keys = Arc::new(keys);
        self
    }

    pub fn config(&self) -> &ConverterConfig {
        &self.config
    }

    /// `encode` for a possibly absent entity. `None` is `InvalidInput`.
    pub fn encode_optional<T: Entity>(&self, entity: Option<&T>) -> Result<Record, ConvertError> {
        let entity = entity.ok_or_else(|| {
            ConvertError::InvalidInput(format!(
                "entity of type {} to encode cannot be null",
                T::schema().type_name
            ))
        })?;
        self.encode(entity)
    }

    /// Object → Record.
    ///
    /// Unset keys are synthesized, null optional fields are left out, values
    /// the store cannot hold natively become JSON text columns.
    pub fn encode<T: Entity>(&self, entity: &T) -> Result<Record, ConvertError> {
        let schema = T::schema();
        validate::key_fields(schema)?;

        let mut record = Record::default();
        for (index, field) in schema.fields.iter().enumerate() {
            if self.skips(field) {
                trace!(type_name = schema.type_name, field = field.name, "ignored field skipped");
                continue;
            }

            let value = entity
                .read_field(index)
                .map_err(|source| conversion_error(field, source))?;

            match field.role {
                FieldRole::PartitionKey => {
                    let key = key_text(field, value).unwrap_or_else(|| {
                        let key = self.keys.partition_key();
                        debug!(type_name = schema.type_name, partition_key = %key, "synthesized partition key");
                        key
                    });
                    record.set_partition_key(key);
                }
                FieldRole::RowKey => {
                    let key = key_text(field, value).unwrap_or_else(|| {
                        let key = self.keys.row_key();
                        debug!(type_name = schema.type_name, row_key = %key, "synthesized row key");
                        key
                    });
                    record.set_row_key(key);
                }
                FieldRole::Property => {
                    validate::check_required(schema, field, value.is_none())?;
                    match value {
                        Some(value) => {
                            if !field.kind.is_native() {
                                trace!(column = field.column, type_name = field.type_name, "stored as json text");
                            }
                            record.insert(field.column, value)?;
                        }
                        None => trace!(column = field.column, "null value omitted"),
                    }
                }
            }
        }

        debug!(
            type_name = schema.type_name,
            partition_key = record.partition_key(),
            row_key = record.row_key(),
            columns = record.len(),
            "encoded entity"
        );
        Ok(record)
    }

    /// Record → Object.
    ///
    /// Starts from `T::default()`. Absent columns read as null; a column that
    /// cannot be read as the declared type is a `Conversion` error.
    pub fn decode<T: Entity>(&self, record: &Record) -> Result<T, ConvertError> {
        let schema = T::schema();
        validate::key_fields(schema)?;

        let mut entity = T::default();
        for (index, field) in schema.fields.iter().enumerate() {
            if self.skips(field) {
                trace!(type_name = schema.type_name, field = field.name, "ignored field skipped");
                continue;
            }

            let value = match field.role {
                FieldRole::PartitionKey => Some(EntityValue::from(record.partition_key())),
                FieldRole::RowKey => Some(EntityValue::from(record.row_key())),
                FieldRole::Property => {
                    let value = record.get(field.column).cloned();
                    validate::check_required(schema, field, value.is_none())?;
                    value
                }
            };

            entity
                .write_field(index, value)
                .map_err(|source| conversion_error(field, source))?;
        }

        trace!(
            type_name = schema.type_name,
            partition_key = record.partition_key(),
            row_key = record.row_key(),
            "decoded entity"
        );
        Ok(entity)
    }

    /// Descriptor table for `T`, after checking it declares both keys.
    pub fn schema_of<T: Entity>(&self) -> Result<&'static EntitySchema, ConvertError> {
        let schema = T::schema();
        validate::key_fields(schema)?;
        Ok(schema)
    }

    /// Key fields are never skipped.
    fn skips(&self, field: &FieldDescriptor) -> bool {
        self.config.honor_ignore && field.ignored && field.role == FieldRole::Property
    }
}

/// Key value as text, `None` when unset.
///
/// An `Option<String>` key is unset only when `None`; `Some("")` is kept.
/// A bare `String` key cannot be null, so empty stands for unset.
fn key_text(field: &FieldDescriptor, value: Option<EntityValue>) -> Option<String> {
    match value {
        Some(EntityValue::String(key)) if field.optional || !key.is_empty() => Some(key),
        _ => None,
    }
}

fn conversion_error(field: &FieldDescriptor, source: FieldError) -> ConvertError {
    let column = match field.role {
        FieldRole::PartitionKey => PARTITION_KEY,
        FieldRole::RowKey => ROW_KEY,
        FieldRole::Property => field.column,
    };
    ConvertError::Conversion {
        column: column.to_string(),
        type_name: field.type_name.to_string(),
        source,
    }
}

static DEFAULT_CONVERTER: LazyLock<EntityConverter> = LazyLock::new(EntityConverter::default);

/// `encode` with the shared default converter.
pub fn encode<T: Entity>(entity: &T) -> Result<Record, ConvertError> {
    DEFAULT_CONVERTER.encode(entity)
}

/// `decode` with the shared default converter.
pub fn decode<T: Entity>(record: &Record) -> Result<T, ConvertError> {
    DEFAULT_CONVERTER.decode(record)
}
