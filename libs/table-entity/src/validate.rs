use crate::error::ConvertError;
use crate::schema::{EntitySchema, FieldDescriptor, FieldRole};

/// Positions of the two key fields in a schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyFields {
    pub partition_key: usize,
    pub row_key: usize,
}

/// Both key fields must be declared before any per-field work happens.
pub fn key_fields(schema: &EntitySchema) -> Result<KeyFields, ConvertError> {
    match (schema.position(FieldRole::PartitionKey), schema.position(FieldRole::RowKey)) {
        (Some(partition_key), Some(row_key)) => Ok(KeyFields { partition_key, row_key }),
        _ => Err(ConvertError::Schema { type_name: schema.type_name.to_string() }),
    }
}

/// Required fields are never persisted or reconstructed as null.
pub fn check_required(
    schema: &EntitySchema,
    field: &FieldDescriptor,
    is_null: bool,
) -> Result<(), ConvertError> {
    if is_null && field.required {
        return Err(ConvertError::Validation {
            field: field.name.to_string(),
            type_name: schema.type_name.to_string(),
        });
    }
    Ok(())
}
