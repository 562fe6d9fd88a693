use crate::value::EdmType;

/// Reserved column holding the partition key.
pub const PARTITION_KEY: &str = "PartitionKey";
/// Reserved column holding the row key.
pub const ROW_KEY: &str = "RowKey";

/// How a field's value reaches its column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Stored as-is in a column of this type.
    Native(EdmType),
    /// Stored as a `String` column holding JSON text.
    Json,
}

impl FieldKind {
    pub fn is_native(self) -> bool {
        matches!(self, FieldKind::Native(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldRole {
    PartitionKey,
    RowKey,
    Property,
}

/// A single declared field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Rust field name.
    pub name: &'static str,
    /// Column name in the record. Unused for key fields.
    pub column: &'static str,
    /// Declared type as written in the struct (for error messages).
    pub type_name: &'static str,
    pub kind: FieldKind,
    /// Declared as `Option<_>`.
    pub optional: bool,
    pub role: FieldRole,
    pub required: bool,
    pub ignored: bool,
}

/// Per-type descriptor table. Built once by `#[derive(Entity)]`.
///
/// Field position in `fields` is the index passed to
/// `Entity::read_field` / `Entity::write_field`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntitySchema {
    pub type_name: &'static str,
    pub fields: &'static [FieldDescriptor],
}

impl EntitySchema {
    pub fn position(&self, role: FieldRole) -> Option<usize> {
        self.fields.iter().position(|f| f.role == role)
    }
}
