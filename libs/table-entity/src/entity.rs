use crate::error::FieldError;
use crate::schema::EntitySchema;
use crate::value::EntityValue;

/// A struct the converter can map to and from a `Record`.
///
/// Normally generated with `#[derive(Entity)]`. `Default` supplies the
/// zero-valued instance that decoding fills in.
pub trait Entity: Default {
    fn schema() -> &'static EntitySchema;

    /// Current value of the field at `index`, already in column form.
    /// `None` means null.
    fn read_field(&self, index: usize) -> Result<Option<EntityValue>, FieldError>;

    /// Assign the field at `index` from a column value. `None` assigns null
    /// (or the zero value for non-`Option` fields).
    fn write_field(&mut self, index: usize, value: Option<EntityValue>) -> Result<(), FieldError>;
}
