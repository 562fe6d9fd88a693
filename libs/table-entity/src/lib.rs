//! Map plain structs to and from wide-column table-store records.
//!
//! ```ignore
//! use table_entity::{Entity, decode, encode};
//!
//! #[derive(Entity, Default)]
//! struct Book {
//!     partition_key: Option<String>,
//!     row_key: Option<String>,
//!     #[entity(required)]
//!     title: Option<String>,
//!     chapters: Option<Vec<Chapter>>,
//! }
//!
//! let record = encode(&book)?;
//! let back: Book = decode(&record)?;
//! ```

// Lets `#[derive(Entity)]` resolve `table_entity::` paths inside this crate too.
extern crate self as table_entity;

pub mod codec;
pub mod config;
pub mod converter;
pub mod entity;
pub mod error;
pub mod field;
pub mod keys;
pub mod odata;
pub mod record;
pub mod schema;
pub mod store;
pub mod validate;
pub mod value;

pub use table_entity_derive::Entity;

pub use config::{ClockZone, ConverterConfig};
pub use converter::{EntityConverter, decode, encode};
pub use entity::Entity;
pub use error::{ConvertError, ErrorKind, FieldError};
pub use keys::KeySource;
pub use record::Record;
pub use store::{MemoryTable, StoreError, TableStore};
pub use value::{EdmType, EntityValue};
