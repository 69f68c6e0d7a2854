//! Value marshalling between host form and the jsii wire form.
//!
//! A [`Session`] converts one value at a time against a declared
//! [`OptionalValue`], resolving named types through a shared [`TypeSystem`]
//! and tracking native objects in its own reference table. Shape failures
//! come back as a [`SerializationError`] whose `Display` is the full
//! diagnostic tree.
pub mod cli;
pub mod diagnostics;
pub mod error;
pub mod jq_exec;
pub mod objects;
pub mod path_de;
pub mod serialization;
pub mod session;
pub mod type_system;
pub mod types;
pub mod value;
pub mod wire;

pub use error::{Error, LoadError, ResolveError, SerializationError};
pub use serialization::{process, Direction, SerializerHost};
pub use session::Session;
pub use type_system::{EnumSymbols, TypeSystem};
pub use types::{NamedType, OptionalValue, PrimitiveKind, TypeRef};
pub use value::{NativeObject, ObjectRef, Value};
