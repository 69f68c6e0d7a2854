//! A conversion context: a borrowed type system plus an owned reference table.
use crate::error::{Error, ResolveError};
use crate::objects::ReferenceTable;
use crate::serialization::{self, Direction, SerializerHost};
use crate::type_system::{EnumSymbols, TypeSystem};
use crate::types::{NamedType, OptionalValue};
use crate::value::Value;

/// Object identifiers are only meaningful within the session that issued
/// them. Not `Send`; build one per thread.
#[derive(Debug)]
pub struct Session<'t> {
    types: &'t TypeSystem,
    objects: ReferenceTable,
}

impl<'t> Session<'t> {
    pub fn new(types: &'t TypeSystem) -> Self {
        Self { types, objects: ReferenceTable::new() }
    }

    pub fn types(&self) -> &'t TypeSystem { self.types }

    pub fn process(&self, direction: Direction, value: &Value, ty: &OptionalValue, label: &str) -> Result<Value, Error> {
        serialization::process(self, direction, value, ty, label)
    }

    pub fn serialize(&self, value: &Value, ty: &OptionalValue, label: &str) -> Result<Value, Error> {
        self.process(Direction::Serialize, value, ty, label)
    }

    pub fn deserialize(&self, value: &Value, ty: &OptionalValue, label: &str) -> Result<Value, Error> {
        self.process(Direction::Deserialize, value, ty, label)
    }
}

impl SerializerHost for Session<'_> {
    fn lookup_type(&self, fqn: &str) -> Result<&NamedType, ResolveError> {
        self.types.lookup_type(fqn)
    }

    fn find_symbol(&self, fqn: &str) -> Result<&EnumSymbols, ResolveError> {
        self.types.find_symbol(fqn)
    }

    fn objects(&self) -> &ReferenceTable { &self.objects }

    fn debug(&self, message: &str) {
        tracing::debug!(target: "jsii_marshal::session", "{message}");
    }
}
