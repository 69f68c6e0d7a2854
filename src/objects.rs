//! Identity table for native objects crossing the boundary.
use std::cell::RefCell;
use std::collections::HashMap;

use indexmap::IndexMap;

use crate::value::{NativeObject, ObjectRef};

const FIRST_SERIAL: u64 = 10_000;

/// Maps stable identifiers to live native handles and back.
///
/// Not `Sync`: registration is a check-then-insert. Concurrent callers must
/// either own separate tables or serialize access themselves.
#[derive(Debug)]
pub struct ReferenceTable {
    inner: RefCell<Inner>,
}

#[derive(Debug)]
struct Inner {
    next_serial: u64,
    by_id: IndexMap<String, ObjectRef>,
    by_handle: HashMap<*const NativeObject, String>,
}

impl ReferenceTable {
    pub fn new() -> Self {
        Self {
            inner: RefCell::new(Inner {
                next_serial: FIRST_SERIAL,
                by_id: IndexMap::new(),
                by_handle: HashMap::new(),
            }),
        }
    }

    /// Returns the handle's identifier, assigning `<fqn>@<serial>` on first
    /// sighting. The table keeps a clone of the handle alive, so addresses
    /// cannot be reused while the entry exists.
    pub fn register_or_lookup(&self, handle: &ObjectRef) -> String {
        let mut inner = self.inner.borrow_mut();
        if let Some(id) = inner.by_handle.get(&handle.addr()) {
            return id.clone();
        }
        let id = format!("{}@{}", handle.fqn(), inner.next_serial);
        inner.next_serial += 1;
        inner.by_handle.insert(handle.addr(), id.clone());
        inner.by_id.insert(id.clone(), handle.clone());
        id
    }

    pub fn resolve(&self, id: &str) -> Option<ObjectRef> {
        self.inner.borrow().by_id.get(id).cloned()
    }

    /// Interfaces advertised for a registered identifier.
    pub fn interfaces_of(&self, id: &str) -> Option<Vec<String>> {
        self.inner.borrow().by_id.get(id).map(|obj| obj.interfaces().to_vec())
    }

    pub fn len(&self) -> usize { self.inner.borrow().by_id.len() }

    pub fn is_empty(&self) -> bool { self.len() == 0 }
}

impl Default for ReferenceTable {
    fn default() -> Self { Self::new() }
}
