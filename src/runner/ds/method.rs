//! Method handlers and per-entity method tables.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::runner::ds::entity::EntityId;
use crate::runner::ds::error::CallResult;
use crate::runner::ds::value::{Proc, Value};
use crate::runner::model::Runtime;
use crate::runner::plugin::types::NativeFn;

pub type ClosureFn = dyn Fn(&mut Runtime, Value, Vec<Value>, Option<Proc>) -> CallResult;

/// The callable part of a method.
pub enum MethodBody {
    /// Direct function pointer for compiled-in methods.
    Native(NativeFn),
    /// Capturing closure, used by guest code.
    Closure(Box<ClosureFn>),
    /// Stub placeholder for the named method: calls take the
    /// unresolved-method path.
    Unresolved(String),
}

impl MethodBody {
    pub fn native(f: NativeFn) -> Rc<MethodBody> {
        Rc::new(MethodBody::Native(f))
    }

    pub fn closure<F>(f: F) -> Rc<MethodBody>
    where
        F: Fn(&mut Runtime, Value, Vec<Value>, Option<Proc>) -> CallResult + 'static,
    {
        Rc::new(MethodBody::Closure(Box::new(f)))
    }

    pub fn call(
        &self,
        rt: &mut Runtime,
        this: Value,
        args: Vec<Value>,
        block: Option<Proc>,
    ) -> CallResult {
        match self {
            MethodBody::Native(f) => f(rt, this, args, block),
            MethodBody::Closure(f) => f(rt, this, args, block),
            MethodBody::Unresolved(name) => rt.method_missing(this, name, args, block),
        }
    }
}

/// A handler installed in a method table.
///
/// Copies made by donation share `body` with the original; handler identity
/// is body identity.
#[derive(Clone)]
pub struct MethodEntry {
    pub(crate) name: String,
    pub(crate) body: Rc<MethodBody>,
    pub(crate) owner: EntityId,
    /// The entity this copy was donated from.
    pub(crate) donated: Option<EntityId>,
}

impl MethodEntry {
    pub fn new(name: impl Into<String>, body: Rc<MethodBody>, owner: EntityId) -> Self {
        MethodEntry {
            name: name.into(),
            body,
            owner,
            donated: None,
        }
    }

    pub(crate) fn new_stub(name: impl Into<String>, owner: EntityId) -> Self {
        let name = name.into();
        let body = Rc::new(MethodBody::Unresolved(name.clone()));
        MethodEntry::new(name, body, owner)
    }

    /// Copy of this handler marked as donated by `donor`.
    pub(crate) fn donated_by(&self, donor: EntityId) -> Self {
        MethodEntry {
            donated: Some(donor),
            ..self.clone()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn body(&self) -> &Rc<MethodBody> {
        &self.body
    }

    /// Entity the handler was originally defined on.
    pub fn owner(&self) -> EntityId {
        self.owner
    }

    pub fn donated(&self) -> Option<EntityId> {
        self.donated
    }

    pub fn is_stub(&self) -> bool {
        matches!(*self.body, MethodBody::Unresolved(_))
    }

    /// Declared on the table's entity itself: neither donated nor a stub.
    pub fn is_direct(&self) -> bool {
        self.donated.is_none() && !self.is_stub()
    }

    pub fn same_handler(&self, other: &MethodEntry) -> bool {
        Rc::ptr_eq(&self.body, &other.body)
    }
}

impl fmt::Debug for MethodEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodEntry")
            .field("name", &self.name)
            .field("owner", &self.owner)
            .field("donated", &self.donated)
            .field("stub", &self.is_stub())
            .finish()
    }
}

/// Name to handler map plus the ordered list of names the entity owns directly.
#[derive(Clone, Default)]
pub struct MethodTable {
    entries: HashMap<String, MethodEntry>,
    owned: Vec<String>,
}

impl MethodTable {
    pub fn new() -> Self {
        MethodTable {
            entries: HashMap::new(),
            owned: Vec::new(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&MethodEntry> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn has_direct(&self, name: &str) -> bool {
        self.entries.get(name).map_or(false, MethodEntry::is_direct)
    }

    /// Install a directly declared handler.
    pub(crate) fn insert_owned(&mut self, entry: MethodEntry) {
        if !self.owned.iter().any(|n| *n == entry.name) {
            self.owned.push(entry.name.clone());
        }
        self.entries.insert(entry.name.clone(), entry);
    }

    /// Install a donated copy or a stub. Ownership is unchanged.
    pub(crate) fn insert_copy(&mut self, entry: MethodEntry) {
        self.entries.insert(entry.name.clone(), entry);
    }

    pub(crate) fn remove(&mut self, name: &str) -> Option<MethodEntry> {
        self.owned.retain(|n| n != name);
        self.entries.remove(name)
    }

    /// Names declared on this entity, in declaration order.
    pub fn owned_names(&self) -> &[String] {
        &self.owned
    }

    pub fn names(&self) -> impl Iterator<Item = &String> {
        self.entries.keys()
    }

    pub fn entries(&self) -> impl Iterator<Item = &MethodEntry> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
