use std::collections::HashMap;

use crate::runner::ds::entity::EntityId;
use crate::runner::ds::value::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeId(pub(crate) usize);

/// Constant scope of one entity, chained to its enclosing scope.
#[derive(Debug)]
pub struct Scope {
    pub(crate) owner: Option<EntityId>,
    pub(crate) base: Option<ScopeId>,
    pub(crate) constants: HashMap<String, Value>,
    /// Constants declared here (not copied in), in declaration order.
    pub(crate) declared: Vec<String>,
}

impl Scope {
    pub fn new(owner: Option<EntityId>, base: Option<ScopeId>) -> Self {
        Scope {
            owner,
            base,
            constants: HashMap::new(),
            declared: Vec::new(),
        }
    }

    pub fn owner(&self) -> Option<EntityId> {
        self.owner
    }

    pub fn base(&self) -> Option<ScopeId> {
        self.base
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.constants.get(name)
    }

    pub fn has_declared(&self, name: &str) -> bool {
        self.declared.iter().any(|n| n == name)
    }

    pub fn declared(&self) -> &[String] {
        &self.declared
    }

    pub(crate) fn declare(&mut self, name: &str, value: Value) {
        if !self.has_declared(name) {
            self.declared.push(name.to_string());
        }
        self.constants.insert(name.to_string(), value);
    }

    /// Insert a copy without claiming the name; never shadows a local declaration.
    pub(crate) fn inherit(&mut self, name: &str, value: Value) {
        if !self.has_declared(name) {
            self.constants.insert(name.to_string(), value);
        }
    }
}
