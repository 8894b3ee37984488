//! Arena storage for the object model.
//!
//! Entities, scopes and instances live for the lifetime of the runtime and
//! are addressed by index, so class/singleton/iclass links never form
//! ownership cycles.

use serde::Deserialize;

use crate::runner::ds::entity::{Entity, EntityId, EntityKind};
use crate::runner::ds::error::RtError;
use crate::runner::ds::instance::{Instance, ObjectId};
use crate::runner::ds::scope::{Scope, ScopeId};

/// Configuration for the heap.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct HeapConfig {
    /// Maximum number of ordinary instances. None means unlimited.
    pub max_instances: Option<usize>,
}

impl HeapConfig {
    /// Create a new heap configuration with no instance limit.
    pub fn unlimited() -> Self {
        HeapConfig {
            max_instances: None,
        }
    }

    /// Create a new heap configuration with an instance limit.
    pub fn with_limit(max_instances: usize) -> Self {
        HeapConfig {
            max_instances: Some(max_instances),
        }
    }
}

#[derive(Debug)]
pub struct Heap {
    config: HeapConfig,
    entities: Vec<Entity>,
    scopes: Vec<Scope>,
    instances: Vec<Instance>,
}

impl Heap {
    pub fn new(config: HeapConfig) -> Self {
        Heap {
            config,
            entities: Vec::new(),
            scopes: Vec::new(),
            instances: Vec::new(),
        }
    }

    pub fn alloc_scope(&mut self, owner: Option<EntityId>, base: Option<ScopeId>) -> ScopeId {
        let id = ScopeId(self.scopes.len());
        self.scopes.push(Scope::new(owner, base));
        id
    }

    /// Allocate an entity together with its constant scope.
    pub fn alloc_entity(&mut self, kind: EntityKind, base: Option<ScopeId>) -> EntityId {
        let id = EntityId(self.entities.len());
        let scope = self.alloc_scope(Some(id), base);
        self.entities.push(Entity::new(id, kind, scope));
        id
    }

    /// Allocate an ordinary instance.
    ///
    /// Returns an error if the allocation would exceed the instance limit.
    pub fn alloc_instance(&mut self, class: EntityId) -> Result<ObjectId, RtError> {
        if !self.can_allocate(1) {
            return Err(RtError::HeapExhausted(self.instances.len()));
        }
        let id = ObjectId(self.instances.len());
        self.instances.push(Instance::new(class));
        Ok(id)
    }

    pub fn entity(&self, id: EntityId) -> &Entity {
        &self.entities[id.0]
    }

    pub fn entity_mut(&mut self, id: EntityId) -> &mut Entity {
        &mut self.entities[id.0]
    }

    pub fn scope(&self, id: ScopeId) -> &Scope {
        &self.scopes[id.0]
    }

    pub fn scope_mut(&mut self, id: ScopeId) -> &mut Scope {
        &mut self.scopes[id.0]
    }

    pub fn instance(&self, id: ObjectId) -> &Instance {
        &self.instances[id.0]
    }

    pub fn instance_mut(&mut self, id: ObjectId) -> &mut Instance {
        &mut self.instances[id.0]
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    pub fn instance_count(&self) -> usize {
        self.instances.len()
    }

    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }

    /// Check if `count` more instances fit.
    pub fn can_allocate(&self, count: usize) -> bool {
        if let Some(max) = self.config.max_instances {
            self.instances.len() + count <= max
        } else {
            true
        }
    }

    /// Get the remaining instance slots, if limited.
    pub fn available_instances(&self) -> Option<usize> {
        self.config
            .max_instances
            .map(|max| max.saturating_sub(self.instances.len()))
    }
}

impl Default for Heap {
    fn default() -> Self {
        Self::new(HeapConfig::default())
    }
}
