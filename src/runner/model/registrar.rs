//! Class/module registration and the constant namespace.

use log::{debug, trace};

use super::Runtime;
use crate::parser::NameParser;
use crate::runner::ds::entity::{EntityId, EntityKind};
use crate::runner::ds::error::RtError;
use crate::runner::ds::scope::ScopeId;
use crate::runner::ds::value::Value;

/// What an existing constant means for a `class`/`module` statement.
enum Existing {
    /// Nothing declared here (or an alias of an entity declared elsewhere).
    Absent,
    /// An entity originally declared in this scope: reopen it.
    Entity(EntityId),
    /// A declared constant holding something else.
    Other,
}

impl Runtime {
    /// `class name < superclass` inside `base`.
    ///
    /// Reopens the class when `base` already declared it, otherwise creates
    /// it. `superclass: None` means "not specified": no mismatch check when
    /// reopening, `Object` when creating.
    pub fn define_class(
        &mut self,
        base: EntityId,
        superclass: Option<EntityId>,
        name: &str,
    ) -> Result<EntityId, RtError> {
        NameParser::check_constant_name(name)?;

        match self.existing_constant(base, name) {
            Existing::Entity(id) => {
                if !self.entity(id).is_class() {
                    return Err(RtError::KindMismatch {
                        name: self.entity_name(id),
                        expected: "class",
                    });
                }
                if let Some(requested) = superclass {
                    if self.entity(id).superclass != Some(requested) {
                        return Err(RtError::SuperclassMismatch {
                            name: self.entity_name(id),
                        });
                    }
                }
                trace!("reopened class {}", self.entity_name(id));
                return Ok(id);
            }
            Existing::Other => {
                return Err(RtError::KindMismatch {
                    name: name.to_string(),
                    expected: "class",
                })
            }
            Existing::Absent => {}
        }

        let superclass = superclass.unwrap_or(self.roots.object);
        self.check_superclass(superclass)?;

        let base_scope = self.entity(base).scope;
        let id = self.alloc_class(superclass, base_scope);
        self.const_set(base, name, Value::Entity(id))?;
        debug!(
            "defined class {} < {}",
            self.entity_name(id),
            self.entity_name(superclass)
        );

        self.run_inherited(superclass, id)?;
        Ok(id)
    }

    /// `module name` inside `base`.
    pub fn define_module(&mut self, base: EntityId, name: &str) -> Result<EntityId, RtError> {
        NameParser::check_constant_name(name)?;

        match self.existing_constant(base, name) {
            Existing::Entity(id) => {
                // Object passes as a degenerate module.
                if self.entity(id).is_module() || id == self.roots.object {
                    trace!("reopened module {}", self.entity_name(id));
                    return Ok(id);
                }
                return Err(RtError::KindMismatch {
                    name: self.entity_name(id),
                    expected: "module",
                });
            }
            Existing::Other => {
                return Err(RtError::KindMismatch {
                    name: name.to_string(),
                    expected: "module",
                })
            }
            Existing::Absent => {}
        }

        let base_scope = self.entity(base).scope;
        let id = self.heap.alloc_entity(EntityKind::Module, Some(base_scope));
        self.const_set(base, name, Value::Entity(id))?;
        debug!("defined module {}", self.entity_name(id));
        Ok(id)
    }

    /// Anonymous class, named on its first constant assignment.
    pub fn new_class(&mut self, superclass: Option<EntityId>) -> Result<EntityId, RtError> {
        let superclass = superclass.unwrap_or(self.roots.object);
        self.check_superclass(superclass)?;

        let object_scope = self.entity(self.roots.object).scope;
        let id = self.alloc_class(superclass, object_scope);
        debug!("defined anonymous class {}", id);

        self.run_inherited(superclass, id)?;
        Ok(id)
    }

    pub fn new_module(&mut self) -> EntityId {
        let object_scope = self.entity(self.roots.object).scope;
        let id = self.heap.alloc_entity(EntityKind::Module, Some(object_scope));
        debug!("defined anonymous module {}", id);
        id
    }

    /// Declare a constant in `entity`'s scope.
    ///
    /// An anonymous entity assigned here takes the (qualified) name. On a
    /// module the constant also reaches every includer that does not
    /// declare the name itself.
    pub fn const_set(&mut self, entity: EntityId, name: &str, value: Value) -> Result<(), RtError> {
        NameParser::check_constant_name(name)?;
        let scope = self.entity(entity).scope;

        if let Value::Entity(target) = value {
            if self.entity(target).name.is_none() {
                let qualified = if entity == self.roots.object {
                    name.to_string()
                } else {
                    format!("{}::{}", self.entity_name(entity), name)
                };
                let target = self.entity_mut(target);
                target.name = Some(qualified);
                target.declared_in = Some(scope);
            }
        }

        self.heap.scope_mut(scope).declare(name, value.clone());
        trace!("{}::{} declared", self.entity_name(entity), name);

        let mut pending = self.entity(entity).dependents.clone();
        while let Some(dependent) = pending.pop() {
            let dependent_scope = self.entity(dependent).scope;
            self.heap.scope_mut(dependent_scope).inherit(name, value.clone());
            pending.extend(self.entity(dependent).dependents.iter().copied());
        }
        Ok(())
    }

    /// Look `name` up from `entity`: its own scope, the enclosing scopes,
    /// then the scopes of its ancestors.
    pub fn const_get(&self, entity: EntityId, name: &str) -> Result<Value, RtError> {
        let mut scope = Some(self.entity(entity).scope);
        while let Some(id) = scope {
            if let Some(value) = self.heap.scope(id).get(name) {
                return Ok(value.clone());
            }
            scope = self.heap.scope(id).base;
        }

        self.const_get_inherited(entity, name)
            .ok_or_else(|| RtError::uninitialized_constant(&self.qualify(entity, name)))
    }

    /// Resolve `A::B::C` (or `::A::B`) from the top-level namespace.
    pub fn const_get_path(&self, path: &str) -> Result<Value, RtError> {
        self.const_get_path_from(self.roots.object, path)
    }

    /// Resolve a constant path as written inside `entity`: the first
    /// segment goes through [`const_get`](Self::const_get) from `entity`,
    /// or from the top-level namespace when the path starts with `::`.
    pub fn const_get_path_from(&self, entity: EntityId, path: &str) -> Result<Value, RtError> {
        let path = NameParser::parse_constant_path(path)?;
        let mut segments = path.segments.iter();
        let first = match segments.next() {
            Some(first) => first,
            None => return Err(RtError::InvalidName(String::new())),
        };

        let start = if path.absolute { self.roots.object } else { entity };
        let mut value = self.const_get(start, first)?;
        for segment in segments {
            let owner = match value {
                Value::Entity(id) => id,
                other => {
                    return Err(RtError::TypeError(format!(
                        "{} is not a class/module",
                        self.describe(&other)
                    )))
                }
            };
            value = self
                .const_get_inherited(owner, segment)
                .ok_or_else(|| RtError::uninitialized_constant(&self.qualify(owner, segment)))?;
        }
        Ok(value)
    }

    /// Constants declared directly on `entity`, in declaration order.
    pub fn constants(&self, entity: EntityId) -> Vec<String> {
        self.heap.scope(self.entity(entity).scope).declared().to_vec()
    }

    pub(crate) fn alloc_class(&mut self, superclass: EntityId, base_scope: ScopeId) -> EntityId {
        let id = self.heap.alloc_entity(EntityKind::Class, Some(base_scope));
        {
            let class = self.entity_mut(id);
            class.superclass = Some(superclass);
            class.parent = Some(superclass);
        }
        if !self.is_root(superclass) {
            let from = self.entity(superclass).scope;
            let to = self.entity(id).scope;
            let inherited: Vec<(String, Value)> = self
                .heap
                .scope(from)
                .constants
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect();
            for (name, value) in inherited {
                self.heap.scope_mut(to).inherit(&name, value);
            }
        }
        id
    }

    fn existing_constant(&self, base: EntityId, name: &str) -> Existing {
        let scope_id = self.entity(base).scope;
        let scope = self.heap.scope(scope_id);
        if !scope.has_declared(name) {
            return Existing::Absent;
        }
        match scope.get(name) {
            Some(Value::Entity(id)) if self.entity(*id).declared_in == Some(scope_id) => {
                Existing::Entity(*id)
            }
            Some(Value::Entity(_)) => Existing::Absent,
            _ => Existing::Other,
        }
    }

    fn check_superclass(&self, superclass: EntityId) -> Result<(), RtError> {
        if self.entity(superclass).is_class() {
            Ok(())
        } else {
            Err(RtError::TypeError(format!(
                "superclass must be a Class ({} given)",
                self.entity_name(superclass)
            )))
        }
    }

    fn run_inherited(&mut self, superclass: EntityId, class: EntityId) -> Result<(), RtError> {
        let receiver = Value::Entity(superclass);
        if self.responds_to(&receiver, "inherited") {
            trace!("{}.inherited({})", self.entity_name(superclass), self.entity_name(class));
            self.send(receiver, "inherited", vec![Value::Entity(class)])
                .map_err(|c| c.into_error())?;
        }
        Ok(())
    }

    fn const_get_inherited(&self, entity: EntityId, name: &str) -> Option<Value> {
        let mut current = Some(entity);
        while let Some(id) = current {
            let scope = self.entity(self.origin_of(id)).scope;
            if let Some(value) = self.heap.scope(scope).get(name) {
                return Some(value.clone());
            }
            current = self.entity(id).parent;
        }
        None
    }

    fn qualify(&self, entity: EntityId, name: &str) -> String {
        if entity == self.roots.object {
            name.to_string()
        } else {
            format!("{}::{}", self.entity_name(entity), name)
        }
    }
}
