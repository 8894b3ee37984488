//! The object model runtime.
//!
//! [`Runtime`] owns the entity store and implements, across the files of
//! this module:
//!
//! - **registrar**: class/module creation and reopening, constants
//! - **methods**: direct, module and singleton definition, removal, stubs
//! - **donation**: `include` and propagation of module methods to includers
//! - **singleton**: lazily built per-object and per-class singleton entities
//! - **dispatch**: the call API and the unresolved-method path
//! - **super_call**: next-in-chain resolution for `super`
//! - **bridge**: host-native types as classes
//! - **control**: `break`/`return` as explicit control values
//!
//! Registration data flows top-down (a module gains a method, every
//! includer's table gets a donated copy); calls flow bottom-up (table,
//! parent chain, stub, unresolved-method handler).

mod bridge;
mod control;
mod dispatch;
mod donation;
mod methods;
mod registrar;
mod singleton;
mod super_call;

use std::collections::HashMap;
use std::fmt;

use crate::runner::ds::entity::{Attachment, Entity, EntityId, EntityKind};
use crate::runner::ds::error::RtError;
use crate::runner::ds::heap::Heap;
use crate::runner::ds::instance::{Instance, ObjectId};
use crate::runner::ds::method::{MethodEntry, MethodTable};
use crate::runner::ds::scope::{Scope, ScopeId};
use crate::runner::ds::value::{NativeKind, Proc, Value};
use crate::runner::plugin::config::RuntimeConfig;
use crate::runner::plugin::registry::BuiltInRegistry;

pub use control::catch_break;

/// Identity of one method invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameId(pub(crate) u64);

/// A running method invocation.
#[derive(Debug, Clone)]
pub struct Frame {
    pub id: FrameId,
    pub receiver: Value,
    pub name: String,
    pub(crate) entry: MethodEntry,
    pub(crate) block: Option<Proc>,
}

impl Frame {
    pub fn entry(&self) -> &MethodEntry {
        &self.entry
    }

    pub fn block(&self) -> Option<&Proc> {
        self.block.as_ref()
    }
}

/// The foundational entities created at boot.
#[derive(Debug, Clone, Copy)]
pub struct Roots {
    pub basic_object: EntityId,
    pub object: EntityId,
    pub module: EntityId,
    pub class: EntityId,
}

pub struct Runtime {
    pub(crate) heap: Heap,
    config: RuntimeConfig,
    pub(crate) roots: Roots,
    /// Bridged classes in bridging order.
    pub(crate) bridged: Vec<EntityId>,
    pub(crate) native_classes: HashMap<NativeKind, EntityId>,
    /// Every name passed to `add_stubs`, in first-seen order.
    pub(crate) stubs: Vec<String>,
    pub(crate) frames: Vec<Frame>,
    next_frame: u64,
}

impl Runtime {
    /// A bare object model: BasicObject, Object, Module and Class only.
    pub fn new() -> Self {
        Self::with_config(RuntimeConfig::default())
    }

    pub fn with_config(config: RuntimeConfig) -> Self {
        let mut heap = Heap::new(config.heap.clone());

        let basic_object = heap.alloc_entity(EntityKind::Class, None);
        let object = heap.alloc_entity(EntityKind::Class, None);
        let object_scope = heap.entity(object).scope;
        heap.scope_mut(heap.entity(basic_object).scope).base = Some(object_scope);
        let module = heap.alloc_entity(EntityKind::Class, Some(object_scope));
        let class = heap.alloc_entity(EntityKind::Class, Some(object_scope));

        let links = [
            (basic_object, "BasicObject", None),
            (object, "Object", Some(basic_object)),
            (module, "Module", Some(object)),
            (class, "Class", Some(module)),
        ];
        for (id, name, superclass) in links.iter() {
            let entity = heap.entity_mut(*id);
            entity.name = Some(name.to_string());
            entity.superclass = *superclass;
            entity.parent = *superclass;
            entity.declared_in = Some(object_scope);
            heap.scope_mut(object_scope)
                .declare(name, Value::Entity(*id));
        }

        Runtime {
            heap,
            config,
            roots: Roots {
                basic_object,
                object,
                module,
                class,
            },
            bridged: Vec::new(),
            native_classes: HashMap::new(),
            stubs: Vec::new(),
            frames: Vec::new(),
            next_frame: 0,
        }
    }

    /// A runtime with the core built-ins installed.
    pub fn with_core() -> Result<Self, RtError> {
        Self::with_core_config(RuntimeConfig::default())
    }

    pub fn with_core_config(config: RuntimeConfig) -> Result<Self, RtError> {
        let mut rt = Self::with_config(config);
        rt.install_builtins(BuiltInRegistry::with_core())?;
        Ok(rt)
    }

    pub fn install_builtins(&mut self, registry: BuiltInRegistry) -> Result<Vec<EntityId>, RtError> {
        registry.install(self)
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn heap(&self) -> &Heap {
        &self.heap
    }

    pub fn roots(&self) -> Roots {
        self.roots
    }

    pub fn basic_object_class(&self) -> EntityId {
        self.roots.basic_object
    }

    pub fn object_class(&self) -> EntityId {
        self.roots.object
    }

    pub fn module_class(&self) -> EntityId {
        self.roots.module
    }

    pub fn class_class(&self) -> EntityId {
        self.roots.class
    }

    /// BasicObject and Object: the entities whose methods every bridged type mirrors.
    pub fn is_root(&self, id: EntityId) -> bool {
        id == self.roots.basic_object || id == self.roots.object
    }

    pub fn entity(&self, id: EntityId) -> &Entity {
        self.heap.entity(id)
    }

    pub(crate) fn entity_mut(&mut self, id: EntityId) -> &mut Entity {
        self.heap.entity_mut(id)
    }

    pub fn scope(&self, id: ScopeId) -> &Scope {
        self.heap.scope(id)
    }

    pub fn instance(&self, id: ObjectId) -> &Instance {
        self.heap.instance(id)
    }

    pub fn instance_mut(&mut self, id: ObjectId) -> &mut Instance {
        self.heap.instance_mut(id)
    }

    pub fn bridged_classes(&self) -> &[EntityId] {
        &self.bridged
    }

    pub fn native_class(&self, kind: NativeKind) -> Option<EntityId> {
        self.native_classes.get(&kind).copied()
    }

    pub fn stubbed_names(&self) -> &[String] {
        &self.stubs
    }

    /// Method table used for lookups on `id`: an iclass shares its module's.
    pub(crate) fn table_of(&self, id: EntityId) -> &MethodTable {
        match self.heap.entity(id).kind {
            EntityKind::IClass { module } => &self.heap.entity(module).methods,
            _ => &self.heap.entity(id).methods,
        }
    }

    /// The entity an iclass stands for, or `id` itself.
    pub(crate) fn origin_of(&self, id: EntityId) -> EntityId {
        match self.heap.entity(id).kind {
            EntityKind::IClass { module } => module,
            _ => id,
        }
    }

    /// Display name; anonymous and synthetic entities get a descriptive one.
    pub fn entity_name(&self, id: EntityId) -> String {
        let entity = self.heap.entity(id);
        if let Some(name) = &entity.name {
            return name.clone();
        }
        match entity.kind {
            EntityKind::Class => format!("#<Class:{}>", id),
            EntityKind::Module => format!("#<Module:{}>", id),
            EntityKind::IClass { module } => self.entity_name(module),
            EntityKind::Singleton { attached } => match attached {
                Attachment::Entity(e) => format!("#<Class:{}>", self.entity_name(e)),
                Attachment::Object(o) => format!(
                    "#<Class:#<{}>>",
                    self.entity_name(self.heap.instance(o).class)
                ),
            },
        }
    }

    /// Receiver description used in error messages.
    pub fn describe(&self, value: &Value) -> String {
        match value {
            Value::Nil => "nil".to_string(),
            Value::Boolean(b) => b.to_string(),
            Value::Entity(id) => {
                let kind = if self.entity(*id).is_module() { "module" } else { "class" };
                format!("{} {}", kind, self.entity_name(*id))
            }
            other => format!("an instance of {}", self.entity_name(self.class_of(other))),
        }
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn current_frame(&self) -> Option<&Frame> {
        self.frames.last()
    }

    pub(crate) fn next_frame_id(&mut self) -> FrameId {
        self.next_frame += 1;
        FrameId(self.next_frame)
    }
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Runtime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("entities", &self.heap.entity_count())
            .field("instances", &self.heap.instance_count())
            .field("bridged", &self.bridged)
            .field("frames", &self.frames.len())
            .finish()
    }
}
