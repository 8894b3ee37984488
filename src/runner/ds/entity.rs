use std::fmt;
use std::rc::Rc;

use crate::runner::ds::instance::ObjectId;
use crate::runner::ds::method::MethodTable;
use crate::runner::ds::scope::ScopeId;
use crate::runner::plugin::resolver::MissingMethodHandler;
use crate::runner::plugin::types::NativeFn;
use crate::runner::ds::value::NativeKind;

/// Arena index of a class, module, iclass or singleton entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub(crate) usize);

impl EntityId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What a singleton entity is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attachment {
    Entity(EntityId),
    Object(ObjectId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Class,
    Module,
    /// Mixin proxy standing for `module` in one includer's parent chain.
    IClass { module: EntityId },
    Singleton { attached: Attachment },
}

/// Allocation backing for a bridged class.
#[derive(Clone, Copy)]
pub struct NativeBridge {
    pub kind: NativeKind,
    pub constructor: NativeFn,
}

pub struct Entity {
    pub(crate) id: EntityId,
    pub(crate) name: Option<String>,
    pub(crate) kind: EntityKind,
    pub(crate) superclass: Option<EntityId>,
    /// Dispatch link. Equals `superclass` until a module is included.
    pub(crate) parent: Option<EntityId>,
    /// Cached singleton entity of this entity.
    pub(crate) meta: Option<EntityId>,
    pub(crate) methods: MethodTable,
    /// Included modules, in inclusion order.
    pub(crate) includes: Vec<EntityId>,
    /// Entities that included this one.
    pub(crate) dependents: Vec<EntityId>,
    pub(crate) scope: ScopeId,
    /// Scope the entity's name was declared in.
    pub(crate) declared_in: Option<ScopeId>,
    pub(crate) bridge: Option<NativeBridge>,
    pub(crate) missing: Option<Rc<dyn MissingMethodHandler>>,
}

impl Entity {
    pub(crate) fn new(id: EntityId, kind: EntityKind, scope: ScopeId) -> Self {
        Entity {
            id,
            name: None,
            kind,
            superclass: None,
            parent: None,
            meta: None,
            methods: MethodTable::new(),
            includes: Vec::new(),
            dependents: Vec::new(),
            scope,
            declared_in: None,
            bridge: None,
            missing: None,
        }
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    pub fn is_class(&self) -> bool {
        matches!(self.kind, EntityKind::Class)
    }

    pub fn is_module(&self) -> bool {
        matches!(self.kind, EntityKind::Module)
    }

    pub fn is_iclass(&self) -> bool {
        matches!(self.kind, EntityKind::IClass { .. })
    }

    pub fn is_singleton(&self) -> bool {
        matches!(self.kind, EntityKind::Singleton { .. })
    }

    pub fn superclass(&self) -> Option<EntityId> {
        self.superclass
    }

    pub fn parent(&self) -> Option<EntityId> {
        self.parent
    }

    pub fn singleton(&self) -> Option<EntityId> {
        self.meta
    }

    /// The entity's own table. Iclasses keep theirs empty and share their module's.
    pub fn methods(&self) -> &MethodTable {
        &self.methods
    }

    pub fn includes(&self) -> &[EntityId] {
        &self.includes
    }

    pub fn dependents(&self) -> &[EntityId] {
        &self.dependents
    }

    pub fn scope(&self) -> ScopeId {
        self.scope
    }

    pub fn native_kind(&self) -> Option<NativeKind> {
        self.bridge.map(|b| b.kind)
    }

    pub fn has_missing_handler(&self) -> bool {
        self.missing.is_some()
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entity")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("superclass", &self.superclass)
            .field("parent", &self.parent)
            .field("methods", &self.methods.len())
            .field("includes", &self.includes)
            .finish()
    }
}
