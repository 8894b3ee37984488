use std::collections::HashMap;
use std::fmt;

use uuid::Uuid;

use crate::runner::ds::entity::EntityId;
use crate::runner::ds::value::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(pub(crate) usize);

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.0)
    }
}

/// An ordinary (non-bridged) object record.
#[derive(Debug)]
pub struct Instance {
    pub(crate) tag: Uuid,
    pub(crate) class: EntityId,
    /// Private singleton entity, created on first use.
    pub(crate) singleton: Option<EntityId>,
    pub(crate) ivars: HashMap<String, Value>,
}

impl Instance {
    pub fn new(class: EntityId) -> Self {
        Instance {
            tag: Uuid::new_v4(),
            class,
            singleton: None,
            ivars: HashMap::new(),
        }
    }

    pub fn tag(&self) -> &Uuid {
        &self.tag
    }

    pub fn class(&self) -> EntityId {
        self.class
    }

    pub fn singleton(&self) -> Option<EntityId> {
        self.singleton
    }

    pub fn ivar(&self, name: &str) -> Option<&Value> {
        self.ivars.get(name)
    }

    pub fn set_ivar(&mut self, name: impl Into<String>, value: Value) {
        self.ivars.insert(name.into(), value);
    }
}
