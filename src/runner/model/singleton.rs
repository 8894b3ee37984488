use log::trace;

use super::Runtime;
use crate::runner::ds::entity::{Attachment, EntityId, EntityKind};
use crate::runner::ds::error::RtError;
use crate::runner::ds::instance::ObjectId;
use crate::runner::ds::value::Value;

impl Runtime {
    /// The singleton class of `target`, built on first request.
    ///
    /// A class's singleton inherits from its superclass's singleton (the
    /// Class root for BasicObject); a module's from Module; an instance's
    /// from the instance's class. Native values have none.
    pub fn singleton_class(&mut self, target: &Value) -> Result<EntityId, RtError> {
        match target {
            Value::Entity(id) => Ok(self.entity_singleton(*id)),
            Value::Object(id) => Ok(self.object_singleton(*id)),
            other => Err(RtError::TypeError(format!(
                "can't define singleton for {}",
                self.describe(other)
            ))),
        }
    }

    fn entity_singleton(&mut self, id: EntityId) -> EntityId {
        if let Some(meta) = self.entity(id).meta {
            return meta;
        }

        let parent = match self.entity(id).kind {
            EntityKind::Class => match self.entity(id).superclass {
                Some(superclass) => self.entity_singleton(superclass),
                None => self.roots.class,
            },
            EntityKind::Module => self.roots.module,
            EntityKind::IClass { .. } | EntityKind::Singleton { .. } => self.roots.class,
        };

        let scope = self.entity(id).scope;
        let meta = self.heap.alloc_entity(
            EntityKind::Singleton {
                attached: Attachment::Entity(id),
            },
            Some(scope),
        );
        let entity = self.entity_mut(meta);
        entity.superclass = Some(parent);
        entity.parent = Some(parent);
        self.entity_mut(id).meta = Some(meta);
        trace!("built singleton class of {}", self.entity_name(id));
        meta
    }

    fn object_singleton(&mut self, id: ObjectId) -> EntityId {
        if let Some(singleton) = self.instance(id).singleton {
            return singleton;
        }

        let class = self.instance(id).class;
        let scope = self.entity(class).scope;
        let singleton = self.heap.alloc_entity(
            EntityKind::Singleton {
                attached: Attachment::Object(id),
            },
            Some(scope),
        );
        let entity = self.entity_mut(singleton);
        entity.superclass = Some(class);
        entity.parent = Some(class);
        self.instance_mut(id).singleton = Some(singleton);
        trace!("built singleton class of {}", id);
        singleton
    }
}
