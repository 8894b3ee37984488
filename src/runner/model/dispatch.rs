//! The call API.
//!
//! Lookup walks the receiver's dispatch chain (singleton, class, then the
//! parent links, iclasses included) and takes the first entry that is not
//! a stub. A stub or a complete miss goes to the unresolved-method path.

use std::rc::Rc;

use log::trace;

use super::{Frame, Runtime};
use crate::runner::ds::entity::{EntityId, EntityKind, NativeBridge};
use crate::runner::ds::error::{CallResult, Control, RtError};
use crate::runner::ds::method::MethodEntry;
use crate::runner::ds::value::{NativeKind, Proc, Value};
use crate::runner::plugin::resolver::MissingMethodHandler;

impl Runtime {
    /// The class of `value`, ignoring singletons.
    pub fn class_of(&self, value: &Value) -> EntityId {
        match value {
            Value::Object(id) => self.instance(*id).class,
            Value::Entity(id) => {
                if self.entity(*id).is_module() {
                    self.roots.module
                } else {
                    self.roots.class
                }
            }
            Value::Exception(data) => data.class,
            other => NativeKind::of(other)
                .and_then(|kind| self.native_class(kind))
                .unwrap_or(self.roots.object),
        }
    }

    pub fn is_a(&self, value: &Value, entity: EntityId) -> bool {
        let mut current = self.dispatch_head(value);
        while let Some(id) = current {
            if self.origin_of(id) == entity {
                return true;
            }
            current = self.entity(id).parent;
        }
        false
    }

    /// The entities searched, in order, for a call on `value`.
    pub fn dispatch_chain(&self, value: &Value) -> Vec<EntityId> {
        let mut chain = vec![];
        let mut current = self.dispatch_head(value);
        while let Some(id) = current {
            chain.push(id);
            current = self.entity(id).parent;
        }
        chain
    }

    /// The handler a call of `name` on `value` would run.
    pub fn find_method(&self, value: &Value, name: &str) -> Option<MethodEntry> {
        self.lookup_from(self.dispatch_head(value), name)
    }

    pub fn responds_to(&self, value: &Value, name: &str) -> bool {
        self.find_method(value, name).is_some()
    }

    pub fn send(&mut self, receiver: Value, name: &str, args: Vec<Value>) -> CallResult {
        self.send_with_block(receiver, name, args, None)
    }

    pub fn send_with_block(
        &mut self,
        receiver: Value,
        name: &str,
        args: Vec<Value>,
        block: Option<Proc>,
    ) -> CallResult {
        match self.find_method(&receiver, name) {
            Some(entry) => self.invoke(entry, receiver, args, block),
            None => self.method_missing(receiver, name, args, block),
        }
    }

    /// Run `entry` on `receiver` in a fresh frame.
    ///
    /// A `return` aimed at this frame becomes the call's result. So does a
    /// `break` out of the block passed here, unless a running frame already
    /// holds that block: a forwarded block breaks out of the call it was
    /// first attached to.
    pub fn invoke(
        &mut self,
        entry: MethodEntry,
        receiver: Value,
        args: Vec<Value>,
        block: Option<Proc>,
    ) -> CallResult {
        let id = self.next_frame_id();
        let block_id = block
            .as_ref()
            .map(Proc::id)
            .filter(|target| !self.holds_block(*target));
        let body = entry.body.clone();
        trace!("call {}#{}", self.entity_name(entry.owner), entry.name);

        self.frames.push(Frame {
            id,
            receiver: receiver.clone(),
            name: entry.name.clone(),
            entry,
            block: block.clone(),
        });
        let result = body.call(self, receiver, args, block);
        self.frames.pop();

        match result {
            Err(Control::Return { frame, value }) if frame == id => Ok(value),
            Err(Control::Break { target, value }) if Some(target) == block_id => Ok(value),
            other => other,
        }
    }

    fn holds_block(&self, target: usize) -> bool {
        self.frames
            .iter()
            .any(|f| f.block.as_ref().map_or(false, |b| b.id() == target))
    }

    /// The unresolved-method path: the first entity along the receiver's
    /// dispatch chain carrying a [`MissingMethodHandler`] handles the call.
    pub fn method_missing(
        &mut self,
        receiver: Value,
        name: &str,
        args: Vec<Value>,
        block: Option<Proc>,
    ) -> CallResult {
        let mut handler = None;
        let mut current = self.dispatch_head(&receiver);
        while let Some(id) = current {
            if let Some(found) = &self.entity(self.origin_of(id)).missing {
                handler = Some(found.clone());
                break;
            }
            current = self.entity(id).parent;
        }

        match handler {
            Some(handler) => {
                trace!("{} handles `{}'", handler.name(), name);
                handler.call_missing(self, receiver, name, args, block)
            }
            None => Err(RtError::no_method(name, self.describe(&receiver)).into()),
        }
    }

    pub fn set_missing_handler(&mut self, entity: EntityId, handler: Rc<dyn MissingMethodHandler>) {
        self.entity_mut(entity).missing = Some(handler);
    }

    pub fn set_missing_handler_fn<F>(&mut self, entity: EntityId, handler: F)
    where
        F: Fn(&mut Runtime, Value, &str, Vec<Value>, Option<Proc>) -> CallResult + 'static,
    {
        self.set_missing_handler(entity, Rc::new(handler));
    }

    pub fn clear_missing_handler(&mut self, entity: EntityId) {
        self.entity_mut(entity).missing = None;
    }

    /// `class.new(*args)`: allocate, then run `initialize` when defined.
    ///
    /// Classes with a bridged ancestor get their value from that bridge's
    /// constructor, which receives the class as its receiver.
    pub fn new_instance(&mut self, class: EntityId, args: Vec<Value>) -> CallResult {
        self.new_instance_with_block(class, args, None)
    }

    pub fn new_instance_with_block(
        &mut self,
        class: EntityId,
        args: Vec<Value>,
        block: Option<Proc>,
    ) -> CallResult {
        if let Some(bridge) = self.nearest_bridge(class) {
            if !self.entity(class).is_class() {
                return Err(self.not_instantiable(class).into());
            }
            return (bridge.constructor)(self, Value::Entity(class), args, block);
        }

        let object = self.allocate(class)?;
        if self.responds_to(&object, "initialize") {
            self.send_with_block(object.clone(), "initialize", args, block)?;
        }
        Ok(object)
    }

    /// A bare instance of `class`, without running `initialize`.
    pub fn allocate(&mut self, class: EntityId) -> Result<Value, RtError> {
        if !self.entity(class).is_class() {
            return Err(self.not_instantiable(class));
        }
        if self.nearest_bridge(class).is_some() {
            return Err(RtError::TypeError(format!(
                "allocator undefined for {}",
                self.entity_name(class)
            )));
        }
        let id = self.heap.alloc_instance(class)?;
        Ok(Value::Object(id))
    }

    /// First handler for `name` from `start` along the parent links, skipping stubs.
    pub(crate) fn lookup_from(&self, start: Option<EntityId>, name: &str) -> Option<MethodEntry> {
        let mut current = start;
        while let Some(id) = current {
            if let Some(entry) = self.table_of(id).get(name) {
                if !entry.is_stub() {
                    return Some(entry.clone());
                }
            }
            current = self.entity(id).parent;
        }
        None
    }

    /// First entity searched for a call on `value`.
    pub(crate) fn dispatch_head(&self, value: &Value) -> Option<EntityId> {
        match value {
            Value::Object(id) => {
                let instance = self.instance(*id);
                Some(instance.singleton.unwrap_or(instance.class))
            }
            Value::Entity(id) => Some(self.meta_head(*id)),
            other => Some(self.class_of(other)),
        }
    }

    /// Start of the class-method chain of `id`. Singletons not built yet
    /// have empty tables, so the nearest built one along the superclass
    /// chain (or the Class/Module root) is equivalent.
    fn meta_head(&self, id: EntityId) -> EntityId {
        let entity = self.entity(id);
        if let Some(meta) = entity.meta {
            return meta;
        }
        match entity.kind {
            EntityKind::Class => {
                let mut superclass = entity.superclass;
                while let Some(sup) = superclass {
                    if let Some(meta) = self.entity(sup).meta {
                        return meta;
                    }
                    superclass = self.entity(sup).superclass;
                }
                self.roots.class
            }
            EntityKind::Module => self.roots.module,
            EntityKind::IClass { .. } | EntityKind::Singleton { .. } => self.roots.class,
        }
    }

    fn nearest_bridge(&self, class: EntityId) -> Option<NativeBridge> {
        let mut current = Some(class);
        while let Some(id) = current {
            if let Some(bridge) = self.entity(id).bridge {
                return Some(bridge);
            }
            current = self.entity(id).superclass;
        }
        None
    }

    fn not_instantiable(&self, class: EntityId) -> RtError {
        let entity = self.entity(class);
        if entity.is_singleton() {
            RtError::TypeError("can't create instance of singleton class".to_string())
        } else {
            RtError::NoMethod {
                name: "new".to_string(),
                receiver: format!("module {}", self.entity_name(class)),
            }
        }
    }
}
