use log::debug;

use super::Runtime;
use crate::runner::ds::entity::{EntityId, NativeBridge};
use crate::runner::ds::error::RtError;
use crate::runner::ds::value::NativeKind;
use crate::runner::plugin::types::NativeFn;

impl Runtime {
    /// Register a class whose instances are host-native values of `kind`.
    ///
    /// The class is declared in the top-level namespace and receives every
    /// method BasicObject and Object already have, plus the installed stubs.
    /// Later root definitions reach it too.
    pub fn bridge(
        &mut self,
        name: &str,
        kind: NativeKind,
        constructor: NativeFn,
    ) -> Result<EntityId, RtError> {
        if self.native_classes.contains_key(&kind) {
            return Err(RtError::AlreadyBridged(kind));
        }

        let object = self.roots.object;
        let class = self.define_class(object, None, name)?;
        if let Some(existing) = self.entity(class).native_kind() {
            return Err(RtError::AlreadyBridged(existing));
        }

        self.entity_mut(class).bridge = Some(NativeBridge { kind, constructor });
        self.bridged.push(class);
        self.native_classes.insert(kind, class);

        for root in [self.roots.basic_object, self.roots.object].iter() {
            let names: Vec<String> = self.entity(*root).methods.names().cloned().collect();
            for method in names {
                self.mirror_entry(*root, class, &method);
            }
        }
        for stub in self.stubs.clone() {
            self.install_stub(class, &stub);
        }

        debug!("bridged {} as {}", kind, name);
        Ok(class)
    }
}
