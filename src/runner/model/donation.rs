//! Mixins: iclass insertion and method donation.
//!
//! Including a module copies the module's methods into the includer's own
//! table (marked donated) and inserts an iclass into its parent chain.
//! Methods the module gains later are pushed to every includer, and on to
//! the includer's own includers.
//!
//! Precedence inside one table:
//! - a direct definition is never overwritten by a donation,
//! - between two donors, the one included later wins,
//! - a module donation beats a copy mirrored from a root onto a bridged type.

use log::{debug, trace};

use super::Runtime;
use crate::runner::ds::entity::{EntityId, EntityKind};
use crate::runner::ds::error::RtError;
use crate::runner::ds::method::MethodEntry;
use crate::runner::ds::value::Value;

impl Runtime {
    /// Mix `module` into `target` (a class, module or singleton).
    ///
    /// The module's own included modules are mixed in first, in their
    /// inclusion order. Including a module twice is a no-op, even when the
    /// module has gained includes of its own since.
    pub fn include(&mut self, module: EntityId, target: EntityId) -> Result<(), RtError> {
        if !self.entity(module).is_module() {
            return Err(RtError::InvalidMixin(format!(
                "wrong argument type {} (expected Module)",
                self.entity_name(module)
            )));
        }
        if self.entity(target).is_iclass() {
            return Err(RtError::InvalidMixin(format!(
                "can't include into an include proxy of {}",
                self.entity_name(target)
            )));
        }
        if module == target || self.entity(module).includes.contains(&target) {
            return Err(RtError::InvalidMixin("cyclic include detected".to_string()));
        }

        if self.entity(target).includes.contains(&module) {
            trace!(
                "{} already includes {}",
                self.entity_name(target),
                self.entity_name(module)
            );
            return Ok(());
        }

        let ancestry = self.entity(module).includes.clone();
        for nested in ancestry {
            self.include(nested, target)?;
        }

        self.entity_mut(target).includes.push(module);
        self.entity_mut(module).dependents.push(target);

        let iclass = self.heap.alloc_entity(EntityKind::IClass { module }, None);
        let previous = self.entity(target).parent;
        self.entity_mut(iclass).parent = previous;
        self.entity_mut(target).parent = Some(iclass);

        let names = self.entity(module).methods.owned_names().to_vec();
        for name in names {
            if let Some(entry) = self.entity(module).methods.get(&name).cloned() {
                self.donate_entry(target, module, &entry);
            }
        }

        let from = self.entity(module).scope;
        let to = self.entity(target).scope;
        let constants: Vec<(String, Value)> = self
            .heap
            .scope(from)
            .constants
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        for (name, value) in constants {
            self.heap.scope_mut(to).inherit(&name, value);
        }

        debug!(
            "included {} into {}",
            self.entity_name(module),
            self.entity_name(target)
        );
        Ok(())
    }

    /// Mix `module` into the singleton class of `target`.
    pub fn extend(&mut self, target: &Value, module: EntityId) -> Result<(), RtError> {
        let singleton = self.singleton_class(target)?;
        self.include(module, singleton)
    }

    /// `entity` followed by its dispatch ancestors; iclasses are reported
    /// as their module.
    pub fn ancestors(&self, entity: EntityId) -> Vec<EntityId> {
        let mut chain = vec![];
        let mut current = Some(entity);
        while let Some(id) = current {
            chain.push(self.origin_of(id));
            current = self.entity(id).parent;
        }
        chain
    }

    /// Whether `module` is mixed in anywhere along `entity`'s ancestry.
    pub fn include_p(&self, entity: EntityId, module: EntityId) -> bool {
        if !self.entity(module).is_module() {
            return false;
        }
        let mut current = self.entity(entity).parent;
        while let Some(id) = current {
            if let EntityKind::IClass { module: m } = self.entity(id).kind {
                if m == module {
                    return true;
                }
            }
            current = self.entity(id).parent;
        }
        false
    }

    /// Copy `entry` into `target`'s table as donated by `donor`, when the
    /// precedence rules allow it, then on to `target`'s own includers.
    pub(crate) fn donate_entry(&mut self, target: EntityId, donor: EntityId, entry: &MethodEntry) {
        if entry.is_stub() || !self.accepts_donation(target, entry.name(), donor) {
            trace!(
                "{}#{} kept over donation from {}",
                self.entity_name(target),
                entry.name(),
                self.entity_name(donor)
            );
            return;
        }

        self.entity_mut(target)
            .methods
            .insert_copy(entry.donated_by(donor));
        trace!(
            "donated {}#{} to {}",
            self.entity_name(donor),
            entry.name(),
            self.entity_name(target)
        );

        if self.is_root(target) {
            self.mirror_to_bridged(target, entry.name());
        }
        let dependents = self.entity(target).dependents.clone();
        for dependent in dependents {
            self.donate_entry(dependent, target, entry);
        }
    }

    /// Copy a root's handler for `name` onto every bridged type that has
    /// neither its own definition nor a module-donated one.
    pub(crate) fn mirror_to_bridged(&mut self, root: EntityId, name: &str) {
        let bridged = self.bridged.clone();
        for class in bridged {
            self.mirror_entry(root, class, name);
        }
    }

    pub(crate) fn mirror_entry(&mut self, root: EntityId, class: EntityId, name: &str) {
        let entry = match self.entity(root).methods.get(name) {
            Some(entry) if !entry.is_stub() => entry.clone(),
            _ => return,
        };
        // Object's handler shadows BasicObject's.
        if root == self.roots.basic_object {
            let object = self.roots.object;
            if self.entity(object).methods.get(name).map_or(false, |e| !e.is_stub()) {
                return;
            }
        }

        let replace = match self.entity(class).methods.get(name) {
            None => true,
            Some(existing) if existing.is_stub() => true,
            Some(existing) => match existing.donated() {
                Some(from) => self.is_root(from),
                None => false,
            },
        };
        if replace {
            self.entity_mut(class)
                .methods
                .insert_copy(entry.donated_by(root));
            trace!("mirrored {}#{} onto {}", self.entity_name(root), name, self.entity_name(class));
        }
    }

    fn accepts_donation(&self, target: EntityId, name: &str, donor: EntityId) -> bool {
        let existing = match self.entity(target).methods.get(name) {
            None => return true,
            Some(existing) => existing,
        };
        if existing.is_stub() {
            return true;
        }
        let from = match existing.donated() {
            None => return false,
            Some(from) => from,
        };
        if from == donor {
            return true;
        }

        let includes = &self.entity(target).includes;
        let position = |m: EntityId| includes.iter().position(|i| *i == m);
        match (position(from), position(donor)) {
            (None, _) => true,
            (Some(_), None) => false,
            (Some(existing), Some(incoming)) => existing <= incoming,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iclass_sits_between_class_and_superclass() {
        let mut rt = Runtime::new();
        let object = rt.object_class();
        let module = rt.define_module(object, "Mixed").unwrap();
        let class = rt.define_class(object, None, "Host").unwrap();
        rt.include(module, class).unwrap();

        let iclass = rt.entity(class).parent().unwrap();
        assert_eq!(rt.entity(iclass).kind(), EntityKind::IClass { module });
        assert_eq!(rt.entity(iclass).parent(), Some(object));
        assert_eq!(rt.entity(class).superclass(), Some(object));
    }

    #[test]
    fn test_cyclic_include_rejected() {
        let mut rt = Runtime::new();
        let object = rt.object_class();
        let a = rt.define_module(object, "A").unwrap();
        let b = rt.define_module(object, "B").unwrap();
        rt.include(a, b).unwrap();

        assert!(matches!(rt.include(b, a), Err(RtError::InvalidMixin(_))));
        assert!(matches!(rt.include(a, a), Err(RtError::InvalidMixin(_))));
    }

    #[test]
    fn test_including_a_class_rejected() {
        let mut rt = Runtime::new();
        let object = rt.object_class();
        let a = rt.define_class(object, None, "NotAModule").unwrap();
        let b = rt.define_class(object, None, "Target").unwrap();
        assert!(matches!(rt.include(a, b), Err(RtError::InvalidMixin(_))));
    }

    #[test]
    fn test_include_p_and_ancestors() {
        let mut rt = Runtime::new();
        let object = rt.object_class();
        let inner = rt.define_module(object, "Inner").unwrap();
        let outer = rt.define_module(object, "Outer").unwrap();
        rt.include(inner, outer).unwrap();
        let class = rt.define_class(object, None, "Both").unwrap();
        rt.include(outer, class).unwrap();

        assert!(rt.include_p(class, inner));
        assert!(rt.include_p(class, outer));
        assert!(!rt.include_p(class, class));
        assert_eq!(
            rt.ancestors(class),
            vec![class, outer, inner, object, rt.basic_object_class()]
        );
    }
}
