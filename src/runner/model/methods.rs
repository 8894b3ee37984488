//! Method definition, removal, stubs and method reflection.

use std::collections::{BTreeSet, HashSet};
use std::rc::Rc;

use log::{debug, trace, warn};

use super::Runtime;
use crate::parser::NameParser;
use crate::runner::ds::entity::EntityId;
use crate::runner::ds::error::RtError;
use crate::runner::ds::method::{MethodBody, MethodEntry};
use crate::runner::ds::value::Value;
use crate::runner::plugin::config::RemovalPolicy;

lazy_static! {
    /// Methods whose removal from a root entity breaks basic dispatch.
    static ref PROTECTED_METHODS: HashSet<&'static str> = [
        "__send__",
        "__id__",
        "initialize",
        "method_missing",
        "respond_to?",
        "equal?",
        "==",
        "!",
        "instance_eval",
    ]
    .iter()
    .copied()
    .collect();
}

impl Runtime {
    /// Define `name` on `entity`.
    ///
    /// A module donates the method to every current includer; a root
    /// (BasicObject/Object) mirrors it onto every bridged type.
    pub fn define_method(
        &mut self,
        entity: EntityId,
        name: &str,
        body: Rc<MethodBody>,
    ) -> Result<(), RtError> {
        NameParser::check_method_name(name)?;
        if self.entity(entity).is_iclass() {
            return Err(RtError::TypeError(format!(
                "can't define `{}' on an include proxy",
                name
            )));
        }

        let entry = MethodEntry::new(name, body, entity);
        self.entity_mut(entity).methods.insert_owned(entry.clone());
        trace!("defined {}#{}", self.entity_name(entity), name);

        let dependents = self.entity(entity).dependents.clone();
        for dependent in dependents {
            self.donate_entry(dependent, entity, &entry);
        }
        if self.is_root(entity) {
            self.mirror_to_bridged(entity, name);
        }
        Ok(())
    }

    /// Define `name` on the singleton class of `target`.
    pub fn define_singleton_method(
        &mut self,
        target: &Value,
        name: &str,
        body: Rc<MethodBody>,
    ) -> Result<(), RtError> {
        let singleton = self.singleton_class(target)?;
        self.define_method(singleton, name, body)
    }

    /// Entities get an ordinary definition, plain instances a singleton one.
    pub fn define_direct(
        &mut self,
        target: &Value,
        name: &str,
        body: Rc<MethodBody>,
    ) -> Result<(), RtError> {
        match target {
            Value::Entity(id) => self.define_method(*id, name, body),
            Value::Object(_) => self.define_singleton_method(target, name, body),
            other => Err(RtError::TypeError(format!(
                "can't define `{}' on {}",
                name,
                self.describe(other)
            ))),
        }
    }

    /// Remove a method `entity` declares itself.
    ///
    /// What happens to copies already donated to includers depends on the
    /// `[methods] removal` setting.
    pub fn remove_method(&mut self, entity: EntityId, name: &str) -> Result<(), RtError> {
        let removed = match self.entity(entity).methods.get(name) {
            Some(entry) if entry.is_direct() => entry.clone(),
            _ => {
                return Err(RtError::NameError(format!(
                    "method `{}' not defined in {}",
                    name,
                    self.entity_name(entity)
                )))
            }
        };

        if self.is_root(entity) && PROTECTED_METHODS.contains(name) {
            warn!(
                "removing `{}' from {} may cause serious problems",
                name,
                self.entity_name(entity)
            );
        }

        self.entity_mut(entity).methods.remove(name);
        self.refill(entity, name);

        match self.config().methods.removal {
            RemovalPolicy::KeepDonated => {}
            RemovalPolicy::RetractDonated => self.retract(entity, name, &removed),
        }
        debug!("removed {}#{}", self.entity_name(entity), name);
        Ok(())
    }

    /// Install placeholder handlers that route to the unresolved-method
    /// path. Only names without a handler get a stub; types bridged later
    /// receive the same stubs.
    pub fn add_stubs(&mut self, names: &[&str]) -> Result<(), RtError> {
        for name in names {
            NameParser::check_method_name(name)?;
        }
        let mut targets = vec![self.roots.basic_object];
        targets.extend(self.bridged.iter().copied());

        for name in names {
            if !self.stubs.iter().any(|s| s == name) {
                self.stubs.push(name.to_string());
            }
            for target in &targets {
                self.install_stub(*target, name);
            }
        }
        Ok(())
    }

    /// Instance methods visible on instances of `entity`; with `inherited`
    /// false only the ones it declares itself, in declaration order.
    pub fn instance_methods(&self, entity: EntityId, inherited: bool) -> Vec<String> {
        if !inherited {
            return self.entity(entity).methods.owned_names().to_vec();
        }

        let mut names = BTreeSet::new();
        let mut current = Some(entity);
        while let Some(id) = current {
            names.extend(
                self.table_of(id)
                    .entries()
                    .filter(|e| !e.is_stub())
                    .map(|e| e.name().to_string()),
            );
            current = self.entity(id).parent;
        }
        names.into_iter().collect()
    }

    /// Whether instances of `entity` have a real (non-stub) `name`.
    pub fn method_defined(&self, entity: EntityId, name: &str) -> bool {
        self.lookup_from(Some(entity), name).is_some()
    }

    pub(crate) fn install_stub(&mut self, target: EntityId, name: &str) {
        if self.entity(target).methods.contains(name) {
            return;
        }
        self.entity_mut(target)
            .methods
            .insert_copy(MethodEntry::new_stub(name, target));
        trace!("stubbed {}#{}", self.entity_name(target), name);
    }

    /// After `name` left `target`'s table, restore the handler an included
    /// module, a root (for bridged types) or a stub would have put there.
    /// Returns whether anything was installed.
    fn refill(&mut self, target: EntityId, name: &str) -> bool {
        let includes = self.entity(target).includes.clone();
        for module in includes.into_iter().rev() {
            if let Some(entry) = self.entity(module).methods.get(name).filter(|e| !e.is_stub()) {
                let copy = entry.donated_by(module);
                self.entity_mut(target).methods.insert_copy(copy);
                return true;
            }
        }

        if self.entity(target).bridge.is_some() {
            for root in [self.roots.object, self.roots.basic_object].iter() {
                if let Some(entry) = self.entity(*root).methods.get(name).filter(|e| !e.is_stub()) {
                    let copy = entry.donated_by(*root);
                    self.entity_mut(target).methods.insert_copy(copy);
                    return true;
                }
            }
        }

        let stubbed = self.stubs.iter().any(|s| s == name);
        if stubbed && (target == self.roots.basic_object || self.entity(target).bridge.is_some()) {
            self.install_stub(target, name);
        }
        false
    }

    /// Take back the copies of `removed` that `donor` propagated.
    fn retract(&mut self, donor: EntityId, name: &str, removed: &MethodEntry) {
        let mut targets = self.entity(donor).dependents.clone();
        if self.is_root(donor) {
            targets.extend(self.bridged.iter().copied());
        }

        for target in targets {
            let matches = self
                .entity(target)
                .methods
                .get(name)
                .map_or(false, |e| e.donated() == Some(donor) && e.same_handler(removed));
            if !matches {
                continue;
            }
            self.entity_mut(target).methods.remove(name);
            trace!("retracted {}#{}", self.entity_name(target), name);
            self.refill(target, name);
            self.retract(target, name, removed);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::ds::error::CallResult;
    use crate::runner::ds::value::Proc;

    fn nil_method(_rt: &mut Runtime, _this: Value, _args: Vec<Value>, _block: Option<Proc>) -> CallResult {
        Ok(Value::Nil)
    }

    #[test]
    fn test_invalid_method_name_rejected() {
        let mut rt = Runtime::new();
        let object = rt.object_class();
        let err = rt
            .define_method(object, "no spaces", MethodBody::native(nil_method))
            .unwrap_err();
        assert!(matches!(err, RtError::InvalidName(_)));
    }

    #[test]
    fn test_owned_names_keep_declaration_order() {
        let mut rt = Runtime::new();
        let object = rt.object_class();
        let class = rt.define_class(object, None, "Ordered").unwrap();
        for name in &["b", "a", "c?", "b"] {
            rt.define_method(class, name, MethodBody::native(nil_method)).unwrap();
        }
        assert_eq!(rt.instance_methods(class, false), vec!["b", "a", "c?"]);
    }

    #[test]
    fn test_stub_does_not_overwrite_handler() {
        let mut rt = Runtime::new();
        let basic = rt.basic_object_class();
        rt.define_method(basic, "present", MethodBody::native(nil_method)).unwrap();
        rt.add_stubs(&["present", "absent"]).unwrap();

        let table = rt.entity(basic).methods();
        assert!(!table.get("present").unwrap().is_stub());
        assert!(table.get("absent").unwrap().is_stub());
        assert!(!rt.method_defined(basic, "absent"));
    }

    #[test]
    fn test_invoking_a_stub_takes_the_unresolved_path() {
        let mut rt = Runtime::new();
        let basic = rt.basic_object_class();
        let object = rt.object_class();
        rt.add_stubs(&["area"]).unwrap();
        rt.set_missing_handler_fn(object, |_rt, _this, name, args, _block| {
            Ok(Value::str(&format!("{}/{}", name, args.len())))
        });

        let stub = rt.entity(basic).methods().get("area").cloned().unwrap();
        let class = rt.define_class(object, None, "Shape").unwrap();
        let shape = rt.new_instance(class, vec![]).unwrap();
        let result = rt.invoke(stub, shape, vec![Value::Integer(1)], None).unwrap();
        assert_eq!(result, Value::str("area/1"));
    }

    #[test]
    fn test_remove_requires_own_definition() {
        let mut rt = Runtime::new();
        let object = rt.object_class();
        let class = rt.define_class(object, None, "Plain").unwrap();
        let err = rt.remove_method(class, "missing").unwrap_err();
        assert!(matches!(err, RtError::NameError(_)));
    }
}
