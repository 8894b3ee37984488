//! Built-in registry: ordered built-in class definitions installed into a runtime.

use log::debug;

use super::types::{BuiltInClass, BuiltInKind};
use crate::runner::ds::entity::EntityId;
use crate::runner::ds::error::RtError;
use crate::runner::ds::method::MethodBody;
use crate::runner::ds::value::Value;
use crate::runner::model::Runtime;
use crate::runner::std_lib::register_core_builtins;

/// Registry for built-in classes.
/// Definitions are installed in registration order, so superclasses and
/// included modules must be registered before their users.
pub struct BuiltInRegistry {
    classes: Vec<BuiltInClass>,
}

impl BuiltInRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        BuiltInRegistry {
            classes: Vec::new(),
        }
    }

    /// Create a registry with the core built-ins (Kernel, Module, bridged value types).
    pub fn with_core() -> Self {
        let mut registry = Self::new();
        register_core_builtins(&mut registry);
        registry
    }

    /// Register a built-in definition. A later definition with the same name
    /// reopens the same entity when installed.
    pub fn register(&mut self, class: BuiltInClass) {
        self.classes.push(class);
    }

    pub fn get(&self, name: &str) -> Option<&BuiltInClass> {
        self.classes.iter().find(|c| c.name == name)
    }

    pub fn has(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn names(&self) -> Vec<&str> {
        self.classes.iter().map(|c| c.name.as_str()).collect()
    }

    /// Create every registered entity in `rt`, honouring the runtime's
    /// `[bridge] types` setting. Definitions whose bridge kind is disabled,
    /// or whose superclass was skipped, are left out.
    pub fn install(self, rt: &mut Runtime) -> Result<Vec<EntityId>, RtError> {
        let object = rt.object_class();
        let mut installed = vec![];

        for def in self.classes {
            let entity = match def.kind {
                BuiltInKind::Module => rt.define_module(object, &def.name)?,
                BuiltInKind::Class { superclass } => {
                    let superclass = match superclass {
                        None => None,
                        Some(name) => match rt.const_get(object, name) {
                            Ok(Value::Entity(id)) => Some(id),
                            _ => {
                                debug!("skipping {}: superclass {} not installed", def.name, name);
                                continue;
                            }
                        },
                    };
                    rt.define_class(object, superclass, &def.name)?
                }
                BuiltInKind::Bridge { kind, constructor } => {
                    if !rt.config().bridge.enabled(kind) {
                        debug!("skipping {}: {} bridging disabled", def.name, kind);
                        continue;
                    }
                    match rt.native_class(kind) {
                        Some(existing) => existing,
                        None => rt.bridge(&def.name, kind, constructor)?,
                    }
                }
            };

            for module in &def.includes {
                let module = match rt.const_get(object, module)? {
                    Value::Entity(id) => id,
                    _ => return Err(RtError::InvalidMixin(module.clone())),
                };
                rt.include(module, entity)?;
            }
            for (name, func) in def.methods {
                rt.define_method(entity, &name, MethodBody::native(func))?;
            }
            for (name, func) in def.singleton_methods {
                rt.define_singleton_method(&Value::Entity(entity), &name, MethodBody::native(func))?;
            }
            installed.push(entity);
        }

        Ok(installed)
    }
}

impl Default for BuiltInRegistry {
    fn default() -> Self {
        Self::with_core()
    }
}
