//! Core types for registering built-in classes.

use crate::runner::ds::error::CallResult;
use crate::runner::ds::value::{NativeKind, Proc, Value};
use crate::runner::model::Runtime;

/// Function signature for built-in methods.
/// Native functions receive the runtime, the receiver, the arguments and the block.
pub type NativeFn = fn(
    rt: &mut Runtime,
    this: Value,
    args: Vec<Value>,
    block: Option<Proc>,
) -> CallResult;

/// How a built-in entity is created.
#[derive(Clone, Copy)]
pub enum BuiltInKind {
    /// Ordinary class, with the superclass looked up by name (None means Object).
    Class { superclass: Option<&'static str> },
    Module,
    /// Class whose instances are host-native values of `kind`.
    Bridge {
        kind: NativeKind,
        constructor: NativeFn,
    },
}

/// Built-in class or module definition.
pub struct BuiltInClass {
    /// Name of the constant (e.g., "Array", "Kernel").
    pub name: String,

    pub kind: BuiltInKind,

    /// Modules to include, by name, in order.
    pub includes: Vec<String>,

    /// Instance methods, in definition order.
    pub methods: Vec<(String, NativeFn)>,

    /// Methods defined on the class object itself.
    pub singleton_methods: Vec<(String, NativeFn)>,
}

impl BuiltInClass {
    /// Create a new built-in class inheriting from Object.
    pub fn new(name: impl Into<String>) -> Self {
        BuiltInClass {
            name: name.into(),
            kind: BuiltInKind::Class { superclass: None },
            includes: Vec::new(),
            methods: Vec::new(),
            singleton_methods: Vec::new(),
        }
    }

    pub fn new_module(name: impl Into<String>) -> Self {
        BuiltInClass {
            kind: BuiltInKind::Module,
            ..BuiltInClass::new(name)
        }
    }

    pub fn bridged(name: impl Into<String>, kind: NativeKind, constructor: NativeFn) -> Self {
        BuiltInClass {
            kind: BuiltInKind::Bridge { kind, constructor },
            ..BuiltInClass::new(name)
        }
    }

    /// Set the superclass by name.
    pub fn with_superclass(mut self, superclass: &'static str) -> Self {
        self.kind = BuiltInKind::Class {
            superclass: Some(superclass),
        };
        self
    }

    pub fn include(mut self, module: impl Into<String>) -> Self {
        self.includes.push(module.into());
        self
    }

    /// Add a native instance method.
    pub fn add_method(mut self, name: impl Into<String>, func: NativeFn) -> Self {
        self.methods.push((name.into(), func));
        self
    }

    /// Add a native class-level method.
    pub fn add_singleton_method(mut self, name: impl Into<String>, func: NativeFn) -> Self {
        self.singleton_methods.push((name.into(), func));
        self
    }

    pub fn native_kind(&self) -> Option<NativeKind> {
        match self.kind {
            BuiltInKind::Bridge { kind, .. } => Some(kind),
            _ => None,
        }
    }
}
