//! Extension seams of the object model.
//!
//! - **[`BuiltInClass`]** / **[`BuiltInRegistry`]**: declarative definitions of
//!   built-in classes, modules and bridged native types, installed into a
//!   [`Runtime`](crate::runner::model::Runtime) in registration order.
//! - **[`MissingMethodHandler`]**: the optional per-entity capability that
//!   turns an unresolved call into a normal result.
//! - **[`RuntimeConfig`]**: TOML configuration of the runtime.

pub mod config;
pub mod registry;
pub mod resolver;
pub mod types;

pub use config::{ConfigError, RemovalPolicy, RuntimeConfig};
pub use registry::BuiltInRegistry;
pub use resolver::MissingMethodHandler;
pub use types::{BuiltInClass, BuiltInKind, NativeFn};
