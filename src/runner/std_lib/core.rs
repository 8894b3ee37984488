//! Core built-ins registration.
//!
//! This module provides the function to register all core built-in classes
//! with the BuiltInRegistry.

use crate::runner::plugin::registry::BuiltInRegistry;

use super::array;
use super::boolean;
use super::exception;
use super::kernel;
use super::module;
use super::number;
use super::proc;
use super::string;
use super::time;

/// Register all core built-ins with the registry.
pub fn register_core_builtins(registry: &mut BuiltInRegistry) {
    // Register in order (Object includes Kernel, Class reopens Module's)
    kernel::register(registry);
    module::register(registry);
    array::register(registry);
    string::register(registry);
    number::register(registry);
    proc::register(registry);
    exception::register(registry);
    time::register(registry);
    boolean::register(registry);
}
