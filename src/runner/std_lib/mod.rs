//! Standard library built-in classes.
//!
//! This module contains the built-ins installed by
//! [`BuiltInRegistry::with_core`](crate::runner::plugin::BuiltInRegistry::with_core):
//! Kernel, BasicObject/Object, Module/Class reflection and the bridged
//! native types (Array, String, Numeric, Proc, the Exception family, Time,
//! Boolean, NilClass).

pub mod array;
pub mod boolean;
pub mod core;
pub mod exception;
pub mod kernel;
pub mod module;
pub mod number;
pub mod proc;
pub mod string;
pub mod time;

pub use self::core::register_core_builtins;

use crate::runner::ds::entity::EntityId;
use crate::runner::ds::error::RtError;
use crate::runner::ds::value::Value;

/// Argument `index`, nil when absent.
pub(crate) fn arg(args: &[Value], index: usize) -> Value {
    args.get(index).cloned().unwrap_or(Value::Nil)
}

pub(crate) fn check_arity(args: &[Value], min: usize, max: usize) -> Result<(), RtError> {
    if args.len() < min || args.len() > max {
        let expected = if min == max {
            min.to_string()
        } else {
            format!("{}..{}", min, max)
        };
        return Err(RtError::ArgumentError(format!(
            "wrong number of arguments (given {}, expected {})",
            args.len(),
            expected
        )));
    }
    Ok(())
}

pub(crate) fn str_arg(args: &[Value], index: usize) -> Result<String, RtError> {
    match args.get(index) {
        Some(Value::Str(s)) => Ok(s.to_string()),
        Some(other) => Err(RtError::TypeError(format!(
            "{:?} is not a string",
            other
        ))),
        None => Err(RtError::ArgumentError(format!(
            "missing argument {}",
            index + 1
        ))),
    }
}

pub(crate) fn int_arg(args: &[Value], index: usize) -> Result<i64, RtError> {
    match args.get(index) {
        Some(Value::Integer(i)) => Ok(*i),
        Some(Value::Float(f)) => Ok(*f as i64),
        Some(other) => Err(RtError::TypeError(format!(
            "no implicit conversion of {:?} into Integer",
            other
        ))),
        None => Err(RtError::ArgumentError(format!(
            "missing argument {}",
            index + 1
        ))),
    }
}

pub(crate) fn entity_arg(args: &[Value], index: usize) -> Result<EntityId, RtError> {
    match args.get(index) {
        Some(Value::Entity(id)) => Ok(*id),
        _ => Err(RtError::TypeError("class or module required".to_string())),
    }
}
