//! Proc built-in.
//!
//! Bridges native callables.

use crate::runner::ds::error::{CallResult, RtError};
use crate::runner::ds::value::{NativeKind, Proc, Value};
use crate::runner::model::{catch_break, Runtime};
use crate::runner::plugin::registry::BuiltInRegistry;
use crate::runner::plugin::types::BuiltInClass;

/// Register the Proc built-in with the registry.
pub fn register(registry: &mut BuiltInRegistry) {
    let proc = BuiltInClass::bridged("Proc", NativeKind::Callable, proc_constructor)
        .add_method("call", proc_call)
        .add_method("yield", proc_call)
        .add_method("to_proc", proc_to_proc);

    registry.register(proc);
}

/// Proc.new { ... }
fn proc_constructor(_rt: &mut Runtime, _this: Value, _args: Vec<Value>, block: Option<Proc>) -> CallResult {
    match block {
        Some(block) => Ok(Value::Proc(block)),
        None => Err(RtError::ArgumentError("tried to create Proc object without a block".to_string()).into()),
    }
}

/// Proc#call. A `break` out of the proc ends the call.
fn proc_call(rt: &mut Runtime, this: Value, args: Vec<Value>, _block: Option<Proc>) -> CallResult {
    match this {
        Value::Proc(block) => {
            let result = block.call(rt, args);
            catch_break(&block, result)
        }
        other => Err(RtError::TypeError(format!("{:?} is not a Proc", other)).into()),
    }
}

/// Proc#to_proc
fn proc_to_proc(_rt: &mut Runtime, this: Value, _args: Vec<Value>, _block: Option<Proc>) -> CallResult {
    Ok(this)
}
