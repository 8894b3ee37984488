//! Boolean and NilClass built-ins.

use crate::runner::ds::error::{CallResult, RtError};
use crate::runner::ds::value::{NativeKind, Proc, Value};
use crate::runner::model::Runtime;
use crate::runner::plugin::registry::BuiltInRegistry;
use crate::runner::plugin::types::BuiltInClass;

use super::check_arity;

/// Register Boolean and NilClass with the registry.
pub fn register(registry: &mut BuiltInRegistry) {
    let boolean = BuiltInClass::bridged("Boolean", NativeKind::Boolean, no_constructor)
        .add_method("&", logical_and)
        .add_method("|", logical_or)
        .add_method("^", logical_xor)
        .add_method("to_s", boolean_to_s);
    registry.register(boolean);

    let nil = BuiltInClass::bridged("NilClass", NativeKind::Nil, no_constructor)
        .add_method("&", logical_and)
        .add_method("|", logical_or)
        .add_method("to_s", nil_to_s)
        .add_method("to_a", nil_to_a);
    registry.register(nil);
}

/// `true`, `false` and `nil` are the only instances.
fn no_constructor(rt: &mut Runtime, this: Value, _args: Vec<Value>, _block: Option<Proc>) -> CallResult {
    Err(RtError::no_method("new", rt.describe(&this)).into())
}

/// Boolean#& and NilClass#&
fn logical_and(_rt: &mut Runtime, this: Value, args: Vec<Value>, _block: Option<Proc>) -> CallResult {
    check_arity(&args, 1, 1)?;
    Ok(Value::Boolean(this.truthy() && args[0].truthy()))
}

/// Boolean#| and NilClass#|
fn logical_or(_rt: &mut Runtime, this: Value, args: Vec<Value>, _block: Option<Proc>) -> CallResult {
    check_arity(&args, 1, 1)?;
    Ok(Value::Boolean(this.truthy() || args[0].truthy()))
}

/// Boolean#^
fn logical_xor(_rt: &mut Runtime, this: Value, args: Vec<Value>, _block: Option<Proc>) -> CallResult {
    check_arity(&args, 1, 1)?;
    Ok(Value::Boolean(this.truthy() != args[0].truthy()))
}

/// Boolean#to_s
fn boolean_to_s(_rt: &mut Runtime, this: Value, _args: Vec<Value>, _block: Option<Proc>) -> CallResult {
    Ok(Value::str(if this.truthy() { "true" } else { "false" }))
}

/// NilClass#to_s
fn nil_to_s(_rt: &mut Runtime, _this: Value, _args: Vec<Value>, _block: Option<Proc>) -> CallResult {
    Ok(Value::str(""))
}

/// NilClass#to_a
fn nil_to_a(_rt: &mut Runtime, _this: Value, _args: Vec<Value>, _block: Option<Proc>) -> CallResult {
    Ok(Value::array(vec![]))
}
