//! Array built-in.
//!
//! Bridges the native list representation and provides Array methods.

use std::cell::RefCell;
use std::rc::Rc;

use crate::runner::ds::error::{CallResult, RtError};
use crate::runner::ds::value::{NativeKind, Proc, Value};
use crate::runner::model::Runtime;
use crate::runner::plugin::registry::BuiltInRegistry;
use crate::runner::plugin::types::BuiltInClass;

use super::kernel::inspect;
use super::{arg, check_arity, int_arg};

/// Register the Array built-in with the registry.
pub fn register(registry: &mut BuiltInRegistry) {
    let array = BuiltInClass::bridged("Array", NativeKind::List, array_constructor)
        .add_method("length", array_length)
        .add_method("size", array_length)
        .add_method("empty?", array_empty_p)
        .add_method("push", array_push)
        .add_method("<<", array_push)
        .add_method("pop", array_pop)
        .add_method("[]", array_index)
        .add_method("first", array_first)
        .add_method("last", array_last)
        .add_method("include?", array_include_p)
        .add_method("each", array_each)
        .add_method("map", array_map)
        .add_method("join", array_join)
        .add_method("inspect", array_inspect)
        .add_method("to_s", array_inspect);

    registry.register(array);
}

fn items(this: &Value) -> Result<Rc<RefCell<Vec<Value>>>, RtError> {
    match this {
        Value::Array(items) => Ok(items.clone()),
        other => Err(RtError::TypeError(format!("{:?} is not an Array", other))),
    }
}

/// Array.new(size = 0, default = nil)
fn array_constructor(_rt: &mut Runtime, _this: Value, args: Vec<Value>, _block: Option<Proc>) -> CallResult {
    check_arity(&args, 0, 2)?;
    let size = if args.is_empty() { 0 } else { int_arg(&args, 0)? };
    if size < 0 {
        return Err(RtError::ArgumentError("negative array size".to_string()).into());
    }
    Ok(Value::array(vec![arg(&args, 1); size as usize]))
}

/// Array#length
fn array_length(_rt: &mut Runtime, this: Value, _args: Vec<Value>, _block: Option<Proc>) -> CallResult {
    Ok(Value::Integer(items(&this)?.borrow().len() as i64))
}

/// Array#empty?
fn array_empty_p(_rt: &mut Runtime, this: Value, _args: Vec<Value>, _block: Option<Proc>) -> CallResult {
    Ok(Value::Boolean(items(&this)?.borrow().is_empty()))
}

/// Array#push
fn array_push(_rt: &mut Runtime, this: Value, args: Vec<Value>, _block: Option<Proc>) -> CallResult {
    items(&this)?.borrow_mut().extend(args);
    Ok(this)
}

/// Array#pop
fn array_pop(_rt: &mut Runtime, this: Value, _args: Vec<Value>, _block: Option<Proc>) -> CallResult {
    Ok(items(&this)?.borrow_mut().pop().unwrap_or(Value::Nil))
}

/// Array#[], negative indices count from the end.
fn array_index(_rt: &mut Runtime, this: Value, args: Vec<Value>, _block: Option<Proc>) -> CallResult {
    check_arity(&args, 1, 1)?;
    let index = int_arg(&args, 0)?;
    let list = items(&this)?;
    let list = list.borrow();
    let resolved = if index < 0 { list.len() as i64 + index } else { index };
    if resolved < 0 {
        return Ok(Value::Nil);
    }
    Ok(list.get(resolved as usize).cloned().unwrap_or(Value::Nil))
}

/// Array#first
fn array_first(_rt: &mut Runtime, this: Value, _args: Vec<Value>, _block: Option<Proc>) -> CallResult {
    Ok(items(&this)?.borrow().first().cloned().unwrap_or(Value::Nil))
}

/// Array#last
fn array_last(_rt: &mut Runtime, this: Value, _args: Vec<Value>, _block: Option<Proc>) -> CallResult {
    Ok(items(&this)?.borrow().last().cloned().unwrap_or(Value::Nil))
}

/// Array#include?, comparing with `==` dispatch.
fn array_include_p(rt: &mut Runtime, this: Value, args: Vec<Value>, _block: Option<Proc>) -> CallResult {
    check_arity(&args, 1, 1)?;
    let snapshot = items(&this)?.borrow().clone();
    for item in snapshot {
        if rt.send(item, "==", vec![args[0].clone()])?.truthy() {
            return Ok(Value::Boolean(true));
        }
    }
    Ok(Value::Boolean(false))
}

/// Array#each
fn array_each(rt: &mut Runtime, this: Value, _args: Vec<Value>, block: Option<Proc>) -> CallResult {
    let snapshot = items(&this)?.borrow().clone();
    for item in snapshot {
        rt.yield_block(block.as_ref(), vec![item])?;
    }
    Ok(this)
}

/// Array#map
fn array_map(rt: &mut Runtime, this: Value, _args: Vec<Value>, block: Option<Proc>) -> CallResult {
    let snapshot = items(&this)?.borrow().clone();
    let mut mapped = Vec::with_capacity(snapshot.len());
    for item in snapshot {
        mapped.push(rt.yield_block(block.as_ref(), vec![item])?);
    }
    Ok(Value::array(mapped))
}

/// Array#join(separator = "")
fn array_join(rt: &mut Runtime, this: Value, args: Vec<Value>, _block: Option<Proc>) -> CallResult {
    check_arity(&args, 0, 1)?;
    let separator = match args.first() {
        Some(Value::Str(s)) => s.to_string(),
        _ => String::new(),
    };
    let snapshot = items(&this)?.borrow().clone();
    let mut parts = Vec::with_capacity(snapshot.len());
    for item in snapshot {
        let part = rt.send(item, "to_s", vec![])?;
        match part {
            Value::Str(s) => parts.push(s.to_string()),
            other => parts.push(inspect(rt, &other)),
        }
    }
    Ok(Value::str(&parts.join(&separator)))
}

/// Array#inspect
fn array_inspect(rt: &mut Runtime, this: Value, _args: Vec<Value>, _block: Option<Proc>) -> CallResult {
    Ok(Value::str(&inspect(rt, &this)))
}
