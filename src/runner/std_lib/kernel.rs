//! Kernel, BasicObject and Object built-ins.
//!
//! Provides the methods every object responds to. Kernel is included into
//! Object; BasicObject keeps only the handful of methods dispatch itself
//! relies on.

use crate::runner::ds::error::{CallResult, RtError};
use crate::runner::ds::value::{Proc, Value};
use crate::runner::model::Runtime;
use crate::runner::plugin::registry::BuiltInRegistry;
use crate::runner::plugin::types::BuiltInClass;

use super::{arg, check_arity, entity_arg, str_arg};

/// Register Kernel, BasicObject and Object with the registry.
pub fn register(registry: &mut BuiltInRegistry) {
    let kernel = BuiltInClass::new_module("Kernel")
        .add_method("class", kernel_class)
        .add_method("==", kernel_eq)
        .add_method("!=", kernel_not_eq)
        .add_method("equal?", kernel_equal)
        .add_method("respond_to?", kernel_respond_to)
        .add_method("send", kernel_send)
        .add_method("is_a?", kernel_is_a)
        .add_method("kind_of?", kernel_is_a)
        .add_method("inspect", kernel_inspect)
        .add_method("to_s", kernel_inspect)
        .add_method("nil?", kernel_nil_p)
        .add_method("instance_variable_get", kernel_ivar_get)
        .add_method("instance_variable_set", kernel_ivar_set)
        .add_method("extend", kernel_extend)
        .add_method("singleton_class", kernel_singleton_class)
        .add_method("object_id", kernel_object_id)
        .add_method("raise", super::exception::kernel_raise);
    registry.register(kernel);

    let basic_object = BuiltInClass::new("BasicObject")
        .add_method("initialize", basic_initialize)
        .add_method("!", basic_not)
        .add_method("equal?", kernel_equal)
        .add_method("__send__", kernel_send)
        .add_method("__id__", kernel_object_id);
    registry.register(basic_object);

    let object = BuiltInClass::new("Object").include("Kernel");
    registry.register(object);
}

/// Printable form of any value, as `inspect` shows it.
pub fn inspect(rt: &Runtime, value: &Value) -> String {
    match value {
        Value::Nil => "nil".to_string(),
        Value::Boolean(b) => b.to_string(),
        Value::Integer(i) => i.to_string(),
        Value::Float(f) => format!("{:?}", f),
        Value::Str(s) => format!("{:?}", s),
        Value::Array(items) => {
            let parts: Vec<String> = items.borrow().iter().map(|v| inspect(rt, v)).collect();
            format!("[{}]", parts.join(", "))
        }
        Value::Proc(p) => format!("#<Proc:{:#x}>", p.id()),
        Value::Exception(e) => format!("#<{}: {}>", rt.entity_name(e.class), e.message),
        Value::Time(t) => match t.duration_since(std::time::UNIX_EPOCH) {
            Ok(d) => format!("#<Time {}>", d.as_secs()),
            Err(_) => "#<Time>".to_string(),
        },
        Value::Object(id) => {
            let instance = rt.instance(*id);
            let tag = instance.tag().to_simple().to_string();
            format!("#<{}:0x{}>", rt.entity_name(instance.class()), &tag[..12])
        }
        Value::Entity(id) => rt.entity_name(*id),
    }
}

/// Kernel#class
fn kernel_class(rt: &mut Runtime, this: Value, _args: Vec<Value>, _block: Option<Proc>) -> CallResult {
    Ok(Value::Entity(rt.class_of(&this)))
}

/// Kernel#==
fn kernel_eq(_rt: &mut Runtime, this: Value, args: Vec<Value>, _block: Option<Proc>) -> CallResult {
    check_arity(&args, 1, 1)?;
    Ok(Value::Boolean(this == args[0]))
}

/// Kernel#!=, the negation of whatever `==` resolves to.
fn kernel_not_eq(rt: &mut Runtime, this: Value, args: Vec<Value>, _block: Option<Proc>) -> CallResult {
    check_arity(&args, 1, 1)?;
    let equal = rt.send(this, "==", args)?;
    Ok(Value::Boolean(!equal.truthy()))
}

/// Kernel#equal?
fn kernel_equal(_rt: &mut Runtime, this: Value, args: Vec<Value>, _block: Option<Proc>) -> CallResult {
    check_arity(&args, 1, 1)?;
    Ok(Value::Boolean(this.identical(&args[0])))
}

/// Kernel#respond_to?
fn kernel_respond_to(rt: &mut Runtime, this: Value, args: Vec<Value>, _block: Option<Proc>) -> CallResult {
    check_arity(&args, 1, 2)?;
    let name = str_arg(&args, 0)?;
    Ok(Value::Boolean(rt.responds_to(&this, &name)))
}

/// Kernel#send and BasicObject#__send__
fn kernel_send(rt: &mut Runtime, this: Value, mut args: Vec<Value>, block: Option<Proc>) -> CallResult {
    if args.is_empty() {
        return Err(RtError::ArgumentError("no method name given".to_string()).into());
    }
    let name = str_arg(&args, 0)?;
    args.remove(0);
    rt.send_with_block(this, &name, args, block)
}

/// Kernel#is_a?
fn kernel_is_a(rt: &mut Runtime, this: Value, args: Vec<Value>, _block: Option<Proc>) -> CallResult {
    check_arity(&args, 1, 1)?;
    let entity = entity_arg(&args, 0)?;
    Ok(Value::Boolean(rt.is_a(&this, entity)))
}

/// Kernel#inspect
fn kernel_inspect(rt: &mut Runtime, this: Value, _args: Vec<Value>, _block: Option<Proc>) -> CallResult {
    Ok(Value::str(&inspect(rt, &this)))
}

/// Kernel#nil?
fn kernel_nil_p(_rt: &mut Runtime, this: Value, _args: Vec<Value>, _block: Option<Proc>) -> CallResult {
    Ok(Value::Boolean(this.is_nil()))
}

fn ivar_owner(rt: &Runtime, this: &Value) -> Result<crate::runner::ds::instance::ObjectId, RtError> {
    this.as_object().ok_or_else(|| {
        RtError::TypeError(format!("can't access instance variables of {}", rt.describe(this)))
    })
}

/// Kernel#instance_variable_get
fn kernel_ivar_get(rt: &mut Runtime, this: Value, args: Vec<Value>, _block: Option<Proc>) -> CallResult {
    check_arity(&args, 1, 1)?;
    let name = str_arg(&args, 0)?;
    let id = ivar_owner(rt, &this)?;
    Ok(rt.instance(id).ivar(&name).cloned().unwrap_or(Value::Nil))
}

/// Kernel#instance_variable_set
fn kernel_ivar_set(rt: &mut Runtime, this: Value, args: Vec<Value>, _block: Option<Proc>) -> CallResult {
    check_arity(&args, 2, 2)?;
    let name = str_arg(&args, 0)?;
    let value = arg(&args, 1);
    let id = ivar_owner(rt, &this)?;
    rt.instance_mut(id).set_ivar(name, value.clone());
    Ok(value)
}

/// Kernel#extend
fn kernel_extend(rt: &mut Runtime, this: Value, args: Vec<Value>, _block: Option<Proc>) -> CallResult {
    if args.is_empty() {
        return Err(RtError::ArgumentError("wrong number of arguments (given 0, expected 1+)".to_string()).into());
    }
    for index in (0..args.len()).rev() {
        let module = entity_arg(&args, index)?;
        rt.extend(&this, module)?;
    }
    Ok(this)
}

/// Kernel#singleton_class
fn kernel_singleton_class(rt: &mut Runtime, this: Value, _args: Vec<Value>, _block: Option<Proc>) -> CallResult {
    Ok(Value::Entity(rt.singleton_class(&this)?))
}

/// Kernel#object_id and BasicObject#__id__
fn kernel_object_id(_rt: &mut Runtime, this: Value, _args: Vec<Value>, _block: Option<Proc>) -> CallResult {
    let id = match &this {
        Value::Nil => 8,
        Value::Boolean(false) => 0,
        Value::Boolean(true) => 20,
        Value::Integer(i) => i.wrapping_mul(2).wrapping_add(1),
        Value::Object(o) => (o.0 as i64) * 8 + 16,
        Value::Entity(e) => (e.0 as i64) * 8 + 12,
        Value::Proc(p) => p.id() as i64,
        Value::Str(s) => s.as_ptr() as i64,
        Value::Array(a) => a.as_ptr() as i64,
        Value::Exception(e) => std::rc::Rc::as_ptr(e) as i64,
        Value::Float(f) => f.to_bits() as i64,
        Value::Time(t) => t
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos() as i64)
            .unwrap_or(0),
    };
    Ok(Value::Integer(id))
}

/// BasicObject#initialize
fn basic_initialize(_rt: &mut Runtime, _this: Value, _args: Vec<Value>, _block: Option<Proc>) -> CallResult {
    Ok(Value::Nil)
}

/// BasicObject#!
fn basic_not(_rt: &mut Runtime, this: Value, _args: Vec<Value>, _block: Option<Proc>) -> CallResult {
    Ok(Value::Boolean(!this.truthy()))
}
