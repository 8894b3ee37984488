//! Module and Class built-ins.
//!
//! Reflection over the object model: names, ancestry, mixins, method
//! tables and constants, plus instantiation through `Class#new`.

use crate::runner::ds::error::{CallResult, RtError};
use crate::runner::ds::value::{Proc, Value};
use crate::runner::model::Runtime;
use crate::runner::plugin::registry::BuiltInRegistry;
use crate::runner::plugin::types::BuiltInClass;

use super::{arg, check_arity, entity_arg, str_arg};

/// Register Module and Class with the registry.
pub fn register(registry: &mut BuiltInRegistry) {
    let module = BuiltInClass::new("Module")
        .add_method("name", module_name)
        .add_method("to_s", module_to_s)
        .add_method("inspect", module_to_s)
        .add_method("ancestors", module_ancestors)
        .add_method("include", module_include)
        .add_method("include?", module_include_p)
        .add_method("instance_methods", module_instance_methods)
        .add_method("method_defined?", module_method_defined)
        .add_method("remove_method", module_remove_method)
        .add_method("const_get", module_const_get)
        .add_method("const_set", module_const_set)
        .add_method("constants", module_constants)
        .add_method("===", module_case_eq)
        .add_singleton_method("new", module_new);
    registry.register(module);

    let class = BuiltInClass::new("Class")
        .add_method("new", class_new)
        .add_method("allocate", class_allocate)
        .add_method("superclass", class_superclass)
        .add_singleton_method("new", class_new_class);
    registry.register(class);
}

fn receiver(rt: &Runtime, this: &Value) -> Result<crate::runner::ds::entity::EntityId, RtError> {
    this.as_entity()
        .ok_or_else(|| RtError::TypeError(format!("{} is not a class/module", rt.describe(this))))
}

/// Module#name, nil for anonymous entities.
fn module_name(rt: &mut Runtime, this: Value, _args: Vec<Value>, _block: Option<Proc>) -> CallResult {
    let id = receiver(rt, &this)?;
    Ok(match rt.entity(id).name() {
        Some(name) => Value::str(name),
        None => Value::Nil,
    })
}

/// Module#to_s
fn module_to_s(rt: &mut Runtime, this: Value, _args: Vec<Value>, _block: Option<Proc>) -> CallResult {
    let id = receiver(rt, &this)?;
    Ok(Value::str(&rt.entity_name(id)))
}

/// Module#ancestors
fn module_ancestors(rt: &mut Runtime, this: Value, _args: Vec<Value>, _block: Option<Proc>) -> CallResult {
    let id = receiver(rt, &this)?;
    let ancestors = rt.ancestors(id).into_iter().map(Value::Entity).collect();
    Ok(Value::array(ancestors))
}

/// Module#include, last argument first.
fn module_include(rt: &mut Runtime, this: Value, args: Vec<Value>, _block: Option<Proc>) -> CallResult {
    let id = receiver(rt, &this)?;
    for index in (0..args.len()).rev() {
        let module = entity_arg(&args, index)?;
        rt.include(module, id)?;
    }
    Ok(this)
}

/// Module#include?
fn module_include_p(rt: &mut Runtime, this: Value, args: Vec<Value>, _block: Option<Proc>) -> CallResult {
    check_arity(&args, 1, 1)?;
    let id = receiver(rt, &this)?;
    let module = entity_arg(&args, 0)?;
    Ok(Value::Boolean(rt.include_p(id, module)))
}

/// Module#instance_methods(inherited = true)
fn module_instance_methods(rt: &mut Runtime, this: Value, args: Vec<Value>, _block: Option<Proc>) -> CallResult {
    check_arity(&args, 0, 1)?;
    let id = receiver(rt, &this)?;
    let inherited = args.first().map_or(true, Value::truthy);
    let names = rt
        .instance_methods(id, inherited)
        .iter()
        .map(|n| Value::str(n))
        .collect();
    Ok(Value::array(names))
}

/// Module#method_defined?
fn module_method_defined(rt: &mut Runtime, this: Value, args: Vec<Value>, _block: Option<Proc>) -> CallResult {
    check_arity(&args, 1, 1)?;
    let id = receiver(rt, &this)?;
    let name = str_arg(&args, 0)?;
    Ok(Value::Boolean(rt.method_defined(id, &name)))
}

/// Module#remove_method
fn module_remove_method(rt: &mut Runtime, this: Value, args: Vec<Value>, _block: Option<Proc>) -> CallResult {
    let id = receiver(rt, &this)?;
    for index in 0..args.len() {
        let name = str_arg(&args, index)?;
        rt.remove_method(id, &name)?;
    }
    Ok(this)
}

/// Module#const_get, accepting qualified names.
fn module_const_get(rt: &mut Runtime, this: Value, args: Vec<Value>, _block: Option<Proc>) -> CallResult {
    check_arity(&args, 1, 1)?;
    let id = receiver(rt, &this)?;
    let name = str_arg(&args, 0)?;
    Ok(rt.const_get_path_from(id, &name)?)
}

/// Module#const_set
fn module_const_set(rt: &mut Runtime, this: Value, args: Vec<Value>, _block: Option<Proc>) -> CallResult {
    check_arity(&args, 2, 2)?;
    let id = receiver(rt, &this)?;
    let name = str_arg(&args, 0)?;
    let value = arg(&args, 1);
    rt.const_set(id, &name, value.clone())?;
    Ok(value)
}

/// Module#constants
fn module_constants(rt: &mut Runtime, this: Value, _args: Vec<Value>, _block: Option<Proc>) -> CallResult {
    let id = receiver(rt, &this)?;
    let names = rt.constants(id).iter().map(|n| Value::str(n)).collect();
    Ok(Value::array(names))
}

/// Module#===
fn module_case_eq(rt: &mut Runtime, this: Value, args: Vec<Value>, _block: Option<Proc>) -> CallResult {
    check_arity(&args, 1, 1)?;
    let id = receiver(rt, &this)?;
    Ok(Value::Boolean(rt.is_a(&args[0], id)))
}

/// Module.new
fn module_new(rt: &mut Runtime, _this: Value, args: Vec<Value>, _block: Option<Proc>) -> CallResult {
    check_arity(&args, 0, 0)?;
    Ok(Value::Entity(rt.new_module()))
}

/// Class#new
fn class_new(rt: &mut Runtime, this: Value, args: Vec<Value>, block: Option<Proc>) -> CallResult {
    let id = receiver(rt, &this)?;
    rt.new_instance_with_block(id, args, block)
}

/// Class#allocate
fn class_allocate(rt: &mut Runtime, this: Value, _args: Vec<Value>, _block: Option<Proc>) -> CallResult {
    let id = receiver(rt, &this)?;
    Ok(rt.allocate(id)?)
}

/// Class#superclass
fn class_superclass(rt: &mut Runtime, this: Value, _args: Vec<Value>, _block: Option<Proc>) -> CallResult {
    let id = receiver(rt, &this)?;
    Ok(match rt.entity(id).superclass() {
        Some(superclass) => Value::Entity(superclass),
        None => Value::Nil,
    })
}

/// Class.new(superclass = Object)
fn class_new_class(rt: &mut Runtime, _this: Value, args: Vec<Value>, _block: Option<Proc>) -> CallResult {
    check_arity(&args, 0, 1)?;
    let superclass = if args.is_empty() {
        None
    } else {
        Some(entity_arg(&args, 0)?)
    };
    Ok(Value::Entity(rt.new_class(superclass)?))
}
