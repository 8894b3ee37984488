//! Exception built-ins.
//!
//! Exception is bridged onto the native error representation; the rest of
//! the family are ordinary subclasses that allocate through it.

use std::rc::Rc;

use crate::runner::ds::error::{CallResult, RtError};
use crate::runner::ds::value::{ExceptionData, NativeKind, Proc, Value};
use crate::runner::model::Runtime;
use crate::runner::plugin::registry::BuiltInRegistry;
use crate::runner::plugin::types::BuiltInClass;

use super::{check_arity, str_arg};

/// Register the Exception family with the registry.
pub fn register(registry: &mut BuiltInRegistry) {
    let exception = BuiltInClass::bridged("Exception", NativeKind::Error, exception_constructor)
        .add_method("message", exception_message)
        .add_method("to_s", exception_message)
        .add_method("full_message", exception_full_message)
        .add_singleton_method("exception", exception_exception);
    registry.register(exception);

    let family: [(&'static str, &'static str); 8] = [
        ("NoMemoryError", "Exception"),
        ("StandardError", "Exception"),
        ("RuntimeError", "StandardError"),
        ("ArgumentError", "StandardError"),
        ("TypeError", "StandardError"),
        ("NameError", "StandardError"),
        ("NoMethodError", "NameError"),
        ("LocalJumpError", "StandardError"),
    ];
    for &(name, superclass) in family.iter() {
        registry.register(BuiltInClass::new(name).with_superclass(superclass));
    }
}

/// The exception value `err` stands for, of the class its kind maps to.
///
/// Falls back to the class-less message text when the Exception family is
/// not installed.
pub fn error_value(rt: &Runtime, err: &RtError) -> Value {
    if let RtError::Raised(data) = err {
        return Value::Exception(data.clone());
    }
    let object = rt.object_class();
    let class = match rt.const_get(object, err.class_name()) {
        Ok(Value::Entity(class)) if rt.native_class(NativeKind::Error).is_some() => class,
        _ => return Value::str(&err.to_string()),
    };
    Value::Exception(Rc::new(ExceptionData {
        class,
        message: err.to_string(),
    }))
}

/// Exception.new(message = class name)
fn exception_constructor(rt: &mut Runtime, this: Value, args: Vec<Value>, _block: Option<Proc>) -> CallResult {
    check_arity(&args, 0, 1)?;
    let class = match this {
        Value::Entity(class) => class,
        other => return Err(RtError::TypeError(format!("{:?} is not a class", other)).into()),
    };
    let message = if args.is_empty() {
        rt.entity_name(class)
    } else {
        str_arg(&args, 0)?
    };
    Ok(Value::Exception(Rc::new(ExceptionData { class, message })))
}

/// Exception.exception, an alias of new.
fn exception_exception(rt: &mut Runtime, this: Value, args: Vec<Value>, block: Option<Proc>) -> CallResult {
    rt.send_with_block(this, "new", args, block)
}

/// Exception#message
fn exception_message(_rt: &mut Runtime, this: Value, _args: Vec<Value>, _block: Option<Proc>) -> CallResult {
    match this {
        Value::Exception(data) => Ok(Value::str(&data.message)),
        other => Err(RtError::TypeError(format!("{:?} is not an Exception", other)).into()),
    }
}

/// Exception#full_message, "message (ClassName)".
fn exception_full_message(rt: &mut Runtime, this: Value, _args: Vec<Value>, _block: Option<Proc>) -> CallResult {
    match this {
        Value::Exception(data) => Ok(Value::str(&format!(
            "{} ({})",
            data.message,
            rt.entity_name(data.class)
        ))),
        other => Err(RtError::TypeError(format!("{:?} is not an Exception", other)).into()),
    }
}

/// Kernel#raise: `raise "msg"`, `raise Class`, `raise Class, "msg"` or
/// `raise exception`.
pub(crate) fn kernel_raise(rt: &mut Runtime, _this: Value, args: Vec<Value>, _block: Option<Proc>) -> CallResult {
    check_arity(&args, 0, 2)?;
    let exception = match args.first() {
        None => {
            let class = rt.const_get_path("RuntimeError")?;
            rt.send(class, "new", vec![Value::str("unhandled exception")])?
        }
        Some(Value::Str(message)) => {
            let class = rt.const_get_path("RuntimeError")?;
            rt.send(class, "new", vec![Value::Str(message.clone())])?
        }
        Some(class @ Value::Entity(_)) => rt.send(class.clone(), "new", args[1..].to_vec())?,
        Some(other) => other.clone(),
    };

    match exception {
        Value::Exception(data) => Err(RtError::Raised(data).into()),
        _ => Err(RtError::TypeError("exception class/object expected".to_string()).into()),
    }
}
