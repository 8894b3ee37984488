//! String built-in.
//!
//! Bridges the native text representation and provides String methods.

use crate::runner::ds::error::{CallResult, RtError};
use crate::runner::ds::value::{NativeKind, Proc, Value};
use crate::runner::model::Runtime;
use crate::runner::plugin::registry::BuiltInRegistry;
use crate::runner::plugin::types::BuiltInClass;

use super::{check_arity, int_arg, str_arg};

/// Register the String built-in with the registry.
pub fn register(registry: &mut BuiltInRegistry) {
    let string = BuiltInClass::bridged("String", NativeKind::Text, string_constructor)
        .add_method("length", string_length)
        .add_method("size", string_length)
        .add_method("empty?", string_empty_p)
        .add_method("upcase", string_upcase)
        .add_method("downcase", string_downcase)
        .add_method("+", string_plus)
        .add_method("*", string_times)
        .add_method("include?", string_include_p)
        .add_method("start_with?", string_start_with_p)
        .add_method("to_s", string_to_s)
        .add_method("to_str", string_to_s);

    registry.register(string);
}

/// Get the text of a String receiver.
fn text(this: &Value) -> Result<&str, RtError> {
    this.as_str()
        .ok_or_else(|| RtError::TypeError(format!("{:?} is not a String", this)))
}

/// String.new(text = "")
fn string_constructor(_rt: &mut Runtime, _this: Value, args: Vec<Value>, _block: Option<Proc>) -> CallResult {
    check_arity(&args, 0, 1)?;
    if args.is_empty() {
        return Ok(Value::str(""));
    }
    Ok(Value::str(&str_arg(&args, 0)?))
}

/// String#length, in characters.
fn string_length(_rt: &mut Runtime, this: Value, _args: Vec<Value>, _block: Option<Proc>) -> CallResult {
    Ok(Value::Integer(text(&this)?.chars().count() as i64))
}

/// String#empty?
fn string_empty_p(_rt: &mut Runtime, this: Value, _args: Vec<Value>, _block: Option<Proc>) -> CallResult {
    Ok(Value::Boolean(text(&this)?.is_empty()))
}

/// String#upcase
fn string_upcase(_rt: &mut Runtime, this: Value, _args: Vec<Value>, _block: Option<Proc>) -> CallResult {
    Ok(Value::str(&text(&this)?.to_uppercase()))
}

/// String#downcase
fn string_downcase(_rt: &mut Runtime, this: Value, _args: Vec<Value>, _block: Option<Proc>) -> CallResult {
    Ok(Value::str(&text(&this)?.to_lowercase()))
}

/// String#+
fn string_plus(_rt: &mut Runtime, this: Value, args: Vec<Value>, _block: Option<Proc>) -> CallResult {
    check_arity(&args, 1, 1)?;
    let other = str_arg(&args, 0)?;
    Ok(Value::str(&format!("{}{}", text(&this)?, other)))
}

/// String#*
fn string_times(_rt: &mut Runtime, this: Value, args: Vec<Value>, _block: Option<Proc>) -> CallResult {
    check_arity(&args, 1, 1)?;
    let count = int_arg(&args, 0)?;
    if count < 0 {
        return Err(RtError::ArgumentError("negative argument".to_string()).into());
    }
    Ok(Value::str(&text(&this)?.repeat(count as usize)))
}

/// String#include?
fn string_include_p(_rt: &mut Runtime, this: Value, args: Vec<Value>, _block: Option<Proc>) -> CallResult {
    check_arity(&args, 1, 1)?;
    let needle = str_arg(&args, 0)?;
    Ok(Value::Boolean(text(&this)?.contains(needle.as_str())))
}

/// String#start_with?
fn string_start_with_p(_rt: &mut Runtime, this: Value, args: Vec<Value>, _block: Option<Proc>) -> CallResult {
    let haystack = text(&this)?;
    for index in 0..args.len() {
        if haystack.starts_with(str_arg(&args, index)?.as_str()) {
            return Ok(Value::Boolean(true));
        }
    }
    Ok(Value::Boolean(false))
}

/// String#to_s
fn string_to_s(_rt: &mut Runtime, this: Value, _args: Vec<Value>, _block: Option<Proc>) -> CallResult {
    text(&this)?;
    Ok(this)
}
