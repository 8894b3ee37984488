//! Time built-in.
//!
//! Bridges native system time.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::runner::ds::error::{CallResult, RtError};
use crate::runner::ds::value::{NativeKind, Proc, Value};
use crate::runner::model::Runtime;
use crate::runner::plugin::registry::BuiltInRegistry;
use crate::runner::plugin::types::BuiltInClass;

use super::check_arity;

/// Register the Time built-in with the registry.
pub fn register(registry: &mut BuiltInRegistry) {
    let time = BuiltInClass::bridged("Time", NativeKind::Time, time_constructor)
        .add_method("to_i", time_to_i)
        .add_method("to_f", time_to_f)
        .add_method("-", time_minus)
        .add_method("<", time_lt)
        .add_singleton_method("now", time_now)
        .add_singleton_method("at", time_at);

    registry.register(time);
}

fn system_time(value: &Value) -> Result<SystemTime, RtError> {
    match value {
        Value::Time(t) => Ok(*t),
        other => Err(RtError::TypeError(format!("{:?} is not a Time", other))),
    }
}

/// Signed seconds since the epoch.
fn epoch_seconds(time: SystemTime) -> f64 {
    match time.duration_since(UNIX_EPOCH) {
        Ok(d) => d.as_secs_f64(),
        Err(e) => -e.duration().as_secs_f64(),
    }
}

/// Time.new, the current time.
fn time_constructor(_rt: &mut Runtime, _this: Value, args: Vec<Value>, _block: Option<Proc>) -> CallResult {
    check_arity(&args, 0, 0)?;
    Ok(Value::Time(SystemTime::now()))
}

/// Time.now
fn time_now(rt: &mut Runtime, this: Value, args: Vec<Value>, block: Option<Proc>) -> CallResult {
    time_constructor(rt, this, args, block)
}

/// Time.at(seconds)
fn time_at(_rt: &mut Runtime, _this: Value, args: Vec<Value>, _block: Option<Proc>) -> CallResult {
    check_arity(&args, 1, 1)?;
    let seconds = match &args[0] {
        Value::Integer(i) => *i as f64,
        Value::Float(f) => *f,
        other => return Err(RtError::TypeError(format!("can't convert {:?} into an exact number", other)).into()),
    };
    if !seconds.is_finite() || seconds.abs() >= u64::MAX as f64 {
        return Err(RtError::ArgumentError("time out of range".to_string()).into());
    }
    let offset = Duration::from_secs_f64(seconds.abs());
    let time = if seconds >= 0.0 {
        UNIX_EPOCH.checked_add(offset)
    } else {
        UNIX_EPOCH.checked_sub(offset)
    };
    time.map(Value::Time)
        .ok_or_else(|| RtError::ArgumentError("time out of range".to_string()).into())
}

/// Time#to_i
fn time_to_i(_rt: &mut Runtime, this: Value, _args: Vec<Value>, _block: Option<Proc>) -> CallResult {
    Ok(Value::Integer(epoch_seconds(system_time(&this)?).floor() as i64))
}

/// Time#to_f
fn time_to_f(_rt: &mut Runtime, this: Value, _args: Vec<Value>, _block: Option<Proc>) -> CallResult {
    Ok(Value::Float(epoch_seconds(system_time(&this)?)))
}

/// Time#-, difference in seconds.
fn time_minus(_rt: &mut Runtime, this: Value, args: Vec<Value>, _block: Option<Proc>) -> CallResult {
    check_arity(&args, 1, 1)?;
    let a = epoch_seconds(system_time(&this)?);
    let b = epoch_seconds(system_time(&args[0])?);
    Ok(Value::Float(a - b))
}

/// Time#<
fn time_lt(_rt: &mut Runtime, this: Value, args: Vec<Value>, _block: Option<Proc>) -> CallResult {
    check_arity(&args, 1, 1)?;
    Ok(Value::Boolean(system_time(&this)? < system_time(&args[0])?))
}
