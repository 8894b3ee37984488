//! Numeric built-in.
//!
//! Bridges native integers and floats and provides arithmetic,
//! comparison and iteration.

use crate::runner::ds::error::{CallResult, RtError};
use crate::runner::ds::value::{NativeKind, Proc, Value};
use crate::runner::model::Runtime;
use crate::runner::plugin::registry::BuiltInRegistry;
use crate::runner::plugin::types::BuiltInClass;

use super::check_arity;

/// Register the Numeric built-in with the registry.
pub fn register(registry: &mut BuiltInRegistry) {
    let number = BuiltInClass::bridged("Numeric", NativeKind::Number, number_constructor)
        .add_method("+", number_add)
        .add_method("-", number_sub)
        .add_method("*", number_mul)
        .add_method("/", number_div)
        .add_method("<", number_lt)
        .add_method(">", number_gt)
        .add_method("zero?", number_zero_p)
        .add_method("times", number_times)
        .add_method("to_i", number_to_i)
        .add_method("to_f", number_to_f)
        .add_method("to_s", number_to_s);

    registry.register(number);
}

/// A numeric operand, integers kept exact.
#[derive(Clone, Copy)]
enum Num {
    Int(i64),
    Float(f64),
}

impl Num {
    fn of(value: &Value) -> Result<Num, RtError> {
        match value {
            Value::Integer(i) => Ok(Num::Int(*i)),
            Value::Float(f) => Ok(Num::Float(*f)),
            other => Err(RtError::TypeError(format!(
                "{:?} can't be coerced into Numeric",
                other
            ))),
        }
    }

    fn as_f64(self) -> f64 {
        match self {
            Num::Int(i) => i as f64,
            Num::Float(f) => f,
        }
    }
}

fn operands(this: &Value, args: &[Value]) -> Result<(Num, Num), RtError> {
    check_arity(args, 1, 1)?;
    Ok((Num::of(this)?, Num::of(&args[0])?))
}

fn arithmetic(
    this: &Value,
    args: &[Value],
    int_op: fn(i64, i64) -> Option<i64>,
    float_op: fn(f64, f64) -> f64,
) -> CallResult {
    match operands(this, args)? {
        (Num::Int(a), Num::Int(b)) => int_op(a, b)
            .map(Value::Integer)
            .ok_or_else(|| RtError::ArgumentError("integer overflow".to_string()).into()),
        (a, b) => Ok(Value::Float(float_op(a.as_f64(), b.as_f64()))),
    }
}

/// Numeric.new(value = 0)
fn number_constructor(_rt: &mut Runtime, _this: Value, args: Vec<Value>, _block: Option<Proc>) -> CallResult {
    check_arity(&args, 0, 1)?;
    match args.first() {
        None => Ok(Value::Integer(0)),
        Some(value) => {
            Num::of(value)?;
            Ok(value.clone())
        }
    }
}

/// Numeric#+
fn number_add(_rt: &mut Runtime, this: Value, args: Vec<Value>, _block: Option<Proc>) -> CallResult {
    arithmetic(&this, &args, i64::checked_add, |a, b| a + b)
}

/// Numeric#-
fn number_sub(_rt: &mut Runtime, this: Value, args: Vec<Value>, _block: Option<Proc>) -> CallResult {
    arithmetic(&this, &args, i64::checked_sub, |a, b| a - b)
}

/// Numeric#*
fn number_mul(_rt: &mut Runtime, this: Value, args: Vec<Value>, _block: Option<Proc>) -> CallResult {
    arithmetic(&this, &args, i64::checked_mul, |a, b| a * b)
}

/// Numeric#/, integer division floors.
fn number_div(_rt: &mut Runtime, this: Value, args: Vec<Value>, _block: Option<Proc>) -> CallResult {
    if let (Num::Int(_), Num::Int(0)) = operands(&this, &args)? {
        return Err(RtError::ArgumentError("divided by 0".to_string()).into());
    }
    arithmetic(
        &this,
        &args,
        |a, b| {
            let quotient = a.checked_div(b)?;
            if (a % b != 0) && ((a < 0) != (b < 0)) {
                quotient.checked_sub(1)
            } else {
                Some(quotient)
            }
        },
        |a, b| a / b,
    )
}

/// Numeric#<
fn number_lt(_rt: &mut Runtime, this: Value, args: Vec<Value>, _block: Option<Proc>) -> CallResult {
    let (a, b) = operands(&this, &args)?;
    Ok(Value::Boolean(a.as_f64() < b.as_f64()))
}

/// Numeric#>
fn number_gt(_rt: &mut Runtime, this: Value, args: Vec<Value>, _block: Option<Proc>) -> CallResult {
    let (a, b) = operands(&this, &args)?;
    Ok(Value::Boolean(a.as_f64() > b.as_f64()))
}

/// Numeric#zero?
fn number_zero_p(_rt: &mut Runtime, this: Value, _args: Vec<Value>, _block: Option<Proc>) -> CallResult {
    Ok(Value::Boolean(Num::of(&this)?.as_f64() == 0.0))
}

/// Numeric#times, yielding 0 up to self - 1.
fn number_times(rt: &mut Runtime, this: Value, _args: Vec<Value>, block: Option<Proc>) -> CallResult {
    let count = match Num::of(&this)? {
        Num::Int(i) => i,
        Num::Float(_) => return Err(RtError::no_method("times", "an instance of Float").into()),
    };
    for i in 0..count {
        rt.yield_block(block.as_ref(), vec![Value::Integer(i)])?;
    }
    Ok(this)
}

/// Numeric#to_i, truncating.
fn number_to_i(_rt: &mut Runtime, this: Value, _args: Vec<Value>, _block: Option<Proc>) -> CallResult {
    Ok(match Num::of(&this)? {
        Num::Int(i) => Value::Integer(i),
        Num::Float(f) => Value::Integer(f.trunc() as i64),
    })
}

/// Numeric#to_f
fn number_to_f(_rt: &mut Runtime, this: Value, _args: Vec<Value>, _block: Option<Proc>) -> CallResult {
    Ok(Value::Float(Num::of(&this)?.as_f64()))
}

/// Numeric#to_s
fn number_to_s(_rt: &mut Runtime, this: Value, _args: Vec<Value>, _block: Option<Proc>) -> CallResult {
    Ok(match Num::of(&this)? {
        Num::Int(i) => Value::str(&i.to_string()),
        Num::Float(f) => Value::str(&format!("{:?}", f)),
    })
}
