//! The unresolved-method capability.
//!
//! Any entity may carry a [`MissingMethodHandler`]. When dispatch finds no
//! handler for a name (or only a stub), the first entity along the
//! receiver's dispatch chain that carries one gets the call instead.

use crate::runner::ds::error::CallResult;
use crate::runner::ds::value::{Proc, Value};
use crate::runner::model::Runtime;

/// Handles calls that found no method.
///
/// Implementations either produce a result or signal failure, normally with
/// [`RtError::NoMethod`](crate::runner::ds::error::RtError::NoMethod).
pub trait MissingMethodHandler {
    /// Called with the intended method name and the original arguments and block.
    fn call_missing(
        &self,
        rt: &mut Runtime,
        receiver: Value,
        name: &str,
        args: Vec<Value>,
        block: Option<Proc>,
    ) -> CallResult;

    /// Human-readable name for this handler (for logging).
    fn name(&self) -> &str {
        "method_missing"
    }
}

impl<F> MissingMethodHandler for F
where
    F: Fn(&mut Runtime, Value, &str, Vec<Value>, Option<Proc>) -> CallResult,
{
    fn call_missing(
        &self,
        rt: &mut Runtime,
        receiver: Value,
        name: &str,
        args: Vec<Value>,
        block: Option<Proc>,
    ) -> CallResult {
        self(rt, receiver, name, args, block)
    }
}
