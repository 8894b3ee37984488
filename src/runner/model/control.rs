//! `break` and `return` as explicit control values.
//!
//! Both travel up as `Err(Control::..)` through ordinary returns. The call
//! that owns the target converts them back: `invoke` turns a `Return` for
//! its own frame, or a `Break` from a block first attached to it, into its
//! result. Calls a block is only forwarded to let the `Break` pass.

use super::{FrameId, Runtime};
use crate::runner::ds::error::{CallResult, Control, RtError};
use crate::runner::ds::value::{Proc, Value};

impl Runtime {
    /// `break value` inside a block: ends the call the block was passed to.
    pub fn break_with(&self, value: Value) -> Control {
        match self.current_frame().and_then(|f| f.block.as_ref()) {
            Some(block) => Control::Break {
                target: block.id(),
                value,
            },
            None => RtError::LocalJump("break from proc-closure".to_string()).into(),
        }
    }

    /// `break value` aimed at the call that received `block`.
    pub fn break_from(block: &Proc, value: Value) -> Control {
        Control::Break {
            target: block.id(),
            value,
        }
    }

    /// `return value` aimed at the invocation owning `frame`.
    pub fn return_from(frame: FrameId, value: Value) -> Control {
        Control::Return { frame, value }
    }

    pub fn current_frame_id(&self) -> Option<FrameId> {
        self.current_frame().map(|f| f.id)
    }

    /// The block given to the running method.
    pub fn current_block(&self) -> Option<Proc> {
        self.current_frame().and_then(|f| f.block.clone())
    }

    /// `yield`: call `block` with `args`.
    pub fn yield_block(&mut self, block: Option<&Proc>, args: Vec<Value>) -> CallResult {
        match block {
            Some(block) => block.call(self, args),
            None => Err(RtError::LocalJump("no block given (yield)".to_string()).into()),
        }
    }

    /// Close a call at the top level: an exit nobody caught is a `LocalJump`.
    pub fn settle(result: CallResult) -> Result<Value, RtError> {
        result.map_err(Control::into_error)
    }
}

/// Convert a `break` out of `block` into a normal result, for native code
/// that runs a block it did not receive as its own call block.
pub fn catch_break(block: &Proc, result: CallResult) -> CallResult {
    match result {
        Err(Control::Break { target, value }) if target == block.id() => Ok(value),
        other => other,
    }
}
