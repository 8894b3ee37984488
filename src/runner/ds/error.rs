use std::fmt;
use std::rc::Rc;

use thiserror::Error;

use crate::runner::ds::value::{ExceptionData, NativeKind, Value};
use crate::runner::model::FrameId;

/// Errors raised synchronously by the object model.
#[derive(Debug, Clone, Error)]
pub enum RtError {
    /// A name was re-declared as the wrong kind of entity.
    #[error("{name} is not a {expected}")]
    KindMismatch { name: String, expected: &'static str },
    #[error("superclass mismatch for class {name}")]
    SuperclassMismatch { name: String },
    #[error("super: no superclass method `{name}' for {receiver}")]
    NoSuperMethod { name: String, receiver: String },
    #[error("undefined method `{name}' for {receiver}")]
    NoMethod { name: String, receiver: String },
    #[error("{0}")]
    NameError(String),
    #[error("{0}")]
    TypeError(String),
    #[error("{0}")]
    ArgumentError(String),
    #[error("invalid mixin: {0}")]
    InvalidMixin(String),
    #[error("native type {0} already bridged")]
    AlreadyBridged(NativeKind),
    #[error("invalid name `{0}'")]
    InvalidName(String),
    #[error("instance limit of {0} reached")]
    HeapExhausted(usize),
    #[error("{0}")]
    LocalJump(String),
    /// A guest-level exception value.
    #[error("{}", .0.message)]
    Raised(Rc<ExceptionData>),
}

impl RtError {
    pub fn no_method(name: &str, receiver: impl Into<String>) -> Self {
        RtError::NoMethod {
            name: name.to_string(),
            receiver: receiver.into(),
        }
    }

    pub fn uninitialized_constant(name: &str) -> Self {
        RtError::NameError(format!("uninitialized constant {}", name))
    }

    /// The built-in exception class name this error maps to.
    pub fn class_name(&self) -> &'static str {
        match self {
            RtError::KindMismatch { .. }
            | RtError::SuperclassMismatch { .. }
            | RtError::TypeError(_)
            | RtError::InvalidMixin(_) => "TypeError",
            RtError::NoSuperMethod { .. } | RtError::NoMethod { .. } => "NoMethodError",
            RtError::NameError(_) | RtError::InvalidName(_) => "NameError",
            RtError::ArgumentError(_) | RtError::AlreadyBridged(_) => "ArgumentError",
            RtError::HeapExhausted(_) => "NoMemoryError",
            RtError::LocalJump(_) => "LocalJumpError",
            RtError::Raised(_) => "Exception",
        }
    }
}

/// Outcome of a method invocation that did not produce a plain value.
///
/// `Break` and `Return` are the non-local exits: they travel up through
/// ordinary returns until the call that owns their target converts them
/// back into a value.
#[derive(Clone)]
pub enum Control {
    Error(RtError),
    Break { target: usize, value: Value },
    Return { frame: FrameId, value: Value },
}

impl Control {
    pub fn as_error(&self) -> Option<&RtError> {
        match self {
            Control::Error(e) => Some(e),
            _ => None,
        }
    }

    pub fn into_error(self) -> RtError {
        match self {
            Control::Error(e) => e,
            Control::Break { .. } => {
                RtError::LocalJump("break from proc-closure".to_string())
            }
            Control::Return { .. } => RtError::LocalJump("unexpected return".to_string()),
        }
    }
}

impl From<RtError> for Control {
    fn from(e: RtError) -> Self {
        Control::Error(e)
    }
}

impl fmt::Debug for Control {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Control::Error(e) => write!(f, "Control::Error({:?})", e),
            Control::Break { target, value } => {
                write!(f, "Control::Break({:#x}, {:?})", target, value)
            }
            Control::Return { frame, value } => {
                write!(f, "Control::Return({:?}, {:?})", frame, value)
            }
        }
    }
}

impl fmt::Display for Control {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Control::Error(e) => write!(f, "{}", e),
            Control::Break { .. } => write!(f, "break from proc-closure"),
            Control::Return { .. } => write!(f, "unexpected return"),
        }
    }
}

pub type CallResult = Result<Value, Control>;
