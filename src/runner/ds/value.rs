use std::cell::RefCell;
use std::fmt;
use std::fmt::{Display, Formatter};
use std::rc::Rc;
use std::time::SystemTime;

use serde::Deserialize;

use crate::runner::ds::entity::EntityId;
use crate::runner::ds::error::CallResult;
use crate::runner::ds::instance::ObjectId;
use crate::runner::model::Runtime;

/// Host-native representations that can be bridged onto a class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NativeKind {
    List,
    Text,
    Number,
    Callable,
    Error,
    Time,
    Boolean,
    Nil,
}

impl NativeKind {
    pub const ALL: [NativeKind; 8] = [
        NativeKind::List,
        NativeKind::Text,
        NativeKind::Number,
        NativeKind::Callable,
        NativeKind::Error,
        NativeKind::Time,
        NativeKind::Boolean,
        NativeKind::Nil,
    ];

    /// The native kind backing `value`, `None` for object-model records.
    pub fn of(value: &Value) -> Option<NativeKind> {
        match value {
            Value::Nil => Some(NativeKind::Nil),
            Value::Boolean(_) => Some(NativeKind::Boolean),
            Value::Integer(_) | Value::Float(_) => Some(NativeKind::Number),
            Value::Str(_) => Some(NativeKind::Text),
            Value::Array(_) => Some(NativeKind::List),
            Value::Proc(_) => Some(NativeKind::Callable),
            Value::Exception(_) => Some(NativeKind::Error),
            Value::Time(_) => Some(NativeKind::Time),
            Value::Object(_) | Value::Entity(_) => None,
        }
    }
}

impl Display for NativeKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let s = match self {
            NativeKind::List => "list",
            NativeKind::Text => "text",
            NativeKind::Number => "number",
            NativeKind::Callable => "callable",
            NativeKind::Error => "error",
            NativeKind::Time => "time",
            NativeKind::Boolean => "boolean",
            NativeKind::Nil => "nil",
        };
        write!(f, "{}", s)
    }
}

pub type BlockFn = dyn Fn(&mut Runtime, Vec<Value>) -> CallResult;

/// A callable block. Identity is the allocation, so clones compare equal.
#[derive(Clone)]
pub struct Proc {
    body: Rc<BlockFn>,
}

impl Proc {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&mut Runtime, Vec<Value>) -> CallResult + 'static,
    {
        Proc { body: Rc::new(f) }
    }

    pub fn call(&self, rt: &mut Runtime, args: Vec<Value>) -> CallResult {
        (self.body)(rt, args)
    }

    /// Stable identity used to tag `break` signals.
    pub fn id(&self) -> usize {
        Rc::as_ptr(&self.body) as *const () as usize
    }

    pub fn ptr_eq(&self, other: &Proc) -> bool {
        self.id() == other.id()
    }
}

impl fmt::Debug for Proc {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Proc({:#x})", self.id())
    }
}

/// Payload of a bridged error value.
#[derive(Debug, Clone, PartialEq)]
pub struct ExceptionData {
    pub class: EntityId,
    pub message: String,
}

#[derive(Clone)]
pub enum Value {
    Nil,
    Boolean(bool),
    Integer(i64),
    Float(f64),
    Str(Rc<str>),
    Array(Rc<RefCell<Vec<Value>>>),
    Proc(Proc),
    Exception(Rc<ExceptionData>),
    Time(SystemTime),
    Object(ObjectId),
    Entity(EntityId),
}

impl Value {
    pub fn str(s: &str) -> Value {
        Value::Str(Rc::from(s))
    }

    pub fn array(items: Vec<Value>) -> Value {
        Value::Array(Rc::new(RefCell::new(items)))
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    pub fn truthy(&self) -> bool {
        !matches!(self, Value::Nil | Value::Boolean(false))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_entity(&self) -> Option<EntityId> {
        match self {
            Value::Entity(id) => Some(*id),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<ObjectId> {
        match self {
            Value::Object(id) => Some(*id),
            _ => None,
        }
    }

    /// Reference identity (`equal?`). Immediates compare by value.
    pub fn identical(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Str(a), Value::Str(b)) => Rc::ptr_eq(a, b),
            (Value::Array(a), Value::Array(b)) => Rc::ptr_eq(a, b),
            (Value::Exception(a), Value::Exception(b)) => Rc::ptr_eq(a, b),
            (Value::Proc(a), Value::Proc(b)) => a.ptr_eq(b),
            _ => self == other,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::str(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Integer(a), Value::Float(b)) | (Value::Float(b), Value::Integer(a)) => {
                (*a as f64) == *b
            }
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => Rc::ptr_eq(a, b) || *a.borrow() == *b.borrow(),
            (Value::Proc(a), Value::Proc(b)) => a.ptr_eq(b),
            (Value::Exception(a), Value::Exception(b)) => Rc::ptr_eq(a, b),
            (Value::Time(a), Value::Time(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a == b,
            (Value::Entity(a), Value::Entity(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => write!(f, "Value::Nil"),
            Value::Boolean(b) => write!(f, "Value::Boolean({})", b),
            Value::Integer(i) => write!(f, "Value::Integer({})", i),
            Value::Float(n) => write!(f, "Value::Float({})", n),
            Value::Str(s) => write!(f, "Value::Str({:?})", s),
            Value::Array(a) => write!(f, "Value::Array({:?})", a.borrow()),
            Value::Proc(p) => write!(f, "Value::Proc({:#x})", p.id()),
            Value::Exception(e) => write!(f, "Value::Exception({:?})", e.message),
            Value::Time(t) => write!(f, "Value::Time({:?})", t),
            Value::Object(o) => write!(f, "Value::Object({})", o),
            Value::Entity(e) => write!(f, "Value::Entity({})", e),
        }
    }
}
