//! Plain data of the object model: values, entities, scopes, method tables
//! and the arena that owns them.

pub mod entity;
pub mod error;
pub mod heap;
pub mod instance;
pub mod method;
pub mod scope;
pub mod value;

pub use entity::{Attachment, Entity, EntityId, EntityKind};
pub use error::{CallResult, Control, RtError};
pub use instance::{Instance, ObjectId};
pub use method::{MethodBody, MethodEntry, MethodTable};
pub use scope::{Scope, ScopeId};
pub use value::{ExceptionData, NativeKind, Proc, Value};
