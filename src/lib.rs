//! # mantle - a class-based object-model runtime
//!
//! A live representation of classes, modules, objects and methods that
//! resolves every call at call time:
//! - Single inheritance with an ordered mixin chain (iclasses + donation)
//! - Lazily built singleton classes for objects and classes
//! - `super` resolution through interleaved mixin proxies
//! - A per-entity capability for unresolved calls, plus stub placeholders
//! - Host-native values (lists, text, numbers, callables, errors, times)
//!   bridged onto classes
//! - `break`/`return` as explicit control values
//!
//! ## Quick Start
//!
//! ```
//! use mantle::runner::ds::method::MethodBody;
//! use mantle::runner::ds::value::Value;
//! use mantle::runner::model::Runtime;
//!
//! let mut rt = Runtime::with_core().unwrap();
//! let object = rt.object_class();
//!
//! // module Greet; def hello = "hi"; end
//! let greet = rt.define_module(object, "Greet").unwrap();
//! rt.define_method(greet, "hello", MethodBody::closure(|_rt, _this, _args, _block| {
//!     Ok(Value::str("hi"))
//! }))
//! .unwrap();
//!
//! // class A; include Greet; end
//! let a = rt.define_class(object, None, "A").unwrap();
//! rt.include(greet, a).unwrap();
//!
//! let instance = rt.new_instance(a, vec![]).unwrap();
//! let result = Runtime::settle(rt.send(instance, "hello", vec![])).unwrap();
//! assert_eq!(result, Value::str("hi"));
//! ```
//!
//! ### Handling unresolved calls
//!
//! ```
//! use mantle::runner::ds::error::RtError;
//! use mantle::runner::ds::value::Value;
//! use mantle::runner::model::Runtime;
//!
//! let mut rt = Runtime::new();
//! let object = rt.object_class();
//! let ghost = rt.define_class(object, None, "Ghost").unwrap();
//! rt.set_missing_handler_fn(ghost, |_rt, _this, name, _args, _block| {
//!     Ok(Value::str(&format!("boo from {}", name)))
//! });
//!
//! let g = rt.new_instance(ghost, vec![]).unwrap();
//! assert_eq!(rt.send(g, "area", vec![]).unwrap(), Value::str("boo from area"));
//! ```
//!
//! ## Architecture
//!
//! - **[`parser`]** - pest grammar for constant paths and method names
//! - **[`runner`]** - the object model
//!   - **[`runner::ds`]** - Data structures (values, entities, scopes, method tables, heap)
//!   - **[`runner::model`]** - The runtime: registration, donation, dispatch, super, bridging
//!   - **[`runner::plugin`]** - Built-in registry, unresolved-method capability, configuration
//!   - **[`runner::std_lib`]** - Core built-in classes

#[macro_use]
extern crate lazy_static;

pub mod parser;
pub mod runner;
