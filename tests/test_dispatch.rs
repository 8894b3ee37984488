//! Tests for call-time method resolution and the unresolved-method path.

extern crate mantle;

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use mantle::runner::ds::error::{Control, RtError};
use mantle::runner::ds::heap::HeapConfig;
use mantle::runner::ds::method::MethodBody;
use mantle::runner::ds::value::{Proc, Value};
use mantle::runner::model::Runtime;
use mantle::runner::plugin::config::RuntimeConfig;
use mantle::runner::plugin::resolver::MissingMethodHandler;

fn says(text: &'static str) -> Rc<MethodBody> {
    MethodBody::closure(move |_rt, _this, _args, _block| Ok(Value::str(text)))
}

/// Counts calls and records the last name and arguments it saw.
#[derive(Default)]
struct Recorder {
    calls: Cell<usize>,
    last: RefCell<Option<(String, Vec<Value>, bool)>>,
}

impl MissingMethodHandler for Recorder {
    fn call_missing(
        &self,
        _rt: &mut Runtime,
        _receiver: Value,
        name: &str,
        args: Vec<Value>,
        block: Option<Proc>,
    ) -> Result<Value, Control> {
        self.calls.set(self.calls.get() + 1);
        *self.last.borrow_mut() = Some((name.to_string(), args, block.is_some()));
        Ok(Value::str("recorded"))
    }

    fn name(&self) -> &str {
        "recorder"
    }
}

// ============================================================================
// Lookup
// ============================================================================

mod lookup {
    use super::*;

    #[test]
    fn test_superclass_method_found() {
        let mut rt = Runtime::new();
        let object = rt.object_class();
        let base = rt.define_class(object, None, "Base").unwrap();
        let derived = rt.define_class(object, Some(base), "Derived").unwrap();
        rt.define_method(base, "shape", says("base")).unwrap();

        let instance = rt.new_instance(derived, vec![]).unwrap();
        let entry = rt.find_method(&instance, "shape").unwrap();
        assert_eq!(entry.owner(), base);
        assert_eq!(rt.send(instance, "shape", vec![]).unwrap(), Value::str("base"));
    }

    #[test]
    fn test_dispatch_chain_and_is_a() {
        let mut rt = Runtime::new();
        let object = rt.object_class();
        let m = rt.define_module(object, "M").unwrap();
        let c = rt.define_class(object, None, "C").unwrap();
        rt.include(m, c).unwrap();
        let instance = rt.new_instance(c, vec![]).unwrap();

        let chain = rt.dispatch_chain(&instance);
        assert_eq!(chain.len(), 4);
        assert_eq!(chain[0], c);
        assert!(rt.is_a(&instance, m));
        assert!(rt.is_a(&instance, object));
        assert!(!rt.is_a(&instance, rt.module_class()));
    }

    #[test]
    fn test_class_methods_inherit() {
        let mut rt = Runtime::new();
        let object = rt.object_class();
        let base = rt.define_class(object, None, "Base").unwrap();
        let derived = rt.define_class(object, Some(base), "Derived").unwrap();
        rt.define_singleton_method(&Value::Entity(base), "build", says("built"))
            .unwrap();

        let result = rt.send(Value::Entity(derived), "build", vec![]).unwrap();
        assert_eq!(result, Value::str("built"));
        // Instances do not see class methods.
        let instance = rt.new_instance(derived, vec![]).unwrap();
        assert!(!rt.responds_to(&instance, "build"));
    }

    #[test]
    fn test_initialize_receives_arguments() {
        let mut rt = Runtime::new();
        let object = rt.object_class();
        let point = rt.define_class(object, None, "Point").unwrap();
        rt.define_method(
            point,
            "initialize",
            MethodBody::closure(|rt, this, args, _block| {
                let id = this.as_object().unwrap();
                rt.instance_mut(id).set_ivar("@x", args[0].clone());
                Ok(Value::Nil)
            }),
        )
        .unwrap();

        let p = rt.new_instance(point, vec![Value::Integer(3)]).unwrap();
        let id = p.as_object().unwrap();
        assert_eq!(rt.instance(id).ivar("@x"), Some(&Value::Integer(3)));
    }

    #[test]
    fn test_modules_are_not_instantiable() {
        let mut rt = Runtime::new();
        let object = rt.object_class();
        let m = rt.define_module(object, "M").unwrap();
        match rt.new_instance(m, vec![]) {
            Err(Control::Error(RtError::NoMethod { name, receiver })) => {
                assert_eq!(name, "new");
                assert_eq!(receiver, "module M");
            }
            other => panic!("expected NoMethod, got {:?}", other),
        }
    }

    #[test]
    fn test_instance_limit() {
        let config = RuntimeConfig::default().with_heap(HeapConfig::with_limit(2));
        let mut rt = Runtime::with_config(config);
        let object = rt.object_class();
        let c = rt.define_class(object, None, "C").unwrap();
        rt.new_instance(c, vec![]).unwrap();
        rt.new_instance(c, vec![]).unwrap();

        let err = rt.allocate(c).unwrap_err();
        assert!(matches!(err, RtError::HeapExhausted(2)));
        assert_eq!(err.class_name(), "NoMemoryError");
    }
}

// ============================================================================
// Unresolved-method path
// ============================================================================

mod missing {
    use super::*;

    #[test]
    fn test_stub_invokes_handler_exactly_once() {
        let mut rt = Runtime::new();
        let object = rt.object_class();
        let c = rt.define_class(object, None, "C").unwrap();
        let recorder = Rc::new(Recorder::default());
        rt.set_missing_handler(c, recorder.clone());
        rt.add_stubs(&["area"]).unwrap();

        let instance = rt.new_instance(c, vec![]).unwrap();
        let args = vec![Value::Integer(2), Value::str("cm")];
        let result = rt.send(instance, "area", args.clone()).unwrap();

        assert_eq!(result, Value::str("recorded"));
        assert_eq!(recorder.calls.get(), 1);
        assert_eq!(
            *recorder.last.borrow(),
            Some(("area".to_string(), args, false))
        );
    }

    #[test]
    fn test_stub_is_invisible_to_lookup() {
        let mut rt = Runtime::new();
        let object = rt.object_class();
        let c = rt.define_class(object, None, "C").unwrap();
        rt.add_stubs(&["area"]).unwrap();
        let instance = rt.new_instance(c, vec![]).unwrap();

        assert!(rt.find_method(&instance, "area").is_none());
        assert!(!rt.responds_to(&instance, "area"));

        // A real definition further down the chain still wins over the stub.
        rt.define_method(c, "area", says("real")).unwrap();
        assert_eq!(rt.send(instance, "area", vec![]).unwrap(), Value::str("real"));
    }

    #[test]
    fn test_handler_found_through_superclass_and_mixin() {
        let mut rt = Runtime::new();
        let object = rt.object_class();
        let m = rt.define_module(object, "Fallback").unwrap();
        let c = rt.define_class(object, None, "C").unwrap();
        let d = rt.define_class(object, Some(c), "D").unwrap();
        rt.include(m, c).unwrap();
        let recorder = Rc::new(Recorder::default());
        rt.set_missing_handler(m, recorder.clone());

        let instance = rt.new_instance(d, vec![]).unwrap();
        rt.send(instance, "anything", vec![]).unwrap();
        assert_eq!(recorder.calls.get(), 1);
    }

    #[test]
    fn test_block_is_forwarded_to_handler() {
        let mut rt = Runtime::new();
        let object = rt.object_class();
        let c = rt.define_class(object, None, "C").unwrap();
        let recorder = Rc::new(Recorder::default());
        rt.set_missing_handler(c, recorder.clone());

        let instance = rt.new_instance(c, vec![]).unwrap();
        let block = Proc::new(|_rt, _args| Ok(Value::Nil));
        rt.send_with_block(instance, "each_thing", vec![], Some(block))
            .unwrap();
        assert_eq!(recorder.last.borrow().as_ref().map(|l| l.2), Some(true));
    }

    #[test]
    fn test_nearest_handler_wins() {
        let mut rt = Runtime::new();
        let object = rt.object_class();
        let c = rt.define_class(object, None, "C").unwrap();
        let d = rt.define_class(object, Some(c), "D").unwrap();
        rt.set_missing_handler_fn(c, |_rt, _this, _name, _args, _block| Ok(Value::str("c")));
        rt.set_missing_handler_fn(d, |_rt, _this, _name, _args, _block| Ok(Value::str("d")));

        let instance = rt.new_instance(d, vec![]).unwrap();
        assert_eq!(rt.send(instance.clone(), "x", vec![]).unwrap(), Value::str("d"));

        rt.clear_missing_handler(d);
        assert_eq!(rt.send(instance, "x", vec![]).unwrap(), Value::str("c"));
    }

    #[test]
    fn test_unresolved_class_method() {
        let mut rt = Runtime::new();
        let object = rt.object_class();
        let c = rt.define_class(object, None, "C").unwrap();
        let err = Runtime::settle(rt.send(Value::Entity(c), "nope", vec![])).unwrap_err();
        assert_eq!(err.to_string(), "undefined method `nope' for class C");
    }
}
