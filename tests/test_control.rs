//! Tests for `break`/`return` as control values.

extern crate mantle;

use std::cell::RefCell;
use std::rc::Rc;

use mantle::runner::ds::error::{Control, RtError};
use mantle::runner::ds::method::MethodBody;
use mantle::runner::ds::value::{Proc, Value};
use mantle::runner::model::Runtime;

/// A runtime with `Loop#each_number` yielding 1, 2, 3 and returning nil.
fn with_loop() -> (Runtime, Value) {
    let mut rt = Runtime::new();
    let object = rt.object_class();
    let looper = rt.define_class(object, None, "Loop").unwrap();
    rt.define_method(
        looper,
        "each_number",
        MethodBody::closure(|rt, _this, _args, block| {
            for i in 1..=3 {
                rt.yield_block(block.as_ref(), vec![Value::Integer(i)])?;
            }
            Ok(Value::Nil)
        }),
    )
    .unwrap();
    let instance = rt.new_instance(looper, vec![]).unwrap();
    (rt, instance)
}

mod breaking {
    use super::*;

    #[test]
    fn test_break_ends_the_receiving_call() {
        let (mut rt, instance) = with_loop();
        let block = Proc::new(|rt, args| {
            if args[0] == Value::Integer(2) {
                return Err(rt.break_with(Value::str("stopped at 2")));
            }
            Ok(Value::Nil)
        });

        let result = rt
            .send_with_block(instance, "each_number", vec![], Some(block))
            .unwrap();
        assert_eq!(result, Value::str("stopped at 2"));
        assert!(rt.frames().is_empty());
    }

    #[test]
    fn test_loop_without_break_completes() {
        let (mut rt, instance) = with_loop();
        let block = Proc::new(|_rt, _args| Ok(Value::Nil));
        let result = rt
            .send_with_block(instance, "each_number", vec![], Some(block))
            .unwrap();
        assert_eq!(result, Value::Nil);
    }

    #[test]
    fn test_break_passes_through_unrelated_calls() {
        let (mut rt, instance) = with_loop();
        let object = rt.object_class();
        // `outer` relays its block through a block of its own; the break
        // belongs to `outer`'s call, not to `each_number`'s.
        rt.define_method(
            object,
            "outer",
            MethodBody::closure(|rt, this, _args, block| {
                let outer_block = block.unwrap();
                let relay = Proc::new(move |rt, args| outer_block.call(rt, args));
                rt.send_with_block(this, "each_number", vec![], Some(relay))?;
                Ok(Value::str("not reached"))
            }),
        )
        .unwrap();

        let slot: Rc<RefCell<Option<Proc>>> = Rc::new(RefCell::new(None));
        let own = slot.clone();
        let block = Proc::new(move |_rt, _args| {
            let me = own.borrow().clone().unwrap();
            Err(Runtime::break_from(&me, Value::Integer(1)))
        });
        *slot.borrow_mut() = Some(block.clone());

        let result = rt
            .send_with_block(instance, "outer", vec![], Some(block))
            .unwrap();
        assert_eq!(result, Value::Integer(1));
    }

    fn break_at_first() -> Proc {
        Proc::new(|rt, _args| Err(rt.break_with(Value::Integer(42))))
    }

    #[test]
    fn test_break_through_implicit_super_block() {
        let mut rt = Runtime::new();
        let object = rt.object_class();
        let parent = rt.define_class(object, None, "Parent").unwrap();
        rt.define_method(
            parent,
            "m",
            MethodBody::closure(|rt, _this, _args, block| {
                rt.yield_block(block.as_ref(), vec![])?;
                Ok(Value::str("parent after"))
            }),
        )
        .unwrap();
        let child = rt.define_class(object, Some(parent), "Child").unwrap();
        rt.define_method(
            child,
            "m",
            MethodBody::closure(|rt, _this, args, _block| {
                rt.call_super(args, None)?;
                Ok(Value::str("child after"))
            }),
        )
        .unwrap();

        let instance = rt.new_instance(child, vec![]).unwrap();
        let result = rt
            .send_with_block(instance, "m", vec![], Some(break_at_first()))
            .unwrap();
        assert_eq!(result, Value::Integer(42));
        assert!(rt.frames().is_empty());
    }

    #[test]
    fn test_break_through_explicitly_forwarded_block() {
        let (mut rt, instance) = with_loop();
        let object = rt.object_class();
        rt.define_method(
            object,
            "outer",
            MethodBody::closure(|rt, this, _args, block| {
                rt.send_with_block(this, "each_number", vec![], block)?;
                Ok(Value::str("outer after"))
            }),
        )
        .unwrap();

        let result = rt
            .send_with_block(instance, "outer", vec![], Some(break_at_first()))
            .unwrap();
        assert_eq!(result, Value::Integer(42));
        assert!(rt.frames().is_empty());
    }

    #[test]
    fn test_break_without_block_is_local_jump() {
        let rt = Runtime::new();
        match rt.break_with(Value::Nil) {
            Control::Error(RtError::LocalJump(_)) => {}
            other => panic!("expected LocalJump, got {:?}", other),
        }
    }

    #[test]
    fn test_uncaught_break_settles_to_local_jump() {
        let block = Proc::new(|_rt, _args| Ok(Value::Nil));
        let err = Runtime::settle(Err(Runtime::break_from(&block, Value::Nil))).unwrap_err();
        assert!(matches!(err, RtError::LocalJump(_)));
        assert_eq!(err.class_name(), "LocalJumpError");
    }
}

mod returning {
    use super::*;

    #[test]
    fn test_return_from_block_ends_the_defining_method() {
        let (mut rt, instance) = with_loop();
        let object = rt.object_class();
        rt.define_method(
            object,
            "find_two",
            MethodBody::closure(|rt, this, _args, _block| {
                let frame = rt.current_frame_id().unwrap();
                let block = Proc::new(move |_rt, args| {
                    if args[0] == Value::Integer(2) {
                        return Err(Runtime::return_from(frame, args[0].clone()));
                    }
                    Ok(Value::Nil)
                });
                rt.send_with_block(this, "each_number", vec![], Some(block))?;
                Ok(Value::str("not found"))
            }),
        )
        .unwrap();

        let result = rt.send(instance, "find_two", vec![]).unwrap();
        assert_eq!(result, Value::Integer(2));
        assert!(rt.frames().is_empty());
    }

    #[test]
    fn test_return_to_finished_frame_settles_to_local_jump() {
        let (mut rt, instance) = with_loop();
        let object = rt.object_class();
        rt.define_method(
            object,
            "frame_id",
            MethodBody::closure(|rt, _this, _args, _block| {
                let id = rt.current_frame_id().unwrap();
                Ok(Value::Proc(Proc::new(move |_rt, _args| {
                    Err(Runtime::return_from(id, Value::Nil))
                })))
            }),
        )
        .unwrap();

        let escaped = match rt.send(instance, "frame_id", vec![]).unwrap() {
            Value::Proc(p) => p,
            other => panic!("expected a proc, got {:?}", other),
        };
        let err = Runtime::settle(escaped.call(&mut rt, vec![])).unwrap_err();
        assert_eq!(err.to_string(), "unexpected return");
    }
}

mod yielding {
    use super::*;

    #[test]
    fn test_yield_without_block() {
        let (mut rt, instance) = with_loop();
        let err = Runtime::settle(rt.send(instance, "each_number", vec![])).unwrap_err();
        assert_eq!(err.to_string(), "no block given (yield)");
    }

    #[test]
    fn test_current_block_inside_method() {
        let mut rt = Runtime::new();
        let object = rt.object_class();
        rt.define_method(
            object,
            "has_block?",
            MethodBody::closure(|rt, _this, _args, _block| {
                Ok(Value::Boolean(rt.current_block().is_some()))
            }),
        )
        .unwrap();
        let c = rt.define_class(object, None, "C").unwrap();
        let instance = rt.new_instance(c, vec![]).unwrap();

        let block = Proc::new(|_rt, _args| Ok(Value::Nil));
        assert_eq!(
            rt.send_with_block(instance.clone(), "has_block?", vec![], Some(block))
                .unwrap(),
            Value::Boolean(true)
        );
        assert_eq!(
            rt.send(instance, "has_block?", vec![]).unwrap(),
            Value::Boolean(false)
        );
    }
}
