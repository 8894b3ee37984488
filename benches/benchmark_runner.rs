/// Benchmark runner for the object model.
///
/// Times call-time resolution (direct, mixin, super, unresolved) and
/// donation fan-out, then verifies the results each scenario produces.

extern crate mantle;

use mantle::runner::ds::entity::EntityId;
use mantle::runner::ds::method::MethodBody;
use mantle::runner::ds::value::Value;
use mantle::runner::model::Runtime;
use std::time::{Duration, Instant};

/// A class `Leaf` sitting `depth` includes deep, with `ping` defined on the
/// innermost module.
fn deep_chain(depth: usize) -> (Runtime, Value) {
    let mut rt = Runtime::with_core().unwrap();
    let object = rt.object_class();
    let leaf = rt.define_class(object, None, "Leaf").unwrap();
    for i in 0..depth {
        let module = rt.define_module(object, &format!("Mixin{}", i)).unwrap();
        if i == 0 {
            rt.define_method(
                module,
                "ping",
                MethodBody::closure(|_rt, _this, _args, _block| Ok(Value::Integer(1))),
            )
            .unwrap();
        }
        rt.include(module, leaf).unwrap();
    }
    let instance = rt.new_instance(leaf, vec![]).unwrap();
    (rt, instance)
}

/// `depth` classes, each overriding `count` as `super + 1`.
fn super_chain(depth: usize) -> (Runtime, Value) {
    let mut rt = Runtime::with_core().unwrap();
    let object = rt.object_class();
    let mut superclass: Option<EntityId> = None;
    for i in 0..depth {
        let class = rt
            .define_class(object, superclass, &format!("Level{}", i))
            .unwrap();
        let body = if i == 0 {
            MethodBody::closure(|_rt, _this, _args, _block| Ok(Value::Integer(1)))
        } else {
            MethodBody::closure(|rt, _this, args, block| match rt.call_super(args, block)? {
                Value::Integer(n) => Ok(Value::Integer(n + 1)),
                other => Ok(other),
            })
        };
        rt.define_method(class, "count", body).unwrap();
        superclass = Some(class);
    }
    let instance = rt.new_instance(superclass.unwrap(), vec![]).unwrap();
    (rt, instance)
}

/// A stubbed name on a class whose unresolved-call handler answers it.
fn stubbed() -> (Runtime, Value) {
    let mut rt = Runtime::with_core().unwrap();
    let object = rt.object_class();
    let ghost = rt.define_class(object, None, "Ghost").unwrap();
    rt.set_missing_handler_fn(ghost, |_rt, _this, _name, _args, _block| {
        Ok(Value::Integer(42))
    });
    rt.add_stubs(&["area"]).unwrap();
    let instance = rt.new_instance(ghost, vec![]).unwrap();
    (rt, instance)
}

fn run_send(rt: &mut Runtime, receiver: &Value, name: &str, iterations: u32) -> Duration {
    let start = Instant::now();
    for _ in 0..iterations {
        let _ = rt.send(receiver.clone(), name, vec![]);
    }
    start.elapsed()
}

/// Define a method on a module included by `includers` classes.
fn run_donation(includers: usize, iterations: u32) -> Duration {
    let mut rt = Runtime::with_core().unwrap();
    let object = rt.object_class();
    let module = rt.define_module(object, "Shared").unwrap();
    for i in 0..includers {
        let class = rt.define_class(object, None, &format!("User{}", i)).unwrap();
        rt.include(module, class).unwrap();
    }

    let start = Instant::now();
    for i in 0..iterations {
        let name = format!("m{}", i);
        rt.define_method(
            module,
            &name,
            MethodBody::closure(|_rt, _this, _args, _block| Ok(Value::Nil)),
        )
        .unwrap();
    }
    start.elapsed()
}

fn report(name: &str, iterations: u32, elapsed: Duration) {
    let per_op = elapsed / iterations;
    println!("{:<34} {:>10} {:>12.2?} {:>12.2?}", name, iterations, elapsed, per_op);
}

fn main() {
    println!("=======================================================");
    println!("  mantle - Object Model Benchmarks");
    println!("=======================================================\n");

    println!("{:<34} {:>10} {:>12} {:>12}", "Benchmark", "Iterations", "Total", "Per op");
    println!("{}", "-".repeat(71));

    let (mut rt, instance) = deep_chain(1);
    report("Mixin send (depth 1)", 100_000, run_send(&mut rt, &instance, "ping", 100_000));

    let (mut rt, instance) = deep_chain(32);
    report("Mixin send (depth 32)", 100_000, run_send(&mut rt, &instance, "ping", 100_000));

    let (mut rt, instance) = super_chain(16);
    report("Super chain (16 levels)", 10_000, run_send(&mut rt, &instance, "count", 10_000));

    let (mut rt, instance) = stubbed();
    report("Stub to unresolved handler", 100_000, run_send(&mut rt, &instance, "area", 100_000));

    report("Donation (100 includers)", 1_000, run_donation(100, 1_000));

    println!("\n=======================================================");
    println!("  Correctness Verification");
    println!("=======================================================\n");

    println!("{:<34} {:>10} {:>10}", "Scenario", "Expected", "Actual");
    println!("{}", "-".repeat(56));

    let checks: Vec<(&str, Box<dyn Fn() -> Value>, i64)> = vec![
        (
            "Mixin send (depth 32)",
            Box::new(|| {
                let (mut rt, instance) = deep_chain(32);
                Runtime::settle(rt.send(instance, "ping", vec![])).unwrap_or(Value::Nil)
            }),
            1,
        ),
        (
            "Super chain (16 levels)",
            Box::new(|| {
                let (mut rt, instance) = super_chain(16);
                Runtime::settle(rt.send(instance, "count", vec![])).unwrap_or(Value::Nil)
            }),
            16,
        ),
        (
            "Stub to unresolved handler",
            Box::new(|| {
                let (mut rt, instance) = stubbed();
                Runtime::settle(rt.send(instance, "area", vec![])).unwrap_or(Value::Nil)
            }),
            42,
        ),
    ];

    for (name, check, expected) in checks {
        let actual = match check() {
            Value::Integer(n) => n,
            _ => -1,
        };
        let status = if actual == expected { "✓" } else { "✗" };
        println!("{:<34} {:>10} {:>4} {:>5}", name, expected, status, actual);
    }
}
