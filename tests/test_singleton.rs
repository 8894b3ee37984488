//! Tests for lazily built singleton classes.

extern crate mantle;

use std::rc::Rc;

use mantle::runner::ds::entity::{Attachment, EntityKind};
use mantle::runner::ds::error::RtError;
use mantle::runner::ds::method::MethodBody;
use mantle::runner::ds::value::Value;
use mantle::runner::model::Runtime;

fn says(text: &'static str) -> Rc<MethodBody> {
    MethodBody::closure(move |_rt, _this, _args, _block| Ok(Value::str(text)))
}

mod objects {
    use super::*;

    #[test]
    fn test_singleton_method_affects_one_instance() {
        let mut rt = Runtime::new();
        let object = rt.object_class();
        let c = rt.define_class(object, None, "C").unwrap();
        rt.define_method(c, "name", says("shared")).unwrap();
        let one = rt.new_instance(c, vec![]).unwrap();
        let other = rt.new_instance(c, vec![]).unwrap();

        rt.define_direct(&one, "name", says("own")).unwrap();
        assert_eq!(rt.send(one.clone(), "name", vec![]).unwrap(), Value::str("own"));
        assert_eq!(rt.send(other, "name", vec![]).unwrap(), Value::str("shared"));
        // The class table is untouched.
        assert!(rt.entity(c).methods().get("name").unwrap().is_direct());
        assert_eq!(rt.class_of(&one), c);
    }

    #[test]
    fn test_singleton_is_built_once() {
        let mut rt = Runtime::new();
        let object = rt.object_class();
        let c = rt.define_class(object, None, "C").unwrap();
        let instance = rt.new_instance(c, vec![]).unwrap();
        let id = instance.as_object().unwrap();
        assert!(rt.instance(id).singleton().is_none());

        let first = rt.singleton_class(&instance).unwrap();
        let second = rt.singleton_class(&instance).unwrap();
        assert_eq!(first, second);
        assert_eq!(rt.instance(id).singleton(), Some(first));

        let entity = rt.entity(first);
        assert_eq!(entity.kind(), EntityKind::Singleton { attached: Attachment::Object(id) });
        assert_eq!(entity.parent(), Some(c));
        assert!(entity.methods().is_empty());
    }

    #[test]
    fn test_native_values_have_no_singleton() {
        let mut rt = Runtime::new();
        let err = rt.singleton_class(&Value::Integer(1)).unwrap_err();
        assert!(matches!(err, RtError::TypeError(_)));
        assert!(rt.define_direct(&Value::str("x"), "f", says("f")).is_err());
    }

    #[test]
    fn test_singleton_class_is_not_instantiable() {
        let mut rt = Runtime::new();
        let object = rt.object_class();
        let c = rt.define_class(object, None, "C").unwrap();
        let instance = rt.new_instance(c, vec![]).unwrap();
        let singleton = rt.singleton_class(&instance).unwrap();
        assert!(matches!(rt.allocate(singleton), Err(RtError::TypeError(_))));
    }
}

mod classes {
    use super::*;

    #[test]
    fn test_class_singleton_parent_is_superclass_singleton() {
        let mut rt = Runtime::new();
        let object = rt.object_class();
        let base = rt.define_class(object, None, "Base").unwrap();
        let derived = rt.define_class(object, Some(base), "Derived").unwrap();

        let derived_meta = rt.singleton_class(&Value::Entity(derived)).unwrap();
        let base_meta = rt.entity(base).singleton().unwrap();
        assert_eq!(rt.entity(derived_meta).parent(), Some(base_meta));
        assert_eq!(rt.entity_name(derived_meta), "#<Class:Derived>");

        // BasicObject's singleton ends at Class.
        let basic = rt.basic_object_class();
        let basic_meta = rt.entity(basic).singleton().unwrap();
        assert_eq!(rt.entity(basic_meta).parent(), Some(rt.class_class()));
    }

    #[test]
    fn test_module_singleton_parent_is_module() {
        let mut rt = Runtime::new();
        let object = rt.object_class();
        let m = rt.define_module(object, "M").unwrap();
        let meta = rt.singleton_class(&Value::Entity(m)).unwrap();
        assert_eq!(rt.entity(meta).parent(), Some(rt.module_class()));
    }

    #[test]
    fn test_class_method_added_after_subclass_singleton_exists() {
        let mut rt = Runtime::new();
        let object = rt.object_class();
        let base = rt.define_class(object, None, "Base").unwrap();
        let derived = rt.define_class(object, Some(base), "Derived").unwrap();
        rt.singleton_class(&Value::Entity(derived)).unwrap();

        rt.define_singleton_method(&Value::Entity(base), "late", says("late"))
            .unwrap();
        assert_eq!(
            rt.send(Value::Entity(derived), "late", vec![]).unwrap(),
            Value::str("late")
        );
    }

    #[test]
    fn test_extend_a_class() {
        let mut rt = Runtime::new();
        let object = rt.object_class();
        let m = rt.define_module(object, "Helpers").unwrap();
        rt.define_method(m, "helper", says("help")).unwrap();
        let c = rt.define_class(object, None, "C").unwrap();
        rt.extend(&Value::Entity(c), m).unwrap();

        assert_eq!(rt.send(Value::Entity(c), "helper", vec![]).unwrap(), Value::str("help"));
        let instance = rt.new_instance(c, vec![]).unwrap();
        assert!(!rt.responds_to(&instance, "helper"));
    }
}
