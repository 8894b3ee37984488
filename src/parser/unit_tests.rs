use super::api::{NameParser, Rule};

use pest::{consumes_to, parses_to};

#[test]
fn test_constant_name_tokens() {
    parses_to! {
        parser: NameParser,
        input: "Greet2",
        rule: Rule::constant_name,
        tokens: [
            constant_name(0, 6, [
                constant(0, 6),
                EOI(6, 6)
            ])
        ]
    };
}

#[test]
fn test_lowercase_constant_rejected() {
    assert!(!NameParser::is_constant_name("greet"));
    assert!(!NameParser::is_constant_name("Foo::Bar"));
    assert!(NameParser::check_constant_name("_Foo").is_err());
}

#[test]
fn test_absolute_constant_path() {
    let path = NameParser::parse_constant_path("::Outer::Inner").unwrap();
    assert!(path.absolute);
    assert_eq!(path.segments, vec!["Outer".to_string(), "Inner".to_string()]);
}

#[test]
fn test_relative_constant_path() {
    let path = NameParser::parse_constant_path("Outer").unwrap();
    assert!(!path.absolute);
    assert_eq!(path.segments, vec!["Outer".to_string()]);
}

#[test]
fn test_bad_constant_paths() {
    assert!(NameParser::parse_constant_path("Outer::").is_err());
    assert!(NameParser::parse_constant_path("Outer::inner").is_err());
    assert!(NameParser::parse_constant_path("").is_err());
}

#[test]
fn test_method_name_shapes() {
    for name in &["hello", "empty?", "map!", "name=", "[]=", "<=>", "+@", "__send__"] {
        assert!(NameParser::check_method_name(name).is_ok(), "{} rejected", name);
    }
}

#[test]
fn test_invalid_method_names() {
    assert!(NameParser::check_method_name("").is_err());
    assert!(NameParser::check_method_name("two words").is_err());
    assert!(NameParser::check_method_name("foo==").is_err());
    assert!(NameParser::check_method_name("1st").is_err());
}
