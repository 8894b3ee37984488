use pest::Parser;
use pest_derive::Parser;

use crate::runner::ds::error::RtError;

#[derive(Parser)]
#[grammar = "parser/names.pest"] // relative to src
pub struct NameParser;

/// A parsed `A::B::C` constant reference.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstantPath {
    /// `true` when the path starts with `::` (resolved from the top-level namespace only).
    pub absolute: bool,
    pub segments: Vec<String>,
}

impl NameParser {
    pub fn is_constant_name(name: &str) -> bool {
        NameParser::parse(Rule::constant_name, name).is_ok()
    }

    /// Validate a name used for a class, module or constant.
    pub fn check_constant_name(name: &str) -> Result<(), RtError> {
        if Self::is_constant_name(name) {
            Ok(())
        } else {
            Err(RtError::InvalidName(format!(
                "{} (constant names must start with an uppercase letter)",
                name
            )))
        }
    }

    pub fn parse_constant_path(path: &str) -> Result<ConstantPath, RtError> {
        let pairs = NameParser::parse(Rule::constant_path, path)
            .map_err(|_| RtError::InvalidName(path.to_string()))?;

        let mut absolute = false;
        let mut segments = vec![];
        for pair in pairs.flatten() {
            match pair.as_rule() {
                Rule::root_marker => absolute = true,
                Rule::constant => segments.push(pair.as_str().to_string()),
                _ => { /* Structural rules carry no data */ }
            }
        }
        Ok(ConstantPath { absolute, segments })
    }

    /// Validate a name used for a method: an identifier with an optional
    /// `?`, `!` or `=` suffix, or an operator.
    pub fn check_method_name(name: &str) -> Result<(), RtError> {
        NameParser::parse(Rule::method_name, name)
            .map(|_| ())
            .map_err(|_| RtError::InvalidName(name.to_string()))
    }
}
