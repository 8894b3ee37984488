mod api;
#[cfg(test)]
mod unit_tests;

pub use api::{ConstantPath, NameParser};
