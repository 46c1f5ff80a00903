use std::{fmt, hash::Hash};

use super::symbol_map::SymbolMap;

/// A single predicate in a field's ordered validation chain.
///
/// `set` runs the chain in order and stops at the first violated rule,
/// reporting that rule's message; the value never reaches the transport.
pub trait Rule<T>: Send + Sync {
    fn check(&self, value: &T) -> Result<(), String>;
}

// NonEmptyRule
/// The value must contain at least one non-whitespace character.
pub struct NonEmptyRule;

impl Rule<String> for NonEmptyRule {
    fn check(&self, value: &String) -> Result<(), String> {
        if value.trim().is_empty() {
            return Err("value must not be empty".to_string());
        }
        Ok(())
    }
}

// MinLengthRule
/// The value must be at least `min` characters long.
pub struct MinLengthRule {
    min: usize,
}

impl MinLengthRule {
    pub fn new(min: usize) -> Self {
        Self { min }
    }
}

impl Rule<String> for MinLengthRule {
    fn check(&self, value: &String) -> Result<(), String> {
        if value.chars().count() < self.min {
            return Err(format!("value must be at least {} characters long", self.min));
        }
        Ok(())
    }
}

// FormatRule
/// The value must satisfy a format predicate; `description` names the
/// expected shape in the violation message.
pub struct FormatRule {
    description: &'static str,
    accepts: fn(&str) -> bool,
}

impl FormatRule {
    pub fn new(description: &'static str, accepts: fn(&str) -> bool) -> Self {
        Self {
            description,
            accepts,
        }
    }
}

impl Rule<String> for FormatRule {
    fn check(&self, value: &String) -> Result<(), String> {
        if !(self.accepts)(value) {
            return Err(format!("value must be {}", self.description));
        }
        Ok(())
    }
}

// EnumerationRule
/// The value must be one of the symbols registered in the field's map; in
/// particular the unknown sentinel is rejected on write.
pub struct EnumerationRule<S> {
    map: SymbolMap<S>,
}

impl<S: Copy + Eq + Hash + fmt::Debug> EnumerationRule<S> {
    pub fn new(map: SymbolMap<S>) -> Self {
        Self { map }
    }
}

impl<S: Copy + Eq + Hash + fmt::Debug + Send + Sync> Rule<S> for EnumerationRule<S> {
    fn check(&self, value: &S) -> Result<(), String> {
        if !self.map.contains(*value) {
            return Err(format!("{value:?} is not a registered value"));
        }
        Ok(())
    }
}

// NonNegativeRule
/// The value must not be negative.
pub struct NonNegativeRule;

impl Rule<i64> for NonNegativeRule {
    fn check(&self, value: &i64) -> Result<(), String> {
        if *value < 0 {
            return Err("value must be non-negative".to_string());
        }
        Ok(())
    }
}
