//! Value validators and validation error handlers.
//!
//! Validators are attached to a property when its class is built and run in
//! declared order. On assignment the first failure is returned; during
//! object validation every failure is reported to an [`ErrorHandler`].

use std::borrow::Cow;
use std::fmt;

use regex::Regex;
use tracing::warn;

use crate::error::{ValidationError, ValidationReason};
use crate::model::Path;
use crate::util::{is_blank_node, is_iri, DateTime};

/// A single check on a property value.
pub trait Validator<T>: fmt::Debug + Send + Sync {
    /// Checks `value`, naming `property` in the error on failure.
    fn check(&self, value: &T, property: &str) -> Result<(), ValidationError>;
}

/// String projection used by [`RegexValidator`].
pub trait Lexical {
    fn lexical(&self) -> Cow<'_, str>;
}

impl Lexical for String {
    fn lexical(&self) -> Cow<'_, str> {
        Cow::Borrowed(self)
    }
}

impl Lexical for i64 {
    fn lexical(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }
}

impl Lexical for DateTime {
    fn lexical(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }
}

// =============================================================================
// VALIDATORS
// =============================================================================

/// Requires an IRI or a blank node identifier.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdValidator;

impl Validator<String> for IdValidator {
    fn check(&self, value: &String, property: &str) -> Result<(), ValidationError> {
        if is_iri(value) || is_blank_node(value) {
            Ok(())
        } else {
            Err(ValidationError::new(property, ValidationReason::NotIriOrBlank))
        }
    }
}

/// Requires the lexical form of the value to match a pattern.
#[derive(Debug, Clone)]
pub struct RegexValidator {
    regex: Regex,
}

impl RegexValidator {
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            regex: Regex::new(pattern)?,
        })
    }

    pub fn pattern(&self) -> &str {
        self.regex.as_str()
    }
}

impl<T: Lexical> Validator<T> for RegexValidator {
    fn check(&self, value: &T, property: &str) -> Result<(), ValidationError> {
        let text = value.lexical();
        if self.regex.is_match(&text) {
            Ok(())
        } else {
            Err(ValidationError::new(
                property,
                ValidationReason::PatternMismatch {
                    value: text.into_owned(),
                    pattern: self.regex.as_str().to_string(),
                },
            ))
        }
    }
}

/// Inclusive lower bound.
#[derive(Debug, Clone, Copy)]
pub struct IntegerMinValidator {
    pub min: i64,
}

impl Validator<i64> for IntegerMinValidator {
    fn check(&self, value: &i64, property: &str) -> Result<(), ValidationError> {
        if *value < self.min {
            return Err(ValidationError::new(
                property,
                ValidationReason::BelowMinimum {
                    value: *value,
                    min: self.min,
                },
            ));
        }
        Ok(())
    }
}

/// Inclusive upper bound.
#[derive(Debug, Clone, Copy)]
pub struct IntegerMaxValidator {
    pub max: i64,
}

impl Validator<i64> for IntegerMaxValidator {
    fn check(&self, value: &i64, property: &str) -> Result<(), ValidationError> {
        if *value > self.max {
            return Err(ValidationError::new(
                property,
                ValidationReason::AboveMaximum {
                    value: *value,
                    max: self.max,
                },
            ));
        }
        Ok(())
    }
}

/// Membership in a fixed set of literals (full IRIs for named individuals).
#[derive(Debug, Clone)]
pub struct EnumValidator {
    values: Vec<String>,
}

impl EnumValidator {
    pub fn new<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            values: values.into_iter().map(Into::into).collect(),
        }
    }
}

impl Validator<String> for EnumValidator {
    fn check(&self, value: &String, property: &str) -> Result<(), ValidationError> {
        if self.values.iter().any(|v| v == value) {
            Ok(())
        } else {
            Err(ValidationError::new(
                property,
                ValidationReason::NotEnumerated {
                    value: value.clone(),
                },
            ))
        }
    }
}

// =============================================================================
// ERROR HANDLERS
// =============================================================================

/// Receives validation errors as they are found.
pub trait ErrorHandler {
    fn handle_error(&mut self, error: &ValidationError, path: &Path);
}

/// Discards every error.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopHandler;

impl ErrorHandler for NoopHandler {
    fn handle_error(&mut self, _error: &ValidationError, _path: &Path) {}
}

/// Collects errors in the order they were reported.
impl ErrorHandler for Vec<(Path, ValidationError)> {
    fn handle_error(&mut self, error: &ValidationError, path: &Path) {
        self.push((path.clone(), error.clone()));
    }
}

/// Adapts a closure into an [`ErrorHandler`].
pub struct FnHandler<F>(pub F);

impl<F: FnMut(&ValidationError, &Path)> ErrorHandler for FnHandler<F> {
    fn handle_error(&mut self, error: &ValidationError, path: &Path) {
        (self.0)(error, path)
    }
}

/// Emits every error as a `warn` event.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingHandler;

impl ErrorHandler for TracingHandler {
    fn handle_error(&mut self, error: &ValidationError, path: &Path) {
        warn!(path = %path, property = %error.property, "{}", error.reason);
    }
}
