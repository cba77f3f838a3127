//! Matching raised exceptions against declared expectations.
//!
//! A declaration is a [`Value`]: an exception type, an exception instance, or
//! a tuple nesting any of those to any depth. [`flatten`] unwraps the nesting
//! lazily into terminal [`Expected`] entries; anything else inside the
//! declaration is a [`ConfigError::MalformedExpectation`].

use std::fmt;

use crate::diagnostics::ConfigError;
use crate::exception::{Exception, ExceptionType};
use crate::value::Value;

/// One terminal entry of an expected-exception declaration.
#[derive(Debug, Clone, PartialEq)]
pub enum Expected {
    /// Any exception of this type.
    Type(ExceptionType),
    /// An exception of this instance's type whose arguments are equal.
    Instance(Exception),
}

impl Expected {
    fn comparison_type(&self) -> &ExceptionType {
        match self {
            Expected::Type(ty) => ty,
            Expected::Instance(exc) => exc.ty(),
        }
    }

    /// With `accept_subtypes` false the received type must be exactly the
    /// comparison type; otherwise any subtype matches. Instance entries also
    /// require equal constructor arguments.
    pub fn matches(&self, received: &Exception, accept_subtypes: bool) -> bool {
        let ty = self.comparison_type();
        let type_ok = if accept_subtypes {
            received.is_instance_of(ty)
        } else {
            received.ty() == ty
        };
        if !type_ok {
            return false;
        }
        match self {
            Expected::Type(_) => true,
            Expected::Instance(exc) => exc.args() == received.args(),
        }
    }
}

impl fmt::Display for Expected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expected::Type(ty) => write!(f, "{ty}"),
            Expected::Instance(exc) => write!(f, "{exc}"),
        }
    }
}

impl From<Expected> for Value {
    fn from(expected: Expected) -> Self {
        match expected {
            Expected::Type(ty) => Value::ExceptionType(ty),
            Expected::Instance(exc) => Value::Exception(exc),
        }
    }
}

/// Lazy depth-first flattening of a declaration.
///
/// Yields entries in declaration order. After yielding an error the iterator
/// is exhausted.
pub struct Flatten<'a> {
    root: Option<&'a Value>,
    stack: Vec<(std::slice::Iter<'a, Value>, usize)>,
    failed: bool,
}

impl<'a> Flatten<'a> {
    fn path(&self) -> String {
        if self.stack.is_empty() {
            return "<root>".to_string();
        }
        self.stack
            .iter()
            .map(|(_, index)| format!("[{}]", index.saturating_sub(1)))
            .collect()
    }

    fn classify(&mut self, value: &'a Value) -> Option<Result<Expected, ConfigError>> {
        match value {
            Value::ExceptionType(ty) => Some(Ok(Expected::Type(ty.clone()))),
            Value::Exception(exc) => Some(Ok(Expected::Instance(exc.clone()))),
            Value::Tuple(items) => {
                self.stack.push((items.iter(), 0));
                None
            }
            other => {
                self.failed = true;
                Some(Err(ConfigError::MalformedExpectation {
                    found: format!("{other} ({})", other.type_name()),
                    path: self.path(),
                }))
            }
        }
    }
}

impl<'a> Iterator for Flatten<'a> {
    type Item = Result<Expected, ConfigError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        if let Some(root) = self.root.take() {
            if let Some(item) = self.classify(root) {
                return Some(item);
            }
        }
        loop {
            let (iter, index) = self.stack.last_mut()?;
            match iter.next() {
                Some(value) => {
                    *index += 1;
                    if let Some(item) = self.classify(value) {
                        return Some(item);
                    }
                }
                None => {
                    self.stack.pop();
                }
            }
        }
    }
}

/// Flattens a possibly nested declaration into its terminal entries.
pub fn flatten(declaration: &Value) -> Flatten<'_> {
    Flatten {
        root: Some(declaration),
        stack: Vec::new(),
        failed: false,
    }
}

/// A flat, unordered set of expected exceptions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpectedSet {
    entries: Vec<Expected>,
}

impl ExpectedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flattens `declaration`, failing on the first malformed element.
    pub fn from_declaration(declaration: &Value) -> Result<Self, ConfigError> {
        let mut set = Self::new();
        for entry in flatten(declaration) {
            set.insert(entry?);
        }
        Ok(set)
    }

    pub fn insert(&mut self, entry: Expected) {
        if !self.entries.contains(&entry) {
            self.entries.push(entry);
        }
    }

    pub fn union(&mut self, other: ExpectedSet) {
        for entry in other.entries {
            self.insert(entry);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Expected> {
        self.entries.iter()
    }

    /// True if any entry matches; entries carry no precedence.
    pub fn matches(&self, received: &Exception, accept_subtypes: bool) -> bool {
        matches(&self.entries, received, accept_subtypes)
    }
}

impl fmt::Display for ExpectedSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, entry) in self.entries.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{entry}")?;
        }
        Ok(())
    }
}

pub fn matches(expected: &[Expected], received: &Exception, accept_subtypes: bool) -> bool {
    expected
        .iter()
        .any(|entry| entry.matches(received, accept_subtypes))
}
