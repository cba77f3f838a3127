//! Exception types and raised exceptions.
//!
//! Exception types form a single-inheritance hierarchy rooted at
//! [`BASE_EXCEPTION`]. Types are shared handles compared by identity, so two
//! independently created types with the same name are still distinct.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use once_cell::sync::Lazy;

use crate::value::Value;

#[derive(Debug)]
struct TypeInfo {
    name: String,
    parent: Option<ExceptionType>,
}

/// A named exception type with an optional parent type.
#[derive(Clone)]
pub struct ExceptionType(Arc<TypeInfo>);

impl ExceptionType {
    /// Creates a root type with no parent.
    pub fn root(name: impl Into<String>) -> Self {
        Self(Arc::new(TypeInfo {
            name: name.into(),
            parent: None,
        }))
    }

    /// Creates a subtype of `parent`.
    pub fn new(name: impl Into<String>, parent: &ExceptionType) -> Self {
        Self(Arc::new(TypeInfo {
            name: name.into(),
            parent: Some(parent.clone()),
        }))
    }

    pub fn name(&self) -> &str {
        &self.0.name
    }

    pub fn parent(&self) -> Option<&ExceptionType> {
        self.0.parent.as_ref()
    }

    /// Walks from this type up to the root, starting with the type itself.
    pub fn lineage(&self) -> impl Iterator<Item = &ExceptionType> {
        std::iter::successors(Some(self), |ty| ty.parent())
    }

    /// True if `self` is `other` or inherits from it.
    pub fn is_subtype_of(&self, other: &ExceptionType) -> bool {
        self.lineage().any(|ty| ty == other)
    }

    /// Instantiates the type with a single message argument.
    pub fn raise(&self, message: impl Into<Value>) -> Exception {
        Exception::new(self, vec![message.into()])
    }

    /// Instantiates the type with an arbitrary argument tuple.
    pub fn with_args<I, V>(&self, args: I) -> Exception
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Exception::new(self, args.into_iter().map(Into::into).collect())
    }
}

impl PartialEq for ExceptionType {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for ExceptionType {}

impl Hash for ExceptionType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (Arc::as_ptr(&self.0) as usize).hash(state);
    }
}

impl fmt::Debug for ExceptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for ExceptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

pub static BASE_EXCEPTION: Lazy<ExceptionType> = Lazy::new(|| ExceptionType::root("BaseException"));
pub static EXCEPTION: Lazy<ExceptionType> =
    Lazy::new(|| ExceptionType::new("Exception", &BASE_EXCEPTION));
/// Raised when a test callable panics instead of returning an outcome.
pub static PANIC: Lazy<ExceptionType> = Lazy::new(|| ExceptionType::new("Panic", &BASE_EXCEPTION));
pub static VALUE_ERROR: Lazy<ExceptionType> =
    Lazy::new(|| ExceptionType::new("ValueError", &EXCEPTION));
pub static TYPE_ERROR: Lazy<ExceptionType> =
    Lazy::new(|| ExceptionType::new("TypeError", &EXCEPTION));
pub static RUNTIME_ERROR: Lazy<ExceptionType> =
    Lazy::new(|| ExceptionType::new("RuntimeError", &EXCEPTION));
pub static NOT_IMPLEMENTED_ERROR: Lazy<ExceptionType> =
    Lazy::new(|| ExceptionType::new("NotImplementedError", &RUNTIME_ERROR));
pub static LOOKUP_ERROR: Lazy<ExceptionType> =
    Lazy::new(|| ExceptionType::new("LookupError", &EXCEPTION));
pub static KEY_ERROR: Lazy<ExceptionType> =
    Lazy::new(|| ExceptionType::new("KeyError", &LOOKUP_ERROR));
pub static INDEX_ERROR: Lazy<ExceptionType> =
    Lazy::new(|| ExceptionType::new("IndexError", &LOOKUP_ERROR));
pub static ARITHMETIC_ERROR: Lazy<ExceptionType> =
    Lazy::new(|| ExceptionType::new("ArithmeticError", &EXCEPTION));
pub static ZERO_DIVISION_ERROR: Lazy<ExceptionType> =
    Lazy::new(|| ExceptionType::new("ZeroDivisionError", &ARITHMETIC_ERROR));
pub static ASSERTION_ERROR: Lazy<ExceptionType> =
    Lazy::new(|| ExceptionType::new("AssertionError", &EXCEPTION));
pub static ATTRIBUTE_ERROR: Lazy<ExceptionType> =
    Lazy::new(|| ExceptionType::new("AttributeError", &EXCEPTION));

/// A raised exception: its type, constructor arguments, and diagnostic notes.
#[derive(Debug, Clone)]
pub struct Exception {
    ty: ExceptionType,
    args: Vec<Value>,
    notes: Vec<String>,
}

impl Exception {
    pub fn new(ty: &ExceptionType, args: Vec<Value>) -> Self {
        Self {
            ty: ty.clone(),
            args,
            notes: Vec::new(),
        }
    }

    pub fn ty(&self) -> &ExceptionType {
        &self.ty
    }

    pub fn args(&self) -> &[Value] {
        &self.args
    }

    pub fn notes(&self) -> &[String] {
        &self.notes
    }

    /// Attaches a line of diagnostic context, rendered under the failure.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn is_instance_of(&self, ty: &ExceptionType) -> bool {
        self.ty.is_subtype_of(ty)
    }

    /// The first argument as text, which is how most exceptions carry their message.
    pub fn message(&self) -> String {
        match self.args.as_slice() {
            [] => String::new(),
            [Value::Str(s)] => s.clone(),
            [single] => single.to_string(),
            many => Value::Tuple(many.to_vec()).to_string(),
        }
    }
}

impl PartialEq for Exception {
    fn eq(&self, other: &Self) -> bool {
        self.ty == other.ty && self.args == other.args
    }
}

impl fmt::Display for Exception {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.ty.name())?;
        for (i, arg) in self.args.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{arg}")?;
        }
        f.write_str(")")
    }
}

impl std::error::Error for Exception {}
