use std::fmt;
use std::rc::Rc;

use crate::exception::{Exception, ExceptionType};

/// A user-defined value the engine treats as opaque.
///
/// Objects compare by identity. Implementors that can hash themselves return
/// `Some` from [`Object::native_hash`]; everything else is unhashable and the
/// deep hash falls back to the object's identity.
pub trait Object: fmt::Debug {
    fn type_name(&self) -> &str;

    fn native_hash(&self) -> Option<u64> {
        None
    }
}

/// Represents a value flowing through test declarations and invocations.
///
/// # Examples
///
/// ```rust
/// use casework::value::Value;
/// let n = Value::from(3);
/// assert_eq!(n.type_name(), "int");
/// let t = Value::tuple([1, 2]);
/// assert_eq!(t.to_string(), "(1, 2)");
/// assert!(Value::default().is_nil());
/// ```
#[derive(Debug, Clone, Default)]
pub enum Value {
    #[default]
    Nil,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Tuple(Vec<Value>),
    List(Vec<Value>),
    /// Insertion-ordered entries; compared without regard to order.
    Map(Vec<(Value, Value)>),
    /// Distinct elements; compared without regard to order.
    Set(Vec<Value>),
    Object(Rc<dyn Object>),
    Exception(Exception),
    ExceptionType(ExceptionType),
}

impl Value {
    pub fn tuple<I, V>(items: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Value::Tuple(items.into_iter().map(Into::into).collect())
    }

    pub fn list<I, V>(items: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Value::List(items.into_iter().map(Into::into).collect())
    }

    /// Builds a set, dropping elements equal to one already present.
    pub fn set<I, V>(items: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let mut elements: Vec<Value> = Vec::new();
        for item in items {
            let item = item.into();
            if !elements.contains(&item) {
                elements.push(item);
            }
        }
        Value::Set(elements)
    }

    /// Builds a mapping; a repeated key replaces the earlier entry's value.
    pub fn map<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<Value>,
        V: Into<Value>,
    {
        let mut out: Vec<(Value, Value)> = Vec::new();
        for (k, v) in entries {
            let (k, v) = (k.into(), v.into());
            match out.iter_mut().find(|(existing, _)| *existing == k) {
                Some(slot) => slot.1 = v,
                None => out.push((k, v)),
            }
        }
        Value::Map(out)
    }

    pub fn object(object: impl Object + 'static) -> Self {
        Value::Object(Rc::new(object))
    }

    /// Returns the type name of the value as a string.
    pub fn type_name(&self) -> &str {
        match self {
            Value::Nil => "NoneType",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "str",
            Value::Tuple(_) => "tuple",
            Value::List(_) => "list",
            Value::Map(_) => "dict",
            Value::Set(_) => "set",
            Value::Object(o) => o.type_name(),
            Value::Exception(e) => e.ty().name(),
            Value::ExceptionType(_) => "type",
        }
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(n) => Some(*n),
            Value::Int(n) => Some(*n as f64),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }
}

const TWO_POW_63: f64 = 9_223_372_036_854_775_808.0;

/// The integer `x` denotes exactly, if it is integral and fits an `i64`.
pub(crate) fn exact_int(x: f64) -> Option<i64> {
    (x.is_finite() && x.fract() == 0.0 && (-TWO_POW_63..TWO_POW_63).contains(&x)).then_some(x as i64)
}

fn numeric_eq(int: i64, float: f64) -> bool {
    exact_int(float) == Some(int)
}

/// Multiset equality: every item of `a` is paired with a distinct item of `b`.
fn unordered_eq<T>(a: &[T], b: &[T], eq: impl Fn(&T, &T) -> bool) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut used = vec![false; b.len()];
    a.iter().all(|item| {
        match (0..b.len()).find(|&i| !used[i] && eq(item, &b[i])) {
            Some(i) => {
                used[i] = true;
                true
            }
            None => false,
        }
    })
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Int(a), Value::Float(b)) | (Value::Float(b), Value::Int(a)) => numeric_eq(*a, *b),
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Tuple(a), Value::Tuple(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Set(a), Value::Set(b)) => unordered_eq(a, b, |x, y| x == y),
            (Value::Map(a), Value::Map(b)) => unordered_eq(a, b, |x, y| x.0 == y.0 && x.1 == y.1),
            (Value::Object(a), Value::Object(b)) => std::ptr::addr_eq(Rc::as_ptr(a), Rc::as_ptr(b)),
            (Value::Exception(a), Value::Exception(b)) => a == b,
            (Value::ExceptionType(a), Value::ExceptionType(b)) => a == b,
            _ => false,
        }
    }
}

fn write_joined(f: &mut fmt::Formatter<'_>, items: &[Value]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => f.write_str("None"),
            Value::Bool(true) => f.write_str("True"),
            Value::Bool(false) => f.write_str("False"),
            Value::Int(n) => write!(f, "{n}"),
            Value::Float(n) if n.is_finite() && n.fract() == 0.0 => write!(f, "{n:.1}"),
            Value::Float(n) => write!(f, "{n}"),
            Value::Str(s) => write!(f, "'{}'", s.escape_debug()),
            Value::Tuple(items) => {
                f.write_str("(")?;
                write_joined(f, items)?;
                if items.len() == 1 {
                    f.write_str(",")?;
                }
                f.write_str(")")
            }
            Value::List(items) => {
                f.write_str("[")?;
                write_joined(f, items)?;
                f.write_str("]")
            }
            Value::Set(items) if items.is_empty() => f.write_str("set()"),
            Value::Set(items) => {
                f.write_str("{")?;
                write_joined(f, items)?;
                f.write_str("}")
            }
            Value::Map(entries) => {
                f.write_str("{")?;
                for (i, (k, v)) in entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{k}: {v}")?;
                }
                f.write_str("}")
            }
            Value::Object(o) => write!(f, "<{} object>", o.type_name()),
            Value::Exception(e) => write!(f, "{e}"),
            Value::ExceptionType(t) => write!(f, "<class '{}'>", t.name()),
        }
    }
}

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Value::Nil
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(n.into())
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<usize> for Value {
    fn from(n: usize) -> Self {
        Value::Int(n as i64)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

impl From<Exception> for Value {
    fn from(e: Exception) -> Self {
        Value::Exception(e)
    }
}

impl From<ExceptionType> for Value {
    fn from(t: ExceptionType) -> Self {
        Value::ExceptionType(t)
    }
}

impl From<&ExceptionType> for Value {
    fn from(t: &ExceptionType) -> Self {
        Value::ExceptionType(t.clone())
    }
}

/// Shape of an argument set: how many positionals, and which keywords.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgShape {
    pub positional: usize,
    pub keywords: Vec<String>,
}

impl fmt::Display for ArgShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} positional", self.positional)?;
        if !self.keywords.is_empty() {
            write!(f, " + keywords [{}]", self.keywords.join(", "))?;
        }
        Ok(())
    }
}

/// Positional and keyword arguments bound to one call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CallArgs {
    pub positional: Vec<Value>,
    pub keywords: Vec<(String, Value)>,
}

impl CallArgs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn positional<I, V>(items: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self {
            positional: items.into_iter().map(Into::into).collect(),
            keywords: Vec::new(),
        }
    }

    pub fn arg(mut self, value: impl Into<Value>) -> Self {
        self.positional.push(value.into());
        self
    }

    /// Adds a keyword argument, replacing an earlier one of the same name.
    pub fn kwarg(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        let name = name.into();
        let value = value.into();
        match self.keywords.iter_mut().find(|(k, _)| *k == name) {
            Some(slot) => slot.1 = value,
            None => self.keywords.push((name, value)),
        }
        self
    }

    pub fn get(&self, index: usize) -> Option<&Value> {
        self.positional.get(index)
    }

    pub fn get_keyword(&self, name: &str) -> Option<&Value> {
        self.keywords
            .iter()
            .find_map(|(k, v)| (k == name).then_some(v))
    }

    pub fn is_empty(&self) -> bool {
        self.positional.is_empty() && self.keywords.is_empty()
    }

    pub fn shape(&self) -> ArgShape {
        let mut keywords: Vec<String> = self.keywords.iter().map(|(k, _)| k.clone()).collect();
        keywords.sort();
        ArgShape {
            positional: self.positional.len(),
            keywords,
        }
    }

    /// Appends `other`'s positionals after ours; keywords from `other` win.
    pub fn merged(&self, other: &CallArgs) -> CallArgs {
        let mut out = self.clone();
        out.positional.extend(other.positional.iter().cloned());
        for (k, v) in &other.keywords {
            out = out.kwarg(k.clone(), v.clone());
        }
        out
    }

    /// Structural form used for hashing: `((positional...), {keyword: value})`.
    pub fn to_value(&self) -> Value {
        Value::Tuple(vec![
            Value::Tuple(self.positional.clone()),
            Value::Map(
                self.keywords
                    .iter()
                    .map(|(k, v)| (Value::Str(k.clone()), v.clone()))
                    .collect(),
            ),
        ])
    }
}

impl fmt::Display for CallArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_joined(f, &self.positional)?;
        for (i, (k, v)) in self.keywords.iter().enumerate() {
            if i > 0 || !self.positional.is_empty() {
                f.write_str(", ")?;
            }
            write!(f, "{k}={v}")?;
        }
        Ok(())
    }
}
