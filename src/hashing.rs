//! Structural hashing for values that may not be natively hashable.
//!
//! Containers hash as a length-derived seed XORed with their element hashes.
//! Each container kind shifts its length by a different amount so that, say, a
//! one-element tuple and a one-element list do not start from the same seed.
//! XOR is commutative, which gives sets and mappings the order independence
//! their equality requires. Tuples and lists use the same combination, so two
//! permutations of one multiset hash identically; equality still tells them
//! apart when a hash bucket is shared.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use crate::value::{exact_int, Object, Value};

const TUPLE_SHIFT: u32 = 7;
const LIST_SHIFT: u32 = 13;
const MAP_SHIFT: u32 = 19;
const SET_SHIFT: u32 = 29;

fn seed(len: usize, shift: u32) -> u64 {
    (len as u64).rotate_left(shift)
}

fn combine_all(items: &[Value], shift: u32) -> u64 {
    items
        .iter()
        .fold(seed(items.len(), shift), |acc, item| acc ^ hash_value(item))
}

fn std_hash<T: Hash + ?Sized>(tag: u8, value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    tag.hash(&mut hasher);
    value.hash(&mut hasher);
    hasher.finish()
}

/// The value's own hash, for scalar kinds that define one.
///
/// Integral floats hash like the equal integer so `1 == 1.0` keeps holding
/// under hashing. Returns `None` for containers and for objects that do not
/// provide a native hash.
pub fn native_hash(value: &Value) -> Option<u64> {
    match value {
        Value::Tuple(_) | Value::List(_) | Value::Map(_) | Value::Set(_) => None,
        Value::Object(o) => o.native_hash(),
        scalar => Some(hash_value(scalar)),
    }
}

/// Hash derived from where the object lives rather than what it contains.
fn identity_hash(object: &Rc<dyn Object>) -> u64 {
    std_hash(7, &(Rc::as_ptr(object) as *const () as usize))
}

/// Deep structural hash. Equal values hash equally; see the module docs for
/// the weaker guarantee on ordered containers.
pub fn hash_value(value: &Value) -> u64 {
    match value {
        Value::Nil => std_hash(0, &()),
        Value::Bool(b) => std_hash(1, b),
        Value::Int(n) => std_hash(2, n),
        Value::Float(x) => match exact_int(*x) {
            Some(n) => std_hash(2, &n),
            None => std_hash(3, &x.to_bits()),
        },
        Value::Str(s) => std_hash(4, s.as_str()),
        Value::ExceptionType(ty) => std_hash(5, ty),
        Value::Exception(e) => std_hash(6, e.ty()) ^ combine_all(e.args(), TUPLE_SHIFT),
        Value::Object(o) => o.native_hash().unwrap_or_else(|| identity_hash(o)),
        Value::Tuple(items) => combine_all(items, TUPLE_SHIFT),
        Value::List(items) => combine_all(items, LIST_SHIFT),
        Value::Set(items) => combine_all(items, SET_SHIFT),
        Value::Map(entries) => entries
            .iter()
            .fold(seed(entries.len(), MAP_SHIFT), |acc, (k, v)| {
                acc ^ (hash_value(k) & hash_value(v))
            }),
    }
}

/// Owns a value so it can key a `HashMap`/`HashSet` through [`hash_value`].
#[derive(Debug, Clone)]
pub struct DedupKey(pub Value);

impl PartialEq for DedupKey {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

// Float NaN is the only value not equal to itself; a NaN-bearing key simply
// never deduplicates.
impl Eq for DedupKey {}

impl Hash for DedupKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(hash_value(&self.0));
    }
}
