//! Process-wide attribute table that mocks patch and reverts restore.
//!
//! The table is an `im::OrdMap`, so taking a snapshot for a revert is a
//! constant-time clone. All mutation goes through [`Globals`]; the guards in
//! this module undo their change when dropped, including while unwinding.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use im::OrdMap;
use log::trace;

use crate::diagnostics::ConfigError;
use crate::value::Value;

/// A module-qualified attribute name such as `config.timeout`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Symbol {
    module: String,
    attr: String,
}

impl Symbol {
    pub fn new(module: impl Into<String>, attr: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            attr: attr.into(),
        }
    }

    pub fn module(&self) -> &str {
        &self.module
    }

    pub fn attr(&self) -> &str {
        &self.attr
    }
}

/// Splits at the last `.`; a bare name lives in `__main__`.
impl From<&str> for Symbol {
    fn from(path: &str) -> Self {
        match path.rsplit_once('.') {
            Some((module, attr)) => Symbol::new(module, attr),
            None => Symbol::new("__main__", path),
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.module, self.attr)
    }
}

type Table = OrdMap<Symbol, Value>;

/// Shared handle to the attribute table. Clones refer to the same table.
#[derive(Clone, Default)]
pub struct Globals {
    table: Rc<RefCell<Table>>,
}

impl Globals {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, symbol: &Symbol) -> Option<Value> {
        self.table.borrow().get(symbol).cloned()
    }

    pub fn contains(&self, symbol: &Symbol) -> bool {
        self.table.borrow().contains_key(symbol)
    }

    /// Sets `symbol`, returning the value it replaced.
    pub fn set(&self, symbol: impl Into<Symbol>, value: impl Into<Value>) -> Option<Value> {
        self.table.borrow_mut().insert(symbol.into(), value.into())
    }

    pub fn remove(&self, symbol: &Symbol) -> Option<Value> {
        self.table.borrow_mut().remove(symbol)
    }

    pub fn len(&self) -> usize {
        self.table.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.borrow().is_empty()
    }

    fn snapshot(&self) -> Table {
        self.table.borrow().clone()
    }

    fn restore(&self, saved: Table) {
        *self.table.borrow_mut() = saved;
    }

    /// Installs `replacement` at `symbol` until the returned guard drops.
    ///
    /// Patching an absent symbol is refused unless `create` is set, in which
    /// case the symbol is removed again on release.
    pub fn patch(
        &self,
        symbol: Symbol,
        replacement: Value,
        create: bool,
    ) -> Result<PatchGuard, ConfigError> {
        if !create && !self.contains(&symbol) {
            return Err(ConfigError::MissingPatchTarget {
                symbol: symbol.to_string(),
            });
        }
        trace!("patching {symbol}");
        let previous = self.set(symbol.clone(), replacement);
        Ok(PatchGuard {
            globals: self.clone(),
            symbol,
            previous,
        })
    }

    /// Snapshots the whole table; the guard restores it on drop.
    pub fn preserve(&self) -> SnapshotGuard {
        SnapshotGuard {
            globals: self.clone(),
            saved: Some(self.snapshot()),
        }
    }
}

impl fmt::Debug for Globals {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.table.borrow().iter()).finish()
    }
}

/// One installed patch. Dropping it puts back the previous value, or removes
/// the symbol if it did not exist before.
#[must_use = "the patch is released as soon as the guard is dropped"]
pub struct PatchGuard {
    globals: Globals,
    symbol: Symbol,
    previous: Option<Value>,
}

impl Drop for PatchGuard {
    fn drop(&mut self) {
        trace!("releasing {}", self.symbol);
        match self.previous.take() {
            Some(value) => {
                self.globals.set(self.symbol.clone(), value);
            }
            None => {
                self.globals.remove(&self.symbol);
            }
        }
    }
}

/// Patches applied in order and released in reverse, so stacked patches on
/// one symbol unwind back to the original value.
#[derive(Default)]
#[must_use = "patches are released as soon as the stack is dropped"]
pub struct PatchStack {
    guards: Vec<PatchGuard>,
}

impl PatchStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, guard: PatchGuard) {
        self.guards.push(guard);
    }

    pub fn len(&self) -> usize {
        self.guards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.guards.is_empty()
    }
}

impl Drop for PatchStack {
    fn drop(&mut self) {
        while let Some(guard) = self.guards.pop() {
            drop(guard);
        }
    }
}

/// Restores every global to its state at [`Globals::preserve`] time.
#[must_use = "the snapshot is restored as soon as the guard is dropped"]
pub struct SnapshotGuard {
    globals: Globals,
    saved: Option<Table>,
}

impl Drop for SnapshotGuard {
    fn drop(&mut self) {
        if let Some(saved) = self.saved.take() {
            self.globals.restore(saved);
        }
    }
}
