//! Casework resolves the declarative wrappers attached to test cases,
//! expands parameterizations into invocations, and runs each one with scoped
//! global patches, collecting a verdict per case.

pub mod cli;
pub mod config;
pub mod diagnostics;
pub mod exception;
pub mod globals;
pub mod hashing;
pub mod matcher;
pub mod value;

pub use config::RunConfig;
pub use diagnostics::{CaseError, ConfigError};
pub use exception::{Exception, ExceptionType};
pub use globals::{Globals, Symbol};
pub use hashing::hash_value;
pub use matcher::{flatten, matches, Expected, ExpectedSet};
pub use test::{Call, Outcome, ResultGroup, Runner, TestCase, TestResult, Wrapper};
pub use value::{CallArgs, Value};
