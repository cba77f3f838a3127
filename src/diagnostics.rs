//! Configuration errors: mistakes in a test's declaration rather than in the
//! code under test.
//!
//! These are the only fatal conditions in a run. Every variant carries a
//! stable `miette` diagnostic code so the reporting side can render them with
//! help text, distinct from ordinary test failures. Wrapper conflicts are not
//! errors at all; see [`crate::test::resolver::WrapperConflict`].

use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("malformed expected-exception declaration: {found} at {path} is not an exception type, exception instance, or tuple")]
    #[diagnostic(
        code(casework::config::malformed_expectation),
        help("expected exceptions may only be exception types, exception instances, or tuples nesting those")
    )]
    MalformedExpectation { found: String, path: String },

    #[error("zipped parameterizations have different lengths: {lengths:?}")]
    #[diagnostic(
        code(casework::config::zip_length_mismatch),
        help("zipped parameterizations are paired by index, so each must supply the same number of argument sets")
    )]
    ZipLengthMismatch { lengths: Vec<usize> },

    #[error("parameter set {index} binds {found}, but the first set binds {expected}")]
    #[diagnostic(
        code(casework::config::inconsistent_parameter_shape),
        help("every argument set in one parameterization must bind the same positional count and keyword names")
    )]
    InconsistentParameterShape {
        index: usize,
        expected: String,
        found: String,
    },

    #[error("parameterization declares no argument sets")]
    #[diagnostic(
        code(casework::config::empty_parameterization),
        help("a parameterization with no argument sets would never run the test")
    )]
    EmptyParameterization,

    #[error("cannot patch `{symbol}`: no such global")]
    #[diagnostic(
        code(casework::config::missing_patch_target),
        help("declare the global before patching it, or mark the mock as creating the symbol")
    )]
    MissingPatchTarget { symbol: String },

    #[error("invalid configuration: {message}")]
    #[diagnostic(code(casework::config::invalid))]
    InvalidConfig { message: String },

    #[error("failed to read `{path}`")]
    #[diagnostic(code(casework::config::io))]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// A configuration error attributed to the test case that declared it.
#[derive(Debug, Error, Diagnostic)]
#[error("configuration error in test case `{case}`")]
#[diagnostic(code(casework::case))]
pub struct CaseError {
    pub case: String,
    #[source]
    #[diagnostic_source]
    pub error: ConfigError,
}
