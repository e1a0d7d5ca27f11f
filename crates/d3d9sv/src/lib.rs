#![forbid(unsafe_code)]

//! Driver for validating D3D9 SM2/SM3 shader bytecode.
//!
//! A compiled D3D9 shader program is an opaque stream of 32-bit tokens: a
//! version token followed by variable-length instruction records and a
//! terminating end token. This crate walks such a stream record-by-record and
//! submits each record to a [`ShaderValidator`] capability, which may report
//! diagnostics through a per-run callback and reject any submission.
//!
//! The walker only segments the stream; what makes a shader *invalid* is the
//! validator's business. [`BuiltinValidator`] provides a shallow reference
//! implementation so the driver can be exercised without a native validator.
//!
//! Shader Model 1.x streams are not supported: their instruction tokens carry
//! no length field, so segmenting them requires a per-opcode length table.

pub mod builtin;
pub mod driver;
pub mod stream;
pub mod tokens;
pub mod validator;

pub use builtin::BuiltinValidator;
pub use driver::{validate, DriverError, DriverOptions};
pub use stream::{StreamError, TokenStream};
pub use tokens::{record_extent, RecordKind, ShaderStage, ShaderVersion};
pub use validator::{
    Diagnostic, DiagnosticSink, MessageCategory, ShaderValidator, ValidatorStatus,
};
