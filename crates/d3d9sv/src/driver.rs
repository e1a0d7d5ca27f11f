//! The token walker: sequences a [`TokenStream`] through a validator handle.
//!
//! The walk is a single forward pass. The version token is submitted first as
//! its own 1-token record, then records are classified and submitted one at a
//! time until the end record. Every advance is bounds-checked against the
//! remaining stream length, so a lying length field yields
//! [`DriverError::Truncated`] instead of a read past the buffer.
//!
//! The validator handle is moved into [`validate`] and dropped on every
//! return path, which is what releases it — success, rejection and lifecycle
//! failure all tear the handle down.

use thiserror::Error;

use crate::stream::TokenStream;
use crate::tokens::{record_extent, RecordKind};
use crate::validator::{DiagnosticSink, ShaderValidator, ValidatorStatus};

const VERSION_LABEL: &str = "Version Token";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DriverError {
    #[error("shader validator begin failed with status {0}")]
    Begin(ValidatorStatus),

    #[error("version token submission failed with status {0}")]
    Version(ValidatorStatus),

    #[error("shader validator rejected {label} record at token {token_index} with status {status}")]
    Rejected {
        label: &'static str,
        token_index: usize,
        status: ValidatorStatus,
    },

    #[error(
        "truncated stream: {label} record at token {token_index} spans {extent} tokens but only {remaining} remain"
    )]
    Truncated {
        label: &'static str,
        token_index: usize,
        extent: usize,
        remaining: usize,
    },

    #[error("token stream has no end token")]
    MissingEnd,

    #[error("shader validator end failed with status {0}")]
    End(ValidatorStatus),
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DriverOptions {
    /// Fail the run as soon as the version-token submission is rejected.
    ///
    /// The D3D9 runtime's own walker ignores this result and relies on the
    /// validator's end-of-run verdict to reject programs with a bad version
    /// token. The default matches that behavior (the rejection is still
    /// logged); enabling the check surfaces it immediately as
    /// [`DriverError::Version`].
    pub check_version_submission: bool,
}

/// Walk `stream` through `validator`, reporting diagnostics to `sink`.
///
/// Returns `Ok(())` only when every submission passed and the validator
/// accepted the run as a whole at `end()`. The handle is consumed; it is
/// dropped (and thereby released) no matter which path exits. Tokens after
/// the end record are ignored.
pub fn validate<V: ShaderValidator>(
    mut validator: V,
    stream: &TokenStream,
    sink: DiagnosticSink,
    options: DriverOptions,
) -> Result<(), DriverError> {
    validator.begin(sink).map_err(DriverError::Begin)?;

    let tokens = stream.tokens();

    // The stream invariant guarantees the version token is present.
    if let Err(status) = validator.instruction(VERSION_LABEL, 0, &tokens[..1]) {
        if options.check_version_submission {
            return Err(DriverError::Version(status));
        }
        tracing::debug!(%status, "version token submission rejected; deferring to end()");
    }

    let mut cursor = 1usize;
    loop {
        if cursor >= tokens.len() {
            return Err(DriverError::MissingEnd);
        }

        let token = tokens[cursor];
        let kind = RecordKind::classify(token);
        let extent = record_extent(token);
        let remaining = tokens.len() - cursor;
        if extent > remaining {
            return Err(DriverError::Truncated {
                label: kind.label(),
                token_index: cursor,
                extent,
                remaining,
            });
        }

        tracing::trace!(token_index = cursor, kind = kind.label(), extent, "submitting record");
        validator
            .instruction(kind.label(), 0, &tokens[cursor..cursor + extent])
            .map_err(|status| DriverError::Rejected {
                label: kind.label(),
                token_index: cursor,
                status,
            })?;

        if kind == RecordKind::End {
            // A successful end-record submission is not the verdict: the run
            // as a whole is accepted or rejected by this final call.
            validator.end().map_err(DriverError::End)?;
            tracing::debug!(tokens = tokens.len(), "shader validation completed");
            return Ok(());
        }

        cursor += extent;
    }
}
