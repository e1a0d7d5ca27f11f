//! The external validator capability and its diagnostic channel.
//!
//! The driver never interprets what a validator does with a record; it only
//! distinguishes pass from fail and guarantees teardown. Binding to a real
//! native validator is the caller's problem — anything implementing
//! [`ShaderValidator`] can be handed to [`crate::driver::validate`].

use std::fmt;

use bitflags::bitflags;

bitflags! {
    /// Category flags attached to a diagnostic. A diagnostic without the
    /// `WARNING` bit is an error.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct MessageCategory: u32 {
        const WARNING = 1 << 0;
    }
}

/// Opaque status code carried by a failing validator operation. Only
/// pass-vs-fail is meaningful to the driver; the value itself is preserved
/// solely for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidatorStatus(pub u32);

impl fmt::Display for ValidatorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:08X}", self.0)
    }
}

/// One message reported by the validator during a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic<'a> {
    pub category: MessageCategory,
    /// Numeric message identifier, rendered with the runtime's `X5` prefix.
    pub id: u32,
    pub message: &'a str,
}

impl Diagnostic<'_> {
    /// Render in the D3D9 runtime's message format, e.g.
    /// `error X5306: unknown opcode 0x00F0`.
    pub fn render(&self) -> String {
        let severity = if self.category.contains(MessageCategory::WARNING) {
            "warning"
        } else {
            "error"
        };
        format!("{severity} X5{}: {}", self.id, self.message)
    }
}

/// Per-run diagnostic callback, installed by [`ShaderValidator::begin`].
///
/// Invoked synchronously, zero or more times per submission — including on
/// submissions that ultimately succeed (warnings). State the callback needs
/// is closure capture, so sequential runs in one process share nothing.
pub type DiagnosticSink = Box<dyn FnMut(&Diagnostic<'_>)>;

/// A stateful shader validation capability.
///
/// Protocol: exactly one `begin`/`end` pair per run, with zero or more
/// `instruction` submissions in between, all strictly sequential. The first
/// submission of a run is the 1-token version record; the last, if the run
/// gets that far, is the end record. `end` is the run-level verdict and may
/// fail even when every individual submission passed.
pub trait ShaderValidator {
    fn begin(&mut self, sink: DiagnosticSink) -> Result<(), ValidatorStatus>;

    /// Submit one instruction record. `record` spans the whole record,
    /// head token included; `label` is a human-readable tag for diagnostics
    /// only; `flags` is reserved and always 0 from the driver.
    fn instruction(
        &mut self,
        label: &str,
        flags: u32,
        record: &[u32],
    ) -> Result<(), ValidatorStatus>;

    fn end(&mut self) -> Result<(), ValidatorStatus>;
}
