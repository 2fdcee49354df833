//! Diagnostics raised while parsing webhook payloads.
//!
//! Unknown enum values are not errors (the server may add networks or
//! tokens before this crate learns about them), but receivers usually want
//! to hear about them. The verifier reports them to an injected
//! [`DiagnosticSink`]; the default [`TracingSink`] logs a warning.

use std::fmt;

/// A non-fatal observation about a parsed payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// The `network` field holds a value outside the known networks.
    UnknownNetwork(String),
    /// The `token` field holds a value outside the known tokens.
    UnknownToken(String),
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownNetwork(network) => write!(f, "Unknown network in webhook: {network}"),
            Self::UnknownToken(token) => write!(f, "Unknown token in webhook: {token}"),
        }
    }
}

/// Receiver of [`Diagnostic`]s.
///
/// Implemented for any `Fn(&Diagnostic) + Send + Sync`, so a closure can
/// serve as a sink.
pub trait DiagnosticSink: Send + Sync {
    /// Handles one diagnostic.
    fn emit(&self, diagnostic: &Diagnostic);
}

/// Sink that logs every diagnostic at `WARN` level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn emit(&self, diagnostic: &Diagnostic) {
        tracing::warn!("{diagnostic}");
    }
}

impl<F> DiagnosticSink for F
where
    F: Fn(&Diagnostic) + Send + Sync,
{
    fn emit(&self, diagnostic: &Diagnostic) {
        self(diagnostic);
    }
}
