use crate::sink::{Diagnostic, DiagnosticSink};
use async_trait::async_trait;

/// A sink that discards every diagnostic.
///
/// Useful when the caller already handles the returned errors and does
/// not want duplicate output.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

#[async_trait]
impl DiagnosticSink for NoopSink {
    async fn report(&self, _diagnostic: &Diagnostic) {}
}
