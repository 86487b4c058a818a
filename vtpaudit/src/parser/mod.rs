//! Output parsers that classify command output into a [`ModeResult`].

mod ios;
mod nxos;

pub use ios::{IosStatusParser, MODE_UNAVAILABLE};
pub use nxos::{NxosFeatureParser, NxosStatusParser};

use crate::mode::ModeResult;
use crate::transport::RawOutput;

/// Result of running one parser over one command output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseOutcome {
    /// A definite classification. Ends the strategy chain.
    Match(ModeResult),

    /// Nothing usable in the output. Carries the reason for logging.
    NoMatch(String),
}

impl ParseOutcome {
    /// Check if the outcome is a definite classification.
    pub fn is_match(&self) -> bool {
        matches!(self, Self::Match(_))
    }

    /// Get the classification, if any.
    pub fn into_result(self) -> Option<ModeResult> {
        match self {
            Self::Match(result) => Some(result),
            Self::NoMatch(_) => None,
        }
    }
}

/// Trait for turning command output into a VTP classification.
///
/// Parsers never fail: garbled or partial output is a [`ParseOutcome::NoMatch`].
pub trait OutputParser: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Classify the output.
    fn parse(&self, output: &RawOutput) -> ParseOutcome;
}
