//! IOS parser for the structured decoding of `show vtp status`.

use serde_json::Value;

use super::{OutputParser, ParseOutcome};
use crate::mode::{ModeResult, VtpMode};
use crate::transport::RawOutput;

/// Diagnostic for an IOS device whose mode could not be read.
pub const MODE_UNAVAILABLE: &str = "Unable to retrieve VTP mode.";

/// Reads `vtp.operating_mode` from the structured output.
///
/// This parser always produces a definite result. A missing or null key
/// classifies the device as `unknown`.
#[derive(Debug, Clone, Copy, Default)]
pub struct IosStatusParser;

impl OutputParser for IosStatusParser {
    fn name(&self) -> &'static str {
        "ios_vtp_status"
    }

    fn parse(&self, output: &RawOutput) -> ParseOutcome {
        let result = match output.structured_path(&["vtp", "operating_mode"]) {
            None => ModeResult::unknown(MODE_UNAVAILABLE),
            Some(Value::String(label)) => match label.parse::<VtpMode>() {
                Ok(mode) => ModeResult::new(mode),
                Err(e) => ModeResult::unknown(e.to_string()),
            },
            Some(other) => ModeResult::unknown(format!("unexpected VTP mode value {other}")),
        };

        ParseOutcome::Match(result)
    }
}
