//! NX-OS parsers for `show vtp status` and `show feature | grep vtp`.
//!
//! # Output Examples
//!
//! ```text
//! VTP Version                     : 2 (capable)
//! Configuration Revision          : 0
//! Maximum VLANs supported locally : 1005
//! Number of existing VLANs        : 24
//! VTP Operating Mode              : Transparent
//! ```
//!
//! ```text
//! vtp                    1         disabled
//! ```

use std::sync::LazyLock;

use regex::Regex;

use super::{OutputParser, ParseOutcome};
use crate::mode::{ModeResult, VtpMode};
use crate::transport::RawOutput;

static OPERATING_MODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"VTP\sOperating\sMode\s+:\s+(\w+)").unwrap());

static FEATURE_STATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\s*vtp\s+\d+\s+(\w+)").unwrap());

/// Reads `VTP Operating Mode : <Mode>` from `show vtp status`.
///
/// The mode word is matched case-sensitively, as NX-OS prints it.
#[derive(Debug, Clone, Copy, Default)]
pub struct NxosStatusParser;

impl OutputParser for NxosStatusParser {
    fn name(&self) -> &'static str {
        "nxos_vtp_status"
    }

    fn parse(&self, output: &RawOutput) -> ParseOutcome {
        let Some(caps) = OPERATING_MODE.captures(&output.text) else {
            return ParseOutcome::NoMatch("VTP operating mode not found".to_string());
        };

        let mode = match &caps[1] {
            "Transparent" => VtpMode::Transparent,
            "Client" => VtpMode::Client,
            "Server" => VtpMode::Server,
            "Off" => VtpMode::Off,
            other => {
                return ParseOutcome::NoMatch(format!("unrecognized VTP operating mode '{other}'"));
            }
        };

        ParseOutcome::Match(ModeResult::new(mode))
    }
}

/// Reads the `vtp` row of `show feature`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NxosFeatureParser;

impl OutputParser for NxosFeatureParser {
    fn name(&self) -> &'static str {
        "nxos_vtp_feature"
    }

    fn parse(&self, output: &RawOutput) -> ParseOutcome {
        let Some(caps) = FEATURE_STATE.captures(&output.text) else {
            return ParseOutcome::NoMatch("VTP feature information not found".to_string());
        };

        match &caps[1] {
            "disabled" => ParseOutcome::Match(ModeResult::new(VtpMode::FeatureDisabled)),
            "enabled" => ParseOutcome::Match(ModeResult::new(VtpMode::FeatureEnabledModeUnknown)),
            other => ParseOutcome::NoMatch(format!("unrecognized VTP feature state '{other}'")),
        }
    }
}
