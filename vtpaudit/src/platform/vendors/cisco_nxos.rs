//! Cisco NX-OS platform definition.
//!
//! NX-OS only answers `show vtp status` when `feature vtp` is enabled and
//! running. Otherwise the command is rejected, and the `show feature` row
//! for VTP tells whether the feature is disabled or merely not reporting.
//!
//! # Strategy Chain
//!
//! ```text
//! show vtp status ──miss──► show feature | grep vtp ──miss──► unknown
//!       │                            │
//!    off/client/                feature-disabled /
//!  server/transparent      feature-enabled-mode-unknown
//! ```

use crate::chain::{ChainStep, StrategyChain};
use crate::parser::{NxosFeatureParser, NxosStatusParser};
use crate::platform::{PlatformDefinition, VendorFamily};

/// Primary status query.
pub const SHOW_VTP_STATUS: &str = "show vtp status";

/// Fallback feature query.
pub const SHOW_VTP_FEATURE: &str = "show feature | grep vtp";

/// Diagnostic when neither query classified the device.
pub const FEATURE_UNAVAILABLE: &str = "Unable to retrieve VTP feature information.";

/// Create the Cisco NX-OS platform definition.
pub fn platform() -> PlatformDefinition {
    let chain = StrategyChain::new(FEATURE_UNAVAILABLE)
        .with_step(ChainStep::new(SHOW_VTP_STATUS, NxosStatusParser))
        .with_step(ChainStep::new(SHOW_VTP_FEATURE, NxosFeatureParser));

    PlatformDefinition::new(VendorFamily::CiscoNxos)
        .with_failure_pattern("% Invalid command")
        .with_failure_pattern("% Incomplete command")
        .with_failure_pattern("% Ambiguous command")
        .with_failure_pattern("% Permission denied")
        .with_failure_pattern("Syntax error while parsing")
        .with_chain(chain)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nxos_platform() {
        let platform = platform();
        assert_eq!(platform.family, VendorFamily::CiscoNxos);
        assert_eq!(platform.chain.len(), 2);

        let commands: Vec<_> = platform.chain.steps().map(|s| s.command.as_str()).collect();
        assert_eq!(commands, [SHOW_VTP_STATUS, SHOW_VTP_FEATURE]);
        assert!(platform.chain.steps().all(|s| !s.structured));
        assert_eq!(platform.chain.exhausted_diagnostic(), FEATURE_UNAVAILABLE);
    }

    #[test]
    fn test_failure_patterns() {
        let platform = platform();
        assert_eq!(
            platform.detect_failure("                ^\n% Invalid command at '^' marker."),
            Some("% Invalid command")
        );
        assert_eq!(platform.detect_failure("VTP Operating Mode : Server"), None);
    }
}
