//! Cisco IOS platform definition.
//!
//! IOS is queried once, with structured decoding of `show vtp status`.
//! There is no fallback query.

use crate::chain::{ChainStep, StrategyChain};
use crate::parser::{IosStatusParser, MODE_UNAVAILABLE};
use crate::platform::{PlatformDefinition, VendorFamily};

/// Status query, decoded into `{"vtp": {...}}`.
pub const SHOW_VTP_STATUS: &str = "show vtp status";

/// Create the Cisco IOS platform definition.
pub fn platform() -> PlatformDefinition {
    let chain = StrategyChain::new(MODE_UNAVAILABLE)
        .with_step(ChainStep::new(SHOW_VTP_STATUS, IosStatusParser).structured());

    PlatformDefinition::new(VendorFamily::CiscoIos)
        .with_failure_pattern("% Invalid input detected")
        .with_failure_pattern("% Incomplete command")
        .with_failure_pattern("% Ambiguous command")
        .with_failure_pattern("% Authorization failed")
        .with_chain(chain)
}
