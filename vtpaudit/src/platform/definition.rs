//! Platform definition for vendor-specific audit behavior.

use super::VendorFamily;
use crate::chain::StrategyChain;
use crate::inventory::Device;
use crate::mode::ModeResult;
use crate::transport::Transport;

/// Platform definition containing all vendor-specific audit configuration.
#[derive(Debug)]
pub struct PlatformDefinition {
    /// Family this definition applies to.
    pub family: VendorFamily,

    /// Output fragments that mean the device rejected the command.
    pub failed_when_contains: Vec<String>,

    /// Ordered command/parser steps used to classify the VTP mode.
    pub chain: StrategyChain,
}

impl PlatformDefinition {
    /// Create a definition with no failure markers and an empty chain.
    pub fn new(family: VendorFamily) -> Self {
        Self {
            family,
            failed_when_contains: vec![],
            chain: StrategyChain::default(),
        }
    }

    /// Add a failure pattern.
    pub fn with_failure_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.failed_when_contains.push(pattern.into());
        self
    }

    /// Set the strategy chain.
    pub fn with_chain(mut self, chain: StrategyChain) -> Self {
        self.chain = chain;
        self
    }

    /// Return the first failure marker found in `output`.
    pub fn detect_failure(&self, output: &str) -> Option<&str> {
        self.failed_when_contains
            .iter()
            .find(|pattern| output.contains(pattern.as_str()))
            .map(String::as_str)
    }

    /// Classify `device` by running the strategy chain.
    pub async fn classify<T: Transport>(&self, transport: &T, device: &Device) -> ModeResult {
        self.chain.run(transport, device, self).await
    }
}
