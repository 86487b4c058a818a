//! Ordered fallback strategies for classifying a device.
//!
//! A [`StrategyChain`] is a list of (command, parser) steps. Steps run
//! strictly one after another and the chain stops at the first parser that
//! returns a definite result, so later commands are only sent to the device
//! when every earlier step missed.
//!
//! A step misses when:
//! - the transport fails (unreachable, authentication, timeout);
//! - the device rejects the command (a platform failure marker is present);
//! - the parser finds nothing usable in the output.
//!
//! When every step misses, the result is `unknown` with the chain's
//! exhausted diagnostic.

use std::fmt;

use log::{debug, warn};

use crate::inventory::Device;
use crate::mode::ModeResult;
use crate::parser::{MODE_UNAVAILABLE, OutputParser, ParseOutcome};
use crate::platform::PlatformDefinition;
use crate::transport::Transport;

/// One command and the parser that interprets its output.
pub struct ChainStep {
    /// Command sent to the device.
    pub command: String,

    /// Request structured decoding of the output.
    pub structured: bool,

    parser: Box<dyn OutputParser>,
}

impl ChainStep {
    /// Create a text step.
    pub fn new(command: impl Into<String>, parser: impl OutputParser + 'static) -> Self {
        Self {
            command: command.into(),
            structured: false,
            parser: Box::new(parser),
        }
    }

    /// Request structured decoding for this step.
    pub fn structured(mut self) -> Self {
        self.structured = true;
        self
    }
}

impl fmt::Debug for ChainStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChainStep")
            .field("command", &self.command)
            .field("structured", &self.structured)
            .field("parser", &self.parser.name())
            .finish()
    }
}

/// Ordered list of steps with first-match semantics.
#[derive(Debug)]
pub struct StrategyChain {
    steps: Vec<ChainStep>,
    exhausted_diagnostic: String,
}

impl Default for StrategyChain {
    fn default() -> Self {
        Self::new(MODE_UNAVAILABLE)
    }
}

impl StrategyChain {
    /// Create an empty chain.
    pub fn new(exhausted_diagnostic: impl Into<String>) -> Self {
        Self {
            steps: Vec::new(),
            exhausted_diagnostic: exhausted_diagnostic.into(),
        }
    }

    /// Append a step.
    pub fn with_step(mut self, step: ChainStep) -> Self {
        self.steps.push(step);
        self
    }

    /// Steps in execution order.
    pub fn steps(&self) -> impl Iterator<Item = &ChainStep> {
        self.steps.iter()
    }

    /// Number of steps.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Check if the chain has no steps.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Diagnostic reported when every step misses.
    pub fn exhausted_diagnostic(&self) -> &str {
        &self.exhausted_diagnostic
    }

    /// Run the steps against `device` until one yields a definite result.
    ///
    /// Never fails: transport errors and rejected commands are logged and
    /// count as a miss for that step.
    pub async fn run<T: Transport>(
        &self,
        transport: &T,
        device: &Device,
        platform: &PlatformDefinition,
    ) -> ModeResult {
        let total = self.steps.len();

        for (index, step) in self.steps.iter().enumerate() {
            debug!(
                "{} [{}] step {}/{}: {}",
                device.name,
                platform.family,
                index + 1,
                total,
                step.command
            );

            let output = match transport
                .send_command(device, &step.command, step.structured)
                .await
            {
                Ok(output) => output,
                Err(e) => {
                    warn!("{}: '{}' failed: {}", device.name, step.command, e);
                    continue;
                }
            };

            if let Some(marker) = platform.detect_failure(&output.text) {
                warn!(
                    "{}: '{}' rejected by device ({})",
                    device.name, step.command, marker
                );
                continue;
            }

            match step.parser.parse(&output) {
                ParseOutcome::Match(result) => {
                    debug!("{}: {} -> {}", device.name, step.parser.name(), result);
                    return result;
                }
                ParseOutcome::NoMatch(reason) => {
                    debug!("{}: {} missed: {}", device.name, step.parser.name(), reason);
                }
            }
        }

        ModeResult::unknown(self.exhausted_diagnostic.clone())
    }
}
