//! Normalized VTP mode classification.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

/// VTP operating mode as reported in the audit.
///
/// The first four variants are real VTP operating modes. The remaining
/// variants describe what could be learned when the mode itself could not
/// be read from the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum VtpMode {
    Off,
    Client,
    Server,
    Transparent,
    /// NX-OS `feature vtp` is disabled, so there is no operating mode.
    FeatureDisabled,
    /// NX-OS `feature vtp` is enabled, but the mode was not readable.
    FeatureEnabledModeUnknown,
    Unknown,
}

impl VtpMode {
    /// Label written to reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::Client => "client",
            Self::Server => "server",
            Self::Transparent => "transparent",
            Self::FeatureDisabled => "feature-disabled",
            Self::FeatureEnabledModeUnknown => "feature-enabled-mode-unknown",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for VtpMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string is not a known VTP mode label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownModeLabel(pub String);

impl fmt::Display for UnknownModeLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unrecognized VTP mode '{}'", self.0)
    }
}

impl std::error::Error for UnknownModeLabel {}

impl FromStr for VtpMode {
    type Err = UnknownModeLabel;

    /// Parses report labels, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mode = match s.trim().to_ascii_lowercase().as_str() {
            "off" => Self::Off,
            "client" => Self::Client,
            "server" => Self::Server,
            "transparent" => Self::Transparent,
            "feature-disabled" => Self::FeatureDisabled,
            "feature-enabled-mode-unknown" => Self::FeatureEnabledModeUnknown,
            "unknown" => Self::Unknown,
            _ => return Err(UnknownModeLabel(s.to_string())),
        };
        Ok(mode)
    }
}

/// Outcome of classifying one device: the mode plus an optional diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModeResult {
    pub mode: VtpMode,
    pub diagnostic: Option<String>,
}

impl ModeResult {
    /// A classification without diagnostic.
    pub fn new(mode: VtpMode) -> Self {
        Self {
            mode,
            diagnostic: None,
        }
    }

    /// An `unknown` classification explaining why.
    pub fn unknown(diagnostic: impl Into<String>) -> Self {
        Self {
            mode: VtpMode::Unknown,
            diagnostic: Some(diagnostic.into()),
        }
    }

    /// Check if the device could not be classified.
    pub fn is_unknown(&self) -> bool {
        self.mode == VtpMode::Unknown
    }
}

impl From<VtpMode> for ModeResult {
    fn from(mode: VtpMode) -> Self {
        Self::new(mode)
    }
}

impl fmt::Display for ModeResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.diagnostic {
            Some(diagnostic) => write!(f, "{} ({})", self.mode, diagnostic),
            None => write!(f, "{}", self.mode),
        }
    }
}
