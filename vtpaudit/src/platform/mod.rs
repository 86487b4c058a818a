//! Vendor platform definitions.
//!
//! Each vendor family has a module under [`vendors`] that builds its
//! [`PlatformDefinition`]: the failure markers of its CLI and the strategy
//! chain used to classify its VTP mode.

mod definition;
mod registry;
pub mod vendors;

pub use definition::PlatformDefinition;
pub use registry::PlatformRegistry;

use std::fmt;

use serde::Serialize;

/// Vendor operating system family of a switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VendorFamily {
    CiscoNxos,
    CiscoIos,
}

impl VendorFamily {
    /// Every supported family, in audit order.
    pub const ALL: [VendorFamily; 2] = [VendorFamily::CiscoNxos, VendorFamily::CiscoIos];

    /// Inventory group that marks a device as this family.
    pub fn group_name(&self) -> &'static str {
        match self {
            Self::CiscoNxos => "cisco_nxos",
            Self::CiscoIos => "cisco_ios",
        }
    }

    /// Human readable name.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::CiscoNxos => "NX-OS",
            Self::CiscoIos => "IOS",
        }
    }

    /// Built-in platform definition for this family.
    pub fn platform(&self) -> PlatformDefinition {
        match self {
            Self::CiscoNxos => vendors::cisco_nxos::platform(),
            Self::CiscoIos => vendors::cisco_ios::platform(),
        }
    }
}

impl fmt::Display for VendorFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_names() {
        assert_eq!(VendorFamily::CiscoNxos.group_name(), "cisco_nxos");
        assert_eq!(VendorFamily::CiscoIos.group_name(), "cisco_ios");
    }

    #[test]
    fn test_platform_matches_family() {
        for family in VendorFamily::ALL {
            assert_eq!(family.platform().family, family);
        }
    }
}
