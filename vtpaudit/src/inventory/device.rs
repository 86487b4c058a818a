//! A switch to be audited.

use indexmap::{IndexMap, IndexSet};
use secrecy::SecretString;

use crate::platform::VendorFamily;
use crate::transport::AuthMethod;

/// A device from the inventory, with its groups and connection context resolved.
#[derive(Debug)]
pub struct Device {
    /// Inventory name, reported as HOSTNAME.
    pub name: String,

    /// Management address used to connect, reported as IP ADDR.
    pub address: String,

    /// SSH port.
    pub port: u16,

    /// Username for authentication.
    pub username: Option<String>,

    /// Authentication method.
    pub auth: AuthMethod,

    /// Every group the device belongs to, directly or through parent groups.
    pub groups: IndexSet<String>,

    /// Free-form host data used for filtering (site, role, ...).
    pub data: IndexMap<String, String>,
}

impl Device {
    /// Create a device with default port and no credentials.
    pub fn new(name: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
            port: 22,
            username: None,
            auth: AuthMethod::None,
            groups: IndexSet::new(),
            data: IndexMap::new(),
        }
    }

    /// Set the username.
    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// Set password authentication.
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.auth = AuthMethod::Password(SecretString::from(password.into()));
        self
    }

    /// Add a group membership.
    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.groups.insert(group.into());
        self
    }

    /// Check membership in `group`, directly or through a parent group.
    pub fn has_parent_group(&self, group: &str) -> bool {
        self.groups.contains(group)
    }

    /// The vendor family this device is audited as, if any.
    ///
    /// A device in several family groups is audited once, as the first
    /// family in [`VendorFamily::ALL`] order.
    pub fn family(&self) -> Option<VendorFamily> {
        VendorFamily::ALL
            .into_iter()
            .find(|family| self.has_parent_group(family.group_name()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_family_from_groups() {
        let nxos = Device::new("nx1", "10.0.0.1")
            .with_group("dc1")
            .with_group("cisco_nxos");
        assert_eq!(nxos.family(), Some(VendorFamily::CiscoNxos));
        assert!(nxos.has_parent_group("dc1"));

        let ios = Device::new("ios1", "10.0.0.2").with_group("cisco_ios");
        assert_eq!(ios.family(), Some(VendorFamily::CiscoIos));

        let other = Device::new("eos1", "10.0.0.3").with_group("arista_eos");
        assert_eq!(other.family(), None);
    }

    #[test]
    fn test_builder_defaults() {
        let device = Device::new("sw1", "192.0.2.1")
            .with_username("admin")
            .with_password("secret");
        assert_eq!(device.port, 22);
        assert_eq!(device.username.as_deref(), Some("admin"));
        assert!(matches!(device.auth, AuthMethod::Password(_)));
        assert!(device.data.is_empty());
    }
}
