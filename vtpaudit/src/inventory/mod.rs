//! Device inventory.
//!
//! The inventory is a TOML file in the shape of a Nornir inventory:
//!
//! ```toml
//! [defaults]
//! username = "netops"
//! password = "secret"
//!
//! [groups.cisco_nxos]
//! [groups.cisco_ios]
//! [groups.dc1]
//! groups = ["cisco_nxos"]
//!
//! [hosts.nx-core-01]
//! hostname = "10.0.0.1"
//! groups = ["dc1"]
//! data = { site = "SiteXYZ" }
//! ```
//!
//! Group membership is transitive: `nx-core-01` above belongs to `dc1` and
//! `cisco_nxos`. Connection settings resolve host first, then its groups in
//! membership order, then `[defaults]`.

mod device;

pub use device::Device;

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use indexmap::{IndexMap, IndexSet};
use secrecy::SecretString;
use serde::Deserialize;

use crate::error::InventoryError;
use crate::platform::VendorFamily;
use crate::transport::AuthMethod;

/// Connection settings that hosts, groups and defaults can each provide.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ConnectionEntry {
    username: Option<String>,
    password: Option<String>,
    private_key: Option<PathBuf>,
    passphrase: Option<String>,
    port: Option<u16>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct GroupEntry {
    groups: Vec<String>,
    #[serde(flatten)]
    connection: ConnectionEntry,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct HostEntry {
    hostname: Option<String>,
    groups: Vec<String>,
    data: IndexMap<String, toml::Value>,
    #[serde(flatten)]
    connection: ConnectionEntry,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct InventoryFile {
    defaults: ConnectionEntry,
    groups: IndexMap<String, GroupEntry>,
    hosts: IndexMap<String, HostEntry>,
}

/// The set of devices available to the audit.
#[derive(Debug, Default)]
pub struct Inventory {
    devices: Vec<Device>,
}

impl Inventory {
    /// Create an inventory from already resolved devices.
    pub fn new(devices: Vec<Device>) -> Self {
        Self { devices }
    }

    /// Load an inventory file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, InventoryError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| InventoryError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&contents, path)
    }

    /// Parse inventory TOML. `origin` is only used in error messages.
    pub fn from_toml(contents: &str, origin: impl AsRef<Path>) -> Result<Self, InventoryError> {
        let file: InventoryFile =
            toml::from_str(contents).map_err(|source| InventoryError::Parse {
                path: origin.as_ref().to_path_buf(),
                source,
            })?;

        let mut devices = Vec::with_capacity(file.hosts.len());
        for (name, host) in &file.hosts {
            devices.push(resolve_host(name, host, &file)?);
        }

        Ok(Self { devices })
    }

    /// All devices, in inventory order.
    pub fn devices(&self) -> &[Device] {
        &self.devices
    }

    /// Devices matching a predicate.
    pub fn filter<'a, F>(&'a self, predicate: F) -> impl Iterator<Item = &'a Device> + 'a
    where
        F: Fn(&Device) -> bool + 'a,
    {
        self.devices.iter().filter(move |device| predicate(device))
    }

    /// Devices belonging to `group`, directly or through a parent group.
    pub fn in_group<'a>(&'a self, group: &'a str) -> impl Iterator<Item = &'a Device> + 'a {
        self.filter(move |device| device.has_parent_group(group))
    }

    /// Devices audited as `family`.
    pub fn in_family(&self, family: VendorFamily) -> impl Iterator<Item = &Device> {
        self.filter(move |device| device.family() == Some(family))
    }

    /// Keep only devices matching every filter.
    pub fn retain_matching(&mut self, filters: &[HostFilter]) {
        self.devices
            .retain(|device| filters.iter().all(|filter| filter.matches(device)));
    }

    /// Number of devices.
    pub fn len(&self) -> usize {
        self.devices.len()
    }

    /// Check if the inventory has no devices.
    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }
}

/// A `key=value` match against host data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostFilter {
    pub key: String,
    pub value: String,
}

impl HostFilter {
    /// Check if the device's data has `key` set to `value`.
    pub fn matches(&self, device: &Device) -> bool {
        device.data.get(&self.key) == Some(&self.value)
    }
}

impl FromStr for HostFilter {
    type Err = InventoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('=') {
            Some((key, value)) if !key.trim().is_empty() => Ok(Self {
                key: key.trim().to_string(),
                value: value.trim().to_string(),
            }),
            _ => Err(InventoryError::InvalidFilter(s.to_string())),
        }
    }
}

fn resolve_host(
    name: &str,
    host: &HostEntry,
    file: &InventoryFile,
) -> Result<Device, InventoryError> {
    let address = host
        .hostname
        .clone()
        .ok_or_else(|| InventoryError::MissingHostname {
            host: name.to_string(),
        })?;

    let mut groups = IndexSet::new();
    let mut visiting = Vec::new();
    for group in &host.groups {
        collect_groups(name, group, &file.groups, &mut visiting, &mut groups)?;
    }

    // Host first, then groups in membership order, then defaults
    let layers: Vec<&ConnectionEntry> = std::iter::once(&host.connection)
        .chain(groups.iter().filter_map(|g| file.groups.get(g)).map(|g| &g.connection))
        .chain(std::iter::once(&file.defaults))
        .collect();

    let username = layers.iter().find_map(|c| c.username.clone());
    let port = layers.iter().find_map(|c| c.port).unwrap_or(22);
    let password = layers.iter().find_map(|c| c.password.clone());
    let private_key = layers.iter().find_map(|c| c.private_key.clone());
    let passphrase = layers.iter().find_map(|c| c.passphrase.clone());

    let auth = match (private_key, password) {
        (Some(path), _) => AuthMethod::PrivateKey {
            path,
            passphrase: passphrase.map(SecretString::from),
        },
        (None, Some(password)) => AuthMethod::Password(SecretString::from(password)),
        (None, None) => AuthMethod::None,
    };

    let data = host
        .data
        .iter()
        .map(|(key, value)| {
            let value = match value {
                toml::Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            (key.clone(), value)
        })
        .collect();

    Ok(Device {
        name: name.to_string(),
        address,
        port,
        username,
        auth,
        groups,
        data,
    })
}

/// Depth-first walk adding `group` and its ancestors to `out`.
fn collect_groups(
    member: &str,
    group: &str,
    defined: &IndexMap<String, GroupEntry>,
    visiting: &mut Vec<String>,
    out: &mut IndexSet<String>,
) -> Result<(), InventoryError> {
    if visiting.iter().any(|g| g == group) {
        return Err(InventoryError::GroupCycle {
            group: group.to_string(),
        });
    }

    let entry = defined
        .get(group)
        .ok_or_else(|| InventoryError::UndefinedGroup {
            member: member.to_string(),
            group: group.to_string(),
        })?;

    out.insert(group.to_string());
    visiting.push(group.to_string());
    for parent in &entry.groups {
        collect_groups(group, parent, defined, visiting, out)?;
    }
    visiting.pop();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::io::Write;

    const INVENTORY: &str = r#"
[defaults]
username = "netops"
password = "default-secret"

[groups.cisco_nxos]
port = 2222

[groups.cisco_ios]

[groups.dc1]
groups = ["cisco_nxos"]
username = "dc-admin"

[hosts.nx-core-01]
hostname = "10.0.0.1"
groups = ["dc1"]
data = { site = "SiteXYZ", rack = 4 }

[hosts.ios-access-01]
hostname = "10.0.1.1"
groups = ["cisco_ios"]
password = "host-secret"
data = { site = "SiteABC" }

[hosts.eos-leaf-01]
hostname = "10.0.2.1"
"#;

    #[test]
    fn test_load_resolves_groups_and_families() {
        let inventory = Inventory::from_toml(INVENTORY, "inventory.toml").unwrap();
        assert_eq!(inventory.len(), 3);

        let nx = &inventory.devices()[0];
        assert_eq!(nx.name, "nx-core-01");
        assert_eq!(nx.address, "10.0.0.1");
        assert!(nx.has_parent_group("dc1"));
        assert!(nx.has_parent_group("cisco_nxos"));
        assert_eq!(nx.family(), Some(VendorFamily::CiscoNxos));

        let ios = &inventory.devices()[1];
        assert_eq!(ios.family(), Some(VendorFamily::CiscoIos));

        let eos = &inventory.devices()[2];
        assert_eq!(eos.family(), None);

        assert_eq!(inventory.in_family(VendorFamily::CiscoNxos).count(), 1);
        assert_eq!(inventory.in_family(VendorFamily::CiscoIos).count(), 1);
    }

    #[test]
    fn test_connection_settings_layering() {
        let inventory = Inventory::from_toml(INVENTORY, "inventory.toml").unwrap();

        let nx = &inventory.devices()[0];
        assert_eq!(nx.username.as_deref(), Some("dc-admin"));
        assert_eq!(nx.port, 2222);
        match &nx.auth {
            AuthMethod::Password(p) => assert_eq!(p.expose_secret(), "default-secret"),
            other => panic!("unexpected auth {other:?}"),
        }

        let ios = &inventory.devices()[1];
        assert_eq!(ios.username.as_deref(), Some("netops"));
        assert_eq!(ios.port, 22);
        match &ios.auth {
            AuthMethod::Password(p) => assert_eq!(p.expose_secret(), "host-secret"),
            other => panic!("unexpected auth {other:?}"),
        }
    }

    #[test]
    fn test_host_data_is_stringified() {
        let inventory = Inventory::from_toml(INVENTORY, "inventory.toml").unwrap();
        let nx = &inventory.devices()[0];
        assert_eq!(nx.data.get("site").map(String::as_str), Some("SiteXYZ"));
        assert_eq!(nx.data.get("rack").map(String::as_str), Some("4"));
    }

    #[test]
    fn test_undefined_group() {
        let err = Inventory::from_toml(
            "[hosts.sw1]\nhostname = \"10.0.0.9\"\ngroups = [\"nope\"]\n",
            "inventory.toml",
        )
        .unwrap_err();
        assert!(matches!(err, InventoryError::UndefinedGroup { ref group, .. } if group == "nope"));
    }

    #[test]
    fn test_group_cycle() {
        let toml = r#"
[groups.a]
groups = ["b"]
[groups.b]
groups = ["a"]
[hosts.sw1]
hostname = "10.0.0.9"
groups = ["a"]
"#;
        let err = Inventory::from_toml(toml, "inventory.toml").unwrap_err();
        assert!(matches!(err, InventoryError::GroupCycle { .. }));
    }

    #[test]
    fn test_missing_hostname() {
        let err = Inventory::from_toml("[hosts.sw1]\n", "inventory.toml").unwrap_err();
        assert!(matches!(err, InventoryError::MissingHostname { ref host } if host == "sw1"));
    }

    #[test]
    fn test_host_filters() {
        let mut inventory = Inventory::from_toml(INVENTORY, "inventory.toml").unwrap();
        let filter: HostFilter = "site=SiteXYZ".parse().unwrap();
        inventory.retain_matching(&[filter]);
        assert_eq!(inventory.len(), 1);
        assert_eq!(inventory.devices()[0].name, "nx-core-01");

        assert!("site".parse::<HostFilter>().is_err());
        assert!("=x".parse::<HostFilter>().is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(INVENTORY.as_bytes()).unwrap();

        let inventory = Inventory::load(file.path()).unwrap();
        assert_eq!(inventory.len(), 3);

        let missing = Inventory::load(file.path().with_extension("missing"));
        assert!(matches!(missing, Err(InventoryError::Read { .. })));
    }
}
