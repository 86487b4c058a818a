//! Audit run configuration.
//!
//! ```toml
//! inventory = "inventory.toml"
//! max_concurrency = 16
//!
//! [reports]
//! cisco_nxos = "vtp_report_nxos.csv"
//! cisco_ios = "vtp_report_ios.csv"
//!
//! [ssh]
//! timeout_secs = 30
//! host_key_verification = "accept-new"
//! known_hosts_path = "/etc/vtpaudit/known_hosts"
//! ```
//!
//! Every key is optional.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::InventoryError;
use crate::platform::VendorFamily;
use crate::report::ReportSet;
use crate::transport::{HostKeyVerification, SshConfig};

/// Config file looked up in the working directory when none is given.
pub const DEFAULT_CONFIG_PATH: &str = "vtpaudit.toml";

/// Top-level audit configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AuditConfig {
    /// Path to the inventory file.
    pub inventory: PathBuf,

    /// Maximum number of devices audited at once within a family.
    pub max_concurrency: usize,

    /// Report file per family.
    pub reports: ReportPaths,

    /// SSH transport settings.
    pub ssh: SshSettings,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            inventory: PathBuf::from("inventory.toml"),
            max_concurrency: 16,
            reports: ReportPaths::default(),
            ssh: SshSettings::default(),
        }
    }
}

impl AuditConfig {
    /// Load a config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, InventoryError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| InventoryError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&contents).map_err(|source| InventoryError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load `path` if given, else [`DEFAULT_CONFIG_PATH`] if it exists, else defaults.
    pub fn discover(path: Option<&Path>) -> Result<Self, InventoryError> {
        match path {
            Some(path) => Self::load(path),
            None if Path::new(DEFAULT_CONFIG_PATH).is_file() => Self::load(DEFAULT_CONFIG_PATH),
            None => Ok(Self::default()),
        }
    }

    /// Build the report stores of this run.
    pub fn report_set(&self) -> ReportSet {
        ReportSet::new(
            VendorFamily::ALL
                .into_iter()
                .map(|family| (family, self.reports.path_for(family).to_path_buf())),
        )
    }
}

/// Report file paths.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReportPaths {
    pub cisco_nxos: PathBuf,
    pub cisco_ios: PathBuf,
}

impl Default for ReportPaths {
    fn default() -> Self {
        Self {
            cisco_nxos: PathBuf::from("vtp_report_nxos.csv"),
            cisco_ios: PathBuf::from("vtp_report_ios.csv"),
        }
    }
}

impl ReportPaths {
    /// Report path of a family.
    pub fn path_for(&self, family: VendorFamily) -> &Path {
        match family {
            VendorFamily::CiscoNxos => &self.cisco_nxos,
            VendorFamily::CiscoIos => &self.cisco_ios,
        }
    }

    /// Set the report path of a family.
    pub fn set(&mut self, family: VendorFamily, path: PathBuf) {
        match family {
            VendorFamily::CiscoNxos => self.cisco_nxos = path,
            VendorFamily::CiscoIos => self.cisco_ios = path,
        }
    }
}

/// SSH settings as written in the config file.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SshSettings {
    pub timeout_secs: u64,
    pub host_key_verification: HostKeyVerification,
    pub known_hosts_path: Option<PathBuf>,
}

impl Default for SshSettings {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            host_key_verification: HostKeyVerification::default(),
            known_hosts_path: None,
        }
    }
}

impl From<&SshSettings> for SshConfig {
    fn from(settings: &SshSettings) -> Self {
        Self {
            timeout: Duration::from_secs(settings.timeout_secs),
            host_key_verification: settings.host_key_verification.clone(),
            known_hosts_path: settings.known_hosts_path.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = AuditConfig::default();
        assert_eq!(config.inventory, PathBuf::from("inventory.toml"));
        assert_eq!(config.max_concurrency, 16);
        assert_eq!(
            config.reports.path_for(VendorFamily::CiscoNxos),
            Path::new("vtp_report_nxos.csv")
        );
        assert_eq!(
            config.reports.path_for(VendorFamily::CiscoIos),
            Path::new("vtp_report_ios.csv")
        );
        assert_eq!(config.ssh.host_key_verification, HostKeyVerification::AcceptNew);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: AuditConfig = toml::from_str(
            r#"
max_concurrency = 4

[reports]
cisco_ios = "out/ios.csv"

[ssh]
host_key_verification = "strict"
"#,
        )
        .unwrap();

        assert_eq!(config.max_concurrency, 4);
        assert_eq!(config.reports.cisco_ios, PathBuf::from("out/ios.csv"));
        assert_eq!(config.reports.cisco_nxos, PathBuf::from("vtp_report_nxos.csv"));
        assert_eq!(config.ssh.host_key_verification, HostKeyVerification::Strict);
        assert_eq!(config.ssh.timeout_secs, 30);

        let ssh = SshConfig::from(&config.ssh);
        assert_eq!(ssh.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_unknown_keys_rejected() {
        assert!(toml::from_str::<AuditConfig>("max_concurency = 4").is_err());
    }

    #[test]
    fn test_load_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "inventory = \"hosts.toml\"").unwrap();

        let config = AuditConfig::discover(Some(file.path())).unwrap();
        assert_eq!(config.inventory, PathBuf::from("hosts.toml"));

        let missing = AuditConfig::load(file.path().with_extension("missing"));
        assert!(matches!(missing, Err(InventoryError::Read { .. })));
    }

    #[test]
    fn test_report_set_covers_every_family() {
        let mut config = AuditConfig::default();
        config
            .reports
            .set(VendorFamily::CiscoNxos, PathBuf::from("nx.csv"));
        let reports = config.report_set();

        for family in VendorFamily::ALL {
            assert!(reports.store(family).is_some());
        }
        assert_eq!(
            reports.store(VendorFamily::CiscoNxos).unwrap().path(),
            Path::new("nx.csv")
        );
    }
}
