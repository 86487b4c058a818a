//! Per-device audit task.

use std::fmt;

use serde::Serialize;

use crate::inventory::Device;
use crate::mode::ModeResult;
use crate::platform::{PlatformDefinition, VendorFamily};
use crate::transport::Transport;

/// Outcome of auditing one device, as persisted to the family's report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuditRecord {
    /// Family whose report this record belongs to.
    pub family: VendorFamily,

    /// Inventory name of the device.
    pub hostname: String,

    /// Management address of the device.
    pub address: String,

    /// Classification of the device's VTP mode.
    pub result: ModeResult,
}

impl fmt::Display for AuditRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} ({}): vtp_mode: {}",
            self.family, self.hostname, self.address, self.result
        )
    }
}

/// Audit one device with its family's platform definition.
///
/// Always yields exactly one record. Name and address are copied from
/// `device` as they are when the task starts.
pub async fn audit_device<T: Transport>(
    transport: &T,
    platform: &PlatformDefinition,
    device: &Device,
) -> AuditRecord {
    let hostname = device.name.clone();
    let address = device.address.clone();

    let result = platform.classify(transport, device).await;

    AuditRecord {
        family: platform.family,
        hostname,
        address,
        result,
    }
}
