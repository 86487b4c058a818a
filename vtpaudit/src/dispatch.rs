//! Fleet-wide audit dispatch.
//!
//! Families are audited one after another in registry order. Within a
//! family, up to `max_concurrency` device tasks run at once and each record
//! is written to the family's report as soon as its task completes.

use std::pin::pin;

use futures_util::stream::{self, Stream, StreamExt};
use indexmap::IndexMap;
use log::{debug, info, warn};

use crate::inventory::{Device, Inventory};
use crate::platform::{PlatformDefinition, PlatformRegistry, VendorFamily};
use crate::report::ReportSet;
use crate::task::{AuditRecord, audit_device};
use crate::transport::Transport;

/// Per-family totals of an audit run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupSummary {
    /// Devices selected for the family.
    pub devices: usize,
    /// Devices classified as `unknown`.
    pub unknown: usize,
    /// Records that could not be written to the report.
    pub write_failures: usize,
}

/// Totals of an audit run, in audit order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuditSummary {
    pub groups: IndexMap<VendorFamily, GroupSummary>,
    /// Devices that belong to no audited family.
    pub skipped: usize,
}

impl AuditSummary {
    /// Totals for one family.
    pub fn group(&self, family: VendorFamily) -> Option<&GroupSummary> {
        self.groups.get(&family)
    }
}

/// Runs device tasks for every registered family.
#[derive(Debug)]
pub struct FleetDispatcher<T> {
    transport: T,
    registry: PlatformRegistry,
    max_concurrency: usize,
}

impl<T: Transport> FleetDispatcher<T> {
    /// Create a dispatcher with the built-in platforms.
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            registry: PlatformRegistry::builtin(),
            max_concurrency: 16,
        }
    }

    /// Use a custom platform registry.
    pub fn with_registry(mut self, registry: PlatformRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Set the maximum number of concurrent device tasks (at least 1).
    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency.max(1);
        self
    }

    /// Get the transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Audit `devices` with `platform`, yielding records in completion order.
    pub fn audit_group<'a>(
        &'a self,
        platform: &'a PlatformDefinition,
        devices: Vec<&'a Device>,
    ) -> impl Stream<Item = AuditRecord> + 'a {
        stream::iter(devices)
            .map(move |device| audit_device(&self.transport, platform, device))
            .buffer_unordered(self.max_concurrency)
    }

    /// Audit the whole inventory and append every record to `reports`.
    ///
    /// Each device is audited once, as its [`Device::family`].
    /// `on_record` is called for each record as it completes, before it is
    /// written. Report write failures are logged and counted, never returned.
    pub async fn run<F>(
        &self,
        inventory: &Inventory,
        reports: &ReportSet,
        mut on_record: F,
    ) -> AuditSummary
    where
        F: FnMut(&AuditRecord),
    {
        let mut summary = AuditSummary {
            skipped: inventory
                .filter(|device| {
                    device
                        .family()
                        .is_none_or(|family| !self.registry.contains(family))
                })
                .count(),
            ..Default::default()
        };

        if summary.skipped > 0 {
            debug!(
                "Skipping {} devices outside the audited families",
                summary.skipped
            );
        }

        for platform in self.registry.platforms() {
            let devices: Vec<&Device> = inventory.in_family(platform.family).collect();
            info!("Auditing {} {} devices", devices.len(), platform.family);

            let group = summary.groups.entry(platform.family).or_default();
            group.devices = devices.len();

            let mut records = pin!(self.audit_group(platform, devices));
            while let Some(record) = records.next().await {
                if record.result.is_unknown() {
                    group.unknown += 1;
                }

                on_record(&record);

                if let Err(e) = reports.append(&record).await {
                    warn!("{}: failed to write report row: {}", record.hostname, e);
                    group.write_failures += 1;
                }
            }

            info!(
                "{} audit complete: {} devices, {} unknown",
                platform.family, group.devices, group.unknown
            );
        }

        summary
    }
}
