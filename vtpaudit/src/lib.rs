//! # vtpaudit
//!
//! Concurrent VTP operating-mode audit for Cisco switch fleets.
//!
//! vtpaudit connects to every NX-OS and IOS device in an inventory over SSH,
//! classifies its VTP mode, and appends one row per device to a CSV report
//! for its vendor family.
//!
//! ## Features
//!
//! - Async SSH command execution via russh
//! - Ordered per-vendor strategy chains with fallback queries
//! - Structured decoding of `show vtp status`
//! - Bounded per-family concurrency
//! - Append-only reports with a single header across runs
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use vtpaudit::{AuditConfig, FleetDispatcher, Inventory, SshConfig, SshTransport};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), vtpaudit::Error> {
//!     let config = AuditConfig::default();
//!     let inventory = Inventory::load(&config.inventory)?;
//!     let reports = config.report_set();
//!
//!     let dispatcher = FleetDispatcher::new(SshTransport::new(SshConfig::from(&config.ssh)))
//!         .with_max_concurrency(config.max_concurrency);
//!
//!     let summary = dispatcher
//!         .run(&inventory, &reports, |record| println!("{}", record))
//!         .await;
//!
//!     println!("{:?}", summary);
//!     Ok(())
//! }
//! ```

pub mod chain;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod inventory;
pub mod mode;
pub mod parser;
pub mod platform;
pub mod report;
pub mod task;
pub mod transport;

#[cfg(test)]
mod testing;

// Re-export main types for convenience
pub use chain::{ChainStep, StrategyChain};
pub use config::AuditConfig;
pub use dispatch::{AuditSummary, FleetDispatcher, GroupSummary};
pub use error::Error;
pub use inventory::{Device, HostFilter, Inventory};
pub use mode::{ModeResult, VtpMode};
pub use platform::{PlatformDefinition, PlatformRegistry, VendorFamily};
pub use report::{ReportSet, ReportStore};
pub use task::{AuditRecord, audit_device};
pub use transport::{AuthMethod, RawOutput, SshConfig, SshTransport, Transport};
