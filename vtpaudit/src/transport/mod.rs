//! Remote command execution.
//!
//! The audit core only depends on the [`Transport`] trait. [`SshTransport`]
//! is the production implementation, and tests substitute scripted ones.

pub mod config;
pub mod decode;
mod output;
mod ssh;

pub use config::{AuthMethod, HostKeyVerification, SshConfig};
pub use output::RawOutput;
pub use ssh::SshTransport;

use std::future::Future;

use crate::error::Result;
use crate::inventory::Device;

/// Trait for executing a command on a device.
pub trait Transport: Send + Sync {
    /// Run `command` on `device` and return its output.
    ///
    /// With `structured` set, the output also carries a JSON decoding of the
    /// text when a decoder for `command` exists (see [`decode`]).
    fn send_command(
        &self,
        device: &Device,
        command: &str,
        structured: bool,
    ) -> impl Future<Output = Result<RawOutput>> + Send;
}
