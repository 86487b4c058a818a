//! Error types for vtpaudit.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::platform::VendorFamily;

/// Main error type for vtpaudit operations.
#[derive(Error, Debug)]
pub enum Error {
    /// SSH transport-level errors
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Inventory or configuration errors
    #[error("Inventory error: {0}")]
    Inventory(#[from] InventoryError),

    /// Report persistence errors
    #[error("Report error: {0}")]
    Report(#[from] ReportError),
}

/// Transport layer errors (SSH connection, authentication, command execution).
#[derive(Error, Debug)]
pub enum TransportError {
    /// SSH handshake or protocol error
    #[error("SSH error: {0}")]
    Ssh(#[from] russh::Error),

    /// Authentication failed
    #[error("Authentication failed for user '{user}'")]
    AuthenticationFailed { user: String },

    /// No username was configured for the device
    #[error("No username configured for '{host}'")]
    MissingUsername { host: String },

    /// SSH key error
    #[error("SSH key error: {0}")]
    Key(String),

    /// Host is not present in known_hosts (strict verification)
    #[error("Host key for {host}:{port} is not in known_hosts")]
    HostKeyUnknown { host: String, port: u16 },

    /// Host key differs from the one recorded in known_hosts
    #[error("Host key for {host}:{port} changed (known_hosts line {line})")]
    HostKeyChanged { host: String, port: u16, line: usize },

    /// known_hosts could not be read or written
    #[error("known_hosts error: {0}")]
    KnownHosts(String),

    /// Remote command exited with a non-zero status
    #[error("Command '{command}' exited with status {status}")]
    CommandFailed { command: String, status: u32 },

    /// Operation timed out
    #[error("Operation timed out after {0:?}")]
    Timeout(std::time::Duration),
}

/// Inventory and configuration errors.
#[derive(Error, Debug)]
pub enum InventoryError {
    /// File could not be read
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// File is not valid TOML for the expected schema
    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// A host or group references a group that is not defined
    #[error("'{member}' references undefined group '{group}'")]
    UndefinedGroup { member: String, group: String },

    /// Group parents form a cycle
    #[error("Group cycle detected at '{group}'")]
    GroupCycle { group: String },

    /// A host has no management address
    #[error("Host '{host}' has no hostname")]
    MissingHostname { host: String },

    /// Malformed `key=value` filter expression
    #[error("Invalid filter '{0}', expected key=value")]
    InvalidFilter(String),
}

/// Report writer errors.
#[derive(Error, Debug)]
pub enum ReportError {
    /// Report file could not be opened or inspected
    #[error("Failed to open report {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// CSV encoding or write failure
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// No store is configured for the record's family
    #[error("No report configured for {family}")]
    NoStore { family: VendorFamily },

    /// Write or flush failure
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Result type alias using vtpaudit's Error.
pub type Result<T> = std::result::Result<T, Error>;
