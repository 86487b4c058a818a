//! SSH exec transport using russh.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Instant;

use bytes::BytesMut;
use log::{debug, warn};
use russh::client::{self, Handle};
use russh::keys::{PrivateKeyWithHashAlg, PublicKey, load_secret_key};
use russh::ChannelMsg;
use secrecy::ExposeSecret;

use super::config::{AuthMethod, HostKeyVerification, SshConfig};
use super::{RawOutput, Transport, decode};
use crate::error::{Result, TransportError};
use crate::inventory::Device;

/// Transport that runs each command on a fresh SSH exec channel.
///
/// A connection is opened per command and closed once its output has been
/// collected.
#[derive(Debug, Clone, Default)]
pub struct SshTransport {
    config: SshConfig,
}

impl SshTransport {
    /// Create a transport with the given settings.
    pub fn new(config: SshConfig) -> Self {
        Self { config }
    }

    /// Get the transport settings.
    pub fn config(&self) -> &SshConfig {
        &self.config
    }

    /// Connect to the device and authenticate.
    async fn connect(&self, device: &Device) -> Result<Handle<SshHandler>> {
        let ssh_config = Arc::new(client::Config {
            inactivity_timeout: Some(self.config.timeout),
            ..Default::default()
        });

        let host_key_error: Arc<Mutex<Option<TransportError>>> = Arc::new(Mutex::new(None));

        let handler = SshHandler {
            host: device.address.clone(),
            port: device.port,
            host_key_verification: self.config.host_key_verification.clone(),
            known_hosts_path: self.config.known_hosts_path.clone(),
            host_key_error: host_key_error.clone(),
        };

        let mut session = tokio::time::timeout(
            self.config.timeout,
            client::connect(ssh_config, (device.address.as_str(), device.port), handler),
        )
        .await
        .map_err(|_| TransportError::Timeout(self.config.timeout))?
        .map_err(|e| {
            // Prefer the detailed host key error over russh's generic one
            let stored = host_key_error.lock().ok().and_then(|mut slot| slot.take());
            stored.unwrap_or(TransportError::Ssh(e))
        })?;

        Self::authenticate(&mut session, device).await?;

        Ok(session)
    }

    /// Authenticate with the device's configured credentials.
    async fn authenticate(session: &mut Handle<SshHandler>, device: &Device) -> Result<()> {
        let username = device
            .username
            .as_deref()
            .ok_or_else(|| TransportError::MissingUsername {
                host: device.name.clone(),
            })?;

        let success = match &device.auth {
            AuthMethod::None => session
                .authenticate_none(username)
                .await
                .map_err(TransportError::Ssh)?
                .success(),
            AuthMethod::Password(password) => session
                .authenticate_password(username, password.expose_secret())
                .await
                .map_err(TransportError::Ssh)?
                .success(),
            AuthMethod::PrivateKey { path, passphrase } => {
                let passphrase = passphrase.as_ref().map(|p| p.expose_secret());
                let key = load_secret_key(path, passphrase)
                    .map_err(|e| TransportError::Key(e.to_string()))?;

                let hash_alg = session
                    .best_supported_rsa_hash()
                    .await
                    .map_err(TransportError::Ssh)?
                    .flatten();

                session
                    .authenticate_publickey(
                        username,
                        PrivateKeyWithHashAlg::new(Arc::new(key), hash_alg),
                    )
                    .await
                    .map_err(TransportError::Ssh)?
                    .success()
            }
        };

        if !success {
            return Err(TransportError::AuthenticationFailed {
                user: username.to_string(),
            }
            .into());
        }

        Ok(())
    }

    /// Run one command on an exec channel and collect its stdout.
    async fn exec(session: &Handle<SshHandler>, command: &str) -> Result<String> {
        let mut channel = session
            .channel_open_session()
            .await
            .map_err(TransportError::Ssh)?;

        channel
            .exec(true, command)
            .await
            .map_err(TransportError::Ssh)?;

        let mut stdout = BytesMut::new();
        let mut exit_status = None;

        while let Some(msg) = channel.wait().await {
            match msg {
                ChannelMsg::Data { ref data } => stdout.extend_from_slice(data),
                ChannelMsg::ExitStatus { exit_status: status } => exit_status = Some(status),
                _ => {}
            }
        }

        match exit_status {
            Some(status) if status != 0 && stdout.is_empty() => {
                Err(TransportError::CommandFailed {
                    command: command.to_string(),
                    status,
                }
                .into())
            }
            _ => Ok(String::from_utf8_lossy(&stdout).into_owned()),
        }
    }
}

impl Transport for SshTransport {
    async fn send_command(
        &self,
        device: &Device,
        command: &str,
        structured: bool,
    ) -> Result<RawOutput> {
        let start = Instant::now();
        let session = self.connect(device).await?;

        let text = tokio::time::timeout(self.config.timeout, Self::exec(&session, command))
            .await
            .map_err(|_| TransportError::Timeout(self.config.timeout));

        if let Err(e) = session
            .disconnect(russh::Disconnect::ByApplication, "", "en")
            .await
        {
            debug!("{}: disconnect failed: {}", device.name, e);
        }

        let text = text??;
        let mut output = RawOutput::new(command, text, start.elapsed());

        if structured {
            match decode::decode(command, &output.text) {
                Some(value) => output = output.with_structured(value),
                None => debug!("No structured decoder for '{}'", command),
            }
        }

        Ok(output)
    }
}

/// SSH client handler for russh.
struct SshHandler {
    host: String,
    port: u16,
    host_key_verification: HostKeyVerification,
    known_hosts_path: Option<PathBuf>,
    /// Detailed host key error for connect() to surface.
    host_key_error: Arc<Mutex<Option<TransportError>>>,
}

impl SshHandler {
    /// Check the host key against known_hosts.
    ///
    /// Returns `Ok(true)` if matched, `Ok(false)` if host not found,
    /// `Err(TransportError::HostKeyChanged)` if key changed.
    fn check_known_hosts(&self, pubkey: &PublicKey) -> std::result::Result<bool, TransportError> {
        let result = if let Some(ref path) = self.known_hosts_path {
            russh::keys::check_known_hosts_path(&self.host, self.port, pubkey, path)
        } else {
            russh::keys::check_known_hosts(&self.host, self.port, pubkey)
        };

        match result {
            Ok(matched) => Ok(matched),
            Err(russh::keys::Error::KeyChanged { line }) => Err(TransportError::HostKeyChanged {
                host: self.host.clone(),
                port: self.port,
                line,
            }),
            Err(e) => Err(TransportError::KnownHosts(e.to_string())),
        }
    }

    /// Save a new host key to known_hosts.
    fn learn_host_key(&self, pubkey: &PublicKey) -> std::result::Result<(), TransportError> {
        let result = if let Some(ref path) = self.known_hosts_path {
            russh::keys::known_hosts::learn_known_hosts_path(&self.host, self.port, pubkey, path)
        } else {
            russh::keys::known_hosts::learn_known_hosts(&self.host, self.port, pubkey)
        };

        result.map_err(|e| TransportError::KnownHosts(e.to_string()))
    }

    fn reject(&self, error: TransportError) -> bool {
        if let Ok(mut slot) = self.host_key_error.lock() {
            *slot = Some(error);
        }
        false
    }
}

impl client::Handler for SshHandler {
    type Error = russh::Error;

    async fn check_server_key(
        &mut self,
        server_public_key: &PublicKey,
    ) -> std::result::Result<bool, Self::Error> {
        let accepted = match self.host_key_verification {
            HostKeyVerification::Disabled => true,

            HostKeyVerification::AcceptNew => match self.check_known_hosts(server_public_key) {
                Ok(true) => true,
                Ok(false) => {
                    if let Err(e) = self.learn_host_key(server_public_key) {
                        warn!("Failed to save host key for {}: {}", self.host, e);
                    }
                    true
                }
                Err(e) => self.reject(e),
            },

            HostKeyVerification::Strict => match self.check_known_hosts(server_public_key) {
                Ok(true) => true,
                Ok(false) => self.reject(TransportError::HostKeyUnknown {
                    host: self.host.clone(),
                    port: self.port,
                }),
                Err(e) => self.reject(e),
            },
        };

        Ok(accepted)
    }
}
