//! Scripted transport for unit tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use crate::error::{Result, TransportError};
use crate::inventory::Device;
use crate::transport::{RawOutput, Transport, decode};

#[derive(Debug, Clone)]
enum Reply {
    Text(String),
    Fail,
}

/// Replays canned output per (device name, command) and records every call.
///
/// Commands without a scripted reply fail like an unreachable device.
#[derive(Debug, Default)]
pub(crate) struct ScriptedTransport {
    replies: HashMap<(String, String), Reply>,
    calls: Mutex<Vec<(String, String, bool)>>,
}

impl ScriptedTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn reply(mut self, device: &str, command: &str, text: &str) -> Self {
        self.replies.insert(
            (device.to_string(), command.to_string()),
            Reply::Text(text.to_string()),
        );
        self
    }

    pub(crate) fn fail(mut self, device: &str, command: &str) -> Self {
        self.replies
            .insert((device.to_string(), command.to_string()), Reply::Fail);
        self
    }

    /// Every (device, command, structured) call, in issue order.
    pub(crate) fn calls(&self) -> Vec<(String, String, bool)> {
        self.calls.lock().unwrap().clone()
    }

    /// Commands issued to one device, in issue order.
    pub(crate) fn commands_for(&self, device: &str) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|(name, _, _)| name == device)
            .map(|(_, command, _)| command)
            .collect()
    }
}

impl Transport for ScriptedTransport {
    async fn send_command(
        &self,
        device: &Device,
        command: &str,
        structured: bool,
    ) -> Result<RawOutput> {
        self.calls
            .lock()
            .unwrap()
            .push((device.name.clone(), command.to_string(), structured));

        // Let other device tasks interleave
        tokio::task::yield_now().await;

        match self.replies.get(&(device.name.clone(), command.to_string())) {
            Some(Reply::Text(text)) => {
                let mut output = RawOutput::new(command, text.clone(), Duration::ZERO);
                if structured {
                    if let Some(value) = decode::decode(command, text) {
                        output = output.with_structured(value);
                    }
                }
                Ok(output)
            }
            Some(Reply::Fail) | None => {
                Err(TransportError::Timeout(Duration::from_secs(30)).into())
            }
        }
    }
}
