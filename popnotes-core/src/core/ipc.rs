//! Named commands a renderer may invoke on the host.
//!
//! Each command maps 1:1 onto a [`WindowRegistry`] operation. Callers treat
//! invocation as fire-and-forget: they await the result, and on failure log
//! it and keep going (see [`invoke_logged`]).

use crate::{CloseOutcome, OpenOutcome, PopnotesError, Result, WindowHost, WindowRegistry};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IpcCommand {
    OpenPopupWindow,
    ClosePopupWindow,
}

impl IpcCommand {
    pub const ALL: [IpcCommand; 2] = [IpcCommand::OpenPopupWindow, IpcCommand::ClosePopupWindow];

    /// The wire name registered with the host's invoke handler.
    pub fn name(self) -> &'static str {
        match self {
            Self::OpenPopupWindow => "open_popup_window",
            Self::ClosePopupWindow => "close_popup_window",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.name() == name)
    }
}

impl fmt::Display for IpcCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Host-side result of a dispatched command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    Opened(OpenOutcome),
    Closed(CloseOutcome),
}

/// Runs `command` against the registry.
///
/// # Errors
///
/// Whatever the underlying registry operation returns.
pub fn dispatch<H: WindowHost>(
    registry: &WindowRegistry<H>,
    command: IpcCommand,
) -> Result<CommandOutcome> {
    log::debug!("dispatching {command}");
    match command {
        IpcCommand::OpenPopupWindow => registry.open_auxiliary().map(CommandOutcome::Opened),
        IpcCommand::ClosePopupWindow => registry.close_auxiliary().map(CommandOutcome::Closed),
    }
}

/// The caller's side of the command bridge.
pub trait CommandBridge {
    /// Carries `command` to the host and reports its completion.
    ///
    /// # Errors
    ///
    /// Any failure of the bridge or of the host-side handler.
    fn invoke(&self, command: IpcCommand) -> Result<()>;
}

/// Bridge that dispatches straight into an in-process registry.
impl<H: WindowHost> CommandBridge for WindowRegistry<H> {
    fn invoke(&self, command: IpcCommand) -> Result<()> {
        dispatch(self, command).map(|_| ())
    }
}

/// Invokes `command`, logging any failure as [`PopnotesError::IpcInvocationFailed`].
///
/// Never propagates: the calling UI stays interactive whatever the host does.
/// Returns whether the command completed.
pub fn invoke_logged<B: CommandBridge + ?Sized>(bridge: &B, command: IpcCommand) -> bool {
    match bridge.invoke(command) {
        Ok(()) => true,
        Err(e) => {
            let failure = PopnotesError::IpcInvocationFailed {
                command: command.name().to_string(),
                reason: e.to_string(),
            };
            log::error!("{failure}");
            false
        }
    }
}
