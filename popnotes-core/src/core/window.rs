//! Singleton lifecycle of the auxiliary ("popup") window.
//!
//! [`WindowRegistry`] owns the only record of whether the popup exists. The
//! native work is delegated to a [`WindowHost`], which the desktop crate
//! implements over Tauri and the tests implement with a recording fake.
//!
//! The popup moves through `Absent → Opening → Live → Closing → Absent`.
//! There is no `Opening → Closing` edge: a close that arrives while the
//! window is still being built is remembered and applied once it is `Live`.
//! The host is never called while the state lock is held, so a close request
//! on another thread can observe `Opening` and queue itself.

use crate::{OsFamily, PopnotesError, Result};
use serde::{Deserialize, Serialize};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Label that identifies the auxiliary window. Every other label is the main window.
pub const AUXILIARY_LABEL: &str = "popup";

/// Label the host gives the main window.
pub const MAIN_LABEL: &str = "main";

pub const AUXILIARY_TITLE: &str = "Popup Window";

/// Host-owned identity of a live window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowHandle {
    pub label: String,
    pub decorations_visible: bool,
}

/// Outer position and size of a window, in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindowGeometry {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Size of the popup and its distance below the main window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PopupLayout {
    pub width: f64,
    pub height: f64,
    pub gap: f64,
}

impl Default for PopupLayout {
    fn default() -> Self {
        Self {
            width: 450.0,
            height: 350.0,
            gap: 5.0,
        }
    }
}

impl PopupLayout {
    /// Centres the popup horizontally under `main`, `gap` pixels below it.
    pub fn place_below(&self, main: WindowGeometry) -> WindowGeometry {
        WindowGeometry {
            x: main.x + (main.width - self.width) / 2.0,
            y: main.y + main.height + self.gap,
            width: self.width,
            height: self.height,
        }
    }
}

/// Everything the host needs to build the auxiliary window.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowSpec {
    pub label: String,
    pub title: String,
    pub width: f64,
    pub height: f64,
    /// `None` lets the host pick a position (main window geometry unknown).
    pub position: Option<(f64, f64)>,
    pub decorations: bool,
}

/// Native window operations the registry delegates to.
pub trait WindowHost {
    /// Outer geometry of the main window, if it can be read.
    fn main_window_geometry(&self) -> Option<WindowGeometry>;

    /// Builds and shows a native window.
    ///
    /// # Errors
    ///
    /// [`PopnotesError::WindowCreationFailed`] if no window could be allocated.
    fn create_window(&self, spec: &WindowSpec) -> Result<()>;

    fn focus_window(&self, label: &str) -> Result<()>;

    fn destroy_window(&self, label: &str) -> Result<()>;

    /// Shows or hides native window decorations after the window exists.
    fn set_decorations(&self, label: &str, visible: bool) -> Result<()>;

    /// Whether the host currently has a window with `label`.
    fn window_exists(&self, label: &str) -> bool;
}

/// Lifecycle state of the auxiliary window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuxiliaryState {
    Absent,
    Opening { close_requested: bool },
    Live(WindowHandle),
    Closing,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpenOutcome {
    /// A new window was built.
    Created(WindowHandle),
    /// The existing window was brought to the front.
    Focused(WindowHandle),
    /// Another request is building the window right now.
    AlreadyOpening,
    /// A close arrived while the window was being built and has been applied;
    /// the window no longer exists.
    ClosedWhileOpening,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseOutcome {
    Closed,
    NotOpen,
    /// The window is still being built; it will be closed once live.
    Queued,
    AlreadyClosing,
}

pub struct WindowRegistry<H: WindowHost> {
    host: H,
    os: OsFamily,
    layout: PopupLayout,
    state: Mutex<AuxiliaryState>,
}

impl<H: WindowHost> WindowRegistry<H> {
    pub fn new(host: H, os: OsFamily, layout: PopupLayout) -> Self {
        Self {
            host,
            os,
            layout,
            state: Mutex::new(AuxiliaryState::Absent),
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn state(&self) -> AuxiliaryState {
        self.lock().clone()
    }

    pub fn is_open(&self) -> bool {
        matches!(*self.lock(), AuxiliaryState::Live(_))
    }

    /// The live popup handle, if any.
    pub fn current(&self) -> Option<WindowHandle> {
        match &*self.lock() {
            AuxiliaryState::Live(handle) => Some(handle.clone()),
            _ => None,
        }
    }

    /// Ensures the popup exists and has focus.
    ///
    /// # Errors
    ///
    /// [`PopnotesError::WindowCreationFailed`] if the host could not build the
    /// window (the registry returns to `Absent`) or the previous popup is
    /// still being torn down.
    pub fn open_auxiliary(&self) -> Result<OpenOutcome> {
        {
            let mut state = self.lock();
            match &mut *state {
                AuxiliaryState::Live(handle) => {
                    let handle = handle.clone();
                    drop(state);
                    match self.host.focus_window(&handle.label) {
                        Ok(()) => return Ok(OpenOutcome::Focused(handle)),
                        Err(e) if self.host.window_exists(&handle.label) => {
                            log::warn!("could not focus {}: {e}", handle.label);
                            return Ok(OpenOutcome::Focused(handle));
                        }
                        Err(e) => {
                            log::warn!("popup gone without a close event ({e}); rebuilding");
                            self.clear_if_live(&handle);
                            return self.open_auxiliary();
                        }
                    }
                }
                AuxiliaryState::Opening { close_requested } => {
                    // The newest request wins over a queued close.
                    *close_requested = false;
                    return Ok(OpenOutcome::AlreadyOpening);
                }
                AuxiliaryState::Closing => {
                    return Err(PopnotesError::WindowCreationFailed(
                        "previous popup is still closing".to_string(),
                    ));
                }
                AuxiliaryState::Absent => {
                    *state = AuxiliaryState::Opening {
                        close_requested: false,
                    };
                }
            }
        }
        log::debug!("popup: Absent -> Opening");

        let spec = self.auxiliary_spec();
        if let Err(e) = self.host.create_window(&spec) {
            *self.lock() = AuxiliaryState::Absent;
            log::error!("failed to build popup window: {e}");
            return Err(e);
        }

        let handle = WindowHandle {
            label: spec.label,
            decorations_visible: spec.decorations,
        };
        let close_requested = {
            let mut state = self.lock();
            let queued = matches!(
                *state,
                AuxiliaryState::Opening {
                    close_requested: true
                }
            );
            *state = AuxiliaryState::Live(handle.clone());
            queued
        };
        log::debug!("popup: Opening -> Live");

        if close_requested {
            log::debug!("popup: applying close queued during creation");
            self.close_auxiliary()?;
            return Ok(OpenOutcome::ClosedWhileOpening);
        }
        Ok(OpenOutcome::Created(handle))
    }

    /// Ensures the popup is gone. Valid from the popup itself or from the main window.
    ///
    /// # Errors
    ///
    /// [`PopnotesError::WindowUnavailable`] if the host refused to destroy a
    /// window that still exists; the popup then stays `Live`. If the window
    /// was already gone the slot is cleared and the close counts as done.
    pub fn close_auxiliary(&self) -> Result<CloseOutcome> {
        let handle = {
            let mut state = self.lock();
            match &mut *state {
                AuxiliaryState::Absent => return Ok(CloseOutcome::NotOpen),
                AuxiliaryState::Closing => return Ok(CloseOutcome::AlreadyClosing),
                AuxiliaryState::Opening { close_requested } => {
                    *close_requested = true;
                    return Ok(CloseOutcome::Queued);
                }
                AuxiliaryState::Live(handle) => {
                    let handle = handle.clone();
                    *state = AuxiliaryState::Closing;
                    handle
                }
            }
        };
        log::debug!("popup: Live -> Closing");

        match self.host.destroy_window(&handle.label) {
            Ok(()) => {
                *self.lock() = AuxiliaryState::Absent;
                log::debug!("popup: Closing -> Absent");
                Ok(CloseOutcome::Closed)
            }
            Err(e) if self.host.window_exists(&handle.label) => {
                *self.lock() = AuxiliaryState::Live(handle);
                Err(e)
            }
            Err(e) => {
                *self.lock() = AuxiliaryState::Absent;
                log::warn!("popup was already gone when closing ({e})");
                Ok(CloseOutcome::Closed)
            }
        }
    }

    /// Host notification that a window went away, either through
    /// [`close_auxiliary`](Self::close_auxiliary) or closed by the OS.
    ///
    /// Returns `false` when the event belongs to an earlier popup and must not
    /// touch anything owned by the current one. Destroy events are delivered
    /// after the fact, so one can arrive while a newer popup is `Opening` (it
    /// is not registered with the host yet and cannot be the one destroyed) or
    /// already `Live` under the same label.
    pub fn window_destroyed(&self, label: &str) -> bool {
        if label != AUXILIARY_LABEL {
            return true;
        }
        if self.host.window_exists(label) {
            log::debug!("ignoring destroy event of an earlier popup");
            return false;
        }
        let mut state = self.lock();
        match &*state {
            AuxiliaryState::Opening { .. } => {
                log::debug!("ignoring destroy event while a new popup is opening");
                false
            }
            AuxiliaryState::Live(_) | AuxiliaryState::Closing => {
                *state = AuxiliaryState::Absent;
                log::debug!("popup closed externally");
                true
            }
            AuxiliaryState::Absent => true,
        }
    }

    fn clear_if_live(&self, handle: &WindowHandle) {
        let mut state = self.lock();
        if matches!(&*state, AuxiliaryState::Live(h) if h == handle) {
            *state = AuxiliaryState::Absent;
        }
    }

    fn auxiliary_spec(&self) -> WindowSpec {
        let position = self
            .host
            .main_window_geometry()
            .map(|main| self.layout.place_below(main))
            .map(|g| (g.x, g.y));
        WindowSpec {
            label: AUXILIARY_LABEL.to_string(),
            title: AUXILIARY_TITLE.to_string(),
            width: self.layout.width,
            height: self.layout.height,
            position,
            decorations: self.os.default_decorations(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, AuxiliaryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
