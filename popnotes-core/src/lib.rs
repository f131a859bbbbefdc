//! Core library for Popnotes — a note pad with a main window and a singleton
//! popup window over one local SQLite store.
//!
//! The popup's lifecycle is owned by [`WindowRegistry`]; renderers reach it
//! through the named commands in [`IpcCommand`]. Each window keeps its own
//! [`Storage`] handle (see [`WindowStores`]) and converges with the other
//! window only by re-querying.
//!
//! Types are re-exported from their respective sub-modules for convenience;
//! consumers should import from the crate root rather than the `core` module.

pub mod core;

// Re-export commonly used types.
#[doc(inline)]
pub use self::core::{
    bootstrap::{BootstrapPlan, WindowRole},
    descriptor::{StoreDescriptor, DEFAULT_DESCRIPTOR},
    error::{PopnotesError, Result},
    ipc::{dispatch, invoke_logged, CommandBridge, CommandOutcome, IpcCommand},
    note::{validate_title, Note},
    panel::{AddNoteView, LoadTicket, NotePanel, PanelView},
    platform::OsFamily,
    storage::Storage,
    stores::{lock_storage, SharedStorage, StoreStatus, WindowStores},
    window::{
        AuxiliaryState, CloseOutcome, OpenOutcome, PopupLayout, WindowGeometry, WindowHandle,
        WindowHost, WindowRegistry, WindowSpec, AUXILIARY_LABEL, AUXILIARY_TITLE, MAIN_LABEL,
    },
};
