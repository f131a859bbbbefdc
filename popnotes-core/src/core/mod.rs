//! Internal domain modules for the Popnotes core library.
//!
//! All public types from these modules are re-exported at the crate root
//! with `#[doc(inline)]`; import from there in preference to this module.

pub mod bootstrap;
pub mod descriptor;
pub mod error;
pub mod ipc;
pub mod note;
pub mod panel;
pub mod platform;
pub mod storage;
pub mod stores;
pub mod window;

#[doc(inline)]
pub use bootstrap::{BootstrapPlan, WindowRole};
#[doc(inline)]
pub use descriptor::{StoreDescriptor, DEFAULT_DESCRIPTOR};
#[doc(inline)]
pub use error::{PopnotesError, Result};
#[doc(inline)]
pub use ipc::{dispatch, invoke_logged, CommandBridge, CommandOutcome, IpcCommand};
#[doc(inline)]
pub use note::{validate_title, Note};
#[doc(inline)]
pub use panel::{AddNoteView, LoadTicket, NotePanel, PanelView};
#[doc(inline)]
pub use platform::OsFamily;
#[doc(inline)]
pub use storage::Storage;
#[doc(inline)]
pub use stores::{lock_storage, SharedStorage, StoreStatus, WindowStores};
#[doc(inline)]
pub use window::{
    AuxiliaryState, CloseOutcome, OpenOutcome, PopupLayout, WindowGeometry, WindowHandle,
    WindowHost, WindowRegistry, WindowSpec, AUXILIARY_LABEL, AUXILIARY_TITLE, MAIN_LABEL,
};
