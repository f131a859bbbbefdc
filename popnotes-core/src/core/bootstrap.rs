//! Start-up decisions made once for every window context.

use crate::{OsFamily, StoreStatus, WindowHost, WindowStores, AUXILIARY_LABEL};
use serde::{Deserialize, Serialize};

/// Which UI a window mounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WindowRole {
    Main,
    Auxiliary,
}

impl WindowRole {
    /// `"popup"` is the auxiliary window; every other label is the main window.
    pub fn from_label(label: &str) -> Self {
        if label == AUXILIARY_LABEL {
            Self::Auxiliary
        } else {
            Self::Main
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Main => "main",
            Self::Auxiliary => "auxiliary",
        }
    }
}

/// What a window must do before its first paint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BootstrapPlan {
    pub role: WindowRole,
    pub hide_decorations: bool,
    pub init_store: bool,
}

impl BootstrapPlan {
    pub fn for_window(label: &str, os: OsFamily) -> Self {
        let role = WindowRole::from_label(label);
        Self {
            role,
            hide_decorations: os.needs_decoration_correction(),
            init_store: role == WindowRole::Main,
        }
    }

    /// Script evaluated by the webview before any page script, so the
    /// renderer can pick its UI synchronously.
    pub fn initialization_script(&self, label: &str) -> String {
        format!(
            "window.__POPNOTES__ = Object.freeze({{ label: {label:?}, role: {role:?} }});",
            role = self.role.as_str(),
        )
    }

    /// Runs the host-side steps for a window that now exists.
    ///
    /// Returns the store status for the main window, `None` otherwise.
    /// Nothing here fails: problems are logged and the window carries on.
    pub fn apply<H: WindowHost>(
        &self,
        label: &str,
        host: &H,
        stores: &WindowStores,
    ) -> Option<StoreStatus> {
        if self.hide_decorations {
            if let Err(e) = host.set_decorations(label, false) {
                log::warn!("could not hide decorations of {label}: {e}");
            }
        }
        self.init_store.then(|| stores.initialize_main(label))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::window::tests::{FakeHost, HostCall};
    use crate::{StoreDescriptor, MAIN_LABEL};
    use tempfile::TempDir;

    #[test]
    fn test_label_selects_role() {
        assert_eq!(WindowRole::from_label("popup"), WindowRole::Auxiliary);
        assert_eq!(WindowRole::from_label("main"), WindowRole::Main);
        assert_eq!(WindowRole::from_label("settings"), WindowRole::Main);
        assert_eq!(WindowRole::from_label("Popup"), WindowRole::Main);
    }

    #[test]
    fn test_plan_for_main_on_linux() {
        let plan = BootstrapPlan::for_window(MAIN_LABEL, OsFamily::Linux);
        assert_eq!(
            plan,
            BootstrapPlan {
                role: WindowRole::Main,
                hide_decorations: true,
                init_store: true,
            }
        );
    }

    #[test]
    fn test_plan_for_popup_on_macos() {
        let plan = BootstrapPlan::for_window(AUXILIARY_LABEL, OsFamily::Macos);
        assert_eq!(plan.role, WindowRole::Auxiliary);
        assert!(!plan.hide_decorations);
        assert!(!plan.init_store);
    }

    #[test]
    fn test_initialization_script_carries_role() {
        let plan = BootstrapPlan::for_window(AUXILIARY_LABEL, OsFamily::Linux);
        let script = plan.initialization_script(AUXILIARY_LABEL);
        assert!(script.contains(r#"label: "popup""#));
        assert!(script.contains(r#"role: "auxiliary""#));
    }

    #[test]
    fn test_apply_main_initializes_store_and_hides_decorations() {
        let temp = TempDir::new().unwrap();
        let stores = WindowStores::new(StoreDescriptor::default(), temp.path());
        let host = FakeHost::default();

        let plan = BootstrapPlan::for_window(MAIN_LABEL, OsFamily::Windows);
        assert_eq!(plan.apply(MAIN_LABEL, &host, &stores), Some(StoreStatus::Ready));
        assert_eq!(
            host.calls(),
            vec![HostCall::Decorations(MAIN_LABEL.to_string(), false)]
        );
        assert!(temp.path().join("notes.db").exists());
    }

    #[test]
    fn test_apply_popup_leaves_store_alone() {
        let temp = TempDir::new().unwrap();
        let stores = WindowStores::new(StoreDescriptor::default(), temp.path());
        let host = FakeHost::default();

        let plan = BootstrapPlan::for_window(AUXILIARY_LABEL, OsFamily::Macos);
        assert_eq!(plan.apply(AUXILIARY_LABEL, &host, &stores), None);
        assert!(host.calls().is_empty());
        assert_eq!(stores.status(), None);
    }
}
