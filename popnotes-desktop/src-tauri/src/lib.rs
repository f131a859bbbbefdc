pub mod host;
pub mod menu;
pub mod settings;

use crate::host::TauriHost;
use popnotes_core::{
    dispatch, invoke_logged, lock_storage, AddNoteView, BootstrapPlan, CloseOutcome, CommandBridge,
    CommandOutcome, IpcCommand, NotePanel, OpenOutcome, OsFamily, PanelView, Result, Storage,
    StoreStatus, WindowHost, WindowRegistry, WindowStores, AUXILIARY_LABEL, MAIN_LABEL,
};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tauri::{AppHandle, Manager, State, Window, WindowEvent};
use tauri_plugin_log::{Target, TargetKind};

pub struct AppState {
    pub os: OsFamily,
    pub registry: WindowRegistry<TauriHost>,
    pub stores: WindowStores,
    pub panels: Mutex<HashMap<String, NotePanel>>,
}

impl AppState {
    /// Runs a panel operation on the calling window's own store handle.
    fn with_panel<T, F>(&self, label: &str, f: F) -> std::result::Result<T, String>
    where
        F: FnOnce(&mut NotePanel, &Storage) -> T,
    {
        if !self.registry.host().window_exists(label) {
            return Err(format!("Window {label} is closed"));
        }
        let handle = self.stores.handle_for(label).map_err(|e| e.user_message())?;
        let storage = lock_storage(&handle);
        let mut panels = self.panels();
        let panel = panels.entry(label.to_string()).or_default();
        Ok(f(panel, &storage))
    }

    /// Tears down everything a closed window owned.
    fn forget_window(&self, label: &str) {
        if let Some(mut panel) = self.panels().remove(label) {
            panel.unmount();
        }
        self.stores.release(label);
    }

    fn panels(&self) -> MutexGuard<'_, HashMap<String, NotePanel>> {
        self.panels.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl CommandBridge for AppState {
    fn invoke(&self, command: IpcCommand) -> Result<()> {
        match dispatch(&self.registry, command)? {
            CommandOutcome::Opened(OpenOutcome::Created(handle)) => {
                BootstrapPlan::for_window(&handle.label, self.os).apply(
                    &handle.label,
                    self.registry.host(),
                    &self.stores,
                );
            }
            CommandOutcome::Opened(OpenOutcome::ClosedWhileOpening)
            | CommandOutcome::Closed(CloseOutcome::Closed) => self.forget_window(AUXILIARY_LABEL),
            _ => {}
        }
        Ok(())
    }
}

#[tauri::command]
async fn open_popup_window(state: State<'_, AppState>) -> std::result::Result<(), String> {
    state
        .invoke(IpcCommand::OpenPopupWindow)
        .map_err(|e| e.user_message())
}

#[tauri::command]
async fn close_popup_window(state: State<'_, AppState>) -> std::result::Result<(), String> {
    state
        .invoke(IpcCommand::ClosePopupWindow)
        .map_err(|e| e.user_message())
}

/// Start-up decisions for the calling window, for renderers that ask instead
/// of reading the injected `window.__POPNOTES__`.
#[tauri::command]
fn window_bootstrap(window: Window, state: State<'_, AppState>) -> BootstrapPlan {
    BootstrapPlan::for_window(window.label(), state.os)
}

#[tauri::command]
fn store_status(state: State<'_, AppState>) -> Option<StoreStatus> {
    state.stores.status()
}

#[tauri::command]
async fn mount_notes(
    window: Window,
    state: State<'_, AppState>,
) -> std::result::Result<PanelView, String> {
    state.with_panel(window.label(), |panel, storage| {
        panel.mount(storage);
        panel.view()
    })
}

#[tauri::command]
async fn refresh_notes(
    window: Window,
    state: State<'_, AppState>,
) -> std::result::Result<PanelView, String> {
    state.with_panel(window.label(), |panel, storage| {
        panel.refresh(storage);
        panel.view()
    })
}

#[tauri::command]
async fn add_note(
    window: Window,
    state: State<'_, AppState>,
    title: String,
    body: String,
) -> std::result::Result<AddNoteView, String> {
    state.with_panel(window.label(), |panel, storage| AddNoteView {
        added: panel.add_note(storage, &title, &body),
        view: panel.view(),
    })
}

#[tauri::command]
async fn delete_note(
    window: Window,
    state: State<'_, AppState>,
    id: i64,
) -> std::result::Result<PanelView, String> {
    state.with_panel(window.label(), |panel, storage| {
        panel.delete_note(storage, id);
        panel.view()
    })
}

#[tauri::command]
fn dismiss_error(window: Window, state: State<'_, AppState>) {
    if let Some(panel) = state.panels().get_mut(window.label()) {
        panel.dismiss_error();
    }
}

/// Sends `command` through the bridge off the event-loop thread, logging failures.
fn spawn_command(app: &AppHandle, command: IpcCommand) {
    let app = app.clone();
    tauri::async_runtime::spawn(async move {
        if let Some(state) = app.try_state::<AppState>() {
            invoke_logged(&*state, command);
        }
    });
}

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    let app_settings = settings::load_settings();
    if !settings::settings_file_path().exists() {
        if let Err(e) = settings::save_settings(&app_settings) {
            eprintln!("popnotes: could not write default settings: {e}");
        }
    }

    tauri::Builder::default()
        .plugin(
            tauri_plugin_log::Builder::new()
                .clear_targets()
                .targets([
                    Target::new(TargetKind::Stdout),
                    Target::new(TargetKind::LogDir { file_name: None }),
                ])
                .level(app_settings.log_level())
                .build(),
        )
        .setup(move |app| {
            let os = OsFamily::current();
            let host = TauriHost::new(app.handle().clone(), os);
            let main_spec = host.main_spec();

            let state = AppState {
                os,
                registry: WindowRegistry::new(host, os, app_settings.popup),
                stores: WindowStores::new(
                    app_settings.descriptor(),
                    PathBuf::from(&app_settings.data_directory),
                ),
                panels: Mutex::new(HashMap::new()),
            };
            app.manage(state);

            let menu = menu::build_menu(app.handle())?;
            app.set_menu(menu)?;

            let state = app.state::<AppState>();
            state.registry.host().create_window(&main_spec)?;
            let plan = BootstrapPlan::for_window(MAIN_LABEL, os);
            if let Some(StoreStatus::Unavailable(reason)) =
                plan.apply(MAIN_LABEL, state.registry.host(), &state.stores)
            {
                log::warn!("running without notes: {reason}");
            }
            Ok(())
        })
        .on_menu_event(|app, event| {
            if let Some(command) = menu::command_for(event.id().as_ref()) {
                spawn_command(app, command);
            }
        })
        .on_window_event(|window, event| match event {
            // OS-initiated close of the popup goes through the registry too.
            WindowEvent::CloseRequested { api, .. } if window.label() == AUXILIARY_LABEL => {
                api.prevent_close();
                spawn_command(window.app_handle(), IpcCommand::ClosePopupWindow);
            }
            WindowEvent::Destroyed => {
                if let Some(state) = window.try_state::<AppState>() {
                    // A late event for an earlier popup leaves the current one's panel alone.
                    if state.registry.window_destroyed(window.label()) {
                        state.forget_window(window.label());
                    }
                }
            }
            _ => {}
        })
        .invoke_handler(tauri::generate_handler![
            open_popup_window,
            close_popup_window,
            window_bootstrap,
            store_status,
            mount_notes,
            refresh_notes,
            add_note,
            delete_note,
            dismiss_error
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
