//! Application menu construction for Popnotes.

use popnotes_core::IpcCommand;
use tauri::{menu::*, AppHandle, Runtime};

/// Menu item id → the command it sends through the command bridge.
pub fn command_for(menu_id: &str) -> Option<IpcCommand> {
    match menu_id {
        "popup_open" => Some(IpcCommand::OpenPopupWindow),
        "popup_close" => Some(IpcCommand::ClosePopupWindow),
        _ => None,
    }
}

/// Builds the application menu with File and Edit submenus.
///
/// # Errors
///
/// Returns [`tauri::Error`] if any menu item or submenu fails to build.
pub fn build_menu<R: Runtime>(app: &AppHandle<R>) -> Result<Menu<R>, tauri::Error> {
    let menu = MenuBuilder::new(app)
        .items(&[
            &SubmenuBuilder::new(app, "File")
                .items(&[
                    &MenuItemBuilder::with_id("popup_open", "Open Notes Popup")
                        .accelerator("CmdOrCtrl+Shift+N")
                        .build(app)?,
                    &MenuItemBuilder::with_id("popup_close", "Close Notes Popup")
                        .accelerator("CmdOrCtrl+Shift+W")
                        .build(app)?,
                    &PredefinedMenuItem::separator(app)?,
                    &PredefinedMenuItem::close_window(app, None)?,
                    &PredefinedMenuItem::quit(app, None)?,
                ])
                .build()?,
            &SubmenuBuilder::new(app, "Edit")
                .items(&[
                    &PredefinedMenuItem::undo(app, None)?,
                    &PredefinedMenuItem::redo(app, None)?,
                    &PredefinedMenuItem::separator(app)?,
                    &PredefinedMenuItem::cut(app, None)?,
                    &PredefinedMenuItem::copy(app, None)?,
                    &PredefinedMenuItem::paste(app, None)?,
                ])
                .build()?,
        ])
        .build()?;

    Ok(menu)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn popup_items_map_to_commands() {
        assert_eq!(command_for("popup_open"), Some(IpcCommand::OpenPopupWindow));
        assert_eq!(command_for("popup_close"), Some(IpcCommand::ClosePopupWindow));
        assert_eq!(command_for("quit"), None);
    }
}
