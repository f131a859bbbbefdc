//! [`WindowHost`] implementation over a Tauri application handle.

use popnotes_core::{
    BootstrapPlan, OsFamily, PopnotesError, Result, WindowGeometry, WindowHost, WindowRole,
    WindowSpec, MAIN_LABEL,
};
use tauri::{AppHandle, Manager, WebviewUrl, WebviewWindow, WebviewWindowBuilder};

const MAIN_TITLE: &str = "Popnotes";
const MAIN_SIZE: (f64, f64) = (800.0, 600.0);

pub struct TauriHost {
    app: AppHandle,
    os: OsFamily,
}

impl TauriHost {
    pub fn new(app: AppHandle, os: OsFamily) -> Self {
        Self { app, os }
    }

    /// Spec of the main window; created once in `setup`.
    pub fn main_spec(&self) -> WindowSpec {
        WindowSpec {
            label: MAIN_LABEL.to_string(),
            title: MAIN_TITLE.to_string(),
            width: MAIN_SIZE.0,
            height: MAIN_SIZE.1,
            position: None,
            decorations: self.os.default_decorations(),
        }
    }

    fn window(&self, label: &str) -> Result<WebviewWindow> {
        self.app
            .get_webview_window(label)
            .ok_or_else(|| PopnotesError::WindowUnavailable(format!("no window labelled {label}")))
    }
}

impl WindowHost for TauriHost {
    fn main_window_geometry(&self) -> Option<WindowGeometry> {
        let main = self.app.get_webview_window(MAIN_LABEL)?;
        let scale = main.scale_factor().ok()?;
        let pos = main.outer_position().ok()?.to_logical::<f64>(scale);
        let size = main.outer_size().ok()?.to_logical::<f64>(scale);
        Some(WindowGeometry {
            x: pos.x,
            y: pos.y,
            width: size.width,
            height: size.height,
        })
    }

    fn create_window(&self, spec: &WindowSpec) -> Result<()> {
        // Both windows load the same bundle; the injected script tells the
        // page which UI to mount before its first paint.
        let plan = BootstrapPlan::for_window(&spec.label, self.os);
        let script = plan.initialization_script(&spec.label);

        let mut builder = WebviewWindowBuilder::new(
            &self.app,
            &spec.label,
            WebviewUrl::App("index.html".into()),
        )
        .title(&spec.title)
        .initialization_script(&script)
        .inner_size(spec.width, spec.height)
        .decorations(spec.decorations);

        if plan.role == WindowRole::Auxiliary {
            builder = builder
                .transparent(true)
                .shadow(false)
                .resizable(false)
                .always_on_top(true)
                .skip_taskbar(true)
                .focused(true);

            #[cfg(target_os = "macos")]
            {
                builder = builder
                    .hidden_title(true)
                    .title_bar_style(tauri::TitleBarStyle::Transparent);
            }
        }

        if let Some((x, y)) = spec.position {
            builder = builder.position(x, y);
        }

        builder
            .build()
            .map(|_| ())
            .map_err(|e| PopnotesError::WindowCreationFailed(e.to_string()))
    }

    fn focus_window(&self, label: &str) -> Result<()> {
        self.window(label)?
            .set_focus()
            .map_err(|e| PopnotesError::WindowUnavailable(format!("focus {label}: {e}")))
    }

    fn destroy_window(&self, label: &str) -> Result<()> {
        // `destroy` skips CloseRequested, which would route straight back here.
        self.window(label)?
            .destroy()
            .map_err(|e| PopnotesError::WindowUnavailable(format!("destroy {label}: {e}")))
    }

    fn set_decorations(&self, label: &str, visible: bool) -> Result<()> {
        self.window(label)?
            .set_decorations(visible)
            .map_err(|e| PopnotesError::WindowUnavailable(format!("decorations {label}: {e}")))
    }

    fn window_exists(&self, label: &str) -> bool {
        self.app.get_webview_window(label).is_some()
    }
}
