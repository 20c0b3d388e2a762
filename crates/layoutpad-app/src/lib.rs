//! LayoutPad Application
//!
//! The browser shell that renders the layout and wires the page's controls to
//! the editor, plus a headless command runner for native use.

mod file_sink;
mod panel;

pub use file_sink::{FileSink, FileSinkError, FileSinkResult, HTML_MIME, JSON_MIME};
pub use panel::{layer_rows, LayerRow, PanelError, PropertyField, SelectedElementProps};

#[cfg(all(feature = "native", not(target_arch = "wasm32")))]
mod app;

#[cfg(all(feature = "native", not(target_arch = "wasm32")))]
pub use app::{run_command, AppConfig, AppError, AppResult, Cli, Command, KindArg};

#[cfg(not(target_arch = "wasm32"))]
pub use file_sink::DirectorySink;

#[cfg(all(feature = "native", not(target_arch = "wasm32")))]
pub use file_sink::DialogSink;

#[cfg(target_arch = "wasm32")]
mod web;

#[cfg(target_arch = "wasm32")]
pub use file_sink::BrowserDownload;

#[cfg(target_arch = "wasm32")]
pub use web::run_wasm;
