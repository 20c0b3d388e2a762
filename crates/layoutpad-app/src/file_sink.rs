//! Destinations for exported files.

use thiserror::Error;

/// Export failures.
#[derive(Debug, Error)]
pub enum FileSinkError {
    #[error("Save cancelled")]
    Cancelled,
    #[error("Failed to write {name}: {message}")]
    Write { name: String, message: String },
    #[error("Download failed: {0}")]
    Download(String),
}

pub type FileSinkResult<T> = Result<T, FileSinkError>;

/// Somewhere an exported file can be handed to the user.
pub trait FileSink {
    /// Save `contents` under `filename`. `mime_type` is a hint for browsers.
    fn save(&mut self, filename: &str, contents: &str, mime_type: &str) -> FileSinkResult<()>;
}

/// MIME type of JSON exports.
pub const JSON_MIME: &str = "application/json";
/// MIME type of markup exports.
pub const HTML_MIME: &str = "text/html";

#[cfg(not(target_arch = "wasm32"))]
pub use native::DirectorySink;

#[cfg(all(feature = "native", not(target_arch = "wasm32")))]
pub use native::DialogSink;

#[cfg(target_arch = "wasm32")]
pub use web::BrowserDownload;

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use super::{FileSink, FileSinkError, FileSinkResult};
    use std::path::{Path, PathBuf};

    fn write_file(path: &Path, contents: &str) -> FileSinkResult<()> {
        std::fs::write(path, contents).map_err(|e| FileSinkError::Write {
            name: path.display().to_string(),
            message: e.to_string(),
        })?;
        log::info!("Exported to: {:?}", path);
        Ok(())
    }

    /// Writes exports into a fixed directory without asking.
    pub struct DirectorySink {
        dir: PathBuf,
    }

    impl DirectorySink {
        pub fn new(dir: impl Into<PathBuf>) -> Self {
            Self { dir: dir.into() }
        }

        pub fn dir(&self) -> &Path {
            &self.dir
        }
    }

    impl FileSink for DirectorySink {
        fn save(&mut self, filename: &str, contents: &str, _mime_type: &str) -> FileSinkResult<()> {
            write_file(&self.dir.join(filename), contents)
        }
    }

    /// Asks where to save with the native file dialog.
    #[cfg(feature = "native")]
    #[derive(Default)]
    pub struct DialogSink;

    #[cfg(feature = "native")]
    impl FileSink for DialogSink {
        fn save(&mut self, filename: &str, contents: &str, _mime_type: &str) -> FileSinkResult<()> {
            let extension = Path::new(filename)
                .extension()
                .map(|e| e.to_string_lossy().into_owned())
                .unwrap_or_default();
            let mut dialog = rfd::FileDialog::new()
                .set_title("Export Layout")
                .set_file_name(filename);
            if !extension.is_empty() {
                dialog = dialog.add_filter(extension.to_uppercase(), &[extension.as_str()]);
            }

            match dialog.save_file() {
                Some(path) => write_file(&path, contents),
                None => Err(FileSinkError::Cancelled),
            }
        }
    }

}

#[cfg(target_arch = "wasm32")]
mod web {
    use super::{FileSink, FileSinkError, FileSinkResult};
    use wasm_bindgen::{JsCast, JsValue};

    /// Triggers a browser download through a temporary object URL.
    #[derive(Default)]
    pub struct BrowserDownload;

    fn download(filename: &str, content: &str, mime_type: &str) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("No window"))?;
        let document = window.document().ok_or_else(|| JsValue::from_str("No document"))?;

        let blob_parts = js_sys::Array::new();
        blob_parts.push(&JsValue::from_str(content));

        let options = web_sys::BlobPropertyBag::new();
        options.set_type(mime_type);
        let blob = web_sys::Blob::new_with_str_sequence_and_options(&blob_parts, &options)?;

        let url = web_sys::Url::create_object_url_with_blob(&blob)?;
        let anchor = document
            .create_element("a")?
            .dyn_into::<web_sys::HtmlAnchorElement>()?;
        anchor.set_href(&url);
        anchor.set_download(filename);
        anchor.click();

        web_sys::Url::revoke_object_url(&url)
    }

    impl FileSink for BrowserDownload {
        fn save(&mut self, filename: &str, contents: &str, mime_type: &str) -> FileSinkResult<()> {
            download(filename, contents, mime_type)
                .map_err(|e| FileSinkError::Download(format!("{:?}", e)))?;
            log::info!("Downloaded {}", filename);
            Ok(())
        }
    }
}
