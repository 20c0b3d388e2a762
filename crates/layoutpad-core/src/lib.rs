//! LayoutPad Core Library
//!
//! Platform-agnostic element model, drag/resize interaction, selection and
//! z-order handling, persistence and export for the LayoutPad editor.

pub mod config;
pub mod document;
pub mod editor;
pub mod element;
pub mod export;
pub mod geometry;
pub mod input;
pub mod interaction;
pub mod storage;
pub mod widget;

pub use config::EditorConfig;
pub use document::{LayoutDocument, LayoutError, LayoutResult};
pub use editor::{Editor, EditorResponse};
pub use element::{Element, ElementId, ElementKind, PropertyEdit};
pub use geometry::{Corner, Geometry};
pub use input::{MouseButton, PointerEvent};
pub use interaction::{Gesture, HitTarget};
pub use storage::{KeyValueStore, MemoryStore, StorageError, StorageResult};
pub use widget::{Handle, WidgetManager, WidgetState};
