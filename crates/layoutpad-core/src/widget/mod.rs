//! Widget layer: UI state wrapped around the pure element data.
//!
//! - Selection state (at most one element at a time)
//! - Corner handles of the selected element and their hit testing
//!
//! Elements remain plain data; this module decides how they are highlighted and
//! which handle a pointer lands on.

mod handles;
mod manager;
mod state;

pub use handles::{element_handles, hit_test_handles, Handle, HANDLE_HIT_TOLERANCE, HANDLE_SIZE};
pub use manager::WidgetManager;
pub use state::WidgetState;
