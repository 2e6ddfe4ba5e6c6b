//! View-facing boundary types.
//!
//! Views (2D slice views, 3D views) live in the rendering collaborator;
//! the editing core only sees their transforms and the pointer events they
//! dispatch, and answers with refresh requests.

pub mod context;
pub mod events;

pub use context::{ViewContext, ViewId, ViewKind};
pub use events::{PointerEvent, PointerEventKind, RefreshRequest};
