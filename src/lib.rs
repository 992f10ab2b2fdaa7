//! Dockable window management core for terminal UIs.
//!
//! The crate models floating windows whose pane trees host two families of
//! content: documents (close-only) and anchorables (close or hide). On top
//! of that model it provides the two decision protocols a docking shell
//! needs:
//!
//! - [`cascade`]: the two-phase close/hide engine run when the user closes a
//!   floating window, with per-item veto points and user-substitutable
//!   actions.
//! - [`drop`] and [`overlay`]: drop-target discovery and the transient
//!   overlay shown while one window is dragged over another.
//!
//! [`window::DockManager`] ties both to a set of windows; hosts feed it
//! events and render from its state. Geometry is terminal-cell based and
//! rendering targets [`ratatui`].

pub mod adapter;
pub mod cascade;
pub mod drop;
pub mod layout;
pub mod overlay;
pub mod tracing_sub;
pub mod window;
