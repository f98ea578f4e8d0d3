//! Tray menu for the Twingate CLI front-end.
//!
//! Builds the context menu from the resolved client status and session,
//! independent of any GUI toolkit. The tray backend and the driver talk
//! via channels:
//! - [`TrayEvent`]: events from tray to driver (a menu item was clicked)
//! - [`TrayUpdate`]: updates from driver to tray (new menu, notices)
//!
//! # Platform notes
//! - The backend event loop must run on the main thread on some platforms
//! - Menu items carry plain data so any backend can render them

mod menu;
mod tray;

pub use menu::{INSTALL_DOCS_URL, MenuAction, MenuItem, MenuKind, MenuState, humanize_distance};
pub use tray::{TrayConfig, TrayEvent, TrayHandle, TrayUpdate};
