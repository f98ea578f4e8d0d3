//! Tray handle, events, and update types.
//!
//! The actual system tray implementation depends on platform-specific
//! system libraries. This module defines the channel-based interface that
//! the driver uses to communicate with whatever backend renders the menu.

use std::sync::mpsc;

use gatetray_client::ClientStatus;

use crate::menu::{MenuAction, MenuItem, MenuState};

/// Configuration for the system tray.
#[derive(Debug, Clone)]
pub struct TrayConfig {
    /// Display name shown in the tray tooltip.
    pub app_name: String,
}

impl Default for TrayConfig {
    fn default() -> Self {
        Self {
            app_name: "Twingate Tray".into(),
        }
    }
}

/// Events emitted by the tray to the driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrayEvent {
    /// A menu item with an action was clicked.
    ActionTriggered(MenuAction),
    /// The user entered a network name after "Change Network...".
    NetworkChosen(String),
    /// The backend went away (window closed, stdin closed, ...).
    QuitRequested,
}

/// Updates sent from the driver to the tray.
#[derive(Debug, Clone)]
pub enum TrayUpdate {
    /// Replace the context menu.
    MenuChanged(Vec<MenuItem>),
    /// Show a short message to the user.
    Notify(String),
    /// Ask the user for a network name, answered with
    /// [`TrayEvent::NetworkChosen`].
    PromptNetwork,
    /// Request tray shutdown.
    Shutdown,
}

/// Handle for communicating with the system tray from the driver.
///
/// The tray event loop runs on its own thread and communicates via channels.
pub struct TrayHandle {
    config: TrayConfig,
    /// Send updates to the tray.
    update_tx: mpsc::Sender<TrayUpdate>,
    /// Receive events from the tray.
    event_rx: mpsc::Receiver<TrayEvent>,
    /// Status of the last menu pushed.
    status: Option<ClientStatus>,
}

impl TrayHandle {
    /// Creates a new tray handle with its channel pair.
    ///
    /// Returns `(handle, event_sender, update_receiver)`; the sender/receiver
    /// pair is given to the tray event loop.
    pub fn new(config: TrayConfig) -> (Self, mpsc::Sender<TrayEvent>, mpsc::Receiver<TrayUpdate>) {
        let (update_tx, update_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();

        let handle = Self {
            config,
            update_tx,
            event_rx,
            status: None,
        };

        (handle, event_tx, update_rx)
    }

    /// Builds the menu for `state` and pushes it to the tray.
    pub fn set_menu(&mut self, state: &MenuState) {
        let items = state.build_menu();
        if self.status != Some(state.status) {
            tracing::info!(status = %state.status, "client status changed");
        }
        self.status = Some(state.status);
        tracing::debug!(items = items.len(), "menu updated");
        let _ = self.update_tx.send(TrayUpdate::MenuChanged(items));
    }

    /// Shows a message in the tray.
    pub fn notify(&self, text: impl Into<String>) {
        let _ = self.update_tx.send(TrayUpdate::Notify(text.into()));
    }

    /// Asks the tray to collect a network name.
    pub fn prompt_network(&self) {
        let _ = self.update_tx.send(TrayUpdate::PromptNetwork);
    }

    /// Requests the tray to shut down.
    pub fn shutdown(&self) {
        let _ = self.update_tx.send(TrayUpdate::Shutdown);
    }

    /// Tries to receive a tray event (non-blocking).
    pub fn try_recv_event(&self) -> Option<TrayEvent> {
        self.event_rx.try_recv().ok()
    }

    /// Status the current menu was built for, if any menu was pushed.
    pub fn status(&self) -> Option<ClientStatus> {
        self.status
    }

    pub fn app_name(&self) -> &str {
        &self.config.app_name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tray_handle_creation() {
        let (handle, _event_tx, _update_rx) = TrayHandle::new(TrayConfig::default());
        assert_eq!(handle.app_name(), "Twingate Tray");
        assert!(handle.status().is_none());
    }

    #[test]
    fn set_menu_pushes_items_and_tracks_status() {
        let (mut handle, _event_tx, update_rx) = TrayHandle::new(TrayConfig::default());

        let state = MenuState {
            status: ClientStatus::NotRunning,
            ..MenuState::default()
        };
        handle.set_menu(&state);
        assert_eq!(handle.status(), Some(ClientStatus::NotRunning));

        match update_rx.try_recv().unwrap() {
            TrayUpdate::MenuChanged(items) => {
                assert_eq!(items[0].action, Some(MenuAction::StartService));
            }
            other => panic!("unexpected update: {other:?}"),
        }
    }

    #[test]
    fn tray_handle_events() {
        let (handle, event_tx, _update_rx) = TrayHandle::new(TrayConfig::default());

        // No events yet.
        assert!(handle.try_recv_event().is_none());

        event_tx
            .send(TrayEvent::ActionTriggered(MenuAction::Refresh))
            .unwrap();
        event_tx
            .send(TrayEvent::NetworkChosen("acme".into()))
            .unwrap();
        assert_eq!(
            handle.try_recv_event(),
            Some(TrayEvent::ActionTriggered(MenuAction::Refresh))
        );
        assert_eq!(
            handle.try_recv_event(),
            Some(TrayEvent::NetworkChosen("acme".into()))
        );
    }

    #[test]
    fn tray_handle_notify_and_shutdown() {
        let (handle, _event_tx, update_rx) = TrayHandle::new(TrayConfig::default());

        handle.notify("copied");
        handle.prompt_network();
        handle.shutdown();
        assert!(matches!(update_rx.recv().unwrap(), TrayUpdate::Notify(t) if t == "copied"));
        assert!(matches!(update_rx.recv().unwrap(), TrayUpdate::PromptNetwork));
        assert!(matches!(update_rx.recv().unwrap(), TrayUpdate::Shutdown));
    }

    #[test]
    fn send_after_backend_dropped_is_ignored() {
        let (mut handle, _event_tx, update_rx) = TrayHandle::new(TrayConfig::default());
        drop(update_rx);
        handle.set_menu(&MenuState::default());
        handle.notify("nobody listens");
        assert_eq!(handle.status(), Some(ClientStatus::Unknown));
    }
}
