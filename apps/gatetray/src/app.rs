//! Application orchestrator: wires the CLI adapter to the tray.

use std::time::Duration;

use gatetray_client::{Client, ClientStatus, CommandRunner, Invocation};
use gatetray_tray::{MenuAction, MenuState, TrayConfig, TrayEvent, TrayHandle};

use crate::config::Config;
use crate::frontend;

/// How often the driver checks for tray events.
const EVENT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Runs the tray until the user quits or Ctrl-C is received.
pub async fn run(config: Config) -> anyhow::Result<()> {
    let client = Client::new(config.client_config());
    let driver = Driver::new(config, client);

    let (mut tray, event_tx, update_rx) = TrayHandle::new(TrayConfig::default());
    frontend::spawn(tray.app_name().to_string(), event_tx, update_rx)?;

    driver.refresh(&mut tray).await;
    tracing::info!("tray ready");

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("SIGINT received, shutting down");
        }
        _ = driver.event_loop(&mut tray) => {
            tracing::info!("quit requested via tray");
        }
    }

    tray.shutdown();
    Ok(())
}

/// Whether the event loop keeps going after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Reacts to tray events by invoking the client and re-rendering the menu.
pub struct Driver<R> {
    config: Config,
    client: Client<R>,
}

impl<R: CommandRunner> Driver<R> {
    pub fn new(config: Config, client: Client<R>) -> Self {
        Self { config, client }
    }

    async fn event_loop(&self, tray: &mut TrayHandle) {
        loop {
            match tray.try_recv_event() {
                Some(event) => {
                    if self.handle_event(event, tray).await == Flow::Quit {
                        break;
                    }
                }
                None => tokio::time::sleep(EVENT_POLL_INTERVAL).await,
            }
        }
    }

    /// Resolves the client status, fetches the session when online, and
    /// pushes a fresh menu.
    pub async fn refresh(&self, tray: &mut TrayHandle) {
        let status = match self.client.status().await {
            Ok(status) => status,
            Err(e) => {
                tracing::warn!("status probe failed: {e}");
                ClientStatus::Unknown
            }
        };

        let session = if status == ClientStatus::Online {
            self.client.session_or_none().await
        } else {
            None
        };

        let state = MenuState {
            install_docs_url: self.config.install_docs_url.clone(),
            ..MenuState::new(status, session)
        };
        tray.set_menu(&state);
    }

    pub async fn handle_event(&self, event: TrayEvent, tray: &mut TrayHandle) -> Flow {
        let result = match event {
            TrayEvent::QuitRequested | TrayEvent::ActionTriggered(MenuAction::Quit) => {
                return Flow::Quit;
            }
            TrayEvent::ActionTriggered(action) => self.handle_action(action, tray).await,
            TrayEvent::NetworkChosen(name) => self.change_network(&name, tray).await,
        };

        if let Err(e) = result {
            tracing::warn!("tray action failed: {e:#}");
            tray.notify(format!("Error: {e}"));
        }
        Flow::Continue
    }

    async fn handle_action(&self, action: MenuAction, tray: &mut TrayHandle) -> anyhow::Result<()> {
        tracing::debug!(?action, "menu action");

        match action {
            MenuAction::OpenUrl(url) => self.open_url(&url).await?,
            MenuAction::StartService => {
                self.client.start().await?;
                match self.wait_for_network_auth_url().await {
                    Some(url) => self.open_url(&url).await?,
                    None => tray.notify("Service started, but no sign-in URL was printed yet"),
                }
                self.refresh(tray).await;
            }
            MenuAction::OpenNetworkAuth => {
                let url = self.client.network_auth_url().await?;
                self.open_url(&url).await?;
            }
            MenuAction::Logout => {
                self.client.stop().await?;
                self.refresh(tray).await;
            }
            MenuAction::AuthenticateResource(name) => {
                let url = self.client.resource_auth_url(&name).await?;
                self.open_url(&url).await?;
            }
            // The text backend has no clipboard; the address is printed.
            MenuAction::CopyAddress(address) => tray.notify(format!("Address: {address}")),
            MenuAction::ChangeNetwork => tray.prompt_network(),
            MenuAction::Refresh => self.refresh(tray).await,
            MenuAction::Quit => {}
        }

        Ok(())
    }

    async fn change_network(&self, name: &str, tray: &mut TrayHandle) -> anyhow::Result<()> {
        self.client.set_config("network", name).await?;
        tray.notify(format!("Network set to {}", name.trim()));
        self.refresh(tray).await;
        Ok(())
    }

    /// Polls `status` for the sign-in URL after a service start.
    async fn wait_for_network_auth_url(&self) -> Option<String> {
        let interval = Duration::from_millis(self.config.auth_poll_interval_ms);

        for attempt in 1..=self.config.auth_poll_attempts {
            tokio::time::sleep(interval).await;
            match self.client.network_auth_url().await {
                Ok(url) => return Some(url),
                Err(e) => tracing::debug!(attempt, "network auth URL not ready: {e}"),
            }
        }

        None
    }

    async fn open_url(&self, url: &str) -> anyhow::Result<()> {
        if url.trim().is_empty() {
            anyhow::bail!("nothing to open");
        }

        let invocation = Invocation::new(self.config.open_command.as_str(), [url]);
        let output = self.client.runner().run(&invocation).await?;
        if output.has_stderr() {
            tracing::warn!(command = %invocation, stderr = %output.stderr.trim(), "URL opener reported errors");
        }

        tracing::info!(url, "opened in browser");
        Ok(())
    }
}
