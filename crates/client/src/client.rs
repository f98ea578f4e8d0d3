//! Facade over the client and notifier binaries.
//!
//! Every call spawns a fresh process and awaits it; nothing is cached.
//! A non-empty stderr is treated as failure, whatever the exit code.

use crate::auth;
use crate::error::ClientError;
use crate::runner::{CommandOutput, CommandRunner, Invocation, SystemRunner};
use crate::session::{Resource, Session};
use crate::status::{self, ClientStatus};

/// Names of the external programs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Client binary, looked up on `PATH`.
    pub binary: String,
    /// Companion binary that prints the session JSON.
    pub notifier_binary: String,
    /// Privilege elevation wrapper for start/stop/config. Empty runs directly.
    pub elevation_command: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            binary: "twingate".into(),
            notifier_binary: "twingate-notifier".into(),
            elevation_command: "pkexec".into(),
        }
    }
}

/// Drives the external client through a [`CommandRunner`].
pub struct Client<R = SystemRunner> {
    config: ClientConfig,
    runner: R,
}

impl Client<SystemRunner> {
    /// Creates a client that spawns real processes.
    pub fn new(config: ClientConfig) -> Self {
        Self::with_runner(config, SystemRunner)
    }
}

impl<R: CommandRunner> Client<R> {
    pub fn with_runner(config: ClientConfig, runner: R) -> Self {
        Self { config, runner }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// The runner used for every invocation, for callers that spawn
    /// related helpers (e.g. a URL opener).
    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Runs `invocation`, failing if it wrote to stderr.
    async fn exec(&self, invocation: Invocation) -> Result<CommandOutput, ClientError> {
        let output = self.runner.run(&invocation).await?;
        if output.has_stderr() {
            return Err(ClientError::CommandFailed {
                command: invocation.to_string(),
                stderr: output.stderr.trim().to_string(),
            });
        }
        Ok(output)
    }

    fn direct(&self, args: &[&str]) -> Invocation {
        Invocation::new(self.config.binary.as_str(), args.iter().copied())
    }

    fn elevated(&self, args: &[&str]) -> Invocation {
        Invocation::elevated(
            &self.config.elevation_command,
            self.config.binary.as_str(),
            args.iter().copied(),
        )
    }

    /// Returns `true` if `which <binary>` finds the client.
    pub async fn is_installed(&self) -> Result<bool, ClientError> {
        let which = Invocation::new("which", [self.config.binary.as_str()]);
        let output = self.runner.run(&which).await?;
        Ok(!status::is_missing(&output))
    }

    /// Resolves the current [`ClientStatus`].
    ///
    /// The status probe only runs when the binary is installed.
    pub async fn status(&self) -> Result<ClientStatus, ClientError> {
        if !self.is_installed().await? {
            tracing::debug!(binary = %self.config.binary, "client binary not found");
            return Ok(ClientStatus::NotInstalled);
        }

        let output = self.runner.run(&self.direct(&["status"])).await?;
        if output.has_stderr() {
            tracing::debug!(stderr = %output.stderr.trim(), "status probe wrote to stderr");
        }

        let status = status::classify_status(&output.stdout);
        tracing::debug!(%status, "client status resolved");
        Ok(status)
    }

    /// Starts the client service (elevated).
    pub async fn start(&self) -> Result<(), ClientError> {
        self.exec(self.elevated(&["start"])).await?;
        tracing::info!("client service started");
        Ok(())
    }

    /// Stops the client service (elevated). Logs the user out.
    pub async fn stop(&self) -> Result<(), ClientError> {
        self.exec(self.elevated(&["stop"])).await?;
        tracing::info!("client service stopped");
        Ok(())
    }

    /// Sets a client configuration key (elevated), e.g. `network <name>`.
    pub async fn set_config(&self, key: &str, value: &str) -> Result<(), ClientError> {
        let (key, value) = (key.trim(), value.trim());
        if key.is_empty() {
            return Err(ClientError::InvalidArgument("config key is empty".into()));
        }
        if value.is_empty() {
            return Err(ClientError::InvalidArgument(format!(
                "value for config key `{key}` is empty"
            )));
        }

        self.exec(self.elevated(&["config", key, value])).await?;
        tracing::info!(key, value, "client configuration updated");
        Ok(())
    }

    /// URL that completes network authentication: the last URL printed by
    /// `<binary> status`.
    pub async fn network_auth_url(&self) -> Result<String, ClientError> {
        let invocation = self.direct(&["status"]);
        let output = self.exec(invocation.clone()).await?;
        auth::last_url(&output.stdout)
            .map(str::to_string)
            .ok_or_else(|| ClientError::NoUrl {
                command: invocation.to_string(),
            })
    }

    /// URL that authenticates a single resource: the first URL printed by
    /// `<binary> auth <name>`.
    pub async fn resource_auth_url(&self, resource_name: &str) -> Result<String, ClientError> {
        if resource_name.trim().is_empty() {
            return Err(ClientError::InvalidArgument("resource name is empty".into()));
        }

        let invocation = self.direct(&["auth", resource_name]);
        let output = self.exec(invocation.clone()).await?;
        auth::first_url(&output.stdout)
            .map(str::to_string)
            .ok_or_else(|| ClientError::NoUrl {
                command: invocation.to_string(),
            })
    }

    /// Fetches the session document from `<notifier> resources`.
    pub async fn session(&self) -> Result<Session, ClientError> {
        let invocation = Invocation::new(self.config.notifier_binary.as_str(), ["resources"]);
        let output = self.exec(invocation).await?;
        let session = Session::from_json(&output.stdout)?;
        tracing::debug!(
            resources = session.resources.len(),
            "session fetched"
        );
        Ok(session)
    }

    /// Like [`Client::session`], but logs the failure and yields `None`.
    pub async fn session_or_none(&self) -> Option<Session> {
        match self.session().await {
            Ok(session) => Some(session),
            Err(e) => {
                tracing::warn!("session fetch failed: {e}");
                None
            }
        }
    }

    /// Resources from a freshly fetched session.
    pub async fn resources(&self) -> Result<Vec<Resource>, ClientError> {
        Ok(self.session().await?.resources)
    }
}
