//! Adapter for the Twingate command-line client.
//!
//! Everything here talks to external binaries through a [`CommandRunner`],
//! so the tray never links against the VPN client itself:
//!
//! - [`status`]: classifies `twingate status` output into a [`ClientStatus`]
//! - [`session`]: the JSON document emitted by `twingate-notifier resources`
//! - [`auth`]: scrapes authentication URLs out of CLI output
//! - [`Client`]: the facade the tray drives (status, start/stop, config, auth)

pub mod auth;
pub mod client;
pub mod error;
pub mod runner;
pub mod session;
pub mod status;

// Re-export primary types.
pub use client::{Client, ClientConfig};
pub use error::ClientError;
pub use runner::{CommandOutput, CommandRunner, Invocation, RunFuture, SystemRunner};
pub use session::{Alias, Resource, ResourceType, Session, User};
pub use status::{ClientStatus, classify_status};
