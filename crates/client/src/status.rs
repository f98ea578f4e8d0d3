//! Client status classification.

use std::fmt;

use crate::runner::CommandOutput;

/// State of the external client, derived fresh on every query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClientStatus {
    /// The client binary is not on the search path.
    NotInstalled,
    /// Installed, but the service is stopped.
    NotRunning,
    /// The service waits for the user to finish network authentication.
    Authenticating,
    /// Connected.
    Online,
    /// The status probe printed something unrecognised.
    Unknown,
}

impl ClientStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotInstalled => "not_installed",
            Self::NotRunning => "not_running",
            Self::Authenticating => "authenticating",
            Self::Online => "online",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ClientStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classifies the stdout of `<binary> status`.
///
/// Only the first line is considered, trimmed and lowercased. Any mention
/// of "authenticating" wins; otherwise the line must match exactly.
pub fn classify_status(output: &str) -> ClientStatus {
    let line = output.lines().next().unwrap_or_default().trim().to_lowercase();

    if line.contains("authenticating") {
        return ClientStatus::Authenticating;
    }

    match line.as_str() {
        "not-running" => ClientStatus::NotRunning,
        "online" => ClientStatus::Online,
        _ => ClientStatus::Unknown,
    }
}

/// Interprets the output of `which <binary>`.
///
/// Some `which` implementations print "not found", others print nothing
/// and exit non-zero; both mean the binary is missing.
pub fn is_missing(which: &CommandOutput) -> bool {
    let says_not_found = which.stdout.to_lowercase().contains("not found")
        || which.stderr.to_lowercase().contains("not found");
    says_not_found || which.stdout.trim().is_empty()
}
