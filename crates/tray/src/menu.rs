//! Dynamic context menu for the system tray.

use chrono::{TimeDelta, Utc};
use gatetray_client::{ClientStatus, Resource, Session, User};

/// Where "Install CLI" points by default.
pub const INSTALL_DOCS_URL: &str = "https://www.twingate.com/docs/linux";

/// Actions that can be triggered from the tray context menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuAction {
    /// Open a URL in the default browser.
    OpenUrl(String),
    /// Start the client service, then open the network auth page.
    StartService,
    /// Open the pending network authentication page.
    OpenNetworkAuth,
    /// Stop the client service.
    Logout,
    /// Authenticate a single resource, by name.
    AuthenticateResource(String),
    /// Put an address on the clipboard. Backends without clipboard
    /// access show the address to the user instead.
    CopyAddress(String),
    /// Ask for a network name and switch to it.
    ChangeNetwork,
    /// Rebuild the menu from fresh client state.
    Refresh,
    /// User requested to quit the application.
    Quit,
}

/// Shape of a menu entry.
#[derive(Debug, Clone, PartialEq)]
pub enum MenuKind {
    Normal,
    Separator,
    Submenu(Vec<MenuItem>),
}

/// A single menu item.
#[derive(Debug, Clone, PartialEq)]
pub struct MenuItem {
    /// Display text.
    pub label: String,
    /// Secondary text shown under the label, if the backend supports it.
    pub sublabel: Option<String>,
    /// Whether the item is enabled (clickable).
    pub enabled: bool,
    /// Optional action triggered on click.
    pub action: Option<MenuAction>,
    pub kind: MenuKind,
}

impl MenuItem {
    fn action(label: impl Into<String>, action: MenuAction) -> Self {
        Self {
            label: label.into(),
            sublabel: None,
            enabled: true,
            action: Some(action),
            kind: MenuKind::Normal,
        }
    }

    fn disabled(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            sublabel: None,
            enabled: false,
            action: None,
            kind: MenuKind::Normal,
        }
    }

    fn separator() -> Self {
        Self {
            label: String::new(),
            sublabel: None,
            enabled: false,
            action: None,
            kind: MenuKind::Separator,
        }
    }

    fn submenu(label: impl Into<String>, children: Vec<MenuItem>) -> Self {
        Self {
            label: label.into(),
            sublabel: None,
            enabled: true,
            action: None,
            kind: MenuKind::Submenu(children),
        }
    }

    fn with_sublabel(mut self, sublabel: impl Into<String>) -> Self {
        self.sublabel = Some(sublabel.into());
        self
    }

    pub fn is_separator(&self) -> bool {
        self.kind == MenuKind::Separator
    }

    /// Children of a submenu; empty for other kinds.
    pub fn children(&self) -> &[MenuItem] {
        match &self.kind {
            MenuKind::Submenu(items) => items,
            _ => &[],
        }
    }
}

/// Current state used to build the context menu.
#[derive(Debug, Clone)]
pub struct MenuState {
    pub status: ClientStatus,
    /// Session fetched for this render; only consulted when online.
    pub session: Option<Session>,
    /// Unix time the menu is rendered at, for expiry labels.
    pub now: i64,
    pub install_docs_url: String,
}

impl Default for MenuState {
    fn default() -> Self {
        Self {
            status: ClientStatus::Unknown,
            session: None,
            now: 0,
            install_docs_url: INSTALL_DOCS_URL.into(),
        }
    }
}

impl MenuState {
    /// State for a render happening now.
    pub fn new(status: ClientStatus, session: Option<Session>) -> Self {
        Self {
            status,
            session,
            now: Utc::now().timestamp(),
            ..Self::default()
        }
    }

    /// Builds the menu items from the current state.
    pub fn build_menu(&self) -> Vec<MenuItem> {
        let mut items = match self.status {
            ClientStatus::NotInstalled => vec![MenuItem::action(
                "Install CLI",
                MenuAction::OpenUrl(self.install_docs_url.clone()),
            )],
            ClientStatus::NotRunning => vec![MenuItem::action(
                "Start Twingate Service",
                MenuAction::StartService,
            )],
            ClientStatus::Authenticating => vec![
                MenuItem::action("Authentication Pending", MenuAction::OpenNetworkAuth)
                    .with_sublabel("Click to Open Browser"),
            ],
            ClientStatus::Online => self.online_section(),
            ClientStatus::Unknown => vec![MenuItem::action(
                "Unknown CLI Status",
                MenuAction::OpenUrl(self.install_docs_url.clone()),
            )],
        };

        // Footer shared by every status.
        items.push(MenuItem::separator());
        items.push(MenuItem::action("Refresh Menu", MenuAction::Refresh));
        items.push(MenuItem::action("Quit Tray", MenuAction::Quit));

        items
    }

    fn online_section(&self) -> Vec<MenuItem> {
        let logout = MenuItem::action("Logout and Disconnect", MenuAction::Logout);

        let Some(session) = &self.session else {
            return vec![MenuItem::disabled("Resources unavailable"), logout];
        };

        let mut items = vec![user_item(&session.user), logout, MenuItem::separator()];

        items.push(MenuItem::disabled(format!(
            "{} Resources",
            session.resources.len()
        )));
        items.extend(
            session
                .visible_resources()
                .map(|r| resource_item(r, self.now)),
        );

        items.push(MenuItem::separator());
        items.push(MenuItem::submenu(
            "More...",
            vec![MenuItem::action("Change Network...", MenuAction::ChangeNetwork)],
        ));

        items
    }
}

fn user_item(user: &User) -> MenuItem {
    MenuItem::disabled(user.email.clone()).with_sublabel(user.display_name())
}

fn resource_item(resource: &Resource, now: i64) -> MenuItem {
    let address = resource.display_address().to_string();

    let mut open = MenuItem::action(
        "Open in Browser",
        MenuAction::OpenUrl(resource.open_url.clone()),
    );
    open.enabled = !resource.open_url.is_empty();

    let mut children = vec![
        MenuItem::disabled(address.clone()),
        MenuItem::action("Copy Address", MenuAction::CopyAddress(address)),
        open,
        MenuItem::separator(),
    ];

    if resource.is_auth_expired() {
        children.push(MenuItem::disabled("Authentication Expired"));
        children.push(MenuItem::action(
            "Authenticate...",
            MenuAction::AuthenticateResource(resource.name.clone()),
        ));
    } else {
        children.push(MenuItem::disabled(format!(
            "Auth expires in {}",
            humanize_distance(resource.auth_expires_at, now)
        )));
    }

    MenuItem::submenu(resource.name.clone(), children)
}

/// Renders the distance from `now` to `target` (unix seconds) in words.
///
/// Thresholds follow the usual "time ago" wording: under 30 seconds is
/// "less than a minute", 45 minutes already reads "about 1 hour", and
/// units are rounded to the nearest value. Months are 30-day blocks rather
/// than calendar months. Past targets render as "less than a minute".
pub fn humanize_distance(target: i64, now: i64) -> String {
    const DAY: i64 = 24 * 60;
    const MONTH: i64 = 30 * DAY;

    let secs = target.saturating_sub(now).clamp(0, i64::MAX / 1000);
    let delta = TimeDelta::try_seconds(secs).unwrap_or_default();
    let minutes = round_div(delta.num_seconds(), 60);

    if minutes == 0 {
        "less than a minute".into()
    } else if minutes < 45 {
        plural(minutes, "minute")
    } else if minutes < 90 {
        "about 1 hour".into()
    } else if minutes < DAY {
        format!("about {}", plural(round_div(minutes, 60), "hour"))
    } else if minutes < 42 * 60 {
        "1 day".into()
    } else if minutes < MONTH {
        plural(round_div(minutes, DAY), "day")
    } else if minutes < 2 * MONTH {
        format!("about {}", plural(round_div(minutes, MONTH), "month"))
    } else if minutes < 12 * MONTH {
        plural(round_div(minutes, MONTH), "month")
    } else {
        let months = minutes / MONTH;
        let years = months / 12;
        match months % 12 {
            0..3 => format!("about {}", plural(years, "year")),
            3..9 => format!("over {}", plural(years, "year")),
            _ => format!("almost {}", plural(years + 1, "year")),
        }
    }
}

/// `n / d` rounded half up, for non-negative `n`.
fn round_div(n: i64, d: i64) -> i64 {
    (n + d / 2) / d
}

fn plural(n: i64, unit: &str) -> String {
    if n == 1 {
        format!("1 {unit}")
    } else {
        format!("{n} {unit}s")
    }
}
