//! Text-mode tray backend.
//!
//! Renders each menu as a numbered list on stdout and reads the chosen
//! entry from stdin. Two threads: one drains [`TrayUpdate`]s, the other
//! blocks on stdin. They share the numbered actions of the last menu.

use std::io::{BufRead, Write};
use std::sync::mpsc::{Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread;

use gatetray_tray::{MenuAction, MenuItem, MenuKind, TrayEvent, TrayUpdate};

#[derive(Debug, Default)]
struct Shared {
    /// Action for entry `n` lives at index `n - 1`.
    actions: Vec<MenuAction>,
    /// The next input line is a network name.
    awaiting_network: bool,
}

/// Outcome of one line of user input.
#[derive(Debug, PartialEq, Eq)]
enum Input {
    Event(TrayEvent),
    Cancelled,
    Invalid,
}

/// Starts the render and input threads.
pub fn spawn(
    title: String,
    event_tx: Sender<TrayEvent>,
    update_rx: Receiver<TrayUpdate>,
) -> std::io::Result<()> {
    let shared = Arc::new(Mutex::new(Shared::default()));

    let render_shared = Arc::clone(&shared);
    thread::Builder::new()
        .name("tray-render".into())
        .spawn(move || render_loop(&title, &update_rx, &render_shared))?;

    thread::Builder::new()
        .name("tray-input".into())
        .spawn(move || input_loop(&event_tx, &shared))?;

    Ok(())
}

fn render_loop(title: &str, update_rx: &Receiver<TrayUpdate>, shared: &Mutex<Shared>) {
    for update in update_rx {
        match update {
            TrayUpdate::MenuChanged(items) => {
                let (text, actions) = render_menu(&items);
                if let Ok(mut shared) = shared.lock() {
                    shared.actions = actions;
                }
                print!("\n== {title} ==\n{text}Choose an entry (q to quit): ");
            }
            TrayUpdate::Notify(message) => println!("\n* {message}"),
            TrayUpdate::PromptNetwork => {
                if let Ok(mut shared) = shared.lock() {
                    shared.awaiting_network = true;
                }
                print!("\nNetwork name (empty to cancel): ");
            }
            TrayUpdate::Shutdown => break,
        }
        let _ = std::io::stdout().flush();
    }
    tracing::debug!("tray render loop exited");
}

fn input_loop(event_tx: &Sender<TrayEvent>, shared: &Mutex<Shared>) {
    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let Ok(line) = line else { break };

        let input = match shared.lock() {
            Ok(mut shared) => interpret_input(&line, &mut shared),
            Err(_) => break,
        };

        match input {
            Input::Event(event) => {
                if event_tx.send(event).is_err() {
                    return;
                }
            }
            Input::Cancelled => println!("cancelled"),
            Input::Invalid => println!("unknown entry: {}", line.trim()),
        }
    }

    // stdin closed: nobody can drive the menu anymore.
    let _ = event_tx.send(TrayEvent::QuitRequested);
}

fn interpret_input(line: &str, shared: &mut Shared) -> Input {
    let line = line.trim();

    if shared.awaiting_network {
        shared.awaiting_network = false;
        if line.is_empty() {
            return Input::Cancelled;
        }
        return Input::Event(TrayEvent::NetworkChosen(line.to_string()));
    }

    if line.eq_ignore_ascii_case("q") || line.eq_ignore_ascii_case("quit") {
        return Input::Event(TrayEvent::QuitRequested);
    }

    line.parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|i| shared.actions.get(i))
        .map(|action| Input::Event(TrayEvent::ActionTriggered(action.clone())))
        .unwrap_or(Input::Invalid)
}

/// Renders `items` as text, numbering every clickable entry. Returns the
/// text and the actions in numbering order.
fn render_menu(items: &[MenuItem]) -> (String, Vec<MenuAction>) {
    let mut text = String::new();
    let mut actions = Vec::new();
    render_items(items, 0, &mut text, &mut actions);
    (text, actions)
}

fn render_items(items: &[MenuItem], depth: usize, text: &mut String, actions: &mut Vec<MenuAction>) {
    let indent = "    ".repeat(depth);

    for item in items {
        let label = match &item.sublabel {
            Some(sub) => format!("{} ({sub})", item.label),
            None => item.label.clone(),
        };

        match &item.kind {
            MenuKind::Separator => text.push_str(&format!("{indent}     ----\n")),
            MenuKind::Submenu(children) => {
                text.push_str(&format!("{indent}     {label} >\n"));
                render_items(children, depth + 1, text, actions);
            }
            MenuKind::Normal => match &item.action {
                Some(action) if item.enabled => {
                    actions.push(action.clone());
                    text.push_str(&format!("{indent}[{:>2}] {label}\n", actions.len()));
                }
                _ => text.push_str(&format!("{indent}     {label}\n")),
            },
        }
    }
}
