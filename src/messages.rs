//! User-visible strings.
//!
//! Precondition failures carry their own text on
//! [`BindRefusal`](crate::binding::BindRefusal); everything else the
//! subsystem says to the user lives here.

use crate::destination::DocumentUri;

pub fn bound(name: &str) -> String {
    format!("Bound to {name}")
}

pub fn replaced(old: &str, new: &str) -> String {
    format!("Unbound {old}, now bound to {new}")
}

pub fn already_bound(name: &str) -> String {
    format!("Already bound to {name}")
}

pub fn replace_prompt(current: &str, new: &str) -> String {
    format!("Already bound to {current}. Replace with {new}?")
}

pub fn replace_confirm(new: &str) -> String {
    format!("Yes, replace with {new}")
}

pub fn replace_keep(current: &str) -> String {
    format!("No, keep {current}")
}

pub fn unbound(name: &str) -> String {
    format!("Unbound from {name}")
}

pub const NOTHING_BOUND: &str = "No destination is currently bound";

pub const TERMINAL_CLOSED: &str = "Destination binding removed (terminal closed)";

pub const EDITOR_CLOSED: &str = "Destination binding removed (editor closed)";

pub const NO_DESTINATIONS: &str = "No paste destinations available";

pub const PICK_DESTINATION: &str = "Choose a paste destination";

pub const PICK_TERMINAL: &str = "Choose a terminal";

pub const ACTIVE: &str = "active";

pub const MORE_TERMINALS: &str = "More terminals...";

pub fn remaining(count: usize) -> String {
    format!("{count} more")
}

pub fn terminal_display_name(name: &str) -> String {
    format!("Terminal (\"{name}\")")
}

pub fn editor_display_name(document: &DocumentUri) -> String {
    format!("Text Editor ({})", document.file_name())
}

pub fn paste_failed(name: &str) -> String {
    format!("Could not paste to {name}")
}

pub fn paste_hint(name: &str) -> String {
    format!("Text copied, press Ctrl+V in {name} to paste")
}
