//! pastebind: bind one paste destination and keep sending text to it.
//!
//! A destination is a terminal, a split text editor, or a chat-style
//! assistant panel. The [`binding`] module owns the single bound slot,
//! [`picker`] chooses among candidates, and [`destination`] runs the
//! ordered paste protocol against whatever was bound.
//!
//! Host integration goes through the traits in [`host`]. The [`tmux`]
//! and [`console`] modules implement them, and [`session`] wires them
//! together for the `pastebind` binary.

pub mod availability;
pub mod binding;
pub mod console;
pub mod destination;
pub mod host;
pub mod messages;
pub mod picker;
pub mod session;
pub mod tmux;

#[cfg(test)]
pub(crate) mod testing;
