//! # CLI Behavior
//!
//! This is **one possible UI client** for bookshelf, not the application itself.
//! The terminal plays the part of the UI toolkit: [`render::TerminalSurface`]
//! implements the library's `Surface` trait, and every command is translated into
//! the same UI events a graphical client would send.
//!
//! ## One-shot Commands
//!
//! Running `bookshelf` with no arguments defaults to `bookshelf list`.
//!
//! `add` and `edit` drive the modal form exactly as a user would: open it, type
//! into each field, submit. A value the form refuses (say `--pages many`) is
//! reported as an error and the process exits with status 1.
//!
//! `remove` and `toggle` take 1-based row numbers and ranges (`2-4`). Rows are
//! resolved against the table as it was when the command started.
//!
//! ## Interactive Shell
//!
//! `bookshelf shell` keeps one session open and reads commands line by line. It is
//! the only way to see the modal in action: `add`, then `title ...`, `pages ...`,
//! then `submit` or `cancel`.
//!
//! ## Module Structure
//!
//! - `commands`: context setup and per-command handlers
//! - `render`: the terminal surface and template rendering
//! - `setup`: argument parsing via clap
//! - `shell`: the interactive session
//! - `styles`: the theme
//! - `templates`: output templates

mod commands;
mod render;
pub mod setup;
mod shell;
mod styles;
mod templates;

pub use commands::run;
