//! # CLI Templates
//!
//! Output templates live in standalone files under `templates/` and are embedded
//! here as string constants. They are minijinja templates.
//!
//! Layout math (column widths, truncation, padding) happens in Rust before the data
//! reaches a template, so templates only choose what to print and which semantic
//! style to print it with. Line breaks are explicit (`{{ "\n" }}`) wherever loops or
//! conditionals would otherwise make blank lines hard to follow.

pub const TABLE_TEMPLATE: &str = include_str!("templates/table.tmp");
pub const MODAL_TEMPLATE: &str = include_str!("templates/modal.tmp");
pub const NOTICES_TEMPLATE: &str = include_str!("templates/notices.tmp");
pub const CONFIG_TEMPLATE: &str = include_str!("templates/config.tmp");
pub const HELP_TEMPLATE: &str = include_str!("templates/help.tmp");
