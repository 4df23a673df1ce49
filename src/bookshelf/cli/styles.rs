//! # Styles
//!
//! Templates refer to semantic style names (`title`, `read`, `flagged`...), never to
//! colors. The [`Theme`] maps each name to a `console::Style`; the `style` template
//! filter looks the name up and applies it, or passes the text through untouched when
//! color is off.
//!
//! An unknown style name is rendered with a visible `(!?)` marker so typos in
//! templates show up in output instead of silently dropping the style.

use console::Style;
use once_cell::sync::Lazy;
use std::collections::HashMap;

pub const MISSING_STYLE_INDICATOR: &str = "(!?)";

/// Style identifiers shared between templates and renderers.
pub mod names {
    pub const HEADING: &str = "heading";
    pub const COLUMN: &str = "column";
    pub const INDEX: &str = "index";
    pub const TITLE: &str = "title";
    pub const MUTED: &str = "muted";
    pub const READ: &str = "read";
    pub const UNREAD: &str = "unread";
    pub const FLAGGED: &str = "flagged";
    pub const INFO: &str = "info";
    pub const SUCCESS: &str = "success";
    pub const WARNING: &str = "warning";
    pub const ERROR: &str = "error";
}

#[derive(Clone, Default)]
pub struct Theme {
    styles: HashMap<String, Style>,
}

impl Theme {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(mut self, name: &str, style: Style) -> Self {
        self.styles.insert(name.to_string(), style);
        self
    }

    pub fn apply(&self, name: &str, text: &str, use_color: bool) -> String {
        match self.styles.get(name) {
            Some(style) if use_color => style.apply_to(text).force_styling(true).to_string(),
            Some(_) => text.to_string(),
            None => format!("{} {}", MISSING_STYLE_INDICATOR, text),
        }
    }
}

pub static SHELF_THEME: Lazy<Theme> = Lazy::new(|| {
    Theme::new()
        .add(names::HEADING, Style::new().bold().underlined())
        .add(names::COLUMN, Style::new().bold())
        .add(names::INDEX, Style::new().yellow())
        .add(names::TITLE, Style::new().bold())
        .add(names::MUTED, Style::new().color256(246))
        .add(names::READ, Style::new().green())
        .add(names::UNREAD, Style::new().color256(246).italic())
        .add(names::FLAGGED, Style::new().red().bold())
        .add(names::INFO, Style::new().color256(246))
        .add(names::SUCCESS, Style::new().green())
        .add(names::WARNING, Style::new().yellow())
        .add(names::ERROR, Style::new().red())
});
