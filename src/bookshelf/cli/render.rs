//! # Rendering Module
//!
//! [`TerminalSurface`] is the terminal's implementation of the library's `Surface`
//! trait. It does not write anything itself: surface calls are buffered, and the
//! caller prints [`TerminalSurface::take_output`] when it is ready (once per
//! one-shot command, once per line in the shell).
//!
//! ## Design Philosophy
//!
//! Layout calculations (width, truncation, padding) stay in Rust because they require
//! Unicode-aware processing. Templates handle presentation concerns: which style each
//! piece gets, and what to print for an empty library or a flagged field.

use super::styles::{names, Theme, SHELF_THEME};
use super::templates::{
    CONFIG_TEMPLATE, HELP_TEMPLATE, MODAL_TEMPLATE, NOTICES_TEMPLATE, TABLE_TEMPLATE,
};
use bookshelf::form::{FormField, FormValues, InvalidField};
use bookshelf::view::{FormMode, Notice, NoticeLevel, Surface, TableView, TABLE_COLUMNS};
use console::Term;
use minijinja::{Environment, Value};
use serde::Serialize;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub const TITLE_MAX_WIDTH: usize = 40;
pub const AUTHOR_MAX_WIDTH: usize = 28;
const INDEX_WIDTH: usize = 5;
const PAGES_WIDTH: usize = 7;
const COLUMN_GAP: usize = 2;
const LABEL_WIDTH: usize = 12;

/// Whether stdout should get ANSI styling.
pub fn detect_color(no_color: bool) -> bool {
    !no_color && Term::stdout().features().colors_supported()
}

#[derive(Serialize)]
struct RowLine {
    number: String,
    title: String,
    author: String,
    pages: String,
    status: String,
    status_style: &'static str,
}

#[derive(Serialize)]
struct TableData {
    heading: String,
    header: String,
    rows: Vec<RowLine>,
    empty: bool,
    summary: String,
}

#[derive(Serialize)]
struct FieldLine {
    label: String,
    value: String,
    flagged: bool,
    reason: String,
}

#[derive(Serialize)]
struct ModalData {
    heading: String,
    fields: Vec<FieldLine>,
    completed_label: String,
    completed: String,
    hint: String,
}

#[derive(Serialize)]
struct NoticeLine {
    content: String,
    style: &'static str,
}

#[derive(Serialize)]
struct NoticesData {
    notices: Vec<NoticeLine>,
}

#[derive(Serialize)]
struct ConfigLine {
    key: String,
    value: String,
}

#[derive(Serialize)]
struct ConfigData {
    entries: Vec<ConfigLine>,
}

#[derive(Serialize)]
struct HelpLine {
    usage: String,
    about: String,
}

#[derive(Serialize)]
struct HelpData {
    commands: Vec<HelpLine>,
}

/// A minijinja environment with the `style` filter bound to the shelf theme.
pub struct Renderer {
    env: Environment<'static>,
}

impl Renderer {
    pub fn new(use_color: bool) -> Self {
        let mut env = Environment::new();
        register_style_filter(&mut env, SHELF_THEME.clone(), use_color);
        Self { env }
    }

    fn render<T: Serialize>(&self, name: &str, source: &str, data: &T) -> String {
        self.env
            .render_named_str(name, source, data)
            .unwrap_or_else(|e| format!("Render error: {}\n", e))
    }

    pub fn render_table(&self, heading: &str, table: &TableView) -> String {
        self.render("table", TABLE_TEMPLATE, &table_data(heading, table))
    }

    pub fn render_modal(
        &self,
        mode: FormMode,
        values: &FormValues,
        flagged: Option<&InvalidField>,
    ) -> String {
        let heading = match mode {
            FormMode::Add => "Add a book".to_string(),
            FormMode::Edit(id) => format!("Edit book {}", id),
        };
        let fields = [FormField::Title, FormField::Author, FormField::Pages]
            .into_iter()
            .map(|field| {
                let flag = flagged.filter(|invalid| invalid.field == field);
                FieldLine {
                    label: pad_to_width(&capitalize(&field.to_string()), LABEL_WIDTH),
                    value: values.get(field).to_string(),
                    flagged: flag.is_some(),
                    reason: flag.map(|invalid| invalid.reason.to_string()).unwrap_or_default(),
                }
            })
            .collect();
        let data = ModalData {
            heading,
            fields,
            completed_label: pad_to_width("Read", LABEL_WIDTH),
            completed: if values.completed { "[x]" } else { "[ ]" }.to_string(),
            hint: "  title|author|pages <value>, read yes|no, submit, cancel".to_string(),
        };
        self.render("modal", MODAL_TEMPLATE, &data)
    }

    pub fn render_notices(&self, notices: &[Notice]) -> String {
        if notices.is_empty() {
            return String::new();
        }
        let data = NoticesData {
            notices: notices
                .iter()
                .map(|notice| NoticeLine {
                    content: notice.content.clone(),
                    style: notice_style(notice.level),
                })
                .collect(),
        };
        self.render("notices", NOTICES_TEMPLATE, &data)
    }

    pub fn render_config(&self, entries: &[(&str, String)]) -> String {
        let width = entries.iter().map(|(k, _)| k.width()).max().unwrap_or(0);
        let data = ConfigData {
            entries: entries
                .iter()
                .map(|(key, value)| ConfigLine {
                    key: pad_to_width(key, width),
                    value: value.clone(),
                })
                .collect(),
        };
        self.render("config", CONFIG_TEMPLATE, &data)
    }

    pub fn render_help(&self, commands: &[(&str, &str)]) -> String {
        let width = commands.iter().map(|(u, _)| u.width()).max().unwrap_or(0) + COLUMN_GAP;
        let data = HelpData {
            commands: commands
                .iter()
                .map(|(usage, about)| HelpLine {
                    usage: pad_to_width(usage, width),
                    about: about.to_string(),
                })
                .collect(),
        };
        self.render("help", HELP_TEMPLATE, &data)
    }
}

fn register_style_filter(env: &mut Environment<'static>, theme: Theme, use_color: bool) {
    env.add_filter("style", move |value: Value, name: String| -> String {
        theme.apply(&name, &value.to_string(), use_color)
    });
}

fn notice_style(level: NoticeLevel) -> &'static str {
    match level {
        NoticeLevel::Info => names::INFO,
        NoticeLevel::Success => names::SUCCESS,
        NoticeLevel::Warning => names::WARNING,
        NoticeLevel::Error => names::ERROR,
    }
}

fn table_data(heading: &str, table: &TableView) -> TableData {
    let title_width = column_width(
        TABLE_COLUMNS[0],
        table.rows.iter().map(|r| r.title.as_str()),
        TITLE_MAX_WIDTH,
    );
    let author_width = column_width(
        TABLE_COLUMNS[1],
        table.rows.iter().map(|r| r.author.as_str()),
        AUTHOR_MAX_WIDTH,
    );

    let header = format!(
        "{}{}{}{}{}{}",
        pad_to_width("    #", INDEX_WIDTH + 1),
        cell(TABLE_COLUMNS[0], title_width),
        cell(TABLE_COLUMNS[1], author_width),
        pad_left(TABLE_COLUMNS[2], PAGES_WIDTH),
        " ".repeat(COLUMN_GAP),
        TABLE_COLUMNS[3],
    );

    let rows = table
        .rows
        .iter()
        .map(|row| RowLine {
            number: format!("{:>width$}. ", row.index + 1, width = INDEX_WIDTH - 1),
            title: cell(&row.title, title_width),
            author: cell(&row.author, author_width),
            pages: format!(
                "{}{}",
                pad_left(&row.page_count.to_string(), PAGES_WIDTH),
                " ".repeat(COLUMN_GAP)
            ),
            status: if row.is_read { "Read" } else { "Not read" }.to_string(),
            status_style: if row.is_read { names::READ } else { names::UNREAD },
        })
        .collect();

    let read = table.rows.iter().filter(|r| r.is_read).count();
    let total = table.rows.len();
    TableData {
        heading: heading.to_string(),
        header,
        rows,
        empty: table.rows.is_empty(),
        summary: format!(
            "  {} {}, {} read",
            total,
            if total == 1 { "book" } else { "books" },
            read
        ),
    }
}

fn column_width<'a>(label: &str, values: impl Iterator<Item = &'a str>, max: usize) -> usize {
    values
        .map(UnicodeWidthStr::width)
        .chain(std::iter::once(label.width()))
        .max()
        .unwrap_or(0)
        .min(max)
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// A table cell: fitted to `width`, followed by the column gap.
fn cell(s: &str, width: usize) -> String {
    format!("{}{}", pad_to_width(s, width), " ".repeat(COLUMN_GAP))
}

/// Truncates to `width` display columns (with an ellipsis) and pads with spaces.
pub fn pad_to_width(s: &str, width: usize) -> String {
    let mut out = truncate_to_width(s, width);
    let used = out.width();
    out.push_str(&" ".repeat(width.saturating_sub(used)));
    out
}

fn pad_left(s: &str, width: usize) -> String {
    format!("{}{}", " ".repeat(width.saturating_sub(s.width())), s)
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    let mut result = String::new();
    let mut current_width = 0;
    let limit = max_width.saturating_sub(1);

    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > limit {
            break;
        }
        result.push(c);
        current_width += char_width;
    }
    result.push('…');
    result
}

/// The terminal as a `Surface`: buffers what the view asks for until the caller
/// collects it with [`TerminalSurface::take_output`].
pub struct TerminalSurface {
    renderer: Renderer,
    heading: String,
    table: Option<TableView>,
    modal: Option<(FormMode, FormValues)>,
    flagged: Option<InvalidField>,
    notices: Vec<Notice>,
}

impl TerminalSurface {
    pub fn new(heading: impl Into<String>, use_color: bool) -> Self {
        Self {
            renderer: Renderer::new(use_color),
            heading: heading.into(),
            table: None,
            modal: None,
            flagged: None,
            notices: Vec::new(),
        }
    }

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    /// Everything drawn since the last call, in order: table, modal, flagged field,
    /// notices.
    pub fn take_output(&mut self) -> String {
        let mut out = String::new();
        if let Some(table) = self.table.take() {
            out.push_str(&self.renderer.render_table(&self.heading, &table));
        }
        if let Some((mode, values)) = self.modal.take() {
            out.push_str(&self.renderer.render_modal(mode, &values, None));
        }
        if let Some(invalid) = self.flagged.take() {
            out.push_str(&self.renderer.render_notices(&[Notice::error(invalid.to_string())]));
        }
        let notices = std::mem::take(&mut self.notices);
        out.push_str(&self.renderer.render_notices(&notices));
        out
    }
}

impl Surface for TerminalSurface {
    fn replace_table(&mut self, table: &TableView) {
        self.table = Some(table.clone());
    }

    fn show_modal(&mut self, mode: FormMode, values: &FormValues) {
        self.modal = Some((mode, values.clone()));
        self.flagged = None;
    }

    fn hide_modal(&mut self) {
        self.modal = None;
        self.flagged = None;
    }

    fn flag_field(&mut self, invalid: &InvalidField) {
        self.flagged = Some(invalid.clone());
    }

    fn notify(&mut self, notice: &Notice) {
        self.notices.push(notice.clone());
    }
}
