//! # View
//!
//! The view owns everything the user sees and touches, but never the data itself:
//!
//! - the rendered table, rebuilt wholesale by [`View::display_library`];
//! - the modal book form and its add/edit state machine;
//! - the handlers through which user intent is reported to whoever bound them.
//!
//! Drawing is delegated to a [`Surface`], the UI toolkit. The terminal binary
//! implements one; tests use a recording one.
//!
//! ## Modal State Machine
//!
//! ```text
//!                 ShowAdd                      ShowEdit(row)
//!   Closed ──────────────────► Open(Add)   Closed ──────────────► Open(Edit(id))
//!     ▲                            │                                     │
//!     └──── Submit (valid) ────────┴──────── Close / Cancel ─────────────┘
//! ```
//!
//! Closing always lands in `Closed`, which is implicitly add mode, so an edit is
//! single-shot. A submit with an invalid field keeps the modal open, flags the
//! field, and emits nothing. A submit while closed is ignored, so double submits are
//! harmless.
//!
//! ## Rows
//!
//! Each render renumbers the rows from zero. Row triggers name a row of the
//! *latest* render; the view resolves it to the row's [`BookId`] before calling a
//! handler, so an edit that stays open across other mutations still targets the
//! book it was opened for.

use crate::error::{Result, ShelfError};
use crate::form::{FormField, FormValues, InvalidField};
use crate::model::{Book, BookId, BookProps};
use tracing::debug;

pub const TABLE_COLUMNS: [&str; 4] = ["Title", "Author", "Pages", "Status"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Add,
    Edit(BookId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalState {
    Closed,
    Open(FormMode),
}

impl ModalState {
    pub fn is_open(&self) -> bool {
        matches!(self, ModalState::Open(_))
    }

    pub fn mode(&self) -> FormMode {
        match self {
            ModalState::Closed => FormMode::Add,
            ModalState::Open(mode) => *mode,
        }
    }
}

/// One rendered table row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub index: usize,
    pub id: BookId,
    pub title: String,
    pub author: String,
    pub page_count: u32,
    pub is_read: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableView {
    pub rows: Vec<Row>,
}

impl TableView {
    pub fn from_books(books: &[Book]) -> Self {
        let rows = books
            .iter()
            .enumerate()
            .map(|(index, book)| Row {
                index,
                id: book.id(),
                title: book.title.clone(),
                author: book.author.clone(),
                page_count: book.page_count,
                is_read: book.is_read,
            })
            .collect();
        Self { rows }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub content: String,
}

impl Notice {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            content: content.into(),
        }
    }
}

/// The imperative UI toolkit a view draws on.
pub trait Surface {
    /// Replace the whole table with `table`.
    fn replace_table(&mut self, table: &TableView);

    /// Reveal the modal in `mode`, showing `values` in its controls.
    fn show_modal(&mut self, mode: FormMode, values: &FormValues);

    fn hide_modal(&mut self);

    /// Mark a form control as holding an unusable value.
    fn flag_field(&mut self, invalid: &InvalidField);

    fn notify(&mut self, notice: &Notice);
}

/// A user gesture, in toolkit-neutral terms. Rows are zero-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    ShowAdd,
    ShowEdit { row: usize },
    Input { field: FormField, value: String },
    SetCompleted(bool),
    Submit,
    Close,
    Cancel,
    Remove { row: usize },
    ToggleStatus { row: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventOutcome {
    /// The event changed view state and/or reached a handler.
    Handled,
    /// Not applicable in the current state, or nobody is bound for it.
    Ignored,
    /// Submit refused; the modal is still open with the field flagged.
    Rejected(InvalidField),
}

pub type AddHandler = Box<dyn FnMut(BookProps) -> Result<()>>;
pub type RowHandler = Box<dyn FnMut(BookId) -> Result<()>>;
pub type GetHandler = Box<dyn Fn(BookId) -> Result<BookProps>>;
pub type UpdateHandler = Box<dyn FnMut(BookId, BookProps) -> Result<()>>;

/// The pair bound by [`View::bind_update_book`]. `handle_get` is a synchronous pull
/// used to fill the edit form, not a subscription.
pub struct UpdateHandlers {
    pub handle_get: GetHandler,
    pub handle_update: UpdateHandler,
}

pub struct View<S: Surface> {
    surface: S,
    modal: ModalState,
    form: FormValues,
    flagged: Option<FormField>,
    rows: Vec<Row>,
    on_add: Option<AddHandler>,
    on_update: Option<UpdateHandlers>,
    on_remove: Option<RowHandler>,
    on_status: Option<RowHandler>,
}

impl<S: Surface> View<S> {
    pub fn new(surface: S) -> Self {
        Self {
            surface,
            modal: ModalState::Closed,
            form: FormValues::default(),
            flagged: None,
            rows: Vec::new(),
            on_add: None,
            on_update: None,
            on_remove: None,
            on_status: None,
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn modal(&self) -> ModalState {
        self.modal
    }

    pub fn form(&self) -> &FormValues {
        &self.form
    }

    pub fn flagged(&self) -> Option<FormField> {
        self.flagged
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn bind_add_book(&mut self, handler: impl FnMut(BookProps) -> Result<()> + 'static) {
        self.on_add = Some(Box::new(handler));
    }

    pub fn bind_update_book(&mut self, handlers: UpdateHandlers) {
        self.on_update = Some(handlers);
    }

    pub fn bind_remove_book(&mut self, handler: impl FnMut(BookId) -> Result<()> + 'static) {
        self.on_remove = Some(Box::new(handler));
    }

    pub fn bind_status_change(&mut self, handler: impl FnMut(BookId) -> Result<()> + 'static) {
        self.on_status = Some(Box::new(handler));
    }

    /// Rebuilds the table from scratch; row indexes restart at zero.
    pub fn display_library(&mut self, books: &[Book]) {
        let table = TableView::from_books(books);
        self.rows = table.rows.clone();
        self.surface.replace_table(&table);
    }

    pub fn notify(&mut self, notice: Notice) {
        self.surface.notify(&notice);
    }

    pub fn handle(&mut self, event: UiEvent) -> Result<EventOutcome> {
        debug!(?event, modal = ?self.modal, "view event");
        match event {
            UiEvent::ShowAdd => Ok(self.show_add()),
            UiEvent::ShowEdit { row } => self.show_edit(row),
            UiEvent::Input { field, value } => Ok(self.input(field, value)),
            UiEvent::SetCompleted(checked) => Ok(self.set_completed(checked)),
            UiEvent::Submit => self.submit(),
            UiEvent::Close | UiEvent::Cancel => Ok(self.dismiss()),
            UiEvent::Remove { row } => self.remove(row),
            UiEvent::ToggleStatus { row } => self.toggle_status(row),
        }
    }

    pub fn show_add(&mut self) -> EventOutcome {
        if self.modal.is_open() {
            return EventOutcome::Ignored;
        }
        self.form = FormValues::default();
        self.flagged = None;
        self.open(FormMode::Add);
        EventOutcome::Handled
    }

    pub fn show_edit(&mut self, row: usize) -> Result<EventOutcome> {
        if self.modal.is_open() {
            return Ok(EventOutcome::Ignored);
        }
        let id = self.row_id(row)?;
        let Some(handlers) = self.on_update.as_ref() else {
            return Ok(EventOutcome::Ignored);
        };
        let props = (handlers.handle_get)(id)?;
        self.form = FormValues::from_props(&props);
        self.flagged = None;
        self.open(FormMode::Edit(id));
        Ok(EventOutcome::Handled)
    }

    pub fn input(&mut self, field: FormField, value: impl Into<String>) -> EventOutcome {
        if !self.modal.is_open() {
            return EventOutcome::Ignored;
        }
        self.form.set(field, value);
        if self.flagged == Some(field) {
            self.flagged = None;
        }
        EventOutcome::Handled
    }

    pub fn set_completed(&mut self, checked: bool) -> EventOutcome {
        if !self.modal.is_open() {
            return EventOutcome::Ignored;
        }
        self.form.completed = checked;
        EventOutcome::Handled
    }

    pub fn submit(&mut self) -> Result<EventOutcome> {
        let ModalState::Open(mode) = self.modal else {
            return Ok(EventOutcome::Ignored);
        };

        let props = match self.form.read() {
            Ok(props) => props,
            Err(invalid) => {
                self.flagged = Some(invalid.field);
                self.surface.flag_field(&invalid);
                return Ok(EventOutcome::Rejected(invalid));
            }
        };

        self.dismiss();
        match mode {
            FormMode::Add => {
                if let Some(handler) = self.on_add.as_mut() {
                    handler(props)?;
                }
            }
            FormMode::Edit(id) => {
                if let Some(handlers) = self.on_update.as_mut() {
                    (handlers.handle_update)(id, props)?;
                }
            }
        }
        Ok(EventOutcome::Handled)
    }

    /// Close or cancel: drop whatever was typed and return to closed/add.
    pub fn dismiss(&mut self) -> EventOutcome {
        let was_open = self.modal.is_open();
        self.modal = ModalState::Closed;
        self.form = FormValues::default();
        self.flagged = None;
        if was_open {
            self.surface.hide_modal();
            EventOutcome::Handled
        } else {
            EventOutcome::Ignored
        }
    }

    pub fn remove(&mut self, row: usize) -> Result<EventOutcome> {
        let id = self.row_id(row)?;
        match self.on_remove.as_mut() {
            Some(handler) => {
                handler(id)?;
                Ok(EventOutcome::Handled)
            }
            None => Ok(EventOutcome::Ignored),
        }
    }

    pub fn toggle_status(&mut self, row: usize) -> Result<EventOutcome> {
        let id = self.row_id(row)?;
        match self.on_status.as_mut() {
            Some(handler) => {
                handler(id)?;
                Ok(EventOutcome::Handled)
            }
            None => Ok(EventOutcome::Ignored),
        }
    }

    fn row_id(&self, row: usize) -> Result<BookId> {
        self.rows
            .get(row)
            .map(|r| r.id)
            .ok_or(ShelfError::NoSuchRow(row))
    }

    fn open(&mut self, mode: FormMode) {
        self.modal = ModalState::Open(mode);
        self.surface.show_modal(mode, &self.form);
    }
}
