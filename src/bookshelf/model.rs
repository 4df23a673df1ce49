//! # Library Model
//!
//! The [`Library`] is the single source of truth: an ordered collection of [`Book`]s
//! where insertion order is display order.
//!
//! ## Identity
//!
//! Every book gets an opaque [`BookId`] from [`Library::create_book`]. Ids are handed
//! out from a per-library counter and never reused, so they stay valid while other
//! books are added or removed around them. A positional index is only good until the
//! next mutation; anything that has to survive a round trip through the UI (an open
//! edit form, a row that was clicked) should hold a `BookId` instead.
//!
//! Both flavours of every operation exist: the positional ones (`get_book`,
//! `update_book`, ...) and the id-keyed ones (`get_book_by_id`, ...), which resolve
//! the id to its current position and then delegate.
//!
//! ## Change Notification
//!
//! Every successful mutation synchronously notifies, before returning, with the full
//! current sequence:
//!
//! 1. The primary subscriber registered with [`Library::bind_changed`] (last one wins).
//! 2. Any observers added with [`Library::subscribe`], in subscription order.
//!
//! With nobody subscribed, mutations still succeed. Failed operations never notify.
//!
//! Ids are in-memory only. The persisted snapshot is the flat [`BookProps`] shape.

use crate::error::{Result, ShelfError};
use serde::{Deserialize, Serialize};
use std::cell::Cell;
use std::fmt;

pub const DEFAULT_LIBRARY_NAME: &str = "My Library";

/// Opaque, monotonically assigned handle to a book within one library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BookId(u64);

impl fmt::Display for BookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The user-editable fields of a book, and the persisted shape of one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookProps {
    pub title: String,
    pub author: String,
    pub page_count: u32,
    pub is_read: bool,
}

impl BookProps {
    pub fn new(title: impl Into<String>, author: impl Into<String>, page_count: u32, is_read: bool) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            page_count,
            is_read,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    #[serde(skip)]
    id: BookId,
    pub title: String,
    pub author: String,
    pub page_count: u32,
    pub is_read: bool,
}

impl Book {
    pub fn id(&self) -> BookId {
        self.id
    }

    pub fn props(&self) -> BookProps {
        BookProps {
            title: self.title.clone(),
            author: self.author.clone(),
            page_count: self.page_count,
            is_read: self.is_read,
        }
    }

    pub fn toggle_status(&mut self) {
        self.is_read = !self.is_read;
    }

    /// Full replace of every user field. The id is kept.
    fn overwrite(&mut self, props: BookProps) {
        let BookProps {
            title,
            author,
            page_count,
            is_read,
        } = props;
        self.title = title;
        self.author = author;
        self.page_count = page_count;
        self.is_read = is_read;
    }
}

/// The sample collection a fresh library starts with.
pub fn sample_books() -> Vec<BookProps> {
    vec![
        BookProps::new("The Hobbit", "J.R.R. Tolkien", 295, false),
        BookProps::new("Pride and Prejudice", "Jane Austen", 279, false),
        BookProps::new("The Fault in Our Stars", "John Green", 313, true),
    ]
}

pub type ChangeCallback = Box<dyn FnMut(&[Book])>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

pub struct Library {
    name: String,
    books: Vec<Book>,
    next_id: Cell<u64>,
    on_changed: Option<ChangeCallback>,
    listeners: Vec<(ListenerId, ChangeCallback)>,
    next_listener: u64,
}

impl fmt::Debug for Library {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Library")
            .field("name", &self.name)
            .field("books", &self.books)
            .field("bound", &self.on_changed.is_some())
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl Library {
    /// An empty library.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            books: Vec::new(),
            next_id: Cell::new(1),
            on_changed: None,
            listeners: Vec::new(),
            next_listener: 1,
        }
    }

    /// A library pre-filled with `books`, in order. Does not notify.
    pub fn with_books(name: impl Into<String>, books: Vec<BookProps>) -> Self {
        let mut library = Self::new(name);
        let created: Vec<Book> = books.into_iter().map(|p| library.create_book(p)).collect();
        library.books = created;
        library
    }

    /// A library pre-filled with [`sample_books`].
    pub fn with_sample_books(name: impl Into<String>) -> Self {
        Self::with_books(name, sample_books())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn books(&self) -> &[Book] {
        &self.books
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    /// Registers the primary change subscriber, replacing any previous one.
    pub fn bind_changed(&mut self, callback: impl FnMut(&[Book]) + 'static) {
        self.on_changed = Some(Box::new(callback));
    }

    /// Adds an observer notified after the primary subscriber.
    pub fn subscribe(&mut self, callback: impl FnMut(&[Book]) + 'static) -> ListenerId {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.push((id, Box::new(callback)));
        id
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener, _)| *listener != id);
        self.listeners.len() != before
    }

    /// Builds a detached book with a fresh id. Neither stores nor notifies.
    pub fn create_book(&self, props: BookProps) -> Book {
        let id = BookId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        let mut book = Book {
            id,
            title: String::new(),
            author: String::new(),
            page_count: 0,
            is_read: false,
        };
        book.overwrite(props);
        book
    }

    pub fn add_book(&mut self, book: Book) -> BookId {
        let id = book.id;
        self.books.push(book);
        self.notify();
        id
    }

    pub fn get_book(&self, index: usize) -> Result<&Book> {
        self.books.get(index).ok_or(ShelfError::OutOfRange {
            index,
            len: self.books.len(),
        })
    }

    pub fn update_book(&mut self, index: usize, props: BookProps) -> Result<()> {
        self.book_mut(index)?.overwrite(props);
        self.notify();
        Ok(())
    }

    pub fn remove_book(&mut self, index: usize) -> Result<Book> {
        self.check_index(index)?;
        let removed = self.books.remove(index);
        self.notify();
        Ok(removed)
    }

    /// Flips `is_read` and returns the new value.
    pub fn update_book_status(&mut self, index: usize) -> Result<bool> {
        let book = self.book_mut(index)?;
        book.toggle_status();
        let is_read = book.is_read;
        self.notify();
        Ok(is_read)
    }

    pub fn clear(&mut self) {
        self.books.clear();
        self.notify();
    }

    pub fn position(&self, id: BookId) -> Result<usize> {
        self.books
            .iter()
            .position(|b| b.id == id)
            .ok_or(ShelfError::BookNotFound(id))
    }

    pub fn get_book_by_id(&self, id: BookId) -> Result<&Book> {
        let index = self.position(id)?;
        self.get_book(index)
    }

    pub fn update_book_by_id(&mut self, id: BookId, props: BookProps) -> Result<()> {
        let index = self.position(id)?;
        self.update_book(index, props)
    }

    pub fn remove_book_by_id(&mut self, id: BookId) -> Result<Book> {
        let index = self.position(id)?;
        self.remove_book(index)
    }

    pub fn update_book_status_by_id(&mut self, id: BookId) -> Result<bool> {
        let index = self.position(id)?;
        self.update_book_status(index)
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index < self.books.len() {
            Ok(())
        } else {
            Err(ShelfError::OutOfRange {
                index,
                len: self.books.len(),
            })
        }
    }

    fn book_mut(&mut self, index: usize) -> Result<&mut Book> {
        let len = self.books.len();
        self.books
            .get_mut(index)
            .ok_or(ShelfError::OutOfRange { index, len })
    }

    fn notify(&mut self) {
        if let Some(callback) = self.on_changed.as_mut() {
            callback(&self.books);
        }
        for (_, callback) in self.listeners.iter_mut() {
            callback(&self.books);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    type Log = Rc<RefCell<Vec<Vec<String>>>>;

    fn titles(books: &[Book]) -> Vec<String> {
        books.iter().map(|b| b.title.clone()).collect()
    }

    fn recording(library: &mut Library) -> Log {
        let log: Log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        library.bind_changed(move |books| sink.borrow_mut().push(titles(books)));
        log
    }

    fn abc() -> Library {
        Library::with_books(
            "Test",
            vec![
                BookProps::new("A", "x", 1, false),
                BookProps::new("B", "y", 2, false),
                BookProps::new("C", "z", 3, true),
            ],
        )
    }

    #[test]
    fn sample_library_has_three_books() {
        let library = Library::with_sample_books(DEFAULT_LIBRARY_NAME);
        assert_eq!(library.name(), "My Library");
        assert_eq!(library.len(), 3);
        assert_eq!(library.get_book(0).unwrap().title, "The Hobbit");
        assert!(library.get_book(2).unwrap().is_read);
    }

    #[test]
    fn create_book_does_not_store_or_notify() {
        let mut library = Library::new("Test");
        let log = recording(&mut library);
        let book = library.create_book(BookProps::new("Dune", "Frank Herbert", 412, false));
        assert_eq!(book.title, "Dune");
        assert!(library.is_empty());
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn ids_are_monotonic_and_unique() {
        let library = Library::new("Test");
        let a = library.create_book(BookProps::new("A", "", 0, false));
        let b = library.create_book(BookProps::new("B", "", 0, false));
        assert!(a.id() < b.id());
    }

    #[test]
    fn add_book_appends_and_notifies_full_sequence() {
        let mut library = abc();
        let log = recording(&mut library);
        let book = library.create_book(BookProps::new("D", "w", 4, false));
        library.add_book(book);
        assert_eq!(*log.borrow(), vec![vec!["A", "B", "C", "D"]]);
    }

    #[test]
    fn remove_shifts_following_books_down() {
        let mut library = abc();
        let log = recording(&mut library);
        let removed = library.remove_book(1).unwrap();
        assert_eq!(removed.title, "B");
        assert_eq!(*log.borrow(), vec![vec!["A", "C"]]);
        assert_eq!(library.get_book(1).unwrap().title, "C");
    }

    #[test]
    fn update_replaces_every_field() {
        let mut library = abc();
        let id = library.get_book(2).unwrap().id();
        library
            .update_book(2, BookProps::new("New", "Someone", 10, false))
            .unwrap();
        let book = library.get_book(2).unwrap();
        assert_eq!(book.props(), BookProps::new("New", "Someone", 10, false));
        assert_eq!(book.id(), id);
    }

    #[test]
    fn status_toggle_is_an_involution() {
        let mut library = abc();
        let original = library.get_book(0).unwrap().is_read;
        assert_eq!(library.update_book_status(0).unwrap(), !original);
        assert_eq!(library.update_book_status(0).unwrap(), original);
    }

    #[test]
    fn out_of_range_fails_without_notifying() {
        let mut library = abc();
        let log = recording(&mut library);

        assert!(matches!(
            library.get_book(3),
            Err(ShelfError::OutOfRange { index: 3, len: 3 })
        ));
        assert!(library.update_book(3, BookProps::new("", "", 0, false)).is_err());
        assert!(library.remove_book(7).is_err());
        assert!(library.update_book_status(3).is_err());
        assert!(log.borrow().is_empty());
        assert_eq!(library.len(), 3);
    }

    #[test]
    fn mutations_without_subscriber_succeed() {
        let mut library = abc();
        library.remove_book(0).unwrap();
        library.update_book_status(0).unwrap();
        assert_eq!(library.len(), 2);
    }

    #[test]
    fn last_bind_wins() {
        let mut library = abc();
        let first = recording(&mut library);
        let second = recording(&mut library);
        library.clear();
        assert!(first.borrow().is_empty());
        assert_eq!(second.borrow().len(), 1);
    }

    #[test]
    fn observers_receive_every_notification() {
        let mut library = abc();
        let primary = recording(&mut library);
        let extra = Rc::new(RefCell::new(0usize));
        let counter = Rc::clone(&extra);
        let listener = library.subscribe(move |_| *counter.borrow_mut() += 1);

        library.update_book_status(0).unwrap();
        library.remove_book(0).unwrap();
        assert_eq!(primary.borrow().len(), 2);
        assert_eq!(*extra.borrow(), 2);

        assert!(library.unsubscribe(listener));
        assert!(!library.unsubscribe(listener));
        library.clear();
        assert_eq!(*extra.borrow(), 2);
    }

    #[test]
    fn ids_survive_removal_of_earlier_books() {
        let mut library = abc();
        let c = library.get_book(2).unwrap().id();
        library.remove_book(0).unwrap();
        assert_eq!(library.position(c).unwrap(), 1);
        assert!(library.update_book_status_by_id(c).is_ok());
        assert!(!library.get_book_by_id(c).unwrap().is_read);
    }

    #[test]
    fn removed_id_is_not_found() {
        let mut library = abc();
        let b = library.get_book(1).unwrap().id();
        library.remove_book_by_id(b).unwrap();
        assert!(matches!(
            library.update_book_by_id(b, BookProps::new("", "", 0, false)),
            Err(ShelfError::BookNotFound(id)) if id == b
        ));
        assert_eq!(titles(library.books()), vec!["A", "C"]);
    }

    #[test]
    fn persisted_shape_has_no_id() {
        let library = abc();
        let json = serde_json::to_value(library.get_book(0).unwrap()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"title": "A", "author": "x", "pageCount": 1, "isRead": false})
        );
    }
}
