//! # Controller
//!
//! The controller is the only component that talks to both the [`Library`] and the
//! [`View`]. It owns all three collaborators and wires them together once, at
//! construction:
//!
//! - **Model → View**: the library's change notifications are not rendered on the
//!   spot. They land in an outbox, and [`Controller::dispatch`] flushes it after each
//!   UI event: one `display_library` with the newest snapshot, then any notices. Three
//!   notifications during one event still produce a single render.
//! - **View → Model**: the view's intents (add, update, remove, status change) become
//!   library calls keyed by [`BookId`].
//! - **Persistence**: every mutation that arrives through an intent is followed by a
//!   full-snapshot save. A failed save is reported, never rolled back.
//!
//! ## Startup
//!
//! If storage holds data, the library is emptied and rebuilt from the snapshot one
//! book at a time, in stored order, without saving. Otherwise the storage is seeded
//! with whatever the library was constructed with. Either way the table is rendered
//! exactly once before [`Controller::new`] returns.
//!
//! A snapshot that is there but cannot be decoded is copied aside before seeding
//! replaces it. When the copy fails, or the snapshot cannot be read at all, storage
//! is suspended for the session and the stored value stays as it was.

use crate::error::{Result, ShelfError};
use crate::model::{Book, BookId, BookProps, Library};
use crate::storage::{
    AppStorage, Availability, KeyValueStore, Snapshot, UnavailableReason, UNREADABLE_KEY,
};
use crate::view::{EventOutcome, Notice, Surface, UiEvent, UpdateHandlers, View};
use std::cell::{Ref, RefCell};
use std::rc::Rc;
use tracing::{debug, error, info, warn};

/// Pending view work accumulated between flushes.
#[derive(Debug, Default)]
struct Outbox {
    snapshot: Option<Vec<Book>>,
    notices: Vec<Notice>,
}

type SharedOutbox = Rc<RefCell<Outbox>>;

pub struct Controller<K: KeyValueStore, S: Surface> {
    library: Rc<RefCell<Library>>,
    view: View<S>,
    storage: Rc<AppStorage<K>>,
    outbox: SharedOutbox,
}

impl<K: KeyValueStore + 'static, S: Surface> Controller<K, S> {
    pub fn new(library: Library, view: View<S>, storage: AppStorage<K>) -> Self {
        let mut controller = Self {
            library: Rc::new(RefCell::new(library)),
            view,
            storage: Rc::new(storage),
            outbox: SharedOutbox::default(),
        };

        let outbox = Rc::clone(&controller.outbox);
        controller.library.borrow_mut().bind_changed(move |books| {
            outbox.borrow_mut().snapshot = Some(books.to_vec());
        });
        controller.bind_view();
        controller.load_or_seed();

        if let Availability::Unavailable(reason) = controller.storage.availability() {
            controller
                .outbox
                .borrow_mut()
                .notices
                .push(Notice::warning(unavailable_message(reason)));
        }

        {
            let mut outbox = controller.outbox.borrow_mut();
            if outbox.snapshot.is_none() {
                outbox.snapshot = Some(controller.library.borrow().books().to_vec());
            }
        }
        controller.flush();
        controller
    }

    /// Feeds one UI event through the view, then renders whatever it changed.
    pub fn dispatch(&mut self, event: UiEvent) -> Result<EventOutcome> {
        let result = self.view.handle(event);
        self.flush();
        result
    }

    pub fn view(&self) -> &View<S> {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut View<S> {
        &mut self.view
    }

    pub fn library(&self) -> Ref<'_, Library> {
        self.library.borrow()
    }

    pub fn storage(&self) -> &AppStorage<K> {
        &self.storage
    }

    fn load_or_seed(&mut self) {
        if !self.storage.has_initial_data() {
            self.seed();
            return;
        }
        match self.storage.read_snapshot() {
            Snapshot::Loaded(stored) => self.hydrate(stored),
            Snapshot::Missing => self.seed(),
            Snapshot::Undecodable(raw) => match self.storage.set_aside(&raw) {
                Ok(()) => {
                    self.outbox.borrow_mut().notices.push(Notice::warning(format!(
                        "Stored library could not be read; a copy was kept as \"{}\"",
                        UNREADABLE_KEY
                    )));
                    self.seed();
                }
                Err(e) => {
                    warn!(error = %e, "could not keep a copy of the unreadable snapshot");
                    self.storage.suspend(UnavailableReason::Unreadable);
                }
            },
            Snapshot::ReadFailed => self.storage.suspend(UnavailableReason::Unreadable),
        }
    }

    fn hydrate(&mut self, stored: Vec<BookProps>) {
        info!(count = stored.len(), "hydrating library from storage");
        let mut library = self.library.borrow_mut();
        library.clear();
        for props in stored {
            let book = library.create_book(props);
            library.add_book(book);
        }
    }

    fn seed(&mut self) {
        let library = self.library.borrow();
        debug!(count = library.len(), "seeding storage");
        if let Err(e) = self.storage.save(library.books()) {
            warn!(error = %e, "could not seed storage");
            self.outbox
                .borrow_mut()
                .notices
                .push(Notice::warning(format!("Could not save library: {}", e)));
        }
    }

    fn flush(&mut self) {
        let (snapshot, notices) = {
            let mut outbox = self.outbox.borrow_mut();
            (outbox.snapshot.take(), std::mem::take(&mut outbox.notices))
        };
        if let Some(books) = snapshot {
            self.view.display_library(&books);
        }
        for notice in notices {
            self.view.notify(notice);
        }
    }

    fn bind_view(&mut self) {
        let ctx = HandlerContext {
            library: Rc::clone(&self.library),
            storage: Rc::clone(&self.storage),
            outbox: Rc::clone(&self.outbox),
        };

        let add = ctx.clone();
        self.view.bind_add_book(move |props| add.add_book(props));

        let get = ctx.clone();
        let update = ctx.clone();
        self.view.bind_update_book(UpdateHandlers {
            handle_get: Box::new(move |id: BookId| get.get_book(id)),
            handle_update: Box::new(move |id: BookId, props: BookProps| {
                update.update_book(id, props)
            }),
        });

        let remove = ctx.clone();
        self.view.bind_remove_book(move |id| remove.remove_book(id));

        self.view.bind_status_change(move |id| ctx.toggle_status(id));
    }
}

/// What every bound handler closes over.
struct HandlerContext<K: KeyValueStore> {
    library: Rc<RefCell<Library>>,
    storage: Rc<AppStorage<K>>,
    outbox: SharedOutbox,
}

impl<K: KeyValueStore> Clone for HandlerContext<K> {
    fn clone(&self) -> Self {
        Self {
            library: Rc::clone(&self.library),
            storage: Rc::clone(&self.storage),
            outbox: Rc::clone(&self.outbox),
        }
    }
}

impl<K: KeyValueStore> HandlerContext<K> {
    fn add_book(&self, props: BookProps) -> Result<()> {
        let title = props.title.clone();
        {
            let mut library = self.library.borrow_mut();
            let book = library.create_book(props);
            let id = library.add_book(book);
            debug!(%id, "added book");
        }
        self.persist(Notice::success(format!("Added \"{}\"", title)));
        Ok(())
    }

    fn get_book(&self, id: BookId) -> Result<BookProps> {
        let library = self.library.borrow();
        let book = logged(library.get_book_by_id(id), "get")?;
        Ok(book.props())
    }

    fn update_book(&self, id: BookId, props: BookProps) -> Result<()> {
        let title = props.title.clone();
        logged(self.library.borrow_mut().update_book_by_id(id, props), "update")?;
        self.persist(Notice::success(format!("Updated \"{}\"", title)));
        Ok(())
    }

    fn remove_book(&self, id: BookId) -> Result<()> {
        let removed = logged(self.library.borrow_mut().remove_book_by_id(id), "remove")?;
        self.persist(Notice::success(format!("Removed \"{}\"", removed.title)));
        Ok(())
    }

    fn toggle_status(&self, id: BookId) -> Result<()> {
        let is_read = logged(
            self.library.borrow_mut().update_book_status_by_id(id),
            "status change",
        )?;
        let title = self.library.borrow().get_book_by_id(id)?.title.clone();
        let status = if is_read { "read" } else { "not read" };
        self.persist(Notice::success(format!("Marked \"{}\" as {}", title, status)));
        Ok(())
    }

    /// Saves the full list and queues `done`, or a warning if the save failed.
    fn persist(&self, done: Notice) {
        let saved = self.storage.save(self.library.borrow().books());
        let mut outbox = self.outbox.borrow_mut();
        outbox.notices.push(done);
        if let Err(e) = saved {
            warn!(error = %e, "save failed, change kept in memory only");
            outbox
                .notices
                .push(Notice::warning(format!("Could not save library: {}", e)));
        }
    }
}

fn logged<T>(result: Result<T>, action: &str) -> Result<T> {
    if let Err(e) = &result {
        match e {
            ShelfError::OutOfRange { .. } | ShelfError::BookNotFound(_) => {
                error!(error = %e, action, "library and table out of sync")
            }
            _ => error!(error = %e, action, "handler failed"),
        }
    }
    result
}

fn unavailable_message(reason: UnavailableReason) -> &'static str {
    match reason {
        UnavailableReason::Unsupported => "No storage configured; changes will not be saved",
        UnavailableReason::QuotaExceeded => "Storage is full; changes will not be saved",
        UnavailableReason::Failed => "Storage is unavailable; changes will not be saved",
        UnavailableReason::Unreadable => {
            "Stored library could not be read; changes will not be saved"
        }
    }
}
