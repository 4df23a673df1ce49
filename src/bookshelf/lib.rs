//! # Bookshelf Architecture
//!
//! Bookshelf is a **personal book library** built around a classic Model-View-Controller
//! split. The terminal client in `cli/` is one UI over it; the library itself never
//! touches stdout, stderr or the process.
//!
//! ## The Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI (cli/, wired by main.rs)                               │
//! │  - Parses arguments, turns them into UI events              │
//! │  - Implements `Surface` for the terminal                    │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Controller (controller.rs)                                 │
//! │  - Owns model, view and storage; wires them at startup      │
//! │  - Handlers: mutate the model, then persist the snapshot    │
//! └─────────────────────────────────────────────────────────────┘
//!              │                               │
//!              ▼                               ▼
//! ┌─────────────────────────────┐ ┌─────────────────────────────┐
//! │  Model (model.rs)           │ │  View (view.rs, form.rs)    │
//! │  - Ordered books, ids       │ │  - Table rows, modal state  │
//! │  - Change notification      │ │  - Form parsing, events     │
//! └─────────────────────────────┘ └─────────────────────────────┘
//!              │
//!              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage (storage/)                                         │
//! │  - `KeyValueStore` trait: FsKeyValueStore, MemKeyValueStore │
//! │  - `AppStorage`: availability probe, snapshot load/save     │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Data Flow
//!
//! A UI event goes to [`view::View::handle`]. Events that change the library call the
//! handler the controller bound for them, with the [`model::BookId`] of the row
//! involved. The handler mutates the [`model::Library`], which notifies its change
//! subscriber with the full list; the controller then saves that list and the view
//! re-renders it once per event.
//!
//! ## Testing Strategy
//!
//! 1. **Model, form, index, config**: unit tests next to the code.
//! 2. **View and controller**: driven through `test_utils::RecordingSurface` over an
//!    in-memory store, so every render and notice can be asserted on.
//! 3. **Storage**: the filesystem store is tested against temp dirs; the memory
//!    store can simulate quota and write failures.
//! 4. **CLI**: argument parsing and rendering in unit tests, whole commands through
//!    the binary in `tests/`.
//!
//! ## Module Overview
//!
//! - [`model`]: books, ids and the library
//! - [`form`]: raw form values and how they become book fields
//! - [`view`]: the table and modal state machine, UI events, the `Surface` trait
//! - [`controller`]: startup wiring and the mutation handlers
//! - [`storage`]: key/value stores and the snapshot adapter
//! - [`index`]: 1-based row numbers and ranges as typed by users
//! - [`config`]: user configuration
//! - [`error`]: error types
//! - `cli`: argument parsing, rendering and the interactive shell (not part of the lib API)

pub mod config;
pub mod controller;
pub mod error;
pub mod form;
pub mod index;
pub mod model;
pub mod storage;
pub mod view;

#[cfg(any(test, feature = "test_utils"))]
pub mod test_utils;
