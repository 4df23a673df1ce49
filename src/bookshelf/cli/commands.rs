//! # CLI Layer
//!
//! The only place in the codebase that:
//! - knows about terminal I/O (stdout, stderr)
//! - handles argument parsing
//! - decides where the data directory is
//!
//! ## Responsibilities
//!
//! 1. **Argument Parsing**: convert shell arguments into typed commands via clap
//! 2. **Logging**: install the `tracing` subscriber on stderr
//! 3. **Context Setup**: resolve the data dir, load config, build the controller
//! 4. **Dispatch**: translate each command into UI events
//! 5. **Output**: print whatever the terminal surface collected

use super::render::{detect_color, Renderer, TerminalSurface};
use super::setup::{Cli, Commands};
use super::shell;
use bookshelf::config::{ConfigAction, ShelfConfig};
use bookshelf::controller::Controller;
use bookshelf::error::{Result, ShelfError};
use bookshelf::form::FormField;
use bookshelf::index::{parse_rows, DisplayIndex};
use bookshelf::model::Library;
use bookshelf::storage::fs::FsKeyValueStore;
use bookshelf::storage::AppStorage;
use bookshelf::view::{EventOutcome, Notice, UiEvent, View};
use clap::Parser;
use directories::ProjectDirs;
use std::path::PathBuf;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

pub type Shelf = Controller<FsKeyValueStore, TerminalSurface>;

const STORAGE_DIR: &str = "storage";

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.no_color);
    let ctx = init_context(&cli)?;

    match cli.command.unwrap_or(Commands::List) {
        Commands::List => handle_list(&ctx),
        Commands::Add {
            title,
            author,
            pages,
            read,
        } => handle_add(&ctx, title, author, pages, read),
        Commands::Edit {
            row,
            title,
            author,
            pages,
            read,
            unread,
        } => {
            let completed = match (read, unread) {
                (true, _) => Some(true),
                (_, true) => Some(false),
                _ => None,
            };
            handle_edit(&ctx, &row, title, author, pages, completed)
        }
        Commands::Remove { rows } => handle_rows(&ctx, &rows, |row| UiEvent::Remove { row }),
        Commands::Toggle { rows } => {
            handle_rows(&ctx, &rows, |row| UiEvent::ToggleStatus { row })
        }
        Commands::Config { key, value } => handle_config(&ctx, key, value),
        Commands::Shell => shell::run(ctx.open_shelf()),
    }
}

/// `RUST_LOG` wins; otherwise debug with `--verbose`, warnings only without.
fn init_logging(verbose: bool, no_color: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "warn" }));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_ansi(!no_color && console::Term::stderr().features().colors_supported())
        .try_init();
}

pub struct AppContext {
    pub data_dir: PathBuf,
    pub config: ShelfConfig,
    pub use_color: bool,
}

impl AppContext {
    /// Builds the controller on top of the on-disk store. Loading or seeding
    /// happens here, so only commands that touch the library call it.
    pub fn open_shelf(&self) -> Shelf {
        let name = self.config.library_name.as_str();
        let library = if self.config.seed_samples {
            Library::with_sample_books(name)
        } else {
            Library::new(name)
        };
        let surface = TerminalSurface::new(library.name(), self.use_color);
        let storage = AppStorage::new(FsKeyValueStore::new(self.data_dir.join(STORAGE_DIR)));
        Controller::new(library, View::new(surface), storage)
    }
}

fn init_context(cli: &Cli) -> Result<AppContext> {
    let data_dir = match &cli.data_dir {
        Some(dir) => dir.clone(),
        None => ProjectDirs::from("com", "bookshelf", "bookshelf")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .ok_or_else(|| ShelfError::Config("Could not determine data directory".into()))?,
    };
    debug!(data_dir = %data_dir.display(), "resolved data directory");

    let config = ShelfConfig::load(&data_dir).unwrap_or_else(|e| {
        warn!(error = %e, "ignoring unreadable config");
        ShelfConfig::default()
    });

    Ok(AppContext {
        data_dir,
        config,
        use_color: detect_color(cli.no_color),
    })
}

pub fn print_output(shelf: &mut Shelf) {
    let output = shelf.view_mut().surface_mut().take_output();
    if !output.is_empty() {
        print!("{}", output);
    }
}

fn handle_list(ctx: &AppContext) -> Result<()> {
    let mut shelf = ctx.open_shelf();
    print_output(&mut shelf);
    Ok(())
}

fn handle_add(
    ctx: &AppContext,
    title: Vec<String>,
    author: String,
    pages: String,
    read: bool,
) -> Result<()> {
    let mut shelf = ctx.open_shelf();
    shelf.dispatch(UiEvent::ShowAdd)?;
    fill_form(
        &mut shelf,
        [
            (FormField::Title, Some(title.join(" "))),
            (FormField::Author, Some(author)),
            (FormField::Pages, Some(pages)),
        ],
    )?;
    shelf.dispatch(UiEvent::SetCompleted(read))?;
    submit(&mut shelf)?;
    print_output(&mut shelf);
    Ok(())
}

fn handle_edit(
    ctx: &AppContext,
    row: &str,
    title: Option<String>,
    author: Option<String>,
    pages: Option<String>,
    completed: Option<bool>,
) -> Result<()> {
    let index: DisplayIndex = row.parse().map_err(ShelfError::InvalidIndex)?;
    let mut shelf = ctx.open_shelf();

    shelf.dispatch(UiEvent::ShowEdit { row: index.row() })?;
    fill_form(
        &mut shelf,
        [
            (FormField::Title, title),
            (FormField::Author, author),
            (FormField::Pages, pages),
        ],
    )?;
    if let Some(checked) = completed {
        shelf.dispatch(UiEvent::SetCompleted(checked))?;
    }
    submit(&mut shelf)?;
    print_output(&mut shelf);
    Ok(())
}

/// Sends `event(row)` for every requested row, highest row first. All rows are
/// checked against the table before anything changes.
fn handle_rows(ctx: &AppContext, args: &[String], event: impl Fn(usize) -> UiEvent) -> Result<()> {
    let mut shelf = ctx.open_shelf();
    let rows = parse_rows(args, shelf.view().rows().len())?;
    for row in rows {
        shelf.dispatch(event(row))?;
    }
    print_output(&mut shelf);
    Ok(())
}

fn handle_config(ctx: &AppContext, key: Option<String>, value: Option<String>) -> Result<()> {
    let renderer = Renderer::new(ctx.use_color);
    match ConfigAction::from_args(key, value) {
        ConfigAction::ShowAll => print!("{}", renderer.render_config(&ctx.config.entries())),
        ConfigAction::ShowKey(key) => match ctx.config.get(&key) {
            Some(value) => println!("{}", value),
            None => return Err(ShelfError::Config(format!("Unknown config key: {}", key))),
        },
        ConfigAction::Set(key, value) => {
            let mut config = ctx.config.clone();
            config.set(&key, &value)?;
            config.save(&ctx.data_dir)?;
            let shown = config.get(&key).unwrap_or(value);
            print!(
                "{}",
                renderer.render_notices(&[Notice::success(format!("{} set to {}", key, shown))])
            );
        }
    }
    Ok(())
}

fn fill_form<const N: usize>(
    shelf: &mut Shelf,
    fields: [(FormField, Option<String>); N],
) -> Result<()> {
    for (field, value) in fields {
        if let Some(value) = value {
            shelf.dispatch(UiEvent::Input { field, value })?;
        }
    }
    Ok(())
}

/// Submits the open form; a refused field becomes an error.
fn submit(shelf: &mut Shelf) -> Result<()> {
    match shelf.dispatch(UiEvent::Submit)? {
        EventOutcome::Rejected(invalid) => Err(invalid.into()),
        EventOutcome::Handled | EventOutcome::Ignored => Ok(()),
    }
}
