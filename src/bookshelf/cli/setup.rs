use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "bookshelf", bin_name = "bookshelf", version)]
#[command(about = "A personal book library for the terminal", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Verbose output (debug logging on stderr)
    #[arg(short, long, global = true, help_heading = "Options")]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true, help_heading = "Options")]
    pub no_color: bool,

    /// Directory holding the library and its config
    #[arg(
        long,
        global = true,
        env = "BOOKSHELF_DATA",
        value_name = "DIR",
        help_heading = "Options"
    )]
    pub data_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the library
    #[command(alias = "ls", display_order = 1)]
    List,

    /// Add a book
    #[command(alias = "a", display_order = 2)]
    Add {
        /// Title words (joined with spaces)
        #[arg(required = true, num_args = 1..)]
        title: Vec<String>,

        #[arg(short, long)]
        author: String,

        /// Number of pages
        #[arg(short, long, allow_hyphen_values = true)]
        pages: String,

        /// Mark the book as already read
        #[arg(short, long)]
        read: bool,
    },

    /// Edit a book; fields not given keep their current value
    #[command(alias = "e", display_order = 3)]
    Edit {
        /// Row number (e.g. 2)
        row: String,

        #[arg(short, long)]
        title: Option<String>,

        #[arg(short, long)]
        author: Option<String>,

        #[arg(short, long, allow_hyphen_values = true)]
        pages: Option<String>,

        #[arg(long, conflicts_with = "unread")]
        read: bool,

        #[arg(long)]
        unread: bool,
    },

    /// Remove one or more books
    #[command(alias = "rm", display_order = 4)]
    Remove {
        /// Row numbers or ranges (e.g. 1 3-5)
        #[arg(required = true, num_args = 1..)]
        rows: Vec<String>,
    },

    /// Flip the read status of one or more books
    #[command(alias = "t", display_order = 5)]
    Toggle {
        /// Row numbers or ranges (e.g. 1 3-5)
        #[arg(required = true, num_args = 1..)]
        rows: Vec<String>,
    },

    /// Get or set configuration
    #[command(display_order = 10)]
    Config {
        /// Configuration key (library-name, seed-samples)
        key: Option<String>,

        /// Value to set (if omitted, prints current value)
        value: Option<String>,
    },

    /// Start an interactive session
    #[command(display_order = 11)]
    Shell,
}
