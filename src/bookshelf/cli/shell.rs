//! Interactive session: one controller, one command per line.
//!
//! Errors are reported and the session carries on; only `quit` or end of input
//! ends it. The prompt is printed only when stdin is a terminal, so scripted
//! sessions (`bookshelf shell < script`) produce clean output.

use super::commands::{print_output, Shelf};
use bookshelf::error::{Result, ShelfError};
use bookshelf::form::FormField;
use bookshelf::index::{parse_rows, DisplayIndex};
use bookshelf::view::{EventOutcome, FormMode, ModalState, Notice, UiEvent};
use std::io::{self, BufRead, IsTerminal, Write};
use tracing::debug;

const HELP: &[(&str, &str)] = &[
    ("list", "Show the library"),
    ("add", "Open the form to add a book"),
    ("edit <ROW>", "Open the form on an existing book"),
    ("title <TEXT>", "Set the title in the open form"),
    ("author <TEXT>", "Set the author in the open form"),
    ("pages <N>", "Set the page count in the open form"),
    ("read [yes|no]", "Set the read checkbox in the open form"),
    ("form", "Show the open form"),
    ("submit", "Save the open form"),
    ("cancel", "Discard the open form"),
    ("close", "Discard the open form"),
    ("rm <ROWS>...", "Remove books (e.g. rm 1 3-4)"),
    ("toggle <ROWS>...", "Flip read status"),
    ("help", "Show this help"),
    ("quit", "Leave the shell"),
];

#[derive(Debug, Clone, PartialEq, Eq)]
enum ShellCommand {
    Empty,
    List,
    Add,
    Edit(String),
    Set(FormField, String),
    Read(bool),
    Form,
    Submit,
    Cancel,
    Close,
    Remove(Vec<String>),
    Toggle(Vec<String>),
    Help,
    Quit,
}

fn parse_command(line: &str) -> std::result::Result<ShellCommand, String> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };
    let args = || rest.split_whitespace().map(str::to_string).collect::<Vec<_>>();
    let needs = |what: &str| -> std::result::Result<String, String> {
        if rest.is_empty() {
            Err(format!("{} needs {}", word, what))
        } else {
            Ok(rest.to_string())
        }
    };

    let command = match word.to_ascii_lowercase().as_str() {
        "" => ShellCommand::Empty,
        "list" | "ls" => ShellCommand::List,
        "add" | "new" => ShellCommand::Add,
        "edit" => ShellCommand::Edit(needs("a row number")?),
        "title" => ShellCommand::Set(FormField::Title, rest.to_string()),
        "author" => ShellCommand::Set(FormField::Author, rest.to_string()),
        "pages" => ShellCommand::Set(FormField::Pages, rest.to_string()),
        "read" => match rest.to_ascii_lowercase().as_str() {
            "" | "yes" | "y" | "true" => ShellCommand::Read(true),
            "no" | "n" | "false" => ShellCommand::Read(false),
            other => return Err(format!("read expects yes or no, got \"{}\"", other)),
        },
        "form" => ShellCommand::Form,
        "submit" | "save" => ShellCommand::Submit,
        "cancel" => ShellCommand::Cancel,
        "close" => ShellCommand::Close,
        "rm" | "remove" => {
            needs("row numbers")?;
            ShellCommand::Remove(args())
        }
        "toggle" => {
            needs("row numbers")?;
            ShellCommand::Toggle(args())
        }
        "help" | "?" => ShellCommand::Help,
        "quit" | "exit" | "q" => ShellCommand::Quit,
        other => return Err(format!("Unknown command: {} (try help)", other)),
    };
    Ok(command)
}

pub fn run(mut shelf: Shelf) -> Result<()> {
    let interactive = io::stdin().is_terminal();
    print_output(&mut shelf);

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        if interactive {
            print!("{}", prompt(&shelf));
            io::stdout().flush()?;
        }
        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;

        match parse_command(&line) {
            Ok(ShellCommand::Quit) => break,
            Ok(command) => {
                debug!(?command, "shell command");
                if let Err(e) = execute(&mut shelf, command) {
                    shelf.view_mut().notify(Notice::error(e.to_string()));
                }
            }
            Err(message) => shelf.view_mut().notify(Notice::error(message)),
        }
        print_output(&mut shelf);
    }
    Ok(())
}

fn prompt(shelf: &Shelf) -> String {
    match shelf.view().modal() {
        ModalState::Closed => "bookshelf> ".to_string(),
        ModalState::Open(FormMode::Add) => "bookshelf (add)> ".to_string(),
        ModalState::Open(FormMode::Edit(id)) => format!("bookshelf (edit {})> ", id),
    }
}

fn execute(shelf: &mut Shelf, command: ShellCommand) -> Result<()> {
    match command {
        ShellCommand::Empty | ShellCommand::Quit => {}
        ShellCommand::List => {
            let books = shelf.library().books().to_vec();
            shelf.view_mut().display_library(&books);
        }
        ShellCommand::Add => {
            let outcome = shelf.dispatch(UiEvent::ShowAdd)?;
            explain_ignored(shelf, outcome, "Finish or cancel the open form first");
        }
        ShellCommand::Edit(arg) => {
            let index: DisplayIndex = arg.parse().map_err(ShelfError::InvalidIndex)?;
            let outcome = shelf.dispatch(UiEvent::ShowEdit { row: index.row() })?;
            explain_ignored(shelf, outcome, "Finish or cancel the open form first");
        }
        ShellCommand::Set(field, value) => {
            let outcome = shelf.dispatch(UiEvent::Input { field, value })?;
            explain_ignored(shelf, outcome, "No form is open (use add or edit)");
        }
        ShellCommand::Read(checked) => {
            let outcome = shelf.dispatch(UiEvent::SetCompleted(checked))?;
            explain_ignored(shelf, outcome, "No form is open (use add or edit)");
        }
        ShellCommand::Form => show_form(shelf),
        ShellCommand::Submit => {
            let outcome = shelf.dispatch(UiEvent::Submit)?;
            explain_ignored(shelf, outcome, "Nothing to submit");
        }
        ShellCommand::Cancel => {
            shelf.dispatch(UiEvent::Cancel)?;
        }
        ShellCommand::Close => {
            shelf.dispatch(UiEvent::Close)?;
        }
        ShellCommand::Remove(args) => {
            for row in parse_rows(&args, shelf.view().rows().len())? {
                shelf.dispatch(UiEvent::Remove { row })?;
            }
        }
        ShellCommand::Toggle(args) => {
            for row in parse_rows(&args, shelf.view().rows().len())? {
                shelf.dispatch(UiEvent::ToggleStatus { row })?;
            }
        }
        ShellCommand::Help => {
            print!("{}", shelf.view().surface().renderer().render_help(HELP));
        }
    }
    Ok(())
}

fn explain_ignored(shelf: &mut Shelf, outcome: EventOutcome, why: &str) {
    if outcome == EventOutcome::Ignored {
        shelf.view_mut().notify(Notice::info(why));
    }
}

/// Prints the form as it currently stands, including the flagged field's reason.
fn show_form(shelf: &mut Shelf) {
    let ModalState::Open(mode) = shelf.view().modal() else {
        shelf
            .view_mut()
            .notify(Notice::info("No form is open (use add or edit)"));
        return;
    };
    let view = shelf.view();
    let invalid = view
        .form()
        .read()
        .err()
        .filter(|invalid| Some(invalid.field) == view.flagged());
    let output = view
        .surface()
        .renderer()
        .render_modal(mode, view.form(), invalid.as_ref());
    print!("{}", output);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_commands() {
        assert_eq!(parse_command("  "), Ok(ShellCommand::Empty));
        assert_eq!(parse_command("LS"), Ok(ShellCommand::List));
        assert_eq!(parse_command("save"), Ok(ShellCommand::Submit));
        assert_eq!(parse_command("exit"), Ok(ShellCommand::Quit));
    }

    #[test]
    fn test_parse_field_values_keep_inner_spaces() {
        assert_eq!(
            parse_command("title  the lord of the rings "),
            Ok(ShellCommand::Set(FormField::Title, "the lord of the rings".into()))
        );
        assert_eq!(
            parse_command("pages"),
            Ok(ShellCommand::Set(FormField::Pages, String::new()))
        );
    }

    #[test]
    fn test_parse_read_flag() {
        assert_eq!(parse_command("read"), Ok(ShellCommand::Read(true)));
        assert_eq!(parse_command("read no"), Ok(ShellCommand::Read(false)));
        assert!(parse_command("read sometimes").is_err());
    }

    #[test]
    fn test_parse_rows() {
        assert_eq!(
            parse_command("rm 1 3-4"),
            Ok(ShellCommand::Remove(vec!["1".into(), "3-4".into()]))
        );
        assert!(parse_command("toggle").is_err());
        assert!(parse_command("edit").is_err());
    }

    #[test]
    fn test_unknown_command() {
        let err = parse_command("frobnicate 3").unwrap_err();
        assert!(err.contains("Unknown command: frobnicate"));
    }
}
