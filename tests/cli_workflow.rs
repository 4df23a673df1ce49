use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;

fn bookshelf(data_dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("bookshelf").unwrap();
    cmd.env("BOOKSHELF_DATA", data_dir)
        .env_remove("RUST_LOG")
        .arg("--no-color");
    cmd
}

#[test]
fn test_first_run_seeds_sample_books() {
    let temp_dir = tempfile::tempdir().unwrap();

    bookshelf(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("My Library"))
        .stdout(predicate::str::contains("The Hobbit"))
        .stdout(predicate::str::contains("Pride and Prejudice"))
        .stdout(predicate::str::contains("The Fault in Our Stars"))
        .stdout(predicate::str::contains("3 books, 1 read"));

    assert!(temp_dir.path().join("storage/libraryBooks.json").exists());
}

#[test]
fn test_add_then_list() {
    let temp_dir = tempfile::tempdir().unwrap();

    bookshelf(temp_dir.path())
        .args(["add", "the", "left", "hand", "of", "darkness"])
        .args(["-a", "ursula k. le guin", "-p", "304", "--read"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Added \"The Left Hand Of Darkness\"",
        ));

    bookshelf(temp_dir.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("Ursula K. Le Guin"))
        .stdout(predicate::str::contains("4 books, 2 read"));
}

#[test]
fn test_add_with_bad_page_count_fails() {
    let temp_dir = tempfile::tempdir().unwrap();

    bookshelf(temp_dir.path())
        .args(["add", "Dune", "-a", "Frank Herbert", "-p", "lots"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Error: Invalid page count"));

    bookshelf(temp_dir.path())
        .arg("ls")
        .assert()
        .success()
        .stdout(predicate::str::contains("Dune").not())
        .stdout(predicate::str::contains("3 books"));
}

#[test]
fn test_negative_page_count_is_refused() {
    let temp_dir = tempfile::tempdir().unwrap();

    bookshelf(temp_dir.path())
        .args(["add", "Dune", "-a", "Frank Herbert", "-p", "-5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("must not be negative"));
}

#[test]
fn test_edit_replaces_fields() {
    let temp_dir = tempfile::tempdir().unwrap();

    bookshelf(temp_dir.path())
        .args(["edit", "1", "--title", "the hobbit, or there and back again", "--read"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Updated \"The Hobbit, Or There And Back Again\"",
        ));

    bookshelf(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("J.R.R. Tolkien"))
        .stdout(predicate::str::contains("3 books, 2 read"));
}

#[test]
fn test_edit_unknown_row_fails() {
    let temp_dir = tempfile::tempdir().unwrap();

    bookshelf(temp_dir.path())
        .args(["edit", "9", "--title", "Nothing"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No row 9"));

    bookshelf(temp_dir.path())
        .args(["edit", "zero"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid row number"));
}

#[test]
fn test_remove_range() {
    let temp_dir = tempfile::tempdir().unwrap();

    bookshelf(temp_dir.path())
        .args(["rm", "1-2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed \"The Hobbit\""))
        .stdout(predicate::str::contains("Removed \"Pride and Prejudice\""));

    bookshelf(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("The Hobbit").not())
        .stdout(predicate::str::contains("1 book, 1 read"));
}

#[test]
fn test_remove_checks_every_row_first() {
    let temp_dir = tempfile::tempdir().unwrap();

    bookshelf(temp_dir.path())
        .args(["rm", "1", "7"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No row 7 in the current table"));

    bookshelf(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("The Hobbit"))
        .stdout(predicate::str::contains("3 books"));
}

#[test]
fn test_huge_range_is_refused_without_expanding() {
    let temp_dir = tempfile::tempdir().unwrap();

    bookshelf(temp_dir.path())
        .args(["rm", "1-4000000000000"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("No row 4 in the current table"));

    bookshelf(temp_dir.path())
        .arg("shell")
        .write_stdin("toggle 2-4000000000000\ntoggle 1\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("No row 4 in the current table"))
        .stdout(predicate::str::contains("Marked \"The Hobbit\" as read"));
}

#[test]
fn test_toggle_flips_status() {
    let temp_dir = tempfile::tempdir().unwrap();

    bookshelf(temp_dir.path())
        .args(["toggle", "3"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Marked \"The Fault in Our Stars\" as not read",
        ))
        .stdout(predicate::str::contains("3 books, 0 read"));

    bookshelf(temp_dir.path())
        .args(["t", "3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("as read"))
        .stdout(predicate::str::contains("3 books, 1 read"));
}

#[test]
fn test_config_show_and_set() {
    let temp_dir = tempfile::tempdir().unwrap();

    bookshelf(temp_dir.path())
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("library-name = My Library"))
        .stdout(predicate::str::contains("seed-samples = true"));

    bookshelf(temp_dir.path())
        .args(["config", "library-name", "Reading Room"])
        .assert()
        .success()
        .stdout(predicate::str::contains("library-name set to Reading Room"));

    bookshelf(temp_dir.path())
        .args(["config", "library-name"])
        .assert()
        .success()
        .stdout("Reading Room\n");

    bookshelf(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Reading Room"));
}

#[test]
fn test_config_without_samples_starts_empty() {
    let temp_dir = tempfile::tempdir().unwrap();

    bookshelf(temp_dir.path())
        .args(["config", "seed-samples", "no"])
        .assert()
        .success();

    bookshelf(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("No books yet."));
}

#[test]
fn test_config_rejects_unknown_key() {
    let temp_dir = tempfile::tempdir().unwrap();

    bookshelf(temp_dir.path())
        .args(["config", "colour", "blue"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Config error"));
}

#[test]
fn test_shell_session_adds_a_book() {
    let temp_dir = tempfile::tempdir().unwrap();

    bookshelf(temp_dir.path())
        .arg("shell")
        .write_stdin("add\ntitle dune\nauthor frank herbert\npages 412\nsubmit\nquit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Added \"Dune\""))
        .stdout(predicate::str::contains("Frank Herbert"))
        .stdout(predicate::str::contains("4 books, 1 read"));

    bookshelf(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Dune"));
}

#[test]
fn test_shell_keeps_form_open_after_bad_input() {
    let temp_dir = tempfile::tempdir().unwrap();

    bookshelf(temp_dir.path())
        .arg("shell")
        .write_stdin("add\ntitle dune\npages 4.5\nsubmit\npages 412\nsubmit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("must be a whole number"))
        .stdout(predicate::str::contains("Added \"Dune\""));
}

#[test]
fn test_shell_reports_errors_and_carries_on() {
    let temp_dir = tempfile::tempdir().unwrap();

    bookshelf(temp_dir.path())
        .arg("shell")
        .write_stdin("frobnicate\nrm 12\ntoggle 1\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Unknown command: frobnicate"))
        .stdout(predicate::str::contains("Marked \"The Hobbit\" as read"));
}
