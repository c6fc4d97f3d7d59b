use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn bkmk(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("bkmk").unwrap();
    cmd.env("BKMK_FILE", dir.path().join("bkmk"));
    cmd
}

fn store(dir: &TempDir) -> String {
    std::fs::read_to_string(dir.path().join("bkmk")).unwrap()
}

// ---------------------------------------------------------------------------
// add
// ---------------------------------------------------------------------------

#[test]
fn add_with_title_writes_the_store() {
    let dir = TempDir::new().unwrap();
    bkmk(&dir)
        .args(["add", "https://example.com", "--title", "Example"])
        .assert()
        .success();

    let raw = store(&dir);
    assert!(raw.contains("\"Example\""));
    assert!(raw.contains("https://example.com"));
}

#[test]
fn ids_start_at_zero_and_increment() {
    let dir = TempDir::new().unwrap();
    bkmk(&dir)
        .args(["add", "https://a.example", "-t", "a"])
        .assert()
        .success();
    bkmk(&dir)
        .args(["add", "https://b.example", "-t", "b"])
        .assert()
        .success();

    let raw = store(&dir);
    assert!(raw.contains("\"id\": 0"));
    assert!(raw.contains("\"id\": 1"));
}

#[test]
fn duplicate_url_is_rejected() {
    let dir = TempDir::new().unwrap();
    bkmk(&dir)
        .args(["add", "https://example.com", "-t", "first"])
        .assert()
        .success();
    bkmk(&dir)
        .args(["add", "https://example.com", "-t", "second"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("repeated URL"));

    assert!(!store(&dir).contains("second"));
}

#[test]
fn trailing_slash_variant_is_still_a_duplicate() {
    let dir = TempDir::new().unwrap();
    bkmk(&dir)
        .args(["add", "https://example.com/page", "-t", "first"])
        .assert()
        .success();
    bkmk(&dir)
        .args(["add", "https://example.com/page/", "-t", "second"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("repeated URL"));
}

#[test]
fn unfetchable_url_with_empty_title_input_cancels() {
    let dir = TempDir::new().unwrap();
    // Nothing listens on this port, so the title fetch fails and the
    // prompt answer (empty) cancels the add.
    bkmk(&dir)
        .args(["add", "http://127.0.0.1:1/"])
        .write_stdin("\n")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("empty title"));

    assert!(!dir.path().join("bkmk").exists() || !store(&dir).contains("127.0.0.1"));
}

#[test]
fn unfetchable_url_with_typed_title_is_added() {
    let dir = TempDir::new().unwrap();
    bkmk(&dir)
        .args(["add", "http://127.0.0.1:1/"])
        .write_stdin("typed by hand\n")
        .assert()
        .success();

    let raw = store(&dir);
    assert!(raw.contains("typed by hand"));
}

#[test]
fn explicit_path_flag_beats_env_var() {
    let dir = TempDir::new().unwrap();
    let elsewhere = dir.path().join("elsewhere.json");
    bkmk(&dir)
        .args(["add", "https://example.com", "-t", "x"])
        .arg("--path")
        .arg(&elsewhere)
        .assert()
        .success();

    assert!(elsewhere.exists());
    assert!(!dir.path().join("bkmk").exists());
}

#[test]
fn corrupt_store_is_a_parse_error() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("bkmk"), "{not json").unwrap();
    bkmk(&dir)
        .args(["add", "https://example.com", "-t", "x"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("failed to load"));
}

#[test]
fn repeated_id_in_store_is_a_load_error() {
    let dir = TempDir::new().unwrap();
    let record = |id: u32, url: &str| {
        format!(
            r#"{{"id": {id}, "archived": false, "name": "n", "url": "{url}", "tags": []}}"#
        )
    };
    std::fs::write(
        dir.path().join("bkmk"),
        format!("[{},{}]", record(7, "https://a.example"), record(7, "https://b.example")),
    )
    .unwrap();

    bkmk(&dir)
        .args(["add", "https://c.example", "-t", "x"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("repeated ID"));
}

// ---------------------------------------------------------------------------
// menu (driven through a scripted $PICKER)
// ---------------------------------------------------------------------------

#[cfg(unix)]
mod menu {
    use super::*;
    use std::os::unix::fs::PermissionsExt;
    use std::path::PathBuf;

    /// A picker that answers the bookmark prompt with the first line and
    /// the action prompt with the requested action line.
    fn scripted_picker(dir: &TempDir, action_line: &str) -> PathBuf {
        let path = dir.path().join("picker");
        let body = format!(
            "#!/bin/sh\nawk 'NR==1 {{first=$0}} $0 == \"{action_line}\" {{found=1}} \
             END {{if (found) print \"{action_line}\"; else print first}}'\n"
        );
        std::fs::write(&path, body).unwrap();
        let mut perms = std::fs::metadata(&path).unwrap().permissions();
        perms.set_mode(0o755);
        std::fs::set_permissions(&path, perms).unwrap();
        path
    }

    fn seeded(dir: &TempDir) {
        bkmk(dir)
            .args(["add", "https://example.com", "-t", "Example"])
            .assert()
            .success();
    }

    #[test]
    fn menu_archive_marks_the_bookmark() {
        let dir = TempDir::new().unwrap();
        seeded(&dir);
        let picker = scripted_picker(&dir, "1 archive");

        bkmk(&dir).arg("menu").env("PICKER", &picker).assert().success();
        assert!(store(&dir).contains("\"archived\": true"));
    }

    #[test]
    fn menu_delete_removes_the_bookmark() {
        let dir = TempDir::new().unwrap();
        seeded(&dir);
        let picker = scripted_picker(&dir, "3 delete");

        bkmk(&dir).arg("menu").env("PICKER", &picker).assert().success();
        assert!(!store(&dir).contains("example.com"));
    }

    #[test]
    fn cancelled_picker_exits_one_silently() {
        let dir = TempDir::new().unwrap();
        seeded(&dir);
        let canceller = dir.path().join("canceller");
        std::fs::write(&canceller, "#!/bin/sh\ncat > /dev/null\nexit 130\n").unwrap();
        let mut perms = std::fs::metadata(&canceller).unwrap().permissions();
        perms.set_mode(0o755);
        std::fs::set_permissions(&canceller, perms).unwrap();

        bkmk(&dir)
            .arg("menu")
            .env("PICKER", &canceller)
            .assert()
            .failure()
            .code(1)
            .stderr(predicate::str::is_empty());
    }

    #[test]
    fn menu_with_no_unarchived_bookmarks_is_an_error() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("bkmk"), "[]").unwrap();
        bkmk(&dir)
            .arg("menu")
            .assert()
            .failure()
            .stderr(predicate::str::contains("no unarchived bookmarks"));
    }
}
