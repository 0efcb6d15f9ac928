use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn logbook(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("logbook").unwrap();
    cmd.env("LOGBOOK_HOME", home.path())
        .env("NO_COLOR", "1")
        .env_remove("LOGBOOK_LOG");
    cmd
}

#[test]
fn test_create_then_list_across_runs() {
    let home = TempDir::new().unwrap();

    logbook(&home)
        .args(["create", "first words"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""text":"first words""#))
        .stdout(predicate::str::contains(r#""error":null"#));

    logbook(&home).args(["create", "second"]).assert().success();

    logbook(&home)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""entries":["#))
        .stdout(predicate::str::is_match(r#"second.*first words"#).unwrap());

    assert!(home.path().join("logbook.db").exists());
}

#[test]
fn test_search_prints_only_matches() {
    let home = TempDir::new().unwrap();
    for text in ["foo", "bar", "baz"] {
        logbook(&home).args(["create", text]).assert().success();
    }

    logbook(&home)
        .args(["search", "foo"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""text":"foo""#))
        .stdout(predicate::str::contains(r#""text":"bar""#).not());
}

#[test]
fn test_update_and_delete_entry() {
    let home = TempDir::new().unwrap();
    logbook(&home).args(["create", "draft"]).assert().success();

    logbook(&home)
        .args(["update", "1", "final", "--color", "3"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""text":"final""#))
        .stdout(predicate::str::contains(r#""color":3"#));

    logbook(&home)
        .args(["delete", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#"{"entries":[],"error":null}"#));
}

#[test]
fn test_failures_exit_nonzero_with_envelope() {
    let home = TempDir::new().unwrap();

    logbook(&home)
        .args(["--backend", "documents", "update", "42", "nothing"])
        .assert()
        .failure()
        .stdout(predicate::str::contains(r#""documents":null"#))
        .stderr(predicate::str::contains("NotFound"));
}

#[test]
fn test_unknown_backend_is_rejected() {
    let home = TempDir::new().unwrap();

    logbook(&home)
        .args(["--backend", "gamma", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("backend 'gamma' not registered"));
}

#[test]
fn test_document_commands() {
    let home = TempDir::new().unwrap();

    logbook(&home)
        .args(["doc", "save", "foo", "--id", "X", "--type", "post", "--tag", "foo"])
        .assert()
        .success();
    logbook(&home)
        .args(["doc", "save", "bar", "--id", "X"])
        .assert()
        .success();

    logbook(&home)
        .args(["doc", "get", "X"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""text": "bar""#))
        .stdout(predicate::str::contains(r#""text": "foo""#));

    logbook(&home)
        .args(["doc", "list", "--tag", "foo"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[]"));

    logbook(&home)
        .args(["doc", "delete", "X"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted X"));

    logbook(&home)
        .args(["doc", "get", "X"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Not found: document X"));
}

#[test]
fn test_doc_save_mints_identifier() {
    let home = TempDir::new().unwrap();

    logbook(&home)
        .args(["doc", "save", "untitled", "--tag", "inbox"])
        .assert()
        .success()
        .stdout(predicate::str::is_match(r#""identifier": "[0-9a-f-]{36}""#).unwrap());

    logbook(&home)
        .args(["doc", "list", "--tag", "inbox"])
        .assert()
        .success()
        .stdout(predicate::str::contains("untitled"));
}

#[test]
fn test_config_selects_backend() {
    let home = TempDir::new().unwrap();

    logbook(&home)
        .args(["config", "backend", "documents"])
        .assert()
        .success();
    assert!(home.path().join("config.json").exists());

    logbook(&home)
        .args(["create", "as a document"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""documents":["#));

    logbook(&home)
        .args(["config", "backend", "gamma"])
        .assert()
        .failure();

    logbook(&home)
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("backend = documents"));
}

#[test]
fn test_db_flag_overrides_config() {
    let home = TempDir::new().unwrap();
    let db = home.path().join("elsewhere").join("other.db");

    logbook(&home)
        .args(["--db", db.to_str().unwrap(), "create", "routed"])
        .assert()
        .success();

    assert!(db.exists());
    assert!(!home.path().join("logbook.db").exists());
}
