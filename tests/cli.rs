use assert_cmd::prelude::*; // Add methods on commands
use predicates::prelude::*; // Used for writing assertions
use std::fs;
use std::path::Path;
use std::process::Command; // Run programs

use backupr::backup::archive_entries;
use tempfile::TempDir;

const CARGO_BIN: &str = "backupr";

fn backupr(config_dir: &Path) -> Result<Command, Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin(CARGO_BIN)?;
    cmd.env("BACKUPR_CONFIG_DIR", config_dir)
        .env("NO_COLOR", "1")
        .env_remove("BACKUPR_DB_PASSWORD")
        .env_remove("BACKUPR_MAIL_FROM")
        .env_remove("BACKUPR_MAIL_SECRET");
    Ok(cmd)
}

fn write_settings(config_dir: &Path, dump_program: &str) {
    let settings = serde_json::json!({ "dump_program": dump_program, "color": "never" });
    fs::write(config_dir.join("config.json"), settings.to_string()).unwrap();
}

#[test]
fn help() -> Result<(), Box<dyn std::error::Error>> {
    let config = TempDir::new()?;
    let mut cmd = backupr(config.path())?;

    cmd.arg("--help");
    cmd.assert().success().stdout(predicate::str::contains("Usage: "));

    Ok(())
}

#[test]
fn run_requires_database_and_user() -> Result<(), Box<dyn std::error::Error>> {
    let config = TempDir::new()?;
    let mut cmd = backupr(config.path())?;

    cmd.arg("run");
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("--database"));

    Ok(())
}

#[test]
fn config_shows_settings() -> Result<(), Box<dyn std::error::Error>> {
    let config = TempDir::new()?;
    write_settings(config.path(), "/opt/mysql/bin/mysqldump");

    let mut cmd = backupr(config.path())?;
    cmd.arg("config");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("/opt/mysql/bin/mysqldump"))
        .stdout(predicate::str::contains("smtp.gmail.com:587"));

    Ok(())
}

#[test]
fn init_writes_settings_once() -> Result<(), Box<dyn std::error::Error>> {
    let config = TempDir::new()?;

    backupr(config.path())?
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Settings written to"));
    assert!(config.path().join("config.json").exists());

    backupr(config.path())?
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exist"));

    Ok(())
}

#[test]
fn failed_dump_leaves_no_archive() -> Result<(), Box<dyn std::error::Error>> {
    let config = TempDir::new()?;
    let destination = TempDir::new()?;
    write_settings(config.path(), "backupr-no-such-dump-program");

    let mut cmd = backupr(config.path())?;
    cmd.args(["run", "-d", "orders", "-u", "root", "-y", "--notify"])
        .arg("--dir")
        .arg(destination.path())
        .args(["--to", "ops@example.com", "--from", "robot@example.com"])
        .args(["--mail-secret", "secret"]);

    cmd.assert()
        .code(1)
        .stdout(predicate::str::contains("Backup failed: Database dump failed"))
        .stdout(predicate::str::contains("Message sent").not());

    assert_eq!(fs::read_dir(destination.path())?.count(), 0);

    let history = fs::read_to_string(config.path().join("runs.log"))?;
    assert!(history.contains("\"status\":\"failed\""));

    Ok(())
}

#[cfg(unix)]
#[test]
fn run_archives_dump_and_removes_it() -> Result<(), Box<dyn std::error::Error>> {
    use std::os::unix::fs::PermissionsExt;

    let config = TempDir::new()?;
    let work = TempDir::new()?;
    let destination = work.path().join("backups");

    // Stand-in for mysqldump that echoes its arguments as the dump
    let script = work.path().join("fake-mysqldump");
    fs::write(&script, "#!/bin/sh\necho \"-- args: $*\"\necho \"CREATE TABLE t (id INT);\"\n")?;
    fs::set_permissions(&script, fs::Permissions::from_mode(0o755))?;
    write_settings(config.path(), script.to_str().unwrap());

    let mut cmd = backupr(config.path())?;
    cmd.args(["run", "-d", "orders", "-u", "root", "-H", "127.0.0.1", "-y"])
        .arg("--dir")
        .arg(&destination);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Created archive at"))
        .stdout(predicate::str::contains("Deleted SQL file"))
        .stdout(predicate::str::contains("Your backup is complete!"));

    let files: Vec<_> = fs::read_dir(&destination)?
        .map(|entry| entry.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    assert_eq!(files.len(), 1, "only the archive remains: {:?}", files);
    let archive_name = &files[0];
    assert!(archive_name.starts_with("db-orders-backup-"));
    assert!(archive_name.ends_with(".sql.tar.gz"));

    let entries = archive_entries(&destination.join(archive_name))?;
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].name, archive_name.trim_end_matches(".tar.gz"));

    let dump = String::from_utf8(entries[0].contents.clone())?;
    assert!(dump.contains("--database orders"));
    assert!(dump.contains("-uroot"));
    assert!(!dump.contains(" -p"));
    assert!(dump.contains("CREATE TABLE t"));

    backupr(config.path())?
        .arg("history")
        .assert()
        .success()
        .stdout(predicate::str::contains("orders"))
        .stdout(predicate::str::contains("OK"));

    Ok(())
}
