use assert_cmd::cargo_bin;
use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;
use std::time::Duration;

#[test]
fn test_cli_help_lists_configuration() {
    let mut cmd = Command::new(cargo_bin!("zapshift"));
    cmd.arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("--db-uri"))
        .stdout(predicate::str::contains("--client-url"))
        .stdout(predicate::str::contains("[env: PORT="));
}

#[test]
fn test_cli_rejects_invalid_port() {
    let mut cmd = Command::new(cargo_bin!("zapshift"));
    cmd.env_remove("PORT").arg("--port").arg("not-a-port");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("invalid value 'not-a-port'"));
}

#[cfg(not(feature = "storage-mongodb"))]
#[test]
fn test_mongodb_fallback_warning() {
    let mut cmd = assert_cmd::Command::new(cargo_bin!("zapshift"));
    cmd.env("RUST_LOG", "info")
        .env_remove("STRIPE_KEY")
        .args(["--db-uri", "mongodb://localhost:27017", "--port", "0"])
        .timeout(Duration::from_secs(2));

    cmd.assert()
        .interrupted()
        .stderr(predicate::str::contains(
            "Persistent storage requested via --db-uri, but 'storage-mongodb' feature is not enabled. Falling back to in-memory storage.",
        ))
        .stderr(predicate::str::contains("Server is running on port"));
}
