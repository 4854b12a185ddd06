use std::{
    net::{TcpListener, TcpStream},
    process::{Child, Stdio},
    thread,
    time::Duration,
};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Shell bound to a database file inside `dir`.
struct Shell {
    _dir: TempDir,
    db: String,
}

impl Shell {
    fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temporary directory");
        let db = dir.path().join("cli_test.db").to_str().unwrap().to_string();
        Self { _dir: dir, db }
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("planner").expect("Failed to find planner binary");
        cmd.args(["--no-color", "--db-config", &self.db]);
        cmd
    }

    /// Runs a create command and returns the new ID.
    fn create(&self, args: &[&str]) -> String {
        let output = self.cmd().args(args).output().unwrap();
        assert!(
            output.status.success(),
            "{}",
            String::from_utf8_lossy(&output.stderr)
        );
        id_from(&String::from_utf8_lossy(&output.stdout))
    }
}

fn id_from(stdout: &str) -> String {
    stdout
        .lines()
        .find_map(|line| line.split_once("with ID: ").map(|(_, id)| id.trim()))
        .expect("no ID in output")
        .to_string()
}

#[test]
fn test_cli_create_and_show_area() {
    let shell = Shell::new();

    shell
        .cmd()
        .args(["area", "create", "Home", "--description", "House and garden"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created area with ID: "))
        .stdout(predicate::str::contains("# Home"))
        .stdout(predicate::str::contains("House and garden"));

    let id = shell.create(&["area", "create", "Work"]);
    shell
        .cmd()
        .args(["area", "show", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains("# Work"))
        .stdout(predicate::str::contains(format!("- ID: {id}")));
}

#[test]
fn test_cli_list_empty() {
    let shell = Shell::new();

    shell
        .cmd()
        .args(["area", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No areas found."));
    shell
        .cmd()
        .args(["task", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No tasks found."));
}

#[test]
fn test_cli_default_command_lists_areas() {
    let shell = Shell::new();
    shell.create(&["area", "create", "Home"]);

    shell
        .cmd()
        .assert()
        .success()
        .stdout(predicate::str::contains("Home"));
}

#[test]
fn test_cli_hierarchy_and_filters() {
    let shell = Shell::new();
    let home = shell.create(&["area", "create", "Home"]);
    let work = shell.create(&["area", "create", "Work"]);
    let renovation = shell.create(&["project", "create", "Renovation", "--area", &home]);
    shell.create(&["project", "create", "Quarterly report", "--area", &work]);
    shell.create(&[
        "task",
        "create",
        "Buy paint",
        "--project",
        &renovation,
        "--notes",
        "Two coats",
    ]);

    shell
        .cmd()
        .args(["project", "list", "--area", &home])
        .assert()
        .success()
        .stdout(predicate::str::contains("Renovation"))
        .stdout(predicate::str::contains("Quarterly report").not());

    shell
        .cmd()
        .args(["project", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Renovation"))
        .stdout(predicate::str::contains("Quarterly report"));

    shell
        .cmd()
        .args(["task", "list", "--project", &renovation])
        .assert()
        .success()
        .stdout(predicate::str::contains("Buy paint"));
}

#[test]
fn test_cli_create_under_missing_parent_fails() {
    let shell = Shell::new();

    shell
        .cmd()
        .args(["project", "create", "Renovation", "--area", "missing"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to create project"))
        .stderr(predicate::str::contains("area not found: missing"));

    shell
        .cmd()
        .args(["project", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No projects found."));
}

#[test]
fn test_cli_empty_name_is_rejected() {
    let shell = Shell::new();

    shell
        .cmd()
        .args(["area", "create", ""])
        .assert()
        .failure()
        .stderr(predicate::str::contains("name"));
}

#[test]
fn test_cli_update_task() {
    let shell = Shell::new();
    let home = shell.create(&["area", "create", "Home"]);
    let renovation = shell.create(&["project", "create", "Renovation", "--area", &home]);
    let paint = shell.create(&["task", "create", "Buy paint", "--project", &renovation]);

    shell
        .cmd()
        .args(["task", "update", &paint, "--notes", "Two coats"])
        .assert()
        .success()
        .stdout(predicate::str::contains(format!(
            "Updated task with ID: {paint}"
        )))
        .stdout(predicate::str::contains("- notes"))
        .stdout(predicate::str::contains("# Buy paint"))
        .stdout(predicate::str::contains("Two coats"));
}

#[test]
fn test_cli_delete_detaches_children() {
    let shell = Shell::new();
    let home = shell.create(&["area", "create", "Home"]);
    let renovation = shell.create(&["project", "create", "Renovation", "--area", &home]);

    shell
        .cmd()
        .args(["area", "delete", &home])
        .assert()
        .success()
        .stdout(predicate::str::contains(format!(
            "Deleted area with ID: {home}"
        )));

    shell
        .cmd()
        .args(["project", "show", &renovation])
        .assert()
        .success()
        .stdout(predicate::str::contains(format!("- Area: {home}")));

    shell
        .cmd()
        .args(["area", "delete", &home])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_cli_postgres_requires_connection_string() {
    Command::cargo_bin("planner")
        .unwrap()
        .args(["--db-kind", "postgres", "area", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--db-config"));
}

/// `planner serve` child process, killed on drop.
struct Server(Child);

impl Drop for Server {
    fn drop(&mut self) {
        self.0.kill().ok();
        self.0.wait().ok();
    }
}

fn free_port() -> u16 {
    TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port()
}

#[test]
fn test_cli_remote_mode_talks_to_serve() {
    let shell = Shell::new();
    let port = free_port();
    let child = std::process::Command::new(assert_cmd::cargo::cargo_bin("planner"))
        .args([
            "--db-config",
            &shell.db,
            "serve",
            "--host",
            "127.0.0.1",
            "--port",
            &port.to_string(),
        ])
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .unwrap();
    let _server = Server(child);

    let address = format!("127.0.0.1:{port}");
    let mut ready = false;
    for _ in 0..100 {
        if TcpStream::connect(&address).is_ok() {
            ready = true;
            break;
        }
        thread::sleep(Duration::from_millis(50));
    }
    assert!(ready, "server did not start");

    let remote = |args: &[&str]| {
        let mut cmd = Command::cargo_bin("planner").unwrap();
        cmd.args(["--no-color", "--server", &address]).args(args);
        cmd
    };

    let output = remote(&["area", "create", "Home"]).output().unwrap();
    assert!(output.status.success());
    let id = id_from(&String::from_utf8_lossy(&output.stdout));

    remote(&["area", "show", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains("# Home"));
}

#[test]
fn test_cli_remote_mode_without_server_fails() {
    let port = free_port();
    Command::cargo_bin("planner")
        .unwrap()
        .args(["--server", &format!("127.0.0.1:{port}"), "area", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to list areas"));
}
