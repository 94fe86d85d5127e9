use assert_cmd::Command;

fn bookshelf() -> Command {
    let mut cmd = Command::cargo_bin("bookshelf").unwrap();
    cmd.env("BOOKSHELF_CONFIG_DIR", env!("CARGO_MANIFEST_DIR"))
        .env_remove("BOOKSHELF_ENV");
    cmd
}

#[test]
fn help_lists_commands() {
    let output = bookshelf().arg("--help").output().unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    for command in ["serve", "list", "show", "add", "edit", "delete"] {
        assert!(stdout.contains(command), "missing {command} in help");
    }
}

#[test]
fn add_rejects_blank_title_before_any_request() {
    // Nothing listens on port 9; validation must fail first.
    let output = bookshelf()
        .args(["--base-url", "http://127.0.0.1:9/", "add", "--title", "  ", "--author", "X"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("title must not be empty"), "stderr: {stderr}");
}

#[test]
fn edit_requires_a_field() {
    let output = bookshelf()
        .args(["--base-url", "http://127.0.0.1:9/", "edit", "1"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("nothing to change"), "stderr: {stderr}");
}

#[test]
fn unreachable_service_fails_list() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let output = bookshelf()
        .args(["--base-url", &format!("http://{addr}/"), "list"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed to load books"), "stderr: {stderr}");
}
