use assert_cmd::cargo::cargo_bin_cmd;
use tempfile::TempDir;

fn help_text(args: &[&str]) -> String {
    let mut cmd = cargo_bin_cmd!("imgpressctl");
    let output = cmd
        .args(args)
        .arg("--help")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    String::from_utf8_lossy(&output).into_owned()
}

#[test]
fn top_level_help_lists_commands() {
    let text = help_text(&[]);
    for command in ["login", "logout", "whoami", "images", "compressions"] {
        assert!(text.contains(command), "help missing '{command}'");
    }
}

#[test]
fn images_subcommands_present() {
    let text = help_text(&["images"]);
    for action in ["list", "upload", "show", "delete"] {
        assert!(text.contains(action), "images help missing '{action}'");
    }

    let upload = help_text(&["images", "upload"]);
    assert!(upload.contains("--name"), "upload help missing --name");
}

#[test]
fn compression_flags_are_documented() {
    let text = help_text(&["compressions", "add"]);
    assert!(text.contains("--quality"), "add help missing --quality");
    assert!(
        text.contains("--resize-width"),
        "add help missing --resize-width"
    );
}

#[test]
fn login_accepts_password_from_env() {
    let text = help_text(&["login"]);
    assert!(text.contains("--username"), "login help missing --username");
    assert!(
        text.contains("IMGPRESS_PASSWORD"),
        "login help should mention IMGPRESS_PASSWORD"
    );
}

#[test]
fn commands_fail_without_a_session() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let mut cmd = cargo_bin_cmd!("imgpressctl");
    let output = cmd
        .current_dir(dir.path())
        .env_remove("IMGPRESS_CONFIG")
        .env("IMGPRESS_API_URL", "http://127.0.0.1:9")
        .env("IMGPRESS_TOKEN_FILE", dir.path().join("session.json"))
        .args(["images", "list"])
        .assert()
        .failure()
        .get_output()
        .stderr
        .clone();
    let text = String::from_utf8_lossy(&output);
    assert!(text.contains("Not signed in"), "unexpected stderr: {text}");
}

#[test]
fn logout_without_a_session_succeeds() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let mut cmd = cargo_bin_cmd!("imgpressctl");
    cmd.current_dir(dir.path())
        .env_remove("IMGPRESS_CONFIG")
        .env("IMGPRESS_TOKEN_FILE", dir.path().join("session.json"))
        .arg("logout")
        .assert()
        .success();
}

#[test]
fn debug_logging_reports_the_api_url() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let mut cmd = cargo_bin_cmd!("imgpressctl");
    let output = cmd
        .current_dir(dir.path())
        .env_remove("IMGPRESS_CONFIG")
        .env("RUST_LOG", "imgpressctl=debug")
        .env("IMGPRESS_API_URL", "http://127.0.0.1:9")
        .env("IMGPRESS_TOKEN_FILE", dir.path().join("session.json"))
        .arg("logout")
        .assert()
        .success()
        .get_output()
        .stderr
        .clone();
    let text = String::from_utf8_lossy(&output);
    assert!(
        text.contains("Using API at http://127.0.0.1:9"),
        "unexpected stderr: {text}"
    );
    assert!(text.contains("Signing out"), "unexpected stderr: {text}");
}
