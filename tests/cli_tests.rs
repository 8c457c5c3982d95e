// ABOUTME: Integration tests for the days-view preview CLI
// ABOUTME: Runs the built binary against temporary application roots

use std::fs;
use std::process::{Command, Output};

mod common;
use common::{TestApp, INDEX_TEMPLATE};

fn days_view(app: &TestApp, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_days-view"))
        .arg("--app-root")
        .arg(app.root())
        .args(args)
        .env_remove("RUST_LOG")
        .env_remove("DAYS_VIEW_ENGINE")
        .env_remove("DAYS_VIEW_CACHE_LIFETIME")
        .output()
        .expect("Failed to execute days-view")
}

#[test]
fn test_cli_help_command() {
    let output = Command::new(env!("CARGO_BIN_EXE_days-view"))
        .arg("--help")
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("render"));
    assert!(stdout.contains("paths"));
}

#[test]
fn test_cli_render_with_variables() {
    let app = TestApp::new().with_template("index.tpl", INDEX_TEMPLATE);

    for engine in ["plain", "handlebars", "tera"] {
        let output = days_view(
            &app,
            &[
                "render",
                "index.tpl",
                "--engine",
                engine,
                "-V",
                "title=Home",
                "--merge",
                "title=Fallback",
                "--delimiter",
                "|",
            ],
        );

        assert!(output.status.success(), "engine {}: {:?}", engine, output);
        let stdout = String::from_utf8_lossy(&output.stdout);
        assert_eq!(stdout, "<title>Fallback | Home</title>");
    }
}

#[test]
fn test_cli_render_to_output_file() {
    let app = TestApp::new().with_template("index.tpl", INDEX_TEMPLATE);
    let out = app.root().join("index.html");

    let output = days_view(
        &app,
        &["render", "index.tpl", "-V", "title=Home", "-o", out.to_str().unwrap()],
    );

    assert!(output.status.success());
    assert_eq!(fs::read_to_string(out).unwrap(), "<title>Home</title>");
}

#[test]
fn test_cli_missing_template() {
    let app = TestApp::new();
    let output = days_view(&app, &["render", "missing.tpl"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("missing.tpl"));
    assert!(stderr.contains("not found"));
}

#[test]
fn test_cli_invalid_variable() {
    let app = TestApp::new().with_template("index.tpl", INDEX_TEMPLATE);
    let output = days_view(&app, &["render", "index.tpl", "-V", "no-equals-sign"]);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("key=value"));
}

#[test]
fn test_cli_paths_uses_settings_file() {
    let app = TestApp::new();
    fs::write(
        app.root().join("config.yaml"),
        "cache:\n  lifetime: 45\nview:\n  engine: tera\n",
    )
    .unwrap();

    let output = days_view(&app, &["paths"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("engine:      tera"));
    assert!(stdout.contains("caching:     enabled (45s)"));
    assert!(stdout.contains("system"));
}

#[test]
fn test_cli_engine_from_settings() {
    let app = TestApp::new().with_template("index.tpl", "{{ title | lower }}");
    fs::write(app.root().join("config.yaml"), "view:\n  engine: tera\n").unwrap();

    let output = days_view(&app, &["render", "index.tpl", "-V", "title=HOME"]);

    assert!(output.status.success(), "{:?}", output);
    assert_eq!(String::from_utf8_lossy(&output.stdout), "home");
}
