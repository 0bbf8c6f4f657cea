//! Configuration problems surface as errors before any remote work

mod common;

use common::*;

#[test]
fn unknown_server_in_meteor_section() {
    let env = TestEnv::with_config(
        r#"
[servers.web1]
host = "127.0.0.1"

[meteor]
name = "app"
path = "app"

[meteor.servers.web9.env]
SERVER_HOST = "x"
"#,
    );

    let result = env.run(&["setup"]);

    assert_eq!(result.exit_code, 1);
    assert!(result.stderr.contains("web9"), "{}", result.stderr);
}

#[test]
fn malformed_settings_abort_deploy() {
    let env = TestEnv::with_config(CONFIG_ONE_SERVER);
    env.write_project_file("settings.json", "{ nope");

    let result = env.run(&["deploy"]);

    assert_eq!(result.exit_code, 1);
    assert!(result.stderr.contains("invalid settings"), "{}", result.stderr);
    assert!(!env.project_path("build").exists());
}

#[test]
fn explicit_settings_file_must_exist() {
    let env = TestEnv::with_config(CONFIG_ONE_SERVER);

    let result = env.run(&["envconfig", "--settings", "missing.json"]);

    assert_eq!(result.exit_code, 1);
    assert!(result.stderr.contains("missing.json"), "{}", result.stderr);
}

#[test]
fn invalid_toml_is_reported_with_file_name() {
    let env = TestEnv::with_config("[meteor\nname = ");

    let result = env.run(&["stop"]);

    assert_eq!(result.exit_code, 1);
    assert!(result.stderr.contains("mup.toml"), "{}", result.stderr);
}

#[test]
fn empty_app_name_is_rejected() {
    let env = TestEnv::with_config(
        r#"
[servers.web1]
host = "127.0.0.1"

[meteor]
name = ""
path = "app"
"#,
    );

    let result = env.run(&["start"]);

    assert_eq!(result.exit_code, 1);
    assert!(result.stderr.contains("meteor.name"), "{}", result.stderr);
}
