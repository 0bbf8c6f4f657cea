//! `--cached-build` without a previous build stops before any upload

mod common;

use common::*;

#[test]
fn push_cached_build_without_bundle_fails() {
    let env = TestEnv::with_config(CONFIG_ONE_SERVER);

    let result = env.run(&["push", "--cached-build"]);

    assert_eq!(result.exit_code, 1);
    assert!(result.stderr.contains("--cached-build"), "{}", result.stderr);
    assert!(result.stderr.contains("bundle.tar.gz"), "{}", result.stderr);
}

#[test]
fn deploy_cached_build_reports_failed_push() {
    let env = TestEnv::with_config(CONFIG_ONE_SERVER);

    let result = env.run(&["deploy", "--cached-build"]);

    assert_eq!(result.exit_code, 1);
    assert!(result.stderr.contains("push failed"), "{}", result.stderr);
    assert!(result.stderr.contains("--cached-build"), "{}", result.stderr);
}

#[test]
fn json_mode_reports_stage_error_on_stdout() {
    let env = TestEnv::with_config(CONFIG_ONE_SERVER);

    let result = env.run(&["push", "--cached-build", "--json"]);

    assert_eq!(result.exit_code, 1);
    let line = result
        .stdout
        .lines()
        .find(|l| l.contains("stage_error"))
        .unwrap_or_else(|| panic!("no stage_error event in {:?}", result.stdout));
    let event: serde_json::Value = serde_json::from_str(line).unwrap();
    assert_eq!(event["stage"], "push");
}
