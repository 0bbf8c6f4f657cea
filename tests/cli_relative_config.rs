//! Relative `--config` paths resolve against the working directory

mod common;

use std::path::PathBuf;

use common::*;

/// Bundle path named in a `--cached-build` miss
fn missing_bundle(stderr: &str) -> PathBuf {
    let start = stderr
        .find("exist at ")
        .unwrap_or_else(|| panic!("no bundle path in {:?}", stderr))
        + "exist at ".len();
    let end = stderr[start..]
        .find(". Remove")
        .unwrap_or_else(|| panic!("no bundle path in {:?}", stderr));
    PathBuf::from(&stderr[start..start + end])
}

#[test]
fn same_relative_app_path_in_two_projects_builds_apart() {
    let a = TestEnv::with_config(CONFIG_DERIVED_LOCATION);
    let b = TestEnv::with_config(CONFIG_DERIVED_LOCATION);

    let from_a = a.run(&["--config", "mup.toml", "push", "--cached-build"]);
    let from_b = b.run(&["--config", "mup.toml", "push", "--cached-build"]);

    assert_eq!(from_a.exit_code, 1);
    assert_eq!(from_b.exit_code, 1);
    let bundle_a = missing_bundle(&from_a.stderr);
    let bundle_b = missing_bundle(&from_b.stderr);
    assert!(bundle_a.is_absolute(), "{}", bundle_a.display());
    assert_ne!(bundle_a, bundle_b);
}

#[test]
fn same_project_from_two_directories_shares_a_build() {
    let env = TestEnv::new();
    env.write_project_file("deploy/mup.toml", CONFIG_DERIVED_LOCATION);

    let from_root = env.run(&["--config", "deploy/mup.toml", "push", "--cached-build"]);
    let from_deploy = env.run_from(
        &env.project_path("deploy"),
        &["--config", "mup.toml", "push", "--cached-build"],
    );

    assert_eq!(
        missing_bundle(&from_root.stderr),
        missing_bundle(&from_deploy.stderr)
    );
}

#[test]
fn explicit_build_location_is_relative_to_config_dir() {
    let env = TestEnv::new();
    env.write_project_file("deploy/mup.toml", CONFIG_ONE_SERVER);

    let result = env.run(&["--config", "deploy/mup.toml", "push", "--cached-build"]);

    let bundle = missing_bundle(&result.stderr);
    assert!(bundle.is_absolute(), "{}", bundle.display());
    assert!(
        bundle.ends_with("deploy/build/bundle.tar.gz"),
        "{}",
        bundle.display()
    );
}

#[cfg(unix)]
#[test]
fn relative_build_location_receives_the_bundle() {
    let env = TestEnv::new();
    // `sh build --directory <loc> ...` runs this script from the app dir
    env.write_project_file(
        "app/build",
        "mkdir -p \"$2/bundle\" && echo ok > \"$2/bundle/main.js\"\n",
    );
    env.write_project_file(
        "mup.toml",
        &format!(
            "{}\n[meteor.build_options]\nbuild_location = \"out\"\nexecutable = \"sh\"\n",
            CONFIG_DERIVED_LOCATION
        ),
    );

    // the upload to port 1 fails; only the local build matters here
    env.run(&["--config", "mup.toml", "push"]);

    assert!(env.project_path("out/bundle.tar.gz").exists());
    assert!(!env.project_path("app/out").exists());
}
