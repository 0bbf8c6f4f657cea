//! Reusable configuration fixtures

/// Servers only, no `[meteor]` section
pub const CONFIG_WITHOUT_METEOR: &str = r#"
[servers.web1]
host = "127.0.0.1"

[mongo]
"#;

/// Minimal app on one server, building into `build/` under the project
pub const CONFIG_ONE_SERVER: &str = r#"
[servers.web1]
host = "127.0.0.1"

[meteor]
name = "app"
path = "app"

[meteor.build_options]
build_location = "build"

[meteor.servers.web1.env]
SERVER_HOST = "app.example.com"
"#;

/// One server, build location derived from the app path
pub const CONFIG_DERIVED_LOCATION: &str = r#"
[servers.web1]
host = "127.0.0.1"
port = 1

[meteor]
name = "app"
path = "app"

[meteor.servers.web1.env]
SERVER_HOST = "app.example.com"
"#;
