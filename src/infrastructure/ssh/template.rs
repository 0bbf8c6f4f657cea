//! Template rendering for remote scripts and config files
//!
//! Supported placeholders:
//!
//! - `{{ path.to.value }}` - the value at a dotted path; missing or null renders empty
//! - `{{ value | each "FMT" }}` - one `FMT` per entry, space separated
//! - `{{ value | lines "FMT" }}` - one `FMT` per entry, newline separated
//!
//! Inside `FMT`, `{key}` and `{value}` refer to the entry. Arrays use the
//! index as key.

use serde_json::Value;

use crate::domain::entities::TaskVars;
use crate::error::{ShipError, ShipResult};

const OPEN: &str = "{{";
const CLOSE: &str = "}}";

/// Render `template` with `vars`
pub fn render(template: &str, vars: &TaskVars) -> ShipResult<String> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find(OPEN) {
        out.push_str(&rest[..start]);
        let after = &rest[start + OPEN.len()..];
        let end = after
            .find(CLOSE)
            .ok_or_else(|| template_error("unterminated '{{'"))?;
        out.push_str(&render_expression(after[..end].trim(), vars)?);
        rest = &after[end + CLOSE.len()..];
    }
    out.push_str(rest);

    Ok(out)
}

fn render_expression(expr: &str, vars: &TaskVars) -> ShipResult<String> {
    let (path, filter) = match expr.split_once('|') {
        Some((path, filter)) => (path.trim(), Some(filter.trim())),
        None => (expr, None),
    };

    let value = lookup(vars, path);

    let Some(filter) = filter else {
        return Ok(value.map(scalar).unwrap_or_default());
    };

    let (name, format) = filter
        .split_once(char::is_whitespace)
        .ok_or_else(|| template_error(&format!("filter '{}' needs a format", filter)))?;
    let format = unquote(format.trim())?;
    let separator = match name {
        "each" => " ",
        "lines" => "\n",
        other => return Err(template_error(&format!("unknown filter '{}'", other))),
    };

    let rendered: Vec<String> = entries(value)
        .into_iter()
        .map(|(key, value)| {
            format
                .replace("{key}", &key)
                .replace("{value}", &scalar(value))
        })
        .collect();
    Ok(rendered.join(separator))
}

fn lookup<'a>(vars: &'a TaskVars, path: &str) -> Option<&'a Value> {
    let mut segments = path.split('.');
    let mut current = vars.get(segments.next()?)?;
    for segment in segments {
        current = match current {
            Value::Object(map) => map.get(segment)?,
            Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(current)
}

fn entries(value: Option<&Value>) -> Vec<(String, &Value)> {
    match value {
        Some(Value::Object(map)) => map.iter().map(|(k, v)| (k.clone(), v)).collect(),
        Some(Value::Array(items)) => items
            .iter()
            .enumerate()
            .map(|(i, v)| (i.to_string(), v))
            .collect(),
        Some(Value::Null) | None => Vec::new(),
        Some(other) => vec![(String::new(), other)],
    }
}

fn scalar(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

fn unquote(s: &str) -> ShipResult<String> {
    s.strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .map(|s| s.replace("\\n", "\n").replace("\\\"", "\""))
        .ok_or_else(|| template_error(&format!("format {} must be double quoted", s)))
}

fn template_error(message: &str) -> ShipError {
    ShipError::InvalidConfiguration(format!("template: {}", message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn vars(value: Value) -> TaskVars {
        match value {
            Value::Object(map) => map.into_iter().collect(),
            _ => panic!("vars must be an object"),
        }
    }

    #[test]
    fn substitutes_paths() {
        let vars = vars(json!({"app_name": "app", "docker": {"image": "kadirahq/meteord", "image_port": 80}}));
        let out = render("docker run --name={{ app_name }} -p 80:{{docker.image_port}} {{ docker.image }}", &vars).unwrap();
        assert_eq!(out, "docker run --name=app -p 80:80 kadirahq/meteord");
    }

    #[test]
    fn missing_and_null_render_empty() {
        let vars = vars(json!({"ssl_config": null}));
        let out = render("SSL_PORT=\"{{ ssl_config.port }}\" X={{ nope }}", &vars).unwrap();
        assert_eq!(out, "SSL_PORT=\"\" X=");
    }

    #[test]
    fn each_joins_with_spaces() {
        let vars = vars(json!({"log_config": {"opts": {"max-file": 10, "max-size": "100m"}}}));
        let out = render(r#"{{ log_config.opts | each "--log-opt {key}={value}" }}"#, &vars).unwrap();
        assert_eq!(out, "--log-opt max-file=10 --log-opt max-size=100m");
    }

    #[test]
    fn lines_joins_with_newlines() {
        let vars = vars(json!({"env": {"FOO": "bar", "METEOR_SETTINGS": "{\"a\":1}"}}));
        let out = render(r#"{{ env | lines "{key}={value}" }}"#, &vars).unwrap();
        assert_eq!(out, "FOO=bar\nMETEOR_SETTINGS={\"a\":1}");
    }

    #[test]
    fn arrays_iterate_values() {
        let vars = vars(json!({"docker": {"args": ["--link=mongodb:mongodb", "--restart=always"]}}));
        let out = render(r#"{{ docker.args | each "{value}" }}"#, &vars).unwrap();
        assert_eq!(out, "--link=mongodb:mongodb --restart=always");
    }

    #[test]
    fn empty_collections_render_nothing() {
        let vars = vars(json!({"volumes": {}}));
        assert_eq!(render(r#"a{{ volumes | each "-v {key}:{value}" }}b"#, &vars).unwrap(), "ab");
    }

    #[test]
    fn unterminated_placeholder_is_an_error() {
        assert!(render("{{ app_name", &TaskVars::new()).is_err());
    }

    #[test]
    fn unknown_filter_is_an_error() {
        let vars = vars(json!({"env": {}}));
        assert!(render(r#"{{ env | upper "{key}" }}"#, &vars).is_err());
    }

    #[test]
    fn text_without_placeholders_is_unchanged() {
        let script = "#!/bin/bash\nset -e\necho ${HOME}\n";
        assert_eq!(render(script, &TaskVars::new()).unwrap(), script);
    }
}
