//! `health` subcommand: check that the local backend is reachable.

use std::error::Error;

use serde_json::Value;

use crate::api::client::BackendClient;

pub async fn run_health(backend: &BackendClient) -> Result<(), Box<dyn Error>> {
    let report = backend.health().await?;
    println!("Backend at {} is reachable.", backend.base_url());
    print!("{}", render_health(&report));
    Ok(())
}

/// Render the health payload one field per line; a non-object body is
/// printed as-is.
fn render_health(report: &Value) -> String {
    let mut out = String::new();
    match report.as_object() {
        Some(fields) => {
            for (key, value) in fields {
                let value = match value {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                out.push_str(&format!("  {key}: {value}\n"));
            }
        }
        None => out.push_str(&format!("  {report}\n")),
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn renders_object_fields_line_by_line() {
        let report = json!({"status": "ok", "version": "1.0.0", "providers_loaded": 42});
        let rendered = render_health(&report);
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines.contains(&"  status: ok"));
        assert!(lines.contains(&"  providers_loaded: 42"));
    }

    #[test]
    fn renders_non_object_bodies_verbatim() {
        assert_eq!(render_health(&json!("ok")), "  \"ok\"\n");
    }
}
