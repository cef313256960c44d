//! URL joining helpers shared by the backend client and the external
//! server probes.

/// Join a base URL and an endpoint path without producing double slashes,
/// whatever combination of trailing/leading slashes the inputs carry.
pub fn join_url(base_url: &str, endpoint: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        endpoint.trim_start_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_without_double_slashes() {
        assert_eq!(
            join_url("https://neko.example.com", "v1/dashboard/billing/subscription"),
            "https://neko.example.com/v1/dashboard/billing/subscription"
        );
        assert_eq!(
            join_url("https://neko.example.com/", "/api/providers"),
            "https://neko.example.com/api/providers"
        );
        assert_eq!(
            join_url("http://127.0.0.1:8000///", "api/health"),
            "http://127.0.0.1:8000/api/health"
        );
        assert_eq!(join_url("https://a.example", ""), "https://a.example/");
    }
}
