//! Response helpers shared by the resource handlers and [`crate::error`].

use axum::http::{HeaderMap, HeaderName, HeaderValue};
use dlife_core::alert::Alert;

/// Render an [`Alert`] as response headers.
///
/// `APP_NAME` is checked at startup, so a pair that still fails to convert is
/// dropped with a warning instead of failing the response.
pub fn alert_headers(app_name: &str, alert: Alert<'_>) -> HeaderMap {
    let mut headers = HeaderMap::new();
    for (name, value) in alert.headers(app_name) {
        match (
            HeaderName::try_from(name.as_str()),
            HeaderValue::try_from(value.as_str()),
        ) {
            (Ok(name), Ok(value)) => {
                headers.insert(name, value);
            }
            _ => tracing::warn!(%name, %value, "Dropping unrepresentable alert header"),
        }
    }
    headers
}

/// Names of the alert headers, for exposing them through CORS.
pub fn alert_header_names(app_name: &str) -> Vec<HeaderName> {
    ["alert", "error", "params"]
        .iter()
        .filter_map(|suffix| HeaderName::try_from(format!("x-{app_name}-{suffix}")).ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alert_renders_both_headers() {
        let headers = alert_headers("dlifeApp", Alert::Updated { entity: "rates", id: 4 });
        assert_eq!(headers["x-dlifeapp-alert"], "dlifeApp.rates.updated");
        assert_eq!(headers["x-dlifeapp-params"], "4");
    }

    #[test]
    fn header_names_are_lowercased() {
        let names = alert_header_names("dlifeApp");
        assert_eq!(names.len(), 3);
        assert_eq!(names[0].as_str(), "x-dlifeapp-alert");
    }
}
