use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use crate::{
    error::WeatherError,
    model::{CurrentPayload, ErrorEnvelope},
};

/// Production endpoint of the weather provider.
pub const DEFAULT_BASE_URL: &str = "https://api.weatherstack.com";

/// Default day count for `/forecast` requests.
pub const DEFAULT_FORECAST_DAYS: u8 = 7;

const FALLBACK_CURRENT: &str = "Failed to fetch current weather";
const FALLBACK_FORECAST: &str = "Failed to fetch forecast";
const FALLBACK_HISTORICAL: &str = "Failed to fetch historical weather";
const FALLBACK_MARINE: &str = "Failed to fetch marine weather";
const FALLBACK_LOOKUP: &str = "Failed to lookup location";

/// Read side of the access layer: one method per provider capability.
///
/// Implemented by [`WeatherClient`] for the real provider; consumers take a
/// `&dyn WeatherSource` so views can be exercised against a canned source.
#[async_trait]
pub trait WeatherSource: Send + Sync {
    async fn current(&self, query: &str) -> Result<CurrentPayload, WeatherError>;
    async fn forecast(&self, query: &str, days: u8) -> Result<Value, WeatherError>;
    async fn historical(&self, query: &str, date: NaiveDate) -> Result<Value, WeatherError>;
    async fn marine(&self, query: &str) -> Result<Value, WeatherError>;
    async fn lookup_location(&self, query: &str) -> Result<Value, WeatherError>;
}

/// HTTP client bound to one base URL and one access credential.
///
/// The credential rides along as the `access_key` query parameter on every
/// request; callers never repeat it. One request per call: no retries, no
/// caching, no timeout beyond the transport default.
#[derive(Debug, Clone)]
pub struct WeatherClient {
    http: Client,
    base_url: String,
    access_key: String,
}

impl WeatherClient {
    pub fn new(access_key: String) -> Self {
        Self::with_base_url(access_key, DEFAULT_BASE_URL.to_string())
    }

    /// Bind to a non-default endpoint. Tests point this at a local mock server.
    pub fn with_base_url(access_key: String, base_url: String) -> Self {
        Self { http: Client::new(), base_url, access_key }
    }

    /// Current conditions for a location query (free text, postal code, or
    /// `"lat,lon"`; the provider interprets the string).
    pub async fn current(&self, query: &str) -> Result<CurrentPayload, WeatherError> {
        let raw = self
            .get_json("/current", FALLBACK_CURRENT, &[("query", query.to_string())])
            .await?;

        serde_json::from_value(raw).map_err(|err| {
            WeatherError::transport(
                format!("{FALLBACK_CURRENT}: unexpected payload shape: {err}"),
                FALLBACK_CURRENT,
            )
        })
    }

    /// Daily + hourly forecast. Opaque payload; the provider gates this
    /// behind paid plans.
    pub async fn forecast(&self, query: &str, days: u8) -> Result<Value, WeatherError> {
        self.get_json(
            "/forecast",
            FALLBACK_FORECAST,
            &[
                ("query", query.to_string()),
                ("forecast_days", days.to_string()),
                ("hourly", "1".to_string()),
            ],
        )
        .await
    }

    /// Hourly conditions for one past date. Opaque payload; plan-gated.
    pub async fn historical(&self, query: &str, date: NaiveDate) -> Result<Value, WeatherError> {
        self.get_json(
            "/historical",
            FALLBACK_HISTORICAL,
            &[
                ("query", query.to_string()),
                ("historical_date", date.format("%Y-%m-%d").to_string()),
                ("hourly", "1".to_string()),
            ],
        )
        .await
    }

    /// Ocean and coastal conditions. Opaque payload; plan-gated.
    pub async fn marine(&self, query: &str) -> Result<Value, WeatherError> {
        self.get_json("/marine", FALLBACK_MARINE, &[("query", query.to_string())])
            .await
    }

    /// Location autocomplete. Opaque payload; plan-gated.
    pub async fn lookup_location(&self, query: &str) -> Result<Value, WeatherError> {
        self.get_json("/autocomplete", FALLBACK_LOOKUP, &[("query", query.to_string())])
            .await
    }

    /// Shared dispatch: GET, then normalize the three failure shapes
    /// (transport error, bad status, embedded envelope) into [`WeatherError`].
    ///
    /// The envelope check runs before the status check: the provider reports
    /// plan gating and invalid queries inside a 200 response.
    async fn get_json(
        &self,
        path: &str,
        fallback: &'static str,
        params: &[(&str, String)],
    ) -> Result<Value, WeatherError> {
        let url = format!("{}{}", self.base_url, path);

        let mut query: Vec<(&str, &str)> = vec![("access_key", self.access_key.as_str())];
        query.extend(params.iter().map(|(k, v)| (*k, v.as_str())));

        debug!(%path, "dispatching provider request");

        let res = self
            .http
            .get(&url)
            .query(&query)
            .send()
            .await
            .map_err(|err| WeatherError::transport(err.to_string(), fallback))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|err| WeatherError::transport(err.to_string(), fallback))?;

        if let Ok(envelope) = serde_json::from_str::<ErrorEnvelope>(&body) {
            let message = envelope
                .error
                .info
                .filter(|info| !info.is_empty())
                .unwrap_or_else(|| fallback.to_string());
            return Err(WeatherError::Provider { message, code: envelope.error.code });
        }

        if !status.is_success() {
            return Err(WeatherError::transport(
                format!("{fallback}: provider returned status {status}: {}", truncate_body(&body)),
                fallback,
            ));
        }

        serde_json::from_str(&body).map_err(|err| {
            WeatherError::transport(
                format!("{fallback}: invalid JSON from provider: {err}"),
                fallback,
            )
        })
    }
}

#[async_trait]
impl WeatherSource for WeatherClient {
    async fn current(&self, query: &str) -> Result<CurrentPayload, WeatherError> {
        WeatherClient::current(self, query).await
    }

    async fn forecast(&self, query: &str, days: u8) -> Result<Value, WeatherError> {
        WeatherClient::forecast(self, query, days).await
    }

    async fn historical(&self, query: &str, date: NaiveDate) -> Result<Value, WeatherError> {
        WeatherClient::historical(self, query, date).await
    }

    async fn marine(&self, query: &str) -> Result<Value, WeatherError> {
        WeatherClient::marine(self, query).await
    }

    async fn lookup_location(&self, query: &str) -> Result<Value, WeatherError> {
        WeatherClient::lookup_location(self, query).await
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() <= MAX {
        return body.to_string();
    }
    // Back up to a char boundary so multibyte bodies never split mid-char.
    let mut end = MAX;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &body[..end])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::format_report;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> WeatherClient {
        WeatherClient::with_base_url("TEST_KEY".to_string(), server.uri())
    }

    #[tokio::test]
    async fn current_passes_query_and_key() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/current"))
            .and(query_param("access_key", "TEST_KEY"))
            .and(query_param("query", "Paris"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "location": {"name": "Paris", "country": "France"},
                "current": {"temperature": 18, "weather_descriptions": ["Sunny"]}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let payload = client_for(&server).current("Paris").await.unwrap();
        assert_eq!(payload.current.as_ref().unwrap().temperature, Some(18.0));
        assert_eq!(
            payload.location.as_ref().unwrap().name.as_deref(),
            Some("Paris")
        );
    }

    #[tokio::test]
    async fn current_then_format_yields_report() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/current"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "location": {"name": "Paris", "country": "France", "lat": 48.867, "lon": 2.333},
                "current": {
                    "temperature": 18,
                    "feelslike": 17,
                    "weather_descriptions": ["Partly cloudy"],
                    "is_day": "yes"
                }
            })))
            .mount(&server)
            .await;

        let payload = client_for(&server).current("Paris").await.unwrap();
        let report = format_report(&payload).expect("payload has current block");

        assert_eq!(report.current.temperature, Some(18.0));
        assert_eq!(report.current.feels_like, Some(17.0));
        assert_eq!(report.location.name.as_deref(), Some("Paris"));
        assert!(report.current.is_day);
    }

    #[tokio::test]
    async fn envelope_in_200_response_is_an_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/current"))
            .and(query_param("query", "Unknown123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "error": {"code": 615, "info": "Invalid query."}
            })))
            .mount(&server)
            .await;

        let err = client_for(&server).current("Unknown123").await.unwrap_err();
        assert_eq!(err.to_string(), "Invalid query.");
        assert_eq!(err.code(), Some(615));
    }

    #[tokio::test]
    async fn envelope_info_propagates_for_every_capability() {
        let server = MockServer::start().await;
        let body = json!({
            "error": {"code": 603, "info": "Your subscription plan does not support this API function."}
        });

        for p in ["/current", "/forecast", "/historical", "/marine", "/autocomplete"] {
            Mock::given(method("GET"))
                .and(path(p))
                .respond_with(ResponseTemplate::new(200).set_body_json(body.clone()))
                .mount(&server)
                .await;
        }

        let client = client_for(&server);
        let date = NaiveDate::from_ymd_opt(2026, 8, 19).unwrap();

        let errors = vec![
            client.current("Oslo").await.map(|_| ()).unwrap_err(),
            client.forecast("Oslo", 7).await.map(|_| ()).unwrap_err(),
            client.historical("Oslo", date).await.map(|_| ()).unwrap_err(),
            client.marine("Oslo").await.map(|_| ()).unwrap_err(),
            client.lookup_location("Oslo").await.map(|_| ()).unwrap_err(),
        ];

        for err in errors {
            assert_eq!(
                err.to_string(),
                "Your subscription plan does not support this API function."
            );
            assert_eq!(err.code(), Some(603));
        }
    }

    #[tokio::test]
    async fn envelope_overrides_http_status() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/marine"))
            .respond_with(ResponseTemplate::new(403).set_body_json(json!({
                "error": {"code": 105, "info": "Access Restricted - Your current Subscription Plan does not support this API Function."}
            })))
            .mount(&server)
            .await;

        let err = client_for(&server).marine("Brest").await.unwrap_err();
        assert!(err.to_string().starts_with("Access Restricted"));
        assert_eq!(err.code(), Some(105));
    }

    #[tokio::test]
    async fn envelope_without_info_uses_category_fallback() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/forecast"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"error": {"code": 603}})),
            )
            .mount(&server)
            .await;

        let err = client_for(&server).forecast("Lyon", 3).await.unwrap_err();
        assert_eq!(err.to_string(), "Failed to fetch forecast");
    }

    #[tokio::test]
    async fn non_2xx_without_envelope_mentions_status_and_category() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/historical"))
            .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
            .mount(&server)
            .await;

        let date = NaiveDate::from_ymd_opt(2026, 8, 1).unwrap();
        let err = client_for(&server).historical("Kyiv", date).await.unwrap_err();

        let msg = err.to_string();
        assert!(msg.starts_with("Failed to fetch historical weather"));
        assert!(msg.contains("502"));
    }

    #[tokio::test]
    async fn clean_2xx_body_passes_through_unchanged() {
        let server = MockServer::start().await;
        let body = json!({
            "location": {"name": "Brest"},
            "forecast": {"2026-08-27": {"maxtemp": 21, "mintemp": 14}}
        });

        Mock::given(method("GET"))
            .and(path("/forecast"))
            .and(query_param("forecast_days", "5"))
            .and(query_param("hourly", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body.clone()))
            .mount(&server)
            .await;

        let value = client_for(&server).forecast("Brest", 5).await.unwrap();
        assert_eq!(value, body);
    }

    #[tokio::test]
    async fn historical_sends_iso_date() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/historical"))
            .and(query_param("historical_date", "2026-08-19"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"historical": {}})))
            .expect(1)
            .mount(&server)
            .await;

        let date = NaiveDate::from_ymd_opt(2026, 8, 19).unwrap();
        client_for(&server).historical("Berlin", date).await.unwrap();
    }

    #[tokio::test]
    async fn lookup_returns_candidate_list_untouched() {
        let server = MockServer::start().await;
        let body = json!({
            "results": [
                {"name": "Springfield", "country": "United States", "region": "Illinois",
                 "lat": 39.8, "lon": -89.65}
            ]
        });

        Mock::given(method("GET"))
            .and(path("/autocomplete"))
            .and(query_param("query", "Springfield"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body.clone()))
            .mount(&server)
            .await;

        let value = client_for(&server).lookup_location("Springfield").await.unwrap();
        assert_eq!(value, body);
    }

    #[tokio::test]
    async fn connection_refused_is_a_transport_error() {
        // Nothing listens on this port.
        let client =
            WeatherClient::with_base_url("TEST_KEY".into(), "http://127.0.0.1:9".to_string());

        let err = client.marine("Brest").await.unwrap_err();
        assert!(matches!(err, WeatherError::Transport { .. }));
        assert!(!err.to_string().is_empty());
    }

    #[tokio::test]
    async fn multibyte_error_body_is_truncated_not_panicked() {
        let server = MockServer::start().await;

        // 199 ASCII bytes, then a multibyte char straddling the 200-byte cut.
        let body = format!("{}€€", "x".repeat(199));
        Mock::given(method("GET"))
            .and(path("/marine"))
            .respond_with(ResponseTemplate::new(500).set_body_string(body))
            .mount(&server)
            .await;

        let err = client_for(&server).marine("Brest").await.unwrap_err();

        let msg = err.to_string();
        assert!(matches!(err, WeatherError::Transport { .. }));
        assert!(msg.starts_with("Failed to fetch marine weather"));
        assert!(msg.contains("500"));
    }

    #[test]
    fn truncate_body_respects_char_boundaries() {
        // Short bodies pass through untouched.
        assert_eq!(truncate_body("ok"), "ok");

        // The 200-byte cut lands inside '€' (bytes 199..202); the cut must
        // back up to byte 199 instead of slicing mid-char.
        let body = format!("{}€€", "x".repeat(199));
        let truncated = truncate_body(&body);
        assert_eq!(truncated, format!("{}...", "x".repeat(199)));

        // All-multibyte body longer than the cap.
        let euros = "€".repeat(100); // 300 bytes
        let truncated = truncate_body(&euros);
        assert!(truncated.ends_with("..."));
        assert_eq!(truncated.trim_end_matches("..."), "€".repeat(66));
    }
}
