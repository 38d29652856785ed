//! Bank of Canada Valet API provider.
//!
//! Valet publishes daily FX series as JSON observations, e.g.
//! `GET /valet/observations/FXUSDCAD/json?start_date=2020-07-10&end_date=2020-07-10`
//! returns `{"observations": [{"d": "2020-07-10", "FXUSDCAD": {"v": "1.3594"}}]}`.
//! A date where no rate was published yields an empty observations array.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;

use crate::core::rates::{FetchError, Observation, ObservationProvider};

pub const DEFAULT_BASE_URL: &str = "https://www.bankofcanada.ca/valet";

pub struct BocValetProvider {
    base_url: String,
    client: reqwest::Client,
}

impl BocValetProvider {
    /// `timeout` bounds each fetch end to end; an elapsed timeout surfaces
    /// as a transport failure. The client is reusable and safe for
    /// concurrent in-flight requests.
    pub fn new(base_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("cadfx/1.0")
            .timeout(timeout)
            .build()?;
        Ok(BocValetProvider {
            base_url: base_url.to_string(),
            client,
        })
    }
}

#[derive(Debug, Deserialize)]
struct ValetResponse {
    observations: Vec<ValetObservation>,
}

#[derive(Debug, Deserialize)]
struct ValetObservation {
    #[serde(rename = "d")]
    date: String,
    #[serde(flatten)]
    series: HashMap<String, ValetValue>,
}

#[derive(Debug, Deserialize)]
struct ValetValue {
    #[serde(rename = "v")]
    value: String,
}

#[async_trait]
impl ObservationProvider for BocValetProvider {
    async fn fetch_observation(
        &self,
        series: &str,
        date: Option<NaiveDate>,
    ) -> Result<Observation, FetchError> {
        let url = match date {
            Some(date) => format!(
                "{}/observations/{}/json?start_date={date}&end_date={date}",
                self.base_url, series
            ),
            None => format!("{}/observations/{}/json?recent=1", self.base_url, series),
        };
        debug!("Requesting observation from {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| FetchError::Transport(format!("request error for {series}: {e}")))?;

        if !response.status().is_success() {
            return Err(FetchError::Transport(format!(
                "HTTP {} for series {series}",
                response.status()
            )));
        }

        let text = response
            .text()
            .await
            .map_err(|e| FetchError::Transport(format!("failed to read body for {series}: {e}")))?;

        let data: ValetResponse = serde_json::from_str(&text).map_err(|e| {
            FetchError::Malformed(format!("failed to parse Valet response for {series}: {e}"))
        })?;

        let first = data.observations.into_iter().next().ok_or(FetchError::NoData)?;
        debug!(date = %first.date, "Received observation");

        Ok(Observation {
            date: first.date,
            values: first
                .series
                .into_iter()
                .map(|(label, v)| (label, v.value))
                .collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn provider(base_url: &str) -> BocValetProvider {
        BocValetProvider::new(base_url, Duration::from_secs(5)).unwrap()
    }

    fn test_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2020, 7, 10).unwrap()
    }

    #[tokio::test]
    async fn fetches_observation_for_pinned_date() {
        let mock_server = MockServer::start().await;
        let mock_response = r#"{
            "observations": [
                {"d": "2020-07-10", "FXUSDCAD": {"v": "1.3594"}}
            ]
        }"#;

        Mock::given(method("GET"))
            .and(path("/observations/FXUSDCAD/json"))
            .and(query_param("start_date", "2020-07-10"))
            .and(query_param("end_date", "2020-07-10"))
            .respond_with(ResponseTemplate::new(200).set_body_string(mock_response))
            .mount(&mock_server)
            .await;

        let observation = provider(&mock_server.uri())
            .fetch_observation("FXUSDCAD", Some(test_date()))
            .await
            .unwrap();

        assert_eq!(observation.date, "2020-07-10");
        assert_eq!(observation.values["FXUSDCAD"], "1.3594");
    }

    #[tokio::test]
    async fn most_recent_request_uses_recent_query() {
        let mock_server = MockServer::start().await;
        let mock_response = r#"{
            "observations": [
                {"d": "2024-03-08", "FXEURCAD": {"v": "1.4721"}}
            ]
        }"#;

        Mock::given(method("GET"))
            .and(path("/observations/FXEURCAD/json"))
            .and(query_param("recent", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_string(mock_response))
            .mount(&mock_server)
            .await;

        let observation = provider(&mock_server.uri())
            .fetch_observation("FXEURCAD", None)
            .await
            .unwrap();

        assert_eq!(observation.date, "2024-03-08");
    }

    #[tokio::test]
    async fn empty_observations_is_no_data() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/observations/FXUSDCAD/json"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"observations": []}"#))
            .mount(&mock_server)
            .await;

        let err = provider(&mock_server.uri())
            .fetch_observation("FXUSDCAD", Some(test_date()))
            .await
            .unwrap_err();

        assert!(matches!(err, FetchError::NoData));
    }

    #[tokio::test]
    async fn server_error_is_transport_failure() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/observations/FXUSDCAD/json"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&mock_server)
            .await;

        let err = provider(&mock_server.uri())
            .fetch_observation("FXUSDCAD", None)
            .await
            .unwrap_err();

        assert!(matches!(err, FetchError::Transport(ref d) if d.contains("500")));
    }

    #[tokio::test]
    async fn unreachable_host_is_transport_failure() {
        // Nothing listening on this port.
        let err = provider("http://127.0.0.1:1")
            .fetch_observation("FXUSDCAD", None)
            .await
            .unwrap_err();

        assert!(matches!(err, FetchError::Transport(_)));
    }

    #[tokio::test]
    async fn unparseable_body_is_malformed() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/observations/FXUSDCAD/json"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"series": {}}"#))
            .mount(&mock_server)
            .await;

        let err = provider(&mock_server.uri())
            .fetch_observation("FXUSDCAD", None)
            .await
            .unwrap_err();

        assert!(matches!(err, FetchError::Malformed(_)));
    }
}
