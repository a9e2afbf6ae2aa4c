use crate::config::AnalyticsConfig;
use crate::domain::model::AnalyticsEvent;
use crate::domain::ports::AnalyticsSink;
use crate::utils::error::{RelayError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use std::time::Duration;
use url::Url;

/// Forwards page-view events to a Measurement Protocol collector.
pub struct MeasurementProtocolForwarder {
    client: Client,
    collect_url: Url,
    client_id: String,
}

impl MeasurementProtocolForwarder {
    pub fn new(config: &AnalyticsConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        let mut collect_url = Url::parse(&config.endpoint)?;
        {
            let mut query = collect_url.query_pairs_mut();
            query.append_pair("measurement_id", &config.measurement_id);
            if let Some(secret) = &config.api_secret {
                query.append_pair("api_secret", secret);
            }
        }

        Ok(Self {
            client,
            collect_url,
            client_id: config.client_id.clone(),
        })
    }

    fn payload(&self, event: &AnalyticsEvent) -> serde_json::Value {
        json!({
            "client_id": self.client_id,
            "timestamp_micros": event.timestamp_micros,
            "events": [{
                "name": event.event_name,
                "params": {
                    "item_id": event.item_id,
                    "page_title": event.page_title,
                    "page_location": event.page_url,
                }
            }]
        })
    }
}

#[async_trait]
impl AnalyticsSink for MeasurementProtocolForwarder {
    async fn forward(&self, event: &AnalyticsEvent) -> Result<()> {
        tracing::debug!("Forwarding {} for item {}", event.event_name, event.item_id);

        let response = self
            .client
            .post(self.collect_url.clone())
            .json(&self.payload(event))
            .send()
            .await
            .map_err(|e| RelayError::ForwardError {
                message: format!("request to collector failed: {}", e),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(RelayError::ForwardError {
                message: format!("collector responded with {}", status),
            });
        }

        tracing::debug!("Collector accepted event for item {}", event.item_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::ItemId;
    use httpmock::prelude::*;

    fn config_for(endpoint: String) -> AnalyticsConfig {
        AnalyticsConfig {
            endpoint,
            measurement_id: "G-TEST123".to_string(),
            ..AnalyticsConfig::default()
        }
    }

    fn event() -> AnalyticsEvent {
        AnalyticsEvent::page_view(
            ItemId::parse("110445512345").unwrap(),
            "eBay Listing",
            "https://www.ebay.com/itm/110445512345",
        )
    }

    #[tokio::test]
    async fn test_forward_posts_page_view() {
        let server = MockServer::start();
        let collect_mock = server.mock(|when, then| {
            when.method(POST)
                .path("/mp/collect")
                .query_param("measurement_id", "G-TEST123")
                .body_contains(r#""client_id":"anon""#)
                .body_contains(r#""name":"page_view""#)
                .body_contains(r#""item_id":"110445512345""#)
                .body_contains(r#""page_location":"https://www.ebay.com/itm/110445512345""#);
            then.status(204);
        });

        let forwarder = MeasurementProtocolForwarder::new(&config_for(server.url("/mp/collect")))
            .unwrap();
        forwarder.forward(&event()).await.unwrap();

        collect_mock.assert();
    }

    #[tokio::test]
    async fn test_forward_includes_api_secret_when_configured() {
        let server = MockServer::start();
        let collect_mock = server.mock(|when, then| {
            when.method(POST)
                .path("/mp/collect")
                .query_param("measurement_id", "G-TEST123")
                .query_param("api_secret", "s3cret");
            then.status(200);
        });

        let mut config = config_for(server.url("/mp/collect"));
        config.api_secret = Some("s3cret".to_string());
        let forwarder = MeasurementProtocolForwarder::new(&config).unwrap();
        forwarder.forward(&event()).await.unwrap();

        collect_mock.assert();
    }

    #[tokio::test]
    async fn test_forward_non_success_is_forward_error() {
        let server = MockServer::start();
        let collect_mock = server.mock(|when, then| {
            when.method(POST).path("/mp/collect");
            then.status(500);
        });

        let forwarder = MeasurementProtocolForwarder::new(&config_for(server.url("/mp/collect")))
            .unwrap();
        let err = forwarder.forward(&event()).await.unwrap_err();

        collect_mock.assert();
        assert!(matches!(err, RelayError::ForwardError { .. }));
    }

    #[tokio::test]
    async fn test_forward_unreachable_collector_is_forward_error() {
        let forwarder =
            MeasurementProtocolForwarder::new(&config_for("http://127.0.0.1:1/mp/collect".into()))
                .unwrap();
        let err = forwarder.forward(&event()).await.unwrap_err();

        assert!(matches!(err, RelayError::ForwardError { .. }));
    }

    #[tokio::test]
    async fn test_forward_slow_collector_times_out() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/mp/collect");
            then.status(204).delay(std::time::Duration::from_secs(4));
        });

        let config = AnalyticsConfig {
            timeout_seconds: 1,
            ..config_for(server.url("/mp/collect"))
        };
        let forwarder = MeasurementProtocolForwarder::new(&config).unwrap();

        let started = std::time::Instant::now();
        let err = forwarder.forward(&event()).await.unwrap_err();

        assert!(matches!(err, RelayError::ForwardError { .. }));
        assert!(started.elapsed() < std::time::Duration::from_secs(3));
    }
}
