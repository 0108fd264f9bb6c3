use meshscope_core::ignition::IgnitionRequest;
use meshscope_core::node_config::validate_node_config;
use meshscope_core::scan::ScanOutcome;
use meshscope_core::status::{LinkDump, StatusReport};
use serde::de::DeserializeOwned;

use crate::error::ClientError;
use crate::guard::InFlight;

pub const DEFAULT_API_PREFIX: &str = "http://127.0.0.1/";

/// REST client for a single node's web API.
#[derive(Debug, Clone)]
pub struct NodeClient {
    http: reqwest::Client,
    prefix: String,
}

impl NodeClient {
    pub fn new(prefix: &str) -> Self {
        Self::with_http(reqwest::Client::new(), prefix)
    }

    pub fn with_http(http: reqwest::Client, prefix: &str) -> Self {
        let mut prefix = prefix.to_string();
        if !prefix.ends_with('/') {
            prefix.push('/');
        }
        Self { http, prefix }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Full API URL for the given endpoint.
    pub fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.prefix, endpoint.trim_start_matches('/'))
    }

    /// WebSocket URL for the given endpoint, on the same host as the API.
    pub fn ws_url(&self, endpoint: &str) -> Result<String, ClientError> {
        let url = self.url(endpoint);
        if let Some(rest) = url.strip_prefix("https://") {
            Ok(format!("wss://{}", rest))
        } else if let Some(rest) = url.strip_prefix("http://") {
            Ok(format!("ws://{}", rest))
        } else {
            Err(ClientError::Url(url))
        }
    }

    async fn get_text(&self, endpoint: &str) -> Result<String, ClientError> {
        let url = self.url(endpoint);
        log::debug!("GET {}", url);
        let response = self.http.get(&url).send().await?;
        read_body(response).await
    }

    async fn get_json<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, ClientError> {
        let body = self.get_text(endpoint).await?;
        Ok(serde_json::from_str(&body)?)
    }

    pub async fn status_report(&self) -> Result<StatusReport, ClientError> {
        self.get_json("status_report").await
    }

    pub async fn link_dump(&self) -> Result<LinkDump, ClientError> {
        self.get_json("link_dump").await
    }

    /// Run a topology scan from `radio_mac`.
    ///
    /// There is no client-side timeout; the node answers once the scan
    /// finishes or fails. `in_flight` is held until then.
    pub async fn topo_scan(
        &self,
        radio_mac: &str,
        in_flight: &InFlight,
    ) -> Result<ScanOutcome, ClientError> {
        let _ticket = in_flight.try_begin()?;
        log::info!("Starting topology scan from {}", radio_mac);
        self.get_json(&format!("topo_scan/{}", radio_mac)).await
    }

    pub async fn ignition(&self, request: &IgnitionRequest) -> Result<String, ClientError> {
        log::info!(
            "{} {} -> {}",
            request.action.label(),
            request.initiator,
            request.responder
        );
        self.get_text(&ignition_path(request)).await
    }

    /// Raw node configuration text.
    pub async fn node_config(&self) -> Result<String, ClientError> {
        self.get_text("node_config").await
    }

    /// Send a node configuration; invalid JSON never leaves the client.
    pub async fn set_node_config(&self, draft: &str) -> Result<String, ClientError> {
        validate_node_config(draft)?;

        let url = self.url("node_config");
        log::debug!("POST {} ({} bytes)", url, draft.len());
        let response = self.http.post(&url).body(draft.to_string()).send().await?;
        read_body(response).await
    }

    pub async fn reboot(&self) -> Result<String, ClientError> {
        log::warn!("Sending reboot to {}", self.prefix);
        self.get_text("reboot").await
    }
}

fn ignition_path(request: &IgnitionRequest) -> String {
    format!(
        "link/{}/{}/{}",
        request.action.endpoint(),
        request.initiator,
        request.responder
    )
}

async fn read_body(response: reqwest::Response) -> Result<String, ClientError> {
    let status = response.status();
    let body = response.text().await?;
    if status.is_success() {
        Ok(body)
    } else {
        let body = if body.trim().is_empty() {
            status.canonical_reason().unwrap_or("request failed").to_string()
        } else {
            body
        };
        Err(ClientError::Status {
            code: status.as_u16(),
            body,
        })
    }
}
