use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine as _;
use chrono::NaiveDate;
use reqwest::blocking::{Client, Response};
use reqwest::header::{ACCEPT, AUTHORIZATION};
use std::fmt::Debug;

use crate::config::HrConfig;

#[derive(Debug, thiserror::Error)]
pub enum HrGatewayError {
    #[error("HR endpoint returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("HR transport failure: {0}")]
    Transport(String),
}

/// Seam for the HR platform API so the digest workflow can run against
/// canned responses in tests. Both fetches return the raw XML body; parsing
/// and the empty-on-failure policy live in the workflow.
pub trait HrGateway: Debug {
    fn fetch_time_off_requests(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<String, HrGatewayError>;

    fn fetch_employee_directory(&self) -> Result<String, HrGatewayError>;
}

/// Blocking HTTP client for the tenant-scoped HR gateway.
pub struct HttpHrClient {
    client: Client,
    gateway_base: String,
    authorization: String,
}

impl HttpHrClient {
    pub fn new(config: &HrConfig) -> Result<Self, HrGatewayError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|err| HrGatewayError::Transport(err.to_string()))?;

        Ok(Self {
            client,
            gateway_base: config.gateway_base(),
            authorization: basic_authorization(&config.api_key),
        })
    }
}

impl Debug for HttpHrClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpHrClient").finish_non_exhaustive()
    }
}

impl HrGateway for HttpHrClient {
    fn fetch_time_off_requests(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<String, HrGatewayError> {
        let url = format!("{}/v1/time_off/requests/", self.gateway_base);
        let response = self
            .client
            .get(url)
            .query(&[
                ("start", start.format("%Y-%m-%d").to_string()),
                ("end", end.format("%Y-%m-%d").to_string()),
            ])
            .header(AUTHORIZATION, self.authorization.as_str())
            .send()
            .map_err(|err| HrGatewayError::Transport(err.to_string()))?;

        read_body(response)
    }

    fn fetch_employee_directory(&self) -> Result<String, HrGatewayError> {
        let url = format!("{}/v1/employees/directory", self.gateway_base);
        let response = self
            .client
            .get(url)
            .header(ACCEPT, "application/xml")
            .header(AUTHORIZATION, self.authorization.as_str())
            .send()
            .map_err(|err| HrGatewayError::Transport(err.to_string()))?;

        read_body(response)
    }
}

fn read_body(response: Response) -> Result<String, HrGatewayError> {
    let status = response.status();
    let body = response
        .text()
        .map_err(|err| HrGatewayError::Transport(err.to_string()))?;

    if status.is_success() {
        Ok(body)
    } else {
        Err(HrGatewayError::Status {
            status: status.as_u16(),
            body,
        })
    }
}

/// The HR API authenticates with the key as the Basic username and an empty
/// password, i.e. base64 over `{api_key}:`.
fn basic_authorization(api_key: &str) -> String {
    format!("Basic {}", BASE64_STANDARD.encode(format!("{api_key}:")))
}
