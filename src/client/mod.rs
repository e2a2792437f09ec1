//! Client layer: orchestrates transport calls and maps transport ↔ domain.

use std::error::Error as StdError;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};
use url::Url;

use crate::config::{ConfigError, DEFAULT_BALANCE_ENDPOINT, DEFAULT_SEND_ENDPOINT, GatewayConfig};
use crate::domain::{
    BalanceResponse, Credentials, GatewayStatusCode, SendSms, SendSmsResponse, SmsDraft,
    ValidationError,
};
use crate::transport::GatewayReply;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

#[derive(Debug, Clone, PartialEq, Eq)]
/// Raw HTTP reply handed back by an [`HttpTransport`].
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

/// Performs the actual network call for a fully assembled URL.
///
/// Retries, timeouts and TLS belong to the implementation. The default implementation uses
/// `reqwest`.
pub trait HttpTransport: Send + Sync {
    fn get<'a>(
        &'a self,
        url: &'a str,
    ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>>;
}

#[derive(Debug, Clone)]
struct ReqwestTransport {
    client: reqwest::Client,
}

impl HttpTransport for ReqwestTransport {
    fn get<'a>(
        &'a self,
        url: &'a str,
    ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>> {
        Box::pin(async move {
            let response = self.client.get(url).send().await?;
            let status = response.status().as_u16();
            let body = response.text().await?;
            Ok(HttpResponse { status, body })
        })
    }
}

#[derive(Debug, thiserror::Error)]
/// Errors returned by [`BulkSmsClient`].
pub enum BulkSmsError {
    /// The transport could not complete the request (DNS, TLS, timeouts, etc). Not retried.
    #[error("transmission failed: {0}")]
    TransmissionFailed(#[source] Box<dyn StdError + Send + Sync>),

    /// Non-successful HTTP status code returned by the server.
    #[error("unexpected HTTP status: {status}")]
    HttpStatus { status: u16, body: Option<String> },

    /// The gateway answered with a status code instead of a result.
    #[error("gateway error code {}", .code.as_str())]
    Gateway { code: GatewayStatusCode },

    /// Response body could not be decoded.
    #[error("parse error: {0}")]
    Parse(#[source] Box<dyn StdError + Send + Sync>),

    /// A configured endpoint is not a valid URL.
    #[error("invalid endpoint {endpoint:?}: {source}")]
    InvalidEndpoint {
        endpoint: String,
        #[source]
        source: url::ParseError,
    },

    /// One of the domain constructors rejected an invalid value.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

#[derive(Clone)]
/// Builder for [`BulkSmsClient`].
///
/// Use this when you need to customize the endpoints, timeout, user-agent or transport.
pub struct BulkSmsClientBuilder {
    credentials: Credentials,
    send_endpoint: String,
    balance_endpoint: String,
    timeout: Option<Duration>,
    user_agent: Option<String>,
    transport: Option<Arc<dyn HttpTransport>>,
}

impl BulkSmsClientBuilder {
    /// Create a builder with the default endpoints and no timeout/user-agent override.
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            send_endpoint: DEFAULT_SEND_ENDPOINT.to_owned(),
            balance_endpoint: DEFAULT_BALANCE_ENDPOINT.to_owned(),
            timeout: None,
            user_agent: None,
            transport: None,
        }
    }

    /// Override the endpoint used for sending messages.
    pub fn send_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.send_endpoint = endpoint.into();
        self
    }

    /// Override the endpoint used for balance inquiries.
    pub fn balance_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.balance_endpoint = endpoint.into();
        self
    }

    /// Set an HTTP client timeout applied to the entire request.
    ///
    /// Ignored when a custom transport is supplied.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Override the HTTP `User-Agent` header.
    ///
    /// Ignored when a custom transport is supplied.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Use a custom transport instead of the built-in `reqwest` one.
    pub fn transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Build a [`BulkSmsClient`].
    pub fn build(self) -> Result<BulkSmsClient, BulkSmsError> {
        parse_endpoint(&self.send_endpoint)?;
        parse_endpoint(&self.balance_endpoint)?;

        let http = match self.transport {
            Some(transport) => transport,
            None => {
                let mut builder = reqwest::Client::builder();
                if let Some(timeout) = self.timeout {
                    builder = builder.timeout(timeout);
                }
                if let Some(user_agent) = self.user_agent {
                    builder = builder.user_agent(user_agent);
                }
                let client = builder
                    .build()
                    .map_err(|err| BulkSmsError::TransmissionFailed(Box::new(err)))?;
                Arc::new(ReqwestTransport { client })
            }
        };

        Ok(BulkSmsClient {
            credentials: self.credentials,
            send_endpoint: self.send_endpoint,
            balance_endpoint: self.balance_endpoint,
            http,
        })
    }
}

#[derive(Clone)]
/// High-level client for the 1s2u bulk SMS gateway.
///
/// By default it uses:
/// - `https://api.1s2u.io/bulksms` for sending messages
/// - `https://api.1s2u.io/checkbalance` for balance inquiries
pub struct BulkSmsClient {
    credentials: Credentials,
    send_endpoint: String,
    balance_endpoint: String,
    http: Arc<dyn HttpTransport>,
}

impl BulkSmsClient {
    /// Create a client using the default endpoints.
    ///
    /// For more customization, use [`BulkSmsClient::builder`].
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            send_endpoint: DEFAULT_SEND_ENDPOINT.to_owned(),
            balance_endpoint: DEFAULT_BALANCE_ENDPOINT.to_owned(),
            http: Arc::new(ReqwestTransport {
                client: reqwest::Client::new(),
            }),
        }
    }

    /// Start building a client with custom settings.
    pub fn builder(credentials: Credentials) -> BulkSmsClientBuilder {
        BulkSmsClientBuilder::new(credentials)
    }

    /// Create a client from validated configuration values.
    pub fn from_config(config: &GatewayConfig) -> Result<Self, BulkSmsError> {
        Self::builder(config.credentials()?)
            .send_endpoint(config.send_endpoint.clone())
            .balance_endpoint(config.balance_endpoint.clone())
            .build()
    }

    /// Default credentials of this client.
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// A fresh draft seeded with this client's credentials.
    pub fn draft(&self) -> SmsDraft {
        SmsDraft::with_credentials(&self.credentials)
    }

    /// Validate `draft` and send it.
    pub async fn send(&self, draft: &SmsDraft) -> Result<SendSmsResponse, BulkSmsError> {
        let request = draft.build()?;
        self.send_sms(request).await
    }

    /// Send a validated message.
    ///
    /// Errors:
    /// - [`BulkSmsError::TransmissionFailed`] when the transport fails,
    /// - [`BulkSmsError::HttpStatus`] for non-2xx HTTP responses,
    /// - [`BulkSmsError::Gateway`] when the gateway replies with a status code.
    pub async fn send_sms(&self, request: SendSms) -> Result<SendSmsResponse, BulkSmsError> {
        debug!(
            endpoint = %self.send_endpoint,
            recipients = request.recipients().len(),
            message_type = ?request.message_type(),
            flash = request.is_flash(),
            "sending message"
        );

        let query = crate::transport::encode_send_sms_query(&request);
        let body = self.dispatch(&self.send_endpoint, &query).await?;

        let reply = crate::transport::decode_send_sms_response(&body)
            .map_err(|err| BulkSmsError::Parse(Box::new(err)))?;
        let response = into_result(reply)?;
        debug!(message_ids = response.message_ids.len(), "message accepted");
        Ok(response)
    }

    /// Query the remaining credit for this client's credentials.
    pub async fn check_balance(&self) -> Result<BalanceResponse, BulkSmsError> {
        self.check_balance_with(&self.credentials).await
    }

    /// Query the remaining credit for another account.
    pub async fn check_balance_with(
        &self,
        credentials: &Credentials,
    ) -> Result<BalanceResponse, BulkSmsError> {
        debug!(endpoint = %self.balance_endpoint, "checking balance");

        let query = crate::transport::encode_balance_query(credentials);
        let body = self.dispatch(&self.balance_endpoint, &query).await?;

        let reply = crate::transport::decode_balance_response(&body)
            .map_err(|err| BulkSmsError::Parse(Box::new(err)))?;
        into_result(reply)
    }

    async fn dispatch(&self, endpoint: &str, query: &str) -> Result<String, BulkSmsError> {
        let mut url = parse_endpoint(endpoint)?;
        url.set_query(Some(query));

        let response = self.http.get(url.as_str()).await.map_err(|err| {
            warn!(endpoint, error = %err, "transport failure");
            BulkSmsError::TransmissionFailed(err)
        })?;

        if !(200..=299).contains(&response.status) {
            warn!(endpoint, status = response.status, "unexpected HTTP status");
            let body = if response.body.trim().is_empty() {
                None
            } else {
                Some(response.body)
            };
            return Err(BulkSmsError::HttpStatus {
                status: response.status,
                body,
            });
        }

        Ok(response.body)
    }
}

fn parse_endpoint(endpoint: &str) -> Result<Url, BulkSmsError> {
    Url::parse(endpoint).map_err(|source| BulkSmsError::InvalidEndpoint {
        endpoint: endpoint.to_owned(),
        source,
    })
}

fn into_result<T>(reply: GatewayReply<T>) -> Result<T, BulkSmsError> {
    match reply {
        GatewayReply::Ok(value) => Ok(value),
        GatewayReply::Status(code) => {
            warn!(code = code.as_str(), known = ?code.known(), "gateway returned an error code");
            Err(BulkSmsError::Gateway { code })
        }
    }
}
