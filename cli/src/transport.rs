//! Blocking `Transport` backed by ureq.

use log::debug;
use trackhub_core::{Error, HttpMethod, HttpRequest, HttpResponse, ServerEndpoint, Transport};
use ureq::tls::TlsConfig;
use ureq::{Agent, RequestBuilder};

/// One ureq agent configured from a `ServerEndpoint`.
///
/// 4xx/5xx responses come back as data; only connection and I/O failures
/// become `Error::Network`.
pub struct UreqTransport {
    agent: Agent,
}

impl UreqTransport {
    pub fn new(endpoint: &ServerEndpoint) -> Self {
        let mut config = Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(endpoint.timeout);
        if !endpoint.verify_tls {
            debug!("TLS certificate verification disabled");
            config = config.tls_config(TlsConfig::builder().disable_verification(true).build());
        }
        Self {
            agent: config.build().new_agent(),
        }
    }
}

fn with_headers<B>(mut builder: RequestBuilder<B>, headers: &[(String, String)]) -> RequestBuilder<B> {
    for (name, value) in headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}

impl Transport for UreqTransport {
    fn execute(&self, req: HttpRequest) -> Result<HttpResponse, Error> {
        let result = match (req.method, req.body) {
            (HttpMethod::Get, _) => with_headers(self.agent.get(&req.path), &req.headers).call(),
            (HttpMethod::Delete, _) => with_headers(self.agent.delete(&req.path), &req.headers).call(),
            (HttpMethod::Post, Some(body)) => {
                with_headers(self.agent.post(&req.path), &req.headers).send(body.as_bytes())
            }
            (HttpMethod::Post, None) => with_headers(self.agent.post(&req.path), &req.headers).send_empty(),
            (HttpMethod::Put, Some(body)) => {
                with_headers(self.agent.put(&req.path), &req.headers).send(body.as_bytes())
            }
            (HttpMethod::Put, None) => with_headers(self.agent.put(&req.path), &req.headers).send_empty(),
        };
        let mut response = result.map_err(|e| Error::Network(e.to_string()))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(k, v)| Some((k.as_str().to_string(), v.to_str().ok()?.to_string())))
            .collect();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| Error::Network(e.to_string()))?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}
