//! Outbound delivery of a client's message to a device.
//!
//! [`Forwarder`] wraps `reqwest::Client` and issues
//! `PUT http://{address}{path}` with a `{"msg": ...}` body. Only a `200 OK`
//! from the device counts as delivered; everything else is a [`ForwardError`].

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use axum::http::StatusCode;
use tracing::debug;

use crate::config::ForwardConfig;
use crate::error::ForwardError;
use crate::message::MessagePayload;

/// HTTP client for the relay → device leg.
#[derive(Clone, Debug)]
pub struct Forwarder {
    http: reqwest::Client,
    path: String,
    device_port: Option<u16>,
}

impl Forwarder {
    pub fn new(config: &ForwardConfig) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_millis(config.connect_timeout_ms))
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;
        let path = if config.path.starts_with('/') {
            config.path.clone()
        } else {
            format!("/{}", config.path)
        };
        Ok(Self {
            http,
            path,
            device_port: config.device_port,
        })
    }

    /// Build the device URL for `address`.
    ///
    /// Bare IPv6 literals are bracketed. The configured `device_port` is only
    /// applied when `address` doesn't already carry a port.
    pub fn device_url(&self, address: &str) -> Result<reqwest::Url, ForwardError> {
        let address = address.trim();
        if address.is_empty() {
            return Err(ForwardError::InvalidUrl("device has no address".to_string()));
        }

        let authority = if address.parse::<SocketAddr>().is_ok() {
            address.to_string()
        } else if let Ok(ip) = address.parse::<IpAddr>() {
            let host = match ip {
                IpAddr::V4(v4) => v4.to_string(),
                IpAddr::V6(v6) => format!("[{v6}]"),
            };
            self.with_port(host)
        } else if address.contains(':') {
            // hostname:port
            address.to_string()
        } else {
            self.with_port(address.to_string())
        };

        let raw = format!("http://{authority}{}", self.path);
        reqwest::Url::parse(&raw).map_err(|e| ForwardError::InvalidUrl(format!("{raw}: {e}")))
    }

    fn with_port(&self, host: String) -> String {
        match self.device_port {
            Some(port) => format!("{host}:{port}"),
            None => host,
        }
    }

    /// Deliver `payload` to the device at `address`. Runs to completion or
    /// until the configured timeout.
    pub async fn forward(&self, address: &str, payload: &MessagePayload) -> Result<(), ForwardError> {
        let url = self.device_url(address)?;
        debug!(%url, "Forwarding message to device");
        let resp = self.http.put(url).json(payload).send().await?;
        match resp.status() {
            StatusCode::OK => Ok(()),
            status => Err(ForwardError::Status(status)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::{Arc, Mutex};

    use axum::{extract::State, routing::put, Json, Router};
    use tokio::net::TcpListener;

    fn forwarder(device_port: Option<u16>) -> Forwarder {
        Forwarder::new(&ForwardConfig {
            device_port,
            timeout_ms: 2000,
            ..ForwardConfig::default()
        })
        .unwrap()
    }

    /// Spawn a fake device answering `status` on `PUT /message`, recording bodies.
    async fn fake_device(status: StatusCode) -> (SocketAddr, Arc<Mutex<Vec<MessagePayload>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let app = Router::new()
            .route(
                "/message",
                put(
                    move |State(seen): State<Arc<Mutex<Vec<MessagePayload>>>>,
                          Json(body): Json<MessagePayload>| async move {
                        seen.lock().unwrap().push(body);
                        status
                    },
                ),
            )
            .with_state(seen.clone());
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (addr, seen)
    }

    #[test]
    fn test_device_url_ipv4() {
        let url = forwarder(None).device_url("192.168.80.103").unwrap();
        assert_eq!(url.as_str(), "http://192.168.80.103/message");
    }

    #[test]
    fn test_device_url_applies_port_only_when_missing() {
        let f = forwarder(Some(8080));
        assert_eq!(
            f.device_url("10.0.0.5").unwrap().as_str(),
            "http://10.0.0.5:8080/message"
        );
        assert_eq!(
            f.device_url("10.0.0.5:9000").unwrap().as_str(),
            "http://10.0.0.5:9000/message"
        );
        assert_eq!(
            f.device_url("screen.local").unwrap().as_str(),
            "http://screen.local:8080/message"
        );
    }

    #[test]
    fn test_device_url_brackets_ipv6() {
        assert_eq!(
            forwarder(None).device_url("::1").unwrap().as_str(),
            "http://[::1]/message"
        );
        assert_eq!(
            forwarder(Some(81)).device_url("fe80::2").unwrap().as_str(),
            "http://[fe80::2]:81/message"
        );
    }

    #[test]
    fn test_device_url_invalid() {
        let f = forwarder(None);
        assert!(matches!(f.device_url(""), Err(ForwardError::InvalidUrl(_))));
        assert!(matches!(
            f.device_url("bad host name"),
            Err(ForwardError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_custom_path_gets_leading_slash() {
        let f = Forwarder::new(&ForwardConfig {
            path: "inbox".to_string(),
            ..ForwardConfig::default()
        })
        .unwrap();
        assert_eq!(
            f.device_url("10.0.0.5").unwrap().as_str(),
            "http://10.0.0.5/inbox"
        );
    }

    #[tokio::test]
    async fn test_forward_success() {
        let (addr, seen) = fake_device(StatusCode::OK).await;
        forwarder(None)
            .forward(&addr.to_string(), &MessagePayload::new("ping"))
            .await
            .unwrap();
        assert_eq!(*seen.lock().unwrap(), vec![MessagePayload::new("ping")]);
    }

    #[tokio::test]
    async fn test_forward_non_200_is_error() {
        // 204 is a success class but not the status devices are expected to answer.
        for status in [StatusCode::NO_CONTENT, StatusCode::INTERNAL_SERVER_ERROR] {
            let (addr, _) = fake_device(status).await;
            let err = forwarder(None)
                .forward(&addr.to_string(), &MessagePayload::new("ping"))
                .await
                .unwrap_err();
            assert!(matches!(err, ForwardError::Status(s) if s == status));
        }
    }

    #[tokio::test]
    async fn test_forward_unreachable_is_error() {
        // Bind then drop to get a port nobody listens on.
        let addr = TcpListener::bind("127.0.0.1:0")
            .await
            .unwrap()
            .local_addr()
            .unwrap();
        let err = forwarder(None)
            .forward(&addr.to_string(), &MessagePayload::new("ping"))
            .await
            .unwrap_err();
        assert!(matches!(err, ForwardError::Request(_)));
    }
}
