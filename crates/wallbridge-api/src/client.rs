// Wallbox HTTP client
//
// Wraps `reqwest::Client` with the device's URL layout, `AuthKey` header
// handling, and response decoding. Exactly one network attempt per call;
// the only extra traffic is a single transparent re-login when the device
// reports a stale auth key (HTTP 403).

use std::sync::RwLock;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::{debug, trace};
use url::Url;

use crate::error::Error;
use crate::models::{LedModeBody, LockCommand, LockReport, LoginResponse, PowerLimits, StatusReport};

/// Async client for a single wallbox.
///
/// Holds the device password so it can refresh the `AuthKey` when the
/// firmware invalidates sessions (it does so on every reboot). All state
/// besides that rotating key lives on the device; the client caches nothing.
pub struct WallboxClient {
    http: reqwest::Client,
    base_url: Url,
    password: SecretString,
    /// Session token issued by `/api/v1/login`; refreshed on 403.
    auth_key: RwLock<Option<String>>,
}

impl WallboxClient {
    /// Create a client for `host` (an IP or hostname, optionally with a
    /// scheme) with the given request deadline.
    pub fn new(host: &str, password: SecretString, timeout: Duration) -> Result<Self, Error> {
        let addr = if host.contains("://") {
            host.to_owned()
        } else {
            format!("http://{host}")
        };
        let base_url = Url::parse(&addr).map_err(|_| Error::InvalidAddress {
            address: host.to_owned(),
        })?;

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(Error::Connection)?;

        Ok(Self {
            http,
            base_url,
            password,
            auth_key: RwLock::new(None),
        })
    }

    /// Create a client with a pre-built `reqwest::Client` (used by tests).
    pub fn with_client(http: reqwest::Client, base_url: Url, password: SecretString) -> Self {
        Self {
            http,
            base_url,
            password,
            auth_key: RwLock::new(None),
        }
    }

    /// The device base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── Endpoints ────────────────────────────────────────────────────

    /// Authenticate against `POST /api/v1/login` and store the `AuthKey`.
    pub async fn login(&self) -> Result<(), Error> {
        let url = self.api_url("login")?;
        debug!("POST {url} (login)");

        let body = json!({ "Password": self.password.expose_secret() });
        let resp = self
            .http
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(Error::transport)?;

        let status = resp.status();
        if status == reqwest::StatusCode::FORBIDDEN {
            return Err(Error::Authentication {
                message: "device rejected the password".into(),
            });
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Api {
                status: status.as_u16(),
                message: preview(&body),
            });
        }

        let body = resp.text().await.map_err(Error::transport)?;
        let login: LoginResponse =
            serde_json::from_str(&body).map_err(|_| Error::Authentication {
                message: "login response carried no AuthKey".into(),
            })?;

        *self.auth_key.write().expect("auth key lock poisoned") = Some(login.auth_key);
        Ok(())
    }

    /// Fetch the bulk status report from `GET /api/v1/all`.
    pub async fn status(&self) -> Result<StatusReport, Error> {
        self.get("all").await
    }

    /// Fetch per-side lock and timer status from `GET /api/v1/lock_status`.
    pub async fn lock_status(&self) -> Result<LockReport, Error> {
        self.get("lock_status").await
    }

    /// Write all three current limits via `POST /api/v1/power`.
    pub async fn set_power(&self, limits: PowerLimits) -> Result<(), Error> {
        debug!(
            total = limits.max_current_total,
            car1 = limits.max_current_car1,
            car2 = limits.max_current_car2,
            "setting current limits"
        );
        self.post_ok("power", &limits).await
    }

    /// Lock or unlock one side via `POST /api/v1/lock`.
    pub async fn set_lock(&self, side: u8, locked: bool) -> Result<(), Error> {
        let command = LockCommand {
            action: if locked { "lock" } else { "unlock" },
            side,
        };
        self.post_ok("lock", &command).await
    }

    /// Read the raw LED mode (0/1/2) from `GET /api/v1/led_mode`.
    pub async fn led_mode(&self) -> Result<u8, Error> {
        let body: LedModeBody = self.get("led_mode").await?;
        Ok(body.led_mode)
    }

    /// Write the raw LED mode via `POST /api/v1/led_mode`.
    pub async fn set_led_mode(&self, mode: u8) -> Result<(), Error> {
        self.post_ok("led_mode", &LedModeBody { led_mode: mode }).await
    }

    // ── Request plumbing ─────────────────────────────────────────────

    fn api_url(&self, path: &str) -> Result<Url, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        let full = format!("{base}/api/v1/{path}");
        Url::parse(&full).map_err(|_| Error::InvalidAddress { address: full })
    }

    fn apply_auth(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let guard = self.auth_key.read().expect("auth key lock poisoned");
        match guard.as_deref() {
            Some(key) => builder.header("AuthKey", key),
            None => builder,
        }
    }

    /// Send an authenticated request, re-logging-in once on HTTP 403.
    ///
    /// The builder closure is invoked per attempt because a `RequestBuilder`
    /// is consumed on send.
    async fn send_authed<F>(&self, build: F) -> Result<reqwest::Response, Error>
    where
        F: Fn() -> reqwest::RequestBuilder,
    {
        let resp = self
            .apply_auth(build())
            .send()
            .await
            .map_err(Error::transport)?;
        if resp.status() != reqwest::StatusCode::FORBIDDEN {
            return Ok(resp);
        }

        debug!("auth key rejected, re-authenticating");
        self.login().await?;

        let resp = self
            .apply_auth(build())
            .send()
            .await
            .map_err(Error::transport)?;
        if resp.status() == reqwest::StatusCode::FORBIDDEN {
            return Err(Error::Authentication {
                message: "auth key rejected again after re-login".into(),
            });
        }
        Ok(resp)
    }

    /// GET an endpoint and decode the JSON body.
    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let url = self.api_url(path)?;
        trace!("GET {url}");
        let resp = self.send_authed(|| self.http.get(url.clone())).await?;
        decode_json(resp).await
    }

    /// POST a JSON body, requiring only a success status in return.
    ///
    /// Write endpoints answer with free-form acknowledgement text; the
    /// confirmed values are read back through the next status poll instead.
    async fn post_ok<B: Serialize + Sync>(&self, path: &str, body: &B) -> Result<(), Error> {
        let url = self.api_url(path)?;
        trace!("POST {url}");
        let resp = self
            .send_authed(|| self.http.post(url.clone()).json(body))
            .await?;

        let status = resp.status();
        if status.is_success() {
            return Ok(());
        }
        let body = resp.text().await.unwrap_or_default();
        Err(Error::Api {
            status: status.as_u16(),
            message: preview(&body),
        })
    }
}

/// Check the status and decode the body, mapping decode failures to
/// [`Error::Protocol`] with a body preview for debugging firmware quirks.
async fn decode_json<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(Error::Api {
            status: status.as_u16(),
            message: preview(&body),
        });
    }

    let body = resp.text().await.map_err(Error::transport)?;
    serde_json::from_str(&body).map_err(|e| Error::Protocol {
        message: format!("{e} (body preview: {:?})", preview(&body)),
    })
}

/// First 200 characters of a response body, for error messages.
fn preview(body: &str) -> String {
    body.chars().take(200).collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn client(host: &str) -> WallboxClient {
        WallboxClient::new(host, SecretString::from("pw"), Duration::from_secs(1)).unwrap()
    }

    #[test]
    fn api_url_joins_regardless_of_trailing_slash() {
        for host in ["192.168.1.50", "http://192.168.1.50/", "https://box.local"] {
            let url = client(host).api_url("all").unwrap();
            assert_eq!(url.path(), "/api/v1/all", "host: {host}");
        }
    }
}
