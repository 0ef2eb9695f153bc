// Hub HTTP client
//
// Wraps `reqwest::Client` with hub-specific URL construction and response
// handling. All endpoint modules (auth, devices, readings, logs, schedule)
// are implemented as inherent methods via separate files to keep this
// module focused on transport mechanics.

use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;

/// Raw HTTP client for the haven control hub.
///
/// Holds a connection-pooled `reqwest::Client` and the hub base URL.
/// Cheap to clone. Methods return unwrapped payloads — status handling
/// and deserialization happen here, the caller sees typed results.
#[derive(Debug, Clone)]
pub struct HubClient {
    http: reqwest::Client,
    base_url: Url,
}

impl HubClient {
    /// Create a new hub client from a `TransportConfig`.
    ///
    /// `base_url` is the hub root (e.g. `http://192.168.8.191:8000`).
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self { http, base_url })
    }

    /// Create a hub client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self { http, base_url }
    }

    /// The hub base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The underlying HTTP client (for auth flows that need direct access).
    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// The camera stream URL. The MJPEG stream is consumed directly by an
    /// image viewer — this client never decodes it.
    pub fn video_feed_url(&self) -> Result<Url, Error> {
        Ok(self.base_url.join("/video_feed")?)
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Build a full URL for a hub path.
    pub(crate) fn url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path)?)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Send a GET request and deserialize the JSON body.
    pub(crate) async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        debug!("GET {}", url);

        let resp = self.http.get(url).send().await.map_err(Error::Transport)?;
        let resp = check_status(resp).await?;

        let body = resp.text().await.map_err(Error::Transport)?;
        serde_json::from_str(&body).map_err(|e| {
            let preview = body_preview(&body);
            Error::Deserialization {
                message: format!("{e} (body preview: {preview:?})"),
                body: body.clone(),
            }
        })
    }

    /// Send a GET request where only the status matters (device commands —
    /// the hub's write endpoints are GETs with query parameters).
    pub(crate) async fn get_command(&self, url: Url) -> Result<(), Error> {
        debug!("GET {}", url);

        let resp = self.http.get(url).send().await.map_err(Error::Transport)?;
        check_status(resp).await?;
        Ok(())
    }

    /// Send a POST request with a JSON body where only the status matters.
    pub(crate) async fn post_command(
        &self,
        url: Url,
        body: &(impl serde::Serialize + Sync),
    ) -> Result<(), Error> {
        debug!("POST {}", url);

        let resp = self
            .http
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(Error::Transport)?;
        check_status(resp).await?;
        Ok(())
    }
}

/// Map a response status into the error taxonomy.
///
/// 401/403 are authentication failures regardless of endpoint — the sync
/// loop treats them as an implicit logout. Any other non-success status is
/// a rejection carrying a body preview.
pub(crate) async fn check_status(resp: reqwest::Response) -> Result<reqwest::Response, Error> {
    let status = resp.status();

    if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
        return Err(Error::Authentication {
            message: format!("hub answered HTTP {status}"),
        });
    }

    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(Error::Rejected {
            status: status.as_u16(),
            message: body_preview(&body).to_owned(),
        });
    }

    Ok(resp)
}

const BODY_PREVIEW_LIMIT: usize = 200;

/// Truncate a response body for error messages, backing off to the
/// nearest char boundary so multi-byte UTF-8 never splits.
pub(crate) fn body_preview(body: &str) -> &str {
    if body.len() <= BODY_PREVIEW_LIMIT {
        return body;
    }
    let mut end = BODY_PREVIEW_LIMIT;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    &body[..end]
}
