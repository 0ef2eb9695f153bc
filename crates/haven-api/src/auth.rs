// Login endpoint.
//
// The hub has no session cookies or tokens — `POST /login` validates
// credentials and returns the user record. Logout is purely client-side.

use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use tracing::debug;

use crate::client::{HubClient, check_status};
use crate::error::Error;
use crate::models::User;

impl HubClient {
    /// Authenticate with the hub using username/password.
    ///
    /// Any non-success response — including 4xx for bad credentials — maps
    /// to [`Error::Authentication`].
    pub async fn login(&self, username: &str, password: &SecretString) -> Result<User, Error> {
        let url = self.url("/login")?;

        debug!("logging in at {}", url);

        let body = json!({
            "username": username,
            "password": password.expose_secret(),
        });

        let resp = self
            .http()
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(Error::Transport)?;

        let resp = check_status(resp).await.map_err(|e| match e {
            Error::Rejected { status, message } => Error::Authentication {
                message: format!("login failed (HTTP {status}): {message}"),
            },
            other => other,
        })?;

        let body = resp.text().await.map_err(Error::Transport)?;
        let user: User = serde_json::from_str(&body).map_err(|e| Error::Deserialization {
            message: format!("login response: {e}"),
            body,
        })?;

        debug!(user = %user.username, role = %user.role, "login successful");
        Ok(user)
    }
}
