use crate::config::Credential;

/// Turns the configured credential into something requests can carry.
pub struct Authenticator {
    credential: Credential,
}

/// Attached to every request the API client sends. The token is not checked
/// here; a bad one shows up as the first request's error.
#[derive(Debug, Clone)]
pub struct AuthHandle {
    credential: Credential,
}

impl Authenticator {
    pub fn new(credential: Credential) -> Self {
        Self { credential }
    }

    pub fn authenticate(&self) -> AuthHandle {
        AuthHandle {
            credential: self.credential.clone(),
        }
    }
}

impl AuthHandle {
    pub fn header_value(&self) -> String {
        format!("Bearer {}", self.credential.token())
    }

    pub fn apply(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request.bearer_auth(self.credential.token())
    }
}
