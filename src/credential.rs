//! The admin secret and the HTTP Basic Authentication check against it.
//!
//! The password is compared as a plain string. That is neither constant time
//! nor hashed; see DESIGN.md.

use std::fmt;
use std::path::Path;

use axum::http::{HeaderMap, header::AUTHORIZATION};
use base64::{Engine, engine::general_purpose::STANDARD};

use crate::error::CredentialError;

pub const ADMIN_USER: &str = "admin";

#[derive(Clone)]
pub struct Credential {
    password: String,
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential").field("password", &"***").finish()
    }
}

impl Credential {
    pub fn new(password: impl Into<String>) -> Self {
        Credential {
            password: password.into(),
        }
    }

    /// Reads the secret from `path`. A missing or empty file is an error.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CredentialError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| CredentialError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let password = strip_line_ending(&raw);
        if password.is_empty() {
            return Err(CredentialError::Empty {
                path: path.to_path_buf(),
            });
        }

        Ok(Credential::new(password))
    }

    /// True when the request carries `Authorization: Basic` for the admin
    /// user with the loaded password.
    pub fn authorize(&self, headers: &HeaderMap) -> bool {
        match basic_auth(headers) {
            Some((user, password)) => user == ADMIN_USER && password == self.password,
            None => false,
        }
    }
}

fn strip_line_ending(s: &str) -> &str {
    s.strip_suffix("\r\n")
        .or_else(|| s.strip_suffix('\n'))
        .unwrap_or(s)
}

/// Decodes the Basic credentials from the `Authorization` header.
pub fn basic_auth(headers: &HeaderMap) -> Option<(String, String)> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, encoded) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return None;
    }

    let decoded = STANDARD.decode(encoded.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (user, password) = decoded.split_once(':')?;
    Some((user.to_string(), password.to_string()))
}
