//! JWT issue and validation.

use crate::config::TokenConfig;
use crate::error::{AppError, AppResult};
use crate::models::Principal;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

const ALGORITHM: Algorithm = Algorithm::HS256;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub username: String,
    pub role: String,
    /// Absent in tokens minted by older issuers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
    pub exp: i64,
}

#[derive(Clone)]
struct Keys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

/// Signs and verifies bearer tokens with the process-wide HMAC secret.
#[derive(Clone)]
pub struct TokenIssuer {
    keys: Option<Keys>,
    ttl: Option<Duration>,
}

impl TokenIssuer {
    pub fn new(config: &TokenConfig) -> Self {
        let keys = (!config.secret.is_empty()).then(|| Keys {
            encoding: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding: DecodingKey::from_secret(config.secret.as_bytes()),
        });
        Self {
            keys,
            ttl: Duration::try_hours(config.ttl_hours),
        }
    }

    fn keys(&self) -> AppResult<&Keys> {
        self.keys
            .as_ref()
            .ok_or_else(|| AppError::Signing("signing secret is empty".to_string()))
    }

    pub fn issue(&self, principal: &Principal) -> AppResult<String> {
        self.issue_at(principal, Utc::now())
    }

    pub fn issue_at(&self, principal: &Principal, now: DateTime<Utc>) -> AppResult<String> {
        let keys = self.keys()?;
        let exp = self
            .ttl
            .and_then(|ttl| now.checked_add_signed(ttl))
            .ok_or_else(|| AppError::Signing("token lifetime out of range".to_string()))?;
        let claims = Claims {
            username: principal.username.clone(),
            role: principal.role.clone(),
            iat: Some(now.timestamp()),
            exp: exp.timestamp(),
        };
        encode(&Header::new(ALGORITHM), &claims, &keys.encoding)
            .map_err(|e| AppError::Signing(e.to_string()))
    }

    pub fn verify(&self, token: &str) -> AppResult<Principal> {
        self.verify_at(token, Utc::now())
    }

    /// Token is valid for `iat <= now < exp`, signed with HS256 only. `iat` is checked only
    /// when present.
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> AppResult<Principal> {
        let keys = self.keys()?;

        // Expiry is checked below against `now` instead of the library clock.
        let mut validation = Validation::new(ALGORITHM);
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        let data = decode::<Claims>(token, &keys.decoding, &validation)
            .map_err(|e| AppError::InvalidToken(e.to_string()))?;

        let now = now.timestamp();
        if data.claims.exp <= now {
            return Err(AppError::InvalidToken("expired".to_string()));
        }
        if data.claims.iat.is_some_and(|iat| iat > now) {
            return Err(AppError::InvalidToken("issued in the future".to_string()));
        }

        Ok(Principal {
            username: data.claims.username,
            role: data.claims.role,
        })
    }
}
