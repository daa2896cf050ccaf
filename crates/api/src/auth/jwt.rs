//! Verification of access tokens issued by the hosted auth provider.
//!
//! Tokens are HS256-signed with the project's shared secret and carry the
//! provider's standard claims. The server never issues tokens in production;
//! [`encode_token`] exists for tests and local tooling.

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use vlab_core::types::DbId;

/// Default `aud` claim on provider-issued tokens for signed-in users.
pub const DEFAULT_AUDIENCE: &str = "authenticated";

/// Profile fields the provider copies from the identity (OAuth or email).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

impl UserMetadata {
    /// Preferred display name: `full_name`, then `name`.
    pub fn display_name(&self) -> Option<&str> {
        self.full_name
            .as_deref()
            .or(self.name.as_deref())
            .filter(|s| !s.trim().is_empty())
    }
}

/// JWT claims embedded in every access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user's id.
    pub sub: DbId,
    pub aud: String,
    /// Expiration time (Unix timestamp).
    pub exp: i64,
    /// Issued-at time (Unix timestamp).
    pub iat: i64,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub is_anonymous: bool,
    #[serde(default)]
    pub user_metadata: UserMetadata,
}

/// Token verification settings.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Shared HMAC secret used to verify tokens.
    pub secret: String,
    /// Required `aud` claim.
    pub audience: String,
}

impl JwtConfig {
    /// Load JWT configuration from environment variables.
    ///
    /// | Env Var             | Required | Default         |
    /// |---------------------|----------|-----------------|
    /// | `AUTH_JWT_SECRET`   | yes      | -               |
    /// | `AUTH_JWT_AUDIENCE` | no       | `authenticated` |
    ///
    /// # Panics
    ///
    /// Panics if `AUTH_JWT_SECRET` is not set or is empty.
    pub fn from_env() -> Self {
        let secret =
            std::env::var("AUTH_JWT_SECRET").expect("AUTH_JWT_SECRET must be set in the environment");
        assert!(!secret.is_empty(), "AUTH_JWT_SECRET must not be empty");

        let audience =
            std::env::var("AUTH_JWT_AUDIENCE").unwrap_or_else(|_| DEFAULT_AUDIENCE.to_string());

        Self { secret, audience }
    }
}

/// Validate a token and return its decoded claims.
///
/// Checks the HS256 signature, expiration and audience.
pub fn validate_token(token: &str, config: &JwtConfig) -> Result<Claims, jsonwebtoken::errors::Error> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_audience(&[config.audience.as_str()]);
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &validation,
    )?;
    Ok(data.claims)
}

/// Sign `claims` with the configured secret.
pub fn encode_token(claims: &Claims, config: &JwtConfig) -> Result<String, jsonwebtoken::errors::Error> {
    encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

/// Claims for a signed-in user valid for `ttl_secs` from now.
pub fn claims_for(user_id: DbId, email: Option<&str>, audience: &str, ttl_secs: i64) -> Claims {
    let now = chrono::Utc::now().timestamp();
    Claims {
        sub: user_id,
        aud: audience.to_string(),
        exp: now + ttl_secs,
        iat: now,
        email: email.map(str::to_string),
        role: Some(DEFAULT_AUDIENCE.to_string()),
        is_anonymous: false,
        user_metadata: UserMetadata::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> JwtConfig {
        JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            audience: DEFAULT_AUDIENCE.to_string(),
        }
    }

    #[test]
    fn encode_and_validate_round_trip() {
        let config = test_config();
        let user = DbId::new_v4();
        let token = encode_token(&claims_for(user, Some("a@b.dev"), DEFAULT_AUDIENCE, 300), &config)
            .expect("token generation should succeed");

        let claims = validate_token(&token, &config).expect("validation should succeed");
        assert_eq!(claims.sub, user);
        assert_eq!(claims.email.as_deref(), Some("a@b.dev"));
        assert!(!claims.is_anonymous);
    }

    #[test]
    fn expired_token_is_rejected() {
        let config = test_config();
        let mut claims = claims_for(DbId::new_v4(), None, DEFAULT_AUDIENCE, 0);
        // Past the default 60s leeway.
        claims.exp = chrono::Utc::now().timestamp() - 300;
        let token = encode_token(&claims, &config).unwrap();

        assert!(validate_token(&token, &config).is_err());
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let config = test_config();
        let token = encode_token(&claims_for(DbId::new_v4(), None, DEFAULT_AUDIENCE, 300), &config)
            .unwrap();

        let other = JwtConfig {
            secret: "a-completely-different-secret".to_string(),
            ..test_config()
        };
        assert!(validate_token(&token, &other).is_err());
    }

    #[test]
    fn wrong_audience_is_rejected() {
        let config = test_config();
        let token =
            encode_token(&claims_for(DbId::new_v4(), None, "service_role", 300), &config).unwrap();
        assert!(validate_token(&token, &config).is_err());
    }

    #[test]
    fn provider_payload_with_metadata_decodes() {
        let config = test_config();
        let now = chrono::Utc::now().timestamp();
        let payload = serde_json::json!({
            "sub": DbId::new_v4(),
            "aud": "authenticated",
            "exp": now + 300,
            "iat": now,
            "role": "authenticated",
            "is_anonymous": true,
            "user_metadata": { "name": "Ada", "avatar_url": "https://img.example/a.png" },
            "app_metadata": { "provider": "github" }
        });
        let token = encode(
            &Header::new(Algorithm::HS256),
            &payload,
            &EncodingKey::from_secret(config.secret.as_bytes()),
        )
        .unwrap();

        let claims = validate_token(&token, &config).unwrap();
        assert!(claims.is_anonymous);
        assert_eq!(claims.email, None);
        assert_eq!(claims.user_metadata.display_name(), Some("Ada"));
    }
}
