use crate::config::{JwtConfig, MAX_TTL_MINUTES};
use crate::error::AppError;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// JWT claims carried by every access token.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Claims {
    /// Subject: the authenticated username.
    pub sub: String,
    pub iss: String,
    pub aud: String,
    /// Issued at (unix timestamp).
    pub iat: i64,
    /// Expiration (unix timestamp).
    pub exp: i64,
    /// Token id.
    pub jti: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IssuedToken {
    pub token: String,
    #[schema(example = "Bearer")]
    pub token_type: String,
    pub expires_at: DateTime<Utc>,
}

/// Issues and validates HS256 tokens for one issuer/audience pair.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    issuer: String,
    audience: String,
    ttl: Duration,
}

impl TokenService {
    pub fn new(config: &JwtConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&config.issuer]);
        validation.set_audience(&[&config.audience]);
        validation.set_required_spec_claims(&["exp", "iss", "aud", "sub"]);
        TokenService {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
            issuer: config.issuer.clone(),
            audience: config.audience.clone(),
            ttl: Duration::minutes(config.ttl_minutes.clamp(1, MAX_TTL_MINUTES)),
        }
    }

    pub fn issue(&self, subject: &str) -> Result<IssuedToken, AppError> {
        self.issue_at(subject, Utc::now())
    }

    fn issue_at(&self, subject: &str, now: DateTime<Utc>) -> Result<IssuedToken, AppError> {
        let expires_at = now
            .checked_add_signed(self.ttl)
            .ok_or_else(|| AppError::Internal("token expiry out of range".into()))?;
        let claims = Claims {
            sub: subject.to_string(),
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
            jti: uuid::Uuid::new_v4().to_string(),
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("token signing failed: {}", e)))?;
        Ok(IssuedToken {
            token,
            token_type: "Bearer".to_string(),
            expires_at,
        })
    }

    /// Check signature, issuer, audience and lifetime; return the claims.
    pub fn verify(&self, token: &str) -> Result<Claims, AppError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| AppError::Unauthorized(format!("invalid token: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(audience: &str) -> JwtConfig {
        JwtConfig {
            issuer: "produtos-api".into(),
            audience: audience.into(),
            secret: "0123456789abcdef0123456789abcdef".into(),
            ttl_minutes: 60,
        }
    }

    #[test]
    fn issued_token_verifies() {
        let service = TokenService::new(&config("clients"));
        let issued = service.issue("admin").unwrap();
        let claims = service.verify(&issued.token).unwrap();
        assert_eq!(claims.sub, "admin");
        assert_eq!(claims.iss, "produtos-api");
        assert_eq!(claims.exp, issued.expires_at.timestamp());
    }

    #[test]
    fn expired_token_is_rejected() {
        let service = TokenService::new(&config("clients"));
        let issued = service
            .issue_at("admin", Utc::now() - Duration::hours(2))
            .unwrap();
        assert!(matches!(
            service.verify(&issued.token),
            Err(AppError::Unauthorized(_))
        ));
    }

    #[test]
    fn expiry_overflow_is_an_error() {
        let service = TokenService::new(&config("clients"));
        assert!(matches!(
            service.issue_at("admin", DateTime::<Utc>::MAX_UTC),
            Err(AppError::Internal(_))
        ));
    }

    #[test]
    fn lifetime_is_clamped_to_bounds() {
        let mut cfg = config("clients");
        cfg.ttl_minutes = -5;
        let service = TokenService::new(&cfg);
        let issued = service.issue("admin").unwrap();
        assert!(service.verify(&issued.token).is_ok());
    }

    #[test]
    fn wrong_audience_is_rejected() {
        let issuer = TokenService::new(&config("someone-else"));
        let verifier = TokenService::new(&config("clients"));
        let issued = issuer.issue("admin").unwrap();
        assert!(verifier.verify(&issued.token).is_err());
    }

    #[test]
    fn tampered_token_is_rejected() {
        let service = TokenService::new(&config("clients"));
        let mut token = service.issue("admin").unwrap().token;
        token.push('x');
        assert!(service.verify(&token).is_err());
    }
}
