use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::config::LiveKitConfig;

pub const TOKEN_TTL_SECS: i64 = 3600;
/// Backdate nbf to tolerate client clock skew.
pub const CLOCK_SKEW_SECS: i64 = 60;

#[derive(Debug, Serialize, Deserialize)]
pub struct VideoGrant {
    #[serde(rename = "roomJoin")]
    pub room_join: bool,
    pub room: String,
    #[serde(rename = "canPublish")]
    pub can_publish: bool,
    #[serde(rename = "canSubscribe")]
    pub can_subscribe: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RoomTokenClaims {
    pub exp: i64,
    pub iss: String,
    pub nbf: i64,
    pub sub: String,
    pub name: String,
    pub video: VideoGrant,
}

/// Mint an HS256 access token granting join/publish/subscribe on one room.
pub fn mint_room_token(
    config: &LiveKitConfig,
    room_name: &str,
    participant_name: &str,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = OffsetDateTime::now_utc().unix_timestamp();

    let claims = RoomTokenClaims {
        exp: now + TOKEN_TTL_SECS,
        iss: config.api_key.clone(),
        nbf: now - CLOCK_SKEW_SECS,
        sub: participant_name.to_string(),
        name: participant_name.to_string(),
        video: VideoGrant {
            room_join: true,
            room: room_name.to_string(),
            can_publish: true,
            can_subscribe: true,
        },
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(config.api_secret.expose_secret().as_bytes()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{decode, DecodingKey, Validation};
    use secrecy::SecretBox;
    use std::sync::Arc;

    fn test_config() -> LiveKitConfig {
        LiveKitConfig {
            api_key: "test-api-key".to_string(),
            api_secret: Arc::new(SecretBox::new(Box::new("test-api-secret".to_string()))),
            url: "wss://example.livekit.cloud".to_string(),
        }
    }

    #[test]
    fn token_round_trips_with_expected_claims() {
        let config = test_config();
        let token = mint_room_token(&config, "greeting-42", "Alice").unwrap();

        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_nbf = true;
        validation.set_issuer(&["test-api-key"]);

        let decoded = decode::<RoomTokenClaims>(
            &token,
            &DecodingKey::from_secret(b"test-api-secret"),
            &validation,
        )
        .unwrap();

        let claims = decoded.claims;
        assert_eq!(claims.iss, "test-api-key");
        assert_eq!(claims.sub, "Alice");
        assert_eq!(claims.name, "Alice");
        assert_eq!(claims.video.room, "greeting-42");
        assert!(claims.video.room_join);
        assert!(claims.video.can_publish);
        assert!(claims.video.can_subscribe);
    }

    #[test]
    fn token_expires_after_one_hour_with_skew_allowance() {
        let config = test_config();
        let before = OffsetDateTime::now_utc().unix_timestamp();
        let token = mint_room_token(&config, "training-session-7", "Bob").unwrap();
        let after = OffsetDateTime::now_utc().unix_timestamp();

        let mut validation = Validation::new(Algorithm::HS256);
        validation.insecure_disable_signature_validation();
        let decoded = decode::<RoomTokenClaims>(
            &token,
            &DecodingKey::from_secret(b"ignored"),
            &validation,
        )
        .unwrap();

        let claims = decoded.claims;
        assert!(claims.exp >= before + TOKEN_TTL_SECS && claims.exp <= after + TOKEN_TTL_SECS);
        assert!(claims.nbf >= before - CLOCK_SKEW_SECS && claims.nbf <= after - CLOCK_SKEW_SECS);
    }
}
