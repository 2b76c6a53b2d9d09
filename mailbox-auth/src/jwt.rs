//! JWT handling: bearer token verification and service token minting.

use std::sync::Arc;

use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use serde_json::{Map, Value};

use mailbox_types::{
    AuthError, CallerIdentity, Clock, ServiceClaims, ServiceCredential, SystemClock, TokenPayload,
    TokenVerifier, VerifyError,
};

/// Verifies HS256 bearer tokens issued by the account service.
pub struct JwtTokenVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtTokenVerifier {
    /// Create a verifier from a shared secret.
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        // `exp` is checked when present but not mandatory.
        validation.required_spec_claims.clear();

        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }
}

#[async_trait::async_trait]
impl TokenVerifier for JwtTokenVerifier {
    async fn verify(&self, token: &str) -> Result<TokenPayload, VerifyError> {
        decode::<Map<String, Value>>(token, &self.decoding_key, &self.validation)
            .map(|data| TokenPayload(data.claims))
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => VerifyError::Expired,
                _ => VerifyError::Rejected(e.to_string()),
            })
    }
}

/// Mints the internal service credential sent to the upstream mail API.
pub struct ServiceTokenSigner {
    encoding_key: EncodingKey,
    clock: Arc<dyn Clock>,
}

impl ServiceTokenSigner {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Signs `{plan}` for the identity, valid for 15 minutes from now.
    pub fn sign(&self, identity: &CallerIdentity) -> Result<ServiceCredential, AuthError> {
        let claims = ServiceClaims::new(identity, self.clock.now());

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map(ServiceCredential::new)
            .map_err(|e| {
                tracing::error!("Failed to encode service token: {}", e);
                AuthError::Signing(e.to_string())
            })
    }
}
