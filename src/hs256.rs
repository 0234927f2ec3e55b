//! Token verification without the JWT library, for builds where only the
//! plain HMAC primitives are available. Must accept and reject exactly the
//! same tokens as the `jsonwebtoken`-backed verifier; see the contract tests
//! in `token`.

use base64::{
    Engine as _,
    engine::general_purpose::URL_SAFE_NO_PAD
};
use chrono::Utc;
use hmac::{Hmac, Mac};
use serde::Deserialize;
use sha2::Sha256;

use crate::{
    model::Identity,
    token::{Claims, Verifier, VerifyError}
};

#[derive(Debug, Deserialize)]
struct CompactHeader {
    alg: String
}

fn unix_now() -> i64 {
    Utc::now().timestamp()
}

pub struct HmacVerifier {
    key: Vec<u8>,
    now: fn() -> i64
}

impl HmacVerifier {
    pub fn new(key: &[u8]) -> Self {
        Self::with_clock(key, unix_now)
    }

    pub fn with_clock(key: &[u8], now: fn() -> i64) -> Self {
        HmacVerifier {
            key: key.into(),
            now
        }
    }
}

impl Verifier for HmacVerifier {
    fn verify(&self, token: &str) -> Result<Identity, VerifyError> {
        // checks run in the same order as the JWT library: header, signature,
        // claims, expiry
        let (signing_input, sig_b64) = token.rsplit_once('.')
            .ok_or(VerifyError::Malformed)?;
        let (header_b64, claims_b64) = signing_input.split_once('.')
            .ok_or(VerifyError::Malformed)?;

        let header_bytes = URL_SAFE_NO_PAD.decode(header_b64)
            .or(Err(VerifyError::Malformed))?;
        let header: CompactHeader = serde_json::from_slice(&header_bytes)
            .or(Err(VerifyError::Malformed))?;

        if header.alg != "HS256" {
            return Err(VerifyError::Malformed);
        }

        let sig = URL_SAFE_NO_PAD.decode(sig_b64)
            .or(Err(VerifyError::Malformed))?;

        let mut mac = Hmac::<Sha256>::new_from_slice(&self.key)
            .expect("HMAC can take key of any size");
        mac.update(signing_input.as_bytes());
        mac.verify_slice(&sig)
            .or(Err(VerifyError::BadSignature))?;

        let claims_bytes = URL_SAFE_NO_PAD.decode(claims_b64)
            .or(Err(VerifyError::Malformed))?;
        let claims: Claims = serde_json::from_slice(&claims_bytes)
            .or(Err(VerifyError::BadClaims))?;

        if claims.exp < (self.now)() {
            return Err(VerifyError::Expired);
        }

        Ok(claims.into())
    }
}
