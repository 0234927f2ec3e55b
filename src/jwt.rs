use jsonwebtoken::{
    encode, decode,
    Algorithm, DecodingKey, EncodingKey, Header, Validation
};
use thiserror::Error;

use crate::{
    model::{Identity, Role},
    token::{Claims, Verifier, VerifyError}
};

#[derive(Debug, Error)]
#[error(transparent)]
pub struct IssueError(#[from] jsonwebtoken::errors::Error);

impl From<jsonwebtoken::errors::Error> for VerifyError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind::*;

        match err.kind() {
            ExpiredSignature => VerifyError::Expired,
            InvalidSignature => VerifyError::BadSignature,
            Json(_) | MissingRequiredClaim(_) => VerifyError::BadClaims,
            _ => VerifyError::Malformed
        }
    }
}

fn issue(
    key: &EncodingKey,
    user_id: &str,
    email: &str,
    role: Role,
    now: i64,
    expiry: i64
) -> Result<String, IssueError>
{
    let claims = Claims {
        sub: user_id.into(),
        email: email.into(),
        role: role.as_str().into(),
        iat: now,
        exp: expiry
    };

    Ok(encode(&Header::default(), &claims, key)?)
}

fn verify(
    key: &DecodingKey,
    validation: &Validation,
    token_str: &str
) -> Result<Identity, VerifyError>
{
    let token = decode::<Claims>(token_str, key, validation)?;
    Ok(token.claims.into())
}

pub struct JwtIssuer {
    key: EncodingKey
}

impl JwtIssuer {
    pub fn new(key: &[u8]) -> Self {
        JwtIssuer {
            key: EncodingKey::from_secret(key)
        }
    }

    pub fn issue(
        &self,
        user_id: &str,
        email: &str,
        role: Role,
        now: i64,
        duration: i64
    ) -> Result<String, IssueError>
    {
        issue(&self.key, user_id, email, role, now, now + duration)
    }
}

pub struct JwtVerifier {
    key: DecodingKey,
    validation: Validation
}

impl JwtVerifier {
    pub fn new(key: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // no expiry grace period; the two verifier implementations must
        // agree on the exact cutoff
        validation.leeway = 0;

        JwtVerifier {
            key: DecodingKey::from_secret(key),
            validation
        }
    }
}

impl Verifier for JwtVerifier {
    fn verify(&self, token: &str) -> Result<Identity, VerifyError> {
        verify(&self.key, &self.validation, token)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    use crate::token::fixtures::*;

    #[test]
    fn issue_ok() {
        let key = EncodingKey::from_secret(SECRET);
        assert_eq!(
            issue(&key, "u1", "a@x.com", Role::Admin, 0, 899999999999)
                .unwrap(),
            ADMIN
        );
    }

    #[test]
    fn issuer_adds_duration_to_now() {
        let issuer = JwtIssuer::new(SECRET);
        // iat 0, exp 0 + 899999999999: byte-identical to the ADMIN fixture
        assert_eq!(
            issuer
                .issue("u1", "a@x.com", Role::Admin, 0, 899999999999)
                .unwrap(),
            ADMIN
        );
    }

    #[test]
    fn verify_ok() {
        let v = JwtVerifier::new(SECRET);
        let identity = v.verify(ADMIN).unwrap();
        assert_eq!(identity.user_id, "u1");
        assert_eq!(identity.email, "a@x.com");
        assert_eq!(identity.role, "ADMIN");
    }

    #[test]
    fn verify_malformed() {
        let v = JwtVerifier::new(SECRET);
        assert_eq!(v.verify(MALFORMED).unwrap_err(), VerifyError::Malformed);
    }

    #[test]
    fn verify_wrong_key() {
        let v = JwtVerifier::new(SECRET);
        assert_eq!(
            v.verify(WRONG_KEY).unwrap_err(),
            VerifyError::BadSignature
        );
    }

    #[test]
    fn verify_expired() {
        // This test will fail if you run it before 1970. Don't do that.
        let v = JwtVerifier::new(SECRET);
        assert_eq!(v.verify(EXPIRED).unwrap_err(), VerifyError::Expired);
    }

    #[test]
    fn verify_no_email() {
        let v = JwtVerifier::new(SECRET);
        assert_eq!(v.verify(NO_EMAIL).unwrap_err(), VerifyError::BadClaims);
    }

    #[test]
    fn issue_then_verify() {
        let issuer = JwtIssuer::new(SECRET);
        let tok = issuer
            .issue("u9", "x@y.com", Role::Staff, 0, 899999999999)
            .unwrap();

        let v = JwtVerifier::new(SECRET);
        let identity = v.verify(&tok).unwrap();
        assert_eq!(identity.user_id, "u9");
        assert_eq!(identity.role, "STAFF");
    }
}
