use async_trait::async_trait;
use chrono::Utc;
use rand::distr::{Alphanumeric, SampleString};

use crate::{
    core::Core,
    db::DatabaseClient,
    errors::AppError,
    jwt::JwtIssuer,
    model::{Session, User, UserCreateParams, UserSummary}
};

pub fn unix_now() -> i64 {
    Utc::now().timestamp()
}

pub struct ProdCore<C: DatabaseClient> {
    pub db: C,
    pub issuer: JwtIssuer,
    pub token_ttl: i64,
    pub now: fn() -> i64
}

#[async_trait]
impl<C: DatabaseClient + Send + Sync> Core for ProdCore<C> {
    // Unknown email, deactivated account, and wrong password are
    // indistinguishable to the caller.
    async fn login(
        &self,
        email: &str,
        password: &str
    ) -> Result<Session, AppError>
    {
        let user = self.db.get_user_by_email(email)
            .await?
            .ok_or(AppError::Unauthorized)?;

        if !user.is_active {
            return Err(AppError::Unauthorized);
        }

        if !bcrypt::verify(password, &user.password_hash)? {
            return Err(AppError::Unauthorized);
        }

        let now = (self.now)();
        let token = self.issuer.issue(
            &user.user_id,
            &user.email,
            user.role,
            now,
            self.token_ttl
        )?;

        Ok(
            Session {
                token,
                expires: now + self.token_ttl
            }
        )
    }

    async fn list_users(
        &self,
        limit: u32,
        offset: u32
    ) -> Result<Vec<UserSummary>, AppError>
    {
        Ok(
            self.db.list_users(limit, offset)
                .await?
                .into_iter()
                .map(UserSummary::from)
                .collect()
        )
    }

    async fn get_user(&self, user_id: &str) -> Result<UserSummary, AppError> {
        Ok(
            self.db.get_user(user_id)
                .await?
                .ok_or(AppError::NotFound)?
                .into()
        )
    }

    async fn create_user(
        &self,
        params: &UserCreateParams
    ) -> Result<UserSummary, AppError>
    {
        let user = User {
            user_id: Alphanumeric.sample_string(&mut rand::rng(), 20),
            email: params.email.clone(),
            password_hash: bcrypt::hash(&params.password, bcrypt::DEFAULT_COST)?,
            first_name: params.first_name.clone(),
            last_name: params.last_name.clone(),
            role: params.role,
            is_active: true
        };

        if !self.db.insert_user(&user).await? {
            return Err(AppError::DuplicateEmail);
        }

        Ok(user.into())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    use once_cell::sync::Lazy;

    use crate::{
        db::DatabaseError,
        jwt::JwtVerifier,
        model::Role,
        token::{Verifier, fixtures::SECRET}
    };

    // minimum cost; hashing at cost 12 makes the tests crawl
    static PASSWORD_HASH: Lazy<String> =
        Lazy::new(|| bcrypt::hash("12345", 4).unwrap());

    fn skroob() -> User {
        User {
            user_id: "u1".into(),
            email: "skroob@shoex.com".into(),
            password_hash: PASSWORD_HASH.clone(),
            first_name: "President".into(),
            last_name: "Skroob".into(),
            role: Role::Admin,
            is_active: true
        }
    }

    struct OneUserDb {
        user: User
    }

    #[async_trait]
    impl DatabaseClient for OneUserDb {
        async fn get_user_by_email(
            &self,
            email: &str
        ) -> Result<Option<User>, DatabaseError>
        {
            Ok(Some(&self.user).filter(|u| u.email == email).cloned())
        }

        async fn get_user(
            &self,
            user_id: &str
        ) -> Result<Option<User>, DatabaseError>
        {
            Ok(Some(&self.user).filter(|u| u.user_id == user_id).cloned())
        }

        async fn list_users(
            &self,
            limit: u32,
            _offset: u32
        ) -> Result<Vec<User>, DatabaseError>
        {
            Ok(vec![self.user.clone()].into_iter().take(limit as usize).collect())
        }

        async fn insert_user(
            &self,
            user: &User
        ) -> Result<bool, DatabaseError>
        {
            Ok(user.email != self.user.email)
        }
    }

    // far enough ahead that issued tokens stay unexpired under the real
    // clock the verifier consults
    const NOW: i64 = 1999999999;

    fn test_core() -> ProdCore<OneUserDb> {
        ProdCore {
            db: OneUserDb { user: skroob() },
            issuer: JwtIssuer::new(SECRET),
            token_ttl: 604800,
            now: || NOW
        }
    }

    #[tokio::test]
    async fn login_ok() {
        let session = test_core()
            .login("skroob@shoex.com", "12345")
            .await
            .unwrap();

        assert_eq!(session.expires, NOW + 604800);

        // the issued token carries the user's claims
        let identity = JwtVerifier::new(SECRET)
            .verify(&session.token)
            .unwrap();
        assert_eq!(identity.user_id, "u1");
        assert_eq!(identity.email, "skroob@shoex.com");
        assert_eq!(identity.role, "ADMIN");
    }

    #[tokio::test]
    async fn login_wrong_password() {
        assert!(matches!(
            test_core().login("skroob@shoex.com", "54321").await,
            Err(AppError::Unauthorized)
        ));
    }

    #[tokio::test]
    async fn login_unknown_email() {
        assert!(matches!(
            test_core().login("nobody@shoex.com", "12345").await,
            Err(AppError::Unauthorized)
        ));
    }

    #[tokio::test]
    async fn login_inactive_user() {
        let mut core = test_core();
        core.db.user.is_active = false;

        assert!(matches!(
            core.login("skroob@shoex.com", "12345").await,
            Err(AppError::Unauthorized)
        ));
    }

    #[tokio::test]
    async fn get_user_ok() {
        let summary = test_core().get_user("u1").await.unwrap();
        assert_eq!(summary.email, "skroob@shoex.com");
        assert_eq!(summary.role, Role::Admin);
    }

    #[tokio::test]
    async fn get_user_not_found() {
        assert!(matches!(
            test_core().get_user("u2").await,
            Err(AppError::NotFound)
        ));
    }

    #[tokio::test]
    async fn create_user_ok() {
        let summary = test_core()
            .create_user(
                &UserCreateParams {
                    email: "new@shoex.com".into(),
                    password: "hunter2".into(),
                    first_name: "New".into(),
                    last_name: "Hire".into(),
                    role: Role::Staff
                }
            )
            .await
            .unwrap();

        assert_eq!(summary.email, "new@shoex.com");
        assert_eq!(summary.role, Role::Staff);
        assert_eq!(summary.user_id.len(), 20);
        assert!(summary.is_active);
    }

    #[tokio::test]
    async fn create_user_duplicate_email() {
        assert!(matches!(
            test_core()
                .create_user(
                    &UserCreateParams {
                        email: "skroob@shoex.com".into(),
                        password: "12345".into(),
                        first_name: "President".into(),
                        last_name: "Skroob".into(),
                        role: Role::Admin
                    }
                )
                .await,
            Err(AppError::DuplicateEmail)
        ));
    }
}
