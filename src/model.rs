use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(rename_all = "UPPERCASE")]
pub enum Role {
    Admin,
    Staff,
    Customer
}

impl Role {
    pub fn parse(s: &str) -> Option<Role> {
        match s {
            "ADMIN" => Some(Role::Admin),
            "STAFF" => Some(Role::Staff),
            "CUSTOMER" => Some(Role::Customer),
            _ => None
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::Staff => "STAFF",
            Role::Customer => "CUSTOMER"
        }
    }

    // Back office access requires an elevated role
    pub fn is_elevated(self) -> bool {
        matches!(self, Role::Admin | Role::Staff)
    }
}

// The identity facts asserted by a verified credential. The role is kept as
// presented so the gate can tell an unknown role apart from an unverifiable
// token.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Identity {
    pub user_id: String,
    pub email: String,
    pub role: String
}

#[derive(Debug, Deserialize, Serialize)]
pub struct LoginParams {
    pub email: String,
    pub password: String
}

#[derive(Debug, Deserialize, PartialEq, Serialize)]
pub struct Token {
    pub token: String
}

#[derive(Clone, Debug, PartialEq)]
pub struct Session {
    pub token: String,
    pub expires: i64
}

#[derive(Clone, Debug, sqlx::FromRow)]
pub struct User {
    pub user_id: String,
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
    pub is_active: bool
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct UserSummary {
    pub user_id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
    pub is_active: bool
}

impl From<User> for UserSummary {
    fn from(user: User) -> Self {
        UserSummary {
            user_id: user.user_id,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            role: user.role,
            is_active: user.is_active
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct UserCreateParams {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role
}

fn default_limit() -> u32 {
    50
}

#[derive(Debug, Deserialize)]
pub struct UserListParams {
    #[serde(default = "default_limit")]
    pub limit: u32,
    #[serde(default)]
    pub offset: u32
}
