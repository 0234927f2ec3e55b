use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Config {
    pub db_path: String,
    pub listen_ip: String,
    pub listen_port: u16,
    pub jwt_key: String,
    #[serde(default)]
    pub verifier: VerifierKind,
    #[serde(default = "default_token_ttl")]
    pub token_ttl_secs: i64,
    #[serde(default)]
    pub gate: GateConfig
}

// seven days, matching the issuance side of the storefront
fn default_token_ttl() -> i64 {
    7 * 24 * 60 * 60
}

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum VerifierKind {
    #[default]
    Jsonwebtoken,
    Hmac
}

// The exempt path list is configuration rather than a hardcoded pair; it has
// to match wherever the login endpoints actually live.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct GateConfig {
    pub cookie_name: String,
    pub page_prefix: String,
    pub api_prefix: String,
    pub login_page: String,
    pub exempt_paths: Vec<String>
}

impl Default for GateConfig {
    fn default() -> Self {
        GateConfig {
            cookie_name: "auth-token".into(),
            page_prefix: "/admin".into(),
            api_prefix: "/api/admin".into(),
            login_page: "/admin/login".into(),
            exempt_paths: vec![
                "/admin/login".into(),
                "/api/auth/login".into()
            ]
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn minimal_config() {
        let config: Config = toml::from_str(
            r#"
db_path = "gate.db"
listen_ip = "127.0.0.1"
listen_port = 4000
jwt_key = "sekrit"
            "#
        ).unwrap();

        assert_eq!(config.verifier, VerifierKind::Jsonwebtoken);
        assert_eq!(config.token_ttl_secs, 604800);
        assert_eq!(config.gate.cookie_name, "auth-token");
        assert_eq!(config.gate.page_prefix, "/admin");
        assert_eq!(config.gate.api_prefix, "/api/admin");
        assert_eq!(config.gate.login_page, "/admin/login");
        assert_eq!(
            config.gate.exempt_paths,
            ["/admin/login", "/api/auth/login"]
        );
    }

    #[test]
    fn full_config() {
        let config: Config = toml::from_str(
            r#"
db_path = "gate.db"
listen_ip = "0.0.0.0"
listen_port = 4000
jwt_key = "sekrit"
verifier = "hmac"
token_ttl_secs = 3600

[gate]
cookie_name = "tok"
page_prefix = "/backoffice"
api_prefix = "/api/backoffice"
login_page = "/backoffice/login"
exempt_paths = ["/backoffice/login", "/api/session"]
            "#
        ).unwrap();

        assert_eq!(config.verifier, VerifierKind::Hmac);
        assert_eq!(config.token_ttl_secs, 3600);
        assert_eq!(config.gate.cookie_name, "tok");
        assert_eq!(config.gate.exempt_paths, ["/backoffice/login", "/api/session"]);
    }

    #[test]
    fn missing_key_fails() {
        assert!(
            toml::from_str::<Config>(
                r#"
db_path = "gate.db"
listen_ip = "127.0.0.1"
listen_port = 4000
                "#
            ).is_err()
        );
    }
}
