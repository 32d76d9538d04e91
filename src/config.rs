use std::env;

use crate::models::Role;

/// AppConfig
///
/// Holds the application's entire configuration state. Immutable once loaded and
/// pulled into handlers via `FromRef`.
#[derive(Clone, Debug)]
pub struct AppConfig {
    // Runtime environment marker. Controls log format and the in-memory fallback.
    pub env: Env,
    // Supabase project URL, e.g. https://xyz.supabase.co. `None` selects the
    // in-memory backend (local only).
    pub supabase_url: Option<String>,
    // Public anon key, sent as the `apikey` header on every Supabase call.
    pub supabase_anon_key: String,
    // Secret used to verify Supabase-issued access tokens.
    pub jwt_secret: String,
    // Public site origin, used as the sign-up confirmation redirect.
    pub site_url: String,
    // Roles that may use the admin view.
    pub allowed_roles: Vec<Role>,
    // Socket address the HTTP server binds.
    pub bind_addr: String,
    // Optional admin account seeded into the in-memory backend.
    pub local_admin: Option<(String, String)>,
}

/// Env
#[derive(Clone, PartialEq, Debug)]
pub enum Env {
    Local,
    Production,
}

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
pub const LOCAL_JWT_SECRET: &str = "super-secure-test-secret-value-local";

impl Default for AppConfig {
    /// default
    ///
    /// Safe, non-panicking configuration for tests: local env, in-memory backend,
    /// `{admin, owner}` allow-list.
    fn default() -> Self {
        Self {
            env: Env::Local,
            supabase_url: None,
            supabase_anon_key: "local-anon-key".to_string(),
            jwt_secret: LOCAL_JWT_SECRET.to_string(),
            site_url: "http://localhost:8080".to_string(),
            allowed_roles: default_roles(),
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            local_admin: None,
        }
    }
}

fn default_roles() -> Vec<Role> {
    vec![Role::admin(), Role::owner()]
}

/// Parses a comma-separated role list; blanks are dropped, and an empty result
/// falls back to `admin,owner`.
pub fn parse_roles(raw: &str) -> Vec<Role> {
    let roles: Vec<Role> = raw
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(Role::new)
        .collect();
    if roles.is_empty() {
        default_roles()
    } else {
        roles
    }
}

impl AppConfig {
    /// load
    ///
    /// Reads the configuration from the environment and fails fast.
    ///
    /// # Panics
    /// In production, panics when `SUPABASE_URL`, `SUPABASE_ANON_KEY` or
    /// `SUPABASE_JWT_SECRET` is missing, so the service never starts half-configured.
    pub fn load() -> Self {
        let env_str = env::var("APP_ENV").unwrap_or_else(|_| "local".to_string());
        let env = match env_str.as_str() {
            "production" => Env::Production,
            _ => Env::Local,
        };

        let allowed_roles = env::var("ADMIN_ROLES")
            .map(|raw| parse_roles(&raw))
            .unwrap_or_else(|_| default_roles());
        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());

        match env {
            Env::Local => {
                let local_admin = match (
                    env::var("LOCAL_ADMIN_EMAIL"),
                    env::var("LOCAL_ADMIN_PASSWORD"),
                ) {
                    (Ok(email), Ok(password)) => Some((email, password)),
                    _ => None,
                };
                Self {
                    env: Env::Local,
                    supabase_url: env::var("SUPABASE_URL").ok(),
                    supabase_anon_key: env::var("SUPABASE_ANON_KEY")
                        .unwrap_or_else(|_| "local-anon-key".to_string()),
                    // Local falls back to a known secret; set the real one to talk to Supabase.
                    jwt_secret: env::var("SUPABASE_JWT_SECRET")
                        .unwrap_or_else(|_| LOCAL_JWT_SECRET.to_string()),
                    site_url: env::var("SITE_URL")
                        .unwrap_or_else(|_| "http://localhost:8080".to_string()),
                    allowed_roles,
                    bind_addr,
                    local_admin,
                }
            }
            Env::Production => Self {
                env: Env::Production,
                supabase_url: Some(
                    env::var("SUPABASE_URL").expect("FATAL: SUPABASE_URL required in prod"),
                ),
                supabase_anon_key: env::var("SUPABASE_ANON_KEY")
                    .expect("FATAL: SUPABASE_ANON_KEY required in prod"),
                jwt_secret: env::var("SUPABASE_JWT_SECRET")
                    .expect("FATAL: SUPABASE_JWT_SECRET must be set in production."),
                site_url: env::var("SITE_URL").unwrap_or_else(|_| "/".to_string()),
                allowed_roles,
                bind_addr,
                local_admin: None,
            },
        }
    }
}
