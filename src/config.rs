use crate::authz::AuthzMode;
use crate::errors::AppError;

/// Pre-shared secrets that map a bearer credential to a role.
#[derive(Clone)]
pub struct AuthConfig {
    pub super_admin_secret: String,
    pub global_admin_secret: String,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("super_admin_secret", &"<redacted>")
            .field("global_admin_secret", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub auth: AuthConfig,
    pub authz_mode: AuthzMode,
}

impl AppConfig {
    pub fn new(super_admin_secret: impl Into<String>, global_admin_secret: impl Into<String>) -> Self {
        Self {
            auth: AuthConfig {
                super_admin_secret: super_admin_secret.into(),
                global_admin_secret: global_admin_secret.into(),
            },
            authz_mode: AuthzMode::Strict,
        }
    }

    pub fn with_authz_mode(mut self, mode: AuthzMode) -> Self {
        self.authz_mode = mode;
        self
    }

    pub fn from_env() -> Result<Self, AppError> {
        let super_admin_secret = required_secret("SUPER_ADMIN_PASSWORD")?;
        let global_admin_secret = required_secret("ADMIN_PASSWORD")?;

        if super_admin_secret == global_admin_secret {
            return Err(AppError::configuration(
                "SUPER_ADMIN_PASSWORD and ADMIN_PASSWORD must differ",
            ));
        }

        let authz_mode = match std::env::var("AUTHZ_MODE") {
            Ok(raw) => raw
                .parse::<AuthzMode>()
                .map_err(|_| AppError::configuration("AUTHZ_MODE must be off, advisory or strict"))?,
            Err(_) => AuthzMode::Strict,
        };

        Ok(Self::new(super_admin_secret, global_admin_secret).with_authz_mode(authz_mode))
    }
}

fn required_secret(name: &str) -> Result<String, AppError> {
    let value = std::env::var(name).map_err(|_| AppError::configuration(format!("{name} not set")))?;
    if value.trim().is_empty() {
        return Err(AppError::configuration(format!("{name} must not be empty")));
    }
    Ok(value)
}
