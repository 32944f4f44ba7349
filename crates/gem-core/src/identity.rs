//! Who to name as maintainer of a new recipe.

use async_trait::async_trait;

#[async_trait]
pub trait MaintainerIdentity: Send + Sync {
    /// `Name <email>`, or `None` when unknown.
    async fn identity(&self) -> Option<String>;
}

/// Reads `user.name` and `user.email` from the global git configuration.
#[derive(Debug, Clone, Default)]
pub struct GitIdentity;

impl GitIdentity {
    /// `Name <email>` from `config`, when both are set.
    pub fn from_config(config: &git2::Config) -> Option<String> {
        let get = |key: &str| {
            config
                .get_string(key)
                .ok()
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        Some(format!("{} <{}>", get("user.name")?, get("user.email")?))
    }
}

#[async_trait]
impl MaintainerIdentity for GitIdentity {
    async fn identity(&self) -> Option<String> {
        let config = git2::Config::open_default().ok()?;
        Self::from_config(&config)
    }
}

/// A fixed identity; `None` disables the lookup.
#[derive(Debug, Clone, Default)]
pub struct StaticIdentity(pub Option<String>);

#[async_trait]
impl MaintainerIdentity for StaticIdentity {
    async fn identity(&self) -> Option<String> {
        self.0.clone()
    }
}
