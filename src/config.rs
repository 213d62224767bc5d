use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::constants::limits::MAX_HEARTBEAT_INTERVAL_MINUTES;
use crate::constants::{DEFAULT_SEED_PASSWORD, ROLE_ADMIN, ROLE_EMPLOYEE, ROLE_MANAGER};

/// Environment variable that overrides `general.database_path`.
pub const DATABASE_URL_ENV: &str = "ROSTERD_DATABASE_URL";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,

    pub server: ServerConfig,

    pub security: SecurityConfig,

    pub seed: SeedConfig,

    pub heartbeat: HeartbeatConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub database_path: String,

    pub log_level: String,

    /// Number of tokio worker threads (default: 2)
    /// Set to 0 to use the number of CPU cores
    pub worker_threads: usize,

    pub max_db_connections: u32,

    pub min_db_connections: u32,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            database_path: "sqlite:data/rosterd.db".to_string(),
            log_level: "info".to_string(),
            worker_threads: 2,
            max_db_connections: 5,
            min_db_connections: 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub enabled: bool,

    pub port: u16,

    /// Whether to set the Secure flag on session cookies.
    pub secure_cookies: bool,

    /// Session inactivity expiry in minutes.
    pub session_expiry_minutes: i64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            port: 5001,
            secure_cookies: false,
            session_expiry_minutes: 60,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Argon2 memory cost in KiB
    pub argon2_memory_cost_kib: u32,

    /// Argon2 time cost (iterations)
    pub argon2_time_cost: u32,

    pub argon2_parallelism: u32,

    pub password_policy: PasswordPolicy,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            argon2_memory_cost_kib: 8192,
            argon2_time_cost: 3,
            argon2_parallelism: 1,
            password_policy: PasswordPolicy::default(),
        }
    }
}

/// Rules a new credential must satisfy before an account is created.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PasswordPolicy {
    pub min_length: usize,
    pub require_digit: bool,
    pub require_lowercase: bool,
    pub require_uppercase: bool,
    pub require_non_alphanumeric: bool,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            min_length: 6,
            require_digit: true,
            require_lowercase: true,
            require_uppercase: true,
            require_non_alphanumeric: true,
        }
    }
}

/// How the on-boot hook decides whether to touch the database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BootSeedMode {
    /// Migrate and reconcile on every start.
    Always,
    /// Only migrate and reconcile when no account exists yet, or the probe fails.
    WhenUninitialized,
    /// Leave the database alone on start.
    Disabled,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SeedConfig {
    pub roles: Vec<String>,

    pub users: Vec<SeedUser>,

    /// Replace every existing seed account, even confirmed ones.
    pub always_replace: bool,

    pub boot_mode: BootSeedMode,

    /// Used by `BootSeedMode::Always`.
    pub boot_force_recreate: bool,
}

impl Default for SeedConfig {
    fn default() -> Self {
        let all_roles = vec![
            ROLE_ADMIN.to_string(),
            ROLE_MANAGER.to_string(),
            ROLE_EMPLOYEE.to_string(),
        ];

        Self {
            roles: all_roles.clone(),
            users: vec![
                SeedUser::new("admin@email.com", "Admin User", "Admin", "User", None, all_roles),
                SeedUser::new(
                    "manager@email.com",
                    "Test Manager",
                    "Test",
                    "Manager",
                    Some("/img/profiles/user3.svg"),
                    vec![ROLE_MANAGER.to_string(), ROLE_EMPLOYEE.to_string()],
                ),
                SeedUser::new(
                    "employee@email.com",
                    "Test Employee",
                    "Test",
                    "Employee",
                    Some("/img/profiles/user2.svg"),
                    vec![ROLE_EMPLOYEE.to_string()],
                ),
                SeedUser::new(
                    "new@user.com",
                    "Test User",
                    "Test",
                    "User",
                    Some("/img/profiles/user1.svg"),
                    vec![],
                ),
            ],
            always_replace: false,
            boot_mode: BootSeedMode::Always,
            boot_force_recreate: true,
        }
    }
}

/// A demo account the host guarantees exists with known credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedUser {
    pub email: String,
    pub display_name: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_url: Option<String>,
    #[serde(default)]
    pub roles: Vec<String>,
}

impl SeedUser {
    #[must_use]
    pub fn new(
        email: &str,
        display_name: &str,
        first_name: &str,
        last_name: &str,
        profile_url: Option<&str>,
        roles: Vec<String>,
    ) -> Self {
        Self {
            email: email.to_string(),
            display_name: display_name.to_string(),
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            password: DEFAULT_SEED_PASSWORD.to_string(),
            profile_url: profile_url.map(str::to_string),
            roles,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HeartbeatConfig {
    pub enabled: bool,

    pub interval_minutes: u64,
}

impl Default for HeartbeatConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_minutes: 60,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            general: GeneralConfig::default(),
            server: ServerConfig::default(),
            security: SecurityConfig::default(),
            seed: SeedConfig::default(),
            heartbeat: HeartbeatConfig::default(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let paths = Self::config_paths();

        for path in &paths {
            if path.exists() {
                info!("Loading config from: {}", path.display());
                return Self::load_from_path(path).map(Self::with_env_overrides);
            }
        }

        info!("No config file found, using defaults");
        Ok(Self::default().with_env_overrides())
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Loads from an explicit path when given, otherwise searches the default locations.
    pub fn load_with(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from_path(path).map(Self::with_env_overrides),
            None => Self::load(),
        }
    }

    #[must_use]
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = std::env::var(DATABASE_URL_ENV)
            && !url.trim().is_empty()
        {
            self.general.database_path = url;
        }
        self
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Config saved to: {}", path.display());
        Ok(())
    }

    fn config_paths() -> Vec<PathBuf> {
        let mut paths = vec![];

        paths.push(PathBuf::from("config.toml"));

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("rosterd").join("config.toml"));
        }

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".rosterd").join("config.toml"));
        }

        paths
    }

    fn default_config_path() -> PathBuf {
        PathBuf::from("config.toml")
    }

    pub fn create_default_if_missing() -> Result<bool> {
        let path = Self::default_config_path();
        if path.exists() {
            Ok(false)
        } else {
            let config = Self::default();
            config.save_to_path(&path)?;
            info!("Created default config file: {}", path.display());
            Ok(true)
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.general.database_path.trim().is_empty() {
            anyhow::bail!("general.database_path cannot be empty");
        }

        if self.general.min_db_connections > self.general.max_db_connections {
            anyhow::bail!("general.min_db_connections cannot exceed max_db_connections");
        }

        if self.heartbeat.enabled && self.heartbeat.interval_minutes == 0 {
            anyhow::bail!("heartbeat.interval_minutes must be > 0 when enabled");
        }

        if self.heartbeat.interval_minutes > MAX_HEARTBEAT_INTERVAL_MINUTES {
            anyhow::bail!(
                "heartbeat.interval_minutes cannot exceed {}",
                MAX_HEARTBEAT_INTERVAL_MINUTES
            );
        }

        let mut seen = std::collections::HashSet::new();
        for user in &self.seed.users {
            if !seen.insert(user.email.to_lowercase()) {
                anyhow::bail!("Duplicate seed user email: {}", user.email);
            }

            if let Some(role) = user.roles.iter().find(|r| !self.seed.roles.contains(r)) {
                anyhow::bail!(
                    "Seed user {} references role '{}' which is not in seed.roles",
                    user.email,
                    role
                );
            }
        }

        Ok(())
    }
}
