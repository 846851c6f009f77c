pub struct Config {
    pub port: u16,
    pub database_url: Option<String>,
    /// When `false`, the server starts without applying migrations.
    /// Set `RUN_MIGRATIONS=false` to manage migrations out-of-band.
    /// Defaults to `true`.
    pub run_migrations: bool,
    /// Seconds between live-feed polls. `FEED_POLL_SECS`, default 2.
    pub feed_poll_secs: u64,
    /// How many of the newest records each poll re-reads. `FEED_WINDOW`,
    /// default 20.
    pub feed_window: i64,
}

// Custom Debug masks the connection string so the struct is safe to log.
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("port", &self.port)
            .field(
                "database_url",
                &self.database_url.as_deref().map(|_| "<redacted>"),
            )
            .field("run_migrations", &self.run_migrations)
            .field("feed_poll_secs", &self.feed_poll_secs)
            .field("feed_window", &self.feed_window)
            .finish()
    }
}

impl Config {
    pub fn from_env() -> Self {
        let port = std::env::var("PORT").ok().map_or(8080, |s| {
            match s.parse::<u16>() {
                Ok(0) | Err(_) => {
                    tracing::warn!(
                        "PORT env var {s:?} is not a valid port number (1-65535), defaulting to 8080"
                    );
                    8080
                }
                Ok(port) => port,
            }
        });
        let run_migrations = std::env::var("RUN_MIGRATIONS")
            .map(|v| !matches!(v.to_lowercase().as_str(), "false" | "0" | "no"))
            .unwrap_or(true);
        let feed_poll_secs = env_number("FEED_POLL_SECS", 2);
        let feed_window = env_number("FEED_WINDOW", 20);
        Self {
            port,
            database_url: std::env::var("DATABASE_URL").ok(),
            run_migrations,
            feed_poll_secs,
            feed_window,
        }
    }
}

fn env_number<T: std::str::FromStr + Copy>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;
    use std::sync::Mutex;

    // Serialize env-mutating tests to avoid races between parallel test threads.
    // SAFETY: The Mutex ensures exclusive env access within this process; lock
    // poisoning is recovered via into_inner() so a panicking test won't block
    // subsequent ones.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn defaults_to_port_8080() {
        let _g = ENV_LOCK
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        // SAFETY: protected by ENV_LOCK; no concurrent env mutations
        unsafe { std::env::remove_var("PORT") };
        let cfg = Config::from_env();
        assert_eq!(cfg.port, 8080);
    }

    #[test]
    fn reads_port_from_env() {
        let _g = ENV_LOCK
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        // SAFETY: protected by ENV_LOCK; no concurrent env mutations
        unsafe { std::env::set_var("PORT", "9090") };
        let cfg = Config::from_env();
        unsafe { std::env::remove_var("PORT") };
        assert_eq!(cfg.port, 9090);
    }

    #[test]
    fn invalid_port_falls_back_to_default() {
        let _g = ENV_LOCK
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        // SAFETY: protected by ENV_LOCK; no concurrent env mutations
        unsafe { std::env::set_var("PORT", "not-a-number") };
        let cfg = Config::from_env();
        unsafe { std::env::remove_var("PORT") };
        assert_eq!(cfg.port, 8080);
    }

    #[test]
    fn run_migrations_defaults_to_true() {
        let _g = ENV_LOCK
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        // SAFETY: protected by ENV_LOCK; no concurrent env mutations
        unsafe { std::env::remove_var("RUN_MIGRATIONS") };
        let cfg = Config::from_env();
        assert!(cfg.run_migrations, "should default to true");
    }

    #[test]
    fn run_migrations_can_be_disabled() {
        let _g = ENV_LOCK
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        // SAFETY: protected by ENV_LOCK; no concurrent env mutations
        unsafe { std::env::set_var("RUN_MIGRATIONS", "false") };
        let cfg = Config::from_env();
        unsafe { std::env::remove_var("RUN_MIGRATIONS") };
        assert!(!cfg.run_migrations);
    }

    #[test]
    fn feed_tuning_reads_from_env_with_defaults() {
        let _g = ENV_LOCK
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        // SAFETY: protected by ENV_LOCK; no concurrent env mutations
        unsafe {
            std::env::remove_var("FEED_POLL_SECS");
            std::env::set_var("FEED_WINDOW", "50");
        }
        let cfg = Config::from_env();
        unsafe { std::env::remove_var("FEED_WINDOW") };
        assert_eq!(cfg.feed_poll_secs, 2);
        assert_eq!(cfg.feed_window, 50);
    }

    #[test]
    fn debug_masks_database_url() {
        let cfg = Config {
            port: 8080,
            database_url: Some("postgres://secret".to_string()),
            run_migrations: true,
            feed_poll_secs: 2,
            feed_window: 20,
        };
        let debug_str = format!("{cfg:?}");
        assert!(!debug_str.contains("postgres://secret"));
        assert!(debug_str.contains("<redacted>"));
        assert!(debug_str.contains("8080"));
    }
}
