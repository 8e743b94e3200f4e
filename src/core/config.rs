use chrono::{FixedOffset, Offset, Utc};
use once_cell::sync::Lazy;
use std::env;
use std::path::Path;
use std::time::Duration;

/// Bot token
/// Read from BOT_TOKEN or TELOXIDE_TOKEN environment variable
/// Empty when unset; `run` refuses to start in that case
pub static BOT_TOKEN: Lazy<String> = Lazy::new(|| {
    env::var("BOT_TOKEN")
        .or_else(|_| env::var("TELOXIDE_TOKEN"))
        .map(|token| token.trim().to_string())
        .unwrap_or_default()
});

/// Database file path
/// Read from DATABASE_URL, then DATABASE_PATH environment variable
/// Default: /data/expenses.sqlite when a /data volume is mounted, expenses.sqlite otherwise
pub static DATABASE_PATH: Lazy<String> = Lazy::new(|| {
    env::var("DATABASE_URL")
        .or_else(|_| env::var("DATABASE_PATH"))
        .ok()
        .and_then(|raw| normalize_database_path(&raw))
        .unwrap_or_else(|| default_database_path(Path::new("/data").is_dir()))
});

/// Log file path
/// Read from LOG_FILE_PATH environment variable
/// Default: app.log
pub static LOG_FILE_PATH: Lazy<String> =
    Lazy::new(|| env::var("LOG_FILE_PATH").unwrap_or_else(|_| "app.log".to_string()));

/// UTC offset used to compute the start of day/week/month/year
/// Read from BOT_UTC_OFFSET environment variable ("+03:00", "-05:30", "Z", "UTC")
/// Default: UTC
pub static UTC_OFFSET: Lazy<FixedOffset> = Lazy::new(|| match env::var("BOT_UTC_OFFSET") {
    Ok(raw) => parse_utc_offset(&raw).unwrap_or_else(|| {
        log::warn!("Invalid BOT_UTC_OFFSET value {:?}, falling back to UTC", raw);
        utc()
    }),
    Err(_) => utc(),
});

/// Chat that receives storage failure alerts
/// Read from ADMIN_ID environment variable
pub static ADMIN_ID: Lazy<Option<i64>> = Lazy::new(|| {
    env::var("ADMIN_ID").ok().and_then(|raw| match raw.trim().parse::<i64>() {
        Ok(id) => Some(id),
        Err(_) => {
            log::warn!("Invalid ADMIN_ID value {:?}, admin alerts disabled", raw);
            None
        }
    })
});

/// Symbol printed in front of amounts in confirmations
/// Read from CURRENCY_SYMBOL environment variable
/// Default: $
pub static CURRENCY_SYMBOL: Lazy<String> =
    Lazy::new(|| env::var("CURRENCY_SYMBOL").unwrap_or_else(|_| "$".to_string()));

/// The zero offset
pub fn utc() -> FixedOffset {
    Utc.fix()
}

/// Strips an optional `sqlite://` / `sqlite:` scheme from a database URL.
///
/// Returns `None` for blank input so the default path applies.
pub fn normalize_database_path(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let path = trimmed
        .strip_prefix("sqlite://")
        .or_else(|| trimmed.strip_prefix("sqlite:"))
        .unwrap_or(trimmed);
    if path.is_empty() {
        None
    } else {
        Some(path.to_string())
    }
}

/// Default database location, preferring a mounted `/data` volume.
pub fn default_database_path(data_volume: bool) -> String {
    if data_volume {
        "/data/expenses.sqlite".to_string()
    } else {
        "expenses.sqlite".to_string()
    }
}

/// Parses `+HH:MM`, `-HH:MM`, `+HH`, `Z` or `UTC` into a fixed offset.
pub fn parse_utc_offset(raw: &str) -> Option<FixedOffset> {
    let raw = raw.trim();
    if raw.eq_ignore_ascii_case("z") || raw.eq_ignore_ascii_case("utc") {
        return Some(utc());
    }

    let (sign, rest) = match raw.as_bytes().first()? {
        b'+' => (1, &raw[1..]),
        b'-' => (-1, &raw[1..]),
        _ => return None,
    };

    let (hours, minutes) = match rest.split_once(':') {
        Some((h, m)) => (h.parse::<i32>().ok()?, m.parse::<i32>().ok()?),
        None => (rest.parse::<i32>().ok()?, 0),
    };
    if !(0..=14).contains(&hours) || !(0..60).contains(&minutes) {
        return None;
    }

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

fn parse_env_or<T: std::str::FromStr>(name: &str, default: T, valid: impl Fn(&T) -> bool) -> T {
    match env::var(name) {
        Ok(raw) => match raw.trim().parse::<T>() {
            Ok(value) if valid(&value) => value,
            _ => {
                log::warn!("Invalid {} value {:?}, using default", name, raw);
                default
            }
        },
        Err(_) => default,
    }
}

/// `/add` conversation configuration
pub mod add_prompt {
    use super::{parse_env_or, Duration, Lazy};

    /// Idle timeout of a pending `/add` prompt (in seconds)
    pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

    /// How often expired prompts are swept (in seconds)
    pub const CLEANUP_INTERVAL_SECS: u64 = 60;

    /// Longest note accepted, in characters
    pub const MAX_NOTE_CHARS: usize = 500;

    /// Read from ADD_TIMEOUT_SECS environment variable
    pub static TIMEOUT_SECS: Lazy<u64> =
        Lazy::new(|| parse_env_or("ADD_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS, |secs| *secs > 0));

    pub fn timeout() -> Duration {
        Duration::from_secs(*TIMEOUT_SECS)
    }

    pub fn cleanup_interval() -> Duration {
        Duration::from_secs(CLEANUP_INTERVAL_SECS)
    }
}

/// `/recent` listing configuration
pub mod recent {
    use super::{parse_env_or, Lazy};

    pub const DEFAULT_LIMIT: usize = 10;
    pub const MAX_LIMIT: usize = 50;

    /// Read from RECENT_LIMIT environment variable
    pub static LIMIT: Lazy<usize> =
        Lazy::new(|| parse_env_or("RECENT_LIMIT", DEFAULT_LIMIT, |n| (1..=MAX_LIMIT).contains(n)));
}

/// Amount validation bounds
pub mod amount {
    /// Largest accepted magnitude for a single transaction
    pub const MAX_ABS: f64 = 1_000_000_000.0;
}

/// Database configuration
pub mod database {
    use super::Duration;

    /// Maximum number of pooled SQLite connections
    pub const POOL_MAX_SIZE: u32 = 8;

    /// SQLite busy timeout (in seconds)
    pub const BUSY_TIMEOUT_SECS: u64 = 10;

    pub fn busy_timeout() -> Duration {
        Duration::from_secs(BUSY_TIMEOUT_SECS)
    }
}

/// Health check server configuration
pub mod health {
    use super::{parse_env_or, Lazy};

    pub const DEFAULT_PORT: u16 = 8080;

    /// Read from PORT environment variable; 0 disables the server
    pub static PORT: Lazy<u16> = Lazy::new(|| parse_env_or("PORT", DEFAULT_PORT, |_| true));
}

/// Network configuration
pub mod network {
    use super::Duration;

    /// Request timeout for Bot API calls (in seconds)
    pub const REQUEST_TIMEOUT_SECS: u64 = 60;

    pub fn timeout() -> Duration {
        Duration::from_secs(REQUEST_TIMEOUT_SECS)
    }
}
