use std::path::PathBuf;

pub const DEFAULT_TICK_MS: u64 = 16;
pub const DEFAULT_RENDER_FPS: u64 = 60;
pub const LOG_FILE_NAME: &str = "pacwoman.log";

/// Driver settings read from `PACWOMAN_*` environment variables.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settings {
    pub tick_ms: u64,
    pub render_fps: u64,
    /// Seed for the shared random source. `None` seeds from entropy.
    pub seed: Option<u64>,
    pub log_dir: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tick_ms: DEFAULT_TICK_MS,
            render_fps: DEFAULT_RENDER_FPS,
            seed: None,
            log_dir: std::env::temp_dir(),
        }
    }
}

impl Settings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds settings from an arbitrary variable source. Values that are
    /// missing or do not parse fall back to the defaults; speeds must be
    /// positive.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let positive = |key: &str, fallback: u64| {
            lookup(key)
                .and_then(|v| v.trim().parse::<u64>().ok())
                .filter(|v| *v > 0)
                .unwrap_or(fallback)
        };
        Self {
            tick_ms: positive("PACWOMAN_TICK_MS", defaults.tick_ms),
            render_fps: positive("PACWOMAN_FPS", defaults.render_fps),
            seed: lookup("PACWOMAN_SEED").and_then(|v| v.trim().parse::<u64>().ok()),
            log_dir: lookup("PACWOMAN_LOG_DIR")
                .filter(|v| !v.is_empty())
                .map(PathBuf::from)
                .unwrap_or(defaults.log_dir),
        }
    }
}
