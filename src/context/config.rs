//! Tunables read from an optional TOML file.
//!
//! Every key has a default, so an empty (or missing) file is a valid config.
//! Secrets never live here; see [super::paths::get_var].

use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use serde::Deserialize;

// {{{ Sections
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RetroConfig {
	pub base_url: String,

	/// Only count achievements unlocked in hardcore mode.
	pub hardcore_only: bool,

	/// How many leaderboard entries to request per leaderboard.
	pub leaderboard_fetch_count: u32,
}

impl Default for RetroConfig {
	fn default() -> Self {
		Self {
			base_url: "https://retroachievements.org/API".to_owned(),
			hardcore_only: true,
			leaderboard_fetch_count: 500,
		}
	}
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
	pub game_info_secs: u64,
	pub progress_secs: u64,
	pub leaderboard_secs: u64,
}

impl Default for CacheConfig {
	fn default() -> Self {
		Self {
			game_info_secs: 30 * 60,
			progress_secs: 5 * 60,
			leaderboard_secs: 2 * 60,
		}
	}
}

impl CacheConfig {
	#[inline]
	pub fn game_info_ttl(&self) -> Duration {
		Duration::from_secs(self.game_info_secs)
	}

	#[inline]
	pub fn progress_ttl(&self) -> Duration {
		Duration::from_secs(self.progress_secs)
	}

	#[inline]
	pub fn leaderboard_ttl(&self) -> Duration {
		Duration::from_secs(self.leaderboard_secs)
	}
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
	/// Channel the monthly leaderboard is kept up to date in.
	/// The feed is disabled when missing.
	pub leaderboard_channel: Option<u64>,
	pub refresh_minutes: u64,
}

impl Default for FeedConfig {
	fn default() -> Self {
		Self {
			leaderboard_channel: None,
			refresh_minutes: 15,
		}
	}
}

impl FeedConfig {
	#[inline]
	pub fn refresh_interval(&self) -> Duration {
		Duration::from_secs(self.refresh_minutes.max(1) * 60)
	}
}
// }}}
// {{{ BotConfig
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BotConfig {
	pub retro: RetroConfig,
	pub cache: CacheConfig,
	pub feeds: FeedConfig,
}

impl BotConfig {
	pub fn parse(contents: &str) -> anyhow::Result<Self> {
		toml::from_str(contents).with_context(|| "Invalid bot configuration")
	}

	/// Reads the config at the given path, falling back to the defaults
	/// when no path was configured.
	pub fn read(path: Option<&Path>) -> anyhow::Result<Self> {
		match path {
			Some(path) => {
				let contents = std::fs::read_to_string(path)
					.with_context(|| format!("Could not read config file {path:?}"))?;
				Self::parse(&contents)
			}
			None => Ok(Self::default()),
		}
	}
}
// }}}
