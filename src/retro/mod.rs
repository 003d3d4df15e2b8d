//! Thin client over the RetroAchievements web API.
//!
//! Every request is authenticated through the `z` (username) and `y`
//! (web api key) query parameters. Responses are cached in [TtlCache]s
//! owned by the client, one per kind of data.

use std::collections::HashMap;

use anyhow::Context;
use chrono::NaiveDateTime;
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::Deserialize;
use tracing::debug;

use crate::challenge::award::{AchievementKind, EarnedAchievement};
use crate::context::config::BotConfig;
use crate::context::paths::get_var;
use crate::ranking::TiebreakerEntry;

pub mod cache;
pub mod source;

pub use cache::TtlCache;

// {{{ Credentials
#[derive(Clone)]
pub struct RetroCredentials {
	pub username: String,
	pub api_key: String,
}

impl RetroCredentials {
	pub fn from_env() -> anyhow::Result<Self> {
		Ok(Self {
			username: get_var("SELECTSTART_RA_USERNAME")?,
			api_key: get_var("SELECTSTART_RA_API_KEY")?,
		})
	}
}

impl std::fmt::Debug for RetroCredentials {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("RetroCredentials")
			.field("username", &self.username)
			.finish_non_exhaustive()
	}
}
// }}}
// {{{ Response types
/// The API encodes empty objects as empty arrays.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum MaybeMap<T> {
	Map(HashMap<String, T>),
	Empty(Vec<IgnoredAny>),
}

impl<T> MaybeMap<T> {
	fn into_values(self) -> Vec<T> {
		match self {
			Self::Map(map) => map.into_values().collect(),
			Self::Empty(_) => Vec::new(),
		}
	}
}

#[derive(Debug, Clone, Deserialize)]
struct RawAchievement {
	#[serde(rename = "ID")]
	id: u32,
	#[serde(rename = "DateEarned")]
	date_earned: Option<String>,
	#[serde(rename = "DateEarnedHardcore")]
	date_earned_hardcore: Option<String>,
	#[serde(rename = "type")]
	kind: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawGame {
	#[serde(rename = "ID")]
	id: u32,
	title: String,
	console_name: String,
	image_icon: Option<String>,
	num_achievements: u32,
	achievements: MaybeMap<RawAchievement>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawLeaderboardEntry {
	user: String,
	rank: u32,
	formatted_score: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawLeaderboardEntries {
	results: Vec<RawLeaderboardEntry>,
}
// }}}
// {{{ Domain types
#[derive(Debug, Clone)]
pub struct GameInfo {
	pub id: u32,
	pub title: String,
	pub console_name: String,
	pub icon_path: Option<String>,
	pub total_achievements: u32,

	/// Earn dates are only present when the game was fetched for a user.
	pub achievements: Vec<EarnedAchievement>,
}

fn parse_date(date: Option<&str>) -> Option<NaiveDateTime> {
	NaiveDateTime::parse_from_str(date?, "%Y-%m-%d %H:%M:%S").ok()
}

impl From<RawGame> for GameInfo {
	fn from(raw: RawGame) -> Self {
		let mut achievements: Vec<_> = raw
			.achievements
			.into_values()
			.into_iter()
			.map(|a| EarnedAchievement {
				id: a.id,
				kind: AchievementKind::from_api(a.kind.as_deref()),
				earned_at: parse_date(a.date_earned.as_deref()),
				earned_hardcore_at: parse_date(a.date_earned_hardcore.as_deref()),
			})
			.collect();
		achievements.sort_by_key(|a| a.id);

		Self {
			id: raw.id,
			title: raw.title,
			console_name: raw.console_name,
			icon_path: raw.image_icon,
			total_achievements: raw.num_achievements,
			achievements,
		}
	}
}
// }}}
// {{{ Client
#[derive(Clone)]
pub struct RetroClient {
	http: reqwest::Client,
	base_url: String,
	credentials: RetroCredentials,
	leaderboard_fetch_count: u32,

	games: TtlCache<u32, GameInfo>,
	progress: TtlCache<(String, u32), GameInfo>,
	leaderboards: TtlCache<u32, Vec<TiebreakerEntry>>,
}

impl RetroClient {
	pub fn new(config: &BotConfig, credentials: RetroCredentials) -> anyhow::Result<Self> {
		let http = reqwest::Client::builder()
			.user_agent(concat!("selectstart/", env!("CARGO_PKG_VERSION")))
			.timeout(std::time::Duration::from_secs(30))
			.build()
			.with_context(|| "Could not build http client")?;

		Ok(Self {
			http,
			base_url: config.retro.base_url.trim_end_matches('/').to_owned(),
			credentials,
			leaderboard_fetch_count: config.retro.leaderboard_fetch_count,
			games: TtlCache::new(config.cache.game_info_ttl()),
			progress: TtlCache::new(config.cache.progress_ttl()),
			leaderboards: TtlCache::new(config.cache.leaderboard_ttl()),
		})
	}

	// {{{ Perform request
	async fn get_json<T: DeserializeOwned>(
		&self,
		endpoint: &str,
		params: &[(&str, String)],
	) -> anyhow::Result<T> {
		debug!(endpoint, "Requesting RetroAchievements api");

		self.http
			.get(format!("{}/{endpoint}.php", self.base_url))
			.query(&[
				("z", self.credentials.username.as_str()),
				("y", self.credentials.api_key.as_str()),
			])
			.query(params)
			.send()
			.await
			.with_context(|| format!("Failed to send {endpoint} request"))?
			.error_for_status()
			.with_context(|| format!("{endpoint} request has non-ok status"))?
			.json::<T>()
			.await
			.with_context(|| format!("Failed to decode {endpoint} response"))
	}
	// }}}
	// {{{ Endpoints
	/// Game metadata together with the full achievement list.
	pub async fn game(&self, game_id: u32) -> anyhow::Result<GameInfo> {
		if let Some(game) = self.games.get(&game_id) {
			return Ok(game);
		}

		let raw: RawGame = self
			.get_json("API_GetGameExtended", &[("i", game_id.to_string())])
			.await?;
		let game = GameInfo::from(raw);
		self.games.insert(game_id, game.clone());
		Ok(game)
	}

	/// The game together with the given user's earn dates.
	pub async fn game_progress(&self, username: &str, game_id: u32) -> anyhow::Result<GameInfo> {
		let key = (username.to_lowercase(), game_id);
		if let Some(progress) = self.progress.get(&key) {
			return Ok(progress);
		}

		let raw: RawGame = self
			.get_json(
				"API_GetGameInfoAndUserProgress",
				&[("g", game_id.to_string()), ("u", username.to_owned())],
			)
			.await?;
		let progress = GameInfo::from(raw);
		self.progress.insert(key, progress.clone());
		Ok(progress)
	}

	pub async fn leaderboard_entries(
		&self,
		leaderboard_id: u32,
	) -> anyhow::Result<Vec<TiebreakerEntry>> {
		if let Some(entries) = self.leaderboards.get(&leaderboard_id) {
			return Ok(entries);
		}

		let raw: RawLeaderboardEntries = self
			.get_json(
				"API_GetLeaderboardEntries",
				&[
					("i", leaderboard_id.to_string()),
					("c", self.leaderboard_fetch_count.to_string()),
				],
			)
			.await?;

		let entries: Vec<_> = raw
			.results
			.into_iter()
			.map(|e| TiebreakerEntry {
				username: e.user,
				rank: e.rank,
				score: e.formatted_score,
			})
			.collect();

		self.leaderboards.insert(leaderboard_id, entries.clone());
		Ok(entries)
	}

	/// Drops every cached response for a leaderboard, so the next
	/// lookup hits the api again.
	pub fn forget_leaderboard(&self, leaderboard_id: u32) {
		self.leaderboards.invalidate(&leaderboard_id);
	}
	// }}}
}
// }}}
