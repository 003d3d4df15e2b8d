//! Environment lookups and the on-disk locations the bot uses.

use anyhow::Context;
use std::{path::Path, path::PathBuf, str::FromStr};

/// Like [std::env::var], but the error names the missing variable.
pub fn get_var(name: &str) -> anyhow::Result<String> {
	std::env::var(name).with_context(|| format!("Missing ${name} environment variable"))
}

/// Resolves a directory from `name` (or `default_to` when `name` is unset)
/// and makes sure it exists.
pub fn get_env_dir_path(name: &str, default_to: Option<&str>) -> anyhow::Result<PathBuf> {
	let raw = match (get_var(name), default_to) {
		(Ok(raw), _) => raw,
		(Err(_), Some(fallback)) => get_var(fallback)?,
		(Err(err), None) => return Err(err),
	};

	let dir = PathBuf::from_str(&raw).with_context(|| format!("${name} is not a valid path"))?;
	std::fs::create_dir_all(&dir).with_context(|| format!("Could not create directory {dir:?}"))?;

	Ok(dir)
}

#[derive(Clone, Debug)]
pub struct SelectStartPaths {
	/// Owned by the bot at runtime. Holds the database.
	data_dir: PathBuf,

	/// Optional TOML file overriding the default tunables.
	config_path: Option<PathBuf>,
}

impl SelectStartPaths {
	/// Reads `SELECTSTART_DATA_DIR` (falling back to systemd's
	/// `STATE_DIRECTORY`) and the optional `SELECTSTART_CONFIG`.
	pub fn new() -> anyhow::Result<Self> {
		let config_path = match get_var("SELECTSTART_CONFIG") {
			Ok(path) => Some(
				PathBuf::from_str(&path).with_context(|| "$SELECTSTART_CONFIG is not a valid path")?,
			),
			Err(_) => None,
		};

		Ok(Self {
			data_dir: get_env_dir_path("SELECTSTART_DATA_DIR", Some("STATE_DIRECTORY"))?,
			config_path,
		})
	}

	pub fn data_dir(&self) -> &Path {
		&self.data_dir
	}

	pub fn config_path(&self) -> Option<&Path> {
		self.config_path.as_deref()
	}
}

pub fn db_path(data_dir: &Path) -> PathBuf {
	data_dir.join("db.sqlite")
}
