// {{{ Imports
use config::BotConfig;
use db::{connect_db, SqlitePool};
use paths::SelectStartPaths;

use crate::retro::{RetroClient, RetroCredentials};
use crate::timed;
// }}}

pub mod config;
pub mod db;
pub mod paths;

// {{{ Common types
pub type Error = anyhow::Error;
pub type PoiseContext<'a> = poise::Context<'a, UserContext, Error>;
// }}}
// {{{ Error handling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
	User,
	Internal,
}

#[derive(Debug)]
pub struct TaggedError {
	pub kind: ErrorKind,
	pub error: Error,
}

impl TaggedError {
	#[inline]
	pub fn new(kind: ErrorKind, error: Error) -> Self {
		Self { kind, error }
	}
}

impl<E: Into<Error>> From<E> for TaggedError {
	fn from(value: E) -> Self {
		Self::new(ErrorKind::Internal, value.into())
	}
}

pub trait TagError {
	fn tag(self, tag: ErrorKind) -> TaggedError;
}

impl TagError for Error {
	fn tag(self, tag: ErrorKind) -> TaggedError {
		TaggedError::new(tag, self)
	}
}
// }}}
// {{{ UserContext
/// Shared state handed to every command: database pool, API client and tunables.
#[derive(Clone)]
pub struct UserContext {
	pub db: SqlitePool,
	pub config: BotConfig,
	pub retro: RetroClient,
}

impl UserContext {
	#[inline]
	pub fn new() -> Result<Self, Error> {
		timed!("create_context", {
			let paths = SelectStartPaths::new()?;
			let config = BotConfig::read(paths.config_path())?;
			let db = connect_db(paths.data_dir())?;
			let retro = RetroClient::new(&config, RetroCredentials::from_env()?)?;

			Ok(Self::from_parts(db, config, retro))
		})
	}

	#[inline]
	pub fn from_parts(db: SqlitePool, config: BotConfig, retro: RetroClient) -> Self {
		Self { db, config, retro }
	}
}
// }}}
