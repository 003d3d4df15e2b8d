// {{{ Imports
use anyhow::Context;
use include_dir::{include_dir, Dir};
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite_migration::Migrations;
use std::path::Path;
use std::sync::LazyLock;
use tracing::info;

use crate::context::paths::db_path;
// }}}

pub type SqlitePool = r2d2::Pool<SqliteConnectionManager>;

pub fn connect_db(data_dir: &Path) -> anyhow::Result<SqlitePool> {
	let db_path = db_path(data_dir);
	let mut conn = rusqlite::Connection::open(&db_path)
		.with_context(|| "Could not connect to sqlite database")?;
	conn.pragma_update(None, "journal_mode", "WAL")?;

	// {{{ Run migrations
	static MIGRATIONS_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/migrations");
	static MIGRATIONS: LazyLock<Migrations> = LazyLock::new(|| {
		Migrations::from_directory(&MIGRATIONS_DIR).expect("Could not load migrations")
	});

	MIGRATIONS
		.to_latest(&mut conn)
		.with_context(|| "Could not run migrations")?;
	info!("Ensured db schema is up to date");
	// }}}

	// Foreign keys are a per-connection setting
	let manager = SqliteConnectionManager::file(&db_path)
		.with_init(|conn| conn.pragma_update(None, "foreign_keys", "ON"));

	Pool::new(manager).with_context(|| "Could not open sqlite database.")
}

#[cfg(test)]
mod db_tests {
	use super::*;

	#[test]
	fn migrations_are_valid() {
		static MIGRATIONS_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/migrations");
		let migrations = Migrations::from_directory(&MIGRATIONS_DIR).unwrap();
		assert!(migrations.validate().is_ok());
	}

	#[test]
	fn reconnecting_keeps_data() -> anyhow::Result<()> {
		let dir = tempfile::tempdir()?;

		connect_db(dir.path())?
			.get()?
			.execute("INSERT INTO users(discord_id, ra_username) VALUES ('1', 'someone')", ())?;

		let count: u32 = connect_db(dir.path())?
			.get()?
			.query_row("SELECT count() FROM users", (), |row| row.get(0))?;
		assert_eq!(count, 1);

		Ok(())
	}
}
