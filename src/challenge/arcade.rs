use rusqlite::Row;

use crate::context::{Error, UserContext};

/// A RetroAchievements leaderboard tracked indefinitely for members.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArcadeBoard {
	pub id: u32,
	pub key: String,
	pub leaderboard_id: u32,
	pub game_title: String,
	pub description: Option<String>,
}

impl ArcadeBoard {
	fn from_row(row: &Row<'_>) -> Result<Self, rusqlite::Error> {
		Ok(Self {
			id: row.get("id")?,
			key: row.get("board_key")?,
			leaderboard_id: row.get("leaderboard_id")?,
			game_title: row.get("game_title")?,
			description: row.get("description")?,
		})
	}

	pub fn all(ctx: &UserContext) -> Result<Vec<Self>, Error> {
		let boards = ctx
			.db
			.get()?
			.prepare_cached("SELECT * FROM arcade_boards ORDER BY board_key")?
			.query_map((), Self::from_row)?
			.collect::<Result<_, _>>()?;

		Ok(boards)
	}

	pub fn by_key(ctx: &UserContext, key: &str) -> Result<Option<Self>, Error> {
		let board = ctx
			.db
			.get()?
			.prepare_cached("SELECT * FROM arcade_boards WHERE board_key=?")?
			.query_map([key], Self::from_row)?
			.next()
			.transpose()?;

		Ok(board)
	}

	pub fn add(
		ctx: &UserContext,
		key: &str,
		leaderboard_id: u32,
		game_title: &str,
		description: Option<&str>,
	) -> Result<Self, Error> {
		let board = ctx
			.db
			.get()?
			.prepare_cached(
				"
        INSERT INTO arcade_boards(board_key, leaderboard_id, game_title, description)
        VALUES (?,?,?,?)
        RETURNING *
      ",
			)?
			.query_row((key, leaderboard_id, game_title, description), Self::from_row)?;

		Ok(board)
	}

	pub fn remove(ctx: &UserContext, key: &str) -> Result<bool, Error> {
		let changed = ctx
			.db
			.get()?
			.prepare_cached("DELETE FROM arcade_boards WHERE board_key=?")?
			.execute([key])?;

		Ok(changed > 0)
	}
}

#[cfg(test)]
mod arcade_tests {
	use super::*;
	use crate::context::testing::get_test_context;

	#[test]
	fn keys_are_case_insensitive() -> Result<(), Error> {
		let (ctx, _guard) = get_test_context()?;
		ArcadeBoard::add(&ctx, "smw-exit", 42, "Super Mario World", None)?;

		let board = ArcadeBoard::by_key(&ctx, "SMW-Exit")?.unwrap();
		assert_eq!(board.leaderboard_id, 42);
		assert!(ArcadeBoard::add(&ctx, "SMW-EXIT", 43, "Super Mario World", None).is_err());

		assert!(ArcadeBoard::remove(&ctx, "smw-EXIT")?);
		assert!(ArcadeBoard::all(&ctx)?.is_empty());

		Ok(())
	}
}
