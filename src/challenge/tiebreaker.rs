use rusqlite::Row;

use super::period::Period;
use crate::context::{Error, UserContext};

/// The leaderboards used to order members who tied on a monthly challenge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tiebreaker {
	pub id: u32,
	pub period: Period,
	pub leaderboard_id: u32,

	/// Only consulted for users who also tie on the tiebreaker itself.
	pub breaker_leaderboard_id: Option<u32>,
	pub description: Option<String>,
}

impl Tiebreaker {
	fn from_row(row: &Row<'_>) -> Result<Self, Error> {
		let period: String = row.get("period")?;
		Ok(Self {
			id: row.get("id")?,
			period: period.parse()?,
			leaderboard_id: row.get("leaderboard_id")?,
			breaker_leaderboard_id: row.get("breaker_leaderboard_id")?,
			description: row.get("description")?,
		})
	}

	pub fn by_period(ctx: &UserContext, period: Period) -> Result<Option<Self>, Error> {
		ctx.db
			.get()?
			.prepare_cached("SELECT * FROM tiebreakers WHERE period=?")?
			.query_and_then([period.to_string()], Self::from_row)?
			.next()
			.transpose()
	}

	pub fn set(
		ctx: &UserContext,
		period: Period,
		leaderboard_id: u32,
		breaker_leaderboard_id: Option<u32>,
		description: Option<&str>,
	) -> Result<Self, Error> {
		ctx.db
			.get()?
			.prepare_cached(
				"
        INSERT INTO tiebreakers(period, leaderboard_id, breaker_leaderboard_id, description)
        VALUES (?,?,?,?)
        ON CONFLICT(period) DO UPDATE SET
          leaderboard_id=excluded.leaderboard_id,
          breaker_leaderboard_id=excluded.breaker_leaderboard_id,
          description=excluded.description
        RETURNING *
      ",
			)?
			.query_and_then(
				(
					period.to_string(),
					leaderboard_id,
					breaker_leaderboard_id,
					description,
				),
				Self::from_row,
			)?
			.next()
			.ok_or_else(|| anyhow::anyhow!("Tiebreaker upsert returned no rows"))?
	}

	/// Returns whether there was anything to clear.
	pub fn clear(ctx: &UserContext, period: Period) -> Result<bool, Error> {
		let changed = ctx
			.db
			.get()?
			.prepare_cached("DELETE FROM tiebreakers WHERE period=?")?
			.execute([period.to_string()])?;

		Ok(changed > 0)
	}
}
