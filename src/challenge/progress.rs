//! The only per-user challenge data which survives between refreshes.

use rusqlite::OptionalExtension;

use super::award::{AwardTier, PeriodProgress};
use crate::context::{Error, UserContext};

pub fn save_progress(
	ctx: &UserContext,
	user_id: u32,
	challenge_id: u32,
	progress: PeriodProgress,
) -> Result<(), Error> {
	ctx.db
		.get()?
		.prepare_cached(
			"
        INSERT INTO progress(user_id, challenge_id, achieved_count, award_points)
        VALUES (?,?,?,?)
        ON CONFLICT(user_id, challenge_id) DO UPDATE SET
          achieved_count=excluded.achieved_count,
          award_points=excluded.award_points,
          updated_at=CURRENT_TIMESTAMP
      ",
		)?
		.execute((
			user_id,
			challenge_id,
			progress.achieved_count,
			progress.award.points(),
		))?;

	Ok(())
}

pub fn load_progress(
	ctx: &UserContext,
	user_id: u32,
	challenge_id: u32,
) -> Result<Option<PeriodProgress>, Error> {
	let progress = ctx
		.db
		.get()?
		.prepare_cached(
			"SELECT achieved_count, award_points FROM progress WHERE user_id=? AND challenge_id=?",
		)?
		.query_row((user_id, challenge_id), |row| {
			Ok(PeriodProgress {
				achieved_count: row.get(0)?,
				award: AwardTier::from_points(row.get(1)?),
			})
		})
		.optional()?;

	Ok(progress)
}
