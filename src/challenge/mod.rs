// {{{ Imports
use std::fmt::Display;
use std::str::FromStr;

use anyhow::anyhow;
use rusqlite::{OptionalExtension, Row};

use crate::context::{Error, ErrorKind, TagError, TaggedError, UserContext};
use period::Period;
// }}}

pub mod arcade;
pub mod award;
pub mod period;
pub mod progress;
pub mod tiebreaker;

// {{{ Challenge kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChallengeKind {
	Monthly,
	Shadow,
}

impl ChallengeKind {
	pub const KINDS: [Self; 2] = [Self::Monthly, Self::Shadow];
	pub const KIND_DB_STRINGS: [&'static str; 2] = ["monthly", "shadow"];
	pub const KIND_STRINGS: [&'static str; 2] = ["Monthly challenge", "Shadow game"];

	#[inline]
	pub fn to_index(self) -> usize {
		self as usize
	}

	#[inline]
	pub fn db_string(self) -> &'static str {
		Self::KIND_DB_STRINGS[self.to_index()]
	}
}

impl FromStr for ChallengeKind {
	type Err = Error;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::KIND_DB_STRINGS
			.iter()
			.position(|k| *k == s)
			.map(|i| Self::KINDS[i])
			.ok_or_else(|| anyhow!("Unknown challenge kind `{s}`"))
	}
}

impl Display for ChallengeKind {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", Self::KIND_STRINGS[self.to_index()])
	}
}
// }}}
// {{{ Achievement id lists
/// Parses achievement ids separated by commas and/or whitespace.
pub fn parse_id_list(input: &str) -> Result<Vec<u32>, TaggedError> {
	input
		.split(|c: char| c == ',' || c.is_whitespace())
		.filter(|s| !s.is_empty())
		.map(|s| {
			s.parse()
				.map_err(|_| anyhow!("`{s}` is not a valid achievement id").tag(ErrorKind::User))
		})
		.collect()
}

fn format_id_list(ids: &[u32]) -> String {
	ids.iter()
		.map(|id| id.to_string())
		.collect::<Vec<_>>()
		.join(",")
}
// }}}
// {{{ Challenge
#[derive(Debug, Clone)]
pub struct Challenge {
	pub id: u32,
	pub period: Period,
	pub kind: ChallengeKind,
	pub game_id: u32,
	pub game_title: String,
	pub console_name: String,
	pub icon_path: Option<String>,
	pub total_achievements: u32,
	pub progression_achievements: Vec<u32>,
	pub win_achievements: Vec<u32>,

	/// Shadow games stay hidden until revealed. Monthly challenges are always revealed.
	pub revealed: bool,
}

impl Challenge {
	fn from_row(row: &Row<'_>) -> Result<Self, Error> {
		let period: String = row.get("period")?;
		let kind: String = row.get("kind")?;
		let progression: String = row.get("progression_achievements")?;
		let win: String = row.get("win_achievements")?;

		Ok(Self {
			id: row.get("id")?,
			period: period.parse()?,
			kind: kind.parse()?,
			game_id: row.get("game_id")?,
			game_title: row.get("game_title")?,
			console_name: row.get("console_name")?,
			icon_path: row.get("icon_path")?,
			total_achievements: row.get("total_achievements")?,
			progression_achievements: parse_id_list(&progression).map_err(|e| e.error)?,
			win_achievements: parse_id_list(&win).map_err(|e| e.error)?,
			revealed: row.get("revealed")?,
		})
	}

	pub fn by_period(
		ctx: &UserContext,
		period: Period,
		kind: ChallengeKind,
	) -> Result<Option<Self>, Error> {
		ctx.db
			.get()?
			.prepare_cached("SELECT * FROM challenges WHERE period=? AND kind=?")?
			.query_and_then((period.to_string(), kind.db_string()), Self::from_row)?
			.next()
			.transpose()
	}

	/// Like [Self::by_period], except a missing challenge is a user error.
	pub fn require(
		ctx: &UserContext,
		period: Period,
		kind: ChallengeKind,
	) -> Result<Self, TaggedError> {
		Self::by_period(ctx, period, kind)?.ok_or_else(|| {
			anyhow!("No {} has been set for {}", kind, period.pretty()).tag(ErrorKind::User)
		})
	}

	/// Whether members may see this challenge yet.
	#[inline]
	pub fn is_visible(&self) -> bool {
		self.kind == ChallengeKind::Monthly || self.revealed
	}

	pub fn reveal(ctx: &UserContext, period: Period) -> Result<bool, Error> {
		let changed = ctx
			.db
			.get()?
			.prepare_cached("UPDATE challenges SET revealed=1 WHERE period=? AND kind='shadow'")?
			.execute([period.to_string()])?;

		Ok(changed > 0)
	}
}
// }}}
// {{{ Create challenge
#[derive(Debug, Clone)]
pub struct CreateChallenge {
	pub period: Period,
	pub kind: ChallengeKind,
	pub game_id: u32,
	pub game_title: String,
	pub console_name: String,
	pub icon_path: Option<String>,
	pub total_achievements: u32,
	pub progression_achievements: Vec<u32>,
	pub win_achievements: Vec<u32>,
}

impl CreateChallenge {
	/// Inserts the challenge, replacing any previous one of the same kind
	/// for the same period. Recorded progress is dropped when the game changes.
	pub fn save(self, ctx: &UserContext) -> Result<Challenge, Error> {
		let mut conn = ctx.db.get()?;
		let tx = conn.transaction()?;

		let previous: Option<(u32, u32)> = tx
			.query_row(
				"SELECT id, game_id FROM challenges WHERE period=? AND kind=?",
				(self.period.to_string(), self.kind.db_string()),
				|row| Ok((row.get(0)?, row.get(1)?)),
			)
			.optional()?;

		if let Some((id, game_id)) = previous {
			if game_id != self.game_id {
				tx.execute("DELETE FROM progress WHERE challenge_id=?", [id])?;
			}
		}

		let challenge = tx.query_row(
			"
        INSERT INTO challenges(
          period, kind, game_id, game_title, console_name, icon_path,
          total_achievements, progression_achievements, win_achievements,
          revealed
        )
        VALUES (?,?,?,?,?,?,?,?,?,?)
        ON CONFLICT(period, kind) DO UPDATE SET
          game_id=excluded.game_id,
          game_title=excluded.game_title,
          console_name=excluded.console_name,
          icon_path=excluded.icon_path,
          total_achievements=excluded.total_achievements,
          progression_achievements=excluded.progression_achievements,
          win_achievements=excluded.win_achievements
        RETURNING *
      ",
			(
				self.period.to_string(),
				self.kind.db_string(),
				self.game_id,
				&self.game_title,
				&self.console_name,
				&self.icon_path,
				self.total_achievements,
				format_id_list(&self.progression_achievements),
				format_id_list(&self.win_achievements),
				self.kind == ChallengeKind::Monthly,
			),
			|row| Ok(Challenge::from_row(row)),
		)??;

		tx.commit()?;
		Ok(challenge)
	}
}
// }}}
