//! Where the ranking gets its input from.
//!
//! Sources never fail: a broken fetch degrades into fewer (or no) entries,
//! and the failure is logged here rather than surfaced to the caller.

// {{{ Imports
use tracing::{info, warn};

use crate::challenge::award::compute_progress;
use crate::challenge::period::Period;
use crate::challenge::progress::{load_progress, save_progress};
use crate::challenge::tiebreaker::Tiebreaker;
use crate::challenge::{Challenge, ChallengeKind};
use crate::context::{Error, UserContext};
use crate::ranking::{resolve_ranks, ParticipantScore, RankedParticipant, TiebreakerEntry};
use crate::retro::GameInfo;
use crate::timed;
use crate::user::User;
// }}}

// {{{ Trait
pub trait ScoreSource {
	/// Progress of every member with at least one achievement in the period.
	async fn fetch_scores(&self, period: Period, kind: ChallengeKind) -> Vec<ParticipantScore>;

	/// Positions of every entry on an external leaderboard.
	async fn fetch_leaderboard(&self, leaderboard_id: u32) -> Vec<TiebreakerEntry>;
}

/// Game metadata, needed when admins set up challenges and boards.
pub trait GameSource {
	async fn fetch_game(&self, game_id: u32) -> Result<GameInfo, Error>;
}
// }}}
// {{{ RetroAchievements implementation
impl UserContext {
	/// Fetches a single user's progress, falling back to the last stored
	/// record when the api is unavailable.
	async fn user_score(&self, user: &User, challenge: &Challenge) -> Result<Option<ParticipantScore>, Error> {
		let progress = match self
			.retro
			.game_progress(&user.ra_username, challenge.game_id)
			.await
		{
			Ok(game) => {
				let progress =
					compute_progress(challenge, &game.achievements, self.config.retro.hardcore_only);
				if let Err(error) = save_progress(self, user.id, challenge.id, progress) {
					warn!(
						user = %user.ra_username,
						challenge_id = challenge.id,
						"Could not store progress: {error:#}"
					);
				}
				Some(progress)
			}
			Err(error) => {
				warn!(
					user = %user.ra_username,
					game_id = challenge.game_id,
					"Could not fetch progress, using the stored record: {error:#}"
				);
				load_progress(self, user.id, challenge.id)?
			}
		};

		Ok(progress
			.filter(|p| p.achieved_count > 0)
			.map(|p| {
				ParticipantScore::new(
					&user.ra_username,
					p.achieved_count,
					p.award.points(),
					challenge.total_achievements,
				)
			}))
	}

	async fn try_fetch_scores(
		&self,
		period: Period,
		kind: ChallengeKind,
	) -> Result<Vec<ParticipantScore>, Error> {
		let Some(challenge) = Challenge::by_period(self, period, kind)? else {
			info!(%period, ?kind, "No challenge set, nothing to fetch");
			return Ok(Vec::new());
		};

		let mut scores = Vec::new();
		for user in User::all(self)? {
			if let Some(score) = self.user_score(&user, &challenge).await? {
				scores.push(score);
			}
		}

		Ok(scores)
	}
}

impl ScoreSource for UserContext {
	async fn fetch_scores(&self, period: Period, kind: ChallengeKind) -> Vec<ParticipantScore> {
		timed!("fetch_scores", {
			self.try_fetch_scores(period, kind)
				.await
				.unwrap_or_else(|error| {
					warn!(%period, ?kind, "Could not fetch scores: {error:#}");
					Vec::new()
				})
		})
	}

	async fn fetch_leaderboard(&self, leaderboard_id: u32) -> Vec<TiebreakerEntry> {
		self.retro
			.leaderboard_entries(leaderboard_id)
			.await
			.unwrap_or_else(|error| {
				warn!(leaderboard_id, "Could not fetch leaderboard: {error:#}");
				Vec::new()
			})
	}
}

impl GameSource for UserContext {
	async fn fetch_game(&self, game_id: u32) -> Result<GameInfo, Error> {
		self.retro.game(game_id).await
	}
}
// }}}
// {{{ Resolve a period
/// Everything needed to render a challenge leaderboard.
#[derive(Debug, Clone)]
pub struct ChallengeStandings {
	pub challenge: Challenge,
	pub tiebreaker: Option<Tiebreaker>,
	pub ranked: Vec<RankedParticipant>,
}

/// Fetches fresh scores for a period and ranks them.
///
/// Tiebreakers only ever apply to the monthly challenge.
pub async fn resolve_standings(
	ctx: &UserContext,
	source: &impl ScoreSource,
	challenge: Challenge,
) -> Result<ChallengeStandings, Error> {
	let scores = source.fetch_scores(challenge.period, challenge.kind).await;

	let tiebreaker = match challenge.kind {
		ChallengeKind::Monthly => Tiebreaker::by_period(ctx, challenge.period)?,
		ChallengeKind::Shadow => None,
	};

	let (tiebreaker_entries, breaker_entries) = match &tiebreaker {
		Some(tiebreaker) => {
			let entries = source.fetch_leaderboard(tiebreaker.leaderboard_id).await;
			let breaker = match tiebreaker.breaker_leaderboard_id {
				Some(id) => source.fetch_leaderboard(id).await,
				None => Vec::new(),
			};
			(entries, breaker)
		}
		None => (Vec::new(), Vec::new()),
	};

	let ranked = resolve_ranks(&scores, &tiebreaker_entries, &breaker_entries);

	Ok(ChallengeStandings {
		challenge,
		tiebreaker,
		ranked,
	})
}
// }}}
// {{{ Tests
#[cfg(test)]
mod source_tests {
	use super::mock::FixedSource;
	use super::*;
	use chrono::NaiveDate;

	use crate::challenge::award::{AchievementKind, AwardTier, EarnedAchievement, PeriodProgress};
	use crate::challenge::CreateChallenge;
	use crate::context::testing::get_test_context;

	fn monthly(ctx: &UserContext, period: Period) -> Result<Challenge, Error> {
		CreateChallenge {
			period,
			kind: ChallengeKind::Monthly,
			game_id: 1446,
			game_title: "Mega Man X".to_owned(),
			console_name: "SNES".to_owned(),
			icon_path: None,
			total_achievements: 20,
			progression_achievements: Vec::new(),
			win_achievements: Vec::new(),
		}
		.save(ctx)
	}

	#[tokio::test]
	async fn unreachable_api_falls_back_to_stored_progress() -> Result<(), Error> {
		let (ctx, _guard) = get_test_context()?;
		let period = Period::new(2026, 10)?;
		let challenge = monthly(&ctx, period)?;

		let stored = User::register(&ctx, 1, "stored").map_err(|e| e.error)?;
		User::register(&ctx, 2, "unknown").map_err(|e| e.error)?;
		save_progress(
			&ctx,
			stored.id,
			challenge.id,
			PeriodProgress {
				achieved_count: 5,
				award: AwardTier::Participation,
			},
		)?;

		let scores = ctx.fetch_scores(period, ChallengeKind::Monthly).await;
		assert_eq!(scores, vec![ParticipantScore::new("stored", 5, 1, 20)]);

		Ok(())
	}

	#[tokio::test]
	async fn storage_failures_keep_fetched_progress() -> Result<(), Error> {
		let (ctx, _guard) = get_test_context()?;
		let period = Period::new(2026, 10)?;
		let challenge = monthly(&ctx, period)?;

		let earned_at = NaiveDate::from_ymd_opt(2026, 10, 5)
			.and_then(|d| d.and_hms_opt(12, 0, 0));
		let achievements = (1..=2)
			.map(|id| EarnedAchievement {
				id,
				kind: AchievementKind::Other,
				earned_at,
				earned_hardcore_at: earned_at,
			})
			.collect();
		ctx.retro.progress.insert(
			("ghost".to_owned(), challenge.game_id),
			GameInfo {
				id: challenge.game_id,
				title: "Mega Man X".to_owned(),
				console_name: "SNES".to_owned(),
				icon_path: None,
				total_achievements: 20,
				achievements,
			},
		);

		// Not a registered member, so storing the progress breaks the foreign key
		let ghost = User {
			id: 999,
			discord_id: "999".to_owned(),
			ra_username: "Ghost".to_owned(),
			is_admin: false,
		};

		let score = ctx.user_score(&ghost, &challenge).await?;
		assert_eq!(score, Some(ParticipantScore::new("Ghost", 2, 1, 20)));
		assert!(load_progress(&ctx, ghost.id, challenge.id)?.is_none());

		Ok(())
	}

	#[tokio::test]
	async fn missing_challenge_means_no_scores() -> Result<(), Error> {
		let (ctx, _guard) = get_test_context()?;
		User::register(&ctx, 1, "someone").map_err(|e| e.error)?;

		let scores = ctx
			.fetch_scores(Period::new(2026, 10)?, ChallengeKind::Shadow)
			.await;
		assert!(scores.is_empty());

		Ok(())
	}

	#[tokio::test]
	async fn standings_use_the_period_tiebreakers() -> Result<(), Error> {
		let (ctx, _guard) = get_test_context()?;
		let period = Period::new(2026, 10)?;
		let challenge = monthly(&ctx, period)?;
		Tiebreaker::set(&ctx, period, 77, Some(78), None)?;

		let mut source = FixedSource::default();
		source.scores.insert(
			(period, ChallengeKind::Monthly),
			vec![
				ParticipantScore::new("a", 10, 1, 20),
				ParticipantScore::new("b", 10, 1, 20),
				ParticipantScore::new("c", 10, 1, 20),
			],
		);
		source.leaderboards.insert(
			77,
			vec![
				TiebreakerEntry::new("a", 3, "1:00"),
				TiebreakerEntry::new("b", 3, "1:00"),
				TiebreakerEntry::new("c", 1, "0:40"),
			],
		);
		source.leaderboards.insert(
			78,
			vec![TiebreakerEntry::new("a", 5, "900"), TiebreakerEntry::new("b", 2, "1200")],
		);

		let standings = resolve_standings(&ctx, &source, challenge).await?;
		let order: Vec<_> = standings
			.ranked
			.iter()
			.map(|r| (r.score.username.as_str(), r.display_rank))
			.collect();
		assert_eq!(order, vec![("c", 1), ("b", 2), ("a", 3)]);
		assert_eq!(standings.tiebreaker.map(|t| t.leaderboard_id), Some(77));

		Ok(())
	}

	#[tokio::test]
	async fn unreachable_leaderboards_are_empty() -> Result<(), Error> {
		let (ctx, _guard) = get_test_context()?;
		assert!(ctx.fetch_leaderboard(1).await.is_empty());
		Ok(())
	}
}
// }}}
