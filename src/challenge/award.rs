// {{{ Imports
use chrono::NaiveDateTime;
use serde::Serialize;

use super::period::Period;
use super::Challenge;
// }}}

// {{{ Achievements
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AchievementKind {
	Progression,
	WinCondition,
	Missable,
	Other,
}

impl AchievementKind {
	pub fn from_api(kind: Option<&str>) -> Self {
		match kind {
			Some("progression") => Self::Progression,
			Some("win_condition") => Self::WinCondition,
			Some("missable") => Self::Missable,
			_ => Self::Other,
		}
	}
}

#[derive(Debug, Clone)]
pub struct EarnedAchievement {
	pub id: u32,
	pub kind: AchievementKind,
	pub earned_at: Option<NaiveDateTime>,
	pub earned_hardcore_at: Option<NaiveDateTime>,
}

impl EarnedAchievement {
	#[inline]
	fn earned_during(&self, period: Period, hardcore_only: bool) -> bool {
		let earned_at = if hardcore_only {
			self.earned_hardcore_at
		} else {
			self.earned_hardcore_at.or(self.earned_at)
		};

		earned_at.is_some_and(|at| period.contains(at))
	}
}
// }}}
// {{{ Award tiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum AwardTier {
	None,
	Participation,
	Beaten,
	Mastery,
}

impl AwardTier {
	pub const TIERS: [Self; 4] = [Self::None, Self::Participation, Self::Beaten, Self::Mastery];
	pub const TIER_POINTS: [u32; 4] = [0, 1, 4, 7];
	pub const TIER_STRINGS: [&'static str; 4] = ["", "Participation", "Beaten", "Mastery"];
	pub const TIER_EMOJIS: [&'static str; 4] = ["", "🏁", "⭐", "✨"];

	#[inline]
	pub fn to_index(self) -> usize {
		self as usize
	}

	#[inline]
	pub fn points(self) -> u32 {
		Self::TIER_POINTS[self.to_index()]
	}

	/// Award points are stored rather than tiers, so this goes the other way.
	pub fn from_points(points: u32) -> Self {
		Self::TIERS
			.into_iter()
			.rev()
			.find(|tier| points >= tier.points())
			.unwrap_or(Self::None)
	}
}
// }}}
// {{{ Period progress
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodProgress {
	pub achieved_count: u32,
	pub award: AwardTier,
}

/// Computes what a user achieved on a challenge's game during its period.
///
/// Progression and win lists stored on the challenge take precedence over
/// the achievement types reported by the api.
pub fn compute_progress(
	challenge: &Challenge,
	achievements: &[EarnedAchievement],
	hardcore_only: bool,
) -> PeriodProgress {
	let earned = |a: &&EarnedAchievement| a.earned_during(challenge.period, hardcore_only);
	let achieved_count = achievements.iter().filter(earned).count() as u32;

	let (progression, win): (Vec<u32>, Vec<u32>) = if challenge.progression_achievements.is_empty()
		&& challenge.win_achievements.is_empty()
	{
		(
			ids_of_kind(achievements, AchievementKind::Progression),
			ids_of_kind(achievements, AchievementKind::WinCondition),
		)
	} else {
		(
			challenge.progression_achievements.clone(),
			challenge.win_achievements.clone(),
		)
	};

	let has_earned = |id: &u32| achievements.iter().filter(earned).any(|a| a.id == *id);
	let beaten = (!progression.is_empty() || !win.is_empty())
		&& progression.iter().all(has_earned)
		&& (win.is_empty() || win.iter().any(has_earned));

	let award = if challenge.total_achievements > 0 && achieved_count >= challenge.total_achievements
	{
		AwardTier::Mastery
	} else if beaten {
		AwardTier::Beaten
	} else if achieved_count > 0 {
		AwardTier::Participation
	} else {
		AwardTier::None
	};

	PeriodProgress {
		achieved_count,
		award,
	}
}

fn ids_of_kind(achievements: &[EarnedAchievement], kind: AchievementKind) -> Vec<u32> {
	achievements
		.iter()
		.filter(|a| a.kind == kind)
		.map(|a| a.id)
		.collect()
}
// }}}
// {{{ Tests
#[cfg(test)]
mod award_tests {
	use super::*;
	use crate::challenge::ChallengeKind;

	fn at(s: &str) -> Option<NaiveDateTime> {
		NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").ok()
	}

	fn challenge(total: u32, progression: Vec<u32>, win: Vec<u32>) -> Challenge {
		Challenge {
			id: 1,
			period: Period::new(2026, 10).unwrap(),
			kind: ChallengeKind::Monthly,
			game_id: 1446,
			game_title: "Mega Man X".to_owned(),
			console_name: "SNES".to_owned(),
			icon_path: None,
			total_achievements: total,
			progression_achievements: progression,
			win_achievements: win,
			revealed: true,
		}
	}

	fn earned(id: u32, kind: AchievementKind, hardcore: Option<&str>) -> EarnedAchievement {
		EarnedAchievement {
			id,
			kind,
			earned_at: hardcore.and_then(at),
			earned_hardcore_at: hardcore.and_then(at),
		}
	}

	#[test]
	fn points_round_trip_through_tiers() {
		for tier in AwardTier::TIERS {
			assert_eq!(AwardTier::from_points(tier.points()), tier);
		}
	}

	#[test]
	fn only_counts_achievements_from_the_period() {
		let achievements = [
			earned(1, AchievementKind::Other, Some("2026-09-30 23:00:00")),
			earned(2, AchievementKind::Other, Some("2026-10-01 00:10:00")),
			earned(3, AchievementKind::Other, None),
		];
		let progress = compute_progress(&challenge(3, vec![], vec![]), &achievements, true);
		assert_eq!(progress.achieved_count, 1);
		assert_eq!(progress.award, AwardTier::Participation);
	}

	#[test]
	fn softcore_unlocks_need_the_flag() {
		let achievements = [EarnedAchievement {
			id: 1,
			kind: AchievementKind::Other,
			earned_at: at("2026-10-05 12:00:00"),
			earned_hardcore_at: None,
		}];

		let hardcore = compute_progress(&challenge(2, vec![], vec![]), &achievements, true);
		let softcore = compute_progress(&challenge(2, vec![], vec![]), &achievements, false);
		assert_eq!(hardcore.award, AwardTier::None);
		assert_eq!(softcore.achieved_count, 1);
	}

	#[test]
	fn beaten_uses_api_types_by_default() {
		let achievements = [
			earned(1, AchievementKind::Progression, Some("2026-10-02 10:00:00")),
			earned(2, AchievementKind::WinCondition, Some("2026-10-03 10:00:00")),
			earned(3, AchievementKind::Missable, None),
		];
		let progress = compute_progress(&challenge(3, vec![], vec![]), &achievements, true);
		assert_eq!(progress.award, AwardTier::Beaten);
		assert_eq!(progress.award.points(), 4);
	}

	#[test]
	fn stored_lists_take_precedence() {
		let achievements = [
			earned(1, AchievementKind::Progression, Some("2026-10-02 10:00:00")),
			earned(2, AchievementKind::WinCondition, Some("2026-10-03 10:00:00")),
			earned(3, AchievementKind::Other, None),
			earned(4, AchievementKind::Other, None),
		];
		let progress = compute_progress(&challenge(4, vec![1, 3], vec![2]), &achievements, true);
		assert_eq!(progress.award, AwardTier::Participation);
	}

	#[test]
	fn earning_everything_is_mastery() {
		let achievements = [
			earned(1, AchievementKind::Progression, Some("2026-10-02 10:00:00")),
			earned(2, AchievementKind::WinCondition, Some("2026-10-03 10:00:00")),
		];
		let progress = compute_progress(&challenge(2, vec![], vec![]), &achievements, true);
		assert_eq!(progress.award, AwardTier::Mastery);
		assert_eq!(progress.award.points(), 7);
	}

	#[test]
	fn games_without_progression_data_are_never_beaten() {
		let achievements = [earned(1, AchievementKind::Other, Some("2026-10-02 10:00:00"))];
		let progress = compute_progress(&challenge(5, vec![], vec![]), &achievements, true);
		assert_eq!(progress.award, AwardTier::Participation);
	}
}
// }}}
