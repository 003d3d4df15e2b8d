// {{{ Imports
use super::{escape_markdown, icon_url, paginate, EmbedView};
use crate::challenge::arcade::ArcadeBoard;
use crate::challenge::award::AwardTier;
use crate::ranking::{RankedParticipant, TiebreakerEntry};
use crate::retro::source::ChallengeStandings;
// }}}

pub const ENTRIES_PER_PAGE: usize = 5;
pub const LEADERBOARD_COLOR: u32 = 0xcc9a06;
pub const EMPTY_LEADERBOARD: &str = "Nobody has made progress yet. Be the first!";

const MEDALS: [&str; 3] = ["🥇", "🥈", "🥉"];

// {{{ Lines
fn rank_prefix(rank: u32) -> String {
	match rank {
		1..=3 => format!("{} #{rank}", MEDALS[rank as usize - 1]),
		_ => format!("#{rank}"),
	}
}

pub fn format_participant(ranked: &RankedParticipant, total_achievements: u32) -> String {
	let score = &ranked.score;
	let mut line = format!(
		"{} **{}** · {}/{} ({:.2}%)",
		rank_prefix(ranked.display_rank),
		escape_markdown(&score.username),
		score.achieved_count,
		total_achievements,
		score.completion_percentage
	);

	let award = AwardTier::from_points(score.award_points);
	if award != AwardTier::None {
		line.push_str(&format!(
			" {} {}",
			AwardTier::TIER_EMOJIS[award.to_index()],
			AwardTier::TIER_STRINGS[award.to_index()]
		));
	}

	if let Some(tiebreaker) = &ranked.tiebreaker {
		line.push_str(&format!(" · TB {}", tiebreaker.score));

		if let Some(breaker) = &ranked.breaker {
			line.push_str(&format!(" / {}", breaker.score));
		}
	}

	line
}

fn format_board_entry(rank: u32, entry: &TiebreakerEntry) -> String {
	format!(
		"{} **{}** · {}",
		rank_prefix(rank),
		escape_markdown(&entry.username),
		entry.score
	)
}
// }}}
// {{{ Pages
/// Renders every page of a list, numbering them in the footer.
fn render_pages(base: EmbedView, field_name: &str, lines: &[String]) -> Vec<EmbedView> {
	let pages = paginate(lines, ENTRIES_PER_PAGE);
	let page_count = pages.len();

	pages
		.into_iter()
		.enumerate()
		.map(|(i, page)| {
			let value = if page.is_empty() {
				EMPTY_LEADERBOARD.to_owned()
			} else {
				page.join("\n")
			};

			base.clone()
				.field(field_name, &value, false)
				.footer(format!("Page {}/{}", i + 1, page_count))
		})
		.collect()
}

/// Renders the standings of a challenge, one embed per page.
pub fn render_standings(standings: &ChallengeStandings) -> Vec<EmbedView> {
	let challenge = &standings.challenge;

	let mut description = format!(
		"**{}** ({})",
		escape_markdown(&challenge.game_title),
		challenge.console_name
	);

	if let Some(tiebreaker) = &standings.tiebreaker {
		let label = tiebreaker
			.description
			.clone()
			.unwrap_or_else(|| format!("leaderboard #{}", tiebreaker.leaderboard_id));
		description.push_str(&format!("\nTiebreaker: {label}"));
	}

	let mut base = EmbedView::new(format!("{} · {}", challenge.kind, challenge.period.pretty()))
		.description(description)
		.color(LEADERBOARD_COLOR);

	if let Some(icon_path) = &challenge.icon_path {
		base = base.thumbnail(icon_url(icon_path));
	}

	let lines: Vec<String> = standings
		.ranked
		.iter()
		.map(|ranked| format_participant(ranked, challenge.total_achievements))
		.collect();

	render_pages(base, "Rankings", &lines)
}

/// Renders the members' positions on an arcade board, one embed per page.
pub fn render_arcade(board: &ArcadeBoard, ranked: &[(u32, &TiebreakerEntry)]) -> Vec<EmbedView> {
	let mut base = EmbedView::new(format!("Arcade · {}", board.key)).color(LEADERBOARD_COLOR);

	let mut description = format!("**{}**", escape_markdown(&board.game_title));
	if let Some(extra) = &board.description {
		description.push_str(&format!("\n{extra}"));
	}
	base = base.description(description);

	let lines: Vec<String> = ranked
		.iter()
		.map(|(rank, entry)| format_board_entry(*rank, entry))
		.collect();

	render_pages(base, "Members", &lines)
}
// }}}
// {{{ Tests
#[cfg(test)]
mod leaderboard_tests {
	use super::*;
	use crate::challenge::period::Period;
	use crate::challenge::{Challenge, ChallengeKind};
	use crate::ranking::{resolve_ranks, ParticipantScore};

	fn standings(scores: &[ParticipantScore], tiebreaker: &[TiebreakerEntry]) -> ChallengeStandings {
		ChallengeStandings {
			challenge: Challenge {
				id: 1,
				period: Period::new(2026, 10).unwrap(),
				kind: ChallengeKind::Monthly,
				game_id: 1446,
				game_title: "Mega Man X".to_owned(),
				console_name: "SNES".to_owned(),
				icon_path: Some("/Images/084308.png".to_owned()),
				total_achievements: 20,
				progression_achievements: Vec::new(),
				win_achievements: Vec::new(),
				revealed: true,
			},
			tiebreaker: None,
			ranked: resolve_ranks(scores, tiebreaker, &[]),
		}
	}

	#[test]
	fn medals_go_to_the_podium() {
		let ranked = resolve_ranks(&[ParticipantScore::new("alice", 20, 7, 20)], &[], &[]);
		assert_eq!(
			format_participant(&ranked[0], 20),
			"🥇 #1 **alice** · 20/20 (100.00%) ✨ Mastery"
		);
	}

	#[test]
	fn tiebreaker_scores_are_shown() {
		let scores = [
			ParticipantScore::new("a", 10, 1, 20),
			ParticipantScore::new("b", 10, 1, 20),
		];
		let tiebreaker = [
			TiebreakerEntry::new("a", 2, "1:10"),
			TiebreakerEntry::new("b", 1, "0:58"),
		];
		let ranked = resolve_ranks(&scores, &tiebreaker, &[]);

		assert_eq!(
			format_participant(&ranked[0], 20),
			"🥇 #1 **b** · 10/20 (50.00%) 🏁 Participation · TB 0:58"
		);
	}

	#[test]
	fn underscores_do_not_turn_into_italics() {
		let ranked = resolve_ranks(&[ParticipantScore::new("retro_fan_", 1, 0, 20)], &[], &[]);
		let line = format_participant(&ranked[0], 20);
		assert!(line.contains(r"retro\_fan\_"));
	}

	#[test]
	fn pages_hold_five_entries() {
		let scores: Vec<_> = (0..12)
			.map(|i| ParticipantScore::new(&format!("user{i}"), 20 - i, 1, 20))
			.collect();
		let pages = render_standings(&standings(&scores, &[]));

		assert_eq!(pages.len(), 3);
		assert_eq!(pages[0].fields[0].value.lines().count(), 5);
		assert_eq!(pages[2].fields[0].value.lines().count(), 2);
		assert_eq!(pages[2].footer.as_deref(), Some("Page 3/3"));
		assert!(pages[1].fields[0].value.starts_with("#6 **user5**"));
	}

	#[test]
	fn empty_leaderboards_still_render() {
		let pages = render_standings(&standings(&[], &[]));
		assert_eq!(pages.len(), 1);
		assert_eq!(pages[0].fields[0].value, EMPTY_LEADERBOARD);
		assert_eq!(
			pages[0].thumbnail.as_deref(),
			Some("https://media.retroachievements.org/Images/084308.png")
		);
	}

	#[test]
	fn arcade_boards_share_ranks() {
		let board = ArcadeBoard {
			id: 1,
			key: "smb".to_owned(),
			leaderboard_id: 4,
			game_title: "Super Mario Bros.".to_owned(),
			description: Some("Fastest 1-1".to_owned()),
		};
		let entries = [
			TiebreakerEntry::new("a", 3, "0:33"),
			TiebreakerEntry::new("b", 3, "0:33"),
			TiebreakerEntry::new("c", 9, "0:41"),
		];
		let ranked = crate::ranking::rank_by_position(&entries);
		let pages = render_arcade(&board, &ranked);

		assert_eq!(
			pages[0].fields[0].value,
			"🥇 #1 **a** · 0:33\n🥇 #1 **b** · 0:33\n🥉 #3 **c** · 0:41"
		);
	}
}
// }}}
