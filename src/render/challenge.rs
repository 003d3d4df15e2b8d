use super::{icon_url, EmbedView};
use crate::challenge::tiebreaker::Tiebreaker;
use crate::challenge::Challenge;

pub const CHALLENGE_COLOR: u32 = 0x3498db;
pub const GAME_URL: &str = "https://retroachievements.org/game";
pub const LEADERBOARD_URL: &str = "https://retroachievements.org/leaderboardinfo.php?i=";

fn format_id_list(ids: &[u32]) -> String {
	if ids.is_empty() {
		return "from achievement types".to_owned();
	}

	ids.iter()
		.map(|id| format!("`{id}`"))
		.collect::<Vec<_>>()
		.join(", ")
}

/// Describes a challenge. Hidden shadow games give nothing away.
pub fn render_challenge(challenge: &Challenge, tiebreaker: Option<&Tiebreaker>) -> EmbedView {
	let title = format!("{} · {}", challenge.kind, challenge.period.pretty());

	if !challenge.is_visible() {
		return EmbedView::new(title)
			.description("This shadow game has not been revealed yet.")
			.color(CHALLENGE_COLOR);
	}

	let mut embed = EmbedView::new(title)
		.description(format!(
			"**{}** ({})\n{GAME_URL}/{}",
			challenge.game_title, challenge.console_name, challenge.game_id
		))
		.color(CHALLENGE_COLOR)
		.field(
			"Achievements",
			&challenge.total_achievements.to_string(),
			true,
		)
		.field(
			"Progression",
			&format_id_list(&challenge.progression_achievements),
			true,
		)
		.field(
			"Win condition",
			&format_id_list(&challenge.win_achievements),
			true,
		);

	if let Some(tiebreaker) = tiebreaker {
		embed = embed.field("Tiebreaker", &describe_tiebreaker(tiebreaker), false);
	}

	if let Some(icon_path) = &challenge.icon_path {
		embed = embed.thumbnail(icon_url(icon_path));
	}

	embed
}

pub fn describe_tiebreaker(tiebreaker: &Tiebreaker) -> String {
	let mut text = match &tiebreaker.description {
		Some(description) => format!("{description}\n"),
		None => String::new(),
	};

	text.push_str(&format!("{LEADERBOARD_URL}{}", tiebreaker.leaderboard_id));

	if let Some(breaker) = tiebreaker.breaker_leaderboard_id {
		text.push_str(&format!("\nTiebreaker-breaker: {LEADERBOARD_URL}{breaker}"));
	}

	text
}
