// {{{ Imports
use anyhow::anyhow;
use tracing::info;

use super::discord::MessageContext;
use super::parse_period;
use crate::challenge::tiebreaker::Tiebreaker;
use crate::challenge::{parse_id_list, Challenge, ChallengeKind, CreateChallenge};
use crate::context::{Error, ErrorKind, PoiseContext, TagError, TaggedError};
use crate::render::challenge::render_challenge;
use crate::retro::source::GameSource;
use crate::user::User;
// }}}

// {{{ Toplevel
/// Monthly challenge management
#[poise::command(
	prefix_command,
	slash_command,
	subcommands("show", "set", "shadow", "reveal"),
	subcommand_required
)]
pub async fn challenge(_ctx: PoiseContext<'_>) -> Result<(), Error> {
	Ok(())
}
// }}}
// {{{ Show
pub async fn show_impl<C: MessageContext>(
	ctx: &mut C,
	month: Option<&str>,
) -> Result<(), TaggedError> {
	let period = parse_period(month)?;
	let monthly = Challenge::by_period(ctx.data(), period, ChallengeKind::Monthly)?;
	let shadow = Challenge::by_period(ctx.data(), period, ChallengeKind::Shadow)?;

	if monthly.is_none() && shadow.is_none() {
		return Err(
			anyhow!("No challenge has been set for {} yet.", period.pretty()).tag(ErrorKind::User),
		);
	}

	let tiebreaker = Tiebreaker::by_period(ctx.data(), period)?;
	let embeds = monthly
		.iter()
		.map(|challenge| render_challenge(challenge, tiebreaker.as_ref()))
		.chain(shadow.iter().map(|challenge| render_challenge(challenge, None)))
		.collect();

	ctx.send_embeds(embeds).await?;
	Ok(())
}

/// Show the challenges of a month
#[poise::command(prefix_command, slash_command)]
pub async fn show(
	mut ctx: PoiseContext<'_>,
	#[description = "Month to show (YYYY-MM), defaults to the current one"] month: Option<String>,
) -> Result<(), Error> {
	let res = show_impl(&mut ctx, month.as_deref()).await;
	ctx.handle_error(res).await?;
	Ok(())
}
// }}}
// {{{ Set
/// Shared by the monthly and shadow variants.
pub async fn set_impl<C: MessageContext>(
	ctx: &mut C,
	games: &impl GameSource,
	kind: ChallengeKind,
	month: &str,
	game_id: u32,
	progression: Option<&str>,
	win: Option<&str>,
) -> Result<(), TaggedError> {
	let user = User::from_context(ctx)?;
	user.assert_is_admin()?;

	let period = parse_period(Some(month))?;
	let progression_achievements = parse_id_list(progression.unwrap_or_default())?;
	let win_achievements = parse_id_list(win.unwrap_or_default())?;

	let game = games.fetch_game(game_id).await.map_err(|error| {
		anyhow!("Could not find game {game_id} on RetroAchievements: {error}").tag(ErrorKind::User)
	})?;

	let challenge = CreateChallenge {
		period,
		kind,
		game_id,
		game_title: game.title,
		console_name: game.console_name,
		icon_path: game.icon_path,
		total_achievements: game.total_achievements,
		progression_achievements,
		win_achievements,
	}
	.save(ctx.data())?;

	info!(%period, ?kind, game_id, admin = %user.ra_username, "Challenge set");

	let tiebreaker = match kind {
		ChallengeKind::Monthly => Tiebreaker::by_period(ctx.data(), period)?,
		ChallengeKind::Shadow => None,
	};

	// Admins get to see hidden shadow games
	let embed = render_challenge(
		&Challenge {
			revealed: true,
			..challenge
		},
		tiebreaker.as_ref(),
	);

	ctx.reply(&format!("The {kind} for {} has been set!", period.pretty()))
		.await?;
	ctx.send_embeds(vec![embed]).await?;

	Ok(())
}

/// Set the monthly challenge game of a month
#[poise::command(prefix_command, slash_command)]
pub async fn set(
	mut ctx: PoiseContext<'_>,
	#[description = "Month (YYYY-MM)"] month: String,
	#[description = "RetroAchievements game id"] game_id: u32,
	#[description = "Progression achievement ids, separated by commas"] progression: Option<String>,
	#[description = "Win condition achievement ids, separated by commas"] win: Option<String>,
) -> Result<(), Error> {
	ctx.defer().await?;
	let games = ctx.data();
	let res = set_impl(
		&mut ctx,
		games,
		ChallengeKind::Monthly,
		&month,
		game_id,
		progression.as_deref(),
		win.as_deref(),
	)
	.await;
	ctx.handle_error(res).await?;
	Ok(())
}

/// Set the (hidden) shadow game of a month
#[poise::command(prefix_command, slash_command)]
pub async fn shadow(
	mut ctx: PoiseContext<'_>,
	#[description = "Month (YYYY-MM)"] month: String,
	#[description = "RetroAchievements game id"] game_id: u32,
	#[description = "Progression achievement ids, separated by commas"] progression: Option<String>,
	#[description = "Win condition achievement ids, separated by commas"] win: Option<String>,
) -> Result<(), Error> {
	ctx.defer_ephemeral().await?;
	let games = ctx.data();
	let res = set_impl(
		&mut ctx,
		games,
		ChallengeKind::Shadow,
		&month,
		game_id,
		progression.as_deref(),
		win.as_deref(),
	)
	.await;
	ctx.handle_error(res).await?;
	Ok(())
}
// }}}
// {{{ Reveal
pub async fn reveal_impl<C: MessageContext>(ctx: &mut C, month: &str) -> Result<(), TaggedError> {
	let user = User::from_context(ctx)?;
	user.assert_is_admin()?;

	let period = parse_period(Some(month))?;
	let shadow = Challenge::require(ctx.data(), period, ChallengeKind::Shadow)?;

	if shadow.revealed {
		ctx.reply(&format!(
			"The shadow game for {} was already revealed.",
			period.pretty()
		))
		.await?;
		return Ok(());
	}

	Challenge::reveal(ctx.data(), period)?;
	info!(%period, admin = %user.ra_username, "Shadow game revealed");

	let embed = render_challenge(
		&Challenge {
			revealed: true,
			..shadow
		},
		None,
	);
	ctx.send_embeds(vec![embed]).await?;

	Ok(())
}

/// Reveal the shadow game of a month
#[poise::command(prefix_command, slash_command)]
pub async fn reveal(
	mut ctx: PoiseContext<'_>,
	#[description = "Month (YYYY-MM)"] month: String,
) -> Result<(), Error> {
	let res = reveal_impl(&mut ctx, &month).await;
	ctx.handle_error(res).await?;
	Ok(())
}
// }}}
// {{{ Tests
#[cfg(test)]
mod challenge_command_tests {
	use super::*;
	use crate::challenge::period::Period;
	use crate::commands::discord::mock::MockContext;
	use crate::golden_test;
	use crate::retro::source::mock::FixedSource;

	fn games() -> FixedSource {
		FixedSource::default()
			.with_game(1446, "Mega Man X", 20)
			.with_game(228, "Chrono Trigger", 77)
	}

	async fn set_monthly(ctx: &mut MockContext) -> Result<(), TaggedError> {
		set_impl(
			ctx,
			&games(),
			ChallengeKind::Monthly,
			"2026-10",
			1446,
			Some("1, 2, 3"),
			Some("4"),
		)
		.await
	}

	async fn set_then_show(ctx: &mut MockContext) -> Result<(), TaggedError> {
		set_monthly(ctx).await?;
		set_impl(ctx, &games(), ChallengeKind::Shadow, "2026-10", 228, None, None).await?;
		show_impl(ctx, Some("2026-10")).await
	}

	async fn reveal_shadow(ctx: &mut MockContext) -> Result<(), TaggedError> {
		set_impl(ctx, &games(), ChallengeKind::Shadow, "2026-10", 228, None, None).await?;
		reveal_impl(ctx, "2026-10").await?;
		reveal_impl(ctx, "2026-10").await?;
		show_impl(ctx, Some("2026-10")).await
	}

	async fn unknown_game(ctx: &mut MockContext) -> Result<(), TaggedError> {
		set_impl(ctx, &games(), ChallengeKind::Monthly, "2026-10", 9999, None, None).await
	}

	async fn bad_achievement_list(ctx: &mut MockContext) -> Result<(), TaggedError> {
		set_impl(
			ctx,
			&games(),
			ChallengeKind::Monthly,
			"2026-10",
			1446,
			Some("1,x"),
			None,
		)
		.await
	}

	async fn nothing_to_show(ctx: &mut MockContext) -> Result<(), TaggedError> {
		show_impl(ctx, Some("2026-10")).await
	}

	golden_test!(set_monthly, "commands/challenge/set_monthly");
	golden_test!(set_then_show, "commands/challenge/set_then_show");
	golden_test!(reveal_shadow, "commands/challenge/reveal_shadow");
	golden_test!(unknown_game, "commands/challenge/unknown_game");
	golden_test!(bad_achievement_list, "commands/challenge/bad_achievement_list");
	golden_test!(nothing_to_show, "commands/challenge/nothing_to_show");

	#[tokio::test]
	async fn members_cannot_set_challenges() -> Result<(), Error> {
		let (mut ctx, _guard) = crate::context::testing::get_mock_context()?;
		User::register(ctx.data(), ctx.user_id, "member").map_err(|e| e.error)?;

		let err = set_monthly(&mut ctx).await.unwrap_err();
		assert_eq!(err.kind, ErrorKind::User);
		assert!(Challenge::by_period(ctx.data(), Period::new(2026, 10)?, ChallengeKind::Monthly)?
			.is_none());

		Ok(())
	}

	#[tokio::test]
	async fn setting_a_challenge_stores_the_game() -> Result<(), Error> {
		let (mut ctx, _guard) = crate::context::testing::get_mock_context()?;
		User::create_admin_for_tests(&ctx).map_err(|e| e.error)?;
		set_monthly(&mut ctx).await.map_err(|e| e.error)?;

		let challenge =
			Challenge::require(ctx.data(), Period::new(2026, 10)?, ChallengeKind::Monthly)
				.map_err(|e| e.error)?;
		assert_eq!(challenge.game_title, "Mega Man X");
		assert_eq!(challenge.total_achievements, 20);
		assert_eq!(challenge.progression_achievements, vec![1, 2, 3]);
		assert_eq!(challenge.win_achievements, vec![4]);

		Ok(())
	}
}
// }}}
