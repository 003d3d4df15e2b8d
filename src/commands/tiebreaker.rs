// {{{ Imports
use anyhow::anyhow;
use tracing::info;

use super::discord::MessageContext;
use super::parse_period;
use crate::challenge::tiebreaker::Tiebreaker;
use crate::context::{Error, ErrorKind, PoiseContext, TagError, TaggedError};
use crate::render::challenge::describe_tiebreaker;
use crate::render::EmbedView;
use crate::user::User;
// }}}

// {{{ Toplevel
/// Tiebreaker management
#[poise::command(
	prefix_command,
	slash_command,
	subcommands("show", "set", "clear"),
	subcommand_required
)]
pub async fn tiebreaker(_ctx: PoiseContext<'_>) -> Result<(), Error> {
	Ok(())
}
// }}}
// {{{ Show
pub async fn show_impl<C: MessageContext>(
	ctx: &mut C,
	month: Option<&str>,
) -> Result<(), TaggedError> {
	let period = parse_period(month)?;
	let tiebreaker = Tiebreaker::by_period(ctx.data(), period)?.ok_or_else(|| {
		anyhow!("No tiebreaker has been set for {}.", period.pretty()).tag(ErrorKind::User)
	})?;

	let embed = EmbedView::new(format!("Tiebreaker · {}", period.pretty()))
		.description(describe_tiebreaker(&tiebreaker));
	ctx.send_embeds(vec![embed]).await?;

	Ok(())
}

/// Show the tiebreaker of a month
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
pub async fn set_impl<C: MessageContext>(
	ctx: &mut C,
	month: &str,
	leaderboard_id: u32,
	breaker_leaderboard_id: Option<u32>,
	description: Option<&str>,
) -> Result<(), TaggedError> {
	let user = User::from_context(ctx)?;
	user.assert_is_admin()?;

	if breaker_leaderboard_id == Some(leaderboard_id) {
		return Err(
			anyhow!("The tiebreaker-breaker must be a different leaderboard than the tiebreaker.")
				.tag(ErrorKind::User),
		);
	}

	let period = parse_period(Some(month))?;
	let tiebreaker = Tiebreaker::set(
		ctx.data(),
		period,
		leaderboard_id,
		breaker_leaderboard_id,
		description,
	)?;

	// Standings should pick the new leaderboards up on the next refresh
	ctx.data().retro.forget_leaderboard(leaderboard_id);
	if let Some(id) = breaker_leaderboard_id {
		ctx.data().retro.forget_leaderboard(id);
	}

	info!(%period, leaderboard_id, ?breaker_leaderboard_id, admin = %user.ra_username, "Tiebreaker set");
	ctx.reply(&format!(
		"Tiebreaker for {} set!\n{}",
		period.pretty(),
		describe_tiebreaker(&tiebreaker)
	))
	.await?;

	Ok(())
}

/// Set the tiebreaker leaderboards of a month
#[poise::command(prefix_command, slash_command)]
pub async fn set(
	mut ctx: PoiseContext<'_>,
	#[description = "Month (YYYY-MM)"] month: String,
	#[description = "RetroAchievements leaderboard id"] leaderboard_id: u32,
	#[description = "Leaderboard deciding ties on the tiebreaker"] breaker_leaderboard_id: Option<u32>,
	#[description = "What members have to do"] description: Option<String>,
) -> Result<(), Error> {
	let res = set_impl(
		&mut ctx,
		&month,
		leaderboard_id,
		breaker_leaderboard_id,
		description.as_deref(),
	)
	.await;
	ctx.handle_error(res).await?;
	Ok(())
}
// }}}
// {{{ Clear
pub async fn clear_impl<C: MessageContext>(ctx: &mut C, month: &str) -> Result<(), TaggedError> {
	let user = User::from_context(ctx)?;
	user.assert_is_admin()?;

	let period = parse_period(Some(month))?;
	if Tiebreaker::clear(ctx.data(), period)? {
		info!(%period, admin = %user.ra_username, "Tiebreaker cleared");
		ctx.reply(&format!("Tiebreaker for {} cleared.", period.pretty()))
			.await?;
	} else {
		ctx.reply(&format!("There was no tiebreaker for {}.", period.pretty()))
			.await?;
	}

	Ok(())
}

/// Remove the tiebreaker of a month
#[poise::command(prefix_command, slash_command)]
pub async fn clear(
	mut ctx: PoiseContext<'_>,
	#[description = "Month (YYYY-MM)"] month: String,
) -> Result<(), Error> {
	let res = clear_impl(&mut ctx, &month).await;
	ctx.handle_error(res).await?;
	Ok(())
}
// }}}
// {{{ Tests
#[cfg(test)]
mod tiebreaker_command_tests {
	use super::*;
	use crate::commands::discord::mock::MockContext;
	use crate::golden_test;

	async fn set_and_show(ctx: &mut MockContext) -> Result<(), TaggedError> {
		set_impl(ctx, "2026-10", 77, Some(78), Some("Beat Sigma")).await?;
		show_impl(ctx, Some("2026-10")).await
	}

	async fn set_clear_and_show(ctx: &mut MockContext) -> Result<(), TaggedError> {
		set_impl(ctx, "2026-10", 77, None, None).await?;
		clear_impl(ctx, "2026-10").await?;
		clear_impl(ctx, "2026-10").await?;
		show_impl(ctx, Some("2026-10")).await
	}

	async fn breaker_equals_tiebreaker(ctx: &mut MockContext) -> Result<(), TaggedError> {
		set_impl(ctx, "2026-10", 77, Some(77), None).await
	}

	golden_test!(set_and_show, "commands/tiebreaker/set_and_show");
	golden_test!(set_clear_and_show, "commands/tiebreaker/set_clear_and_show");
	golden_test!(breaker_equals_tiebreaker, "commands/tiebreaker/breaker_equals_tiebreaker");
}
// }}}
