// {{{ Imports
use anyhow::anyhow;

use super::discord::MessageContext;
use super::parse_period;
use crate::challenge::{Challenge, ChallengeKind};
use crate::context::{Error, ErrorKind, PoiseContext, TagError, TaggedError};
use crate::render::leaderboard::render_standings;
use crate::retro::source::{resolve_standings, ScoreSource};
// }}}

// {{{ Implementation
pub async fn leaderboard_impl<C: MessageContext>(
	ctx: &mut C,
	source: &impl ScoreSource,
	month: Option<&str>,
	shadow: bool,
	page: Option<usize>,
) -> Result<(), TaggedError> {
	let period = parse_period(month)?;
	let kind = if shadow {
		ChallengeKind::Shadow
	} else {
		ChallengeKind::Monthly
	};

	let challenge = Challenge::require(ctx.data(), period, kind)?;
	if !challenge.is_visible() {
		return Err(anyhow!(
			"The shadow game for {} has not been revealed yet.",
			period.pretty()
		)
		.tag(ErrorKind::User));
	}

	let standings = resolve_standings(ctx.data(), source, challenge).await?;
	let mut pages = render_standings(&standings);
	let page_count = pages.len();
	let page = page.unwrap_or(1);

	if page == 0 || page > page_count {
		return Err(anyhow!(
			"Page {page} does not exist, this leaderboard has {page_count} page(s)."
		)
		.tag(ErrorKind::User));
	}

	let embed = pages.swap_remove(page - 1);
	ctx.send_embeds(vec![embed]).await?;

	Ok(())
}
// }}}
// {{{ Discord wrapper
/// Show the leaderboard of a monthly challenge
#[poise::command(prefix_command, slash_command)]
pub async fn leaderboard(
	mut ctx: PoiseContext<'_>,
	#[description = "Month to show (YYYY-MM), defaults to the current one"] month: Option<String>,
	#[description = "Show the shadow game instead"] shadow: Option<bool>,
	#[description = "Page to show, five members per page"] page: Option<usize>,
) -> Result<(), Error> {
	ctx.defer().await?;
	let source = ctx.data();
	let res = leaderboard_impl(
		&mut ctx,
		source,
		month.as_deref(),
		shadow.unwrap_or(false),
		page,
	)
	.await;
	ctx.handle_error(res).await?;
	Ok(())
}
// }}}
