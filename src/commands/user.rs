// {{{ Imports
use anyhow::anyhow;
use tracing::info;

use super::discord::MessageContext;
use crate::context::{Error, ErrorKind, PoiseContext, TagError, TaggedError};
use crate::render::escape_markdown;
use crate::user::User;
// }}}

// {{{ Toplevel
/// Member management
#[poise::command(
	prefix_command,
	slash_command,
	subcommands("register", "link", "unregister", "whois"),
	subcommand_required
)]
pub async fn user(_ctx: PoiseContext<'_>) -> Result<(), Error> {
	Ok(())
}
// }}}
// {{{ Register
async fn register_impl<C: MessageContext>(
	ctx: &mut C,
	ra_username: &str,
) -> Result<(), TaggedError> {
	let user = User::register(ctx.data(), ctx.author_id(), ra_username)?;
	info!(discord_id = %user.discord_id, ra_username = %user.ra_username, "User registered");

	ctx.reply(&format!(
		"You are now registered as **{}**. Good luck with the challenges!",
		escape_markdown(&user.ra_username)
	))
	.await?;

	Ok(())
}

/// Link your RetroAchievements account
#[poise::command(prefix_command, slash_command)]
pub async fn register(
	mut ctx: PoiseContext<'_>,
	#[description = "Your RetroAchievements username"] ra_username: String,
) -> Result<(), Error> {
	let res = register_impl(&mut ctx, &ra_username).await;
	ctx.handle_error(res).await?;
	Ok(())
}
// }}}
// {{{ Link
async fn link_impl<C: MessageContext>(
	ctx: &mut C,
	target_id: u64,
	ra_username: &str,
) -> Result<(), TaggedError> {
	let user = User::from_context(ctx)?;
	user.assert_is_admin()?;

	let linked = User::register(ctx.data(), target_id, ra_username)?;
	info!(discord_id = target_id, ra_username = %linked.ra_username, admin = %user.ra_username, "User linked");

	ctx.reply(&format!(
		"Linked <@{target_id}> to **{}**.",
		escape_markdown(&linked.ra_username)
	))
	.await?;

	Ok(())
}

/// Link a RetroAchievements account to another member
#[poise::command(prefix_command, slash_command, guild_only)]
pub async fn link(
	mut ctx: PoiseContext<'_>,
	#[description = "The member to link"] member: poise::serenity_prelude::User,
	#[description = "Their RetroAchievements username"] ra_username: String,
) -> Result<(), Error> {
	let res = link_impl(&mut ctx, member.id.get(), &ra_username).await;
	ctx.handle_error(res).await?;
	Ok(())
}
// }}}
// {{{ Unregister
async fn unregister_impl<C: MessageContext>(ctx: &mut C) -> Result<(), TaggedError> {
	let user = User::from_context(ctx)?;
	user.unregister(ctx.data())?;
	info!(ra_username = %user.ra_username, "User unregistered");

	ctx.reply("Your account has been unlinked, along with all of your challenge progress.")
		.await?;

	Ok(())
}

/// Unlink your RetroAchievements account
#[poise::command(prefix_command, slash_command)]
pub async fn unregister(mut ctx: PoiseContext<'_>) -> Result<(), Error> {
	let res = unregister_impl(&mut ctx).await;
	ctx.handle_error(res).await?;
	Ok(())
}
// }}}
// {{{ Whois
async fn whois_impl<C: MessageContext>(ctx: &mut C, target_id: u64) -> Result<(), TaggedError> {
	let user = User::by_discord_id(ctx.data(), target_id).map_err(|error| match error.kind {
		ErrorKind::User => anyhow!("<@{target_id}> has not linked a RetroAchievements account.")
			.tag(ErrorKind::User),
		ErrorKind::Internal => error,
	})?;

	ctx.reply(&format!(
		"<@{target_id}> is **{}** on RetroAchievements: https://retroachievements.org/user/{}",
		escape_markdown(&user.ra_username),
		user.ra_username
	))
	.await?;

	Ok(())
}

/// Look up the RetroAchievements account of a member
#[poise::command(prefix_command, slash_command)]
pub async fn whois(
	mut ctx: PoiseContext<'_>,
	#[description = "The member to look up"] member: poise::serenity_prelude::User,
) -> Result<(), Error> {
	let res = whois_impl(&mut ctx, member.id.get()).await;
	ctx.handle_error(res).await?;
	Ok(())
}

/// Right-click version of `user whois`. Poise only registers context menu
/// entries for top-level commands.
#[poise::command(context_menu_command = "RetroAchievements account")]
pub async fn whois_menu(
	mut ctx: PoiseContext<'_>,
	member: poise::serenity_prelude::User,
) -> Result<(), Error> {
	let res = whois_impl(&mut ctx, member.id.get()).await;
	ctx.handle_error(res).await?;
	Ok(())
}
// }}}
