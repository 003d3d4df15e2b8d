// {{{ Imports
use std::collections::HashSet;

use anyhow::anyhow;
use tracing::info;

use super::discord::MessageContext;
use crate::challenge::arcade::ArcadeBoard;
use crate::context::{Error, ErrorKind, PoiseContext, TagError, TaggedError, UserContext};
use crate::ranking::{rank_by_position, TiebreakerEntry};
use crate::render::leaderboard::{render_arcade, LEADERBOARD_COLOR};
use crate::render::EmbedView;
use crate::retro::source::{GameSource, ScoreSource};
use crate::user::User;
// }}}

// {{{ Toplevel
/// Arcade leaderboards
#[poise::command(
	prefix_command,
	slash_command,
	subcommands("list", "show", "add", "remove"),
	subcommand_required
)]
pub async fn arcade(_ctx: PoiseContext<'_>) -> Result<(), Error> {
	Ok(())
}
// }}}
// {{{ Helpers
fn require_board(ctx: &UserContext, key: &str) -> Result<ArcadeBoard, TaggedError> {
	ArcadeBoard::by_key(ctx, key)?.ok_or_else(|| {
		anyhow!("There is no arcade board called `{key}`. Use `/arcade list` to see them all.")
			.tag(ErrorKind::User)
	})
}

/// Keeps only the entries belonging to registered members.
fn member_entries(ctx: &UserContext, entries: Vec<TiebreakerEntry>) -> Result<Vec<TiebreakerEntry>, Error> {
	let members: HashSet<String> = User::all(ctx)?
		.into_iter()
		.map(|user| user.ra_username.to_lowercase())
		.collect();

	Ok(entries
		.into_iter()
		.filter(|entry| members.contains(&entry.username.to_lowercase()))
		.collect())
}
// }}}
// {{{ List
pub async fn list_impl<C: MessageContext>(ctx: &mut C) -> Result<(), TaggedError> {
	let boards = ArcadeBoard::all(ctx.data())?;

	let value = if boards.is_empty() {
		"No arcade boards yet.".to_owned()
	} else {
		boards
			.iter()
			.map(|board| format!("`{}` · {}", board.key, board.game_title))
			.collect::<Vec<_>>()
			.join("\n")
	};

	let embed = EmbedView::new("Arcade boards")
		.color(LEADERBOARD_COLOR)
		.field("Boards", &value, false);
	ctx.send_embeds(vec![embed]).await?;

	Ok(())
}

/// List every arcade board
#[poise::command(prefix_command, slash_command)]
pub async fn list(mut ctx: PoiseContext<'_>) -> Result<(), Error> {
	let res = list_impl(&mut ctx).await;
	ctx.handle_error(res).await?;
	Ok(())
}
// }}}
// {{{ Show
pub async fn show_impl<C: MessageContext>(
	ctx: &mut C,
	source: &impl ScoreSource,
	key: &str,
	page: Option<usize>,
) -> Result<(), TaggedError> {
	let board = require_board(ctx.data(), key)?;
	let entries = source.fetch_leaderboard(board.leaderboard_id).await;
	let entries = member_entries(ctx.data(), entries)?;
	let ranked = rank_by_position(&entries);

	let mut pages = render_arcade(&board, &ranked);
	let page_count = pages.len();
	let page = page.unwrap_or(1);

	if page == 0 || page > page_count {
		return Err(anyhow!(
			"Page {page} does not exist, this board has {page_count} page(s)."
		)
		.tag(ErrorKind::User));
	}

	let embed = pages.swap_remove(page - 1);
	ctx.send_embeds(vec![embed]).await?;

	Ok(())
}

/// Show where members stand on an arcade board
#[poise::command(prefix_command, slash_command)]
pub async fn show(
	mut ctx: PoiseContext<'_>,
	#[description = "Board to show"] key: String,
	#[description = "Page to show, five members per page"] page: Option<usize>,
) -> Result<(), Error> {
	ctx.defer().await?;
	let source = ctx.data();
	let res = show_impl(&mut ctx, source, &key, page).await;
	ctx.handle_error(res).await?;
	Ok(())
}
// }}}
// {{{ Add
pub async fn add_impl<C: MessageContext>(
	ctx: &mut C,
	games: &impl GameSource,
	key: &str,
	leaderboard_id: u32,
	game_id: u32,
	description: Option<&str>,
) -> Result<(), TaggedError> {
	let user = User::from_context(ctx)?;
	user.assert_is_admin()?;

	let key = key.trim();
	if key.is_empty() || key.contains(char::is_whitespace) {
		return Err(anyhow!("Board keys must be a single word, like `smb-1-1`.").tag(ErrorKind::User));
	}

	if ArcadeBoard::by_key(ctx.data(), key)?.is_some() {
		return Err(anyhow!("An arcade board called `{key}` already exists.").tag(ErrorKind::User));
	}

	let game = games.fetch_game(game_id).await.map_err(|error| {
		anyhow!("Could not find game {game_id} on RetroAchievements: {error}").tag(ErrorKind::User)
	})?;

	let board = ArcadeBoard::add(ctx.data(), key, leaderboard_id, &game.title, description)?;
	info!(key = %board.key, leaderboard_id, admin = %user.ra_username, "Arcade board added");

	ctx.reply(&format!(
		"Added arcade board `{}` ({}).",
		board.key, board.game_title
	))
	.await?;

	Ok(())
}

/// Track a new arcade board
#[poise::command(prefix_command, slash_command)]
pub async fn add(
	mut ctx: PoiseContext<'_>,
	#[description = "Short name of the board"] key: String,
	#[description = "RetroAchievements leaderboard id"] leaderboard_id: u32,
	#[description = "RetroAchievements id of the leaderboard's game"] game_id: u32,
	#[description = "What members have to do"] description: Option<String>,
) -> Result<(), Error> {
	ctx.defer().await?;
	let games = ctx.data();
	let res = add_impl(
		&mut ctx,
		games,
		&key,
		leaderboard_id,
		game_id,
		description.as_deref(),
	)
	.await;
	ctx.handle_error(res).await?;
	Ok(())
}
// }}}
// {{{ Remove
pub async fn remove_impl<C: MessageContext>(ctx: &mut C, key: &str) -> Result<(), TaggedError> {
	let user = User::from_context(ctx)?;
	user.assert_is_admin()?;

	let board = require_board(ctx.data(), key)?;
	ArcadeBoard::remove(ctx.data(), &board.key)?;
	info!(key = %board.key, admin = %user.ra_username, "Arcade board removed");

	ctx.reply(&format!("Removed arcade board `{}`.", board.key))
		.await?;

	Ok(())
}

/// Stop tracking an arcade board
#[poise::command(prefix_command, slash_command)]
pub async fn remove(
	mut ctx: PoiseContext<'_>,
	#[description = "Board to remove"] key: String,
) -> Result<(), Error> {
	let res = remove_impl(&mut ctx, &key).await;
	ctx.handle_error(res).await?;
	Ok(())
}
// }}}
// {{{ Tests
#[cfg(test)]
mod arcade_command_tests {
	use super::*;
	use crate::commands::discord::mock::MockContext;
	use crate::golden_test;
	use crate::retro::source::mock::FixedSource;

	fn source() -> FixedSource {
		let mut source = FixedSource::default().with_game(1, "Super Mario Bros.", 30);
		source.leaderboards.insert(
			4,
			vec![
				TiebreakerEntry::new("speedy", 1, "4:57.00"),
				TiebreakerEntry::new("Tester", 2, "5:01.10"),
				TiebreakerEntry::new("member", 2, "5:01.10"),
				TiebreakerEntry::new("slowpoke", 9, "6:30.00"),
			],
		);
		source
	}

	async fn add_and_list(ctx: &mut MockContext) -> Result<(), TaggedError> {
		add_impl(ctx, &source(), "smb-any", 4, 1, Some("Any% speedrun")).await?;
		list_impl(ctx).await
	}

	async fn show_members_only(ctx: &mut MockContext) -> Result<(), TaggedError> {
		User::register(ctx.data(), 10, "member")?;
		User::register(ctx.data(), 11, "slowpoke")?;
		add_impl(ctx, &source(), "smb-any", 4, 1, None).await?;
		show_impl(ctx, &source(), "SMB-ANY", None).await
	}

	async fn duplicate_key(ctx: &mut MockContext) -> Result<(), TaggedError> {
		add_impl(ctx, &source(), "smb-any", 4, 1, None).await?;
		add_impl(ctx, &source(), "smb-any", 5, 1, None).await
	}

	async fn remove_twice(ctx: &mut MockContext) -> Result<(), TaggedError> {
		add_impl(ctx, &source(), "smb-any", 4, 1, None).await?;
		remove_impl(ctx, "smb-any").await?;
		remove_impl(ctx, "smb-any").await
	}

	golden_test!(add_and_list, "commands/arcade/add_and_list");
	golden_test!(show_members_only, "commands/arcade/show_members_only");
	golden_test!(duplicate_key, "commands/arcade/duplicate_key");
	golden_test!(remove_twice, "commands/arcade/remove_twice");

	#[tokio::test]
	async fn members_share_tied_positions() -> Result<(), Error> {
		let (mut ctx, _guard) = crate::context::testing::get_mock_context()?;
		User::create_admin_for_tests(&ctx).map_err(|e| e.error)?;
		show_members_only(&mut ctx).await.map_err(|e| e.error)?;

		let value = &ctx.messages[1].embeds[0].fields[0].value;
		assert_eq!(
			value,
			"🥇 #1 **Tester** · 5:01.10\n🥇 #1 **member** · 5:01.10\n🥉 #3 **slowpoke** · 6:30.00"
		);

		Ok(())
	}
}
// }}}
