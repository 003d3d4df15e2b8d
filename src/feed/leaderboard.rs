// {{{ Imports
use tracing::{info, warn};

use super::channel::FeedChannel;
use super::messages::{load_feed_messages, store_feed_messages};
use crate::challenge::period::Period;
use crate::challenge::{Challenge, ChallengeKind};
use crate::context::{Error, UserContext};
use crate::render::leaderboard::render_standings;
use crate::render::EmbedView;
use crate::retro::source::{resolve_standings, ScoreSource};
use crate::timed;
// }}}

pub const LEADERBOARD_FEED: &str = "leaderboard";

// {{{ Publishing
/// Makes the channel show exactly `embeds`, reusing the feed's previous
/// messages where possible.
pub async fn publish(
	ctx: &UserContext,
	feed: &str,
	channel: &mut impl FeedChannel,
	embeds: &[EmbedView],
) -> Result<(), Error> {
	let previous = load_feed_messages(ctx, feed, channel.id())?;
	let mut current = Vec::with_capacity(embeds.len());

	for (position, embed) in embeds.iter().enumerate() {
		if let Some(&message_id) = previous.get(position) {
			match channel.edit(message_id, embed).await {
				Ok(()) => {
					current.push(message_id);
					continue;
				}
				Err(err) => {
					warn!(feed, message_id, "Could not edit feed message, posting a new one: {err:#}");
				}
			}
		}

		current.push(channel.post(embed).await?);
	}

	for &message_id in previous.iter().skip(embeds.len()) {
		if let Err(err) = channel.delete(message_id).await {
			warn!(feed, message_id, "Could not delete surplus feed message: {err:#}");
		}
	}

	store_feed_messages(ctx, feed, channel.id(), &current)?;
	Ok(())
}
// }}}
// {{{ Refresh
/// Resolves the standings of `period` and publishes them to the channel.
///
/// Does nothing when no monthly challenge has been set.
pub async fn refresh_leaderboard(
	ctx: &UserContext,
	source: &impl ScoreSource,
	channel: &mut impl FeedChannel,
	period: Period,
) -> Result<(), Error> {
	let Some(challenge) = Challenge::by_period(ctx, period, ChallengeKind::Monthly)? else {
		info!(%period, "No monthly challenge, skipping leaderboard refresh");
		return Ok(());
	};

	let embeds = timed!("refresh_leaderboard", {
		let standings = resolve_standings(ctx, source, challenge).await?;
		render_standings(&standings)
	});

	publish(ctx, LEADERBOARD_FEED, channel, &embeds).await?;
	info!(%period, pages = embeds.len(), "Leaderboard refreshed");

	Ok(())
}
// }}}
