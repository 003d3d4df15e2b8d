//! Remembers which messages a feed owns, so restarts edit them in place.

use crate::context::{Error, UserContext};

/// Message ids owned by a feed in a channel, ordered by position.
pub fn load_feed_messages(ctx: &UserContext, feed: &str, channel_id: u64) -> Result<Vec<u64>, Error> {
	let ids = ctx
		.db
		.get()?
		.prepare_cached(
			"SELECT message_id FROM feed_messages WHERE feed=? AND channel_id=? ORDER BY position",
		)?
		.query_map((feed, channel_id.to_string()), |row| row.get::<_, String>(0))?
		.map(|id| Ok(id?.parse::<u64>()?))
		.collect::<Result<_, Error>>()?;

	Ok(ids)
}

/// Replaces the stored messages of a feed in a channel.
pub fn store_feed_messages(
	ctx: &UserContext,
	feed: &str,
	channel_id: u64,
	message_ids: &[u64],
) -> Result<(), Error> {
	let mut conn = ctx.db.get()?;
	let tx = conn.transaction()?;

	tx.execute(
		"DELETE FROM feed_messages WHERE feed=? AND channel_id=?",
		(feed, channel_id.to_string()),
	)?;

	for (position, message_id) in message_ids.iter().enumerate() {
		tx.execute(
			"INSERT INTO feed_messages(feed, channel_id, position, message_id) VALUES (?,?,?,?)",
			(
				feed,
				channel_id.to_string(),
				position as u32,
				message_id.to_string(),
			),
		)?;
	}

	tx.commit()?;
	Ok(())
}

#[cfg(test)]
mod feed_message_tests {
	use super::*;
	use crate::context::testing::get_test_context;

	#[test]
	fn stored_messages_replace_old_ones() -> Result<(), Error> {
		let (ctx, _guard) = get_test_context()?;
		assert!(load_feed_messages(&ctx, "leaderboard", 1)?.is_empty());

		store_feed_messages(&ctx, "leaderboard", 1, &[30, 10, 20])?;
		store_feed_messages(&ctx, "leaderboard", 2, &[99])?;
		assert_eq!(load_feed_messages(&ctx, "leaderboard", 1)?, vec![30, 10, 20]);

		store_feed_messages(&ctx, "leaderboard", 1, &[30])?;
		assert_eq!(load_feed_messages(&ctx, "leaderboard", 1)?, vec![30]);
		assert_eq!(load_feed_messages(&ctx, "leaderboard", 2)?, vec![99]);

		Ok(())
	}
}
