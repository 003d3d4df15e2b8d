use poise::serenity_prelude::{ChannelId, CreateMessage, EditMessage, Http, MessageId};

use crate::context::Error;
use crate::render::EmbedView;

// {{{ Trait
/// The few channel operations a feed needs.
pub trait FeedChannel {
	fn id(&self) -> u64;

	/// Posts a new message, returning its id.
	async fn post(&mut self, embed: &EmbedView) -> Result<u64, Error>;
	async fn edit(&mut self, message_id: u64, embed: &EmbedView) -> Result<(), Error>;
	async fn delete(&mut self, message_id: u64) -> Result<(), Error>;
}
// }}}
// {{{ Discord implementation
pub struct DiscordChannel<'a> {
	pub http: &'a Http,
	pub channel_id: ChannelId,
}

impl<'a> DiscordChannel<'a> {
	pub fn new(http: &'a Http, channel_id: u64) -> Self {
		Self {
			http,
			channel_id: ChannelId::new(channel_id),
		}
	}
}

impl<'a> FeedChannel for DiscordChannel<'a> {
	fn id(&self) -> u64 {
		self.channel_id.get()
	}

	async fn post(&mut self, embed: &EmbedView) -> Result<u64, Error> {
		let message = self
			.channel_id
			.send_message(self.http, CreateMessage::new().embed(embed.to_create_embed()))
			.await?;
		Ok(message.id.get())
	}

	async fn edit(&mut self, message_id: u64, embed: &EmbedView) -> Result<(), Error> {
		self.channel_id
			.edit_message(
				self.http,
				MessageId::new(message_id),
				EditMessage::new().embed(embed.to_create_embed()),
			)
			.await?;
		Ok(())
	}

	async fn delete(&mut self, message_id: u64) -> Result<(), Error> {
		self.channel_id
			.delete_message(self.http, MessageId::new(message_id))
			.await?;
		Ok(())
	}
}
// }}}
