use poise::CreateReply;

use crate::context::{Error, ErrorKind, TaggedError, UserContext};
use crate::render::EmbedView;

// {{{ Trait
pub trait MessageContext {
	/// Get the user context held by the message
	fn data(&self) -> &UserContext;
	fn author_id(&self) -> u64;

	/// Reply to the current message
	async fn reply(&mut self, text: &str) -> Result<(), Error>;

	/// Deliver a message made out of the given embeds.
	async fn send_embeds(&mut self, embeds: Vec<EmbedView>) -> Result<(), Error>;

	/// Replies with user errors, and passes internal errors along.
	async fn handle_error<V>(&mut self, res: Result<V, TaggedError>) -> Result<Option<V>, Error> {
		match res {
			Ok(value) => Ok(Some(value)),
			Err(TaggedError {
				kind: ErrorKind::User,
				error,
			}) => {
				self.reply(&format!("{error}")).await?;
				Ok(None)
			}
			Err(TaggedError { error, .. }) => Err(error),
		}
	}
}
// }}}
// {{{ Poise implementation
impl<'a> MessageContext for poise::Context<'a, UserContext, Error> {
	fn data(&self) -> &UserContext {
		Self::data(*self)
	}

	fn author_id(&self) -> u64 {
		self.author().id.get()
	}

	async fn reply(&mut self, text: &str) -> Result<(), Error> {
		Self::reply(*self, text).await?;
		Ok(())
	}

	async fn send_embeds(&mut self, embeds: Vec<EmbedView>) -> Result<(), Error> {
		let mut reply = CreateReply::default().reply(true);
		for embed in &embeds {
			reply = reply.embed(embed.to_create_embed());
		}

		Self::send(*self, reply).await?;
		Ok(())
	}
}
// }}}
