// {{{ Imports
use selectstart::commands::discord::MessageContext;
use selectstart::context::paths::get_var;
use selectstart::context::{Error, UserContext};
use selectstart::render::EmbedView;
// }}}

/// Similar in scope to the mock context used by tests,
/// except replies and embeds are printed to the standard output.
pub struct CliContext {
	pub user_id: u64,
	pub data: UserContext,
}

impl CliContext {
	/// Commands run on behalf of `SELECTSTART_DISCORD_USER_ID`, if set.
	pub fn new(data: UserContext) -> Result<Self, Error> {
		let user_id = match get_var("SELECTSTART_DISCORD_USER_ID") {
			Ok(id) => id.parse()?,
			Err(_) => 0,
		};

		Ok(Self { data, user_id })
	}
}

fn print_embed(embed: &EmbedView) {
	println!("\n========== {} ==========", embed.title);

	if let Some(description) = &embed.description {
		println!("{description}");
	}

	for field in &embed.fields {
		println!("\n--- {} ---\n{}", field.name, field.value);
	}

	if let Some(footer) = &embed.footer {
		println!("\n({footer})");
	}
}

impl MessageContext for CliContext {
	fn author_id(&self) -> u64 {
		self.user_id
	}

	fn data(&self) -> &UserContext {
		&self.data
	}

	async fn reply(&mut self, text: &str) -> Result<(), Error> {
		println!("[Reply] {text}");
		Ok(())
	}

	async fn send_embeds(&mut self, embeds: Vec<EmbedView>) -> Result<(), Error> {
		for embed in &embeds {
			print_embed(embed);
		}

		Ok(())
	}
}
