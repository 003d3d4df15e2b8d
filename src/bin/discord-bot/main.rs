use std::{sync::Arc, time::Duration};

use poise::serenity_prelude::{self as serenity};
use selectstart::challenge::period::Period;
use selectstart::commands;
use selectstart::context::paths::get_var;
use selectstart::context::{Error, UserContext};
use selectstart::feed::channel::DiscordChannel;
use selectstart::feed::leaderboard::{refresh_leaderboard, LEADERBOARD_FEED};
use selectstart::feed::spawn_periodic;
use selectstart::logs::init_logging;
use tracing::{error, info};

// {{{ Error handler
async fn on_error(error: poise::FrameworkError<'_, UserContext, Error>) {
	if let poise::FrameworkError::Command { error, ctx, .. } = &error {
		error!(command = %ctx.command().qualified_name, "Command failed: {error:#}");
	}

	if let Err(e) = poise::builtins::on_error(error).await {
		error!("Error while handling error: {e}");
	}
}
// }}}
// {{{ Feeds
fn spawn_feeds(http: Arc<serenity::Http>, data: &UserContext) {
	let Some(channel_id) = data.config.feeds.leaderboard_channel else {
		info!("No leaderboard channel configured, the leaderboard feed is disabled");
		return;
	};

	let data = data.clone();
	spawn_periodic(
		LEADERBOARD_FEED,
		data.config.feeds.refresh_interval(),
		move || {
			let data = data.clone();
			let http = http.clone();
			async move {
				let mut channel = DiscordChannel::new(&http, channel_id);
				refresh_leaderboard(&data, &data, &mut channel, Period::current()).await
			}
		},
	);
}
// }}}

#[tokio::main]
async fn main() -> Result<(), Error> {
	init_logging();

	// {{{ Poise options
	let options = poise::FrameworkOptions {
		commands: commands::all(),
		prefix_options: poise::PrefixFrameworkOptions {
			prefix: Some("!".into()),
			edit_tracker: Some(Arc::new(poise::EditTracker::for_timespan(
				Duration::from_secs(3600),
			))),
			..Default::default()
		},
		on_error: |error| Box::pin(on_error(error)),
		..Default::default()
	};
	// }}}
	// {{{ Start poise
	let framework = poise::Framework::builder()
		.setup(move |ctx, ready, framework| {
			Box::pin(async move {
				info!(user = %ready.user.name, "Logged in");
				poise::builtins::register_globally(ctx, &framework.options().commands).await?;
				let data = UserContext::new()?;
				spawn_feeds(ctx.http.clone(), &data);

				Ok(data)
			})
		})
		.options(options)
		.build();

	let token = get_var("SELECTSTART_DISCORD_TOKEN")?;
	let intents =
		serenity::GatewayIntents::non_privileged() | serenity::GatewayIntents::MESSAGE_CONTENT;

	let mut client = serenity::ClientBuilder::new(token, intents)
		.framework(framework)
		.await?;

	client.start().await?;
	Ok(())
	// }}}
}
