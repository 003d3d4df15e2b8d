// {{{ Imports
use crate::context::CliContext;
use selectstart::commands::discord::MessageContext;
use selectstart::commands::leaderboard::leaderboard_impl;
use selectstart::context::{Error, UserContext};
// }}}

#[derive(clap::Args)]
pub struct Args {
	/// Month to show (YYYY-MM), defaults to the current one
	#[arg(long)]
	month: Option<String>,

	/// Show the shadow game instead
	#[arg(long)]
	shadow: bool,

	/// Page to show
	#[arg(long)]
	page: Option<usize>,
}

pub async fn run(args: Args) -> Result<(), Error> {
	let data = UserContext::new()?;
	let mut ctx = CliContext::new(data.clone())?;

	let res = leaderboard_impl(
		&mut ctx,
		&data,
		args.month.as_deref(),
		args.shadow,
		args.page,
	)
	.await;
	ctx.handle_error(res).await?;

	Ok(())
}
