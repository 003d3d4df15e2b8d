// {{{ Imports
use selectstart::challenge::ChallengeKind;
use selectstart::commands::parse_period;
use selectstart::context::{Error, UserContext};
use selectstart::retro::source::ScoreSource;
// }}}

#[derive(clap::Args)]
pub struct Args {
	/// Month to sync (YYYY-MM), defaults to the current one
	#[arg(long)]
	month: Option<String>,
}

/// Fetching scores stores every member's progress as a side effect.
pub async fn run(args: Args) -> Result<(), Error> {
	let ctx = UserContext::new()?;
	let period = parse_period(args.month.as_deref()).map_err(|e| e.error)?;

	for kind in ChallengeKind::KINDS {
		let scores = ctx.fetch_scores(period, kind).await;
		println!("{kind} ({period}): {} members with progress", scores.len());
	}

	Ok(())
}
