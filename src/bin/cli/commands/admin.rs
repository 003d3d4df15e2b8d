use anyhow::bail;
use selectstart::context::{Error, UserContext};
use selectstart::user::User;

#[derive(clap::Args)]
pub struct Args {
	/// Discord id of the member
	discord_id: u64,
}

/// Admin rights can only be bootstrapped from here, since granting them
/// over discord requires being an admin already.
pub fn run(args: Args, is_admin: bool) -> Result<(), Error> {
	let ctx = UserContext::new()?;

	if !User::set_admin(&ctx, args.discord_id, is_admin)? {
		bail!(
			"No member with discord id {} has registered yet",
			args.discord_id
		);
	}

	let verb = if is_admin { "promoted" } else { "demoted" };
	println!("Member {} {verb}", args.discord_id);

	Ok(())
}
