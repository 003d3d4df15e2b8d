use anyhow::anyhow;
use rusqlite::Row;

use crate::commands::discord::MessageContext;
use crate::context::{Error, ErrorKind, TagError, TaggedError, UserContext};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
	pub id: u32,
	pub discord_id: String,
	pub ra_username: String,
	pub is_admin: bool,
}

impl User {
	#[inline]
	fn from_row(row: &Row<'_>) -> Result<Self, rusqlite::Error> {
		Ok(Self {
			id: row.get("id")?,
			discord_id: row.get("discord_id")?,
			ra_username: row.get("ra_username")?,
			is_admin: row.get("is_admin")?,
		})
	}

	pub fn from_context(ctx: &impl MessageContext) -> Result<Self, TaggedError> {
		Self::by_discord_id(ctx.data(), ctx.author_id())
	}

	pub fn by_discord_id(ctx: &UserContext, discord_id: u64) -> Result<Self, TaggedError> {
		let user = ctx
			.db
			.get()?
			.prepare_cached("SELECT * FROM users WHERE discord_id=?")?
			.query_map([discord_id.to_string()], Self::from_row)?
			.next()
			.ok_or_else(|| {
				anyhow!("You are not registered yet. Use `/user register` with your RetroAchievements username first!")
					.tag(ErrorKind::User)
			})??;

		Ok(user)
	}

	pub fn by_ra_username(ctx: &UserContext, username: &str) -> Result<Option<Self>, Error> {
		let user = ctx
			.db
			.get()?
			.prepare_cached("SELECT * FROM users WHERE ra_username=?")?
			.query_map([username], Self::from_row)?
			.next()
			.transpose()?;

		Ok(user)
	}

	pub fn all(ctx: &UserContext) -> Result<Vec<Self>, Error> {
		let users = ctx
			.db
			.get()?
			.prepare_cached("SELECT * FROM users ORDER BY id")?
			.query_map((), Self::from_row)?
			.collect::<Result<_, _>>()?;

		Ok(users)
	}

	/// Creates or re-links the account belonging to a discord user.
	pub fn register(ctx: &UserContext, discord_id: u64, ra_username: &str) -> Result<Self, TaggedError> {
		let ra_username = ra_username.trim();
		if ra_username.is_empty() || ra_username.contains(char::is_whitespace) {
			return Err(anyhow!("`{ra_username}` is not a valid RetroAchievements username")
				.tag(ErrorKind::User));
		}

		if let Some(existing) = Self::by_ra_username(ctx, ra_username)? {
			if existing.discord_id != discord_id.to_string() {
				return Err(anyhow!(
					"The RetroAchievements account `{}` is already linked to someone else",
					existing.ra_username
				)
				.tag(ErrorKind::User));
			}
		}

		let user = ctx
			.db
			.get()?
			.prepare_cached(
				"
        INSERT INTO users(discord_id, ra_username) VALUES (?,?)
        ON CONFLICT(discord_id) DO UPDATE SET ra_username=excluded.ra_username
        RETURNING *
      ",
			)?
			.query_row((discord_id.to_string(), ra_username), Self::from_row)?;

		Ok(user)
	}

	pub fn unregister(&self, ctx: &UserContext) -> Result<(), Error> {
		ctx.db
			.get()?
			.prepare_cached("DELETE FROM users WHERE id=?")?
			.execute([self.id])?;

		Ok(())
	}

	pub fn set_admin(ctx: &UserContext, discord_id: u64, is_admin: bool) -> Result<bool, Error> {
		let changed = ctx
			.db
			.get()?
			.prepare_cached("UPDATE users SET is_admin=? WHERE discord_id=?")?
			.execute((is_admin, discord_id.to_string()))?;

		Ok(changed > 0)
	}

	#[inline]
	pub fn assert_is_admin(&self) -> Result<(), TaggedError> {
		if !self.is_admin {
			Err(anyhow!("This command is reserved for challenge admins.").tag(ErrorKind::User))?;
		}

		Ok(())
	}

	#[cfg(test)]
	pub fn create_admin_for_tests(ctx: &impl MessageContext) -> Result<Self, TaggedError> {
		let user = Self::register(ctx.data(), ctx.author_id(), "tester")?;
		Self::set_admin(ctx.data(), ctx.author_id(), true)?;
		Ok(Self {
			is_admin: true,
			..user
		})
	}
}
