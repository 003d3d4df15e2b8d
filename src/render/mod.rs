//! Plain-data descriptions of the messages the bot sends.
//!
//! Views are built once and only converted into serenity builders
//! right before being sent, which keeps the rendering code testable.

use poise::serenity_prelude::{CreateEmbed, CreateEmbedFooter};
use serde::Serialize;

pub mod challenge;
pub mod leaderboard;

/// Discord rejects embed fields longer than this.
pub const FIELD_VALUE_LIMIT: usize = 1024;
pub const MEDIA_URL: &str = "https://media.retroachievements.org";

// {{{ Views
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldView {
	pub name: String,
	pub value: String,
	pub inline: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EmbedView {
	pub title: String,
	pub description: Option<String>,
	pub fields: Vec<FieldView>,
	pub footer: Option<String>,
	pub color: Option<u32>,
	pub thumbnail: Option<String>,
}

impl EmbedView {
	pub fn new(title: impl Into<String>) -> Self {
		Self {
			title: title.into(),
			..Default::default()
		}
	}

	pub fn description(mut self, description: impl Into<String>) -> Self {
		self.description = Some(description.into());
		self
	}

	/// Adds a field, truncating its value to what discord accepts.
	pub fn field(mut self, name: impl Into<String>, value: &str, inline: bool) -> Self {
		self.fields.push(FieldView {
			name: name.into(),
			value: truncate(value, FIELD_VALUE_LIMIT),
			inline,
		});
		self
	}

	pub fn footer(mut self, footer: impl Into<String>) -> Self {
		self.footer = Some(footer.into());
		self
	}

	pub fn color(mut self, color: u32) -> Self {
		self.color = Some(color);
		self
	}

	pub fn thumbnail(mut self, url: impl Into<String>) -> Self {
		self.thumbnail = Some(url.into());
		self
	}

	pub fn to_create_embed(&self) -> CreateEmbed {
		let mut embed = CreateEmbed::default().title(&self.title);

		if let Some(description) = &self.description {
			embed = embed.description(description);
		}

		for field in &self.fields {
			embed = embed.field(&field.name, &field.value, field.inline);
		}

		if let Some(footer) = &self.footer {
			embed = embed.footer(CreateEmbedFooter::new(footer));
		}

		if let Some(color) = self.color {
			embed = embed.color(color);
		}

		if let Some(thumbnail) = &self.thumbnail {
			embed = embed.thumbnail(thumbnail);
		}

		embed
	}
}
// }}}
// {{{ Text helpers
/// Cuts `text` down to at most `limit` characters, marking the cut with an ellipsis.
pub fn truncate(text: &str, limit: usize) -> String {
	if text.chars().count() <= limit {
		return text.to_owned();
	}

	let mut result: String = text.chars().take(limit.saturating_sub(1)).collect();
	result.push('…');
	result
}

/// Splits items into pages of at most `per_page` items. Always returns
/// at least one (possibly empty) page.
pub fn paginate<T>(items: &[T], per_page: usize) -> Vec<&[T]> {
	if items.is_empty() {
		return vec![&items[..0]];
	}

	items.chunks(per_page.max(1)).collect()
}

/// Usernames regularly contain underscores, which discord would otherwise
/// render as italics.
pub fn escape_markdown(text: &str) -> String {
	let mut result = String::with_capacity(text.len());
	for c in text.chars() {
		if matches!(c, '_' | '*' | '~' | '`' | '|' | '\\') {
			result.push('\\');
		}
		result.push(c);
	}

	result
}

#[inline]
pub fn icon_url(icon_path: &str) -> String {
	format!("{MEDIA_URL}{icon_path}")
}
// }}}
// {{{ Tests
#[cfg(test)]
mod render_tests {
	use super::*;

	#[test]
	fn short_text_is_untouched() {
		assert_eq!(truncate("hello", 5), "hello");
	}

	#[test]
	fn long_text_is_cut_on_char_boundaries() {
		let text = "🥇".repeat(2000);
		let cut = truncate(&text, FIELD_VALUE_LIMIT);
		assert_eq!(cut.chars().count(), FIELD_VALUE_LIMIT);
		assert!(cut.ends_with('…'));
	}

	#[test]
	fn fields_are_truncated() {
		let embed = EmbedView::new("title").field("name", &"x".repeat(5000), false);
		assert_eq!(embed.fields[0].value.chars().count(), FIELD_VALUE_LIMIT);
	}

	#[test]
	fn markdown_is_escaped() {
		assert_eq!(escape_markdown("a_b*c"), r"a\_b\*c");
		assert_eq!(escape_markdown("plain"), "plain");
	}

	#[test]
	fn pagination_keeps_an_empty_page() {
		let items: [u32; 0] = [];
		assert_eq!(paginate(&items, 5).len(), 1);

		let items: Vec<u32> = (0..11).collect();
		let pages = paginate(&items, 5);
		assert_eq!(pages.len(), 3);
		assert_eq!(pages[2], &[10]);
	}
}
// }}}
