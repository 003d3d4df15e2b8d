use std::fmt::Display;
use std::str::FromStr;

use anyhow::{anyhow, bail};
use chrono::{Datelike, NaiveDate, NaiveDateTime, Utc};

/// A calendar month (in UTC), which is what every challenge is keyed by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Period {
	year: i32,
	month: u32,
}

impl Period {
	pub fn new(year: i32, month: u32) -> anyhow::Result<Self> {
		if !(1..=12).contains(&month) {
			bail!("Month must be between 1 and 12, got {month}");
		}

		Ok(Self { year, month })
	}

	pub fn current() -> Self {
		let now = Utc::now();
		Self {
			year: now.year(),
			month: now.month(),
		}
	}

	#[inline]
	pub fn year(&self) -> i32 {
		self.year
	}

	#[inline]
	pub fn month(&self) -> u32 {
		self.month
	}

	pub fn next(&self) -> Self {
		if self.month == 12 {
			Self {
				year: self.year + 1,
				month: 1,
			}
		} else {
			Self {
				year: self.year,
				month: self.month + 1,
			}
		}
	}

	fn first_day(&self) -> NaiveDateTime {
		NaiveDate::from_ymd_opt(self.year, self.month, 1)
			.and_then(|d| d.and_hms_opt(0, 0, 0))
			.unwrap_or(NaiveDateTime::MIN)
	}

	/// The first instant of the month, together with the first instant of the next.
	pub fn bounds(&self) -> (NaiveDateTime, NaiveDateTime) {
		(self.first_day(), self.next().first_day())
	}

	#[inline]
	pub fn contains(&self, instant: NaiveDateTime) -> bool {
		let (start, end) = self.bounds();
		start <= instant && instant < end
	}

	/// Something like "October 2026".
	pub fn pretty(&self) -> String {
		self.first_day().format("%B %Y").to_string()
	}
}

impl Display for Period {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{:04}-{:02}", self.year, self.month)
	}
}

impl FromStr for Period {
	type Err = anyhow::Error;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let (year, month) = s
			.trim()
			.split_once('-')
			.ok_or_else(|| anyhow!("Expected a month like `2026-10`, got `{s}`"))?;

		let year = year
			.parse()
			.map_err(|_| anyhow!("Invalid year `{year}` in `{s}`"))?;
		let month = month
			.parse()
			.map_err(|_| anyhow!("Invalid month `{month}` in `{s}`"))?;

		Self::new(year, month)
	}
}

#[cfg(test)]
mod period_tests {
	use super::*;

	fn at(s: &str) -> NaiveDateTime {
		NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
	}

	#[test]
	fn parses_and_prints() {
		let period: Period = "2026-03".parse().unwrap();
		assert_eq!(period.year(), 2026);
		assert_eq!(period.month(), 3);
		assert_eq!(period.to_string(), "2026-03");
		assert_eq!(period.pretty(), "March 2026");
	}

	#[test]
	fn rejects_garbage() {
		assert!("2026".parse::<Period>().is_err());
		assert!("2026-13".parse::<Period>().is_err());
		assert!("2026-00".parse::<Period>().is_err());
		assert!("year-month".parse::<Period>().is_err());
	}

	#[test]
	fn december_rolls_over() {
		let period = Period::new(2025, 12).unwrap();
		assert_eq!(period.next(), Period::new(2026, 1).unwrap());
		assert!(period.contains(at("2025-12-31 23:59:59")));
		assert!(!period.contains(at("2026-01-01 00:00:00")));
	}

	#[test]
	fn bounds_are_half_open() {
		let period = Period::new(2026, 2).unwrap();
		assert!(period.contains(at("2026-02-01 00:00:00")));
		assert!(!period.contains(at("2026-01-31 23:59:59")));
		assert!(!period.contains(at("2026-03-01 00:00:00")));
	}
}
