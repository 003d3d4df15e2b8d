//! Turns the raw per-user challenge progress of a period into display ranks.
//!
//! Ranks follow competition ranking (`1, 1, 3`). Ties that start inside the
//! top five positions are broken using the period's tiebreaker leaderboard,
//! and residual tiebreaker ties using the tiebreaker-breaker leaderboard.

use std::collections::HashMap;

use serde::Serialize;

/// Ties starting at or past this index always share a rank.
pub const TIEBREAKER_WINDOW: usize = 5;

// {{{ Input types
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParticipantScore {
	pub username: String,
	pub achieved_count: u32,
	pub award_points: u32,
	pub completion_percentage: f64,
}

impl ParticipantScore {
	pub fn new(username: &str, achieved_count: u32, award_points: u32, total: u32) -> Self {
		let completion_percentage = if total == 0 {
			0.0
		} else {
			achieved_count as f64 / total as f64 * 100.0
		};

		Self {
			username: username.to_owned(),
			achieved_count,
			award_points,
			completion_percentage,
		}
	}

	#[inline]
	pub fn is_complete(&self) -> bool {
		self.completion_percentage >= 100.0 - 1e-9
	}

	/// Whether two entries finished level with each other on the challenge itself.
	#[inline]
	pub fn ties_with(&self, other: &Self) -> bool {
		if self.is_complete() && other.is_complete() {
			return true;
		}

		self.achieved_count == other.achieved_count && self.award_points == other.award_points
	}
}

/// A position on an external leaderboard.
///
/// Used both for tiebreakers and tiebreaker-breakers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TiebreakerEntry {
	pub username: String,
	pub rank: u32,
	pub score: String,
}

impl TiebreakerEntry {
	pub fn new(username: &str, rank: u32, score: &str) -> Self {
		Self {
			username: username.to_owned(),
			rank,
			score: score.to_owned(),
		}
	}
}
// }}}
// {{{ Output types
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedParticipant {
	pub score: ParticipantScore,
	pub display_rank: u32,

	/// The tiebreaker entry which decided this rank, if any.
	pub tiebreaker: Option<TiebreakerEntry>,

	/// The breaker entry which decided this rank, if any.
	pub breaker: Option<TiebreakerEntry>,
}
// }}}
// {{{ Resolver
fn index_by_username(entries: &[TiebreakerEntry]) -> HashMap<String, &TiebreakerEntry> {
	let mut result = HashMap::with_capacity(entries.len());
	for entry in entries {
		result
			.entry(entry.username.to_lowercase())
			.or_insert(entry);
	}

	result
}

struct Slot {
	input_index: usize,
	display_rank: u32,
	tiebreaker: Option<TiebreakerEntry>,
	breaker: Option<TiebreakerEntry>,
}

/// Resolves tie groups one at a time, handing out ranks from a shared counter.
struct Resolver<'a> {
	tiebreaker: HashMap<String, &'a TiebreakerEntry>,
	breaker: HashMap<String, &'a TiebreakerEntry>,
}

impl<'a> Resolver<'a> {
	fn tiebreaker_of(&self, score: &ParticipantScore) -> Option<&'a TiebreakerEntry> {
		self.tiebreaker
			.get(&score.username.to_lowercase())
			.copied()
	}

	fn breaker_of(&self, score: &ParticipantScore) -> Option<&'a TiebreakerEntry> {
		self.breaker.get(&score.username.to_lowercase()).copied()
	}

	// {{{ Tiebreaker resolution
	/// Assigns ranks to a tie group starting at (zero-based) `start`.
	///
	/// Groups of fully completed entries always share their rank.
	fn resolve_group(&self, scores: &[ParticipantScore], group: &[usize], start: usize) -> Vec<Slot> {
		let shared_rank = start as u32 + 1;
		let all_complete = group.iter().all(|&i| scores[i].is_complete());

		if group.len() == 1
			|| all_complete
			|| start >= TIEBREAKER_WINDOW
			|| self.tiebreaker.is_empty()
		{
			return group
				.iter()
				.map(|&input_index| Slot {
					input_index,
					display_rank: shared_rank,
					tiebreaker: None,
					breaker: None,
				})
				.collect();
		}

		let (mut with, without): (Vec<_>, Vec<_>) = group
			.iter()
			.map(|&i| (i, self.tiebreaker_of(&scores[i])))
			.partition(|(_, entry)| entry.is_some());

		// Stable, so equal tiebreaker ranks keep their input order
		with.sort_by_key(|(_, entry)| entry.map_or(u32::MAX, |e| e.rank));

		let mut slots = Vec::with_capacity(group.len());
		let mut next_rank = shared_rank;

		for sub_group in with.chunk_by(|(_, a), (_, b)| a.map(|e| e.rank) == b.map(|e| e.rank)) {
			if let [(input_index, entry)] = sub_group {
				slots.push(Slot {
					input_index: *input_index,
					display_rank: next_rank,
					tiebreaker: entry.cloned(),
					breaker: None,
				});
				next_rank += 1;
			} else {
				self.resolve_breaker(scores, sub_group, &mut next_rank, &mut slots);
			}
		}

		for (input_index, _) in without {
			slots.push(Slot {
				input_index,
				display_rank: next_rank,
				tiebreaker: None,
				breaker: None,
			});
		}

		slots
	}
	// }}}
	// {{{ Breaker resolution
	fn resolve_breaker(
		&self,
		scores: &[ParticipantScore],
		sub_group: &[(usize, Option<&'a TiebreakerEntry>)],
		next_rank: &mut u32,
		slots: &mut Vec<Slot>,
	) {
		let (mut with, without): (Vec<_>, Vec<_>) = sub_group
			.iter()
			.map(|&(i, tiebreaker)| (i, tiebreaker, self.breaker_of(&scores[i])))
			.partition(|(_, _, breaker)| breaker.is_some());

		with.sort_by_key(|(_, _, breaker)| breaker.map_or(u32::MAX, |e| e.rank));

		// Entries level on all three leaderboards share a rank
		for tied in with.chunk_by(|(_, _, a), (_, _, b)| a.map(|e| e.rank) == b.map(|e| e.rank)) {
			let shared = *next_rank;
			for (input_index, tiebreaker, breaker) in tied {
				slots.push(Slot {
					input_index: *input_index,
					display_rank: shared,
					tiebreaker: tiebreaker.cloned(),
					breaker: breaker.cloned(),
				});
			}
			*next_rank += tied.len() as u32;
		}

		let shared = *next_rank;
		for (input_index, tiebreaker, _) in &without {
			slots.push(Slot {
				input_index: *input_index,
				display_rank: shared,
				tiebreaker: tiebreaker.cloned(),
				breaker: None,
			});
		}
		*next_rank += without.len() as u32;
	}
	// }}}
}

/// Computes the display rank of every participant.
///
/// The result is ordered by rank, with participants sharing a rank kept
/// in the order they were given in.
pub fn resolve_ranks(
	scores: &[ParticipantScore],
	tiebreaker: &[TiebreakerEntry],
	breaker: &[TiebreakerEntry],
) -> Vec<RankedParticipant> {
	let resolver = Resolver {
		tiebreaker: index_by_username(tiebreaker),
		breaker: index_by_username(breaker),
	};

	let mut order: Vec<usize> = (0..scores.len()).collect();
	order.sort_by(|&a, &b| {
		let (a, b) = (&scores[a], &scores[b]);
		b.achieved_count
			.cmp(&a.achieved_count)
			.then(b.award_points.cmp(&a.award_points))
	});

	let mut slots = Vec::with_capacity(scores.len());
	let mut start = 0;
	for group in order.chunk_by(|&a, &b| scores[a].ties_with(&scores[b])) {
		slots.extend(resolver.resolve_group(scores, group, start));
		start += group.len();
	}

	slots.sort_by_key(|slot| (slot.display_rank, slot.input_index));
	slots
		.into_iter()
		.map(|slot| RankedParticipant {
			score: scores[slot.input_index].clone(),
			display_rank: slot.display_rank,
			tiebreaker: slot.tiebreaker,
			breaker: slot.breaker,
		})
		.collect()
}

/// Plain competition ranking by leaderboard position, used for arcade boards.
pub fn rank_by_position(entries: &[TiebreakerEntry]) -> Vec<(u32, &TiebreakerEntry)> {
	let mut sorted: Vec<&TiebreakerEntry> = entries.iter().collect();
	sorted.sort_by_key(|entry| entry.rank);

	let mut result: Vec<(u32, &TiebreakerEntry)> = Vec::with_capacity(sorted.len());
	for (i, entry) in sorted.iter().enumerate() {
		let rank = match result.last() {
			Some(&(prev_rank, prev)) if prev.rank == entry.rank => prev_rank,
			_ => i as u32 + 1,
		};
		result.push((rank, *entry));
	}

	result
}

// }}}
