//! Background jobs which keep channels up to date.

use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error};

use crate::context::Error;

pub mod channel;
pub mod leaderboard;
pub mod messages;

/// Runs `tick` every `period`, starting right away.
///
/// Ticks never overlap: a slow tick delays the following ones instead of
/// causing a burst. Errors are logged, and the next tick runs regardless.
pub fn spawn_periodic<F, Fut>(name: &'static str, period: Duration, mut tick: F) -> JoinHandle<()>
where
	F: FnMut() -> Fut + Send + 'static,
	Fut: Future<Output = Result<(), Error>> + Send + 'static,
{
	tokio::spawn(async move {
		let mut interval = tokio::time::interval(period);
		interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

		loop {
			interval.tick().await;
			debug!(feed = name, "Refreshing");

			if let Err(err) = tick().await {
				error!(feed = name, "Refresh failed: {err:#}");
			}
		}
	})
}

#[cfg(test)]
mod periodic_tests {
	use std::sync::atomic::{AtomicUsize, Ordering};
	use std::sync::Arc;

	use anyhow::anyhow;

	use super::*;

	#[tokio::test(start_paused = true)]
	async fn ticks_on_schedule_despite_errors() {
		let count = Arc::new(AtomicUsize::new(0));

		let handle = spawn_periodic("test", Duration::from_secs(60), {
			let count = count.clone();
			move || {
				let count = count.clone();
				async move {
					count.fetch_add(1, Ordering::SeqCst);
					Err(anyhow!("api down"))
				}
			}
		});

		tokio::time::sleep(Duration::from_secs(150)).await;
		handle.abort();

		// 0s, 60s and 120s
		assert_eq!(count.load(Ordering::SeqCst), 3);
	}

	#[tokio::test(start_paused = true)]
	async fn slow_ticks_never_overlap() {
		let started = Arc::new(AtomicUsize::new(0));
		let running = Arc::new(AtomicUsize::new(0));
		let max_running = Arc::new(AtomicUsize::new(0));

		let handle = spawn_periodic("test", Duration::from_secs(60), {
			let (started, running, max_running) =
				(started.clone(), running.clone(), max_running.clone());
			move || {
				let (started, running, max_running) =
					(started.clone(), running.clone(), max_running.clone());
				async move {
					started.fetch_add(1, Ordering::SeqCst);
					let now_running = running.fetch_add(1, Ordering::SeqCst) + 1;
					max_running.fetch_max(now_running, Ordering::SeqCst);
					tokio::time::sleep(Duration::from_secs(90)).await;
					running.fetch_sub(1, Ordering::SeqCst);
					Ok(())
				}
			}
		});

		tokio::time::sleep(Duration::from_secs(200)).await;
		handle.abort();

		// Starts at 0s, 90s and 180s
		assert_eq!(started.load(Ordering::SeqCst), 3);
		assert_eq!(max_running.load(Ordering::SeqCst), 1);
	}
}
