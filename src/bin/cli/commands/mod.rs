pub mod admin;
pub mod leaderboard;
pub mod sync;
