#![allow(async_fn_in_trait)]
#![allow(clippy::redundant_closure)]

pub mod challenge;
pub mod commands;
pub mod context;
pub mod feed;
pub mod logs;
pub mod ranking;
pub mod render;
pub mod retro;
pub mod time;
pub mod user;
