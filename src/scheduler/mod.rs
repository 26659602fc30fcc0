//! Cron jobs running alongside the bot.

pub mod status;
