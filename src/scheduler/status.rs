//! Rotating the bot's presence.

use rand::seq::IndexedRandom;
use serenity::all::{ActivityData, Context};
use tokio_cron_scheduler::{Job, JobScheduler};

use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityKind {
    Playing,
    Listening,
    Watching,
    Competing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusActivity {
    pub kind: ActivityKind,
    pub text: &'static str,
}

const fn activity(kind: ActivityKind, text: &'static str) -> StatusActivity {
    StatusActivity { kind, text }
}

/// Presence texts picked at random.
pub const ACTIVITIES: [StatusActivity; 11] = [
    activity(ActivityKind::Competing, "the Glyph Challenge"),
    activity(ActivityKind::Competing, "the Ambigram Challenge"),
    activity(ActivityKind::Playing, "with their tittles"),
    activity(ActivityKind::Watching, "obscure linguistic videos"),
    activity(ActivityKind::Listening, "wikipedia IPA sound examples"),
    activity(ActivityKind::Playing, "\"dive into the rabbithole\" on Wikipedia"),
    activity(ActivityKind::Watching, "Calligraphy ASMR"),
    activity(ActivityKind::Playing, "with broad nibs"),
    activity(ActivityKind::Playing, "with variable fonts"),
    activity(ActivityKind::Playing, "with brushes"),
    activity(ActivityKind::Listening, "ABC songs of other languages"),
];

pub fn random_activity() -> StatusActivity {
    ACTIVITIES
        .choose(&mut rand::rng())
        .copied()
        .unwrap_or(ACTIVITIES[0])
}

impl StatusActivity {
    pub fn to_activity_data(&self) -> ActivityData {
        match self.kind {
            ActivityKind::Playing => ActivityData::playing(self.text),
            ActivityKind::Listening => ActivityData::listening(self.text),
            ActivityKind::Watching => ActivityData::watching(self.text),
            ActivityKind::Competing => ActivityData::competing(self.text),
        }
    }
}

fn set_random_activity(ctx: &Context) {
    let activity = random_activity();
    tracing::debug!("Setting activity to {:?} {}", activity.kind, activity.text);
    ctx.set_activity(Some(activity.to_activity_data()));
}

/// Sets a random presence now and starts rotating it on `cron`.
///
/// # Arguments
/// - `ctx` - Gateway context of the shard whose presence is set
/// - `cron` - Six-field cron expression (with seconds)
///
/// # Returns
/// - `Ok(())` - Scheduler started
/// - `Err(AppError)` - Invalid cron expression or scheduler failure
pub async fn start_status_rotation(ctx: Context, cron: &str) -> Result<(), AppError> {
    set_random_activity(&ctx);

    let scheduler = JobScheduler::new().await?;

    let job = Job::new_async(cron, move |_uuid, _lock| {
        let ctx = ctx.clone();

        Box::pin(async move {
            set_random_activity(&ctx);
        })
    })?;

    scheduler.add(job).await?;
    scheduler.start().await?;

    tracing::info!("Status rotation scheduler started ({})", cron);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Tests picking random presence activities.
    ///
    /// Expected: every pick is one of the fixed activities
    #[test]
    fn random_activity_comes_from_the_list() {
        for _ in 0..20 {
            assert!(ACTIVITIES.contains(&random_activity()));
        }
    }

    /// Tests the fixed activity list.
    ///
    /// Expected: every activity has a text
    #[test]
    fn activity_texts_are_non_empty() {
        assert!(ACTIVITIES.iter().all(|a| !a.text.is_empty()));
    }
}
