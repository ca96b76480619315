use std::time::Duration;

use chrono::{DateTime, Utc};
use rand::{rngs::StdRng, Rng, SeedableRng};
use tokio::time::MissedTickBehavior;

use crate::{
    data::{state::GiveawayState, Data},
    giveaway::{self, DrawOutcome, GiveawayError, OpenTrigger},
    platform::Platform,
};

/// How often the schedule is checked against the clock
pub const SCHEDULER_TICK: Duration = Duration::from_secs(30);

/// What a single scheduler tick did
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TickReport {
    pub opened: bool,
    pub drawn: Option<DrawOutcome>,
}

pub async fn scheduler_task(data: Data) {
    debug!("starting giveaway scheduler");

    let mut interval = tokio::time::interval(SCHEDULER_TICK);
    // a late tick only needs to run once to catch up with the schedule
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut rng = StdRng::from_entropy();

    loop {
        interval.tick().await;

        let mut state = data.giveaway.lock().await;
        let report = tick(&mut state, &data.platform, Utc::now(), &mut rng).await;

        if report != TickReport::default() {
            debug!(?report, "scheduler tick");
        }
    }
}

/// Open and/or close the giveaway if the schedule says so.
///
/// Both may happen in the same tick if the end is already due by the time the
/// giveaway opens. Remote failures skip the transition and the next tick tries
/// again, except for an entry emoji that can't be used, which drops the
/// schedule.
pub async fn tick<P, R>(
    state: &mut GiveawayState,
    platform: &P,
    now: DateTime<Utc>,
    rng: &mut R,
) -> TickReport
where
    P: Platform + ?Sized,
    R: Rng + Send + ?Sized,
{
    let mut report = TickReport::default();

    if state.should_auto_open(now) {
        match giveaway::open_giveaway(state, platform, OpenTrigger::Scheduled(now)).await {
            Ok(_) => report.opened = true,
            // retrying would post and withdraw an announcement every tick
            Err(err @ GiveawayError::EntryReaction { .. }) => {
                warn!("scheduled giveaway can't be entered, dropping the schedule: {}", err);
                state.clear_schedule();
                giveaway::log_action(
                    platform,
                    "Scheduled Giveaway Not Started",
                    format!("{}. Set a new emoji and schedule to try again.", err),
                )
                .await;
            }
            Err(err) => warn!("failed to open scheduled giveaway: {}", err),
        }
    }

    if state.should_auto_close(now) {
        match giveaway::draw_winner(state, platform, rng).await {
            Ok(outcome) => report.drawn = Some(outcome),
            Err(err) => warn!("failed to draw scheduled giveaway: {}", err),
        }
    }

    report
}
