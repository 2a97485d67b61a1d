use std::sync::Arc;

use chrono::NaiveDateTime;
use tokio::sync::Mutex;

use crate::{
    command::render_stats,
    config::CounterConfig,
    error::Result,
    line::{MessagingApi, webhook::Event},
    store::UsageStore,
    util::command::{counted_reply, throttled_reply},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rules {
    pub target_phrase: String,
    pub stats_command: String,
}

impl From<&CounterConfig> for Rules {
    fn from(config: &CounterConfig) -> Self {
        Self {
            target_phrase: config.target_phrase.clone(),
            stats_command: config.stats_command.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Counted { added: u64, total: u64 },
    Throttled { remaining_minutes: f64 },
    ReportedStats,
    Ignored,
}

/// Routes inbound events to the counting and stats workflows.
///
/// Each event is handled while holding the store lock, so concurrent
/// deliveries are applied one at a time.
#[derive(Clone)]
pub struct Dispatcher {
    store: Arc<Mutex<UsageStore>>,
    api: Arc<dyn MessagingApi>,
    rules: Arc<Rules>,
}

impl Dispatcher {
    pub fn new(store: Arc<Mutex<UsageStore>>, api: Arc<dyn MessagingApi>, rules: Rules) -> Self {
        Self {
            store,
            api,
            rules: Arc::new(rules),
        }
    }

    pub fn store(&self) -> &Arc<Mutex<UsageStore>> {
        &self.store
    }

    /// Handles events in order. The first failure aborts the rest.
    pub async fn handle_events(&self, events: &[Event], now: NaiveDateTime) -> Result<Vec<Outcome>> {
        let mut outcomes = Vec::with_capacity(events.len());
        for event in events {
            outcomes.push(self.handle_event(event, now).await?);
        }
        Ok(outcomes)
    }

    pub async fn handle_event(&self, event: &Event, now: NaiveDateTime) -> Result<Outcome> {
        if !event.is_message() {
            tracing::debug!("Ignoring {} event", event.kind);
            return Ok(Outcome::Ignored);
        }
        let incoming = event.incoming_message()?;
        let user_id = incoming.user_id;

        let mut store = self.store.lock().await;

        let display_name = match store.display_name(user_id) {
            Some(name) => name.to_string(),
            None => {
                let profile = self.api.get_profile(user_id).await?;
                store.remember_name(user_id, &profile.display_name)?;
                profile.display_name
            }
        };

        let Some(text) = incoming.text else {
            return Ok(Outcome::Ignored);
        };

        let occurrences = text.matches(self.rules.target_phrase.as_str()).count() as u64;

        let (reply, outcome) = if occurrences > 0 {
            let cooldowns = store.cooldowns();
            if cooldowns.is_in_cooldown(user_id, now) {
                let remaining_minutes = cooldowns.remaining_minutes(user_id, now);
                (
                    throttled_reply(&display_name, remaining_minutes),
                    Outcome::Throttled { remaining_minutes },
                )
            } else {
                let total = store.record_usage(user_id, occurrences, now)?;
                (
                    counted_reply(&display_name, total),
                    Outcome::Counted {
                        added: occurrences,
                        total,
                    },
                )
            }
        } else if text == self.rules.stats_command {
            (render_stats(&store, now), Outcome::ReportedStats)
        } else {
            return Ok(Outcome::Ignored);
        };
        drop(store);

        self.api.reply_message(incoming.reply_token, &reply).await?;
        tracing::info!("{} ({}): {:?}", display_name, user_id, outcome);
        Ok(outcome)
    }
}
