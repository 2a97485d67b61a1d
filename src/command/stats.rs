use chrono::NaiveDateTime;

use crate::{
    store::UsageStore,
    util::command::{NOT_RECORDED, UNKNOWN_USER, format_minutes, truncate_output},
};

pub const STATS_HEADER: &str = "💩 拉屎 次數統計 💩";

/// One line per counted user, in the order they were first counted.
pub fn render_stats(store: &UsageStore, now: NaiveDateTime) -> String {
    let mut report = format!("{}\n", STATS_HEADER);

    for (user_id, count) in store.counts() {
        let name = store.display_name(user_id).unwrap_or(UNKNOWN_USER);
        let last_used = store.last_used(user_id).unwrap_or(NOT_RECORDED);

        let cooldowns = store.cooldowns();
        let status = if cooldowns.is_in_cooldown(user_id, now) {
            format!(
                "[冷卻中: 還剩 {} 分鐘]",
                format_minutes(cooldowns.remaining_minutes(user_id, now))
            )
        } else {
            String::new()
        };

        report.push_str(&format!(
            "👤 {}: {} 次 {{最後拉屎時間：{}}} {}\n",
            name, count, last_used, status
        ));
    }

    truncate_output(report)
}
