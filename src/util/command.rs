pub const UNKNOWN_USER: &str = "未知使用者";
pub const NOT_RECORDED: &str = "未記錄";

/// LINE rejects text messages longer than this many characters.
const MAX_OUTPUT_CHARS: usize = 5000;

pub fn format_minutes(minutes: f64) -> String {
    format!("{:.1}", minutes)
}

pub fn counted_reply(display_name: &str, total: u64) -> String {
    format!("💩 {} 你的 拉屎次數 已經被計算 {} 次！", display_name, total)
}

pub fn throttled_reply(display_name: &str, remaining_minutes: f64) -> String {
    format!(
        "⚠️ {} 你拉太多次囉，小心脫肛！還需要冷卻 {} 分鐘才能再次使用。",
        display_name,
        format_minutes(remaining_minutes)
    )
}

pub fn truncate_output(output: String) -> String {
    match output.char_indices().nth(MAX_OUTPUT_CHARS - 20) {
        Some((cut, _)) if output.chars().count() > MAX_OUTPUT_CHARS => {
            format!("{}\n…", &output[..cut])
        }
        _ => output,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minutes_always_show_one_decimal() {
        assert_eq!(format_minutes(5.0), "5.0");
        assert_eq!(format_minutes(0.26), "0.3");
    }

    #[test]
    fn counted_reply_mentions_total() {
        assert!(counted_reply("Amy", 2).contains("2 次"));
    }

    #[test]
    fn throttled_reply_mentions_remaining() {
        assert!(throttled_reply("Amy", 5.0).contains("冷卻 5.0 分鐘"));
    }

    #[test]
    fn long_output_is_truncated() {
        let long = "屎".repeat(MAX_OUTPUT_CHARS + 1);
        let truncated = truncate_output(long);
        assert!(truncated.chars().count() <= MAX_OUTPUT_CHARS);

        assert_eq!(truncate_output("short".to_string()), "short");
    }
}
