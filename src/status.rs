use crate::config::Config;
use crate::engine::quiet_hours;
use chrono::NaiveTime;

pub fn render(config: &Config, now: NaiveTime, tracked_errors: u32) -> String {
    if !config.enabled {
        return "$(mute) FAAAH".to_string();
    }

    if quiet_hours::is_quiet(&config.quiet_hours_start, &config.quiet_hours_end, now) {
        return "$(bell-slash) FAAAH (quiet)".to_string();
    }

    match tracked_errors {
        0 => "$(unmute) FAAAH".to_string(),
        1 => "$(unmute) FAAAH · 1 error".to_string(),
        n => format!("$(unmute) FAAAH · {n} errors"),
    }
}
