use crate::store::entities::MoodLog;

/// Greeting shown on top of the dashboard for a local hour of the day.
pub fn greeting(hour: u32) -> &'static str {
    if hour < 12 {
        "Good morning"
    } else if hour < 18 {
        "Good afternoon"
    } else {
        "Good evening"
    }
}

/// Mood logs are sorted by day, so the most recent one is the last.
pub fn latest_mood(logs: &[MoodLog]) -> Option<&MoodLog> {
    logs.last()
}
