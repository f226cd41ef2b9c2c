//! Text rendition of the mood history chart.

use ansi_term::Colour;

use crate::{
    store::entities::{Mood, MoodLog, Rating},
    utils::time::short_day_label,
};

/// Only the most recent days are plotted.
pub const CHART_WINDOW: usize = 30;

const COLUMN_WIDTH: usize = 3;
const AXIS_LABEL_WIDTH: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartPoint {
    pub label: String,
    pub rating: Rating,
    pub mood: Mood,
}

pub fn chart_points(logs: &[MoodLog]) -> Vec<ChartPoint> {
    let skip = logs.len().saturating_sub(CHART_WINDOW);
    logs.iter()
        .skip(skip)
        .map(|log| ChartPoint {
            label: short_day_label(log.date),
            rating: log.rating,
            mood: log.mood,
        })
        .collect()
}

/// Rows go from Joyful (5) at the top down to Anxious (1). Every point is one column.
pub fn render_chart(points: &[ChartPoint], colored: bool) -> String {
    if points.is_empty() {
        return "Your Mood Chart Awaits\nStart tracking your mood to see your journey unfold.\n"
            .to_string();
    }

    let marker = if colored {
        Colour::Cyan.bold().paint("●").to_string()
    } else {
        "●".to_string()
    };

    let mut out = String::new();
    for value in (Rating::MIN..=Rating::MAX).rev() {
        let axis = Rating::new_opt(value)
            .map(Mood::from_rating)
            .map(|mood| mood.to_string())
            .unwrap_or_default();
        out.push_str(&format!("{axis:>AXIS_LABEL_WIDTH$} |"));
        for point in points {
            if *point.rating == value {
                out.push(' ');
                out.push_str(&marker);
                out.push(' ');
            } else {
                out.push_str(&" ".repeat(COLUMN_WIDTH));
            }
        }
        out.push('\n');
    }
    out.push_str(&format!(
        "{:>AXIS_LABEL_WIDTH$} +{}\n",
        "",
        "-".repeat(points.len() * COLUMN_WIDTH)
    ));

    let first = &points[0].label;
    let last = &points[points.len() - 1].label;
    let span = points.len() * COLUMN_WIDTH;
    let labels = if points.len() == 1 {
        first.clone()
    } else {
        let gap = span.saturating_sub(first.len() + last.len()).max(1);
        format!("{first}{}{last}", " ".repeat(gap))
    };
    out.push_str(&format!("{:>AXIS_LABEL_WIDTH$}  {labels}\n", ""));
    out
}
