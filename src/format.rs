//! Text helpers shared by the command handlers.

use std::fmt;

/// Shown instead of a bar when a user has no tasks at all.
pub const NO_TASKS: &str = "No tasks yet!";

/// Number of segments in a progress bar.
pub const BAR_WIDTH: usize = 10;

const FILLED: char = '▮';
const EMPTY: char = '▯';

/// Render `done` out of `total` as a 10-segment bar with a count and percentage.
///
/// `"▮▮▮▯▯▯▯▯▯▯  3/10 (30%)"`
pub fn progress_bar(done: usize, total: usize) -> String {
    if total == 0 {
        return NO_TASKS.to_string();
    }

    let filled = (done * BAR_WIDTH / total).min(BAR_WIDTH);
    let percent = done * 100 / total;

    let mut bar = String::with_capacity(BAR_WIDTH * FILLED.len_utf8() + 24);
    bar.extend(std::iter::repeat(FILLED).take(filled));
    bar.extend(std::iter::repeat(EMPTY).take(BAR_WIDTH - filled));
    format!("{bar}  {done}/{total} ({percent}%)")
}

/// Rank tiers, lowest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Rank {
    Beginner,
    Achiever,
    TaskMaster,
    ProductivityLegend,
}

impl Rank {
    pub fn label(self) -> &'static str {
        match self {
            Rank::Beginner => "🐣 Beginner",
            Rank::Achiever => "💪 Achiever",
            Rank::TaskMaster => "🏆 Task Master",
            Rank::ProductivityLegend => "🌟 Productivity Legend",
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Tier for a point total: <5, <10, <20, then everything above.
pub fn rank(points: u64) -> Rank {
    match points {
        0..=4 => Rank::Beginner,
        5..=9 => Rank::Achiever,
        10..=19 => Rank::TaskMaster,
        _ => Rank::ProductivityLegend,
    }
}

/// First `max_chars` characters of `text`, cut on a char boundary.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}
