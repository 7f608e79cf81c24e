//! Breakout detector — consecutive-close confirmation against the range.

use crate::domain::{Bar, Direction, OpeningRange};

/// A confirmed breakout: its direction and the bar that confirmed it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Breakout {
    pub direction: Direction,
    /// Index of the confirming bar within the scanned slice.
    pub bar_index: usize,
}

/// Scan bars strictly after the window end for the first confirmed breakout.
///
/// Only closes are examined, never wicks. A close strictly above the range
/// high extends the UP streak and resets DOWN; strictly below the low does
/// the reverse; a close back inside the range resets both. The first
/// direction to accumulate `confirm_bars` consecutive qualifying closes wins,
/// and its Nth bar is the breakout bar. `confirm_bars == 0` triggers on the
/// very first close beyond either boundary.
///
/// `None` means the scan exhausted the slice without confirmation.
pub fn detect(range: &OpeningRange, bars: &[Bar], confirm_bars: u32) -> Option<Breakout> {
    let needed = confirm_bars.max(1);
    let mut up_streak: u32 = 0;
    let mut down_streak: u32 = 0;

    for (i, bar) in bars.iter().enumerate() {
        if bar.close > range.high {
            up_streak += 1;
            down_streak = 0;
        } else if bar.close < range.low {
            down_streak += 1;
            up_streak = 0;
        } else {
            up_streak = 0;
            down_streak = 0;
        }

        if up_streak >= needed {
            return Some(Breakout {
                direction: Direction::Up,
                bar_index: i,
            });
        }
        if down_streak >= needed {
            return Some(Breakout {
                direction: Direction::Down,
                bar_index: i,
            });
        }
    }

    None
}
