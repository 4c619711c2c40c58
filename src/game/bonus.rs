//! The timed bonus food window

use std::time::{Duration, Instant};

use super::state::Position;

/// A bonus opens on every eat count that is a multiple of this
pub const BONUS_EVERY: u32 = 5;

/// Seconds of bonus window per grid column, before the level factor
const SECONDS_PER_COLUMN: f64 = 0.15;

/// Points per whole unit of the decayed bonus multiplier
const REWARD_STEP: u32 = 10;

/// Two-state timer: no bonus, or one bonus food with a running clock
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BonusTimer {
    #[default]
    Inactive,
    Active {
        food: Position,
        started_at: Instant,
        duration: Duration,
    },
}

impl BonusTimer {
    /// Length of a bonus window: `width * 0.15 * (9 - level)` seconds.
    ///
    /// Expects a level already clamped to 1..=8.
    pub fn duration_for(width: u16, level: u32) -> Duration {
        let factor = 9u32.saturating_sub(level);
        Duration::from_secs_f64(f64::from(width) * SECONDS_PER_COLUMN * f64::from(factor))
    }

    /// True on the eat counts that open a bonus window (5, 10, 15, ...)
    pub fn triggers_on(eat_count: u32) -> bool {
        eat_count > 0 && eat_count % BONUS_EVERY == 0
    }

    /// Open a window. Returns false and changes nothing if one is already open.
    pub fn activate(&mut self, food: Position, now: Instant, duration: Duration) -> bool {
        if self.is_active() {
            return false;
        }
        *self = BonusTimer::Active {
            food,
            started_at: now,
            duration,
        };
        true
    }

    pub fn clear(&mut self) {
        *self = BonusTimer::Inactive;
    }

    pub fn is_active(&self) -> bool {
        matches!(self, BonusTimer::Active { .. })
    }

    pub fn food(&self) -> Option<Position> {
        match self {
            BonusTimer::Active { food, .. } => Some(*food),
            BonusTimer::Inactive => None,
        }
    }

    pub fn elapsed(&self, now: Instant) -> Option<Duration> {
        match self {
            BonusTimer::Active { started_at, .. } => Some(now.saturating_duration_since(*started_at)),
            BonusTimer::Inactive => None,
        }
    }

    /// True once the whole window has elapsed
    pub fn is_expired(&self, now: Instant) -> bool {
        match self {
            BonusTimer::Active {
                started_at,
                duration,
                ..
            } => now.saturating_duration_since(*started_at) >= *duration,
            BonusTimer::Inactive => false,
        }
    }

    /// Share of the window still left, in 0.0..=1.0
    pub fn remaining_fraction(&self, now: Instant) -> Option<f64> {
        match self {
            BonusTimer::Active {
                started_at,
                duration,
                ..
            } => {
                if duration.is_zero() {
                    return Some(0.0);
                }
                let left = duration.saturating_sub(now.saturating_duration_since(*started_at));
                Some((left.as_secs_f64() / duration.as_secs_f64()).clamp(0.0, 1.0))
            }
            BonusTimer::Inactive => None,
        }
    }

    /// Points for eating the bonus right now; zero when inactive
    pub fn reward(&self, now: Instant, level: u32) -> u32 {
        match self {
            BonusTimer::Active {
                started_at,
                duration,
                ..
            } => bonus_reward(*duration, now.saturating_duration_since(*started_at), level),
            BonusTimer::Inactive => 0,
        }
    }

    /// Push the start forward, e.g. by the time spent paused
    pub fn postpone(&mut self, by: Duration) {
        if let BonusTimer::Active { started_at, .. } = self {
            *started_at += by;
        }
    }
}

/// `10 * max(0, floor((duration - elapsed) * level))`
pub fn bonus_reward(duration: Duration, elapsed: Duration, level: u32) -> u32 {
    let left = duration.saturating_sub(elapsed).as_secs_f64();
    let multiplier = (left * f64::from(level)).floor().max(0.0);
    // Bounded by width * 0.15 * 8 * 8 seconds, far below u32::MAX / 10
    REWARD_STEP * multiplier as u32
}
