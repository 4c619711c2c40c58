use std::time::{Duration, Instant};

/// Running totals across the rounds of one session
pub struct SessionStats {
    round_started: Instant,
    paused_since: Option<Instant>,
    paused_total: Duration,
    /// Play time of the current round, pauses excluded
    pub round_time: Duration,
    pub high_score: u32,
    pub rounds_played: u32,
    pub longest_snake: usize,
}

impl SessionStats {
    pub fn new(now: Instant) -> Self {
        Self {
            round_started: now,
            paused_since: None,
            paused_total: Duration::ZERO,
            round_time: Duration::ZERO,
            high_score: 0,
            rounds_played: 0,
            longest_snake: 0,
        }
    }

    /// Refresh the round clock
    pub fn update(&mut self, now: Instant) {
        let clock = self.paused_since.unwrap_or(now);
        self.round_time = clock
            .saturating_duration_since(self.round_started)
            .saturating_sub(self.paused_total);
    }

    pub fn on_round_start(&mut self, now: Instant) {
        self.round_started = now;
        self.paused_since = None;
        self.paused_total = Duration::ZERO;
        self.round_time = Duration::ZERO;
    }

    /// Stop or restart the round clock
    pub fn set_paused(&mut self, paused: bool, now: Instant) {
        match (paused, self.paused_since) {
            (true, None) => self.paused_since = Some(now),
            (false, Some(since)) => {
                self.paused_total += now.saturating_duration_since(since);
                self.paused_since = None;
            }
            _ => {}
        }
    }

    pub fn on_round_over(&mut self, final_score: u32, snake_len: usize, now: Instant) {
        self.update(now);
        self.paused_since = Some(now);
        self.rounds_played += 1;
        self.high_score = self.high_score.max(final_score);
        self.longest_snake = self.longest_snake.max(snake_len);
    }

    pub fn format_time(&self) -> String {
        let total_secs = self.round_time.as_secs();
        format!("{:02}:{:02}", total_secs / 60, total_secs % 60)
    }
}
