use std::collections::HashSet;
use std::time::Instant;

use log::{debug, info, warn};
use rand::Rng;
use rand::rngs::ThreadRng;

use super::{
    action::{Direction, TickInput},
    bonus::BonusTimer,
    config::GameConfig,
    error::GameError,
    food::FoodSpawner,
    frame::RenderFrame,
    grid::{GridBounds, wrap},
    state::{GameState, Phase, Position, RoundEnd, Snake},
};

/// Information about a step
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepInfo {
    /// Whether the snake ate the normal food this step
    pub ate_food: bool,
    /// Whether the snake ate the bonus food this step
    pub ate_bonus: bool,
    /// A bonus window opened this step
    pub bonus_started: bool,
    /// A bonus window ran out this step
    pub bonus_expired: bool,
    /// The normal food was placed somewhere new this step
    pub food_respawned: bool,
    /// Set on the step that ended the round
    pub round_end: Option<RoundEnd>,
}

/// Result of a game step
#[derive(Debug, Clone, PartialEq)]
pub struct StepResult {
    /// Points scored this step
    pub points: u32,
    /// Whether the round is over
    pub terminated: bool,
    /// Additional information about the step
    pub info: StepInfo,
    /// What to draw after this step
    pub frame: RenderFrame,
}

/// The game engine that handles all game logic
pub struct GameEngine<R = ThreadRng> {
    config: GameConfig,
    bounds: GridBounds,
    spawner: FoodSpawner<R>,
}

impl GameEngine<ThreadRng> {
    /// Create a new game engine with the given configuration
    pub fn new(config: GameConfig) -> Result<Self, GameError> {
        Self::with_rng(config, rand::thread_rng())
    }
}

impl<R: Rng> GameEngine<R> {
    /// Create an engine drawing food positions from `rng`.
    ///
    /// The level is clamped into range; a grid too small to start a round is
    /// rejected.
    pub fn with_rng(config: GameConfig, rng: R) -> Result<Self, GameError> {
        let config = config.normalized();
        let bounds = config.bounds()?;

        Ok(Self {
            config,
            bounds,
            spawner: FoodSpawner::new(rng),
        })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Start a fresh round: a two-cell snake in the middle facing right
    pub fn reset(&mut self) -> Result<GameState, GameError> {
        let row = i32::from(self.bounds.height()) / 2;
        let col = i32::from(self.bounds.width()) / 2;
        let head = Position::new(row, col);
        let tail = wrap(head.moved_by(0, -1), self.bounds);
        let snake = Snake::starting(head, tail);

        let food = self
            .spawner
            .spawn(&snake.occupied(), self.bounds)
            .ok_or(GameError::GridTooSmall {
                height: self.bounds.height(),
                width: self.bounds.width(),
            })?;

        info!(
            "New round on {}x{} grid at level {}",
            self.bounds.height(),
            self.bounds.width(),
            self.config.level
        );

        Ok(GameState::new(
            snake,
            Direction::Right,
            food,
            self.bounds,
            self.config.level,
        ))
    }

    /// Execute one tick of the game.
    ///
    /// `now` drives the bonus clock; callers pass the tick's wall time, tests
    /// pass whatever instant they need.
    pub fn step(&mut self, state: &mut GameState, input: TickInput, now: Instant) -> StepResult {
        let mut info = StepInfo::default();

        if input.toggle_pause {
            toggle_pause(state, now);
        }

        if !state.is_playing() {
            return finish(state, 0, info, now);
        }

        // Update direction (prevent 180° turns)
        if let Some(direction) = input.direction {
            if !state.direction.is_opposite(direction) {
                state.direction = direction;
            }
        }

        let new_head = wrap(state.snake.advance(state.direction), state.bounds);

        if state.snake.will_collide(new_head) {
            state.phase = Phase::RoundOver(RoundEnd::SelfCollision);
            state.steps += 1;
            info.round_end = Some(RoundEnd::SelfCollision);
            info!(
                "Round over: self-collision at ({}, {}), score {}",
                new_head.row, new_head.col, state.score
            );
            return finish(state, 0, info, now);
        }

        info.ate_food = new_head == state.food;
        info.ate_bonus = state.bonus.food() == Some(new_head);

        if info.ate_food || info.ate_bonus {
            state.snake.grow(new_head);
        } else {
            state.snake.move_to(new_head);
        }

        let mut points = 0;

        if info.ate_bonus {
            points += state.bonus.reward(now, state.level);
            state.bonus.clear();
            debug!("Bonus eaten for {} points", points);
            self.respawn_food(state, &mut info);
        } else if state.bonus.is_expired(now) {
            state.bonus.clear();
            info.bonus_expired = true;
            debug!("Bonus expired");
            // Expiry also relocates the normal food, eaten or not
            self.respawn_food(state, &mut info);
        }

        if info.ate_food {
            points += state.level;
            state.eat_count += 1;
            debug!("Food eaten, {} so far", state.eat_count);
            self.respawn_food(state, &mut info);

            if BonusTimer::triggers_on(state.eat_count) && !state.is_over() {
                info.bonus_started = self.start_bonus(state, now);
            }
        }

        state.score += points;
        state.steps += 1;

        finish(state, points, info, now)
    }

    /// Place the normal food on a free cell, ending the round if none is left
    fn respawn_food(&mut self, state: &mut GameState, info: &mut StepInfo) {
        let mut occupied: HashSet<Position> = state.snake.occupied();
        occupied.extend(state.bonus.food());

        match self.spawner.spawn(&occupied, state.bounds) {
            Some(food) => {
                state.food = food;
                info.food_respawned = true;
            }
            None => {
                warn!(
                    "Board full with a {}-cell snake, score {}",
                    state.snake.len(),
                    state.score
                );
                state.phase = Phase::RoundOver(RoundEnd::BoardFull);
                info.round_end = Some(RoundEnd::BoardFull);
            }
        }
    }

    fn start_bonus(&mut self, state: &mut GameState, now: Instant) -> bool {
        if state.bonus.is_active() {
            return false;
        }

        let Some(food) = self.spawner.spawn(&state.occupied(), state.bounds) else {
            debug!("No room for a bonus food");
            return false;
        };

        let duration = BonusTimer::duration_for(state.bounds.width(), state.level);
        debug!("Bonus at ({}, {}) for {:?}", food.row, food.col, duration);
        state.bonus.activate(food, now, duration)
    }
}

/// Playing <-> Paused. A finished round stays finished.
fn toggle_pause(state: &mut GameState, now: Instant) {
    match state.phase {
        Phase::Playing => {
            state.phase = Phase::Paused;
            state.paused_at = Some(now);
        }
        Phase::Paused => {
            state.phase = Phase::Playing;
            if let Some(paused_at) = state.paused_at.take() {
                state.bonus.postpone(now.saturating_duration_since(paused_at));
            }
        }
        Phase::RoundOver(_) => {}
    }
}

fn finish(state: &GameState, points: u32, info: StepInfo, now: Instant) -> StepResult {
    StepResult {
        points,
        terminated: state.is_over(),
        info,
        frame: RenderFrame::capture(state, now),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Glyph;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::time::Duration;

    fn engine(level: u32) -> GameEngine<StdRng> {
        let config = GameConfig::new(40, 20).with_level(level);
        GameEngine::with_rng(config, StdRng::seed_from_u64(42)).unwrap()
    }

    fn bounds() -> GridBounds {
        GridBounds::new(20, 40).unwrap()
    }

    /// Head (10,20), tail (10,19), facing right, food out of the way
    fn round(level: u32) -> GameState {
        GameState::new(
            Snake::starting(Position::new(10, 20), Position::new(10, 19)),
            Direction::Right,
            Position::new(0, 0),
            bounds(),
            level,
        )
    }

    #[test]
    fn test_reset() {
        let mut engine = engine(1);
        let state = engine.reset().unwrap();

        assert!(state.is_playing());
        assert_eq!(state.score, 0);
        assert_eq!(state.steps, 0);
        assert_eq!(state.eat_count, 0);
        assert_eq!(state.direction, Direction::Right);
        assert_eq!(
            state.snake.segments(),
            &[Position::new(10, 20), Position::new(10, 19)]
        );
        assert!(!state.is_occupied_by_snake(state.food));
        assert!(!state.bonus.is_active());
    }

    #[test]
    fn test_engine_rejects_bad_config() {
        let err = GameEngine::new(GameConfig::new(0, 20)).err();
        assert_eq!(
            err,
            Some(GameError::InvalidBounds {
                height: 20,
                width: 0
            })
        );
    }

    #[test]
    fn test_engine_clamps_level() {
        let engine = GameEngine::with_rng(
            GameConfig::default().with_level(12),
            StdRng::seed_from_u64(0),
        )
        .unwrap();
        assert_eq!(engine.config().level, 8);
    }

    #[test]
    fn test_basic_movement() {
        let mut engine = engine(1);
        let mut state = round(1);

        let result = engine.step(&mut state, TickInput::none(), Instant::now());

        assert!(!result.terminated);
        assert!(!result.info.ate_food);
        assert_eq!(result.points, 0);
        assert_eq!(
            state.snake.segments(),
            &[Position::new(10, 21), Position::new(10, 20)]
        );
        assert_eq!(state.score, 0);
        assert_eq!(state.steps, 1);
        assert_eq!(result.frame.snake_len(), 2);
        assert_eq!(result.frame.phase, Phase::Playing);
    }

    #[test]
    fn test_food_consumption() {
        let mut engine = engine(1);
        let mut state = round(1);
        state.food = Position::new(10, 21);

        let result = engine.step(&mut state, TickInput::none(), Instant::now());

        assert!(result.info.ate_food);
        assert!(result.info.food_respawned);
        assert_eq!(result.points, 1);
        assert_eq!(state.score, 1);
        assert_eq!(state.eat_count, 1);
        assert_eq!(state.snake.len(), 3);
        assert_eq!(state.snake.head(), Position::new(10, 21));
        assert!(!state.is_occupied_by_snake(state.food));
        assert!(!state.bonus.is_active());
        assert!(!result.info.bonus_started);
    }

    #[test]
    fn test_food_scores_level() {
        let mut engine = engine(6);
        let mut state = round(6);
        state.food = Position::new(10, 21);

        engine.step(&mut state, TickInput::none(), Instant::now());
        assert_eq!(state.score, 6);
    }

    #[test]
    fn test_length_unchanged_without_food() {
        let mut engine = engine(1);
        let mut state = round(1);
        let now = Instant::now();

        for (i, turn) in [None, Some(Direction::Down), None, Some(Direction::Left)]
            .into_iter()
            .enumerate()
        {
            state.food = Position::new(0, 0);
            let input = TickInput {
                direction: turn,
                toggle_pause: false,
            };
            let result = engine.step(&mut state, input, now + Duration::from_millis(i as u64));
            assert!(!result.info.ate_food);
            assert_eq!(state.snake.len(), 2);
        }
    }

    #[test]
    fn test_wraps_across_edges() {
        let mut engine = engine(1);
        let mut state = round(1);
        state.snake = Snake::starting(Position::new(10, 39), Position::new(10, 38));

        engine.step(&mut state, TickInput::none(), Instant::now());
        assert_eq!(state.snake.head(), Position::new(10, 0));

        state.snake = Snake::starting(Position::new(0, 5), Position::new(1, 5));
        state.direction = Direction::Up;
        engine.step(&mut state, TickInput::none(), Instant::now());
        assert_eq!(state.snake.head(), Position::new(19, 5));
    }

    #[test]
    fn test_prevent_180_degree_turn() {
        let mut engine = engine(1);
        let mut state = round(1);

        engine.step(&mut state, Direction::Left.into(), Instant::now());

        assert_eq!(state.direction, Direction::Right);
        assert_eq!(state.snake.head(), Position::new(10, 21));
        assert!(state.is_playing());
    }

    #[test]
    fn test_turn_applies_same_tick() {
        let mut engine = engine(1);
        let mut state = round(1);

        engine.step(&mut state, Direction::Down.into(), Instant::now());

        assert_eq!(state.direction, Direction::Down);
        assert_eq!(state.snake.head(), Position::new(11, 20));
    }

    #[test]
    fn test_self_collision() {
        let mut engine = engine(1);
        let mut state = round(1);
        // Head at (5,5) heading left, body curls round above it
        state.snake = Snake::from_segments(vec![
            Position::new(5, 5),
            Position::new(5, 6),
            Position::new(4, 6),
            Position::new(4, 5),
            Position::new(4, 4),
        ]);
        state.direction = Direction::Left;
        state.score = 7;

        let result = engine.step(&mut state, Direction::Up.into(), Instant::now());

        assert!(result.terminated);
        assert_eq!(result.info.round_end, Some(RoundEnd::SelfCollision));
        assert_eq!(state.phase, Phase::RoundOver(RoundEnd::SelfCollision));
        assert_eq!(result.frame.score, 7);
        // Nothing was committed
        assert_eq!(state.snake.len(), 5);
        assert_eq!(state.snake.head(), Position::new(5, 5));
    }

    #[test]
    fn test_running_into_tail_ends_round() {
        let mut engine = engine(1);
        let mut state = round(1);
        state.snake = Snake::from_segments(vec![
            Position::new(5, 5),
            Position::new(5, 6),
            Position::new(4, 6),
            Position::new(4, 5),
        ]);
        state.direction = Direction::Left;

        let result = engine.step(&mut state, Direction::Up.into(), Instant::now());
        assert_eq!(result.info.round_end, Some(RoundEnd::SelfCollision));
    }

    #[test]
    fn test_terminated_game_no_update() {
        let mut engine = engine(1);
        let mut state = round(1);
        state.phase = Phase::RoundOver(RoundEnd::SelfCollision);
        let before = state.clone();

        let result = engine.step(&mut state, TickInput::pause(), Instant::now());

        assert!(result.terminated);
        assert_eq!(state, before);
    }

    #[test]
    fn test_bonus_starts_on_fifth_food() {
        let mut engine = engine(1);
        let mut state = round(1);
        let now = Instant::now();

        for expected in 1..=5 {
            state.food = state.snake.head().moved_by(0, 1);
            let result = engine.step(&mut state, TickInput::none(), now);
            assert_eq!(state.eat_count, expected);
            assert_eq!(result.info.bonus_started, expected == 5);
        }

        let BonusTimer::Active { food, duration, started_at } = state.bonus else {
            panic!("bonus should be active");
        };
        assert_eq!(duration, BonusTimer::duration_for(40, 1));
        assert_eq!(duration, Duration::from_secs_f64(40.0 * 0.15 * 8.0));
        assert_eq!(started_at, now);
        assert_ne!(food, state.food);
        assert!(!state.is_occupied_by_snake(food));
    }

    #[test]
    fn test_bonus_not_rearmed_while_active() {
        let mut engine = engine(1);
        let mut state = round(1);
        let now = Instant::now();
        let original = BonusTimer::Active {
            food: Position::new(0, 39),
            started_at: now,
            duration: Duration::from_secs(48),
        };
        state.bonus = original;
        state.eat_count = 9;
        state.food = Position::new(10, 21);

        let result = engine.step(&mut state, TickInput::none(), now + Duration::from_secs(1));

        assert_eq!(state.eat_count, 10);
        assert!(!result.info.bonus_started);
        assert_eq!(state.bonus, original);
    }

    #[test]
    fn test_eating_bonus() {
        let mut engine = engine(1);
        let mut state = round(1);
        let now = Instant::now();
        state.bonus = BonusTimer::Active {
            food: Position::new(10, 21),
            started_at: now,
            duration: Duration::from_secs(48),
        };

        let result = engine.step(&mut state, TickInput::none(), now + Duration::from_secs(8));

        assert!(result.info.ate_bonus);
        assert!(!result.info.ate_food);
        // 10 * floor((48 - 8) * 1)
        assert_eq!(result.points, 400);
        assert_eq!(state.score, 400);
        assert_eq!(state.eat_count, 0);
        assert_eq!(state.snake.len(), 3);
        assert!(!state.bonus.is_active());
        assert!(result.frame.bonus_remaining.is_none());
    }

    #[test]
    fn test_late_bonus_scores_nothing() {
        let mut engine = engine(2);
        let mut state = round(2);
        let now = Instant::now();
        state.bonus = BonusTimer::Active {
            food: Position::new(10, 21),
            started_at: now,
            duration: Duration::from_secs(5),
        };

        // Eaten on the very tick it runs out
        let result = engine.step(&mut state, TickInput::none(), now + Duration::from_secs(5));
        assert!(result.info.ate_bonus);
        assert_eq!(result.points, 0);
        assert!(!state.bonus.is_active());
    }

    #[test]
    fn test_respawn_on_bonus_expiry_even_though_food_unchanged() {
        let mut engine = engine(1);
        let mut state = round(1);
        let now = Instant::now();
        state.bonus = BonusTimer::Active {
            food: Position::new(0, 39),
            started_at: now,
            duration: Duration::from_secs(6),
        };

        let result = engine.step(&mut state, TickInput::none(), now + Duration::from_secs(6));

        assert!(result.info.bonus_expired);
        assert!(result.info.food_respawned);
        assert!(!result.info.ate_food);
        assert_eq!(result.points, 0);
        assert!(!state.bonus.is_active());
        assert_eq!(state.snake.len(), 2);
        assert!(!state.is_occupied_by_snake(state.food));
    }

    #[test]
    fn test_pause_freezes_round_and_bonus() {
        let mut engine = engine(1);
        let mut state = round(1);
        let now = Instant::now();
        state.bonus = BonusTimer::Active {
            food: Position::new(0, 39),
            started_at: now,
            duration: Duration::from_secs(10),
        };

        let result = engine.step(&mut state, TickInput::pause(), now + Duration::from_secs(2));
        assert_eq!(result.frame.phase, Phase::Paused);
        assert_eq!(state.snake.head(), Position::new(10, 20));

        // Turns while paused are dropped
        engine.step(&mut state, Direction::Down.into(), now + Duration::from_secs(5));
        assert_eq!(state.direction, Direction::Right);
        assert_eq!(state.snake.head(), Position::new(10, 20));

        // Resume 9s after the bonus started: only 2s of it have counted
        let result = engine.step(&mut state, TickInput::pause(), now + Duration::from_secs(9));
        assert!(state.is_playing());
        assert!(!result.info.bonus_expired);
        assert!(state.bonus.is_active());
        assert_eq!(state.snake.head(), Position::new(10, 21));
        let left = result.frame.bonus_remaining.unwrap();
        assert!((left - 0.8).abs() < 1e-9);
    }

    #[test]
    fn test_board_full_ends_round() {
        let config = GameConfig::new(3, 1);
        let mut engine = GameEngine::with_rng(config, StdRng::seed_from_u64(3)).unwrap();
        let mut state = GameState::new(
            Snake::starting(Position::new(0, 1), Position::new(0, 0)),
            Direction::Right,
            Position::new(0, 2),
            GridBounds::new(1, 3).unwrap(),
            1,
        );

        let result = engine.step(&mut state, TickInput::none(), Instant::now());

        assert!(result.info.ate_food);
        assert!(result.terminated);
        assert_eq!(result.info.round_end, Some(RoundEnd::BoardFull));
        assert_eq!(state.phase, Phase::RoundOver(RoundEnd::BoardFull));
        assert_eq!(state.score, 1);
        assert_eq!(state.snake.len(), 3);
    }

    #[test]
    fn test_score_never_decreases() {
        let mut engine = engine(3);
        let mut state = engine.reset().unwrap();
        let mut turns = StdRng::seed_from_u64(9);
        let start = Instant::now();
        let directions = [Direction::Up, Direction::Down, Direction::Left, Direction::Right];

        let mut last = 0;
        for tick in 0..2_000u64 {
            // Random turns every third tick; reversals are simply ignored
            let input = if tick % 3 == 0 {
                TickInput::from(directions[turns.gen_range(0..4)])
            } else {
                TickInput::none()
            };
            let result = engine.step(&mut state, input, start + Duration::from_millis(tick * 150));

            assert!(state.score >= last);
            last = state.score;
            assert!(
                result
                    .frame
                    .snake
                    .iter()
                    .all(|cell| cell.glyph != Glyph::Segment),
                "fallback glyph drawn for {:?}",
                state.snake.segments()
            );

            if result.terminated {
                break;
            }
        }
    }
}
