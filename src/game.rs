use std::collections::HashSet;

use log::{debug, info};
use rand::{rngs::ThreadRng, Rng};

use crate::{Coords, TermInt};
use crate::settings::Difficulty;
use crate::snake::{Crash, Direction, MoveResult, Snake};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    Moved,
    Ate,
    Crashed(Crash),
}

/// Everything one game session mutates. Owned by the engine and only ever
/// touched from its thread.
pub struct GameState<R = ThreadRng> {
    rng: R,
    width: TermInt,
    height: TermInt,
    difficulty: Difficulty,
    snake: Snake,
    food: HashSet<Coords>,
    score: u32,
    paused: bool,
    game_over: bool,
}

impl GameState<ThreadRng> {
    pub fn new(size: (TermInt, TermInt), difficulty: Difficulty) -> Self {
        GameState::with_rng(size, difficulty, rand::thread_rng())
    }
}

impl<R: Rng> GameState<R> {
    pub fn with_rng((width, height): (TermInt, TermInt), difficulty: Difficulty, rng: R) -> Self {
        let mut state = GameState {
            rng,
            width,
            height,
            difficulty,
            snake: Snake::new((width / 2, height / 2), Direction::Right),
            food: HashSet::new(),
            score: 0,
            paused: false,
            game_over: false,
        };
        state.reset();
        state
    }

    /// Back to a single segment in the middle of the board, heading right,
    /// with a full set of food.
    pub fn reset(&mut self) {
        self.snake = Snake::new((self.width / 2, self.height / 2), Direction::Right);
        self.score = 0;
        self.paused = false;
        self.game_over = false;
        self.food.clear();

        for _ in 0..self.difficulty.food_count() {
            self.place_food();
        }

        info!("new game on a {}x{} board, difficulty {}", self.width, self.height, self.difficulty);
    }

    /// One tick of movement. Once the game is over the board is frozen until
    /// the next reset.
    pub fn advance(&mut self) -> Option<StepOutcome> {
        if self.game_over {
            return None;
        }

        match self.snake.move_step(self.width, self.height, &self.food) {
            MoveResult::Crashed(crash) => {
                info!(
                    "snake crashed ({:?}) at {:?} with length {}, score {}",
                    crash, self.snake.head(), self.snake.len(), self.score
                );
                self.game_over = true;
                Some(StepOutcome::Crashed(crash))
            }
            MoveResult::Moved { new_head, old_tail: None } => {
                self.food.remove(&new_head);
                self.score += 1;
                debug!("ate food at {:?}, score {}", new_head, self.score);
                self.place_food();
                Some(StepOutcome::Ate)
            }
            MoveResult::Moved { .. } => Some(StepOutcome::Moved),
        }
    }

    /// Picks a random free cell by rejection sampling. There is no guard for
    /// a full board: every preset leaves far more free cells than the snake
    /// can realistically fill.
    pub fn place_food(&mut self) -> Coords {
        loop {
            let pos = (self.rng.gen_range(0..self.width), self.rng.gen_range(0..self.height));
            if !self.snake.contains(&pos) && !self.food.contains(&pos) {
                self.food.insert(pos);
                debug!("placed food at {:?}", pos);
                return pos;
            }
        }
    }

    /// Returns whether the new direction was taken; exact reversals are not.
    pub fn set_direction(&mut self, direction: Direction) -> bool {
        self.snake.set_direction(direction)
    }

    pub fn toggle_pause(&mut self) -> bool {
        self.paused = !self.paused;
        self.paused
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn food(&self) -> &HashSet<Coords> {
        &self.food
    }

    pub fn direction(&self) -> Direction {
        self.snake.get_direction()
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn size(&self) -> (TermInt, TermInt) {
        (self.width, self.height)
    }

    #[cfg(test)]
    pub fn set_food(&mut self, food: &[Coords]) {
        self.food = food.iter().copied().collect();
    }

    #[cfg(test)]
    pub fn set_snake(&mut self, snake: Snake) {
        self.snake = snake;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn create_state(difficulty: Difficulty) -> GameState<StdRng> {
        GameState::with_rng((20, 10), difficulty, StdRng::seed_from_u64(42))
    }

    fn assert_food_disjoint(state: &GameState<StdRng>) {
        for pos in state.food() {
            assert!(!state.snake().contains(pos), "food {:?} on the snake", pos);
        }
    }

    #[test]
    fn test_new_state_is_reset() {
        let state = create_state(Difficulty::Hard);
        assert_eq!(state.snake().len(), 1);
        assert_eq!(state.snake().head(), (10, 5));
        assert_eq!(state.direction(), Direction::Right);
        assert_eq!(state.score(), 0);
        assert_eq!(state.food().len(), 3);
        assert!(!state.is_paused());
        assert!(!state.is_game_over());
        assert_food_disjoint(&state);
    }

    #[test]
    fn test_three_ticks_move_right() {
        let mut state = create_state(Difficulty::Easy);
        state.set_food(&[(0, 0)]);

        for _ in 0..3 {
            assert_eq!(state.advance(), Some(StepOutcome::Moved));
        }

        assert_eq!(state.snake().head(), (13, 5));
        assert_eq!(state.snake().len(), 1);
        assert_eq!(state.score(), 0);
    }

    #[test]
    fn test_eating_grows_and_replenishes() {
        let mut state = create_state(Difficulty::Medium);
        state.set_food(&[(11, 5), (0, 0)]);

        assert_eq!(state.advance(), Some(StepOutcome::Ate));

        assert_eq!(state.score(), 1);
        assert_eq!(state.snake().len(), 2);
        assert_eq!(state.food().len(), 2);
        assert!(state.food().contains(&(0, 0)));
        assert!(!state.food().contains(&(11, 5)));
        assert_food_disjoint(&state);
    }

    #[test]
    fn test_length_and_score_over_many_ticks() {
        let mut state = create_state(Difficulty::Hard);
        state.set_food(&[(11, 5), (12, 5), (0, 9)]);

        let mut len = state.snake().len();
        let mut score = state.score();
        for _ in 0..5 {
            match state.advance() {
                Some(StepOutcome::Ate) => {
                    assert_eq!(state.snake().len(), len + 1);
                    assert_eq!(state.score(), score + 1);
                }
                Some(StepOutcome::Moved) => {
                    assert_eq!(state.snake().len(), len);
                    assert_eq!(state.score(), score);
                }
                other => panic!("unexpected outcome {:?}", other),
            }
            assert_eq!(state.food().len(), 3);
            assert_food_disjoint(&state);
            len = state.snake().len();
            score = state.score();
        }
        assert!(state.score() >= 2);
    }

    #[test]
    fn test_left_wall_ends_game() {
        let mut state = create_state(Difficulty::Easy);
        state.set_snake(Snake::new((0, 5), Direction::Up));
        state.set_food(&[(19, 9)]);
        assert!(state.set_direction(Direction::Left));

        assert_eq!(state.advance(), Some(StepOutcome::Crashed(Crash::Wall)));
        assert!(state.is_game_over());
    }

    #[test]
    fn test_no_mutation_after_game_over() {
        let mut state = create_state(Difficulty::Easy);
        state.set_snake(Snake::new((19, 0), Direction::Right));
        state.set_food(&[(0, 9)]);
        state.advance();
        assert!(state.is_game_over());

        assert_eq!(state.advance(), None);
        assert_eq!(state.snake().head(), (19, 0));
        assert_eq!(state.food().len(), 1);
    }

    #[test]
    fn test_self_collision_ends_game_and_freezes_board() {
        let mut state = create_state(Difficulty::Medium);
        let body = vec![(5, 5), (6, 5), (6, 6), (5, 6), (4, 6), (4, 5)];
        state.set_snake(Snake::from_body(body.clone(), Direction::Down));
        state.set_food(&[(0, 0), (19, 9)]);

        assert_eq!(state.advance(), Some(StepOutcome::Crashed(Crash::OwnBody)));
        assert!(state.is_game_over());
        assert_eq!(state.score(), 0);

        state.set_direction(Direction::Right);
        for _ in 0..3 {
            assert_eq!(state.advance(), None);
        }

        assert_eq!(state.snake().head(), (5, 5));
        assert_eq!(state.snake().len(), body.len());
        for pos in body.iter() {
            assert!(state.snake().contains(pos));
        }
        assert_eq!(state.food().len(), 2);
    }

    #[test]
    fn test_reset_after_game_over() {
        let mut state = create_state(Difficulty::Medium);
        state.set_snake(Snake::new((19, 0), Direction::Right));
        state.advance();
        state.toggle_pause();
        assert!(state.is_game_over());

        state.reset();

        assert!(!state.is_game_over());
        assert!(!state.is_paused());
        assert_eq!(state.snake().len(), 1);
        assert_eq!(state.snake().head(), (10, 5));
        assert_eq!(state.score(), 0);
        assert_eq!(state.food().len(), 2);
    }

    #[test]
    fn test_place_food_avoids_occupied_cells() {
        let mut state = GameState::with_rng((3, 1), Difficulty::Easy, StdRng::seed_from_u64(7));
        state.set_snake(Snake::new((1, 0), Direction::Right));
        state.set_food(&[(0, 0)]);

        assert_eq!(state.place_food(), (2, 0));
        assert_eq!(state.food().len(), 2);
    }
}
