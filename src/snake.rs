use std::collections::{HashSet, VecDeque};

use crate::{Coords, TermInt};
use Direction::*;
use MoveResult::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right
}

impl Direction {
    pub fn opposite(self) -> Direction {
        match self {
            Up => Down,
            Down => Up,
            Left => Right,
            Right => Left,
        }
    }

    pub fn is_opposite(self, other: Direction) -> bool {
        self.opposite() == other
    }

    /// The cell one step away from `pos`, or `None` if it would leave a
    /// `width` x `height` board.
    pub fn step(self, pos: Coords, width: TermInt, height: TermInt) -> Option<Coords> {
        let (x, y) = pos;
        match self {
            Up => y.checked_sub(1).map(|y| (x, y)),
            Down => Some((x, y + 1)).filter(|&(_, y)| y < height),
            Left => x.checked_sub(1).map(|x| (x, y)),
            Right => Some((x + 1, y)).filter(|&(x, _)| x < width),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Crash {
    Wall,
    OwnBody,
}

#[derive(Debug, PartialEq, Eq)]
pub enum MoveResult {
    /// `old_tail` is `None` when the snake grew on this step.
    Moved { new_head: Coords, old_tail: Option<Coords> },
    Crashed(Crash)
}

#[derive(Clone, Debug)]
pub struct Snake {
    body: VecDeque<Coords>,
    direction: Direction,
}

impl Snake {
    pub fn new(pos: Coords, direction: Direction) -> Self {
        Snake { body: VecDeque::from(vec![pos]), direction }
    }

    pub fn head(&self) -> Coords {
        self.body[0]
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn contains(&self, pos: &Coords) -> bool {
        self.body.contains(pos)
    }

    /// Moves one cell in the current direction. The snake grows when the new
    /// head lands on `food`. The cell the tail leaves on this same step is
    /// not an obstacle, unless the snake grows and the tail stays put.
    pub fn move_step(&mut self, width: TermInt, height: TermInt, food: &HashSet<Coords>) -> MoveResult {
        let new_head = match self.direction.step(self.head(), width, height) {
            Some(pos) => pos,
            None => return Crashed(Crash::Wall),
        };

        let grows = food.contains(&new_head);
        let tail = self.body[self.body.len() - 1];

        if self.body.contains(&new_head) && (grows || new_head != tail) {
            return Crashed(Crash::OwnBody);
        }

        let old_tail = if grows { None } else { self.body.pop_back() };
        self.body.push_front(new_head);

        Moved { new_head, old_tail }
    }

    /// Opposite directions are refused; returns whether the direction was
    /// applied.
    pub fn set_direction(&mut self, new_direction: Direction) -> bool {
        if new_direction.is_opposite(self.direction) {
            return false;
        }
        self.direction = new_direction;
        true
    }

    pub fn get_direction(&self) -> Direction {
        self.direction
    }

    #[cfg(test)]
    pub fn from_body(body: Vec<Coords>, direction: Direction) -> Self {
        Snake { body: VecDeque::from(body), direction }
    }
}
