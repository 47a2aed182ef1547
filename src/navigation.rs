//! Player navigation over a generated grid.
//!
//! This module contains the [`NavigationController`], the only owner of the player's grid
//! position. A move is validated against the grid, committed immediately and then animated over a
//! fixed duration advanced by [`NavigationController::tick`]. While a move is animating, or once the
//! controller is locked by a finished game, further requests are dropped rather than queued.
//!
//! Every accepted move produces exactly one [`MoveEvent::Started`] and, once its transition ends,
//! exactly one [`MoveEvent::Completed`]. Events are queued in order and handed to whoever drains
//! them, so the controller never needs to know its listeners.

use std::{collections::VecDeque, time::Duration};

use log::trace;

use crate::grid::{Coordinate, Direction, Grid};

/// Reason a move request was turned down.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rejection {
    /// The target cell is a wall or lies outside the board.
    Blocked,
    /// A previous move is still animating.
    Busy,
    /// The game has ended and the controller no longer accepts moves.
    Locked,
}

/// Outcome of a move request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveResult {
    /// The move was committed and its transition has started.
    Accepted {
        /// Cell the player left.
        from: Coordinate,
        /// Cell the player is now on.
        to: Coordinate,
    },
    /// The request was ignored; position and event queue are unchanged.
    Rejected(Rejection),
}

impl MoveResult {
    /// Returns whether the move was accepted.
    #[must_use]
    pub const fn is_accepted(self) -> bool {
        matches!(self, Self::Accepted { .. })
    }
}

/// Notification produced by the controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveEvent {
    /// A move towards the given cell was accepted.
    Started(Coordinate),
    /// The transition onto the given cell has finished.
    Completed(Coordinate),
}

/// Receiver of movement notifications.
pub trait MoveListener {
    /// Called when a move towards `target` starts.
    fn on_move_start(&mut self, target: Coordinate);

    /// Called once the player has settled on `position`.
    fn on_move_complete(&mut self, position: Coordinate);
}

/// Animated move between two neighboring cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Transition {
    /// Cell the move started from.
    from: Coordinate,
    /// Cell the move ends on.
    to: Coordinate,
    /// Time spent so far.
    elapsed: Duration,
    /// Total length of the move.
    duration: Duration,
}

impl Transition {
    /// Returns the cell the move started from.
    #[must_use]
    pub const fn from(&self) -> Coordinate {
        self.from
    }

    /// Returns the cell the move ends on.
    #[must_use]
    pub const fn to(&self) -> Coordinate {
        self.to
    }

    /// Returns the completed fraction of the move, between `0.0` and `1.0`.
    #[must_use]
    pub fn progress(&self) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }

        (self.elapsed.as_secs_f64() / self.duration.as_secs_f64()).clamp(0.0, 1.0)
    }

    /// Returns the interpolated `(col, row)` position of the player in grid units.
    #[must_use]
    pub fn position(&self) -> (f64, f64) {
        let progress = self.progress();
        let lerp = |from: usize, to: usize| {
            let (from, to) = (index_to_f64(from), index_to_f64(to));
            (to - from).mul_add(progress, from)
        };

        (lerp(self.from.col, self.to.col), lerp(self.from.row, self.to.row))
    }

    /// Returns whether the full duration has elapsed.
    fn is_finished(&self) -> bool {
        self.elapsed >= self.duration
    }
}

/// Converts a grid index to a floating point value.
#[expect(
    clippy::cast_precision_loss,
    reason = "Grid indices stay far below the 2^52 limit of exact f64 integers."
)]
fn index_to_f64(value: usize) -> f64 {
    value as f64
}

/// Owner of the player's grid position.
#[derive(Clone, Debug)]
pub struct NavigationController {
    /// Logical cell of the player, updated as soon as a move is accepted.
    position: Coordinate,
    /// Move in flight, if any.
    transition: Option<Transition>,
    /// Length given to every transition.
    move_duration: Duration,
    /// Set once the game has ended.
    locked: bool,
    /// Events not yet drained by a listener.
    events: VecDeque<MoveEvent>,
}

impl NavigationController {
    /// Builds an idle controller standing on `start`.
    #[must_use]
    pub const fn new(start: Coordinate, move_duration: Duration) -> Self {
        Self {
            position: start,
            transition: None,
            move_duration,
            locked: false,
            events: VecDeque::new(),
        }
    }

    /// Returns the player's logical position.
    #[must_use]
    pub const fn current_position(&self) -> Coordinate {
        self.position
    }

    /// Returns whether a move is still animating.
    #[must_use]
    pub const fn is_busy(&self) -> bool {
        self.transition.is_some()
    }

    /// Returns whether the controller refuses every move.
    #[must_use]
    pub const fn is_locked(&self) -> bool {
        self.locked
    }

    /// Refuses every further move request. A move already in flight still completes.
    pub fn lock(&mut self) {
        self.locked = true;
    }

    /// Accepts move requests again.
    pub fn unlock(&mut self) {
        self.locked = false;
    }

    /// Returns the move in flight, if any.
    #[must_use]
    pub const fn transition(&self) -> Option<&Transition> {
        self.transition.as_ref()
    }

    /// Tries to move the player one cell in `direction`.
    ///
    /// Walking into a wall or off the board is a silent no-op. So is any request made while the
    /// previous move is animating or after the controller has been locked.
    pub fn request_move(&mut self, grid: &Grid, direction: Direction) -> MoveResult {
        if self.locked {
            return MoveResult::Rejected(Rejection::Locked);
        }
        if self.transition.is_some() {
            return MoveResult::Rejected(Rejection::Busy);
        }

        let from = self.position;
        let Some(to) = from.step(direction).filter(|&cell| grid.is_walkable(cell)) else {
            trace!("move {direction:?} from {from} blocked");
            return MoveResult::Rejected(Rejection::Blocked);
        };

        self.position = to;
        self.transition = Some(Transition {
            from,
            to,
            elapsed: Duration::ZERO,
            duration: self.move_duration,
        });
        self.events.push_back(MoveEvent::Started(to));

        MoveResult::Accepted { from, to }
    }

    /// Advances the move in flight by `delta`, completing it once its duration has elapsed.
    pub fn tick(&mut self, delta: Duration) {
        let Some(transition) = self.transition.as_mut() else {
            return;
        };

        transition.elapsed = transition.elapsed.saturating_add(delta);
        if transition.is_finished() {
            let target = transition.to;
            self.transition = None;
            self.events.push_back(MoveEvent::Completed(target));
        }
    }

    /// Removes and returns the queued events in the order they happened.
    pub fn drain_events(&mut self) -> impl Iterator<Item = MoveEvent> + '_ {
        self.events.drain(..)
    }

    /// Delivers the queued events to a listener in order.
    pub fn dispatch<L: MoveListener + ?Sized>(&mut self, listener: &mut L) {
        for event in self.events.drain(..) {
            match event {
                MoveEvent::Started(target) => listener.on_move_start(target),
                MoveEvent::Completed(position) => listener.on_move_complete(position),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{generator::MazeGenerator, grid::CellKind, pathfinding};

    /// Length of every test move.
    const STEP: Duration = Duration::from_millis(200);

    /// Corridor with a side branch, used by most controller tests.
    const HALL: &str = "\
#######
#....P#
#.#####
#S#####
#######";

    /// Listener recording every notification it receives.
    #[derive(Default)]
    struct Recorder {
        /// Targets of started moves.
        started: Vec<Coordinate>,
        /// Positions of completed moves.
        completed: Vec<Coordinate>,
    }

    impl MoveListener for Recorder {
        fn on_move_start(&mut self, target: Coordinate) {
            self.started.push(target);
        }

        fn on_move_complete(&mut self, position: Coordinate) {
            self.completed.push(position);
        }
    }

    /// Parses the shared test grid.
    fn hall() -> Grid {
        HALL.parse().expect("hall grid should parse")
    }

    #[test]
    fn test_move_into_wall_is_silent() {
        let grid = hall();
        let mut controller = NavigationController::new(Grid::START, STEP);

        let result = controller.request_move(&grid, Direction::North);

        assert_eq!(result, MoveResult::Rejected(Rejection::Blocked));
        assert_eq!(controller.current_position(), Grid::START);
        assert!(!controller.is_busy());
        assert_eq!(controller.drain_events().count(), 0, "no events for a blocked move");

        controller.tick(STEP);
        assert_eq!(controller.drain_events().count(), 0);
    }

    #[test]
    fn test_move_off_board_is_silent() {
        let grid = hall();
        let mut controller = NavigationController::new(Coordinate::new(0, 0), STEP);

        assert_eq!(
            controller.request_move(&grid, Direction::West),
            MoveResult::Rejected(Rejection::Blocked)
        );
        assert_eq!(controller.current_position(), Coordinate::new(0, 0));
    }

    #[test]
    fn test_accepted_move_updates_position_then_completes() {
        let grid = hall();
        let mut controller = NavigationController::new(Grid::START, STEP);

        let result = controller.request_move(&grid, Direction::East);

        assert_eq!(
            result,
            MoveResult::Accepted {
                from: Grid::START,
                to: Coordinate::new(2, 1)
            }
        );
        assert_eq!(controller.current_position(), Coordinate::new(2, 1));
        assert!(controller.is_busy());
        assert_eq!(
            controller.drain_events().collect::<Vec<_>>(),
            vec![MoveEvent::Started(Coordinate::new(2, 1))]
        );

        controller.tick(Duration::from_millis(120));
        assert!(controller.is_busy(), "the move lasts the full duration");
        assert_eq!(controller.drain_events().count(), 0);

        controller.tick(Duration::from_millis(80));
        assert!(!controller.is_busy());
        assert_eq!(
            controller.drain_events().collect::<Vec<_>>(),
            vec![MoveEvent::Completed(Coordinate::new(2, 1))]
        );

        controller.tick(STEP);
        assert_eq!(
            controller.drain_events().count(),
            0,
            "completion is delivered exactly once"
        );
    }

    #[test]
    fn test_no_move_stacking() {
        let grid = hall();
        let mut controller = NavigationController::new(Grid::START, STEP);

        assert!(controller
            .request_move(&grid, Direction::East)
            .is_accepted());
        assert!(controller.is_busy());
        assert_eq!(
            controller.request_move(&grid, Direction::East),
            MoveResult::Rejected(Rejection::Busy)
        );
        assert_eq!(
            controller.request_move(&grid, Direction::West),
            MoveResult::Rejected(Rejection::Busy)
        );

        controller.tick(STEP);

        let mut recorder = Recorder::default();
        controller.dispatch(&mut recorder);
        assert_eq!(recorder.started, vec![Coordinate::new(2, 1)]);
        assert_eq!(recorder.completed, vec![Coordinate::new(2, 1)]);
        assert_eq!(controller.current_position(), Coordinate::new(2, 1));
    }

    #[test]
    fn test_transition_interpolates() {
        let grid = hall();
        let mut controller = NavigationController::new(Grid::START, STEP);
        let _ = controller.request_move(&grid, Direction::South);

        let transition = *controller.transition().expect("a move should be in flight");
        assert_eq!(transition.from(), Grid::START);
        assert_eq!(transition.to(), Coordinate::new(1, 2));
        let (col, row) = transition.position();
        assert!((col - 1.0).abs() < 1e-9 && (row - 1.0).abs() < 1e-9);

        controller.tick(Duration::from_millis(100));
        let transition = controller.transition().expect("a move should be in flight");
        let (col, row) = transition.position();
        assert!((col - 1.0).abs() < 1e-9);
        assert!((row - 1.5).abs() < 1e-9, "half way after half the duration");
    }

    #[test]
    fn test_zero_duration_completes_on_next_tick() {
        let grid = hall();
        let mut controller = NavigationController::new(Grid::START, Duration::ZERO);

        assert!(controller
            .request_move(&grid, Direction::East)
            .is_accepted());
        assert!(controller.is_busy(), "completion waits for a tick");

        controller.tick(Duration::ZERO);
        assert!(!controller.is_busy());
    }

    #[test]
    fn test_lock_blocks_moves() {
        let grid = hall();
        let mut controller = NavigationController::new(Grid::START, STEP);
        controller.lock();

        assert!(controller.is_locked());
        assert_eq!(
            controller.request_move(&grid, Direction::East),
            MoveResult::Rejected(Rejection::Locked)
        );
        assert_eq!(controller.current_position(), Grid::START);

        controller.unlock();
        assert!(controller
            .request_move(&grid, Direction::East)
            .is_accepted());
    }

    #[test]
    fn test_lock_lets_move_in_flight_finish() {
        let grid = hall();
        let mut controller = NavigationController::new(Grid::START, STEP);
        let _ = controller.request_move(&grid, Direction::East);
        controller.lock();

        controller.tick(STEP);

        let mut recorder = Recorder::default();
        controller.dispatch(&mut recorder);
        assert_eq!(recorder.completed, vec![Coordinate::new(2, 1)]);
    }

    #[test]
    fn test_goal_cells_are_walkable() {
        let grid = hall();
        let mut controller = NavigationController::new(Grid::START, STEP);

        assert!(controller
            .request_move(&grid, Direction::South)
            .is_accepted());
        controller.tick(STEP);
        assert!(controller
            .request_move(&grid, Direction::South)
            .is_accepted());
        controller.tick(STEP);

        assert_eq!(
            grid.kind_at(controller.current_position()),
            CellKind::SecondaryGoal
        );
    }

    #[test]
    fn test_walk_generated_maze_to_primary_goal() {
        let grid = MazeGenerator::seeded(12)
            .generate(12)
            .expect("maze should generate");
        assert_eq!(grid.kind_at(Grid::START), CellKind::Open);

        let primary = grid
            .find_goal(CellKind::PrimaryGoal)
            .expect("primary goal should exist");
        let route = pathfinding::shortest_route(&grid, Grid::START, primary)
            .expect("primary goal should be reachable");

        let mut controller = NavigationController::new(Grid::START, STEP);
        let mut recorder = Recorder::default();

        for pair in route.windows(2) {
            let [from, to] = pair else {
                unreachable!("windows of two always hold two cells");
            };
            let dx = isize::try_from(to.col).expect("small index")
                - isize::try_from(from.col).expect("small index");
            let dy = isize::try_from(to.row).expect("small index")
                - isize::try_from(from.row).expect("small index");
            let direction = Direction::from_delta(dx, dy).expect("route steps are unit steps");

            assert_eq!(
                controller.request_move(&grid, direction),
                MoveResult::Accepted {
                    from: *from,
                    to: *to
                },
                "every step along the route should be accepted"
            );
            controller.tick(STEP);
            controller.dispatch(&mut recorder);
            assert_eq!(recorder.completed.last(), Some(to));
        }

        let expected: Vec<Coordinate> = route.iter().skip(1).copied().collect();
        assert_eq!(recorder.started, expected);
        assert_eq!(recorder.completed, expected, "one completion per step");
        assert_eq!(controller.current_position(), primary);
    }
}
