//! Per-cell animation state machine and kinematics.

use std::f32::consts::TAU;

use reelspin_core::{
    AnimationState, CellCoord, CellIndex, CellSnapshot, Event, Kinematics, Point, SymbolId,
};

/// Rotation speed of a winning cell, in radians per second.
pub(crate) const WINNING_SPIN_RATE: f32 = 6.0;

/// Stimulus that may move a cell between animation states.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum CellTrigger {
    /// External request to enter the provided state.
    Request(AnimationState),
    /// The entry motion reached or passed the rest position.
    CrossedRest,
}

/// Pose a cell adopts when a transition fires.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Pose {
    /// Zero offset, rotation and velocity.
    Rest,
    /// Zero rotation and velocity, offset above the visible frame.
    OffScreen,
    /// Leave the pose untouched.
    Keep,
}

/// Outcome of looking up a `(state, trigger)` pair in the transition table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Transition {
    pub(crate) next: AnimationState,
    pub(crate) pose: Pose,
    pub(crate) settled: bool,
}

impl Transition {
    const fn to(next: AnimationState, pose: Pose) -> Self {
        Self {
            next,
            pose,
            settled: false,
        }
    }
}

/// Transition table of the cell state machine.
///
/// Requests are honoured from every state. `CrossedRest` only has an effect
/// while entering, where it lands the cell and reports it as settled.
pub(crate) const fn transition(state: AnimationState, trigger: CellTrigger) -> Transition {
    match (state, trigger) {
        (_, CellTrigger::Request(AnimationState::Idle)) => {
            Transition::to(AnimationState::Idle, Pose::Rest)
        }
        (_, CellTrigger::Request(AnimationState::Entry)) => {
            Transition::to(AnimationState::Entry, Pose::OffScreen)
        }
        (_, CellTrigger::Request(AnimationState::Exit)) => {
            Transition::to(AnimationState::Exit, Pose::Rest)
        }
        (_, CellTrigger::Request(AnimationState::Winning)) => {
            Transition::to(AnimationState::Winning, Pose::Rest)
        }
        (AnimationState::Entry, CellTrigger::CrossedRest) => Transition {
            next: AnimationState::Idle,
            pose: Pose::Rest,
            settled: true,
        },
        (
            AnimationState::Idle | AnimationState::Exit | AnimationState::Winning,
            CellTrigger::CrossedRest,
        ) => Transition::to(state, Pose::Keep),
    }
}

#[derive(Clone, Debug)]
pub(crate) struct Cell {
    index: CellIndex,
    coord: CellCoord,
    state: AnimationState,
    symbol: SymbolId,
    default_position: Point,
    offset: Point,
    rotation: f32,
    velocity: f32,
    kinematics: Kinematics,
    entry_distance: f32,
}

impl Cell {
    pub(crate) fn new(
        index: CellIndex,
        coord: CellCoord,
        kinematics: Kinematics,
        entry_distance: f32,
    ) -> Self {
        Self {
            index,
            coord,
            state: AnimationState::Idle,
            symbol: SymbolId::new(0),
            default_position: Point::ZERO,
            offset: Point::ZERO,
            rotation: 0.0,
            velocity: 0.0,
            kinematics,
            entry_distance,
        }
    }

    pub(crate) fn coord(&self) -> CellCoord {
        self.coord
    }

    pub(crate) fn state(&self) -> AnimationState {
        self.state
    }

    pub(crate) fn symbol(&self) -> SymbolId {
        self.symbol
    }

    pub(crate) fn set_symbol(&mut self, symbol: SymbolId) {
        self.symbol = symbol;
    }

    pub(crate) fn set_default_position(&mut self, position: Point) {
        self.default_position = position;
    }

    /// Requests a transition into `state`, reporting the change.
    pub(crate) fn enter(&mut self, state: AnimationState, out: &mut Vec<Event>) {
        self.fire(CellTrigger::Request(state), out);
    }

    /// Advances the cell's animation by `dt` seconds.
    pub(crate) fn update(&mut self, dt: f32, out: &mut Vec<Event>) {
        match self.state {
            AnimationState::Idle => {}
            AnimationState::Entry => {
                self.accelerate(dt);
                let next_offset = self.offset.y + self.velocity * dt;
                if next_offset >= 0.0 {
                    self.fire(CellTrigger::CrossedRest, out);
                } else {
                    self.offset.y = next_offset;
                }
            }
            AnimationState::Exit => {
                self.accelerate(dt);
                self.offset.y += self.velocity * dt;
            }
            AnimationState::Winning => {
                self.rotation = (self.rotation + dt * WINNING_SPIN_RATE).rem_euclid(TAU);
            }
        }
    }

    pub(crate) fn snapshot(&self) -> CellSnapshot {
        CellSnapshot {
            index: self.index,
            coord: self.coord,
            state: self.state,
            symbol: self.symbol,
            default_position: self.default_position,
            offset: self.offset,
            rotation: self.rotation,
            velocity: self.velocity,
        }
    }

    fn fire(&mut self, trigger: CellTrigger, out: &mut Vec<Event>) {
        let from = self.state;
        let Transition {
            next,
            pose,
            settled,
        } = transition(from, trigger);

        match pose {
            Pose::Rest => {
                self.rotation = 0.0;
                self.offset = Point::ZERO;
                self.velocity = 0.0;
            }
            Pose::OffScreen => {
                self.rotation = 0.0;
                self.offset = Point::new(0.0, -self.entry_distance);
                self.velocity = 0.0;
            }
            Pose::Keep => return,
        }

        self.state = next;
        out.push(Event::AnimationStateChanged {
            cell: self.index,
            from,
            to: next,
        });
        if settled {
            out.push(Event::CellSettled { cell: self.index });
        }
    }

    fn accelerate(&mut self, dt: f32) {
        let accelerated = self.velocity + self.kinematics.acceleration * dt;
        self.velocity = accelerated.clamp(0.0, self.kinematics.max_velocity.max(0.0));
    }
}
