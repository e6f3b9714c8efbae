#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Spin choreography system that staggers cell transitions and gates re-entrant spins.
//!
//! A spin forces every cell to rest, then schedules each cell's exit and entry
//! on a [`DelayQueue`] staggered by row and column. Halfway through, the grid
//! is re-randomised once. The spin completes when the [`CompletionAggregator`]
//! has seen every cell settle, at which point the gate reopens and
//! `Command::CompleteSpin` hands the landed symbols to the rest of the engine.

mod aggregator;
mod random;
mod schedule;

use std::time::Duration;

use reelspin_core::{
    AnimationState, CellCoord, CellIndex, Command, Event, GridDimensions, RandomSource,
    SlotConfig, SymbolSnapshot,
};

pub use self::aggregator::{CompletionAggregator, SettleOutcome};
pub use self::random::{RngSource, ScriptedSource};
pub use self::schedule::DelayQueue;

/// Timing parameters required to construct the choreographer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    symbol_type_count: u32,
    row_start_delay: Duration,
    symbol_start_delay: Duration,
    spin_entry_delay: Duration,
}

impl Config {
    /// Creates a new configuration from explicit timing values.
    #[must_use]
    pub const fn new(
        symbol_type_count: u32,
        row_start_delay: Duration,
        symbol_start_delay: Duration,
        spin_entry_delay: Duration,
    ) -> Self {
        Self {
            symbol_type_count,
            row_start_delay,
            symbol_start_delay,
            spin_entry_delay,
        }
    }

    /// Extracts the choreography timings from a full slot configuration.
    #[must_use]
    pub fn from_slot(config: &SlotConfig) -> Self {
        Self::new(
            config.symbol_type_count,
            config.row_start_delay,
            config.symbol_start_delay,
            config.spin_entry_delay,
        )
    }

    /// Delay before the cell at `coord` starts its exit.
    #[must_use]
    pub fn stagger(&self, coord: CellCoord) -> Duration {
        self.row_start_delay
            .saturating_mul(coord.row())
            .saturating_add(self.symbol_start_delay.saturating_mul(coord.column()))
    }
}

/// Reentrancy guard that admits one spin at a time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SpinGate {
    /// No grid has been configured yet; spins are rejected.
    Unavailable,
    /// Ready to accept a spin.
    SpinIdle,
    /// A spin is in flight; further requests are rejected.
    Spinning,
}

/// State of the spin currently in flight.
#[derive(Clone, Debug)]
pub struct SpinSession {
    symbol_snapshot: Option<SymbolSnapshot>,
    completion: CompletionAggregator,
}

impl SpinSession {
    fn new(cell_count: usize) -> Self {
        Self {
            symbol_snapshot: None,
            completion: CompletionAggregator::new(cell_count),
        }
    }

    /// Symbols chosen for the entry phase, once the reshuffle has fired.
    #[must_use]
    pub fn symbol_snapshot(&self) -> Option<&SymbolSnapshot> {
        self.symbol_snapshot.as_ref()
    }

    /// Number of cells that have not settled yet.
    #[must_use]
    pub fn pending_settle_count(&self) -> usize {
        self.completion.pending()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ScheduledAction {
    SetState {
        cell: CellIndex,
        state: AnimationState,
    },
    Reshuffle,
}

/// Pure system that turns spin requests into staggered cell transitions.
#[derive(Debug)]
pub struct SpinChoreographer {
    config: Config,
    dimensions: Option<GridDimensions>,
    gate: SpinGate,
    queue: DelayQueue<ScheduledAction>,
    session: Option<SpinSession>,
    spins_accepted: u64,
}

impl SpinChoreographer {
    /// Creates a choreographer whose gate stays closed until a grid is configured.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            dimensions: None,
            gate: SpinGate::Unavailable,
            queue: DelayQueue::new(),
            session: None,
            spins_accepted: 0,
        }
    }

    /// Current state of the reentrancy gate.
    #[must_use]
    pub fn gate(&self) -> SpinGate {
        self.gate
    }

    /// Reports whether [`try_spin`](Self::try_spin) would accept a spin right now.
    #[must_use]
    pub fn can_spin(&self) -> bool {
        self.gate == SpinGate::SpinIdle
    }

    /// Spin currently in flight, if any.
    #[must_use]
    pub fn session(&self) -> Option<&SpinSession> {
        self.session.as_ref()
    }

    /// Number of spins accepted since construction.
    #[must_use]
    pub fn spins_accepted(&self) -> u64 {
        self.spins_accepted
    }

    /// Number of scheduled transitions that have not fired yet.
    #[must_use]
    pub fn scheduled(&self) -> usize {
        self.queue.len()
    }

    /// Starts a spin if the gate is idle, returning whether it was accepted.
    ///
    /// Rejected requests emit nothing. Transitions due immediately are emitted
    /// into `out` before returning.
    pub fn try_spin<R>(&mut self, random: &mut R, out: &mut Vec<Command>) -> bool
    where
        R: RandomSource + ?Sized,
    {
        let Some(dimensions) = self.dimensions else {
            tracing::debug!("spin rejected: grid not configured");
            return false;
        };
        if self.gate != SpinGate::SpinIdle {
            tracing::debug!(gate = ?self.gate, "spin rejected");
            return false;
        }

        self.gate = SpinGate::Spinning;
        self.session = Some(SpinSession::new(dimensions.cell_count()));
        self.spins_accepted = self.spins_accepted.saturating_add(1);
        tracing::debug!(spin = self.spins_accepted, "spin accepted");

        for coord in dimensions.coords() {
            let cell = dimensions.index(coord);
            out.push(Command::SetAnimationState {
                cell,
                state: AnimationState::Idle,
            });
            self.queue.schedule(
                self.config.stagger(coord),
                ScheduledAction::SetState {
                    cell,
                    state: AnimationState::Exit,
                },
            );
        }

        self.queue
            .schedule(self.config.spin_entry_delay, ScheduledAction::Reshuffle);

        for coord in dimensions.coords() {
            self.queue.schedule(
                self.config
                    .spin_entry_delay
                    .saturating_add(self.config.stagger(coord)),
                ScheduledAction::SetState {
                    cell: dimensions.index(coord),
                    state: AnimationState::Entry,
                },
            );
        }

        self.drain_due(random, out);
        true
    }

    /// Consumes world events, firing due transitions and tracking settles.
    pub fn handle<R>(&mut self, events: &[Event], random: &mut R, out: &mut Vec<Command>)
    where
        R: RandomSource + ?Sized,
    {
        for event in events {
            match event {
                Event::GridConfigured { dimensions } => {
                    self.dimensions = Some(*dimensions);
                    if self.gate == SpinGate::Unavailable {
                        self.gate = SpinGate::SpinIdle;
                    }
                }
                Event::TimeAdvanced { dt } => self.queue.advance(*dt),
                Event::CellSettled { cell } => self.record_settle(*cell, out),
                _ => {}
            }
        }

        self.drain_due(random, out);
    }

    fn drain_due<R>(&mut self, random: &mut R, out: &mut Vec<Command>)
    where
        R: RandomSource + ?Sized,
    {
        while let Some(action) = self.queue.pop_due() {
            match action {
                ScheduledAction::SetState { cell, state } => {
                    out.push(Command::SetAnimationState { cell, state });
                }
                ScheduledAction::Reshuffle => {
                    let Some(dimensions) = self.dimensions else {
                        continue;
                    };
                    let snapshot = SymbolSnapshot::random(
                        random,
                        self.config.symbol_type_count,
                        dimensions.cell_count(),
                    );
                    if let Some(session) = self.session.as_mut() {
                        session.symbol_snapshot = Some(snapshot.clone());
                    }
                    out.push(Command::AssignSymbols { snapshot });
                }
            }
        }
    }

    fn record_settle(&mut self, cell: CellIndex, out: &mut Vec<Command>) {
        let Some(session) = self.session.as_mut() else {
            tracing::debug!(cell = cell.get(), "settle outside of a spin ignored");
            return;
        };

        match session.completion.record(cell) {
            SettleOutcome::Pending { .. } => {}
            SettleOutcome::Completed => {
                self.gate = SpinGate::SpinIdle;
                let symbol_snapshot = self
                    .session
                    .take()
                    .and_then(|session| session.symbol_snapshot);
                match symbol_snapshot {
                    Some(snapshot) => {
                        tracing::debug!(spin = self.spins_accepted, "spin completed");
                        out.push(Command::CompleteSpin { snapshot });
                    }
                    None => tracing::warn!("spin completed before its symbols were drawn"),
                }
            }
            SettleOutcome::Duplicate => {
                tracing::warn!(cell = cell.get(), "cell settled twice in one spin");
            }
            SettleOutcome::OutOfRange => {
                tracing::warn!(cell = cell.get(), "settle reported for unknown cell");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stagger_grows_with_row_and_column() {
        let config = Config::new(
            8,
            Duration::from_millis(100),
            Duration::from_millis(30),
            Duration::from_millis(600),
        );

        assert_eq!(config.stagger(CellCoord::new(0, 0)), Duration::ZERO);
        assert_eq!(
            config.stagger(CellCoord::new(2, 4)),
            Duration::from_millis(320)
        );
    }

    #[test]
    fn gate_stays_closed_until_grid_is_configured() {
        let mut choreographer = SpinChoreographer::new(Config::from_slot(&SlotConfig::default()));
        let mut random = RngSource::seeded(7);
        let mut out = Vec::new();

        assert_eq!(choreographer.gate(), SpinGate::Unavailable);
        assert!(!choreographer.try_spin(&mut random, &mut out));
        assert!(out.is_empty());

        choreographer.handle(
            &[Event::GridConfigured {
                dimensions: GridDimensions::new(1, 1),
            }],
            &mut random,
            &mut out,
        );
        assert!(choreographer.can_spin());
    }
}
