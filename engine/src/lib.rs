#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Frame driver that owns the world and every Reel Spin system.
//!
//! Hosts call [`UpdateLoop::update`] once per rendered frame and
//! [`UpdateLoop::try_spin`] whenever the player asks for a spin. Each call
//! feeds the resulting world events through the systems and applies their
//! commands until no further commands are produced.

use std::{mem, time::Duration};

use reelspin_core::{
    Command, ConfigError, CueId, Event, RandomSource, RowWin, SlotConfig, SymbolSnapshot,
};
use reelspin_system_audio_cues::{AudioCues, CueTable};
use reelspin_system_bootstrap::Bootstrap;
use reelspin_system_choreographer::{Config, SpinChoreographer, SpinGate};
use reelspin_system_win_evaluator::WinEvaluator;
use reelspin_world::{self as world, query, World};

/// Upper bound on command/event rounds processed for a single host call.
pub const MAX_PUMP_ROUNDS: usize = 64;

/// Everything that happened since the previous [`UpdateLoop::update`] call.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FrameReport {
    /// Audio cues the host should play, in order.
    pub cues: Vec<CueId>,
    /// Symbols of the spin that completed during the frame, if any.
    pub completed_spin: Option<SymbolSnapshot>,
    /// Winning rows announced during the frame.
    pub wins: Vec<RowWin>,
}

impl FrameReport {
    /// Reports whether a spin completed during the frame.
    #[must_use]
    pub fn spin_completed(&self) -> bool {
        self.completed_spin.is_some()
    }

    /// Reports whether any row won during the frame.
    #[must_use]
    pub fn is_win(&self) -> bool {
        !self.wins.is_empty()
    }

    fn record(&mut self, events: &[Event]) {
        for event in events {
            match event {
                Event::SpinCompleted { snapshot } => {
                    self.completed_spin = Some(snapshot.clone());
                }
                Event::WinAnnounced { rows } => self.wins.extend_from_slice(rows),
                _ => {}
            }
        }
    }
}

/// Owns the world and systems, advancing them once per host frame.
#[derive(Debug)]
pub struct UpdateLoop<R> {
    config: SlotConfig,
    world: World,
    choreographer: SpinChoreographer,
    win_evaluator: WinEvaluator,
    audio_cues: AudioCues,
    random: R,
    report: FrameReport,
}

impl<R: RandomSource> UpdateLoop<R> {
    /// Validates `config`, builds the grid and fills it with random symbols.
    pub fn new(config: SlotConfig, mut random: R, cues: CueTable) -> Result<Self, ConfigError> {
        let config = config.validate()?;
        let commands = Bootstrap.initial_commands(&config, &mut random);

        let mut update_loop = Self {
            choreographer: SpinChoreographer::new(Config::from_slot(&config)),
            config,
            world: World::new(),
            win_evaluator: WinEvaluator::new(),
            audio_cues: AudioCues::new(cues),
            random,
            report: FrameReport::default(),
        };
        update_loop.pump(commands);
        tracing::debug!(
            rows = update_loop.config.rows,
            columns = update_loop.config.columns,
            "update loop ready"
        );
        Ok(update_loop)
    }

    /// Advances the simulation by `dt` and reports what happened since the last frame.
    pub fn update(&mut self, dt: Duration) -> FrameReport {
        self.pump(vec![Command::Tick { dt }]);
        let report = mem::take(&mut self.report);
        if let Some(snapshot) = &report.completed_spin {
            tracing::info!(
                symbols = ?snapshot.as_slice().iter().map(|symbol| symbol.get()).collect::<Vec<_>>(),
                winning_rows = report.wins.len(),
                "spin resolved"
            );
        }
        report
    }

    /// Starts a spin if none is in flight, returning whether it was accepted.
    pub fn try_spin(&mut self) -> bool {
        let mut commands = Vec::new();
        let accepted = self.choreographer.try_spin(&mut self.random, &mut commands);
        self.pump(commands);
        accepted
    }

    /// Reports whether [`try_spin`](Self::try_spin) would accept a spin right now.
    #[must_use]
    pub fn can_spin(&self) -> bool {
        self.choreographer.can_spin()
    }

    /// Current state of the spin gate.
    #[must_use]
    pub fn gate(&self) -> SpinGate {
        self.choreographer.gate()
    }

    /// Number of spins accepted since construction.
    #[must_use]
    pub fn spins_accepted(&self) -> u64 {
        self.choreographer.spins_accepted()
    }

    /// Read-only access to the world for presentation.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Validated configuration the loop was built with.
    #[must_use]
    pub fn config(&self) -> &SlotConfig {
        &self.config
    }

    /// Banner greeting the player.
    #[must_use]
    pub fn welcome_banner(&self) -> &str {
        query::welcome_banner(&self.world)
    }

    fn pump(&mut self, commands: Vec<Command>) {
        let mut pending = commands;
        let mut rounds = 0;

        while !pending.is_empty() {
            if rounds == MAX_PUMP_ROUNDS {
                tracing::warn!(
                    dropped = pending.len(),
                    "command pump did not settle within {MAX_PUMP_ROUNDS} rounds"
                );
                debug_assert!(false, "command pump did not settle");
                break;
            }
            rounds += 1;

            let mut events = Vec::new();
            for command in pending.drain(..) {
                world::apply(&mut self.world, command, &mut events);
            }

            self.choreographer
                .handle(&events, &mut self.random, &mut pending);
            self.win_evaluator.handle(&events, &mut pending);
            self.audio_cues.handle(&events, &mut self.report.cues);
            self.report.record(&events);
        }
    }
}
