use std::{collections::HashMap, time::Duration};

use reelspin_core::{
    AnimationState, CellCoord, CellIndex, Command, Event, Point, RandomSource, SlotConfig,
    SymbolSnapshot,
};
use reelspin_system_choreographer::{
    Config, RngSource, ScriptedSource, SpinChoreographer, SpinGate,
};
use reelspin_world::{self as world, query, World};

const FRAME: Duration = Duration::from_millis(16);
const LANDING: [u32; 15] = [0, 0, 0, 1, 2, 3, 3, 4, 5, 6, 7, 1, 1, 1, 1];

struct Harness<R> {
    world: World,
    choreographer: SpinChoreographer,
    random: R,
    log: Vec<Event>,
}

impl<R: RandomSource> Harness<R> {
    fn new(config: SlotConfig, random: R) -> Self {
        let mut harness = Self {
            world: World::new(),
            choreographer: SpinChoreographer::new(Config::from_slot(&config)),
            random,
            log: Vec::new(),
        };
        harness.pump(vec![
            Command::ConfigureGrid {
                dimensions: config.dimensions(),
                kinematics: config.kinematics(),
                entry_distance: config.entry_distance,
            },
            Command::LayoutDefaultPositions {
                origin: Point::ZERO,
                cell_size: config.cell_size,
            },
        ]);
        harness.log.clear();
        harness
    }

    fn pump(&mut self, mut commands: Vec<Command>) {
        while !commands.is_empty() {
            let mut events = Vec::new();
            for command in commands.drain(..) {
                world::apply(&mut self.world, command, &mut events);
            }
            self.choreographer
                .handle(&events, &mut self.random, &mut commands);
            self.log.extend(events);
        }
    }

    fn spin(&mut self) -> bool {
        let mut commands = Vec::new();
        let accepted = self.choreographer.try_spin(&mut self.random, &mut commands);
        self.pump(commands);
        accepted
    }

    fn tick(&mut self, dt: Duration) {
        self.pump(vec![Command::Tick { dt }]);
    }

    fn run_until_idle(&mut self) -> usize {
        let mut frames = 0;
        while self.choreographer.gate() == SpinGate::Spinning {
            self.tick(FRAME);
            frames += 1;
            assert!(frames < 1_000, "spin never completed");
        }
        frames
    }

    fn state(&self, row: u32, column: u32) -> AnimationState {
        query::cell(&self.world, CellCoord::new(row, column)).state
    }

    fn count(&self, predicate: impl Fn(&Event) -> bool) -> usize {
        self.log.iter().filter(|event| predicate(event)).count()
    }
}

fn scripted() -> ScriptedSource<RngSource<rand_chacha::ChaCha8Rng>> {
    ScriptedSource::new(LANDING.to_vec(), RngSource::seeded(0xfeed))
}

#[test]
fn every_cell_settles_exactly_once_per_spin() {
    let mut harness = Harness::new(SlotConfig::default(), RngSource::seeded(1));

    assert!(harness.spin());
    let _ = harness.run_until_idle();

    let mut settles: HashMap<CellIndex, usize> = HashMap::new();
    for event in &harness.log {
        if let Event::CellSettled { cell } = event {
            *settles.entry(*cell).or_default() += 1;
        }
    }
    assert_eq!(settles.len(), 15);
    assert!(settles.values().all(|count| *count == 1));
    assert_eq!(
        harness.count(|event| matches!(event, Event::SpinCompleted { .. })),
        1
    );

    for cell in query::cell_view(&harness.world).iter() {
        assert_eq!(cell.state, AnimationState::Idle);
        assert_eq!(cell.offset, Point::ZERO);
        assert_eq!(cell.rotation, 0.0);
    }
    assert!(harness.choreographer.session().is_none());
    assert_eq!(harness.choreographer.scheduled(), 0);
}

#[test]
fn overlapping_spin_requests_have_no_effect() {
    let mut harness = Harness::new(SlotConfig::default(), RngSource::seeded(2));
    assert!(harness.spin());
    harness.tick(FRAME);

    let scheduled = harness.choreographer.scheduled();
    let logged = harness.log.len();
    let mut commands = Vec::new();

    assert!(!harness
        .choreographer
        .try_spin(&mut harness.random, &mut commands));
    assert!(commands.is_empty());
    assert_eq!(harness.choreographer.scheduled(), scheduled);
    assert_eq!(harness.log.len(), logged);
    assert_eq!(harness.choreographer.spins_accepted(), 1);

    let _ = harness.run_until_idle();
    assert_eq!(
        harness.count(|event| matches!(event, Event::SpinCompleted { .. })),
        1
    );
}

#[test]
fn exits_follow_the_row_and_column_stagger() {
    let mut harness = Harness::new(SlotConfig::default(), RngSource::seeded(3));
    assert!(harness.spin());

    assert_eq!(harness.state(0, 0), AnimationState::Exit);
    assert_eq!(harness.state(0, 1), AnimationState::Idle);

    harness.tick(Duration::from_millis(29));
    assert_eq!(harness.state(0, 1), AnimationState::Idle);
    harness.tick(Duration::from_millis(1));
    assert_eq!(harness.state(0, 1), AnimationState::Exit);
    assert_eq!(harness.state(1, 0), AnimationState::Idle);

    harness.tick(Duration::from_millis(70));
    assert_eq!(harness.state(1, 0), AnimationState::Exit);
    assert_eq!(harness.state(2, 4), AnimationState::Idle);

    harness.tick(Duration::from_millis(220));
    assert_eq!(harness.state(2, 4), AnimationState::Exit);
}

#[test]
fn symbols_are_redrawn_once_at_the_entry_delay() {
    let mut harness = Harness::new(SlotConfig::default(), scripted());
    assert!(harness.spin());

    harness.tick(Duration::from_millis(599));
    assert_eq!(
        harness.count(|event| matches!(event, Event::SymbolsAssigned { .. })),
        0
    );
    assert_eq!(harness.state(0, 0), AnimationState::Exit);

    harness.tick(Duration::from_millis(1));
    assert_eq!(
        harness.count(|event| matches!(event, Event::SymbolsAssigned { .. })),
        1
    );
    assert_eq!(harness.state(0, 0), AnimationState::Entry);
    assert_eq!(
        harness
            .choreographer
            .session()
            .and_then(|session| session.symbol_snapshot()),
        Some(&SymbolSnapshot::from_raw(&LANDING))
    );

    let _ = harness.run_until_idle();
    assert_eq!(
        harness.count(|event| matches!(event, Event::SymbolsAssigned { .. })),
        1
    );
    assert!(harness.log.contains(&Event::SpinCompleted {
        snapshot: SymbolSnapshot::from_raw(&LANDING),
    }));
    assert_eq!(query::symbols(&harness.world), SymbolSnapshot::from_raw(&LANDING));
}

#[test]
fn pending_count_drains_to_zero_once() {
    let mut harness = Harness::new(SlotConfig::default(), RngSource::seeded(4));
    assert!(harness.spin());

    let mut observed = vec![15];
    while let Some(session) = harness.choreographer.session() {
        let pending = session.pending_settle_count();
        if observed.last() != Some(&pending) {
            assert!(pending < *observed.last().unwrap_or(&usize::MAX));
            observed.push(pending);
        }
        harness.tick(FRAME);
    }

    assert!(harness.choreographer.can_spin());
    assert_eq!(
        harness.count(|event| matches!(event, Event::SpinCompleted { .. })),
        1
    );
}

#[test]
fn gate_reopens_for_the_next_spin() {
    let mut harness = Harness::new(SlotConfig::default(), RngSource::seeded(5));

    for _ in 0..3 {
        assert!(harness.spin());
        let _ = harness.run_until_idle();
    }

    assert_eq!(harness.choreographer.spins_accepted(), 3);
    assert_eq!(
        harness.count(|event| matches!(event, Event::SpinCompleted { .. })),
        3
    );
    assert_eq!(
        harness.count(|event| matches!(event, Event::CellSettled { .. })),
        45
    );
}

#[test]
fn zero_entry_delay_still_redraws_before_entering() {
    let config = SlotConfig {
        rows: 1,
        columns: 2,
        spin_entry_delay: Duration::ZERO,
        row_start_delay: Duration::ZERO,
        symbol_start_delay: Duration::ZERO,
        ..SlotConfig::default()
    };
    let mut harness = Harness::new(config, ScriptedSource::new(vec![4, 5], RngSource::seeded(6)));

    assert!(harness.spin());
    assert_eq!(harness.state(0, 0), AnimationState::Entry);
    assert_eq!(harness.state(0, 1), AnimationState::Entry);
    assert_eq!(query::symbols(&harness.world), SymbolSnapshot::from_raw(&[4, 5]));

    let _ = harness.run_until_idle();
    assert!(harness.log.contains(&Event::SpinCompleted {
        snapshot: SymbolSnapshot::from_raw(&[4, 5]),
    }));
}
