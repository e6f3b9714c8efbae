use std::time::Duration;

use reelspin_core::{
    AnimationState, CellCoord, Command, Event, GridDimensions, Kinematics, RowWin, SymbolId,
    SymbolSnapshot,
};
use reelspin_system_win_evaluator::WinEvaluator;
use reelspin_world::{self as world, query, World};

const LANDING: [u32; 15] = [0, 0, 0, 1, 2, 3, 3, 4, 5, 6, 7, 1, 1, 1, 1];

fn run(world: &mut World, evaluator: &mut WinEvaluator, commands: Vec<Command>) -> Vec<Event> {
    let mut log = Vec::new();
    let mut pending = commands;
    while !pending.is_empty() {
        let mut events = Vec::new();
        for command in pending.drain(..) {
            world::apply(world, command, &mut events);
        }
        evaluator.handle(&events, &mut pending);
        log.extend(events);
    }
    log
}

#[test]
fn completed_spin_sets_winning_runs_spinning() {
    let mut world = World::new();
    let mut evaluator = WinEvaluator::new();
    let snapshot = SymbolSnapshot::from_raw(&LANDING);

    let _ = run(
        &mut world,
        &mut evaluator,
        vec![
            Command::ConfigureGrid {
                dimensions: GridDimensions::new(3, 5),
                kinematics: Kinematics::new(14_400.0, 6_000.0),
                entry_distance: 800.0,
            },
            Command::AssignSymbols {
                snapshot: snapshot.clone(),
            },
        ],
    );
    let log = run(
        &mut world,
        &mut evaluator,
        vec![Command::CompleteSpin { snapshot }],
    );

    assert!(log.contains(&Event::WinAnnounced {
        rows: vec![
            RowWin {
                row: 0,
                run_length: 3,
                symbol: SymbolId::new(0),
            },
            RowWin {
                row: 1,
                run_length: 2,
                symbol: SymbolId::new(3),
            },
        ],
    }));

    let winning: Vec<_> = query::cell_view(&world)
        .iter()
        .filter(|cell| cell.state == AnimationState::Winning)
        .map(|cell| (cell.coord.row(), cell.coord.column()))
        .collect();
    assert_eq!(winning, vec![(0, 0), (0, 1), (0, 2), (1, 0), (1, 1)]);

    let _ = run(
        &mut world,
        &mut evaluator,
        vec![Command::Tick {
            dt: Duration::from_millis(100),
        }],
    );
    let spinning = query::cell(&world, CellCoord::new(0, 0));
    assert!(spinning.rotation > 0.0, "winning cells rotate");
    assert_eq!(query::cell(&world, CellCoord::new(2, 0)).rotation, 0.0);
}

#[test]
fn losing_spin_leaves_cells_idle() {
    let mut world = World::new();
    let mut evaluator = WinEvaluator::new();
    let snapshot = SymbolSnapshot::from_raw(&[1, 2, 1, 2]);

    let log = run(
        &mut world,
        &mut evaluator,
        vec![
            Command::ConfigureGrid {
                dimensions: GridDimensions::new(2, 2),
                kinematics: Kinematics::new(100.0, 100.0),
                entry_distance: 50.0,
            },
            Command::CompleteSpin { snapshot },
        ],
    );

    assert!(!log
        .iter()
        .any(|event| matches!(event, Event::WinAnnounced { .. })));
    assert!(query::cell_view(&world)
        .iter()
        .all(|cell| cell.state == AnimationState::Idle));
    assert!(evaluator.last_report().is_some_and(|report| !report.is_win()));
}
