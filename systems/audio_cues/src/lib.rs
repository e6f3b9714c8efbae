#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that maps world events onto audio cue identifiers.

use reelspin_core::{AudioCueSystem, CellIndex, CueId, Event};
use serde::{Deserialize, Serialize};

/// Data table describing which cue accompanies each event.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CueTable {
    /// Cues played when a cell settles, indexed by cell and cycled when the
    /// grid holds more cells than the table.
    pub settle: Vec<CueId>,
    /// Cue played when a win is announced.
    pub win: CueId,
}

impl CueTable {
    /// Creates a table from explicit cue lists.
    #[must_use]
    pub fn new(settle: Vec<CueId>, win: CueId) -> Self {
        Self { settle, win }
    }

    /// Table naming the settle cues `s1`, `s2`, ... for `cell_count` cells.
    #[must_use]
    pub fn numbered(cell_count: usize) -> Self {
        Self::new(
            (1..=cell_count)
                .map(|position| CueId::new(format!("s{position}")))
                .collect(),
            CueId::new("win"),
        )
    }

    /// Cue played when `cell` settles, if the table holds any settle cues.
    #[must_use]
    pub fn settle_cue(&self, cell: CellIndex) -> Option<&CueId> {
        if self.settle.is_empty() {
            return None;
        }
        self.settle.get(cell.as_usize() % self.settle.len())
    }
}

impl Default for CueTable {
    fn default() -> Self {
        Self::numbered(15)
    }
}

/// Audio cue system that translates events into cue identifiers.
#[derive(Debug, Default)]
pub struct AudioCues {
    table: CueTable,
}

impl AudioCues {
    /// Creates a new audio cue system backed by the provided table.
    #[must_use]
    pub fn new(table: CueTable) -> Self {
        Self { table }
    }

    /// Table the system looks cues up in.
    #[must_use]
    pub fn table(&self) -> &CueTable {
        &self.table
    }

    /// Appends the cues triggered by `events`, in event order.
    pub fn handle(&self, events: &[Event], out: &mut Vec<CueId>) {
        for event in events {
            match event {
                Event::CellSettled { cell } => {
                    if let Some(cue) = self.table.settle_cue(*cell) {
                        out.push(cue.clone());
                    }
                }
                Event::WinAnnounced { .. } => out.push(self.table.win.clone()),
                _ => {}
            }
        }
    }
}

/// Plays every cue through the host audio system, in order.
pub fn play_all<A>(cues: &[CueId], audio: &mut A)
where
    A: AudioCueSystem + ?Sized,
{
    for cue in cues {
        audio.play(cue);
    }
}

#[cfg(test)]
mod tests {
    use reelspin_core::{RowWin, SymbolId};

    use super::*;

    #[test]
    fn numbered_table_names_positions_from_one() {
        let table = CueTable::numbered(3);

        assert_eq!(
            table.settle,
            vec![CueId::new("s1"), CueId::new("s2"), CueId::new("s3")]
        );
        assert_eq!(table.win, CueId::new("win"));
    }

    #[test]
    fn short_tables_cycle() {
        let table = CueTable::numbered(2);

        assert_eq!(table.settle_cue(CellIndex::new(4)), Some(&CueId::new("s1")));
        assert_eq!(table.settle_cue(CellIndex::new(5)), Some(&CueId::new("s2")));
    }

    #[test]
    fn empty_settle_list_is_silent() {
        let cues = AudioCues::new(CueTable::new(Vec::new(), CueId::new("win")));
        let mut out = Vec::new();

        cues.handle(
            &[Event::CellSettled {
                cell: CellIndex::new(0),
            }],
            &mut out,
        );

        assert!(out.is_empty());
    }

    #[test]
    fn settles_and_wins_map_to_cues_in_order() {
        let cues = AudioCues::default();
        let mut out = Vec::new();

        cues.handle(
            &[
                Event::CellSettled {
                    cell: CellIndex::new(1),
                },
                Event::AnimationStateChanged {
                    cell: CellIndex::new(1),
                    from: reelspin_core::AnimationState::Entry,
                    to: reelspin_core::AnimationState::Idle,
                },
                Event::WinAnnounced {
                    rows: vec![RowWin {
                        row: 0,
                        run_length: 2,
                        symbol: SymbolId::new(1),
                    }],
                },
                Event::CellSettled {
                    cell: CellIndex::new(14),
                },
            ],
            &mut out,
        );

        assert_eq!(
            out,
            vec![CueId::new("s2"), CueId::new("win"), CueId::new("s15")]
        );
    }

    #[test]
    fn table_deserializes_from_toml() {
        let table: CueTable = toml::from_str(
            r#"
                settle = ["click", "clack"]
                win = "fanfare"
            "#,
        )
        .expect("cue table parses");

        assert_eq!(table.settle_cue(CellIndex::new(3)), Some(&CueId::new("clack")));
        assert_eq!(table.win, CueId::new("fanfare"));
    }

    #[derive(Default)]
    struct Recorder(Vec<String>);

    impl AudioCueSystem for Recorder {
        fn play(&mut self, cue: &CueId) {
            self.0.push(cue.as_str().to_owned());
        }
    }

    #[test]
    fn play_all_forwards_every_cue() {
        let mut recorder = Recorder::default();

        play_all(&[CueId::new("s1"), CueId::new("win")], &mut recorder);

        assert_eq!(recorder.0, vec!["s1", "win"]);
    }
}
