#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure bootstrap system that prepares the Reel Spin experience.

use reelspin_core::{Command, RandomSource, SlotConfig, SymbolSnapshot};
use reelspin_world::{query, World};

/// Produces the start-up command batch and data required to greet the player.
#[derive(Debug, Default)]
pub struct Bootstrap;

impl Bootstrap {
    /// Derives the banner that should be shown when the experience starts.
    #[must_use]
    pub fn welcome_banner<'world>(&self, world: &'world World) -> &'world str {
        query::welcome_banner(world)
    }

    /// Commands that build, fill and lay out the grid described by `config`.
    ///
    /// The grid starts with a random symbol in every cell.
    #[must_use]
    pub fn initial_commands<R>(&self, config: &SlotConfig, random: &mut R) -> Vec<Command>
    where
        R: RandomSource + ?Sized,
    {
        let dimensions = config.dimensions();
        vec![
            Command::ConfigureGrid {
                dimensions,
                kinematics: config.kinematics(),
                entry_distance: config.entry_distance,
            },
            Command::AssignSymbols {
                snapshot: SymbolSnapshot::random(
                    random,
                    config.symbol_type_count,
                    dimensions.cell_count(),
                ),
            },
            Command::LayoutDefaultPositions {
                origin: config.origin,
                cell_size: config.cell_size,
            },
        ]
    }
}
