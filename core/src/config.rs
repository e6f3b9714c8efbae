//! Construction-time configuration for a slot grid.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{GridDimensions, Kinematics, Point};

/// Every tunable of the slot grid, fixed once the engine is constructed.
///
/// Delays are expressed in milliseconds when (de)serialised.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SlotConfig {
    /// Number of rows in the grid.
    pub rows: u32,
    /// Number of columns in the grid.
    pub columns: u32,
    /// Side length of a single square cell in world units.
    pub cell_size: f32,
    /// Number of distinct symbols; symbol ids fall in `[0, symbol_type_count)`.
    pub symbol_type_count: u32,
    /// Stagger added per row before a cell starts moving.
    #[serde(with = "millis")]
    pub row_start_delay: Duration,
    /// Stagger added per column before a cell starts moving.
    #[serde(with = "millis")]
    pub symbol_start_delay: Duration,
    /// Delay between the start of a spin and the start of its entry phase.
    #[serde(with = "millis")]
    pub spin_entry_delay: Duration,
    /// Upper bound on cell velocity, in world units per second.
    pub max_velocity: f32,
    /// Velocity gained per second while moving, in world units per second squared.
    pub acceleration: f32,
    /// Distance above the rest position where entering cells start.
    pub entry_distance: f32,
    /// Top-left corner of the grid in world units.
    pub origin: Point,
}

impl Default for SlotConfig {
    fn default() -> Self {
        Self {
            rows: 3,
            columns: 5,
            cell_size: 200.0,
            symbol_type_count: 8,
            row_start_delay: Duration::from_millis(100),
            symbol_start_delay: Duration::from_millis(30),
            spin_entry_delay: Duration::from_millis(600),
            max_velocity: 6_000.0,
            acceleration: 14_400.0,
            entry_distance: 800.0,
            origin: Point::new(200.0, 200.0),
        }
    }
}

impl SlotConfig {
    /// Grid dimensions described by the configuration.
    #[must_use]
    pub const fn dimensions(&self) -> GridDimensions {
        GridDimensions::new(self.rows, self.columns)
    }

    /// Motion parameters shared by every cell.
    #[must_use]
    pub const fn kinematics(&self) -> Kinematics {
        Kinematics::new(self.acceleration, self.max_velocity)
    }

    /// Checks the configuration, returning it unchanged when every field is usable.
    pub fn validate(self) -> Result<Self, ConfigError> {
        if self.rows == 0 || self.columns == 0 {
            return Err(ConfigError::EmptyGrid {
                rows: self.rows,
                columns: self.columns,
            });
        }
        if self.rows.checked_mul(self.columns).is_none() {
            return Err(ConfigError::GridTooLarge {
                rows: self.rows,
                columns: self.columns,
            });
        }
        if self.symbol_type_count == 0 {
            return Err(ConfigError::NoSymbolTypes);
        }

        for (field, value) in [
            ("cell_size", self.cell_size),
            ("max_velocity", self.max_velocity),
            ("acceleration", self.acceleration),
            ("entry_distance", self.entry_distance),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::NonPositive { field, value });
            }
        }

        Ok(self)
    }
}

/// Reasons a [`SlotConfig`] may be rejected.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ConfigError {
    /// The grid has no cells.
    #[error("grid must have at least one row and one column (received {rows}x{columns})")]
    EmptyGrid {
        /// Configured row count.
        rows: u32,
        /// Configured column count.
        columns: u32,
    },
    /// The grid has more cells than a cell index can address.
    #[error("grid of {rows}x{columns} cells is too large")]
    GridTooLarge {
        /// Configured row count.
        rows: u32,
        /// Configured column count.
        columns: u32,
    },
    /// No symbols are available to assign.
    #[error("symbol_type_count must be positive")]
    NoSymbolTypes,
    /// A length or rate was zero, negative or not finite.
    #[error("{field} must be a positive finite number (received {value})")]
    NonPositive {
        /// Name of the offending field.
        field: &'static str,
        /// Rejected value.
        value: f32,
    },
}

mod millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub(super) fn serialize<S>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(u64::try_from(value.as_millis()).unwrap_or(u64::MAX))
    }

    pub(super) fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_configuration_is_valid() {
        let config = SlotConfig::default().validate().expect("defaults validate");
        assert_eq!(config.dimensions(), GridDimensions::new(3, 5));
    }

    #[test]
    fn empty_grid_is_rejected() {
        let config = SlotConfig {
            columns: 0,
            ..SlotConfig::default()
        };

        assert_eq!(
            config.validate(),
            Err(ConfigError::EmptyGrid {
                rows: 3,
                columns: 0
            })
        );
    }

    #[test]
    fn non_positive_acceleration_is_rejected() {
        let config = SlotConfig {
            acceleration: 0.0,
            ..SlotConfig::default()
        };

        assert!(matches!(
            config.validate(),
            Err(ConfigError::NonPositive {
                field: "acceleration",
                ..
            })
        ));
    }

    #[test]
    fn toml_overrides_keep_remaining_defaults() {
        let config: SlotConfig = toml::from_str(
            r#"
                rows = 4
                spin_entry_delay = 450
                origin = { x = 10.0, y = 20.0 }
            "#,
        )
        .expect("config parses");

        assert_eq!(config.rows, 4);
        assert_eq!(config.columns, 5);
        assert_eq!(config.spin_entry_delay, Duration::from_millis(450));
        assert_eq!(config.row_start_delay, Duration::from_millis(100));
        assert_eq!(config.origin, Point::new(10.0, 20.0));
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let result: Result<SlotConfig, _> = toml::from_str("reel_count = 5");
        assert!(result.is_err(), "typos must not be silently ignored");
    }

    #[test]
    fn zero_symbol_types_are_rejected() {
        let config = SlotConfig {
            symbol_type_count: 0,
            ..SlotConfig::default()
        };

        assert_eq!(config.validate(), Err(ConfigError::NoSymbolTypes));
    }
}
