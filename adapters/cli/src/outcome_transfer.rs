use std::{error::Error, fmt};

use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine as _};
use reelspin_core::{GridDimensions, SymbolId, SymbolSnapshot};
use serde::Deserialize;

const OUTCOME_DOMAIN: &str = "reels";
const OUTCOME_VERSION: &str = "v1";
const FIELD_DELIMITER: char = ':';

/// Final symbols of a spin, shareable as a single line of text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct SpinOutcome {
    dimensions: GridDimensions,
    symbols: Vec<SymbolId>,
}

impl SpinOutcome {
    /// Captures the symbols of a completed spin.
    #[must_use]
    pub(crate) fn from_snapshot(dimensions: GridDimensions, snapshot: &SymbolSnapshot) -> Self {
        Self {
            dimensions,
            symbols: snapshot.as_slice().to_vec(),
        }
    }

    /// Grid the outcome was produced on.
    #[must_use]
    pub(crate) fn dimensions(&self) -> GridDimensions {
        self.dimensions
    }

    /// Symbols in cell index order.
    #[must_use]
    pub(crate) fn snapshot(&self) -> SymbolSnapshot {
        SymbolSnapshot::new(self.symbols.clone())
    }

    /// Encodes the outcome as `reels:v1:<rows>x<columns>:<payload>`.
    #[must_use]
    pub(crate) fn encode(&self) -> String {
        let symbols: Vec<u32> = self.symbols.iter().map(|symbol| symbol.get()).collect();
        let json = serde_json::json!({ "symbols": symbols }).to_string();
        let encoded = STANDARD_NO_PAD.encode(json);
        format!(
            "{OUTCOME_DOMAIN}{FIELD_DELIMITER}{OUTCOME_VERSION}{FIELD_DELIMITER}{}x{}{FIELD_DELIMITER}{encoded}",
            self.dimensions.rows(),
            self.dimensions.columns()
        )
    }

    /// Decodes an outcome from its shared string representation.
    pub(crate) fn decode(value: &str) -> Result<Self, OutcomeTransferError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(OutcomeTransferError::EmptyCode);
        }

        let mut parts = trimmed.split(FIELD_DELIMITER);
        let domain = parts.next().ok_or(OutcomeTransferError::MissingPrefix)?;
        let version = parts.next().ok_or(OutcomeTransferError::MissingVersion)?;
        let dimensions = parts
            .next()
            .ok_or(OutcomeTransferError::MissingDimensions)?;
        let payload = parts.next().ok_or(OutcomeTransferError::MissingPayload)?;

        if domain != OUTCOME_DOMAIN {
            return Err(OutcomeTransferError::InvalidPrefix(domain.to_owned()));
        }
        if version != OUTCOME_VERSION {
            return Err(OutcomeTransferError::UnsupportedVersion(version.to_owned()));
        }

        let dimensions = parse_dimensions(dimensions)?;
        let bytes = STANDARD_NO_PAD
            .decode(payload.as_bytes())
            .map_err(OutcomeTransferError::InvalidEncoding)?;
        let decoded: OutcomePayload =
            serde_json::from_slice(&bytes).map_err(OutcomeTransferError::InvalidPayload)?;

        if decoded.symbols.len() != dimensions.cell_count() {
            return Err(OutcomeTransferError::SymbolCountMismatch {
                expected: dimensions.cell_count(),
                actual: decoded.symbols.len(),
            });
        }

        Ok(Self {
            dimensions,
            symbols: decoded.symbols.into_iter().map(SymbolId::new).collect(),
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct OutcomePayload {
    symbols: Vec<u32>,
}

/// Errors that can occur while decoding outcome codes.
#[derive(Debug)]
pub(crate) enum OutcomeTransferError {
    /// The provided string was empty or contained only whitespace.
    EmptyCode,
    /// The prefix segment was missing.
    MissingPrefix,
    /// The code did not contain a version segment.
    MissingVersion,
    /// The code did not include grid dimensions.
    MissingDimensions,
    /// The code did not include the payload segment.
    MissingPayload,
    /// The code used an unexpected prefix segment.
    InvalidPrefix(String),
    /// The code used an unsupported version identifier.
    UnsupportedVersion(String),
    /// The grid dimensions could not be parsed.
    InvalidDimensions(String),
    /// The base64 payload could not be decoded.
    InvalidEncoding(base64::DecodeError),
    /// The decoded payload could not be deserialised.
    InvalidPayload(serde_json::Error),
    /// The payload does not hold one symbol per cell.
    SymbolCountMismatch {
        /// Cells in the encoded grid.
        expected: usize,
        /// Symbols found in the payload.
        actual: usize,
    },
}

impl fmt::Display for OutcomeTransferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyCode => write!(f, "outcome code was empty"),
            Self::MissingPrefix => write!(f, "outcome code is missing the prefix"),
            Self::MissingVersion => write!(f, "outcome code is missing the version"),
            Self::MissingDimensions => write!(f, "outcome code is missing the grid dimensions"),
            Self::MissingPayload => write!(f, "outcome code is missing the payload"),
            Self::InvalidPrefix(prefix) => write!(f, "outcome prefix '{prefix}' is not supported"),
            Self::UnsupportedVersion(version) => {
                write!(f, "outcome version '{version}' is not supported")
            }
            Self::InvalidDimensions(dimensions) => {
                write!(f, "could not parse grid dimensions '{dimensions}'")
            }
            Self::InvalidEncoding(error) => {
                write!(f, "could not decode outcome payload: {error}")
            }
            Self::InvalidPayload(error) => {
                write!(f, "could not parse outcome payload: {error}")
            }
            Self::SymbolCountMismatch { expected, actual } => {
                write!(
                    f,
                    "outcome payload holds {actual} symbols but the grid has {expected} cells"
                )
            }
        }
    }
}

impl Error for OutcomeTransferError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidEncoding(error) => Some(error),
            Self::InvalidPayload(error) => Some(error),
            _ => None,
        }
    }
}

fn parse_dimensions(dimensions: &str) -> Result<GridDimensions, OutcomeTransferError> {
    let invalid = || OutcomeTransferError::InvalidDimensions(dimensions.to_owned());
    let (rows, columns) = dimensions.split_once(['x', 'X']).ok_or_else(invalid)?;

    let rows = rows.trim().parse::<u32>().map_err(|_| invalid())?;
    let columns = columns.trim().parse::<u32>().map_err(|_| invalid())?;

    if rows == 0 || columns == 0 || rows.checked_mul(columns).is_none() {
        return Err(invalid());
    }

    Ok(GridDimensions::new(rows, columns))
}
