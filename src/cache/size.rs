//! Memory Size Module
//!
//! Parses human-readable memory budgets such as `"100MB"` or `"2kb"` into byte counts.

use std::fmt;

use tracing::warn;

// == Units ==
pub const B: u64 = 1;
pub const KB: u64 = B << 10;
pub const MB: u64 = KB << 10;
pub const GB: u64 = MB << 10;
pub const TB: u64 = GB << 10;
pub const PB: u64 = TB << 10;
pub const EB: u64 = PB << 10;

/// Budget used when no size is configured or the configured size is unusable.
pub const DEFAULT_MAX_MEMORY: u64 = 100 * MB;

/// Label of [`DEFAULT_MAX_MEMORY`].
pub const DEFAULT_MAX_MEMORY_STR: &str = "100MB";

// Ordered largest first so `format_size` picks the biggest exact unit.
const UNITS: [(&str, u64); 7] = [
    ("EB", EB),
    ("PB", PB),
    ("TB", TB),
    ("GB", GB),
    ("MB", MB),
    ("KB", KB),
    ("B", B),
];

// == Byte Size ==
/// A parsed memory budget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ByteSize {
    /// Budget in bytes
    pub bytes: u64,
    /// Normalized (upper-cased) form of the input, e.g. `"2MB"`
    pub label: String,
}

impl Default for ByteSize {
    fn default() -> Self {
        Self {
            bytes: DEFAULT_MAX_MEMORY,
            label: DEFAULT_MAX_MEMORY_STR.to_string(),
        }
    }
}

impl fmt::Display for ByteSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} bytes)", self.label, self.bytes)
    }
}

// == Parse Size ==
/// Parses a size string of the form `<digits><unit>`.
///
/// Units are `B`, `KB`, `MB`, `GB`, `TB`, `PB` and `EB` (base 1024, case-insensitive).
/// Anything that cannot be turned into a positive byte count yields
/// [`ByteSize::default`] instead of an error.
pub fn parse_size(size: &str) -> ByteSize {
    match try_parse_size(size) {
        Some(parsed) => parsed,
        None => {
            warn!(
                "Could not parse memory size {:?}, falling back to {}",
                size, DEFAULT_MAX_MEMORY_STR
            );
            ByteSize::default()
        }
    }
}

fn try_parse_size(size: &str) -> Option<ByteSize> {
    let label = size.trim().to_ascii_uppercase();
    let digits_end = label
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(label.len());
    let (number, unit) = label.split_at(digits_end);

    // Bare numbers are rejected: the unit is mandatory.
    let multiplier = UNITS
        .iter()
        .find(|(name, _)| *name == unit)
        .map(|(_, multiplier)| *multiplier)?;

    let bytes = number.parse::<u64>().ok()?.checked_mul(multiplier)?;
    if bytes == 0 {
        return None;
    }

    Some(ByteSize { bytes, label })
}

// == Format Size ==
/// Renders a byte count using the largest unit that divides it exactly.
pub fn format_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0B".to_string();
    }
    UNITS
        .iter()
        .find(|(_, multiplier)| bytes % *multiplier == 0)
        .map(|(name, multiplier)| format!("{}{}", bytes / *multiplier, name))
        .unwrap_or_else(|| format!("{}B", bytes))
}
