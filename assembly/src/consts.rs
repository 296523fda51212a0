//! Shared numeric constants for the assembly crate.

// ── Explosion ───────────────────────────────────────────────────

/// Lower bound of the explosion factor (fully assembled).
pub const EXPLOSION_MIN: f64 = 0.0;

/// Upper bound of the explosion factor.
pub const EXPLOSION_MAX: f64 = 0.5;

/// Slider steps per unit factor (a resolution of 0.001).
pub const EXPLOSION_STEPS_PER_UNIT: f64 = 1000.0;

// ── Transform records ───────────────────────────────────────────

/// Decimal places kept in emitted pose records.
pub const RECORD_DECIMALS: i32 = 4;

// ── Geometry locators ───────────────────────────────────────────

/// File extension stripped from a locator to form a group's display name.
pub const GEOMETRY_EXTENSION: &str = ".glb";
