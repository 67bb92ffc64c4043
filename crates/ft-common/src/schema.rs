//! Report schema version.

/// Version stamped on every `ThresholdReport`.
///
/// Bumped in the major component when a field is removed or retyped.
pub const SCHEMA_VERSION: &str = "1.0.0";
