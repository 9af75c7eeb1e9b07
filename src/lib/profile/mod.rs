//! Mutation profile data model.
//!
//! - [`record`]: the per-position [`PositionRecord`] and its profile-line codec
//! - [`indel_rates`]: the indel-sequence → rate mapping and the key-union merge
//! - [`cutoff`]: the indel reporting threshold
//! - [`size_class`]: indel length classes

pub mod cutoff;
pub mod indel_rates;
pub mod record;
pub mod size_class;

pub use cutoff::IndelCutoff;
pub use indel_rates::{merge_union, percent, IndelRates};
pub use record::{
    profile_header, BaseRates, PositionRecord, ProfileRow, SizeClassRates, LEGACY_PROFILE_WIDTH,
    PROFILE_COLUMNS,
};
pub use size_class::SizeClasses;
