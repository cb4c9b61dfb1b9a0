//! The floor-level UI model: the ordered list of levels a host presents
//! as a floor picker, and the level-change choices offered for a single
//! elevator/stairwell/stairs element.

pub mod level_change;

pub use level_change::{level_change_choices, LevelChangeChoice};

use crate::level::MapLevel;
use crate::osm::MapData;

/// The ordered list of full levels ([`MapLevel::is_full_level`]) present
/// in `map_data`, ascending. Half-levels are not offered directly in the
/// floor picker; they are reached only as a consequence of a level
/// change onto a way that happens to sit on one.
pub fn available_levels(map_data: &MapData) -> Vec<MapLevel> {
    map_data.levels.full_levels()
}
