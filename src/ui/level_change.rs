//! The level-change model: given a reference element tagged as an
//! elevator, stairwell, or stairs, computes the set of levels it
//! connects and how a host should present that choice.

use crate::level::MapLevel;
use crate::osm::{DataSet, Element, TagLookup};

/// How a host should present the levels a single element connects.
#[derive(Clone, Debug, PartialEq)]
pub enum LevelChangeChoice {
    /// The set has exactly two levels and one of them is the level the
    /// caller is currently on: offer a single "go to other" shortcut
    /// rather than a list.
    GoToOther { current: MapLevel, other: MapLevel },
    /// Every other case: present the full, de-duplicated, ascending
    /// level list.
    List { levels: Vec<MapLevel> },
}

impl LevelChangeChoice {
    /// The full level set this choice was built from, regardless of
    /// which variant it resolved to.
    pub fn levels(&self) -> Vec<MapLevel> {
        match self {
            LevelChangeChoice::GoToOther { current, other } => {
                let mut levels = vec![*current, *other];
                levels.sort();
                levels
            }
            LevelChangeChoice::List { levels } => levels.clone(),
        }
    }

    /// True whenever the connected set has more than two levels (a
    /// two-level set is a single change, trivially presentable as a
    /// shortcut).
    pub fn has_multiple_level_changes(&self) -> bool {
        self.levels().len() > 2
    }
}

/// Computes the set of levels `element` connects, combining
/// `building:levels`/`building:min_level`/`building:levels:underground`
/// ranges with the element's own `level`/`repeat_on` list, de-duplicated
/// and sorted ascending, then wraps the result into the choice a host
/// should present given `current_level`.
///
/// Returns `None` if the element connects no levels at all (e.g. it
/// carries none of the recognized tags).
pub fn level_change_choices(element: &Element<'_>, data_set: &DataSet, current_level: MapLevel) -> Option<LevelChangeChoice> {
    let levels = connected_levels(element, data_set);
    if levels.is_empty() {
        return None;
    }

    if levels.len() == 2 && levels.contains(&current_level) {
        let other = *levels.iter().find(|&&l| l != current_level).unwrap_or(&levels[0]);
        return Some(LevelChangeChoice::GoToOther { current: current_level, other });
    }

    Some(LevelChangeChoice::List { levels })
}

fn connected_levels(element: &Element<'_>, data_set: &DataSet) -> Vec<MapLevel> {
    let table = &data_set.tag_table;
    let mut levels = Vec::new();

    if let Some(value) = element.tag_value(table, TagLookup::Literal("level")) {
        levels.extend(crate::level::parse_level_list(value));
    }
    if let Some(value) = element.tag_value(table, TagLookup::Literal("repeat_on")) {
        levels.extend(crate::level::parse_level_list(value));
    }
    levels.extend(building_levels_range(element, table));

    levels.sort();
    levels.dedup();
    levels
}

/// Combines `building:min_level`/`building:levels` (levels at and above
/// the building's ground reference) with `building:levels:underground`
/// (levels below it) into the full level range the building itself
/// spans. Absent or unparsable tags contribute nothing.
fn building_levels_range(element: &Element<'_>, table: &crate::osm::TagKeyTable) -> Vec<MapLevel> {
    let min_level = element
        .tag_value(table, TagLookup::Literal("building:min_level"))
        .and_then(|v| v.parse::<i32>().ok())
        .unwrap_or(0);
    let levels_above = element
        .tag_value(table, TagLookup::Literal("building:levels"))
        .and_then(|v| v.parse::<i32>().ok())
        .unwrap_or(0);
    let levels_below = element
        .tag_value(table, TagLookup::Literal("building:levels:underground"))
        .and_then(|v| v.parse::<i32>().ok())
        .unwrap_or(0);

    let mut levels = Vec::new();
    for floor in min_level..min_level + levels_above {
        levels.push(MapLevel(floor * 10));
    }
    for below in 1..=levels_below {
        levels.push(MapLevel(-below * 10));
    }
    levels
}
