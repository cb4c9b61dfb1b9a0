//! The level index: partitions elements into floor buckets and resolves
//! which level(s) a given element appears on.

use ahash::AHashMap;
use std::collections::BTreeMap;

use crate::osm::{DataSet, Element, ElementId, ElementType, TagLookup};

/// A floor level, represented as 10 × the human floor number so
/// half-levels (e.g. `0.5`) become integral (`5`). `isFullLevel(l) ≡ l mod
/// 10 = 0`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MapLevel(pub i32);

impl MapLevel {
    pub fn from_human_floor(floor: f64) -> Self {
        MapLevel((floor * 10.0).round() as i32)
    }

    pub fn is_full_level(self) -> bool {
        self.0 % 10 == 0
    }

    /// The nearest full level at or below this one.
    pub fn full_level_below(self) -> MapLevel {
        MapLevel(10 * self.0.div_euclid(10))
    }

    /// The nearest full level at or above this one.
    pub fn full_level_above(self) -> MapLevel {
        let below = self.full_level_below();
        if below == self {
            below
        } else {
            MapLevel(below.0 + 10)
        }
    }

    pub fn human_floor(self) -> f64 {
        self.0 as f64 / 10.0
    }
}

/// A stable key for an element, used as the level map's value type since
/// it cannot store borrowed [`Element`] references with the map's own
/// lifetime (the map outlives any one borrow of the data set).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ElementKey(pub ElementType, pub ElementId);

/// Parses a `level` or `repeat_on` tag value into the set of
/// [`MapLevel`]s it names.
///
/// Supports OSM's semicolon-separated list form (`-1;0;1;2`) and its
/// hyphenated range form (`0-3`), which expands to every full level in
/// the inclusive range.
pub fn parse_level_list(value: &str) -> Vec<MapLevel> {
    let mut levels = Vec::new();
    for part in value.split(';') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        if let Some((lo, hi)) = part.split_once('-').filter(|(lo, _)| !lo.is_empty()) {
            if let (Ok(lo), Ok(hi)) = (lo.trim().parse::<i32>(), hi.trim().parse::<i32>()) {
                let (lo, hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };
                for floor in lo..=hi {
                    levels.push(MapLevel(floor * 10));
                }
                continue;
            }
        }
        if let Ok(floor) = part.parse::<f64>() {
            levels.push(MapLevel::from_human_floor(floor));
        }
    }
    levels
}

/// Partitions every element in a [`DataSet`] by the level(s) it appears
/// on, derived from its own `level`/`repeat_on` tag. Elements that carry
/// neither tag are tracked separately as spanning every floor.
#[derive(Default)]
pub struct LevelMap {
    by_level: BTreeMap<MapLevel, Vec<ElementKey>>,
    all_floors: Vec<ElementKey>,
}

impl LevelMap {
    pub fn build(data_set: &DataSet) -> Self {
        let mut by_level: BTreeMap<MapLevel, Vec<ElementKey>> = BTreeMap::new();
        let mut all_floors = Vec::new();
        let mut seen: AHashMap<ElementKey, ()> = AHashMap::new();

        for element in data_set.iter_elements() {
            let (Some(id), Some(element_type)) = (element.id(), element.element_type()) else {
                continue;
            };
            let key = ElementKey(element_type, id);
            let level_tag = element
                .tag_value(&data_set.tag_table, TagLookup::Literal("level"))
                .or_else(|| element.tag_value(&data_set.tag_table, TagLookup::Literal("repeat_on")));

            match level_tag {
                Some(value) => {
                    let levels = parse_level_list(value);
                    if levels.is_empty() {
                        all_floors.push(key);
                    } else {
                        seen.insert(key, ());
                        for level in levels {
                            by_level.entry(level).or_default().push(key);
                        }
                    }
                }
                None => all_floors.push(key),
            }
        }

        Self { by_level, all_floors }
    }

    /// Element keys visible on exactly `level` (not counting
    /// all-floor-spanning elements).
    pub fn keys_on_level(&self, level: MapLevel) -> &[ElementKey] {
        self.by_level.get(&level).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Elements that carry neither a `level` nor a `repeat_on` tag and
    /// are therefore visible regardless of the active floor.
    pub fn all_floor_keys(&self) -> &[ElementKey] {
        &self.all_floors
    }

    /// Resolves element keys on `level` back into [`Element`] references.
    pub fn elements_on<'a>(&self, level: MapLevel, data_set: &'a DataSet) -> Vec<Element<'a>> {
        self.keys_on_level(level)
            .iter()
            .filter_map(|k| resolve(*k, data_set))
            .collect()
    }

    /// The ordered list of distinct full levels (`isFullLevel`) that carry
    /// at least one element, ascending.
    pub fn full_levels(&self) -> Vec<MapLevel> {
        self.by_level
            .keys()
            .copied()
            .filter(|l| l.is_full_level())
            .collect()
    }

    /// Every level (full or half) that carries at least one element.
    pub fn levels(&self) -> Vec<MapLevel> {
        self.by_level.keys().copied().collect()
    }
}

fn resolve<'a>(key: ElementKey, data_set: &'a DataSet) -> Option<Element<'a>> {
    match key.0 {
        ElementType::Node => data_set.node(key.1).map(Element::Node),
        ElementType::Way => data_set.way(key.1).map(Element::Way),
        ElementType::Relation => data_set.relation(key.1).map(Element::Relation),
    }
}
