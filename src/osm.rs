//! The OSM data model: a discriminated element reference over
//! `{Node, Way, Relation, Null}`, the [`DataSet`] that owns their
//! storage, and [`MapData`], which adds the bounding box / time zone /
//! region / level-map context the rest of the core needs.

pub mod dataset;
pub mod element;
pub mod tags;

pub use dataset::DataSet;
pub use element::{BBox, Element, ElementId, ElementType, GeoCoord, Member, MemberRole, Node, Relation, TagLookup, Way};
pub use tags::{Tag, TagKey, TagKeyTable, TagSet};

use crate::level::LevelMap;

/// A data set plus the context the rest of the core needs: its bounding
/// box, time zone, region code, and the level map partitioning elements
/// into floor buckets.
///
/// Created once by the loader and handed to the scene controller, which
/// takes ownership; style compilation must run once per `(MapData,
/// Style)` pair before evaluation (see [`crate::style`]).
pub struct MapData {
    pub data_set: DataSet,
    pub bbox: Option<BBox>,
    /// IANA-style time zone identifier, e.g. `"Europe/Berlin"`.
    pub time_zone: Option<String>,
    pub region_code: Option<String>,
    pub levels: LevelMap,
}

impl MapData {
    /// Builds a `MapData` by recomputing its bounding box from every
    /// element's own bbox (nodes contribute a point bbox; ways/relations
    /// recompute over members) and indexing elements by level.
    pub fn new(data_set: DataSet, time_zone: Option<String>, region_code: Option<String>) -> Self {
        let bbox = recompute_overall_bbox(&data_set);
        let levels = LevelMap::build(&data_set);
        Self {
            data_set,
            bbox,
            time_zone,
            region_code,
            levels,
        }
    }
}

fn recompute_overall_bbox(data_set: &DataSet) -> Option<BBox> {
    let mut acc: Option<BBox> = None;
    for element in data_set.iter_elements() {
        if let Some(bb) = element.bounding_box(data_set) {
            acc = Some(match acc {
                Some(existing) => existing.union(&bb),
                None => bb,
            });
        }
    }
    acc
}
