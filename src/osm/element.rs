use super::dataset::DataSet;
use super::tags::{TagKey, TagKeyTable, TagSet};

/// Stable 64-bit OSM identifier, unique within its element type.
pub type ElementId = i64;

/// Latitude/longitude stored as integers in units of 1e-7 degree, avoiding
/// floating-point drift across repeated geometry operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GeoCoord {
    pub lat_e7: i32,
    pub lon_e7: i32,
}

impl GeoCoord {
    pub fn from_degrees(lat: f64, lon: f64) -> Self {
        Self {
            lat_e7: (lat * 1e7).round() as i32,
            lon_e7: (lon * 1e7).round() as i32,
        }
    }

    pub fn lat(&self) -> f64 {
        self.lat_e7 as f64 / 1e7
    }

    pub fn lon(&self) -> f64 {
        self.lon_e7 as f64 / 1e7
    }
}

/// An axis-aligned bounding box in geographic coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BBox {
    pub min: GeoCoord,
    pub max: GeoCoord,
}

impl BBox {
    pub fn point(c: GeoCoord) -> Self {
        Self { min: c, max: c }
    }

    pub fn union(&self, other: &BBox) -> BBox {
        BBox {
            min: GeoCoord {
                lat_e7: self.min.lat_e7.min(other.min.lat_e7),
                lon_e7: self.min.lon_e7.min(other.min.lon_e7),
            },
            max: GeoCoord {
                lat_e7: self.max.lat_e7.max(other.max.lat_e7),
                lon_e7: self.max.lon_e7.max(other.max.lon_e7),
            },
        }
    }

    pub fn contains(&self, c: GeoCoord) -> bool {
        c.lat_e7 >= self.min.lat_e7
            && c.lat_e7 <= self.max.lat_e7
            && c.lon_e7 >= self.min.lon_e7
            && c.lon_e7 <= self.max.lon_e7
    }
}

/// A node: a single geographic point plus its tags.
#[derive(Clone, Debug)]
pub struct Node {
    pub id: ElementId,
    pub coord: GeoCoord,
    pub tags: TagSet,
}

/// A way: an ordered sequence of node ids plus a cached bounding box.
#[derive(Clone, Debug)]
pub struct Way {
    pub id: ElementId,
    pub node_ids: Vec<ElementId>,
    pub tags: TagSet,
    pub bbox: Option<BBox>,
}

impl Way {
    /// A way is closed when it has at least 3 nodes and its first and
    /// last node ids coincide.
    pub fn is_closed(&self) -> bool {
        self.node_ids.len() >= 4 && self.node_ids.first() == self.node_ids.last()
    }
}

/// The role a relation member plays, used to distinguish multipolygon
/// outer rings from inner ones (and to ignore other roles).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MemberRole {
    Outer,
    Inner,
    Other(String),
}

impl MemberRole {
    pub fn from_str(s: &str) -> Self {
        match s {
            "outer" => MemberRole::Outer,
            "inner" => MemberRole::Inner,
            other => MemberRole::Other(other.to_string()),
        }
    }
}

/// A relation member: the referenced element's id and type, plus its role
/// within the relation.
#[derive(Clone, Debug)]
pub struct Member {
    pub id: ElementId,
    pub element_type: ElementType,
    pub role: MemberRole,
}

/// A relation: an ordered member list plus a cached bounding box.
///
/// Relations tagged `type=multipolygon` define polygons via `outer`/
/// `inner` member roles (see [`Element::outer_path`]).
#[derive(Clone, Debug)]
pub struct Relation {
    pub id: ElementId,
    pub members: Vec<Member>,
    pub tags: TagSet,
    pub bbox: Option<BBox>,
}

/// The discriminant of an [`Element`] reference, also used (without an
/// attached payload) inside [`Member`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ElementType {
    Node,
    Way,
    Relation,
}

/// A discriminated, non-owning reference into a [`DataSet`]: `{Node, Way,
/// Relation, Null}`. The `Null` variant stands in for "no element" (e.g.
/// an unresolved way-member id) rather than requiring `Option<Element>`
/// everywhere.
#[derive(Clone, Copy, Debug)]
pub enum Element<'a> {
    Null,
    Node(&'a Node),
    Way(&'a Way),
    Relation(&'a Relation),
}

impl<'a> Element<'a> {
    pub fn id(&self) -> Option<ElementId> {
        match self {
            Element::Null => None,
            Element::Node(n) => Some(n.id),
            Element::Way(w) => Some(w.id),
            Element::Relation(r) => Some(r.id),
        }
    }

    pub fn element_type(&self) -> Option<ElementType> {
        match self {
            Element::Null => None,
            Element::Node(_) => Some(ElementType::Node),
            Element::Way(_) => Some(ElementType::Way),
            Element::Relation(_) => Some(ElementType::Relation),
        }
    }

    fn tags(&self) -> Option<&'a TagSet> {
        match *self {
            Element::Null => None,
            Element::Node(n) => Some(&n.tags),
            Element::Way(w) => Some(&w.tags),
            Element::Relation(r) => Some(&r.tags),
        }
    }

    /// A single representative point: the node's own coordinate, or the
    /// midpoint of the element's bounding box for ways/relations.
    pub fn center(&self, data_set: &DataSet) -> Option<GeoCoord> {
        match self {
            Element::Null => None,
            Element::Node(n) => Some(n.coord),
            Element::Way(_) | Element::Relation(_) => {
                let bbox = self.bounding_box(data_set)?;
                Some(GeoCoord {
                    lat_e7: (bbox.min.lat_e7 as i64 + bbox.max.lat_e7 as i64).div_euclid(2) as i32,
                    lon_e7: (bbox.min.lon_e7 as i64 + bbox.max.lon_e7 as i64).div_euclid(2) as i32,
                })
            }
        }
    }

    pub fn bounding_box(&self, data_set: &DataSet) -> Option<BBox> {
        match self {
            Element::Null => None,
            Element::Node(n) => Some(BBox::point(n.coord)),
            Element::Way(w) => w.bbox.or_else(|| Self::recompute_way_bbox(w, data_set)),
            Element::Relation(r) => r
                .bbox
                .or_else(|| Self::recompute_relation_bbox(r, data_set)),
        }
    }

    /// A deterministic, read-only permalink. Formatting only: this crate
    /// never dereferences the URL.
    pub fn url(&self) -> Option<String> {
        let (kind, id) = match self {
            Element::Null => return None,
            Element::Node(n) => ("node", n.id),
            Element::Way(w) => ("way", w.id),
            Element::Relation(r) => ("relation", r.id),
        };
        Some(format!("https://www.openstreetmap.org/{kind}/{id}"))
    }

    /// Looks up a tag value. `key` may be an already-interned [`TagKey`]
    /// (O(log n) binary search) or a literal byte-string (linear scan,
    /// since the literal is not interned against the data set's table).
    pub fn tag_value(&self, table: &TagKeyTable, key: TagLookup<'_>) -> Option<&'a str> {
        let tags = self.tags()?;
        match key {
            TagLookup::Interned(handle) => tags.get_interned(handle),
            TagLookup::Literal(text) => tags.get_literal(table, text),
        }
    }

    /// Locale-qualified lookup trying `key:language_Region`, then
    /// `key:language`, then bare `key`.
    pub fn tag_value_localized(
        &self,
        table: &TagKeyTable,
        key: &str,
        language: &str,
        region: Option<&str>,
    ) -> Option<&'a str> {
        let tags = self.tags()?;
        tags.get_localized(table, key, language, region)
    }

    /// Returns the ordered node sequence of a polygon boundary.
    ///
    /// For a `Way`, resolves each node id directly. For a multipolygon
    /// `Relation`, stitches all `outer` member ways: starting with any
    /// unused way, append its nodes; find the next unused way whose first
    /// or last node equals the current end node (reversing it if it
    /// matches at the tail); repeat until the loop closes or no way
    /// matches, then start a new sub-loop with any remaining unused way.
    /// This is exactly OSM's multipolygon rule that outer ways may appear
    /// in any order and any direction.
    pub fn outer_path(&self, data_set: &'a DataSet) -> Vec<ElementId> {
        match self {
            Element::Way(w) => w.node_ids.clone(),
            Element::Relation(r) => stitch_outer_rings(r, data_set),
            Element::Null | Element::Node(_) => Vec::new(),
        }
    }

    fn recompute_way_bbox(way: &Way, data_set: &DataSet) -> Option<BBox> {
        recompute_bbox_over_nodes(way.node_ids.iter().copied(), data_set)
    }

    fn recompute_relation_bbox(rel: &Relation, data_set: &DataSet) -> Option<BBox> {
        let mut acc: Option<BBox> = None;
        for member in &rel.members {
            let member_bbox = match member.element_type {
                ElementType::Node => data_set.node(member.id).map(|n| BBox::point(n.coord)),
                ElementType::Way => data_set
                    .way(member.id)
                    .and_then(|w| recompute_bbox_over_nodes(w.node_ids.iter().copied(), data_set)),
                ElementType::Relation => None, // nested relations are not recursed into
            };
            if let Some(bb) = member_bbox {
                acc = Some(match acc {
                    Some(existing) => existing.union(&bb),
                    None => bb,
                });
            }
        }
        acc
    }
}

/// Either an already-interned tag key or a literal string key, the two
/// ways [`Element::tag_value`] accepts a lookup key.
pub enum TagLookup<'a> {
    Interned(TagKey),
    Literal(&'a str),
}

fn recompute_bbox_over_nodes(ids: impl Iterator<Item = ElementId>, data_set: &DataSet) -> Option<BBox> {
    let mut acc: Option<BBox> = None;
    for id in ids {
        if let Some(node) = data_set.node(id) {
            let bb = BBox::point(node.coord);
            acc = Some(match acc {
                Some(existing) => existing.union(&bb),
                None => bb,
            });
        }
        // a way's node id that doesn't resolve is treated as skipped.
    }
    acc
}

fn stitch_outer_rings(rel: &Relation, data_set: &DataSet) -> Vec<ElementId> {
    let outer_ways: Vec<&Way> = rel
        .members
        .iter()
        .filter(|m| m.element_type == ElementType::Way && m.role == MemberRole::Outer)
        .filter_map(|m| data_set.way(m.id))
        .collect();

    let mut remaining: Vec<&Way> = outer_ways;
    let mut result = Vec::new();

    while !remaining.is_empty() {
        let first = remaining.remove(0);
        let mut loop_nodes = first.node_ids.clone();

        loop {
            let end = match loop_nodes.last() {
                Some(end) => *end,
                None => break,
            };
            if loop_nodes.first() == loop_nodes.last() && loop_nodes.len() > 1 {
                break; // loop closed
            }
            let next_idx = remaining.iter().position(|w| {
                w.node_ids.first() == Some(&end) || w.node_ids.last() == Some(&end)
            });
            match next_idx {
                Some(idx) => {
                    let next = remaining.remove(idx);
                    if next.node_ids.first() == Some(&end) {
                        loop_nodes.extend(next.node_ids.iter().skip(1).copied());
                    } else {
                        loop_nodes.extend(next.node_ids.iter().rev().skip(1).copied());
                    }
                }
                None => break, // no way continues this loop
            }
        }

        result.extend(loop_nodes);
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::osm::dataset::DataSet;
    use crate::osm::tags::TagKeyTable;

    fn node(table: &mut TagKeyTable, id: ElementId, lat: f64, lon: f64) -> Node {
        Node {
            id,
            coord: GeoCoord::from_degrees(lat, lon),
            tags: TagSet::build(table, []),
        }
    }

    #[test]
    fn outer_path_stitches_two_loops_in_any_order() {
        let mut table = TagKeyTable::new();
        let nodes = vec![
            node(&mut table, 1, 0.0, 0.0),
            node(&mut table, 2, 0.0, 1.0),
            node(&mut table, 3, 1.0, 1.0),
            node(&mut table, 4, 2.0, 2.0),
            node(&mut table, 5, 2.0, 3.0),
            node(&mut table, 6, 3.0, 3.0),
        ];

        // Way A: n1 -> n2 -> n3 -> n1 ; Way B: n4 -> n5 -> n6 -> n4
        let way_a = Way {
            id: 10,
            node_ids: vec![1, 2, 3, 1],
            tags: TagSet::build(&mut table, []),
            bbox: None,
        };
        let way_b = Way {
            id: 11,
            node_ids: vec![4, 5, 6, 4],
            tags: TagSet::build(&mut table, []),
            bbox: None,
        };

        // Member order deliberately reversed (B before A) to exercise stitching order-independence.
        let rel = Relation {
            id: 100,
            members: vec![
                Member { id: 11, element_type: ElementType::Way, role: MemberRole::Outer },
                Member { id: 10, element_type: ElementType::Way, role: MemberRole::Outer },
            ],
            tags: TagSet::build(&mut table, [("type".into(), "multipolygon".into())]),
            bbox: None,
        };

        let ds = DataSet::from_parts(nodes, vec![way_a, way_b], vec![rel], table);
        let rel_ref = ds.relation(100).unwrap();
        let path = Element::Relation(rel_ref).outer_path(&ds);

        // Either loop may come first; both must appear as closed 4-node loops.
        assert_eq!(path.len(), 8);
        let first_loop: Vec<ElementId> = path[0..4].to_vec();
        let second_loop: Vec<ElementId> = path[4..8].to_vec();
        let is_loop_a = |l: &[ElementId]| l == [1, 2, 3, 1];
        let is_loop_b = |l: &[ElementId]| l == [4, 5, 6, 4];
        assert!(
            (is_loop_a(&first_loop) && is_loop_b(&second_loop))
                || (is_loop_b(&first_loop) && is_loop_a(&second_loop))
        );
    }

    #[test]
    fn way_is_closed_requires_matching_endpoints() {
        let mut table = TagKeyTable::new();
        let closed = Way {
            id: 1,
            node_ids: vec![1, 2, 3, 1],
            tags: TagSet::build(&mut table, []),
            bbox: None,
        };
        let open = Way {
            id: 2,
            node_ids: vec![1, 2, 3],
            tags: TagSet::build(&mut table, []),
            bbox: None,
        };
        assert!(closed.is_closed());
        assert!(!open.is_closed());
    }
}
