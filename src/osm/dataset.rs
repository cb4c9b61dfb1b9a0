use super::element::{Element, ElementId, Node, Relation, Way};
use super::tags::TagKeyTable;

/// Three id-sorted vectors of OSM primitives plus the tag-key table they
/// were interned against.
///
/// Ids are unique within each vector. A way's node ids either resolve to
/// a node in `nodes` or the node is intentionally absent and treated as
/// skipped — the data set never panics on a dangling reference.
///
/// `DataSet` owns all storage; [`Element`] values are non-owning
/// references whose lifetime cannot outlive the `DataSet`.
#[derive(Debug)]
pub struct DataSet {
    nodes: Vec<Node>,
    ways: Vec<Way>,
    relations: Vec<Relation>,
    pub tag_table: TagKeyTable,
}

impl DataSet {
    /// Builds a data set from already-collected primitives, sorting each
    /// vector by id so lookups can binary-search.
    pub fn from_parts(mut nodes: Vec<Node>, mut ways: Vec<Way>, mut relations: Vec<Relation>, tag_table: TagKeyTable) -> Self {
        nodes.sort_by_key(|n| n.id);
        ways.sort_by_key(|w| w.id);
        relations.sort_by_key(|r| r.id);
        Self {
            nodes,
            ways,
            relations,
            tag_table,
        }
    }

    pub fn node(&self, id: ElementId) -> Option<&Node> {
        self.nodes.binary_search_by_key(&id, |n| n.id).ok().map(|i| &self.nodes[i])
    }

    pub fn way(&self, id: ElementId) -> Option<&Way> {
        self.ways.binary_search_by_key(&id, |w| w.id).ok().map(|i| &self.ways[i])
    }

    pub fn relation(&self, id: ElementId) -> Option<&Relation> {
        self.relations
            .binary_search_by_key(&id, |r| r.id)
            .ok()
            .map(|i| &self.relations[i])
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn ways(&self) -> &[Way] {
        &self.ways
    }

    pub fn relations(&self) -> &[Relation] {
        &self.relations
    }

    /// Iterates every element in the canonical `for_each` order the
    /// scene controller relies on for deterministic tie-breaking:
    /// relations first, then ways, then nodes.
    pub fn iter_elements(&self) -> impl Iterator<Item = Element<'_>> {
        self.relations
            .iter()
            .map(Element::Relation)
            .chain(self.ways.iter().map(Element::Way))
            .chain(self.nodes.iter().map(Element::Node))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::osm::{GeoCoord, TagSet};

    #[test]
    fn lookup_by_id_is_binary_search() {
        let mut table = TagKeyTable::new();
        let nodes = vec![
            Node { id: 5, coord: GeoCoord::from_degrees(1.0, 1.0), tags: TagSet::build(&mut table, []) },
            Node { id: 1, coord: GeoCoord::from_degrees(0.0, 0.0), tags: TagSet::build(&mut table, []) },
            Node { id: 3, coord: GeoCoord::from_degrees(0.5, 0.5), tags: TagSet::build(&mut table, []) },
        ];
        let ds = DataSet::from_parts(nodes, vec![], vec![], table);
        assert_eq!(ds.node(1).unwrap().id, 1);
        assert_eq!(ds.node(3).unwrap().id, 3);
        assert!(ds.node(42).is_none());
    }

    #[test]
    fn iteration_order_is_relations_then_ways_then_nodes() {
        let mut table = TagKeyTable::new();
        let nodes = vec![Node { id: 1, coord: GeoCoord::from_degrees(0.0, 0.0), tags: TagSet::build(&mut table, []) }];
        let ways = vec![Way { id: 2, node_ids: vec![1], tags: TagSet::build(&mut table, []), bbox: None }];
        let relations = vec![Relation { id: 3, members: vec![], tags: TagSet::build(&mut table, []), bbox: None }];
        let ds = DataSet::from_parts(nodes, ways, relations, table);
        let ids: Vec<ElementId> = ds.iter_elements().map(|e| e.id().unwrap()).collect();
        assert_eq!(ids, vec![3, 2, 1]);
    }
}
