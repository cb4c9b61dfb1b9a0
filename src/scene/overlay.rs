use std::collections::HashSet;

use crate::level::{ElementKey, MapLevel};

/// A capability that enumerates additional elements visible per floor,
/// plus a set of element ids the overlay hides regardless of the level
/// map's own answer. Consumed identically
/// by the scene controller ([`super::controller::build_scene`]) and the
/// navmesh builder ([`crate::navmesh`]) — neither owns overlay storage,
/// both just ask this trait.
pub trait OverlaySource {
    /// Element keys this overlay injects for `floor`, on top of whatever
    /// the level map already resolves there.
    fn extra_elements(&self, floor: MapLevel) -> Vec<ElementKey>;

    /// Element ids hidden by this overlay, irrespective of level or type.
    fn hidden_ids(&self) -> &HashSet<crate::osm::ElementId>;
}

/// The no-op overlay: no extra elements, nothing hidden. The default
/// when a caller has no overlay data source to inject.
#[derive(Default)]
pub struct NoOverlay {
    empty: HashSet<crate::osm::ElementId>,
}

impl OverlaySource for NoOverlay {
    fn extra_elements(&self, _floor: MapLevel) -> Vec<ElementKey> {
        Vec::new()
    }

    fn hidden_ids(&self) -> &HashSet<crate::osm::ElementId> {
        &self.empty
    }
}

/// A fixed overlay useful for tests and for overlays that never change
/// once constructed: a per-floor extra-element table plus a hidden-id
/// set.
#[derive(Default)]
pub struct StaticOverlay {
    pub extra_by_floor: std::collections::HashMap<MapLevel, Vec<ElementKey>>,
    pub hidden: HashSet<crate::osm::ElementId>,
}

impl OverlaySource for StaticOverlay {
    fn extra_elements(&self, floor: MapLevel) -> Vec<ElementKey> {
        self.extra_by_floor.get(&floor).cloned().unwrap_or_default()
    }

    fn hidden_ids(&self) -> &HashSet<crate::osm::ElementId> {
        &self.hidden
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::osm::ElementType;

    #[test]
    fn no_overlay_hides_and_adds_nothing() {
        let overlay = NoOverlay::default();
        assert!(overlay.extra_elements(MapLevel(0)).is_empty());
        assert!(overlay.hidden_ids().is_empty());
    }

    #[test]
    fn static_overlay_returns_per_floor_extras() {
        let mut overlay = StaticOverlay::default();
        overlay.extra_by_floor.insert(MapLevel(10), vec![ElementKey(ElementType::Node, 99)]);
        overlay.hidden.insert(5);
        assert_eq!(overlay.extra_elements(MapLevel(10)), vec![ElementKey(ElementType::Node, 99)]);
        assert!(overlay.extra_elements(MapLevel(0)).is_empty());
        assert!(overlay.hidden_ids().contains(&5));
    }
}
