//! Sticky bundle rotation across play sessions.
//!
//! Plays are grouped into segments of 10. Segment 0 always uses the default
//! bundle. Each later segment, up to the number of known bundles, is pinned
//! to a bundle drawn at random from those not yet used by any earlier slot.
//! Past that point every play picks any bundle at random without pinning.

use rand::seq::IndexedRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::bundle::DEFAULT_BUNDLE_ID;

/// Number of consecutive plays sharing one bundle.
pub const PLAYS_PER_SEGMENT: u32 = 10;

/// One bundle id slot per segment. Slots may be empty when segments were skipped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BundleRotation {
    slots: Vec<Option<String>>,
}

impl Default for BundleRotation {
    fn default() -> Self {
        Self {
            slots: vec![Some(DEFAULT_BUNDLE_ID.to_string())],
        }
    }
}

impl BundleRotation {
    pub fn from_slots(slots: Vec<Option<String>>) -> Self {
        Self { slots }
    }

    /// Parses a persisted rotation. Anything unreadable or empty yields the default.
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str::<Vec<Option<String>>>(json) {
            Ok(slots) if !slots.is_empty() => Self { slots },
            _ => Self::default(),
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(&self.slots).unwrap_or_else(|_| "[]".to_string())
    }

    pub fn slot(&self, segment: usize) -> Option<&str> {
        self.slots.get(segment).and_then(|s| s.as_deref())
    }

    pub fn slots(&self) -> &[Option<String>] {
        &self.slots
    }

    fn contains(&self, id: &str) -> bool {
        self.slots.iter().flatten().any(|s| s == id)
    }

    fn assign(&mut self, segment: usize, id: &str) {
        if self.slots.len() <= segment {
            self.slots.resize(segment + 1, None);
        }
        self.slots[segment] = Some(id.to_string());
    }
}

/// Result of resolving the bundle for one play.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleSelection {
    pub bundle_id: String,
    pub rotation: BundleRotation,
    /// True when a slot was assigned and the rotation must be persisted
    pub changed: bool,
}

/// Segment index for a 1-based play number. Play 0 is treated as play 1.
pub fn segment_index(next_play: u32) -> usize {
    (next_play.saturating_sub(1) / PLAYS_PER_SEGMENT) as usize
}

/// Resolves which bundle feeds round 3 of play `next_play`.
pub fn select_bundle<R: Rng + ?Sized>(
    next_play: u32,
    rotation: &BundleRotation,
    bundle_ids: &[&str],
    rng: &mut R,
) -> BundleSelection {
    let segment = segment_index(next_play);
    let mut rotation = rotation.clone();

    if segment == 0 || bundle_ids.is_empty() {
        let changed = rotation.slot(0).is_none();
        if changed {
            rotation.assign(0, DEFAULT_BUNDLE_ID);
        }
        return BundleSelection {
            bundle_id: DEFAULT_BUNDLE_ID.to_string(),
            rotation,
            changed,
        };
    }

    if segment < bundle_ids.len() {
        if let Some(id) = rotation.slot(segment) {
            return BundleSelection {
                bundle_id: id.to_string(),
                rotation,
                changed: false,
            };
        }

        let unused: Vec<&str> = bundle_ids
            .iter()
            .copied()
            .filter(|id| !rotation.contains(id))
            .collect();
        let pool = if unused.is_empty() { bundle_ids } else { &unused[..] };
        let picked = pool.choose(rng).copied().unwrap_or(DEFAULT_BUNDLE_ID);

        rotation.assign(segment, picked);
        return BundleSelection {
            bundle_id: picked.to_string(),
            rotation,
            changed: true,
        };
    }

    let picked = bundle_ids.choose(rng).copied().unwrap_or(DEFAULT_BUNDLE_ID);
    BundleSelection {
        bundle_id: picked.to_string(),
        rotation,
        changed: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::bundle::bundle_ids;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    #[test]
    fn test_first_ten_plays_use_default() {
        let mut rng = StdRng::seed_from_u64(1);
        let ids = bundle_ids();
        let rotation = BundleRotation::default();
        for play in 1..=10 {
            let sel = select_bundle(play, &rotation, &ids, &mut rng);
            assert_eq!(sel.bundle_id, DEFAULT_BUNDLE_ID);
            assert!(!sel.changed);
        }
    }

    #[test]
    fn test_empty_rotation_fills_slot_zero() {
        let mut rng = StdRng::seed_from_u64(1);
        let ids = bundle_ids();
        let sel = select_bundle(3, &BundleRotation::from_slots(vec![]), &ids, &mut rng);
        assert_eq!(sel.bundle_id, DEFAULT_BUNDLE_ID);
        assert!(sel.changed);
        assert_eq!(sel.rotation, BundleRotation::default());
    }

    #[test]
    fn test_segment_is_sticky() {
        let mut rng = StdRng::seed_from_u64(7);
        let ids = bundle_ids();
        let first = select_bundle(11, &BundleRotation::default(), &ids, &mut rng);
        assert!(first.changed);
        assert_ne!(first.bundle_id, DEFAULT_BUNDLE_ID);

        for play in 12..=20 {
            let sel = select_bundle(play, &first.rotation, &ids, &mut rng);
            assert_eq!(sel.bundle_id, first.bundle_id);
            assert!(!sel.changed);
        }
    }

    #[test]
    fn test_every_bundle_seen_once_before_reuse() {
        let mut rng = StdRng::seed_from_u64(42);
        let ids = bundle_ids();
        let mut rotation = BundleRotation::default();
        let mut seen = HashSet::new();
        seen.insert(DEFAULT_BUNDLE_ID.to_string());

        for segment in 1..ids.len() as u32 {
            let play = segment * PLAYS_PER_SEGMENT + 1;
            let sel = select_bundle(play, &rotation, &ids, &mut rng);
            assert!(
                seen.insert(sel.bundle_id.clone()),
                "bundle {} reused at segment {}",
                sel.bundle_id,
                segment
            );
            rotation = sel.rotation;
        }

        assert_eq!(seen.len(), ids.len());
        assert_eq!(rotation.slots().len(), ids.len());
    }

    #[test]
    fn test_skipped_segments_leave_holes() {
        let mut rng = StdRng::seed_from_u64(3);
        let ids = bundle_ids();
        let sel = select_bundle(35, &BundleRotation::default(), &ids, &mut rng);
        assert!(sel.changed);
        assert_eq!(sel.rotation.slots().len(), 4);
        assert!(sel.rotation.slot(1).is_none());
        assert_eq!(sel.rotation.slot(3), Some(sel.bundle_id.as_str()));
        assert_eq!(sel.rotation.to_json().matches("null").count(), 2);
    }

    #[test]
    fn test_exhausted_rotation_falls_back_to_any_bundle() {
        let mut rng = StdRng::seed_from_u64(5);
        let ids = ["a", "b", "c"];
        // Every id already used, slot 2 still empty
        let rotation = BundleRotation::from_slots(vec![
            Some("a".to_string()),
            Some("b".to_string()),
            None,
            Some("c".to_string()),
        ]);
        let sel = select_bundle(21, &rotation, &ids, &mut rng);
        assert!(sel.changed);
        assert!(ids.contains(&sel.bundle_id.as_str()));
        assert_eq!(sel.rotation.slot(2), Some(sel.bundle_id.as_str()));
    }

    #[test]
    fn test_beyond_bundle_count_does_not_persist() {
        let mut rng = StdRng::seed_from_u64(9);
        let ids = bundle_ids();
        let play = ids.len() as u32 * PLAYS_PER_SEGMENT + 1;
        let rotation = BundleRotation::default();
        let sel = select_bundle(play, &rotation, &ids, &mut rng);
        assert!(!sel.changed);
        assert_eq!(sel.rotation, rotation);
        assert!(ids.contains(&sel.bundle_id.as_str()));
    }

    #[test]
    fn test_from_json_defaults() {
        assert_eq!(BundleRotation::from_json("not json"), BundleRotation::default());
        assert_eq!(BundleRotation::from_json("[]"), BundleRotation::default());
        let parsed = BundleRotation::from_json(r#"["memil", null, "last"]"#);
        assert_eq!(parsed.slot(2), Some("last"));
        assert_eq!(parsed.to_json(), r#"["memil",null,"last"]"#);
    }
}
