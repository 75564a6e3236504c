use std::collections::HashSet;

use stagehand_export::stagehand_stage::PropertyValue;
use stagehand_export::{AllocError, AnimationId, AnimationIdAllocator, construct_item_group};

#[test]
fn thousand_item_groups_get_distinct_ids() {
    let mut ids = AnimationIdAllocator::default();
    let mut seen = HashSet::new();
    for _ in 0..1000 {
        let (properties, id) = construct_item_group(&mut ids).unwrap();
        assert!(id.get() >= 1);
        assert_eq!(
            properties.get("animId"),
            Some(&PropertyValue::Int(id.get().into()))
        );
        assert!(seen.insert(id), "id {id} handed out twice");
    }
    assert_eq!(ids.len(), 1000);
}

#[test]
fn released_ids_become_available_again() {
    let mut ids = AnimationIdAllocator::with_seed(42);
    let first = ids.allocate().unwrap();
    assert!(ids.contains(first));
    ids.release(first);
    assert!(!ids.contains(first));
    assert!(ids.reserve(first));
    assert!(!ids.reserve(first));
}

#[test]
fn construction_fails_once_every_id_is_reserved() {
    let mut ids = AnimationIdAllocator::with_seed(1);
    for raw in 1..=u16::MAX {
        ids.reserve(AnimationId::new(raw).unwrap());
    }
    assert!(matches!(
        construct_item_group(&mut ids),
        Err(AllocError::ResourceExhausted(_))
    ));
}
