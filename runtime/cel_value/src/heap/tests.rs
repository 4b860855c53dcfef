use super::*;

#[test]
fn test_counted_clone_shares_payload() {
    let h1: Heap<'_, Vec<i64>> = Heap::Counted(Arc::new(vec![1, 2, 3]));
    let h2 = h1.clone();
    assert_eq!(*h1, *h2);
    assert!(Heap::ptr_eq(&h1, &h2));
    assert_eq!(Heap::strong_count(&h1), Some(2));
    drop(h2);
    assert_eq!(Heap::strong_count(&h1), Some(1));
}

#[test]
fn test_arena_clone_copies_reference() {
    let arena = bumpalo::Bump::new();
    let payload: &[i64; 2] = arena.alloc([4, 5]);
    let h1 = Heap::Arena(payload);
    let h2 = h1.clone();
    assert!(Heap::ptr_eq(&h1, &h2));
    assert_eq!(Heap::strong_count(&h1), None);
    assert_eq!(h2.locality(), Locality::ArenaAllocated);
}

#[test]
fn test_distinct_payloads_are_not_ptr_eq() {
    let h1: Heap<'_, str> = Heap::Counted(Arc::from("a"));
    let h2: Heap<'_, str> = Heap::Counted(Arc::from("a"));
    assert_eq!(&*h1, &*h2);
    assert!(!Heap::ptr_eq(&h1, &h2));
    assert_eq!(h1.locality(), Locality::ReferenceCounted);
}
