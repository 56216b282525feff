//! Stress tests that push the heap through large operation volumes
//!
//! These tests perform thousands of operations in various patterns to
//! catch edge cases that small hand-written cases miss: deep trees, long
//! bubble paths, repeated merges, and heavy handle churn.

use mergeq::{BinomialHeap, TieBreak};

/// Deterministic pseudo-random sequence so failures reproduce exactly.
struct Lcg(u64);

impl Lcg {
    fn new(seed: u64) -> Self {
        Lcg(seed)
    }

    fn next(&mut self) -> u64 {
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        self.0 >> 33
    }
}

#[test]
fn massive_sequential_insert_and_pop() {
    let mut heap: BinomialHeap<i32, i32> = BinomialHeap::new();

    for i in 0..10_000 {
        heap.push_with_handle(i, i).unwrap();
    }
    assert_eq!(heap.len(), 10_000);
    assert!(heap.verify_internal_structure());

    for i in 0..10_000 {
        assert_eq!(heap.pop(), Some((i, Some(i))));
    }
    assert!(heap.is_empty());
}

#[test]
fn reverse_order_insert() {
    let mut heap: BinomialHeap<i32, i32> = BinomialHeap::new();

    for i in (0..5_000).rev() {
        heap.push_with_handle(i, i).unwrap();
        assert_eq!(heap.peek(), Some((&i, Some(&i))));
    }
    assert!(heap.verify_internal_structure());

    for i in 0..5_000 {
        assert_eq!(heap.pop(), Some((i, Some(i))));
    }
}

#[test]
fn interleaved_insert_and_pop() {
    let mut heap: BinomialHeap<u64, u64> = BinomialHeap::new();
    let mut rng = Lcg::new(42);
    let mut live = 0usize;

    for round in 0..5_000u64 {
        let priority = rng.next();
        heap.push_with_handle(priority, round).unwrap();
        live += 1;

        if round % 3 == 0 {
            assert!(heap.pop().is_some());
            live -= 1;
        }
        assert_eq!(heap.len(), live);
    }
    assert!(heap.verify_internal_structure());

    let mut last = 0u64;
    while let Some((p, _)) = heap.pop() {
        assert!(p >= last);
        last = p;
    }
}

#[test]
fn heavy_decrease_key_churn() {
    let mut heap: BinomialHeap<i64, usize> = BinomialHeap::new();
    let mut rng = Lcg::new(7);
    let count = 2_000usize;

    let mut priorities: Vec<i64> = Vec::with_capacity(count);
    for i in 0..count {
        let p = 1_000_000 + (rng.next() % 1_000_000) as i64;
        heap.push_with_handle(p, i).unwrap();
        priorities.push(p);
    }

    // Repeatedly drop random entries toward the front.
    for _ in 0..5_000 {
        let i = (rng.next() as usize) % count;
        let new_priority = (rng.next() % 2_000_000) as i64;
        if new_priority < priorities[i] {
            assert_eq!(heap.update_priority(&i, new_priority), Ok(true));
            priorities[i] = new_priority;
        }
    }
    assert!(heap.verify_internal_structure());

    let expected_min = priorities.iter().copied().min();
    assert_eq!(heap.peek().map(|(p, _)| *p), expected_min);

    let mut drained: Vec<i64> = Vec::with_capacity(count);
    while let Some((p, _)) = heap.pop() {
        drained.push(p);
    }
    priorities.sort_unstable();
    assert_eq!(drained, priorities);
}

#[test]
fn increase_and_decrease_mixed() {
    let mut heap: BinomialHeap<i64, usize> = BinomialHeap::new();
    let mut rng = Lcg::new(99);
    let count = 1_000usize;

    let mut priorities: Vec<i64> = Vec::with_capacity(count);
    for i in 0..count {
        let p = (rng.next() % 10_000) as i64;
        heap.push_with_handle(p, i).unwrap();
        priorities.push(p);
    }

    for _ in 0..3_000 {
        let i = (rng.next() as usize) % count;
        let new_priority = (rng.next() % 10_000) as i64;
        let changed = new_priority != priorities[i];
        assert_eq!(heap.update_priority(&i, new_priority), Ok(changed));
        priorities[i] = new_priority;
    }
    assert!(heap.verify_internal_structure());

    let mut drained: Vec<i64> = Vec::with_capacity(count);
    while let Some((p, _)) = heap.pop() {
        drained.push(p);
    }
    priorities.sort_unstable();
    assert_eq!(drained, priorities);
}

#[test]
fn random_removal_pattern() {
    let mut heap: BinomialHeap<u64, usize> = BinomialHeap::new();
    let mut rng = Lcg::new(1234);
    let count = 2_000usize;

    let mut priorities: Vec<u64> = Vec::with_capacity(count);
    for i in 0..count {
        let p = rng.next();
        heap.push_with_handle(p, i).unwrap();
        priorities.push(p);
    }

    // Remove every third handle out from under the heap.
    let mut survivors: Vec<u64> = Vec::new();
    for i in 0..count {
        if i % 3 == 0 {
            assert_eq!(heap.remove(&i), Ok(priorities[i]));
        } else {
            survivors.push(priorities[i]);
        }
    }
    assert_eq!(heap.len(), survivors.len());
    assert!(heap.verify_internal_structure());

    let mut drained: Vec<u64> = Vec::new();
    while let Some((p, _)) = heap.pop() {
        drained.push(p);
    }
    survivors.sort_unstable();
    assert_eq!(drained, survivors);
}

#[test]
fn repeated_merges_build_one_heap() {
    let mut rng = Lcg::new(5);
    let mut accumulated: BinomialHeap<u64, u64> = BinomialHeap::new();
    let mut expected: Vec<u64> = Vec::new();
    let mut next_handle = 0u64;

    // Merge 50 heaps of varying size into one.
    for round in 0..50 {
        let mut piece: BinomialHeap<u64, u64> = BinomialHeap::new();
        for _ in 0..(round % 7) + 1 {
            let p = rng.next();
            piece.push_with_handle(p, next_handle).unwrap();
            expected.push(p);
            next_handle += 1;
        }
        accumulated.merge(piece);
        assert!(accumulated.verify_internal_structure());
    }
    assert_eq!(accumulated.len(), expected.len());

    // Every handle from every absorbed piece remains addressable.
    for h in 0..next_handle {
        assert!(accumulated.priority_of(&h).is_some());
    }

    let mut drained: Vec<u64> = Vec::new();
    while let Some((p, _)) = accumulated.pop() {
        drained.push(p);
    }
    expected.sort_unstable();
    assert_eq!(drained, expected);
}

#[test]
fn many_equal_priorities_prefer_new() {
    let mut heap: BinomialHeap<i32, usize> = BinomialHeap::new();
    for i in 0..1_000 {
        heap.push_with_handle(7, i).unwrap();
    }
    assert!(heap.verify_internal_structure());

    let mut count = 0;
    while let Some((p, h)) = heap.pop() {
        assert_eq!(p, 7);
        assert!(h.is_some());
        count += 1;
    }
    assert_eq!(count, 1_000);
}

#[test]
fn many_equal_priorities_prefer_existing() {
    let mut heap: BinomialHeap<i32, usize> =
        BinomialHeap::with_tie_break(TieBreak::PreferExisting);
    for i in 0..1_000 {
        heap.push_with_handle(7, i).unwrap();
    }
    // With prefer-existing, the first insert stays at the front through
    // all subsequent equal-priority inserts.
    assert_eq!(heap.peek(), Some((&7, Some(&0))));
    assert!(heap.verify_internal_structure());
}

#[test]
fn grow_shrink_grow_cycles() {
    let mut heap: BinomialHeap<i32, i32> = BinomialHeap::new();

    for cycle in 0..10 {
        let base = cycle * 1_000;
        for i in 0..1_000 {
            heap.push_with_handle(base + i, base + i).unwrap();
        }
        for _ in 0..900 {
            assert!(heap.pop().is_some());
        }
        assert!(heap.verify_internal_structure());
    }

    // 10 cycles each leave 100 entries behind.
    assert_eq!(heap.len(), 1_000);
    let mut last = i32::MIN;
    while let Some((p, _)) = heap.pop() {
        assert!(p >= last);
        last = p;
    }
}
