use lazy_seq::{generate, lazy, Nested, Sequence, SequenceExt, TerminalExt};

#[test]
fn test_sort() {
    let sorted = lazy(vec![3, 1, 4, 1, 5, 9, 2, 6]).sort().to_vec();
    assert_eq!(sorted, vec![1, 1, 2, 3, 4, 5, 6, 9]);
}

#[test]
fn test_sort_terminates_on_incomparable_values() {
    let sorted = lazy(vec![3.0, f64::NAN, 1.0]).sort().to_vec();
    assert_eq!(sorted.len(), 3);
    assert!(sorted.iter().any(|x| *x == 1.0));
    assert!(sorted.iter().any(|x| *x == 3.0));
}

#[test]
fn test_sort_by_key() {
    let by_len = lazy(vec!["ccc", "a", "bb"])
        .sort_by_key(|s| s.len())
        .to_vec();
    assert_eq!(by_len, vec!["a", "bb", "ccc"]);
}

#[test]
fn test_sort_by_explicit_comparator() {
    let descending = lazy(vec![1, 3, 2]).sort_by(|a, b| b.cmp(a)).to_vec();
    assert_eq!(descending, vec![3, 2, 1]);
}

#[test]
fn test_sorted_node_is_indexable() {
    let sorted = lazy(vec![3, 1, 2]).sort();
    assert_eq!(sorted.size(), Some(3));
    assert_eq!(sorted.get(0), Some(1));
    assert_eq!(sorted.get(2), Some(3));
}

#[test]
fn test_reverse() {
    assert_eq!(lazy(vec![1, 2, 3]).reverse().to_vec(), vec![3, 2, 1]);
}

#[test]
fn test_double_reverse_is_identity() {
    let source = vec![1, 2, 3, 4];
    assert_eq!(lazy(source.clone()).reverse().reverse().to_vec(), source);
}

#[test]
fn test_reverse_indexable_parent_uses_random_access() {
    let reversed = lazy(vec![10, 20, 30]).reverse();
    assert_eq!(reversed.size(), Some(3));
    assert_eq!(reversed.get(0), Some(30));
    assert_eq!(reversed.get(2), Some(10));
    assert_eq!(reversed.get(3), None);
}

#[test]
fn test_reverse_over_non_indexable_materializes() {
    // deep flatten exposes no size/get, so reverse must buffer
    let reversed = lazy(vec![
        Nested::leaf(1),
        Nested::list(vec![Nested::leaf(2), Nested::leaf(3)]),
    ])
    .flatten_deep()
    .reverse();
    assert_eq!(reversed.to_vec(), vec![3, 2, 1]);
    assert_eq!(reversed.size(), Some(3));
    assert_eq!(reversed.get(0), Some(3));
}

#[test]
fn test_flatten_deep() {
    let flat = lazy(vec![
        Nested::leaf(1),
        Nested::list(vec![Nested::leaf(2), Nested::leaf(3)]),
        Nested::list(vec![Nested::leaf(4), Nested::list(vec![Nested::leaf(5)])]),
    ])
    .flatten_deep()
    .to_vec();
    assert_eq!(flat, vec![1, 2, 3, 4, 5]);
}

#[test]
fn test_uniq_small_source() {
    assert_eq!(lazy(vec![1, 2, 2, 3, 3, 3]).uniq().to_vec(), vec![1, 2, 3]);
}

#[test]
fn test_uniq_keeps_first_occurrence_order() {
    assert_eq!(
        lazy(vec![3, 1, 3, 2, 1, 2]).uniq().to_vec(),
        vec![3, 1, 2]
    );
}

#[test]
fn test_uniq_strategies_agree_across_sizes() {
    // the three size-selected strategies must be observably identical
    for len in [10usize, 100, 1000] {
        let source: Vec<usize> = (0..len).map(|i| i % 7).collect();
        let expected: Vec<usize> = (0..len.min(7)).collect();
        assert_eq!(lazy(source).uniq().to_vec(), expected, "len = {}", len);
    }
}

#[test]
fn test_uniq_over_unsized_parent_falls_back_to_set() {
    let seq = generate(|i| i % 3, None).take(50);
    assert_eq!(seq.uniq().to_vec(), vec![0, 1, 2]);
}

#[test]
fn test_uniq_node_is_indexable_through_its_cache() {
    let uniq = lazy(vec![1, 1, 2, 3, 3]).uniq();
    assert_eq!(uniq.size(), Some(3));
    assert_eq!(uniq.get(2), Some(3));
}

#[test]
fn test_shuffle_is_a_permutation() {
    let source = vec![1, 2, 3, 4, 5, 6, 7, 8];
    let shuffled = lazy(source.clone()).shuffle();
    let mut drawn = shuffled.to_vec();
    drawn.sort();
    assert_eq!(drawn, source);
}

#[test]
fn test_shuffle_draws_one_permutation_per_node() {
    let shuffled = lazy((0..100).collect::<Vec<i32>>()).shuffle();
    assert_eq!(shuffled.to_vec(), shuffled.to_vec());
}

#[test]
fn test_group_by() {
    let groups = lazy(vec![1, 2, 3, 4, 5, 6])
        .group_by(|x| x % 2)
        .to_vec();
    assert_eq!(groups, vec![(1, vec![1, 3, 5]), (0, vec![2, 4, 6])]);
}

#[test]
fn test_count_by() {
    let counts = lazy(vec!["apple", "avocado", "banana"])
        .count_by(|s| s.chars().next())
        .to_vec();
    assert_eq!(counts, vec![(Some('a'), 2), (Some('b'), 1)]);
}

#[test]
fn test_without() {
    let kept = lazy(vec![1, 2, 1, 3, 4]).without(vec![1, 3]).to_vec();
    assert_eq!(kept, vec![2, 4]);
}

#[test]
fn test_intersection() {
    let common = lazy(vec![1, 2, 2, 3, 4])
        .intersection(vec![vec![2, 3, 5], vec![2, 3, 4]])
        .to_vec();
    assert_eq!(common, vec![2, 3]);
}

#[test]
fn test_union() {
    let merged = lazy(vec![1, 2, 3]).union(vec![2, 3, 4]).to_vec();
    assert_eq!(merged, vec![1, 2, 3, 4]);
}

#[test]
fn test_initial() {
    assert_eq!(lazy(vec![1, 2, 3, 4]).initial(1).to_vec(), vec![1, 2, 3]);
    assert_eq!(lazy(vec![1, 2]).initial(5).to_vec(), Vec::<i32>::new());
}

#[test]
fn test_initial_over_unsized_parent_materializes() {
    let seq = lazy(vec![Some(1), None, Some(2), Some(3)])
        .compact()
        .initial(1);
    assert_eq!(seq.to_vec(), vec![1, 2]);
    assert_eq!(seq.size(), Some(2));
}

#[test]
fn test_last_n() {
    assert_eq!(lazy(vec![1, 2, 3, 4, 5]).last_n(2).to_vec(), vec![4, 5]);
    assert_eq!(lazy(vec![1, 2]).last_n(5).to_vec(), vec![1, 2]);
}

#[test]
fn test_memoize_passes_indexable_parents_through() {
    let memoized = lazy(vec![1, 2, 3]).memoize();
    assert_eq!(memoized.size(), Some(3));
    assert_eq!(memoized.get(1), Some(2));
    assert_eq!(memoized.to_vec(), vec![1, 2, 3]);
}

#[test]
fn test_memoize_gives_unsized_pipelines_a_length() {
    let memoized = lazy(vec![Some(1), None, Some(3)]).compact().memoize();
    assert_eq!(memoized.size(), Some(2));
    assert_eq!(memoized.get(1), Some(3));
}
