//! Algebraic laws of the pipeline combinators, checked against the standard
//! library's eager equivalents.

use quickcheck::quickcheck;

use lazy_seq::{lazy, Sequence, SequenceExt, Step, TerminalExt};

quickcheck! {
    fn to_vec_equals_each_order(xs: Vec<i32>) -> bool {
        let seq = lazy(xs);
        let mut visited = Vec::new();
        seq.each(&mut |e, _| {
            visited.push(e);
            Step::Continue
        });
        visited == seq.to_vec()
    }

    fn map_matches_std(xs: Vec<i32>) -> bool {
        let expected: Vec<i32> = xs.iter().map(|x| x.wrapping_mul(3)).collect();
        lazy(xs).map(|x, _| x.wrapping_mul(3)).to_vec() == expected
    }

    fn filter_matches_std(xs: Vec<i32>) -> bool {
        let expected: Vec<i32> = xs.iter().copied().filter(|x| x % 2 == 0).collect();
        lazy(xs).filter(|x, _| x % 2 == 0).to_vec() == expected
    }

    fn map_composition(xs: Vec<i32>) -> bool {
        let chained = lazy(xs.clone())
            .map(|x, _| x.wrapping_add(1))
            .map(|x, _| x.wrapping_mul(2))
            .to_vec();
        let fused = lazy(xs).map(|x, _| x.wrapping_add(1).wrapping_mul(2)).to_vec();
        chained == fused
    }

    fn double_reverse_is_identity(xs: Vec<i32>) -> bool {
        lazy(xs.clone()).reverse().reverse().to_vec() == xs
    }

    fn take_never_exceeds_n(xs: Vec<i32>, n: usize) -> bool {
        let n = n % 32;
        let len = xs.len();
        let taken = lazy(xs).take(n).to_vec();
        taken.len() <= n && (len < n || taken.len() == n)
    }

    fn take_concat_skip_is_identity(xs: Vec<i32>, n: usize) -> bool {
        let n = n % (xs.len() + 1);
        let rejoined = lazy(xs.clone())
            .take(n)
            .concat(lazy(xs.clone()).skip(n))
            .to_vec();
        rejoined == xs
    }

    fn uniq_keeps_each_value_once_in_first_occurrence_order(xs: Vec<u8>) -> bool {
        let mut expected = Vec::new();
        for x in &xs {
            if !expected.contains(x) {
                expected.push(*x);
            }
        }
        lazy(xs).uniq().to_vec() == expected
    }

    fn sort_is_non_decreasing(xs: Vec<i32>) -> bool {
        let sorted = lazy(xs).sort().to_vec();
        sorted.windows(2).all(|w| w[0] <= w[1])
    }

    fn sum_matches_std(xs: Vec<i32>) -> bool {
        let widened: Vec<i64> = xs.iter().map(|x| *x as i64).collect();
        let expected: i64 = widened.iter().sum();
        lazy(widened).sum() == expected
    }
}
