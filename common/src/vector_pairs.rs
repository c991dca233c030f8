// A container of (A, B) pairs behind two interchangeable layouts: a single
// vector of tuples, or two parallel columns. The dual layout sorts by
// building an index permutation and rotating both columns in place, and it
// can hand its columns over without copying, which the zero-overhead trie
// data build relies on.

/// Pair container with forward (A, B) and reversed (B, A) sorting.
#[derive(Debug)]
pub enum VectorPairs<A, B> {
    Simple(Vec<(A, B)>),
    Dual { first: Vec<A>, second: Vec<B> },
}

impl<A: Copy + Ord, B: Copy + Ord> VectorPairs<A, B> {
    pub fn new_simple() -> Self {
        VectorPairs::Simple(Vec::new())
    }

    pub fn new_dual() -> Self {
        VectorPairs::Dual {
            first: Vec::new(),
            second: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            VectorPairs::Simple(v) => v.len(),
            VectorPairs::Dual { first, .. } => first.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn reserve(&mut self, additional: usize) {
        match self {
            VectorPairs::Simple(v) => v.reserve(additional),
            VectorPairs::Dual { first, second } => {
                first.reserve(additional);
                second.reserve(additional);
            }
        }
    }

    pub fn push(&mut self, a: A, b: B) {
        match self {
            VectorPairs::Simple(v) => v.push((a, b)),
            VectorPairs::Dual { first, second } => {
                first.push(a);
                second.push(b);
            }
        }
    }

    fn get(&self, i: usize) -> (A, B) {
        match self {
            VectorPairs::Simple(v) => v[i],
            VectorPairs::Dual { first, second } => (first[i], second[i]),
        }
    }

    /// Sort by (A, B).
    pub fn sort_by_fwd(&mut self) {
        match self {
            VectorPairs::Simple(v) => v.sort_unstable(),
            VectorPairs::Dual { first, second } => {
                let mut perm = index_permutation(first.len(), |i, j| {
                    (first[i], second[i]).cmp(&(first[j], second[j]))
                });
                apply_permutation(&mut perm, first, second);
            }
        }
    }

    /// Sort by (B, A).
    pub fn sort_by_rev(&mut self) {
        match self {
            VectorPairs::Simple(v) => {
                v.sort_unstable_by(|x, y| (x.1, x.0).cmp(&(y.1, y.0)));
            }
            VectorPairs::Dual { first, second } => {
                let mut perm = index_permutation(first.len(), |i, j| {
                    (second[i], first[i]).cmp(&(second[j], first[j]))
                });
                apply_permutation(&mut perm, first, second);
            }
        }
    }

    /// Drop adjacent equal pairs; call after one of the sorts.
    pub fn unique(&mut self) {
        match self {
            VectorPairs::Simple(v) => v.dedup(),
            VectorPairs::Dual { first, second } => {
                let mut w = 0;
                for r in 0..first.len() {
                    if r == 0 || (first[r], second[r]) != (first[w - 1], second[w - 1]) {
                        first[w] = first[r];
                        second[w] = second[r];
                        w += 1;
                    }
                }
                first.truncate(w);
                second.truncate(w);
            }
        }
    }

    pub fn iter_fwd(&self) -> impl Iterator<Item = (A, B)> + '_ {
        (0..self.len()).map(move |i| self.get(i))
    }

    pub fn iter_rev(&self) -> impl Iterator<Item = (B, A)> + '_ {
        (0..self.len()).map(move |i| {
            let (a, b) = self.get(i);
            (b, a)
        })
    }

    /// Move both columns out, consuming the container. The simple layout
    /// splits its vector; the dual layout hands its columns over as-is.
    pub fn take_columns(self) -> (Vec<A>, Vec<B>) {
        match self {
            VectorPairs::Simple(v) => v.into_iter().unzip(),
            VectorPairs::Dual { first, second } => (first, second),
        }
    }

    /// Append all pairs of `other`.
    pub fn append(&mut self, other: VectorPairs<A, B>) {
        self.reserve(other.len());
        match other {
            VectorPairs::Simple(v) => {
                for (a, b) in v {
                    self.push(a, b);
                }
            }
            VectorPairs::Dual { first, second } => {
                for (a, b) in first.into_iter().zip(second) {
                    self.push(a, b);
                }
            }
        }
    }
}

fn index_permutation(
    len: usize,
    mut cmp: impl FnMut(usize, usize) -> std::cmp::Ordering,
) -> Vec<u32> {
    let mut perm: Vec<u32> = (0..len as u32).collect();
    perm.sort_unstable_by(|&i, &j| cmp(i as usize, j as usize));
    perm
}

// Rearrange both columns so that position i receives the element previously
// at perm[i]. Rotates each cycle with a single held element; destroys perm.
fn apply_permutation<A: Copy, B: Copy>(perm: &mut [u32], first: &mut [A], second: &mut [B]) {
    const DONE: u32 = u32::MAX;
    for i in 0..perm.len() {
        if perm[i] == DONE || perm[i] as usize == i {
            perm[i] = DONE;
            continue;
        }
        let held = (first[i], second[i]);
        let mut j = i;
        loop {
            let src = perm[j] as usize;
            perm[j] = DONE;
            if src == i {
                first[j] = held.0;
                second[j] = held.1;
                break;
            }
            first[j] = first[src];
            second[j] = second[src];
            j = src;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rand::{Rng, SeedableRng};

    fn filled(dual: bool, pairs: &[(u32, u32)]) -> VectorPairs<u32, u32> {
        let mut vp = if dual {
            VectorPairs::new_dual()
        } else {
            VectorPairs::new_simple()
        };
        for &(a, b) in pairs {
            vp.push(a, b);
        }
        vp
    }

    #[test]
    fn test_sort_fwd_both_layouts() {
        let input = [(3u32, 1u32), (1, 2), (3, 0), (1, 1), (0, 9)];
        let expected = vec![(0u32, 9u32), (1, 1), (1, 2), (3, 0), (3, 1)];
        for dual in [false, true] {
            let mut vp = filled(dual, &input);
            vp.sort_by_fwd();
            assert_eq!(vp.iter_fwd().collect::<Vec<_>>(), expected);
        }
    }

    #[test]
    fn test_sort_rev_both_layouts() {
        let input = [(3u32, 1u32), (1, 2), (3, 0), (1, 1), (0, 9)];
        let expected = vec![(3u32, 0u32), (1, 1), (3, 1), (1, 2), (0, 9)];
        for dual in [false, true] {
            let mut vp = filled(dual, &input);
            vp.sort_by_rev();
            assert_eq!(vp.iter_fwd().collect::<Vec<_>>(), expected);
        }
    }

    #[test]
    fn test_unique() {
        for dual in [false, true] {
            let mut vp = filled(dual, &[(1, 1), (1, 1), (1, 2), (2, 2), (2, 2), (2, 2)]);
            vp.unique();
            assert_eq!(
                vp.iter_fwd().collect::<Vec<_>>(),
                vec![(1, 1), (1, 2), (2, 2)]
            );
        }
    }

    #[test]
    fn test_dual_matches_simple_on_random_input() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(23);
        let input: Vec<(u32, u32)> = (0..500)
            .map(|_| (rng.gen_range(0..50), rng.gen_range(0..50)))
            .collect();
        let mut simple = filled(false, &input);
        let mut dual = filled(true, &input);
        simple.sort_by_fwd();
        dual.sort_by_fwd();
        simple.unique();
        dual.unique();
        assert_eq!(
            simple.iter_fwd().collect::<Vec<_>>(),
            dual.iter_fwd().collect::<Vec<_>>()
        );
        simple.sort_by_rev();
        dual.sort_by_rev();
        assert_eq!(
            simple.iter_rev().collect::<Vec<_>>(),
            dual.iter_rev().collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_take_columns() {
        let vp = filled(true, &[(1, 10), (2, 20), (3, 30)]);
        let (a, b) = vp.take_columns();
        assert_eq!(a, vec![1, 2, 3]);
        assert_eq!(b, vec![10, 20, 30]);
    }
}
