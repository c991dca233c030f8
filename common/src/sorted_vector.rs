// A non-decreasing integer sequence stored as one beacon every
// BEACON_INTERVAL entries plus a byte-sized diff per entry. Diffs that do
// not fit a byte spill into a hash map behind a sentinel value. Random
// access walks at most BEACON_INTERVAL - 1 diffs from the nearest beacon.

use std::collections::HashMap;

const DIFF_SENTINEL: u8 = u8::MAX;

/// Diff-encoded non-decreasing vector of u32 values.
#[derive(Debug)]
pub struct SortedVector {
    beacons: Vec<u32>,
    diffs: Vec<u8>,
    overflow: HashMap<u32, u32>,
    beacon_interval: u32,
    last: u32,
}

impl SortedVector {
    pub fn new() -> Self {
        Self::with_interval(32)
    }

    pub fn with_interval(beacon_interval: u32) -> Self {
        assert!(beacon_interval > 0);
        SortedVector {
            beacons: Vec::new(),
            diffs: Vec::new(),
            overflow: HashMap::new(),
            beacon_interval,
            last: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.diffs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diffs.is_empty()
    }

    pub fn reserve(&mut self, additional: usize) {
        self.diffs.reserve(additional);
        self.beacons
            .reserve(additional / self.beacon_interval as usize + 1);
    }

    /// Append `value`, which must be >= the last pushed value.
    pub fn push(&mut self, value: u32) {
        debug_assert!(self.is_empty() || value >= self.last);
        let idx = self.diffs.len() as u32;
        if idx % self.beacon_interval == 0 {
            self.beacons.push(value);
        }
        // a diff is recorded even for beacon entries, so indexing stays uniform
        let diff = value - if idx == 0 { 0 } else { self.last };
        if diff < DIFF_SENTINEL as u32 {
            self.diffs.push(diff as u8);
        } else {
            self.diffs.push(DIFF_SENTINEL);
            self.overflow.insert(idx, diff);
        }
        self.last = value;
    }

    /// Value at `idx`: nearest beacon plus the following diffs.
    pub fn get(&self, idx: usize) -> u32 {
        debug_assert!(idx < self.len());
        let idx = idx as u32;
        let quot = idx / self.beacon_interval;
        let rem = idx % self.beacon_interval;
        let mut res = self.beacons[quot as usize];
        let base = idx - rem;
        for i in 1..=rem {
            res += self.get_diff((base + i) as usize);
        }
        res
    }

    /// The difference `self[idx] - self[idx - 1]` (the value itself at 0).
    pub fn get_diff(&self, idx: usize) -> u32 {
        let d = self.diffs[idx];
        if d != DIFF_SENTINEL {
            d as u32
        } else {
            self.overflow[&(idx as u32)]
        }
    }

    /// True iff `self[idx] == self[idx - 1]`, in O(1).
    pub fn is_zero_diff(&self, idx: usize) -> bool {
        self.diffs[idx] == 0
    }

    /// The unique `i` with `self[i] <= value < self[i + 1]`. The caller must
    /// guarantee `self[0] <= value`; past-the-end values map to the last
    /// index.
    pub fn binary_search(&self, value: u32) -> usize {
        debug_assert!(!self.is_empty() && self.beacons[0] <= value);
        // locate the last beacon <= value, then walk its stride
        let b = self.beacons.partition_point(|&x| x <= value) - 1;
        let mut idx = b * self.beacon_interval as usize;
        let mut cur = self.beacons[b];
        let end = (idx + self.beacon_interval as usize).min(self.len());
        while idx + 1 < end {
            let next = cur + self.get_diff(idx + 1);
            if next > value {
                break;
            }
            cur = next;
            idx += 1;
        }
        idx
    }

    /// Build the CSR starts sequence for a sorted key sequence: one entry
    /// per key in `0..=max_key` plus a final sentinel holding the total
    /// count. `keys` must be non-decreasing.
    pub fn from_elem_seq(keys: impl IntoIterator<Item = u32>, max_key: u32) -> Self {
        let mut res = SortedVector::new();
        let mut pos = 0u32;
        for key in keys {
            while res.len() <= key as usize {
                res.push(pos);
            }
            pos += 1;
        }
        while res.len() <= max_key as usize + 1 {
            res.push(pos);
        }
        res
    }

    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        let mut sum = 0u32;
        (0..self.len()).map(move |i| {
            sum += self.get_diff(i);
            sum
        })
    }
}

impl Default for SortedVector {
    fn default() -> Self {
        Self::new()
    }
}
