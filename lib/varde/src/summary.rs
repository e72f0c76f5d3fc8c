use ahash::RandomState;
use std::collections::HashMap;

/// Running aggregate for one key, in fixed-point tenths. `sum` is i64 so a
/// billion-record key stays far below overflow.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeySummary {
    pub min: i32,
    pub max: i32,
    pub sum: i64,
    pub count: u64,
}

impl KeySummary {
    pub fn new(tenths: i32) -> Self {
        Self { min: tenths, max: tenths, sum: i64::from(tenths), count: 1 }
    }

    pub fn update(&mut self, tenths: i32) {
        self.min = self.min.min(tenths);
        self.max = self.max.max(tenths);
        self.sum += i64::from(tenths);
        self.count += 1;
    }

    /// Combines two aggregates for the same key. Associative and commutative,
    /// so per-worker tables can be folded in any order.
    pub fn merge(&mut self, other: &KeySummary) {
        self.min = self.min.min(other.min);
        self.max = self.max.max(other.max);
        self.sum += other.sum;
        self.count += other.count;
    }

    /// Ceiling of sum/count in tenths. Computed once, at report time.
    pub fn mean_tenths(&self) -> i64 {
        ceil_div(self.sum, self.count as i64)
    }
}

// count >= 1 always holds (KeySummary is only built from a first observation).
fn ceil_div(num: i64, den: i64) -> i64 {
    num.div_euclid(den) + i64::from(num.rem_euclid(den) != 0)
}

/// Per-worker key -> aggregate mapping. Each worker owns one exclusively; the
/// reducer takes them by value, so a table can only be merged away once.
#[derive(Debug, Default)]
pub struct SummaryTable {
    entries: HashMap<Box<[u8]>, KeySummary, RandomState>,
}

impl SummaryTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one observation. Copies the key only on first sighting.
    pub fn record(&mut self, key: &[u8], tenths: i32) {
        match self.entries.get_mut(key) {
            Some(summary) => summary.update(tenths),
            None => {
                self.entries.insert(key.into(), KeySummary::new(tenths));
            }
        }
    }

    /// Folds `other` into `self`, consuming it.
    pub fn merge(&mut self, other: SummaryTable) {
        for (key, summary) in other.entries {
            match self.entries.get_mut(&key) {
                Some(existing) => existing.merge(&summary),
                None => {
                    self.entries.insert(key, summary);
                }
            }
        }
    }

    pub fn get(&self, key: &[u8]) -> Option<&KeySummary> {
        self.entries.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&[u8], &KeySummary)> {
        self.entries.iter().map(|(k, v)| (&**k, v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total_count(&self) -> u64 {
        self.entries.values().map(|s| s.count).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_observation_seeds_all_fields() {
        let s = KeySummary::new(-35);
        assert_eq!(s, KeySummary { min: -35, max: -35, sum: -35, count: 1 });
    }

    #[test]
    fn update_folds_min_max_sum_count() {
        let mut s = KeySummary::new(352);
        s.update(-10);
        assert_eq!(s, KeySummary { min: -10, max: 352, sum: 342, count: 2 });
    }

    #[test]
    fn mean_is_exact_ceiling() {
        let mut s = KeySummary::new(352);
        s.update(-10);
        // ceil(342 / 2) = 171
        assert_eq!(s.mean_tenths(), 171);

        let mut neg = KeySummary::new(-7);
        neg.update(0);
        // ceil(-3.5) = -3
        assert_eq!(neg.mean_tenths(), -3);

        let mut exact = KeySummary::new(10);
        exact.update(10);
        assert_eq!(exact.mean_tenths(), 10);
    }

    #[test]
    fn merge_is_commutative() {
        let mut a = KeySummary::new(5);
        a.update(100);
        let mut b = KeySummary::new(-20);
        b.update(3);

        let mut ab = a.clone();
        ab.merge(&b);
        let mut ba = b.clone();
        ba.merge(&a);
        assert_eq!(ab, ba);
        assert_eq!(ab, KeySummary { min: -20, max: 100, sum: 88, count: 4 });
    }

    #[test]
    fn table_merge_unions_and_combines() {
        let mut left = SummaryTable::new();
        left.record(b"Tokyo", 352);
        left.record(b"Paris", 105);

        let mut right = SummaryTable::new();
        right.record(b"Tokyo", -10);
        right.record(b"Oslo", 0);

        left.merge(right);
        assert_eq!(left.len(), 3);
        assert_eq!(
            left.get(b"Tokyo"),
            Some(&KeySummary { min: -10, max: 352, sum: 342, count: 2 })
        );
        assert_eq!(left.get(b"Oslo"), Some(&KeySummary::new(0)));
        assert_eq!(left.get(b"Paris"), Some(&KeySummary::new(105)));
    }
}
