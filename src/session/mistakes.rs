use std::collections::BTreeSet;

/// Two views of the same errors: `active` holds buffer indices that are
/// wrong right now and shrinks when the user erases them, `raw_count`
/// counts every mistake ever committed and never goes down.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Mistakes {
    active: BTreeSet<usize>,
    raw_count: usize,
}

impl Mistakes {
    pub fn record(&mut self, idx: usize) {
        self.active.insert(idx);
        self.raw_count += 1;
    }

    pub fn clear_at(&mut self, idx: usize) {
        self.active.remove(&idx);
    }

    pub fn retain_below(&mut self, len: usize) {
        self.active.retain(|&idx| idx < len);
    }

    pub fn is_active(&self, idx: usize) -> bool {
        self.active.contains(&idx)
    }

    /// Active indices in ascending order.
    pub fn active(&self) -> impl Iterator<Item = usize> + '_ {
        self.active.iter().copied()
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    pub fn raw_count(&self) -> usize {
        self.raw_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clearing_keeps_raw_count() {
        let mut mistakes = Mistakes::default();
        mistakes.record(3);
        mistakes.record(7);
        mistakes.clear_at(7);
        assert_eq!(mistakes.active_count(), 1);
        assert_eq!(mistakes.raw_count(), 2);
        assert!(mistakes.is_active(3));
        assert!(!mistakes.is_active(7));
    }

    #[test]
    fn retain_below_drops_tail_in_order() {
        let mut mistakes = Mistakes::default();
        for idx in [9, 1, 4] {
            mistakes.record(idx);
        }
        mistakes.retain_below(5);
        assert_eq!(mistakes.active().collect::<Vec<_>>(), vec![1, 4]);
        assert_eq!(mistakes.raw_count(), 3);
    }
}
