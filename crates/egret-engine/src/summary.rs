/// Per-callee summary slots.
///
/// Each analyzed method may have:
/// - A **fixed** summary installed by the user, always served and never
///   recomputed (e.g. hand-modeled library methods without a CFG).
/// - A **computed** summary, memoized once the callee's fixpoint converged
///   outside any call cycle.
/// - A **tentative** summary, live while the callee is on the in-progress
///   stack; recursive call sites consume it and refinement rounds replace
///   it until the cycle stabilizes.
#[derive(Clone, Debug)]
pub struct SummaryCache<S> {
    fixed: Option<S>,
    computed: Option<S>,
    tentative: Option<S>,
}

impl<S> Default for SummaryCache<S> {
    fn default() -> Self {
        SummaryCache {
            fixed: None,
            computed: None,
            tentative: None,
        }
    }
}

impl<S> SummaryCache<S> {
    /// Install a user-provided summary. Not subject to invalidation.
    pub fn set_fixed(&mut self, summary: S) {
        self.fixed = Some(summary);
    }

    pub fn fixed(&self) -> Option<&S> {
        self.fixed.as_ref()
    }

    pub fn computed(&self) -> Option<&S> {
        self.computed.as_ref()
    }

    pub fn tentative(&self) -> Option<&S> {
        self.tentative.as_ref()
    }

    pub fn set_tentative(&mut self, summary: S) {
        self.tentative = Some(summary);
    }

    /// Finish an analysis: the tentative slot becomes the memoized result.
    pub fn promote_tentative(&mut self, summary: S) {
        self.tentative = None;
        self.computed = Some(summary);
    }

    /// Adopt a live tentative entry as the memoized result, if any. Used
    /// when the cycle a tentative entry belonged to has stabilized.
    pub fn finalize_tentative(&mut self) {
        if let Some(summary) = self.tentative.take() {
            self.computed = Some(summary);
        }
    }

    /// The summary to serve at a call site: fixed wins over computed;
    /// tentative entries are only served through the recursion path.
    pub fn lookup(&self) -> Option<&S> {
        self.fixed.as_ref().or(self.computed.as_ref())
    }

    /// Drop computed and tentative entries, keeping a fixed summary.
    pub fn invalidate(&mut self) {
        self.computed = None;
        self.tentative = None;
    }

    pub fn is_empty(&self) -> bool {
        self.fixed.is_none() && self.computed.is_none() && self.tentative.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_wins_over_computed() {
        let mut cache: SummaryCache<u32> = SummaryCache::default();
        assert!(cache.lookup().is_none());
        cache.promote_tentative(2);
        assert_eq!(cache.lookup(), Some(&2));
        cache.set_fixed(7);
        assert_eq!(cache.lookup(), Some(&7));
    }

    #[test]
    fn tentative_is_not_served_by_lookup() {
        let mut cache: SummaryCache<u32> = SummaryCache::default();
        cache.set_tentative(3);
        assert_eq!(cache.lookup(), None);
        assert_eq!(cache.tentative(), Some(&3));
        cache.promote_tentative(4);
        assert_eq!(cache.tentative(), None);
        assert_eq!(cache.lookup(), Some(&4));
    }

    #[test]
    fn finalize_adopts_a_live_tentative() {
        let mut cache: SummaryCache<u32> = SummaryCache::default();
        cache.finalize_tentative();
        assert!(cache.is_empty());
        cache.set_tentative(5);
        cache.finalize_tentative();
        assert_eq!(cache.lookup(), Some(&5));
        assert!(cache.tentative().is_none());
    }

    #[test]
    fn invalidate_keeps_fixed() {
        let mut cache: SummaryCache<u32> = SummaryCache::default();
        cache.set_fixed(1);
        cache.promote_tentative(2);
        cache.invalidate();
        assert_eq!(cache.lookup(), Some(&1));
        assert!(cache.computed().is_none());
    }
}
