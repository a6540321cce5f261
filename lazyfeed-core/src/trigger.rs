use std::ops::RangeInclusive;

/// One report from the viewport: which item indices are on screen, out of how many.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VisibleItems {
    pub range: Option<RangeInclusive<usize>>,
    pub total: usize,
}

impl VisibleItems {
    pub fn new(range: RangeInclusive<usize>, total: usize) -> Self {
        Self {
            range: Some(range),
            total,
        }
    }

    pub fn empty(total: usize) -> Self {
        Self { range: None, total }
    }

    /// Derives the visible range for a list whose rows all have the same extent,
    /// counting partially visible rows as visible.
    pub fn from_uniform_rows(
        scroll_offset: f64,
        viewport_extent: f64,
        row_extent: f64,
        total: usize,
    ) -> Self {
        if total == 0 || row_extent <= 0.0 || viewport_extent <= 0.0 {
            return Self::empty(total);
        }
        let offset = scroll_offset.max(0.0);
        let end = ((offset + viewport_extent) / row_extent).ceil() as usize;
        let last = end.saturating_sub(1).min(total - 1);
        let first = ((offset / row_extent).floor() as usize).min(last);
        Self::new(first..=last, total)
    }

    pub fn last_visible(&self) -> Option<usize> {
        self.range.as_ref().map(|range| *range.end())
    }

    /// An empty report counts as being at the bottom, so an empty list asks for
    /// more right away.
    pub fn is_at_bottom(&self) -> bool {
        match self.last_visible() {
            None => true,
            Some(last) => last + 1 == self.total,
        }
    }
}

/// Lets a value through only when it differs from the previous one.
#[derive(Clone, Debug)]
pub struct DistinctUntilChanged<T> {
    last: Option<T>,
}

impl<T: PartialEq> DistinctUntilChanged<T> {
    pub fn new() -> Self {
        Self { last: None }
    }

    /// Returns `true` if `value` differs from the last observed value.
    pub fn observe(&mut self, value: T) -> bool {
        if self.last.as_ref() == Some(&value) {
            false
        } else {
            self.last = Some(value);
            true
        }
    }

    pub fn last(&self) -> Option<&T> {
        self.last.as_ref()
    }
}

impl<T: PartialEq> Default for DistinctUntilChanged<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Fires once each time the viewport arrives at the last item.
///
/// Staying at the bottom never fires again, not even after the list has grown
/// underneath a viewport that still shows every item. The viewport has to leave
/// the bottom first.
#[derive(Clone, Debug, Default)]
pub struct BottomReached {
    edge: DistinctUntilChanged<bool>,
}

impl BottomReached {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` on a transition into "at bottom".
    pub fn observe(&mut self, items: &VisibleItems) -> bool {
        let at_bottom = items.is_at_bottom();
        let fired = self.edge.observe(at_bottom) && at_bottom;
        if fired {
            log::debug!("bottom reached: {:?} of {}", items.range, items.total);
        }
        fired
    }

    /// Like [`observe`](Self::observe), but drops reports measured against a list
    /// of another length than `len`. Such a report was taken before the host saw
    /// the list change and says nothing about the list as it is now.
    pub fn observe_current(&mut self, items: &VisibleItems, len: usize) -> bool {
        if items.total != len {
            log::debug!("dropping report for {} items, list has {}", items.total, len);
            return false;
        }
        self.observe(items)
    }

    pub fn is_at_bottom(&self) -> bool {
        self.edge.last().copied().unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_report_is_at_bottom() {
        assert!(VisibleItems::empty(0).is_at_bottom());
        assert!(VisibleItems::empty(10).is_at_bottom());
        assert!(VisibleItems::from_uniform_rows(0.0, 500.0, 80.0, 0).is_at_bottom());
    }

    #[test]
    fn last_index_is_bottom() {
        assert!(!VisibleItems::new(0..=48, 50).is_at_bottom());
        assert!(VisibleItems::new(40..=49, 50).is_at_bottom());
    }

    #[test]
    fn uniform_rows() {
        // 10 rows of 100 in a 250 viewport.
        let top = VisibleItems::from_uniform_rows(0.0, 250.0, 100.0, 10);
        assert_eq!(top.range, Some(0..=2));
        let middle = VisibleItems::from_uniform_rows(420.0, 250.0, 100.0, 10);
        assert_eq!(middle.range, Some(4..=6));
        let bottom = VisibleItems::from_uniform_rows(750.0, 250.0, 100.0, 10);
        assert_eq!(bottom.range, Some(7..=9));
        assert!(bottom.is_at_bottom());
    }

    #[test]
    fn uniform_rows_shorter_than_viewport() {
        let items = VisibleItems::from_uniform_rows(0.0, 1000.0, 100.0, 3);
        assert_eq!(items.range, Some(0..=2));
        assert!(items.is_at_bottom());
    }

    #[test]
    fn uniform_rows_without_layout() {
        let items = VisibleItems::from_uniform_rows(0.0, 0.0, 0.0, 5);
        assert_eq!(items.range, None);
    }

    #[test]
    fn distinct_until_changed() {
        let mut distinct = DistinctUntilChanged::new();
        assert!(distinct.observe(1));
        assert!(!distinct.observe(1));
        assert!(distinct.observe(2));
        assert!(distinct.observe(1));
        assert_eq!(distinct.last(), Some(&1));
    }

    #[test]
    fn fires_once_per_arrival() {
        let mut trigger = BottomReached::new();
        assert!(!trigger.observe(&VisibleItems::new(0..=8, 50)));
        assert!(!trigger.observe(&VisibleItems::new(20..=30, 50)));
        assert!(trigger.observe(&VisibleItems::new(40..=49, 50)));
        assert!(!trigger.observe(&VisibleItems::new(41..=49, 50)));
        assert!(!trigger.observe(&VisibleItems::new(40..=49, 50)));
        assert!(trigger.is_at_bottom());

        assert!(!trigger.observe(&VisibleItems::new(30..=40, 50)));
        assert!(trigger.observe(&VisibleItems::new(40..=49, 50)));
    }

    #[test]
    fn fires_for_empty_list() {
        let mut trigger = BottomReached::new();
        assert!(trigger.observe(&VisibleItems::empty(0)));
        assert!(!trigger.observe(&VisibleItems::empty(0)));
    }

    #[test]
    fn growth_moves_bottom_away() {
        let mut trigger = BottomReached::new();
        assert!(trigger.observe(&VisibleItems::new(40..=49, 50)));
        assert!(!trigger.observe(&VisibleItems::new(40..=49, 70)));
        assert!(trigger.observe(&VisibleItems::new(60..=69, 70)));
    }

    #[test]
    fn stays_silent_while_short_list_grows_in_view() {
        let mut trigger = BottomReached::new();
        assert!(trigger.observe(&VisibleItems::new(0..=2, 3)));
        assert!(!trigger.observe(&VisibleItems::new(0..=4, 5)));
        assert!(!trigger.observe(&VisibleItems::new(0..=6, 7)));

        assert!(!trigger.observe(&VisibleItems::new(0..=5, 7)));
        assert!(trigger.observe(&VisibleItems::new(0..=6, 7)));
    }

    #[test]
    fn reports_for_another_length_are_dropped() {
        let mut trigger = BottomReached::new();
        assert!(trigger.observe_current(&VisibleItems::new(40..=49, 50), 50));
        assert!(!trigger.observe_current(&VisibleItems::new(30..=39, 50), 70));
        assert!(!trigger.observe_current(&VisibleItems::new(40..=49, 50), 70));
        assert!(trigger.is_at_bottom());

        assert!(!trigger.observe_current(&VisibleItems::new(40..=49, 70), 70));
        assert!(trigger.observe_current(&VisibleItems::new(60..=69, 70), 70));
    }
}
