//! Cyclic selection over a caller-supplied list of filter predicates.

use std::sync::Arc;

use tracing::trace;

/// Index into a read-only sequence of filter predicates.
///
/// Predicates are opaque condition strings owned by the caller. A `None`
/// entry stands for "no filter". The sequence is shared rather than copied
/// when the selector is cloned since it is never mutated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSelector {
   index: usize,
   filters: Arc<[Option<String>]>,
}

impl FilterSelector {
   /// Create a selector positioned on the first filter.
   pub fn new(filters: impl Into<Arc<[Option<String>]>>) -> Self {
      Self {
         index: 0,
         filters: filters.into(),
      }
   }

   /// Raw index as last set; may exceed the filter count.
   pub fn index(&self) -> usize {
      self.index
   }

   /// Set the raw index. Selection wraps, so any value is accepted.
   pub fn set_index(&mut self, index: usize) {
      self.index = index;
   }

   pub fn filters(&self) -> &[Option<String>] {
      &self.filters
   }

   pub fn len(&self) -> usize {
      self.filters.len()
   }

   pub fn is_empty(&self) -> bool {
      self.filters.is_empty()
   }

   /// The active predicate, or `None` for no filters or a "show all" entry.
   pub fn current(&self) -> Option<&str> {
      if self.filters.is_empty() {
         return None;
      }
      self.filters[self.index % self.filters.len()].as_deref()
   }

   /// Move to the next filter, wrapping at the end.
   ///
   /// With fewer than two filters there is nothing to cycle through and the
   /// selector is left as is. Returns whether the index changed.
   pub fn advance(&mut self) -> bool {
      let len = self.filters.len();
      if len < 2 {
         return false;
      }

      let next = (self.index % len + 1) % len;
      trace!(from = self.index, to = next, "Advancing filter");
      let changed = next != self.index;
      self.index = next;
      changed
   }

   /// Human-readable label for the active filter.
   pub fn describe(&self) -> String {
      match self.current().map(str::trim).filter(|p| !p.is_empty()) {
         Some(predicate) => format!("Show where {}", predicate),
         None => "Show all".to_string(),
      }
   }
}

#[cfg(test)]
mod tests {
   use super::*;

   fn selector(filters: &[Option<&str>]) -> FilterSelector {
      FilterSelector::new(
         filters
            .iter()
            .map(|f| f.map(str::to_string))
            .collect::<Vec<_>>(),
      )
   }

   #[test]
   fn empty_filters_have_no_predicate() {
      let mut sel = selector(&[]);
      assert_eq!(sel.current(), None);
      assert!(!sel.advance());
      assert_eq!(sel.index(), 0);
      assert_eq!(sel.describe(), "Show all");
   }

   #[test]
   fn three_advances_cycle_back() {
      let mut sel = selector(&[Some("a = 1"), Some("a = 2"), None]);
      assert!(sel.advance());
      assert_eq!(sel.current(), Some("a = 2"));
      assert!(sel.advance());
      assert_eq!(sel.current(), None);
      assert!(sel.advance());
      assert_eq!(sel.index(), 0);
      assert_eq!(sel.current(), Some("a = 1"));
   }

   #[test]
   fn single_filter_never_advances() {
      let mut sel = selector(&[Some("a = 1")]);
      assert!(!sel.advance());
      assert!(!sel.advance());
      assert_eq!(sel.index(), 0);
      assert_eq!(sel.current(), Some("a = 1"));
   }

   #[test]
   fn out_of_range_index_wraps() {
      let mut sel = selector(&[Some("a = 1"), Some("a = 2")]);
      sel.set_index(5);
      assert_eq!(sel.current(), Some("a = 2"));
      sel.advance();
      assert_eq!(sel.index(), 0);
   }

   #[test]
   fn advance_from_largest_index_wraps_without_overflow() {
      let mut sel = selector(&[Some("a = 1"), Some("a = 2"), None]);
      sel.set_index(usize::MAX);
      assert_eq!(sel.current(), Some("a = 1"));
      assert!(sel.advance());
      assert_eq!(sel.index(), 1);
      assert_eq!(sel.current(), Some("a = 2"));
   }

   #[test]
   fn describe_active_predicate() {
      let mut sel = selector(&[Some("roles.name = 'owner'"), Some("  ")]);
      assert_eq!(sel.describe(), "Show where roles.name = 'owner'");
      sel.advance();
      assert_eq!(sel.describe(), "Show all");
   }

   #[test]
   fn clones_share_filters_but_not_index() {
      let sel = selector(&[Some("a"), Some("b")]);
      let mut copy = sel.clone();
      copy.advance();
      assert_eq!(sel.index(), 0);
      assert_eq!(copy.index(), 1);
      assert_eq!(sel.filters(), copy.filters());
   }
}
