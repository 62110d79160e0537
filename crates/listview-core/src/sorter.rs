//! Ordered, bounded multi-column sort.
//!
//! [`SortList`] is a value type. Operations that change the sort return a new
//! list and leave the receiver untouched, so a copy handed to a link target
//! can never disturb the sort being displayed.

use std::fmt;

use tracing::warn;

use crate::Result;
use crate::sort::{SortIndicator, SortSpec};

/// Maximum number of columns retained in a sort.
pub const MAX_SORT_COLUMNS: usize = 3;

/// Separator between tokens in the serialized form.
const TOKEN_SEPARATOR: char = ':';

/// An ordered set of sort columns, primary key first.
///
/// No two entries share a column and there are never more than
/// [`MAX_SORT_COLUMNS`] entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortList {
   default_table: Option<String>,
   specs: Vec<SortSpec>,
}

impl SortList {
   /// Create an empty sort whose unqualified tokens resolve to `default_table`.
   pub fn new(default_table: Option<String>) -> Self {
      Self {
         default_table,
         specs: Vec::new(),
      }
   }

   pub fn default_table(&self) -> Option<&str> {
      self.default_table.as_deref()
   }

   /// Entries in priority order.
   pub fn specs(&self) -> &[SortSpec] {
      &self.specs
   }

   pub fn iter(&self) -> std::slice::Iter<'_, SortSpec> {
      self.specs.iter()
   }

   /// The primary sort key, if any sort has been chosen.
   pub fn primary(&self) -> Option<&SortSpec> {
      self.specs.first()
   }

   pub fn len(&self) -> usize {
      self.specs.len()
   }

   pub fn is_empty(&self) -> bool {
      self.specs.is_empty()
   }

   fn with_specs(&self, specs: Vec<SortSpec>) -> Self {
      Self {
         default_table: self.default_table.clone(),
         specs,
      }
   }

   /// Rebuild the sort from its serialized `a:B:t.c` form.
   ///
   /// Tokens keep their left-to-right priority. Malformed tokens are skipped
   /// (and logged) while the rest still apply; empty segments are ignored. A
   /// repeated column keeps its first, higher-priority occurrence, and only
   /// the first [`MAX_SORT_COLUMNS`] surviving entries are retained.
   #[must_use]
   pub fn update(&self, param: &str) -> Self {
      let mut specs: Vec<SortSpec> = Vec::new();

      for token in param.split(TOKEN_SEPARATOR).filter(|t| !t.is_empty()) {
         match SortSpec::parse(token, self.default_table()) {
            Ok(spec) => {
               if !specs.iter().any(|s| s.column() == spec.column()) {
                  specs.push(spec);
               }
            }
            Err(e) => warn!(token = %token, error = %e, "Skipping malformed sort token"),
         }
      }

      specs.truncate(MAX_SORT_COLUMNS);
      self.with_specs(specs)
   }

   /// Strict counterpart of [`update`](Self::update): the first malformed
   /// token fails the whole parse.
   ///
   /// # Errors
   ///
   /// [`Error::MalformedSortToken`](crate::Error::MalformedSortToken) for the
   /// first bad token.
   pub fn try_update(&self, param: &str) -> Result<Self> {
      let mut specs: Vec<SortSpec> = Vec::new();

      for token in param.split(TOKEN_SEPARATOR).filter(|t| !t.is_empty()) {
         let spec = SortSpec::parse(token, self.default_table())?;
         if !specs.iter().any(|s| s.column() == spec.column()) {
            specs.push(spec);
         }
      }

      specs.truncate(MAX_SORT_COLUMNS);
      Ok(self.with_specs(specs))
   }

   /// Promote a column to primary sort key.
   ///
   /// Any existing entry for the same column is removed, the new entry goes
   /// to the front, and the oldest entries beyond [`MAX_SORT_COLUMNS`] fall
   /// off the end.
   ///
   /// # Errors
   ///
   /// [`Error::MalformedSortToken`](crate::Error::MalformedSortToken) if the
   /// token cannot be parsed; the receiver is unchanged either way.
   pub fn push(&self, token: &str) -> Result<Self> {
      let spec = SortSpec::parse(token, self.default_table())?;

      let specs = std::iter::once(spec.clone())
         .chain(
            self
               .specs
               .iter()
               .filter(|s| s.column() != spec.column())
               .cloned(),
         )
         .take(MAX_SORT_COLUMNS)
         .collect();

      Ok(self.with_specs(specs))
   }

   /// Reverse the entire sort: every entry flips direction.
   #[must_use]
   pub fn toggle_order(&self) -> Self {
      self.with_specs(self.specs.iter().map(SortSpec::toggled).collect())
   }

   /// Flip only the primary entry's direction.
   #[must_use]
   pub fn toggle_primary(&self) -> Self {
      let specs = self
         .specs
         .iter()
         .enumerate()
         .map(|(i, s)| if i == 0 { s.toggled() } else { s.clone() })
         .collect();
      self.with_specs(specs)
   }

   /// Compact serialized form: encoded tokens joined with `:`.
   pub fn to_param(&self) -> String {
      self
         .specs
         .iter()
         .map(SortSpec::encode)
         .collect::<Vec<_>>()
         .join(":")
   }

   /// ORDER BY terms joined with `, `, or `None` when no sort was chosen.
   ///
   /// No default ordering is ever invented for an empty list.
   pub fn to_order_fragment(&self) -> Option<String> {
      if self.specs.is_empty() {
         return None;
      }

      let terms: Vec<String> = self.specs.iter().map(SortSpec::to_order_fragment).collect();
      Some(terms.join(", "))
   }

   /// Description of the primary sort, if there is one.
   pub fn description(&self, column_alias: Option<&str>) -> Option<String> {
      self.primary().map(|spec| spec.description(column_alias))
   }

   /// Header indicator for the column named by `token`.
   pub fn indicator(&self, token: &str) -> SortIndicator {
      match self.primary() {
         Some(primary) if primary.matches(token, false) => {
            if primary.is_ascending() {
               SortIndicator::Descending
            } else {
               SortIndicator::Ascending
            }
         }
         _ => SortIndicator::None,
      }
   }
}

impl fmt::Display for SortList {
   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
      f.write_str(&self.to_param())
   }
}

impl<'a> IntoIterator for &'a SortList {
   type Item = &'a SortSpec;
   type IntoIter = std::slice::Iter<'a, SortSpec>;

   fn into_iter(self) -> Self::IntoIter {
      self.specs.iter()
   }
}

#[cfg(test)]
mod tests {
   use super::*;
   use crate::Error;
   use crate::sort::SortDirection;

   fn sorter() -> SortList {
      SortList::new(Some("widgets".into()))
   }

   fn pushed(tokens: &[&str]) -> SortList {
      tokens
         .iter()
         .fold(sorter(), |list, token| list.push(token).unwrap())
   }

   // ─── push ───

   #[test]
   fn push_single_column_from_default_table() {
      let list = pushed(&["foo"]);
      assert_eq!(list.len(), 1);
      let primary = list.primary().unwrap();
      assert_eq!(primary.column(), "foo");
      assert_eq!(primary.table(), Some("widgets"));
   }

   #[test]
   fn push_single_column_from_explicit_table() {
      let list = pushed(&["thingies.foo"]);
      assert_eq!(list.primary().unwrap().table(), Some("thingies"));
   }

   #[test]
   fn push_multiple_columns() {
      let list = pushed(&["foo", "bar"]);
      assert_eq!(list.len(), 2);
      assert_eq!(list.to_param(), "bar:foo");
      assert_eq!(
         list.to_order_fragment().as_deref(),
         Some("widgets.bar ASC, widgets.foo ASC")
      );
   }

   #[test]
   fn trims_excessive_columns() {
      let list = pushed(&["foo", "bar", "baz", "qux"]);
      assert_eq!(list.len(), MAX_SORT_COLUMNS);
      assert_eq!(list.to_param(), "qux:baz:bar");
   }

   #[test]
   fn push_dedupes_column_and_promotes_it() {
      let list = pushed(&["foo", "bar", "baz", "Foo"]);
      assert_eq!(list.to_param(), "FOO:baz:bar");
   }

   #[test]
   fn push_dedupes_by_column_across_tables() {
      let list = pushed(&["foo", "other.foo"]);
      assert_eq!(list.to_param(), "other.foo");
   }

   #[test]
   fn push_leaves_original_untouched() {
      let original = pushed(&["foo"]);
      let next = original.push("bar").unwrap();
      assert_eq!(original.to_param(), "foo");
      assert_eq!(next.to_param(), "bar:foo");
   }

   #[test]
   fn push_malformed_token_fails_without_change() {
      let list = pushed(&["foo"]);
      let err = list.push("bad token").unwrap_err();
      assert!(matches!(err, Error::MalformedSortToken { .. }));
      assert_eq!(list.to_param(), "foo");
   }

   // ─── update ───

   #[test]
   fn update_replaces_existing_sort() {
      let list = pushed(&["bar"]).update("foo");
      assert_eq!(list.to_param(), "foo");
   }

   #[test]
   fn update_from_multipart_string() {
      let list = sorter().update("FOO:bar");
      assert_eq!(list.len(), 2);
      assert_eq!(list.primary().unwrap().direction(), SortDirection::Desc);
      assert_eq!(
         list.to_order_fragment().as_deref(),
         Some("widgets.foo DESC, widgets.bar ASC")
      );
   }

   #[test]
   fn update_empty_string_clears() {
      let list = pushed(&["foo"]).update("");
      assert!(list.is_empty());
      assert_eq!(list.to_param(), "");
   }

   #[test]
   fn update_skips_malformed_tokens() {
      let list = sorter().update("foo:bad-token::Bar");
      assert_eq!(list.to_param(), "foo:BAR");
   }

   #[test]
   fn update_keeps_first_occurrence_and_caps() {
      let list = sorter().update("a:b:A:c:d");
      assert_eq!(list.to_param(), "a:b:c");
   }

   #[test]
   fn try_update_fails_atomically() {
      let list = pushed(&["foo"]);
      assert!(list.try_update("bar:bad-token").is_err());
      assert_eq!(list.try_update("bar:Baz").unwrap().to_param(), "bar:BAZ");
   }

   // ─── ordering ───

   #[test]
   fn no_default_sort_imposed() {
      assert_eq!(sorter().to_order_fragment(), None);
   }

   #[test]
   fn toggle_order_flips_every_entry() {
      let list = pushed(&["foo", "BAR"]);
      assert_eq!(list.toggle_order().to_param(), "bar:FOO");
   }

   #[test]
   fn toggle_primary_flips_first_entry_only() {
      let list = pushed(&["foo", "bar"]);
      assert_eq!(list.toggle_primary().to_param(), "BAR:foo");
      assert!(sorter().toggle_primary().is_empty());
   }

   #[test]
   fn copy_of_sorter_is_independent() {
      let list = pushed(&["foo"]);
      let before = list.to_param();
      let toggled = list.clone().toggle_order();
      assert_eq!(list.to_param(), before);
      assert_ne!(toggled.to_param(), before);
   }

   // ─── description & indicator ───

   #[test]
   fn description_of_primary() {
      assert_eq!(sorter().description(None), None);
      assert_eq!(
         pushed(&["foo", "Last_name"]).description(None).as_deref(),
         Some("Sort descending by Last name")
      );
   }

   #[test]
   fn indicator_shows_click_effect_on_primary() {
      let list = pushed(&["bar", "foo"]);
      assert_eq!(list.indicator("foo"), SortIndicator::Descending);
      assert_eq!(list.toggle_primary().indicator("foo"), SortIndicator::Ascending);
      assert_eq!(list.indicator("bar"), SortIndicator::None);
      assert_eq!(sorter().indicator("foo"), SortIndicator::None);
   }
}
