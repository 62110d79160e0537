//! Aggregate list view state and its flat parameter form.
//!
//! A [`ListViewState`] lives for one request. It is rebuilt from the
//! parameters of the previous request, changed by at most a few operations,
//! then serialized back to parameters for the next request while yielding
//! the query parameters for this one.

use std::str::FromStr;

use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::filter::FilterSelector;
use crate::query::{CountParameters, PredicateSanitizer, QueryParameters};
use crate::sorter::SortList;
use crate::window::{PageWindow, WindowOptions, compute_window};
use crate::{Error, Result};

/// Flat string-to-string parameter map, in insertion order.
pub type ParamMap = IndexMap<String, String>;

/// Parameter key for the filter index.
pub const FILTER_KEY: &str = "filter";
/// Parameter key for the encoded sort.
pub const SORTS_KEY: &str = "sorts";
/// Parameter key for the current page.
pub const PAGE_KEY: &str = "page";
/// Parameter key for the page size.
pub const PAGE_SIZE_KEY: &str = "pageSize";

/// All keys that make up the serialized state.
pub const STATE_KEYS: [&str; 4] = [FILTER_KEY, SORTS_KEY, PAGE_KEY, PAGE_SIZE_KEY];

/// Default number of rows per page.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Filter, sort and page state for one list view.
///
/// Cloning yields a fully independent state; use the `with_*` methods to get
/// a changed copy for a link target without touching the displayed state.
#[derive(Debug, Clone)]
pub struct ListViewState {
   sorts: SortList,
   filter: FilterSelector,
   conditions: Vec<String>,
   page: usize,
   page_size: usize,
   count: usize,
}

impl ListViewState {
   /// Create a state on page 1 with no sort, the given filters and the
   /// default page size.
   pub fn new(default_table: Option<String>, filters: Vec<Option<String>>) -> Self {
      Self {
         sorts: SortList::new(default_table),
         filter: FilterSelector::new(filters),
         conditions: Vec::new(),
         page: 1,
         page_size: DEFAULT_PAGE_SIZE,
         count: 0,
      }
   }

   /// Replace the sort.
   #[must_use]
   pub fn with_sorts(mut self, sorts: SortList) -> Self {
      self.sorts = sorts;
      self
   }

   /// Fixed conditions applied in addition to the active filter.
   #[must_use]
   pub fn with_conditions(mut self, conditions: Vec<String>) -> Self {
      self.conditions = conditions;
      self
   }

   #[must_use]
   pub fn with_page_size(mut self, page_size: usize) -> Self {
      self.page_size = page_size;
      self
   }

   pub fn sorts(&self) -> &SortList {
      &self.sorts
   }

   pub fn filter(&self) -> &FilterSelector {
      &self.filter
   }

   pub fn conditions(&self) -> &[String] {
      &self.conditions
   }

   pub fn page(&self) -> usize {
      self.page
   }

   /// Rows per page; 0 shows everything on one page.
   pub fn page_size(&self) -> usize {
      self.page_size
   }

   pub fn count(&self) -> usize {
      self.count
   }

   /// Record the result-set size reported by the data layer.
   pub fn set_count(&mut self, count: usize) {
      self.count = count;
   }

   /// Number of pages; never less than 1.
   pub fn page_count(&self) -> usize {
      if self.page_size == 0 {
         return 1;
      }
      self.count.div_ceil(self.page_size).max(1)
   }

   /// Select a column for sorting.
   ///
   /// Selecting the current primary column flips its direction; any other
   /// column becomes the new primary key. Either way the page resets to 1.
   ///
   /// # Errors
   ///
   /// [`Error::MalformedSortToken`] if the token cannot be parsed. The state
   /// is unchanged in that case.
   pub fn change_sort(&mut self, token: &str) -> Result<()> {
      let sorts = match self.sorts.primary() {
         Some(primary) if primary.matches(token, false) => self.sorts.toggle_primary(),
         _ => self.sorts.push(token)?,
      };

      debug!(from = %self.sorts, to = %sorts, "Sort changed");
      self.sorts = sorts;
      self.page = 1;
      Ok(())
   }

   /// Reverse every sort column and reset to page 1.
   pub fn toggle_sort_order(&mut self) {
      self.sorts = self.sorts.toggle_order();
      self.page = 1;
   }

   /// Advance to the next filter.
   ///
   /// The page resets to 1 only when the filter actually changed. Returns
   /// whether it did.
   pub fn change_filter(&mut self) -> bool {
      let changed = self.filter.advance();
      if changed {
         debug!(filter = self.filter.index(), "Filter changed");
         self.page = 1;
      }
      changed
   }

   /// Go to a page. The page is not checked against [`page_count`](Self::page_count);
   /// a page past the end simply produces an empty result. Page 0 is not a
   /// page and is ignored.
   pub fn change_page(&mut self, page: usize) {
      if page == 0 {
         warn!("Ignoring request for page 0");
         return;
      }
      self.page = page;
   }

   /// Copy of this state with [`change_sort`](Self::change_sort) applied.
   ///
   /// # Errors
   ///
   /// [`Error::MalformedSortToken`] if the token cannot be parsed.
   pub fn with_sort(&self, token: &str) -> Result<Self> {
      let mut next = self.clone();
      next.change_sort(token)?;
      Ok(next)
   }

   /// Copy of this state with [`toggle_sort_order`](Self::toggle_sort_order) applied.
   #[must_use]
   pub fn with_sort_order_toggled(&self) -> Self {
      let mut next = self.clone();
      next.toggle_sort_order();
      next
   }

   /// Copy of this state with [`change_filter`](Self::change_filter) applied.
   #[must_use]
   pub fn with_next_filter(&self) -> Self {
      let mut next = self.clone();
      next.change_filter();
      next
   }

   /// Copy of this state with [`change_page`](Self::change_page) applied.
   #[must_use]
   pub fn with_page(&self, page: usize) -> Self {
      let mut next = self.clone();
      next.change_page(page);
      next
   }

   /// Fixed conditions followed by the active filter, each sanitized and
   /// joined with `AND`. `None` when nothing applies.
   pub fn conditions_clause(&self, sanitizer: &impl PredicateSanitizer) -> Option<String> {
      let clauses: Vec<String> = self
         .conditions
         .iter()
         .map(String::as_str)
         .chain(self.filter.current())
         .filter(|c| !c.trim().is_empty())
         .map(|c| sanitizer.sanitize(c))
         .collect();

      if clauses.is_empty() {
         None
      } else {
         Some(clauses.join(" AND "))
      }
   }

   fn window_bounds(&self) -> (Option<usize>, Option<usize>) {
      if self.page_size == 0 {
         return (None, None);
      }
      let offset = self.page.saturating_sub(1).saturating_mul(self.page_size);
      (Some(offset), Some(self.page_size))
   }

   /// Query parameters for the current page.
   ///
   /// `conditions` is the active filter predicate exactly as supplied,
   /// without fixed conditions or sanitization; see
   /// [`find_parameters`](Self::find_parameters) for the combined clause.
   pub fn query_parameters(&self) -> QueryParameters {
      let (offset, limit) = self.window_bounds();
      QueryParameters {
         conditions: self.filter.current().map(str::to_string),
         order: self.sorts.to_order_fragment(),
         offset,
         limit,
      }
   }

   /// Query parameters for the current page using the full sanitized
   /// conditions clause.
   pub fn find_parameters(&self, sanitizer: &impl PredicateSanitizer) -> QueryParameters {
      let (offset, limit) = self.window_bounds();
      QueryParameters {
         conditions: self.conditions_clause(sanitizer),
         order: self.sorts.to_order_fragment(),
         offset,
         limit,
      }
   }

   /// Parameters for counting all rows the listing covers.
   pub fn count_parameters(&self, sanitizer: &impl PredicateSanitizer) -> CountParameters {
      CountParameters {
         conditions: self.conditions_clause(sanitizer),
      }
   }

   /// Pager window for the current page and count.
   pub fn page_window(&self, options: WindowOptions) -> PageWindow {
      compute_window(self.page, self.page_count(), options)
   }

   /// Flat parameters that reproduce this state on the next request.
   pub fn serialize(&self) -> ParamMap {
      let mut params = ParamMap::with_capacity(STATE_KEYS.len());
      params.insert(FILTER_KEY.to_string(), self.filter.index().to_string());
      params.insert(SORTS_KEY.to_string(), self.sorts.to_param());
      params.insert(PAGE_KEY.to_string(), self.page.to_string());
      params.insert(PAGE_SIZE_KEY.to_string(), self.page_size.to_string());
      params
   }

   /// Apply parameters, leniently.
   ///
   /// Keys that are absent leave their field as is, so a single changed
   /// parameter updates just that part of the state. Unparsable values are
   /// logged and skipped; malformed sort tokens are dropped individually
   /// (see [`SortList::update`]). Unknown keys are ignored.
   pub fn deserialize(&mut self, params: &ParamMap) {
      if let Some(raw) = params.get(FILTER_KEY) {
         match parse_number(FILTER_KEY, raw) {
            Ok(index) => self.filter.set_index(index),
            Err(e) => warn!(error = %e, "Ignoring state parameter"),
         }
      }
      if let Some(raw) = params.get(SORTS_KEY) {
         self.sorts = self.sorts.update(raw);
      }
      if let Some(raw) = params.get(PAGE_KEY) {
         match parse_page(raw) {
            Ok(page) => self.page = page,
            Err(e) => warn!(error = %e, "Ignoring state parameter"),
         }
      }
      if let Some(raw) = params.get(PAGE_SIZE_KEY) {
         match parse_number(PAGE_SIZE_KEY, raw) {
            Ok(page_size) => self.page_size = page_size,
            Err(e) => warn!(error = %e, "Ignoring state parameter"),
         }
      }
   }

   /// Apply parameters strictly: every present key must parse, otherwise
   /// nothing is applied.
   ///
   /// # Errors
   ///
   /// [`Error::InvalidParameter`] for a bad number or page, and
   /// [`Error::MalformedSortToken`] for a bad sort token.
   pub fn try_deserialize(&mut self, params: &ParamMap) -> Result<()> {
      let filter = params
         .get(FILTER_KEY)
         .map(|raw| parse_number(FILTER_KEY, raw))
         .transpose()?;
      let sorts = params
         .get(SORTS_KEY)
         .map(|raw| self.sorts.try_update(raw))
         .transpose()?;
      let page = params.get(PAGE_KEY).map(|raw| parse_page(raw)).transpose()?;
      let page_size = params
         .get(PAGE_SIZE_KEY)
         .map(|raw| parse_number(PAGE_SIZE_KEY, raw))
         .transpose()?;

      if let Some(index) = filter {
         self.filter.set_index(index);
      }
      if let Some(sorts) = sorts {
         self.sorts = sorts;
      }
      if let Some(page) = page {
         self.page = page;
      }
      if let Some(page_size) = page_size {
         self.page_size = page_size;
      }
      Ok(())
   }
}

fn parse_number<T: FromStr>(key: &str, raw: &str) -> Result<T> {
   raw.trim().parse().map_err(|_| Error::InvalidParameter {
      key: key.to_string(),
      value: raw.to_string(),
   })
}

fn parse_page(raw: &str) -> Result<usize> {
   match parse_number(PAGE_KEY, raw)? {
      0 => Err(Error::InvalidParameter {
         key: PAGE_KEY.to_string(),
         value: raw.to_string(),
      }),
      page => Ok(page),
   }
}
