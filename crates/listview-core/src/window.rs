//! Pager window: which page numbers to show around the current page.
//!
//! The window is a fixed-width run of pages centered on the current page,
//! plus a few anchor pages at each end of the range. Near either end the
//! centered run slides toward the valid side so it keeps its width. Runs of
//! hidden pages are collapsed into a single gap marker.
//!
//! ```text
//! page 10 of 20, inner 4, outer 1:
//!
//!    1 2 … 6 7 8 9 [10] 11 12 13 14 … 19 20
//! ```

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Window sizing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowOptions {
   /// Pages shown on each side of the current page.
   ///
   /// Default: 4
   pub inner_offset: usize,

   /// Pages shown after page 1 and before the last page, in addition to the
   /// first and last pages themselves.
   ///
   /// Default: 1
   pub outer_offset: usize,
}

impl Default for WindowOptions {
   fn default() -> Self {
      Self {
         inner_offset: 4,
         outer_offset: 1,
      }
   }
}

/// One entry of a pager, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "kind", content = "page")]
pub enum WindowItem {
   /// A page number to show
   Page(usize),
   /// One or more hidden pages
   Gap,
}

/// The computed window. An empty window means there is nothing to page
/// through and no pager should be shown.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageWindow {
   /// Visible page numbers, ascending and without duplicates
   pub visible_pages: Vec<usize>,
   /// Visible pages with gap markers between non-adjacent runs
   pub items: Vec<WindowItem>,
   /// Hidden pages sit between the leading anchors and the centered run
   pub ellipsis_before: bool,
   /// Hidden pages sit between the centered run and the trailing anchors
   pub ellipsis_after: bool,
   pub prev_disabled: bool,
   pub next_disabled: bool,
}

impl PageWindow {
   pub fn is_empty(&self) -> bool {
      self.visible_pages.is_empty()
   }

   pub fn contains(&self, page: usize) -> bool {
      self.visible_pages.binary_search(&page).is_ok()
   }
}

/// Compute the pager window for `page` out of `total_pages`.
///
/// `page` is not required to be in range; an out-of-range page still yields
/// a window over the valid pages. `total_pages <= 1` yields an empty window.
pub fn compute_window(page: usize, total_pages: usize, options: WindowOptions) -> PageWindow {
   if total_pages <= 1 {
      return PageWindow::default();
   }

   let total = total_pages;
   let inner = options.inner_offset;
   let outer = options.outer_offset;

   // Centered run, slid back inside [1, total] while keeping its width
   let mut min = page as i128 - inner as i128;
   let mut max = page as i128 + inner as i128;
   if max > total as i128 {
      min -= max - total as i128;
   } else if min < 1 {
      max += 1 - min;
   }
   let center_start = min.max(1) as usize;
   let center_end = max.min(total as i128) as usize;

   let leading_end = outer.saturating_add(1).min(total);
   let trailing_start = total.saturating_sub(outer).max(1);

   let visible: BTreeSet<usize> = (center_start..=center_end)
      .chain(1..=leading_end)
      .chain(trailing_start..=total)
      .collect();

   // First page after the leading anchors, last page before the trailing ones
   let leading_gap = leading_end + 1;
   let trailing_gap = trailing_start.saturating_sub(1);
   let ellipsis_before = leading_gap <= total && !visible.contains(&leading_gap);
   let ellipsis_after = trailing_gap >= 1 && !visible.contains(&trailing_gap);

   let mut items = Vec::with_capacity(visible.len() + 2);
   let mut previous: Option<usize> = None;
   for &n in &visible {
      if previous.is_some_and(|p| n > p + 1) {
         items.push(WindowItem::Gap);
      }
      items.push(WindowItem::Page(n));
      previous = Some(n);
   }

   PageWindow {
      visible_pages: visible.into_iter().collect(),
      items,
      ellipsis_before,
      ellipsis_after,
      prev_disabled: page <= 1,
      next_disabled: page >= total,
   }
}
