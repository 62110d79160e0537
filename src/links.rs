//! Link targets for list view controls.
//!
//! Each control (a sortable header, the filter toggle, a pager entry) links
//! to the state the listing would be in after that control is used. The
//! target state is always computed on a copy, so planning any number of
//! links leaves the displayed state exactly as it was. Markup is left to the
//! caller; only parameters, labels and flags are produced here.

use listview_core::{ListViewState, ParamMap, SortIndicator, WindowItem, WindowOptions};
use serde::Serialize;

use crate::Result;

/// Target of a sortable column header.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SortLink {
   /// Parameters of the state after selecting the column
   pub params: ParamMap,
   /// Indicator to show next to the header
   pub indicator: SortIndicator,
   /// e.g. `Sort descending by Name`
   pub title: String,
}

/// Target of the filter toggle.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterToggle {
   pub params: ParamMap,
   /// Description of the filter the toggle switches to
   pub title: String,
   /// Whether toggling changes anything (false with fewer than two filters)
   pub changes: bool,
}

/// One pager entry, in display order.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum PagerItem {
   /// Link (or, for the current page, a marker) for one page
   #[serde(rename_all = "camelCase")]
   Page {
      number: usize,
      current: bool,
      params: ParamMap,
   },
   /// Hidden pages
   Gap,
}

/// Previous/next control.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PagerStep {
   pub params: ParamMap,
   pub disabled: bool,
}

/// All pager link targets for the current page.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pager {
   pub prev: PagerStep,
   pub items: Vec<PagerItem>,
   pub next: PagerStep,
}

/// Plan the header link for `column`.
///
/// Selecting the primary column flips its direction, any other column
/// becomes primary. `caption` replaces the humanized column in the title.
///
/// # Errors
///
/// Fails if `column` is not a valid sort token.
pub fn sort_link(state: &ListViewState, column: &str, caption: Option<&str>) -> Result<SortLink> {
   let target = state.with_sort(column)?;

   Ok(SortLink {
      indicator: state.sorts().indicator(column),
      title: target.sorts().description(caption).unwrap_or_default(),
      params: target.serialize(),
   })
}

/// Plan the filter toggle link.
pub fn filter_toggle(state: &ListViewState) -> FilterToggle {
   let target = state.with_next_filter();

   FilterToggle {
      changes: target.filter().index() != state.filter().index(),
      title: target.filter().describe(),
      params: target.serialize(),
   }
}

/// Plan the pager, or `None` when the listing fits on a single page.
pub fn pager(state: &ListViewState, options: WindowOptions) -> Option<Pager> {
   let window = state.page_window(options);
   if window.is_empty() {
      return None;
   }

   let page = state.page();
   let items = window
      .items
      .iter()
      .map(|item| match *item {
         WindowItem::Page(number) => PagerItem::Page {
            number,
            current: number == page,
            params: state.with_page(number).serialize(),
         },
         WindowItem::Gap => PagerItem::Gap,
      })
      .collect();

   Some(Pager {
      prev: PagerStep {
         params: state.with_page(page.saturating_sub(1).max(1)).serialize(),
         disabled: window.prev_disabled,
      },
      items,
      next: PagerStep {
         params: state.with_page(page.saturating_add(1)).serialize(),
         disabled: window.next_disabled,
      },
   })
}

#[cfg(test)]
mod tests {
   use super::*;

   fn widgets() -> ListViewState {
      ListViewState::new(
         Some("widgets".into()),
         vec![Some("size > 5".into()), None],
      )
   }

   // ─── sort_link ───

   #[test]
   fn sort_link_for_new_column_promotes_it() {
      let mut state = widgets();
      state.change_sort("name").unwrap();
      state.change_page(3);

      let link = sort_link(&state, "country_id", Some("Authority")).unwrap();
      assert_eq!(link.params["sorts"], "country_id:name");
      assert_eq!(link.params["page"], "1");
      assert_eq!(link.indicator, SortIndicator::None);
      assert_eq!(link.title, "Sort ascending by Authority");

      // Planning a link leaves the displayed state alone
      assert_eq!(state.sorts().to_param(), "name");
      assert_eq!(state.page(), 3);
   }

   #[test]
   fn sort_link_for_primary_column_flips_it() {
      let mut state = widgets();
      state.change_sort("name").unwrap();

      let link = sort_link(&state, "name", None).unwrap();
      assert_eq!(link.params["sorts"], "NAME");
      assert_eq!(link.indicator, SortIndicator::Descending);
      assert_eq!(link.title, "Sort descending by Name");
   }

   #[test]
   fn sort_link_rejects_bad_column() {
      let err = sort_link(&widgets(), "name; drop", None).unwrap_err();
      assert_eq!(err.error_code(), "MALFORMED_SORT_TOKEN");
   }

   // ─── filter_toggle ───

   #[test]
   fn filter_toggle_targets_next_filter() {
      let toggle = filter_toggle(&widgets());
      assert!(toggle.changes);
      assert_eq!(toggle.params["filter"], "1");
      assert_eq!(toggle.title, "Show all");
   }

   #[test]
   fn filter_toggle_with_single_filter_changes_nothing() {
      let mut state = ListViewState::new(None, vec![Some("a = 1".into())]);
      state.change_page(2);
      let toggle = filter_toggle(&state);
      assert!(!toggle.changes);
      assert_eq!(toggle.params, state.serialize());
      assert_eq!(toggle.title, "Show where a = 1");
   }

   // ─── pager ───

   #[test]
   fn no_pager_for_single_page() {
      let mut state = widgets();
      state.set_count(10);
      assert!(pager(&state, WindowOptions::default()).is_none());
   }

   #[test]
   fn pager_links_carry_full_state() {
      let mut state = widgets();
      state.change_sort("Country_id").unwrap();
      state.change_sort("mic").unwrap();
      state.set_count(100);

      let pager = pager(&state, WindowOptions::default()).unwrap();
      assert!(pager.prev.disabled);
      assert!(!pager.next.disabled);
      assert_eq!(pager.next.params["page"], "2");

      let second = pager
         .items
         .iter()
         .find_map(|item| match item {
            PagerItem::Page { number: 2, params, current } => Some((params, *current)),
            _ => None,
         })
         .unwrap();
      assert_eq!(second.0["sorts"], "mic:COUNTRY_ID");
      assert_eq!(second.0["page"], "2");
      assert!(!second.1);
   }

   #[test]
   fn pager_marks_current_page_and_gaps() {
      let mut state = widgets();
      state.set_count(200);
      state.change_page(10);

      let pager = pager(&state, WindowOptions::default()).unwrap();
      let rendered: Vec<String> = pager
         .items
         .iter()
         .map(|item| match item {
            PagerItem::Page { number, current: true, .. } => format!("[{number}]"),
            PagerItem::Page { number, .. } => number.to_string(),
            PagerItem::Gap => "…".to_string(),
         })
         .collect();
      assert_eq!(
         rendered.join(" "),
         "1 2 … 6 7 8 9 [10] 11 12 13 14 … 19 20"
      );
      assert_eq!(pager.prev.params["page"], "9");
      assert_eq!(pager.next.params["page"], "11");
      assert_eq!(state.page(), 10);
   }

   #[test]
   fn pager_for_largest_page_stays_at_the_end() {
      let mut state = widgets();
      state.set_count(200);
      state.deserialize(&ParamMap::from([("page".to_string(), usize::MAX.to_string())]));
      assert_eq!(state.page(), usize::MAX);

      let pager = pager(&state, WindowOptions::default()).unwrap();
      assert!(pager.next.disabled);
      assert_eq!(pager.next.params["page"], usize::MAX.to_string());
      assert_eq!(pager.prev.params["page"], (usize::MAX - 1).to_string());
      assert!(matches!(
         pager.items.last(),
         Some(PagerItem::Page { number: 20, current: false, .. })
      ));
   }

   #[test]
   fn pager_serializes_tagged_items() {
      let mut state = widgets();
      state.set_count(20);
      let json = serde_json::to_value(pager(&state, WindowOptions::default()).unwrap()).unwrap();
      assert_eq!(json["items"][0]["kind"], "page");
      assert_eq!(json["items"][0]["current"], true);
      assert_eq!(json["items"][1]["params"]["page"], "2");
      assert_eq!(json["prev"]["disabled"], true);
   }
}
