//! Configuration for a list view

use listview_core::{DEFAULT_PAGE_SIZE, ListViewState, SortList, WindowOptions};

use crate::Result;

/// Configuration for one list view
///
/// # Examples
///
/// ```
/// use listview::ListViewConfig;
///
/// // Use defaults
/// let config = ListViewConfig::default();
///
/// // Customize specific fields
/// let config = ListViewConfig {
///     name: "playlists".into(),
///     default_table: Some("playlists".into()),
///     filters: vec![Some("roles.name = 'owner'".into()), None],
///     default_sorts: "title".into(),
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct ListViewConfig {
   /// Name of the listing, used to key its session state
   ///
   /// Default: `"list"`
   pub name: String,

   /// Table that unqualified sort tokens refer to
   ///
   /// Default: none
   pub default_table: Option<String>,

   /// Filter predicates to cycle through; `None` entries mean "show all"
   ///
   /// Default: empty
   pub filters: Vec<Option<String>>,

   /// Encoded sort applied before any session or request state, e.g. `"Date:title"`
   ///
   /// Default: empty (no ordering)
   pub default_sorts: String,

   /// Rows per page; 0 disables pagination
   ///
   /// Default: 10
   pub page_size: usize,

   /// Conditions always applied alongside the active filter
   ///
   /// Default: empty
   pub conditions: Vec<String>,

   /// Pager window sizing
   ///
   /// Default: 4 inner, 1 outer
   pub window: WindowOptions,
}

impl Default for ListViewConfig {
   fn default() -> Self {
      Self {
         name: "list".to_string(),
         default_table: None,
         filters: Vec::new(),
         default_sorts: String::new(),
         page_size: DEFAULT_PAGE_SIZE,
         conditions: Vec::new(),
         window: WindowOptions::default(),
      }
   }
}

impl ListViewConfig {
   /// Key under which the list's state is stored in a session.
   pub fn session_key(&self) -> String {
      format!("{}_view", self.name)
   }

   /// State as configured, before any session or request parameters.
   ///
   /// # Errors
   ///
   /// Returns a malformed sort token error if `default_sorts` does not parse;
   /// a bad default is a programming error rather than bad input.
   pub fn initial_state(&self) -> Result<ListViewState> {
      let sorts = SortList::new(self.default_table.clone()).try_update(&self.default_sorts)?;

      Ok(ListViewState::new(self.default_table.clone(), self.filters.clone())
         .with_sorts(sorts)
         .with_conditions(self.conditions.clone())
         .with_page_size(self.page_size))
   }
}
