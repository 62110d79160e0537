//! # listview-core
//!
//! Transient view state for tabular listings: the active filter, a bounded
//! multi-column sort and the current page. The state converts to the query
//! fragments a data layer needs and to a compact set of URL parameters that
//! reproduces it on the next request.
//!
//! ## Core Types
//!
//! - **[`SortSpec`]**: One sort column, encoded as a `[table.]column` token whose
//!   first letter's case carries the direction
//! - **[`SortList`]**: Up to three unique sort columns, most recently chosen first
//! - **[`FilterSelector`]**: Cyclic index into caller-supplied filter predicates
//! - **[`compute_window`]**: Which page numbers a pager shows, with gap markers
//! - **[`ListViewState`]**: The aggregate, with parameter (de)serialization and
//!   query parameter output
//!
//! ## Example
//!
//! ```
//! use listview_core::{ListViewState, ParamMap};
//!
//! let mut state = ListViewState::new(Some("widgets".into()), vec![]);
//! state.deserialize(&ParamMap::from([("sorts".to_string(), "Name:id".to_string())]));
//! state.change_page(2);
//!
//! let query = state.query_parameters();
//! assert_eq!(query.order.as_deref(), Some("widgets.name DESC, widgets.id ASC"));
//! assert_eq!(query.offset, Some(10));
//! assert_eq!(state.serialize()["sorts"], "NAME:id");
//! ```

mod error;
pub mod filter;
pub mod query;
pub mod sort;
pub mod sorter;
pub mod sql;
pub mod state;
pub mod window;

pub use error::{Error, Result};
pub use filter::FilterSelector;
pub use query::{CountParameters, IdentitySanitizer, PredicateSanitizer, QueryParameters};
pub use sort::{SortDirection, SortIndicator, SortSpec};
pub use sorter::{MAX_SORT_COLUMNS, SortList};
pub use state::{DEFAULT_PAGE_SIZE, ListViewState, ParamMap, STATE_KEYS};
pub use window::{PageWindow, WindowItem, WindowOptions, compute_window};
