//! # listview
//!
//! Keeps the filter, sort and page of a tabular listing across requests.
//!
//! A [`ListView`] is built per request from a [`ListViewConfig`], the
//! parameters persisted by the previous request and the parameters of the
//! current one. It hands the data layer its query parameters, hands the view
//! the link targets for sort headers, the filter toggle and the pager, and
//! hands back the parameters to persist for the next request.
//!
//! # Example
//!
//! ```
//! use listview::{IdentitySanitizer, ListView, ListViewConfig, ParamMap};
//!
//! let config = ListViewConfig {
//!     name: "playlists".into(),
//!     default_table: Some("playlists".into()),
//!     filters: vec![Some("roles.name = 'owner'".into()), None],
//!     default_sorts: "title".into(),
//!     ..Default::default()
//! };
//!
//! let request = ParamMap::from([("page".to_string(), "2".to_string())]);
//! let mut view = ListView::init(&config, None, &request).unwrap();
//!
//! let query = view.state().find_parameters(&IdentitySanitizer);
//! assert_eq!(query.order.as_deref(), Some("playlists.title ASC"));
//! assert_eq!(query.offset, Some(10));
//!
//! // ... run the query and count, then:
//! view.set_count(42);
//! assert_eq!(view.pager().unwrap().items.len(), 5);
//! ```

mod config;
mod error;
pub mod links;
pub mod session;

pub use config::ListViewConfig;
pub use error::{Error, Result};
pub use links::{FilterToggle, Pager, PagerItem, PagerStep, SortLink};
pub use listview_core::{
   CountParameters, IdentitySanitizer, ListViewState, ParamMap, PredicateSanitizer,
   QueryParameters, SortIndicator, WindowOptions,
};
pub use session::{ListView, decode_session, encode_session};
