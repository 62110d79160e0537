//! Per-request list view lifecycle.
//!
//! Each request builds its [`ListView`] from three layers, later layers
//! winning key by key:
//!
//! 1. the configured defaults,
//! 2. the parameters persisted at the end of the previous request,
//! 3. the parameters of the current request.
//!
//! The caller decides where the persisted parameters live (a cookie session,
//! a server-side store, hidden form fields); this module only hands them in
//! and out.

use listview_core::{ListViewState, ParamMap, STATE_KEYS, WindowOptions};
use tracing::{debug, trace};

use crate::links::{self, FilterToggle, Pager, SortLink};
use crate::{ListViewConfig, Result};

/// A list view for the duration of one request.
#[derive(Debug, Clone)]
pub struct ListView {
   name: String,
   session_key: String,
   window: WindowOptions,
   state: ListViewState,
}

impl ListView {
   /// Build the list view for this request.
   ///
   /// Only the state keys (`filter`, `sorts`, `page`, `pageSize`) are read
   /// from `session` and `request`; anything else in the request is ignored.
   /// Unparsable values leave the field as the earlier layer set it.
   ///
   /// # Errors
   ///
   /// Fails only when the configured default sort is malformed.
   pub fn init(
      config: &ListViewConfig,
      session: Option<&ParamMap>,
      request: &ParamMap,
   ) -> Result<Self> {
      let mut state = config.initial_state()?;

      if let Some(prior) = session {
         trace!(list = %config.name, params = ?prior, "Restoring session state");
         state.deserialize(prior);
      }

      let overrides = state_params(request);
      if !overrides.is_empty() {
         debug!(list = %config.name, params = ?overrides, "Applying request parameters");
         state.deserialize(&overrides);
      }

      Ok(Self {
         name: config.name.clone(),
         session_key: config.session_key(),
         window: config.window,
         state,
      })
   }

   pub fn name(&self) -> &str {
      &self.name
   }

   /// Key under which [`session_params`](Self::session_params) should be stored.
   pub fn session_key(&self) -> &str {
      &self.session_key
   }

   pub fn state(&self) -> &ListViewState {
      &self.state
   }

   pub fn state_mut(&mut self) -> &mut ListViewState {
      &mut self.state
   }

   pub fn into_state(self) -> ListViewState {
      self.state
   }

   /// Record the row count once the data layer has counted the listing.
   pub fn set_count(&mut self, count: usize) {
      self.state.set_count(count);
   }

   /// Parameters to persist for the next request.
   pub fn session_params(&self) -> ParamMap {
      self.state.serialize()
   }

   /// Link target for a sortable column header.
   ///
   /// # Errors
   ///
   /// Fails if `column` is not a valid sort token.
   pub fn sort_link(&self, column: &str, caption: Option<&str>) -> Result<SortLink> {
      links::sort_link(&self.state, column, caption)
   }

   /// Link target for the filter toggle.
   pub fn filter_toggle(&self) -> FilterToggle {
      links::filter_toggle(&self.state)
   }

   /// Pager link targets, or `None` when everything fits on one page.
   pub fn pager(&self) -> Option<Pager> {
      links::pager(&self.state, self.window)
   }
}

/// The subset of `params` that carries list view state.
fn state_params(params: &ParamMap) -> ParamMap {
   params
      .iter()
      .filter(|(key, _)| STATE_KEYS.contains(&key.as_str()))
      .map(|(key, value)| (key.clone(), value.clone()))
      .collect()
}

/// Encode persisted parameters as a JSON session blob.
pub fn encode_session(params: &ParamMap) -> Result<String> {
   Ok(serde_json::to_string(params)?)
}

/// Decode a JSON session blob produced by [`encode_session`].
pub fn decode_session(blob: &str) -> Result<ParamMap> {
   Ok(serde_json::from_str(blob)?)
}

#[cfg(test)]
mod tests {
   use super::*;

   fn params(pairs: &[(&str, &str)]) -> ParamMap {
      pairs
         .iter()
         .map(|(k, v)| (k.to_string(), v.to_string()))
         .collect()
   }

   fn config() -> ListViewConfig {
      ListViewConfig {
         name: "widgets".into(),
         default_table: Some("widgets".into()),
         filters: vec![None, Some("size > 3".into())],
         default_sorts: "id".into(),
         ..Default::default()
      }
   }

   #[test]
   fn init_without_session_uses_defaults() {
      let view = ListView::init(&config(), None, &ParamMap::new()).unwrap();
      assert_eq!(
         view.session_params(),
         params(&[("filter", "0"), ("sorts", "id"), ("page", "1"), ("pageSize", "10")])
      );
      assert_eq!(view.session_key(), "widgets_view");
   }

   #[test]
   fn request_overrides_session_key_by_key() {
      let session = params(&[("filter", "1"), ("sorts", "Name"), ("page", "4")]);
      let request = params(&[("page", "2"), ("controller", "widgets")]);

      let view = ListView::init(&config(), Some(&session), &request).unwrap();
      let state = view.state();
      assert_eq!(state.filter().index(), 1);
      assert_eq!(state.sorts().to_param(), "NAME");
      assert_eq!(state.page(), 2);
      assert!(!view.session_params().contains_key("controller"));
   }

   #[test]
   fn bad_request_value_keeps_session_value() {
      let session = params(&[("page", "4"), ("pageSize", "25")]);
      let request = params(&[("page", "four"), ("pageSize", "-5")]);

      let view = ListView::init(&config(), Some(&session), &request).unwrap();
      assert_eq!(view.state().page(), 4);
      assert_eq!(view.state().page_size(), 25);
   }

   #[test]
   fn session_blob_round_trips() {
      let view = ListView::init(&config(), None, &params(&[("sorts", "Name:id")])).unwrap();
      let blob = encode_session(&view.session_params()).unwrap();
      assert_eq!(
         blob,
         r#"{"filter":"0","sorts":"NAME:id","page":"1","pageSize":"10"}"#
      );

      let restored = decode_session(&blob).unwrap();
      let next = ListView::init(&config(), Some(&restored), &ParamMap::new()).unwrap();
      assert_eq!(next.session_params(), view.session_params());
   }

   #[test]
   fn corrupt_session_blob_is_an_error() {
      let err = decode_session("not json").unwrap_err();
      assert_eq!(err.error_code(), "SESSION_ERROR");
   }
}
