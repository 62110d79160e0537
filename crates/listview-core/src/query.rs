//! Query-building output handed to the data layer.

use serde::Serialize;

/// Parameters for fetching one page of rows.
///
/// `offset` and `limit` are both `None` in unpaginated mode (page size 0).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryParameters {
   /// WHERE condition. From [`ListViewState::query_parameters`] this is the
   /// raw active filter only; [`ListViewState::find_parameters`] adds the
   /// fixed conditions and sanitizes.
   ///
   /// [`ListViewState::query_parameters`]: crate::ListViewState::query_parameters
   /// [`ListViewState::find_parameters`]: crate::ListViewState::find_parameters
   #[serde(skip_serializing_if = "Option::is_none")]
   pub conditions: Option<String>,
   /// ORDER BY terms, or `None` when no sort has been chosen
   #[serde(skip_serializing_if = "Option::is_none")]
   pub order: Option<String>,
   #[serde(skip_serializing_if = "Option::is_none")]
   pub offset: Option<usize>,
   #[serde(skip_serializing_if = "Option::is_none")]
   pub limit: Option<usize>,
}

impl QueryParameters {
   pub fn is_paginated(&self) -> bool {
      self.limit.is_some()
   }
}

/// Parameters for counting the rows a listing covers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CountParameters {
   #[serde(skip_serializing_if = "Option::is_none")]
   pub conditions: Option<String>,
}

/// Turns a raw condition into one that is safe to embed in a query.
///
/// The engine never interprets conditions; whatever escaping or binding the
/// data layer needs happens behind this trait.
pub trait PredicateSanitizer {
   fn sanitize(&self, condition: &str) -> String;
}

/// Passes conditions through unchanged, for conditions that are already
/// trusted SQL.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentitySanitizer;

impl PredicateSanitizer for IdentitySanitizer {
   fn sanitize(&self, condition: &str) -> String {
      condition.to_string()
   }
}

impl<F> PredicateSanitizer for F
where
   F: Fn(&str) -> String,
{
   fn sanitize(&self, condition: &str) -> String {
      self(condition)
   }
}

#[cfg(test)]
mod tests {
   use super::*;
   use serde_json::json;

   #[test]
   fn unpaginated_parameters_omit_offset_and_limit() {
      let params = QueryParameters {
         order: Some("widgets.id ASC".into()),
         ..Default::default()
      };
      assert!(!params.is_paginated());
      assert_eq!(
         serde_json::to_value(&params).unwrap(),
         json!({"order": "widgets.id ASC"})
      );
   }

   #[test]
   fn closures_are_sanitizers() {
      let upper = |c: &str| c.to_uppercase();
      assert_eq!(upper.sanitize("a = 1"), "A = 1");
      assert_eq!(IdentitySanitizer.sanitize("a = 1"), "a = 1");
   }
}
