//! Single-column sort specification and its compact token encoding.
//!
//! A sort token has the shape `[table.]column`. The direction is not written
//! as a separate symbol: the case of the first letter of the column carries
//! it, so `name` sorts ascending and `Name` (or `NAME`) sorts descending. This
//! keeps a multi-column sort short enough to ride along in a URL parameter.
//!
//! Inside this crate the direction is always an explicit [`SortDirection`];
//! character case is only inspected while decoding a token and only produced
//! while encoding one.
//!
//! # Example
//!
//! ```
//! use listview_core::sort::{SortDirection, SortSpec};
//!
//! let spec = SortSpec::parse("Title", Some("posts")).unwrap();
//! assert_eq!(spec.direction(), SortDirection::Desc);
//! assert_eq!(spec.encode(), "TITLE");
//! assert_eq!(spec.to_order_fragment(), "posts.title DESC");
//! ```

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Sort direction for a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortDirection {
   /// Ascending order (smallest first)
   Asc,
   /// Descending order (largest first)
   Desc,
}

impl SortDirection {
   /// Return the opposite sort direction.
   pub fn reversed(self) -> Self {
      match self {
         SortDirection::Asc => SortDirection::Desc,
         SortDirection::Desc => SortDirection::Asc,
      }
   }

   /// SQL keyword for this direction.
   pub fn as_sql(self) -> &'static str {
      match self {
         SortDirection::Asc => "ASC",
         SortDirection::Desc => "DESC",
      }
   }

   fn label(self) -> &'static str {
      match self {
         SortDirection::Asc => "ascending",
         SortDirection::Desc => "descending",
      }
   }
}

/// What selecting a column header would do to the sort, for header rendering.
///
/// Only the primary column gets a direction: it shows the direction that a
/// click would switch to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortIndicator {
   /// Column is not the primary sort key
   None,
   /// Selecting the column sorts it ascending
   Ascending,
   /// Selecting the column sorts it descending
   Descending,
}

/// `[table.]column`, both parts ASCII word characters.
fn token_pattern() -> &'static Regex {
   static RE: OnceLock<Regex> = OnceLock::new();
   RE.get_or_init(|| {
      Regex::new(r"^(?:([A-Za-z0-9_]+)\.)?([A-Za-z0-9_]+)$").expect("invalid regex")
   })
}

/// The pieces of a decoded sort token, borrowed from the token itself.
struct TokenParts<'a> {
   table: Option<&'a str>,
   column: &'a str,
   direction: SortDirection,
}

fn malformed(token: &str) -> Error {
   Error::MalformedSortToken {
      token: token.to_string(),
   }
}

/// Split a token into qualifier, column and the direction encoded in the
/// case of the column's first letter.
fn split_token(token: &str) -> Result<TokenParts<'_>> {
   let caps = token_pattern()
      .captures(token)
      .ok_or_else(|| malformed(token))?;

   let table = caps.get(1).map(|m| m.as_str());
   let column = caps.get(2).ok_or_else(|| malformed(token))?.as_str();

   // Only a lowercase first letter means ascending; `123` or `__` sort descending
   let direction = match column.chars().find(char::is_ascii_alphabetic) {
      Some(first) if first.is_ascii_lowercase() => SortDirection::Asc,
      _ => SortDirection::Desc,
   };

   Ok(TokenParts {
      table,
      column,
      direction,
   })
}

/// Check whether a string is a well-formed sort token.
pub fn is_valid_token(token: &str) -> bool {
   split_token(token).is_ok()
}

/// Turn a column identifier into a human label: `last_name` → `Last name`,
/// `author_id` → `Author`.
pub fn humanize(column: &str) -> String {
   let base = column.strip_suffix("_id").unwrap_or(column);
   let spaced = base.replace('_', " ").to_lowercase();
   let trimmed = spaced.trim();

   let mut chars = trimmed.chars();
   match chars.next() {
      Some(first) => first.to_uppercase().chain(chars).collect(),
      None => String::new(),
   }
}

/// One column of a multi-column sort.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
   table: Option<String>,
   column: String,
   direction: SortDirection,
   /// True when the table came from (or equals) the default table, in which
   /// case the encoded token leaves the qualifier out.
   default_table: bool,
}

impl SortSpec {
   /// Decode a sort token.
   ///
   /// An unqualified token takes `default_table` as its table. A qualified
   /// token whose qualifier equals `default_table` is treated the same way,
   /// so re-encoding drops the redundant qualifier.
   ///
   /// # Errors
   ///
   /// [`Error::MalformedSortToken`] when the token is not `[table.]column`.
   pub fn parse(token: &str, default_table: Option<&str>) -> Result<Self> {
      let parts = split_token(token)?;

      let (table, uses_default) = match parts.table {
         Some(qualifier) => (Some(qualifier.to_string()), default_table == Some(qualifier)),
         None => (default_table.map(str::to_string), true),
      };

      Ok(Self {
         table,
         column: parts.column.to_ascii_lowercase(),
         direction: parts.direction,
         default_table: uses_default,
      })
   }

   /// Table qualifier, explicit or defaulted.
   pub fn table(&self) -> Option<&str> {
      self.table.as_deref()
   }

   /// Lowercase column name.
   pub fn column(&self) -> &str {
      &self.column
   }

   pub fn direction(&self) -> SortDirection {
      self.direction
   }

   pub fn is_ascending(&self) -> bool {
      self.direction == SortDirection::Asc
   }

   /// Whether the table qualifier is the default one.
   pub fn uses_default_table(&self) -> bool {
      self.default_table
   }

   /// Flip the sort direction in place.
   pub fn toggle_order(&mut self) -> &mut Self {
      self.direction = self.direction.reversed();
      self
   }

   /// Copy of this spec with the direction flipped.
   #[must_use]
   pub fn toggled(&self) -> Self {
      let mut spec = self.clone();
      spec.toggle_order();
      spec
   }

   /// Build the minimal token for this spec.
   ///
   /// The qualifier is omitted when it is the default table. The column is
   /// lowercase when ascending and uppercase when descending.
   pub fn encode(&self) -> String {
      let column = match self.direction {
         SortDirection::Asc => self.column.clone(),
         SortDirection::Desc => self.column.to_ascii_uppercase(),
      };

      match (&self.table, self.default_table) {
         (Some(table), false) => format!("{}.{}", table, column),
         _ => column,
      }
   }

   /// ORDER BY term for this spec, always fully qualified when a table is
   /// known: `table.column ASC`.
   pub fn to_order_fragment(&self) -> String {
      match &self.table {
         Some(table) => format!("{}.{} {}", table, self.column, self.direction.as_sql()),
         None => format!("{} {}", self.column, self.direction.as_sql()),
      }
   }

   /// Does `token` name the same table and column as this spec?
   ///
   /// An unqualified token only matches a spec on the default table. With
   /// `order_aware`, the direction encoded in the token must match as well.
   /// Malformed tokens never match.
   pub fn matches(&self, token: &str, order_aware: bool) -> bool {
      let Ok(parts) = split_token(token) else {
         return false;
      };

      let table_matches = match parts.table {
         Some(qualifier) => self.table.as_deref() == Some(qualifier),
         None => self.default_table,
      };
      let column_matches = self.column.eq_ignore_ascii_case(parts.column);
      let order_matches = !order_aware || parts.direction == self.direction;

      table_matches && column_matches && order_matches
   }

   /// Describe the sort, e.g. `Sort ascending by Last name`.
   ///
   /// `column_alias` replaces the humanized column name.
   pub fn description(&self, column_alias: Option<&str>) -> String {
      let label = match column_alias {
         Some(alias) => alias.to_string(),
         None => humanize(&self.column),
      };
      format!("Sort {} by {}", self.direction.label(), label)
   }
}

impl fmt::Display for SortSpec {
   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
      f.write_str(&self.encode())
   }
}
