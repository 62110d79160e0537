//! SQL statement assembly from query parameters.
//!
//! Nothing here talks to a database. The functions take a caller-supplied
//! base query (`SELECT ... FROM ... [WHERE ...]`) and append the listing's
//! conditions, ordering and page bounds, producing text the data layer can
//! run with whatever driver it uses.
//!
//! ```
//! use listview_core::{IdentitySanitizer, ListViewState, sql::build_select};
//!
//! let mut state = ListViewState::new(Some("posts".into()), vec![Some("score > 80".into())])
//!    .with_conditions(vec!["deleted = 0".into()]);
//! state.change_sort("Score").unwrap();
//!
//! let params = state.find_parameters(&IdentitySanitizer);
//! let sql = build_select("SELECT id FROM posts", &params).unwrap();
//! assert_eq!(
//!    sql,
//!    "SELECT id FROM posts WHERE (deleted = 0 AND score > 80) ORDER BY posts.score DESC LIMIT 10 OFFSET 0"
//! );
//! ```

use crate::query::{CountParameters, QueryParameters};
use crate::{Error, Result};

/// Clauses the assembled statement adds itself.
const BOUNDING_KEYWORDS: [&[u8]; 3] = [b"ORDER", b"LIMIT", b"OFFSET"];

/// Iterates over the byte positions of a query that sit at parenthesis depth
/// zero and outside string literals, quoted identifiers and comments.
///
/// Positions index into the ASCII-uppercased copy held by the scanner.
struct TopLevel {
   upper: Vec<u8>,
   pos: usize,
   depth: i32,
   tail: Tail,
}

/// How the scanned text ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tail {
   Closed,
   /// Inside a `--` comment; a newline ends it
   LineComment,
   /// Inside a `/*` comment or a quoted literal that never closes
   Unterminated,
}

impl TopLevel {
   fn new(query: &str) -> Self {
      Self {
         upper: query.to_ascii_uppercase().into_bytes(),
         pos: 0,
         depth: 0,
         tail: Tail::Closed,
      }
   }

   /// Scan the whole query and report how it ends.
   fn tail(query: &str) -> Tail {
      let mut scanner = Self::new(query);
      scanner.by_ref().for_each(drop);
      scanner.tail
   }

   /// Position of the closing quote, handling doubled-quote escapes.
   fn end_of_quoted(&self, start: usize, quote: u8) -> usize {
      let bytes = &self.upper;
      let mut j = start + 1;
      while j < bytes.len() {
         if bytes[j] == quote {
            if bytes.get(j + 1) == Some(&quote) {
               j += 2;
               continue;
            }
            return j;
         }
         j += 1;
      }
      bytes.len()
   }

   fn end_of_line_comment(&self, start: usize) -> usize {
      self.upper[start..]
         .iter()
         .position(|&b| b == b'\n')
         .map_or(self.upper.len(), |n| start + n)
   }

   fn end_of_block_comment(&self, start: usize) -> usize {
      self.upper[start + 2..]
         .windows(2)
         .position(|w| w == b"*/")
         .map_or(self.upper.len(), |n| start + 2 + n + 1)
   }

   /// Is `keyword` a standalone word at `at`?
   fn keyword_at(&self, at: usize, keyword: &[u8]) -> bool {
      let bytes = &self.upper;
      let end = at + keyword.len();
      if end > bytes.len() || &bytes[at..end] != keyword {
         return false;
      }

      let is_word = |b: u8| b.is_ascii_alphanumeric() || b == b'_';
      let before_ok = at == 0 || !is_word(bytes[at - 1]);
      let after_ok = end == bytes.len() || !is_word(bytes[end]);
      before_ok && after_ok
   }

   /// Whether any of `keywords` appears at the top level.
   fn has_keyword(mut self, keywords: &[&[u8]]) -> bool {
      while let Some(at) = self.next() {
         if keywords.iter().any(|kw| self.keyword_at(at, kw)) {
            return true;
         }
      }
      false
   }
}

impl Iterator for TopLevel {
   type Item = usize;

   fn next(&mut self) -> Option<usize> {
      while self.pos < self.upper.len() {
         let at = self.pos;
         self.pos += 1;

         match self.upper[at] {
            b'(' => self.depth += 1,
            b')' => self.depth -= 1,
            quote @ (b'\'' | b'"') => {
               let end = self.end_of_quoted(at, quote);
               if end == self.upper.len() {
                  self.tail = Tail::Unterminated;
               }
               self.pos = end + 1;
            }
            b'-' if self.upper.get(at + 1) == Some(&b'-') => {
               self.pos = self.end_of_line_comment(at);
               if self.pos == self.upper.len() {
                  self.tail = Tail::LineComment;
               }
            }
            b'/' if self.upper.get(at + 1) == Some(&b'*') => {
               let end = self.end_of_block_comment(at);
               if end == self.upper.len() {
                  self.tail = Tail::Unterminated;
               }
               self.pos = end + 1;
            }
            _ if self.depth == 0 => return Some(at),
            _ => {}
         }
      }
      None
   }
}

/// Reject base queries that already order or limit their rows at the top
/// level, or that end inside an unclosed comment or literal where appended
/// clauses would be swallowed. Subqueries, comments and string literals are
/// otherwise fine.
pub fn validate_base_query(query: &str) -> Result<()> {
   if TopLevel::new(query).has_keyword(&BOUNDING_KEYWORDS) {
      return Err(Error::InvalidBaseQuery);
   }
   if TopLevel::tail(query) == Tail::Unterminated {
      return Err(Error::InvalidBaseQuery);
   }
   Ok(())
}

/// Detect whether a base query has a WHERE clause at parenthesis depth 0.
pub fn has_top_level_where(query: &str) -> bool {
   TopLevel::new(query).has_keyword(&[b"WHERE".as_slice()])
}

/// Base query with trailing `;` removed and the conditions applied.
///
/// A trailing `--` comment is closed with a newline so that nothing appended
/// afterwards ends up commented out.
fn filtered_base(base_query: &str, conditions: Option<&str>) -> Result<String> {
   validate_base_query(base_query)?;

   let mut sql = base_query
      .trim_end()
      .trim_end_matches(';')
      .trim_end()
      .to_string();
   if TopLevel::tail(&sql) == Tail::LineComment {
      sql.push('\n');
   }

   if let Some(condition) = conditions.filter(|c| !c.trim().is_empty()) {
      let joiner = if has_top_level_where(&sql) { "AND" } else { "WHERE" };
      sql = format!("{} {} ({})", sql, joiner, condition);
   }

   Ok(sql)
}

/// Build the statement that fetches one page of the listing.
///
/// Conditions become `WHERE (...)`, or `AND (...)` when the base query
/// already filters at the top level. An existing WHERE with a bare `OR`
/// should be parenthesized by the caller.
///
/// # Errors
///
/// [`Error::InvalidBaseQuery`] if the base query has a top-level ORDER BY,
/// LIMIT or OFFSET, or ends in an unclosed `/*` comment or literal.
pub fn build_select(base_query: &str, params: &QueryParameters) -> Result<String> {
   let mut sql = filtered_base(base_query, params.conditions.as_deref())?;

   if let Some(order) = params.order.as_deref() {
      sql = format!("{} ORDER BY {}", sql, order);
   }
   if let Some(limit) = params.limit {
      sql = format!("{} LIMIT {} OFFSET {}", sql, limit, params.offset.unwrap_or(0));
   }

   Ok(sql)
}

/// Build the statement that counts every row of the listing.
///
/// # Errors
///
/// [`Error::InvalidBaseQuery`] if the base query has a top-level ORDER BY,
/// LIMIT or OFFSET, or ends in an unclosed `/*` comment or literal.
pub fn build_count(base_query: &str, params: &CountParameters) -> Result<String> {
   let sql = filtered_base(base_query, params.conditions.as_deref())?;
   Ok(format!("SELECT COUNT(*) FROM ({}) AS counted", sql))
}
