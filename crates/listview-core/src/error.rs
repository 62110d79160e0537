/// Result type alias for list view state operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for list view state operations.
///
/// Every variant is local and recoverable: callers are expected to keep the
/// prior state for the offending field and carry on with the request.
#[derive(Debug, thiserror::Error)]
pub enum Error {
   /// Sort token does not have the `[table.]column` shape.
   ///
   /// Both parts must be non-empty runs of ASCII letters, digits and
   /// underscores, and the column must contain at least one letter so the
   /// direction can be carried by its case.
   #[error("malformed sort token '{token}': expected [table.]column")]
   MalformedSortToken { token: String },

   /// Inbound state parameter could not be parsed.
   #[error("invalid value '{value}' for parameter '{key}'")]
   InvalidParameter { key: String, value: String },

   /// Base query for statement assembly must not contain top-level ORDER BY,
   /// LIMIT or OFFSET clauses, nor end inside an unclosed comment or literal.
   #[error(
      "base query must not contain top-level ORDER BY, LIMIT or OFFSET clauses (these are added automatically; subquery usage is fine) or end in an unclosed comment or literal"
   )]
   InvalidBaseQuery,
}

impl Error {
   /// Extract a structured error code from the error type.
   ///
   /// This provides machine-readable error codes for error handling.
   pub fn error_code(&self) -> String {
      match self {
         Error::MalformedSortToken { .. } => "MALFORMED_SORT_TOKEN".to_string(),
         Error::InvalidParameter { .. } => "INVALID_PARAMETER".to_string(),
         Error::InvalidBaseQuery => "INVALID_BASE_QUERY".to_string(),
      }
   }
}

#[cfg(test)]
mod tests {
   use super::*;

   #[test]
   fn test_error_code_malformed_sort_token() {
      let err = Error::MalformedSortToken {
         token: "a.b.c".into(),
      };
      assert_eq!(err.error_code(), "MALFORMED_SORT_TOKEN");
      assert!(err.to_string().contains("a.b.c"));
   }

   #[test]
   fn test_error_code_invalid_parameter() {
      let err = Error::InvalidParameter {
         key: "page".into(),
         value: "two".into(),
      };
      assert_eq!(err.error_code(), "INVALID_PARAMETER");
      assert!(err.to_string().contains("page"));
      assert!(err.to_string().contains("two"));
   }

   #[test]
   fn test_error_code_invalid_base_query() {
      let err = Error::InvalidBaseQuery;
      assert_eq!(err.error_code(), "INVALID_BASE_QUERY");
      assert!(err.to_string().contains("top-level ORDER BY"));
   }
}
