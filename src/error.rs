/// Result type alias for list view operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors from initializing a list view or handling its session state.
#[derive(Debug, thiserror::Error)]
pub enum Error {
   /// Error from the state engine.
   #[error(transparent)]
   Core(#[from] listview_core::Error),

   /// Session blob could not be encoded or decoded.
   #[error("session state error: {0}")]
   Session(#[from] serde_json::Error),
}

impl Error {
   /// Extract a structured error code from the error type.
   pub fn error_code(&self) -> String {
      match self {
         Error::Core(e) => e.error_code(),
         Error::Session(_) => "SESSION_ERROR".to_string(),
      }
   }
}

#[cfg(test)]
mod tests {
   use super::*;

   #[test]
   fn test_error_code_core_passes_through() {
      let err = Error::from(listview_core::Error::MalformedSortToken {
         token: "a b".into(),
      });
      assert_eq!(err.error_code(), "MALFORMED_SORT_TOKEN");
      assert!(err.to_string().contains("a b"));
   }

   #[test]
   fn test_error_code_session() {
      let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
      let err = Error::Session(json_err);
      assert_eq!(err.error_code(), "SESSION_ERROR");
      assert!(err.to_string().starts_with("session state error"));
   }
}
