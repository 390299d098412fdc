//! Newtype identifiers.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifies one registrar call.
///
/// Generated fresh for every [`crate::Client::call`] and recorded on its
/// tracing span so the request and response log lines can be correlated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CallId(Uuid);

impl CallId {
    /// Generates a new random call identifier.
    pub fn new_random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the underlying [`Uuid`].
    pub fn as_uuid(self) -> Uuid {
        self.0
    }
}

impl std::fmt::Display for CallId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_ids_differ() {
        assert_ne!(CallId::new_random(), CallId::new_random());
    }

    #[test]
    fn displays_as_hyphenated_uuid() {
        let id = CallId::new_random();

        assert_eq!(id.to_string(), id.as_uuid().hyphenated().to_string());
    }
}
