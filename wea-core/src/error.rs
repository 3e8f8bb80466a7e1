//! Error taxonomy shared by every provider.

use std::fmt;

/// The data source an error originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Provider {
    Weather,
    Encyclopedia,
}

impl Provider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Weather => "weather",
            Provider::Encyclopedia => "encyclopedia",
        }
    }

    fn not_found_message(&self) -> &'static str {
        match self {
            Provider::Weather => "location not found",
            Provider::Encyclopedia => "wikipedia entry not found",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarse classification callers branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NotFound,
    Canceled,
    Other,
}

#[derive(thiserror::Error, Debug)]
pub enum ProviderError {
    /// The provider has no data for the requested name.
    #[error("{}", .provider.not_found_message())]
    NotFound { provider: Provider },

    /// The cancellation token fired before the lookup completed.
    #[error("request canceled")]
    Canceled { provider: Provider },

    /// Transport, status or decoding failure. `context` names the failed phase.
    #[error("{context}: {source}")]
    Other {
        provider: Provider,
        context: &'static str,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl ProviderError {
    pub fn other<E>(provider: Provider, context: &'static str, source: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        ProviderError::Other {
            provider,
            context,
            source: source.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ProviderError::NotFound { .. } => ErrorKind::NotFound,
            ProviderError::Canceled { .. } => ErrorKind::Canceled,
            ProviderError::Other { .. } => ErrorKind::Other,
        }
    }

    pub fn provider(&self) -> Provider {
        match self {
            ProviderError::NotFound { provider }
            | ProviderError::Canceled { provider }
            | ProviderError::Other { provider, .. } => *provider,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }

    pub fn is_canceled(&self) -> bool {
        self.kind() == ErrorKind::Canceled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn not_found_messages_name_the_source() {
        let weather = ProviderError::NotFound {
            provider: Provider::Weather,
        };
        let wiki = ProviderError::NotFound {
            provider: Provider::Encyclopedia,
        };

        assert_eq!(weather.to_string(), "location not found");
        assert_eq!(wiki.to_string(), "wikipedia entry not found");
        assert!(weather.is_not_found());
        assert_eq!(wiki.provider(), Provider::Encyclopedia);
    }

    #[test]
    fn other_keeps_context_and_source() {
        let err = ProviderError::other(Provider::Weather, "get current weather", "connection reset");

        assert_eq!(err.kind(), ErrorKind::Other);
        assert_eq!(err.to_string(), "get current weather: connection reset");
        assert_eq!(err.source().map(|s| s.to_string()).as_deref(), Some("connection reset"));
    }

    #[test]
    fn canceled_is_distinguishable() {
        let err = ProviderError::Canceled {
            provider: Provider::Encyclopedia,
        };

        assert!(err.is_canceled());
        assert!(!err.is_not_found());
        assert_eq!(err.to_string(), "request canceled");
    }
}
