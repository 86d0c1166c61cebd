//! Catalogue-level error types.
//!
//! Not-found conditions in stat queries are expressed as `Option::None`;
//! these errors cover the remaining recoverable failures.

/// Errors returned by catalogue queries.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogueError {
    /// A query referenced a stop the catalogue has never seen.
    #[error("unknown stop: {0}")]
    UnknownStop(String),

    /// Both stops exist but no road distance was recorded in either
    /// direction.
    #[error("no road distance recorded between {from} and {to}")]
    NoDistanceData { from: String, to: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = CatalogueError::UnknownStop("Nowhere".into());
        assert_eq!(err.to_string(), "unknown stop: Nowhere");

        let err = CatalogueError::NoDistanceData {
            from: "A".into(),
            to: "B".into(),
        };
        assert_eq!(err.to_string(), "no road distance recorded between A and B");
    }
}
