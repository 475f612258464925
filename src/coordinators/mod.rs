// Coordinators layer - Workflow orchestration
//
// Coordinators handle workflow orchestration by composing store and provider
// operations for specific API endpoints: permission check, validation,
// persistence, response mapping. Business rules live in the providers.

pub mod auth_coordinator;
pub mod health_coordinator;
pub mod herd_coordinator;
pub mod production_coordinator;
pub mod reproduction_coordinator;
pub mod user_coordinator;

pub use auth_coordinator::AuthCoordinator;
pub use health_coordinator::HealthCoordinator;
pub use herd_coordinator::HerdCoordinator;
pub use production_coordinator::ProductionCoordinator;
pub use reproduction_coordinator::ReproductionCoordinator;
pub use user_coordinator::UserCoordinator;

use crate::errors::InternalError;

/// Wording used when a listing comes back empty
#[derive(Debug, Clone, Copy)]
pub(crate) struct EmptyListing {
    /// Filters were given and nothing matched (404)
    pub no_matches: &'static str,
    /// Nothing recorded yet (200 with a detail message)
    pub nothing_yet: &'static str,
}

/// Apply the shared empty-list rules to a listing
///
/// Returns the results together with the `detail` message for the envelope.
pub(crate) fn finish_listing<T>(
    results: Vec<T>,
    filtered: bool,
    wording: EmptyListing,
) -> Result<(Vec<T>, Option<String>), InternalError> {
    if !results.is_empty() {
        return Ok((results, None));
    }
    if filtered {
        return Err(InternalError::no_matches(wording.no_matches));
    }
    Ok((results, Some(wording.nothing_yet.to_string())))
}

#[cfg(test)]
mod tests {
    use super::*;

    const WORDING: EmptyListing = EmptyListing {
        no_matches: "No cow(s) found matching the provided filters.",
        nothing_yet: "No cows found in the farm yet.",
    };

    #[test]
    fn test_results_pass_through() {
        let (results, detail) = finish_listing(vec![1, 2], true, WORDING).unwrap();
        assert_eq!(results, vec![1, 2]);
        assert!(detail.is_none());
    }

    #[test]
    fn test_empty_unfiltered_listing_has_detail() {
        let (results, detail) = finish_listing(Vec::<i32>::new(), false, WORDING).unwrap();
        assert!(results.is_empty());
        assert_eq!(detail.as_deref(), Some("No cows found in the farm yet."));
    }

    #[test]
    fn test_empty_filtered_listing_is_no_match() {
        let err = finish_listing(Vec::<i32>::new(), true, WORDING).unwrap_err();
        assert!(matches!(err, InternalError::NoMatches { .. }));
        assert_eq!(err.to_string(), "No cow(s) found matching the provided filters.");
    }
}
