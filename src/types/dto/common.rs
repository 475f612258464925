use poem_openapi::{ApiResponse, Object};

/// Response model for health check endpoint
#[derive(Object, Debug)]
pub struct HealthResponse {
    /// Status of the service
    pub status: String,

    /// Timestamp of the health check (ISO 8601 format)
    pub timestamp: String,
}

/// Plain confirmation message
#[derive(Object, Debug, Clone, PartialEq)]
pub struct MessageResponse {
    pub message: String,
}

/// API response for endpoints that remove a record
#[derive(ApiResponse, Debug)]
pub enum DeletedApiResponse {
    /// Record deleted
    #[oai(status = 204)]
    NoContent,
}

/// Declare the list envelope for a record type
///
/// `detail` is only set when the farm has no records of that kind yet.
macro_rules! list_response {
    ($(#[$meta:meta])* $name:ident, $item:ty) => {
        $(#[$meta])*
        #[derive(poem_openapi::Object, Debug)]
        pub struct $name {
            /// Number of records returned
            pub count: usize,

            pub results: Vec<$item>,

            /// Set when there is nothing to list
            #[oai(skip_serializing_if_is_none)]
            pub detail: Option<String>,
        }

        impl $name {
            pub fn new(results: Vec<$item>, detail: Option<String>) -> Self {
                Self {
                    count: results.len(),
                    results,
                    detail,
                }
            }
        }
    };
}

/// Declare the single-record response for a record type: 200 on read or
/// update, 201 on create
macro_rules! record_response {
    ($(#[$meta:meta])* $name:ident, $item:ty) => {
        $(#[$meta])*
        #[derive(poem_openapi::ApiResponse, Debug)]
        pub enum $name {
            #[oai(status = 200)]
            Ok(poem_openapi::payload::Json<$item>),

            #[oai(status = 201)]
            Created(poem_openapi::payload::Json<$item>),
        }
    };
}

pub(crate) use list_response;
pub(crate) use record_response;
