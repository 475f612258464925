use poem::Request;

use crate::app_data::AppData;
use crate::errors::FarmError;
use crate::types::internal::context::RequestContext;

/// Build the request context for an endpoint
///
/// Authentication failures leave the context anonymous; the coordinator's
/// permission check decides whether that is a 401.
pub async fn request_context(app_data: &AppData, req: &Request) -> RequestContext {
    RequestContext::validate_request(req, &app_data.authentication_provider, &app_data.db).await
}

/// Parse a boolean query parameter given as `true`/`T`/`t`/`1` or `false`/`F`/`f`/`0`
pub fn parse_flag(field: &str, value: Option<String>) -> Result<Option<bool>, FarmError> {
    let Some(value) = value else {
        return Ok(None);
    };
    match value.as_str() {
        "true" | "T" | "t" | "1" => Ok(Some(true)),
        "false" | "F" | "f" | "0" => Ok(Some(false)),
        other => Err(FarmError::bad_request(
            &format!("invalid_{}", field),
            format!("Invalid value for {}: '{}'.", field.replace('_', " "), other),
        )),
    }
}
