use std::net::IpAddr;

use poem::Request;
use poem_openapi::auth::{Bearer, BearerAuthorization};
use sea_orm::ConnectionTrait;

use crate::providers::AuthenticationProvider;
use crate::types::internal::auth::{Claims, RoleFlags};

use super::{request_id::RequestId, request_source::RequestSource};

/// Request context that flows through all layers
///
/// Contains contextual information about the current request that is needed
/// for permission checks and tracing across API, coordinator and store layers.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestContext {
    /// IP address of the client making the request
    pub ip_address: Option<IpAddr>,

    /// Unique identifier for this request (for tracing across layers)
    pub request_id: RequestId,

    /// Whether the request is authenticated (JWT valid and session alive)
    pub authenticated: bool,

    /// Full JWT claims if authenticated
    pub claims: Option<Claims>,

    /// Source of the request (API, CLI, or System)
    pub source: RequestSource,

    /// Actor who initiated the operation
    pub actor_id: String,
}

impl RequestContext {
    /// Create a RequestContext for CLI operations
    pub fn for_cli(command_name: &str) -> Self {
        Self {
            ip_address: None,
            request_id: RequestId::new(),
            authenticated: false,
            claims: None,
            source: RequestSource::CLI,
            actor_id: format!("cli:{}", command_name),
        }
    }

    /// Create a RequestContext for system operations
    pub fn for_system(operation_name: &str) -> Self {
        Self {
            ip_address: None,
            request_id: RequestId::new(),
            authenticated: false,
            claims: None,
            source: RequestSource::System,
            actor_id: format!("system:{}", operation_name),
        }
    }

    /// Unauthenticated API context
    pub fn anonymous() -> Self {
        Self {
            ip_address: None,
            request_id: RequestId::new(),
            authenticated: false,
            claims: None,
            source: RequestSource::API,
            actor_id: "anonymous".to_owned(),
        }
    }

    fn extract_bearer(req: &Request) -> Option<Bearer> {
        Bearer::from_request(req).ok()
    }

    /// Extract IP address from request headers
    ///
    /// Checks X-Forwarded-For, X-Real-IP, and falls back to remote address.
    fn extract_ip_address(req: &Request) -> Option<IpAddr> {
        if let Some(forwarded) = req.header("X-Forwarded-For") {
            if let Some(ip) = forwarded.split(',').next() {
                return ip.trim().parse().ok();
            }
        }

        if let Some(real_ip) = req.header("X-Real-IP") {
            return real_ip.parse().ok();
        }

        req.remote_addr().as_socket_addr().map(|addr| addr.ip())
    }

    /// Build the context for an incoming API request
    ///
    /// Call this at the start of every endpoint. A bearer token, when present,
    /// is checked for signature, expiry and a live session. Any failure leaves
    /// the context unauthenticated; the permission check downstream turns that
    /// into a 401 where login is required.
    pub async fn validate_request(
        req: &Request,
        authentication_provider: &AuthenticationProvider,
        conn: &impl ConnectionTrait,
    ) -> Self {
        let mut ctx = Self::anonymous();
        ctx.ip_address = Self::extract_ip_address(req);

        if let Some(bearer) = Self::extract_bearer(req) {
            match authentication_provider.authenticate(conn, &bearer.token).await {
                Ok(claims) => {
                    let actor_id = claims.sub.clone();
                    ctx = ctx.with_auth(claims).with_actor_id(actor_id);
                }
                Err(e) => {
                    tracing::debug!(request_id = %ctx.request_id, "Bearer token rejected: {}", e);
                }
            }
        }

        tracing::trace!("Request context created: {:?}", ctx);
        ctx
    }

    /// Set authentication state with claims
    pub fn with_auth(mut self, claims: Claims) -> Self {
        self.authenticated = true;
        self.claims = Some(claims);
        self
    }

    /// Set the actor_id
    pub fn with_actor_id(mut self, actor_id: impl Into<String>) -> Self {
        self.actor_id = actor_id.into();
        self
    }

    /// Id of the logged-in user
    pub fn user_id(&self) -> Option<i32> {
        self.claims.as_ref().and_then(Claims::user_id)
    }

    /// Role flags of the logged-in user; empty when anonymous
    pub fn roles(&self) -> RoleFlags {
        self.claims.as_ref().map(RoleFlags::from).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::utils::claims_for;

    #[test]
    fn test_cli_and_system_contexts() {
        let cli = RequestContext::for_cli("create-owner");
        assert_eq!(cli.source, RequestSource::CLI);
        assert_eq!(cli.actor_id, "cli:create-owner");
        assert!(!cli.authenticated);

        let system = RequestContext::for_system("migrate");
        assert_eq!(system.actor_id, "system:migrate");
        assert_ne!(cli.request_id, system.request_id);
    }

    #[test]
    fn test_with_auth_exposes_user_and_roles() {
        let mut roles = RoleFlags::default();
        roles.is_farm_manager = true;
        let ctx = RequestContext::anonymous().with_auth(claims_for(12, roles));

        assert!(ctx.authenticated);
        assert_eq!(ctx.user_id(), Some(12));
        assert!(ctx.roles().is_farm_manager);
        assert_eq!(RequestContext::anonymous().roles(), RoleFlags::default());
    }
}
