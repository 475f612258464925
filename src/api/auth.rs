use std::sync::Arc;

use poem::Request;
use poem_openapi::auth::Bearer;
use poem_openapi::{OpenApi, SecurityScheme, Tags, payload::Json};

use crate::api::helpers::request_context;
use crate::app_data::AppData;
use crate::coordinators::{AuthCoordinator, UserCoordinator};
use crate::errors::AuthError;
use crate::types::dto::auth::{
    LoginApiResponse, LoginRequest, LogoutApiResponse, RefreshApiResponse, RefreshRequest,
};
use crate::types::dto::user::{RegisterRequest, UserApiResponse, UserResponse};

/// JWT Bearer token authentication
#[derive(SecurityScheme)]
#[oai(ty = "bearer", key_name = "Authorization", key_in = "header", bearer_format = "JWT")]
pub struct BearerAuth(pub Bearer);

/// Authentication API endpoints
pub struct AuthApi {
    app_data: Arc<AppData>,
    auth_coordinator: AuthCoordinator,
    user_coordinator: UserCoordinator,
}

impl AuthApi {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            auth_coordinator: AuthCoordinator::new(app_data.clone()),
            user_coordinator: UserCoordinator::new(app_data.clone()),
            app_data,
        }
    }
}

/// API tags for authentication endpoints
#[derive(Tags)]
enum AuthTags {
    /// Accounts, login and tokens
    Authentication,
}

#[OpenApi]
impl AuthApi {
    /// Register a new account
    ///
    /// New accounts hold no farm role until one is assigned.
    #[oai(path = "/auth/users", method = "post", tag = "AuthTags::Authentication")]
    async fn register(&self, req: &Request, body: Json<RegisterRequest>) -> Result<UserApiResponse, AuthError> {
        let ctx = request_context(&self.app_data, req).await;
        let user = self.user_coordinator.register(&ctx, body.0).await?;
        Ok(UserApiResponse::Created(Json(user)))
    }

    /// Profile of the logged-in user
    #[oai(path = "/auth/users/me", method = "get", tag = "AuthTags::Authentication")]
    async fn me(&self, req: &Request, _auth: BearerAuth) -> Result<Json<UserResponse>, AuthError> {
        let ctx = request_context(&self.app_data, req).await;
        let user = self.user_coordinator.me(&ctx).await?;
        Ok(Json(user))
    }

    /// Authenticate with username and password
    ///
    /// Returns an access token (JWT) and a refresh token. Access tokens expire
    /// after 15 minutes.
    #[oai(path = "/login", method = "post", tag = "AuthTags::Authentication")]
    async fn login(&self, req: &Request, body: Json<LoginRequest>) -> Result<LoginApiResponse, AuthError> {
        let ctx = request_context(&self.app_data, req).await;
        let tokens = self
            .auth_coordinator
            .login(&ctx, &body.username, &body.password)
            .await?;
        Ok(LoginApiResponse::Ok(Json(tokens)))
    }

    /// End the current session
    #[oai(path = "/logout", method = "post", tag = "AuthTags::Authentication")]
    async fn logout(&self, req: &Request, _auth: BearerAuth) -> Result<LogoutApiResponse, AuthError> {
        let ctx = request_context(&self.app_data, req).await;
        self.auth_coordinator.logout(&ctx).await?;
        Ok(LogoutApiResponse::NoContent)
    }

    /// Exchange a refresh token for a new access token
    #[oai(path = "/auth/refresh", method = "post", tag = "AuthTags::Authentication")]
    async fn refresh(&self, req: &Request, body: Json<RefreshRequest>) -> Result<RefreshApiResponse, AuthError> {
        let ctx = request_context(&self.app_data, req).await;
        let refreshed = self.auth_coordinator.refresh(&ctx, &body.refresh_token).await?;
        Ok(RefreshApiResponse::Ok(Json(refreshed)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::utils::{create_user_with_password, setup_test_app_data};

    fn bearer_request(token: &str) -> (Request, BearerAuth) {
        let req = Request::builder()
            .header("Authorization", format!("Bearer {}", token))
            .finish();
        (req, BearerAuth(Bearer { token: token.to_string() }))
    }

    async fn login(api: &AuthApi, username: &str, password: &str) -> Result<LoginApiResponse, AuthError> {
        api.login(
            &Request::builder().finish(),
            Json(LoginRequest {
                username: username.to_string(),
                password: password.to_string(),
            }),
        )
        .await
    }

    #[tokio::test]
    async fn test_register_returns_created() {
        let app_data = setup_test_app_data().await;
        let api = AuthApi::new(app_data);

        let response = api
            .register(
                &Request::builder().finish(),
                Json(RegisterRequest {
                    username: "wanjiku".to_string(),
                    email: Some("wanjiku@example.com".to_string()),
                    first_name: "Wanjiku".to_string(),
                    last_name: "Kamau".to_string(),
                    phone_number: None,
                    sex: "Female".to_string(),
                    password: "milk-and-honey".to_string(),
                }),
            )
            .await
            .unwrap();

        match response {
            UserApiResponse::Created(Json(user)) => {
                assert_eq!(user.username, "wanjiku");
                assert!(user.role.is_none());
            }
            _ => panic!("expected 201"),
        }
    }

    #[tokio::test]
    async fn test_login_then_me() {
        let app_data = setup_test_app_data().await;
        create_user_with_password(&app_data, "farmer", "grass-is-green").await;
        let api = AuthApi::new(app_data);

        let LoginApiResponse::Ok(Json(tokens)) = login(&api, "farmer", "grass-is-green").await.unwrap();
        let (req, auth) = bearer_request(&tokens.access_token);

        let me = api.me(&req, auth).await.unwrap();
        assert_eq!(me.0.username, "farmer");
    }

    #[tokio::test]
    async fn test_bad_credentials_message() {
        let app_data = setup_test_app_data().await;
        create_user_with_password(&app_data, "farmer", "grass-is-green").await;
        let api = AuthApi::new(app_data);

        let err = login(&api, "farmer", "wrong").await.err().unwrap();

        assert_eq!(err.status_code(), 400);
        assert_eq!(err.message(), "Unable to log in with provided credentials.");
    }

    #[tokio::test]
    async fn test_logout_then_me_is_unauthorized() {
        let app_data = setup_test_app_data().await;
        create_user_with_password(&app_data, "farmer", "grass-is-green").await;
        let api = AuthApi::new(app_data);
        let LoginApiResponse::Ok(Json(tokens)) = login(&api, "farmer", "grass-is-green").await.unwrap();

        let (req, auth) = bearer_request(&tokens.access_token);
        api.logout(&req, auth).await.unwrap();

        let (req, auth) = bearer_request(&tokens.access_token);
        let err = api.me(&req, auth).await.unwrap_err();
        assert_eq!(err.status_code(), 401);
    }

    #[tokio::test]
    async fn test_refresh_with_unknown_token() {
        let app_data = setup_test_app_data().await;
        let api = AuthApi::new(app_data);

        let err = api
            .refresh(
                &Request::builder().finish(),
                Json(RefreshRequest {
                    refresh_token: "unknown".to_string(),
                }),
            )
            .await
            .err()
            .unwrap();

        assert_eq!(err.status_code(), 401);
        assert_eq!(err.code(), "invalid_refresh_token");
    }
}
