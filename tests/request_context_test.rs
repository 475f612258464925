mod common;

use dairy_backend::coordinators::{AuthCoordinator, UserCoordinator};
use dairy_backend::types::dto::user::RegisterRequest;
use dairy_backend::types::internal::auth::RoleFlags;
use dairy_backend::types::internal::context::{RequestContext, RequestSource};
use poem::Request;

fn register_request(username: &str) -> RegisterRequest {
    RegisterRequest {
        username: username.to_string(),
        email: None,
        first_name: "Achieng".to_string(),
        last_name: "Otieno".to_string(),
        phone_number: None,
        sex: "Female".to_string(),
        password: "Milking-Parlour-1".to_string(),
    }
}

fn bearer_request(token: &str) -> Request {
    Request::builder()
        .header("Authorization", format!("Bearer {}", token))
        .header("X-Forwarded-For", "10.0.0.7, 172.16.0.1")
        .finish()
}

#[tokio::test]
async fn test_live_session_authenticates_request() {
    let app_data = common::setup_test_app_data().await;
    let roles = RoleFlags {
        is_team_leader: true,
        ..Default::default()
    };
    let user = UserCoordinator::new(app_data.clone())
        .create_user(&RequestContext::for_cli("create_owner"), register_request("achieng"), roles)
        .await
        .unwrap();
    let tokens = AuthCoordinator::new(app_data.clone())
        .login(&RequestContext::anonymous(), "achieng", "Milking-Parlour-1")
        .await
        .unwrap();

    let ctx = RequestContext::validate_request(
        &bearer_request(&tokens.access_token),
        &app_data.authentication_provider,
        &app_data.db,
    )
    .await;

    assert!(ctx.authenticated);
    assert_eq!(ctx.source, RequestSource::API);
    assert_eq!(ctx.user_id(), Some(user.id));
    assert_eq!(ctx.actor_id, user.id.to_string());
    assert!(ctx.roles().is_team_leader);
    assert_eq!(ctx.ip_address.map(|ip| ip.to_string()), Some("10.0.0.7".to_string()));
}

#[tokio::test]
async fn test_logged_out_session_leaves_request_anonymous() {
    let app_data = common::setup_test_app_data().await;
    UserCoordinator::new(app_data.clone())
        .register(&RequestContext::for_cli("create_owner"), register_request("otieno"))
        .await
        .unwrap();
    let auth = AuthCoordinator::new(app_data.clone());
    let tokens = auth
        .login(&RequestContext::anonymous(), "otieno", "Milking-Parlour-1")
        .await
        .unwrap();
    let req = bearer_request(&tokens.access_token);

    let ctx = RequestContext::validate_request(&req, &app_data.authentication_provider, &app_data.db).await;
    auth.logout(&ctx).await.unwrap();
    let after = RequestContext::validate_request(&req, &app_data.authentication_provider, &app_data.db).await;

    assert!(!after.authenticated);
    assert!(after.claims.is_none());
    assert_eq!(after.actor_id, "anonymous");
}

#[tokio::test]
async fn test_garbage_token_is_ignored() {
    let app_data = common::setup_test_app_data().await;

    let ctx = RequestContext::validate_request(
        &bearer_request("not-a-jwt"),
        &app_data.authentication_provider,
        &app_data.db,
    )
    .await;

    assert!(!ctx.authenticated);
    assert_eq!(ctx.user_id(), None);
}
