use std::time::Duration;

use devicebook::auth::{AccessRoles, Role};
use devicebook::service::grpc::{methods, CreateRecordRequest, LoginRequest, SearchRecordsRequest};
use devicebook::{Filter, ServerConfig};
use tonic::{Code, Request};

use crate::support::{authed, sample_device, start_server, test_config, ADMIN, USER};

fn create_request() -> CreateRecordRequest {
    CreateRecordRequest {
        device: Some(sample_device()),
    }
}

#[tokio::test]
async fn admin_method_without_token_is_unauthenticated() {
    let server = start_server(test_config()).await;

    let status = server
        .device_client()
        .await
        .create_record(Request::new(create_request()))
        .await
        .unwrap_err();

    assert_eq!(status.code(), Code::Unauthenticated);
    assert!(server.devices.is_empty().unwrap());
}

#[tokio::test]
async fn admin_method_with_garbage_token_is_unauthenticated() {
    let server = start_server(test_config()).await;

    let status = server
        .device_client()
        .await
        .create_record(authed(create_request(), "not.a.jwt"))
        .await
        .unwrap_err();

    assert_eq!(status.code(), Code::Unauthenticated);
}

#[tokio::test]
async fn admin_method_with_user_token_is_permission_denied() {
    let server = start_server(test_config()).await;
    let token = server.login(USER).await;

    let status = server
        .device_client()
        .await
        .create_record(authed(create_request(), &token))
        .await
        .unwrap_err();

    assert_eq!(status.code(), Code::PermissionDenied);
}

#[tokio::test]
async fn admin_method_with_admin_token_succeeds() {
    let server = start_server(test_config()).await;
    let token = server.login(ADMIN).await;

    server
        .device_client()
        .await
        .create_record(authed(create_request(), &token))
        .await
        .unwrap();

    assert_eq!(server.devices.len().unwrap(), 1);
}

#[tokio::test]
async fn token_signed_with_other_secret_is_unauthenticated() {
    let issuer = start_server(test_config()).await;
    let foreign_token = issuer.login(ADMIN).await;

    let server = start_server(ServerConfig::new("another-secret").with_password_cost(4)).await;
    let status = server
        .device_client()
        .await
        .create_record(authed(create_request(), &foreign_token))
        .await
        .unwrap_err();

    assert_eq!(status.code(), Code::Unauthenticated);
}

#[tokio::test]
async fn expired_token_is_unauthenticated() {
    let server =
        start_server(test_config().with_token_duration(Duration::from_secs(1))).await;
    let token = server.login(ADMIN).await;

    // Expiry has one-second resolution and zero leeway.
    tokio::time::sleep(Duration::from_millis(2100)).await;

    let status = server
        .device_client()
        .await
        .create_record(authed(create_request(), &token))
        .await
        .unwrap_err();
    assert_eq!(status.code(), Code::Unauthenticated);
}

#[tokio::test]
async fn methods_outside_the_table_need_no_token() {
    let server = start_server(test_config()).await;

    server
        .device_client()
        .await
        .search_records(SearchRecordsRequest {
            filter: Some(Filter::default()),
        })
        .await
        .unwrap();

    // Dropping CreateRecord from the table makes it public.
    let open = start_server(
        test_config().with_access_roles(AccessRoles::new().allow(methods::RATE_RECORD, &[Role::User])),
    )
    .await;
    open.device_client()
        .await
        .create_record(Request::new(create_request()))
        .await
        .unwrap();
    assert_eq!(open.devices.len().unwrap(), 1);
}

#[tokio::test]
async fn login_with_wrong_password_is_not_found() {
    let server = start_server(test_config()).await;

    let status = server
        .auth_client()
        .await
        .login(LoginRequest {
            username: ADMIN.0.into(),
            password: "wrong".into(),
        })
        .await
        .unwrap_err();
    assert_eq!(status.code(), Code::NotFound);

    let status = server
        .auth_client()
        .await
        .login(LoginRequest {
            username: "nobody".into(),
            password: "secret".into(),
        })
        .await
        .unwrap_err();
    assert_eq!(status.code(), Code::NotFound);
}
