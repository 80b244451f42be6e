use devicebook::service::grpc::CreateRecordRequest;
use devicebook::DeviceStore;
use tonic::Code;

use crate::support::{authed, sample_device, start_server, test_config, ADMIN};

#[tokio::test]
async fn create_without_id_assigns_uuid() {
    let server = start_server(test_config()).await;
    let token = server.login(ADMIN).await;
    let mut client = server.device_client().await;

    let id = client
        .create_record(authed(
            CreateRecordRequest {
                device: Some(sample_device()),
            },
            &token,
        ))
        .await
        .unwrap()
        .into_inner()
        .id;

    assert!(uuid::Uuid::parse_str(&id).is_ok());
    let stored = server.devices.find(&id).unwrap();
    assert_eq!(stored.brand, "Dell");
}

#[tokio::test]
async fn create_with_id_keeps_it() {
    let server = start_server(test_config()).await;
    let token = server.login(ADMIN).await;
    let mut client = server.device_client().await;

    let mut device = sample_device();
    device.id = "0f8fad5b-d9cb-469f-a165-70867728950e".into();

    let id = client
        .create_record(authed(
            CreateRecordRequest {
                device: Some(device.clone()),
            },
            &token,
        ))
        .await
        .unwrap()
        .into_inner()
        .id;

    assert_eq!(id, device.id);
    assert_eq!(server.devices.find(&id).unwrap(), device);
}

#[tokio::test]
async fn create_with_malformed_id_is_invalid_argument() {
    let server = start_server(test_config()).await;
    let token = server.login(ADMIN).await;
    let mut client = server.device_client().await;

    let mut device = sample_device();
    device.id = "not-a-uuid".into();

    let status = client
        .create_record(authed(
            CreateRecordRequest {
                device: Some(device),
            },
            &token,
        ))
        .await
        .unwrap_err();

    assert_eq!(status.code(), Code::InvalidArgument);
    assert!(server.devices.is_empty().unwrap());
}

#[tokio::test]
async fn create_duplicate_is_already_exists() {
    let server = start_server(test_config()).await;
    let token = server.login(ADMIN).await;
    let mut client = server.device_client().await;

    let mut first = sample_device();
    first.id = "5b6f3a2c-1d4e-4f5a-8b9c-0d1e2f3a4b5c".into();
    let mut second = first.clone();
    second.name = "Other".into();

    client
        .create_record(authed(
            CreateRecordRequest {
                device: Some(first.clone()),
            },
            &token,
        ))
        .await
        .unwrap();

    let status = client
        .create_record(authed(
            CreateRecordRequest {
                device: Some(second),
            },
            &token,
        ))
        .await
        .unwrap_err();

    assert_eq!(status.code(), Code::AlreadyExists);
    assert_eq!(server.devices.find(&first.id).unwrap().name, first.name);
}

#[tokio::test]
async fn create_without_device_is_invalid_argument() {
    let server = start_server(test_config()).await;
    let token = server.login(ADMIN).await;
    let mut client = server.device_client().await;

    let status = client
        .create_record(authed(CreateRecordRequest { device: None }, &token))
        .await
        .unwrap_err();

    assert_eq!(status.code(), Code::InvalidArgument);
}
