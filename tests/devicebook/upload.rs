use devicebook::service::grpc::{UploadAttachmentRequest, UploadAttachmentResponse};
use devicebook::service::MAX_ATTACHMENT_SIZE;
use devicebook::store::AttachmentStore;
use devicebook::DeviceStore;
use tonic::{Code, Status};

use crate::support::{authed, sample_device, start_server, test_config, TestServer, ADMIN};

const DEVICE_ID: &str = "9a1c2b3d-4e5f-4a6b-8c7d-1e2f3a4b5c6d";

async fn server_with_device() -> (TestServer, String) {
    let server = start_server(test_config()).await;
    let mut device = sample_device();
    device.id = DEVICE_ID.into();
    server.devices.save(&device).unwrap();
    let token = server.login(ADMIN).await;
    (server, token)
}

async fn upload(
    server: &TestServer,
    token: &str,
    device_id: &str,
    size: usize,
) -> Result<UploadAttachmentResponse, Status> {
    let data = vec![7u8; size];
    let requests: Vec<_> = std::iter::once(UploadAttachmentRequest::info(device_id, ".jpg"))
        .chain(data.chunks(1024).map(UploadAttachmentRequest::chunk))
        .collect();

    server
        .device_client()
        .await
        .upload_attachment(authed(tokio_stream::iter(requests), token))
        .await
        .map(|r| r.into_inner())
}

#[tokio::test]
async fn upload_exactly_the_cap_succeeds() {
    let (server, token) = server_with_device().await;

    let response = upload(&server, &token, DEVICE_ID, MAX_ATTACHMENT_SIZE)
        .await
        .unwrap();

    assert_eq!(response.size as usize, MAX_ATTACHMENT_SIZE);
    let record = server.attachments.find(&response.id).unwrap().unwrap();
    assert_eq!(record.device_id, DEVICE_ID);
    assert_eq!(record.content_type, ".jpg");
    assert_eq!(
        server.attachments.content(&response.id).unwrap().unwrap().len(),
        MAX_ATTACHMENT_SIZE
    );
}

#[tokio::test]
async fn upload_over_the_cap_is_rejected_and_not_stored() {
    let (server, token) = server_with_device().await;

    let status = upload(&server, &token, DEVICE_ID, MAX_ATTACHMENT_SIZE + 1)
        .await
        .unwrap_err();

    assert_eq!(status.code(), Code::InvalidArgument);
    assert!(server.attachments.is_empty().unwrap());
}

#[tokio::test]
async fn upload_for_unknown_device_is_invalid_argument() {
    let (server, token) = server_with_device().await;

    let status = upload(&server, &token, "3f2e1d0c-0000-4000-8000-000000000000", 10)
        .await
        .unwrap_err();

    assert_eq!(status.code(), Code::InvalidArgument);
    assert!(server.attachments.is_empty().unwrap());
}

#[tokio::test]
async fn upload_must_start_with_info() {
    let (server, token) = server_with_device().await;

    let requests = vec![UploadAttachmentRequest::chunk(vec![1, 2, 3])];
    let status = server
        .device_client()
        .await
        .upload_attachment(authed(tokio_stream::iter(requests), &token))
        .await
        .unwrap_err();

    assert_eq!(status.code(), Code::Unknown);
}
