//! End-to-end through the client wrappers: login, token layer, DeviceClient.

use std::time::Duration;

use devicebook::client::{AuthClient, ClientAuthInterceptor, ClientError, DeviceClient};
use devicebook::service::grpc::methods;
use devicebook::{Filter, Memory, MemoryUnit};
use tonic::Code;

use crate::support::{sample_device, start_server, test_config, ADMIN, USER};

const PROTECTED: [&str; 3] = [
    methods::CREATE_RECORD,
    methods::UPLOAD_ATTACHMENT,
    methods::RATE_RECORD,
];

#[tokio::test]
async fn admin_client_runs_every_call() {
    let server = start_server(test_config()).await;
    let channel = server.channel().await;

    let login = AuthClient::new(channel.clone(), ADMIN.0, ADMIN.1);
    let auth = ClientAuthInterceptor::start(login, PROTECTED, Duration::from_secs(30))
        .await
        .unwrap();
    let mut client = DeviceClient::new(channel, &auth);

    let id = client.create_device(sample_device()).await.unwrap();

    let found = client
        .search_devices(Filter {
            max_price_usd: 2000.0,
            min_cpu_cores: 4,
            min_cpu_ghz: 2.0,
            min_ram: Some(Memory::new(8, MemoryUnit::Gigabyte)),
        })
        .await
        .unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, id);

    let data: Vec<u8> = (0..5000u32).map(|i| (i % 251) as u8).collect();
    let uploaded = client.upload_attachment(&id, ".png", &data).await.unwrap();
    assert_eq!(uploaded.size, 5000);
    assert_eq!(
        server.attachments.content(&uploaded.id).unwrap().unwrap(),
        data
    );

    let rated = client
        .rate_devices(vec![(id.clone(), 4.0), (id.clone(), 2.0)])
        .await
        .unwrap();
    let counts: Vec<_> = rated.iter().map(|r| r.rated_count).collect();
    assert_eq!(counts, vec![1, 2]);
    assert!((rated[1].average_score - 3.0).abs() < 1e-9);
}

#[tokio::test]
async fn user_client_is_denied_admin_calls() {
    let server = start_server(test_config()).await;
    let channel = server.channel().await;

    let login = AuthClient::new(channel.clone(), USER.0, USER.1);
    let auth = ClientAuthInterceptor::start(login, PROTECTED, Duration::from_secs(30))
        .await
        .unwrap();
    let mut client = DeviceClient::new(channel, &auth);

    let err = client.create_device(sample_device()).await.unwrap_err();
    assert_eq!(err.code(), Some(Code::PermissionDenied));
}

#[tokio::test]
async fn interceptor_refuses_to_start_with_bad_credentials() {
    let server = start_server(test_config()).await;
    let channel = server.channel().await;

    let login = AuthClient::new(channel, ADMIN.0, "wrong");
    let result = ClientAuthInterceptor::start(login, PROTECTED, Duration::from_secs(30)).await;

    match result {
        Err(ClientError::Rpc(status)) => assert_eq!(status.code(), Code::NotFound),
        Err(other) => panic!("unexpected error: {}", other),
        Ok(_) => panic!("interceptor started without a token"),
    }
}

#[tokio::test]
async fn refreshed_token_keeps_calls_authorized() {
    let server =
        start_server(test_config().with_token_duration(Duration::from_secs(2))).await;
    let channel = server.channel().await;

    let login = AuthClient::new(channel.clone(), ADMIN.0, ADMIN.1);
    let auth = ClientAuthInterceptor::start(login, PROTECTED, Duration::from_millis(500))
        .await
        .unwrap();
    let first = auth.token();
    let mut client = DeviceClient::new(channel, &auth);

    // Past the first token's expiry; the refresh loop has replaced it.
    tokio::time::sleep(Duration::from_millis(3500)).await;
    assert_ne!(auth.token(), first);

    client.create_device(sample_device()).await.unwrap();
    assert_eq!(server.devices.len().unwrap(), 1);
}
