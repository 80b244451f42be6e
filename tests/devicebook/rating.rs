use devicebook::service::grpc::RateRecordRequest;
use devicebook::DeviceStore;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tonic::Code;

use crate::support::{authed, sample_device, start_server, test_config, USER};

const DEVICE_ID: &str = "c0ffee00-1234-4abc-9def-0123456789ab";

#[tokio::test]
async fn each_rating_answers_with_running_count_and_average() {
    let server = start_server(test_config()).await;
    let mut device = sample_device();
    device.id = DEVICE_ID.into();
    server.devices.save(&device).unwrap();
    let token = server.login(USER).await;

    let (tx, rx) = mpsc::channel(4);
    let mut responses = server
        .device_client()
        .await
        .rate_record(authed(ReceiverStream::new(rx), &token))
        .await
        .unwrap()
        .into_inner();

    // One request, one response, before the next request goes out.
    let scores = [8.0, 5.0, 2.0];
    let mut sum = 0.0;
    for (i, score) in scores.into_iter().enumerate() {
        tx.send(RateRecordRequest {
            device_id: DEVICE_ID.into(),
            score,
        })
        .await
        .unwrap();
        sum += score;

        let response = responses.message().await.unwrap().unwrap();
        let count = i as u32 + 1;
        assert_eq!(response.device_id, DEVICE_ID);
        assert_eq!(response.rated_count, count);
        assert!((response.average_score - sum / count as f64).abs() < 1e-9);
    }

    drop(tx);
    assert!(responses.message().await.unwrap().is_none());
}

#[tokio::test]
async fn rating_unknown_device_is_not_found() {
    let server = start_server(test_config()).await;
    let token = server.login(USER).await;

    let requests = vec![RateRecordRequest {
        device_id: "ffffffff-ffff-4fff-8fff-ffffffffffff".into(),
        score: 5.0,
    }];
    let mut responses = server
        .device_client()
        .await
        .rate_record(authed(tokio_stream::iter(requests), &token))
        .await
        .unwrap()
        .into_inner();

    let status = responses.message().await.unwrap_err();
    assert_eq!(status.code(), Code::NotFound);
}
