use tonic::transport::Channel;
use tower::Layer;
use tracing::{debug, info};

use super::error::ClientError;
use super::interceptor::{ClientAuth, ClientAuthInterceptor};
use crate::device::{Device, Filter};
use crate::service::grpc::{
    CreateRecordRequest, DeviceServiceClient, RateRecordRequest, RateRecordResponse,
    SearchRecordsRequest, UploadAttachmentRequest, UploadAttachmentResponse,
};

/// Bytes per upload chunk.
pub const CHUNK_SIZE: usize = 1024;

/// Convenience wrapper over the generated `DeviceService` client, with the
/// token layer applied.
#[derive(Clone)]
pub struct DeviceClient {
    service: DeviceServiceClient<ClientAuth<Channel>>,
}

impl DeviceClient {
    pub fn new(channel: Channel, auth: &ClientAuthInterceptor) -> Self {
        Self {
            service: DeviceServiceClient::new(auth.layer().layer(channel)),
        }
    }

    /// Create a device record; returns the stored id.
    pub async fn create_device(&mut self, device: Device) -> Result<String, ClientError> {
        let response = self
            .service
            .create_record(CreateRecordRequest {
                device: Some(device),
            })
            .await?;
        let id = response.into_inner().id;
        info!(%id, "created device");
        Ok(id)
    }

    /// Collect every device matching `filter`.
    pub async fn search_devices(&mut self, filter: Filter) -> Result<Vec<Device>, ClientError> {
        let mut stream = self
            .service
            .search_records(SearchRecordsRequest {
                filter: Some(filter),
            })
            .await?
            .into_inner();

        let mut found = Vec::new();
        while let Some(response) = stream.message().await? {
            let device = response
                .device
                .ok_or_else(|| ClientError::Protocol("search response without a device".into()))?;
            debug!(id = %device.id, "found device");
            found.push(device);
        }
        Ok(found)
    }

    /// Upload `data` for `device_id` in [`CHUNK_SIZE`] chunks.
    pub async fn upload_attachment(
        &mut self,
        device_id: &str,
        content_type: &str,
        data: &[u8],
    ) -> Result<UploadAttachmentResponse, ClientError> {
        let requests: Vec<_> = std::iter::once(UploadAttachmentRequest::info(device_id, content_type))
            .chain(data.chunks(CHUNK_SIZE).map(UploadAttachmentRequest::chunk))
            .collect();

        let response = self
            .service
            .upload_attachment(tokio_stream::iter(requests))
            .await?
            .into_inner();
        info!(id = %response.id, size = response.size, "uploaded attachment");
        Ok(response)
    }

    /// Send each `(device_id, score)` and collect the running aggregates.
    pub async fn rate_devices(
        &mut self,
        ratings: Vec<(String, f64)>,
    ) -> Result<Vec<RateRecordResponse>, ClientError> {
        let requests: Vec<_> = ratings
            .into_iter()
            .map(|(device_id, score)| RateRecordRequest { device_id, score })
            .collect();

        let mut stream = self
            .service
            .rate_record(tokio_stream::iter(requests))
            .await?
            .into_inner();

        let mut responses = Vec::new();
        while let Some(response) = stream.message().await? {
            debug!(
                device_id = %response.device_id,
                count = response.rated_count,
                average = response.average_score,
                "received rating"
            );
            responses.push(response);
        }
        Ok(responses)
    }
}
