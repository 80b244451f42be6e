//! DeviceService handler: orchestrates the stores behind the four RPCs.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tokio_stream::{Stream, StreamExt};
use tonic::{Request, Response, Status, Streaming};
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::error::ServiceError;
use super::grpc::upload_attachment_request::Data;
use super::grpc::{
    CreateRecordRequest, CreateRecordResponse, DeviceService, RateRecordRequest,
    RateRecordResponse, SearchRecordsRequest, SearchRecordsResponse, UploadAttachmentRequest,
    UploadAttachmentResponse,
};
use crate::cancel::{CallContext, Interrupted};
use crate::store::{AttachmentStore, DeviceStore, RatingStore, StoreError};

/// Largest accepted attachment: 1 MiB.
pub const MAX_ATTACHMENT_SIZE: usize = 1 << 20;

/// Responses buffered per stream before the producer waits for the client.
const STREAM_BUFFER: usize = 16;

/// gRPC handler for `devicebook.DeviceService`.
///
/// Stores are shared trait objects, so the in-memory implementations can be
/// swapped for other backends or test doubles.
#[derive(Clone)]
pub struct DeviceServer {
    devices: Arc<dyn DeviceStore>,
    attachments: Arc<dyn AttachmentStore>,
    ratings: Arc<dyn RatingStore>,
}

impl DeviceServer {
    pub fn new(
        devices: Arc<dyn DeviceStore>,
        attachments: Arc<dyn AttachmentStore>,
        ratings: Arc<dyn RatingStore>,
    ) -> Self {
        Self {
            devices,
            attachments,
            ratings,
        }
    }
}

#[tonic::async_trait]
impl DeviceService for DeviceServer {
    async fn create_record(
        &self,
        request: Request<CreateRecordRequest>,
    ) -> Result<Response<CreateRecordResponse>, Status> {
        let ctx = CallContext::from_metadata(request.metadata());
        let mut device = request
            .into_inner()
            .device
            .ok_or_else(|| ServiceError::InvalidArgument("device is required".into()))?;
        info!(id = %device.id, "receive a create-record request");

        if device.id.is_empty() {
            device.id = Uuid::new_v4().to_string();
        } else {
            Uuid::parse_str(&device.id).map_err(|e| {
                ServiceError::InvalidArgument(format!("device id is invalid: {}", e))
            })?;
        }

        ctx.check().map_err(ServiceError::from)?;

        let devices = self.devices.clone();
        let record = device.clone();
        run_blocking(move || {
            devices
                .save(&record)
                .map_err(|e| ServiceError::from_store("cannot save device to store", e))
        })
        .await?;

        info!(id = %device.id, "device is saved to store");
        Ok(Response::new(CreateRecordResponse { id: device.id }))
    }

    type SearchRecordsStream = ReceiverStream<Result<SearchRecordsResponse, Status>>;

    async fn search_records(
        &self,
        request: Request<SearchRecordsRequest>,
    ) -> Result<Response<Self::SearchRecordsStream>, Status> {
        let ctx = CallContext::from_metadata(request.metadata());
        let filter = request.into_inner().filter.unwrap_or_default();
        info!(?filter, "receive a search-records request");

        let (tx, rx) = mpsc::channel(STREAM_BUFFER);

        // Cancel the scan as soon as the client drops the response stream.
        let watch_ctx = ctx.clone();
        let watch_tx = tx.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = watch_tx.closed() => watch_ctx.cancel(),
                _ = watch_ctx.token().cancelled() => {}
            }
        });

        let devices = self.devices.clone();
        tokio::task::spawn_blocking(move || {
            // Ends the watcher once the scan is over, closing the stream.
            let _done = ctx.token().clone().drop_guard();

            let result = devices.search(&filter, &ctx, &mut |device| {
                let id = device.id.clone();
                tx.blocking_send(Ok(SearchRecordsResponse {
                    device: Some(device),
                }))
                .map_err(|_| StoreError::Interrupted(Interrupted::Canceled))?;
                debug!(%id, "sent device to client");
                Ok(())
            });

            if let Err(err) = result {
                warn!(error = %err, "search aborted");
                let status: Status = ServiceError::from_store("cannot search devices", err).into();
                let _ = tx.blocking_send(Err(status));
            }
        });

        Ok(Response::new(ReceiverStream::new(rx)))
    }

    async fn upload_attachment(
        &self,
        request: Request<Streaming<UploadAttachmentRequest>>,
    ) -> Result<Response<UploadAttachmentResponse>, Status> {
        let ctx = CallContext::from_metadata(request.metadata());
        let mut stream = request.into_inner();
        let response = self.receive_attachment(&ctx, &mut stream).await?;
        Ok(Response::new(response))
    }

    type RateRecordStream = ReceiverStream<Result<RateRecordResponse, Status>>;

    async fn rate_record(
        &self,
        request: Request<Streaming<RateRecordRequest>>,
    ) -> Result<Response<Self::RateRecordStream>, Status> {
        let ctx = CallContext::from_metadata(request.metadata());
        let mut stream = request.into_inner();
        let (tx, rx) = mpsc::channel(STREAM_BUFFER);
        let server = self.clone();

        tokio::spawn(async move {
            if let Err(err) = server.rate_loop(&ctx, &mut stream, &tx).await {
                warn!(error = %err, "rating stream aborted");
                let _ = tx.send(Err(err.into())).await;
            }
        });

        Ok(Response::new(ReceiverStream::new(rx)))
    }
}

impl DeviceServer {
    /// Read the info message and the chunks that follow it, then store the
    /// attachment.
    async fn receive_attachment<S>(
        &self,
        ctx: &CallContext,
        stream: &mut S,
    ) -> Result<UploadAttachmentResponse, ServiceError>
    where
        S: Stream<Item = Result<UploadAttachmentRequest, Status>> + Unpin,
    {
        let info = match receive(ctx, stream, "cannot receive attachment info").await? {
            Some(UploadAttachmentRequest {
                data: Some(Data::Info(info)),
            }) => info,
            _ => {
                return Err(ServiceError::Unknown(
                    "first message must carry the attachment info".into(),
                ))
            }
        };
        info!(
            device_id = %info.device_id,
            content_type = %info.content_type,
            "receive an upload-attachment request"
        );

        let devices = self.devices.clone();
        let device_id = info.device_id.clone();
        run_blocking(move || match devices.find(&device_id) {
            Ok(_) => Ok(()),
            Err(StoreError::NotFound(_)) => Err(ServiceError::InvalidArgument(format!(
                "device {} is not found",
                device_id
            ))),
            Err(err) => Err(ServiceError::from_store("cannot find device", err)),
        })
        .await?;

        let mut data = Vec::new();
        loop {
            let request = match receive(ctx, stream, "cannot receive chunk data").await? {
                Some(request) => request,
                None => {
                    debug!(size = data.len(), "receive all attachment data");
                    break;
                }
            };

            let chunk = match request.data {
                Some(Data::ChunkData(chunk)) => chunk,
                Some(Data::Info(_)) => {
                    return Err(ServiceError::InvalidArgument(
                        "attachment info may only be sent first".into(),
                    ))
                }
                None => continue,
            };

            if data.len() + chunk.len() > MAX_ATTACHMENT_SIZE {
                warn!(
                    received = data.len() + chunk.len(),
                    limit = MAX_ATTACHMENT_SIZE,
                    "attachment is too large"
                );
                return Err(ServiceError::InvalidArgument(format!(
                    "attachment size exceeds {} bytes",
                    MAX_ATTACHMENT_SIZE
                )));
            }
            data.extend_from_slice(&chunk);
        }
        ctx.check()?;

        let size = data.len();
        let attachments = self.attachments.clone();
        let device_id = info.device_id.clone();
        let id = run_blocking(move || {
            attachments
                .save(&device_id, &info.content_type, data)
                .map_err(|e| ServiceError::from_store("cannot save attachment to store", e))
        })
        .await?;

        info!(%id, size, device_id = %info.device_id, "saved attachment");
        Ok(UploadAttachmentResponse {
            id,
            size: size as u32,
        })
    }

    /// One response per rating, in request order, until the client closes
    /// its side.
    async fn rate_loop<S>(
        &self,
        ctx: &CallContext,
        stream: &mut S,
        tx: &mpsc::Sender<Result<RateRecordResponse, Status>>,
    ) -> Result<(), ServiceError>
    where
        S: Stream<Item = Result<RateRecordRequest, Status>> + Unpin,
    {
        loop {
            if tx.is_closed() {
                ctx.cancel();
            }

            let request = match receive(ctx, stream, "cannot receive rating").await? {
                Some(request) => request,
                None => {
                    debug!("receive all ratings");
                    return Ok(());
                }
            };
            debug!(device_id = %request.device_id, score = request.score, "receive a rating");

            let devices = self.devices.clone();
            let ratings = self.ratings.clone();
            let device_id = request.device_id.clone();
            let rating = run_blocking(move || {
                devices
                    .find(&device_id)
                    .map_err(|e| ServiceError::from_store("cannot find device", e))?;
                ratings
                    .add(&device_id, request.score)
                    .map_err(|e| ServiceError::from_store("cannot add rating", e))
            })
            .await?;

            let response = RateRecordResponse {
                device_id: request.device_id,
                rated_count: rating.count,
                average_score: rating.average(),
            };
            tokio::select! {
                biased;
                reason = ctx.interrupted() => return Err(reason.into()),
                sent = tx.send(Ok(response)) => sent.map_err(|_| {
                    ServiceError::Unknown("cannot send response to client".into())
                })?,
            }
        }
    }
}

/// Next message from a client stream, or the reason the call stopped while
/// waiting for it.
async fn receive<S, T>(
    ctx: &CallContext,
    stream: &mut S,
    context: &str,
) -> Result<Option<T>, ServiceError>
where
    S: Stream<Item = Result<T, Status>> + Unpin,
{
    tokio::select! {
        biased;
        reason = ctx.interrupted() => Err(reason.into()),
        message = stream.next() => match message {
            Some(Ok(message)) => Ok(Some(message)),
            Some(Err(status)) => {
                warn!(error = %status, "{}", context);
                Err(ServiceError::Unknown(format!("{}: {}", context, status.message())))
            }
            None => Ok(None),
        },
    }
}

/// Run a synchronous store call on the blocking pool.
async fn run_blocking<F, T>(f: F) -> Result<T, ServiceError>
where
    F: FnOnce() -> Result<T, ServiceError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| ServiceError::Internal(format!("store task failed: {}", e)))?
}
