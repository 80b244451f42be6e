use tonic_build::manual::{Builder, Method, Service};

fn method(name: &str, route: &str, input: &str, output: &str) -> tonic_build::manual::MethodBuilder {
    Method::builder()
        .name(name)
        .route_name(route)
        .input_type(format!("crate::service::grpc::{}", input))
        .output_type(format!("crate::service::grpc::{}", output))
        .codec_path("tonic::codec::ProstCodec")
}

fn main() {
    // Messages are hand-written prost structs (src/service/grpc.rs); only the
    // service traits, servers and clients are generated here.
    let device_service = Service::builder()
        .name("DeviceService")
        .package("devicebook")
        .method(
            method(
                "create_record",
                "CreateRecord",
                "CreateRecordRequest",
                "CreateRecordResponse",
            )
            .build(),
        )
        .method(
            method(
                "search_records",
                "SearchRecords",
                "SearchRecordsRequest",
                "SearchRecordsResponse",
            )
            .server_streaming()
            .build(),
        )
        .method(
            method(
                "upload_attachment",
                "UploadAttachment",
                "UploadAttachmentRequest",
                "UploadAttachmentResponse",
            )
            .client_streaming()
            .build(),
        )
        .method(
            method(
                "rate_record",
                "RateRecord",
                "RateRecordRequest",
                "RateRecordResponse",
            )
            .client_streaming()
            .server_streaming()
            .build(),
        )
        .build();

    let auth_service = Service::builder()
        .name("AuthService")
        .package("devicebook")
        .method(method("login", "Login", "LoginRequest", "LoginResponse").build())
        .build();

    Builder::new().compile(&[device_service, auth_service]);
}
