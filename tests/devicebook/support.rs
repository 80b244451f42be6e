//! Shared harness: server startup, logins and sample devices.

use std::net::SocketAddr;
use std::sync::Arc;

use devicebook::auth::{seed_users, AUTHORIZATION_HEADER, InMemoryUserStore};
use devicebook::device::{Cpu, Keyboard, KeyboardLayout, Resolution, Screen, Storage, StorageDriver};
use devicebook::server::{self, ServerConfig, Stores};
use devicebook::service::grpc::{AuthServiceClient, DeviceServiceClient, LoginRequest};
use devicebook::store::{InMemoryAttachmentStore, InMemoryDeviceStore, InMemoryRatingStore};
use devicebook::{Device, Memory, MemoryUnit};
use tokio::net::TcpListener;
use tokio_stream::wrappers::TcpListenerStream;
use tonic::metadata::MetadataValue;
use tonic::transport::{Channel, Endpoint};
use tonic::Request;

pub const ADMIN: (&str, &str) = ("admin1", "secret_admin");
pub const USER: (&str, &str) = ("user1", "secret_user");

/// A running server plus handles on its concrete stores.
pub struct TestServer {
    pub addr: SocketAddr,
    pub devices: InMemoryDeviceStore,
    pub attachments: InMemoryAttachmentStore,
}

pub fn test_config() -> ServerConfig {
    ServerConfig::new("test-secret").with_password_cost(4)
}

/// Bind to port 0, spawn the server, and return its address and stores.
pub async fn start_server(config: ServerConfig) -> TestServer {
    let devices = InMemoryDeviceStore::new();
    let attachments = InMemoryAttachmentStore::new();
    let users = InMemoryUserStore::new();
    seed_users(&users, config.password_cost).unwrap();

    let stores = Stores {
        devices: Arc::new(devices.clone()),
        attachments: Arc::new(attachments.clone()),
        ratings: Arc::new(InMemoryRatingStore::new()),
        users: Arc::new(users),
    };

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let router = server::router(&config, &stores);
    tokio::spawn(async move {
        router
            .serve_with_incoming(TcpListenerStream::new(listener))
            .await
            .unwrap();
    });

    TestServer {
        addr,
        devices,
        attachments,
    }
}

impl TestServer {
    pub async fn channel(&self) -> Channel {
        Endpoint::from_shared(format!("http://{}", self.addr))
            .unwrap()
            .connect()
            .await
            .unwrap()
    }

    pub async fn device_client(&self) -> DeviceServiceClient<Channel> {
        DeviceServiceClient::new(self.channel().await)
    }

    pub async fn auth_client(&self) -> AuthServiceClient<Channel> {
        AuthServiceClient::new(self.channel().await)
    }

    pub async fn login(&self, (username, password): (&str, &str)) -> String {
        self.auth_client()
            .await
            .login(LoginRequest {
                username: username.into(),
                password: password.into(),
            })
            .await
            .unwrap()
            .into_inner()
            .access_token
    }
}

/// Wrap `message` in a request carrying `token`.
pub fn authed<T>(message: T, token: &str) -> Request<T> {
    let mut request = Request::new(message);
    request.metadata_mut().insert(
        AUTHORIZATION_HEADER,
        MetadataValue::try_from(token).unwrap(),
    );
    request
}

/// A laptop with the given search-relevant specs and no id.
pub fn laptop(price_usd: f64, cores: u32, min_ghz: f64, ram: Memory) -> Device {
    let mut storage = Storage {
        memory: Some(Memory::new(256, MemoryUnit::Gigabyte)),
        ..Default::default()
    };
    storage.set_driver(StorageDriver::Ssd);
    let mut keyboard = Keyboard {
        backlit: true,
        ..Default::default()
    };
    keyboard.set_layout(KeyboardLayout::Qwerty);

    Device {
        id: String::new(),
        brand: "Dell".into(),
        name: "XPS".into(),
        cpu: Some(Cpu {
            brand: "AMD".into(),
            name: "Ryzen 7".into(),
            cores,
            threads: cores * 2,
            min_ghz,
            max_ghz: min_ghz + 1.5,
        }),
        ram: Some(ram),
        gpus: Vec::new(),
        storages: vec![storage],
        screen: Some(Screen {
            size_inch: 13.3,
            resolution: Some(Resolution {
                width: 2560,
                height: 1600,
            }),
            ..Default::default()
        }),
        keyboard: Some(keyboard),
        weight_kg: 1.3,
        price_usd,
        release_year: 2023,
        updated_at: 1_700_000_000,
    }
}

pub fn sample_device() -> Device {
    laptop(1500.0, 8, 3.2, Memory::new(16, MemoryUnit::Gigabyte))
}
