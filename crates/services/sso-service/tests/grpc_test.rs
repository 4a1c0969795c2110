//! End-to-end tests through a live gRPC server backed by the memory store.

use std::sync::Arc;

use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tonic::transport::Channel;
use tonic::Code;

use common::BoxError;
use domain::App;
use proto::sso::{IsAdminRequest, SignInRequest, SignUpRequest};
use proto::AuthClient;
use sso_service_lib::config::SsoConfig;
use sso_service_lib::storage::MemoryStore;
use sso_service_lib::token::Claims;

const APP_ID: i32 = 1;
const APP_SECRET: &str = "test-secret";

struct Suite {
    client: AuthClient<Channel>,
    stop: Option<oneshot::Sender<()>>,
    server: Option<JoinHandle<Result<(), BoxError>>>,
}

impl Suite {
    async fn start() -> Self {
        let storage = MemoryStore::with_apps([App {
            id: APP_ID,
            name: "test".to_string(),
            secret: APP_SECRET.to_string(),
        }]);
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (stop, stopped) = oneshot::channel::<()>();

        let server = tokio::spawn(async move {
            let config = SsoConfig::default();
            sso_service_lib::serve(listener, Arc::new(storage), &config, async {
                let _ = stopped.await;
            })
            .await
        });

        let client = AuthClient::connect(format!("http://{}", addr)).await.unwrap();

        Self {
            client,
            stop: Some(stop),
            server: Some(server),
        }
    }

    async fn shutdown(mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
        if let Some(server) = self.server.take() {
            server.await.unwrap().unwrap();
        }
    }

    async fn sign_up(&mut self, name: &str, email: &str, password: &str, is_admin: bool) -> i64 {
        self.client
            .sign_up(SignUpRequest {
                name: name.to_string(),
                email: email.to_string(),
                password: password.to_string(),
                is_admin,
            })
            .await
            .unwrap()
            .into_inner()
            .user_id
    }
}

#[tokio::test]
async fn test_sign_up_sign_in_is_admin_happy_path() {
    let mut suite = Suite::start().await;

    for (i, is_admin) in [true, false].into_iter().enumerate() {
        let email = format!("user{}@example.com", i);
        let user_id = suite.sign_up("user", &email, "P@ssw0rd-123", is_admin).await;
        assert_ne!(user_id, 0);

        let token = suite
            .client
            .sign_in(SignInRequest {
                email: email.clone(),
                password: "P@ssw0rd-123".to_string(),
                app_id: APP_ID,
            })
            .await
            .unwrap()
            .into_inner()
            .token;

        let claims = decode::<Claims>(
            &token,
            &DecodingKey::from_secret(APP_SECRET.as_bytes()),
            &Validation::new(Algorithm::HS256),
        )
        .unwrap()
        .claims;
        assert_eq!(claims.uid, user_id);
        assert_eq!(claims.email, email);
        assert_eq!(claims.app_id, APP_ID);

        let response = suite
            .client
            .is_admin(IsAdminRequest { user_id })
            .await
            .unwrap()
            .into_inner();
        assert_eq!(response.is_admin, is_admin);
    }

    suite.shutdown().await;
}

#[tokio::test]
async fn test_duplicate_sign_up() {
    let mut suite = Suite::start().await;
    suite.sign_up("alice", "alice@example.com", "Sup3rSecr3t!", false).await;

    let status = suite
        .client
        .sign_up(SignUpRequest {
            name: "alice".to_string(),
            email: "alice@example.com".to_string(),
            password: "Sup3rSecr3t!".to_string(),
            is_admin: false,
        })
        .await
        .unwrap_err();

    assert_eq!(status.code(), Code::AlreadyExists);
    assert_eq!(status.message(), "user already exists");

    suite.shutdown().await;
}

#[tokio::test]
async fn test_sign_in_fail_cases() {
    let mut suite = Suite::start().await;
    suite.sign_up("alice", "alice@example.com", "Sup3rSecr3t!", false).await;

    let cases = [
        ("alice@example.com", "", APP_ID, "password is required"),
        ("", "Sup3rSecr3t!", APP_ID, "email is required"),
        ("alice@example.com", "Sup3rSecr3t!", 0, "app_id is required"),
        ("alice@example.com", "wrong-password", APP_ID, "user not found"),
        ("bob@example.com", "Sup3rSecr3t!", APP_ID, "user not found"),
        ("alice@example.com", "Sup3rSecr3t!", 77, "app not found"),
    ];

    for (email, password, app_id, message) in cases {
        let status = suite
            .client
            .sign_in(SignInRequest {
                email: email.to_string(),
                password: password.to_string(),
                app_id,
            })
            .await
            .unwrap_err();

        assert_eq!(status.code(), Code::InvalidArgument, "case: {}", message);
        assert_eq!(status.message(), message);
    }

    suite.shutdown().await;
}

#[tokio::test]
async fn test_is_admin_fail_cases() {
    let mut suite = Suite::start().await;

    let status = suite
        .client
        .is_admin(IsAdminRequest { user_id: 0 })
        .await
        .unwrap_err();
    assert_eq!(status.code(), Code::InvalidArgument);
    assert_eq!(status.message(), "user id is required");

    let status = suite
        .client
        .is_admin(IsAdminRequest { user_id: 12345 })
        .await
        .unwrap_err();
    assert_eq!(status.code(), Code::NotFound);
    assert_eq!(status.message(), "user not found");

    suite.shutdown().await;
}
