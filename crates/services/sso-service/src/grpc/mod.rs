//! gRPC transport boundary.

mod auth_grpc;

pub use auth_grpc::AuthGrpcService;
