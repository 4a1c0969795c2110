//! gRPC implementation of the SSO `Auth` service.
//!
//! Requests are checked for required fields here, before the credential
//! service sees them; core errors map to status codes via `AppError`.

use std::sync::Arc;

use tonic::{Request, Response, Status};

use crate::service::AuthService;
use common::AppError;
use proto::sso::{
    auth_server::Auth, IsAdminRequest, IsAdminResponse, SignInRequest, SignInResponse,
    SignUpRequest, SignUpResponse,
};

/// gRPC service wrapper for AuthService.
pub struct AuthGrpcService {
    service: Arc<dyn AuthService>,
}

impl AuthGrpcService {
    /// Create a new gRPC service wrapper.
    pub fn new(service: Arc<dyn AuthService>) -> Self {
        Self { service }
    }
}

#[tonic::async_trait]
impl Auth for AuthGrpcService {
    async fn sign_up(
        &self,
        request: Request<SignUpRequest>,
    ) -> Result<Response<SignUpResponse>, Status> {
        let req = request.into_inner();
        validate_sign_up(&req)?;

        let user_id = self
            .service
            .sign_up(req.name, req.email, req.password, req.is_admin)
            .await
            .map_err(Status::from)?;

        Ok(Response::new(SignUpResponse { user_id }))
    }

    async fn sign_in(
        &self,
        request: Request<SignInRequest>,
    ) -> Result<Response<SignInResponse>, Status> {
        let req = request.into_inner();
        validate_sign_in(&req)?;

        let token = self
            .service
            .sign_in(req.email, req.password, req.app_id)
            .await
            .map_err(Status::from)?;

        Ok(Response::new(SignInResponse { token }))
    }

    async fn is_admin(
        &self,
        request: Request<IsAdminRequest>,
    ) -> Result<Response<IsAdminResponse>, Status> {
        let req = request.into_inner();
        validate_is_admin(&req)?;

        let is_admin = self
            .service
            .is_admin(req.user_id)
            .await
            .map_err(Status::from)?;

        Ok(Response::new(IsAdminResponse { is_admin }))
    }
}

fn required(value: &str, field: &str) -> Result<(), Status> {
    if value.is_empty() {
        return Err(AppError::validation(format!("{} is required", field)).into());
    }
    Ok(())
}

fn validate_sign_up(req: &SignUpRequest) -> Result<(), Status> {
    required(&req.email, "email")?;
    required(&req.password, "password")?;
    required(&req.name, "name")
}

fn validate_sign_in(req: &SignInRequest) -> Result<(), Status> {
    required(&req.email, "email")?;
    required(&req.password, "password")?;
    if req.app_id == 0 {
        return Err(AppError::validation("app_id is required").into());
    }
    Ok(())
}

fn validate_is_admin(req: &IsAdminRequest) -> Result<(), Status> {
    if req.user_id == 0 {
        return Err(AppError::validation("user id is required").into());
    }
    Ok(())
}
