use std::sync::Arc;

use actix_web::dev::{forward_ready, ServiceRequest, ServiceResponse, Transform};
use actix_web::web::Data;
use actix_web::{Error, HttpMessage};
use futures::future::{ready, LocalBoxFuture, Ready};

use crate::utils::token_utils::verify_jwt;

/// Verifies the bearer token and stashes the decoded `Claims` in the request
/// extensions. Requests without a valid token pass through anonymously;
/// handlers that need an identity reject them via the `Claims` extractor.
pub struct AuthMiddleware;

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: actix_web::dev::Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>
        + 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service: Arc::new(service),
        }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: Arc<S>,
}

impl<S, B> actix_web::dev::Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: actix_web::dev::Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>
        + 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let secret = req.app_data::<Data<Vec<u8>>>().cloned();

        Box::pin(async move {
            let auth_header = req
                .headers()
                .get("Authorization")
                .and_then(|h| h.to_str().ok())
                .unwrap_or("");

            let token_value = auth_header.strip_prefix("Bearer ").unwrap_or("");

            if !token_value.is_empty() {
                if let Some(secret) = secret {
                    if let Some(claims) = verify_jwt(token_value, &secret) {
                        req.extensions_mut().insert(claims);
                    }
                }
            }

            service.call(req).await
        })
    }
}
