use crate::{
    config::AuthConfig,
    services::auth_service,
    state::AppState,
};
use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header::HeaderMap,
    web, Error, HttpMessage, HttpResponse,
};
use base64::Engine;
use futures::future::LocalBoxFuture;
use serde::Deserialize;
use std::future::{ready, Ready};

pub const PLATFORM_PRINCIPAL_HEADER: &str = "x-ms-client-principal";

/// Usuário autenticado, disponível nos handlers via `web::ReqData<Identity>`
#[derive(Debug, Clone, PartialEq)]
pub struct Identity {
    pub user_id: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlatformPrincipal {
    #[serde(default)]
    user_details: Option<String>,
}

pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("Authorization")?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

fn platform_identity(headers: &HeaderMap) -> Option<Identity> {
    let raw = headers.get(PLATFORM_PRINCIPAL_HEADER)?.to_str().ok()?;
    let decoded = base64::engine::general_purpose::STANDARD
        .decode(raw.trim())
        .map_err(|e| log::warn!("⚠️  Failed to decode platform principal: {}", e))
        .ok()?;
    let principal: PlatformPrincipal = serde_json::from_slice(&decoded)
        .map_err(|e| log::warn!("⚠️  Failed to parse platform principal: {}", e))
        .ok()?;

    let user_id = principal.user_details.filter(|u| !u.trim().is_empty())?;
    Some(Identity { user_id })
}

/// Bearer JWT primeiro; o principal da plataforma só quando habilitado
pub fn resolve_identity(headers: &HeaderMap, config: &AuthConfig) -> Option<Identity> {
    if let Some(token) = bearer_token(headers) {
        return match auth_service::verify_token(config, token) {
            Ok(claims) => Some(Identity { user_id: claims.sub }),
            Err(e) => {
                log::warn!("❌ {}", e);
                None
            }
        };
    }

    if config.trust_platform_principal {
        return platform_identity(headers);
    }

    None
}

/// 401 com corpo `[]`, o formato que o cliente de to-dos espera
fn unauthorized() -> HttpResponse {
    HttpResponse::Unauthorized().json(Vec::<String>::new())
}

pub struct AuthMiddleware;

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService { service }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let identity = req
            .app_data::<web::Data<AppState>>()
            .and_then(|state| resolve_identity(req.headers(), &state.auth));

        match identity {
            Some(identity) => {
                log::debug!("🔑 Request identified as '{}'", identity.user_id);
                req.extensions_mut().insert(identity);

                let fut = self.service.call(req);
                Box::pin(async move {
                    let res = fut.await?;
                    Ok(res.map_into_left_body())
                })
            }
            None => {
                log::warn!("❌ Unauthenticated request to {}", req.path());
                let res = req.into_response(unauthorized()).map_into_right_body();
                Box::pin(async move { Ok(res) })
            }
        }
    }
}
