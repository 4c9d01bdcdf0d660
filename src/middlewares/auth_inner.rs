use std::rc::Rc;

use actix_web::body::EitherBody;
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse};
use actix_web::{web, Error, HttpMessage};
use futures_util::future::LocalBoxFuture;

use crate::domain::entities::users::Role;
use crate::domain::models::auth::AuthenticatedUser;
use crate::errors::AppError;
use crate::services::auth::TokenService;
use crate::state::AppState;

pub struct AuthMiddlewareService<S> {
    pub service: Rc<S>,
    pub required_role: Option<Role>,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, actix_web::Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let required_role = self.required_role;

        Box::pin(async move {
            let Some(state) = req.app_data::<web::Data<AppState>>().cloned() else {
                let err = AppError::InternalError("AppState is not registered".to_string());
                return Ok(req.error_response(err).map_into_right_body());
            };

            let user = match authenticate(&req, &state.tokens) {
                Ok(user) => user,
                Err(err) => {
                    log::warn!("Authentication failed for {}: {}", req.path(), err);
                    return Ok(req.error_response(err).map_into_right_body());
                }
            };

            if let Some(role) = required_role {
                if let Err(err) = state.users.require_role(&user.user_id, role).await {
                    return Ok(req.error_response(forbidden(err)).map_into_right_body());
                }
            }

            log::debug!("Authenticated user {}", user.user_id);
            req.extensions_mut().insert(user);

            let res = service.call(req).await?;
            Ok(res.map_into_left_body())
        })
    }
}

fn authenticate(req: &ServiceRequest, tokens: &TokenService) -> Result<AuthenticatedUser, AppError> {
    let auth_header = req
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| AppError::AuthenticationError("Authentication required".to_string()))?;

    let token = tokens.extract_bearer_token(auth_header)?;
    let claims = tokens.verify_token(token)?;

    Ok(AuthenticatedUser {
        user_id: claims.sub,
        email: claims.email,
    })
}

/// A token whose user is gone is treated as lacking the role.
fn forbidden(err: AppError) -> AppError {
    match err {
        AppError::NotFound(_) => AppError::AuthorizationError("Insufficient permissions".to_string()),
        other => other,
    }
}
