//! # Error Envelope
//!
//! Rewrites every 4xx/5xx response into
//! [`ErrorBody`](crate::errors::ErrorBody) `{ statusCode, method, path, timestamp, message }`,
//! whether it came from an [`AppError`], an extractor rejection, the rate limiter or an
//! unmatched route. 5xx bodies always carry the generic message; the detail is logged.
//!
//! ```rust,ignore
//! App::new()
//!     .wrap(error_envelope())
//!     .configure(|cfg| configure_all_routes(cfg, &prefix))
//! ```

use actix_web::dev::ServiceResponse;
use actix_web::http::header::{CONTENT_LENGTH, CONTENT_TYPE};
use actix_web::middleware::{ErrorHandlerResponse, ErrorHandlers};
use actix_web::{HttpResponse, Result};

use crate::errors::{AppError, ErrorBody};

/// Middleware applying [`render_error_envelope`] to every error status.
pub fn error_envelope<B: 'static>() -> ErrorHandlers<B> {
    ErrorHandlers::new().default_handler(render_error_envelope)
}

pub fn render_error_envelope<B>(res: ServiceResponse<B>) -> Result<ErrorHandlerResponse<B>> {
    let status = res.status();
    let message = res
        .response()
        .error()
        .map(error_message)
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("Error").to_string());

    if status.is_server_error() {
        log::error!(
            "{} {} failed with {}: {}",
            res.request().method(),
            res.request().path(),
            status.as_u16(),
            message
        );
    }

    let body = ErrorBody::new(
        status,
        res.request().method().as_str(),
        res.request().path(),
        message,
    );

    let (req, original) = res.into_parts();
    let mut response = HttpResponse::build(status).json(body);
    for (name, value) in original.headers() {
        if name != CONTENT_TYPE && name != CONTENT_LENGTH {
            response.headers_mut().append(name.clone(), value.clone());
        }
    }

    Ok(ErrorHandlerResponse::Response(
        ServiceResponse::new(req, response).map_into_right_body(),
    ))
}

fn error_message(error: &actix_web::Error) -> String {
    match error.as_error::<AppError>() {
        Some(app_error) => app_error.client_message(),
        None => error.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::INTERNAL_ERROR_MESSAGE;
    use actix_web::http::StatusCode;
    use actix_web::{get, test, web, App};
    use serde_json::Value;

    #[get("/missing")]
    async fn missing() -> Result<HttpResponse, AppError> {
        Err(AppError::NotFound("Course 42 not found".to_string()))
    }

    #[get("/broken")]
    async fn broken() -> Result<HttpResponse, AppError> {
        Err(AppError::DatabaseError("connection reset by 10.0.0.7".to_string()))
    }

    #[derive(serde::Deserialize)]
    struct Body {
        #[allow(dead_code)]
        email: String,
    }

    async fn echo(_body: web::Json<Body>) -> HttpResponse {
        HttpResponse::Ok().finish()
    }

    macro_rules! init_app {
        () => {
            test::init_service(
                App::new()
                    .wrap(error_envelope())
                    .service(missing)
                    .service(broken)
                    .route("/echo", web::post().to(echo)),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn test_app_error_is_wrapped() {
        let app = init_app!();
        let req = test::TestRequest::get().uri("/missing").to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);

        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["statusCode"], 404);
        assert_eq!(body["method"], "GET");
        assert_eq!(body["path"], "/missing");
        assert_eq!(body["message"], "Course 42 not found");
        assert!(body["timestamp"].is_string());
    }

    #[actix_web::test]
    async fn test_server_errors_hide_detail() {
        let app = init_app!();
        let req = test::TestRequest::get().uri("/broken").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["statusCode"], 500);
        assert_eq!(body["message"], INTERNAL_ERROR_MESSAGE);
    }

    #[actix_web::test]
    async fn test_extractor_and_routing_errors_are_wrapped() {
        let app = init_app!();
        let req = test::TestRequest::post()
            .uri("/echo")
            .set_json(serde_json::json!({ "name": "no email" }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["statusCode"], 400);
        assert_eq!(body["path"], "/echo");

        let req = test::TestRequest::get().uri("/nowhere").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["statusCode"], 404);
        assert_eq!(body["message"], "Not Found");
    }
}
