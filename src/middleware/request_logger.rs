use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::{header::CONTENT_TYPE, Method},
    Error,
};
use chrono::{DateTime, TimeZone};
use futures::future::LocalBoxFuture;
use std::future::{ready, Ready};

use crate::api::metrics;

/// The three diagnostic lines written for each request.
fn request_lines<Tz>(method: &Method, content_type: Option<&str>, now: DateTime<Tz>) -> [String; 3]
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    [
        format!("Request Type: {}", method),
        format!("Content Type: {}", content_type.unwrap_or("none")),
        format!("Date: {}", now.to_rfc2822()),
    ]
}

/// Logs method, content type and date of every request before it reaches a
/// handler. Never rejects a request.
pub struct RequestLogger;

impl<S, B> Transform<S, ServiceRequest> for RequestLogger
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = RequestLoggerMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequestLoggerMiddleware { service }))
    }
}

pub struct RequestLoggerMiddleware<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for RequestLoggerMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let content_type = req.headers().get(CONTENT_TYPE).and_then(|v| v.to_str().ok());

        for line in request_lines(req.method(), content_type, chrono::Local::now()) {
            log::info!("{}", line);
        }

        metrics::increment_request_count();

        let fut = self.service.call(req);

        Box::pin(async move {
            let res = fut.await;

            match &res {
                Ok(r) if r.status().is_server_error() => metrics::increment_error_count(),
                Err(_) => metrics::increment_error_count(),
                _ => {}
            }

            res
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn logs_method_content_type_and_date() {
        let now = Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap();

        let lines = request_lines(&Method::POST, Some("application/json"), now);

        assert_eq!(lines[0], "Request Type: POST");
        assert_eq!(lines[1], "Content Type: application/json");
        assert_eq!(lines[2], "Date: Mon, 15 Jan 2024 10:30:00 +0000");
    }

    #[test]
    fn missing_content_type_is_logged_as_none() {
        let lines = request_lines(&Method::GET, None, Utc::now());

        assert_eq!(lines[0], "Request Type: GET");
        assert_eq!(lines[1], "Content Type: none");
        assert!(lines[2].starts_with("Date: "));
    }
}
