//! Request span plus one `request_completed` event per request.
//!
//! The span carries the trace id and the matched route template rather than
//! the raw path, so activation tokens in `/api/accounts/activate/{token}` never
//! reach the logs. Wire it inside `RequestTrace`:
//!
//! App::new()
//!     .wrap(AccessLog)
//!     .wrap(RequestTrace)

use std::future::{ready, Ready};
use std::time::Instant;

use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::StatusCode;
use actix_web::{Error as ActixError, HttpMessage};
use futures_util::future::LocalBoxFuture;
use tracing::{error, info, info_span, warn, Instrument};

use super::request_trace::TraceId;
use crate::logging::pii::Redacted;

const UNMATCHED_ROUTE: &str = "<unmatched>";

pub struct AccessLog;

impl<S, B> Transform<S, ServiceRequest> for AccessLog
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = ActixError> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = ActixError;
    type InitError = ();
    type Transform = AccessLogMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AccessLogMiddleware { service }))
    }
}

pub struct AccessLogMiddleware<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for AccessLogMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = ActixError> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = ActixError;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let start = Instant::now();
        let method = req.method().to_string();
        let route = req
            .match_pattern()
            .unwrap_or_else(|| UNMATCHED_ROUTE.to_owned());
        let query = Redacted(req.query_string()).to_string();
        let trace_id = req
            .extensions()
            .get::<TraceId>()
            .map(|t| t.0.clone())
            .unwrap_or_else(|| "missing-trace-id".to_owned());

        let span = info_span!(
            "request",
            trace_id = %trace_id,
            http.method = %method,
            http.route = %route
        );

        let fut = self.service.call(req);

        Box::pin(
            async move {
                let result = fut.await;
                let status = match &result {
                    Ok(res) => res.status(),
                    Err(err) => err.as_response_error().status_code(),
                };
                log_completion(status, &query, start.elapsed().as_micros() as u64);
                result
            }
            .instrument(span),
        )
    }
}

fn log_completion(status: StatusCode, query: &str, duration_us: u64) {
    let status_code = status.as_u16();
    if status.is_server_error() {
        error!(http.status_code = status_code, url.query = %query, duration_us, "request_completed");
    } else if status.is_client_error() {
        warn!(http.status_code = status_code, url.query = %query, duration_us, "request_completed");
    } else {
        info!(http.status_code = status_code, url.query = %query, duration_us, "request_completed");
    }
}
