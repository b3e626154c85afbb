//! HTTP API routing, independent of the server that carries it.
//!
//! | Method | Path            | Body                                                       |
//! |--------|-----------------|------------------------------------------------------------|
//! | GET    | `/api/data`     | –                                                          |
//! | GET    | `/api/status`   | – (alias of `/api/data`)                                   |
//! | POST   | `/api/pump`     | `{"pump":1\|2,"state":bool}`                               |
//! | POST   | `/api/auto`     | `{"enabled":bool}`                                         |
//! | POST   | `/api/settings` | `{"threshold","pump_duration","fert_duration","interval"}` |
//!
//! [`Router::dispatch`] turns one request into one [`ApiResponse`]; the
//! ESP-IDF server adapter only moves bytes in and out.

pub mod payload;

use serde::Serialize;

use crate::app::commands::AppCommand;
use crate::app::events::AppEvent;
use crate::app::ports::{ActuatorPort, EventSink};
use crate::app::service::RequestService;
use crate::config::MAX_REQUEST_BODY;
use crate::error::RequestError;

use payload::{Ack, AutoRequest, PumpRequest, Rejection, SettingsRequest, decode};

/// JSON content type for every API response.
pub const CONTENT_TYPE_JSON: &str = "application/json";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

/// Every route the router answers, for registration with a server.
pub const ROUTES: [(Method, &str); 5] = [
    (Method::Get, "/api/data"),
    (Method::Get, "/api/status"),
    (Method::Post, "/api/pump"),
    (Method::Post, "/api/auto"),
    (Method::Post, "/api/settings"),
];

/// A fully rendered response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub content_type: &'static str,
    pub body: String,
    /// Add `Access-Control-Allow-Origin: *`.
    pub allow_any_origin: bool,
}

impl ApiResponse {
    fn json<T: Serialize>(status: u16, value: &T) -> Self {
        match serde_json::to_string(value) {
            Ok(body) => Self {
                status,
                content_type: CONTENT_TYPE_JSON,
                body,
                allow_any_origin: false,
            },
            Err(_) => Self {
                status: 500,
                content_type: CONTENT_TYPE_JSON,
                body: String::from(r#"{"status":"error","reason":"encoding failed"}"#),
                allow_any_origin: false,
            },
        }
    }

    fn ok() -> Self {
        Self::json(200, &Ack::OK)
    }

    fn rejected(err: RequestError) -> Self {
        Self::json(status_code(err), &Rejection::from(err))
    }
}

/// HTTP status for a rejected request.
pub const fn status_code(err: RequestError) -> u16 {
    match err {
        RequestError::EmptyBody
        | RequestError::MalformedPayload
        | RequestError::UnknownPump(_) => 400,
        RequestError::BodyTooLarge => 413,
        RequestError::NotFound => 404,
        RequestError::Actuator(_) => 500,
    }
}

/// Routes API requests to a [`RequestService`].
pub struct Router<A> {
    service: RequestService<A>,
}

impl<A> Clone for Router<A> {
    fn clone(&self) -> Self {
        Self {
            service: self.service.clone(),
        }
    }
}

impl<A: ActuatorPort> Router<A> {
    pub fn new(service: RequestService<A>) -> Self {
        Self { service }
    }

    pub fn service(&self) -> &RequestService<A> {
        &self.service
    }

    /// Serve one request.  `path` may carry a query string, which is ignored.
    pub fn dispatch(
        &self,
        method: Method,
        path: &str,
        body: &[u8],
        sink: &mut impl EventSink,
    ) -> ApiResponse {
        let path = path.split('?').next().unwrap_or(path);

        let result = match (method, path) {
            (Method::Get, "/api/data" | "/api/status") => {
                let mut resp = ApiResponse::json(200, &self.service.status());
                resp.allow_any_origin = true;
                return resp;
            }
            (Method::Post, "/api/pump") => {
                Self::command(body, |b| decode::<PumpRequest>(b)?.into_command())
            }
            (Method::Post, "/api/auto") => {
                Self::command(body, |b| Ok(decode::<AutoRequest>(b)?.into_command()))
            }
            (Method::Post, "/api/settings") => {
                Self::command(body, |b| Ok(decode::<SettingsRequest>(b)?.into_command()))
            }
            _ => Err(RequestError::NotFound),
        };

        match result.and_then(|cmd| self.service.handle(cmd, sink)) {
            Ok(()) => ApiResponse::ok(),
            Err(e) => {
                sink.emit(&AppEvent::RequestRejected(e));
                ApiResponse::rejected(e)
            }
        }
    }

    fn command(
        body: &[u8],
        parse: impl FnOnce(&[u8]) -> Result<AppCommand, RequestError>,
    ) -> Result<AppCommand, RequestError> {
        if body.len() > MAX_REQUEST_BODY {
            return Err(RequestError::BodyTooLarge);
        }
        parse(body)
    }
}
