//! ESP-IDF HTTP server adapter.
//!
//! Registers every [`api::ROUTES`](crate::api::ROUTES) entry on an
//! [`EspHttpServer`] and forwards each request to the shared
//! [`Router`].  The handlers only move bytes: body in, rendered
//! [`ApiResponse`] out.

use embedded_svc::http::Method as HttpMethod;
use embedded_svc::io::{Read, Write};
use esp_idf_svc::http::server::{Configuration, EspHttpConnection, EspHttpServer, Request};
use log::info;

use crate::adapters::log_sink::LogEventSink;
use crate::api::{ApiResponse, Method, ROUTES, Router};
use crate::app::ports::ActuatorPort;
use crate::config::MAX_REQUEST_BODY;

/// One byte past the accepted size, so the router can tell "exactly at
/// the limit" from "over it".
const BODY_CAPACITY: usize = MAX_REQUEST_BODY + 1;

type Body = heapless::Vec<u8, BODY_CAPACITY>;

/// Start the server and register the API.  The returned handle must be
/// kept alive for the server to keep running.
pub fn start<A>(router: Router<A>) -> anyhow::Result<EspHttpServer<'static>>
where
    A: ActuatorPort + Send + 'static,
{
    let cfg = Configuration {
        stack_size: 8 * 1024,
        ..Default::default()
    };
    let mut server = EspHttpServer::new(&cfg)?;

    for (method, path) in ROUTES {
        let router = router.clone();
        let http_method = match method {
            Method::Get => HttpMethod::Get,
            Method::Post => HttpMethod::Post,
        };
        server.fn_handler(path, http_method, move |mut req| -> anyhow::Result<()> {
            let body = match method {
                Method::Get => Body::new(),
                Method::Post => read_body(&mut req)?,
            };
            let resp = router.dispatch(method, path, &body, &mut LogEventSink::new());
            write_response(req, &resp)
        })?;
    }

    info!("HTTP server started ({} routes)", ROUTES.len());
    Ok(server)
}

/// Read at most [`BODY_CAPACITY`] bytes of the request body.
fn read_body(req: &mut Request<&mut EspHttpConnection>) -> anyhow::Result<Body> {
    let mut body = Body::new();
    let mut chunk = [0u8; 64];
    loop {
        let n = req.read(&mut chunk)?;
        if n == 0 {
            break;
        }
        let take = n.min(body.capacity() - body.len());
        body.extend_from_slice(&chunk[..take])
            .map_err(|_| anyhow::anyhow!("request body buffer overflow"))?;
        if take < n {
            break;
        }
    }
    Ok(body)
}

fn write_response(req: Request<&mut EspHttpConnection>, resp: &ApiResponse) -> anyhow::Result<()> {
    let headers = [
        ("Content-Type", resp.content_type),
        ("Access-Control-Allow-Origin", "*"),
    ];
    let headers = if resp.allow_any_origin { &headers[..] } else { &headers[..1] };

    let mut out = req.into_response(resp.status, Some(reason_phrase(resp.status)), headers)?;
    out.write_all(resp.body.as_bytes())?;
    Ok(())
}

fn reason_phrase(status: u16) -> &'static str {
    match status {
        200 => "OK",
        400 => "Bad Request",
        404 => "Not Found",
        413 => "Payload Too Large",
        _ => "Internal Server Error",
    }
}
