//! Minimal mock Rocket.Chat REST server

use http_body_util::{BodyExt, Full};
use hyper::body::{Bytes, Incoming};
use hyper::{Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;

pub const USER_ID: &str = "mock-user";
pub const AUTH_TOKEN: &str = "mock-token";
pub const PASSWORD: &str = "correct horse";

#[derive(Clone, Debug)]
pub struct ReceivedRequest {
    pub method: String,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl ReceivedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).expect("request body is not JSON")
    }
}

/// How `chat.postMessage` answers
#[derive(Clone, Copy, Debug)]
enum PostReply {
    Accept,
    Reject,
    NotJson,
}

#[derive(Clone)]
pub struct MockServer {
    pub addr: SocketAddr,
    pub received_requests: Arc<Mutex<Vec<ReceivedRequest>>>,
}

impl MockServer {
    /// Start a server that accepts `PASSWORD` and every post
    pub async fn start() -> Self {
        Self::start_with(PostReply::Accept).await
    }

    /// Start a server whose `chat.postMessage` always answers `success: false`
    pub async fn start_rejecting_posts() -> Self {
        Self::start_with(PostReply::Reject).await
    }

    /// Start a server whose `chat.postMessage` answers 200 with an HTML body
    pub async fn start_with_html_posts() -> Self {
        Self::start_with(PostReply::NotJson).await
    }

    async fn start_with(post_reply: PostReply) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock server");
        let addr = listener.local_addr().expect("Failed to get local addr");

        let received_requests = Arc::new(Mutex::new(Vec::new()));
        let requests_clone = received_requests.clone();

        tokio::spawn(async move {
            loop {
                let (stream, _) = match listener.accept().await {
                    Ok(conn) => conn,
                    Err(_) => break,
                };

                let io = TokioIo::new(stream);
                let requests = requests_clone.clone();

                tokio::spawn(async move {
                    let service = hyper::service::service_fn(move |req: Request<Incoming>| {
                        let requests = requests.clone();
                        async move {
                            let method = req.method().to_string();
                            let path = req.uri().path().to_string();
                            let headers: Vec<(String, String)> = req
                                .headers()
                                .iter()
                                .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or("").to_string()))
                                .collect();

                            let body = req
                                .into_body()
                                .collect()
                                .await
                                .map(|collected| collected.to_bytes().to_vec())
                                .unwrap_or_default();

                            let request = ReceivedRequest {
                                method,
                                path,
                                headers,
                                body,
                            };
                            let response = respond(&request, post_reply);
                            requests.lock().unwrap().push(request);

                            Ok::<_, Infallible>(response)
                        }
                    });

                    let _ = hyper::server::conn::http1::Builder::new()
                        .serve_connection(io, service)
                        .await;
                });
            }
        });

        MockServer {
            addr,
            received_requests,
        }
    }

    /// Base URL of the mock server
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn get_requests_for_path(&self, path: &str) -> Vec<ReceivedRequest> {
        self.received_requests
            .lock()
            .unwrap()
            .iter()
            .filter(|req| req.path == path)
            .cloned()
            .collect()
    }

    /// Poll until `count` requests hit `path`, or give up after five seconds
    pub async fn wait_for_requests(&self, path: &str, count: usize) -> Vec<ReceivedRequest> {
        for _ in 0..500 {
            let requests = self.get_requests_for_path(path);
            if requests.len() >= count {
                return requests;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        self.get_requests_for_path(path)
    }
}

fn respond(request: &ReceivedRequest, post_reply: PostReply) -> Response<Full<Bytes>> {
    match request.path.as_str() {
        "/api/v1/login" => {
            let body: serde_json::Value =
                serde_json::from_slice(&request.body).unwrap_or_default();
            if body["password"] == PASSWORD {
                json_response(
                    StatusCode::OK,
                    serde_json::json!({
                        "status": "success",
                        "data": { "userId": USER_ID, "authToken": AUTH_TOKEN }
                    }),
                )
            } else {
                json_response(
                    StatusCode::UNAUTHORIZED,
                    serde_json::json!({ "status": "error", "message": "Unauthorized" }),
                )
            }
        }
        "/api/v1/chat.postMessage" => match post_reply {
            PostReply::Accept => json_response(
                StatusCode::OK,
                serde_json::json!({ "success": true, "channel": "ops" }),
            ),
            PostReply::Reject => json_response(
                StatusCode::OK,
                serde_json::json!({ "success": false, "error": "error-not-allowed" }),
            ),
            PostReply::NotJson => Response::builder()
                .status(StatusCode::OK)
                .header("content-type", "text/html")
                .body(Full::new(Bytes::from("<html>maintenance</html>")))
                .unwrap(),
        },
        _ => json_response(
            StatusCode::NOT_FOUND,
            serde_json::json!({ "success": false, "error": "not found" }),
        ),
    }
}

fn json_response(status: StatusCode, body: serde_json::Value) -> Response<Full<Bytes>> {
    Response::builder()
        .status(status)
        .header("content-type", "application/json")
        .body(Full::new(Bytes::from(body.to_string())))
        .unwrap()
}
