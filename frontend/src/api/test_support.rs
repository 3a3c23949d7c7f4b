pub mod mock {
    use crate::api::{
        transport::{HttpTransport, RawResponse},
        ApiError,
    };
    use async_trait::async_trait;
    use reqwest::{
        header::{HeaderName, AUTHORIZATION, CONTENT_TYPE},
        Method, Request,
    };
    use serde_json::Value;
    use std::{
        cell::RefCell,
        future::Future,
        pin::Pin,
        rc::Rc,
        sync::atomic::{AtomicUsize, Ordering},
        task::{Context, Poll},
    };

    pub const GET: Method = Method::GET;
    pub const POST: Method = Method::POST;
    pub const PUT: Method = Method::PUT;
    pub const DELETE: Method = Method::DELETE;

    /// What the mock saw for one request.
    #[derive(Debug, Clone, PartialEq)]
    pub struct RecordedRequest {
        pub method: Method,
        pub path: String,
        pub query: Option<String>,
        pub authorization: Option<String>,
        pub content_type: Option<String>,
        pub body: Option<Value>,
    }

    /// In-process stand-in for the backend, plugged in as the transport.
    /// Later mocks shadow earlier ones for the same route; a mock limited
    /// with `times` stops matching once used up.
    #[derive(Clone)]
    pub struct MockServer {
        inner: Rc<RefCell<Inner>>,
        base: String,
    }

    #[derive(Default)]
    struct Inner {
        routes: Vec<Route>,
        requests: Vec<RecordedRequest>,
    }

    struct Route {
        method: Method,
        path: String,
        reply: Reply,
        remaining: Option<usize>,
    }

    #[derive(Clone)]
    enum Reply {
        Response(RawResponse),
        NetworkError(String),
    }

    impl MockServer {
        pub async fn start_async() -> Self {
            Self::start()
        }

        pub fn start() -> Self {
            static NEXT_ID: AtomicUsize = AtomicUsize::new(1);
            let id = NEXT_ID.fetch_add(1, Ordering::Relaxed);
            Self {
                inner: Rc::new(RefCell::new(Inner::default())),
                base: format!("http://mock-{}.test", id),
            }
        }

        pub fn url(&self, path: &str) -> String {
            format!("{}{}", self.base, path)
        }

        pub fn mock<F>(&self, f: F)
        where
            F: FnOnce(&mut When, &mut Then),
        {
            let mut when = When::default();
            let mut then = Then::default();
            f(&mut when, &mut then);

            let method = when.method.unwrap_or(GET);
            let path = when.path.unwrap_or_else(|| "/".into());
            let reply = match then.network_error {
                Some(msg) => Reply::NetworkError(msg),
                None => Reply::Response(RawResponse {
                    status: then.status,
                    content_type: Some(then.content_type),
                    body: then.body,
                }),
            };
            self.inner.borrow_mut().routes.push(Route {
                method,
                path,
                reply,
                remaining: then.times,
            });
        }

        pub fn requests(&self) -> Vec<RecordedRequest> {
            self.inner.borrow().requests.clone()
        }

        pub fn hits(&self, method: Method, path: &str) -> usize {
            self.inner
                .borrow()
                .requests
                .iter()
                .filter(|r| r.method == method && r.path == path)
                .count()
        }

        fn reply_for(&self, request: &Request) -> Option<Reply> {
            let mut inner = self.inner.borrow_mut();
            inner.requests.push(record(request));

            let path = request.url().path();
            let route = inner.routes.iter_mut().rev().find(|route| {
                route.method == *request.method()
                    && route.path == path
                    && route.remaining != Some(0)
            })?;
            if let Some(left) = route.remaining.as_mut() {
                *left -= 1;
            }
            Some(route.reply.clone())
        }
    }

    fn record(request: &Request) -> RecordedRequest {
        let header = |name: HeaderName| {
            request
                .headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        RecordedRequest {
            method: request.method().clone(),
            path: request.url().path().to_string(),
            query: request.url().query().map(str::to_string),
            authorization: header(AUTHORIZATION),
            content_type: header(CONTENT_TYPE),
            body: request
                .body()
                .and_then(|body| body.as_bytes())
                .and_then(|bytes| serde_json::from_slice(bytes).ok()),
        }
    }

    /// Suspends once so concurrent callers interleave as they would over a
    /// real network.
    struct YieldOnce(bool);

    impl Future for YieldOnce {
        type Output = ();

        fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
            if self.0 {
                return Poll::Ready(());
            }
            self.0 = true;
            cx.waker().wake_by_ref();
            Poll::Pending
        }
    }

    #[async_trait(?Send)]
    impl HttpTransport for MockServer {
        async fn execute(&self, request: Request) -> Result<RawResponse, ApiError> {
            let reply = self.reply_for(&request);
            YieldOnce(false).await;
            match reply {
                Some(Reply::Response(response)) => Ok(response),
                Some(Reply::NetworkError(msg)) => Err(ApiError::network(msg)),
                None => Err(ApiError::network(format!(
                    "No mock for {} {}",
                    request.method(),
                    request.url().path()
                ))),
            }
        }
    }

    #[derive(Default)]
    pub struct When {
        method: Option<Method>,
        path: Option<String>,
    }

    impl When {
        pub fn method(&mut self, method: Method) -> &mut Self {
            self.method = Some(method);
            self
        }

        pub fn path(&mut self, path: &str) -> &mut Self {
            self.path = Some(path.to_string());
            self
        }
    }

    pub struct Then {
        status: u16,
        content_type: String,
        body: String,
        times: Option<usize>,
        network_error: Option<String>,
    }

    impl Default for Then {
        fn default() -> Self {
            Self {
                status: 200,
                content_type: "application/json".into(),
                body: "{}".into(),
                times: None,
                network_error: None,
            }
        }
    }

    impl Then {
        pub fn status(&mut self, status: u16) -> &mut Self {
            self.status = status;
            self
        }

        pub fn json_body(&mut self, body: Value) -> &mut Self {
            self.content_type = "application/json".into();
            self.body = body.to_string();
            self
        }

        pub fn text_body(&mut self, body: &str) -> &mut Self {
            self.content_type = "text/plain; charset=utf-8".into();
            self.body = body.to_string();
            self
        }

        pub fn times(&mut self, times: usize) -> &mut Self {
            self.times = Some(times);
            self
        }

        pub fn network_error(&mut self, msg: &str) -> &mut Self {
            self.network_error = Some(msg.to_string());
            self
        }
    }
}
