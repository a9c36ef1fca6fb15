//! HTTP client for the thumbnail endpoint.

use std::future::Future;
use std::time::Duration;

use super::{ThumbnailError, ThumbnailReply, ThumbnailResponse, ThumbnailService};
use crate::config::ServerConfig;

/// Posts thumbnail requests to the dataset tagger server.
#[derive(Debug, Clone)]
pub struct HttpThumbnailService {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpThumbnailService {
    /// Creates a service posting to `endpoint`.
    ///
    /// # Errors
    ///
    /// Returns [`ThumbnailError::Client`] if the HTTP client cannot be built.
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, ThumbnailError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| ThumbnailError::Client(err.to_string()))?;

        Ok(Self { client, endpoint: endpoint.into() })
    }

    /// Creates a service from the server configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ThumbnailError::Client`] if the HTTP client cannot be built.
    pub fn from_config(server: &ServerConfig) -> Result<Self, ThumbnailError> {
        Self::new(server.thumbnail_endpoint(), server.request_timeout())
    }

    #[must_use]
    pub fn endpoint(&self) -> &str { &self.endpoint }
}

impl ThumbnailService for HttpThumbnailService {
    fn generate(
        &self,
        folder_path: &str,
        original_filename: &str,
    ) -> impl Future<Output = Result<ThumbnailReply, ThumbnailError>> + Send {
        let request = self.client.post(&self.endpoint).form(&[
            ("folder_path", folder_path),
            ("original_filename", original_filename),
        ]);

        async move {
            let response =
                request.send().await.map_err(|err| ThumbnailError::Request(err.to_string()))?;
            let status = response.status();

            let body: ThumbnailResponse =
                response.json().await.map_err(|err| ThumbnailError::Decode(err.to_string()))?;

            tracing::trace!(status = status.as_u16(), success = body.success, "thumbnail reply");

            Ok(ThumbnailReply {
                ok: status.is_success(),
                status: status.as_u16(),
                body,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    use super::*;
    use crate::thumbnails::ThumbnailOutcome;

    /// Serves one HTTP request with a canned response and returns the raw request.
    async fn serve_once(
        status: &'static str,
        body: &'static str,
    ) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}/generate", listener.local_addr().unwrap());

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];

            loop {
                let n = socket.read(&mut buf).await.unwrap();
                request.extend_from_slice(&buf[..n]);
                let text = String::from_utf8_lossy(&request);
                if let Some(header_end) = text.find("\r\n\r\n") {
                    let length = text[..header_end]
                        .lines()
                        .find_map(|line| {
                            let (name, value) = line.split_once(':')?;
                            name.eq_ignore_ascii_case("content-length")
                                .then(|| value.trim().parse::<usize>().ok())?
                        })
                        .unwrap_or(0);
                    if request.len() >= header_end + 4 + length || n == 0 {
                        break;
                    }
                }
                if n == 0 {
                    break;
                }
            }

            let response = format!(
                "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
            String::from_utf8_lossy(&request).into_owned()
        });

        (url, handle)
    }

    #[tokio::test]
    async fn test_generate_posts_form_fields() {
        let (url, server) = serve_once(
            "200 OK",
            r#"{"success":true,"message":"done","thumbnail_filename":"a b.png","thumbnail_url":"/thumbs/a%20b.png"}"#,
        )
        .await;
        let service = HttpThumbnailService::new(url, Duration::from_secs(5)).unwrap();

        let reply = service.generate("/data/set", "a b.png").await.unwrap();
        let request = server.await.unwrap();

        assert!(request.starts_with("POST /generate"));
        assert!(request.contains("application/x-www-form-urlencoded"));
        assert!(request.contains("folder_path=%2Fdata%2Fset"));
        assert!(request.contains("original_filename=a+b.png"));
        assert_eq!(reply.status, 200);
        assert_eq!(
            reply.outcome(),
            ThumbnailOutcome::Ready { url: "/thumbs/a%20b.png".to_string() }
        );
    }

    #[tokio::test]
    async fn test_generate_decodes_not_found_detail() {
        let (url, server) = serve_once("404 Not Found", r#"{"detail":"Original image not found"}"#).await;
        let service = HttpThumbnailService::new(url, Duration::from_secs(5)).unwrap();

        let reply = service.generate("/data", "gone.png").await.unwrap();
        server.await.unwrap();

        assert!(!reply.ok);
        assert_eq!(reply.status, 404);
        assert_eq!(
            reply.outcome(),
            ThumbnailOutcome::Failed { message: "Original image not found".to_string() }
        );
    }

    #[tokio::test]
    async fn test_generate_non_json_body_is_decode_error() {
        let (url, server) = serve_once("500 Internal Server Error", "<html>oops</html>").await;
        let service = HttpThumbnailService::new(url, Duration::from_secs(5)).unwrap();

        let err = service.generate("/data", "a.png").await.unwrap_err();
        server.await.unwrap();

        assert!(matches!(err, ThumbnailError::Decode(_)));
    }

    #[tokio::test]
    async fn test_generate_connection_refused_is_request_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}/generate", listener.local_addr().unwrap());
        drop(listener);

        let service = HttpThumbnailService::new(url, Duration::from_secs(5)).unwrap();
        let err = service.generate("/data", "a.png").await.unwrap_err();
        assert!(matches!(err, ThumbnailError::Request(_)));
    }

    #[test]
    fn test_from_config_uses_endpoint() {
        let service = HttpThumbnailService::from_config(&ServerConfig::default()).unwrap();
        assert_eq!(
            service.endpoint(),
            "http://127.0.0.1:8000/tools/dataset-tagger/generate-thumbnail"
        );
    }
}
