// ABOUTME: DatabaseClient implementation speaking the ArangoDB HTTP API.
// ABOUTME: One HTTP/1.1 connection per request over a plain TCP stream.

use async_trait::async_trait;
use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::header::{AUTHORIZATION, CONTENT_TYPE, HOST};
use hyper::{Method, Uri};
use hyper_util::rt::TokioIo;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpStream;

use super::error::ClientError;
use super::health::ClusterHealth;
use super::traits::{ClusterHandle, DatabaseClient};
use super::version::VersionInfo;

const DEFAULT_PORT: u16 = 8529;

/// Error body returned by ArangoDB on non-2xx responses.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody {
    #[serde(default)]
    error_num: i64,
    #[serde(default)]
    error_message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NumberOfServers {
    #[serde(default)]
    cleaned_servers: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct HttpDatabaseClient {
    host: String,
    port: u16,
    token: Option<String>,
    timeout: Duration,
}

impl HttpDatabaseClient {
    /// Create a client for an `http://host[:port]` endpoint.
    pub fn new(endpoint: &str) -> Result<Self, ClientError> {
        let uri: Uri = endpoint
            .parse()
            .map_err(|e| ClientError::Request(format!("invalid endpoint {}: {}", endpoint, e)))?;

        match uri.scheme_str() {
            Some("http") | Some("tcp") | None => {}
            Some(other) => {
                return Err(ClientError::Request(format!(
                    "unsupported endpoint scheme '{}' in {}",
                    other, endpoint
                )));
            }
        }

        // IPv6 literals keep their brackets in the URI but not in a socket address.
        let host = uri
            .host()
            .ok_or_else(|| ClientError::Request(format!("endpoint {} has no host", endpoint)))?
            .trim_start_matches('[')
            .trim_end_matches(']')
            .to_string();

        Ok(Self {
            host,
            port: uri.port_u16().unwrap_or(DEFAULT_PORT),
            token: None,
            timeout: Duration::from_secs(30),
        })
    }

    /// Send `Authorization: bearer <token>` with every request.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Bound on connecting, sending and reading one request.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn endpoint(&self) -> String {
        format!("http://{}", self.authority())
    }

    fn authority(&self) -> String {
        if self.host.contains(':') {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }

    async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<Vec<u8>>,
    ) -> Result<Bytes, ClientError> {
        match tokio::time::timeout(self.timeout, self.send(method, path, body)).await {
            Ok(result) => result,
            Err(_elapsed) => Err(ClientError::Connection(format!(
                "request to {}{} timed out after {:?}",
                self.endpoint(),
                path,
                self.timeout
            ))),
        }
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<Vec<u8>>,
    ) -> Result<Bytes, ClientError> {
        let stream = TcpStream::connect((self.host.as_str(), self.port))
            .await
            .map_err(|e| ClientError::Connection(format!("{}: {}", self.endpoint(), e)))?;

        let io = TokioIo::new(stream);
        let (mut sender, conn) = hyper::client::conn::http1::handshake(io)
            .await
            .map_err(|e| ClientError::Connection(format!("HTTP handshake failed: {}", e)))?;

        tokio::spawn(async move {
            if let Err(e) = conn.await {
                tracing::debug!("database connection error: {}", e);
            }
        });

        let mut builder = hyper::Request::builder()
            .method(method)
            .uri(path)
            .header(HOST, self.authority());
        if let Some(token) = &self.token {
            builder = builder.header(AUTHORIZATION, format!("bearer {}", token));
        }
        if body.is_some() {
            builder = builder.header(CONTENT_TYPE, "application/json");
        }

        let req = builder
            .body(Full::new(Bytes::from(body.unwrap_or_default())))
            .map_err(|e| ClientError::Request(format!("failed to build request: {}", e)))?;

        let resp = sender
            .send_request(req)
            .await
            .map_err(|e| ClientError::Connection(format!("request failed: {}", e)))?;

        let status = resp.status();
        let bytes = resp
            .into_body()
            .collect()
            .await
            .map_err(|e| ClientError::Connection(format!("failed to read response: {}", e)))?
            .to_bytes();

        if !status.is_success() {
            let (error_num, message) = match serde_json::from_slice::<ErrorBody>(&bytes) {
                Ok(body) => (body.error_num, body.error_message),
                Err(_) => (0, String::from_utf8_lossy(&bytes).into_owned()),
            };
            return Err(ClientError::from_response(status.as_u16(), error_num, message));
        }

        Ok(bytes)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let bytes = self.request(Method::GET, path, None).await?;
        serde_json::from_slice(&bytes)
            .map_err(|e| ClientError::InvalidResponse(format!("{}: {}", path, e)))
    }

    async fn post_json(&self, path: &str, body: &serde_json::Value) -> Result<(), ClientError> {
        let payload = serde_json::to_vec(body)
            .map_err(|e| ClientError::Request(format!("failed to encode body: {}", e)))?;
        self.request(Method::POST, path, Some(payload)).await?;
        Ok(())
    }
}

#[async_trait]
impl DatabaseClient for HttpDatabaseClient {
    async fn cluster(&self) -> Result<Arc<dyn ClusterHandle>, ClientError> {
        Ok(Arc::new(HttpClusterHandle {
            client: self.clone(),
        }))
    }

    async fn version(&self) -> Result<VersionInfo, ClientError> {
        self.get_json("/_api/version").await
    }

    async fn shutdown(&self, remove_from_cluster: bool) -> Result<(), ClientError> {
        let path = if remove_from_cluster {
            "/_admin/shutdown?remove_from_cluster=1"
        } else {
            "/_admin/shutdown"
        };
        self.request(Method::DELETE, path, None).await?;
        Ok(())
    }
}

/// Cluster operations, issued against a coordinator.
struct HttpClusterHandle {
    client: HttpDatabaseClient,
}

#[async_trait]
impl ClusterHandle for HttpClusterHandle {
    async fn health(&self) -> Result<ClusterHealth, ClientError> {
        self.client.get_json("/_admin/cluster/health").await
    }

    async fn clean_out_server(&self, server_id: &str) -> Result<(), ClientError> {
        self.client
            .post_json(
                "/_admin/cluster/cleanOutServer",
                &serde_json::json!({ "server": server_id }),
            )
            .await
    }

    async fn is_cleaned_out(&self, server_id: &str) -> Result<bool, ClientError> {
        let servers: NumberOfServers = self
            .client
            .get_json("/_admin/cluster/numberOfServers")
            .await?;
        Ok(servers.cleaned_servers.iter().any(|s| s == server_id))
    }

    async fn remove_server(&self, server_id: &str) -> Result<(), ClientError> {
        self.client
            .post_json(
                "/_admin/cluster/removeServer",
                &serde_json::Value::String(server_id.to_string()),
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve exactly one request with a canned response, returning the raw
    /// request text.
    async fn serve_once(status_line: &'static str, body: &'static str) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        (format!("http://{}", addr), serve_on(listener, status_line, body))
    }

    fn serve_on(
        listener: TcpListener,
        status_line: &'static str,
        body: &'static str,
    ) -> tokio::task::JoinHandle<String> {
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = vec![0u8; 4096];
            let n = socket.read(&mut buf).await.unwrap();
            let response = format!(
                "HTTP/1.1 {}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            String::from_utf8_lossy(&buf[..n]).into_owned()
        })
    }

    #[test]
    fn endpoint_defaults_to_arango_port() {
        let client = HttpDatabaseClient::new("http://db.example.svc").unwrap();
        assert_eq!(client.endpoint(), "http://db.example.svc:8529");
    }

    #[test]
    fn ipv6_endpoint_connects_without_brackets() {
        let client = HttpDatabaseClient::new("http://[::1]:8530").unwrap();
        assert_eq!(client.host, "::1");
        assert_eq!(client.endpoint(), "http://[::1]:8530");
    }

    #[tokio::test]
    async fn version_over_ipv6_loopback() {
        // Hosts without IPv6 loopback skip this test.
        let Ok(listener) = TcpListener::bind("[::1]:0").await else {
            return;
        };
        let port = listener.local_addr().unwrap().port();
        let server = serve_on(listener, "200 OK", r#"{"server":"arango","version":"3.4.2"}"#);

        let client = HttpDatabaseClient::new(&format!("http://[::1]:{}", port)).unwrap();
        let info = client.version().await.unwrap();
        assert_eq!(info.version.as_str(), "3.4.2");
        let request = server.await.unwrap();
        assert!(request.to_lowercase().contains(&format!("host: [::1]:{}", port)));
    }

    #[test]
    fn https_endpoints_are_rejected() {
        assert!(HttpDatabaseClient::new("https://db:8529").is_err());
    }

    #[tokio::test]
    async fn version_parses_success_response() {
        let (endpoint, server) =
            serve_once("200 OK", r#"{"server":"arango","version":"3.4.2"}"#).await;
        let client = HttpDatabaseClient::new(&endpoint)
            .unwrap()
            .with_token("secret");

        let info = client.version().await.unwrap();
        assert_eq!(info.version.as_str(), "3.4.2");

        let request = server.await.unwrap();
        assert!(request.starts_with("GET /_api/version"));
        assert!(request.to_lowercase().contains("authorization: bearer secret"));
    }

    #[tokio::test]
    async fn not_leader_response_is_no_leader_error() {
        let (endpoint, server) = serve_once(
            "503 Service Unavailable",
            r#"{"error":true,"errorNum":1496,"errorMessage":"not a leader","code":503}"#,
        )
        .await;
        let client = HttpDatabaseClient::new(&endpoint).unwrap();

        let err = client.version().await.unwrap_err();
        assert!(err.is_no_leader());
        server.await.unwrap();
    }

    #[tokio::test]
    async fn cleaned_servers_are_read_from_number_of_servers() {
        let (endpoint, server) =
            serve_once("200 OK", r#"{"cleanedServers":["PRMR-1"],"numberOfDBServers":3}"#).await;
        let client = HttpDatabaseClient::new(&endpoint).unwrap();

        let cluster = client.cluster().await.unwrap();
        assert!(cluster.is_cleaned_out("PRMR-1").await.unwrap());
        server.await.unwrap();
    }
}
