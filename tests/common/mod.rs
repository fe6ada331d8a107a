#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// 测试服务器对某个路径的响应方式
#[derive(Clone)]
pub enum Route {
    Body(Vec<u8>),
    Status(u16),
    /// 接受连接但从不响应
    Silent,
    /// 声明 `content_length` 字节，只发送 `partial` 后停止
    Stalled { content_length: usize, partial: Vec<u8> },
}

/// 基于 tokio 的最小 HTTP 服务器，记录每个路径被请求的次数
pub struct TestServer {
    base_url: String,
    routes: Arc<Mutex<HashMap<String, Route>>>,
    hits: Arc<Mutex<HashMap<String, usize>>>,
}

impl TestServer {
    pub async fn start(routes: Vec<(&str, Route)>) -> Self {
        // 本地请求不能经过代理
        std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
        std::env::set_var("no_proxy", "127.0.0.1,localhost");

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        let routes: Arc<Mutex<HashMap<String, Route>>> = Arc::new(Mutex::new(
            routes
                .into_iter()
                .map(|(path, route)| (path.to_string(), route))
                .collect(),
        ));
        let hits = Arc::new(Mutex::new(HashMap::new()));

        let server_routes = routes.clone();
        let server_hits = hits.clone();
        tokio::spawn(async move {
            loop {
                let Ok((stream, _)) = listener.accept().await else {
                    break;
                };
                let routes = server_routes.clone();
                let hits = server_hits.clone();
                tokio::spawn(async move {
                    let _ = serve(stream, routes, hits).await;
                });
            }
        });

        Self {
            base_url,
            routes,
            hits,
        }
    }

    /// 启动后追加路由，用于响应体中需要引用服务器地址的场景
    pub fn route(&self, path: &str, route: Route) {
        self.routes.lock().unwrap().insert(path.to_string(), route);
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn hits(&self, path: &str) -> usize {
        self.hits.lock().unwrap().get(path).copied().unwrap_or(0)
    }
}

async fn serve(
    mut stream: TcpStream,
    routes: Arc<Mutex<HashMap<String, Route>>>,
    hits: Arc<Mutex<HashMap<String, usize>>>,
) -> std::io::Result<()> {
    let mut request = Vec::new();
    let mut buf = [0u8; 1024];
    while !request.windows(4).any(|w| w == b"\r\n\r\n") {
        let n = stream.read(&mut buf).await?;
        if n == 0 {
            return Ok(());
        }
        request.extend_from_slice(&buf[..n]);
    }

    let request = String::from_utf8_lossy(&request);
    let target = request.split_whitespace().nth(1).unwrap_or("/");
    let path = target.split('?').next().unwrap_or("/").to_string();
    *hits.lock().unwrap().entry(path.clone()).or_insert(0) += 1;

    let route = routes.lock().unwrap().get(&path).cloned();
    match route {
        Some(Route::Body(body)) => write_response(&mut stream, 200, &body).await,
        Some(Route::Status(status)) => write_response(&mut stream, status, b"").await,
        Some(Route::Silent) => {
            // 保持连接直到客户端放弃
            let _ = stream.read(&mut buf).await;
            Ok(())
        }
        Some(Route::Stalled {
            content_length,
            partial,
        }) => {
            let head = format!(
                "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                content_length
            );
            stream.write_all(head.as_bytes()).await?;
            stream.write_all(&partial).await?;
            stream.flush().await?;
            let _ = stream.read(&mut buf).await;
            Ok(())
        }
        None => write_response(&mut stream, 404, b"").await,
    }
}

async fn write_response(stream: &mut TcpStream, status: u16, body: &[u8]) -> std::io::Result<()> {
    let head = format!(
        "HTTP/1.1 {} X\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        status,
        body.len()
    );
    stream.write_all(head.as_bytes()).await?;
    stream.write_all(body).await?;
    stream.shutdown().await
}
