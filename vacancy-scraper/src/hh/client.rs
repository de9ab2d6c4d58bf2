use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;

use crate::api::VacancyApi;
use crate::config::ApiConfig;
use crate::hh::types::{RawVacancy, SearchPage, SearchQuery};
use crate::hh::{Error, Result};

/// HTTP client for the hh.ru vacancy API
#[derive(Debug, Clone)]
pub struct HhClient {
    client: Client,
    base_url: String,
}

impl HhClient {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.as_str())
            .build()?;
        Ok(Self::with_client(client, &config.base_url))
    }

    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_owned(),
        }
    }

    fn search_url(&self) -> String {
        format!("{}/vacancies", self.base_url)
    }

    fn vacancy_url(&self, id: &str) -> String {
        format!("{}/vacancies/{}", self.base_url, urlencoding::encode(id))
    }
}

async fn read_json<T: DeserializeOwned>(resp: Response, url: &str) -> Result<T> {
    let status = resp.status();
    if !status.is_success() {
        let error_body = resp.text().await;
        log::debug!("request to {} failed, error resp body: {:?}", url, error_body);
        return Err(Error::RequestNotOk {
            url: url.to_owned(),
            status: status.as_u16(),
        });
    }
    Ok(resp.json().await?)
}

#[async_trait]
impl VacancyApi for HhClient {
    async fn search_page(&self, query: &SearchQuery, page: u32) -> Result<SearchPage> {
        let url = self.search_url();
        log::debug!(
            "requesting vacancies, page: {}, search: {}, area: {}",
            page,
            query.text,
            query.area
        );
        let resp = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .query(&query.params(page))
            .send()
            .await?;
        read_json(resp, &url).await
    }

    async fn vacancy(&self, id: &str) -> Result<RawVacancy> {
        let url = self.vacancy_url(id);
        log::debug!("requesting vacancy {}", id);
        let resp = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await?;
        read_json(resp, &url).await
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::sync::{Arc, Mutex};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serves canned responses on a local port and records request lines
    async fn serve(
        route: fn(&str) -> (u16, String),
    ) -> (String, Arc<Mutex<Vec<String>>>) {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Listener has no address");
        let requests = Arc::new(Mutex::new(Vec::new()));
        let recorded = requests.clone();
        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                let mut buf = Vec::new();
                let mut chunk = [0u8; 1024];
                while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
                    match socket.read(&mut chunk).await {
                        Ok(0) | Err(_) => break,
                        Ok(n) => buf.extend_from_slice(&chunk[..n]),
                    }
                }
                let request = String::from_utf8_lossy(&buf).to_string();
                let request_line = request.lines().next().unwrap_or_default().to_owned();
                recorded.lock().unwrap().push(request.clone());
                let (status, body) = route(&request_line);
                let response = format!(
                    "HTTP/1.1 {} X\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });
        (format!("http://{}", addr), requests)
    }

    fn route(request_line: &str) -> (u16, String) {
        if request_line.starts_with("GET /vacancies?") {
            (200, r#"{"items":[{"id":"1"},{"id":"2"}],"pages":4}"#.to_owned())
        } else if request_line.starts_with("GET /vacancies/12345 ") {
            (404, r#"{"errors":[{"type":"not_found"}]}"#.to_owned())
        } else if request_line.starts_with("GET /vacancies/") {
            (200, r#"{"id":"777","name":"Data Scientist","salary":null}"#.to_owned())
        } else {
            (500, "{}".to_owned())
        }
    }

    fn test_client(base_url: &str) -> HhClient {
        HhClient::with_client(Client::new(), base_url)
    }

    #[tokio::test]
    async fn test_search_page_sends_filters() {
        let (base_url, requests) = serve(route).await;
        let client = test_client(&base_url);
        let query = SearchQuery::new("Data Scientist", "1", 30);
        let page = client
            .search_page(&query, 2)
            .await
            .expect("Search request should succeed");
        assert_eq!(page.pages, 4);
        assert_eq!(page.items.len(), 2);

        let requests = requests.lock().unwrap();
        let request_line = requests[0].lines().next().unwrap();
        assert!(request_line.contains("text=Data+Scientist"), "{}", request_line);
        assert!(request_line.contains("area=1"));
        assert!(request_line.contains("period=30"));
        assert!(request_line.contains("per_page=100"));
        assert!(request_line.contains("page=2"));
    }

    #[tokio::test]
    async fn test_vacancy_detail() {
        let (base_url, _) = serve(route).await;
        let vacancy = test_client(&format!("{}/", base_url))
            .vacancy("777")
            .await
            .expect("Detail request should succeed");
        assert_eq!(vacancy.id().as_deref(), Some("777"));
        assert_eq!(vacancy.get("salary"), None);
    }

    #[tokio::test]
    async fn test_non_success_status_is_error() {
        let (base_url, _) = serve(route).await;
        let result = test_client(&base_url).vacancy("12345").await;
        match result {
            Err(Error::RequestNotOk { url, status }) => {
                assert_eq!(status, 404);
                assert!(url.ends_with("/vacancies/12345"));
            }
            other => panic!("expected RequestNotOk, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unreachable_host_is_request_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let result = test_client(&format!("http://{}", addr)).vacancy("1").await;
        assert!(matches!(result, Err(Error::Request(_))));
    }

    #[test]
    fn test_vacancy_url_encodes_identifier() {
        let client = test_client("https://api.hh.ru");
        assert_eq!(client.vacancy_url("12345"), "https://api.hh.ru/vacancies/12345");
        assert_eq!(client.vacancy_url("a b/c"), "https://api.hh.ru/vacancies/a%20b%2Fc");
    }

    #[tokio::test]
    #[ignore = "hits the live hh.ru API"]
    async fn test_live_search_page() {
        let client = Client::builder()
            .user_agent("vacancy-analytics-test")
            .build()
            .unwrap();
        let _ = HhClient::with_client(client, "https://api.hh.ru")
            .search_page(&SearchQuery::new("Rust", "1", 30), 0)
            .await
            .expect("Request failed");
    }
}
