use std::collections::HashSet;
use std::time::Duration;

use tokio::time::sleep;

use crate::api::VacancyApi;
use crate::config::ApiConfig;
use crate::hh::types::{RawVacancy, SearchQuery};

const PROGRESS_EVERY: usize = 20;

/// Sequential, rate limited retrieval of vacancies: a paged search for
/// identifiers followed by one detail request per identifier.
pub struct Fetcher<A> {
    api: A,
    query: SearchQuery,
    max_pages: u32,
    delay: Duration,
}

impl<A: VacancyApi> Fetcher<A> {
    pub fn new(api: A, config: &ApiConfig) -> Self {
        Self {
            api,
            query: SearchQuery::from(config),
            max_pages: config.max_pages,
            delay: config.request_delay(),
        }
    }

    pub fn with_query(api: A, query: SearchQuery, max_pages: u32, delay: Duration) -> Self {
        Self {
            api,
            query,
            max_pages,
            delay,
        }
    }

    /// Walk the search pages and collect unique vacancy ids in discovery order.
    ///
    /// Pagination stops at the last page the server reports, at `max_pages`,
    /// or at the first failed request, keeping whatever was collected so far.
    pub async fn collect_ids(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut ids = Vec::new();
        for page in 0..self.max_pages {
            let result = self.api.search_page(&self.query, page).await;
            let search_page = match result {
                Ok(search_page) => search_page,
                Err(e) => {
                    log::error!("failed to fetch search page {}: {}, stopping pagination", page, e);
                    break;
                }
            };
            let found = search_page.items.len();
            for id in search_page.items.iter().filter_map(|item| item.id()) {
                if seen.insert(id.clone()) {
                    ids.push(id);
                }
            }
            log::debug!(
                "search page {} of {} returned {} items",
                page + 1,
                search_page.pages,
                found
            );
            if page + 1 >= search_page.pages {
                break;
            }
            sleep(self.delay).await;
        }
        log::info!("found {} vacancies", ids.len());
        ids
    }

    /// Fetch one vacancy, `None` when the request fails or the body holds no record
    pub async fn fetch_vacancy(&self, id: &str) -> Option<RawVacancy> {
        match self.api.vacancy(id).await {
            Ok(vacancy) if vacancy.is_empty() => {
                log::warn!("vacancy {} returned an empty record, skipping", id);
                None
            }
            Ok(vacancy) => Some(vacancy),
            Err(e) => {
                log::error!("failed to fetch vacancy {}: {}", id, e);
                None
            }
        }
    }

    /// Fetch the details of every id in order, skipping failed ones.
    /// Pauses after every request, successful or not.
    pub async fn fetch_details(&self, ids: &[String]) -> Vec<RawVacancy> {
        let mut vacancies = Vec::with_capacity(ids.len());
        for (i, id) in ids.iter().enumerate() {
            if let Some(vacancy) = self.fetch_vacancy(id).await {
                vacancies.push(vacancy);
            }
            sleep(self.delay).await;
            if (i + 1) % PROGRESS_EVERY == 0 {
                log::info!("fetched details for {}/{} vacancies", i + 1, ids.len());
            }
        }
        log::info!(
            "fetched {} of {} vacancy details",
            vacancies.len(),
            ids.len()
        );
        vacancies
    }

    pub async fn fetch_all(&self) -> Vec<RawVacancy> {
        let ids = self.collect_ids().await;
        if ids.is_empty() {
            return Vec::new();
        }
        self.fetch_details(&ids).await
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::hh::types::{ListingSummary, SearchPage};
    use crate::hh::{Error, Result};
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;

    /// In-memory listing service recording every request it serves
    #[derive(Default)]
    struct FakeApi {
        pages: Vec<Result<SearchPage>>,
        failing_ids: Vec<&'static str>,
        empty_bodies: Vec<(&'static str, serde_json::Value)>,
        search_requests: Mutex<Vec<u32>>,
        detail_requests: Mutex<Vec<String>>,
    }

    impl FakeApi {
        fn with_pages(pages: Vec<Result<SearchPage>>) -> Self {
            Self {
                pages,
                ..Default::default()
            }
        }

        fn search_requests(&self) -> Vec<u32> {
            self.search_requests.lock().unwrap().clone()
        }

        fn detail_requests(&self) -> Vec<String> {
            self.detail_requests.lock().unwrap().clone()
        }
    }

    fn page(ids: &[&str], pages: u32) -> Result<SearchPage> {
        let items = ids
            .iter()
            .map(|id| serde_json::from_value::<ListingSummary>(json!({ "id": id })).unwrap())
            .collect();
        Ok(SearchPage { items, pages })
    }

    fn not_ok(page: u32) -> Error {
        Error::RequestNotOk {
            url: format!("http://test/vacancies?page={}", page),
            status: 503,
        }
    }

    #[async_trait]
    impl VacancyApi for FakeApi {
        async fn search_page(&self, _query: &SearchQuery, page: u32) -> Result<SearchPage> {
            self.search_requests.lock().unwrap().push(page);
            match self.pages.get(page as usize) {
                Some(Ok(search_page)) => Ok(search_page.clone()),
                _ => Err(not_ok(page)),
            }
        }

        async fn vacancy(&self, id: &str) -> Result<RawVacancy> {
            self.detail_requests.lock().unwrap().push(id.to_owned());
            if self.failing_ids.iter().any(|failing| *failing == id) {
                return Err(Error::RequestNotOk {
                    url: format!("http://test/vacancies/{}", id),
                    status: 500,
                });
            }
            if let Some((_, body)) = self.empty_bodies.iter().find(|(empty, _)| *empty == id) {
                return Ok(RawVacancy::new(body.clone()));
            }
            Ok(RawVacancy::new(json!({ "id": id, "name": format!("Vacancy {}", id) })))
        }
    }

    fn fetcher(api: FakeApi, max_pages: u32) -> Fetcher<FakeApi> {
        Fetcher::with_query(
            api,
            SearchQuery::new("Data Scientist", "1", 30),
            max_pages,
            Duration::ZERO,
        )
    }

    #[tokio::test]
    async fn test_zero_max_pages_makes_no_requests() {
        let fetcher = fetcher(FakeApi::with_pages(vec![page(&["1"], 1)]), 0);
        let vacancies = fetcher.fetch_all().await;
        assert!(vacancies.is_empty());
        assert!(fetcher.api.search_requests().is_empty());
        assert!(fetcher.api.detail_requests().is_empty());
    }

    #[tokio::test]
    async fn test_server_page_count_is_authoritative() {
        let pages = (0..10).map(|p| page(&[p.to_string().as_str()], 3)).collect();
        let fetcher = fetcher(FakeApi::with_pages(pages), 10);
        let ids = fetcher.collect_ids().await;
        assert_eq!(fetcher.api.search_requests(), vec![0, 1, 2]);
        assert_eq!(ids, vec!["0", "1", "2"]);
    }

    #[tokio::test]
    async fn test_max_pages_caps_pagination() {
        let pages = (0..5).map(|p| page(&[p.to_string().as_str()], 5)).collect();
        let fetcher = fetcher(FakeApi::with_pages(pages), 2);
        let ids = fetcher.collect_ids().await;
        assert_eq!(fetcher.api.search_requests(), vec![0, 1]);
        assert_eq!(ids, vec!["0", "1"]);
    }

    #[tokio::test]
    async fn test_most_recent_page_count_wins() {
        let pages = vec![page(&["a"], 5), page(&["b"], 2), page(&["c"], 5)];
        let fetcher = fetcher(FakeApi::with_pages(pages), 10);
        let ids = fetcher.collect_ids().await;
        assert_eq!(fetcher.api.search_requests(), vec![0, 1]);
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_zero_reported_pages_stops_after_first() {
        let fetcher = fetcher(FakeApi::with_pages(vec![page(&[], 0), page(&["x"], 0)]), 5);
        let ids = fetcher.collect_ids().await;
        assert!(ids.is_empty());
        assert_eq!(fetcher.api.search_requests(), vec![0]);
    }

    #[tokio::test]
    async fn test_page_failure_keeps_collected_ids() {
        let pages = vec![page(&["1", "2"], 5), Err(not_ok(1)), page(&["3"], 5)];
        let fetcher = fetcher(FakeApi::with_pages(pages), 5);
        let ids = fetcher.collect_ids().await;
        assert_eq!(fetcher.api.search_requests(), vec![0, 1]);
        assert_eq!(ids, vec!["1", "2"]);
    }

    #[tokio::test]
    async fn test_items_without_id_are_dropped_and_ids_deduplicated() {
        let first = SearchPage {
            items: vec![
                serde_json::from_value(json!({"id": "1"})).unwrap(),
                serde_json::from_value(json!({"name": "no id"})).unwrap(),
                serde_json::from_value(json!({"id": null})).unwrap(),
                serde_json::from_value(json!({"id": "2"})).unwrap(),
            ],
            pages: 2,
        };
        let pages = vec![Ok(first), page(&["2", "3"], 2)];
        let fetcher = fetcher(FakeApi::with_pages(pages), 5);
        let ids = fetcher.collect_ids().await;
        assert_eq!(ids, vec!["1", "2", "3"]);
    }

    #[tokio::test]
    async fn test_failed_detail_is_skipped_in_order() {
        let api = FakeApi {
            failing_ids: vec!["12345"],
            ..FakeApi::with_pages(vec![page(&["100", "12345", "200", "300"], 1)])
        };
        let fetcher = fetcher(api, 3);
        let vacancies = fetcher.fetch_all().await;

        assert_eq!(
            fetcher.api.detail_requests(),
            vec!["100", "12345", "200", "300"]
        );
        let ids: Vec<_> = vacancies.iter().filter_map(RawVacancy::id).collect();
        assert_eq!(ids, vec!["100", "200", "300"]);
        assert_eq!(vacancies[1].get("name"), Some(&json!("Vacancy 200")));
    }

    #[tokio::test]
    async fn test_unusable_page_count_keeps_page_items() {
        let unknown: SearchPage = serde_json::from_value(json!({
            "items": [{"id": "1"}, {"id": "2"}],
            "pages": null
        }))
        .unwrap();
        let pages = vec![Ok(unknown), page(&["3"], 5)];
        let fetcher = fetcher(FakeApi::with_pages(pages), 5);
        let ids = fetcher.collect_ids().await;
        assert_eq!(ids, vec!["1", "2"]);
        assert_eq!(fetcher.api.search_requests(), vec![0]);
    }

    #[tokio::test]
    async fn test_empty_detail_bodies_are_skipped() {
        let api = FakeApi {
            empty_bodies: vec![("2", json!(null)), ("3", json!({})), ("4", json!([]))],
            ..FakeApi::with_pages(vec![page(&["1", "2", "3", "4", "5"], 1)])
        };
        let fetcher = fetcher(api, 1);
        let vacancies = fetcher.fetch_all().await;
        assert_eq!(fetcher.api.detail_requests().len(), 5);
        let ids: Vec<_> = vacancies.iter().filter_map(RawVacancy::id).collect();
        assert_eq!(ids, vec!["1", "5"]);
        assert_eq!(vacancies.len(), 2);
    }

    #[tokio::test]
    async fn test_delay_is_applied_between_requests() {
        let api = FakeApi::with_pages(vec![page(&["1"], 2), page(&["2"], 2)]);
        let fetcher = Fetcher::with_query(
            api,
            SearchQuery::new("Rust", "1", 30),
            5,
            Duration::from_millis(20),
        );
        let started = std::time::Instant::now();
        let vacancies = fetcher.fetch_all().await;
        assert_eq!(vacancies.len(), 2);
        // one pause between the two pages, one after each of the two details
        assert!(started.elapsed() >= Duration::from_millis(60));
    }
}
