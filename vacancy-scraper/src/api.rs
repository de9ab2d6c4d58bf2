use async_trait::async_trait;

use crate::hh::types::{RawVacancy, SearchPage, SearchQuery};
use crate::hh::Result;

/// The two endpoints of a vacancy listing service the fetcher relies on
#[async_trait]
pub trait VacancyApi {
    /// Fetch one page of search results, pages are zero based
    async fn search_page(&self, query: &SearchQuery, page: u32) -> Result<SearchPage>;

    /// Fetch the full record of a single vacancy
    async fn vacancy(&self, id: &str) -> Result<RawVacancy>;
}
