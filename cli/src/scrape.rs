use vacancy_scraper::hh::{self, Fetcher, HhClient};
use vacancy_scraper::{ApiConfig, RawVacancy, VacancyApi};

/// Fetcher talking to the live listing API
pub fn fetcher(config: &ApiConfig) -> hh::Result<Fetcher<HhClient>> {
    let client = HhClient::new(config)?;
    Ok(Fetcher::new(client, config))
}

pub async fn scrape<A: VacancyApi>(fetcher: &Fetcher<A>) -> Vec<RawVacancy> {
    let vacancies = fetcher.fetch_all().await;
    if vacancies.is_empty() {
        log::warn!("no vacancy details were fetched");
    }
    vacancies
}
