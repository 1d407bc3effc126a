use crate::{
    config::{NewsConfig, NewsSourceKind},
    models::NewsItem,
    utils::AppError,
};
use async_trait::async_trait;
use chrono::{Local, NaiveDate};
use lazy_static::lazy_static;
use reqwest::Url;
use scraper::{ElementRef, Html, Selector};
use serde::Deserialize;
use std::sync::Arc;

const NEWSAPI_BASE: &str = "https://newsapi.org/v2/everything";
const NEWSAPI_PAGE_SIZE: u32 = 20;
const NEWSAPI_KEY_HEADER: &str = "X-Api-Key";

/// Fonte de notícias; a variante é escolhida por NEWS_SOURCE
#[async_trait]
pub trait NewsSource: Send + Sync {
    fn name(&self) -> &'static str;

    async fn fetch(&self, date: Option<NaiveDate>) -> Result<Vec<NewsItem>, AppError>;
}

pub fn build_news_source(config: &NewsConfig, client: reqwest::Client) -> Arc<dyn NewsSource> {
    match config.source {
        NewsSourceKind::Api => Arc::new(NewsApiSource {
            client,
            base_url: NEWSAPI_BASE.to_string(),
            api_key: config.api_key.clone(),
            query: config.query.clone(),
        }),
        NewsSourceKind::Scrape => Arc::new(ScrapeSource {
            client,
            listing_url: config.scrape_url.clone(),
            charset: config.scrape_charset.clone(),
        }),
    }
}

// ==================== NEWS API ====================

#[derive(Debug, Deserialize)]
struct NewsApiResponse {
    #[serde(default)]
    articles: Vec<NewsApiArticle>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NewsApiArticle {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    source: Option<NewsApiSourceRef>,
    #[serde(default)]
    published_at: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NewsApiSourceRef {
    #[serde(default)]
    name: Option<String>,
}

pub struct NewsApiSource {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    query: String,
}

impl NewsApiSource {
    /// A chave vai no header `X-Api-Key`, nunca na URL
    fn request_url(&self, date: Option<NaiveDate>) -> String {
        let mut url = format!(
            "{}?q={}&language=ko&sortBy=publishedAt&pageSize={}",
            self.base_url,
            urlencoding::encode(&self.query),
            NEWSAPI_PAGE_SIZE
        );
        if let Some(day) = date {
            let day = day.format("%Y-%m-%d");
            url.push_str(&format!("&from={}&to={}", day, day));
        }
        url
    }
}

/// Converte a resposta do NewsAPI para itens normalizados
pub fn parse_newsapi_body(body: &str) -> Result<Vec<NewsItem>, AppError> {
    let response: NewsApiResponse = serde_json::from_str(body)
        .map_err(|e| AppError::UpstreamError(format!("Failed to parse NewsAPI response: {}", e)))?;

    Ok(response
        .articles
        .into_iter()
        .filter_map(|article| {
            let title = article.title.filter(|t| !t.trim().is_empty())?;
            let link = article.url.filter(|u| !u.trim().is_empty())?;
            Some(NewsItem {
                title,
                link,
                press: article.source.and_then(|s| s.name).unwrap_or_default(),
                time: article.published_at.unwrap_or_default(),
            })
        })
        .collect())
}

#[async_trait]
impl NewsSource for NewsApiSource {
    fn name(&self) -> &'static str {
        "newsapi"
    }

    async fn fetch(&self, date: Option<NaiveDate>) -> Result<Vec<NewsItem>, AppError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| AppError::Misconfigured("NEWSAPI_KEY is not set".to_string()))?;

        log::info!("📰 Fetching news from NewsAPI (query: {}, date: {:?})", self.query, date);

        let response = self
            .client
            .get(self.request_url(date))
            .header("Accept", "application/json")
            .header(NEWSAPI_KEY_HEADER, api_key)
            .send()
            .await
            .map_err(|e| AppError::UpstreamError(format!("Failed to fetch from NewsAPI: {}", e.without_url())))?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(AppError::UpstreamError(format!("NewsAPI error {}: {}", status, body)));
        }

        let items = parse_newsapi_body(&body)?;
        log::info!("✅ NewsAPI returned {} items", items.len());
        Ok(items)
    }
}

// ==================== HTML SCRAPE ====================

lazy_static! {
    static ref ITEM_SELECTOR: Selector =
        Selector::parse("ul.type06_headline > li, ul.type06 > li").expect("valid item selector");
    static ref TITLE_SELECTOR: Selector =
        Selector::parse("dt:not(.photo) > a").expect("valid title selector");
    static ref PRESS_SELECTOR: Selector =
        Selector::parse("span.writing").expect("valid press selector");
    static ref TIME_SELECTOR: Selector =
        Selector::parse("span.date").expect("valid time selector");
}

pub struct ScrapeSource {
    client: reqwest::Client,
    listing_url: String,
    charset: String,
}

impl ScrapeSource {
    fn request_url(&self, date: NaiveDate) -> String {
        let separator = if self.listing_url.contains('?') { '&' } else { '?' };
        format!("{}{}date={}", self.listing_url, separator, date.format("%Y%m%d"))
    }
}

fn collapsed_text(element: ElementRef) -> String {
    element.text().collect::<Vec<_>>().join(" ").split_whitespace().collect::<Vec<_>>().join(" ")
}

fn first_text(item: &ElementRef, selector: &Selector) -> String {
    item.select(selector).next().map(collapsed_text).unwrap_or_default()
}

/// Extrai itens da página de listagem; links relativos são resolvidos contra `base`
pub fn parse_listing(html: &str, base: &Url) -> Vec<NewsItem> {
    let document = Html::parse_document(html);

    document
        .select(&ITEM_SELECTOR)
        .filter_map(|item| {
            let anchor = item.select(&TITLE_SELECTOR).next()?;
            let title = collapsed_text(anchor);
            let href = anchor.value().attr("href")?;
            if title.is_empty() {
                return None;
            }
            let link = base.join(href).ok()?.to_string();

            Some(NewsItem {
                title,
                link,
                press: first_text(&item, &PRESS_SELECTOR),
                time: first_text(&item, &TIME_SELECTOR),
            })
        })
        .collect()
}

#[async_trait]
impl NewsSource for ScrapeSource {
    fn name(&self) -> &'static str {
        "scrape"
    }

    async fn fetch(&self, date: Option<NaiveDate>) -> Result<Vec<NewsItem>, AppError> {
        let day = date.unwrap_or_else(|| Local::now().date_naive());
        let url = self.request_url(day);

        log::info!("📰 Scraping news listing: {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| AppError::UpstreamError(format!("Failed to fetch news listing: {}", e.without_url())))?;

        if !response.status().is_success() {
            return Err(AppError::UpstreamError(format!(
                "News listing error: {}",
                response.status()
            )));
        }

        let base = response.url().clone();
        let html = response.text_with_charset(&self.charset).await?;

        let items = parse_listing(&html, &base);
        log::info!("✅ Scraped {} news items", items.len());
        Ok(items)
    }
}
