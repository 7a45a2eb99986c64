use std::time::Duration;

use reqwest::Client;
use scraper::{Html, Selector};
use tracing::debug;

use super::ExtractionError;

/// Elements whose text never reaches the reader.
const HIDDEN_ELEMENTS: [&str; 3] = ["script", "style", "noscript"];

#[derive(Debug, Clone)]
pub struct WebSettings {
    pub user_agent: String,
    pub proxy: Option<String>,
    pub timeout: Duration,
}

/// Fetches a web page (typically a job posting) and reduces it to visible text.
#[derive(Clone)]
pub struct WebTextSource {
    client: Client,
}

impl WebTextSource {
    pub fn new(settings: &WebSettings) -> Result<Self, reqwest::Error> {
        let mut builder = Client::builder()
            .user_agent(settings.user_agent.as_str())
            .timeout(settings.timeout);

        if let Some(proxy) = &settings.proxy {
            builder = builder.proxy(reqwest::Proxy::all(proxy.as_str())?);
        }

        Ok(Self {
            client: builder.build()?,
        })
    }

    pub async fn fetch_text(&self, url: &str) -> Result<String, ExtractionError> {
        let http_error = |source| ExtractionError::Http {
            url: url.to_string(),
            source,
        };

        let response = self.client.get(url).send().await.map_err(http_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ExtractionError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(http_error)?;
        debug!("Fetched {} ({} bytes of HTML)", url, body.len());

        Ok(html_to_text(&body))
    }
}

/// Visible text of the page body, one text node per line.
pub fn html_to_text(html: &str) -> String {
    let document = Html::parse_document(html);

    let body = Selector::parse("body")
        .ok()
        .and_then(|selector| document.select(&selector).next());
    let root = body.unwrap_or_else(|| document.root_element());

    let mut lines = Vec::new();
    for node in root.descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };

        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .map(|e| HIDDEN_ELEMENTS.contains(&e.name()))
                .unwrap_or(false)
        });
        if hidden {
            continue;
        }

        let text = text.trim();
        if !text.is_empty() {
            lines.push(text.to_string());
        }
    }

    lines.join("\n")
}
