use std::thread;

use log::debug;
use reqwest::blocking::Client;
use reqwest::redirect;

use crate::config::ScraperConfig;
use crate::error::ScrapeError;

/// Anything that can hand back the markup behind a URL.
pub trait PageSource {
    fn fetch_html(&self, url: &str) -> Result<String, ScrapeError>;
}

pub struct Fetcher {
    client: Client,
    polite_delay: std::time::Duration,
}

impl Fetcher {
    pub fn new(config: &ScraperConfig) -> Result<Self, ScrapeError> {
        let redirect_policy = redirect::Policy::custom(|attempt| {
            if attempt.previous().len() > 10 {
                attempt.error("Too many redirects (>10)")
            } else {
                attempt.follow()
            }
        });

        let client = Client::builder()
            .redirect(redirect_policy)
            .timeout(config.request_timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|source| ScrapeError::Network {
                url: config.base_url.clone(),
                source,
            })?;

        Ok(Self {
            client,
            polite_delay: config.polite_delay,
        })
    }
}

impl PageSource for Fetcher {
    /// Sleeps the polite delay, then issues one GET. Non-2xx is an error; no retries.
    fn fetch_html(&self, url: &str) -> Result<String, ScrapeError> {
        thread::sleep(self.polite_delay);
        debug!("GET {url}");

        let network = |source| ScrapeError::Network {
            url: url.to_string(),
            source,
        };

        let resp = self.client.get(url).send().map_err(network)?;
        let status = resp.status();
        if !status.is_success() {
            return Err(ScrapeError::Status {
                url: url.to_string(),
                status,
            });
        }
        resp.text().map_err(network)
    }
}
