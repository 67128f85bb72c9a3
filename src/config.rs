use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_BOOK_NAME: &str = "The Final Empire";

/// Fixed knobs for one scraper run. Built once in `main` and handed to each
/// stage by reference; nothing reads these values from global state.
#[derive(Debug, Clone)]
pub struct ScraperConfig {
    pub base_url: String,
    pub search_path: String,
    pub book_path_prefix: String,
    pub request_timeout: Duration,
    pub polite_delay: Duration,
    pub max_reviews: usize,
    pub user_agent: String,
    pub output_dir: PathBuf,
    pub source_tag: String,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.goodreads.com".into(),
            search_path: "/search?q=".into(),
            book_path_prefix: "/book/show".into(),
            request_timeout: Duration::from_secs(15),
            polite_delay: Duration::from_millis(500),
            max_reviews: 3,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/123.0.0.0 Safari/537.36".into(),
            output_dir: PathBuf::from("parsed_data"),
            source_tag: "goodreads".into(),
        }
    }
}

impl ScraperConfig {
    /// `<base>/search?q=<query>`, with the query form-encoded (spaces as `+`).
    pub fn search_url(&self, query: &str) -> String {
        let encoded = urlencoding::encode(query).replace("%20", "+");
        format!("{}{}{}", self.base_url, self.search_path, encoded)
    }

    pub fn absolute_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}
