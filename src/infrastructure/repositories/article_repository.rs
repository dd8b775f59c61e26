use async_trait::async_trait;
use html2text::from_read;
use regex::Regex;
use std::sync::OnceLock;
use std::time::Duration;

const USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

const NOISE_ELEMENTS: [&str; 7] = [
    "script", "style", "noscript", "nav", "header", "footer", "aside",
];

/// Title and readable body of a web page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Article {
    pub title: Option<String>,
    pub text: String,
}

/// Downloads a page and extracts the article it carries
#[async_trait]
pub trait ArticleRepository: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Article, String>;
}

pub struct HttpArticleRepository {
    http_client: reqwest::Client,
}

impl HttpArticleRepository {
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self { http_client })
    }
}

#[async_trait]
impl ArticleRepository for HttpArticleRepository {
    async fn fetch(&self, url: &str) -> Result<Article, String> {
        let parsed = reqwest::Url::parse(url).map_err(|e| format!("Invalid URL: {}", e))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(format!("Unsupported URL scheme: {}", parsed.scheme()));
        }

        tracing::debug!(url = %url, "Fetching article");

        let response = self.http_client.get(parsed).send().await.map_err(|e| {
            tracing::warn!(url = %url, error = %e, "Article request failed");
            format!("Failed to fetch article: {}", e)
        })?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(url = %url, status = %status, "Article server returned an error");
            return Err(format!("Article server returned status {}", status));
        }

        let html = response
            .text()
            .await
            .map_err(|e| format!("Failed to read article body: {}", e))?;

        let article = extract_article(&html);
        tracing::info!(
            url = %url,
            title = ?article.title,
            text_length = article.text.chars().count(),
            "Article extracted"
        );

        Ok(article)
    }
}

/// Extract the title and the readable text of an HTML document
pub fn extract_article(html: &str) -> Article {
    Article {
        title: extract_title(html),
        text: extract_text(html),
    }
}

fn extract_title(html: &str) -> Option<String> {
    static OG_TITLE: OnceLock<[Regex; 2]> = OnceLock::new();
    static TITLE: OnceLock<Regex> = OnceLock::new();

    let og_title = OG_TITLE.get_or_init(|| {
        [
            Regex::new(r#"(?is)<meta[^>]+property\s*=\s*["']og:title["'][^>]*content\s*=\s*(?:"([^"]*)"|'([^']*)')"#)
                .unwrap(),
            Regex::new(r#"(?is)<meta[^>]+content\s*=\s*(?:"([^"]*)"|'([^']*)')[^>]*property\s*=\s*["']og:title["']"#)
                .unwrap(),
        ]
    });
    let title = TITLE.get_or_init(|| Regex::new(r"(?is)<title[^>]*>(.*?)</title>").unwrap());

    og_title
        .iter()
        .chain(std::iter::once(title))
        .filter_map(|pattern| pattern.captures(html))
        .filter_map(|captures| captures.get(1).or_else(|| captures.get(2)))
        .map(|m| decode_inline(m.as_str()))
        .find(|candidate| !candidate.is_empty())
}

fn extract_text(html: &str) -> String {
    static ARTICLE: OnceLock<Regex> = OnceLock::new();
    static BODY: OnceLock<Regex> = OnceLock::new();
    static NOISE: OnceLock<Vec<Regex>> = OnceLock::new();

    let article = ARTICLE.get_or_init(|| Regex::new(r"(?is)<article\b[^>]*>(.*)</article>").unwrap());
    let body = BODY.get_or_init(|| Regex::new(r"(?is)<body\b[^>]*>(.*)</body>").unwrap());
    let noise = NOISE.get_or_init(|| {
        NOISE_ELEMENTS
            .iter()
            .map(|tag| Regex::new(&format!(r"(?is)<{tag}\b[^>]*>.*?</{tag}>")).unwrap())
            .chain(std::iter::once(Regex::new(r"(?s)<!--.*?-->").unwrap()))
            .collect()
    });

    let region = article
        .captures(html)
        .or_else(|| body.captures(html))
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str())
        .unwrap_or(html);

    let mut cleaned = region.to_string();
    for pattern in noise {
        cleaned = pattern.replace_all(&cleaned, " ").into_owned();
    }

    let rendered = from_read(cleaned.as_bytes(), usize::MAX);
    normalize_paragraphs(&strip_markdown(&rendered))
}

/// Remove link footnotes and markdown decoration added by the HTML renderer
fn strip_markdown(rendered: &str) -> String {
    static RULES: OnceLock<Vec<(Regex, &'static str)>> = OnceLock::new();

    let rules = RULES.get_or_init(|| {
        vec![
            (Regex::new(r"(?m)^\[\d+\]:.*$").unwrap(), ""),
            (Regex::new(r"!?\[([^\]]*)\]\[\d+\]").unwrap(), "$1"),
            (Regex::new(r"!?\[([^\]]*)\]\([^)]*\)").unwrap(), "$1"),
            (Regex::new(r"(?m)^[ \t]*#+[ \t]*").unwrap(), ""),
            (Regex::new(r"(?m)^[ \t]*>[ \t]?").unwrap(), ""),
            (Regex::new(r"(?m)^[ \t]*[─━\-=*_]{3,}[ \t]*$").unwrap(), ""),
            (Regex::new(r"(?m)^[ \t]*[*\-+][ \t]+").unwrap(), ""),
            (Regex::new(r"\*\*|__|`").unwrap(), ""),
            (Regex::new(r"\*([^*\n]+)\*").unwrap(), "$1"),
        ]
    });

    rules.iter().fold(rendered.to_string(), |text, (pattern, replacement)| {
        pattern.replace_all(&text, *replacement).into_owned()
    })
}

/// Collapse whitespace inside paragraphs and keep a blank line between them
fn normalize_paragraphs(text: &str) -> String {
    static PARAGRAPH_BREAK: OnceLock<Regex> = OnceLock::new();
    let paragraph_break = PARAGRAPH_BREAK.get_or_init(|| Regex::new(r"\n[ \t]*\n").unwrap());

    paragraph_break
        .split(text)
        .map(|paragraph| paragraph.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|paragraph| !paragraph.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Decode entities in a short inline fragment such as a title
fn decode_inline(fragment: &str) -> String {
    from_read(fragment.as_bytes(), usize::MAX)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
