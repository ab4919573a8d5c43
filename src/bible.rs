use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

pub const DEFAULT_API_BASE_URL: &str = "https://bible-api.com";

/// The last-viewed verse, and the shape a favorite is stored in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verse {
    pub reference: String,
    pub translation: String,
    pub text: String,
}

/// One verse inside a multi-verse passage.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct VerseEntry {
    pub book_name: String,
    pub chapter: u32,
    pub verse: u32,
    pub text: String,
}

impl VerseEntry {
    pub fn label(&self) -> String {
        format!("{} {}:{}", self.book_name, self.chapter, self.verse)
    }
}

/// A lookup result, resolved once from whichever shape the API returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Passage {
    Single {
        reference: String,
        translation: String,
        text: String,
    },
    List {
        reference: String,
        translation: String,
        text: String,
        verses: Vec<VerseEntry>,
    },
}

impl Passage {
    pub fn reference(&self) -> &str {
        match self {
            Passage::Single { reference, .. } | Passage::List { reference, .. } => reference,
        }
    }

    pub fn to_verse(&self) -> Verse {
        match self {
            Passage::Single { reference, translation, text }
            | Passage::List { reference, translation, text, .. } => Verse {
                reference: reference.clone(),
                translation: translation.clone(),
                text: text.trim().to_string(),
            },
        }
    }
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("{0}")]
    Request(#[from] reqwest::Error),

    #[error("{0}")]
    Api(String),

    #[error("request failed with status {0}")]
    Status(StatusCode),

    #[error("unexpected response: {0}")]
    Decode(String),
}

#[derive(Deserialize)]
struct ApiPassage {
    reference: String,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    verses: Vec<VerseEntry>,
    #[serde(default)]
    translation_name: String,
}

#[derive(Deserialize)]
struct ApiError {
    error: String,
}

impl TryFrom<ApiPassage> for Passage {
    type Error = FetchError;

    fn try_from(raw: ApiPassage) -> Result<Self, Self::Error> {
        if !raw.verses.is_empty() {
            let text = raw.text.unwrap_or_else(|| {
                raw.verses
                    .iter()
                    .map(|v| v.text.trim())
                    .collect::<Vec<_>>()
                    .join(" ")
            });
            return Ok(Passage::List {
                reference: raw.reference,
                translation: raw.translation_name,
                text,
                verses: raw.verses,
            });
        }

        match raw.text {
            Some(text) => Ok(Passage::Single {
                reference: raw.reference,
                translation: raw.translation_name,
                text,
            }),
            None => Err(FetchError::Decode(format!(
                "passage {} has no text",
                raw.reference
            ))),
        }
    }
}

/// Turn a status and body into a passage, preferring the API's own error text.
pub fn parse_response(status: StatusCode, body: &str) -> Result<Passage, FetchError> {
    if !status.is_success() {
        return Err(match serde_json::from_str::<ApiError>(body) {
            Ok(api) => FetchError::Api(api.error),
            Err(_) => FetchError::Status(status),
        });
    }

    match serde_json::from_str::<ApiPassage>(body) {
        Ok(raw) => Passage::try_from(raw),
        Err(e) => match serde_json::from_str::<ApiError>(body) {
            Ok(api) => Err(FetchError::Api(api.error)),
            Err(_) => Err(FetchError::Decode(e.to_string())),
        },
    }
}

#[derive(Debug, Clone)]
pub struct BibleClient {
    client: Client,
    base_url: String,
}

impl BibleClient {
    pub fn new(base_url: &str) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn url_for(&self, query: &str) -> String {
        format!("{}/{}", self.base_url, urlencoding::encode(query))
    }

    pub async fn fetch(&self, query: &str) -> Result<Passage, FetchError> {
        let url = self.url_for(query);
        debug!(%url, "fetching passage");

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        let result = parse_response(status, &body);
        if let Err(e) = &result {
            warn!(query, error = %e, "passage lookup failed");
        }
        result
    }
}
