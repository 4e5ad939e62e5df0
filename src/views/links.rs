//! Short-link administration
//!
//! Links are owned by the server; the view only lists, creates and deletes
//! them, and refetches the list after every mutation.

use super::ViewResult;
use crate::client::ApiClient;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{de, Deserialize, Deserializer, Serialize};

const LINKS_PATH: &str = "/url";
const SHRINK_PATH: &str = "/url/shrink";

/// A short link as returned by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortLink {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub short_url: String,
    #[serde(deserialize_with = "created_at")]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub clicks: u64,
}

impl ShortLink {
    /// URL placed on the clipboard by the copy action
    pub fn copy_url(&self) -> String {
        format!("http://{}", self.short_url)
    }
}

/// RFC 3339, or a date-time without offset taken as UTC
fn created_at<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
    let raw = String::deserialize(deserializer)?;
    if let Ok(dt) = DateTime::parse_from_rfc3339(&raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(&raw, "%Y-%m-%d %H:%M:%S%.f"))
        .map(|naive| naive.and_utc())
        .map_err(|e| de::Error::custom(format!("invalid createdAt {:?}: {}", raw, e)))
}

#[derive(Serialize)]
struct NewLink<'a> {
    name: &'a str,
    url: &'a str,
}

/// The links screen
#[derive(Debug)]
pub struct LinksView {
    client: ApiClient,
    links: Vec<ShortLink>,
}

impl LinksView {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            links: Vec::new(),
        }
    }

    /// Links from the last successful fetch
    pub fn links(&self) -> &[ShortLink] {
        &self.links
    }

    /// Fetch the link list
    pub async fn refresh(&mut self) -> ViewResult<&[ShortLink]> {
        match self.client.get::<Vec<ShortLink>>(LINKS_PATH).await {
            Ok(links) => {
                self.links = links;
                Ok(&self.links)
            }
            Err(e) => {
                tracing::error!(error = %e, "Error fetching links");
                Err(e.into())
            }
        }
    }

    /// Shorten `url` under `name`, then refetch
    pub async fn create(&mut self, name: &str, url: &str) -> ViewResult<ShortLink> {
        let created = self
            .client
            .post::<_, ShortLink>(SHRINK_PATH, &NewLink { name, url })
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Error creating new link");
                e
            })?;

        self.refresh().await?;
        Ok(created)
    }

    /// Delete a link by id, then refetch
    pub async fn delete(&mut self, id: &str) -> ViewResult<()> {
        let path = format!("{}/{}", LINKS_PATH, urlencoding::encode(id));
        self.client
            .delete::<serde_json::Value>(&path)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, id, "Error deleting link");
                e
            })?;

        self.refresh().await?;
        Ok(())
    }
}
