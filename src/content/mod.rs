//! CMS page content and the contact form

use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;

use crate::config::ClientOptions;
use crate::error::Error;
use crate::fetch::Fetch;

/// A CMS-managed page.
///
/// `payload` is free-form JSON whose shape is owned by whoever edits the
/// page; callers pick out the sections they render.
#[derive(Debug, Clone, Deserialize)]
pub struct PageContent {
    pub slug: String,

    #[serde(default)]
    pub title: String,

    pub payload: serde_json::Value,

    #[serde(default)]
    pub updated_at: String,
}

/// Who a contact-form sender says they are
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactRole {
    Athlete,
    Organizer,
    Partner,
    Other,
}

impl ContactRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContactRole::Athlete => "athlete",
            ContactRole::Organizer => "organizer",
            ContactRole::Partner => "partner",
            ContactRole::Other => "other",
        }
    }
}

impl std::fmt::Display for ContactRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Deserialize)]
struct ContactAck {
    id: i64,
}

/// Client for public site content. No endpoint here requires a session.
pub struct Content {
    /// The base URL for the SportsComp API
    url: String,

    /// HTTP client used for requests
    client: Client,

    /// Client options
    options: ClientOptions,
}

impl Content {
    /// Create a new Content client
    pub(crate) fn new(url: &str, client: Client, options: ClientOptions) -> Self {
        Self {
            url: url.to_string(),
            client,
            options,
        }
    }

    /// Fetch the published page under `slug`
    pub async fn page(&self, slug: &str) -> Result<PageContent, Error> {
        let url = format!("{}/api/content/{}/", self.url, slug);

        Fetch::get(&self.client, &url)
            .header("X-Client-Info", &self.options.client_info)
            .execute::<PageContent>()
            .await
    }

    /// Submit the contact form; returns the id of the stored message
    pub async fn submit_contact(
        &self,
        name: &str,
        email: &str,
        role: ContactRole,
        message: &str,
    ) -> Result<i64, Error> {
        let url = format!("{}/api/contact/submit/", self.url);

        let mut body = HashMap::new();
        body.insert("name".to_string(), name.to_string());
        body.insert("email".to_string(), email.to_string());
        body.insert("role".to_string(), role.as_str().to_string());
        body.insert("message".to_string(), message.to_string());

        let ack = Fetch::post(&self.client, &url)
            .header("X-Client-Info", &self.options.client_info)
            .json(&body)?
            .execute::<ContactAck>()
            .await?;

        Ok(ack.id)
    }
}
