//! Public marketplace browsing and athlete participation

mod types;

use reqwest::Client;
use std::collections::HashMap;
use std::sync::Arc;

use crate::auth::Auth;
use crate::config::ClientOptions;
use crate::error::Error;
use crate::fetch::Fetch;

pub use types::*;

/// Client for the public marketplace.
///
/// Listing and detail endpoints are public; participation and favorites
/// require a session and go through the authenticated pipeline.
pub struct Marketplace {
    /// The base URL for the SportsComp API
    url: String,

    /// HTTP client used for requests
    client: Client,

    /// Authenticated-request pipeline
    auth: Arc<Auth>,

    /// Client options
    options: ClientOptions,
}

impl Marketplace {
    /// Create a new Marketplace client
    pub(crate) fn new(
        url: &str,
        client: Client,
        auth: Arc<Auth>,
        options: ClientOptions,
    ) -> Self {
        Self {
            url: url.to_string(),
            client,
            auth,
            options,
        }
    }

    fn marketplace_url(&self, path: &str) -> String {
        format!("{}/api/marketplace{}", self.url, path)
    }

    /// List active sports
    pub async fn sports(&self) -> Result<Vec<Sport>, Error> {
        let url = self.marketplace_url("/sports/");

        Fetch::get(&self.client, &url)
            .header("X-Client-Info", &self.options.client_info)
            .execute::<Vec<Sport>>()
            .await
    }

    /// List active categories, optionally narrowed to one sport.
    /// `sport` accepts a slug or a numeric ID.
    pub async fn categories(&self, sport: Option<&str>) -> Result<Vec<Category>, Error> {
        let url = self.marketplace_url("/categories/");

        let mut request = Fetch::get(&self.client, &url)
            .header("X-Client-Info", &self.options.client_info);

        if let Some(sport) = sport {
            let mut params = HashMap::new();
            params.insert("sport".to_string(), sport.to_string());
            request = request.query(params);
        }

        request.execute::<Vec<Category>>().await
    }

    /// List published events matching `filter`, ordered by start time.
    /// The API returns the full matching set as a plain array.
    pub async fn events(&self, filter: &EventFilter) -> Result<Vec<EventSummary>, Error> {
        let url = self.marketplace_url("/events/");

        Fetch::get(&self.client, &url)
            .header("X-Client-Info", &self.options.client_info)
            .query(filter.to_query())
            .execute::<Vec<EventSummary>>()
            .await
    }

    /// Fetch the full detail of a published event by slug
    pub async fn event(&self, slug: &str) -> Result<EventDetail, Error> {
        let url = self.marketplace_url(&format!("/events/{}/", slug));

        Fetch::get(&self.client, &url)
            .header("X-Client-Info", &self.options.client_info)
            .execute::<EventDetail>()
            .await
    }

    /// Whether the signed-in account participates in the event, along with
    /// the remaining capacity
    pub async fn join_status(&self, slug: &str) -> Result<JoinStatus, Error> {
        let url = self.marketplace_url(&format!("/events/{}/join/", slug));
        let request = Fetch::get(&self.client, &url)
            .header("X-Client-Info", &self.options.client_info);

        self.auth
            .request_json(&request, "Failed to load participation")
            .await
    }

    /// Join a free event as the signed-in athlete.
    ///
    /// The API rejects paid events, full events, double joins and
    /// non-athlete accounts.
    pub async fn join(&self, slug: &str) -> Result<JoinStatus, Error> {
        let url = self.marketplace_url(&format!("/events/{}/join/", slug));
        let request = Fetch::post(&self.client, &url)
            .header("X-Client-Info", &self.options.client_info);

        self.auth
            .request_json(&request, "Failed to join event")
            .await
    }

    /// Withdraw the signed-in account from an event. Withdrawing from an
    /// event that was never joined is not an error.
    pub async fn leave(&self, slug: &str) -> Result<JoinStatus, Error> {
        let url = self.marketplace_url(&format!("/events/{}/join/", slug));
        let request = Fetch::delete(&self.client, &url)
            .header("X-Client-Info", &self.options.client_info);

        self.auth
            .request_json(&request, "Failed to leave event")
            .await
    }

    /// List the signed-in account's participations
    pub async fn participations(&self) -> Result<Vec<Participation>, Error> {
        let url = self.marketplace_url("/me/participations/");
        let request = Fetch::get(&self.client, &url)
            .header("X-Client-Info", &self.options.client_info);

        self.auth
            .request_json(&request, "Failed to load participations")
            .await
    }

    /// List the signed-in account's favorites
    pub async fn favorites(&self) -> Result<Vec<Favorite>, Error> {
        let url = self.marketplace_url("/favorites/");
        let request = Fetch::get(&self.client, &url)
            .header("X-Client-Info", &self.options.client_info);

        self.auth
            .request_json(&request, "Failed to load favorites")
            .await
    }

    /// Favorite a published event
    pub async fn add_favorite(&self, event_id: i64) -> Result<Favorite, Error> {
        let url = self.marketplace_url("/favorites/");

        let mut body = HashMap::new();
        body.insert("event_id".to_string(), event_id);

        let request = Fetch::post(&self.client, &url)
            .header("X-Client-Info", &self.options.client_info)
            .json(&body)?;

        self.auth
            .request_json(&request, "Failed to add favorite")
            .await
    }

    /// Remove a favorite by its own ID (not the event's)
    pub async fn remove_favorite(&self, favorite_id: i64) -> Result<(), Error> {
        let url = self.marketplace_url(&format!("/favorites/{}/", favorite_id));
        let request = Fetch::delete(&self.client, &url)
            .header("X-Client-Info", &self.options.client_info);

        let response = self.auth.send(&request).await?;
        crate::fetch::ensure_success(response, "Failed to remove favorite").await
    }
}
