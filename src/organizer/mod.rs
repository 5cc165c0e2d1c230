//! Event management for organizer accounts

mod types;

use reqwest::Client;
use serde::de::DeserializeOwned;
use std::sync::Arc;

use crate::auth::Auth;
use crate::config::ClientOptions;
use crate::error::Error;
use crate::fetch::{ensure_success, parse_response, Fetch, FetchBuilder};
use crate::marketplace::{EventDetail, EventSummary, MediaItem, TicketType};

pub use types::*;

/// Client for the organizer's own events, ticket types and media.
///
/// Every endpoint requires an organizer session and is scoped to events
/// the account owns. A 404 from any of them is reported as
/// [`Error::EventMissing`], the signal that the event behind a stored
/// draft no longer exists.
pub struct Organizer {
    /// The base URL for the SportsComp API
    url: String,

    /// HTTP client used for requests
    client: Client,

    /// Authenticated-request pipeline
    auth: Arc<Auth>,

    /// Client options
    options: ClientOptions,
}

impl Organizer {
    /// Create a new Organizer client
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

    fn organizer_url(&self, path: &str) -> String {
        format!("{}/api/marketplace/organizer{}", self.url, path)
    }

    async fn send_checked(&self, request: &FetchBuilder<'_>) -> Result<reqwest::Response, Error> {
        let response = self.auth.send(request).await?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(Error::EventMissing);
        }
        Ok(response)
    }

    async fn request_json<T: DeserializeOwned>(
        &self,
        request: &FetchBuilder<'_>,
        fallback: &str,
    ) -> Result<T, Error> {
        let response = self.send_checked(request).await?;
        parse_response(response, fallback).await
    }

    /// List the organizer's events, all statuses included
    pub async fn events(&self) -> Result<Vec<EventSummary>, Error> {
        let url = self.organizer_url("/events/");
        let request = Fetch::get(&self.client, &url)
            .header("X-Client-Info", &self.options.client_info);

        self.request_json(&request, "Failed to load events").await
    }

    /// Fetch the full detail of one of the organizer's events
    pub async fn event(&self, event_id: i64) -> Result<EventDetail, Error> {
        let url = self.organizer_url(&format!("/events/{}/", event_id));
        let request = Fetch::get(&self.client, &url)
            .header("X-Client-Info", &self.options.client_info);

        self.request_json(&request, "Failed to load event").await
    }

    /// Create an event
    pub async fn create_event(&self, payload: &EventPayload) -> Result<EventRecord, Error> {
        let url = self.organizer_url("/events/");
        let request = Fetch::post(&self.client, &url)
            .header("X-Client-Info", &self.options.client_info)
            .json(payload)?;

        self.request_json(&request, "Failed to create event").await
    }

    /// Apply a partial update to an event
    pub async fn update_event(
        &self,
        event_id: i64,
        patch: &EventPatch,
    ) -> Result<EventRecord, Error> {
        let url = self.organizer_url(&format!("/events/{}/", event_id));
        let request = Fetch::patch(&self.client, &url)
            .header("X-Client-Info", &self.options.client_info)
            .json(patch)?;

        self.request_json(&request, "Failed to update event").await
    }

    /// Delete an event and everything attached to it
    pub async fn delete_event(&self, event_id: i64) -> Result<(), Error> {
        let url = self.organizer_url(&format!("/events/{}/", event_id));
        let request = Fetch::delete(&self.client, &url)
            .header("X-Client-Info", &self.options.client_info);

        let response = self.send_checked(&request).await?;
        ensure_success(response, "Failed to delete event").await
    }

    /// List an event's ticket types
    pub async fn tickets(&self, event_id: i64) -> Result<Vec<TicketType>, Error> {
        let url = self.organizer_url(&format!("/events/{}/tickets/", event_id));
        let request = Fetch::get(&self.client, &url)
            .header("X-Client-Info", &self.options.client_info);

        self.request_json(&request, "Failed to load ticket types").await
    }

    /// Add a ticket type to an event
    pub async fn create_ticket(
        &self,
        event_id: i64,
        payload: &TicketPayload,
    ) -> Result<TicketType, Error> {
        let url = self.organizer_url(&format!("/events/{}/tickets/", event_id));
        let request = Fetch::post(&self.client, &url)
            .header("X-Client-Info", &self.options.client_info)
            .json(payload)?;

        self.request_json(&request, "Failed to create ticket type").await
    }

    /// Update one of an event's ticket types
    pub async fn update_ticket(
        &self,
        event_id: i64,
        ticket_id: i64,
        payload: &TicketPayload,
    ) -> Result<TicketType, Error> {
        let url = self.organizer_url(&format!("/events/{}/tickets/{}/", event_id, ticket_id));
        let request = Fetch::patch(&self.client, &url)
            .header("X-Client-Info", &self.options.client_info)
            .json(payload)?;

        self.request_json(&request, "Failed to update ticket type").await
    }

    /// Remove a ticket type from an event
    pub async fn delete_ticket(&self, event_id: i64, ticket_id: i64) -> Result<(), Error> {
        let url = self.organizer_url(&format!("/events/{}/tickets/{}/", event_id, ticket_id));
        let request = Fetch::delete(&self.client, &url)
            .header("X-Client-Info", &self.options.client_info);

        let response = self.send_checked(&request).await?;
        ensure_success(response, "Failed to delete ticket type").await
    }

    /// List an event's media attachments
    pub async fn media(&self, event_id: i64) -> Result<Vec<MediaItem>, Error> {
        let url = self.organizer_url(&format!("/events/{}/media/", event_id));
        let request = Fetch::get(&self.client, &url)
            .header("X-Client-Info", &self.options.client_info);

        self.request_json(&request, "Failed to load media").await
    }

    /// Add a media attachment to an event
    pub async fn create_media(
        &self,
        event_id: i64,
        payload: &MediaPayload,
    ) -> Result<MediaItem, Error> {
        let url = self.organizer_url(&format!("/events/{}/media/", event_id));
        let request = Fetch::post(&self.client, &url)
            .header("X-Client-Info", &self.options.client_info)
            .json(payload)?;

        self.request_json(&request, "Failed to create media").await
    }

    /// Update one of an event's media attachments
    pub async fn update_media(
        &self,
        event_id: i64,
        media_id: i64,
        payload: &MediaPayload,
    ) -> Result<MediaItem, Error> {
        let url = self.organizer_url(&format!("/events/{}/media/{}/", event_id, media_id));
        let request = Fetch::patch(&self.client, &url)
            .header("X-Client-Info", &self.options.client_info)
            .json(payload)?;

        self.request_json(&request, "Failed to update media").await
    }

    /// Remove a media attachment from an event
    pub async fn delete_media(&self, event_id: i64, media_id: i64) -> Result<(), Error> {
        let url = self.organizer_url(&format!("/events/{}/media/{}/", event_id, media_id));
        let request = Fetch::delete(&self.client, &url)
            .header("X-Client-Info", &self.options.client_info);

        let response = self.send_checked(&request).await?;
        ensure_success(response, "Failed to delete media").await
    }
}
