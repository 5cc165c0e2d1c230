//! Write-side types for event management

use serde::{Deserialize, Serialize};

use crate::marketplace::Location;

/// Venue and address fields sent when creating or updating an event
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LocationPayload {
    pub venue_name: String,
    pub address_line1: String,
    pub address_line2: String,
    pub city: String,
    pub region: String,
    pub country: String,
    pub postal_code: String,
}

/// Payload for creating an event.
///
/// Optional fields are omitted from the request entirely when unset, so the
/// API applies its own defaults.
#[derive(Debug, Clone, Serialize)]
pub struct EventPayload {
    pub title: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub short_description: Option<String>,

    pub description: String,

    /// Sport ID
    pub sport: i64,

    /// Category ID
    pub category: i64,

    pub event_type: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub level_required: Option<String>,

    /// Start instant as an ISO 8601 datetime
    pub start_at: String,

    /// End instant as an ISO 8601 datetime; must be after `start_at`
    pub end_at: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,

    pub location: LocationPayload,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacity_total: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_free: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancellation_policy: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancellation_public: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_image_url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// Partial update for an event; only the fields that are set are sent
#[derive(Debug, Clone, Default, Serialize)]
pub struct EventPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub short_description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub sport: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_type: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub level_required: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_at: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_at: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<LocationPayload>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacity_total: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_free: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancellation_policy: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancellation_public: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_image_url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// View of an event as returned by the create and update endpoints.
///
/// Unlike [`crate::marketplace::EventDetail`], sport and category appear
/// as IDs here.
#[derive(Debug, Clone, Deserialize)]
pub struct EventRecord {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub short_description: String,
    #[serde(default)]
    pub description: String,
    pub sport: i64,
    pub category: i64,
    pub event_type: String,
    pub level_required: String,
    pub start_at: String,
    pub end_at: String,
    pub timezone: String,
    pub location: Location,
    pub capacity_total: i64,
    pub is_free: bool,
    pub currency: String,
    #[serde(default)]
    pub cancellation_policy: String,
    #[serde(default)]
    pub cancellation_public: bool,
    #[serde(default)]
    pub cover_image_url: String,
    pub status: String,
}

/// Payload for creating or updating a ticket type.
///
/// Free events only accept zero prices; the API rejects anything else.
#[derive(Debug, Clone, Serialize)]
pub struct TicketPayload {
    pub name: String,
    pub price: f64,
    pub quantity_total: i64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub sales_start: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub sales_end: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_refundable: Option<bool>,
}

impl TicketPayload {
    pub fn new(name: &str, price: f64, quantity_total: i64) -> Self {
        Self {
            name: name.to_string(),
            price,
            quantity_total,
            sales_start: None,
            sales_end: None,
            is_refundable: None,
        }
    }
}

/// Payload for creating or updating a media attachment
#[derive(Debug, Clone, Serialize)]
pub struct MediaPayload {
    pub media_type: String,
    pub url: String,
    pub title: String,
    pub is_cover: bool,
    pub sort_order: i64,
}
