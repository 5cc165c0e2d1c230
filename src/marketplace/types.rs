//! Types for the public marketplace

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A sport discipline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sport {
    pub id: i64,
    pub name: String,
    pub slug: String,
}

/// An event category within a sport
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,

    /// ID of the sport this category belongs to
    pub sport: i64,

    #[serde(default)]
    pub sport_name: String,

    pub name: String,
    pub slug: String,
}

/// Venue and address of an event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Location {
    pub venue_name: String,
    pub address_line1: String,
    #[serde(default)]
    pub address_line2: String,
    pub city: String,
    #[serde(default)]
    pub region: String,
    pub country: String,
    #[serde(default)]
    pub postal_code: String,
    #[serde(default)]
    pub latitude: Option<String>,
    #[serde(default)]
    pub longitude: Option<String>,
}

/// One row of the event listing.
///
/// Sport and category appear as IDs here; the detail view carries the full
/// objects.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventSummary {
    pub id: i64,
    pub title: String,
    pub slug: String,
    #[serde(default)]
    pub short_description: String,

    pub sport: i64,
    #[serde(default)]
    pub sport_name: String,
    pub category: i64,
    #[serde(default)]
    pub category_name: String,

    pub event_type: String,
    pub level_required: String,

    pub start_at: String,
    pub end_at: String,
    pub timezone: String,

    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub country: String,

    pub capacity_total: i64,
    pub capacity_reserved: i64,
    pub capacity_available: i64,

    pub is_free: bool,
    pub currency: String,

    #[serde(default)]
    pub cancellation_policy: String,
    #[serde(default)]
    pub cancellation_public: bool,

    #[serde(default)]
    pub cover_image_url: String,
    pub status: String,

    #[serde(default)]
    pub organizer_name: String,
}

/// A sellable ticket type on an event.
///
/// `price` is a decimal carried as a string on the wire, e.g. `"25.00"`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TicketType {
    pub id: i64,
    pub name: String,
    pub price: String,
    pub quantity_total: i64,
    #[serde(default)]
    pub quantity_sold: i64,
    #[serde(default)]
    pub sales_start: Option<String>,
    #[serde(default)]
    pub sales_end: Option<String>,
    #[serde(default)]
    pub is_refundable: bool,
}

/// A media attachment on an event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaItem {
    pub id: i64,
    pub media_type: String,
    pub url: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub is_cover: bool,
    #[serde(default)]
    pub sort_order: i64,
    #[serde(default)]
    pub created_at: String,
}

/// Full detail of a single event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventDetail {
    pub id: i64,
    pub title: String,
    pub slug: String,
    #[serde(default)]
    pub short_description: String,
    #[serde(default)]
    pub description: String,

    pub sport: Sport,
    pub category: Category,

    pub event_type: String,
    pub level_required: String,

    pub start_at: String,
    pub end_at: String,
    pub timezone: String,

    pub location: Location,

    pub capacity_total: i64,
    pub capacity_reserved: i64,
    pub capacity_available: i64,

    pub is_free: bool,
    pub currency: String,

    #[serde(default)]
    pub cancellation_policy: String,
    #[serde(default)]
    pub cancellation_public: bool,

    #[serde(default)]
    pub cover_image_url: String,
    pub status: String,
    #[serde(default)]
    pub published_at: Option<String>,

    #[serde(default)]
    pub organizer_name: String,

    #[serde(default)]
    pub ticket_types: Vec<TicketType>,
    #[serde(default)]
    pub media: Vec<MediaItem>,
}

/// The signed-in account's participation state on an event.
///
/// `capacity_available` is only present on the status query, not in the
/// join and leave responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoinStatus {
    pub joined: bool,
    #[serde(default)]
    pub capacity_available: Option<i64>,
}

/// A favorited event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Favorite {
    pub id: i64,
    pub event: EventSummary,
    #[serde(default)]
    pub created_at: String,
}

/// One of the signed-in account's event participations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Participation {
    pub id: i64,
    pub event: EventSummary,
    #[serde(default)]
    pub created_at: String,
    pub status: String,
}

/// Filters for the event listing. All filters are optional; an empty filter
/// lists every published event.
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    /// Sport slug or numeric ID
    pub sport: Option<String>,

    /// Category slug or numeric ID
    pub category: Option<String>,

    /// Free-text search over title and descriptions
    pub search: Option<String>,

    /// Case-insensitive city match
    pub city: Option<String>,

    /// Only events starting at or after this date or datetime
    pub start_after: Option<String>,

    /// Only events starting at or before this date or datetime
    pub start_before: Option<String>,
}

impl EventFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter by sport slug or numeric ID
    pub fn with_sport(mut self, value: &str) -> Self {
        self.sport = Some(value.to_string());
        self
    }

    /// Filter by category slug or numeric ID
    pub fn with_category(mut self, value: &str) -> Self {
        self.category = Some(value.to_string());
        self
    }

    /// Filter by free-text search
    pub fn with_search(mut self, value: &str) -> Self {
        self.search = Some(value.to_string());
        self
    }

    /// Filter by city
    pub fn with_city(mut self, value: &str) -> Self {
        self.city = Some(value.to_string());
        self
    }

    /// Only events starting at or after `value` (date or datetime)
    pub fn with_start_after(mut self, value: &str) -> Self {
        self.start_after = Some(value.to_string());
        self
    }

    /// Only events starting at or before `value` (date or datetime)
    pub fn with_start_before(mut self, value: &str) -> Self {
        self.start_before = Some(value.to_string());
        self
    }

    pub(crate) fn to_query(&self) -> HashMap<String, String> {
        let mut params = HashMap::new();
        let fields = [
            ("sport", &self.sport),
            ("category", &self.category),
            ("search", &self.search),
            ("city", &self.city),
            ("start_after", &self.start_after),
            ("start_before", &self.start_before),
        ];
        for (key, value) in fields {
            if let Some(value) = value {
                if !value.is_empty() {
                    params.insert(key.to_string(), value.clone());
                }
            }
        }
        params
    }
}
