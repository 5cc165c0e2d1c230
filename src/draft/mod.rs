//! Locally persisted event draft and the creation wizard
//!
//! The draft mirrors the multi-step creation form: an info block, a pricing
//! block with ticket rows, and a media block with attachment rows. It is
//! persisted as a single JSON record so a half-finished event survives
//! restarts, and re-reads are always merged over the block defaults, so a
//! record written by an older build never fails to load.

mod reconcile;
mod wizard;

use crate::error::Error;
use crate::store::{LocalStore, DRAFT_KEY};
use log::warn;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub use reconcile::{reconcile_rows, RowOutcome, RowSync};
pub use wizard::{DraftWizard, WizardState};

/// Stored draft schema version. Bumped when the draft shape changes in a
/// way field defaults cannot absorb.
const DRAFT_VERSION: u32 = 1;

/// Step-1 fields of the event draft. All values are kept as the raw strings
/// the form holds; dates and times stay split until submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InfoDraft {
    pub title: String,
    pub short_description: String,
    pub description: String,

    /// Sport ID as entered, numeric string
    pub sport_id: String,

    /// Category ID as entered, numeric string
    pub category_id: String,

    pub event_type: String,
    pub level_required: String,

    /// Start date, `YYYY-MM-DD`
    pub start_date: String,

    /// Start time, `HH:MM`
    pub start_time: String,

    pub end_date: String,
    pub end_time: String,

    pub timezone: String,

    pub venue_name: String,
    pub address_line1: String,
    pub address_line2: String,
    pub city: String,
    pub region: String,
    pub country: String,
    pub postal_code: String,
}

impl Default for InfoDraft {
    fn default() -> Self {
        Self {
            title: String::new(),
            short_description: String::new(),
            description: String::new(),
            sport_id: String::new(),
            category_id: String::new(),
            event_type: "tournament".to_string(),
            level_required: "all".to_string(),
            start_date: String::new(),
            start_time: String::new(),
            end_date: String::new(),
            end_time: String::new(),
            timezone: "UTC".to_string(),
            venue_name: String::new(),
            address_line1: String::new(),
            address_line2: String::new(),
            city: String::new(),
            region: String::new(),
            country: "Tunisie".to_string(),
            postal_code: String::new(),
        }
    }
}

/// One locally edited ticket row. `id` is present once the row has been
/// seen server-side; price and quantity stay strings until submission.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TicketRow {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
    pub price: String,
    pub quantity: String,
}

/// Step-2 fields of the event draft
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PricingDraft {
    /// Total capacity as entered, numeric string
    pub capacity_total: String,

    pub is_free: bool,
    pub currency: String,
    pub tickets: Vec<TicketRow>,
    pub cancellation_policy: String,
    pub cancellation_public: bool,
}

impl Default for PricingDraft {
    fn default() -> Self {
        Self {
            capacity_total: String::new(),
            is_free: false,
            currency: "TND".to_string(),
            tickets: vec![TicketRow {
                id: None,
                name: "Tarif standard".to_string(),
                price: String::new(),
                quantity: String::new(),
            }],
            cancellation_policy: String::new(),
            cancellation_public: false,
        }
    }
}

/// One locally edited media row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MediaRow {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub url: String,
    pub media_type: String,
    pub title: String,
}

impl Default for MediaRow {
    fn default() -> Self {
        Self {
            id: None,
            url: String::new(),
            media_type: "image".to_string(),
            title: String::new(),
        }
    }
}

/// Step-3 fields of the event draft
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MediaDraft {
    pub cover_image_url: String,
    pub items: Vec<MediaRow>,
}

impl Default for MediaDraft {
    fn default() -> Self {
        Self {
            cover_image_url: String::new(),
            items: vec![MediaRow::default(), MediaRow::default(), MediaRow::default()],
        }
    }
}

/// The whole persisted draft. `event_id` appears once step 1 has created
/// the event server-side.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EventDraft {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_id: Option<i64>,
    pub info: InfoDraft,
    pub pricing: PricingDraft,
    pub media: MediaDraft,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct DraftEnvelope {
    version: u32,
    draft: EventDraft,
}

/// Typed persistence for the event draft.
///
/// Writes wrap the draft in a versioned envelope. Reads accept the current
/// envelope and, for records written before versioning existed, a bare
/// draft. Anything else is discarded and reads as the default draft, so a
/// stale record can never wedge the wizard.
pub struct DraftStore {
    store: Arc<LocalStore>,
}

impl DraftStore {
    pub fn new(store: Arc<LocalStore>) -> Self {
        Self { store }
    }

    /// The stored draft merged over defaults, or the default draft when
    /// nothing usable is stored
    pub fn read(&self) -> EventDraft {
        let Some(raw) = self.store.get_raw(DRAFT_KEY) else {
            return EventDraft::default();
        };

        if let Ok(envelope) = serde_json::from_str::<DraftEnvelope>(&raw) {
            if envelope.version == DRAFT_VERSION {
                return envelope.draft;
            }
            warn!(
                "discarding stored draft with unsupported version {}",
                envelope.version
            );
            return EventDraft::default();
        }

        // records from before the envelope existed are a bare draft
        match serde_json::from_str::<EventDraft>(&raw) {
            Ok(draft) => draft,
            Err(err) => {
                warn!("discarding malformed stored draft: {}", err);
                EventDraft::default()
            }
        }
    }

    /// Persist `draft` under the current schema version
    pub fn write(&self, draft: &EventDraft) -> Result<(), Error> {
        let envelope = DraftEnvelope {
            version: DRAFT_VERSION,
            draft: draft.clone(),
        };
        self.store.set(DRAFT_KEY, &envelope)
    }

    /// Apply `change` to the current draft and persist the result
    pub fn update(&self, change: impl FnOnce(&mut EventDraft)) -> Result<EventDraft, Error> {
        let mut draft = self.read();
        change(&mut draft);
        self.write(&draft)?;
        Ok(draft)
    }

    /// Remove the stored draft
    pub fn clear(&self) -> Result<(), Error> {
        self.store.remove(DRAFT_KEY)
    }
}
