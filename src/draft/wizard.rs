//! The step-by-step event creation wizard

use log::{debug, warn};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use crate::draft::reconcile::{prepare_media, prepare_tickets, reconcile_rows, RowSync};
use crate::draft::{DraftStore, EventDraft, InfoDraft, MediaDraft, MediaRow, PricingDraft, TicketRow};
use crate::error::Error;
use crate::marketplace::EventDetail;
use crate::organizer::{EventPatch, EventPayload, LocationPayload, MediaPayload, Organizer, TicketPayload};
use crate::store::LocalStore;
use async_trait::async_trait;

/// Progress of the creation wizard. States advance only on successful
/// submission of the corresponding step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardState {
    /// No event created yet
    Empty,
    /// The event exists server-side with its basic information
    InfoEntered,
    /// Capacity and ticket types are saved
    Priced,
    /// Cover image and media attachments are saved
    MediaAttached,
    /// The review detail has been fetched
    Reviewed,
    /// Submitted for moderation; the local draft is gone
    Published,
}

/// Drives an event draft through info, pricing, media, review and
/// submission, persisting it locally between steps.
///
/// Each submitting step first patches the parent event, then reconciles its
/// child rows (see [`reconcile_rows`]). A 404 for the cached event id from
/// any step, load or submission, invalidates the whole draft: the stored
/// record is removed, the remembered row ids are dropped and the state
/// resets to [`WizardState::Empty`]. The caller sees
/// [`Error::EventMissing`] and should send the user back to step one.
///
/// The draft record itself is shared through the underlying store, so two
/// wizards over the same storage directory observe each other's writes
/// last-write-wins; the remembered row ids are per wizard instance.
pub struct DraftWizard {
    organizer: Arc<Organizer>,
    drafts: DraftStore,
    state: Mutex<WizardState>,
    ticket_ids: Mutex<HashSet<i64>>,
    media_ids: Mutex<HashSet<i64>>,
}

impl DraftWizard {
    pub(crate) fn new(organizer: Arc<Organizer>, store: Arc<LocalStore>) -> Self {
        let drafts = DraftStore::new(store);

        // resume a stored draft that already has its event
        let state = if drafts.read().event_id.is_some() {
            WizardState::InfoEntered
        } else {
            WizardState::Empty
        };

        Self {
            organizer,
            drafts,
            state: Mutex::new(state),
            ticket_ids: Mutex::new(HashSet::new()),
            media_ids: Mutex::new(HashSet::new()),
        }
    }

    /// The wizard's current state
    pub fn state(&self) -> WizardState {
        *self.state.lock().unwrap()
    }

    /// The current draft, merged over defaults
    pub fn draft(&self) -> EventDraft {
        self.drafts.read()
    }

    /// Persist the info block locally without touching the server
    pub fn save_info(&self, info: &InfoDraft) -> Result<EventDraft, Error> {
        self.drafts.update(|draft| draft.info = info.clone())
    }

    /// Persist the pricing block locally without touching the server
    pub fn save_pricing(&self, pricing: &PricingDraft) -> Result<EventDraft, Error> {
        self.drafts.update(|draft| draft.pricing = pricing.clone())
    }

    /// Persist the media block locally without touching the server
    pub fn save_media(&self, media: &MediaDraft) -> Result<EventDraft, Error> {
        self.drafts.update(|draft| draft.media = media.clone())
    }

    /// Throw away the draft and start over
    pub fn discard(&self) -> Result<(), Error> {
        self.drafts.clear()?;
        self.forget_rows();
        *self.state.lock().unwrap() = WizardState::Empty;
        Ok(())
    }

    /// Submit step 1: create the event, or patch it when the draft already
    /// carries its id. The server-assigned id is written into the draft for
    /// the following steps.
    pub async fn submit_info(&self, info: &InfoDraft) -> Result<EventDraft, Error> {
        let payload = build_info_payload(info)?;
        self.save_info(info)?;

        let event_id = self.drafts.read().event_id;
        let record = match event_id {
            Some(id) => {
                let patch = build_info_patch(&payload);
                self.check_missing(self.organizer.update_event(id, &patch).await)?
            }
            None => self.organizer.create_event(&payload).await?,
        };

        let updated = self.drafts.update(|draft| {
            draft.event_id = Some(record.id);
            draft.info = info.clone();
        })?;

        debug!("event draft saved as event {}", record.id);
        *self.state.lock().unwrap() = WizardState::InfoEntered;
        Ok(updated)
    }

    /// Pull current server state into the pricing block: capacity (only
    /// when not set locally), the free flag, the currency and the ticket
    /// rows. A non-empty server ticket list replaces the local rows and
    /// becomes the remembered set. Without a cached event id this is a
    /// no-op.
    pub async fn load_pricing(&self) -> Result<EventDraft, Error> {
        let draft = self.drafts.read();
        let Some(event_id) = draft.event_id else {
            return Ok(draft);
        };

        let event = self.check_missing(self.organizer.event(event_id).await)?;
        let tickets = self.check_missing(self.organizer.tickets(event_id).await)?;

        let updated = self.drafts.update(|draft| {
            if draft.pricing.capacity_total.is_empty() {
                draft.pricing.capacity_total = event.capacity_total.to_string();
            }
            draft.pricing.is_free = event.is_free;
            if !event.currency.is_empty() {
                draft.pricing.currency = event.currency.clone();
            }
            if !tickets.is_empty() {
                draft.pricing.tickets = tickets
                    .iter()
                    .map(|ticket| TicketRow {
                        id: Some(ticket.id),
                        name: ticket.name.clone(),
                        price: ticket.price.clone(),
                        quantity: ticket.quantity_total.to_string(),
                    })
                    .collect();
            }
        })?;

        if !tickets.is_empty() {
            *self.ticket_ids.lock().unwrap() = tickets.iter().map(|ticket| ticket.id).collect();
        }

        Ok(updated)
    }

    /// Submit step 2: patch capacity, pricing flags and the cancellation
    /// policy onto the event, then reconcile the ticket rows.
    pub async fn submit_pricing(&self, pricing: &PricingDraft) -> Result<EventDraft, Error> {
        let draft = self.save_pricing(pricing)?;
        let Some(event_id) = draft.event_id else {
            return Err(Error::general("Create the event before pricing it"));
        };

        let patch = EventPatch {
            capacity_total: pricing.capacity_total.trim().parse::<i64>().ok(),
            is_free: Some(pricing.is_free),
            currency: Some(pricing.currency.clone()),
            cancellation_policy: Some(pricing.cancellation_policy.clone()),
            cancellation_public: Some(pricing.cancellation_public),
            status: Some("draft".to_string()),
            ..EventPatch::default()
        };
        self.check_missing(self.organizer.update_event(event_id, &patch).await)?;

        let prepared = prepare_tickets(pricing);
        let sync = TicketSync {
            organizer: &self.organizer,
            event_id,
            is_free: pricing.is_free,
        };
        let remembered = self.ticket_ids.lock().unwrap().clone();
        let outcome = self.check_missing(reconcile_rows(&sync, &prepared, &remembered).await)?;

        let updated = self.drafts.update(|draft| {
            draft.pricing = pricing.clone();
            if !outcome.rows.is_empty() {
                draft.pricing.tickets = outcome.rows.clone();
            }
        })?;
        *self.ticket_ids.lock().unwrap() = outcome.submitted;

        *self.state.lock().unwrap() = WizardState::Priced;
        Ok(updated)
    }

    /// Pull current server state into the media block: the cover image URL
    /// (only when not set locally) and the media rows. A non-empty server
    /// list replaces the local rows and becomes the remembered set. Without
    /// a cached event id this is a no-op.
    pub async fn load_media(&self) -> Result<EventDraft, Error> {
        let draft = self.drafts.read();
        let Some(event_id) = draft.event_id else {
            return Ok(draft);
        };

        let event = self.check_missing(self.organizer.event(event_id).await)?;
        let media = self.check_missing(self.organizer.media(event_id).await)?;

        let updated = self.drafts.update(|draft| {
            if draft.media.cover_image_url.is_empty() {
                draft.media.cover_image_url = event.cover_image_url.clone();
            }
            if !media.is_empty() {
                draft.media.items = media
                    .iter()
                    .map(|item| MediaRow {
                        id: Some(item.id),
                        url: item.url.clone(),
                        media_type: item.media_type.clone(),
                        title: item.title.clone(),
                    })
                    .collect();
            }
        })?;

        if !media.is_empty() {
            *self.media_ids.lock().unwrap() = media.iter().map(|item| item.id).collect();
        }

        Ok(updated)
    }

    /// Submit step 3: patch the cover image onto the event, then reconcile
    /// the media rows.
    pub async fn submit_media(&self, media: &MediaDraft) -> Result<EventDraft, Error> {
        let draft = self.save_media(media)?;
        let Some(event_id) = draft.event_id else {
            return Err(Error::general("Create the event before attaching media"));
        };

        let patch = EventPatch {
            cover_image_url: Some(media.cover_image_url.clone()),
            status: Some("draft".to_string()),
            ..EventPatch::default()
        };
        self.check_missing(self.organizer.update_event(event_id, &patch).await)?;

        let prepared = prepare_media(media);
        let sync = MediaSync {
            organizer: &self.organizer,
            event_id,
        };
        let remembered = self.media_ids.lock().unwrap().clone();
        let outcome = self.check_missing(reconcile_rows(&sync, &prepared, &remembered).await)?;

        let updated = self.drafts.update(|draft| {
            draft.media = media.clone();
            if !outcome.rows.is_empty() {
                draft.media.items = outcome.rows.clone();
            }
        })?;
        *self.media_ids.lock().unwrap() = outcome.submitted;

        *self.state.lock().unwrap() = WizardState::MediaAttached;
        Ok(updated)
    }

    /// Fetch the full event detail for the review step
    pub async fn review(&self) -> Result<EventDetail, Error> {
        let Some(event_id) = self.drafts.read().event_id else {
            return Err(Error::general("Nothing to review yet"));
        };

        let detail = self.check_missing(self.organizer.event(event_id).await)?;
        *self.state.lock().unwrap() = WizardState::Reviewed;
        Ok(detail)
    }

    /// Submit the event for moderation and drop the local draft
    pub async fn publish(&self) -> Result<(), Error> {
        let Some(event_id) = self.drafts.read().event_id else {
            return Err(Error::general("Nothing to publish yet"));
        };

        let patch = EventPatch {
            status: Some("pending".to_string()),
            ..EventPatch::default()
        };
        self.check_missing(self.organizer.update_event(event_id, &patch).await)?;

        self.drafts.clear()?;
        self.forget_rows();
        *self.state.lock().unwrap() = WizardState::Published;
        Ok(())
    }

    /// Invalidate everything when the event disappeared server-side
    fn check_missing<T>(&self, result: Result<T, Error>) -> Result<T, Error> {
        if let Err(err) = &result {
            if err.is_event_missing() {
                warn!("event behind the draft is gone, invalidating the draft");
                if let Err(err) = self.drafts.clear() {
                    warn!("failed to clear stored draft: {}", err);
                }
                self.forget_rows();
                *self.state.lock().unwrap() = WizardState::Empty;
            }
        }
        result
    }

    fn forget_rows(&self) {
        self.ticket_ids.lock().unwrap().clear();
        self.media_ids.lock().unwrap().clear();
    }
}

/// Compose a date and a time into an ISO 8601 UTC instant
fn combine_date_time(date: &str, time: &str) -> Option<String> {
    let date = date.trim();
    let time = time.trim();
    if date.is_empty() || time.is_empty() {
        return None;
    }
    Some(format!("{}T{}:00Z", date, time))
}

fn build_info_payload(info: &InfoDraft) -> Result<EventPayload, Error> {
    let required = [
        &info.title,
        &info.sport_id,
        &info.category_id,
        &info.description,
        &info.start_date,
        &info.start_time,
        &info.end_date,
        &info.end_time,
        &info.venue_name,
        &info.address_line1,
        &info.city,
        &info.country,
    ];
    if required.iter().any(|field| field.trim().is_empty()) {
        return Err(Error::general("Missing required event fields"));
    }

    let sport = info
        .sport_id
        .trim()
        .parse::<i64>()
        .map_err(|_| Error::general("Invalid sport id"))?;
    let category = info
        .category_id
        .trim()
        .parse::<i64>()
        .map_err(|_| Error::general("Invalid category id"))?;

    let start_at = combine_date_time(&info.start_date, &info.start_time)
        .ok_or_else(|| Error::general("Invalid start date or time"))?;
    let end_at = combine_date_time(&info.end_date, &info.end_time)
        .ok_or_else(|| Error::general("Invalid end date or time"))?;

    let timezone = if info.timezone.is_empty() {
        "UTC".to_string()
    } else {
        info.timezone.clone()
    };

    Ok(EventPayload {
        title: info.title.clone(),
        short_description: Some(info.short_description.clone()),
        description: info.description.clone(),
        sport,
        category,
        event_type: info.event_type.clone(),
        level_required: Some(info.level_required.clone()),
        start_at,
        end_at,
        timezone: Some(timezone),
        location: LocationPayload {
            venue_name: info.venue_name.clone(),
            address_line1: info.address_line1.clone(),
            address_line2: info.address_line2.clone(),
            city: info.city.clone(),
            region: info.region.clone(),
            country: info.country.clone(),
            postal_code: info.postal_code.clone(),
        },
        capacity_total: None,
        is_free: None,
        currency: None,
        cancellation_policy: None,
        cancellation_public: None,
        cover_image_url: None,
        status: Some("draft".to_string()),
    })
}

fn build_info_patch(payload: &EventPayload) -> EventPatch {
    EventPatch {
        title: Some(payload.title.clone()),
        short_description: payload.short_description.clone(),
        description: Some(payload.description.clone()),
        sport: Some(payload.sport),
        category: Some(payload.category),
        event_type: Some(payload.event_type.clone()),
        level_required: payload.level_required.clone(),
        start_at: Some(payload.start_at.clone()),
        end_at: Some(payload.end_at.clone()),
        timezone: payload.timezone.clone(),
        location: Some(payload.location.clone()),
        status: payload.status.clone(),
        ..EventPatch::default()
    }
}

/// Ticket rows against the organizer ticket endpoints
struct TicketSync<'a> {
    organizer: &'a Organizer,
    event_id: i64,
    is_free: bool,
}

impl TicketSync<'_> {
    fn body(&self, row: &TicketRow) -> TicketPayload {
        let price = if self.is_free {
            0.0
        } else {
            row.price.trim().parse::<f64>().unwrap_or(0.0)
        };
        let quantity = row.quantity.trim().parse::<i64>().unwrap_or(0);
        TicketPayload::new(&row.name, price, quantity)
    }
}

#[async_trait]
impl RowSync for TicketSync<'_> {
    type Row = TicketRow;

    fn row_id(&self, row: &TicketRow) -> Option<i64> {
        row.id
    }

    async fn create(&self, _index: usize, row: &TicketRow) -> Result<TicketRow, Error> {
        let created = self
            .organizer
            .create_ticket(self.event_id, &self.body(row))
            .await?;
        Ok(TicketRow {
            id: Some(created.id),
            name: created.name,
            price: created.price,
            quantity: created.quantity_total.to_string(),
        })
    }

    async fn update(&self, _index: usize, id: i64, row: &TicketRow) -> Result<TicketRow, Error> {
        let saved = self
            .organizer
            .update_ticket(self.event_id, id, &self.body(row))
            .await?;
        Ok(TicketRow {
            id: Some(saved.id),
            name: row.name.clone(),
            price: saved.price,
            quantity: saved.quantity_total.to_string(),
        })
    }

    async fn delete(&self, id: i64) -> Result<(), Error> {
        self.organizer.delete_ticket(self.event_id, id).await
    }
}

/// Media rows against the organizer media endpoints
struct MediaSync<'a> {
    organizer: &'a Organizer,
    event_id: i64,
}

#[async_trait]
impl RowSync for MediaSync<'_> {
    type Row = MediaRow;

    fn row_id(&self, row: &MediaRow) -> Option<i64> {
        row.id
    }

    async fn create(&self, index: usize, row: &MediaRow) -> Result<MediaRow, Error> {
        let body = MediaPayload {
            media_type: row.media_type.clone(),
            url: row.url.clone(),
            title: row.title.clone(),
            is_cover: false,
            sort_order: index as i64,
        };
        let created = self.organizer.create_media(self.event_id, &body).await?;
        Ok(MediaRow {
            id: Some(created.id),
            url: created.url,
            media_type: created.media_type,
            title: created.title,
        })
    }

    async fn update(&self, index: usize, id: i64, row: &MediaRow) -> Result<MediaRow, Error> {
        let body = MediaPayload {
            media_type: row.media_type.clone(),
            url: row.url.clone(),
            title: row.title.clone(),
            is_cover: false,
            sort_order: index as i64,
        };
        let saved = self.organizer.update_media(self.event_id, id, &body).await?;
        Ok(MediaRow {
            id: Some(saved.id),
            url: saved.url,
            media_type: saved.media_type,
            title: saved.title,
        })
    }

    async fn delete(&self, id: i64) -> Result<(), Error> {
        self.organizer.delete_media(self.event_id, id).await
    }
}
