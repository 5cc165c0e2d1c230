//! Id-based child-row reconciliation
//!
//! One pass synchronizes a locally edited row list against the server:
//! rows carrying a known id are updated, rows without one are created and
//! their new ids captured, and every previously-remembered id the pass did
//! not touch is deleted. The ids used by the pass become the remembered set
//! for the next one. Rows are matched purely by id, never by content, so a
//! pass is linear in the row count and needs no version mechanism.

use crate::draft::{MediaDraft, MediaRow, PricingDraft, TicketRow};
use crate::error::Error;
use async_trait::async_trait;
use std::collections::HashSet;

/// Remote operations for one child-row collection of an event.
///
/// Implementations issue the actual create/update/delete requests; the
/// reconciliation order lives in [`reconcile_rows`]. `create` and `update`
/// return the row as the draft should carry it afterwards, with the
/// server-assigned id and any server-normalized values.
#[async_trait]
pub trait RowSync {
    type Row;

    /// The server id the row carries, if it has been seen server-side
    fn row_id(&self, row: &Self::Row) -> Option<i64>;

    /// Create the row server-side. `index` is the row's position in the
    /// submission, for collections that persist ordering.
    async fn create(&self, index: usize, row: &Self::Row) -> Result<Self::Row, Error>;

    /// Update the row with `id` server-side
    async fn update(&self, index: usize, id: i64, row: &Self::Row) -> Result<Self::Row, Error>;

    /// Delete the row with `id` server-side
    async fn delete(&self, id: i64) -> Result<(), Error>;
}

/// Result of one reconciliation pass
#[derive(Debug)]
pub struct RowOutcome<R> {
    /// The rows as the draft should now carry them
    pub rows: Vec<R>,

    /// Ids used by this pass; becomes the remembered set for the next pass
    pub submitted: HashSet<i64>,
}

/// Run one reconciliation pass over `rows` against the server.
///
/// Rows are processed strictly in order, one request at a time. Deletes run
/// after all updates and creates, in ascending id order, and cover exactly
/// the remembered ids this pass did not use. Any failed request aborts the
/// pass; rows already applied are not rolled back.
pub async fn reconcile_rows<S: RowSync>(
    sync: &S,
    rows: &[S::Row],
    remembered: &HashSet<i64>,
) -> Result<RowOutcome<S::Row>, Error> {
    let mut next_rows = Vec::with_capacity(rows.len());
    let mut submitted = HashSet::new();

    for (index, row) in rows.iter().enumerate() {
        let saved = match sync.row_id(row) {
            Some(id) => sync.update(index, id, row).await?,
            None => sync.create(index, row).await?,
        };
        if let Some(id) = sync.row_id(&saved) {
            submitted.insert(id);
        }
        next_rows.push(saved);
    }

    let mut removed: Vec<i64> = remembered.difference(&submitted).copied().collect();
    removed.sort_unstable();
    for id in removed {
        sync.delete(id).await?;
    }

    Ok(RowOutcome {
        rows: next_rows,
        submitted,
    })
}

/// Ticket rows ready for submission, in order.
///
/// Rows are trimmed, prices forced to zero on a free event, and rows with
/// nothing filled in are dropped, as are rows without a name or a positive
/// quantity. A free event whose cleaned list comes out empty gets exactly
/// one synthesized free-admission row sized to the configured capacity
/// (quantity zero when capacity is unset); the synthesized row is always
/// submitted.
pub(crate) fn prepare_tickets(pricing: &PricingDraft) -> Vec<TicketRow> {
    // blankness is judged on what was typed, before the free-event price
    // override fills the price in
    let cleaned: Vec<TicketRow> = pricing
        .tickets
        .iter()
        .filter(|ticket| {
            !ticket.name.trim().is_empty()
                || !ticket.quantity.trim().is_empty()
                || !ticket.price.trim().is_empty()
        })
        .map(|ticket| TicketRow {
            id: ticket.id,
            name: ticket.name.trim().to_string(),
            price: if pricing.is_free {
                "0".to_string()
            } else {
                ticket.price.trim().to_string()
            },
            quantity: ticket.quantity.trim().to_string(),
        })
        .collect();

    if cleaned.is_empty() && pricing.is_free {
        let capacity = pricing.capacity_total.trim();
        return vec![TicketRow {
            id: None,
            name: "Entree gratuite".to_string(),
            price: "0".to_string(),
            quantity: if capacity.is_empty() {
                "0".to_string()
            } else {
                capacity.to_string()
            },
        }];
    }

    cleaned
        .into_iter()
        .filter(|ticket| {
            !ticket.name.is_empty()
                && ticket
                    .quantity
                    .parse::<i64>()
                    .map(|quantity| quantity > 0)
                    .unwrap_or(false)
        })
        .collect()
}

/// Media rows ready for submission, in order. Rows without a URL are
/// dropped; URL and title are trimmed.
pub(crate) fn prepare_media(media: &MediaDraft) -> Vec<MediaRow> {
    media
        .items
        .iter()
        .map(|item| MediaRow {
            id: item.id,
            url: item.url.trim().to_string(),
            media_type: item.media_type.clone(),
            title: item.title.trim().to_string(),
        })
        .filter(|item| !item.url.is_empty())
        .collect()
}
