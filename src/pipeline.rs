use chrono::Local;
use tracing::info;

use crate::geocode::GeoResolver;
use crate::parser;
use crate::record::{ContactChannel, DraftRecord, FinalizedRecord};
use crate::session::Session;
use crate::standardize;

/// Extraction stage: parse the raw text and stamp the contact channel.
/// Human review/edits happen between this and [`finalize_draft`].
pub fn extract_draft(text: &str, channel: ContactChannel) -> DraftRecord {
    let mut draft = parser::parse_messy_text(text);
    draft.contact_channel = Some(channel);
    draft
}

/// Standardize → geocode → identify → commit.
///
/// Normalizes phone, name, and contact date in place, resolves the address
/// (skipped when the draft already carries coordinates), then assigns the
/// case ID, recommended filename, and `timestamp_added` exactly once. The
/// finalized record is appended to the session and returned. Passing no
/// resolver skips the remote lookup entirely.
pub async fn finalize_draft(
    draft: DraftRecord,
    session: &mut Session,
    resolver: Option<&GeoResolver>,
) -> FinalizedRecord {
    let phone = draft
        .phone
        .as_deref()
        .map(standardize::standardize_phone)
        .filter(|p| !p.is_empty());
    let customer_name = draft
        .customer_name
        .as_deref()
        .map(standardize::normalize_text)
        .filter(|n| !n.is_empty());
    let initial_contact_datetime =
        standardize::standardize_date(draft.initial_contact_datetime.as_deref());

    let (gps_lat, gps_lng, formatted_address) = if draft.has_coordinates() {
        // At-most-once geocoding per record lifetime.
        (draft.gps_lat, draft.gps_lng, "Previously Geocoded".to_string())
    } else if let Some(resolver) = resolver {
        resolver.resolve(&draft.full_address()).await.into_parts()
    } else {
        (None, None, "Geocoding skipped".to_string())
    };

    let case_id = standardize::generate_case_id(session.next_case_number());
    // Filename uses the raw, as-written address components.
    let recommended_filename = standardize::generate_filename(
        &case_id,
        draft.street_address.as_deref(),
        draft.city.as_deref(),
        draft.state.as_deref(),
    );

    let record = FinalizedRecord {
        case_id,
        customer_name,
        phone,
        email: draft.email,
        street_address: draft.street_address,
        city: draft.city,
        state: draft.state,
        zip: draft.zip,
        initial_contact_datetime,
        contact_channel: draft.contact_channel,
        work_order_summary: draft.work_order_summary,
        raw_comments: draft.raw_comments,
        risk_flags: draft.risk_flags,
        gps_lat,
        gps_lng,
        formatted_address,
        recommended_filename,
        timestamp_added: Local::now().to_rfc3339(),
    };

    info!("Finalized case {}", record.case_id);
    session.commit(record.clone());
    record
}
