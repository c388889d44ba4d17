use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::db::queries;
use crate::models::BusinessProfile;

/// Loads the current profile for the engine. Re-reads the store on every
/// call so admin edits show up immediately; a missing row or a failed
/// query yields the built-in fallback profile instead of an error.
pub fn load_profile(db: &Arc<Mutex<Connection>>, business_id: i64) -> BusinessProfile {
    let conn = db.lock().unwrap();
    let mut profile = match queries::get_business_profile(&conn, business_id) {
        Ok(Some(profile)) => profile,
        Ok(None) => {
            tracing::warn!(business_id, "no business record, using fallback profile");
            return BusinessProfile::fallback();
        }
        Err(e) => {
            tracing::warn!(error = %e, "could not load business profile, using fallback");
            return BusinessProfile::fallback();
        }
    };

    normalize_hours(&mut profile);
    profile
}

// The engine expects exactly one entry per weekday, Monday first. Stored
// rows win; days without a row fall back to the default schedule.
fn normalize_hours(profile: &mut BusinessProfile) {
    if profile.hours.len() == 7 {
        return;
    }

    let stored = std::mem::take(&mut profile.hours);
    let mut hours = BusinessProfile::default_hours();
    for hour in stored {
        if hour.day_of_week < 7 {
            let idx = hour.day_of_week;
            hours[idx] = hour;
        }
    }
    profile.hours = hours;
}
