// SPDX-License-Identifier: Apache-2.0

use std::sync::{Arc, Mutex};
use std::time::Duration;

use agrimix_core::Clock;
use agrimix_model::Settings;
use chrono::{DateTime, Utc};
use rusqlite::Connection;

use crate::error::Result;
use crate::settings::get_settings;

/// Read-through cache for the settings singleton. TTL and clock are
/// injected; there is no process-wide state, one instance lives in the
/// server's shared state.
pub struct SettingsCache {
    ttl: chrono::Duration,
    clock: Arc<dyn Clock>,
    slot: Mutex<Option<(DateTime<Utc>, Settings)>>,
}

impl SettingsCache {
    /// Settings move rarely; five minutes of staleness is acceptable.
    pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);

    #[must_use]
    pub fn new(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            ttl: chrono::Duration::from_std(ttl).unwrap_or(chrono::Duration::MAX),
            clock,
            slot: Mutex::new(None),
        }
    }

    /// Serve from the slot while it is younger than the TTL, otherwise
    /// refetch and refill.
    pub fn get(&self, conn: &Connection) -> Result<Settings> {
        let now = self.clock.now();
        let mut slot = self.slot.lock().expect("settings cache lock poisoned");

        if let Some((cached_at, settings)) = slot.as_ref() {
            if now - *cached_at < self.ttl {
                return Ok(settings.clone());
            }
        }

        let fresh = get_settings(conn)?;
        *slot = Some((now, fresh.clone()));
        Ok(fresh)
    }

    /// Drop the slot; the next read refetches. Called by the settings
    /// write path.
    pub fn invalidate(&self) {
        let mut slot = self.slot.lock().expect("settings cache lock poisoned");
        *slot = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{bootstrap, update_settings, SettingsInput};
    use agrimix_core::ManualClock;
    use chrono::TimeZone;

    fn setup() -> (Connection, Arc<ManualClock>) {
        let conn = Connection::open_in_memory().expect("open memory db");
        bootstrap(&conn).expect("bootstrap");
        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap(),
        ));
        (conn, clock)
    }

    #[test]
    fn serves_cached_value_inside_ttl_and_refetches_after() {
        let (conn, clock) = setup();
        let cache = SettingsCache::new(Duration::from_secs(300), clock.clone());

        let first = cache.get(&conn).expect("first read");
        assert_eq!(first.fx_rate_usd, Settings::DEFAULT_FX_RATE_USD);

        // write behind the cache's back: still served stale inside the TTL
        update_settings(
            &conn,
            &SettingsInput {
                fx_rate_usd: 40.0,
                margin_list_a: 20.0,
                margin_list_b: 35.0,
                margin_list_c: 50.0,
            },
            clock.now(),
        )
        .expect("update settings");

        clock.advance(chrono::Duration::seconds(299));
        assert_eq!(cache.get(&conn).expect("cached read").fx_rate_usd, 36.0);

        clock.advance(chrono::Duration::seconds(2));
        assert_eq!(cache.get(&conn).expect("expired read").fx_rate_usd, 40.0);
    }

    #[test]
    fn invalidate_forces_the_next_read_through() {
        let (conn, clock) = setup();
        let cache = SettingsCache::new(Duration::from_secs(300), clock.clone());
        cache.get(&conn).expect("warm cache");

        update_settings(
            &conn,
            &SettingsInput {
                fx_rate_usd: 41.5,
                margin_list_a: 20.0,
                margin_list_b: 35.0,
                margin_list_c: 50.0,
            },
            clock.now(),
        )
        .expect("update settings");

        cache.invalidate();
        assert_eq!(cache.get(&conn).expect("fresh read").fx_rate_usd, 41.5);
    }
}
