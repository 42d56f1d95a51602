//! Per-guild settings persisted in the application's SQLite database.
//! Reads are served from an in-memory cache; writes go through to SQLite first.

use dashmap::DashMap;
use rusqlite::{Connection, OptionalExtension, Result as SqlResult, params};
use serenity::model::id::{GuildId, RoleId};
use std::path::Path;
use std::sync::Mutex;
use tracing::{debug, error};

/// The default filename for the SQLite database.
pub const APPDATA_DB: &str = "application_data.db";

/// Settings a guild can change through commands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GuildSettings {
    /// Queue related tracks when the queue runs out.
    pub autoplay: bool,
    /// Role allowed to control playback. `None` lets everyone.
    pub dj_role: Option<RoleId>,
}

pub struct GuildSettingsStore {
    conn: Mutex<Connection>,
    cache: DashMap<GuildId, GuildSettings>,
}

impl GuildSettingsStore {
    /// Opens (or creates) the database at `path`.
    pub fn open(path: impl AsRef<Path>) -> SqlResult<Self> {
        Self::with_connection(Connection::open(path)?)
    }

    /// A throwaway store, used by tests.
    pub fn open_in_memory() -> SqlResult<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> SqlResult<Self> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS guild_settings (
                guild_id INTEGER PRIMARY KEY,
                autoplay BOOLEAN NOT NULL DEFAULT 0,
                dj_role_id INTEGER
            )",
            [],
        )?;

        Ok(Self {
            conn: Mutex::new(conn),
            cache: DashMap::new(),
        })
    }

    /// Settings for a guild. Unknown guilds and read failures yield the defaults.
    pub fn get(&self, guild_id: GuildId) -> GuildSettings {
        if let Some(settings) = self.cache.get(&guild_id) {
            return *settings;
        }

        // Held until the cache is filled.
        let conn = self.conn();
        let settings = match load(&conn, guild_id) {
            Ok(settings) => settings.unwrap_or_default(),
            Err(e) => {
                error!("Failed to read settings for guild {}: {}", guild_id, e);
                return GuildSettings::default();
            }
        };

        self.cache.insert(guild_id, settings);
        settings
    }

    pub fn autoplay_enabled(&self, guild_id: GuildId) -> bool {
        self.get(guild_id).autoplay
    }

    pub fn dj_role(&self, guild_id: GuildId) -> Option<RoleId> {
        self.get(guild_id).dj_role
    }

    pub fn set_autoplay(&self, guild_id: GuildId, enabled: bool) -> SqlResult<()> {
        self.update(guild_id, |settings| settings.autoplay = enabled)
    }

    pub fn set_dj_role(&self, guild_id: GuildId, role: Option<RoleId>) -> SqlResult<()> {
        self.update(guild_id, |settings| settings.dj_role = role)
    }

    /// Read-modify-write under one connection lock.
    fn update(&self, guild_id: GuildId, change: impl FnOnce(&mut GuildSettings)) -> SqlResult<()> {
        let conn = self.conn();
        let mut settings = load(&conn, guild_id)?.unwrap_or_default();
        change(&mut settings);

        conn.execute(
            "INSERT OR REPLACE INTO guild_settings (guild_id, autoplay, dj_role_id) VALUES (?1, ?2, ?3)",
            params![
                guild_id.get() as i64,
                settings.autoplay,
                settings.dj_role.map(|role| role.get() as i64)
            ],
        )?;

        debug!("Saved settings for guild {}: {:?}", guild_id, settings);
        self.cache.insert(guild_id, settings);
        Ok(())
    }

    fn conn(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn load(conn: &Connection, guild_id: GuildId) -> SqlResult<Option<GuildSettings>> {
    conn.query_row(
        "SELECT autoplay, dj_role_id FROM guild_settings WHERE guild_id = ?1",
        params![guild_id.get() as i64],
        |row| {
            let dj_role: Option<i64> = row.get(1)?;
            Ok(GuildSettings {
                autoplay: row.get(0)?,
                dj_role: dj_role.map(|id| RoleId::new(id as u64)),
            })
        },
    )
    .optional()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_guild_gets_defaults() {
        let store = GuildSettingsStore::open_in_memory().unwrap();
        let guild = GuildId::new(444555666);

        assert_eq!(store.get(guild), GuildSettings::default());
        assert!(!store.autoplay_enabled(guild));
        assert_eq!(store.dj_role(guild), None);
    }

    #[test]
    fn autoplay_round_trip() {
        let store = GuildSettingsStore::open_in_memory().unwrap();
        let guild = GuildId::new(111222333);

        store.set_autoplay(guild, true).unwrap();
        assert!(store.autoplay_enabled(guild));

        store.set_autoplay(guild, false).unwrap();
        assert!(!store.autoplay_enabled(guild));
    }

    #[test]
    fn settings_update_independently() {
        let store = GuildSettingsStore::open_in_memory().unwrap();
        let guild = GuildId::new(7);
        let role = RoleId::new(9_000_000_000_000_000_001);

        store.set_autoplay(guild, true).unwrap();
        store.set_dj_role(guild, Some(role)).unwrap();
        assert_eq!(
            store.get(guild),
            GuildSettings {
                autoplay: true,
                dj_role: Some(role)
            }
        );

        store.set_dj_role(guild, None).unwrap();
        assert!(store.autoplay_enabled(guild));
        assert_eq!(store.dj_role(guild), None);
    }

    #[test]
    fn values_survive_a_cold_cache() {
        let store = GuildSettingsStore::open_in_memory().unwrap();
        let guild = GuildId::new(42);
        store.set_dj_role(guild, Some(RoleId::new(5))).unwrap();

        store.cache.clear();
        assert_eq!(store.dj_role(guild), Some(RoleId::new(5)));
    }

    #[test]
    fn concurrent_changes_to_one_guild_are_all_kept() {
        let store = std::sync::Arc::new(GuildSettingsStore::open_in_memory().unwrap());
        let guild = GuildId::new(77);

        for round in 1..=50u64 {
            let role = RoleId::new(round);
            let autoplay = round % 2 == 0;

            let toggler = {
                let store = store.clone();
                std::thread::spawn(move || store.set_autoplay(guild, autoplay).unwrap())
            };
            let assigner = {
                let store = store.clone();
                std::thread::spawn(move || store.set_dj_role(guild, Some(role)).unwrap())
            };
            toggler.join().unwrap();
            assigner.join().unwrap();

            let expected = GuildSettings {
                autoplay,
                dj_role: Some(role),
            };
            assert_eq!(store.get(guild), expected);
            store.cache.clear();
            assert_eq!(store.get(guild), expected);
        }
    }
}
