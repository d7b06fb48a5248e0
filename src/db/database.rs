use anyhow::{anyhow, Result};
use rusqlite::Connection;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};

use crate::models::alert::PriceAlert;
use crate::models::analysis::AnalysisResult;
use crate::models::notification::Notification;
use crate::models::settings::AppSettings;

pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    pub fn new(data_dir: PathBuf) -> Result<Self> {
        std::fs::create_dir_all(&data_dir)?;
        let db_path = data_dir.join("limit_up_radar.db");
        let conn = Connection::open(db_path)?;
        Self::with_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        let db = Self {
            conn: Mutex::new(conn),
        };
        db.migrate()?;
        Ok(db)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| anyhow!("数据库连接锁已损坏"))
    }

    fn migrate(&self) -> Result<()> {
        let conn = self.lock()?;
        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS settings (
                id TEXT PRIMARY KEY DEFAULT 'default',
                data TEXT NOT NULL,
                updated_at TEXT NOT NULL DEFAULT (datetime('now'))
            );

            CREATE TABLE IF NOT EXISTS notifications (
                id TEXT PRIMARY KEY,
                kind TEXT NOT NULL,
                stock_code TEXT,
                data TEXT NOT NULL,
                is_read INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_notifications_date ON notifications(created_at);

            CREATE TABLE IF NOT EXISTS price_alerts (
                id TEXT PRIMARY KEY,
                stock_code TEXT NOT NULL,
                data TEXT NOT NULL,
                updated_at TEXT NOT NULL DEFAULT (datetime('now'))
            );

            CREATE TABLE IF NOT EXISTS analysis_history (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                code TEXT NOT NULL,
                horizon TEXT NOT NULL,
                probability INTEGER NOT NULL,
                data TEXT NOT NULL,
                created_at TEXT NOT NULL DEFAULT (datetime('now'))
            );

            CREATE INDEX IF NOT EXISTS idx_analysis_code ON analysis_history(code);
            ",
        )?;
        Ok(())
    }

    pub fn save_settings(&self, settings: &AppSettings) -> Result<()> {
        let conn = self.lock()?;
        let data = serde_json::to_string(settings)?;
        conn.execute(
            "INSERT OR REPLACE INTO settings (id, data, updated_at) VALUES ('default', ?1, datetime('now'))",
            rusqlite::params![data],
        )?;
        Ok(())
    }

    pub fn load_settings(&self) -> Result<AppSettings> {
        let conn = self.lock()?;
        let result = conn.query_row(
            "SELECT data FROM settings WHERE id = 'default'",
            [],
            |row| row.get::<_, String>(0),
        );
        match result {
            Ok(data) => Ok(serde_json::from_str(&data)?),
            Err(rusqlite::Error::QueryReturnedNoRows) => {
                let default = AppSettings::default();
                drop(conn);
                self.save_settings(&default)?;
                Ok(default)
            }
            Err(e) => Err(e.into()),
        }
    }

    pub fn save_notification(&self, n: &Notification) -> Result<()> {
        let conn = self.lock()?;
        let data = serde_json::to_string(n)?;
        conn.execute(
            "INSERT OR REPLACE INTO notifications (id, kind, stock_code, data, is_read, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            rusqlite::params![n.id, n.kind.as_str(), n.stock_code, data, n.read, n.created_at.to_rfc3339()],
        )?;
        Ok(())
    }

    pub fn recent_notifications(&self, limit: usize) -> Result<Vec<Notification>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT data, is_read FROM notifications ORDER BY created_at DESC LIMIT ?1",
        )?;
        let rows = stmt.query_map(rusqlite::params![limit as i64], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, bool>(1)?))
        })?;

        let mut list = Vec::new();
        for row in rows {
            let (data, is_read) = row?;
            let mut n: Notification = serde_json::from_str(&data)?;
            n.read = is_read;
            list.push(n);
        }
        Ok(list)
    }

    pub fn mark_notification_read(&self, id: &str) -> Result<bool> {
        let conn = self.lock()?;
        let changed = conn.execute(
            "UPDATE notifications SET is_read = 1 WHERE id = ?1",
            rusqlite::params![id],
        )?;
        Ok(changed > 0)
    }

    pub fn upsert_price_alert(&self, alert: &PriceAlert) -> Result<()> {
        let conn = self.lock()?;
        let data = serde_json::to_string(alert)?;
        conn.execute(
            "INSERT OR REPLACE INTO price_alerts (id, stock_code, data, updated_at) VALUES (?1, ?2, ?3, datetime('now'))",
            rusqlite::params![alert.id, alert.stock_code, data],
        )?;
        Ok(())
    }

    pub fn list_price_alerts(&self) -> Result<Vec<PriceAlert>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare("SELECT data FROM price_alerts ORDER BY stock_code, id")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

        let mut list = Vec::new();
        for row in rows {
            list.push(serde_json::from_str(&row?)?);
        }
        Ok(list)
    }

    pub fn remove_price_alert(&self, id: &str) -> Result<()> {
        let conn = self.lock()?;
        conn.execute("DELETE FROM price_alerts WHERE id = ?1", rusqlite::params![id])?;
        Ok(())
    }

    pub fn save_analysis(&self, result: &AnalysisResult) -> Result<()> {
        let conn = self.lock()?;
        let data = serde_json::to_string(result)?;
        let horizon = serde_json::to_value(result.horizon)?
            .as_str()
            .unwrap_or_default()
            .to_string();
        conn.execute(
            "INSERT INTO analysis_history (code, horizon, probability, data) VALUES (?1, ?2, ?3, ?4)",
            rusqlite::params![result.stock_code, horizon, result.probability, data],
        )?;
        Ok(())
    }

    pub fn analysis_history(&self, code: &str, limit: usize) -> Result<Vec<AnalysisResult>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT data FROM analysis_history WHERE code = ?1 ORDER BY id DESC LIMIT ?2",
        )?;
        let rows = stmt.query_map(rusqlite::params![code, limit as i64], |row| row.get::<_, String>(0))?;

        let mut list = Vec::new();
        for row in rows {
            list.push(serde_json::from_str(&row?)?);
        }
        Ok(list)
    }
}

#[cfg(test)]
impl Database {
    /// 测试中直接执行 SQL（如破坏表结构模拟写入失败）
    pub(crate) fn run_sql(&self, sql: &str) -> Result<()> {
        self.lock()?.execute_batch(sql)?;
        Ok(())
    }
}
