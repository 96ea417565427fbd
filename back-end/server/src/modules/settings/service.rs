//! Settings service layer.
//!
//! `get` falls back to compiled-in defaults for known keys. Batch writes are
//! upserts inside one transaction. The session signing secret is stored
//! under `jwt_secret` and created on first use.

use std::collections::BTreeMap;

use chrono::Utc;
use entity::config;
use rand::RngCore;
use rand::rngs::OsRng;
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
    TransactionTrait,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::modules::error::{ServiceError, ServiceResult};
use crate::modules::settings::keys::{self, KNOWN};

/// Bytes of entropy in a generated signing secret (256 bits).
pub const SECRET_BYTES: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FooterLink {
    pub name: String,
    pub url: String,
}

pub fn default_footer_links() -> Vec<FooterLink> {
    parse_footer_links(keys::DEFAULT_FOOTER_LINKS).unwrap_or_default()
}

fn parse_footer_links(raw: &str) -> Option<Vec<FooterLink>> {
    serde_json::from_str(raw).ok()
}

/// Everything a page or feed renderer needs from settings, read once.
#[derive(Debug, Clone, Serialize)]
pub struct RenderContext {
    pub site_name: String,
    pub description: String,
    pub introduction: String,
    pub language: String,
    pub timezone: String,
    pub custom_css: String,
    pub footer_links: Vec<FooterLink>,
}

pub struct SettingsService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> SettingsService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn get(&self, key: &str) -> ServiceResult<String> {
        // An empty secret row is a placeholder, not a value.
        let stored = self
            .stored(key)
            .await?
            .filter(|v| key != keys::JWT_SECRET || !v.is_empty());

        match stored {
            Some(value) => Ok(value),
            None => keys::default_for(key)
                .map(str::to_string)
                .ok_or_else(|| ServiceError::NotFound(format!("Configuration '{}' not found", key))),
        }
    }

    /// All public settings (stored values over defaults). Never includes
    /// the signing secret.
    pub async fn all(&self) -> ServiceResult<BTreeMap<String, String>> {
        let mut values: BTreeMap<String, String> = KNOWN
            .iter()
            .filter_map(|def| def.default.map(|d| (def.key.to_string(), d.to_string())))
            .collect();

        for row in config::Entity::find().all(self.db).await? {
            values.insert(row.key, row.value);
        }
        values.remove(keys::JWT_SECRET);
        Ok(values)
    }

    /// Upsert every pair, all or nothing.
    pub async fn update(&self, batch: &BTreeMap<String, String>) -> ServiceResult<()> {
        if batch.is_empty() {
            return Ok(());
        }

        let txn = self.db.begin().await?;
        for (key, value) in batch {
            upsert(&txn, key, value).await?;
        }
        txn.commit().await?;

        info!(keys = ?batch.keys().collect::<Vec<_>>(), "Settings updated");
        Ok(())
    }

    /// Admin-facing update: only editable keys, footer links must parse.
    pub async fn update_site_settings(&self, batch: &BTreeMap<String, String>) -> ServiceResult<()> {
        if batch.is_empty() {
            return Err(ServiceError::Validation("No settings provided".to_string()));
        }
        for (key, value) in batch {
            if !keys::is_editable(key) {
                return Err(ServiceError::Validation(format!(
                    "Invalid configuration key: {}",
                    key
                )));
            }
            if key == keys::FOOTER_LINKS && parse_footer_links(value).is_none() {
                return Err(ServiceError::Validation(
                    "footer_links must be a JSON list of {\"name\", \"url\"} objects".to_string(),
                ));
            }
        }
        self.update(batch).await
    }

    /// Stored footer links, or the defaults if missing or unparsable.
    pub async fn footer_links(&self) -> ServiceResult<Vec<FooterLink>> {
        let raw = self.stored(keys::FOOTER_LINKS).await?;
        Ok(footer_links_from(raw.as_deref()))
    }

    pub async fn set_footer_links(&self, links: &[FooterLink]) -> ServiceResult<()> {
        let raw = serde_json::to_string(links)
            .map_err(|e| ServiceError::Internal(format!("Failed to encode footer links: {}", e)))?;
        let mut batch = BTreeMap::new();
        batch.insert(keys::FOOTER_LINKS.to_string(), raw);
        self.update(&batch).await
    }

    /// Assemble the render context from a single read of the table.
    pub async fn render_context(&self) -> ServiceResult<RenderContext> {
        let values = self.all().await?;
        let pick = |key: &str| {
            values
                .get(key)
                .cloned()
                .or_else(|| keys::default_for(key).map(str::to_string))
                .unwrap_or_default()
        };

        Ok(RenderContext {
            site_name: pick(keys::BLOG_NAME),
            description: pick(keys::BLOG_DESCRIPTION),
            introduction: pick(keys::BLOG_INTRODUCTION),
            language: pick(keys::LANGUAGE),
            timezone: pick(keys::BLOG_TIMEZONE),
            custom_css: pick(keys::CUSTOM_CSS),
            footer_links: footer_links_from(values.get(keys::FOOTER_LINKS).map(String::as_str)),
        })
    }

    /// Return the persisted signing secret, generating it on first use.
    ///
    /// Concurrent first calls race on a conditional write that only fills an
    /// absent or empty value, then every caller re-reads the row, so all of
    /// them return the same winner.
    pub async fn signing_secret(&self) -> ServiceResult<String> {
        if let Some(secret) = self.stored(keys::JWT_SECRET).await?.filter(|s| !s.is_empty()) {
            return Ok(secret);
        }

        let candidate = generate_secret();
        let now = Utc::now().fixed_offset();

        config::Entity::insert(config::ActiveModel {
            key: Set(keys::JWT_SECRET.to_string()),
            value: Set(candidate.clone()),
            description: Set(description_for(keys::JWT_SECRET)),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        })
        .on_conflict(OnConflict::column(config::Column::Key).do_nothing().to_owned())
        .exec_without_returning(self.db)
        .await?;

        config::Entity::update_many()
            .col_expr(config::Column::Value, Expr::value(candidate))
            .col_expr(config::Column::UpdatedAt, Expr::value(now))
            .filter(config::Column::Key.eq(keys::JWT_SECRET))
            .filter(config::Column::Value.eq(""))
            .exec(self.db)
            .await?;

        let secret = self
            .stored(keys::JWT_SECRET)
            .await?
            .filter(|s| !s.is_empty())
            .ok_or_else(|| ServiceError::Internal("Signing secret was not persisted".to_string()))?;

        info!("Signing secret provisioned");
        Ok(secret)
    }

    /// Create rows for known keys that are missing. Existing values are
    /// left alone.
    pub async fn initialize_defaults(&self) -> ServiceResult<()> {
        let now = Utc::now().fixed_offset();
        let rows = KNOWN.iter().map(|def| config::ActiveModel {
            key: Set(def.key.to_string()),
            value: Set(def.default.unwrap_or_default().to_string()),
            description: Set(def.description.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        });

        config::Entity::insert_many(rows)
            .on_conflict(OnConflict::column(config::Column::Key).do_nothing().to_owned())
            .exec_without_returning(self.db)
            .await?;
        Ok(())
    }

    async fn stored(&self, key: &str) -> ServiceResult<Option<String>> {
        Ok(config::Entity::find()
            .filter(config::Column::Key.eq(key))
            .one(self.db)
            .await?
            .map(|row| row.value))
    }
}

async fn upsert<C>(conn: &C, key: &str, value: &str) -> ServiceResult<()>
where
    C: ConnectionTrait,
{
    let now = Utc::now().fixed_offset();
    config::Entity::insert(config::ActiveModel {
        key: Set(key.to_string()),
        value: Set(value.to_string()),
        description: Set(description_for(key)),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    })
    .on_conflict(
        OnConflict::column(config::Column::Key)
            .update_columns([config::Column::Value, config::Column::UpdatedAt])
            .to_owned(),
    )
    .exec_without_returning(conn)
    .await?;
    Ok(())
}

fn description_for(key: &str) -> String {
    keys::lookup(key)
        .map(|def| def.description.to_string())
        .unwrap_or_default()
}

fn footer_links_from(raw: Option<&str>) -> Vec<FooterLink> {
    match raw.map(str::trim).filter(|r| !r.is_empty()) {
        Some(raw) => parse_footer_links(raw).unwrap_or_else(|| {
            warn!("Stored footer links are not valid JSON, using defaults");
            default_footer_links()
        }),
        None => default_footer_links(),
    }
}

fn generate_secret() -> String {
    let mut bytes = [0u8; SECRET_BYTES];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}
