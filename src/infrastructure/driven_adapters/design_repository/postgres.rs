//! PostgreSQL Design Repository Implementation
//!
//! Implements the DesignRepository trait using SQLx for PostgreSQL. Settings
//! and fitted plans are stored as JSONB documents.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::gateways::DesignRepository;
use crate::domain::models::design::{DesignId, TreatmentDesign};
use crate::domain::models::plan::TreatmentPlan;
use crate::domain::models::settings::DesignSettings;
use crate::shared::errors::RepositoryError;

const COLUMNS: &str = "id, name, description, settings, plan, active, created_at, updated_at";

/// Database row representation for the treatment_designs table
#[derive(Debug, sqlx::FromRow)]
struct DesignRow {
    id: Uuid,
    name: String,
    description: Option<String>,
    settings: serde_json::Value,
    plan: serde_json::Value,
    active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<DesignRow> for TreatmentDesign {
    type Error = RepositoryError;

    fn try_from(row: DesignRow) -> Result<Self, Self::Error> {
        let settings: DesignSettings = serde_json::from_value(row.settings)
            .map_err(|e| RepositoryError::Mapping(format!("Failed to parse settings: {e}")))?;
        let plan: TreatmentPlan = serde_json::from_value(row.plan)
            .map_err(|e| RepositoryError::Mapping(format!("Failed to parse plan: {e}")))?;

        Ok(TreatmentDesign::restore(
            DesignId::from_uuid(row.id),
            row.name,
            row.description,
            settings,
            plan,
            row.active,
            row.created_at,
            row.updated_at,
        ))
    }
}

fn documents(design: &TreatmentDesign) -> Result<(serde_json::Value, serde_json::Value), RepositoryError> {
    let settings = serde_json::to_value(design.settings())
        .map_err(|e| RepositoryError::Mapping(format!("Failed to serialize settings: {e}")))?;
    let plan = serde_json::to_value(design.plan())
        .map_err(|e| RepositoryError::Mapping(format!("Failed to serialize plan: {e}")))?;
    Ok((settings, plan))
}

/// Unique index violations become conflicts; the name check before a write can race
fn write_error(error: sqlx::Error) -> RepositoryError {
    if let sqlx::Error::Database(db) = &error {
        if db.is_unique_violation() {
            return RepositoryError::Conflict(db.message().to_string());
        }
    }
    RepositoryError::Database(error)
}

/// PostgreSQL implementation of DesignRepository
pub struct PostgresDesignRepository {
    pool: PgPool,
}

impl PostgresDesignRepository {
    /// Create a new PostgresDesignRepository
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DesignRepository for PostgresDesignRepository {
    async fn find_by_id(&self, id: &DesignId) -> Result<Option<TreatmentDesign>, RepositoryError> {
        let row = sqlx::query_as::<_, DesignRow>(&format!("SELECT {COLUMNS} FROM treatment_designs WHERE id = $1"))
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        row.map(TreatmentDesign::try_from).transpose()
    }

    async fn find_all_active(&self) -> Result<Vec<TreatmentDesign>, RepositoryError> {
        let rows = sqlx::query_as::<_, DesignRow>(&format!(
            "SELECT {COLUMNS} FROM treatment_designs WHERE active = true ORDER BY name ASC"
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(TreatmentDesign::try_from).collect()
    }

    async fn create(&self, design: &TreatmentDesign) -> Result<TreatmentDesign, RepositoryError> {
        let (settings, plan) = documents(design)?;

        let row = sqlx::query_as::<_, DesignRow>(&format!(
            r#"
            INSERT INTO treatment_designs (
                id, name, description, settings, plan, active, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(design.id().as_uuid())
        .bind(design.name())
        .bind(design.description())
        .bind(&settings)
        .bind(&plan)
        .bind(design.active())
        .bind(design.created_at())
        .bind(design.updated_at())
        .fetch_one(&self.pool)
        .await
        .map_err(write_error)?;

        TreatmentDesign::try_from(row)
    }

    async fn update(&self, design: &TreatmentDesign) -> Result<Option<TreatmentDesign>, RepositoryError> {
        let (settings, plan) = documents(design)?;

        let row = sqlx::query_as::<_, DesignRow>(&format!(
            r#"
            UPDATE treatment_designs
            SET name = $2,
                description = $3,
                settings = $4,
                plan = $5,
                active = $6,
                updated_at = $7
            WHERE id = $1
            RETURNING {COLUMNS}
            "#
        ))
        .bind(design.id().as_uuid())
        .bind(design.name())
        .bind(design.description())
        .bind(&settings)
        .bind(&plan)
        .bind(design.active())
        .bind(design.updated_at())
        .fetch_optional(&self.pool)
        .await
        .map_err(write_error)?;

        row.map(TreatmentDesign::try_from).transpose()
    }

    async fn soft_delete(&self, id: &DesignId) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r#"
            UPDATE treatment_designs
            SET active = false, updated_at = NOW()
            WHERE id = $1 AND active = true
            "#,
        )
        .bind(id.as_uuid())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn exists_by_name(&self, name: &str, exclude_id: Option<&DesignId>) -> Result<bool, RepositoryError> {
        let exists = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM treatment_designs
                WHERE name = $1 AND active = true AND ($2::uuid IS NULL OR id != $2)
            )
            "#,
        )
        .bind(name)
        .bind(exclude_id.map(DesignId::as_uuid))
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }
}
