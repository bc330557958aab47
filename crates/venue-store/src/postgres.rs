use async_trait::async_trait;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Postgres, Row, Transaction};
use uuid::Uuid;

use crate::{
    Result, SoldOutFlags, Venue, VenueId, VenueStoreError,
    store::{SoldOutUpdate, VenueStore},
};

const VENUE_COLUMNS: &str =
    "id, name, is_sold_out, is_first_sold_out, created_at, updated_at, deleted_at";

/// PostgreSQL-backed venue store implementation.
#[derive(Clone)]
pub struct PostgresVenueStore {
    pool: PgPool,
}

impl PostgresVenueStore {
    /// Creates a new PostgreSQL venue store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connects a pool of at most `max_connections` to `database_url`.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .map_err(|e| VenueStoreError::Unavailable(format!("failed to connect: {e}")))?;
        Ok(Self::new(pool))
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Runs the database migrations.
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("../../migrations").run(&self.pool).await?;
        Ok(())
    }

    fn row_to_venue(row: PgRow) -> std::result::Result<Venue, sqlx::Error> {
        Ok(Venue {
            id: VenueId::from_uuid(row.try_get::<Uuid, _>("id")?),
            name: row.try_get("name")?,
            is_sold_out: row.try_get("is_sold_out")?,
            is_first_sold_out: row.try_get("is_first_sold_out")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
            deleted_at: row.try_get("deleted_at")?,
        })
    }

    async fn lock_by_name(
        tx: &mut Transaction<'_, Postgres>,
        name: &str,
    ) -> std::result::Result<Option<Venue>, sqlx::Error> {
        let row = sqlx::query(&format!(
            "SELECT {VENUE_COLUMNS} FROM venues WHERE name = $1 FOR UPDATE"
        ))
        .bind(name)
        .fetch_optional(&mut **tx)
        .await?;

        row.map(Self::row_to_venue).transpose()
    }

    async fn insert_if_absent(
        tx: &mut Transaction<'_, Postgres>,
        name: &str,
        flags: SoldOutFlags,
    ) -> std::result::Result<Option<Venue>, sqlx::Error> {
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO venues (id, name, is_sold_out, is_first_sold_out)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (name) DO NOTHING
            RETURNING {VENUE_COLUMNS}
            "#
        ))
        .bind(VenueId::new().as_uuid())
        .bind(name)
        .bind(flags.is_sold_out)
        .bind(flags.is_first_sold_out)
        .fetch_optional(&mut **tx)
        .await?;

        row.map(Self::row_to_venue).transpose()
    }

    async fn update_flags(
        tx: &mut Transaction<'_, Postgres>,
        existing: &Venue,
        sold_out: bool,
    ) -> std::result::Result<SoldOutUpdate, sqlx::Error> {
        let previous = existing.flags();
        let next = previous.apply(sold_out);

        let row = sqlx::query(&format!(
            r#"
            UPDATE venues
            SET is_sold_out = $1, is_first_sold_out = $2, updated_at = NOW()
            WHERE id = $3
            RETURNING {VENUE_COLUMNS}
            "#
        ))
        .bind(next.is_sold_out)
        .bind(next.is_first_sold_out)
        .bind(existing.id.as_uuid())
        .fetch_one(&mut **tx)
        .await?;

        Ok(SoldOutUpdate {
            venue: Self::row_to_venue(row)?,
            previous: Some(previous),
        })
    }

    async fn apply_sold_out(
        tx: &mut Transaction<'_, Postgres>,
        name: &str,
        sold_out: bool,
    ) -> std::result::Result<Option<SoldOutUpdate>, sqlx::Error> {
        if let Some(existing) = Self::lock_by_name(tx, name).await? {
            return Self::update_flags(tx, &existing, sold_out).await.map(Some);
        }

        if let Some(created) =
            Self::insert_if_absent(tx, name, SoldOutFlags::initial(sold_out)).await?
        {
            return Ok(Some(SoldOutUpdate {
                venue: created,
                previous: None,
            }));
        }

        // A concurrent transaction inserted the name first; its row is
        // committed by now, so lock it and take the update path.
        match Self::lock_by_name(tx, name).await? {
            Some(existing) => Self::update_flags(tx, &existing, sold_out).await.map(Some),
            None => Ok(None),
        }
    }

    async fn rollback(tx: Transaction<'_, Postgres>, name: &str) {
        if let Err(rollback_err) = tx.rollback().await {
            tracing::error!(venue = %name, error = %rollback_err, "failed to roll back venue update");
        }
    }

    fn write_error(name: &str, err: sqlx::Error) -> VenueStoreError {
        if let sqlx::Error::PoolClosed | sqlx::Error::PoolTimedOut | sqlx::Error::Io(_) = err {
            return VenueStoreError::Unavailable(err.to_string());
        }
        if let sqlx::Error::Database(ref db_err) = err
            && let Some(constraint) = db_err.constraint()
        {
            return VenueStoreError::ConstraintViolation {
                venue: name.to_string(),
                constraint: constraint.to_string(),
            };
        }
        VenueStoreError::WriteConflict {
            venue: name.to_string(),
            reason: err.to_string(),
        }
    }
}

#[async_trait]
impl VenueStore for PostgresVenueStore {
    async fn find_by_name(&self, name: &str) -> Result<Option<Venue>> {
        let row: Option<PgRow> = sqlx::query(&format!(
            "SELECT {VENUE_COLUMNS} FROM venues WHERE name = $1 AND deleted_at IS NULL"
        ))
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Self::row_to_venue).transpose()?)
    }

    async fn list(&self) -> Result<Vec<Venue>> {
        let rows = sqlx::query(&format!(
            "SELECT {VENUE_COLUMNS} FROM venues WHERE deleted_at IS NULL ORDER BY name ASC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(Self::row_to_venue)
            .collect::<std::result::Result<_, _>>()?)
    }

    #[tracing::instrument(skip(self))]
    async fn set_sold_out(&self, name: &str, sold_out: bool) -> Result<SoldOutUpdate> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| Self::write_error(name, e))?;

        let outcome = Self::apply_sold_out(&mut tx, name, sold_out).await;

        let update = match outcome {
            Ok(Some(update)) => update,
            Ok(None) => {
                Self::rollback(tx, name).await;
                return Err(VenueStoreError::WriteConflict {
                    venue: name.to_string(),
                    reason: "venue row vanished between insert and lock".to_string(),
                });
            }
            Err(e) => {
                Self::rollback(tx, name).await;
                return Err(Self::write_error(name, e));
            }
        };

        tx.commit().await.map_err(|e| Self::write_error(name, e))?;
        Ok(update)
    }
}
