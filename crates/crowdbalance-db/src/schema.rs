//! Schema definitions and migration runner for SurrealDB.
//!
//! All table definitions use SCHEMAFULL mode for data integrity.
//! UUIDs are stored as strings. The activity log lives embedded in the
//! location record as an array of objects; its `crowd_level` field
//! carries no ASSERT on purpose so entries written by newer deployments
//! with additional levels survive storage (the aggregator skips them).

use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tracing::info;

use crate::error::DbError;

// -----------------------------------------------------------------------
// Migration tracking
// -----------------------------------------------------------------------

const MIGRATION_TABLE_DDL: &str = "\
DEFINE TABLE IF NOT EXISTS _migration SCHEMAFULL;
DEFINE FIELD IF NOT EXISTS version ON TABLE _migration TYPE int;
DEFINE FIELD IF NOT EXISTS name ON TABLE _migration TYPE string;
DEFINE FIELD IF NOT EXISTS applied_at ON TABLE _migration TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX IF NOT EXISTS idx_migration_version ON TABLE _migration \
    COLUMNS version UNIQUE;
";

#[derive(Debug, SurrealValue)]
struct MigrationRecord {
    version: u32,
    #[allow(dead_code)]
    name: String,
}

struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

static MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "initial_schema",
    sql: SCHEMA_V1,
}];

// -----------------------------------------------------------------------
// Schema v1 — initial table definitions
// -----------------------------------------------------------------------

const SCHEMA_V1: &str = "\
-- =======================================================================
-- Locations (one per physical venue)
-- =======================================================================
DEFINE TABLE location SCHEMAFULL;
DEFINE FIELD name ON TABLE location TYPE string;
DEFINE FIELD capacity ON TABLE location TYPE int;
DEFINE FIELD is_active ON TABLE location TYPE bool DEFAULT true;
DEFINE FIELD activity_log ON TABLE location TYPE array DEFAULT [];
DEFINE FIELD activity_log.* ON TABLE location TYPE object;
DEFINE FIELD activity_log.*.crowd_level ON TABLE location TYPE string;
DEFINE FIELD activity_log.*.timestamp ON TABLE location TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD activity_log.*.organizer_id ON TABLE location TYPE string \
    DEFAULT 'organizer';
DEFINE FIELD last_updated ON TABLE location TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD created_at ON TABLE location TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE location TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_location_name ON TABLE location COLUMNS name UNIQUE;

-- =======================================================================
-- Organizers (external directory boundary; joined to locations by name)
-- =======================================================================
DEFINE TABLE organizer SCHEMAFULL;
DEFINE FIELD name ON TABLE organizer TYPE string;
DEFINE FIELD email ON TABLE organizer TYPE string;
DEFINE FIELD assigned_hall ON TABLE organizer TYPE string;
DEFINE FIELD created_at ON TABLE organizer TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_organizer_assigned_hall ON TABLE organizer \
    COLUMNS assigned_hall;
";

// -----------------------------------------------------------------------
// Public API
// -----------------------------------------------------------------------

/// Run all pending migrations against the given SurrealDB client.
///
/// Creates a `_migration` tracking table on first run, then applies
/// each migration whose version exceeds the current maximum.
/// All DEFINE statements are idempotent so re-running is safe.
pub async fn run_migrations<C: Connection>(db: &Surreal<C>) -> Result<(), DbError> {
    // Ensure migration tracking table exists (idempotent).
    db.query(MIGRATION_TABLE_DDL)
        .await?
        .check()
        .map_err(|e| DbError::Migration(e.to_string()))?;

    // Determine current schema version.
    let mut result = db
        .query("SELECT * FROM _migration ORDER BY version DESC LIMIT 1")
        .await?;
    let records: Vec<MigrationRecord> = result.take(0)?;
    let current_version = records.first().map(|m| m.version).unwrap_or(0);

    for migration in MIGRATIONS {
        if migration.version > current_version {
            info!(
                version = migration.version,
                name = migration.name,
                "Applying migration"
            );
            db.query(migration.sql).await?.check().map_err(|e| {
                DbError::Migration(format!(
                    "Migration v{} '{}' failed: {}",
                    migration.version, migration.name, e,
                ))
            })?;

            // Record the applied migration.
            db.query(
                "CREATE _migration SET version = $version, \
                 name = $name",
            )
            .bind(("version", migration.version))
            .bind(("name", migration.name))
            .await?
            .check()
            .map_err(|e| {
                DbError::Migration(format!(
                    "Failed to record migration v{}: {}",
                    migration.version, e,
                ))
            })?;

            info!(
                version = migration.version,
                "Migration applied successfully"
            );
        }
    }

    Ok(())
}

/// Returns the raw schema DDL for version 1.
///
/// Exposed for testing with in-memory SurrealDB instances that
/// bypass the migration runner.
pub fn schema_v1() -> &'static str {
    SCHEMA_V1
}
