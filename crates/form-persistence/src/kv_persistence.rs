use crate::schema;
use crate::schema::form_entries::dsl as entries_dsl;
use chrono::Utc;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool, PooledConnection};
use diesel::result::Error as DieselError;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use form_storage::{KeyValueStore, Result, StorageError};
use log::{debug, warn};
use std::sync::Arc;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("./migrations");
type DbPool = Pool<ConnectionManager<SqliteConnection>>;

/// Almacén clave-valor sobre SQLite (tabla `form_entries`).
#[derive(Clone)]
pub struct DieselKeyValueStore {
  pool: Arc<DbPool>,
}

impl DieselKeyValueStore {
  /// Abre (o crea) la base y aplica las migraciones pendientes.
  pub fn new(database_url: &str) -> Result<Self> {
    let manager = ConnectionManager::<SqliteConnection>::new(database_url);
    let pool = Pool::builder().max_size(4)
                              .build(manager)
                              .map_err(|e| StorageError::Storage(format!("no se pudo crear el pool de conexiones: {}", e)))?;
    let store = DieselKeyValueStore { pool: Arc::new(pool) };
    let mut c = store.conn()?;
    let _ = diesel::sql_query("PRAGMA journal_mode = WAL;").execute(&mut c);
    let _ = diesel::sql_query("PRAGMA busy_timeout = 5000;").execute(&mut c);
    c.run_pending_migrations(MIGRATIONS)
     .map_err(|e| StorageError::Storage(format!("migraciones: {}", e)))?;
    debug!("almacén SQLite listo en {}", database_url);
    Ok(store)
  }

  fn conn(&self) -> Result<PooledConnection<ConnectionManager<SqliteConnection>>> {
    self.pool.get().map_err(|e| StorageError::Unavailable(format!("pool: {}", e)))
  }
}

#[derive(Debug, Queryable, Insertable)]
#[diesel(table_name = schema::form_entries)]
struct EntryRow {
  pub entry_key: String,
  pub entry_value: String,
  pub updated_at_ts: i64,
}

fn map_db_err<T>(res: std::result::Result<T, DieselError>) -> Result<T> {
  res.map_err(|e| StorageError::Storage(format!("db: {}", e)))
}

impl KeyValueStore for DieselKeyValueStore {
  fn get(&self, key: &str) -> Result<Option<String>> {
    let mut conn = self.conn()?;
    map_db_err(entries_dsl::form_entries.filter(entries_dsl::entry_key.eq(key))
                                        .select(entries_dsl::entry_value)
                                        .first::<String>(&mut conn)
                                        .optional())
  }

  fn set(&self, key: &str, value: &str) -> Result<()> {
    let mut conn = self.conn()?;
    let row = EntryRow { entry_key: key.to_string(),
                         entry_value: value.to_string(),
                         updated_at_ts: Utc::now().timestamp_millis() };
    map_db_err(diesel::replace_into(entries_dsl::form_entries).values(&row).execute(&mut conn))?;
    Ok(())
  }

  fn remove(&self, key: &str) -> Result<()> {
    let mut conn = self.conn()?;
    map_db_err(diesel::delete(entries_dsl::form_entries.filter(entries_dsl::entry_key.eq(key))).execute(&mut conn))?;
    Ok(())
  }
}

/// Crear el almacén desde las variables de entorno: `FORM_DB_URL` o, en su
/// defecto, `DATABASE_URL`. Sin ninguna de las dos se usa una base SQLite
/// en memoria compartida (no durable).
pub fn new_from_env() -> Result<DieselKeyValueStore> {
  dotenvy::dotenv().ok();
  let url = match std::env::var("FORM_DB_URL").or_else(|_| std::env::var("DATABASE_URL")) {
    Ok(url) => url,
    Err(_) => {
      warn!("FORM_DB_URL / DATABASE_URL no definidas; se usa SQLite en memoria");
      "file:iniciativas?mode=memory&cache=shared".into()
    }
  };
  let l = url.to_lowercase();
  if l.starts_with("postgres") || l.starts_with("mysql") {
    return Err(StorageError::Storage("FORM_DB_URL debe apuntar a una base SQLite".into()));
  }
  DieselKeyValueStore::new(&url)
}
