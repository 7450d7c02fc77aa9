//! Configuración del asistente cargada desde variables de entorno.

use crate::errors::WizardError;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://localhost:8000/mie/api";

#[derive(Debug, Clone, PartialEq)]
pub struct WizardConfig {
  /// URL base del backend, incluido el prefijo `mie/api`.
  pub api_base_url: String,
  /// Entidad (ministerio) bajo la que se radican las iniciativas.
  pub entidad_id: i64,
  /// Inactividad tras la cual se revalida el paso.
  pub validation_debounce: Duration,
  /// Timeout por petición HTTP.
  pub api_timeout: Duration,
  /// Valor de `creado_desde` al crear remitentes.
  pub origen: String,
  /// Usa el backend en memoria en lugar del HTTP.
  pub offline: bool,
  /// Base SQLite del formulario; `None` usa la de `form-persistence`.
  pub db_url: Option<String>,
}

impl Default for WizardConfig {
  fn default() -> Self {
    Self { api_base_url: DEFAULT_API_URL.to_string(),
           entidad_id: 1,
           validation_debounce: Duration::from_millis(300),
           api_timeout: Duration::from_secs(30),
           origen: "web".to_string(),
           offline: false,
           db_url: None }
  }
}

impl WizardConfig {
  pub fn from_env() -> Result<Self, WizardError> {
    dotenvy::dotenv().ok();
    let d = Self::default();
    Ok(WizardConfig { api_base_url: env_var("INICIATIVAS_API_URL").unwrap_or(d.api_base_url),
                      entidad_id: parse_var("ENTIDAD_ID", d.entidad_id)?,
                      validation_debounce: Duration::from_millis(parse_var("VALIDATION_DEBOUNCE_MS", 300u64)?),
                      api_timeout: Duration::from_secs(parse_var("API_TIMEOUT_SECS", 30u64)?),
                      origen: env_var("INICIATIVAS_ORIGEN").unwrap_or(d.origen),
                      offline: env_var("INICIATIVAS_OFFLINE").map(|v| is_truthy(&v)).unwrap_or(false),
                      db_url: env_var("FORM_DB_URL") })
  }
}

fn env_var(key: &str) -> Option<String> {
  std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_var<T: std::str::FromStr>(key: &str, default: T) -> Result<T, WizardError> {
  match env_var(key) {
    Some(raw) => raw.trim().parse().map_err(|_| WizardError::Config(format!("Valor inválido para {}: {}", key, raw))),
    None => Ok(default),
  }
}

fn is_truthy(v: &str) -> bool {
  matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "si" | "sí" | "yes" | "on")
}
