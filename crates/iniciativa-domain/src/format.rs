// format.rs
//
// Presentación de valores en pesos colombianos y de fechas largas en
// español, tal como se muestran en el resumen y en la consulta de radicado.
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};

pub const NO_AMOUNT: &str = "No especificado";
pub const NO_DATE: &str = "No especificada";

const MESES: [&str; 12] = ["enero",
                           "febrero",
                           "marzo",
                           "abril",
                           "mayo",
                           "junio",
                           "julio",
                           "agosto",
                           "septiembre",
                           "octubre",
                           "noviembre",
                           "diciembre"];

/// `$ 5.000.000`: sin decimales (redondeo) y punto como separador de miles.
pub fn format_cop(value: f64) -> String {
  if !value.is_finite() {
    return NO_AMOUNT.to_string();
  }
  let rounded = value.abs().round() as u64;
  let digits = rounded.to_string();
  let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
  for (i, c) in digits.chars().enumerate() {
    if i > 0 && (digits.len() - i) % 3 == 0 {
      grouped.push('.');
    }
    grouped.push(c);
  }
  let sign = if value < 0.0 && rounded > 0 { "-" } else { "" };
  format!("{}$ {}", sign, grouped)
}

/// Como `format_cop` pero a partir de texto libre: se descartan los
/// caracteres que no sean dígitos, punto o coma y la coma se toma como punto
/// decimal. Devuelve `No especificado` si no queda un número.
pub fn format_currency(value: Option<&str>) -> String {
  let Some(raw) = value else {
    return NO_AMOUNT.to_string();
  };
  let cleaned: String = raw.chars()
                           .filter(|c| c.is_ascii_digit() || *c == '.' || *c == ',')
                           .map(|c| if c == ',' { '.' } else { c })
                           .collect();
  match leading_number(&cleaned) {
    Some(n) => format_cop(n),
    None => NO_AMOUNT.to_string(),
  }
}

// Toma el prefijo numérico más largo (dígitos y a lo sumo un punto).
fn leading_number(s: &str) -> Option<f64> {
  let mut seen_dot = false;
  let end = s.char_indices()
             .find(|(_, c)| {
               if *c == '.' {
                 if seen_dot {
                   return true;
                 }
                 seen_dot = true;
               }
               false
             })
             .map(|(i, _)| i)
             .unwrap_or(s.len());
  s[..end].trim_end_matches('.').parse().ok()
}

/// `27 de febrero de 2025`. Acepta RFC 3339, `YYYY-MM-DD` y
/// `YYYY-MM-DDTHH:MM:SS[.f]`; cualquier otra cosa da `No especificada`.
pub fn format_date(value: Option<&str>) -> String {
  match value.and_then(parse_date) {
    Some(d) => format_naive_date(d),
    None => NO_DATE.to_string(),
  }
}

pub fn format_naive_date(d: NaiveDate) -> String {
  format!("{} de {} de {}", d.day(), MESES[d.month0() as usize], d.year())
}

fn parse_date(s: &str) -> Option<NaiveDate> {
  let s = s.trim();
  if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
    return Some(dt.date_naive());
  }
  if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
    return Some(dt.date());
  }
  NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn cop_groups_thousands_with_dots() {
    assert_eq!(format_cop(5_000_000.0), "$ 5.000.000");
    assert_eq!(format_cop(999.0), "$ 999");
    assert_eq!(format_cop(1234.6), "$ 1.235");
    assert_eq!(format_cop(0.0), "$ 0");
  }

  #[test]
  fn currency_from_text() {
    assert_eq!(format_currency(Some("5000000")), "$ 5.000.000");
    assert_eq!(format_currency(Some("$ 1200,50")), "$ 1.201");
    assert_eq!(format_currency(Some("abc")), NO_AMOUNT);
    assert_eq!(format_currency(None), NO_AMOUNT);
  }

  #[test]
  fn dates_in_spanish() {
    assert_eq!(format_date(Some("2025-02-27")), "27 de febrero de 2025");
    assert_eq!(format_date(Some("2025-02-27T10:15:00Z")), "27 de febrero de 2025");
    assert_eq!(format_date(Some("2024-12-01T08:00:00.123")), "1 de diciembre de 2024");
    assert_eq!(format_date(Some("ayer")), NO_DATE);
    assert_eq!(format_date(None), NO_DATE);
  }
}
