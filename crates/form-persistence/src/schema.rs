// Esquema Diesel para SQLite.
// Tablas: form_entries
diesel::table! {
    form_entries (entry_key) {
        entry_key -> Text,
        entry_value -> Text,
        updated_at_ts -> BigInt,
    }
}
