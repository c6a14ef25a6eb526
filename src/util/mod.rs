pub mod local_zone;
pub mod toml_date;
