use shared::{AppConfig, ConfigError};

// Captured by trunk/cargo at build time; the page has no environment.
fn build_env(key: &str) -> Option<&'static str> {
    match key {
        "BACKEND_URL" => option_env!("BACKEND_URL"),
        "LOCALE_TRANSPORT" => option_env!("LOCALE_TRANSPORT"),
        "DEFAULT_LOCALE" => option_env!("DEFAULT_LOCALE"),
        "SUPABASE_URL" => option_env!("SUPABASE_URL"),
        "SUPABASE_KEY" => option_env!("SUPABASE_KEY"),
        "SUPABASE_TABLE" => option_env!("SUPABASE_TABLE"),
        "SUPABASE_BUCKET" => option_env!("SUPABASE_BUCKET"),
        _ => None,
    }
}

pub fn load() -> Result<AppConfig, ConfigError> {
    AppConfig::from_lookup(|key| build_env(key).map(str::to_string))
}
