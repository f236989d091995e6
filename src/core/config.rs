use std::env;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub storage_path: String,
    pub db_path: String,
    pub static_path: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        let storage_path = env::var("MAILGRAPH_STORAGE_PATH").unwrap_or("./".to_string());
        let db_path = format!("{}/db", storage_path);
        // Renderer assets, `index.html` is served at `/`
        let static_path =
            env::var("MAILGRAPH_STATIC_PATH").unwrap_or_else(|_| "./static".to_string());

        Self {
            storage_path,
            db_path,
            static_path,
        }
    }
}
