use std::collections::HashMap;

use anyhow::Result;

use crate::core::db::async_db;
use crate::filter::build_filter;
use crate::graph::{Graph, assemble_graph};
use crate::mail::db::find_message_records;

/// Raw filter values, empty strings select the defaults
pub struct QueryParams {
    pub start_date: String,
    pub end_date: String,
    pub subject: String,
    pub from: String,
    pub to: String,
    pub limit: String,
}

impl From<QueryParams> for HashMap<String, String> {
    fn from(params: QueryParams) -> Self {
        HashMap::from([
            ("start_date".to_string(), params.start_date),
            ("end_date".to_string(), params.end_date),
            ("subject".to_string(), params.subject),
            ("from".to_string(), params.from),
            ("to".to_string(), params.to),
            ("limit".to_string(), params.limit),
        ])
    }
}

/// Assemble the graph for the given filter values
pub async fn graph_for(params: QueryParams, db_path: &str) -> Result<Graph> {
    let raw: HashMap<String, String> = params.into();
    let filter = build_filter(&raw)?;
    let db = async_db(db_path).await?;
    let records = find_message_records(&db, &filter).await?;
    Ok(assemble_graph(&records))
}

pub async fn run(params: QueryParams, db_path: &str) -> Result<()> {
    let graph = graph_for(params, db_path).await?;
    println!("{}", serde_json::to_string(&graph)?);
    eprintln!(
        "{} mails, {} people",
        graph.mail_count(),
        graph.person_count()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::import;
    use crate::filter::REQUIRED_PARAMS;

    fn empty_params() -> QueryParams {
        QueryParams {
            start_date: String::new(),
            end_date: String::new(),
            subject: String::new(),
            from: String::new(),
            to: String::new(),
            limit: String::new(),
        }
    }

    #[test]
    fn it_carries_every_required_key() {
        let raw: HashMap<String, String> = empty_params().into();
        let mut keys: Vec<&str> = raw.keys().map(String::as_str).collect();
        keys.sort();
        let mut required = REQUIRED_PARAMS.to_vec();
        required.sort();
        assert_eq!(keys, required);
        assert!(build_filter(&raw).is_ok());
    }

    #[tokio::test]
    async fn it_queries_an_imported_dataset() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("db");
        std::fs::create_dir_all(&db_path).unwrap();
        let db_path = db_path.to_str().unwrap();

        import::run("./tests/data/dataset.json", db_path)
            .await
            .unwrap();

        let graph = graph_for(empty_params(), db_path).await.unwrap();
        assert_eq!(graph.mail_count(), 4);
        assert_eq!(graph.person_count(), 4);

        let lunch = QueryParams {
            subject: "lunch".to_string(),
            ..empty_params()
        };
        let graph = graph_for(lunch, db_path).await.unwrap();
        assert_eq!(graph.mail_count(), 1);
        assert_eq!(graph.person_count(), 2);

        assert!(run(empty_params(), db_path).await.is_ok());
    }
}
