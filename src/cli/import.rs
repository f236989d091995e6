use anyhow::Result;

use crate::core::db::{async_db, initialize_db};
use crate::mail::import::{import_dataset, load_dataset};

pub async fn run(file: &str, db_path: &str) -> Result<()> {
    let dataset = load_dataset(file)?;

    let db = async_db(db_path).await?;
    db.call(|conn| {
        initialize_db(conn)?;
        Ok(())
    })
    .await?;

    println!("Importing {}...", file);
    let summary = import_dataset(&db, dataset).await?;
    println!(
        "Finished importing {} people and {} mails",
        summary.people, summary.mails
    );

    Ok(())
}
