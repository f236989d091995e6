//! Loads people and messages from a JSON dataset
use std::fs;

use anyhow::{Context, Error, Result};
use serde::Deserialize;
use tokio_rusqlite::Connection;

use crate::filter::dates::{parse_date_time, to_query_text};

#[derive(Debug, Default, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub people: Vec<PersonEntry>,
    #[serde(default)]
    pub mails: Vec<MailEntry>,
}

#[derive(Debug, Deserialize)]
pub struct PersonEntry {
    pub email: String,
    pub name: Option<String>,
    pub position: Option<String>,
    pub sector: Option<String>,
    /// M/D/YYYY
    pub start_date: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct MailEntry {
    /// Any form accepted by `parse_date_time`
    pub date: String,
    pub subject: String,
    pub from: String,
    pub to: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    pub people: usize,
    pub mails: usize,
}

pub fn load_dataset(path: &str) -> Result<Dataset> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("Failed to read dataset {}", path))?;
    let dataset = serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse dataset {}", path))?;
    Ok(dataset)
}

/// Insert everything in the dataset in a single transaction.
///
/// People referenced by a message but not listed in `people` are
/// created with only their email. Listed people overwrite existing
/// rows with the same email.
pub async fn import_dataset(db: &Connection, dataset: Dataset) -> Result<ImportSummary, Error> {
    let Dataset { people, mails } = dataset;

    // Validate every date before touching the database
    let mut dated_mails = Vec::with_capacity(mails.len());
    for (i, mail) in mails.into_iter().enumerate() {
        let date = parse_date_time(&mail.date)
            .with_context(|| format!("Invalid date for mail {} \"{}\"", i, mail.subject))?;
        dated_mails.push((to_query_text(&date), mail));
    }

    let summary = ImportSummary {
        people: people.len(),
        mails: dated_mails.len(),
    };

    db.call(move |conn| {
        let tx = conn.transaction()?;
        {
            let mut upsert_person = tx.prepare(
                r"
                INSERT INTO person (email, name, position, sector, start_date)
                VALUES (?1, ?2, ?3, ?4, ?5)
                ON CONFLICT (email) DO UPDATE SET
                  name = excluded.name,
                  position = excluded.position,
                  sector = excluded.sector,
                  start_date = excluded.start_date
                ",
            )?;
            for person in &people {
                upsert_person.execute(rusqlite::params![
                    person.email,
                    person.name,
                    person.position,
                    person.sector,
                    person.start_date,
                ])?;
            }

            let mut insert_mail = tx.prepare(
                "INSERT INTO mail (date, subject, sender, recipients) VALUES (?1, ?2, ?3, ?4)",
            )?;
            let mut ensure_person = tx.prepare("INSERT OR IGNORE INTO person (email) VALUES (?1)")?;
            let mut insert_sent =
                tx.prepare("INSERT OR IGNORE INTO sent (mail_id, person_email) VALUES (?1, ?2)")?;
            let mut insert_received =
                tx.prepare("INSERT INTO received (mail_id, person_email) VALUES (?1, ?2)")?;

            for (date, mail) in &dated_mails {
                let recipients = mail.to.join(", ");
                insert_mail.execute(rusqlite::params![date, mail.subject, mail.from, recipients])?;
                let mail_id = tx.last_insert_rowid();

                ensure_person.execute([&mail.from])?;
                insert_sent.execute(rusqlite::params![mail_id, mail.from])?;
                for receiver in &mail.to {
                    ensure_person.execute([receiver])?;
                    insert_received.execute(rusqlite::params![mail_id, receiver])?;
                }
            }
        }
        tx.commit()?;
        Ok(())
    })
    .await?;

    tracing::debug!(
        "Imported {} people and {} mails",
        summary.people,
        summary.mails
    );

    Ok(summary)
}
