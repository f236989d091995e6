//! Database queries backing the graph, search, and mail endpoints
use anyhow::{Error, Result};
use chrono::NaiveDateTime;
use itertools::Itertools;
use rusqlite::{OptionalExtension, Row, ToSql, types::Type};
use tokio_rusqlite::Connection;

use super::models::{Employee, Mail, MailLookup, MailParticipants, MessageRecord};
use crate::filter::QueryFilter;
use crate::filter::dates::{parse_query_text, to_query_text};

/// Shared `WHERE` clause for filter driven queries. Receivers are
/// counted by the commas in the raw `To` text.
const CONDITION: &str = r"
    m.subject REGEXP :subject
    AND m.sender REGEXP :sender
    AND m.recipients REGEXP :recipients
    AND m.date >= :start_date
    AND m.date <= :end_date
    AND (length(m.recipients) - length(replace(m.recipients, ',', '')) + 1) <= :max_receivers
";

/// Owned copy of the filter values bound to `CONDITION`
struct ConditionValues {
    subject: String,
    sender: String,
    recipients: String,
    start_date: String,
    end_date: String,
    max_receivers: i64,
}

impl From<&QueryFilter> for ConditionValues {
    fn from(filter: &QueryFilter) -> Self {
        Self {
            subject: filter.subject.anchored(),
            sender: filter.from.anchored(),
            recipients: filter.to.anchored(),
            start_date: filter.date_range.start_text(),
            end_date: filter.date_range.end_text(),
            max_receivers: i64::try_from(filter.max_receivers).unwrap_or(i64::MAX),
        }
    }
}

impl ConditionValues {
    fn params(&self) -> [(&str, &dyn ToSql); 6] {
        [
            (":subject", &self.subject as &dyn ToSql),
            (":sender", &self.sender as &dyn ToSql),
            (":recipients", &self.recipients as &dyn ToSql),
            (":start_date", &self.start_date as &dyn ToSql),
            (":end_date", &self.end_date as &dyn ToSql),
            (":max_receivers", &self.max_receivers as &dyn ToSql),
        ]
    }
}

fn date_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<NaiveDateTime> {
    let text: String = row.get(idx)?;
    parse_query_text(&text)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn employee_from_row(row: &Row<'_>) -> rusqlite::Result<Employee> {
    Ok(Employee {
        email: row.get(0)?,
        name: row.get(1)?,
        position: row.get(2)?,
        sector: row.get(3)?,
        start_date: row.get(4)?,
    })
}

/// One author/receiver pair of a matching message
struct ReceivedRow {
    mail_id: i64,
    date: NaiveDateTime,
    subject: String,
    author_email: String,
    receiver_email: String,
}

/// Find messages matching the filter as records of author and
/// receivers, at most `filter.result_limit` of them.
pub async fn find_message_records(
    db: &Connection,
    filter: &QueryFilter,
) -> Result<Vec<MessageRecord>, Error> {
    let values = ConditionValues::from(filter);
    let rows = db
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                r"
                SELECT m.id, m.date, m.subject, s.person_email, r.person_email
                FROM mail m
                JOIN sent s ON s.mail_id = m.id
                JOIN received r ON r.mail_id = m.id
                WHERE {CONDITION}
                ORDER BY m.date, m.id, s.person_email, r.id
                "
            ))?;
            let rows = stmt
                .query_map(values.params().as_slice(), |row| {
                    Ok(ReceivedRow {
                        mail_id: row.get(0)?,
                        date: date_column(row, 1)?,
                        subject: row.get(2)?,
                        author_email: row.get(3)?,
                        receiver_email: row.get(4)?,
                    })
                })?
                .collect::<rusqlite::Result<Vec<ReceivedRow>>>()?;
            Ok(rows)
        })
        .await?;

    // Rows arrive sorted so each (message, author) pair is contiguous
    let mut records = Vec::new();
    let chunks = rows
        .into_iter()
        .chunk_by(|row| (row.mail_id, row.author_email.clone()));
    for ((_, author_email), mut group) in &chunks {
        if records.len() == filter.result_limit {
            break;
        }
        let Some(first) = group.next() else {
            continue;
        };
        let mut receiver_emails = vec![first.receiver_email];
        receiver_emails.extend(group.map(|row| row.receiver_email));
        records.push(MessageRecord {
            timestamp: first.date,
            subject: first.subject,
            author_email,
            receiver_emails,
        });
    }

    Ok(records)
}

/// Find stored messages matching the filter
pub async fn search_mails(db: &Connection, filter: &QueryFilter) -> Result<Vec<Mail>, Error> {
    let values = ConditionValues::from(filter);
    let mails = db
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                r"
                SELECT m.subject, m.date, m.sender, m.recipients
                FROM mail m
                WHERE {CONDITION}
                ORDER BY m.date, m.id
                "
            ))?;
            let mails = stmt
                .query_map(values.params().as_slice(), |row| {
                    Ok(Mail {
                        subject: row.get(0)?,
                        date: date_column(row, 1)?,
                        sender: row.get(2)?,
                        recipients: row.get(3)?,
                    })
                })?
                .collect::<rusqlite::Result<Vec<Mail>>>()?;
            Ok(mails)
        })
        .await?;

    Ok(mails)
}

/// Look up a single message by exact subject, date, `From`, and `To`
/// text and return its author followed by each distinct receiver.
pub async fn find_mail_participants(
    db: &Connection,
    lookup: MailLookup,
) -> Result<Option<MailParticipants>, Error> {
    let date = to_query_text(&lookup.date);
    let participants = db
        .call(move |conn| {
            let found = conn
                .query_row(
                    r"
                    SELECT m.id, m.date, m.subject, s.person_email
                    FROM mail m
                    JOIN sent s ON s.mail_id = m.id
                    WHERE m.subject = ?1
                      AND m.date = ?2
                      AND m.sender = ?3
                      AND m.recipients = ?4
                      AND EXISTS (SELECT 1 FROM received r WHERE r.mail_id = m.id)
                    ORDER BY m.id
                    LIMIT 1
                    ",
                    [&lookup.subject, &date, &lookup.from, &lookup.to],
                    |row| {
                        Ok((
                            row.get::<_, i64>(0)?,
                            date_column(row, 1)?,
                            row.get::<_, String>(2)?,
                            row.get::<_, String>(3)?,
                        ))
                    },
                )
                .optional()?;
            let Some((mail_id, timestamp, subject, author_email)) = found else {
                return Ok(None);
            };

            let author = conn.query_row(
                "SELECT email, name, position, sector, start_date FROM person WHERE email = ?1",
                [&author_email],
                employee_from_row,
            )?;

            let mut stmt = conn.prepare(
                r"
                SELECT p.email, p.name, p.position, p.sector, p.start_date
                FROM received r
                JOIN person p ON p.email = r.person_email
                WHERE r.mail_id = ?1
                GROUP BY p.email
                ORDER BY MIN(r.id)
                ",
            )?;
            let receivers = stmt
                .query_map([mail_id], employee_from_row)?
                .collect::<rusqlite::Result<Vec<Employee>>>()?;

            let record = MessageRecord {
                timestamp,
                subject,
                author_email,
                receiver_emails: receivers.iter().map(|e| e.email.clone()).collect(),
            };
            let mut employees = Vec::with_capacity(receivers.len() + 1);
            employees.push(author);
            employees.extend(receivers);

            Ok(Some(MailParticipants { record, employees }))
        })
        .await?;

    Ok(participants)
}
