pub mod db;
pub mod import;
mod models;

pub use models::*;

use crate::filter::dates::format_date_time;

/// Title shown for a message, e.g. `2001-05-14 16:39 | Lunch`, or an
/// empty string when there is no message.
pub fn mail_title(record: Option<&MessageRecord>) -> String {
    match record {
        Some(record) => format!(
            "{} | {}",
            format_date_time(&record.timestamp),
            record.subject
        ),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::dates::parse_date_time;

    #[test]
    fn it_formats_mail_titles() {
        let record = MessageRecord {
            timestamp: parse_date_time("2020-01-01 09:00").unwrap(),
            subject: String::from("Hi"),
            author_email: String::from("a@x.com"),
            receiver_emails: vec![String::from("b@x.com")],
        };
        assert_eq!(mail_title(Some(&record)), "2020-01-01 09:00 | Hi");
        assert_eq!(mail_title(None), "");
    }
}
