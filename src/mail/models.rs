use chrono::NaiveDateTime;

/// One message as the graph sees it: a single author and everyone
/// who received it, in the order they were recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageRecord {
    pub timestamp: NaiveDateTime,
    pub subject: String,
    pub author_email: String,
    // May contain the same address more than once
    pub receiver_emails: Vec<String>,
}

/// A stored message with its raw `From` and `To` text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mail {
    pub subject: String,
    pub date: NaiveDateTime,
    pub sender: String,
    // Comma separated
    pub recipients: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Employee {
    pub email: String,
    pub name: Option<String>,
    pub position: Option<String>,
    pub sector: Option<String>,
    // Stored as M/D/YYYY
    pub start_date: Option<String>,
}

/// Exact match parameters identifying a single stored message
#[derive(Debug, Clone)]
pub struct MailLookup {
    pub subject: String,
    pub date: NaiveDateTime,
    pub from: String,
    pub to: String,
}

/// Everyone involved in a message, author first
#[derive(Debug, Clone)]
pub struct MailParticipants {
    pub record: MessageRecord,
    pub employees: Vec<Employee>,
}
