//! Public types for the mail API
use serde::{Deserialize, Serialize};

use crate::filter::dates::{format_date_time, format_stored_date};
use crate::mail;

// Graph

pub use crate::graph::Graph as GraphResponse;

// Search

#[derive(Serialize, Deserialize)]
pub struct FoundMail {
    pub subject: String,
    pub date: String,
    pub from: String,
    pub to: String,
}

impl From<mail::Mail> for FoundMail {
    fn from(mail: mail::Mail) -> Self {
        Self {
            subject: mail.subject,
            date: format_date_time(&mail.date),
            from: mail.sender,
            to: mail.recipients,
        }
    }
}

#[derive(Default, Serialize, Deserialize)]
pub struct SearchResponse {
    pub found: Vec<FoundMail>,
}

// Mail participants

/// Exact match parameters for a single mail, as shown in search
/// results
#[derive(Deserialize)]
pub struct MailQuery {
    pub subject: String,
    pub date: String,
    pub from: String,
    pub to: String,
}

#[derive(Serialize, Deserialize)]
pub struct Employee {
    pub email: String,
    pub name: Option<String>,
    pub position: Option<String>,
    pub sector: Option<String>,
    pub start_date: Option<String>,
}

impl From<mail::Employee> for Employee {
    fn from(employee: mail::Employee) -> Self {
        Self {
            email: employee.email,
            name: employee.name,
            position: employee.position,
            sector: employee.sector,
            start_date: employee.start_date.as_deref().map(format_stored_date),
        }
    }
}

#[derive(Serialize, Deserialize)]
pub struct MailResponse {
    pub subject: String,
    pub employees: Vec<Employee>,
}
