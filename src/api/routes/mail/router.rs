//! Router for the mail API

use std::collections::HashMap;
use std::sync::Arc;

use axum::{Router, extract::State, response::Json, routing::get};
use axum_extra::extract::Query;

use super::public;
use crate::api::state::AppState;
use crate::filter::dates::parse_date_time;
use crate::filter::{FilterError, QueryFilter, build_filter};
use crate::graph::assemble_graph;
use crate::mail::db as mail_db;
use crate::mail::{MailLookup, mail_title};

type SharedState = Arc<AppState>;

/// Raw query parameters keep every value of a repeated key, only the
/// first one is used.
type RawParams = HashMap<String, Vec<String>>;

fn first_values(params: RawParams) -> HashMap<String, String> {
    params
        .into_iter()
        .filter_map(|(name, values)| values.into_iter().next().map(|value| (name, value)))
        .collect()
}

/// Build the filter, or `None` when a required parameter is missing
/// so the caller can answer with an empty result.
fn filter_or_none(endpoint: &str, params: RawParams) -> Result<Option<QueryFilter>, FilterError> {
    match build_filter(&first_values(params)) {
        Ok(filter) => Ok(Some(filter)),
        Err(err) if err.is_missing_parameter() => {
            tracing::debug!("{} request returning an empty result: {}", endpoint, err);
            Ok(None)
        }
        Err(err) => Err(err),
    }
}

// Graph of who sent what to whom
async fn graph_handler(
    State(state): State<SharedState>,
    Query(params): Query<RawParams>,
) -> Result<Json<public::GraphResponse>, crate::api::public::ApiError> {
    let Some(filter) = filter_or_none("Graph", params)? else {
        return Ok(Json(public::GraphResponse::default()));
    };

    let records = mail_db::find_message_records(&state.db, &filter).await?;
    let graph = assemble_graph(&records);
    tracing::debug!(
        "Assembled graph with {} nodes and {} links from {} records",
        graph.nodes.len(),
        graph.links.len(),
        records.len()
    );

    Ok(Json(graph))
}

// Search mail
async fn search_handler(
    State(state): State<SharedState>,
    Query(params): Query<RawParams>,
) -> Result<Json<public::SearchResponse>, crate::api::public::ApiError> {
    let Some(filter) = filter_or_none("Search", params)? else {
        return Ok(Json(public::SearchResponse::default()));
    };

    let found = mail_db::search_mails(&state.db, &filter)
        .await?
        .into_iter()
        .map(public::FoundMail::from)
        .collect();

    Ok(Json(public::SearchResponse { found }))
}

// Everyone involved in a single mail
async fn mail_handler(
    State(state): State<SharedState>,
    Query(params): Query<public::MailQuery>,
) -> Result<Json<public::MailResponse>, crate::api::public::ApiError> {
    let lookup = MailLookup {
        date: parse_date_time(&params.date)?,
        subject: params.subject,
        from: params.from,
        to: params.to,
    };
    let participants = mail_db::find_mail_participants(&state.db, lookup).await?;

    let resp = match participants {
        Some(participants) => public::MailResponse {
            subject: mail_title(Some(&participants.record)),
            employees: participants
                .employees
                .into_iter()
                .map(public::Employee::from)
                .collect(),
        },
        None => public::MailResponse {
            subject: mail_title(None),
            employees: Vec::new(),
        },
    };

    Ok(Json(resp))
}

/// Create the mail router
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/graph", get(graph_handler))
        .route("/search", get(search_handler))
        .route("/mail", get(mail_handler))
}
