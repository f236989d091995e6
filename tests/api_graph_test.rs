//! Integration tests for the graph endpoint

mod test_utils;

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use serde_json::{Value, json};
    use tower::util::ServiceExt;

    use crate::test_utils::{body_to_json, filter_query, test_app};

    async fn get_graph(query: &str) -> (StatusCode, Value) {
        let (app, _dir) = test_app().await;
        let response = app
            .oneshot(
                Request::builder()
                    .uri(format!("/graph?{}", query))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let body = if status == StatusCode::OK {
            body_to_json(response.into_body()).await
        } else {
            Value::Null
        };
        (status, body)
    }

    fn subjects(graph: &Value) -> Vec<String> {
        graph["nodes"]
            .as_array()
            .unwrap()
            .iter()
            .map(|n| n["subject"].as_str().unwrap().to_string())
            .collect()
    }

    /// Tests the whole default graph in node and link order
    #[tokio::test]
    async fn it_builds_the_default_graph() {
        let (status, graph) = get_graph(&filter_query(&[])).await;
        assert_eq!(status, StatusCode::OK);

        let expected = json!({
            "nodes": [
                {"subject": "2001-05-14 16:39 | Quarterly numbers", "label": "mail", "group": "M"},
                {"subject": "alice@enron.com", "label": "person", "group": "P"},
                {"subject": "bob@enron.com", "label": "person", "group": "P"},
                {"subject": "carol@enron.com", "label": "person", "group": "P"},
                {"subject": "2001-05-15 09:00 | Re: Quarterly numbers", "label": "mail", "group": "M"},
                {"subject": "2001-06-01 12:30 | Lunch", "label": "mail", "group": "M"},
                {"subject": "dave@enron.com", "label": "person", "group": "P"},
                {"subject": "2019-12-31 23:59 | Year end", "label": "mail", "group": "M"},
            ],
            "links": [
                {"source": 0, "target": 1},
                {"source": 2, "target": 0, "type": "relationship type"},
                {"source": 3, "target": 0, "type": "relationship type"},
                {"source": 4, "target": 2},
                {"source": 1, "target": 4, "type": "relationship type"},
                {"source": 5, "target": 1},
                {"source": 6, "target": 5, "type": "relationship type"},
                {"source": 7, "target": 3},
                {"source": 1, "target": 7, "type": "relationship type"},
                {"source": 2, "target": 7, "type": "relationship type"},
                {"source": 3, "target": 7, "type": "relationship type"},
                {"source": 6, "target": 7, "type": "relationship type"},
            ],
        });
        assert_eq!(graph, expected);
    }

    /// Tests a missing parameter is answered with an empty graph
    #[tokio::test]
    async fn it_returns_an_empty_graph_for_missing_params() {
        let query = "start_date=&end_date=&subject=&from=&to=";
        let (status, graph) = get_graph(query).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(graph, json!({"nodes": [], "links": []}));

        let (status, graph) = get_graph("").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(graph, json!({"nodes": [], "links": []}));
    }

    /// Tests only the first value of a repeated key is used
    #[tokio::test]
    async fn it_uses_the_first_of_repeated_keys() {
        let query = format!("{}&subject=", filter_query(&[("subject", "lunch")]));
        let (status, graph) = get_graph(&query).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            subjects(&graph),
            vec![
                "2001-06-01 12:30 | Lunch",
                "alice@enron.com",
                "dave@enron.com",
            ]
        );
    }

    /// Tests a malformed date is a client error
    #[tokio::test]
    async fn it_returns_400_for_malformed_dates() {
        let (status, _) = get_graph(&filter_query(&[("start_date", "2001-05")])).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    /// Tests a non-numeric receiver limit is a client error
    #[tokio::test]
    async fn it_returns_400_for_malformed_limits() {
        let (status, _) = get_graph(&filter_query(&[("limit", "lots")])).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    /// Tests subject matching ignores case
    #[tokio::test]
    async fn it_filters_by_subject() {
        let (status, graph) = get_graph(&filter_query(&[("subject", "QUARTERLY")])).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            subjects(&graph),
            vec![
                "2001-05-14 16:39 | Quarterly numbers",
                "alice@enron.com",
                "bob@enron.com",
                "carol@enron.com",
                "2001-05-15 09:00 | Re: Quarterly numbers",
            ]
        );
    }

    /// Tests the sender filter
    #[tokio::test]
    async fn it_filters_by_sender() {
        let (_, graph) = get_graph(&filter_query(&[("from", "bob@")])).await;
        assert_eq!(
            subjects(&graph),
            vec![
                "2001-05-15 09:00 | Re: Quarterly numbers",
                "bob@enron.com",
                "alice@enron.com",
            ]
        );
        assert_eq!(
            graph["links"],
            json!([
                {"source": 0, "target": 1},
                {"source": 2, "target": 0, "type": "relationship type"},
            ])
        );
    }

    /// Tests mails with more receivers than the limit are left out
    #[tokio::test]
    async fn it_filters_by_receiver_limit() {
        let (_, graph) = get_graph(&filter_query(&[("limit", "3")])).await;
        let subjects = subjects(&graph);
        assert!(!subjects.contains(&"2019-12-31 23:59 | Year end".to_string()));
        assert_eq!(graph["nodes"].as_array().unwrap().len(), 7);
    }

    /// Tests the date range bounds
    #[tokio::test]
    async fn it_filters_by_date_range() {
        let (_, graph) = get_graph(&filter_query(&[
            ("start_date", "6/1/2001"),
            ("end_date", "2022-01-01 00:00"),
        ]))
        .await;
        let mails: Vec<String> = subjects(&graph)
            .into_iter()
            .filter(|s| s.contains(" | "))
            .collect();
        assert_eq!(
            mails,
            vec![
                "2001-06-01 12:30 | Lunch",
                "2019-12-31 23:59 | Year end",
                "2021-03-01 10:00 | Too late",
            ]
        );
    }
}
