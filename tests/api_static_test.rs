//! Integration tests for the static asset fallback

mod test_utils;

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{Request, StatusCode, header},
    };
    use tower::util::ServiceExt;

    use crate::test_utils::{body_to_string, test_app};

    /// Tests the index page is served from the static directory and
    /// never cached by the browser
    #[tokio::test]
    async fn it_serves_the_index_page_without_caching() {
        let (app, dir) = test_app().await;
        let static_path = dir.path().join("static");
        std::fs::create_dir_all(&static_path).unwrap();
        std::fs::write(static_path.join("index.html"), "<html>mailgraph</html>").unwrap();

        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CACHE_CONTROL).unwrap(),
            "no-cache"
        );
        let body = body_to_string(response.into_body()).await;
        assert_eq!(body, "<html>mailgraph</html>");
    }
}
