use std::sync::Arc;

use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::{json, Value};
use tracksim::api::create_jira_router;
use tracksim::config::GenConfig;
use tracksim::gen::Generator;
use tracksim::store::OverrideStore;

fn setup() -> TestServer {
    let engine = Arc::new(Generator::new(GenConfig::default()));
    let app = create_jira_router(engine, OverrideStore::open_memory());
    TestServer::new(app).expect("Failed to create test server")
}

mod search {
    use super::*;

    #[tokio::test]
    async fn returns_a_windowed_page_with_analytic_total() {
        let server = setup();
        let response = server
            .get("/rest/api/3/search/jql")
            .add_query_param("jql", "project = ITPM AND issuetype in (10000, 10001)")
            .add_query_param("maxResults", "5")
            .await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["maxResults"], 5);
        assert_eq!(body["issues"].as_array().unwrap().len(), 5);
        assert!(body["total"].as_u64().unwrap() > 150);
        assert_eq!(body["isLast"], false);
        for issue in body["issues"].as_array().unwrap() {
            assert!(issue["key"].as_str().unwrap().starts_with("ITPM-"));
        }
    }

    #[tokio::test]
    async fn post_body_matches_the_get_form() {
        let server = setup();
        let via_get = server
            .get("/rest/api/3/search/jql")
            .add_query_param("jql", "project = SEC AND issuetype = 10001")
            .await
            .json::<Value>();
        let via_post = server
            .post("/rest/api/3/search")
            .json(&json!({"jql": "project = SEC AND issuetype = 10001"}))
            .await
            .json::<Value>();

        assert_eq!(via_get["total"], via_post["total"]);
        assert_eq!(via_get["issues"], via_post["issues"]);
    }

    #[tokio::test]
    async fn unknown_project_gives_an_empty_page() {
        let server = setup();
        let body: Value = server
            .get("/rest/api/3/search/jql")
            .add_query_param("jql", "project = ZZZZ")
            .await
            .json();
        assert_eq!(body["total"], 0);
        assert!(body["issues"].as_array().unwrap().is_empty());
    }
}

mod issues {
    use super::*;

    #[tokio::test]
    async fn lookup_by_key_and_not_found() {
        let server = setup();
        let response = server.get("/rest/api/3/issue/ITPM-1").await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["key"], "ITPM-1");
        assert_eq!(body["fields"]["issuetype"]["name"], "Initiative");
        assert!(body["fields"]["summary"].as_str().unwrap().starts_with("[FY"));

        server
            .get("/rest/api/3/issue/ITPM-99")
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn put_patch_is_merged_into_later_reads() {
        let server = setup();
        let before: Value = server.get("/rest/api/3/issue/ITPM-1").await.json();

        server
            .put("/rest/api/3/issue/ITPM-1")
            .json(&json!({"fields": {"summary": "Edited summary"}}))
            .await
            .assert_status(StatusCode::NO_CONTENT);

        let after: Value = server.get("/rest/api/3/issue/ITPM-1").await.json();
        assert_eq!(after["fields"]["summary"], "Edited summary");
        // Untouched fields keep their generated values.
        assert_eq!(after["fields"]["labels"], before["fields"]["labels"]);
        assert_eq!(after["fields"]["status"], before["fields"]["status"]);

        // The patch also rides along in search results.
        let search: Value = server
            .get("/rest/api/3/search/jql")
            .add_query_param("jql", "project = ITPM AND issuetype = 10001")
            .await
            .json();
        assert_eq!(search["issues"][0]["fields"]["summary"], "Edited summary");
    }

    #[tokio::test]
    async fn created_issues_are_served_back() {
        let server = setup();
        let response = server
            .post("/rest/api/3/issue")
            .json(&json!({"fields": {"project": {"key": "ITPM"}, "summary": "Brand new"}}))
            .await;
        response.assert_status(StatusCode::CREATED);
        let created: Value = response.json();
        assert_eq!(created["key"], "ITPM-50000");

        let fetched: Value = server.get("/rest/api/3/issue/ITPM-50000").await.json();
        assert_eq!(fetched["fields"]["summary"], "Brand new");

        server
            .post("/rest/api/3/issue")
            .json(&json!({"fields": {"summary": "No project"}}))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
        server
            .post("/rest/api/3/issue")
            .json(&json!({"fields": {"project": {"key": "ZZZZ"}, "summary": "x"}}))
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }
}

mod transitions {
    use super::*;

    #[tokio::test]
    async fn applying_a_transition_moves_the_status() {
        let server = setup();
        let body: Value = server.get("/rest/api/3/issue/ITPM-1/transitions").await.json();
        let transitions = body["transitions"].as_array().unwrap();
        assert!(!transitions.is_empty());

        let chosen = &transitions[0];
        server
            .post("/rest/api/3/issue/ITPM-1/transitions")
            .json(&json!({"transition": {"id": chosen["id"]}}))
            .await
            .assert_status(StatusCode::NO_CONTENT);

        let issue: Value = server.get("/rest/api/3/issue/ITPM-1").await.json();
        assert_eq!(issue["fields"]["status"]["name"], chosen["name"]);
    }

    #[tokio::test]
    async fn unavailable_transition_is_rejected() {
        let server = setup();
        server
            .post("/rest/api/3/issue/ITPM-1/transitions")
            .json(&json!({"transition": {"id": "999"}}))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }
}

mod projects_and_catalogs {
    use super::*;

    #[tokio::test]
    async fn project_pages_and_lookup() {
        let server = setup();
        let page: Value = server
            .get("/rest/api/3/project")
            .add_query_param("maxResults", "10")
            .await
            .json();
        assert_eq!(page["values"].as_array().unwrap().len(), 10);
        assert!(page["total"].as_u64().unwrap() > 6_000);
        assert_eq!(page["isLast"], false);

        let by_year: Value = server
            .get("/rest/api/3/project")
            .add_query_param("year", "2024")
            .add_query_param("maxResults", "5")
            .await
            .json();
        assert!(by_year["total"].as_u64().unwrap() < page["total"].as_u64().unwrap());

        server.get("/rest/api/3/project/ITPM").await.assert_status_ok();
        server
            .get("/rest/api/3/project/ZZZZ")
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn catalog_endpoints_serve_the_fixed_sets() {
        let server = setup();
        let statuses: Value = server.get("/rest/api/3/status").await.json();
        assert_eq!(statuses.as_array().unwrap().len(), 8);
        let priorities: Value = server.get("/rest/api/3/priority").await.json();
        assert_eq!(priorities.as_array().unwrap().len(), 5);
        let types: Value = server.get("/rest/api/3/issuetype").await.json();
        assert_eq!(types.as_array().unwrap().len(), 6);

        let me: Value = server.get("/rest/api/3/myself").await.json();
        assert_eq!(me["accountId"], "user-000000");
    }

    #[tokio::test]
    async fn user_search_filters_by_substring() {
        let server = setup();
        let all: Value = server
            .get("/rest/api/3/user/search")
            .add_query_param("maxResults", "3")
            .await
            .json();
        assert_eq!(all.as_array().unwrap().len(), 3);

        let name = all[0]["displayName"].as_str().unwrap().to_lowercase();
        let fragment = name.split(' ').next().unwrap();
        let hits: Value = server
            .get("/rest/api/3/user/search")
            .add_query_param("query", fragment)
            .await
            .json();
        assert!(!hits.as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn health_and_stats() {
        let server = setup();
        server.get("/health").await.assert_status_ok();
        let stats: Value = server.get("/stats").await.json();
        assert_eq!(stats["dataset"]["seed"], "capacity-planner-mock-2024");
        assert_eq!(stats["overrides"]["issuePatches"], 0);
    }
}
