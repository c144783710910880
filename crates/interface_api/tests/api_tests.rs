//! HTTP tests against the router over in-memory ports

use std::sync::Arc;

use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::{json, Value};

use core_kernel::HealthCheckable;
use domain_customer::ports::mock::ScriptedFailure;
use interface_api::{config::ApiConfig, create_router, AppState};
use test_utils::{
    AddressFixtures, CustomerFixtures, MockedCustomerService, MockedCustomerServiceBuilder,
    PostalCodeFixtures,
};

fn server_for(mocked: &MockedCustomerService) -> TestServer {
    let health: Vec<Arc<dyn HealthCheckable>> = vec![
        mocked.customers.clone() as Arc<dyn HealthCheckable>,
        mocked.addresses.clone() as Arc<dyn HealthCheckable>,
    ];
    let state = AppState::new(mocked.service.clone(), health, ApiConfig::default());
    TestServer::new(create_router(state)).unwrap()
}

async fn create(server: &TestServer, name: &str, postal_code: &str) -> Value {
    let response = server
        .post("/api/v1/customers")
        .json(&CustomerFixtures::json_payload(name, postal_code))
        .await;
    response.assert_status(StatusCode::CREATED);
    response.json::<Value>()
}

mod health {
    use super::*;

    #[tokio::test]
    async fn test_liveness_and_readiness() {
        let mocked = MockedCustomerService::new().await;
        let server = server_for(&mocked);

        server.get("/health").await.assert_status_ok();

        let ready = server.get("/health/ready").await;
        ready.assert_status_ok();
        assert_eq!(ready.json::<Value>()["status"], "ready");
    }

    #[tokio::test]
    async fn test_readiness_fails_when_store_is_down() {
        let mocked = MockedCustomerService::new().await;
        mocked.customers.set_unavailable(true);
        let server = server_for(&mocked);

        server
            .get("/health/ready")
            .await
            .assert_status(StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_responses_carry_request_id() {
        let mocked = MockedCustomerService::new().await;
        let server = server_for(&mocked);

        let response = server.get("/health").await;
        assert!(response.headers().contains_key("x-request-id"));
    }
}

mod customers {
    use super::*;

    #[tokio::test]
    async fn test_create_resolves_address() {
        let mocked = MockedCustomerService::new().await;
        let server = server_for(&mocked);

        let body = create(&server, "Bob", "01001-000").await;

        assert_eq!(body["name"], "Bob");
        assert_eq!(body["address"]["postal_code"], "01001000");
        assert_eq!(body["address"]["street"], "Praça da Sé");

        let id = body["id"].as_i64().unwrap();
        let fetched = server.get(&format!("/api/v1/customers/{}", id)).await;
        fetched.assert_status_ok();
        assert_eq!(fetched.json::<Value>(), body);

        server
            .get(&format!("/api/v1/customers/CUS-{}", id))
            .await
            .assert_status_ok();
    }

    #[tokio::test]
    async fn test_create_with_cep_alias() {
        let mocked = MockedCustomerService::new().await;
        let server = server_for(&mocked);

        let response = server
            .post("/api/v1/customers")
            .json(&json!({ "name": "Carol", "address": { "cep": "01310-100" } }))
            .await;

        response.assert_status(StatusCode::CREATED);
        assert_eq!(response.json::<Value>()["address"]["city"], "São Paulo");
    }

    #[tokio::test]
    async fn test_lookup_failures_map_to_gateway_errors() {
        let mocked = MockedCustomerServiceBuilder::new()
            .with_failure(PostalCodeFixtures::paulista(), ScriptedFailure::Unavailable)
            .build()
            .await;
        let server = server_for(&mocked);

        server
            .post("/api/v1/customers")
            .json(&CustomerFixtures::json_payload("Eve", "99999999"))
            .await
            .assert_status(StatusCode::BAD_GATEWAY);

        server
            .post("/api/v1/customers")
            .json(&CustomerFixtures::json_payload("Eve", "Z"))
            .await
            .assert_status(StatusCode::BAD_GATEWAY);

        server
            .post("/api/v1/customers")
            .json(&CustomerFixtures::json_payload("Eve", "01310100"))
            .await
            .assert_status(StatusCode::SERVICE_UNAVAILABLE);

        assert!(mocked.customers.is_empty().await);
    }

    #[tokio::test]
    async fn test_blank_name_is_unprocessable() {
        let mocked = MockedCustomerService::new().await;
        let server = server_for(&mocked);

        server
            .post("/api/v1/customers")
            .json(&CustomerFixtures::json_payload("  ", "00000"))
            .await
            .assert_status(StatusCode::UNPROCESSABLE_ENTITY);

        assert_eq!(mocked.provider.call_count().await, 0);
    }

    #[tokio::test]
    async fn test_unknown_and_malformed_ids() {
        let mocked = MockedCustomerService::new().await;
        let server = server_for(&mocked);

        server
            .get("/api/v1/customers/404")
            .await
            .assert_status(StatusCode::NOT_FOUND);
        server
            .get("/api/v1/customers/not-an-id")
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_put_replaces_or_answers_not_found() {
        let mocked = MockedCustomerService::new().await;
        let server = server_for(&mocked);
        let id = create(&server, "Alice", "00000").await["id"].as_i64().unwrap();

        let response = server
            .put(&format!("/api/v1/customers/{}", id))
            .json(&CustomerFixtures::json_payload("Alice B.", "01001000"))
            .await;
        response.assert_status_ok();
        let body = response.json::<Value>();
        assert_eq!(body["name"], "Alice B.");
        assert_eq!(body["address"]["postal_code"], "01001000");

        server
            .put("/api/v1/customers/999")
            .json(&CustomerFixtures::json_payload("Ghost", "01001000"))
            .await
            .assert_status(StatusCode::NOT_FOUND);
        server
            .put("/api/v1/customers/999")
            .json(&CustomerFixtures::json_payload("", "01001000"))
            .await
            .assert_status(StatusCode::NOT_FOUND);
        server
            .put("/api/v1/customers/999")
            .json(&json!({ "name": "Ghost", "address": {} }))
            .await
            .assert_status(StatusCode::NOT_FOUND);
        assert_eq!(mocked.customers.len().await, 1);
    }

    #[tokio::test]
    async fn test_patch_changes_only_given_fields() {
        let mocked = MockedCustomerService::new().await;
        let server = server_for(&mocked);
        let id = create(&server, "Alice", "00000").await["id"].as_i64().unwrap();

        let renamed = server
            .patch(&format!("/api/v1/customers/{}", id))
            .json(&json!({ "name": "Alicia" }))
            .await;
        renamed.assert_status_ok();
        let body = renamed.json::<Value>();
        assert_eq!(body["name"], "Alicia");
        assert_eq!(body["address"]["street"], "Main St");

        let moved = server
            .patch(&format!("/api/v1/customers/{}", id))
            .json(&json!({ "address": { "postal_code": "01310100" } }))
            .await;
        moved.assert_status_ok();
        let body = moved.json::<Value>();
        assert_eq!(body["name"], "Alicia");
        assert_eq!(body["address"]["street"], "Avenida Paulista");

        server
            .patch(&format!("/api/v1/customers/{}", id))
            .json(&json!({ "address": {} }))
            .await
            .assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_delete_is_idempotent_and_keeps_address() {
        let mocked = MockedCustomerService::new().await;
        let server = server_for(&mocked);
        let id = create(&server, "Alice", "00000").await["id"].as_i64().unwrap();

        server
            .delete(&format!("/api/v1/customers/{}", id))
            .await
            .assert_status(StatusCode::NO_CONTENT);
        server
            .delete(&format!("/api/v1/customers/{}", id))
            .await
            .assert_status(StatusCode::NO_CONTENT);
        server
            .get(&format!("/api/v1/customers/{}", id))
            .await
            .assert_status(StatusCode::NOT_FOUND);

        server
            .get("/api/v1/addresses/00000")
            .await
            .assert_status_ok();
    }

    #[tokio::test]
    async fn test_batch_is_all_or_nothing() {
        let mocked = MockedCustomerService::new().await;
        let server = server_for(&mocked);

        server
            .post("/api/v1/customers/batch")
            .json(&json!([
                CustomerFixtures::json_payload("Alice", "00000"),
                CustomerFixtures::json_payload("Eve", "99999999"),
            ]))
            .await
            .assert_status(StatusCode::BAD_GATEWAY);
        assert!(mocked.customers.is_empty().await);

        let response = server
            .post("/api/v1/customers/batch")
            .json(&json!([
                CustomerFixtures::json_payload("Alice", "00000"),
                CustomerFixtures::json_payload("Bob", "01001000"),
            ]))
            .await;
        response.assert_status(StatusCode::CREATED);
        assert_eq!(response.json::<Vec<Value>>().len(), 2);

        let all = server.get("/api/v1/customers").await.json::<Vec<Value>>();
        assert_eq!(all.len(), 2);
    }
}

mod queries {
    use super::*;

    async fn seeded() -> (MockedCustomerService, TestServer) {
        let mocked = MockedCustomerService::new().await;
        let server = server_for(&mocked);
        for name in ["Carol", "alice", "Bob", "Alfred", "Dave"] {
            create(&server, name, "00000").await;
        }
        (mocked, server)
    }

    #[tokio::test]
    async fn test_page_metadata_and_sort() {
        let (_mocked, server) = seeded().await;

        let response = server
            .get("/api/v1/customers/page")
            .add_query_param("page", 1)
            .add_query_param("size", 2)
            .add_query_param("sort", "name,asc")
            .await;
        response.assert_status_ok();
        let body = response.json::<Value>();

        assert_eq!(body["total_elements"], 5);
        assert_eq!(body["total_pages"], 3);
        assert_eq!(body["last"], false);
        let names: Vec<&str> = body["content"]
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["Bob", "Carol"]);
    }

    #[tokio::test]
    async fn test_invalid_paging_is_bad_request() {
        let (_mocked, server) = seeded().await;

        server
            .get("/api/v1/customers/page")
            .add_query_param("size", 500)
            .await
            .assert_status(StatusCode::BAD_REQUEST);
        server
            .get("/api/v1/customers/page")
            .add_query_param("sort", "email")
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_search_ignores_case() {
        let (_mocked, server) = seeded().await;

        let body = server
            .get("/api/v1/customers/search")
            .add_query_param("name", "AL")
            .add_query_param("sort", "name")
            .await
            .json::<Value>();

        let names: Vec<&str> = body["content"]
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["Alfred", "alice"]);
        assert_eq!(body["last"], true);
    }
}

mod addresses {
    use super::*;

    #[tokio::test]
    async fn test_lookup_does_not_store() {
        let mocked = MockedCustomerService::new().await;
        let server = server_for(&mocked);

        let response = server.get("/api/v1/addresses/lookup/01001-000").await;
        response.assert_status_ok();
        assert_eq!(response.json::<Value>()["neighborhood"], "Sé");

        assert!(mocked.addresses.is_empty().await);
        server
            .get("/api/v1/addresses/01001000")
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_sync_overwrites_stored_address() {
        let mut stale = AddressFixtures::se();
        stale.street = "Old street".to_string();
        let mocked = MockedCustomerServiceBuilder::new()
            .with_stored(vec![stale])
            .build()
            .await;
        let server = server_for(&mocked);

        let synced = server.post("/api/v1/addresses/sync/01001000").await;
        synced.assert_status_ok();
        assert_eq!(synced.json::<Value>()["street"], "Praça da Sé");

        let stored = server.get("/api/v1/addresses/01001000").await.json::<Value>();
        assert_eq!(stored["street"], "Praça da Sé");
        assert_eq!(mocked.provider.calls_for(&PostalCodeFixtures::se()).await, 1);
    }
}
