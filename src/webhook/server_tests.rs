// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Tests for the webhook HTTP surface.

#[cfg(test)]
mod tests {
    use crate::challenge::ChallengeRequest;
    use crate::errors::SolverError;
    use crate::solver::ChallengeSolver;
    use crate::webhook::server::{router, AppState};
    use async_trait::async_trait;
    use reqwest::StatusCode;
    use serde_json::{json, Value};
    use std::sync::Arc;
    use std::sync::Mutex;
    use tokio::net::TcpListener;

    const GROUP: &str = "acme.example.com";
    const SOLVER: &str = "dns.services.cert-manager.io";

    /// Records calls and fails Present for FQDNs under `fail.example.com`.
    #[derive(Default)]
    struct RecordingSolver {
        calls: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl ChallengeSolver for RecordingSolver {
        fn name(&self) -> &str {
            SOLVER
        }

        async fn present(&self, request: &ChallengeRequest) -> Result<(), SolverError> {
            self.calls
                .lock()
                .unwrap()
                .push(format!("present:{}", request.resolved_fqdn));
            if request.resolved_fqdn.ends_with("fail.example.com.") {
                return Err(SolverError::ZoneNotFound {
                    fqdn: request.record_name().to_string(),
                });
            }
            Ok(())
        }

        async fn cleanup(&self, request: &ChallengeRequest) -> Result<(), SolverError> {
            self.calls
                .lock()
                .unwrap()
                .push(format!("cleanup:{}", request.resolved_fqdn));
            Ok(())
        }
    }

    async fn spawn_server(solver: Arc<RecordingSolver>) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = router(AppState::new(GROUP, solver));
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn payload(action: &str, fqdn: &str) -> Value {
        json!({
            "apiVersion": "acme.cert-manager.io/v1alpha1",
            "kind": "ChallengePayload",
            "request": {
                "uid": "6f3b1c2e",
                "action": action,
                "type": "dns-01",
                "dnsName": "example.com",
                "key": "challenge-key",
                "resourceNamespace": "cert-manager",
                "resolvedFQDN": fqdn,
                "resolvedZone": "example.com.",
                "allowAmbientCredentials": false,
                "config": {"email": "ops@example.com", "password": "hunter2"}
            }
        })
    }

    fn solve_url(base: &str) -> String {
        format!("{base}/apis/{GROUP}/v1alpha1/{SOLVER}")
    }

    // =====================================================
    // Challenge dispatch
    // =====================================================

    #[tokio::test]
    async fn test_present_success_response() {
        let solver = Arc::new(RecordingSolver::default());
        let base = spawn_server(solver.clone()).await;

        let resp = reqwest::Client::new()
            .post(solve_url(&base))
            .json(&payload("Present", "_acme-challenge.example.com."))
            .send()
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body["kind"], "ChallengePayload");
        assert_eq!(body["apiVersion"], "acme.cert-manager.io/v1alpha1");
        assert_eq!(body["response"]["uid"], "6f3b1c2e");
        assert_eq!(body["response"]["success"], true);
        assert!(body["response"].get("status").is_none());
        assert_eq!(
            solver.calls.lock().unwrap().as_slice(),
            ["present:_acme-challenge.example.com."]
        );
    }

    #[tokio::test]
    async fn test_cleanup_dispatches_to_cleanup() {
        let solver = Arc::new(RecordingSolver::default());
        let base = spawn_server(solver.clone()).await;

        let resp = reqwest::Client::new()
            .post(solve_url(&base))
            .json(&payload("CleanUp", "_acme-challenge.example.com."))
            .send()
            .await
            .unwrap();

        let body: Value = resp.json().await.unwrap();
        assert_eq!(body["response"]["success"], true);
        assert_eq!(
            solver.calls.lock().unwrap().as_slice(),
            ["cleanup:_acme-challenge.example.com."]
        );
    }

    #[tokio::test]
    async fn test_solver_error_is_reported_in_payload() {
        let base = spawn_server(Arc::new(RecordingSolver::default())).await;

        let resp = reqwest::Client::new()
            .post(solve_url(&base))
            .json(&payload("Present", "_acme-challenge.fail.example.com."))
            .send()
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body["response"]["success"], false);
        assert_eq!(body["response"]["status"]["status"], "Failure");
        assert_eq!(body["response"]["status"]["reason"], "ZoneNotFound");
        assert!(body["response"]["status"]["message"]
            .as_str()
            .unwrap()
            .contains("_acme-challenge.fail.example.com"));
    }

    #[tokio::test]
    async fn test_unknown_action_is_unsupported() {
        let solver = Arc::new(RecordingSolver::default());
        let base = spawn_server(solver.clone()).await;

        let resp = reqwest::Client::new()
            .post(solve_url(&base))
            .json(&payload("Refresh", "_acme-challenge.example.com."))
            .send()
            .await
            .unwrap();

        let body: Value = resp.json().await.unwrap();
        assert_eq!(body["response"]["success"], false);
        assert_eq!(body["response"]["status"]["reason"], "UnsupportedAction");
        assert!(solver.calls.lock().unwrap().is_empty());
    }

    // =====================================================
    // Request validation
    // =====================================================

    #[tokio::test]
    async fn test_invalid_body_is_bad_request() {
        let base = spawn_server(Arc::new(RecordingSolver::default())).await;

        let resp = reqwest::Client::new()
            .post(solve_url(&base))
            .body("{not json")
            .send()
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_missing_request_is_bad_request() {
        let base = spawn_server(Arc::new(RecordingSolver::default())).await;

        let resp = reqwest::Client::new()
            .post(solve_url(&base))
            .json(&json!({"apiVersion": "acme.cert-manager.io/v1alpha1", "kind": "ChallengePayload"}))
            .send()
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unknown_solver_is_not_found() {
        let base = spawn_server(Arc::new(RecordingSolver::default())).await;

        let resp = reqwest::Client::new()
            .post(format!("{base}/apis/{GROUP}/v1alpha1/other-solver"))
            .json(&payload("Present", "_acme-challenge.example.com."))
            .send()
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_unknown_group_is_not_found() {
        let base = spawn_server(Arc::new(RecordingSolver::default())).await;

        let resp = reqwest::Client::new()
            .post(format!("{base}/apis/acme.other.org/v1alpha1/{SOLVER}"))
            .json(&payload("Present", "_acme-challenge.example.com."))
            .send()
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    // =====================================================
    // Discovery, health and metrics
    // =====================================================

    #[tokio::test]
    async fn test_discovery_lists_solver() {
        let base = spawn_server(Arc::new(RecordingSolver::default())).await;

        let body: Value = reqwest::get(format!("{base}/apis/{GROUP}/v1alpha1"))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();

        assert_eq!(body["kind"], "APIResourceList");
        assert_eq!(body["groupVersion"], format!("{GROUP}/v1alpha1"));
        assert_eq!(body["resources"][0]["name"], SOLVER);
        assert_eq!(body["resources"][0]["verbs"], json!(["create"]));
    }

    #[tokio::test]
    async fn test_discovery_for_other_group_is_not_found() {
        let base = spawn_server(Arc::new(RecordingSolver::default())).await;

        let resp = reqwest::get(format!("{base}/apis/acme.other.org/v1alpha1"))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_healthz() {
        let base = spawn_server(Arc::new(RecordingSolver::default())).await;

        let resp = reqwest::get(format!("{base}/healthz")).await.unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body, json!({"status": "ok"}));
    }

    #[tokio::test]
    async fn test_metrics_endpoint() {
        crate::metrics::record_provider_request("GET", "200");
        let base = spawn_server(Arc::new(RecordingSolver::default())).await;

        let resp = reqwest::get(format!("{base}/metrics")).await.unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        let text = resp.text().await.unwrap();
        assert!(text.contains("dns_services_webhook_provider_requests_total"));
    }
}
