//! Common test utilities for radicle-forge integration tests
//!
//! This module provides:
//! - [`MockNode`], a wiremock server speaking the node's `/api/v1` surface
//! - Fixture builders for projects, patches and webhook payloads
//! - Helpers for building adapters and signed deliveries

#![allow(dead_code)]

use std::collections::HashMap;

use bytes::Bytes;
use radicle_forge::{ForgeConfig, RadicleForge};
use radicle_node_sdk::webhook::{EVENT_TYPE_HEADER, SIGNATURE_HEADER};
use radicle_node_sdk::{SignatureValidator, WebhookRequest};
use serde_json::{json, Value};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const HOST: &str = "https://ci.example.com";
pub const NODE_ID: &str = "z6MkrLMMsiPWUcNPHcRajuMi9mDfYckSoJyPwwnknocNYPm7";
pub const NODE_ALIAS: &str = "seed";
pub const SESSION_ID: &str = "c4f1e7aa";
pub const SESSION_ALIAS: &str = "seb";
pub const HOOK_SECRET: &str = "integration-secret";

pub const HEARTWOOD: &str = "z3gqcJUoA1n9HaHKufZs5FCSGazv5";
pub const CI_REPO: &str = "z32iyJDyFLqvPFzwHm8YadK4HQ2EY";

pub const PATCH_ID: &str = "ed1fb3dea5e2db7d520664ecaf416ff0b6c72181";
pub const PATCH_REVISION: &str = "3b0c7f3f0c4b2c1df01ae3f8b1f7c0f2a2e3d4c5";
pub const PATCH_HEAD: &str = "274ac829adec365bb8a84b3673d8abff4a0ec1b6";
pub const PUSH_HEAD: &str = "ab6b2a2d318bf214d02f5427d541bbbf8140ab55";

// ============================================================================
// Mock Node
// ============================================================================

/// A node HTTP daemon backed by wiremock.
pub struct MockNode {
    pub server: MockServer,
}

impl MockNode {
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    pub fn uri(&self) -> String {
        self.server.uri()
    }

    /// Adapter pointed at this node with a hook secret configured.
    pub fn forge(&self) -> RadicleForge {
        RadicleForge::new(self.config()).expect("valid forge config")
    }

    pub fn config(&self) -> ForgeConfig {
        ForgeConfig::new(self.uri(), HOST)
            .with_node_id(NODE_ID)
            .with_hook_secret(HOOK_SECRET)
    }

    pub async fn with_node_info(&self) -> &Self {
        Mock::given(method("GET"))
            .and(path("/api/v1/node"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": NODE_ID,
                "config": { "id": NODE_ID, "alias": NODE_ALIAS }
            })))
            .mount(&self.server)
            .await;
        self
    }

    pub async fn with_session(&self, session_id: &str, status: &str) -> &Self {
        Mock::given(method("GET"))
            .and(path(format!("/api/v1/sessions/{}", session_id)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "sessionId": session_id,
                "status": status,
                "publicKey": NODE_ID,
                "alias": SESSION_ALIAS,
                "issuedAt": 1734006270,
                "expiresAt": 1734092670
            })))
            .mount(&self.server)
            .await;
        self
    }

    /// Serve `projects` as the first page of `/projects` and an empty second page.
    pub async fn with_projects(&self, projects: Vec<Value>) -> &Self {
        Mock::given(method("GET"))
            .and(path("/api/v1/projects"))
            .and(query_param("page", "0"))
            .respond_with(ResponseTemplate::new(200).set_body_json(Value::Array(projects)))
            .mount(&self.server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/v1/projects"))
            .and(query_param("page", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&self.server)
            .await;
        self
    }

    pub async fn with_project(&self, project: Value) -> &Self {
        let id = project["id"]
            .as_str()
            .unwrap_or_default()
            .trim_start_matches("rad:")
            .to_string();
        Mock::given(method("GET"))
            .and(path(format!("/api/v1/projects/{}", id)))
            .respond_with(ResponseTemplate::new(200).set_body_json(project))
            .mount(&self.server)
            .await;
        self
    }

    pub async fn with_patches(&self, rid: &str, patches: Vec<Value>) -> &Self {
        Mock::given(method("GET"))
            .and(path(format!("/api/v1/projects/{}/patches", rid)))
            .respond_with(ResponseTemplate::new(200).set_body_json(Value::Array(patches)))
            .mount(&self.server)
            .await;
        self
    }

    pub async fn with_webhooks(&self, rid: &str, urls: &[&str]) -> &Self {
        let hooks: Vec<Value> = urls
            .iter()
            .map(|url| json!({ "repoId": rid, "url": url, "contentType": "application/json" }))
            .collect();
        Mock::given(method("GET"))
            .and(path(format!("/api/v1/projects/{}/webhooks", rid)))
            .respond_with(ResponseTemplate::new(200).set_body_json(Value::Array(hooks)))
            .mount(&self.server)
            .await;
        self
    }

    pub async fn with_error(&self, status: u16, error: &str) -> &Self {
        Mock::given(wiremock::matchers::any())
            .respond_with(ResponseTemplate::new(status).set_body_json(json!({
                "error": error,
                "code": status
            })))
            .mount(&self.server)
            .await;
        self
    }
}

// ============================================================================
// Fixtures
// ============================================================================

/// A project as returned by `/projects` and `/projects/{rid}`.
pub fn project(rid: &str, name: &str) -> Value {
    json!({
        "id": format!("rad:{}", rid),
        "name": name,
        "description": "",
        "visibility": { "type": "public" },
        "defaultBranch": "master",
        "delegates": [
            { "id": format!("did:key:{}", NODE_ID), "alias": NODE_ALIAS }
        ],
        "head": PUSH_HEAD
    })
}

pub fn patch(id: &str, title: &str) -> Value {
    json!({
        "id": id,
        "author": { "id": format!("did:key:{}", NODE_ID), "alias": SESSION_ALIAS },
        "title": title,
        "state": { "status": "open" },
        "before": "ef25208520566bfb96fb00b16ea7c8bd98ffeb8e",
        "after": PATCH_HEAD,
        "target": "delegates",
        "labels": [],
        "assignees": [],
        "revisions": [{
            "id": PATCH_REVISION,
            "author": { "id": format!("did:key:{}", NODE_ID), "alias": SESSION_ALIAS },
            "description": "",
            "base": "ef25208520566bfb96fb00b16ea7c8bd98ffeb8e",
            "oid": PATCH_HEAD,
            "timestamp": 1734006270
        }]
    })
}

fn hook_repository(rid: &str, name: &str) -> Value {
    json!({
        "id": format!("rad:{}", rid),
        "name": name,
        "description": "",
        "private": false,
        "default_branch": "master",
        "url": format!("rad:{}", rid),
        "clone_url": format!("http://127.0.0.1:8080/rad:{}.git", rid),
        "delegates": [format!("did:key:{}", NODE_ID)]
    })
}

pub fn push_payload() -> Vec<u8> {
    let body = json!({
        "author": { "id": format!("did:key:{}", NODE_ID), "alias": SESSION_ALIAS },
        "before": "6f3905801e6aeffb116c6e629d693c09f6622491",
        "after": PUSH_HEAD,
        "commits": [{
            "id": PUSH_HEAD,
            "title": "Add pipeline definition",
            "message": "",
            "timestamp": "2024-12-12T12:24:30Z",
            "url": format!("rad:{}/commits/{}", HEARTWOOD, PUSH_HEAD),
            "author": { "name": "Seb", "email": "seb@example.com" },
            "added": [".woodpecker.yaml"],
            "modified": [],
            "removed": []
        }],
        "repository": hook_repository(HEARTWOOD, "heartwood")
    });
    serde_json::to_vec(&body).expect("serialize push payload")
}

pub fn patch_payload() -> Vec<u8> {
    let mut patch = patch(PATCH_ID, "Fix pipeline");
    patch["url"] = json!(format!("rad:{}/patches/{}", CI_REPO, PATCH_ID));
    patch["labels"] = json!(["ci"]);
    patch["revisions"][0]["timestamp"] = json!("2024-12-12T12:24:30Z");
    patch["commits"] = json!([{
        "id": PATCH_HEAD,
        "title": "Fix pipeline",
        "message": "",
        "timestamp": "2024-12-12T12:24:30Z",
        "url": format!("rad:{}/commits/{}", CI_REPO, PATCH_HEAD),
        "author": { "name": "Seb", "email": "seb@example.com" },
        "added": [],
        "modified": [".woodpecker.yaml"],
        "removed": []
    }]);
    patch["author"] = json!({ "id": format!("did:key:{}", NODE_ID), "alias": SESSION_ALIAS });

    let body = json!({
        "action": "created",
        "patch": patch,
        "repository": hook_repository(CI_REPO, "mz-ci")
    });
    serde_json::to_vec(&body).expect("serialize patch payload")
}

// ============================================================================
// Deliveries
// ============================================================================

pub fn sign(payload: &[u8]) -> String {
    SignatureValidator::new(HOOK_SECRET)
        .sign(payload)
        .expect("compute signature")
}

/// A delivery as the node would send it, signed with [`HOOK_SECRET`].
pub fn signed_delivery(event_type: &str, payload: Vec<u8>) -> WebhookRequest {
    let signature = sign(&payload);
    delivery(event_type, Some(&signature), payload)
}

pub fn delivery(event_type: &str, signature: Option<&str>, payload: Vec<u8>) -> WebhookRequest {
    let mut headers = HashMap::new();
    headers.insert(EVENT_TYPE_HEADER.to_string(), event_type.to_string());
    if let Some(signature) = signature {
        headers.insert(SIGNATURE_HEADER.to_string(), signature.to_string());
    }
    WebhookRequest::new(headers, Bytes::from(payload))
}
