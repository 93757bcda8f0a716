//! Tests for node identity and session operations.

use super::*;
use crate::client::RadicleClient;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

mod node_info_tests {
    use super::*;

    /// Older daemons omit `config.id`; the top-level ID is used instead.
    #[tokio::test]
    async fn test_get_node_info_falls_back_to_top_level_id() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/node"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{ "id": "someid", "config": { "alias": "myalias" } }"#,
            ))
            .mount(&mock_server)
            .await;

        let client = RadicleClient::builder(mock_server.uri()).build().unwrap();
        let node = client.session(None).get_node_info().await.unwrap();

        assert_eq!(node.node_id(), "someid");
        assert_eq!(node.alias(), "myalias");
    }

    #[test]
    fn test_configured_id_wins() {
        let node: NodeInfo = serde_json::from_str(
            r#"{ "id": "top", "config": { "id": "configured", "alias": "a" } }"#,
        )
        .unwrap();

        assert_eq!(node.node_id(), "configured");
    }
}

mod session_info_tests {
    use super::*;

    #[tokio::test]
    async fn test_get_session_info() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/sessions/session_id"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{
                    "sessionId": "session_id",
                    "status": "authorized",
                    "publicKey": "a_pub_key",
                    "alias": "myalias",
                    "issuedAt": 1234567890,
                    "expiresAt": 1234567891
                }"#,
            ))
            .mount(&mock_server)
            .await;

        let client = RadicleClient::builder(mock_server.uri()).build().unwrap();
        let session = client
            .session(None)
            .get_session_info("session_id")
            .await
            .unwrap();

        assert!(session.is_authorized());
        assert_eq!(session.public_key, "a_pub_key");
        assert_eq!(session.issued_at.unix(), 1234567890);
        assert_eq!(session.expires_at.unix(), 1234567891);
    }

    #[test]
    fn test_session_status_values() {
        let unauthorized: SessionInfo =
            serde_json::from_str(r#"{ "status": "unauthorized" }"#).unwrap();
        assert_eq!(unauthorized.status, SessionStatus::Unauthorized);
        assert!(!unauthorized.is_authorized());

        let unknown: SessionInfo = serde_json::from_str(r#"{ "status": "pending" }"#).unwrap();
        assert_eq!(unknown.status, SessionStatus::Unknown);
        assert!(!unknown.is_authorized());

        let missing: SessionInfo = serde_json::from_str("{}").unwrap();
        assert_eq!(missing.status, SessionStatus::Unknown);
        assert_eq!(SessionStatus::default(), SessionStatus::Unknown);
    }

    #[tokio::test]
    async fn test_get_session_info_not_found() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/sessions/not_found"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;

        let client = RadicleClient::builder(mock_server.uri()).build().unwrap();
        let error = client
            .session(None)
            .get_session_info("not_found")
            .await
            .unwrap_err();

        assert!(error.is_not_found());
    }
}
