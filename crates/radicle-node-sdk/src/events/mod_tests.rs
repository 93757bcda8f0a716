use super::*;

const PUSH_PAYLOAD: &str = r#"{
    "author": {
        "id": "did:key:z6MkkfM3tPXNPrPevKr3uSiQtHPuwnNhu2yUVjgd2jXVsVz5",
        "alias": "seb"
    },
    "before": "6f3905801e6aeffb116c6e629d693c09f6622491",
    "after": "ab6b2a2d318bf214d02f5427d541bbbf8140ab55",
    "commits": [{
        "id": "ab6b2a2d318bf214d02f5427d541bbbf8140ab55",
        "title": "Update signed refs",
        "message": "",
        "timestamp": "2024-12-12T12:24:30Z",
        "url": "rad:z3gqcJUoA1n9HaHKufZs5FCSGazv5/commits/ab6b2a2d318bf214d02f5427d541bbbf8140ab55",
        "author": { "name": "radicle", "email": "radicle@localhost" },
        "added": [],
        "modified": ["refs"],
        "removed": []
    }],
    "repository": {
        "id": "rad:z3gqcJUoA1n9HaHKufZs5FCSGazv5",
        "name": "heartwood",
        "description": "Radicle Heartwood Protocol & Stack",
        "private": false,
        "default_branch": "master",
        "url": "rad:z3gqcJUoA1n9HaHKufZs5FCSGazv5",
        "clone_url": "http://127.0.0.1:8080/rad:z3gqcJUoA1n9HaHKufZs5FCSGazv5.git",
        "delegates": ["did:key:z6MksFqXN3Yhqk8pTJdUGLwATkRfQvwZXPqR2qMEhbS9wzpT"]
    }
}"#;

mod event_type_tests {
    use super::*;

    #[test]
    fn test_known_event_types() {
        assert_eq!(EventType::from_header("push"), Some(EventType::Push));
        assert_eq!(EventType::from_header("patch"), Some(EventType::Patch));
        assert_eq!(EventType::Patch.to_string(), "patch");
    }

    /// Anything else is not an event this SDK understands.
    #[test]
    fn test_unknown_event_types() {
        assert_eq!(EventType::from_header("unknown_type"), None);
        assert_eq!(EventType::from_header(""), None);
        assert_eq!(EventType::from_header("PUSH"), None);
    }
}

mod payload_tests {
    use super::*;

    /// Webhook repositories carry delegates as bare strings and use the
    /// snake_case default-branch field.
    #[test]
    fn test_push_payload_decodes() {
        let payload: PushPayload = serde_json::from_str(PUSH_PAYLOAD).unwrap();

        assert_eq!(payload.author.alias, "seb");
        assert_eq!(payload.commits.len(), 1);
        assert_eq!(payload.commits[0].timestamp.unix(), 1734006270);
        assert_eq!(payload.repository.delegates.len(), 1);
        assert_eq!(payload.repository.default_branch(), "master");
        assert_eq!(payload.repository.raw_id(), "rad:z3gqcJUoA1n9HaHKufZs5FCSGazv5");
    }

    /// The camelCase field wins when both are present.
    #[test]
    fn test_hook_repository_prefers_camel_case_branch() {
        let repo: HookRepository = serde_json::from_str(
            r#"{"id":"rad:x","defaultBranch":"main","default_branch":"master"}"#,
        )
        .unwrap();
        assert_eq!(repo.default_branch(), "main");
    }

    #[test]
    fn test_patch_payload_with_missing_sections_decodes() {
        let payload: PatchPayload =
            serde_json::from_str(r#"{"action":"created","patch":{"id":"p1"}}"#).unwrap();
        assert_eq!(payload.patch.id, "p1");
        assert!(payload.patch.revisions.is_empty());
        assert_eq!(payload.repository, HookRepository::default());
    }
}
