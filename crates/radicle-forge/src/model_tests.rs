use super::*;

mod patch_variables_tests {
    use super::*;

    #[test]
    fn test_variables_conversion() {
        let variables = PatchVariables::new("patch1", "rev2").into_variables();

        assert_eq!(variables.get("patch_id").map(String::as_str), Some("patch1"));
        assert_eq!(variables.get("revision_id").map(String::as_str), Some("rev2"));
        assert_eq!(
            PatchVariables::from_variables(&variables),
            Some(PatchVariables::new("patch1", "rev2"))
        );
    }

    /// Both keys are required; one alone yields nothing.
    #[test]
    fn test_missing_key_yields_none() {
        let mut variables = BTreeMap::new();
        variables.insert("patch_id".to_string(), "patch1".to_string());

        assert_eq!(PatchVariables::from_variables(&variables), None);
        assert_eq!(PatchVariables::from_variables(&BTreeMap::new()), None);
    }

    #[test]
    fn test_pipeline_variables() {
        let pipeline = Pipeline {
            patch: Some(PatchVariables::new("p", "r")),
            ..Default::default()
        };

        assert_eq!(pipeline.variables().len(), 2);
        assert!(Pipeline::default().variables().is_empty());
    }
}

mod status_tests {
    use super::*;

    #[test]
    fn test_status_display() {
        assert_eq!(PipelineStatus::Success.to_string(), "success");
        assert_eq!(PipelineStatus::Killed.to_string(), "killed");
        assert_eq!(
            serde_json::to_string(&PipelineStatus::Declined).unwrap(),
            "\"declined\""
        );
    }

    #[test]
    fn test_in_progress() {
        assert!(PipelineStatus::Pending.is_in_progress());
        assert!(PipelineStatus::Running.is_in_progress());
        assert!(!PipelineStatus::Skipped.is_in_progress());
    }
}

mod redaction_tests {
    use super::*;

    #[test]
    fn test_user_debug_and_serialize_hide_tokens() {
        let user = User {
            login: "alice".to_string(),
            access_token: "secret-token".to_string(),
            refresh_token: "secret-token".to_string(),
            ..Default::default()
        };

        let debug = format!("{:?}", user);
        let json = serde_json::to_string(&user).unwrap();

        assert!(!debug.contains("secret-token"));
        assert!(!json.contains("secret-token"));
        assert!(json.contains("alice"));
    }

    #[test]
    fn test_netrc_debug_hides_password() {
        let netrc = Netrc {
            machine: "http://node".to_string(),
            login: "z6Mk".to_string(),
            password: "pw".to_string(),
        };

        assert!(format!("{:?}", netrc).contains("<REDACTED>"));
    }
}

#[test]
fn test_forge_remote_id() {
    assert!(ForgeRemoteId::from("z3gqc").is_valid());
    assert!(!ForgeRemoteId::default().is_valid());
    assert_eq!(ForgeRemoteId::new("z3gqc").to_string(), "z3gqc");
}
