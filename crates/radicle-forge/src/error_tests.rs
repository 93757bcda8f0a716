use super::*;
use crate::config::ConfigError;

fn node_error(status: u16) -> ForgeError {
    ForgeError::Api(ApiError::HttpError {
        status,
        message: "Not Found".to_string(),
    })
}

mod kind_tests {
    use super::*;

    #[test]
    fn test_node_reported_errors() {
        assert_eq!(node_error(404).kind(), ErrorKind::NodeReported);
        assert_eq!(node_error(500).kind(), ErrorKind::NodeReported);
    }

    /// A response body that cannot be decoded is a transport problem, not a
    /// node-reported error.
    #[test]
    fn test_undecodable_response_is_transport() {
        let json_error = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let error = ForgeError::Api(ApiError::JsonError(json_error));

        assert_eq!(error.kind(), ErrorKind::Transport);
    }

    #[test]
    fn test_validation_errors() {
        let json_error = serde_json::from_str::<serde_json::Value>("[").unwrap_err();

        assert_eq!(ForgeError::InvalidSignature.kind(), ErrorKind::Validation);
        assert_eq!(ForgeError::EmptyPush.kind(), ErrorKind::Validation);
        assert_eq!(ForgeError::EmptyPatch.kind(), ErrorKind::Validation);
        assert_eq!(
            ForgeError::MalformedPayload {
                event: "push".to_string(),
                source: json_error,
            }
            .kind(),
            ErrorKind::Validation
        );
    }

    #[test]
    fn test_precondition_errors() {
        assert_eq!(ForgeError::SessionUnauthorized.kind(), ErrorKind::Precondition);
        assert_eq!(ForgeError::EmptyBranch.kind(), ErrorKind::Precondition);
        assert_eq!(ForgeError::MissingPatchVariables.kind(), ErrorKind::Precondition);
        assert_eq!(
            ForgeError::BranchNotFound {
                branch: "dev".to_string()
            }
            .kind(),
            ErrorKind::Precondition
        );
    }

    #[test]
    fn test_configuration_errors() {
        let error = ForgeError::Config(ConfigError::Missing {
            key: "url".to_string(),
        });
        assert_eq!(error.kind(), ErrorKind::Configuration);

        let error = ForgeError::Api(ApiError::InvalidUrl {
            message: "bad".to_string(),
        });
        assert_eq!(error.kind(), ErrorKind::Configuration);
    }
}

mod message_tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(
            ForgeError::SessionUnauthorized.to_string(),
            "provided secret token is unauthorized"
        );
        assert_eq!(ForgeError::EmptyPush.to_string(), "no commits found in push");
        assert_eq!(ForgeError::EmptyPatch.to_string(), "no revision found in patch");
        assert_eq!(
            ForgeError::BranchNotFound {
                branch: "dev".to_string()
            }
            .to_string(),
            "branch does not exist: dev"
        );
    }

    #[test]
    fn test_transient_only_for_node_failures() {
        assert!(node_error(503).is_transient());
        assert!(!node_error(404).is_transient());
        assert!(!ForgeError::InvalidSignature.is_transient());
    }
}
