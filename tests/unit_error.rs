/// Unit tests for ResolverError and ResolverResult

use ferrous_resolver::{ResolverError, ResolverResult};
use std::error::Error;
use std::fmt;
use std::sync::Arc;

#[derive(Debug)]
struct ContainerFault;

impl fmt::Display for ContainerFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("container fault")
    }
}

impl Error for ContainerFault {}

#[test]
fn test_error_display_missing_argument() {
    let error = ResolverError::MissingArgument("resolver");
    let display_str = format!("{}", error);
    assert_eq!(display_str, "Value cannot be null: resolver");
}

#[test]
fn test_error_display_shape_mismatch() {
    let error = ResolverError::ShapeMismatch {
        type_name: "acme::Container".to_string(),
        expected: "get_all_instances(&ServiceId) -> Vec<AnyArc>",
    };
    let display_str = format!("{}", error);

    assert!(display_str.contains("acme::Container"));
    assert!(display_str.contains("get_all_instances"));
    assert!(display_str.contains("does not appear to implement a service locator"));
}

#[test]
fn test_error_display_resolution() {
    let error = ResolverError::Resolution {
        service: "app::Mailer",
        source: Arc::new(ContainerFault),
    };
    assert_eq!(format!("{}", error), "Resolution of app::Mailer failed: container fault");
}

#[test]
fn test_error_display_construction_panicked() {
    let error = ResolverError::ConstructionPanicked {
        service: "app::Mailer",
        message: "no smtp host".to_string(),
    };
    assert_eq!(format!("{}", error), "Construction of app::Mailer panicked: no smtp host");
}

#[test]
fn test_error_display_type_mismatch() {
    let error = ResolverError::TypeMismatch("u64");
    assert_eq!(format!("{}", error), "Type mismatch for: u64");
}

#[test]
fn test_error_display_invalid_option() {
    let error = ResolverError::InvalidOption {
        key: "LOGGING".to_string(),
        value: "maybe".to_string(),
    };
    assert_eq!(format!("{}", error), "Invalid resolver option LOGGING: maybe");
}

#[test]
fn test_error_source_chain() {
    let error = ResolverError::Resolution {
        service: "app::Mailer",
        source: Arc::new(ContainerFault),
    };
    let source = error.source().expect("resolution errors carry a source");
    assert_eq!(source.to_string(), "container fault");

    assert!(ResolverError::MissingArgument("resolver").source().is_none());
    assert!(ResolverError::TypeMismatch("u8").source().is_none());
}

#[test]
fn test_error_clone_shares_source() {
    let error = ResolverError::Resolution {
        service: "app::Mailer",
        source: Arc::new(ContainerFault),
    };
    let cloned = error.clone();
    assert_eq!(error.to_string(), cloned.to_string());
}

#[test]
fn test_result_alias() {
    fn configure(ok: bool) -> ResolverResult<u8> {
        if ok {
            Ok(1)
        } else {
            Err(ResolverError::MissingArgument("locator"))
        }
    }

    assert_eq!(configure(true).unwrap(), 1);
    assert!(matches!(configure(false), Err(ResolverError::MissingArgument("locator"))));
}
