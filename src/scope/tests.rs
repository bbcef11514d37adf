//! Tests for scope module

use super::*;
use pretty_assertions::assert_eq;
use test_case::test_case;

const DB_ID: &str = "/subscriptions/12345678-1234-9876-4563-123456789012/resourceGroups/resGroup1/providers/Microsoft.Synapse/workspaces/workspace1/recoverableDatabases/database1";

// ============================================================================
// Construction
// ============================================================================

#[test]
fn test_subscription_id() {
    let id = ScopeId::subscription("sub-1").unwrap();
    assert_eq!(id.id(), "/subscriptions/sub-1");
    assert_eq!(id.subscription_id(), "sub-1");
    assert_eq!(id.resource_group_name(), None);
    assert_eq!(id.to_string(), "/subscriptions/sub-1");
}

#[test]
fn test_resource_group_id() {
    let id = ScopeId::resource_group("sub-1", "rg-1").unwrap();
    assert_eq!(id.id(), "/subscriptions/sub-1/resourceGroups/rg-1");
    assert_eq!(id.resource_group_name(), Some("rg-1"));
}

#[test]
fn test_new_rejects_empty_values() {
    assert_eq!(
        ScopeId::subscription(""),
        Err(IdError::MissingSegment("subscriptions".to_string()))
    );
    assert_eq!(
        ScopeId::resource_group("sub", ""),
        Err(IdError::MissingSegment("resourceGroups".to_string()))
    );
    assert_eq!(
        ScopeId::new(&RECOVERABLE_DATABASE, &["sub", "rg", "ws", ""]),
        Err(IdError::MissingSegment("recoverableDatabases".to_string()))
    );
}

#[test]
fn test_new_rejects_wrong_arity() {
    let err = ScopeId::new(&WORKSPACE, &["sub", "rg"]).unwrap_err();
    assert!(matches!(err, IdError::Malformed { .. }));
}

#[test]
fn test_nested_id_formatting() {
    let id = ScopeId::new(
        &RECOVERABLE_DATABASE,
        &[
            "12345678-1234-9876-4563-123456789012",
            "resGroup1",
            "workspace1",
            "database1",
        ],
    )
    .unwrap();

    assert_eq!(id.id(), DB_ID);
    assert_eq!(id.segment("workspaces"), Some("workspace1"));
    assert_eq!(id.segment("recoverableDatabases"), Some("database1"));
    assert_eq!(id.segment("servers"), None);
}

#[test]
fn test_describe() {
    let id = ScopeId::parse(DB_ID, &RECOVERABLE_DATABASE).unwrap();
    assert_eq!(
        id.describe(),
        "Recoverable Database: (Name \"database1\" / Workspace Name \"workspace1\" / Resource Group \"resGroup1\")"
    );

    let id = ScopeId::subscription("sub-1").unwrap();
    assert_eq!(id.describe(), "Subscription: (Subscription \"sub-1\")");
}

// ============================================================================
// Parsing
// ============================================================================

#[test]
fn test_parse_round_trip_canonical() {
    let id = ScopeId::parse(DB_ID, &RECOVERABLE_DATABASE).unwrap();
    assert_eq!(id.id(), DB_ID);
}

#[test]
fn test_parse_is_case_insensitive_on_keys() {
    let input = "/subscriptions/sub/resourcegroups/rg/providers/microsoft.synapse/WORKSPACES/ws1";
    let id = ScopeId::parse(input, &WORKSPACE).unwrap();
    assert_eq!(
        id.id(),
        "/subscriptions/sub/resourceGroups/rg/providers/Microsoft.Synapse/workspaces/ws1"
    );
}

#[test]
fn test_parse_tolerates_trailing_slash() {
    let id = ScopeId::parse("/subscriptions/sub/", &SUBSCRIPTION).unwrap();
    assert_eq!(id.id(), "/subscriptions/sub");
}

#[test_case("" ; "empty")]
#[test_case("subscriptions/sub" ; "no leading slash")]
#[test_case("/subscriptions/sub/resourceGroups" ; "odd segment count")]
fn test_parse_malformed(input: &str) {
    let err = ScopeId::parse(input, &RESOURCE_GROUP).unwrap_err();
    assert!(matches!(err, IdError::Malformed { .. }), "got {err:?}");
}

#[test_case("/", "subscriptions" ; "bare slash")]
#[test_case("/subscriptions//resourceGroups/rg", "subscriptions" ; "empty subscription")]
#[test_case("/subscriptions/sub/resourceGroups//providers/x", "resourceGroups" ; "empty resource group")]
#[test_case("/resourceGroups/rg/subscriptions/sub", "subscriptions" ; "wrong order")]
#[test_case("/subscriptions/sub/things/x", "resourceGroups" ; "resource group missing")]
fn test_parse_missing_segment(input: &str, missing: &str) {
    assert_eq!(
        ScopeId::parse(input, &RESOURCE_GROUP),
        Err(IdError::MissingSegment(missing.to_string()))
    );
}

#[test]
fn test_parse_missing_nested_segment() {
    let input = "/subscriptions/sub/resourceGroups/rg/providers/Microsoft.Synapse/workspaces/ws1";
    assert_eq!(
        ScopeId::parse(input, &RECOVERABLE_DATABASE),
        Err(IdError::MissingSegment("recoverableDatabases".to_string()))
    );
}

#[test]
fn test_parse_rejects_other_provider() {
    let input = "/subscriptions/sub/resourceGroups/rg/providers/Microsoft.Sql/workspaces/ws1";
    let err = ScopeId::parse(input, &WORKSPACE).unwrap_err();
    assert_eq!(
        err,
        IdError::UnexpectedSegment("providers/Microsoft.Sql".to_string())
    );
}

#[test]
fn test_parse_rejects_trailing_segments() {
    let input = "/subscriptions/sub/resourceGroups/rg";
    assert_eq!(
        ScopeId::parse(input, &SUBSCRIPTION),
        Err(IdError::UnexpectedSegment("resourceGroups".to_string()))
    );
}

#[test]
fn test_parse_known_picks_most_specific() {
    let id = ScopeId::parse_known(DB_ID).unwrap();
    assert_eq!(id.shape(), &RECOVERABLE_DATABASE);

    let id = ScopeId::parse_known("/subscriptions/sub").unwrap();
    assert_eq!(id.shape(), &SUBSCRIPTION);

    let err = ScopeId::parse_known("/tenants/t1").unwrap_err();
    assert!(matches!(err, IdError::UnknownShape(_)));
}

#[test]
fn test_shape_by_slug() {
    assert_eq!(ScopeShape::by_slug("resource-group"), Some(&RESOURCE_GROUP));
    assert_eq!(ScopeShape::by_slug("Workspace"), Some(&WORKSPACE));
    assert_eq!(ScopeShape::by_slug("cluster"), None);
    assert_eq!(RECOVERABLE_DATABASE.arity(), 4);
    assert_eq!(SUBSCRIPTION.arity(), 1);
}

// ============================================================================
// ScopePath
// ============================================================================

#[test]
fn test_provider_collection_below_subscription() {
    let scope = ScopeId::subscription("sub").unwrap();
    let path = ProviderCollection::new("Microsoft.EventGrid", "partnerRegistrations");
    assert_eq!(
        path.path(&scope).unwrap(),
        "/subscriptions/sub/providers/Microsoft.EventGrid/partnerRegistrations"
    );
}

#[test]
fn test_provider_collection_same_namespace_appends_collection() {
    let scope = ScopeId::new(&WORKSPACE, &["sub", "rg", "ws1"]).unwrap();
    let path = ProviderCollection::new("Microsoft.Synapse", "recoverableDatabases");
    assert_eq!(
        path.path(&scope).unwrap(),
        "/subscriptions/sub/resourceGroups/rg/providers/Microsoft.Synapse/workspaces/ws1/recoverableDatabases"
    );
}

#[test]
fn test_provider_collection_empty_is_request_error() {
    let scope = ScopeId::subscription("sub").unwrap();
    let err = ProviderCollection::new("Microsoft.EventGrid", "")
        .path(&scope)
        .unwrap_err();
    assert_eq!(err.kind(), crate::error::ErrorKind::Request);
}

#[test]
fn test_provider_collection_from_spec() {
    let path = ProviderCollection::from_spec("Microsoft.EventGrid/topics").unwrap();
    assert_eq!(path, ProviderCollection::new("Microsoft.EventGrid", "topics"));
    assert!(ProviderCollection::from_spec("topics").is_err());
    assert!(ProviderCollection::from_spec("/topics").is_err());
}

#[test]
fn test_closure_scope_path() {
    let formatter = |scope: &ScopeId| format!("{}/providers/Microsoft.Web/sites", scope.id());
    let scope = ScopeId::resource_group("sub", "rg").unwrap();
    assert_eq!(
        formatter.path(&scope).unwrap(),
        "/subscriptions/sub/resourceGroups/rg/providers/Microsoft.Web/sites"
    );
}
