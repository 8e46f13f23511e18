use obra_gateway::models::{CurrentUser, Role};

// --- Wire Contract Tests ---

#[test]
fn test_role_deserializes_from_wire_strings() {
    let role: Role = serde_json::from_str("\"SUPPLIER\"").unwrap();
    assert_eq!(role, Role::Supplier);

    let role: Role = serde_json::from_str("\"UNDEFINED\"").unwrap();
    assert_eq!(role, Role::Undefined);
}

#[test]
fn test_unknown_role_string_is_rejected() {
    // The role set is closed; anything outside it must fail deserialization
    // so the resolver can fail closed instead of guessing.
    assert!(serde_json::from_str::<Role>("\"SUPERUSER\"").is_err());
    // Wire strings are uppercase; lowercase is out of contract.
    assert!(serde_json::from_str::<Role>("\"supplier\"").is_err());
}

#[test]
fn test_current_user_reads_camel_case_flag() {
    // This is the critical test for the firstTimeLogin rename: the identity
    // payload is camelCase, the Rust field is snake_case.
    let user: CurrentUser = serde_json::from_value(serde_json::json!({
        "id": "u1",
        "role": "CLIENT",
        "firstTimeLogin": false
    }))
    .unwrap();

    assert_eq!(user.id, "u1");
    assert_eq!(user.role, Role::Client);
    assert!(!user.first_time_login);
}

#[test]
fn test_current_user_requires_all_fields() {
    // A payload missing the role or the flag is unusable, not defaulted.
    let missing_role = serde_json::json!({ "id": "u1", "firstTimeLogin": true });
    assert!(serde_json::from_value::<CurrentUser>(missing_role).is_err());

    let missing_flag = serde_json::json!({ "id": "u1", "role": "CLIENT" });
    assert!(serde_json::from_value::<CurrentUser>(missing_flag).is_err());
}

// --- Per-Role Path Constants ---

#[test]
fn test_professional_namespace_keeps_frontend_misspelling() {
    // The frontend ships the '/proffesional' namespace verbatim; the gateway
    // must match it, while the dashboard root is built from the role value.
    assert_eq!(Role::Professional.area_prefix(), Some("/proffesional"));
    assert_eq!(
        Role::Professional.dashboard_path(),
        "/professional/dashboard"
    );
    assert_eq!(Role::Professional.onboarding_path(), Some("/onboarding/talent"));
}

#[test]
fn test_client_area_is_the_user_namespace() {
    assert_eq!(Role::Client.area_prefix(), Some("/user"));
    assert_eq!(Role::Client.dashboard_path(), "/client/dashboard");
    // Clients have no dedicated onboarding flow.
    assert_eq!(Role::Client.onboarding_path(), None);
}

#[test]
fn test_undefined_role_has_no_area() {
    assert_eq!(Role::Undefined.area_prefix(), None);
    assert_eq!(Role::Undefined.onboarding_path(), None);
}

#[test]
fn test_deny_labels_are_plural() {
    assert_eq!(Role::Supplier.plural_label(), "Suppliers");
    assert_eq!(Role::Professional.plural_label(), "Professionals");
}
