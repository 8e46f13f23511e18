use serde::Deserialize;

// --- Identity Contract (Mapped to the external /api/me payload) ---

/// Role
///
/// The closed set of marketplace roles as serialized by the identity service.
/// Every authenticated user carries exactly one role at any time; `Undefined`
/// marks an account that has not yet completed the onboarding role selection.
///
/// Encoding role dispatch as an enum (rather than the ad hoc string
/// comparisons of the frontend it replaces) makes the gate's rule table a
/// match over closed types and removes a whole class of typo bugs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Undefined,
    Client,
    Supplier,
    Professional,
    Admin,
}

impl Role {
    /// The URL namespace prefix of this role's main application area.
    ///
    /// `/proffesional` is misspelled on purpose: it is the literal route
    /// namespace the marketplace frontend ships, and the gateway must match
    /// it verbatim. `Undefined` has no area of its own.
    pub fn area_prefix(self) -> Option<&'static str> {
        match self {
            Role::Undefined => None,
            Role::Client => Some("/user"),
            Role::Supplier => Some("/supplier"),
            Role::Professional => Some("/proffesional"),
            Role::Admin => Some("/admin"),
        }
    }

    /// The dashboard root the gate redirects this role towards, built from
    /// the lower-cased role value exactly as the frontend does.
    pub fn dashboard_path(self) -> String {
        format!("/{}/dashboard", self.as_lowercase())
    }

    /// The dedicated one-time onboarding flow for roles that have one.
    /// Professionals onboard under the "talent" namespace.
    pub fn onboarding_path(self) -> Option<&'static str> {
        match self {
            Role::Professional => Some("/onboarding/talent"),
            Role::Supplier => Some("/onboarding/supplier"),
            _ => None,
        }
    }

    /// Plural display label used in denial reasons ("This page is only for ...").
    pub fn plural_label(self) -> &'static str {
        match self {
            Role::Undefined => "Undefined users",
            Role::Client => "Clients",
            Role::Supplier => "Suppliers",
            Role::Professional => "Professionals",
            Role::Admin => "Admins",
        }
    }

    fn as_lowercase(self) -> &'static str {
        match self {
            Role::Undefined => "undefined",
            Role::Client => "client",
            Role::Supplier => "supplier",
            Role::Professional => "professional",
            Role::Admin => "admin",
        }
    }
}

/// CurrentUser
///
/// The authenticated user snapshot returned by the identity lookup. Read-only
/// to the gateway: it is resolved once per intercepted request, fed to the
/// access gate, and dropped. Nothing here is cached across requests, so a
/// role change on the identity side takes effect on the very next request.
#[derive(Debug, Clone, Deserialize)]
pub struct CurrentUser {
    /// Unique identifier owned by the identity service. Must be non-empty
    /// for the session to be considered valid.
    pub id: String,
    pub role: Role,
    /// True until the user completes their role's onboarding flow. The gate
    /// forces first-time suppliers and professionals into onboarding and
    /// locks the flow once the flag flips to false.
    #[serde(rename = "firstTimeLogin")]
    pub first_time_login: bool,
}
