use crate::models::{CurrentUser, Role};

// --- Well-Known Paths ---

/// Where unauthenticated requests are sent. Every resolver failure ends here.
pub const SIGNIN_PATH: &str = "/auth/signin";
/// The role-selection page shown to accounts that have not picked a role yet.
pub const ONBOARDING_SELECTOR_PATH: &str = "/auth/onboarding";
/// The post-login landing page that fans users out to their role's dashboard.
pub const SELECTOR_LANDING_PATH: &str = "/auth/redirect";

/// RouteClass
///
/// Total classification of an incoming path. Every path falls into exactly one
/// class; `Other` covers everything the rule table has no opinion about.
/// Classifying once up front keeps the rule table a match over closed enums
/// instead of a pile of string prefix checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteClass {
    /// The role-selection page itself (`/auth/onboarding`).
    OnboardingSelector,
    /// The selector's companion landing page (`/auth/redirect`).
    SelectorLanding,
    /// A role's one-time onboarding flow (e.g. `/onboarding/supplier`).
    RoleOnboarding(Role),
    /// A role's main application area (e.g. everything under `/supplier`).
    RoleArea(Role),
    Other,
}

/// Verdict
///
/// The gate's output. The gate itself never fails: every `(path, user)` pair
/// maps to exactly one verdict, and all failure modes live with the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Let the request through untouched.
    Allow,
    /// Send an HTTP redirect to the contained path.
    Redirect(String),
    /// Render a 403 page carrying the contained reason verbatim.
    Deny(String),
}

/// True when `path` is the prefix itself or a descendant of it.
/// `/user` matches `/user` and `/user/dashboard`, never `/userdata`.
fn is_under(path: &str, prefix: &str) -> bool {
    path == prefix
        || path
            .strip_prefix(prefix)
            .is_some_and(|rest| rest.starts_with('/'))
}

/// classify
///
/// Maps a request path to its `RouteClass`. Total: every input produces
/// exactly one class. Selector paths are exact matches; onboarding flows and
/// role areas are namespace prefixes. The namespaces are disjoint, so match
/// order between them carries no meaning.
pub fn classify(path: &str) -> RouteClass {
    if path == ONBOARDING_SELECTOR_PATH {
        return RouteClass::OnboardingSelector;
    }
    if path == SELECTOR_LANDING_PATH {
        return RouteClass::SelectorLanding;
    }

    const ROLES: [Role; 4] = [Role::Client, Role::Supplier, Role::Professional, Role::Admin];

    for role in ROLES {
        if let Some(flow) = role.onboarding_path() {
            if is_under(path, flow) {
                return RouteClass::RoleOnboarding(role);
            }
        }
    }
    for role in ROLES {
        if let Some(area) = role.area_prefix() {
            if is_under(path, area) {
                return RouteClass::RoleArea(role);
            }
        }
    }

    RouteClass::Other
}

/// decide
///
/// The access gate: a pure function from `(path, user)` to a routing verdict.
/// The rules form an ordered decision table and the **first match wins**; the
/// order is load-bearing. Rule 1 fires before any role-area check, so an
/// `Undefined` user can never reach the role-area mismatch denial, and the
/// landing-page redirect (rule 2) is deliberately scoped so the selector
/// misuse denial (rule 5) stays reachable.
///
/// There is no per-session memoization anywhere: each request is decided
/// fresh, so a role change on the identity side takes effect immediately.
pub fn decide(path: &str, user: &CurrentUser) -> Verdict {
    let class = classify(path);

    // Rule 1: users without a role are locked onto the role selector.
    if user.role == Role::Undefined && class != RouteClass::OnboardingSelector {
        return Verdict::Redirect(ONBOARDING_SELECTOR_PATH.to_string());
    }

    // Rule 2: the landing page fans a role-carrying user out to their
    // dashboard (unless they somehow already sit on it).
    if class == RouteClass::SelectorLanding
        && user.role != Role::Undefined
        && path != user.role.dashboard_path()
    {
        return Verdict::Redirect(user.role.dashboard_path());
    }

    // Rule 3: first-login forcing. Scoped to the user's own area, and only
    // roles with a dedicated onboarding flow (supplier, professional) have
    // anywhere to be forced to.
    if let RouteClass::RoleArea(area_role) = class {
        if user.role == area_role && user.first_time_login {
            if let Some(flow) = area_role.onboarding_path() {
                return Verdict::Redirect(flow.to_string());
            }
        }
    }

    // Rule 4: onboarding is unreachable once completed; send the user to
    // the dashboard of the flow's role.
    if let RouteClass::RoleOnboarding(flow_role) = class {
        if !user.first_time_login {
            return Verdict::Redirect(flow_role.dashboard_path());
        }
    }

    // Rule 5: a user who already has a role has no business on the role
    // selector. Denied outright rather than silently redirected, so a
    // permission problem is never masked as a login problem.
    if class == RouteClass::OnboardingSelector && user.role != Role::Undefined {
        return Verdict::Deny("Unauthorized access to onboarding page".to_string());
    }

    // Rule 6: role areas are isolated per role.
    if let RouteClass::RoleArea(area_role) = class {
        if user.role != area_role {
            return Verdict::Deny(format!(
                "This page is only for {}.",
                area_role.plural_label()
            ));
        }
    }

    // Rule 7: nothing objected.
    Verdict::Allow
}
