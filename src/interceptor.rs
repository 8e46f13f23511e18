use axum::{
    extract::{Request, State},
    http::{StatusCode, header},
    middleware::Next,
    response::{Html, IntoResponse, Redirect, Response},
};

use crate::{
    AppState,
    gate::{self, SIGNIN_PATH, Verdict},
};

// --- Protected Path Configuration (static, not data-driven) ---

/// Route namespaces the gateway intercepts. Everything else passes through
/// without a session lookup, keeping public routes free of identity latency.
/// `/proffesional` matches the frontend's literal (misspelled) namespace.
const PROTECTED_PREFIXES: [&str; 5] = [
    "/user",
    "/supplier",
    "/admin",
    "/proffesional",
    "/onboarding",
];

/// Exact paths that are intercepted in addition to the namespaces above.
const PROTECTED_PATHS: [&str; 2] = [gate::SELECTOR_LANDING_PATH, gate::ONBOARDING_SELECTOR_PATH];

/// Fallback reason shown when request evaluation fails in an unforeseen way.
/// Deliberately non-specific; the real cause goes to the logs only.
pub const GENERIC_FAILURE_REASON: &str = "Something went wrong. Please try again.";

/// is_protected
///
/// True when the path falls under one of the configured protected prefixes.
/// A prefix matches itself and its descendants (`/user`, `/user/dashboard`),
/// never unrelated siblings (`/userdata`).
pub fn is_protected(path: &str) -> bool {
    if PROTECTED_PATHS.contains(&path) {
        return true;
    }
    PROTECTED_PREFIXES.iter().any(|prefix| {
        path == *prefix
            || path
                .strip_prefix(prefix)
                .is_some_and(|rest| rest.starts_with('/'))
    })
}

/// token_cookie
///
/// Extracts the bearer credential from the `token` cookie, if present.
/// Absence is equivalent to an unauthenticated request.
fn token_cookie(request: &Request) -> Option<String> {
    for value in request.headers().get_all(header::COOKIE) {
        let Ok(raw) = value.to_str() else { continue };
        for pair in raw.split(';') {
            if let Some(token) = pair.trim().strip_prefix("token=") {
                if !token.is_empty() {
                    return Some(token.to_string());
                }
            }
        }
    }
    None
}

/// route_guard
///
/// The request interceptor: enforces the access-control contract on every
/// request whose path matches the protected configuration, before any page
/// logic runs.
///
/// *Mechanism*: unmatched paths pass straight through with **zero** identity
/// calls. For matched paths the session resolver runs exactly once; any
/// resolver failure redirects to sign-in without consulting the gate. On
/// resolver success the pure gate decides, and the verdict is translated into
/// an HTTP effect: pass-through, temporary redirect, or a rendered 403 page.
/// Every evaluation path terminates in a response; nothing is ever allowed
/// through on error (fail closed).
pub async fn route_guard(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let path = request.uri().path().to_string();

    // 1. Public routes: no interception, no resolver call.
    if !is_protected(&path) {
        return next.run(request).await;
    }

    let token = token_cookie(&request);

    // 2. Resolve the session. One upstream call, no retry. All three failure
    // modes (missing credential, unreachable identity service, unusable
    // payload) recover identically: redirect to sign-in.
    let user = match state.identity.resolve(token.as_deref()).await {
        Ok(user) => user,
        Err(err) => {
            tracing::debug!(%path, error = %err, "session resolution failed, redirecting to sign-in");
            return Redirect::temporary(SIGNIN_PATH).into_response();
        }
    };

    // 3. Gate evaluation and 4. verdict translation.
    match gate::decide(&path, &user) {
        Verdict::Allow => next.run(request).await,
        Verdict::Redirect(target) => {
            tracing::debug!(user_id = %user.id, %path, %target, "gate redirect");
            Redirect::temporary(&target).into_response()
        }
        Verdict::Deny(reason) => {
            // Denials are surfaced as a 403 page, never silently redirected,
            // so a permission error is not mistaken for a login problem.
            tracing::warn!(user_id = %user.id, role = ?user.role, %path, %reason, "request denied");
            forbidden_page(&reason)
        }
    }
}

/// forbidden_page
///
/// Renders the self-contained 403 document: a heading, the denial reason
/// verbatim, and navigation back or to sign-in.
pub fn forbidden_page(reason: &str) -> Response {
    let body = format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>403 Forbidden</title>
</head>
<body>
  <h1>403 Forbidden</h1>
  <p>{reason}</p>
  <p>
    <a href="javascript:history.back()">Go Back</a>
    <a href="{SIGNIN_PATH}">Login</a>
  </p>
</body>
</html>
"#
    );
    (StatusCode::FORBIDDEN, Html(body)).into_response()
}
