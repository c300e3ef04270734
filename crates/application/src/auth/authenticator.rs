//! Bearer credential attachment.

use folio_domain::{AUTHORIZATION, ApiRequest, Session};

/// Formats a bearer `Authorization` header value.
#[must_use]
pub fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}

/// Returns the request as it should go on the wire for `session`.
///
/// With a non-empty access token the result carries exactly
/// `Authorization: Bearer <token>`, replacing any earlier value. Without one
/// the request is returned as given.
#[must_use]
pub fn authenticate(request: &ApiRequest, session: &Session) -> ApiRequest {
    if session.has_token() {
        request
            .clone()
            .with_header(AUTHORIZATION, bearer(&session.access_token))
    } else {
        request.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_attaches_bearer_when_token_present() {
        let session = Session::new("T1", None);
        let request = authenticate(&ApiRequest::get("/workspaces/"), &session);
        assert_eq!(request.header(AUTHORIZATION), Some("Bearer T1"));
        assert_eq!(request.headers().len(), 1);
    }

    #[test]
    fn test_leaves_request_alone_without_token() {
        let original = ApiRequest::get("/workspaces/");
        let request = authenticate(&original, &Session::default());
        assert_eq!(request, original);
    }

    #[test]
    fn test_replaces_stale_authorization() {
        let stale = ApiRequest::get("/workspaces/").with_header("authorization", "Bearer T0");
        let request = authenticate(&stale, &Session::new("T1", None));
        assert_eq!(request.header(AUTHORIZATION), Some("Bearer T1"));
        assert_eq!(request.headers().len(), 1);
    }
}
