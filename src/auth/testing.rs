//! Test doubles for adapter routing tests.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::Request,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use parking_lot::Mutex;

use crate::auth::{AuthAdapter, AuthEvent, AuthenticatedIdentity};

/// Shared record of adapter calls, as `"<name>:<operation>"`.
pub(crate) type CallLog = Arc<Mutex<Vec<String>>>;

pub(crate) fn call_log() -> CallLog {
    Arc::new(Mutex::new(Vec::new()))
}

pub(crate) fn empty_request() -> Request {
    Request::builder().uri("/").body(Body::empty()).unwrap()
}

/// Adapter with scripted answers that records every call it receives.
pub(crate) struct StubAdapter {
    name: String,
    provides: Vec<String>,
    request_type: Option<String>,
    principal: Option<String>,
    short_circuit: Option<StatusCode>,
    log: CallLog,
}

impl StubAdapter {
    pub(crate) fn new(provides: &[&str]) -> Self {
        Self {
            name: "stub".to_string(),
            provides: provides.iter().map(|t| t.to_string()).collect(),
            request_type: None,
            principal: None,
            short_circuit: None,
            log: call_log(),
        }
    }

    pub(crate) fn named(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    pub(crate) fn logging_to(mut self, log: &CallLog) -> Self {
        self.log = Arc::clone(log);
        self
    }

    /// Answer `type_from_request` with `auth_type` for every request.
    pub(crate) fn claiming(mut self, auth_type: &str) -> Self {
        self.request_type = Some(auth_type.to_string());
        self
    }

    /// Authenticate every request as `principal`.
    pub(crate) fn authenticating(mut self, principal: &str) -> Self {
        self.principal = Some(principal.to_string());
        self
    }

    /// Answer `pre_auth` with a response of `status`, tagged with this
    /// adapter's name in `x-stub`.
    pub(crate) fn short_circuiting(mut self, status: StatusCode) -> Self {
        self.short_circuit = Some(status);
        self
    }

    fn record(&self, operation: &str) {
        self.log.lock().push(format!("{}:{}", self.name, operation));
    }
}

impl AuthAdapter for StubAdapter {
    fn provides(&self) -> Vec<String> {
        self.provides.clone()
    }

    fn type_from_request(&self, _request: &Request) -> Option<String> {
        self.record("type");
        self.request_type.clone()
    }

    fn authenticate(
        &self,
        _request: &Request,
        _response: &mut Response,
        event: &mut AuthEvent,
    ) -> Option<AuthenticatedIdentity> {
        self.record("authenticate");
        let auth_type = event
            .auth_type()
            .map(str::to_string)
            .or_else(|| self.request_type.clone())
            .unwrap_or_default();
        self.principal
            .as_ref()
            .map(|name| AuthenticatedIdentity::new(name.clone(), auth_type))
    }

    fn pre_auth(&self, _request: &Request, _response: &mut Response) -> Option<Response> {
        self.record("pre_auth");
        self.short_circuit
            .map(|status| (status, [("x-stub", self.name.clone())]).into_response())
    }
}
