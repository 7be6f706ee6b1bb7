use std::time::Duration;

use async_trait::async_trait;
use opentelemetry::global;
use opentelemetry::propagation::Injector;
use reqwest::{Client, RequestBuilder, StatusCode, Url, header};
use shared::types::Employee;
use thiserror::Error;
use tracing_opentelemetry::OpenTelemetrySpanExt;

use crate::{
    domain::{
        client::EmployeeApiClient,
        employee::{CreateEmployeeRequest, DeleteEmployeeRequest},
    },
    error::EmployeeServiceError,
    infrastructure::envelope::{Payload, decode_envelope, remote_status},
};

/// Errors raised while building an [`HttpEmployeeApiClient`].
#[derive(Debug, Error)]
pub enum ClientBuildError {
    #[error("base URL {0} cannot carry an employee id path segment")]
    UnusableBaseUrl(Url),

    #[error("failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),
}

/// HTTP client for the remote employee API, with OpenTelemetry trace propagation.
///
/// Requests are sent once; there is no retry and no caching.
pub struct HttpEmployeeApiClient {
    client: Client,
    base_url: Url,
}

impl HttpEmployeeApiClient {
    /// Builds a client for the employee collection at `base_url`.
    pub fn new(base_url: Url, request_timeout: Duration) -> Result<Self, ClientBuildError> {
        if base_url.cannot_be_a_base() {
            return Err(ClientBuildError::UnusableBaseUrl(base_url));
        }

        let client = Client::builder().timeout(request_timeout).build()?;
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `{base}/{id}`, with the id percent-encoded as a single path segment.
    fn resource_url(&self, id: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(id);
        }
        url
    }

    /// Sends the request, classifies any non-2xx status, then decodes the body.
    async fn execute<T: Payload>(
        &self,
        request: RequestBuilder,
        kind: CallKind,
        subject: &str,
    ) -> Result<T, EmployeeServiceError> {
        let res = request
            .headers(trace_context_headers())
            .send()
            .await
            .map_err(|e| transport_error(subject, &e))?;

        let status = res.status();
        let body = res.text().await.map_err(|e| transport_error(subject, &e))?;

        tracing::debug!(%status, subject, "Employee API responded");

        if !status.is_success() {
            return Err(classify_status(status, kind, subject, &body));
        }

        let envelope = decode_envelope::<T>(&body).map_err(|e| {
            tracing::warn!(error = %e, subject, "Employee API response could not be decoded");
            e
        })?;
        if let Some(reported) = envelope.status.as_deref() {
            tracing::debug!(remote_status = reported, subject, "Employee API reported status");
        }

        Ok(envelope.data)
    }
}

/// Adapter to inject OpenTelemetry trace context into HTTP request headers.
struct HeaderMapInjector<'a>(&'a mut header::HeaderMap);

impl Injector for HeaderMapInjector<'_> {
    fn set(&mut self, key: &str, value: String) {
        if let Ok(name) = header::HeaderName::from_bytes(key.as_bytes())
            && let Ok(val) = header::HeaderValue::from_str(&value)
        {
            self.0.insert(name, val);
        }
    }
}

fn trace_context_headers() -> header::HeaderMap {
    let mut headers = header::HeaderMap::new();
    let cx = tracing::Span::current().context();
    global::get_text_map_propagator(|propagator| {
        propagator.inject_context(&cx, &mut HeaderMapInjector(&mut headers));
    });
    headers
}

fn transport_error(subject: &str, e: &reqwest::Error) -> EmployeeServiceError {
    let cause = if e.is_timeout() { "timed out" } else { "failed" };
    tracing::warn!(error = %e, subject, "Request to employee API {cause}");
    EmployeeServiceError::Transport(format!("request for {subject} {cause}: {e}"))
}

/// What a remote call addresses, which decides how a 404 is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallKind {
    /// Names one employee; a 404 means that employee does not exist.
    Lookup,
    /// Addresses the collection; a 404 is a refusal like any other 4xx.
    Collection,
}

/// Maps a non-2xx remote status onto the error taxonomy.
///
/// The remote's own status description is used in the message when the body
/// carries one, otherwise the HTTP status line.
pub fn classify_status(
    status: StatusCode,
    kind: CallKind,
    subject: &str,
    body: &str,
) -> EmployeeServiceError {
    let detail = remote_status(body).unwrap_or_else(|| status.to_string());
    let code = status.as_u16();

    match status {
        StatusCode::NOT_FOUND if kind == CallKind::Lookup => {
            EmployeeServiceError::NotFound(format!("{subject} not found (remote status: {detail})"))
        }
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
            EmployeeServiceError::Invalid(format!("employee API rejected {subject}: {detail}"))
        }
        s if s.is_server_error() => EmployeeServiceError::ServerError {
            status: code,
            message: format!("employee API failed on {subject}: {detail}"),
        },
        _ => EmployeeServiceError::ClientError {
            status: code,
            message: format!("employee API refused {subject}: {detail}"),
        },
    }
}

#[async_trait]
impl EmployeeApiClient for HttpEmployeeApiClient {
    #[tracing::instrument(skip(self))]
    async fn list_all(&self) -> Result<Vec<Employee>, EmployeeServiceError> {
        tracing::debug!(url = %self.base_url, "Requesting all employees");

        let request = self.client.get(self.base_url.clone());
        self.execute(request, CallKind::Collection, "employee list")
            .await
    }

    #[tracing::instrument(skip(self))]
    async fn get_by_id(&self, id: &str) -> Result<Employee, EmployeeServiceError> {
        if id.trim().is_empty() {
            return Err(EmployeeServiceError::Invalid(
                "employee id must not be blank".into(),
            ));
        }

        let url = self.resource_url(id);
        tracing::debug!(%url, "Requesting employee");

        let request = self.client.get(url);
        self.execute(request, CallKind::Lookup, &format!("employee {id}"))
            .await
    }

    #[tracing::instrument(skip(self, req), fields(name = %req.name))]
    async fn create(&self, req: &CreateEmployeeRequest) -> Result<Employee, EmployeeServiceError> {
        tracing::debug!(url = %self.base_url, "Creating employee");

        let request = self.client.post(self.base_url.clone()).json(req);
        let subject = format!("creation of employee {}", req.name);
        self.execute(request, CallKind::Collection, &subject).await
    }

    #[tracing::instrument(skip(self, req), fields(name = %req.name()))]
    async fn delete_by_name(
        &self,
        req: &DeleteEmployeeRequest,
    ) -> Result<bool, EmployeeServiceError> {
        tracing::debug!(url = %self.base_url, "Deleting employee by name");

        let request = self.client.delete(self.base_url.clone()).json(req);
        let subject = format!("deletion of employee {}", req.name());
        self.execute(request, CallKind::Lookup, &subject).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> HttpEmployeeApiClient {
        HttpEmployeeApiClient::new(Url::parse(base).unwrap(), Duration::from_secs(1)).unwrap()
    }

    #[test]
    fn classification_covers_every_status_class() {
        let subject = "employee 999";

        assert!(matches!(
            classify_status(StatusCode::NOT_FOUND, CallKind::Lookup, subject, ""),
            EmployeeServiceError::NotFound(_)
        ));
        for status in [StatusCode::BAD_REQUEST, StatusCode::UNPROCESSABLE_ENTITY] {
            assert!(matches!(
                classify_status(status, CallKind::Lookup, subject, ""),
                EmployeeServiceError::Invalid(_)
            ));
        }
        for status in [
            StatusCode::UNAUTHORIZED,
            StatusCode::CONFLICT,
            StatusCode::TOO_MANY_REQUESTS,
            StatusCode::NOT_MODIFIED,
        ] {
            assert!(matches!(
                classify_status(status, CallKind::Lookup, subject, ""),
                EmployeeServiceError::ClientError { .. }
            ));
        }
        for status in [
            StatusCode::INTERNAL_SERVER_ERROR,
            StatusCode::BAD_GATEWAY,
            StatusCode::SERVICE_UNAVAILABLE,
        ] {
            match classify_status(status, CallKind::Lookup, subject, "") {
                EmployeeServiceError::ServerError { status: code, .. } => {
                    assert_eq!(code, status.as_u16());
                }
                other => panic!("{status} classified as {other:?}"),
            }
        }
    }

    #[test]
    fn not_found_message_names_the_subject_and_status() {
        let err = classify_status(StatusCode::NOT_FOUND, CallKind::Lookup, "employee 999", "");
        let message = err.to_string();
        assert!(message.contains("employee 999"));
        assert!(message.contains("404"));

        let body = r#"{"data": null, "status": "No such employee"}"#;
        let err = classify_status(StatusCode::NOT_FOUND, CallKind::Lookup, "employee 999", body);
        assert!(err.to_string().contains("No such employee"));
    }

    #[test]
    fn not_found_on_the_collection_is_a_client_error() {
        let err = classify_status(StatusCode::NOT_FOUND, CallKind::Collection, "employee list", "");
        assert!(matches!(err, EmployeeServiceError::ClientError { status: 404, .. }));
        assert!(err.to_string().contains("employee list"));
    }

    #[test]
    fn server_errors_never_inspect_the_payload() {
        let body = r#"{"data": [{"id": "1"}], "status": "Failed"}"#;
        let err = classify_status(
            StatusCode::INTERNAL_SERVER_ERROR,
            CallKind::Collection,
            "employee list",
            body,
        );
        assert!(matches!(err, EmployeeServiceError::ServerError { status: 500, .. }));
    }

    #[test]
    fn resource_url_appends_an_encoded_segment() {
        let api = client("http://localhost:8112/api/v1/employee");
        assert_eq!(
            api.resource_url("42").as_str(),
            "http://localhost:8112/api/v1/employee/42"
        );
        assert_eq!(
            api.resource_url("a/b").as_str(),
            "http://localhost:8112/api/v1/employee/a%2Fb"
        );

        let trailing = client("http://localhost:8112/api/v1/employee/");
        assert_eq!(
            trailing.resource_url("42").as_str(),
            "http://localhost:8112/api/v1/employee/42"
        );
    }

    #[test]
    fn rejects_base_urls_without_a_path() {
        let url = Url::parse("mailto:hr@company.com").unwrap();
        assert!(matches!(
            HttpEmployeeApiClient::new(url, Duration::from_secs(1)),
            Err(ClientBuildError::UnusableBaseUrl(_))
        ));
    }
}
