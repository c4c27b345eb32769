use std::error::Error as StdError;
use std::iter;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::{application::repos::RepoError, infra::error::InfraError};

/// Diagnostic carried in response extensions so the logging middleware can
/// say where a failure came from and what caused it.
#[derive(Debug, Clone)]
pub struct ErrorReport {
    pub origin: &'static str,
    pub chain: Vec<String>,
}

impl ErrorReport {
    pub fn from_error(origin: &'static str, error: &(dyn StdError + 'static)) -> Self {
        let chain = iter::successors(Some(error), |&current| current.source())
            .map(ToString::to_string)
            .collect();
        Self { origin, chain }
    }

    pub fn from_message(origin: &'static str, message: impl Into<String>) -> Self {
        Self {
            origin,
            chain: vec![message.into()],
        }
    }

    pub fn headline(&self) -> &str {
        self.chain
            .first()
            .map(String::as_str)
            .unwrap_or("no diagnostic available")
    }

    pub fn attach(self, response: &mut Response) {
        response.extensions_mut().insert(self);
    }
}

/// A failed page request: the status and a short public message for the
/// reader, plus the private report for the logs.
#[derive(Debug)]
pub struct HttpError {
    status: StatusCode,
    public_message: &'static str,
    report: ErrorReport,
}

impl HttpError {
    pub fn from_error(
        origin: &'static str,
        status: StatusCode,
        public_message: &'static str,
        error: &(dyn StdError + 'static),
    ) -> Self {
        Self {
            status,
            public_message,
            report: ErrorReport::from_error(origin, error),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let mut response = (self.status, self.public_message).into_response();
        self.report.attach(&mut response);
        response
    }
}

impl From<RepoError> for HttpError {
    fn from(error: RepoError) -> Self {
        let (status, public_message) = match error {
            RepoError::Timeout => (
                StatusCode::SERVICE_UNAVAILABLE,
                "The blog is temporarily unavailable",
            ),
            RepoError::NotFound => (StatusCode::NOT_FOUND, "Page not found"),
            _ => (StatusCode::INTERNAL_SERVER_ERROR, "Something went wrong"),
        };
        HttpError::from_error("application::site", status, public_message, &error)
    }
}

/// Failures that abort a binary before or while serving.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Infra(#[from] InfraError),
    #[error("unexpected error: {0}")]
    Unexpected(String),
}

impl AppError {
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::Unexpected(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_walks_the_source_chain() {
        let error = InfraError::from(std::io::Error::other("disk gone"));
        let report = ErrorReport::from_error("test", &error);
        assert_eq!(report.headline(), "io error: disk gone");
        assert_eq!(report.chain.last().map(String::as_str), Some("disk gone"));
    }

    #[test]
    fn repo_timeouts_are_unavailable() {
        assert_eq!(
            HttpError::from(RepoError::Timeout).status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            HttpError::from(RepoError::from_persistence("boom")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
