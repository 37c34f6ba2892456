//! Shared HTTP plumbing for the service clients.

use std::time::Duration;

use crate::constants::USER_AGENT;
use crate::error::ServiceError;

/// Builds a client with the given request timeout. No retries are layered on top.
pub fn client(timeout: Duration) -> Result<reqwest::Client, ServiceError> {
    Ok(reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .build()?)
}

/// Passes successful responses through and turns anything else into
/// [`ServiceError::Api`] carrying the response body.
pub async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, ServiceError> {
    if !resp.status().is_success() {
        return Err(ServiceError::Api {
            status: resp.status().as_u16(),
            message: resp.text().await.unwrap_or_default(),
        });
    }
    Ok(resp)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mock_response(status: u16, body: &str) -> reqwest::Response {
        reqwest::Response::from(
            ::http::Response::builder()
                .status(status)
                .body(body.to_string())
                .unwrap(),
        )
    }

    #[tokio::test]
    async fn check_response_success() {
        let resp = mock_response(200, "{}");
        assert!(check_response(resp).await.is_ok());
    }

    #[tokio::test]
    async fn check_response_keeps_error_body() {
        let resp = mock_response(404, "Not Found");
        let err = check_response(resp).await.unwrap_err();
        match err {
            ServiceError::Api { status, message } => {
                assert_eq!(status, 404);
                assert_eq!(message, "Not Found");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }
}
