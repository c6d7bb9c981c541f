//! Access Calls
//!
//! Access-code verification and token validation.

use crate::error::Result;
use crate::models::{AccessCodeVerification, AccessCodeVerificationWithUser, AuthToken, List};

use super::{ApiClient, Endpoint};

impl ApiClient {
    /// Check an access code without opening a session
    #[allow(dead_code)]
    pub async fn verify_code(&self, list_id: i64, access_code: &str) -> Result<List> {
        let body = AccessCodeVerification { id: list_id, access_code };
        self.send_json(Endpoint::Verify, &body).await
    }

    /// Check an access code for `user_name` and store the returned token
    pub async fn verify_with_user(&self, list_id: i64, access_code: &str, user_name: &str) -> Result<AuthToken> {
        let body = AccessCodeVerificationWithUser {
            id: list_id,
            access_code,
            user_name,
        };
        let token: AuthToken = self.send_json(Endpoint::VerifyWithUser, &body).await?;
        self.session().save_token(&token);
        log::info!("[API] access granted to list {} for {}", token.list_id, token.user_name);
        Ok(token)
    }

    /// Ask the server whether the stored token still opens `list_id`.
    ///
    /// Any 2xx answer means valid, whatever the body. Any failure counts as
    /// "invalid" and drops the stored token.
    pub async fn validate_token(&self, list_id: i64) -> bool {
        let outcome = self.send_empty(Endpoint::ValidateToken(list_id)).await;
        let valid = token_verdict(list_id, outcome);
        if !valid {
            self.session().remove_token();
        }
        valid
    }
}

/// A token check passes on any 2xx; the body is never read
fn token_verdict(list_id: i64, outcome: Result<()>) -> bool {
    match outcome {
        Ok(()) => true,
        Err(e) => {
            log::warn!("[API] token check for list {} failed: {}", list_id, e);
            false
        }
    }
}
