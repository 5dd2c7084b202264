//! Email ownership verification with one-time codes
//!
//! Issues 6-digit codes through the notification sink and validates
//! user-submitted codes against the last issued challenge. Challenges
//! are held in memory, keyed by target email, and superseded by each
//! fresh issue. There is no attempt limit on verification.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use tokio::sync::Mutex;
use tracing::{error, info};

use crate::error::{ApiError, ApiResult};
use crate::notifier::Notifier;

/// Challenge lifetime for the self-service flow
const CODE_TTL_MINUTES: i64 = 15;
/// Seconds a caller must wait before requesting another code
const RESEND_COOLDOWN_SECONDS: i64 = 300;

/// Generate a uniformly random 6-digit code, kept as text
pub fn generate_code() -> String {
    rand::thread_rng().gen_range(100_000..1_000_000).to_string()
}

/// An issued challenge for one target email
#[derive(Debug, Clone)]
struct Challenge {
    code: String,
    issued_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

#[derive(Default)]
struct OtpState {
    challenges: HashMap<String, Challenge>,
    /// Emails that passed verification, pending consumption by a
    /// booking creation
    verified: HashSet<String>,
}

/// OTP verifier for the self-service booking flow
#[derive(Clone)]
pub struct OtpVerifier {
    notifier: Arc<dyn Notifier>,
    state: Arc<Mutex<OtpState>>,
}

impl OtpVerifier {
    /// Create a new verifier dispatching through the given sink
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        OtpVerifier {
            notifier,
            state: Arc::new(Mutex::new(OtpState::default())),
        }
    }

    /// Issue a fresh code for an email and dispatch it through the sink
    ///
    /// A code may be reissued only once the resend window has elapsed;
    /// the new code supersedes the previous one. The challenge is
    /// recorded only after the sink reports success, and this send is
    /// the one delivery whose failure is surfaced to the caller.
    pub async fn issue(&self, email: &str) -> ApiResult<()> {
        let email = email.trim();
        if email.is_empty() {
            return Err(ApiError::MissingEmail);
        }

        let now = Utc::now();
        {
            let state = self.state.lock().await;
            if let Some(existing) = state.challenges.get(email) {
                if now.signed_duration_since(existing.issued_at)
                    < Duration::seconds(RESEND_COOLDOWN_SECONDS)
                {
                    return Err(ApiError::ResendCooldown);
                }
            }
        }

        let code = generate_code();
        let expires_at = now + Duration::minutes(CODE_TTL_MINUTES);

        self.notifier
            .send_otp(email, &code, expires_at)
            .await
            .map_err(|err| {
                error!("Failed to send OTP to {}: {}", email, err);
                ApiError::OtpDelivery
            })?;

        info!("OTP issued for {}", email);
        self.state.lock().await.challenges.insert(
            email.to_string(),
            Challenge {
                code,
                issued_at: now,
                expires_at,
            },
        );

        Ok(())
    }

    /// Validate a submitted code against the last issued challenge
    ///
    /// Success clears the challenge (single use) and marks the email
    /// verified until the next booking creation consumes the mark. A
    /// lapsed challenge is dropped and reads as never issued.
    pub async fn verify(&self, email: &str, submitted: &str) -> ApiResult<()> {
        let email = email.trim();
        let mut state = self.state.lock().await;

        let challenge = state
            .challenges
            .get(email)
            .cloned()
            .ok_or(ApiError::NoActiveChallenge)?;

        if Utc::now() > challenge.expires_at {
            state.challenges.remove(email);
            return Err(ApiError::NoActiveChallenge);
        }

        if challenge.code != submitted {
            return Err(ApiError::InvalidCode);
        }

        state.challenges.remove(email);
        state.verified.insert(email.to_string());
        info!("OTP verified for {}", email);

        Ok(())
    }

    /// Take the verified mark for an email, if present
    pub async fn consume_verified(&self, email: &str) -> bool {
        self.state.lock().await.verified.remove(email.trim())
    }

    #[cfg(test)]
    async fn backdate(&self, email: &str, by: Duration) {
        let mut state = self.state.lock().await;
        if let Some(challenge) = state.challenges.get_mut(email) {
            challenge.issued_at -= by;
            challenge.expires_at -= by;
        }
    }

    #[cfg(test)]
    async fn issued_code(&self, email: &str) -> Option<String> {
        self.state
            .lock()
            .await
            .challenges
            .get(email)
            .map(|c| c.code.clone())
    }
}
