//! Per-forum check-in execution.
//!
//! [`check_in`] runs the full sequence for one forum (status page, token
//! extraction, signed submission) and classifies whatever happens into a
//! [`CheckInOutcome`]. It never returns an error: the batch loop must keep
//! going whatever one forum does.

use tbsign_core::CheckInOutcome;

use crate::client::TiebaClient;
use crate::error::ClientError;
use crate::extract::ForumPageStatus;

/// Terminal message for forums without the check-in feature.
pub const MSG_UNSUPPORTED: &str = "unsupported";

/// Terminal message for forums already checked into today.
pub const MSG_ALREADY_DONE: &str = "already checked in";

/// Attempts one check-in and classifies the result.
///
/// Terminal states ("unsupported", "already checked in", a broken page)
/// come back as non-retryable failures; transport failures and API
/// rejections come back retryable so the caller can offer a manual
/// re-attempt.
pub async fn check_in(client: &TiebaClient, forum: &str) -> CheckInOutcome {
    match try_check_in(client, forum).await {
        Ok(outcome) => outcome,
        // Surface the remote message itself, not the error wrapper; it is
        // what the user acts on ("checked in too fast", "need captcha").
        Err(ClientError::Api { code, message }) => {
            tracing::warn!(forum, code, message, "check-in rejected by API");
            CheckInOutcome::Failure {
                message,
                retryable: true,
            }
        }
        Err(err) => {
            tracing::warn!(forum, error = %err, "check-in failed");
            CheckInOutcome::Failure {
                message: err.to_string(),
                retryable: err.is_retryable(),
            }
        }
    }
}

async fn try_check_in(client: &TiebaClient, forum: &str) -> Result<CheckInOutcome, ClientError> {
    match client.fetch_forum_status(forum).await? {
        ForumPageStatus::Unsupported => Ok(CheckInOutcome::Failure {
            message: MSG_UNSUPPORTED.to_owned(),
            retryable: false,
        }),
        ForumPageStatus::AlreadySignedIn => Ok(CheckInOutcome::Failure {
            message: MSG_ALREADY_DONE.to_owned(),
            retryable: false,
        }),
        ForumPageStatus::Ready { fid, tbs } => {
            let receipt = client.submit_sign(forum, &fid, &tbs).await?;
            tracing::info!(
                forum,
                gain = receipt.gain,
                rank = receipt.rank,
                "checked in"
            );
            Ok(CheckInOutcome::Success {
                gain: receipt.gain,
                rank: receipt.rank,
                continued: receipt.continued,
                total: receipt.total,
                missed: receipt.missed,
            })
        }
    }
}
