pub mod client;
pub mod error;
pub mod executor;
pub mod extract;
pub mod sign;

pub use client::{SignReceipt, TiebaClient};
pub use error::ClientError;
pub use executor::{check_in, MSG_ALREADY_DONE, MSG_UNSUPPORTED};
pub use extract::ForumPageStatus;
