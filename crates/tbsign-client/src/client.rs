//! HTTP client for the forum site.
//!
//! Wraps `reqwest` with the site-specific request shapes: the paginated
//! listing of subscribed forums, the per-forum mobile status page, and the
//! signed check-in POST. Use [`TiebaClient::new`] for production or
//! [`TiebaClient::with_base_urls`] to point at a mock server in tests.

use std::collections::BTreeMap;
use std::time::Duration;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::{Client, Url};

use crate::error::ClientError;
use crate::extract::{classify_forum_page, parse_like_page, ForumPageStatus};
use crate::sign::signed_form;
use tbsign_core::Forum;

const WEB_BASE_URL: &str = "https://tieba.baidu.com/";
const API_BASE_URL: &str = "http://c.tieba.baidu.com/";

/// Maximum number of listing pages to fetch before giving up.
/// Prevents infinite loops if the next-page marker never disappears.
const MAX_PAGES: usize = 100;

/// The mobile status page only renders the check-in block for a legacy
/// feature-phone browser.
const MOBILE_UA: &str = "Mozilla/5.0 (SymbianOS/9.3; Series60/3.2 NokiaE72-1/021.021; \
     Profile/MIDP-2.1 Configuration/CLDC-1.1 ) AppleWebKit/525 (KHTML, like Gecko) \
     Version/3.0 BrowserNG/7.1.16352";

// Fixed identity of the mobile client the sign endpoint expects. The
// endpoint rejects requests whose identity fields it does not recognise.
const CLIENT_ID: &str =
    "03-00-DA-59-05-00-72-96-06-00-01-00-04-00-4C-43-01-00-34-F4-02-00-BC-25-09-00-4E-36";
const CLIENT_TYPE: &str = "4";
const CLIENT_VERSION: &str = "1.2.1.17";
const PHONE_IMEI: &str = "540b43b59d21b7a4824e1fd31b08e9a6";
const NET_TYPE: &str = "3";

/// Percent-encoding set for form values: everything except RFC 3986
/// unreserved characters.
const FORM_ENCODE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Stats returned by a successful check-in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignReceipt {
    pub gain: i64,
    pub rank: i64,
    pub continued: i64,
    pub total: i64,
    pub missed: i64,
}

#[derive(Debug)]
pub struct TiebaClient {
    client: Client,
    web_base: Url,
    api_base: Url,
    cookie: String,
}

impl TiebaClient {
    /// Creates a client pointed at the production site.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(cookie: &str, timeout_secs: u64) -> Result<Self, ClientError> {
        Self::with_base_urls(cookie, timeout_secs, WEB_BASE_URL, API_BASE_URL)
    }

    /// Creates a client with custom base URLs (for testing with wiremock).
    ///
    /// `web_base` serves the listing and forum pages; `api_base` serves the
    /// sign endpoint. In production these are different hosts.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`ClientError::InvalidBaseUrl`] if either
    /// base URL does not parse.
    pub fn with_base_urls(
        cookie: &str,
        timeout_secs: u64,
        web_base: &str,
        api_base: &str,
    ) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self {
            client,
            web_base: parse_base_url(web_base)?,
            api_base: parse_base_url(api_base)?,
            cookie: cookie.to_owned(),
        })
    }

    /// Enumerates every subscribed forum, in page and in-page order.
    ///
    /// Fetches successive listing pages until one lacks the next-page
    /// marker. Any failure is fatal for the whole enumeration; callers
    /// never see a partial list.
    ///
    /// # Errors
    ///
    /// - [`ClientError::Http`] on network failure or a non-2xx status.
    /// - [`ClientError::Parse`] if a page does not match the listing markup.
    /// - [`ClientError::PaginationLimit`] if the marker never disappears.
    pub async fn list_forums(&self) -> Result<Vec<Forum>, ClientError> {
        let mut forums = Vec::new();
        for page_no in 1.. {
            if page_no > MAX_PAGES {
                return Err(ClientError::PaginationLimit {
                    max_pages: MAX_PAGES,
                });
            }
            tracing::debug!(page = page_no, "fetching forum listing page");
            let page = self.fetch_like_page(page_no).await?;
            forums.extend(page.forums);
            if !page.has_next {
                break;
            }
        }
        tracing::info!(count = forums.len(), "enumerated subscribed forums");
        Ok(forums)
    }

    /// Fetches and classifies one forum's mobile status page.
    ///
    /// # Errors
    ///
    /// - [`ClientError::Http`] on network failure or a non-2xx status.
    /// - [`ClientError::Parse`] if the check-in link is missing a token.
    pub async fn fetch_forum_status(&self, forum: &str) -> Result<ForumPageStatus, ClientError> {
        let mut url = self.join(&self.web_base, "mo/m")?;
        url.query_pairs_mut().append_pair("kw", forum);
        let response = self
            .client
            .get(url)
            .header(reqwest::header::COOKIE, &self.cookie)
            .header(reqwest::header::USER_AGENT, MOBILE_UA)
            .header(
                reqwest::header::ACCEPT,
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            )
            .send()
            .await?
            .error_for_status()?;
        let html = response.text().await?;
        classify_forum_page(&html)
    }

    /// Signs and submits one check-in, returning the day's stats.
    ///
    /// `fid` and `tbs` are the tokens lifted from the status page by
    /// [`TiebaClient::fetch_forum_status`].
    ///
    /// # Errors
    ///
    /// - [`ClientError::Http`] on network failure or a non-2xx status.
    /// - [`ClientError::Api`] if the endpoint returns a non-zero
    ///   `error_code`.
    /// - [`ClientError::Parse`] if the response envelope is malformed.
    pub async fn submit_sign(
        &self,
        forum: &str,
        fid: &str,
        tbs: &str,
    ) -> Result<SignReceipt, ClientError> {
        let mut fields = BTreeMap::new();
        fields.insert("_client_id".to_owned(), CLIENT_ID.to_owned());
        fields.insert("_client_type".to_owned(), CLIENT_TYPE.to_owned());
        fields.insert("_client_version".to_owned(), CLIENT_VERSION.to_owned());
        fields.insert("_phone_imei".to_owned(), PHONE_IMEI.to_owned());
        fields.insert("fid".to_owned(), fid.to_owned());
        fields.insert(
            "kw".to_owned(),
            utf8_percent_encode(forum, FORM_ENCODE).to_string(),
        );
        fields.insert("net_type".to_owned(), NET_TYPE.to_owned());
        fields.insert("tbs".to_owned(), tbs.to_owned());

        let body = signed_form(&fields);
        let url = self.join(&self.api_base, "c/c/forum/sign")?;
        let response = self
            .client
            .post(url)
            .header(
                reqwest::header::CONTENT_TYPE,
                "application/x-www-form-urlencoded",
            )
            .header(reqwest::header::COOKIE, &self.cookie)
            .body(body)
            .send()
            .await?
            .error_for_status()?;
        let text = response.text().await?;
        let envelope: serde_json::Value = serde_json::from_str(&text)
            .map_err(|e| ClientError::parse("sign response", e.to_string()))?;

        // The endpoint reports errors in-band; `error_code` and the stats
        // fields arrive as either JSON numbers or numeric strings.
        let code = int_field(&envelope, "error_code")
            .ok_or_else(|| ClientError::parse("sign response", "missing error_code"))?;
        if code != 0 {
            let message = envelope
                .get("error_msg")
                .and_then(serde_json::Value::as_str)
                .unwrap_or("unknown error")
                .to_owned();
            return Err(ClientError::Api { code, message });
        }

        let user_info = envelope
            .get("user_info")
            .ok_or_else(|| ClientError::parse("sign response", "missing user_info"))?;
        let stat = |field: &str| -> Result<i64, ClientError> {
            int_field(user_info, field).ok_or_else(|| {
                ClientError::parse("sign response", format!("missing user_info.{field}"))
            })
        };
        Ok(SignReceipt {
            gain: stat("sign_bonus_point")?,
            rank: stat("user_sign_rank")?,
            continued: stat("cont_sign_num")?,
            total: stat("total_sign_num")?,
            missed: stat("miss_sign_num")?,
        })
    }

    /// Fetches one listing page (`pn` is 1-based).
    async fn fetch_like_page(&self, page_no: usize) -> Result<crate::extract::LikePage, ClientError> {
        let mut url = self.join(&self.web_base, "f/like/mylike")?;
        url.query_pairs_mut()
            .append_pair("pn", &page_no.to_string());
        let response = self
            .client
            .get(url)
            .header(reqwest::header::COOKIE, &self.cookie)
            .send()
            .await?
            .error_for_status()?;
        let html = response.text().await?;
        parse_like_page(&html)
    }

    fn join(&self, base: &Url, path: &str) -> Result<Url, ClientError> {
        base.join(path).map_err(|e| ClientError::InvalidBaseUrl {
            url: format!("{base}{path}"),
            reason: e.to_string(),
        })
    }
}

/// Normalises a base URL to end with exactly one slash so joins append
/// rather than replace the last path segment.
fn parse_base_url(raw: &str) -> Result<Url, ClientError> {
    let normalised = format!("{}/", raw.trim_end_matches('/'));
    Url::parse(&normalised).map_err(|e| ClientError::InvalidBaseUrl {
        url: raw.to_owned(),
        reason: e.to_string(),
    })
}

/// Reads an integer field that may arrive as a JSON number or a numeric
/// string.
fn int_field(value: &serde_json::Value, field: &str) -> Option<i64> {
    match value.get(field)? {
        serde_json::Value::Number(n) => n.as_i64(),
        serde_json::Value::String(s) => s.parse().ok(),
        _ => None,
    }
}
