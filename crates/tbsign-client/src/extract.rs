//! Extraction rules for the forum site's HTML.
//!
//! The site exposes no JSON for the pages we need, so enumeration and the
//! per-forum status check scrape fixed markup. The coupling is brittle by
//! nature; every rule the workflow depends on lives in this module so a
//! markup change breaks exactly one place.
//!
//! Contract (as served today):
//! - the listing page carries one `<tr>` per subscribed forum with the name
//!   in the first cell and `cur_exp` / `like_badge_title` / `like_badge_lv`
//!   class-tagged values, plus a `j_pagebar` block whose text contains the
//!   next-page marker while more pages remain;
//! - the mobile forum page carries a right-aligned block whose first child
//!   is a `<span>` once checked in, or an `<a>` whose href carries the
//!   `fid` and `tbs` tokens while a check-in is still possible. The block
//!   is absent entirely on forums without the feature.

use regex::Regex;
use tbsign_core::Forum;

use crate::error::ClientError;

/// Text the pagination bar contains while a further listing page exists
/// ("next page" in the site's locale).
const NEXT_PAGE_MARKER: &str = "下一页";

/// One parsed listing page.
#[derive(Debug)]
pub struct LikePage {
    pub forums: Vec<Forum>,
    pub has_next: bool,
}

/// Classification of a forum's mobile status page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ForumPageStatus {
    /// No check-in block at all; the forum does not support the feature.
    Unsupported,
    /// The block's first child is a `<span>`: today's check-in is done.
    AlreadySignedIn,
    /// Check-in is possible; `fid` and `tbs` are the per-request tokens
    /// lifted from the check-in link.
    Ready { fid: String, tbs: String },
}

/// Parses one listing page into forum rows plus the next-page flag.
///
/// Row order is preserved; the orchestrator reports progress by index.
///
/// # Errors
///
/// Returns [`ClientError::Parse`] if a forum row is missing its name or
/// badge fields, or if the pagination bar is absent (enumeration treats a
/// malformed page as fatal; no partial result is trusted).
pub(crate) fn parse_like_page(html: &str) -> Result<LikePage, ClientError> {
    let row_re = Regex::new(r"(?is)<tr[^>]*>(.*?)</tr>").expect("valid row regex");
    let name_re = Regex::new(r"(?is)<td[^>]*>\s*(?:<a[^>]*>)?\s*([^<]+?)\s*<").expect("valid name regex");
    let exp_re = Regex::new(r#"(?is)class="cur_exp"[^>]*>\s*(\d+)"#).expect("valid exp regex");
    let label_re =
        Regex::new(r#"(?is)class="like_badge_title"[^>]*>\s*([^<]*?)\s*<"#).expect("valid label regex");
    let level_re =
        Regex::new(r#"(?is)class="like_badge_lv"[^>]*>\s*(\d+)"#).expect("valid level regex");

    let mut forums = Vec::new();
    for cap in row_re.captures_iter(html) {
        let row = &cap[1];
        // Header row.
        if row.contains("<th") {
            continue;
        }
        let name = name_re
            .captures(row)
            .map(|c| c[1].to_owned())
            .ok_or_else(|| ClientError::parse("listing row", "missing forum name cell"))?;
        let experience = capture_int(&exp_re, row)
            .ok_or_else(|| ClientError::parse("listing row", "missing cur_exp value"))?;
        let level_label = label_re
            .captures(row)
            .map(|c| c[1].to_owned())
            .ok_or_else(|| ClientError::parse("listing row", "missing badge title"))?;
        let level = capture_int(&level_re, row)
            .ok_or_else(|| ClientError::parse("listing row", "missing badge level"))?;
        forums.push(Forum {
            name,
            level,
            level_label,
            experience,
        });
    }

    // The pagination bar is present even on a single-page listing; its
    // absence means we were served something other than the listing
    // (login wall, error page) and the whole enumeration must fail.
    let Some(bar_at) = html.find(r#"id="j_pagebar""#) else {
        return Err(ClientError::parse("listing page", "missing pagination bar"));
    };
    let has_next = html[bar_at..].contains(NEXT_PAGE_MARKER);

    Ok(LikePage { forums, has_next })
}

/// Classifies a forum's mobile status page.
///
/// # Errors
///
/// Returns [`ClientError::Parse`] when the check-in link is present but
/// missing either token, a half-broken page we must not submit from.
pub(crate) fn classify_forum_page(html: &str) -> Result<ForumPageStatus, ClientError> {
    let block_re = Regex::new(r#"(?is)style="text-align:right;?"[^>]*>\s*<(span|a)\b([^>]*)>"#)
        .expect("valid block regex");

    let Some(cap) = block_re.captures(html) else {
        return Ok(ForumPageStatus::Unsupported);
    };
    if cap[1].eq_ignore_ascii_case("span") {
        return Ok(ForumPageStatus::AlreadySignedIn);
    }

    let href_re = Regex::new(r#"(?is)href\s*=\s*["']([^"']+)["']"#).expect("valid href regex");
    let href = href_re
        .captures(&cap[2])
        .map(|c| c[1].replace("&amp;", "&"))
        .ok_or_else(|| ClientError::parse("forum page", "check-in link without href"))?;

    let fid = query_value(&href, "fid")
        .ok_or_else(|| ClientError::parse("forum page", "check-in link missing fid"))?;
    let tbs = query_value(&href, "tbs")
        .ok_or_else(|| ClientError::parse("forum page", "check-in link missing tbs"))?;
    Ok(ForumPageStatus::Ready { fid, tbs })
}

/// Extracts the value of a named query parameter from a URL string.
fn query_value(url: &str, param: &str) -> Option<String> {
    let query_start = url.find('?')? + 1;
    let needle = format!("{param}=");
    for pair in url[query_start..].split('&') {
        if let Some(value) = pair.strip_prefix(needle.as_str()) {
            if !value.is_empty() {
                return Some(value.to_owned());
            }
        }
    }
    None
}

fn capture_int(re: &Regex, haystack: &str) -> Option<i64> {
    re.captures(haystack)?[1].parse().ok()
}
