//! Integration tests for `TiebaClient` and the check-in executor, using
//! wiremock in place of the forum site.

use tbsign_client::{check_in, ClientError, ForumPageStatus, TiebaClient, MSG_ALREADY_DONE};
use tbsign_core::CheckInOutcome;
use wiremock::matchers::{body_string_contains, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str) -> TiebaClient {
    TiebaClient::with_base_urls("BDUSS=test-cookie", 5, base_url, base_url)
        .expect("client construction should not fail")
}

fn listing_page(rows: &[(&str, i64, &str, i64)], has_next: bool) -> String {
    let mut html = String::from("<table><tr><th>名称</th><th>等级</th><th>经验</th></tr>");
    for (name, level, label, exp) in rows {
        html.push_str(&format!(
            r#"<tr><td><a href="/f?kw={name}">{name}</a></td>
               <td><span class="like_badge_lv">{level}</span>
                   <span class="like_badge_title">{label}</span></td>
               <td><span class="cur_exp">{exp}</span></td></tr>"#
        ));
    }
    html.push_str(r#"</table><div id="j_pagebar"><div class="pagination">"#);
    if has_next {
        html.push_str(r#"<a href="?pn=2">下一页</a>"#);
    }
    html.push_str("</div></div>");
    html
}

fn ready_page(fid: &str, tbs: &str) -> String {
    format!(
        r#"<html><body><div style="text-align:right;">
           <a href="/mo/m/sign?tbs={tbs}&amp;fid={fid}&amp;kw=rust">签到</a></div></body></html>"#
    )
}

const ALREADY_SIGNED_PAGE: &str =
    r#"<html><body><div style="text-align:right;"><span>已签到</span></div></body></html>"#;

const UNSUPPORTED_PAGE: &str = "<html><body><div>no check-in here</div></body></html>";

#[tokio::test]
async fn list_forums_follows_pagination_and_preserves_order() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/f/like/mylike"))
        .and(query_param("pn", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing_page(
            &[("rust", 9, "见习吧友", 2708), ("steam", 4, "初级粉丝", 133)],
            true,
        )))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/f/like/mylike"))
        .and(query_param("pn", "2"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(listing_page(&[("linux", 7, "铁杆会员", 901)], false)),
        )
        .mount(&server)
        .await;

    let forums = test_client(&server.uri())
        .list_forums()
        .await
        .expect("enumeration should succeed");

    let names: Vec<&str> = forums.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, ["rust", "steam", "linux"]);
    assert_eq!(forums[0].level, 9);
    assert_eq!(forums[0].level_label, "见习吧友");
    assert_eq!(forums[2].experience, 901);
}

#[tokio::test]
async fn list_forums_fails_whole_enumeration_on_malformed_page() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/f/like/mylike"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>please log in</html>"))
        .mount(&server)
        .await;

    let err = test_client(&server.uri()).list_forums().await.unwrap_err();
    assert!(matches!(err, ClientError::Parse { .. }));
}

#[tokio::test]
async fn fetch_forum_status_classifies_all_three_states() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/mo/m"))
        .and(query_param("kw", "rust"))
        .respond_with(ResponseTemplate::new(200).set_body_string(ready_page("987654", "0af12bc")))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/mo/m"))
        .and(query_param("kw", "steam"))
        .respond_with(ResponseTemplate::new(200).set_body_string(ALREADY_SIGNED_PAGE))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/mo/m"))
        .and(query_param("kw", "minecraft"))
        .respond_with(ResponseTemplate::new(200).set_body_string(UNSUPPORTED_PAGE))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    assert_eq!(
        client.fetch_forum_status("rust").await.expect("classifies"),
        ForumPageStatus::Ready {
            fid: "987654".to_owned(),
            tbs: "0af12bc".to_owned(),
        }
    );
    assert_eq!(
        client.fetch_forum_status("steam").await.expect("classifies"),
        ForumPageStatus::AlreadySignedIn
    );
    assert_eq!(
        client
            .fetch_forum_status("minecraft")
            .await
            .expect("classifies"),
        ForumPageStatus::Unsupported
    );
}

#[tokio::test]
async fn submit_sign_parses_numeric_string_stats() {
    let server = MockServer::start().await;

    // The real endpoint mixes JSON numbers and numeric strings.
    let body = serde_json::json!({
        "error_code": "0",
        "user_info": {
            "sign_bonus_point": "8",
            "user_sign_rank": 120,
            "cont_sign_num": "3",
            "total_sign_num": "40",
            "miss_sign_num": 1
        }
    });
    Mock::given(method("POST"))
        .and(path("/c/c/forum/sign"))
        .and(body_string_contains("fid=987654"))
        .and(body_string_contains("tbs=0af12bc"))
        .and(body_string_contains("&sign="))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let receipt = test_client(&server.uri())
        .submit_sign("rust", "987654", "0af12bc")
        .await
        .expect("should parse receipt");
    assert_eq!(receipt.gain, 8);
    assert_eq!(receipt.rank, 120);
    assert_eq!(receipt.continued, 3);
    assert_eq!(receipt.total, 40);
    assert_eq!(receipt.missed, 1);
}

#[tokio::test]
async fn submit_sign_surfaces_api_error_code_and_message() {
    let server = MockServer::start().await;

    let body = serde_json::json!({
        "error_code": 2280006,
        "error_msg": "checked in too fast"
    });
    Mock::given(method("POST"))
        .and(path("/c/c/forum/sign"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let err = test_client(&server.uri())
        .submit_sign("rust", "987654", "0af12bc")
        .await
        .unwrap_err();
    match err {
        ClientError::Api { code, message } => {
            assert_eq!(code, 2_280_006);
            assert_eq!(message, "checked in too fast");
        }
        other => panic!("expected ClientError::Api, got {other:?}"),
    }
}

#[tokio::test]
async fn check_in_returns_success_outcome_end_to_end() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/mo/m"))
        .respond_with(ResponseTemplate::new(200).set_body_string(ready_page("987654", "0af12bc")))
        .mount(&server)
        .await;
    let body = serde_json::json!({
        "error_code": 0,
        "user_info": {
            "sign_bonus_point": 10,
            "user_sign_rank": 55,
            "cont_sign_num": 2,
            "total_sign_num": 30,
            "miss_sign_num": 0
        }
    });
    Mock::given(method("POST"))
        .and(path("/c/c/forum/sign"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let outcome = check_in(&client, "rust").await;
    assert_eq!(
        outcome,
        CheckInOutcome::Success {
            gain: 10,
            rank: 55,
            continued: 2,
            total: 30,
            missed: 0,
        }
    );
}

#[tokio::test]
async fn check_in_classifies_already_done_as_terminal() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/mo/m"))
        .respond_with(ResponseTemplate::new(200).set_body_string(ALREADY_SIGNED_PAGE))
        .mount(&server)
        .await;

    let outcome = check_in(&test_client(&server.uri()), "rust").await;
    assert_eq!(
        outcome,
        CheckInOutcome::Failure {
            message: MSG_ALREADY_DONE.to_owned(),
            retryable: false,
        }
    );
}

#[tokio::test]
async fn check_in_classifies_api_rejection_as_retryable() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/mo/m"))
        .respond_with(ResponseTemplate::new(200).set_body_string(ready_page("987654", "0af12bc")))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/c/c/forum/sign"))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            serde_json::json!({ "error_code": 340006, "error_msg": "need captcha" }),
        ))
        .mount(&server)
        .await;

    let outcome = check_in(&test_client(&server.uri()), "rust").await;
    assert_eq!(
        outcome,
        CheckInOutcome::Failure {
            message: "need captcha".to_owned(),
            retryable: true,
        }
    );
}

#[tokio::test]
async fn check_in_classifies_transport_failure_as_retryable() {
    // Nothing is listening on this port.
    let client = test_client("http://127.0.0.1:1");
    let outcome = check_in(&client, "rust").await;
    match outcome {
        CheckInOutcome::Failure { retryable, .. } => assert!(retryable),
        CheckInOutcome::Success { .. } => panic!("expected a failure against a dead port"),
    }
}
