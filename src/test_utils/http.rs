use axum::http::StatusCode;
use axum_test::TestResponse;
use scraper::Selector;

use crate::test_utils::parse_html_text;

#[track_caller]
fn get_header(response: &TestResponse, header_name: &str) -> String {
    let header_error_message = format!("Headers missing {header_name}");

    response
        .headers()
        .get(header_name)
        .expect(&header_error_message)
        .to_str()
        .expect("Could not convert to str")
        .to_string()
}

#[track_caller]
pub(crate) fn assert_redirect(response: &TestResponse, endpoint: &str) {
    response.assert_status_see_other();
    assert_eq!(get_header(response, "location"), endpoint);
}

/// Assert that the response is an apology page with `status_code` and `message`.
#[track_caller]
pub(crate) fn assert_apology(response: &TestResponse, status_code: StatusCode, message: &str) {
    response.assert_status(status_code);

    let html = parse_html_text(&response.text());
    let got_message = html
        .select(&Selector::parse("p").unwrap())
        .next()
        .expect("No apology message found")
        .text()
        .collect::<String>();

    assert_eq!(got_message.trim(), message);
}
