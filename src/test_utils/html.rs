use axum::{body::Body, response::Response};
use scraper::{Html, Selector};

pub(crate) async fn parse_html_document(response: Response<Body>) -> Html {
    let body = response.into_body();
    let body = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Could not get response body");
    let text = String::from_utf8_lossy(&body).to_string();

    Html::parse_document(&text)
}

pub(crate) fn parse_html_text(text: &str) -> Html {
    Html::parse_document(text)
}

#[track_caller]
pub(crate) fn assert_valid_html(html: &Html) {
    assert!(
        html.errors.is_empty(),
        "Got HTML parsing errors: {:?}",
        html.errors
    );
}

/// The trimmed text of every cell in every body row of the first table.
#[track_caller]
pub(crate) fn must_get_table_rows(html: &Html) -> Vec<Vec<String>> {
    let table = html
        .select(&Selector::parse("table").unwrap())
        .next()
        .expect("No table found");
    let row_selector = Selector::parse("tbody tr").unwrap();
    let cell_selector = Selector::parse("td, th").unwrap();

    table
        .select(&row_selector)
        .map(|row| {
            row.select(&cell_selector)
                .map(|cell| cell.text().collect::<String>().trim().to_owned())
                .collect()
        })
        .collect()
}

const STYLESHEET: &str = include_str!("../../static/main.css");

/// Assert that every class used in `html` has a rule in `static/main.css`.
#[track_caller]
pub(crate) fn assert_classes_are_styled(html: &Html) {
    let is_name_char = |c: char| c.is_ascii_alphanumeric() || c == '-' || c == '_';

    for element in html.select(&Selector::parse("[class]").unwrap()) {
        for class in element.value().classes() {
            let selector = format!(".{class}");
            let is_defined = STYLESHEET.match_indices(&selector).any(|(start, _)| {
                !STYLESHEET[start + selector.len()..]
                    .chars()
                    .next()
                    .is_some_and(is_name_char)
            });

            assert!(is_defined, "class {class:?} is not defined in static/main.css");
        }
    }
}
