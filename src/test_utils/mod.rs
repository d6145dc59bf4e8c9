#![allow(missing_docs)]

pub(crate) mod form;
pub(crate) mod html;
pub(crate) mod http;
pub(crate) mod state;

pub(crate) use form::{
    assert_form_action, assert_form_input, assert_form_submit_button_with_text, must_get_form,
};
pub(crate) use html::{
    assert_classes_are_styled, assert_valid_html, must_get_table_rows, parse_html_document,
    parse_html_text,
};
pub(crate) use http::{assert_apology, assert_redirect};
pub(crate) use state::{get_finance_state, get_finance_test_server, log_in_as};
