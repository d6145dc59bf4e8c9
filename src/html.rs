//! Shared HTML building blocks: the page layout, style constants, form inputs
//! and number formatting.

use std::sync::OnceLock;

use maud::{DOCTYPE, Markup, html};
use numfmt::{Formatter, Precision};

// The classes below are defined in `static/main.css`.

// Link styles
pub const LINK_STYLE: &str = "link";

// Button styles
pub const BUTTON_PRIMARY_STYLE: &str = "button-primary";

// Form styles
pub const FORM_CONTAINER_STYLE: &str = "form-container";
pub const FORM_LABEL_STYLE: &str = "form-label";
pub const FORM_TEXT_INPUT_STYLE: &str = "form-input";
pub const FORM_NOTE_STYLE: &str = "form-note";

// Table styles
pub const TABLE_STYLE: &str = "table";
pub const TABLE_HEADER_STYLE: &str = "table-header";
pub const TABLE_ROW_STYLE: &str = "table-row";
pub const TABLE_CELL_STYLE: &str = "table-cell";

// Headings
pub const PAGE_TITLE_STYLE: &str = "page-title";
pub const SECTION_TITLE_STYLE: &str = "section-title";

// Page container
pub const PAGE_CONTAINER_STYLE: &str = "page-container";

/// The page layout shared by every full page in both apps.
pub fn base(title: &str, content: &Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en"
        {
            head
            {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                link href="/static/main.css" rel="stylesheet";
            }

            body class="page"
            {
                (content)
            }
        }
    }
}

/// A labelled form input. `name` doubles as the element ID.
///
/// Inputs are not marked `required` so the server-side validation is the
/// single source of truth for missing fields.
pub fn form_input(label: &str, name: &str, input_type: &str, autofocus: bool) -> Markup {
    html! {
        div
        {
            label for=(name) class=(FORM_LABEL_STYLE) { (label) }

            input
                type=(input_type)
                name=(name)
                id=(name)
                placeholder=(label)
                autocomplete="off"
                autofocus[autofocus]
                class=(FORM_TEXT_INPUT_STYLE);
        }
    }
}

/// A form that posts to `action` with a title above it and a submit button
/// with the text `submit_text` below `fields`.
pub fn form_view(title: &str, action: &str, fields: &Markup, submit_text: &str) -> Markup {
    html! {
        div class=(FORM_CONTAINER_STYLE)
        {
            h1 class=(SECTION_TITLE_STYLE) { (title) }

            form method="post" action=(action) class="form"
            {
                (fields)

                button type="submit" class=(BUTTON_PRIMARY_STYLE) { (submit_text) }
            }
        }
    }
}

/// Format `number` as US dollars with two decimal places, e.g. "$1,234.50".
pub fn format_currency(number: f64) -> String {
    static POSITIVE_FMT: OnceLock<Formatter> = OnceLock::new();

    let positive_fmt = POSITIVE_FMT.get_or_init(|| {
        Formatter::currency("$")
            .expect("\"$\" is a valid currency prefix")
            .precision(Precision::Decimals(2))
    });

    static NEGATIVE_FMT: OnceLock<Formatter> = OnceLock::new();

    let negative_fmt = NEGATIVE_FMT.get_or_init(|| {
        Formatter::currency("-$")
            .expect("\"-$\" is a valid currency prefix")
            .precision(Precision::Decimals(2))
    });

    let mut formatted_string = if number < 0.0 {
        negative_fmt.fmt_string(number.abs())
    } else if number > 0.0 {
        positive_fmt.fmt_string(number)
    } else {
        // Zero is hardcoded as "0", so we must specify the formatted string for zero
        "$0.00".to_owned()
    };

    // numfmt drops trailing zeros after the decimal point, e.g. "12.30" is
    // rendered as "12.3" and "12.00" as "12".
    match formatted_string.rfind('.') {
        None => formatted_string.push_str(".00"),
        Some(dot) if formatted_string.len() - dot == 2 => formatted_string.push('0'),
        Some(_) => {}
    }

    formatted_string
}
