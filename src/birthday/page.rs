use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use maud::{Markup, html};

use crate::{
    BirthdayState, Error, endpoints,
    birthday::{Birthday, BirthdayForm, NewBirthday, get_birthdays, insert_birthday},
    html::{
        PAGE_CONTAINER_STYLE, PAGE_TITLE_STYLE, SECTION_TITLE_STYLE, TABLE_CELL_STYLE,
        TABLE_HEADER_STYLE, TABLE_ROW_STYLE, TABLE_STYLE, base, form_input, form_view,
    },
};

fn birthdays_view(birthdays: &[Birthday]) -> Markup {
    let fields = html! {
        (form_input("Name", "name", "text", true))
        (form_input("Month", "month", "number", false))
        (form_input("Day", "day", "number", false))
    };

    let content = html! {
        div class=(PAGE_CONTAINER_STYLE)
        {
            h1 class=(PAGE_TITLE_STYLE) { "Birthdays" }

            (form_view("Add a Birthday", endpoints::ROOT, &fields, "Add Birthday"))

            h2 class=(SECTION_TITLE_STYLE) { "All Birthdays" }

            table class=(TABLE_STYLE)
            {
                thead class=(TABLE_HEADER_STYLE)
                {
                    tr
                    {
                        th scope="col" class=(TABLE_CELL_STYLE) { "Name" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Birthday" }
                    }
                }

                tbody
                {
                    @for birthday in birthdays {
                        tr class=(TABLE_ROW_STYLE)
                        {
                            td class=(TABLE_CELL_STYLE) { (birthday.name) }
                            td class=(TABLE_CELL_STYLE) { (birthday.month) "/" (birthday.day) }
                        }
                    }
                }
            }
        }
    };

    base("Birthdays", &content)
}

/// Display the birthday form and every stored birthday.
pub async fn get_birthdays_page(State(state): State<BirthdayState>) -> Result<Markup, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let birthdays = get_birthdays(&connection)?;

    Ok(birthdays_view(&birthdays))
}

/// Store the birthday from the form and redirect back to the list.
pub async fn post_birthday(
    State(state): State<BirthdayState>,
    Form(form): Form<BirthdayForm>,
) -> Result<Response, Error> {
    let new_birthday = NewBirthday::try_from(form)?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let birthday = insert_birthday(new_birthday, &connection)?;
    tracing::debug!("added birthday {birthday:?}");

    Ok(Redirect::to(endpoints::ROOT).into_response())
}
