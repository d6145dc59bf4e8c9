//! The birthday tracker: a form for adding a birthday above a list of all of them.

mod db;
mod page;

pub use db::{create_birthday_table, get_birthdays, insert_birthday};
pub use page::{get_birthdays_page, post_birthday};

use serde::{Deserialize, Serialize};

use crate::Error;

/// A stored birthday.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Birthday {
    pub id: i64,
    pub name: String,
    pub month: u8,
    pub day: u8,
}

/// A birthday that passed validation but has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBirthday {
    pub name: String,
    pub month: u8,
    pub day: u8,
}

/// The raw data entered in the birthday form.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BirthdayForm {
    pub name: String,
    pub month: String,
    pub day: String,
}

impl TryFrom<BirthdayForm> for NewBirthday {
    type Error = Error;

    /// The name must not be blank, the month must be 1-12 and the day 1-31.
    ///
    /// Days are not checked against the month, so 2/30 is accepted.
    fn try_from(form: BirthdayForm) -> Result<Self, Self::Error> {
        if form.name.trim().is_empty() {
            return Err(Error::InvalidBirthday("must provide name".to_owned()));
        }

        let month = parse_in_range(&form.month, 1..=12)
            .ok_or_else(|| Error::InvalidBirthday("month must be between 1 and 12".to_owned()))?;
        let day = parse_in_range(&form.day, 1..=31)
            .ok_or_else(|| Error::InvalidBirthday("day must be between 1 and 31".to_owned()))?;

        Ok(Self {
            name: form.name,
            month,
            day,
        })
    }
}

fn parse_in_range(raw: &str, range: std::ops::RangeInclusive<u8>) -> Option<u8> {
    raw.trim()
        .parse::<u8>()
        .ok()
        .filter(|value| range.contains(value))
}
