//! This file defines the navigation bar for the finance app.

use maud::{Markup, html};

use crate::endpoints;

/// A link in the navigation bar.
///
/// It will change appearance if `is_current` is set to
/// `true`. Only one link should be set as active at any one time.
#[derive(Clone)]
struct Link<'a> {
    url: &'a str,
    title: &'a str,
    is_current: bool,
}

impl Link<'_> {
    fn into_html(self) -> Markup {
        let style = if self.is_current {
            "nav-link nav-link-current"
        } else {
            "nav-link"
        };

        html!( li { a href=(self.url) class=(style) { (self.title) } } )
    }
}

pub struct NavBar<'a> {
    links: Vec<Link<'a>>,
}

impl NavBar<'_> {
    /// Get the navigation bar for a logged-in user.
    ///
    /// If a link matches `active_endpoint`, then that link will be
    /// marked as active and displayed differently in the HTML.
    pub fn new(active_endpoint: &str) -> NavBar<'_> {
        let link = |url, title| Link {
            url,
            title,
            is_current: active_endpoint == url,
        };

        let links = vec![
            link(endpoints::QUOTE, "Quote"),
            link(endpoints::BUY, "Buy"),
            link(endpoints::SELL, "Sell"),
            link(endpoints::HISTORY, "History"),
            link(endpoints::LOG_OUT, "Log Out"),
        ];

        NavBar { links }
    }

    /// Get the navigation bar for an anonymous visitor.
    pub fn anonymous(active_endpoint: &str) -> NavBar<'_> {
        let link = |url, title| Link {
            url,
            title,
            is_current: active_endpoint == url,
        };

        NavBar {
            links: vec![
                link(endpoints::REGISTER, "Register"),
                link(endpoints::LOG_IN, "Log In"),
            ],
        }
    }

    pub fn into_html(self) -> Markup {
        html!(
            nav class="nav-bar"
            {
                div class="nav-bar-inner"
                {
                    a href=(endpoints::ROOT) class="nav-brand" { "Finance" }

                    ul class="nav-links"
                    {
                        @for link in self.links {
                            (link.into_html())
                        }
                    }
                }
            }
        )
    }
}

#[cfg(test)]
mod nav_bar_tests {
    use scraper::{Html, Selector};

    use crate::endpoints;

    use super::NavBar;

    fn get_links(html: &Html) -> Vec<(String, String)> {
        let selector = Selector::parse("nav ul a").unwrap();

        html.select(&selector)
            .map(|link| {
                (
                    link.value().attr("href").unwrap_or_default().to_owned(),
                    link.text().collect::<String>(),
                )
            })
            .collect()
    }

    #[test]
    fn logged_in_nav_bar_has_finance_links() {
        let markup = NavBar::new(endpoints::BUY).into_html().into_string();
        let html = Html::parse_fragment(&markup);

        let hrefs = get_links(&html)
            .into_iter()
            .map(|(href, _)| href)
            .collect::<Vec<_>>();

        assert_eq!(
            hrefs,
            vec![
                endpoints::QUOTE,
                endpoints::BUY,
                endpoints::SELL,
                endpoints::HISTORY,
                endpoints::LOG_OUT,
            ]
        );
    }

    #[test]
    fn anonymous_nav_bar_has_register_and_log_in() {
        let markup = NavBar::anonymous(endpoints::LOG_IN)
            .into_html()
            .into_string();
        let html = Html::parse_fragment(&markup);

        let links = get_links(&html);

        assert_eq!(links.len(), 2);
        assert_eq!(links[0], (endpoints::REGISTER.to_owned(), "Register".to_owned()));
        assert_eq!(links[1], (endpoints::LOG_IN.to_owned(), "Log In".to_owned()));
    }
}
