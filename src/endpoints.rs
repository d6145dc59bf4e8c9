//! The URIs served by the finance and birthday apps.

/// The root route: the portfolio page for the finance app and the birthday
/// list/form for the birthday app.
pub const ROOT: &str = "/";
/// The route for the log-in page and form submission.
pub const LOG_IN: &str = "/login";
/// The route for logging out the current user.
pub const LOG_OUT: &str = "/logout";
/// The route for the registration page and form submission.
pub const REGISTER: &str = "/register";
/// The route for getting a stock quote.
pub const QUOTE: &str = "/quote";
/// The route for buying shares.
pub const BUY: &str = "/buy";
/// The route for selling shares.
pub const SELL: &str = "/sell";
/// The page listing the user's trades.
pub const HISTORY: &str = "/history";
/// The route for static files.
pub const STATIC: &str = "/static";
