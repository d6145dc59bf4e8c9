//! Router configuration for the finance and birthday apps.

use axum::{Router, middleware, routing::get};
use tower_http::services::ServeDir;

use crate::{
    BirthdayState, FinanceState,
    apology::get_404_not_found,
    auth::{
        auth_guard, get_log_in_page, get_log_out, get_register_page, post_log_in, post_register,
    },
    birthday::{get_birthdays_page, post_birthday},
    cache_control::no_cache_middleware,
    endpoints,
    ledger::{
        get_buy_page, get_history_page, get_portfolio_page, get_sell_page, post_buy, post_sell,
    },
    logging::logging_middleware,
    quote::{get_quote_page, post_quote},
};

/// Return a router with all the finance app's routes.
///
/// Every route except log-in, registration, log-out and static files
/// requires a session.
pub fn build_finance_router(state: FinanceState) -> Router {
    let unprotected_routes = Router::new()
        .route(endpoints::LOG_IN, get(get_log_in_page).post(post_log_in))
        .route(endpoints::LOG_OUT, get(get_log_out))
        .route(
            endpoints::REGISTER,
            get(get_register_page).post(post_register),
        );

    let protected_routes = Router::new()
        .route(endpoints::ROOT, get(get_portfolio_page))
        .route(endpoints::QUOTE, get(get_quote_page).post(post_quote))
        .route(endpoints::BUY, get(get_buy_page).post(post_buy))
        .route(endpoints::SELL, get(get_sell_page).post(post_sell))
        .route(endpoints::HISTORY, get(get_history_page))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_guard));

    protected_routes
        .merge(unprotected_routes)
        .nest_service(endpoints::STATIC, ServeDir::new("static/"))
        .fallback(get_404_not_found)
        .layer(middleware::from_fn(no_cache_middleware))
        .layer(middleware::from_fn(logging_middleware))
        .with_state(state)
}

/// Return a router with the birthday app's routes.
pub fn build_birthday_router(state: BirthdayState) -> Router {
    Router::new()
        .route(endpoints::ROOT, get(get_birthdays_page).post(post_birthday))
        .nest_service(endpoints::STATIC, ServeDir::new("static/"))
        .fallback(get_404_not_found)
        .layer(middleware::from_fn(no_cache_middleware))
        .layer(middleware::from_fn(logging_middleware))
        .with_state(state)
}
