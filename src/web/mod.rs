pub mod account;
pub mod admin;
pub mod api;
pub mod comments;
pub mod gallery;
pub mod images;
pub mod locations;
pub mod login;
pub mod logout;
pub mod plants;
pub mod tags;
pub mod uploads;

/// Configures the web app by adding services from each web file.
///
/// @see https://docs.rs/actix-web/4.0.1/actix_web/struct.App.html#method.configure
pub fn configure(conf: &mut actix_web::web::ServiceConfig) {
    // Descending order. Order is important.
    // Route resolution will stop at the first match.
    account::configure(conf);
    admin::configure(conf);
    comments::configure(conf);
    gallery::configure(conf);
    images::configure(conf);
    locations::configure(conf);
    login::configure(conf);
    logout::configure(conf);
    plants::configure(conf);
    tags::configure(conf);
}
