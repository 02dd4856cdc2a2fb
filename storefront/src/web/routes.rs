// storefront/src/web/routes.rs

use crate::web::handlers::{
  auth_handlers, cart_handlers, favorites_handlers, health_check_handler, order_handlers, product_handlers,
};
use actix_web::web;

pub fn configure_app_routes(cfg: &mut web::ServiceConfig) {
  cfg
    .route("/api/health", web::get().to(health_check_handler))
    .service(
      web::scope("/auth")
        .route("/register", web::post().to(auth_handlers::register_handler))
        .route("/login", web::post().to(auth_handlers::login_handler))
        .route("/logout", web::post().to(auth_handlers::logout_handler))
        .route("/create-admin", web::post().to(auth_handlers::create_admin_handler)),
    )
    .service(
      web::scope("/card")
        .route("", web::get().to(cart_handlers::view_cart_handler))
        .route("/add", web::post().to(cart_handlers::add_to_cart_handler))
        .route("/remove/{id}", web::delete().to(cart_handlers::remove_from_cart_handler))
        .route("/checkout", web::post().to(cart_handlers::checkout_handler)),
    )
    .service(
      web::scope("/orders")
        .route("", web::get().to(order_handlers::list_orders_handler))
        .route("/all-orders", web::get().to(order_handlers::list_all_orders_handler))
        .route("/delete/{id}", web::post().to(order_handlers::delete_order_handler)),
    )
    .service(
      web::scope("/favorites")
        .route("", web::get().to(favorites_handlers::view_favorites_handler))
        .route("/add", web::post().to(favorites_handlers::add_favorite_handler))
        .route("/remove", web::post().to(favorites_handlers::remove_favorite_handler)),
    )
    .service(
      // Static segments before `/{id}`.
      web::scope("/products")
        .route("", web::get().to(product_handlers::list_courses_handler))
        .route("/search", web::get().to(product_handlers::search_courses_handler))
        .route("/add", web::post().to(product_handlers::add_course_handler))
        .route("/edit", web::post().to(product_handlers::edit_course_handler))
        .route("/{id}", web::get().to(product_handlers::get_course_handler))
        .route("/{id}/edit", web::get().to(product_handlers::edit_course_view_handler))
        .route("/{id}/delete", web::post().to(product_handlers::delete_course_handler))
        .route("/{id}/comments", web::post().to(product_handlers::add_comment_handler)),
    );
}
