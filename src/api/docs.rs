use crate::api::handlers::{auth, books, favorites, quotes, users};
use crate::types::{
    AuthResponse, BookDto, BookRequest, ErrorResponse, FavoriteDto, FavoriteRequest, FieldError,
    LoginRequest, QuoteDto, QuoteRequest, RegisterRequest, UserProfile,
};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Bookshelf API",
        description = "Personal library: books, quotes and favorites behind JWT authentication."
    ),
    paths(
        auth::register,
        auth::login,
        users::me,
        books::list_books,
        books::get_book,
        books::create_book,
        books::update_book,
        books::delete_book,
        quotes::list_quotes,
        quotes::get_quote,
        quotes::create_quote,
        quotes::update_quote,
        quotes::toggle_favorite,
        quotes::delete_quote,
        favorites::list_favorites,
        favorites::add_favorite,
        favorites::remove_favorite,
    ),
    components(schemas(
        RegisterRequest,
        LoginRequest,
        AuthResponse,
        UserProfile,
        BookRequest,
        BookDto,
        QuoteRequest,
        QuoteDto,
        FavoriteRequest,
        FavoriteDto,
        FieldError,
        ErrorResponse,
    )),
    modifiers(&BearerAuth),
    tags(
        (name = "auth", description = "Registration and login"),
        (name = "users", description = "Current user"),
        (name = "books", description = "Shared book catalogue"),
        (name = "quotes", description = "Private quotes"),
        (name = "favorites", description = "Favorite books")
    )
)]
pub struct ApiDoc;

/// Registers the `bearer` scheme referenced by the protected paths.
struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
