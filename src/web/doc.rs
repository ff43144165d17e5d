use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

pub struct CookieAuthModifier;

impl Modify for CookieAuthModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(schema) = openapi.components.as_mut() {
            schema.add_security_scheme(
                "cookie",
                SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                    "SID",
                    "JWT session of the signed-in admin",
                ))),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    info(title = "SoZO admin API"),
    paths(
        crate::web::routes::account::account_signin_handler,
        crate::web::routes::account::account_signout_handler,
        crate::web::routes::account::account_me_handler,
        crate::web::routes::dashboard::dashboard_handler,
        crate::web::routes::courses::courses_list_handler,
        crate::web::routes::courses::courses_create_handler,
        crate::web::routes::courses::courses_blank_form_handler,
        crate::web::routes::courses::courses_form_edit_handler,
        crate::web::routes::courses::courses_get_handler,
        crate::web::routes::courses::courses_form_handler,
        crate::web::routes::courses::courses_update_handler,
        crate::web::routes::courses::courses_delete_handler,
        crate::web::routes::modules::modules_list_handler,
        crate::web::routes::modules::modules_create_handler,
        crate::web::routes::modules::modules_get_handler,
        crate::web::routes::modules::modules_update_handler,
        crate::web::routes::modules::modules_delete_handler,
        crate::web::routes::lessons::lessons_list_handler,
        crate::web::routes::lessons::lessons_create_handler,
        crate::web::routes::lessons::lessons_blank_form_handler,
        crate::web::routes::lessons::lessons_form_edit_handler,
        crate::web::routes::lessons::lessons_get_handler,
        crate::web::routes::lessons::lessons_form_handler,
        crate::web::routes::lessons::lessons_update_handler,
        crate::web::routes::lessons::lessons_delete_handler,
        crate::web::routes::users::users_list_handler,
        crate::web::routes::users::users_role_handler,
        crate::web::routes::users::users_delete_handler,
    ),
    modifiers(&CookieAuthModifier),
)]
pub struct ApiDoc;
