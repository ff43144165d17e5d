use axum::{Router, middleware};
use serde::Deserialize;
use tower_cookies::CookieManagerLayer;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    model::ResourceType,
    web::{AppState, WebError, WebResult, doc::ApiDoc, middlewares},
};

pub mod account;
pub mod courses;
pub mod dashboard;
pub mod lessons;
pub mod modules;
pub mod users;

/// `?confirm=true` must accompany every delete.
#[derive(Debug, Clone, Copy, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DeleteQuery {
    #[serde(default)]
    pub confirm: bool,
}

impl DeleteQuery {
    pub fn require(self, r#type: ResourceType) -> WebResult<()> {
        if self.confirm {
            Ok(())
        } else {
            Err(WebError::confirmation_required(r#type))
        }
    }
}

/// Session + privileged-role guard shared by every admin router.
pub(crate) fn guarded<S>(router: Router<AppState>, state: &AppState) -> Router<S> {
    router
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            middlewares::require_privileged_fn,
        ))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            middlewares::extract_context_fn,
        ))
        .with_state(state.clone())
}

pub fn build_app<S: Send + Sync + Clone + 'static>(state: AppState) -> Router<S> {
    let docs = state.config().app().docs();

    let mut router = Router::new()
        .nest("/api/v1/account", account::routes(state.clone()))
        .nest("/api/v1/dashboard", dashboard::routes(state.clone()))
        .nest("/api/v1/courses", courses::routes(state.clone()))
        .nest("/api/v1/modules", modules::routes(state.clone()))
        .nest("/api/v1/lessons", lessons::routes(state.clone()))
        .nest("/api/v1/users", users::routes(state.clone()))
        .layer(CookieManagerLayer::default())
        .layer(CorsLayer::very_permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    if docs {
        let openapi = ApiDoc::openapi();
        router = router.merge(SwaggerUi::new("/api/v1/docs").url("/api-doc/openapi.json", openapi));
    }

    router
}
