//! OpenAPI documentation for the task board API.
//!
//! Registers the task and health endpoints, the schema wrappers from
//! [`crate::inbound::http::schemas`] and the `jwt-token` cookie scheme. The
//! document backs Swagger UI in debug builds.

use crate::inbound::http::credential::CREDENTIAL_COOKIE;
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};
use crate::inbound::http::tasks::{
    AutocheckRequest, AutocheckResponse, ModerationAckResponse, ModerationFormSchema,
    TaskListingResponse,
};
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "JwtCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                CREDENTIAL_COOKIE,
                "Signed token issued by the authentication service.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Task board backend API",
        description = "Task catalogue, moderation hand-off and answer checking."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("JwtCookie" = [])),
    paths(
        crate::inbound::http::tasks::list_tasks,
        crate::inbound::http::tasks::submit_for_moderation,
        crate::inbound::http::tasks::check_answer,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        TaskListingResponse,
        ModerationFormSchema,
        ModerationAckResponse,
        AutocheckRequest,
        AutocheckResponse,
        ErrorSchema,
        ErrorCodeSchema
    )),
    tags(
        (name = "tasks", description = "Task catalogue and submissions"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    // utoipa replaces :: with . in schema names
    const ERROR_SCHEMA_NAME: &str = "crate.domain.Error";

    #[test]
    fn error_schema_lists_payload_fields() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let RefOr::T(Schema::Object(error)) = schemas.get(ERROR_SCHEMA_NAME).expect("Error schema")
        else {
            panic!("expected Object schema");
        };
        for field in ["code", "message", "traceId", "details"] {
            assert!(error.properties.contains_key(field), "missing '{field}'");
        }
    }

    #[test]
    fn task_paths_are_registered() {
        let doc = ApiDoc::openapi();
        for path in [
            "/playit/tasks/get-all",
            "/playit/tasks/create/moderation",
            "/playit/tasks/create/autocheck",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }

    #[test]
    fn cookie_scheme_is_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("JwtCookie"));
    }
}
