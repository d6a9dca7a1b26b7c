use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(ToSchema)]
pub struct ErrorResponse { pub error: String, pub code: u16 }

#[derive(ToSchema)]
pub struct RegisterStatusDoc { pub key: String, pub value: String }

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::ready,
        crate::routes::status::get_status,
        crate::routes::status::register_status,
    ),
    components(
        schemas(
            HealthResponse,
            ErrorResponse,
            RegisterStatusDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "status")
    )
)]
pub struct ApiDoc;
