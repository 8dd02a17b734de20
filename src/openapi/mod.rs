use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "whistl API",
        version = "0.1.0",
        description = r#"
# whistl Emergency Coordination API

Backend for emergency supply coordination: admins publish alerts with a
supply list, responders claim items.

## Claiming

Supply items are claimed exclusively: the first accepted claim closes the
item. Concurrent attempts on the same item are arbitrated by the storage
layer; losers receive a `409` carrying a machine-readable `code`
(`ALREADY_CLAIMED`, `INSUFFICIENT_QUANTITY` or `RACE_CONDITION`).

## Error Handling

Outside the claim endpoint the API uses a standardized error format:

```json
{
  "error": "Bad Request",
  "message": "Validation failed",
  "timestamp": "2026-01-01T00:00:00Z"
}
```
"#
    ),
    paths(
        crate::handlers::alerts::create_alert,
        crate::handlers::alerts::list_alerts,
        crate::handlers::preparation_items::add_item,
        crate::handlers::preparation_items::list_items,
        crate::handlers::claims::claim_item,
    ),
    components(schemas(
        crate::errors::ErrorResponse,
        crate::handlers::alerts::CreateAlertRequest,
        crate::handlers::preparation_items::AddPreparationItemRequest,
        crate::handlers::claims::ClaimItemRequest,
        crate::services::preparation_items::SupplyItemStatus,
    )),
    tags(
        (name = "alerts", description = "Alert management"),
        (name = "preparation-items", description = "Alert supply lists"),
        (name = "claims", description = "Supply-item claiming"),
    )
)]
pub struct ApiDoc;

/// Swagger UI router serving the generated document
pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi())
}
