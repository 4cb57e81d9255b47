// HTTP routes: single-record and paginated feed reads.

use crate::application::usecases::get_activity::{GetActivityError, GetActivityUseCase};
use crate::application::usecases::list_activities::{
    ListActivitiesError, ListActivitiesQuery, ListActivitiesUseCase,
};
use crate::domain::services::retention_policy::RetentionError;
use crate::domain::value_objects::ids::{ActivityId, EnvironmentId, OrganizationId, TenantScope};
use crate::interface::http::dto::activity::{ActivityListResponse, ActivityResponse};
use crate::interface::http::problem::{
    FEED_ACTIVITY_NOT_FOUND, FEED_INVALID_DATE_FORMAT, FEED_INVALID_DATE_RANGE,
    FEED_REQUEST_MALFORMED, FEED_RETENTION_EXCEEDED, FEED_STORAGE_DB_ERROR, FEED_TENANT_MISSING,
    problem,
};
use crate::interface::http::state::AppState;
use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use serde::Deserialize;

/// Builds feed read routes.
pub fn router() -> axum::Router<AppState> {
    axum::Router::new()
        .route(
            "/environments/:environment_id/activities",
            get(list_activities),
        )
        .route(
            "/environments/:environment_id/activities/:activity_id",
            get(get_activity),
        )
}

#[derive(Debug, Deserialize)]
struct GetActivityParams {
    organization_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ListActivitiesParams {
    organization_id: Option<String>,
    page: Option<u32>,
    limit: Option<u32>,
    channels: Option<String>,
    template_ids: Option<String>,
    subscriber_ids: Option<String>,
    emails: Option<String>,
    search: Option<String>,
    transaction_id: Option<String>,
    topic_key: Option<String>,
    severities: Option<String>,
    after: Option<String>,
    before: Option<String>,
}

/// Resolves one activity through the tiered fallback chain.
async fn get_activity(
    State(state): State<AppState>,
    Path((environment_id, activity_id)): Path<(String, String)>,
    Query(params): Query<GetActivityParams>,
) -> Response {
    // Step 1: Tenant scope is mandatory.
    let Some(organization_id) = params.organization_id else {
        return problem(
            StatusCode::BAD_REQUEST,
            FEED_REQUEST_MALFORMED,
            Some("organization_id is required".to_string()),
            None,
        );
    };
    let scope = TenantScope::new(
        EnvironmentId::new(environment_id),
        OrganizationId::new(organization_id),
    );

    // Step 2: Run the tiered resolution.
    let result =
        GetActivityUseCase::execute(&state.ctx, &scope, &ActivityId::new(activity_id)).await;

    // Step 3: Map the outcome.
    match result {
        Ok(record) => Json(ActivityResponse::from_record(record)).into_response(),
        Err(GetActivityError::NotFound) => problem(
            StatusCode::NOT_FOUND,
            FEED_ACTIVITY_NOT_FOUND,
            Some("activity not found in any store".to_string()),
            None,
        ),
        Err(GetActivityError::Storage(_)) => problem(
            StatusCode::INTERNAL_SERVER_ERROR,
            FEED_STORAGE_DB_ERROR,
            None,
            None,
        ),
    }
}

/// Lists activities matching the filter set, newest first.
async fn list_activities(
    State(state): State<AppState>,
    Path(environment_id): Path<String>,
    Query(params): Query<ListActivitiesParams>,
) -> Response {
    // Step 1: Tenant scope is mandatory.
    let Some(organization_id) = params.organization_id else {
        return problem(
            StatusCode::BAD_REQUEST,
            FEED_REQUEST_MALFORMED,
            Some("organization_id is required".to_string()),
            None,
        );
    };
    let scope = TenantScope::new(
        EnvironmentId::new(environment_id),
        OrganizationId::new(organization_id),
    );

    // Step 2: Validate paging.
    let page = params.page.unwrap_or(0);
    let limit = params
        .limit
        .unwrap_or(state.settings.pagination.default_limit);
    if limit == 0 || limit > state.settings.pagination.max_limit {
        return problem(
            StatusCode::BAD_REQUEST,
            FEED_REQUEST_MALFORMED,
            Some(format!(
                "limit must be between 1 and {}",
                state.settings.pagination.max_limit
            )),
            None,
        );
    }

    // Step 3: Assemble the query from the raw parameters.
    let query = ListActivitiesQuery {
        channels: split_csv(params.channels),
        template_ids: split_csv(params.template_ids),
        subscriber_ids: split_csv(params.subscriber_ids),
        emails: split_csv(params.emails),
        search: params.search.filter(|s| !s.trim().is_empty()),
        transaction_id: params.transaction_id,
        topic_key: params.topic_key,
        severities: split_csv(params.severities),
        after: params.after,
        before: params.before,
    };

    // Step 4: Run the list resolution and map the outcome.
    match ListActivitiesUseCase::execute(&state.ctx, &scope, &query, page, limit).await {
        Ok(result) => Json(ActivityListResponse::from_page(result)).into_response(),
        Err(ListActivitiesError::Retention(err)) => retention_problem(err),
        Err(ListActivitiesError::TenantMissing) => problem(
            StatusCode::INTERNAL_SERVER_ERROR,
            FEED_TENANT_MISSING,
            Some("no tenant record for organization".to_string()),
            None,
        ),
        Err(ListActivitiesError::Storage(_)) => problem(
            StatusCode::INTERNAL_SERVER_ERROR,
            FEED_STORAGE_DB_ERROR,
            None,
            None,
        ),
    }
}

/// Retention failures keep their own codes; the exceeded case is
/// billing-class so clients can prompt an upgrade.
fn retention_problem(err: RetentionError) -> Response {
    match err {
        RetentionError::InvalidDateFormat(raw) => problem(
            StatusCode::BAD_REQUEST,
            FEED_INVALID_DATE_FORMAT,
            Some(format!("unparsable date: {raw}")),
            None,
        ),
        RetentionError::InvalidDateRange => problem(
            StatusCode::BAD_REQUEST,
            FEED_INVALID_DATE_RANGE,
            Some("after must not be later than before".to_string()),
            None,
        ),
        RetentionError::RetentionExceeded { earliest } => problem(
            StatusCode::PAYMENT_REQUIRED,
            FEED_RETENTION_EXCEEDED,
            Some(format!(
                "requested range exceeds the plan's retention; earliest accessible date is {}",
                earliest.to_rfc3339()
            )),
            None,
        ),
    }
}

fn split_csv(raw: Option<String>) -> Vec<String> {
    raw.map(|value| {
        value
            .split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}
