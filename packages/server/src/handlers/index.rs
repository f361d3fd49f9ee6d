use axum::Json;
use axum::extract::State;
use sea_orm::{EntityTrait, PaginatorTrait};
use tracing::instrument;

use crate::entity::{breed, dog, vaccine};
use crate::error::AppError;
use crate::models::index::IndexResponse;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/",
    tag = "Index",
    operation_id = "index",
    summary = "Shelter counters",
    responses(
        (status = 200, description = "How many dogs, breeds and vaccines are on record", body = IndexResponse),
    ),
)]
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<Json<IndexResponse>, AppError> {
    Ok(Json(IndexResponse {
        number_of_dogs: dog::Entity::find().count(&state.db).await?,
        number_of_breeds: breed::Entity::find().count(&state.db).await?,
        number_of_vaccines: vaccine::Entity::find().count(&state.db).await?,
    }))
}
