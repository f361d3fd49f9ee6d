use serde::Serialize;

/// Counters shown on the home page.
#[derive(Serialize, utoipa::ToSchema)]
pub struct IndexResponse {
    #[schema(example = 12)]
    pub number_of_dogs: u64,
    #[schema(example = 4)]
    pub number_of_breeds: u64,
    #[schema(example = 3)]
    pub number_of_vaccines: u64,
}
