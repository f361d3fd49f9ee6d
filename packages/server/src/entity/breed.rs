use common::DogSize;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "breed")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(unique)]
    pub name: String, // at most 100 characters
    pub dog_size: DogSize,

    #[sea_orm(has_many)]
    pub dogs: HasMany<super::dog::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}
