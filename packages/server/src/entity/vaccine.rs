use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "vaccine")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub name: String, // at most 255 characters

    #[sea_orm(has_many)]
    pub vaccinations: HasMany<super::vaccination::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}
