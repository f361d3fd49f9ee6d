use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "vaccination")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(indexed)]
    pub dog_id: i32,
    #[sea_orm(belongs_to, from = "dog_id", to = "id", on_delete = "Cascade")]
    pub dog: HasOne<super::dog::Entity>,

    pub vaccine_id: i32,
    #[sea_orm(belongs_to, from = "vaccine_id", to = "id", on_delete = "Cascade")]
    pub vaccine: HasOne<super::vaccine::Entity>,

    #[sea_orm(indexed)]
    pub vaccination_date: Date,
}

impl ActiveModelBehavior for ActiveModel {}
