use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "dog_caretaker")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub dog_id: i32,
    #[sea_orm(primary_key, auto_increment = false)]
    pub caretaker_id: i32,
    #[sea_orm(belongs_to, from = "dog_id", to = "id", on_delete = "Cascade")]
    pub dog: HasOne<super::dog::Entity>,
    #[sea_orm(belongs_to, from = "caretaker_id", to = "id", on_delete = "Cascade")]
    pub caretaker: HasOne<super::caretaker::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}
