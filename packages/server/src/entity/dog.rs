use common::Gender;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Name given to dogs registered without one.
pub const DEFAULT_NAME: &str = "No name";

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "dog")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub name: String,
    /// Free text such as "2 years" or "about 6 months".
    pub age: Option<String>,
    #[sea_orm(indexed)]
    pub date_registered: Date,
    #[sea_orm(default_value = false)]
    pub sterilized: bool,
    pub gender: Gender,

    /// Breeds cannot be deleted while dogs still point at them.
    pub breed_id: i32,
    #[sea_orm(belongs_to, from = "breed_id", to = "id", on_delete = "Restrict")]
    pub breed: HasOne<super::breed::Entity>,

    #[sea_orm(has_many)]
    pub vaccinations: HasMany<super::vaccination::Entity>,

    #[sea_orm(has_many, via = "dog_caretaker")]
    pub caretakers: HasMany<super::caretaker::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}
