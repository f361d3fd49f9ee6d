use common::ExpertLevel;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "caretaker")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(unique)]
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    /// Argon2 hash in PHC string format.
    #[serde(skip_serializing)]
    pub password: String,
    pub expert_level: ExpertLevel,

    /// May use the admin console.
    #[sea_orm(default_value = false)]
    pub is_staff: bool,
    #[sea_orm(default_value = false)]
    pub is_superuser: bool,
    /// Inactive accounts cannot log in.
    #[sea_orm(default_value = true)]
    pub is_active: bool,

    #[sea_orm(has_many, via = "dog_caretaker")]
    pub dogs: HasMany<super::dog::Entity>,

    pub date_joined: DateTimeUtc,
    pub last_login: Option<DateTimeUtc>,
}

impl ActiveModelBehavior for ActiveModel {}
