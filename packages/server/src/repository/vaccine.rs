use common::PageWindow;
use sea_orm::*;

use crate::entity::{vaccination, vaccine};
use crate::error::AppError;
use crate::models::shared::RowOption;

use super::icontains;

pub async fn find<C: ConnectionTrait>(db: &C, id: i32) -> Result<vaccine::Model, AppError> {
    vaccine::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Vaccine {id} not found")))
}

fn ordered(select: Select<vaccine::Entity>) -> Select<vaccine::Entity> {
    select
        .order_by_asc(vaccine::Column::Name)
        .order_by_asc(vaccine::Column::Id)
}

/// Every vaccine by name.
pub async fn list<C: ConnectionTrait>(db: &C) -> Result<Vec<vaccine::Model>, AppError> {
    Ok(ordered(vaccine::Entity::find()).all(db).await?)
}

pub async fn options<C: ConnectionTrait>(db: &C) -> Result<Vec<RowOption>, AppError> {
    Ok(list(db)
        .await?
        .into_iter()
        .map(|v| RowOption {
            id: v.id,
            name: v.name,
        })
        .collect())
}

pub async fn create(db: &DatabaseConnection, name: String) -> Result<vaccine::Model, AppError> {
    let txn = db.begin().await?;
    let model = vaccine::ActiveModel {
        name: Set(name),
        ..Default::default()
    }
    .insert(&txn)
    .await?;
    txn.commit().await?;
    Ok(model)
}

pub async fn update(
    db: &DatabaseConnection,
    id: i32,
    name: String,
) -> Result<vaccine::Model, AppError> {
    let txn = db.begin().await?;
    let mut active: vaccine::ActiveModel = find(&txn, id).await?.into();
    active.name = Set(name);
    let model = active.update(&txn).await?;
    txn.commit().await?;
    Ok(model)
}

/// Delete a vaccine together with every vaccination that used it.
pub async fn delete(db: &DatabaseConnection, id: i32) -> Result<(), AppError> {
    let txn = db.begin().await?;
    find(&txn, id).await?;

    vaccination::Entity::delete_many()
        .filter(vaccination::Column::VaccineId.eq(id))
        .exec(&txn)
        .await?;
    vaccine::Entity::delete_by_id(id).exec(&txn).await?;

    txn.commit().await?;
    Ok(())
}

/// Console list with a name search.
pub async fn admin_list<C: ConnectionTrait>(
    db: &C,
    q: Option<&str>,
    per_page: u64,
    page: Option<u64>,
) -> Result<(Vec<vaccine::Model>, PageWindow), AppError> {
    let mut select = vaccine::Entity::find();
    if let Some(term) = q {
        select = select.filter(icontains(db.get_database_backend(), vaccine::Column::Name, term));
    }
    let total = select.clone().count(db).await?;
    let window = PageWindow::new(total, per_page, page);
    if window.is_empty() {
        return Ok((Vec::new(), window));
    }
    let rows = ordered(select)
        .offset(Some(window.offset()))
        .limit(Some(per_page))
        .all(db)
        .await?;
    Ok((rows, window))
}
