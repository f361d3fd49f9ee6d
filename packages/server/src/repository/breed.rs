use std::collections::HashMap;

use common::{DogSize, PageWindow};
use sea_orm::*;

use crate::entity::{breed, dog};
use crate::error::AppError;
use crate::models::breed::{BreedDetailResponse, BreedDogItem, BreedInput, BreedListItem};
use crate::models::form::FormErrors;
use crate::models::shared::RowOption;

use super::{icontains, unique_violation};

pub const NAME_TAKEN: &str = "Breed with this Name already exists.";

pub async fn find<C: ConnectionTrait>(db: &C, id: i32) -> Result<breed::Model, AppError> {
    breed::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Breed {id} not found")))
}

fn ordered(select: Select<breed::Entity>) -> Select<breed::Entity> {
    select
        .order_by_asc(breed::Column::Name)
        .order_by_asc(breed::Column::Id)
}

async fn page_of<C: ConnectionTrait>(
    db: &C,
    select: Select<breed::Entity>,
    per_page: u64,
    page: Option<u64>,
) -> Result<(Vec<breed::Model>, PageWindow), AppError> {
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

/// One page of breeds by name, each with its number of dogs.
pub async fn list<C: ConnectionTrait>(
    db: &C,
    name: Option<&str>,
    per_page: u64,
    page: Option<u64>,
) -> Result<(Vec<BreedListItem>, PageWindow), AppError> {
    let mut select = breed::Entity::find();
    if let Some(term) = name {
        select = select.filter(icontains(db.get_database_backend(), breed::Column::Name, term));
    }
    let (rows, window) = page_of(db, select, per_page, page).await?;

    let ids: Vec<i32> = rows.iter().map(|b| b.id).collect();
    let mut counts: HashMap<i32, u64> = HashMap::new();
    if !ids.is_empty() {
        let breed_ids: Vec<i32> = dog::Entity::find()
            .select_only()
            .column(dog::Column::BreedId)
            .filter(dog::Column::BreedId.is_in(ids))
            .into_tuple()
            .all(db)
            .await?;
        for id in breed_ids {
            *counts.entry(id).or_default() += 1;
        }
    }

    let items = rows
        .into_iter()
        .map(|b| BreedListItem {
            num_dogs: counts.get(&b.id).copied().unwrap_or_default(),
            id: b.id,
            name: b.name,
            dog_size: b.dog_size,
        })
        .collect();
    Ok((items, window))
}

pub async fn detail<C: ConnectionTrait>(db: &C, id: i32) -> Result<BreedDetailResponse, AppError> {
    let breed = find(db, id).await?;
    let dogs = dog::Entity::find()
        .filter(dog::Column::BreedId.eq(id))
        .order_by_asc(dog::Column::DateRegistered)
        .order_by_asc(dog::Column::Id)
        .all(db)
        .await?;

    Ok(BreedDetailResponse {
        id: breed.id,
        name: breed.name,
        dog_size: breed.dog_size,
        dogs: dogs.into_iter().map(BreedDogItem::from).collect(),
    })
}

/// Every breed as a select option, by name.
pub async fn options<C: ConnectionTrait>(db: &C) -> Result<Vec<RowOption>, AppError> {
    let rows = ordered(breed::Entity::find()).all(db).await?;
    Ok(rows
        .into_iter()
        .map(|b| RowOption {
            id: b.id,
            name: b.name,
        })
        .collect())
}

async fn ensure_name_free<C: ConnectionTrait>(
    db: &C,
    name: &str,
    except: Option<i32>,
) -> Result<(), AppError> {
    let mut select = breed::Entity::find().filter(breed::Column::Name.eq(name));
    if let Some(id) = except {
        select = select.filter(breed::Column::Id.ne(id));
    }
    if select.count(db).await? > 0 {
        return Err(FormErrors::single("name", NAME_TAKEN));
    }
    Ok(())
}

pub async fn create(db: &DatabaseConnection, input: BreedInput) -> Result<breed::Model, AppError> {
    let txn = db.begin().await?;
    ensure_name_free(&txn, &input.name, None).await?;

    let model = breed::ActiveModel {
        name: Set(input.name),
        dog_size: Set(input.dog_size),
        ..Default::default()
    }
    .insert(&txn)
    .await
    .map_err(|e| unique_violation(e, "name", NAME_TAKEN))?;

    txn.commit().await?;
    Ok(model)
}

pub async fn update(
    db: &DatabaseConnection,
    id: i32,
    input: BreedInput,
) -> Result<breed::Model, AppError> {
    let txn = db.begin().await?;
    let existing = find(&txn, id).await?;
    ensure_name_free(&txn, &input.name, Some(id)).await?;

    let mut active: breed::ActiveModel = existing.into();
    active.name = Set(input.name);
    active.dog_size = Set(input.dog_size);
    let model = active
        .update(&txn)
        .await
        .map_err(|e| unique_violation(e, "name", NAME_TAKEN))?;

    txn.commit().await?;
    Ok(model)
}

/// Delete a breed. Refused while any dog still belongs to it.
pub async fn delete(db: &DatabaseConnection, id: i32) -> Result<(), AppError> {
    let txn = db.begin().await?;
    let existing = find(&txn, id).await?;

    let dogs = dog::Entity::find()
        .filter(dog::Column::BreedId.eq(id))
        .count(&txn)
        .await?;
    if dogs > 0 {
        return Err(AppError::Conflict(format!(
            "Cannot delete breed \"{}\": {} dog(s) still belong to it",
            existing.name, dogs
        )));
    }

    breed::Entity::delete_by_id(id).exec(&txn).await?;
    txn.commit().await?;
    Ok(())
}

/// Console list: optional size filter and name search.
pub async fn admin_list<C: ConnectionTrait>(
    db: &C,
    q: Option<&str>,
    dog_size: Option<DogSize>,
    per_page: u64,
    page: Option<u64>,
) -> Result<(Vec<breed::Model>, PageWindow), AppError> {
    let mut select = breed::Entity::find();
    if let Some(size) = dog_size {
        select = select.filter(breed::Column::DogSize.eq(size));
    }
    if let Some(term) = q {
        select = select.filter(icontains(db.get_database_backend(), breed::Column::Name, term));
    }
    page_of(db, select, per_page, page).await
}
