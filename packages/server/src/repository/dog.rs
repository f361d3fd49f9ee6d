use std::collections::HashMap;

use chrono::NaiveDate;
use common::PageWindow;
use sea_orm::sea_query::Query as SeaQuery;
use sea_orm::*;

use crate::entity::{breed, caretaker, dog, dog_caretaker, vaccination, vaccine};
use crate::error::AppError;
use crate::models::dog::{
    CaretakerOption, DogCaretakerItem, DogDetailResponse, DogInput, DogListItem,
    DogVaccinationItem,
};
use crate::models::form::{FormErrors, INVALID_REFERENCE};
use crate::models::shared::RowOption;

use super::icontains;

pub async fn find<C: ConnectionTrait>(db: &C, id: i32) -> Result<dog::Model, AppError> {
    dog::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Dog {id} not found")))
}

async fn page_of<C: ConnectionTrait>(
    db: &C,
    select: Select<dog::Entity>,
    per_page: u64,
    page: Option<u64>,
) -> Result<(Vec<DogListItem>, PageWindow), AppError> {
    let total = select.clone().count(db).await?;
    let window = PageWindow::new(total, per_page, page);
    if window.is_empty() {
        return Ok((Vec::new(), window));
    }
    let rows = select
        .order_by_asc(dog::Column::DateRegistered)
        .order_by_asc(dog::Column::Id)
        .offset(Some(window.offset()))
        .limit(Some(per_page))
        .all(db)
        .await?;
    Ok((with_breed_names(db, rows).await?, window))
}

async fn with_breed_names<C: ConnectionTrait>(
    db: &C,
    rows: Vec<dog::Model>,
) -> Result<Vec<DogListItem>, AppError> {
    let mut breed_ids: Vec<i32> = rows.iter().map(|d| d.breed_id).collect();
    breed_ids.sort_unstable();
    breed_ids.dedup();

    let names: HashMap<i32, String> = breed::Entity::find()
        .filter(breed::Column::Id.is_in(breed_ids))
        .all(db)
        .await?
        .into_iter()
        .map(|b| (b.id, b.name))
        .collect();

    Ok(rows
        .into_iter()
        .map(|d| {
            let breed_name = names.get(&d.breed_id).cloned().unwrap_or_default();
            DogListItem::new(d, breed_name)
        })
        .collect())
}

/// One page of dogs by registration date, each with its breed name.
pub async fn list<C: ConnectionTrait>(
    db: &C,
    name: Option<&str>,
    per_page: u64,
    page: Option<u64>,
) -> Result<(Vec<DogListItem>, PageWindow), AppError> {
    let mut select = dog::Entity::find();
    if let Some(term) = name {
        select = select.filter(icontains(db.get_database_backend(), dog::Column::Name, term));
    }
    page_of(db, select, per_page, page).await
}

/// Ids of the caretakers assigned to a dog, ascending.
pub async fn caretaker_ids<C: ConnectionTrait>(db: &C, dog_id: i32) -> Result<Vec<i32>, AppError> {
    Ok(dog_caretaker::Entity::find()
        .select_only()
        .column(dog_caretaker::Column::CaretakerId)
        .filter(dog_caretaker::Column::DogId.eq(dog_id))
        .order_by_asc(dog_caretaker::Column::CaretakerId)
        .into_tuple()
        .all(db)
        .await?)
}

pub async fn detail<C: ConnectionTrait>(db: &C, id: i32) -> Result<DogDetailResponse, AppError> {
    let dog = find(db, id).await?;
    let breed = super::breed::find(db, dog.breed_id).await?;

    let caretakers = caretaker::Entity::find()
        .filter(caretaker::Column::Id.is_in(caretaker_ids(db, id).await?))
        .order_by_asc(caretaker::Column::Username)
        .all(db)
        .await?
        .into_iter()
        .map(|c| DogCaretakerItem {
            id: c.id,
            username: c.username,
            first_name: c.first_name,
            last_name: c.last_name,
        })
        .collect();

    let vaccinations = vaccination::Entity::find()
        .filter(vaccination::Column::DogId.eq(id))
        .order_by_asc(vaccination::Column::VaccinationDate)
        .order_by_asc(vaccination::Column::Id)
        .all(db)
        .await?;
    let vaccine_names: HashMap<i32, String> = vaccine::Entity::find()
        .filter(vaccine::Column::Id.is_in(vaccinations.iter().map(|v| v.vaccine_id)))
        .all(db)
        .await?
        .into_iter()
        .map(|v| (v.id, v.name))
        .collect();

    Ok(DogDetailResponse {
        id: dog.id,
        name: dog.name,
        age: dog.age,
        date_registered: dog.date_registered,
        sterilized: dog.sterilized,
        gender: dog.gender,
        breed: RowOption {
            id: breed.id,
            name: breed.name,
        },
        caretakers,
        vaccinations: vaccinations
            .into_iter()
            .map(|v| DogVaccinationItem {
                id: v.id,
                vaccine_id: v.vaccine_id,
                vaccine_name: vaccine_names.get(&v.vaccine_id).cloned().unwrap_or_default(),
                vaccination_date: v.vaccination_date,
            })
            .collect(),
    })
}

/// Check that the breed and every caretaker exist.
async fn check_references<C: ConnectionTrait>(db: &C, input: &DogInput) -> Result<(), AppError> {
    let mut errors = FormErrors::new();

    if breed::Entity::find_by_id(input.breed_id).one(db).await?.is_none() {
        errors.add("breed", INVALID_REFERENCE);
    }

    if !input.caretakers.is_empty() {
        let known: Vec<i32> = caretaker::Entity::find()
            .select_only()
            .column(caretaker::Column::Id)
            .filter(caretaker::Column::Id.is_in(input.caretakers.clone()))
            .into_tuple()
            .all(db)
            .await?;
        for id in input.caretakers.iter().filter(|id| !known.contains(id)) {
            errors.add(
                "caretakers",
                format!("Select a valid choice. {id} is not one of the available choices."),
            );
        }
    }

    errors.finish(|| ())
}

/// Replace a dog's caretaker assignments.
async fn set_caretakers<C: ConnectionTrait>(
    db: &C,
    dog_id: i32,
    caretakers: &[i32],
) -> Result<(), AppError> {
    dog_caretaker::Entity::delete_many()
        .filter(dog_caretaker::Column::DogId.eq(dog_id))
        .exec(db)
        .await?;
    for &caretaker_id in caretakers {
        dog_caretaker::Entity::insert(dog_caretaker::ActiveModel {
            dog_id: Set(dog_id),
            caretaker_id: Set(caretaker_id),
            ..Default::default()
        })
        .exec_without_returning(db)
        .await?;
    }
    Ok(())
}

fn apply(active: &mut dog::ActiveModel, input: &DogInput) {
    active.name = Set(input.name.clone());
    active.age = Set(input.age.clone());
    active.date_registered = Set(input.date_registered);
    active.sterilized = Set(input.sterilized);
    active.gender = Set(input.gender);
    active.breed_id = Set(input.breed_id);
}

pub async fn create(db: &DatabaseConnection, input: DogInput) -> Result<dog::Model, AppError> {
    let txn = db.begin().await?;
    check_references(&txn, &input).await?;

    let mut active = <dog::ActiveModel as Default>::default();
    apply(&mut active, &input);
    let model = active.insert(&txn).await?;
    set_caretakers(&txn, model.id, &input.caretakers).await?;

    txn.commit().await?;
    Ok(model)
}

pub async fn update(
    db: &DatabaseConnection,
    id: i32,
    input: DogInput,
) -> Result<dog::Model, AppError> {
    let txn = db.begin().await?;
    let existing = find(&txn, id).await?;
    check_references(&txn, &input).await?;

    let mut active: dog::ActiveModel = existing.into();
    apply(&mut active, &input);
    let model = active.update(&txn).await?;
    set_caretakers(&txn, id, &input.caretakers).await?;

    txn.commit().await?;
    Ok(model)
}

/// Delete a dog with its vaccinations and caretaker assignments.
pub async fn delete(db: &DatabaseConnection, id: i32) -> Result<(), AppError> {
    let txn = db.begin().await?;
    find(&txn, id).await?;

    vaccination::Entity::delete_many()
        .filter(vaccination::Column::DogId.eq(id))
        .exec(&txn)
        .await?;
    dog_caretaker::Entity::delete_many()
        .filter(dog_caretaker::Column::DogId.eq(id))
        .exec(&txn)
        .await?;
    dog::Entity::delete_by_id(id).exec(&txn).await?;

    txn.commit().await?;
    Ok(())
}

/// Registration-date filters of the console dog list.
#[derive(Debug, Default, Clone, Copy)]
pub struct RegisteredFilter {
    pub on: Option<NaiveDate>,
    pub after: Option<NaiveDate>,
    pub before: Option<NaiveDate>,
}

/// Console list: date filters, and a search on the dog or breed name.
pub async fn admin_list<C: ConnectionTrait>(
    db: &C,
    q: Option<&str>,
    registered: RegisteredFilter,
    per_page: u64,
    page: Option<u64>,
) -> Result<(Vec<DogListItem>, PageWindow), AppError> {
    let mut select = dog::Entity::find();
    if let Some(day) = registered.on {
        select = select.filter(dog::Column::DateRegistered.eq(day));
    }
    if let Some(day) = registered.after {
        select = select.filter(dog::Column::DateRegistered.gte(day));
    }
    if let Some(day) = registered.before {
        select = select.filter(dog::Column::DateRegistered.lte(day));
    }
    if let Some(term) = q {
        let backend = db.get_database_backend();
        select = select.filter(
            Condition::any().add(icontains(backend, dog::Column::Name, term)).add(
                dog::Column::BreedId.in_subquery(
                    SeaQuery::select()
                        .column(breed::Column::Id)
                        .from(breed::Entity)
                        .cond_where(icontains(backend, breed::Column::Name, term))
                        .to_owned(),
                ),
            ),
        );
    }
    page_of(db, select, per_page, page).await
}

/// Every caretaker as an option of the dog form, by username.
pub async fn caretaker_options<C: ConnectionTrait>(db: &C) -> Result<Vec<CaretakerOption>, AppError> {
    Ok(caretaker::Entity::find()
        .order_by_asc(caretaker::Column::Username)
        .order_by_asc(caretaker::Column::Id)
        .all(db)
        .await?
        .into_iter()
        .map(|c| CaretakerOption {
            id: c.id,
            username: c.username,
        })
        .collect())
}
