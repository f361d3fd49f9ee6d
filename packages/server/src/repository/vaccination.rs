use std::collections::HashMap;

use chrono::NaiveDate;
use common::PageWindow;
use sea_orm::sea_query::Query as SeaQuery;
use sea_orm::*;

use crate::entity::{dog, vaccination, vaccine};
use crate::error::AppError;
use crate::models::admin::AdminVaccinationRow;
use crate::models::form::{FormErrors, INVALID_REFERENCE};
use crate::models::vaccination::VaccinationInput;

use super::icontains;

/// A vaccination that must belong to `dog_id`.
pub async fn find_for_dog<C: ConnectionTrait>(
    db: &C,
    dog_id: i32,
    id: i32,
) -> Result<vaccination::Model, AppError> {
    vaccination::Entity::find_by_id(id)
        .filter(vaccination::Column::DogId.eq(dog_id))
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Vaccination {id} of dog {dog_id} not found")))
}

pub async fn find<C: ConnectionTrait>(db: &C, id: i32) -> Result<vaccination::Model, AppError> {
    vaccination::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Vaccination {id} not found")))
}

async fn check_vaccine<C: ConnectionTrait>(
    db: &C,
    errors: &mut FormErrors,
    vaccine_id: i32,
) -> Result<(), AppError> {
    if vaccine::Entity::find_by_id(vaccine_id).one(db).await?.is_none() {
        errors.add("vaccine", INVALID_REFERENCE);
    }
    Ok(())
}

/// Record a vaccination of `dog_id`. An unknown dog is a 404.
pub async fn create(
    db: &DatabaseConnection,
    dog_id: i32,
    input: VaccinationInput,
) -> Result<vaccination::Model, AppError> {
    let txn = db.begin().await?;
    super::dog::find(&txn, dog_id).await?;

    let mut errors = FormErrors::new();
    check_vaccine(&txn, &mut errors, input.vaccine_id).await?;
    errors.finish(|| ())?;

    let model = vaccination::ActiveModel {
        dog_id: Set(dog_id),
        vaccine_id: Set(input.vaccine_id),
        vaccination_date: Set(input.vaccination_date),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;
    Ok(model)
}

/// Rewrite a vaccination, possibly moving it to another dog.
///
/// A dog that does not exist is reported on the `dog` field.
pub async fn update(
    db: &DatabaseConnection,
    id: i32,
    dog_id: i32,
    input: VaccinationInput,
) -> Result<vaccination::Model, AppError> {
    let txn = db.begin().await?;
    let existing = find(&txn, id).await?;

    let mut errors = FormErrors::new();
    check_vaccine(&txn, &mut errors, input.vaccine_id).await?;
    if dog_id != existing.dog_id && dog::Entity::find_by_id(dog_id).one(&txn).await?.is_none() {
        errors.add("dog", INVALID_REFERENCE);
    }
    errors.finish(|| ())?;

    let mut active: vaccination::ActiveModel = existing.into();
    active.dog_id = Set(dog_id);
    active.vaccine_id = Set(input.vaccine_id);
    active.vaccination_date = Set(input.vaccination_date);
    let model = active.update(&txn).await?;

    txn.commit().await?;
    Ok(model)
}

/// Delete a vaccination; with `dog_id`, only when it belongs to that dog.
pub async fn delete(db: &DatabaseConnection, id: i32, dog_id: Option<i32>) -> Result<(), AppError> {
    let txn = db.begin().await?;
    match dog_id {
        Some(dog_id) => find_for_dog(&txn, dog_id, id).await?,
        None => find(&txn, id).await?,
    };
    vaccination::Entity::delete_by_id(id).exec(&txn).await?;
    txn.commit().await?;
    Ok(())
}

/// Vaccination-date filters of the console list.
#[derive(Debug, Default, Clone, Copy)]
pub struct VaccinatedFilter {
    pub on: Option<NaiveDate>,
    pub after: Option<NaiveDate>,
    pub before: Option<NaiveDate>,
}

/// Console list by vaccination date, with the vaccine and dog names.
pub async fn admin_list<C: ConnectionTrait>(
    db: &C,
    q: Option<&str>,
    vaccinated: VaccinatedFilter,
    per_page: u64,
    page: Option<u64>,
) -> Result<(Vec<AdminVaccinationRow>, PageWindow), AppError> {
    let mut select = vaccination::Entity::find();
    if let Some(day) = vaccinated.on {
        select = select.filter(vaccination::Column::VaccinationDate.eq(day));
    }
    if let Some(day) = vaccinated.after {
        select = select.filter(vaccination::Column::VaccinationDate.gte(day));
    }
    if let Some(day) = vaccinated.before {
        select = select.filter(vaccination::Column::VaccinationDate.lte(day));
    }
    if let Some(term) = q {
        select = select.filter(
            vaccination::Column::VaccineId.in_subquery(
                SeaQuery::select()
                    .column(vaccine::Column::Id)
                    .from(vaccine::Entity)
                    .cond_where(icontains(db.get_database_backend(), vaccine::Column::Name, term))
                    .to_owned(),
            ),
        );
    }

    let total = select.clone().count(db).await?;
    let window = PageWindow::new(total, per_page, page);
    if window.is_empty() {
        return Ok((Vec::new(), window));
    }
    let rows = select
        .order_by_asc(vaccination::Column::VaccinationDate)
        .order_by_asc(vaccination::Column::Id)
        .offset(Some(window.offset()))
        .limit(Some(per_page))
        .all(db)
        .await?;

    let vaccine_names: HashMap<i32, String> = vaccine::Entity::find()
        .filter(vaccine::Column::Id.is_in(rows.iter().map(|v| v.vaccine_id)))
        .all(db)
        .await?
        .into_iter()
        .map(|v| (v.id, v.name))
        .collect();
    let dog_names: HashMap<i32, String> = dog::Entity::find()
        .filter(dog::Column::Id.is_in(rows.iter().map(|v| v.dog_id)))
        .all(db)
        .await?
        .into_iter()
        .map(|d| (d.id, d.name))
        .collect();

    let data = rows
        .into_iter()
        .map(|v| AdminVaccinationRow {
            id: v.id,
            vaccination_date: v.vaccination_date,
            vaccine_name: vaccine_names.get(&v.vaccine_id).cloned().unwrap_or_default(),
            vaccine_id: v.vaccine_id,
            dog_name: dog_names.get(&v.dog_id).cloned().unwrap_or_default(),
            dog_id: v.dog_id,
        })
        .collect();
    Ok((data, window))
}
