use common::{ExpertLevel, PageWindow};
use sea_orm::prelude::Expr;
use sea_orm::sea_query::Func;
use sea_orm::*;

use crate::entity::{caretaker, dog, dog_caretaker};
use crate::error::AppError;
use crate::models::caretaker::{
    CaretakerDetailResponse, CaretakerDogItem, CaretakerInput, USERNAME_TAKEN,
};
use crate::models::form::{FormErrors, REQUIRED};
use crate::utils::hash;

use super::{icontains, unique_violation};

pub async fn find<C: ConnectionTrait>(db: &C, id: i32) -> Result<caretaker::Model, AppError> {
    caretaker::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Caretaker {id} not found")))
}

pub async fn find_by_username<C: ConnectionTrait>(
    db: &C,
    username: &str,
) -> Result<Option<caretaker::Model>, AppError> {
    Ok(caretaker::Entity::find()
        .filter(caretaker::Column::Username.eq(username))
        .one(db)
        .await?)
}

async fn page_of<C: ConnectionTrait>(
    db: &C,
    select: Select<caretaker::Entity>,
    per_page: u64,
    page: Option<u64>,
) -> Result<(Vec<caretaker::Model>, PageWindow), AppError> {
    let total = select.clone().count(db).await?;
    let window = PageWindow::new(total, per_page, page);
    if window.is_empty() {
        return Ok((Vec::new(), window));
    }
    let rows = select
        .order_by_asc(caretaker::Column::Username)
        .order_by_asc(caretaker::Column::Id)
        .offset(Some(window.offset()))
        .limit(Some(per_page))
        .all(db)
        .await?;
    Ok((rows, window))
}

/// One page of caretakers by username.
pub async fn list<C: ConnectionTrait>(
    db: &C,
    username: Option<&str>,
    per_page: u64,
    page: Option<u64>,
) -> Result<(Vec<caretaker::Model>, PageWindow), AppError> {
    let mut select = caretaker::Entity::find();
    if let Some(term) = username {
        select = select.filter(icontains(
            db.get_database_backend(),
            caretaker::Column::Username,
            term,
        ));
    }
    page_of(db, select, per_page, page).await
}

pub async fn detail<C: ConnectionTrait>(
    db: &C,
    id: i32,
) -> Result<CaretakerDetailResponse, AppError> {
    let caretaker = find(db, id).await?;
    let dog_ids: Vec<i32> = dog_caretaker::Entity::find()
        .select_only()
        .column(dog_caretaker::Column::DogId)
        .filter(dog_caretaker::Column::CaretakerId.eq(id))
        .into_tuple()
        .all(db)
        .await?;
    let dogs = dog::Entity::find()
        .filter(dog::Column::Id.is_in(dog_ids))
        .order_by_asc(dog::Column::DateRegistered)
        .order_by_asc(dog::Column::Id)
        .all(db)
        .await?;

    Ok(CaretakerDetailResponse {
        caretaker: caretaker.into(),
        dogs: dogs.into_iter().map(CaretakerDogItem::from).collect(),
    })
}

/// Usernames compare case-insensitively for uniqueness.
async fn ensure_username_free<C: ConnectionTrait>(
    db: &C,
    username: &str,
    except: Option<i32>,
) -> Result<(), AppError> {
    let mut select = caretaker::Entity::find().filter(
        Expr::expr(Func::lower(Expr::col(caretaker::Column::Username)))
            .eq(username.to_lowercase()),
    );
    if let Some(id) = except {
        select = select.filter(caretaker::Column::Id.ne(id));
    }
    if select.count(db).await? > 0 {
        return Err(FormErrors::single("username", USERNAME_TAKEN));
    }
    Ok(())
}

fn hashed(password: &str) -> Result<String, AppError> {
    hash::hash_password(password)
        .map_err(|e| AppError::Internal(format!("Password hash error: {}", e)))
}

/// Register a caretaker. The input must carry a password.
pub async fn create(
    db: &DatabaseConnection,
    input: CaretakerInput,
) -> Result<caretaker::Model, AppError> {
    let password = input
        .password
        .as_deref()
        .ok_or_else(|| FormErrors::single("password1", REQUIRED))?;
    let password = hashed(password)?;

    let txn = db.begin().await?;
    ensure_username_free(&txn, &input.username, None).await?;

    let model = caretaker::ActiveModel {
        username: Set(input.username),
        first_name: Set(input.first_name),
        last_name: Set(input.last_name),
        email: Set(input.email),
        password: Set(password),
        expert_level: Set(input.expert_level),
        is_staff: Set(false),
        is_superuser: Set(false),
        is_active: Set(true),
        date_joined: Set(chrono::Utc::now()),
        last_login: Set(None),
        ..Default::default()
    }
    .insert(&txn)
    .await
    .map_err(|e| unique_violation(e, "username", USERNAME_TAKEN))?;

    txn.commit().await?;
    Ok(model)
}

/// Account flags only the console may change.
#[derive(Debug, Default, Clone, Copy)]
pub struct AccountFlags {
    pub is_staff: Option<bool>,
    pub is_superuser: Option<bool>,
    pub is_active: Option<bool>,
}

/// Update the profile, the password when one is given, and any flags.
pub async fn update(
    db: &DatabaseConnection,
    id: i32,
    input: CaretakerInput,
    flags: AccountFlags,
) -> Result<caretaker::Model, AppError> {
    let password = input.password.as_deref().map(hashed).transpose()?;

    let txn = db.begin().await?;
    let existing = find(&txn, id).await?;
    ensure_username_free(&txn, &input.username, Some(id)).await?;

    let mut active: caretaker::ActiveModel = existing.into();
    active.username = Set(input.username);
    active.first_name = Set(input.first_name);
    active.last_name = Set(input.last_name);
    active.email = Set(input.email);
    active.expert_level = Set(input.expert_level);
    if let Some(password) = password {
        active.password = Set(password);
    }
    if let Some(is_staff) = flags.is_staff {
        active.is_staff = Set(is_staff);
    }
    if let Some(is_superuser) = flags.is_superuser {
        active.is_superuser = Set(is_superuser);
    }
    if let Some(is_active) = flags.is_active {
        active.is_active = Set(is_active);
    }
    let model = active
        .update(&txn)
        .await
        .map_err(|e| unique_violation(e, "username", USERNAME_TAKEN))?;

    txn.commit().await?;
    Ok(model)
}

/// Delete a caretaker and their dog assignments. The dogs stay.
pub async fn delete(db: &DatabaseConnection, id: i32) -> Result<(), AppError> {
    let txn = db.begin().await?;
    find(&txn, id).await?;

    dog_caretaker::Entity::delete_many()
        .filter(dog_caretaker::Column::CaretakerId.eq(id))
        .exec(&txn)
        .await?;
    caretaker::Entity::delete_by_id(id).exec(&txn).await?;

    txn.commit().await?;
    Ok(())
}

pub async fn record_login<C: ConnectionTrait>(db: &C, id: i32) -> Result<(), AppError> {
    caretaker::Entity::update_many()
        .col_expr(
            caretaker::Column::LastLogin,
            Expr::value(Some(chrono::Utc::now())),
        )
        .filter(caretaker::Column::Id.eq(id))
        .exec(db)
        .await?;
    Ok(())
}

/// Create a superuser unless the username is already taken.
///
/// Returns whether an account was created.
pub async fn ensure_superuser(
    db: &DatabaseConnection,
    username: &str,
    password: &str,
) -> Result<bool, AppError> {
    if find_by_username(db, username).await?.is_some() {
        return Ok(false);
    }
    caretaker::ActiveModel {
        username: Set(username.to_string()),
        first_name: Set(String::new()),
        last_name: Set(String::new()),
        email: Set(String::new()),
        password: Set(hashed(password)?),
        expert_level: Set(ExpertLevel::default()),
        is_staff: Set(true),
        is_superuser: Set(true),
        is_active: Set(true),
        date_joined: Set(chrono::Utc::now()),
        last_login: Set(None),
        ..Default::default()
    }
    .insert(db)
    .await?;
    Ok(true)
}

/// Console list: search on username, names and email.
pub async fn admin_list<C: ConnectionTrait>(
    db: &C,
    q: Option<&str>,
    per_page: u64,
    page: Option<u64>,
) -> Result<(Vec<caretaker::Model>, PageWindow), AppError> {
    let mut select = caretaker::Entity::find();
    if let Some(term) = q {
        let backend = db.get_database_backend();
        select = select.filter(
            Condition::any()
                .add(icontains(backend, caretaker::Column::Username, term))
                .add(icontains(backend, caretaker::Column::FirstName, term))
                .add(icontains(backend, caretaker::Column::LastName, term))
                .add(icontains(backend, caretaker::Column::Email, term)),
        );
    }
    page_of(db, select, per_page, page).await
}
