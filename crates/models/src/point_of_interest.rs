use sea_orm::{
    entity::prelude::*, sea_query::ForeignKeyAction, ConnectionTrait, QueryOrder, Set, SqlErr, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{city, errors};

pub const NAME_MAX_LEN: usize = 50;
pub const DESCRIPTION_MAX_LEN: usize = 200;

/// How often [`insert_next`] re-reads the highest id after losing a race.
pub const INSERT_ATTEMPTS: usize = 5;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "point_of_interest")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i32,
    pub city_id: i32,
    pub name: String,
    pub description: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { City }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::City => Entity::belongs_to(city::Entity)
                .from(Column::CityId)
                .to(city::Column::Id)
                .on_delete(ForeignKeyAction::Cascade)
                .into(),
        }
    }
}

impl Related<city::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::City.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Column limits mirrored from the migration.
pub fn validate_columns(name: &str, description: Option<&str>) -> Result<(), errors::ModelError> {
    if name.trim().is_empty() {
        return Err(errors::ModelError::Validation("name required".into()));
    }
    if name.chars().count() > NAME_MAX_LEN {
        return Err(errors::ModelError::Validation(format!("name longer than {NAME_MAX_LEN} characters")));
    }
    if description.is_some_and(|d| d.chars().count() > DESCRIPTION_MAX_LEN) {
        return Err(errors::ModelError::Validation(format!(
            "description longer than {DESCRIPTION_MAX_LEN} characters"
        )));
    }
    Ok(())
}

pub async fn list_for_city<C: ConnectionTrait>(conn: &C, city_id: i32) -> Result<Vec<Model>, errors::ModelError> {
    Ok(Entity::find()
        .filter(Column::CityId.eq(city_id))
        .order_by_asc(Column::Id)
        .all(conn)
        .await?)
}

pub async fn find_for_city<C: ConnectionTrait>(
    conn: &C,
    city_id: i32,
    id: i32,
) -> Result<Option<Model>, errors::ModelError> {
    Ok(Entity::find()
        .filter(Column::CityId.eq(city_id))
        .filter(Column::Id.eq(id))
        .one(conn)
        .await?)
}

/// Next identifier: one above the highest id across all cities.
pub async fn next_id<C: ConnectionTrait>(conn: &C) -> Result<i32, errors::ModelError> {
    let highest = Entity::find().order_by_desc(Column::Id).one(conn).await?;
    match highest {
        None => Ok(1),
        Some(m) => m
            .id
            .checked_add(1)
            .ok_or_else(|| errors::ModelError::Db("point of interest id space exhausted".into())),
    }
}

fn is_unique_violation(e: &DbErr) -> bool {
    matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

/// Insert under the next free id.
///
/// Each attempt runs in a savepoint. A concurrent transaction that committed
/// the same id makes the insert fail on the primary key; the savepoint is
/// rolled back and the id is read again.
pub async fn insert_next<C: ConnectionTrait + TransactionTrait>(
    conn: &C,
    city_id: i32,
    name: &str,
    description: Option<&str>,
) -> Result<Model, errors::ModelError> {
    validate_columns(name, description)?;
    for attempt in 1..=INSERT_ATTEMPTS {
        let savepoint = conn.begin().await?;
        let id = next_id(&savepoint).await?;
        let am = ActiveModel {
            id: Set(id),
            city_id: Set(city_id),
            name: Set(name.to_string()),
            description: Set(description.map(str::to_string)),
        };
        match am.insert(&savepoint).await {
            Ok(model) => {
                savepoint.commit().await?;
                return Ok(model);
            }
            Err(e) if is_unique_violation(&e) => {
                savepoint.rollback().await?;
                warn!(attempt, id, "point of interest id taken, retrying");
            }
            Err(e) => return Err(e.into()),
        }
    }
    Err(errors::ModelError::Db(format!(
        "no free point of interest id after {INSERT_ATTEMPTS} attempts"
    )))
}

pub async fn insert<C: ConnectionTrait>(
    conn: &C,
    id: i32,
    city_id: i32,
    name: &str,
    description: Option<&str>,
) -> Result<Model, errors::ModelError> {
    validate_columns(name, description)?;
    let am = ActiveModel {
        id: Set(id),
        city_id: Set(city_id),
        name: Set(name.to_string()),
        description: Set(description.map(str::to_string)),
    };
    Ok(am.insert(conn).await?)
}

/// Overwrite name and description of an existing row.
pub async fn update_fields<C: ConnectionTrait>(
    conn: &C,
    existing: Model,
    name: &str,
    description: Option<&str>,
) -> Result<Model, errors::ModelError> {
    validate_columns(name, description)?;
    let mut am: ActiveModel = existing.into();
    am.name = Set(name.to_string());
    am.description = Set(description.map(str::to_string));
    Ok(am.update(conn).await?)
}

/// Delete by id; returns whether a row was removed.
pub async fn delete<C: ConnectionTrait>(conn: &C, id: i32) -> Result<bool, errors::ModelError> {
    let res = Entity::delete_by_id(id).exec(conn).await?;
    Ok(res.rows_affected > 0)
}
