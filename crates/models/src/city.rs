use sea_orm::{entity::prelude::*, ConnectionTrait, PaginatorTrait, QueryOrder};
use serde::{Deserialize, Serialize};

use crate::{errors, point_of_interest};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "city")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { PointOfInterest }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::PointOfInterest => Entity::has_many(point_of_interest::Entity).into(),
        }
    }
}

impl Related<point_of_interest::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PointOfInterest.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// All cities ordered by name.
pub async fn list_ordered<C: ConnectionTrait>(conn: &C) -> Result<Vec<Model>, errors::ModelError> {
    Ok(Entity::find().order_by_asc(Column::Name).all(conn).await?)
}

pub async fn find<C: ConnectionTrait>(conn: &C, id: i32) -> Result<Option<Model>, errors::ModelError> {
    Ok(Entity::find_by_id(id).one(conn).await?)
}

/// A city together with its points of interest ordered by id.
pub async fn find_with_points<C: ConnectionTrait>(
    conn: &C,
    id: i32,
) -> Result<Option<(Model, Vec<point_of_interest::Model>)>, errors::ModelError> {
    let Some(city) = find(conn, id).await? else { return Ok(None) };
    let points = city
        .find_related(point_of_interest::Entity)
        .order_by_asc(point_of_interest::Column::Id)
        .all(conn)
        .await?;
    Ok(Some((city, points)))
}

pub async fn exists<C: ConnectionTrait>(conn: &C, id: i32) -> Result<bool, errors::ModelError> {
    let count = Entity::find_by_id(id).count(conn).await?;
    Ok(count > 0)
}
