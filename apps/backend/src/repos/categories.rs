use std::collections::HashMap;

use sea_orm::ConnectionTrait;

use crate::adapters::categories_sea;
use crate::errors::domain::DomainError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub description: String,
}

pub async fn list<C: ConnectionTrait + Send + Sync>(conn: &C) -> Result<Vec<Category>, DomainError> {
    let rows = categories_sea::list_categories(conn).await?;
    Ok(rows.into_iter().map(Category::from).collect())
}

/// Categories by name, each with its number of events.
pub async fn list_with_event_counts<C: ConnectionTrait + Send + Sync>(
    conn: &C,
) -> Result<Vec<(Category, i64)>, DomainError> {
    let counts = categories_sea::event_counts(conn).await?;
    let rows = categories_sea::list_categories(conn).await?;
    Ok(rows
        .into_iter()
        .map(|row| {
            let n = counts.get(&row.id).copied().unwrap_or(0);
            (Category::from(row), n)
        })
        .collect())
}

pub async fn find<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
) -> Result<Option<Category>, DomainError> {
    Ok(categories_sea::find_by_id(conn, id).await?.map(Category::from))
}

pub async fn find_many<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    ids: Vec<i64>,
) -> Result<HashMap<i64, Category>, DomainError> {
    let rows = categories_sea::find_by_ids(conn, ids).await?;
    Ok(rows.into_iter().map(|r| (r.id, Category::from(r))).collect())
}

pub async fn create<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    name: String,
    description: String,
) -> Result<Category, DomainError> {
    Ok(categories_sea::create(conn, name, description).await?.into())
}

pub async fn update<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
    name: String,
    description: String,
) -> Result<Category, DomainError> {
    Ok(categories_sea::update(conn, id, name, description).await?.into())
}

pub async fn delete<C: ConnectionTrait + Send + Sync>(conn: &C, id: i64) -> Result<bool, DomainError> {
    Ok(categories_sea::delete(conn, id).await? > 0)
}

impl From<crate::entities::categories::Model> for Category {
    fn from(model: crate::entities::categories::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            description: model.description,
        }
    }
}
