use sea_orm::ConnectionTrait;
use tracing::info;

use crate::domain::validation;
use crate::error::AppError;
use crate::errors::domain::{DomainError, NotFoundKind};
use crate::repos::categories::{self, Category};

fn not_found(id: i64) -> AppError {
    DomainError::not_found(NotFoundKind::Category, format!("Category {id} not found")).into()
}

#[derive(Debug, Default, Clone, Copy)]
pub struct CategoryService;

impl CategoryService {
    pub fn new() -> Self {
        Self
    }

    pub async fn list<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
    ) -> Result<Vec<(Category, i64)>, AppError> {
        Ok(categories::list_with_event_counts(conn).await?)
    }

    pub async fn get<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        id: i64,
    ) -> Result<Category, AppError> {
        categories::find(conn, id).await?.ok_or_else(|| not_found(id))
    }

    pub async fn create<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        name: &str,
        description: &str,
    ) -> Result<Category, AppError> {
        let (name, description) = Self::validate(name, description)?;
        let category = categories::create(conn, name, description).await?;
        info!(category_id = category.id, "category created");
        Ok(category)
    }

    pub async fn update<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        id: i64,
        name: &str,
        description: &str,
    ) -> Result<Category, AppError> {
        let (name, description) = Self::validate(name, description)?;
        self.get(conn, id).await?;
        Ok(categories::update(conn, id, name, description).await?)
    }

    /// Removes the category and, by cascade, its events.
    pub async fn delete<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        id: i64,
    ) -> Result<(), AppError> {
        if !categories::delete(conn, id).await? {
            return Err(not_found(id));
        }
        info!(category_id = id, "category deleted");
        Ok(())
    }

    fn validate(name: &str, description: &str) -> Result<(String, String), DomainError> {
        Ok((
            validation::required_text("Name", name, Some(validation::CATEGORY_NAME_MAX))?,
            validation::optional_text("Description", description, None)?,
        ))
    }
}
