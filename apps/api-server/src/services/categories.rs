//! Category service - CRUD with case-insensitive name uniqueness.

use std::sync::Arc;

use uuid::Uuid;

use quill_core::content::{ensure_unique_slug, generate_slug};
use quill_core::domain::Category;
use quill_core::error::{DomainError, RepoError};
use quill_core::ports::{CategoryPatch, CategoryRepository, NewCategory};
use quill_shared::dto::{CategoryResponse, CreateCategoryRequest, UpdateCategoryRequest};

#[derive(Clone)]
pub struct CategoryService {
    repo: Arc<dyn CategoryRepository>,
}

impl CategoryService {
    pub fn new(repo: Arc<dyn CategoryRepository>) -> Self {
        Self { repo }
    }

    pub async fn list(&self) -> Result<Vec<CategoryResponse>, DomainError> {
        let categories = self.repo.list().await?;
        Ok(categories.into_iter().map(shape_category).collect())
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<CategoryResponse, DomainError> {
        let category = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("category", id))?;

        Ok(shape_category(category))
    }

    pub async fn create(&self, req: CreateCategoryRequest) -> Result<CategoryResponse, DomainError> {
        self.reject_duplicate_name(&req.name, None).await?;
        let slug = self.unique_slug(&req.name, None).await?;

        let category = self
            .repo
            .create(NewCategory {
                name: req.name,
                slug,
                description: req.description,
            })
            .await?;

        Ok(shape_category(category))
    }

    /// Rename recomputes the slug; the duplicate check skips the record
    /// itself so saving an unchanged name is not a conflict.
    pub async fn update(
        &self,
        id: Uuid,
        req: UpdateCategoryRequest,
    ) -> Result<CategoryResponse, DomainError> {
        let existing = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("category", id))?;

        let mut patch = CategoryPatch {
            description: req.description,
            ..Default::default()
        };

        if let Some(name) = req.name {
            self.reject_duplicate_name(&name, Some(id)).await?;
            if name != existing.name {
                patch.slug = Some(self.unique_slug(&name, Some(id)).await?);
            }
            patch.name = Some(name);
        }

        let updated = self.repo.update(id, patch).await.map_err(|e| match e {
            RepoError::NotFound => DomainError::not_found("category", id),
            other => other.into(),
        })?;

        Ok(shape_category(updated))
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), DomainError> {
        self.repo.delete(id).await.map_err(|e| match e {
            RepoError::NotFound => DomainError::not_found("category", id),
            other => other.into(),
        })
    }

    async fn reject_duplicate_name(
        &self,
        name: &str,
        exclude: Option<Uuid>,
    ) -> Result<(), DomainError> {
        if let Some(existing) = self.repo.find_by_name(name, exclude).await? {
            return Err(DomainError::Duplicate(format!(
                "category '{}' already exists",
                existing.name
            )));
        }
        Ok(())
    }

    async fn unique_slug(&self, name: &str, exclude: Option<Uuid>) -> Result<String, DomainError> {
        let base = generate_slug(name);
        let base = if base.is_empty() { "category".to_owned() } else { base };

        let repo = self.repo.clone();
        let slug = ensure_unique_slug(&base, move |candidate| {
            let repo = repo.clone();
            async move { repo.slug_exists(&candidate, exclude).await }
        })
        .await?;

        Ok(slug)
    }
}

fn shape_category(category: Category) -> CategoryResponse {
    CategoryResponse {
        id: category.id,
        name: category.name,
        slug: category.slug,
        description: category.description,
        posts_count: category.posts_count,
        created_at: category.created_at,
    }
}

#[cfg(test)]
mod tests {
    use quill_infra::InMemoryStore;

    use super::*;

    fn service() -> CategoryService {
        CategoryService::new(Arc::new(InMemoryStore::new()))
    }

    #[tokio::test]
    async fn create_derives_slug() {
        let svc = service();
        let created = svc
            .create(CreateCategoryRequest {
                name: "Systems Programming".to_owned(),
                description: None,
            })
            .await
            .unwrap();
        assert_eq!(created.slug, "systems-programming");
    }

    #[tokio::test]
    async fn duplicate_name_is_rejected_case_insensitively() {
        let svc = service();
        svc.create(CreateCategoryRequest {
            name: "Rust".to_owned(),
            description: None,
        })
        .await
        .unwrap();

        let err = svc
            .create(CreateCategoryRequest {
                name: "RUST".to_owned(),
                description: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Duplicate(_)));
    }

    #[tokio::test]
    async fn update_with_own_name_is_not_a_conflict() {
        let svc = service();
        let created = svc
            .create(CreateCategoryRequest {
                name: "Databases".to_owned(),
                description: None,
            })
            .await
            .unwrap();

        let updated = svc
            .update(
                created.id,
                UpdateCategoryRequest {
                    name: Some("Databases".to_owned()),
                    description: Some("storage engines".to_owned()),
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.slug, "databases");
        assert_eq!(updated.description.as_deref(), Some("storage engines"));
    }

    #[tokio::test]
    async fn rename_recomputes_slug() {
        let svc = service();
        let created = svc
            .create(CreateCategoryRequest {
                name: "Web Dev".to_owned(),
                description: None,
            })
            .await
            .unwrap();

        let updated = svc
            .update(
                created.id,
                UpdateCategoryRequest {
                    name: Some("Frontend".to_owned()),
                    description: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.slug, "frontend");
    }
}
