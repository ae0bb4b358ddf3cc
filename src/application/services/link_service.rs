//! Link creation, lookup, and deletion service.

use std::sync::Arc;

use crate::domain::entities::{NewUrlRecord, UrlRecord};
use crate::domain::repositories::UrlRepository;
use crate::error::AppError;
use crate::utils::code_generator::CodeGenerator;
use crate::utils::url_normalizer::normalize_url;
use serde_json::json;
use tracing::{debug, info, warn};

/// Default bound on code generation attempts per shortening request.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 10;

/// Result of a shortening request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortenOutcome {
    pub record: UrlRecord,
    /// `false` when an existing mapping for the same URL was returned.
    pub created: bool,
}

/// Service for creating and managing short links.
///
/// # Deduplication
///
/// Re-shortening a URL that is already mapped returns the existing record
/// instead of minting a second code. The store's uniqueness constraint on the
/// original URL keeps this true under concurrent submissions.
pub struct LinkService<R, G>
where
    R: UrlRepository + ?Sized,
    G: CodeGenerator + ?Sized,
{
    repository: Arc<R>,
    generator: Arc<G>,
    base_url: String,
    max_attempts: u32,
}

impl<R, G> LinkService<R, G>
where
    R: UrlRepository + ?Sized,
    G: CodeGenerator + ?Sized,
{
    /// Creates a new link service.
    ///
    /// `base_url` is the public prefix of every short URL; a trailing slash is
    /// ignored. `max_attempts` is raised to at least one.
    pub fn new(
        repository: Arc<R>,
        generator: Arc<G>,
        base_url: impl Into<String>,
        max_attempts: u32,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();

        Self {
            repository,
            generator,
            base_url,
            max_attempts: max_attempts.max(1),
        }
    }

    /// Shortens a candidate URL.
    ///
    /// # Flow
    ///
    /// 1. Normalize and validate the URL
    /// 2. Return the existing mapping if the URL is already shortened
    /// 3. Generate a code and insert; regenerate on collision
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] (`invalid_url`) if the URL is malformed.
    /// Returns [`AppError::GenerationExhausted`] if every attempt collided.
    /// Returns [`AppError::Internal`] on storage errors.
    pub async fn shorten(&self, candidate: &str) -> Result<ShortenOutcome, AppError> {
        let original_url = normalize_url(candidate).map_err(|e| {
            AppError::invalid_url(e.to_string(), json!({ "url": candidate.trim() }))
        })?;

        if let Some(existing) = self
            .repository
            .find_by_original_url(&original_url)
            .await?
        {
            debug!(code = %existing.short_code, "URL already shortened");
            return Ok(ShortenOutcome {
                record: existing,
                created: false,
            });
        }

        for attempt in 1..=self.max_attempts {
            let code = self.generator.generate();
            let new_record = NewUrlRecord::new(code, original_url.clone());

            match self.repository.insert(new_record).await {
                Ok(record) => {
                    metrics::counter!("shortlink_urls_created_total").increment(1);
                    info!(code = %record.short_code, id = record.id, "Short link created");
                    return Ok(ShortenOutcome {
                        record,
                        created: true,
                    });
                }
                Err(AppError::DuplicateCode { code }) => {
                    metrics::counter!("shortlink_code_collisions_total").increment(1);
                    debug!(attempt, code, "Short code collision, regenerating");
                }
                Err(AppError::DuplicateUrl { .. }) => {
                    // Lost a race with a concurrent request for the same URL.
                    if let Some(existing) = self
                        .repository
                        .find_by_original_url(&original_url)
                        .await?
                    {
                        return Ok(ShortenOutcome {
                            record: existing,
                            created: false,
                        });
                    }
                }
                Err(e) => return Err(e),
            }
        }

        warn!(
            attempts = self.max_attempts,
            "Gave up generating a unique short code"
        );
        Err(AppError::GenerationExhausted {
            attempts: self.max_attempts,
        })
    }

    /// Retrieves a record by short code without counting a click.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the code is unknown.
    /// Returns [`AppError::Internal`] on storage errors.
    pub async fn get_by_code(&self, code: &str) -> Result<UrlRecord, AppError> {
        self.repository
            .find_by_code(code)
            .await?
            .ok_or_else(|| AppError::not_found("Short link not found", json!({ "code": code })))
    }

    /// Deletes a record by id. Its code stops resolving immediately.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no record has this id (or it was
    /// deleted concurrently).
    /// Returns [`AppError::Internal`] on storage errors.
    pub async fn delete_by_id(&self, id: i64) -> Result<UrlRecord, AppError> {
        let not_found = || AppError::not_found("Short link not found", json!({ "id": id }));

        let record = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(not_found)?;

        if !self.repository.delete(&record.short_code).await? {
            return Err(not_found());
        }

        info!(code = %record.short_code, id, "Short link deleted");
        Ok(record)
    }

    /// Builds the public short URL for a code.
    pub fn short_url(&self, code: &str) -> String {
        format!("{}/{}", self.base_url, code)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockUrlRepository;
    use crate::utils::code_generator::MockCodeGenerator;
    use chrono::Utc;

    fn test_record(id: i64, code: &str, url: &str) -> UrlRecord {
        UrlRecord::new(id, code.to_string(), url.to_string(), 0, Utc::now())
    }

    fn generator_yielding(codes: Vec<&'static str>) -> MockCodeGenerator {
        let times = codes.len();
        let mut codes = codes.into_iter();
        let mut generator = MockCodeGenerator::new();
        generator
            .expect_generate()
            .times(times)
            .returning(move || codes.next().unwrap().to_string());
        generator
    }

    fn service(
        repo: MockUrlRepository,
        generator: MockCodeGenerator,
    ) -> LinkService<MockUrlRepository, MockCodeGenerator> {
        LinkService::new(
            Arc::new(repo),
            Arc::new(generator),
            "http://localhost:5000/",
            3,
        )
    }

    #[tokio::test]
    async fn test_shorten_success() {
        let mut repo = MockUrlRepository::new();
        repo.expect_find_by_original_url()
            .withf(|url| url == "https://example.com/a?x=1")
            .times(1)
            .returning(|_| Ok(None));
        repo.expect_insert()
            .withf(|new| new.short_code == "abc1234" && new.original_url == "https://example.com/a?x=1")
            .times(1)
            .returning(|new| Ok(test_record(1, &new.short_code, &new.original_url)));

        let service = service(repo, generator_yielding(vec!["abc1234"]));
        let outcome = service.shorten("https://EXAMPLE.com/a?x=1").await.unwrap();

        assert!(outcome.created);
        assert_eq!(outcome.record.short_code, "abc1234");
        assert_eq!(outcome.record.clicks, 0);
    }

    #[tokio::test]
    async fn test_shorten_returns_existing_mapping() {
        let mut repo = MockUrlRepository::new();
        let existing = test_record(5, "exist12", "https://example.com/");
        repo.expect_find_by_original_url()
            .times(1)
            .returning(move |_| Ok(Some(existing.clone())));
        repo.expect_insert().times(0);

        let mut generator = MockCodeGenerator::new();
        generator.expect_generate().times(0);

        let outcome = service(repo, generator)
            .shorten("https://example.com")
            .await
            .unwrap();

        assert!(!outcome.created);
        assert_eq!(outcome.record.id, 5);
        assert_eq!(outcome.record.short_code, "exist12");
    }

    #[tokio::test]
    async fn test_shorten_invalid_url_touches_nothing() {
        let mut repo = MockUrlRepository::new();
        repo.expect_find_by_original_url().times(0);
        repo.expect_insert().times(0);
        let mut generator = MockCodeGenerator::new();
        generator.expect_generate().times(0);

        let err = service(repo, generator)
            .shorten("not-a-url")
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Validation { code: "invalid_url", .. }));
    }

    #[tokio::test]
    async fn test_shorten_retries_on_collision() {
        let mut repo = MockUrlRepository::new();
        repo.expect_find_by_original_url()
            .times(1)
            .returning(|_| Ok(None));
        repo.expect_insert()
            .withf(|new| new.short_code == "taken01")
            .times(1)
            .returning(|new| {
                Err(AppError::DuplicateCode {
                    code: new.short_code,
                })
            });
        repo.expect_insert()
            .withf(|new| new.short_code == "fresh01")
            .times(1)
            .returning(|new| Ok(test_record(2, &new.short_code, &new.original_url)));

        let service = service(repo, generator_yielding(vec!["taken01", "fresh01"]));
        let outcome = service.shorten("https://example.com/").await.unwrap();

        assert!(outcome.created);
        assert_eq!(outcome.record.short_code, "fresh01");
    }

    #[tokio::test]
    async fn test_shorten_generation_exhausted() {
        let mut repo = MockUrlRepository::new();
        repo.expect_find_by_original_url()
            .times(1)
            .returning(|_| Ok(None));
        repo.expect_insert().times(3).returning(|new| {
            Err(AppError::DuplicateCode {
                code: new.short_code,
            })
        });

        let service = service(repo, generator_yielding(vec!["same001", "same001", "same001"]));
        let err = service.shorten("https://example.com/").await.unwrap_err();

        assert!(matches!(err, AppError::GenerationExhausted { attempts: 3 }));
    }

    #[tokio::test]
    async fn test_shorten_concurrent_duplicate_url_returns_winner() {
        let mut repo = MockUrlRepository::new();
        let winner = test_record(9, "winner1", "https://example.com/");
        let mut lookups = 0;
        repo.expect_find_by_original_url()
            .times(2)
            .returning(move |_| {
                lookups += 1;
                if lookups == 1 {
                    Ok(None)
                } else {
                    Ok(Some(winner.clone()))
                }
            });
        repo.expect_insert().times(1).returning(|new| {
            Err(AppError::DuplicateUrl {
                original_url: new.original_url,
            })
        });

        let service = service(repo, generator_yielding(vec!["loser01"]));
        let outcome = service.shorten("https://example.com/").await.unwrap();

        assert!(!outcome.created);
        assert_eq!(outcome.record.short_code, "winner1");
    }

    #[tokio::test]
    async fn test_shorten_propagates_store_errors() {
        let mut repo = MockUrlRepository::new();
        repo.expect_find_by_original_url()
            .times(1)
            .returning(|_| Err(AppError::internal("Database error", json!({}))));

        let mut generator = MockCodeGenerator::new();
        generator.expect_generate().times(0);

        let err = service(repo, generator)
            .shorten("https://example.com/")
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Internal { .. }));
    }

    #[tokio::test]
    async fn test_delete_by_id() {
        let mut repo = MockUrlRepository::new();
        let rec = test_record(7, "del1234", "https://example.com/");
        repo.expect_find_by_id()
            .withf(|id| *id == 7)
            .times(1)
            .returning(move |_| Ok(Some(rec.clone())));
        repo.expect_delete()
            .withf(|code| code == "del1234")
            .times(1)
            .returning(|_| Ok(true));

        let deleted = service(repo, MockCodeGenerator::new())
            .delete_by_id(7)
            .await
            .unwrap();

        assert_eq!(deleted.short_code, "del1234");
    }

    #[tokio::test]
    async fn test_delete_unknown_id() {
        let mut repo = MockUrlRepository::new();
        repo.expect_find_by_id().times(1).returning(|_| Ok(None));
        repo.expect_delete().times(0);

        let err = service(repo, MockCodeGenerator::new())
            .delete_by_id(42)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_get_by_code_not_found() {
        let mut repo = MockUrlRepository::new();
        repo.expect_find_by_code().times(1).returning(|_| Ok(None));

        let err = service(repo, MockCodeGenerator::new())
            .get_by_code("nothere")
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::NotFound { .. }));
    }

    #[test]
    fn test_short_url_joins_base() {
        let service = service(MockUrlRepository::new(), MockCodeGenerator::new());

        assert_eq!(service.base_url(), "http://localhost:5000");
        assert_eq!(service.short_url("abc1234"), "http://localhost:5000/abc1234");
    }
}
