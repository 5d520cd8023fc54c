//! State machine of the product edit form.
//!
//! One [`ProductEditor`] lives for one mount of the form. Its state is an
//! explicit tagged variant, so combinations such as "submitting while the
//! load failed" cannot be represented.

use serde::Serialize;
use thiserror::Error;

use crate::domain::category::Category;
use crate::domain::product::{Product, ProductUpdate};
use crate::forms::products::{FieldErrors, ProductDraft};
use crate::repository::RepositoryResult;
use crate::services::{ServiceError, ServiceResult};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum EditorState {
    /// Product and categories are still being fetched.
    Loading,
    /// A fetch failed; terminal for this mount.
    LoadError { message: String },
    /// The draft is editable.
    Ready {
        draft: ProductDraft,
        categories: Vec<Category>,
        errors: FieldErrors,
        alert: Option<String>,
    },
    /// The update request is outstanding.
    Submitting {
        draft: ProductDraft,
        categories: Vec<Category>,
    },
    /// The form is gone together with its draft.
    Closed,
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum EditorError {
    #[error("{0}")]
    Validation(FieldErrors),
    #[error("review {0} does not exist")]
    ReviewIndex(usize),
    #[error("the form is not ready for editing")]
    NotReady,
    #[error("the form is closed")]
    Closed,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductEditor {
    state: EditorState,
}

impl Default for ProductEditor {
    fn default() -> Self {
        Self::new()
    }
}

impl ProductEditor {
    pub fn new() -> Self {
        Self {
            state: EditorState::Loading,
        }
    }

    /// Rebuilds an editable form from a draft posted back by the browser.
    pub fn restore(draft: ProductDraft, categories: Vec<Category>) -> Self {
        Self {
            state: EditorState::Ready {
                draft,
                categories,
                errors: FieldErrors::default(),
                alert: None,
            },
        }
    }

    /// Recomputes the field errors of a `Ready` draft without touching the
    /// catalog. Used when the posted form was already showing errors.
    pub fn revalidate(&mut self) -> Result<(), EditorError> {
        match &mut self.state {
            EditorState::Ready {
                draft,
                categories,
                errors,
                ..
            } => {
                *errors = draft.to_update(categories).err().unwrap_or_default();
                Ok(())
            }
            _ => Err(self.unavailable()),
        }
    }

    /// Editor that failed to load.
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            state: EditorState::LoadError {
                message: message.into(),
            },
        }
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    pub fn is_closed(&self) -> bool {
        matches!(self.state, EditorState::Closed)
    }

    pub fn draft(&self) -> Option<&ProductDraft> {
        match &self.state {
            EditorState::Ready { draft, .. } | EditorState::Submitting { draft, .. } => {
                Some(draft)
            }
            _ => None,
        }
    }

    /// Mutable access for user input; only available while `Ready`.
    pub fn draft_mut(&mut self) -> Option<&mut ProductDraft> {
        match &mut self.state {
            EditorState::Ready { draft, .. } => Some(draft),
            _ => None,
        }
    }

    pub fn errors(&self) -> Option<&FieldErrors> {
        match &self.state {
            EditorState::Ready { errors, .. } => Some(errors),
            _ => None,
        }
    }

    pub fn alert(&self) -> Option<&str> {
        match &self.state {
            EditorState::Ready { alert, .. } => alert.as_deref(),
            _ => None,
        }
    }

    fn unavailable(&self) -> EditorError {
        match self.state {
            EditorState::Closed => EditorError::Closed,
            _ => EditorError::NotReady,
        }
    }

    /// Joins the two initial reads. The product failure wins when both fail.
    pub fn resolve(
        &mut self,
        product: RepositoryResult<Product>,
        categories: RepositoryResult<Vec<Category>>,
    ) -> Result<(), EditorError> {
        if !matches!(self.state, EditorState::Loading) {
            return Err(self.unavailable());
        }

        self.state = match (product, categories) {
            (Ok(product), Ok(categories)) => EditorState::Ready {
                draft: ProductDraft::from_product(&product),
                categories,
                errors: FieldErrors::default(),
                alert: None,
            },
            (Err(e), _) => {
                log::error!("Failed to load product for editing: {e}");
                EditorState::LoadError {
                    message: ServiceError::from(e).to_string(),
                }
            }
            (_, Err(e)) => {
                log::error!("Failed to load categories for editing: {e}");
                EditorState::LoadError {
                    message: ServiceError::from(e).to_string(),
                }
            }
        };
        Ok(())
    }

    /// Appends an empty review. Existing field errors are left alone.
    pub fn add_review(&mut self) -> Result<(), EditorError> {
        match &mut self.state {
            EditorState::Ready { draft, .. } => {
                draft.add_review();
                Ok(())
            }
            _ => Err(self.unavailable()),
        }
    }

    pub fn remove_review(&mut self, index: usize) -> Result<(), EditorError> {
        match &mut self.state {
            EditorState::Ready { draft, errors, .. } => {
                if draft.remove_review(index).is_none() {
                    return Err(EditorError::ReviewIndex(index));
                }
                errors.remove_review(index);
                Ok(())
            }
            _ => Err(self.unavailable()),
        }
    }

    /// Validates the draft and, if it is complete, moves to `Submitting`.
    ///
    /// On validation failure the editor stays `Ready` with per-field errors.
    pub fn begin_submit(&mut self) -> Result<ProductUpdate, EditorError> {
        let state = std::mem::replace(&mut self.state, EditorState::Loading);
        match state {
            EditorState::Ready {
                draft, categories, ..
            } => match draft.to_update(&categories) {
                Ok(update) => {
                    self.state = EditorState::Submitting { draft, categories };
                    Ok(update)
                }
                Err(errors) => {
                    self.state = EditorState::Ready {
                        draft,
                        categories,
                        errors: errors.clone(),
                        alert: None,
                    };
                    Err(EditorError::Validation(errors))
                }
            },
            other => {
                self.state = other;
                Err(self.unavailable())
            }
        }
    }

    /// Settles an outstanding submit. Failures return to `Ready` with the
    /// draft untouched and the error as an alert.
    pub fn complete_submit(&mut self, result: ServiceResult<Product>) -> Result<(), EditorError> {
        let state = std::mem::replace(&mut self.state, EditorState::Loading);
        match state {
            EditorState::Submitting { draft, categories } => {
                self.state = match result {
                    Ok(_) => EditorState::Closed,
                    Err(e) => EditorState::Ready {
                        draft,
                        categories,
                        errors: FieldErrors::default(),
                        alert: Some(e.to_string()),
                    },
                };
                Ok(())
            }
            other => {
                self.state = other;
                Err(self.unavailable())
            }
        }
    }

    /// Discards the draft without any network call.
    pub fn cancel(&mut self) {
        self.state = EditorState::Closed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::RepositoryError;
    use crate::repository::test::{sample_categories, sample_product};

    fn ready_editor(reviews: usize) -> ProductEditor {
        let mut editor = ProductEditor::new();
        editor
            .resolve(Ok(sample_product(7, reviews)), Ok(sample_categories()))
            .unwrap();
        editor
    }

    #[test]
    fn no_draft_until_both_reads_resolve() {
        let editor = ProductEditor::new();
        assert_eq!(editor.state(), &EditorState::Loading);
        assert!(editor.draft().is_none());
    }

    #[test]
    fn product_error_wins_over_categories_error() {
        let mut editor = ProductEditor::new();
        editor
            .resolve(
                Err(RepositoryError::NotFound),
                Err(RepositoryError::Network("down".into())),
            )
            .unwrap();

        assert_eq!(
            editor.state(),
            &EditorState::LoadError {
                message: "not found".to_string()
            }
        );
    }

    #[test]
    fn categories_error_blocks_the_form() {
        let mut editor = ProductEditor::new();
        editor
            .resolve(
                Ok(sample_product(7, 0)),
                Err(RepositoryError::Network("down".into())),
            )
            .unwrap();

        assert!(matches!(editor.state(), EditorState::LoadError { .. }));
        assert_eq!(editor.add_review(), Err(EditorError::NotReady));
        assert_eq!(editor.begin_submit(), Err(EditorError::NotReady));
    }

    #[test]
    fn resolved_draft_matches_product() {
        let editor = ready_editor(2);
        let expected = ProductDraft::from_product(&sample_product(7, 2));
        assert_eq!(editor.draft(), Some(&expected));
    }

    #[test]
    fn add_keeps_existing_errors() {
        let mut editor = ready_editor(1);
        editor.draft_mut().unwrap().title.clear();
        editor.begin_submit().unwrap_err();

        editor.add_review().unwrap();

        assert!(editor.errors().unwrap().contains("title"));
        assert_eq!(editor.draft().unwrap().reviews.len(), 2);
    }

    #[test]
    fn revalidate_restores_errors_of_a_posted_draft() {
        let mut draft = ProductDraft::from_product(&sample_product(7, 2));
        draft.title.clear();
        draft.reviews[1].comment.clear();
        let mut editor = ProductEditor::restore(draft, sample_categories());

        editor.revalidate().unwrap();
        editor.remove_review(0).unwrap();

        let errors = editor.errors().unwrap();
        assert!(errors.contains("title"));
        assert!(errors.contains("reviews-0-comment"));
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn remove_rejects_unknown_index() {
        let mut editor = ready_editor(1);
        assert_eq!(editor.remove_review(3), Err(EditorError::ReviewIndex(3)));
        assert_eq!(editor.draft().unwrap().reviews.len(), 1);
    }

    #[test]
    fn invalid_draft_stays_ready_with_field_errors() {
        let mut editor = ready_editor(0);
        editor.draft_mut().unwrap().brand.clear();

        let err = editor.begin_submit().unwrap_err();

        assert!(matches!(err, EditorError::Validation(ref errors) if errors.contains("brand")));
        assert!(matches!(editor.state(), EditorState::Ready { .. }));
    }

    #[test]
    fn submitting_rejects_mutations() {
        let mut editor = ready_editor(1);
        editor.begin_submit().unwrap();

        assert!(matches!(editor.state(), EditorState::Submitting { .. }));
        assert_eq!(editor.add_review(), Err(EditorError::NotReady));
        assert_eq!(editor.begin_submit(), Err(EditorError::NotReady));
        assert!(editor.draft_mut().is_none());
    }

    #[test]
    fn successful_submit_closes_for_good() {
        let mut editor = ready_editor(1);
        editor.begin_submit().unwrap();
        editor.complete_submit(Ok(sample_product(7, 1))).unwrap();

        assert!(editor.is_closed());
        assert_eq!(editor.add_review(), Err(EditorError::Closed));
        assert_eq!(editor.remove_review(0), Err(EditorError::Closed));
        assert_eq!(editor.begin_submit(), Err(EditorError::Closed));
        assert_eq!(
            editor.complete_submit(Err(ServiceError::Internal)),
            Err(EditorError::Closed)
        );
        assert_eq!(editor.state(), &EditorState::Closed);
    }

    #[test]
    fn failed_submit_keeps_draft() {
        let mut editor = ready_editor(2);
        editor.draft_mut().unwrap().title = "Edited title".to_string();
        let before = editor.draft().cloned().unwrap();

        editor.begin_submit().unwrap();
        editor
            .complete_submit(Err(ServiceError::Network("timeout".into())))
            .unwrap();

        assert_eq!(editor.draft(), Some(&before));
        assert_eq!(editor.alert(), Some("catalog unavailable: timeout"));
    }

    #[test]
    fn cancel_closes_from_any_state() {
        let mut editor = ready_editor(0);
        editor.cancel();
        assert!(editor.is_closed());

        let mut loading = ProductEditor::new();
        loading.cancel();
        assert!(loading.is_closed());
    }
}
