//! Editable product form.
//!
//! The draft mirrors the editable surface of a [`Product`] and is posted back
//! in full on every interaction, so it round-trips through urlencoded pairs.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt::{Display, Formatter};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationErrors, ValidationErrorsKind};

use crate::domain::category::Category;
use crate::domain::product::{Product, ProductUpdate, ReviewUpdate, parse_review_date};
use crate::domain::types::{
    BrandName, CategorySlug, ProductDescription, ProductId, ProductPrice, ProductStock,
    ProductTitle, ReviewComment, ReviewRating, ReviewerEmail, ReviewerName, TypeConstraintError,
};

const REVIEW_PREFIX: &str = "reviews-";

/// Interaction requested by a posted edit form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditAction {
    AddReview,
    RemoveReview(usize),
    Submit,
    Cancel,
    /// Re-render the posted draft unchanged.
    Refresh,
}

impl EditAction {
    /// Parses the value of the `action` button.
    ///
    /// A missing value is an implicit submit. Unrecognised values only
    /// re-render, so a malformed button never writes to the catalog.
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            None | Some("submit") => Self::Submit,
            Some("add_review") => Self::AddReview,
            Some("cancel") => Self::Cancel,
            Some(other) => other
                .strip_prefix("remove_review-")
                .and_then(|index| index.parse().ok())
                .map_or(Self::Refresh, Self::RemoveReview),
        }
    }
}

/// One review row of the draft.
///
/// `key` identifies the row for the lifetime of the draft so that removing a
/// sibling never changes which inputs belong to which entry.
#[derive(Debug, Clone, PartialEq, Serialize, Validate)]
pub struct ReviewEntry {
    pub key: u32,
    #[validate(length(min = 1, message = "Please input the reviewer name!"))]
    pub reviewer_name: String,
    #[validate(length(min = 1, message = "Please input the reviewer email!"))]
    pub reviewer_email: String,
    #[validate(length(min = 1, message = "Please input a comment!"))]
    pub comment: String,
    #[validate(
        required(message = "Please rate the product!"),
        range(min = 0, max = 5, message = "Rating must be between 0 and 5 stars!")
    )]
    pub rating: Option<i32>,
    #[validate(required(message = "Please select the review date!"))]
    pub date: Option<NaiveDate>,
}

impl ReviewEntry {
    fn to_update(&self) -> Result<ReviewUpdate, TypeConstraintError> {
        Ok(ReviewUpdate {
            reviewer_name: ReviewerName::new(self.reviewer_name.as_str())?,
            reviewer_email: ReviewerEmail::new(self.reviewer_email.as_str())?,
            comment: ReviewComment::new(self.comment.as_str())?,
            rating: required(self.rating, "rating").and_then(ReviewRating::new)?,
            date: required(self.date, "date")?,
        })
    }

    fn empty(key: u32) -> Self {
        Self {
            key,
            reviewer_name: String::new(),
            reviewer_email: String::new(),
            comment: String::new(),
            rating: None,
            date: None,
        }
    }
}

/// Locally edited copy of a product.
#[derive(Debug, Clone, PartialEq, Serialize, Validate)]
pub struct ProductDraft {
    pub id: ProductId,
    #[validate(length(min = 1, message = "Please input the product title!"))]
    pub title: String,
    #[validate(length(min = 1, message = "Please input the product description!"))]
    pub description: String,
    #[validate(required(message = "Please input the product price!"))]
    pub price: Option<f64>,
    #[validate(length(min = 1, message = "Please input the brand!"))]
    pub brand: String,
    #[validate(length(min = 1, message = "Please select a category!"))]
    pub category: String,
    #[validate(required(message = "Please input the stock amount!"))]
    pub stock: Option<i32>,
    /// Display only; not part of the editable surface.
    pub thumbnail: String,
    #[validate(nested)]
    pub reviews: Vec<ReviewEntry>,
    #[serde(skip)]
    next_key: u32,
}

impl ProductDraft {
    /// Seeds a draft from a loaded product.
    pub fn from_product(product: &Product) -> Self {
        let reviews = product
            .reviews
            .iter()
            .enumerate()
            .map(|(index, review)| ReviewEntry {
                key: index as u32,
                reviewer_name: review.reviewer_name.clone(),
                reviewer_email: review.reviewer_email.clone(),
                comment: review.comment.clone(),
                rating: Some(review.rating),
                date: parse_review_date(&review.date),
            })
            .collect::<Vec<_>>();

        Self {
            id: product.id,
            title: product.title.clone(),
            description: product.description.clone(),
            price: Some(product.price),
            brand: product.brand.clone(),
            category: product.category.clone(),
            stock: Some(product.stock),
            thumbnail: product.thumbnail.clone(),
            next_key: reviews.len() as u32,
            reviews,
        }
    }

    /// Appends an empty review row.
    pub fn add_review(&mut self) {
        if self.next_key == u32::MAX {
            self.renumber_reviews();
        }
        let key = self.next_key;
        self.next_key += 1;
        self.reviews.push(ReviewEntry::empty(key));
    }

    /// Reassigns keys `0..n` in display order.
    fn renumber_reviews(&mut self) {
        for (index, review) in self.reviews.iter_mut().enumerate() {
            review.key = index as u32;
        }
        self.next_key = self.reviews.len() as u32;
    }

    /// Removes the review row at `index`, keeping the order of the rest.
    pub fn remove_review(&mut self, index: usize) -> Option<ReviewEntry> {
        if index < self.reviews.len() {
            Some(self.reviews.remove(index))
        } else {
            None
        }
    }

    /// Checks required fields and the category vocabulary, then builds the
    /// update covering the whole editable surface.
    pub fn to_update(&self, categories: &[Category]) -> Result<ProductUpdate, FieldErrors> {
        let mut errors = match self.validate() {
            Ok(()) => FieldErrors::default(),
            Err(e) => FieldErrors::from(e),
        };

        if !self.category.is_empty()
            && !categories
                .iter()
                .any(|c| c.slug.as_str() == self.category.as_str())
        {
            errors.insert("category", "Please select a known category!");
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        self.build_update()
    }

    fn build_update(&self) -> Result<ProductUpdate, FieldErrors> {
        let mut errors = FieldErrors::default();

        let title = errors.capture("", ProductTitle::new(self.title.as_str()));
        let description = errors.capture("", ProductDescription::new(self.description.as_str()));
        let price = errors.capture("", required(self.price, "price").and_then(ProductPrice::new));
        let brand = errors.capture("", BrandName::new(self.brand.as_str()));
        let category = errors.capture("", CategorySlug::new(self.category.as_str()));
        let stock = errors.capture("", required(self.stock, "stock").and_then(ProductStock::new));

        let mut reviews = Vec::with_capacity(self.reviews.len());
        for (index, entry) in self.reviews.iter().enumerate() {
            let prefix = format!("{REVIEW_PREFIX}{index}-");
            let review = entry.to_update();
            if let Some(review) = errors.capture(&prefix, review) {
                reviews.push(review);
            }
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(ProductUpdate {
            title,
            description,
            price,
            brand,
            category,
            stock,
            reviews: Some(reviews),
        })
    }
}

fn required<T>(value: Option<T>, field: &'static str) -> Result<T, TypeConstraintError> {
    value.ok_or(TypeConstraintError::EmptyString(field))
}

/// Per-field validation messages keyed by posted input name
/// (`title`, `reviews-1-comment`, ...).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn insert(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_insert_with(|| message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Drops messages of the removed review and renumbers those after it.
    pub fn remove_review(&mut self, index: usize) {
        let shifted = std::mem::take(&mut self.0)
            .into_iter()
            .filter_map(|(field, message)| match split_review_field(&field) {
                Some((i, _)) if i == index => None,
                Some((i, name)) if i > index => {
                    Some((format!("{REVIEW_PREFIX}{}-{name}", i - 1), message))
                }
                _ => Some((field, message)),
            })
            .collect();
        self.0 = shifted;
    }

    fn capture<T>(&mut self, prefix: &str, result: Result<T, TypeConstraintError>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(e) => {
                let field = e.field().unwrap_or("form");
                self.insert(format!("{prefix}{field}"), e.to_string());
                None
            }
        }
    }

    fn collect_from(&mut self, prefix: &str, errors: &ValidationErrors) {
        for (field, kind) in errors.errors() {
            match kind {
                ValidationErrorsKind::Field(list) => {
                    if let Some(first) = list.first() {
                        let message = first
                            .message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| format!("{field} is invalid"));
                        self.insert(format!("{prefix}{field}"), message);
                    }
                }
                ValidationErrorsKind::List(items) => {
                    for (index, nested) in items {
                        self.collect_from(&format!("{prefix}{field}-{index}-"), nested);
                    }
                }
                ValidationErrorsKind::Struct(nested) => {
                    self.collect_from(&format!("{prefix}{field}-"), nested);
                }
            }
        }
    }
}

impl From<ValidationErrors> for FieldErrors {
    fn from(value: ValidationErrors) -> Self {
        let mut errors = Self::default();
        errors.collect_from("", &value);
        errors
    }
}

impl Display for FieldErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let fields = self.0.keys().map(String::as_str).collect::<Vec<_>>();
        write!(f, "invalid fields: {}", fields.join(", "))
    }
}

fn split_review_field(field: &str) -> Option<(usize, &str)> {
    let rest = field.strip_prefix(REVIEW_PREFIX)?;
    let (index, name) = rest.split_once('-')?;
    Some((index.parse().ok()?, name))
}

/// Raw urlencoded body of the edit form.
#[derive(Debug, Default, Deserialize)]
#[serde(transparent)]
pub struct EditProductForm(pub Vec<(String, String)>);

#[derive(Default)]
struct RawReview {
    key: Option<u32>,
    reviewer_name: String,
    reviewer_email: String,
    comment: String,
    rating: Option<i32>,
    date: Option<NaiveDate>,
}

fn parse_number<T: std::str::FromStr>(value: &str) -> Option<T> {
    let value = value.trim();
    if value.is_empty() {
        None
    } else {
        value.parse().ok()
    }
}

impl EditProductForm {
    /// The requested interaction, without consuming the form.
    pub fn action(&self) -> EditAction {
        EditAction::parse(
            self.0
                .iter()
                .find(|(name, _)| name == "action")
                .map(|(_, value)| value.as_str()),
        )
    }

    /// Whether the rendered form was showing validation errors, marked by the
    /// hidden `validated` input.
    pub fn validated(&self) -> bool {
        self.0
            .iter()
            .any(|(name, value)| name == "validated" && !value.trim().is_empty())
    }

    /// Rebuilds the posted draft for product `id` and the requested action.
    pub fn into_draft(self, id: ProductId) -> (ProductDraft, EditAction) {
        let mut fields: HashMap<String, String> = HashMap::new();
        let mut raw_reviews: BTreeMap<usize, RawReview> = BTreeMap::new();

        for (name, value) in self.0 {
            match split_review_field(&name) {
                Some((index, field)) => {
                    let review = raw_reviews.entry(index).or_default();
                    match field {
                        "key" => review.key = parse_number(&value),
                        "reviewer_name" => review.reviewer_name = value,
                        "reviewer_email" => review.reviewer_email = value,
                        "comment" => review.comment = value,
                        "rating" => review.rating = parse_number(&value),
                        "date" => review.date = parse_review_date(&value),
                        _ => {}
                    }
                }
                None => {
                    fields.insert(name, value);
                }
            }
        }

        // Posted keys are kept only when every row has one, they are
        // distinct and a fresh key can still follow them.
        let next_key = raw_reviews
            .values()
            .map(|r| r.key)
            .collect::<Option<Vec<u32>>>()
            .filter(|keys| keys.iter().collect::<HashSet<_>>().len() == keys.len())
            .and_then(|keys| keys.into_iter().max().map_or(Some(0), |max| max.checked_add(1)));
        let reviews = raw_reviews
            .into_values()
            .map(|raw| ReviewEntry {
                key: raw.key.unwrap_or_default(),
                reviewer_name: raw.reviewer_name,
                reviewer_email: raw.reviewer_email,
                comment: raw.comment,
                rating: raw.rating,
                date: raw.date,
            })
            .collect();

        let action = EditAction::parse(fields.get("action").map(String::as_str));
        let mut take = |name: &str| fields.remove(name).unwrap_or_default();

        let mut draft = ProductDraft {
            id,
            title: take("title"),
            description: take("description"),
            price: parse_number(&take("price")),
            brand: take("brand"),
            category: take("category"),
            stock: parse_number(&take("stock")),
            thumbnail: take("thumbnail"),
            reviews,
            next_key: next_key.unwrap_or_default(),
        };
        if next_key.is_none() {
            draft.renumber_reviews();
        }

        (draft, action)
    }
}
