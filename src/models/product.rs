use serde::{Deserialize, Serialize};

use crate::domain::product::{
    Product as DomainProduct, ProductPage as DomainProductPage, ProductUpdate,
    Review as DomainReview, ReviewUpdate, format_review_date,
};
use crate::domain::types::TypeConstraintError;

/// Product as returned by the catalog API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i32,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub stock: i32,
    #[serde(default)]
    pub thumbnail: String,
    #[serde(default)]
    pub reviews: Vec<Review>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    #[serde(default)]
    pub reviewer_name: String,
    #[serde(default)]
    pub reviewer_email: String,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub rating: i32,
    #[serde(default)]
    pub date: String,
}

/// Envelope of `GET products`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductPage {
    pub products: Vec<Product>,
    #[serde(default)]
    pub total: usize,
    #[serde(default)]
    pub skip: usize,
    #[serde(default)]
    pub limit: usize,
}

/// Body of `PATCH products/{id}`. Omitted fields stay unchanged server-side.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProductPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviews: Option<Vec<Review>>,
}

impl From<Review> for DomainReview {
    fn from(review: Review) -> Self {
        Self {
            reviewer_name: review.reviewer_name,
            reviewer_email: review.reviewer_email,
            comment: review.comment,
            rating: review.rating,
            date: review.date,
        }
    }
}

impl TryFrom<Product> for DomainProduct {
    type Error = TypeConstraintError;

    fn try_from(product: Product) -> Result<Self, Self::Error> {
        Ok(Self {
            id: product.id.try_into()?,
            title: product.title,
            description: product.description,
            price: product.price,
            brand: product.brand,
            category: product.category,
            stock: product.stock,
            thumbnail: product.thumbnail,
            reviews: product.reviews.into_iter().map(Into::into).collect(),
        })
    }
}

impl TryFrom<ProductPage> for DomainProductPage {
    type Error = TypeConstraintError;

    fn try_from(page: ProductPage) -> Result<Self, Self::Error> {
        Ok(Self {
            products: page
                .products
                .into_iter()
                .map(DomainProduct::try_from)
                .collect::<Result<Vec<_>, _>>()?,
            total: page.total,
            skip: page.skip,
            limit: page.limit,
        })
    }
}

impl From<&ReviewUpdate> for Review {
    fn from(review: &ReviewUpdate) -> Self {
        Self {
            reviewer_name: review.reviewer_name.as_str().to_string(),
            reviewer_email: review.reviewer_email.as_str().to_string(),
            comment: review.comment.as_str().to_string(),
            rating: review.rating.get(),
            date: format_review_date(review.date),
        }
    }
}

impl From<&ProductUpdate> for ProductPatch {
    fn from(update: &ProductUpdate) -> Self {
        Self {
            title: update.title.as_ref().map(|v| v.as_str().to_string()),
            description: update.description.as_ref().map(|v| v.as_str().to_string()),
            price: update.price.map(|v| v.get()),
            brand: update.brand.as_ref().map(|v| v.as_str().to_string()),
            category: update.category.as_ref().map(|v| v.as_str().to_string()),
            stock: update.stock.map(|v| v.get()),
            reviews: update
                .reviews
                .as_ref()
                .map(|reviews| reviews.iter().map(Review::from).collect()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{ProductTitle, ReviewComment, ReviewRating, ReviewerEmail, ReviewerName};
    use chrono::NaiveDate;

    #[test]
    fn missing_optional_fields_load_as_empty() {
        let product: Product = serde_json::from_str(
            r#"{"id": 16, "title": "Apple", "price": 1.99, "category": "groceries",
                "stock": 9, "rating": 4.1, "tags": ["fruits"]}"#,
        )
        .unwrap();
        let product = DomainProduct::try_from(product).unwrap();

        assert_eq!(product.id, 16);
        assert_eq!(product.brand, "");
        assert!(product.reviews.is_empty());
    }

    #[test]
    fn rejects_non_positive_ids() {
        let product: Product = serde_json::from_str(r#"{"id": 0}"#).unwrap();
        assert!(DomainProduct::try_from(product).is_err());
    }

    #[test]
    fn patch_omits_fields_not_supplied() {
        let update = ProductUpdate {
            title: Some(ProductTitle::new("Lamp").unwrap()),
            ..Default::default()
        };
        let body = serde_json::to_value(ProductPatch::from(&update)).unwrap();
        assert_eq!(body, serde_json::json!({"title": "Lamp"}));
    }

    #[test]
    fn patch_reviews_use_camel_case_and_transport_dates() {
        let update = ProductUpdate {
            reviews: Some(vec![ReviewUpdate {
                reviewer_name: ReviewerName::new("Eleanor").unwrap(),
                reviewer_email: ReviewerEmail::new("eleanor@example.com").unwrap(),
                comment: ReviewComment::new("Great").unwrap(),
                rating: ReviewRating::new(4).unwrap(),
                date: NaiveDate::from_ymd_opt(2024, 5, 23).unwrap(),
            }]),
            ..Default::default()
        };
        let body = serde_json::to_value(ProductPatch::from(&update)).unwrap();
        assert_eq!(body["reviews"][0]["reviewerName"], "Eleanor");
        assert_eq!(body["reviews"][0]["date"], "2024-05-23T00:00:00.000Z");
    }

    #[test]
    fn patch_decodes_back_to_the_same_reviews() {
        let json = r#"{"title": "Lamp", "reviews": [{"reviewerName": "Eleanor",
            "reviewerEmail": "eleanor@example.com", "comment": "Great", "rating": 4,
            "date": "2024-05-23T00:00:00.000Z"}]}"#;
        let patch: ProductPatch = serde_json::from_str(json).unwrap();

        let expected = ProductPatch {
            title: Some("Lamp".to_string()),
            reviews: Some(vec![Review {
                reviewer_name: "Eleanor".to_string(),
                reviewer_email: "eleanor@example.com".to_string(),
                comment: "Great".to_string(),
                rating: 4,
                date: "2024-05-23T00:00:00.000Z".to_string(),
            }]),
            ..Default::default()
        };
        assert_eq!(patch, expected);
    }
}
