use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::domain::types::{
    BrandName, CategorySlug, ProductDescription, ProductId, ProductPrice, ProductStock,
    ProductTitle, ReviewComment, ReviewRating, ReviewerEmail, ReviewerName,
};

/// Format used when sending review dates back to the catalog.
const REVIEW_DATE_FORMAT: &str = "%Y-%m-%dT00:00:00.000Z";

/// A product snapshot as owned by the remote catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    pub description: String,
    pub price: f64,
    pub brand: String,
    /// Slug of the category the product belongs to.
    pub category: String,
    pub stock: i32,
    pub thumbnail: String,
    pub reviews: Vec<Review>,
}

/// A review attached to a product. Reviews are identified only by position.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Review {
    pub reviewer_name: String,
    pub reviewer_email: String,
    pub comment: String,
    pub rating: i32,
    /// Transport representation, usually an RFC 3339 timestamp.
    pub date: String,
}

/// A single unfiltered page of the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductPage {
    pub products: Vec<Product>,
    pub total: usize,
    pub skip: usize,
    pub limit: usize,
}

/// Partial update of a product. `None` fields are left unchanged by the catalog.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductUpdate {
    pub title: Option<ProductTitle>,
    pub description: Option<ProductDescription>,
    pub price: Option<ProductPrice>,
    pub brand: Option<BrandName>,
    pub category: Option<CategorySlug>,
    pub stock: Option<ProductStock>,
    pub reviews: Option<Vec<ReviewUpdate>>,
}

/// Review data carried by a [`ProductUpdate`].
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewUpdate {
    pub reviewer_name: ReviewerName,
    pub reviewer_email: ReviewerEmail,
    pub comment: ReviewComment,
    pub rating: ReviewRating,
    pub date: NaiveDate,
}

/// Converts a transport date into a calendar day.
///
/// RFC 3339 timestamps are reduced to their UTC day; bare `YYYY-MM-DD` dates
/// are accepted as-is. Anything else yields `None`.
pub fn parse_review_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(value) {
        return Some(timestamp.naive_utc().date());
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

/// Encodes a calendar day in the catalog's transport representation.
pub fn format_review_date(date: NaiveDate) -> String {
    date.format(REVIEW_DATE_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_rfc3339_timestamps_to_utc_day() {
        let date = parse_review_date("2024-05-23T08:56:21.618Z").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 5, 23).unwrap());

        let shifted = parse_review_date("2024-05-23T23:30:00-02:00").unwrap();
        assert_eq!(shifted, NaiveDate::from_ymd_opt(2024, 5, 24).unwrap());
    }

    #[test]
    fn parses_plain_dates() {
        assert_eq!(
            parse_review_date("2024-01-02"),
            NaiveDate::from_ymd_opt(2024, 1, 2)
        );
        assert_eq!(parse_review_date("yesterday"), None);
        assert_eq!(parse_review_date(""), None);
    }

    #[test]
    fn formatted_dates_parse_back_to_the_same_day() {
        let day = NaiveDate::from_ymd_opt(2023, 12, 31).unwrap();
        let encoded = format_review_date(day);
        assert_eq!(encoded, "2023-12-31T00:00:00.000Z");
        assert_eq!(parse_review_date(&encoded), Some(day));
    }
}
