//! Public JSON shape of a product.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::Product;

const DATE_FORMAT: &str = "%d/%m/%Y";

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ProductView {
    pub id: i64,
    pub name: String,
    pub detail: String,
    pub status: u8,
    pub created_by: Option<i64>,
    pub updated_by: Option<i64>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

fn format_date(ts: Option<DateTime<Utc>>) -> Option<String> {
    ts.map(|t| t.format(DATE_FORMAT).to_string())
}

impl From<&Product> for ProductView {
    fn from(p: &Product) -> Self {
        ProductView {
            id: p.id,
            name: p.name.clone(),
            detail: p.detail.clone(),
            status: u8::from(p.status),
            created_by: p.created_by,
            updated_by: p.updated_by,
            created_at: format_date(p.created_at),
            updated_at: format_date(p.updated_at),
        }
    }
}

impl From<Product> for ProductView {
    fn from(p: Product) -> Self {
        ProductView::from(&p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn product() -> Product {
        Product {
            id: 3,
            name: "Widget".into(),
            detail: "A widget".into(),
            status: true,
            created_by: Some(7),
            updated_by: None,
            created_at: Some(Utc.with_ymd_and_hms(2025, 12, 16, 5, 10, 17).unwrap()),
            updated_at: None,
            deleted_at: None,
        }
    }

    #[test]
    fn renders_dates_as_day_month_year() {
        let view = ProductView::from(&product());
        assert_eq!(view.created_at.as_deref(), Some("16/12/2025"));
        assert_eq!(view.updated_at, None);
    }

    #[test]
    fn serializes_status_as_integer_and_missing_dates_as_null() {
        let mut p = product();
        p.status = false;
        p.created_at = None;
        let value = serde_json::to_value(ProductView::from(p)).unwrap();
        assert_eq!(
            value,
            json!({
                "id": 3,
                "name": "Widget",
                "detail": "A widget",
                "status": 0,
                "created_by": 7,
                "updated_by": null,
                "created_at": null,
                "updated_at": null
            })
        );
    }
}
