use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Формат даты, в котором пользователь вводит срок годности.
pub const DATE_FORMAT: &str = "%d.%m.%Y";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub name: String,
    #[serde(with = "expiry_format")]
    pub expiry: NaiveDate,
}

impl Product {
    pub fn new(name: impl Into<String>, expiry: NaiveDate) -> Self {
        Self {
            name: name.into(),
            expiry,
        }
    }

    /// Сколько полных дней осталось до истечения срока (отрицательно, если просрочен).
    pub fn days_left(&self, today: NaiveDate) -> i64 {
        (self.expiry - today).num_days()
    }

    pub fn format_expiry(&self) -> String {
        self.expiry.format(DATE_FORMAT).to_string()
    }
}

// Срок годности хранится строкой "ДД.ММ.ГГГГ", как его вводит пользователь
mod expiry_format {
    use chrono::NaiveDate;
    use serde::{self, Deserialize, Deserializer, Serializer};

    use super::DATE_FORMAT;

    pub fn serialize<S>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&date.format(DATE_FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        NaiveDate::parse_from_str(&raw, DATE_FORMAT).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expiry_serializes_as_user_facing_date() {
        let product = Product::new("Молоко", NaiveDate::from_ymd_opt(2026, 9, 3).unwrap());
        let json = serde_json::to_string(&product).unwrap();
        assert_eq!(json, r#"{"name":"Молоко","expiry":"03.09.2026"}"#);
    }

    #[test]
    fn expiry_deserializes_from_user_facing_date() {
        let product: Product =
            serde_json::from_str(r#"{"name":"Хлеб","expiry":"31.12.2025"}"#).unwrap();
        assert_eq!(product.name, "Хлеб");
        assert_eq!(product.expiry, NaiveDate::from_ymd_opt(2025, 12, 31).unwrap());
    }

    #[test]
    fn malformed_expiry_is_rejected() {
        let result = serde_json::from_str::<Product>(r#"{"name":"Сыр","expiry":"2025-12-31"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn days_left_counts_whole_days() {
        let today = NaiveDate::from_ymd_opt(2026, 8, 30).unwrap();
        let product = Product::new("Кефир", NaiveDate::from_ymd_opt(2026, 9, 2).unwrap());
        assert_eq!(product.days_left(today), 3);

        let expired = Product::new("Йогурт", NaiveDate::from_ymd_opt(2026, 8, 29).unwrap());
        assert_eq!(expired.days_left(today), -1);
    }
}
