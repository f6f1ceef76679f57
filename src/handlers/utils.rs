use chrono::NaiveDate;
use teloxide::types::{KeyboardButton, KeyboardMarkup, ReplyMarkup};

use crate::bot_state::BotStateError;
use crate::models::{product::DATE_FORMAT, Product};

/// Экранирование MarkdownV2
pub fn escape_markdown_v2(text: &str) -> String {
    let specials = [
        '_', '*', '[', ']', '(', ')', '~', '`', '>', '#', '+', '-', '=', '|', '{', '}', '.', '!',
    ];
    let mut out = String::with_capacity(text.len() * 2);

    for ch in text.chars() {
        if specials.contains(&ch) {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

/// Нумерованный список продуктов в порядке показа
pub fn format_product_list(products: &[Product]) -> String {
    let mut text = String::from("📋 *Ваши продукты:*\n");
    for (idx, product) in products.iter().enumerate() {
        text.push_str(&escape_markdown_v2(&format!(
            "{}. {} — до {}",
            idx + 1,
            product.name,
            product.format_expiry()
        )));
        text.push('\n');
    }
    text
}

/// Клавиатура выбора продукта для удаления, по одной кнопке на строку
pub fn make_removal_keyboard(products: &[Product]) -> ReplyMarkup {
    let rows: Vec<Vec<KeyboardButton>> = products
        .iter()
        .enumerate()
        .map(|(idx, product)| vec![KeyboardButton::new(format!("{}. {}", idx + 1, product.name))])
        .collect();

    ReplyMarkup::Keyboard(
        KeyboardMarkup::new(rows)
            .resize_keyboard()
            .one_time_keyboard(),
    )
}

pub fn parse_expiry_date(text: &str) -> Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(text.trim(), DATE_FORMAT)
}

/// Разбирает ответ на клавиатуру удаления: "2. Молоко" или просто "2".
/// Возвращает индекс позиции в показанном списке (с нуля).
pub fn parse_removal_choice(text: &str) -> Result<usize, BotStateError> {
    let number = text.split('.').next().unwrap_or("").trim();
    let position: usize = number
        .parse()
        .map_err(|_| BotStateError::InvalidSelection)?;
    position
        .checked_sub(1)
        .ok_or(BotStateError::InvalidSelection)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(d: u32, m: u32, y: i32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn expiry_date_parses_in_user_format() {
        assert_eq!(parse_expiry_date("03.09.2026").unwrap(), date(3, 9, 2026));
        assert_eq!(parse_expiry_date(" 1.9.2026 ").unwrap(), date(1, 9, 2026));
    }

    #[test]
    fn bad_expiry_dates_are_rejected() {
        assert!(parse_expiry_date("2026-09-03").is_err());
        assert!(parse_expiry_date("31.02.2026").is_err());
        assert!(parse_expiry_date("скоро").is_err());
    }

    #[test]
    fn removal_choice_accepts_keyboard_labels_and_bare_numbers() {
        assert_eq!(parse_removal_choice("2. Молоко").unwrap(), 1);
        assert_eq!(parse_removal_choice("1").unwrap(), 0);
        assert_eq!(parse_removal_choice("3.").unwrap(), 2);
    }

    #[test]
    fn removal_choice_rejects_non_positive_input() {
        assert!(matches!(
            parse_removal_choice("ноль"),
            Err(BotStateError::InvalidSelection)
        ));
        assert!(matches!(
            parse_removal_choice("0. Молоко"),
            Err(BotStateError::InvalidSelection)
        ));
        assert!(matches!(
            parse_removal_choice("-1"),
            Err(BotStateError::InvalidSelection)
        ));
        assert!(matches!(
            parse_removal_choice(""),
            Err(BotStateError::InvalidSelection)
        ));
    }

    #[test]
    fn product_list_is_numbered_from_one() {
        let products = vec![
            Product::new("Хлеб", date(1, 9, 2026)),
            Product::new("Молоко", date(3, 9, 2026)),
        ];
        let text = format_product_list(&products);
        assert!(text.contains("1\\. Хлеб"));
        assert!(text.contains("2\\. Молоко"));
        assert!(text.contains("01\\.09\\.2026"));
    }
}
