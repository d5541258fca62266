//! Display masking for card and account numbers.

use chrono::NaiveDate;

use crate::errors::{AnalyticsError, AnalyticsResult};
use crate::fields::OperationDate;

/// `7000792289606361` → `7000 79** **** 6361`
pub fn mask_card_number(card_number: &str) -> AnalyticsResult<String> {
    if card_number.len() != 16 || !card_number.bytes().all(|b| b.is_ascii_digit()) {
        return Err(AnalyticsError::InvalidCardNumber);
    }
    Ok(format!(
        "{} {}** **** {}",
        &card_number[..4],
        &card_number[4..6],
        &card_number[12..]
    ))
}

/// `73654108430135874305` → `**4305`
pub fn mask_account(account_number: &str) -> AnalyticsResult<String> {
    if account_number.len() < 4 || !account_number.bytes().all(|b| b.is_ascii_digit()) {
        return Err(AnalyticsError::InvalidAccountNumber);
    }
    Ok(format!("**{}", &account_number[account_number.len() - 4..]))
}

/// Masks the number at the end of `Visa Platinum 7000792289606361` or
/// `Счет 73654108430135874305`.
pub fn mask_account_card(account_info: &str) -> AnalyticsResult<String> {
    let (label, number) = account_info
        .trim()
        .rsplit_once(' ')
        .ok_or_else(|| AnalyticsError::InvalidAccountInfo(account_info.to_string()))?;

    let masked = if label.to_lowercase().contains("счет") {
        mask_account(number)?
    } else {
        mask_card_number(number)?
    };
    Ok(format!("{label} {masked}"))
}

/// `2024-03-11T02:26:18.671407` → `11.03.2024`
pub fn format_display_date(raw: &str) -> AnalyticsResult<String> {
    let date: NaiveDate = OperationDate::new(raw)
        .parse()
        .map_err(|_| AnalyticsError::InvalidDate(raw.to_string()))?;
    Ok(date.format("%d.%m.%Y").to_string())
}

/// Largest value that fits in sixteen digits
pub const MAX_CARD_NUMBER: u64 = 9_999_999_999_999_999;

/// Card numbers `start..=end` formatted as `0000 0000 0000 0001`.
pub fn card_number_generator(start: u64, end: u64) -> AnalyticsResult<impl Iterator<Item = String>> {
    if start > end || end > MAX_CARD_NUMBER {
        return Err(AnalyticsError::InvalidRange { start, end });
    }
    Ok((start..=end).map(|n| {
        let digits = format!("{n:016}");
        format!(
            "{} {} {} {}",
            &digits[..4],
            &digits[4..8],
            &digits[8..12],
            &digits[12..16]
        )
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("7000792289606361", "7000 79** **** 6361")]
    #[case("1234567890123456", "1234 56** **** 3456")]
    fn test_mask_card_number(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(mask_card_number(input).unwrap(), expected);
    }

    #[rstest]
    #[case("123")]
    #[case("abcdefghijklmnop")]
    #[case("12345678901234567")]
    #[case("")]
    fn test_mask_card_number_invalid(#[case] input: &str) {
        assert!(matches!(mask_card_number(input), Err(AnalyticsError::InvalidCardNumber)));
    }

    #[rstest]
    #[case("73654108430135874305", "**4305")]
    #[case("1234", "**1234")]
    fn test_mask_account(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(mask_account(input).unwrap(), expected);
    }

    #[rstest]
    #[case("12")]
    #[case("abcdef")]
    fn test_mask_account_invalid(#[case] input: &str) {
        assert!(matches!(mask_account(input), Err(AnalyticsError::InvalidAccountNumber)));
    }

    #[rstest]
    #[case("Visa Platinum 7000792289606361", "Visa Platinum 7000 79** **** 6361")]
    #[case("Maestro 1596837868705199", "Maestro 1596 83** **** 5199")]
    #[case("Счет 73654108430135874305", "Счет **4305")]
    #[case("СЧЕТ 64686473678894779589", "СЧЕТ **9589")]
    fn test_mask_account_card(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(mask_account_card(input).unwrap(), expected);
    }

    #[rstest]
    #[case("Invalid")]
    #[case("Invalid String Without Number")]
    #[case("Счет 123")]
    fn test_mask_account_card_invalid(#[case] input: &str) {
        assert!(mask_account_card(input).is_err());
    }

    #[rstest]
    #[case("2024-03-11T02:26:18.671407", "11.03.2024")]
    #[case("2023-01-01", "01.01.2023")]
    fn test_format_display_date(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(format_display_date(input).unwrap(), expected);
    }

    #[test]
    fn test_format_display_date_invalid() {
        assert!(matches!(
            format_display_date("invalid-date"),
            Err(AnalyticsError::InvalidDate(_))
        ));
    }

    #[test]
    fn test_card_number_generator() {
        let numbers: Vec<String> = card_number_generator(1, 3).unwrap().collect();
        assert_eq!(
            numbers,
            vec![
                "0000 0000 0000 0001",
                "0000 0000 0000 0002",
                "0000 0000 0000 0003"
            ]
        );

        let last: Vec<String> = card_number_generator(9999999999999999, 9999999999999999)
            .unwrap()
            .collect();
        assert_eq!(last, vec!["9999 9999 9999 9999"]);

        assert!(matches!(
            card_number_generator(5, 1),
            Err(AnalyticsError::InvalidRange { start: 5, end: 1 })
        ));
    }

    #[rstest]
    #[case(1, MAX_CARD_NUMBER + 1)]
    #[case(MAX_CARD_NUMBER, u64::MAX)]
    fn test_card_number_generator_rejects_more_than_sixteen_digits(
        #[case] start: u64,
        #[case] end: u64,
    ) {
        assert!(matches!(
            card_number_generator(start, end),
            Err(AnalyticsError::InvalidRange { .. })
        ));
    }
}
