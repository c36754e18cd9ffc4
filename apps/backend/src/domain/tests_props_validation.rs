//! Property tests for field validators (pure domain, no DB).

use proptest::prelude::*;

use crate::domain::validation;

proptest! {
    #[test]
    fn prop_valid_usernames_round_trip(name in "[A-Za-z0-9@.+_-]{1,150}") {
        prop_assert_eq!(validation::username(&name).unwrap(), name);
    }

    #[test]
    fn prop_usernames_with_whitespace_inside_rejected(
        left in "[a-z]{1,10}",
        right in "[a-z]{1,10}",
    ) {
        let candidate = format!("{left} {right}");
        prop_assert!(validation::username(&candidate).is_err());
    }

    #[test]
    fn prop_email_normalization_is_idempotent(
        local in "[A-Za-z0-9._]{1,20}",
        domain in "[A-Za-z]{1,10}",
        tld in "[A-Za-z]{2,5}",
    ) {
        let raw = format!("{local}@{domain}.{tld}");
        let once = validation::email(&raw).unwrap();
        let twice = validation::email(&once).unwrap();
        prop_assert_eq!(&once, &twice);
        prop_assert_eq!(once, raw.to_lowercase());
    }

    #[test]
    fn prop_all_digit_passwords_rejected(pw in "[0-9]{8,40}") {
        prop_assert!(validation::password(&pw, &pw).is_err());
    }

    #[test]
    fn prop_long_mixed_passwords_accepted(
        digits in "[0-9]{0,10}",
        letters in "[a-zA-Z]{8,20}",
    ) {
        let pw = format!("{letters}{digits}");
        prop_assert!(validation::password(&pw, &pw).is_ok());
    }

    #[test]
    fn prop_phone_digit_runs(len in 9usize..=15) {
        let number = "7".repeat(len);
        prop_assert!(validation::phone_number(&number).is_ok());
        let plus = format!("+{number}");
        prop_assert!(validation::phone_number(&plus).is_ok());
    }
}
