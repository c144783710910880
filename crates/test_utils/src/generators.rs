//! Property-Based Test Generators
//!
//! Provides proptest strategies for generating random test data
//! that maintains domain invariants.

use proptest::prelude::*;

use core_kernel::{PostalCode, Sort, SortDirection, SortField};
use domain_customer::NewCustomer;

/// Strategy for 8-digit CEP strings without punctuation
pub fn cep_digits_strategy() -> impl Strategy<Value = String> {
    "[0-9]{8}"
}

/// Strategy for CEP strings in either `01001000` or `01001-000` form
pub fn cep_text_strategy() -> impl Strategy<Value = String> {
    (cep_digits_strategy(), any::<bool>()).prop_map(|(digits, dashed)| {
        if dashed {
            format!("{}-{}", &digits[..5], &digits[5..])
        } else {
            digits
        }
    })
}

/// Strategy for parsed CEPs
pub fn postal_code_strategy() -> impl Strategy<Value = PostalCode> {
    cep_digits_strategy().prop_map(|digits| {
        PostalCode::parse(&digits).expect("8 digits always parse")
    })
}

/// Strategy for customer names (never blank)
pub fn name_strategy() -> impl Strategy<Value = String> {
    ("[A-Z][a-z]{2,10}", "[A-Z][a-z]{2,12}").prop_map(|(first, last)| format!("{first} {last}"))
}

/// Strategy for sort orders
pub fn sort_strategy() -> impl Strategy<Value = Sort> {
    (
        prop_oneof![Just(SortField::Id), Just(SortField::Name)],
        prop_oneof![Just(SortDirection::Asc), Just(SortDirection::Desc)],
    )
        .prop_map(|(field, direction)| Sort { field, direction })
}

/// Strategy for customer payloads drawn from a fixed set of postal codes
pub fn new_customer_strategy(codes: Vec<PostalCode>) -> impl Strategy<Value = NewCustomer> {
    (name_strategy(), proptest::sample::select(codes))
        .prop_map(|(name, postal_code)| NewCustomer::new(name, postal_code))
}

#[cfg(test)]
mod tests {
    use super::*;

    proptest! {
        #[test]
        fn cep_text_normalizes_to_digits(text in cep_text_strategy()) {
            let code = PostalCode::parse(&text).unwrap();
            prop_assert!(code.is_cep());
            prop_assert_eq!(code.as_str(), text.replace('-', ""));
        }

        #[test]
        fn generated_names_are_valid(name in name_strategy()) {
            prop_assert!(!name.trim().is_empty());
        }
    }
}
