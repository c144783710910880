//! Custom Test Assertions
//!
//! Provides specialized assertion helpers for domain results that give
//! more meaningful error messages than standard assertions.

use core_kernel::Page;
use domain_customer::{Customer, CustomerError, LookupFailureKind};

/// Asserts that a result failed as `NotFound`
///
/// # Panics
///
/// Panics if the result is `Ok` or a different error
pub fn assert_not_found<T: std::fmt::Debug>(result: &Result<T, CustomerError>) {
    match result {
        Err(CustomerError::NotFound { .. }) => {}
        other => panic!("Expected NotFound, got {:?}", other),
    }
}

/// Asserts that a result failed as `Validation`
pub fn assert_validation_error<T: std::fmt::Debug>(result: &Result<T, CustomerError>) {
    match result {
        Err(CustomerError::Validation(_)) => {}
        other => panic!("Expected Validation error, got {:?}", other),
    }
}

/// Asserts that a result failed as `LookupFailed` with the given kind
pub fn assert_lookup_failed<T: std::fmt::Debug>(
    result: &Result<T, CustomerError>,
    expected: LookupFailureKind,
) {
    match result {
        Err(CustomerError::LookupFailed { kind, .. }) => assert_eq!(
            *kind, expected,
            "Lookup failed for the wrong reason: actual={}, expected={}",
            kind, expected
        ),
        other => panic!("Expected LookupFailed({}), got {:?}", expected, other),
    }
}

/// Asserts that customers appear in ascending, case-insensitive name order
pub fn assert_sorted_by_name(customers: &[Customer]) {
    for pair in customers.windows(2) {
        assert!(
            pair[0].name.to_lowercase() <= pair[1].name.to_lowercase(),
            "Customers out of name order: '{}' before '{}'",
            pair[0].name,
            pair[1].name
        );
    }
}

/// Asserts the paging metadata of a page
pub fn assert_page_shape<T>(page: &Page<T>, items: usize, total_elements: u64, total_pages: u64) {
    assert_eq!(page.items.len(), items, "Unexpected number of items on page");
    assert_eq!(page.total_elements, total_elements, "Unexpected total elements");
    assert_eq!(page.total_pages, total_pages, "Unexpected total pages");
}
