//! Customer service behaviour over the in-memory ports

use proptest::prelude::*;

use core_kernel::{CustomerId, PageRequest, Sort, SortField};
use domain_customer::ports::mock::ScriptedFailure;
use domain_customer::{AddressStore, CustomerPatch, CustomerStore, LookupFailureKind, NewCustomer, UpdateOutcome};
use test_utils::{
    assert_lookup_failed, assert_not_found, assert_page_shape, assert_sorted_by_name,
    assert_validation_error, cep_digits_strategy, new_customer_strategy, sort_strategy,
    AddressFixtures, CustomerFixtures, MockedCustomerService, MockedCustomerServiceBuilder,
    NewCustomerBuilder, PostalCodeFixtures,
};

mod resolution {
    use super::*;

    #[tokio::test]
    async fn test_second_resolve_served_from_store() {
        let mocked = MockedCustomerService::new().await;
        let code = PostalCodeFixtures::se();

        let first = mocked.service.resolver().resolve(&code).await.unwrap();
        let second = mocked.service.resolver().resolve(&code).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(mocked.provider.calls_for(&code).await, 1);
    }

    #[tokio::test]
    async fn test_force_sync_always_calls_provider() {
        let mocked = MockedCustomerServiceBuilder::new()
            .with_stored(vec![AddressFixtures::se()])
            .build()
            .await;
        let code = PostalCodeFixtures::se();
        let mut renamed = AddressFixtures::se();
        renamed.street = "Praça da Sé (renomeada)".to_string();
        mocked.provider.set_address(renamed.clone()).await;

        let synced = mocked.service.sync_address(&code).await.unwrap();
        let resolved = mocked.service.resolver().resolve(&code).await.unwrap();

        assert_eq!(synced, renamed);
        assert_eq!(resolved, renamed);
        assert_eq!(mocked.provider.calls_for(&code).await, 1);
    }

    #[tokio::test]
    async fn test_lookup_only_leaves_store_untouched() {
        let mocked = MockedCustomerService::new().await;

        let address = mocked
            .service
            .lookup_address(&PostalCodeFixtures::paulista())
            .await
            .unwrap();

        assert_eq!(address.street, "Avenida Paulista");
        assert!(mocked.addresses.is_empty().await);
        assert_not_found(
            &mocked
                .service
                .stored_address(&PostalCodeFixtures::paulista())
                .await,
        );
    }

    #[tokio::test]
    async fn test_unknown_code_fails_lookup() {
        let mocked = MockedCustomerService::new().await;

        let result = mocked
            .service
            .resolver()
            .resolve(&PostalCodeFixtures::unknown())
            .await;

        assert_lookup_failed(&result, LookupFailureKind::UnknownPostalCode);
        assert!(mocked.addresses.is_empty().await);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn resolve_fills_cache_once(digits in cep_digits_strategy()) {
            let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
            runtime.block_on(async {
                let code = core_kernel::PostalCode::parse(&digits).unwrap();
                let upstream = domain_customer::Address::new(code.clone()).with_street("Rua A");
                let mocked = MockedCustomerServiceBuilder::new()
                    .with_upstream(vec![upstream])
                    .build()
                    .await;

                let first = mocked.service.resolver().resolve(&code).await.unwrap();
                let second = mocked.service.resolver().resolve(&code).await.unwrap();

                assert_eq!(first, second);
                assert_eq!(mocked.provider.call_count().await, 1);
                assert_eq!(mocked.addresses.save_count(), 1);
            });
        }
    }
}

mod create {
    use super::*;

    #[tokio::test]
    async fn test_create_customer_scenario() {
        let mocked = MockedCustomerService::new().await;

        let customer = mocked.service.insert(CustomerFixtures::alice()).await.unwrap();

        assert_eq!(customer.name, "Alice");
        assert_eq!(customer.address.postal_code.as_str(), "00000");
        assert_eq!(customer.address.street, "Main St");
        assert_eq!(mocked.addresses.len().await, 1);
        assert!(mocked
            .addresses
            .get(&PostalCodeFixtures::springfield())
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn test_shared_postal_code_looked_up_once() {
        let mocked = MockedCustomerService::new().await;

        mocked.service.insert(CustomerFixtures::alice()).await.unwrap();
        assert_eq!(mocked.provider.call_count().await, 1);
        assert_eq!(mocked.addresses.save_count(), 1);

        let second = NewCustomerBuilder::new()
            .with_postal_code(PostalCodeFixtures::springfield())
            .build();
        mocked.service.insert(second).await.unwrap();

        assert_eq!(mocked.provider.call_count().await, 1);
        assert_eq!(mocked.addresses.save_count(), 1);
        assert_eq!(mocked.addresses.len().await, 1);
    }

    #[tokio::test]
    async fn test_failed_lookup_creates_nothing() {
        let mocked = MockedCustomerService::new().await;

        let result = mocked
            .service
            .insert(NewCustomer::new("Dave", PostalCodeFixtures::malformed()))
            .await;

        assert_lookup_failed(&result, LookupFailureKind::MalformedPostalCode);
        assert!(mocked.customers.is_empty().await);
    }

    #[tokio::test]
    async fn test_blank_name_rejected_before_lookup() {
        let mocked = MockedCustomerService::new().await;

        let result = mocked
            .service
            .insert(NewCustomer::new("   ", PostalCodeFixtures::se()))
            .await;

        assert_validation_error(&result);
        assert_eq!(mocked.provider.call_count().await, 0);
    }
}

mod update {
    use super::*;

    #[tokio::test]
    async fn test_update_replaces_name_and_address() {
        let mocked = MockedCustomerService::new().await;
        let alice = mocked.service.insert(CustomerFixtures::alice()).await.unwrap();

        let outcome = mocked
            .service
            .update(alice.id, NewCustomer::new("Alicia", PostalCodeFixtures::se()))
            .await
            .unwrap();

        let updated = outcome.into_customer().unwrap();
        assert_eq!(updated.id, alice.id);
        assert_eq!(updated.name, "Alicia");
        assert_eq!(updated.address, AddressFixtures::se());
    }

    #[tokio::test]
    async fn test_update_missing_id_is_silent_not_found() {
        let mocked = MockedCustomerService::new().await;
        mocked.service.insert(CustomerFixtures::alice()).await.unwrap();
        let before = mocked.service.find_all().await.unwrap();

        let outcome = mocked
            .service
            .update(CustomerId::new(999), CustomerFixtures::bob())
            .await
            .unwrap();

        assert_eq!(outcome, UpdateOutcome::NotFound);
        assert_eq!(mocked.service.find_all().await.unwrap(), before);
        assert!(mocked.customers.get(CustomerId::new(999)).await.unwrap().is_none());
        // Bob's code was never resolved
        assert_eq!(mocked.provider.calls_for(&PostalCodeFixtures::se()).await, 0);
    }

    #[tokio::test]
    async fn test_update_missing_id_skips_validation() {
        let mocked = MockedCustomerService::new().await;

        let outcome = mocked
            .service
            .update(
                CustomerId::new(999),
                NewCustomer::new("", PostalCodeFixtures::springfield()),
            )
            .await
            .unwrap();

        assert_eq!(outcome, UpdateOutcome::NotFound);
        assert!(mocked.customers.is_empty().await);
        assert_eq!(mocked.provider.call_count().await, 0);
    }

    #[tokio::test]
    async fn test_update_existing_id_still_validates() {
        let mocked = MockedCustomerService::new().await;
        let alice = mocked.service.insert(CustomerFixtures::alice()).await.unwrap();

        let result = mocked
            .service
            .update(alice.id, NewCustomer::new("  ", PostalCodeFixtures::se()))
            .await;

        assert_validation_error(&result);
        assert_eq!(mocked.service.find_by_id(alice.id).await.unwrap(), alice);
    }
}

mod partial_update {
    use super::*;

    #[tokio::test]
    async fn test_name_patch_keeps_address() {
        let mocked = MockedCustomerService::new().await;
        let alice = mocked.service.insert(CustomerFixtures::alice()).await.unwrap();

        let patched = mocked
            .service
            .partial_update(alice.id, CustomerPatch::name("X"))
            .await
            .unwrap();

        assert_eq!(patched.name, "X");
        assert_eq!(patched.address, alice.address);
        assert_eq!(mocked.provider.call_count().await, 1);
    }

    #[tokio::test]
    async fn test_address_patch_resolves_new_code() {
        let mocked = MockedCustomerService::new().await;
        let alice = mocked.service.insert(CustomerFixtures::alice()).await.unwrap();

        let patched = mocked
            .service
            .partial_update(alice.id, CustomerPatch::postal_code("01310-100"))
            .await
            .unwrap();

        assert_eq!(patched.name, "Alice");
        assert_eq!(patched.address, AddressFixtures::paulista());
        assert!(mocked
            .addresses
            .get(&PostalCodeFixtures::paulista())
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn test_failed_address_patch_leaves_customer_unchanged() {
        let mocked = MockedCustomerService::new().await;
        let alice = mocked.service.insert(CustomerFixtures::alice()).await.unwrap();

        let patch = CustomerPatch {
            name: Some("Renamed".to_string()),
            ..CustomerPatch::postal_code("Z")
        };
        let result = mocked.service.partial_update(alice.id, patch).await;

        assert_lookup_failed(&result, LookupFailureKind::MalformedPostalCode);
        assert_eq!(mocked.service.find_by_id(alice.id).await.unwrap(), alice);
    }

    #[tokio::test]
    async fn test_patch_of_missing_customer_is_not_found() {
        let mocked = MockedCustomerService::new().await;

        let result = mocked
            .service
            .partial_update(CustomerId::new(42), CustomerPatch::name("X"))
            .await;

        assert_not_found(&result);
    }
}

mod batch {
    use super::*;

    #[tokio::test]
    async fn test_batch_with_failing_code_persists_nothing() {
        let mocked = MockedCustomerServiceBuilder::new()
            .with_failure(PostalCodeFixtures::paulista(), ScriptedFailure::Unavailable)
            .build()
            .await;

        let result = mocked
            .service
            .batch_insert(vec![CustomerFixtures::alice(), CustomerFixtures::carol()])
            .await;

        assert_lookup_failed(&result, LookupFailureKind::ProviderUnavailable);
        assert!(mocked.customers.is_empty().await);
    }

    #[tokio::test]
    async fn test_batch_resolves_each_code_once() {
        let mocked = MockedCustomerService::new().await;
        let mut batch = NewCustomerBuilder::new()
            .with_postal_code(PostalCodeFixtures::se())
            .build_many(3);
        batch.push(CustomerFixtures::alice());

        let created = mocked.service.batch_insert(batch).await.unwrap();

        assert_eq!(created.len(), 4);
        assert_eq!(mocked.provider.calls_for(&PostalCodeFixtures::se()).await, 1);
        assert_eq!(mocked.addresses.len().await, 2);
        assert_eq!(created[3].name, "Alice");
    }

    #[tokio::test]
    async fn test_batch_with_blank_name_persists_nothing() {
        let mocked = MockedCustomerService::new().await;

        let result = mocked
            .service
            .batch_insert(vec![
                CustomerFixtures::alice(),
                NewCustomer::new("", PostalCodeFixtures::se()),
            ])
            .await;

        assert_validation_error(&result);
        assert!(mocked.customers.is_empty().await);
        assert_eq!(mocked.provider.call_count().await, 0);
    }
}

mod delete {
    use super::*;

    #[tokio::test]
    async fn test_delete_keeps_shared_address() {
        let mocked = MockedCustomerService::new().await;
        let alice = mocked.service.insert(CustomerFixtures::alice()).await.unwrap();

        mocked.service.delete(alice.id).await.unwrap();

        assert_not_found(&mocked.service.find_by_id(alice.id).await);
        assert_eq!(mocked.addresses.len().await, 1);
    }

    #[tokio::test]
    async fn test_delete_missing_is_a_no_op() {
        let mocked = MockedCustomerService::new().await;
        let alice = mocked.service.insert(CustomerFixtures::alice()).await.unwrap();

        mocked.service.delete(CustomerId::new(alice.id.value() + 1)).await.unwrap();

        assert_eq!(mocked.service.find_all().await.unwrap(), vec![alice]);
    }
}

mod queries {
    use super::*;

    async fn seeded() -> MockedCustomerService {
        let mocked = MockedCustomerService::new().await;
        for name in ["carol", "Alice", "bob", "Alfred", "Dora"] {
            mocked
                .service
                .insert(NewCustomer::new(name, PostalCodeFixtures::springfield()))
                .await
                .unwrap();
        }
        mocked
    }

    #[tokio::test]
    async fn test_paginated_by_name() {
        let mocked = seeded().await;
        let request = PageRequest::new(0, 2, Sort::asc(SortField::Name)).unwrap();

        let page = mocked.service.find_paginated(&request).await.unwrap();

        assert_page_shape(&page, 2, 5, 3);
        assert_eq!(page.items[0].name, "Alfred");
        assert_eq!(page.items[1].name, "Alice");
        assert_sorted_by_name(&page.items);
    }

    #[tokio::test]
    async fn test_last_page_is_partial() {
        let mocked = seeded().await;
        let request = PageRequest::new(2, 2, Sort::default()).unwrap();

        let page = mocked.service.find_paginated(&request).await.unwrap();

        assert_page_shape(&page, 1, 5, 3);
        assert!(page.is_last());
    }

    #[tokio::test]
    async fn test_name_search_ignores_case() {
        let mocked = seeded().await;
        let request = PageRequest::new(0, 10, Sort::asc(SortField::Name)).unwrap();

        let page = mocked
            .service
            .find_by_name_contains("AL", &request)
            .await
            .unwrap();

        let names: Vec<_> = page.items.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Alfred", "Alice"]);
    }

    fn fixture_codes() -> Vec<core_kernel::PostalCode> {
        AddressFixtures::all()
            .into_iter()
            .map(|address| address.postal_code)
            .collect()
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(24))]

        #[test]
        fn pages_cover_batch_exactly_once(
            batch in proptest::collection::vec(new_customer_strategy(fixture_codes()), 1..12),
            sort in sort_strategy(),
            size in 1u32..5,
        ) {
            let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
            runtime.block_on(async {
                let mocked = MockedCustomerService::new().await;
                let created = mocked.service.batch_insert(batch.clone()).await.unwrap();

                let distinct: std::collections::HashSet<_> =
                    batch.iter().map(|new| new.postal_code.clone()).collect();
                assert_eq!(mocked.provider.call_count().await, distinct.len());

                let mut seen = Vec::new();
                let mut page_number = 0;
                loop {
                    let request = PageRequest::new(page_number, size, sort).unwrap();
                    let page = mocked.service.find_paginated(&request).await.unwrap();
                    assert_eq!(page.total_elements, created.len() as u64);
                    seen.extend(page.items.iter().map(|customer| customer.id));
                    if page.is_last() {
                        break;
                    }
                    page_number += 1;
                }

                let mut expected: Vec<_> = created.iter().map(|customer| customer.id).collect();
                seen.sort();
                expected.sort();
                assert_eq!(seen, expected);
            });
        }
    }

    #[tokio::test]
    async fn test_find_all_in_id_order() {
        let mocked = seeded().await;

        let all = mocked.service.find_all().await.unwrap();

        assert_eq!(all.len(), 5);
        assert!(all.windows(2).all(|w| w[0].id < w[1].id));
    }
}
