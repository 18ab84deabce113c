//! Property-based tests for the comparator and the LDIF codec.
//!
//! Uses proptest to generate entry sets with unique DNs, arbitrary attribute
//! names and values (including binary ones) and checks the invariants the
//! harness relies on.

use ldapunit::compare::{CompareOptions, ValueOrder, assert_entries_match, assert_entries_match_with};
use ldapunit::access::{DirectoryServerAccess, StandardDirectoryAccess};
use ldapunit::directory::{DirectoryServer, InMemoryDirectoryServer};
use ldapunit::entry::{Attribute, DirectoryEntry};
use ldapunit::ldif::{self, ENTRY_SEPARATOR};
use proptest::prelude::*;
use std::collections::BTreeSet;

/// Strategy for attribute names as they appear in real schemas
fn attribute_name_strategy() -> impl Strategy<Value = String> {
    prop::sample::select(vec![
        "cn", "sn", "mail", "objectClass", "description", "telephoneNumber", "jpegPhoto",
        "userPassword", "ou",
    ])
    .prop_map(str::to_string)
}

/// Plain text values, occasionally with characters that force base64
fn text_value_strategy() -> impl Strategy<Value = Vec<u8>> + Clone {
    prop_oneof![
        "[a-zA-Z0-9 .@-]{1,40}".prop_map(String::into_bytes),
        "[ :<][a-z]{0,10}".prop_map(String::into_bytes),
        "[a-z]{1,10} ".prop_map(String::into_bytes),
        "[a-zäöüé]{1,20}".prop_map(String::into_bytes),
    ]
}

fn binary_value_strategy() -> impl Strategy<Value = Vec<u8>> + Clone {
    prop::collection::vec(any::<u8>(), 1..64)
}

fn attributes_strategy(
    values: impl Strategy<Value = Vec<u8>> + Clone,
) -> impl Strategy<Value = Vec<Attribute>> {
    prop::collection::btree_map(
        attribute_name_strategy(),
        prop::collection::vec(values, 1..4),
        1..6,
    )
    .prop_map(|map| {
        map.into_iter()
            .map(|(name, values)| Attribute::with_values(name, values))
            .collect()
    })
}

fn entry_set_strategy(
    values: impl Strategy<Value = Vec<u8>> + Clone + 'static,
) -> impl Strategy<Value = Vec<DirectoryEntry>> {
    prop::collection::btree_set("[a-z][a-z0-9]{0,8}", 0..12).prop_flat_map(
        move |names: BTreeSet<String>| {
            let count = names.len();
            (
                Just(names),
                prop::collection::vec(attributes_strategy(values.clone()), count),
            )
                .prop_map(|(names, attribute_sets)| {
                    names
                        .into_iter()
                        .zip(attribute_sets)
                        .map(|(name, attributes)| {
                            let mut entry =
                                DirectoryEntry::new(format!("cn={},dc=example,dc=com", name));
                            entry.attributes_mut().extend(attributes);
                            entry
                        })
                        .collect()
                })
        },
    )
}

proptest! {
    #[test]
    fn prop_set_matches_itself(entries in entry_set_strategy(text_value_strategy())) {
        prop_assert_eq!(assert_entries_match(entries.clone(), entries), Ok(()));
    }

    #[test]
    fn prop_permutation_independence(
        (entries, shuffled) in entry_set_strategy(text_value_strategy())
            .prop_flat_map(|entries| (Just(entries.clone()), Just(entries).prop_shuffle()))
    ) {
        let shuffled: Vec<DirectoryEntry> = shuffled
            .into_iter()
            .map(|entry| {
                let (dn, mut attributes) = entry.into_parts();
                attributes.reverse();
                let mut entry = DirectoryEntry::new(dn);
                entry.attributes_mut().extend(attributes);
                entry
            })
            .collect();
        prop_assert_eq!(assert_entries_match(entries, shuffled), Ok(()));
    }

    #[test]
    fn prop_text_round_trip(entries in entry_set_strategy(text_value_strategy())) {
        let bytes = ldif::to_bytes(&entries);
        prop_assert_eq!(ldif::read_entries(bytes.as_slice()).unwrap(), entries);
    }

    #[test]
    fn prop_binary_round_trip(entries in entry_set_strategy(binary_value_strategy())) {
        let bytes = ldif::to_bytes(&entries);
        prop_assert_eq!(ldif::read_entries(bytes.as_slice()).unwrap(), entries);
    }

    #[test]
    fn prop_imported_set_matches_server_contents(
        entries in entry_set_strategy(binary_value_strategy())
    ) {
        tokio_test::block_on(async {
            let server = InMemoryDirectoryServer::builder("dc=example,dc=com").build().unwrap();
            server
                .add_entry(DirectoryEntry::new("dc=example,dc=com").with_attribute("dc", "example"))
                .await
                .unwrap();
            let access = StandardDirectoryAccess::for_in_memory(server);

            access.import_ldif(ldif::to_bytes(&entries).as_slice()).await.unwrap();
            access.compare_contents(ldif::to_bytes(&entries).as_slice()).await.unwrap();
        });
    }

    #[test]
    fn prop_concatenation_adds_counts(
        first in entry_set_strategy(text_value_strategy()),
        second in entry_set_strategy(text_value_strategy()),
        trim_trailing_newlines in any::<bool>(),
    ) {
        let mut joined = ldif::to_bytes(&first);
        if trim_trailing_newlines {
            while joined.last() == Some(&b'\n') {
                joined.pop();
            }
        }
        joined.extend_from_slice(ENTRY_SEPARATOR);
        joined.extend_from_slice(&ldif::to_bytes(&second));
        joined.extend_from_slice(ENTRY_SEPARATOR);

        let decoded = ldif::read_entries(joined.as_slice()).unwrap();
        prop_assert_eq!(decoded.len(), first.len() + second.len());
    }

    #[test]
    fn prop_value_order_only_matters_when_ordered(
        values in prop::collection::btree_set("[a-z]{1,8}", 2..5)
    ) {
        let values: Vec<String> = values.into_iter().collect();
        let mut reversed = values.clone();
        reversed.reverse();

        let mut expected = vec![DirectoryEntry::new("cn=a,dc=example,dc=com")];
        expected[0].attributes_mut().push(Attribute::with_values("mail", values));
        let mut actual = vec![DirectoryEntry::new("cn=a,dc=example,dc=com")];
        actual[0].attributes_mut().push(Attribute::with_values("mail", reversed));

        prop_assert!(assert_entries_match(expected.clone(), actual.clone()).is_ok());
        let ordered = CompareOptions::default().with_value_order(ValueOrder::Ordered);
        prop_assert!(assert_entries_match_with(expected, actual, &ordered).is_err());
    }
}
