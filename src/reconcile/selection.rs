use crate::model::Selections;

/// Normalize any selections shape into country-sorted `(country, number)`
/// pairs. This is the single canonicalization boundary consumed by every
/// matcher; shape checks never leak into the matching logic itself.
///
/// Superball's bare number list uses the slot index as the key. Malformed
/// shapes and non-numeric entries yield an empty list, never an error.
pub fn canonical_pairs(selections: Option<&Selections>) -> Vec<(String, i64)> {
    let mut pairs: Vec<(String, i64)> = match selections {
        Some(Selections::Pairs(items)) => items
            .iter()
            .filter_map(|p| Some((p.country.clone(), p.number.as_i64()?)))
            .collect(),
        Some(Selections::ByCountry(map)) => map
            .iter()
            .filter_map(|(country, number)| Some((country.clone(), number.as_i64()?)))
            .collect(),
        Some(Selections::Numbers(numbers)) => numbers
            .iter()
            .enumerate()
            .filter_map(|(slot, number)| Some((slot.to_string(), number.as_i64()?)))
            .collect(),
        Some(Selections::Other(_)) | None => Vec::new(),
    };
    pairs.sort();
    pairs
}

/// Canonical serialization of the pairs, used for content-equality
/// matching between a ticket and a win's selections snapshot.
pub fn canonical_key(selections: Option<&Selections>) -> String {
    canonical_pairs(selections)
        .iter()
        .map(|(country, number)| format!("{country}:{number}"))
        .collect::<Vec<_>>()
        .join("|")
}

/// The bare numeric values of a selection, country-blind.
pub fn selection_numbers(selections: Option<&Selections>) -> Vec<i64> {
    canonical_pairs(selections)
        .into_iter()
        .map(|(_, number)| number)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{canonical_key, canonical_pairs, selection_numbers};
    use crate::model::Selections;

    fn parse(json: &str) -> Selections {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn array_and_map_shapes_canonicalize_identically() {
        let pairs = parse(r#"[{"country":"IT","number":42},{"country":"DE","number":7}]"#);
        let map = parse(r#"{"DE":7,"IT":42}"#);
        assert_eq!(canonical_key(Some(&pairs)), canonical_key(Some(&map)));
        assert_eq!(canonical_pairs(Some(&pairs)), vec![("DE".to_string(), 7), ("IT".to_string(), 42)]);
    }

    #[test]
    fn string_numbers_are_coerced() {
        let map = parse(r#"{"IT":"42"}"#);
        assert_eq!(canonical_pairs(Some(&map)), vec![("IT".to_string(), 42)]);
    }

    #[test]
    fn bare_number_list_keys_by_slot() {
        let numbers = parse(r#"[3,"7",9]"#);
        assert_eq!(selection_numbers(Some(&numbers)), vec![3, 7, 9]);
        assert_eq!(canonical_key(Some(&numbers)), "0:3|1:7|2:9");
    }

    #[test]
    fn malformed_shapes_degrade_to_empty() {
        let junk = parse(r#"{"nested":{"deep":true}}"#);
        assert!(canonical_pairs(Some(&junk)).is_empty());
        assert_eq!(canonical_key(Some(&junk)), "");
        assert!(canonical_pairs(None).is_empty());
    }
}
