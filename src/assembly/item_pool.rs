//! Accommodation-driven item eligibility.
//!
//! Only the constraints tied to one of the examinee's approved accommodations
//! apply. An item is eligible when it carries the property of at least one
//! applicable inclusive constraint and none of the applicable exclusive ones.
//! With no applicable inclusive constraint, every item passes that check.

use crate::core::{Accommodation, Item, ItemConstraint};

/// Filter `items` down to the ones eligible for an examinee.
///
/// `field_test` additionally restricts the result to items whose field-test
/// flag equals the filter.
pub fn eligible_items<'a, I>(
    accommodations: &[Accommodation],
    constraints: &[ItemConstraint],
    items: I,
    field_test: Option<bool>,
) -> Vec<&'a Item>
where
    I: IntoIterator<Item = &'a Item>,
{
    let (inclusive, exclusive): (Vec<&ItemConstraint>, Vec<&ItemConstraint>) = constraints
        .iter()
        .filter(|constraint| accommodations.iter().any(|a| constraint.applies_to(a)))
        .partition(|constraint| constraint.inclusive);

    items
        .into_iter()
        .filter(|item| field_test.is_none_or(|wanted| item.field_test == wanted))
        .filter(|item| {
            inclusive.is_empty() || inclusive.iter().any(|constraint| constraint.matches(item))
        })
        .filter(|item| !exclusive.iter().any(|constraint| constraint.matches(item)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::ItemBuilder;

    fn constraint(
        tool: &str,
        value: &str,
        prop: &str,
        prop_value: &str,
        inclusive: bool,
    ) -> ItemConstraint {
        ItemConstraint {
            tool_type: tool.into(),
            tool_value: value.into(),
            property_name: prop.into(),
            property_value: prop_value.into(),
            inclusive,
        }
    }

    fn ids(items: &[&Item]) -> Vec<String> {
        items.iter().map(|item| item.id.clone()).collect()
    }

    #[test]
    fn test_inclusive_constraint_requires_matching_property() {
        let items = vec![
            ItemBuilder::new("en").language("ENU").build(),
            ItemBuilder::new("es").language("ESN").build(),
        ];
        let constraints = vec![constraint("Language", "ESN", "Language", "ESN", true)];
        let accommodations = vec![Accommodation::new("Language", "ESN")];

        let eligible = eligible_items(&accommodations, &constraints, &items, None);
        assert_eq!(ids(&eligible), vec!["es"]);
    }

    #[test]
    fn test_constraints_without_matching_accommodation_do_not_apply() {
        let items = vec![ItemBuilder::new("en").language("ENU").build()];
        let constraints = vec![constraint("Language", "ESN", "Language", "ESN", true)];
        let accommodations = vec![Accommodation::new("Language", "ENU")];

        let eligible = eligible_items(&accommodations, &constraints, &items, None);
        assert_eq!(ids(&eligible), vec!["en"]);
    }

    #[test]
    fn test_exclusive_constraint_removes_matching_items() {
        let items = vec![
            ItemBuilder::new("plain").language("ENU").build(),
            ItemBuilder::new("audio")
                .language("ENU")
                .property("Audio", "Required")
                .build(),
        ];
        let constraints = vec![
            constraint("Language", "ENU", "Language", "ENU", true),
            constraint("TTS", "TDS_TTS0", "audio", "Required", false),
        ];
        let accommodations = vec![
            Accommodation::new("Language", "ENU"),
            Accommodation::new("tts", "TDS_TTS0"),
        ];

        let eligible = eligible_items(&accommodations, &constraints, &items, None);
        assert_eq!(ids(&eligible), vec!["plain"]);
    }

    #[test]
    fn test_property_value_match_is_case_sensitive() {
        let items = vec![ItemBuilder::new("en").language("enu").build()];
        let constraints = vec![constraint("Language", "ENU", "LANGUAGE", "ENU", true)];
        let accommodations = vec![Accommodation::new("Language", "ENU")];

        assert!(eligible_items(&accommodations, &constraints, &items, None).is_empty());
    }

    #[test]
    fn test_field_test_filter() {
        let items = vec![
            ItemBuilder::new("op").build(),
            ItemBuilder::new("ft").field_test().build(),
        ];
        let only_ft = eligible_items(&[], &[], &items, Some(true));
        assert_eq!(ids(&only_ft), vec!["ft"]);
        let only_op = eligible_items(&[], &[], &items, Some(false));
        assert_eq!(ids(&only_op), vec!["op"]);
        assert_eq!(eligible_items(&[], &[], &items, None).len(), 2);
    }

    #[test]
    fn test_any_applicable_inclusive_constraint_admits_an_item() {
        let items = vec![
            ItemBuilder::new("en").language("ENU").build(),
            ItemBuilder::new("braille")
                .language("ESN")
                .property("Braille", "Yes")
                .build(),
            ItemBuilder::new("neither").language("ESN").build(),
        ];
        let constraints = vec![
            constraint("Language", "ENU", "Language", "ENU", true),
            constraint("Braille Type", "TDS_BT_G1", "Braille", "Yes", true),
        ];
        let accommodations = vec![
            Accommodation::new("Language", "ENU"),
            Accommodation::new("Braille Type", "TDS_BT_G1"),
        ];

        let eligible = eligible_items(&accommodations, &constraints, &items, None);
        assert_eq!(ids(&eligible), vec!["en", "braille"]);
    }

    #[test]
    fn test_no_applicable_inclusive_constraint_keeps_every_item() {
        let items = vec![
            ItemBuilder::new("en").language("ENU").build(),
            ItemBuilder::new("audio")
                .language("ESN")
                .property("Audio", "Required")
                .build(),
        ];
        let constraints = vec![
            constraint("Language", "FRN", "Language", "FRN", true),
            constraint("TTS", "TDS_TTS0", "Audio", "Required", false),
        ];
        let accommodations = vec![Accommodation::new("TTS", "TDS_TTS0")];

        let eligible = eligible_items(&accommodations, &constraints, &items, None);
        assert_eq!(ids(&eligible), vec!["en"]);
    }
}
