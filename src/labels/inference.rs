//! Automatic label inference for composite items
//!
//! A recipe inherits the food groups of its ingredients and earns a diet
//! form only when none of its ingredients carries a food group that rules
//! that diet out.

use std::collections::BTreeSet;

use super::label::Label;

/// Diet forms with their disqualifying food groups. Keto and Paleo have no
/// rule and are only ever set by hand.
const CONFLICT_RULES: &[(Label, &[Label])] = &[
    (
        Label::Vegan,
        &[Label::Meat, Label::Fish, Label::Dairy, Label::Cheese, Label::Eggs],
    ),
    (Label::Vegetarian, &[Label::Meat, Label::Fish]),
    (Label::GlutenFree, &[Label::Grains]),
    (Label::LactoseFree, &[Label::Dairy, Label::Cheese]),
];

/// Food groups that invalidate `label`; empty for labels without a rule
pub fn conflicts_for(label: Label) -> &'static [Label] {
    CONFLICT_RULES
        .iter()
        .find(|(diet, _)| *diet == label)
        .map(|(_, conflicts)| *conflicts)
        .unwrap_or(&[])
}

/// Diet forms that can be inferred automatically
pub fn inferable_diet_forms() -> impl Iterator<Item = Label> {
    CONFLICT_RULES.iter().map(|(diet, _)| *diet)
}

fn violates(labels: &BTreeSet<Label>, conflicts: &[Label]) -> bool {
    conflicts.iter().any(|c| labels.contains(c))
}

/// Derive the automatic label set of a composite from its constituents
///
/// Food groups present on any constituent are carried over. A ruled diet
/// form is added when no constituent carries one of its conflicting food
/// groups. Empty input yields an empty set.
pub fn infer_automatic_labels(constituents: &[BTreeSet<Label>]) -> BTreeSet<Label> {
    if constituents.is_empty() {
        return BTreeSet::new();
    }

    let mut result: BTreeSet<Label> = constituents
        .iter()
        .flatten()
        .copied()
        .filter(Label::is_food_group)
        .collect();

    for (diet, conflicts) in CONFLICT_RULES {
        if !constituents.iter().any(|set| violates(set, conflicts)) {
            result.insert(*diet);
        }
    }

    result
}

/// Combine automatic and user-chosen labels
///
/// A ruled diet form is dropped whenever the union holds one of its
/// conflicting food groups, even if the user picked it.
pub fn merge_labels(automatic: &BTreeSet<Label>, manual: &BTreeSet<Label>) -> BTreeSet<Label> {
    let union: BTreeSet<Label> = automatic.union(manual).copied().collect();

    let stripped: Vec<Label> = CONFLICT_RULES
        .iter()
        .filter(|(_, conflicts)| violates(&union, conflicts))
        .map(|(diet, _)| *diet)
        .collect();

    union
        .into_iter()
        .filter(|label| !stripped.contains(label))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(labels: &[Label]) -> BTreeSet<Label> {
        labels.iter().copied().collect()
    }

    #[test]
    fn test_meat_and_vegetables_is_not_vegetarian() {
        let result = infer_automatic_labels(&[set(&[Label::Meat]), set(&[Label::Vegetables])]);
        assert!(result.contains(&Label::Meat));
        assert!(result.contains(&Label::Vegetables));
        assert!(!result.contains(&Label::Vegan));
        assert!(!result.contains(&Label::Vegetarian));
        // no grains or dairy, so these still hold
        assert!(result.contains(&Label::GlutenFree));
        assert!(result.contains(&Label::LactoseFree));
    }

    #[test]
    fn test_plants_only_is_vegan_and_vegetarian() {
        let result = infer_automatic_labels(&[set(&[Label::Vegetables]), set(&[Label::Fruits])]);
        assert!(result.contains(&Label::Vegan));
        assert!(result.contains(&Label::Vegetarian));
        assert_eq!(
            result,
            set(&[
                Label::Vegan,
                Label::Vegetarian,
                Label::GlutenFree,
                Label::LactoseFree,
                Label::Vegetables,
                Label::Fruits,
            ])
        );
    }

    #[test]
    fn test_empty_input_is_empty() {
        assert!(infer_automatic_labels(&[]).is_empty());
    }

    #[test]
    fn test_keto_and_paleo_never_inferred() {
        let result = infer_automatic_labels(&[set(&[Label::Keto, Label::Paleo, Label::Meat])]);
        assert!(!result.contains(&Label::Keto));
        assert!(!result.contains(&Label::Paleo));
    }

    #[test]
    fn test_only_food_groups_propagate() {
        let result = infer_automatic_labels(&[set(&[
            Label::HighProtein,
            Label::Breakfast,
            Label::Baked,
            Label::Eggs,
        ])]);
        assert!(result.contains(&Label::Eggs));
        assert!(!result.contains(&Label::HighProtein));
        assert!(!result.contains(&Label::Breakfast));
        assert!(!result.contains(&Label::Baked));
    }

    #[test]
    fn test_dairy_blocks_vegan_and_lactose_free_but_not_vegetarian() {
        let result = infer_automatic_labels(&[set(&[Label::Dairy]), set(&[Label::Grains])]);
        assert!(!result.contains(&Label::Vegan));
        assert!(!result.contains(&Label::LactoseFree));
        assert!(!result.contains(&Label::GlutenFree));
        assert!(result.contains(&Label::Vegetarian));
    }

    #[test]
    fn test_result_iterates_in_declaration_order() {
        let result = infer_automatic_labels(&[set(&[Label::Nuts, Label::Fruits])]);
        let order: Vec<Label> = result.into_iter().collect();
        let mut expected = order.clone();
        expected.sort();
        assert_eq!(order, expected);
        assert_eq!(order.first(), Some(&Label::Vegan));
    }

    #[test]
    fn test_manual_vegan_without_conflict_is_kept() {
        assert_eq!(merge_labels(&set(&[]), &set(&[Label::Vegan])), set(&[Label::Vegan]));
    }

    #[test]
    fn test_manual_vegan_with_meat_is_stripped() {
        assert_eq!(
            merge_labels(&set(&[Label::Meat]), &set(&[Label::Vegan])),
            set(&[Label::Meat])
        );
    }

    #[test]
    fn test_manual_conflict_also_strips_automatic_diet() {
        // user adds CHEESE to an automatically vegan recipe
        let automatic = set(&[Label::Vegan, Label::Vegetarian, Label::Vegetables]);
        let merged = merge_labels(&automatic, &set(&[Label::Cheese, Label::Dinner]));
        assert_eq!(
            merged,
            set(&[Label::Vegetarian, Label::Vegetables, Label::Cheese, Label::Dinner])
        );
    }

    #[test]
    fn test_manual_keto_survives_any_union() {
        let merged = merge_labels(&set(&[Label::Meat, Label::Dairy]), &set(&[Label::Keto]));
        assert!(merged.contains(&Label::Keto));
    }

    #[test]
    fn test_conflicts_for() {
        assert_eq!(conflicts_for(Label::Vegetarian), &[Label::Meat, Label::Fish]);
        assert!(conflicts_for(Label::Keto).is_empty());
        assert!(conflicts_for(Label::Meat).is_empty());
        assert_eq!(inferable_diet_forms().count(), 4);
    }
}
