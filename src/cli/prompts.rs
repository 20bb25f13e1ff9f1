//! Interactive prompts using dialoguer

use anyhow::Result;
use dialoguer::{Confirm, Input, Select};

use crate::pipeline::{Attribute, WeightVector};

/// What the user chose in the weight menu
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WeightAction {
    /// Move one slider to a new raw value, then recompute
    Adjust(Attribute, f64),
    /// Leave the session
    Done,
}

/// Prompt user to confirm proceeding with an action
pub fn confirm_step(message: &str) -> Result<bool> {
    let confirmed = Confirm::new()
        .with_prompt(message)
        .default(true)
        .interact()?;
    Ok(confirmed)
}

/// Menu labels: one per attribute with its slider and weight, then "Done"
pub fn weight_menu_items(weights: &WeightVector) -> Vec<String> {
    let mut items: Vec<String> = weights
        .entries()
        .map(|(attr, raw, weight)| {
            format!(
                "{:<18} slider {:.2}  weight {:.3}",
                attr.column_name(),
                raw,
                weight
            )
        })
        .collect();
    items.push("Done".to_string());
    items
}

/// Ask which slider to move and its new value
pub fn prompt_weight_action(weights: &WeightVector) -> Result<WeightAction> {
    let items = weight_menu_items(weights);
    let selection = Select::new()
        .with_prompt("Adjust an attribute weight")
        .items(&items)
        .default(items.len() - 1)
        .interact()?;

    let Some(&attribute) = Attribute::ALL.get(selection) else {
        return Ok(WeightAction::Done);
    };

    let value: f64 = Input::new()
        .with_prompt(format!("New slider value for {} (0.0 - 1.0)", attribute))
        .with_initial_text(format!("{:.2}", weights.raw(attribute)))
        .validate_with(|v: &f64| -> Result<(), String> {
            if v.is_finite() && (0.0..=1.0).contains(v) {
                Ok(())
            } else {
                Err("value must be between 0.0 and 1.0".to_string())
            }
        })
        .interact_text()?;

    Ok(WeightAction::Adjust(attribute, value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weight_menu_items() {
        let items = weight_menu_items(&WeightVector::default());
        assert_eq!(items.len(), Attribute::ALL.len() + 1);
        assert!(items[0].starts_with("Speed"));
        assert!(items[0].contains("slider 0.50"));
        assert!(items[0].contains("weight 0.111"));
        assert_eq!(items.last().map(String::as_str), Some("Done"));
    }
}
