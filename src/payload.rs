//! Parsing and validation of the multipart create-recipe form.
//!
//! Everything arrives as text: scalar fields are form values, and the
//! ingredient/step arrays are JSON-encoded strings. All validation happens
//! here, before any database write.

use serde::Deserialize;

use crate::store::{IngredientLine, NewRecipeData, StepLine};

/// Raw text fields collected from the multipart form.
#[derive(Debug, Default)]
pub struct RecipeForm {
    pub name: Option<String>,
    pub ingredients: Option<String>,
    pub steps: Option<String>,
    pub cooking_time: Option<String>,
    pub estimated_price: Option<String>,
    pub rating: Option<String>,
}

#[derive(Debug, Deserialize)]
struct IngredientField {
    #[serde(default)]
    name: Option<String>,
    // Clients send either JSON numbers or numeric strings here.
    #[serde(default)]
    amount: Option<serde_json::Value>,
    #[serde(default)]
    unit: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StepField {
    #[serde(default)]
    instruction: Option<String>,
}

/// Validate the form and produce a recipe ready to persist (without a
/// picture; the upload path is attached by the handler). Error strings are
/// safe to return verbatim in a 400 response.
pub fn validate(form: RecipeForm) -> Result<NewRecipeData, String> {
    let (Some(name), Some(ingredients_json), Some(steps_json)) =
        (&form.name, &form.ingredients, &form.steps)
    else {
        return Err("Missing required fields: name, ingredients, and steps".to_string());
    };

    let name = name.trim();
    if name.is_empty() {
        return Err("Recipe name cannot be empty".to_string());
    }

    let ingredient_fields: Vec<IngredientField> = serde_json::from_str(ingredients_json)
        .map_err(|_| "Invalid JSON format for ingredients or steps".to_string())?;
    let step_fields: Vec<StepField> = serde_json::from_str(steps_json)
        .map_err(|_| "Invalid JSON format for ingredients or steps".to_string())?;

    if ingredient_fields.is_empty() {
        return Err("At least one ingredient is required".to_string());
    }
    if step_fields.is_empty() {
        return Err("At least one step is required".to_string());
    }

    let mut ingredients = Vec::with_capacity(ingredient_fields.len());
    for field in &ingredient_fields {
        let ingredient_name = field.name.as_deref().unwrap_or("").trim();
        if ingredient_name.is_empty() {
            return Err("Ingredient name cannot be empty".to_string());
        }

        let amount = field.amount.as_ref().and_then(parse_amount);
        let Some(amount) = amount.filter(|a| a.is_finite() && *a > 0.0) else {
            return Err("Ingredient amount must be a positive number".to_string());
        };

        ingredients.push(IngredientLine {
            name: ingredient_name.to_string(),
            amount,
            unit: normalize_optional(field.unit.as_deref()),
        });
    }

    let mut steps = Vec::with_capacity(step_fields.len());
    for field in &step_fields {
        let instruction = field.instruction.as_deref().unwrap_or("").trim();
        if instruction.is_empty() {
            return Err("Step instruction cannot be empty".to_string());
        }
        steps.push(StepLine {
            instruction: instruction.to_string(),
        });
    }

    let cooking_time = match present(form.cooking_time.as_deref()) {
        Some(raw) => match raw.parse::<i32>() {
            Ok(minutes) if minutes > 0 => Some(minutes),
            _ => return Err("Cooking time must be a positive number of minutes".to_string()),
        },
        None => None,
    };

    let estimated_price = match present(form.estimated_price.as_deref()) {
        Some(raw) => match raw.parse::<f64>() {
            Ok(price) if price.is_finite() && price >= 0.0 => Some(price),
            _ => return Err("Estimated price must be a non-negative number".to_string()),
        },
        None => None,
    };

    let rating = match present(form.rating.as_deref()) {
        Some(raw) => match raw.parse::<i32>() {
            Ok(stars) if (1..=5).contains(&stars) => Some(stars),
            _ => return Err("Rating must be between 1 and 5".to_string()),
        },
        None => None,
    };

    Ok(NewRecipeData {
        name: name.to_string(),
        picture_path: None,
        cooking_time,
        estimated_price,
        rating,
        ingredients,
        steps,
    })
}

fn parse_amount(value: &serde_json::Value) -> Option<f64> {
    match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Optional scalar fields arrive as empty strings when left blank in the
/// form; treat those as absent.
fn present(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|s| !s.is_empty())
}

fn normalize_optional(raw: Option<&str>) -> Option<String> {
    present(raw).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_form() -> RecipeForm {
        RecipeForm {
            name: Some("Tomato Soup".to_string()),
            ingredients: Some(
                r#"[{"name":"Tomato","amount":3,"unit":"pcs"},{"name":"Salt","amount":"0.5","unit":"tsp"}]"#
                    .to_string(),
            ),
            steps: Some(
                r#"[{"instruction":"Chop tomatoes"},{"instruction":"Simmer for 20 minutes"}]"#
                    .to_string(),
            ),
            cooking_time: Some("30".to_string()),
            estimated_price: Some("4.50".to_string()),
            rating: Some("4".to_string()),
        }
    }

    #[test]
    fn accepts_a_complete_form() {
        let data = validate(valid_form()).unwrap();
        assert_eq!(data.name, "Tomato Soup");
        assert_eq!(data.ingredients.len(), 2);
        assert_eq!(data.ingredients[0].amount, 3.0);
        assert_eq!(data.ingredients[1].amount, 0.5);
        assert_eq!(data.ingredients[1].unit.as_deref(), Some("tsp"));
        assert_eq!(data.steps.len(), 2);
        assert_eq!(data.cooking_time, Some(30));
        assert_eq!(data.estimated_price, Some(4.5));
        assert_eq!(data.rating, Some(4));
    }

    #[test]
    fn rejects_missing_name() {
        let form = RecipeForm {
            name: None,
            ..valid_form()
        };
        let err = validate(form).unwrap_err();
        assert_eq!(err, "Missing required fields: name, ingredients, and steps");
    }

    #[test]
    fn rejects_blank_name() {
        let form = RecipeForm {
            name: Some("   ".to_string()),
            ..valid_form()
        };
        assert_eq!(validate(form).unwrap_err(), "Recipe name cannot be empty");
    }

    #[test]
    fn rejects_malformed_ingredient_json() {
        let form = RecipeForm {
            ingredients: Some("not json".to_string()),
            ..valid_form()
        };
        assert_eq!(
            validate(form).unwrap_err(),
            "Invalid JSON format for ingredients or steps"
        );
    }

    #[test]
    fn rejects_empty_ingredient_list() {
        let form = RecipeForm {
            ingredients: Some("[]".to_string()),
            ..valid_form()
        };
        assert_eq!(
            validate(form).unwrap_err(),
            "At least one ingredient is required"
        );
    }

    #[test]
    fn rejects_non_positive_amount() {
        let form = RecipeForm {
            ingredients: Some(r#"[{"name":"Salt","amount":0,"unit":"g"}]"#.to_string()),
            ..valid_form()
        };
        assert_eq!(
            validate(form).unwrap_err(),
            "Ingredient amount must be a positive number"
        );
    }

    #[test]
    fn rejects_empty_step_instruction() {
        let form = RecipeForm {
            steps: Some(r#"[{"instruction":"  "}]"#.to_string()),
            ..valid_form()
        };
        assert_eq!(
            validate(form).unwrap_err(),
            "Step instruction cannot be empty"
        );
    }

    #[test]
    fn rejects_rating_out_of_range() {
        for bad in ["6", "-1", "0", "abc"] {
            let form = RecipeForm {
                rating: Some(bad.to_string()),
                ..valid_form()
            };
            assert_eq!(validate(form).unwrap_err(), "Rating must be between 1 and 5");
        }
    }

    #[test]
    fn absent_rating_means_unrated() {
        let form = RecipeForm {
            rating: Some("".to_string()),
            ..valid_form()
        };
        assert_eq!(validate(form).unwrap().rating, None);
    }

    #[test]
    fn rejects_negative_price_and_zero_cooking_time() {
        let form = RecipeForm {
            estimated_price: Some("-2".to_string()),
            ..valid_form()
        };
        assert_eq!(
            validate(form).unwrap_err(),
            "Estimated price must be a non-negative number"
        );

        let form = RecipeForm {
            cooking_time: Some("0".to_string()),
            ..valid_form()
        };
        assert_eq!(
            validate(form).unwrap_err(),
            "Cooking time must be a positive number of minutes"
        );
    }

    #[test]
    fn trims_names_units_and_instructions() {
        let form = RecipeForm {
            name: Some("  Stew  ".to_string()),
            ingredients: Some(r#"[{"name":" Onion ","amount":"2","unit":" pcs "}]"#.to_string()),
            steps: Some(r#"[{"instruction":" Stir. "}]"#.to_string()),
            cooking_time: None,
            estimated_price: None,
            rating: None,
        };
        let data = validate(form).unwrap();
        assert_eq!(data.name, "Stew");
        assert_eq!(data.ingredients[0].name, "Onion");
        assert_eq!(data.ingredients[0].unit.as_deref(), Some("pcs"));
        assert_eq!(data.steps[0].instruction, "Stir.");
    }

    #[test]
    fn empty_unit_becomes_absent() {
        let form = RecipeForm {
            ingredients: Some(r#"[{"name":"Egg","amount":2,"unit":""}]"#.to_string()),
            ..valid_form()
        };
        assert_eq!(validate(form).unwrap().ingredients[0].unit, None);
    }
}
