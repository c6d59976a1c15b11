use anyhow::{Context, Result};
use hearth_core::NewRecipe;
use std::fs;
use std::path::Path;
use uuid::Uuid;

use crate::client::ApiClient;

pub async fn list(client: &ApiClient) -> Result<()> {
    let recipes = client.list_recipes().await?;
    if recipes.is_empty() {
        println!("No recipes yet. Add one with `hearth recipes create <file.json>`.");
        return Ok(());
    }
    for r in recipes {
        println!(
            "{}  {}  ({} ingredients, {} steps)",
            r.id, r.title, r.ingredient_count, r.step_count
        );
    }
    Ok(())
}

pub async fn show(client: &ApiClient, id: Uuid) -> Result<()> {
    let recipe = client.get_recipe(id).await?;
    println!("{}", recipe.title);
    println!();
    println!("Ingredients");
    for ingredient in &recipe.ingredients {
        println!("  - {}", ingredient.display_line());
    }
    println!();
    println!("Steps");
    for (i, step) in recipe.steps.iter().enumerate() {
        match step.timer_secs {
            Some(secs) => println!(
                "  {}. {}  [{}]",
                i + 1,
                step.instruction,
                crate::render::clock(secs)
            ),
            None => println!("  {}. {}", i + 1, step.instruction),
        }
    }
    Ok(())
}

fn read_new_recipe(path: &Path) -> Result<NewRecipe> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("{} is not a valid recipe", path.display()))
}

pub async fn create(client: &ApiClient, path: &Path) -> Result<()> {
    let recipe = read_new_recipe(path)?;
    let id = client.create_recipe(&recipe).await?;
    println!("Created recipe {}", id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_new_recipe() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("toast.json");
        fs::write(
            &path,
            r#"{
                "title": "Toast",
                "ingredients": [{"item": "bread", "amount": "2", "unit": "slices"}],
                "steps": [{"instruction": "Toast the bread", "timer_secs": 120}]
            }"#,
        )
        .unwrap();

        let recipe = read_new_recipe(&path).unwrap();
        assert_eq!(recipe.title, "Toast");
        assert_eq!(recipe.steps[0].timer_secs, Some(120));

        fs::write(&path, "not json").unwrap();
        assert!(read_new_recipe(&path).is_err());
    }
}
