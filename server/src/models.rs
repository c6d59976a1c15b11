use chrono::{DateTime, Utc};
use diesel::prelude::*;
use hearth_core::{Ingredient, Recipe, Step};
use uuid::Uuid;

#[derive(Queryable, Selectable, Debug)]
#[diesel(table_name = crate::schema::users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[allow(dead_code)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::users)]
pub struct NewUser<'a> {
    pub username: &'a str,
    pub password_hash: &'a str,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::sessions)]
pub struct NewSession<'a> {
    pub user_id: Uuid,
    pub token_hash: &'a str,
    pub expires_at: DateTime<Utc>,
}

#[derive(Queryable, Selectable, Debug)]
#[diesel(table_name = crate::schema::recipes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[allow(dead_code)]
pub struct RecipeRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub ingredients: serde_json::Value,
    pub steps: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl RecipeRow {
    pub fn into_recipe(self) -> Result<Recipe, serde_json::Error> {
        let ingredients: Vec<Ingredient> = serde_json::from_value(self.ingredients)?;
        let steps: Vec<Step> = serde_json::from_value(self.steps)?;
        Ok(Recipe {
            id: self.id,
            title: self.title,
            ingredients,
            steps,
        })
    }
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::recipes)]
pub struct NewRecipeRow<'a> {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: &'a str,
    pub ingredients: serde_json::Value,
    pub steps: serde_json::Value,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::cook_progress)]
pub struct CookProgressRow {
    pub user_id: Uuid,
    pub recipe_id: Uuid,
    pub progress: serde_json::Value,
    pub updated_at: DateTime<Utc>,
}
