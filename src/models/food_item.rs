//! Food Item model
//!
//! A food attached to a meal slot. `base` holds the reference nutrient values
//! at `base_amount`; `nutrients` holds the values at the current `amount`.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::{DbError, DbResult};
use crate::error::PlanResult;
use crate::nutrition::rescale::{rescale_nutrients, validate_amount, RebasePolicy};
use super::{DayKey, MealId, Nutrients};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodItem {
    /// Store id; `None` until the item has been saved
    pub id: Option<i64>,
    pub name: String,
    pub amount: f64,
    pub base_amount: f64,
    pub nutrients: Nutrients,
    pub base: Nutrients,
}

impl FoodItem {
    /// Attach a food at its search-selected serving
    pub fn new(name: impl Into<String>, base_amount: f64, base: Nutrients) -> PlanResult<Self> {
        let base_amount = validate_amount(base_amount)?;
        let base = base.sanitized();
        let nutrients = rescale_nutrients(&base, base_amount, base_amount);
        Ok(Self {
            id: None,
            name: name.into(),
            amount: base_amount,
            base_amount,
            nutrients,
            base,
        })
    }

    /// Whether nutrient values are meaningful at all (non-zero base serving)
    pub fn is_rescalable(&self) -> bool {
        self.base_amount > 0.0
    }

    /// The item after the user changes its serving amount.
    ///
    /// Current values are recomputed from the base. Under
    /// `RebasePolicy::RebaseOnEdit` a significant change also moves the base
    /// to the new amount, as long as the rescale was defined.
    pub fn with_amount(&self, new_amount: f64, policy: RebasePolicy) -> PlanResult<Self> {
        let new_amount = validate_amount(new_amount)?;
        let nutrients = rescale_nutrients(&self.base, self.base_amount, new_amount);

        let mut next = Self {
            amount: new_amount,
            nutrients,
            ..self.clone()
        };

        if self.is_rescalable() && policy.should_rebase(self.base_amount, new_amount) {
            tracing::debug!(
                "Rebasing '{}' from {} to {}",
                self.name,
                self.base_amount,
                new_amount
            );
            next.base_amount = new_amount;
            next.base = nutrients;
        }

        Ok(next)
    }

    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: Some(row.get("id")?),
            name: row.get("name")?,
            amount: row.get("amount")?,
            base_amount: row.get("base_amount")?,
            nutrients: Nutrients {
                calories: row.get("calories")?,
                carbs: row.get("carbs")?,
                protein: row.get("protein")?,
                fat: row.get("fat")?,
                protein_g: row.get("protein_g")?,
            },
            base: Nutrients {
                calories: row.get("base_calories")?,
                carbs: row.get("base_carbs")?,
                protein: row.get("base_protein")?,
                fat: row.get("base_fat")?,
                protein_g: row.get("base_protein_g")?,
            },
        })
    }

    /// Items of a day with their raw meal id, in slot then position order
    pub fn list_for_day(conn: &Connection, day: DayKey) -> DbResult<Vec<(i64, Self)>> {
        let mut stmt = conn.prepare(
            "SELECT * FROM food_items WHERE day_key = ?1 ORDER BY meal_id, position, id",
        )?;

        let items = stmt
            .query_map([day.as_str()], |row| Ok((row.get::<_, i64>("meal_id")?, Self::from_row(row)?)))?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(items)
    }

    pub fn get(conn: &Connection, day: DayKey, meal_id: MealId, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare(
            "SELECT * FROM food_items WHERE id = ?1 AND day_key = ?2 AND meal_id = ?3",
        )?;

        match stmt.query_row(params![id, day.as_str(), meal_id.get()], Self::from_row) {
            Ok(item) => Ok(Some(item)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Insert the item (appended to the slot) or update it in place.
    /// Returns the item's id.
    pub fn upsert(conn: &Connection, day: DayKey, meal_id: MealId, item: &FoodItem) -> DbResult<i64> {
        let n = &item.nutrients;
        let b = &item.base;

        match item.id {
            Some(id) => {
                let rows = conn.execute(
                    r#"
                    UPDATE food_items SET
                        name = ?1, amount = ?2, base_amount = ?3,
                        calories = ?4, carbs = ?5, protein = ?6, fat = ?7, protein_g = ?8,
                        base_calories = ?9, base_carbs = ?10, base_protein = ?11,
                        base_fat = ?12, base_protein_g = ?13,
                        updated_at = datetime('now')
                    WHERE id = ?14 AND day_key = ?15 AND meal_id = ?16
                    "#,
                    params![
                        item.name, item.amount, item.base_amount,
                        n.calories, n.carbs, n.protein, n.fat, n.protein_g,
                        b.calories, b.carbs, b.protein, b.fat, b.protein_g,
                        id, day.as_str(), meal_id.get(),
                    ],
                )?;
                if rows == 0 {
                    return Err(DbError::NotFound(format!(
                        "food item {} in {} meal {}",
                        id, day, meal_id
                    )));
                }
                Ok(id)
            }
            None => {
                conn.execute(
                    r#"
                    INSERT INTO food_items (
                        day_key, meal_id, position, name, amount, base_amount,
                        calories, carbs, protein, fat, protein_g,
                        base_calories, base_carbs, base_protein, base_fat, base_protein_g
                    )
                    VALUES (
                        ?1, ?2,
                        (SELECT COALESCE(MAX(position), -1) + 1 FROM food_items
                         WHERE day_key = ?1 AND meal_id = ?2),
                        ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15
                    )
                    "#,
                    params![
                        day.as_str(), meal_id.get(),
                        item.name, item.amount, item.base_amount,
                        n.calories, n.carbs, n.protein, n.fat, n.protein_g,
                        b.calories, b.carbs, b.protein, b.fat, b.protein_g,
                    ],
                )?;
                Ok(conn.last_insert_rowid())
            }
        }
    }

    /// Returns Ok(true) if deleted, Ok(false) if not found
    pub fn delete(conn: &Connection, day: DayKey, meal_id: MealId, id: i64) -> DbResult<bool> {
        let rows = conn.execute(
            "DELETE FROM food_items WHERE id = ?1 AND day_key = ?2 AND meal_id = ?3",
            params![id, day.as_str(), meal_id.get()],
        )?;
        Ok(rows > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::run_migrations;

    fn oats() -> FoodItem {
        FoodItem::new(
            "Oats",
            40.0,
            Nutrients {
                calories: Some(150.0),
                carbs: Some(27.0),
                protein: Some(5.0),
                fat: Some(2.5),
                protein_g: None,
            },
        )
        .unwrap()
    }

    #[test]
    fn test_new_item_starts_at_base() {
        let item = oats();
        assert_eq!(item.amount, 40.0);
        assert_eq!(item.nutrients, item.base);
    }

    #[test]
    fn test_zero_base_means_blank_values() {
        let item = FoodItem::new("Water", 0.0, Nutrients { calories: Some(0.0), ..Nutrients::none() }).unwrap();
        assert!(!item.is_rescalable());
        assert!(item.nutrients.is_blank());

        let edited = item.with_amount(250.0, RebasePolicy::RebaseOnEdit).unwrap();
        assert!(edited.nutrients.is_blank());
        // nothing to rebase onto
        assert_eq!(edited.base_amount, 0.0);
    }

    #[test]
    fn test_zero_amount_keeps_base() {
        let item = oats();
        let zeroed = item.with_amount(0.0, RebasePolicy::RebaseOnEdit).unwrap();
        assert_eq!(zeroed.amount, 0.0);
        assert_eq!(zeroed.base_amount, 40.0);
        assert_eq!(zeroed.base, item.base);
        assert_eq!(zeroed.nutrients.calories, Some(0.0));

        let restored = zeroed.with_amount(40.0, RebasePolicy::RebaseOnEdit).unwrap();
        assert_eq!(restored.nutrients.calories, Some(150.0));
        assert_eq!(restored.nutrients.protein, Some(5.0));
    }

    #[test]
    fn test_keep_original_never_moves_base() {
        let item = oats();
        let bigger = item.with_amount(80.0, RebasePolicy::KeepOriginal).unwrap();
        assert_eq!(bigger.base_amount, 40.0);
        assert_eq!(bigger.nutrients.calories, Some(300.0));

        let smaller = bigger.with_amount(20.0, RebasePolicy::KeepOriginal).unwrap();
        assert_eq!(smaller.base_amount, 40.0);
        assert_eq!(smaller.nutrients.calories, Some(75.0));
        assert_eq!(smaller.base, item.base);
    }

    #[test]
    fn test_rebase_on_significant_edit() {
        let item = oats();
        let edited = item.with_amount(60.0, RebasePolicy::RebaseOnEdit).unwrap();
        assert_eq!(edited.base_amount, 60.0);
        assert_eq!(edited.base, edited.nutrients);
        assert_eq!(edited.nutrients.calories, Some(225.0));

        // Subsequent edits scale from the new reference point
        let again = edited.with_amount(30.0, RebasePolicy::RebaseOnEdit).unwrap();
        assert_eq!(again.nutrients.calories, Some(112.5));
    }

    #[test]
    fn test_tiny_edit_does_not_rebase() {
        let item = oats();
        let edited = item.with_amount(40.05, RebasePolicy::RebaseOnEdit).unwrap();
        assert_eq!(edited.base_amount, 40.0);
        assert_eq!(edited.amount, 40.05);
    }

    #[test]
    fn test_negative_amount_rejected() {
        assert!(oats().with_amount(-5.0, RebasePolicy::KeepOriginal).is_err());
        assert!(FoodItem::new("Bad", -1.0, Nutrients::none()).is_err());
    }

    #[test]
    fn test_upsert_and_delete() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        let meal = MealId::new(2).unwrap();

        let id = FoodItem::upsert(&conn, DayKey::Monday, meal, &oats()).unwrap();
        let mut stored = FoodItem::get(&conn, DayKey::Monday, meal, id).unwrap().unwrap();
        assert_eq!(stored.nutrients.protein_g, None);
        assert_eq!(stored.base.calories, Some(150.0));

        stored.amount = 80.0;
        assert_eq!(FoodItem::upsert(&conn, DayKey::Monday, meal, &stored).unwrap(), id);

        // Wrong slot does not see it
        assert!(FoodItem::get(&conn, DayKey::Tuesday, meal, id).unwrap().is_none());
        assert!(!FoodItem::delete(&conn, DayKey::Monday, MealId::FIRST, id).unwrap());
        assert!(FoodItem::delete(&conn, DayKey::Monday, meal, id).unwrap());
    }

    #[test]
    fn test_update_missing_item_is_not_found() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        let mut item = oats();
        item.id = Some(999);
        let result = FoodItem::upsert(&conn, DayKey::Monday, MealId::FIRST, &item);
        assert!(matches!(result, Err(DbError::NotFound(_))));
    }
}
