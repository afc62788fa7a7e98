//! Savings goal operations

use rusqlite::{params, OptionalExtension};

use super::{parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::{Goal, NewGoal};

impl Database {
    /// Create a savings goal
    pub fn create_goal(&self, goal: &NewGoal) -> Result<i64> {
        if goal.name.trim().is_empty() {
            return Err(Error::InvalidData("Goal name cannot be empty".into()));
        }
        if !goal.target_amount.is_finite() || goal.target_amount <= 0.0 {
            return Err(Error::InvalidData(format!(
                "Goal target must be a positive amount, got {}",
                goal.target_amount
            )));
        }
        if !goal.current_savings.is_finite() {
            return Err(Error::InvalidData("Current savings must be finite".into()));
        }

        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO goals (name, target_amount, current_savings) VALUES (?, ?, ?)",
            params![goal.name.trim(), goal.target_amount, goal.current_savings],
        )?;

        Ok(conn.last_insert_rowid())
    }

    /// List all goals
    pub fn list_goals(&self) -> Result<Vec<Goal>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, name, target_amount, current_savings, created_at FROM goals ORDER BY id",
        )?;

        let goals = stmt
            .query_map([], |row| Self::row_to_goal(row))?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(goals)
    }

    /// Get a goal by ID
    pub fn get_goal(&self, id: i64) -> Result<Option<Goal>> {
        let conn = self.conn()?;
        let goal = conn
            .query_row(
                "SELECT id, name, target_amount, current_savings, created_at FROM goals WHERE id = ?",
                params![id],
                |row| Self::row_to_goal(row),
            )
            .optional()?;

        Ok(goal)
    }

    /// Record new current savings for a goal
    pub fn update_goal_savings(&self, id: i64, current_savings: f64) -> Result<()> {
        if !current_savings.is_finite() {
            return Err(Error::InvalidData("Current savings must be finite".into()));
        }

        let conn = self.conn()?;
        let updated = conn.execute(
            "UPDATE goals SET current_savings = ? WHERE id = ?",
            params![current_savings, id],
        )?;

        if updated == 0 {
            return Err(Error::NotFound(format!("Goal {}", id)));
        }
        Ok(())
    }

    /// Delete a goal
    pub fn delete_goal(&self, id: i64) -> Result<()> {
        let conn = self.conn()?;
        let deleted = conn.execute("DELETE FROM goals WHERE id = ?", params![id])?;

        if deleted == 0 {
            return Err(Error::NotFound(format!("Goal {}", id)));
        }
        Ok(())
    }

    fn row_to_goal(row: &rusqlite::Row) -> rusqlite::Result<Goal> {
        let created_at_str: String = row.get(4)?;
        Ok(Goal {
            id: row.get(0)?,
            name: row.get(1)?,
            target_amount: row.get(2)?,
            current_savings: row.get(3)?,
            created_at: parse_datetime(&created_at_str),
        })
    }
}
