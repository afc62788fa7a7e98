//! Goal command implementations

use anyhow::Result;
use chrono::NaiveDate;
use goalcast_core::{
    config::Config,
    db::Database,
    forecaster::ProjectionMode,
    models::NewGoal,
};

use super::{forecaster, print_outcome, truncate};

pub fn cmd_goals_list(db: &Database) -> Result<()> {
    let goals = db.list_goals()?;

    if goals.is_empty() {
        println!("No goals saved. Add one with:");
        println!("  goalcast goals add \"Emergency fund\" --target 10000");
        return Ok(());
    }

    println!();
    println!("🎯 Savings Goals");
    println!("   ─────────────────────────────────────────────────────────────");

    for goal in goals {
        let progress = if goal.target_amount > 0.0 {
            (goal.current_savings / goal.target_amount * 100.0).clamp(0.0, 100.0)
        } else {
            0.0
        };
        println!(
            "   [{}] {:<30} ${:>10.2} / ${:<10.2} ({:.0}%)",
            goal.id,
            truncate(&goal.name, 30),
            goal.current_savings,
            goal.target_amount,
            progress
        );
    }

    Ok(())
}

pub fn cmd_goals_add(db: &Database, name: &str, target: f64, current: f64) -> Result<()> {
    let id = db.create_goal(&NewGoal {
        name: name.to_string(),
        target_amount: target,
        current_savings: current,
    })?;

    println!("✅ Saved goal {} \"{}\" (target ${:.2})", id, name, target);
    println!("   Project it with: goalcast goals project {}", id);

    Ok(())
}

pub fn cmd_goals_savings(db: &Database, id: i64, amount: f64) -> Result<()> {
    db.update_goal_savings(id, amount)?;
    println!("✅ Goal {} current savings set to ${:.2}", id, amount);
    Ok(())
}

pub fn cmd_goals_delete(db: &Database, id: i64) -> Result<()> {
    let goal = db
        .get_goal(id)?
        .ok_or_else(|| anyhow::anyhow!("Goal {} not found", id))?;

    db.delete_goal(id)?;
    println!("✅ Deleted goal {} \"{}\"", id, goal.name);

    Ok(())
}

pub fn cmd_goals_project(db: &Database, config: &Config, id: i64, as_of: NaiveDate) -> Result<()> {
    let goal = db
        .get_goal(id)?
        .ok_or_else(|| anyhow::anyhow!("Goal {} not found", id))?;

    let outcome = forecaster(db, config, None)?.project_goal(
        ProjectionMode::Serving {
            target_amount: goal.target_amount,
            current_savings: goal.current_savings,
        },
        as_of,
    )?;

    println!();
    println!("   Goal: {}", goal.name);
    print_outcome(goal.target_amount, &outcome);

    Ok(())
}
