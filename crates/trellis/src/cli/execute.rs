//! Command execution logic.
//!
//! This module contains the implementation of all CLI commands. Each
//! command maps to one engine operation; mutations save the feature list
//! afterwards.

use std::path::Path;

use anyhow::Result;
use colored::Colorize;

use super::args::{AddArgs, PlanArgs, SetStatusArgs, ShowArgs};
use crate::app::App;
use crate::domain::{FeatureId, NewFeature, PlanOptions};
use crate::output::{self, mermaid};
use crate::store::FeatureStore;

/// Execute the init command
pub async fn execute_init(path: &Path) -> Result<()> {
    if path.exists() {
        println!("feature list already exists at {}", path.display());
        return Ok(());
    }

    let app = App::open(path).await?;
    app.save().await?;
    println!("created empty feature list at {}", path.display());
    Ok(())
}

/// Execute the add command
pub async fn execute_add(app: &mut App, args: &AddArgs) -> Result<()> {
    let new_feature = NewFeature {
        id: FeatureId::new(args.id.clone()),
        description: args.description.clone(),
        priority: args.priority,
        effort: args.effort,
        dependencies: args
            .dependencies
            .iter()
            .map(|dep| FeatureId::new(dep.clone()))
            .collect(),
    };

    let feature = app.store_mut().add_feature(new_feature).await?;
    app.save().await?;

    println!("added {}", output::feature_line(&feature));
    Ok(())
}

/// Execute the set-status command
pub async fn execute_set_status(app: &mut App, args: &SetStatusArgs) -> Result<()> {
    let id = FeatureId::new(args.id.clone());
    let feature = app.store_mut().set_status(&id, args.status.into()).await?;
    app.save().await?;

    println!("updated {}", output::feature_line(&feature));
    Ok(())
}

/// Execute the show command
pub async fn execute_show(app: &App, args: &ShowArgs) -> Result<()> {
    let id = FeatureId::new(args.id.clone());
    let Some(feature) = app.store().get(&id).await? else {
        anyhow::bail!("feature not found: {id}");
    };

    println!("{}", feature.id.as_str().cyan().bold());
    println!("  status:   {}", output::colorize_status(feature.status));
    println!("  priority: {}", feature.priority);
    if let Some(effort) = feature.effort {
        println!("  effort:   {effort}");
    }
    if !feature.dependencies.is_empty() {
        let deps: Vec<&str> = feature.dependencies.iter().map(FeatureId::as_str).collect();
        println!("  depends:  {}", deps.join(", "));
    }
    if !feature.description.is_empty() {
        println!("{}", output::wrap_indented(&feature.description, "  "));
    }
    Ok(())
}

/// Execute the ready command
pub async fn execute_ready(app: &App) -> Result<()> {
    let ready = app.store().ready().await?;
    if ready.is_empty() {
        println!("no features are ready");
        return Ok(());
    }

    for feature in &ready {
        println!("{}", output::feature_line(feature));
    }
    Ok(())
}

/// Execute the blocked command
pub async fn execute_blocked(app: &App) -> Result<()> {
    let blocked = app.store().blocked().await?;
    if blocked.is_empty() {
        println!("no features are blocked");
        return Ok(());
    }

    for entry in &blocked {
        println!("{}", output::feature_line(&entry.feature));
        if !entry.incomplete_dependencies.is_empty() {
            let deps: Vec<&str> = entry
                .incomplete_dependencies
                .iter()
                .map(FeatureId::as_str)
                .collect();
            println!("    waiting on: {}", deps.join(", "));
        }
        if entry.in_cycle {
            println!("    {}", "part of a dependency cycle".red());
        }
    }
    Ok(())
}

/// Execute the cycles command
pub async fn execute_cycles(app: &App) -> Result<()> {
    let cycles = app.store().find_cycles().await?;
    if cycles.is_empty() {
        println!("no dependency cycles");
        return Ok(());
    }

    for cycle in &cycles {
        let mut ids: Vec<&str> = cycle.iter().map(FeatureId::as_str).collect();
        if let Some(first) = cycle.first() {
            ids.push(first.as_str());
        }
        println!("{}", ids.join(" -> ").red());
    }
    Ok(())
}

/// Execute the plan command
pub async fn execute_plan(app: &App, args: &PlanArgs) -> Result<()> {
    let options = PlanOptions {
        ignore_failed: args.ignore_failed,
    };

    if args.waves {
        let plan = app.store().parallel_plan().await?;
        for (index, wave) in plan.waves.iter().enumerate() {
            let ids: Vec<&str> = wave.iter().map(FeatureId::as_str).collect();
            println!("wave {}: {}", index + 1, ids.join(", "));
        }
        print_unreachable(&plan.unreachable);
    } else {
        let plan = app.store().sequential_plan(Some(options)).await?;
        for (index, id) in plan.order.iter().enumerate() {
            println!("{:>3}. {}", index + 1, id);
        }
        print_unreachable(&plan.unreachable);
    }
    Ok(())
}

fn print_unreachable(unreachable: &[FeatureId]) {
    if !unreachable.is_empty() {
        let ids: Vec<&str> = unreachable.iter().map(FeatureId::as_str).collect();
        println!(
            "{} {}",
            "unreachable (failed dependency):".red(),
            ids.join(", ")
        );
    }
}

/// Execute the next command
pub async fn execute_next(app: &App) -> Result<()> {
    match app.store().next_feature().await? {
        Some(feature) => println!("{}", output::feature_line(&feature)),
        None => {
            // Distinguish "nothing ready yet" from "all done".
            let blocked = app.store().blocked().await?;
            if blocked.is_empty() {
                println!("all pending features are done");
            } else {
                println!("nothing is ready ({} pending features blocked)", blocked.len());
            }
        }
    }
    Ok(())
}

/// Execute the critical-path command
pub async fn execute_critical_path(app: &App) -> Result<()> {
    let cp = app.store().critical_path().await?;
    if cp.path.is_empty() {
        println!("graph is empty");
        return Ok(());
    }

    let ids: Vec<&str> = cp.path.iter().map(FeatureId::as_str).collect();
    println!("{}", ids.join(" -> "));
    println!("total effort: {}", cp.total_effort);
    Ok(())
}

/// Execute the scores command
pub async fn execute_scores(app: &App) -> Result<()> {
    let scores = app.store().priority_scores().await?;

    let mut entries: Vec<(FeatureId, i64)> = scores.into_iter().collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    for (id, score) in &entries {
        println!("{score:>5}  {id}");
    }
    Ok(())
}

/// Execute the graph command
pub async fn execute_graph(app: &App) -> Result<()> {
    let snapshot = app.store().snapshot().await?;
    println!("{}", mermaid::render(&snapshot));
    Ok(())
}
