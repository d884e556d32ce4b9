use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::*;
use std::collections::BTreeSet;
use std::path::PathBuf;
use tracing::info;

use crate::batch::Selection;
use crate::config::AppConfig;
use crate::engine::TrendEngine;
use crate::export::{default_export_path, write_csv};
use crate::insights::{Dimension, Heat, Leader, heatmap, insights, summarize};
use crate::reference::Catalog;
use crate::scoring::ScoredCombination;

#[derive(Parser, Debug)]
#[command(name = "fashion-trends")]
#[command(about = "Fashion search-interest scoring across Indian cities")]
pub struct Cli {
    /// Directory holding settings.json and reference.json.
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Score, rank and optionally export a selection.
    Rank {
        #[command(flatten)]
        selection: SelectionArgs,
        #[arg(long, allow_hyphen_values = true)]
        min_velocity: Option<i32>,
        #[arg(long)]
        top: Option<usize>,
        /// Write the full scored batch as CSV; defaults to a timestamped file in the export dir.
        #[arg(long, num_args = 0..=1)]
        export: Option<Option<PathBuf>>,
    },
    /// Score a single combination.
    Score {
        #[arg(long)]
        city: String,
        #[arg(long)]
        subcategory: String,
        #[arg(long)]
        price: String,
        #[arg(long)]
        color: String,
    },
    /// Dimension leaders and insight lines for a selection.
    Insights {
        #[command(flatten)]
        selection: SelectionArgs,
    },
    /// Mean normalized score over two dimensions.
    Heatmap {
        #[command(flatten)]
        selection: SelectionArgs,
        #[arg(long, default_value = "city")]
        rows: Dimension,
        #[arg(long, default_value = "group")]
        cols: Dimension,
    },
    #[command(subcommand)]
    Catalog(CatalogCmd),
    #[command(subcommand)]
    Settings(SettingsCmd),
}

/// Omitted dimensions select every catalog value.
#[derive(Args, Debug, Default, Clone)]
pub struct SelectionArgs {
    #[arg(long)]
    pub city: Vec<String>,
    #[arg(long)]
    pub subcategory: Vec<String>,
    /// Adds every sub-category of the group.
    #[arg(long)]
    pub group: Vec<String>,
    #[arg(long)]
    pub price: Vec<String>,
    #[arg(long)]
    pub color: Vec<String>,
    /// Adds every color of the family.
    #[arg(long)]
    pub family: Vec<String>,
}

#[derive(Subcommand, Debug)]
pub enum CatalogCmd {
    Cities,
    Categories,
    Prices,
    Colors,
}

#[derive(Subcommand, Debug)]
pub enum SettingsCmd {
    Show,
}

impl SelectionArgs {
    pub fn resolve(&self, catalog: &Catalog) -> Result<Selection> {
        let data = catalog.data();

        let mut cities = BTreeSet::new();
        for c in &self.city {
            cities.insert(catalog.city(c)?.name.clone());
        }
        if cities.is_empty() {
            cities = data.cities.iter().map(|c| c.name.clone()).collect();
        }

        let mut subcategories = BTreeSet::new();
        for s in &self.subcategory {
            subcategories.insert(catalog.subcategory(s)?.name.clone());
        }
        for g in &self.group {
            subcategories.extend(catalog.subcategories_in(g)?.into_iter().map(|s| s.name.clone()));
        }
        if subcategories.is_empty() {
            subcategories = data.subcategories.iter().map(|s| s.name.clone()).collect();
        }

        let mut price_buckets = BTreeSet::new();
        for p in &self.price {
            price_buckets.insert(catalog.price_bucket(p)?.label.clone());
        }
        if price_buckets.is_empty() {
            price_buckets = data.price_buckets.iter().map(|b| b.label.clone()).collect();
        }

        let mut colors = BTreeSet::new();
        for c in &self.color {
            colors.insert(catalog.color(c)?.name.clone());
        }
        for f in &self.family {
            colors.extend(catalog.colors_in(f)?.into_iter().map(|c| c.name.clone()));
        }
        if colors.is_empty() {
            colors = data.colors.iter().map(|c| c.name.clone()).collect();
        }

        Ok(Selection {
            cities,
            subcategories,
            price_buckets,
            colors,
        })
    }
}

pub fn run(cli: Cli, cfg: &AppConfig) -> Result<()> {
    let engine = TrendEngine::new(cfg.reference.clone())
        .with_context(|| format!("Invalid reference data in {}", cfg.reference_path().display()))?
        .parallel(cfg.settings.engine.parallel);

    match cli.command {
        Commands::Rank {
            selection,
            min_velocity,
            top,
            export,
        } => handle_rank(&engine, cfg, &selection, min_velocity, top, export),
        Commands::Score {
            city,
            subcategory,
            price,
            color,
        } => {
            let r = engine.score(&city, &subcategory, &price, &color)?;
            println!(
                "{} | {} ({}) | {} | {}",
                r.city, r.subcategory, r.group, r.price_bucket, r.color
            );
            println!(
                "geo:{} cat:{} price:{} color:{} | composite:{:.2} | velocity:{}",
                r.geo_score,
                r.cat_score,
                r.price_score,
                r.color_score,
                r.composite,
                velocity_str(r.velocity)
            );
            Ok(())
        }
        Commands::Insights { selection } => {
            let all = evaluate(&engine, cfg, &selection)?;
            match summarize(&all) {
                Some(s) => {
                    print_leader("Geography", &s.top_city);
                    print_leader("Category", &s.top_group);
                    print_leader("Price segment", &s.top_price_bucket);
                    print_leader("Color", &s.top_color);
                }
                None => println!("No combinations scored."),
            }
            for line in insights(&all, engine.catalog().styles()) {
                println!("- {}", line.text);
            }
            Ok(())
        }
        Commands::Heatmap {
            selection,
            rows,
            cols,
        } => {
            let all = evaluate(&engine, cfg, &selection)?;
            let map = heatmap(&all, rows, cols);
            println!("{:<20} {}", "", map.cols.join(" | "));
            for (label, cells) in map.rows.iter().zip(&map.cells) {
                let cells: Vec<String> = cells
                    .iter()
                    .map(|c| c.map(|v| format!("{v:.1}")).unwrap_or_else(|| "-".into()))
                    .collect();
                println!("{:<20} {}", label, cells.join(" | "));
            }
            Ok(())
        }
        Commands::Catalog(cmd) => handle_catalog(cmd, engine.catalog()),
        Commands::Settings(SettingsCmd::Show) => {
            let s = &cfg.settings;
            println!("Data directory: {}", cfg.base_dir.display());
            println!("Reference data: {}", cfg.reference_path().display());
            println!("Export dir: {}", s.paths.export_dir.display());
            println!(
                "Ranking: min_velocity={} top_n={} max_combinations={}",
                s.ranking.min_velocity, s.ranking.top_n, s.ranking.max_combinations
            );
            println!("Parallel evaluation: {}", s.engine.parallel);
            println!("Logging: {} ({:?})", s.logging.level, s.logging.format);
            Ok(())
        }
    }
}

fn evaluate(
    engine: &TrendEngine,
    cfg: &AppConfig,
    args: &SelectionArgs,
) -> Result<Vec<ScoredCombination>> {
    let selection = args.resolve(engine.catalog())?;
    selection.ensure_within(cfg.settings.ranking.max_combinations)?;
    Ok(engine.evaluate(&selection)?)
}

fn handle_rank(
    engine: &TrendEngine,
    cfg: &AppConfig,
    args: &SelectionArgs,
    min_velocity: Option<i32>,
    top: Option<usize>,
    export: Option<Option<PathBuf>>,
) -> Result<()> {
    let selection = args.resolve(engine.catalog())?;
    selection.ensure_within(cfg.settings.ranking.max_combinations)?;
    let min_velocity = min_velocity.unwrap_or(cfg.settings.ranking.min_velocity);
    let top_n = top.unwrap_or(cfg.settings.ranking.top_n);

    let batch = engine.evaluate_and_rank(&selection, min_velocity, top_n)?;
    info!(
        scored = batch.all.len(),
        ranked = batch.ranked.len(),
        min_velocity,
        top_n,
        "ranking complete"
    );

    if batch.ranked.is_empty() {
        println!("No combinations meet the velocity filter.");
    }
    for (i, r) in batch.ranked.iter().enumerate() {
        println!(
            "{:>3}. {} | {} ({}) | {} | {} {} | score:{} | velocity:{}",
            i + 1,
            r.city,
            r.subcategory,
            r.group,
            r.price_bucket,
            r.color,
            r.color_hex.dimmed(),
            score_str(r.score_norm.unwrap_or_default()),
            velocity_str(r.velocity)
        );
    }

    if let Some(target) = export {
        let path = target.unwrap_or_else(|| default_export_path(&cfg.settings.paths.export_dir));
        write_csv(&path, &batch.all)
            .with_context(|| format!("Failed to export {}", path.display()))?;
        info!(path = %path.display(), rows = batch.all.len(), "exported scored batch");
        println!("Exported {} rows to {}", batch.all.len(), path.display());
    }
    Ok(())
}

fn handle_catalog(cmd: CatalogCmd, catalog: &Catalog) -> Result<()> {
    let data = catalog.data();
    match cmd {
        CatalogCmd::Cities => {
            for c in &data.cities {
                println!("{} | ₹{:.1}bn | {} | {}", c.name, c.market_bn, c.region, c.tier);
            }
        }
        CatalogCmd::Categories => {
            for group in catalog.groups() {
                println!("{}", group.bold());
                for s in catalog.subcategories_in(group)? {
                    println!("  {} ({})", s.name, s.search_phrase);
                }
            }
        }
        CatalogCmd::Prices => {
            for b in &data.price_buckets {
                println!("{} | {}..={} | mid {}", b.label, b.low, b.high, b.midpoint);
            }
        }
        CatalogCmd::Colors => {
            for c in &data.colors {
                println!("{} | {} | {}", c.name, c.hex, c.family);
            }
        }
    }
    Ok(())
}

fn print_leader(dimension: &str, leader: &Leader) {
    let badge = match leader.heat {
        Heat::Hot => leader.heat.to_string().red().bold(),
        Heat::Rising => leader.heat.to_string().yellow(),
        Heat::Cool => leader.heat.to_string().blue(),
    };
    println!("{dimension}: {} ({:.1}, {badge})", leader.label, leader.score);
}

fn score_str(score: f64) -> String {
    let s = format!("{score:.1}");
    if score >= 75.0 {
        s.green().to_string()
    } else if score < 25.0 {
        s.red().to_string()
    } else {
        s
    }
}

fn velocity_str(velocity: i32) -> String {
    let s = format!("{velocity:+}%");
    if velocity > 0 {
        s.green().to_string()
    } else if velocity < 0 {
        s.red().to_string()
    } else {
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtin::builtin_reference;

    fn catalog() -> Catalog {
        Catalog::new(builtin_reference()).unwrap()
    }

    #[test]
    fn empty_args_select_everything() {
        let cat = catalog();
        let sel = SelectionArgs::default().resolve(&cat).unwrap();
        assert_eq!(sel.cities.len(), 10);
        assert_eq!(sel.subcategories.len(), cat.data().subcategories.len());
        assert_eq!(sel.price_buckets.len(), 6);
        assert_eq!(sel.colors.len(), cat.data().colors.len());
    }

    #[test]
    fn group_and_family_expand() {
        let cat = catalog();
        let args = SelectionArgs {
            city: vec!["Pune".into()],
            subcategory: vec!["Jeans".into()],
            group: vec!["Streetwear".into()],
            family: vec!["Metallics".into()],
            ..SelectionArgs::default()
        };
        let sel = args.resolve(&cat).unwrap();
        assert_eq!(sel.cities.len(), 1);
        assert!(sel.subcategories.contains("Jeans"));
        assert!(sel.subcategories.contains("Cargo Pants"));
        assert_eq!(sel.subcategories.len(), 6);
        assert_eq!(
            sel.colors,
            ["Bronze", "Gold", "Silver"]
                .iter()
                .map(|s| s.to_string())
                .collect::<BTreeSet<String>>()
        );
    }

    #[test]
    fn unknown_value_is_an_error() {
        let args = SelectionArgs {
            city: vec!["Atlantis".into()],
            ..SelectionArgs::default()
        };
        assert!(args.resolve(&catalog()).is_err());
    }

    #[test]
    fn parses_rank_command() {
        let cli = Cli::try_parse_from([
            "fashion-trends",
            "rank",
            "--city",
            "Delhi",
            "--city",
            "Mumbai",
            "--min-velocity",
            "-10",
            "--top",
            "5",
            "--export",
        ])
        .unwrap();
        match cli.command {
            Commands::Rank {
                selection,
                min_velocity,
                top,
                export,
            } => {
                assert_eq!(selection.city, vec!["Delhi", "Mumbai"]);
                assert_eq!(min_velocity, Some(-10));
                assert_eq!(top, Some(5));
                assert_eq!(export, Some(None));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
