mod engine;
mod list;
mod model;
mod source;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use engine::{Comparison, Offer};
use model::{GroceryList, Price, Store};
use source::{Catalog, PriceSource};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "cw", about = "Cartwise — compare grocery prices across stores")]
struct Cli {
    #[command(subcommand)]
    command: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Create .cartwise/ with an empty list and a sample catalog
    Init,
    /// Add an item to the grocery list
    Add { name: String },
    /// Remove an item by id, name, or unique name prefix
    Rm { target: String },
    /// Show one item's offers across stores
    Show {
        target: String,
        /// Catalog file (default .cartwise/catalog.json)
        #[arg(long)]
        catalog: Option<PathBuf>,
    },
    /// List the grocery items
    List,
    /// List the stores prices are compared across
    Stores,
    /// Compare prices for the whole list across stores
    Compare {
        /// Catalog file (default .cartwise/catalog.json)
        #[arg(long)]
        catalog: Option<PathBuf>,
    },
    /// Generate shell completions
    Completions { shell: Shell },
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), String> {
    match cli.command {
        Cmd::Init => {
            list::init()?;
            println!("initialized .cartwise/");
            Ok(())
        }
        Cmd::Add { name } => {
            let mut l = list::load()?;
            let id = list::add_item(&mut l, &name)?;
            list::save(&l)?;
            println!("added {id}");
            Ok(())
        }
        Cmd::Rm { target } => {
            let mut l = list::load()?;
            let removed = list::remove_item(&mut l, &target)?;
            list::save(&l)?;
            println!("removed {} ({})", removed.id, removed.name);
            Ok(())
        }
        Cmd::Show { target, catalog } => {
            let l = list::load()?;
            let item = list::resolve_item(&l, &target)?.clone();
            let stores = source::default_stores();
            let cat = load_catalog(catalog, stores.clone())?;
            let records = cat.fetch_prices(std::slice::from_ref(&item.name))?;
            let grid = engine::build_grid(std::slice::from_ref(&item), &records)?;
            let cheapest = engine::cheapest_offer_for_item(&grid, &item.name);

            println!("  ID: {}", item.id);
            println!("  Name: {}", item.name);
            println!("  Added: {}", item.added_at.format("%Y-%m-%d %H:%M"));
            let row = grid.get(&item.name);
            for store in &stores {
                match row.and_then(|r| r.get(&store.id)) {
                    Some(offer) => {
                        let mark = if Some(offer.price) == cheapest { " *" } else { "" };
                        println!(
                            "  {}: ${}{mark} ({})",
                            store.name, offer.price, offer.product_name
                        );
                    }
                    None => println!("  {}: no offer", store.name),
                }
            }
            Ok(())
        }
        Cmd::List => {
            let l = list::load()?;
            if l.items.is_empty() {
                println!("list is empty");
                return Ok(());
            }
            println!("{:<4} {:<12} {}", "ID", "ADDED", "NAME");
            println!("{}", "-".repeat(40));
            for item in &l.items {
                println!(
                    "{:<4} {:<12} {}",
                    item.id,
                    item.added_at.format("%Y-%m-%d"),
                    item.name
                );
            }
            Ok(())
        }
        Cmd::Stores => {
            println!("{:<10} {:<10} {}", "ID", "NAME", "LOGO");
            println!("{}", "-".repeat(40));
            for store in source::default_stores() {
                println!("{:<10} {:<10} {}", store.id, store.name, store.logo);
            }
            Ok(())
        }
        Cmd::Compare { catalog } => {
            let l = list::load()?;
            if l.items.is_empty() {
                println!("list is empty; nothing to compare");
                return Ok(());
            }
            let stores = source::default_stores();
            let cat = load_catalog(catalog, stores.clone())?;
            let records = cat.fetch_prices(&list::item_names(&l))?;
            let cmp = engine::compare(&l.items, &records, &stores)?;
            print_comparison(&l, &stores, &cmp);
            Ok(())
        }
        Cmd::Completions { shell } => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            clap_complete::generate(shell, &mut cmd, name, &mut std::io::stdout());
            Ok(())
        }
    }
}

fn load_catalog(path: Option<PathBuf>, stores: Vec<Store>) -> Result<Catalog, String> {
    let path = path.unwrap_or_else(list::catalog_path);
    Catalog::load(&path, stores)
}

/// "$3.10", "$3.10 *" for the row's cheapest offer, "-" for a gap.
/// A missing offer is never rendered as $0.00.
fn offer_cell(offer: Option<&Offer>, row_cheapest: Option<Price>) -> String {
    match offer {
        Some(offer) if Some(offer.price) == row_cheapest => format!("${} *", offer.price),
        Some(offer) => format!("${}", offer.price),
        None => "-".to_string(),
    }
}

fn print_comparison(l: &GroceryList, stores: &[Store], cmp: &Comparison) {
    print!("{:<28}", "ITEM");
    for store in stores {
        print!(" {:>14}", store.name);
    }
    println!();
    println!("{}", "-".repeat(28 + 15 * stores.len()));

    // Row order is the list's insertion order, not grid key order.
    for item in &l.items {
        let row_cheapest = engine::cheapest_offer_for_item(&cmp.grid, &item.name);
        let row = cmp.grid.get(&item.name);
        print!("{:<28}", item.name);
        for store in stores {
            let cell = offer_cell(row.and_then(|r| r.get(&store.id)), row_cheapest);
            print!(" {cell:>14}");
        }
        println!();
    }

    println!("{}", "-".repeat(28 + 15 * stores.len()));
    print!("{:<28}", "TOTAL");
    for store in stores {
        let total = cmp.totals.get(&store.id).copied().unwrap_or(Price::ZERO);
        print!(" {:>14}", format!("${total}"));
    }
    println!();

    match &cmp.cheapest {
        Some(id) => {
            let name = stores
                .iter()
                .find(|s| &s.id == id)
                .map(|s| s.name.as_str())
                .unwrap_or(id.as_str());
            let total = cmp.totals.get(id).copied().unwrap_or(Price::ZERO);
            println!("cheapest store: {name} (${total})");
        }
        None => println!("no store has offers for this list"),
    }
}
