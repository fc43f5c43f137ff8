use anyhow::Result;
use std::process;

use pantry_core::service::{Pantry, SearchOptions};

use super::helpers::print_recipe_table;

pub(crate) fn cmd_search(
    pantry: &Pantry,
    query: &str,
    ingredients: bool,
    description: bool,
    json: bool,
) -> Result<()> {
    let options = SearchOptions {
        ingredients,
        description,
    };
    let recipes = pantry.search(query, options)?;

    if recipes.is_empty() {
        if json {
            println!("[]");
        } else {
            eprintln!("No recipes match '{query}'");
        }
        process::exit(2);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&recipes)?);
    } else {
        print_recipe_table(&recipes);
    }

    Ok(())
}

pub(crate) fn cmd_list(pantry: &Pantry, json: bool) -> Result<()> {
    let recipes = pantry.list()?;

    if recipes.is_empty() {
        if json {
            println!("[]");
        } else {
            eprintln!("No recipes cached yet. Run 'pantry fetch' first.");
        }
        process::exit(2);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&recipes)?);
    } else {
        print_recipe_table(&recipes);
    }

    Ok(())
}

pub(crate) fn cmd_get(pantry: &Pantry, id: i64) -> Result<()> {
    let recipe = pantry.get_by_id(id)?;
    println!("{}", serde_json::to_string_pretty(&recipe.data)?);
    Ok(())
}
