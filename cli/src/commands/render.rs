use anyhow::Result;
use serde_json::Value;

use pantry_core::models::Recipe;
use pantry_core::service::Pantry;

pub(crate) fn cmd_render(pantry: &Pantry, id: i64) -> Result<()> {
    let recipe = pantry.get_by_id(id)?;
    println!("{}", render_html(&recipe));
    Ok(())
}

/// Non-empty string field from the recipe document, trimmed.
fn field<'a>(data: &'a Value, name: &str) -> Option<&'a str> {
    data.get(name)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// Render a cached recipe as a standalone HTML document. Sections are
/// emitted only for fields the document actually carries.
fn render_html(recipe: &Recipe) -> String {
    let data = &recipe.data;
    let title = escape_html(&recipe.name);

    let mut out = String::new();
    out.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    out.push_str(&format!("<title>{title}</title>\n"));
    out.push_str("</head>\n<body>\n");
    out.push_str(&format!("<h1>{title}</h1>\n"));

    let mut meta: Vec<String> = Vec::new();
    if let Some(servings) = field(data, "servings") {
        meta.push(format!("Servings: {}", escape_html(servings)));
    }
    for (label, key) in [
        ("Prep", "prep_time"),
        ("Cook", "cook_time"),
        ("Total", "total_time"),
    ] {
        if let Some(time) = field(data, key) {
            meta.push(format!("{label}: {}", escape_html(time)));
        }
    }
    if !meta.is_empty() {
        out.push_str(&format!("<p class=\"meta\">{}</p>\n", meta.join(" | ")));
    }

    if let Some(description) = field(data, "description") {
        out.push_str(&format!("<p>{}</p>\n", escape_html(description)));
    }

    if let Some(ingredients) = field(data, "ingredients") {
        out.push_str("<h2>Ingredients</h2>\n<ul>\n");
        for line in ingredients.lines().filter(|l| !l.trim().is_empty()) {
            out.push_str(&format!("<li>{}</li>\n", escape_html(line.trim())));
        }
        out.push_str("</ul>\n");
    }

    if let Some(directions) = field(data, "directions") {
        out.push_str("<h2>Directions</h2>\n");
        for para in directions.split("\n\n").filter(|p| !p.trim().is_empty()) {
            out.push_str(&format!("<p>{}</p>\n", escape_html(para.trim())));
        }
    }

    if let Some(notes) = field(data, "notes") {
        out.push_str("<h2>Notes</h2>\n");
        out.push_str(&format!("<p>{}</p>\n", escape_html(notes)));
    }

    if let Some(nutrition) = field(data, "nutritional_info") {
        out.push_str("<h2>Nutrition</h2>\n");
        out.push_str(&format!("<p>{}</p>\n", escape_html(nutrition)));
    }

    if let Some(source) = field(data, "source") {
        let source = escape_html(source);
        match field(data, "source_url") {
            Some(url) => {
                let url = escape_html(url);
                out.push_str(&format!(
                    "<p class=\"source\"><a href=\"{url}\">{source}</a></p>\n"
                ));
            }
            None => out.push_str(&format!("<p class=\"source\">{source}</p>\n")),
        }
    }

    out.push_str("</body>\n</html>");
    out
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
