use anyhow::Result;
use comfy_table::{presets::UTF8_FULL, Attribute, Cell, Color, ContentArrangement, Table};

use crate::templates;

pub fn run(json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(templates::all())?);
    } else {
        println!("{}", table());
    }
    Ok(())
}

fn table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("#").add_attribute(Attribute::Bold),
            Cell::new("Template").add_attribute(Attribute::Bold),
            Cell::new("Repository").add_attribute(Attribute::Bold),
        ]);

    for (i, template) in templates::all().iter().enumerate() {
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(template.name).fg(Color::Cyan),
            Cell::new(template.url),
        ]);
    }
    table
}
