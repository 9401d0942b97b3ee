//! Categories subcommand - print the built-in subject taxonomy

use anyhow::{Result, bail};
use comfy_table::{Cell, Color, Table, modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL};

use arxrel_normalize::taxonomy;

pub fn run(area: &str) -> Result<()> {
    let Some(tax) = taxonomy::for_area(area) else {
        let known: Vec<&str> = taxonomy::areas().collect();
        bail!("no taxonomy for area {area:?} (known: {})", known.join(", "));
    };

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_header(vec![
            Cell::new("category_id").fg(Color::Cyan),
            Cell::new("category_name").fg(Color::Cyan),
        ]);
    for category in tax.categories {
        table.add_row(vec![
            Cell::new(format!("{}.{}", tax.area, category.code)).fg(Color::Green),
            Cell::new(category.name),
        ]);
    }

    eprintln!("\n{table}\n  {} categories in {}", tax.len(), tax.area);
    Ok(())
}
