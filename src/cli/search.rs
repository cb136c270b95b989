use super::ui;
use crate::core::SearchProvider;
use anyhow::Result;
use comfy_table::Cell;

pub async fn run(provider: &(dyn SearchProvider + Send + Sync), text: &str) -> Result<()> {
    let funds = match provider.search(text).await {
        Ok(funds) => funds,
        Err(e) => {
            println!("{}", ui::style_text(&e.to_string(), ui::StyleType::Error));
            return Ok(());
        }
    };

    if funds.is_empty() {
        println!("No mutual funds found matching '{text}'.");
        return Ok(());
    }

    let mut table = ui::new_styled_table();
    table.set_header(vec![ui::header_cell("Name"), ui::header_cell("Symbol")]);
    for fund in &funds {
        table.add_row(vec![Cell::new(&fund.name), Cell::new(&fund.symbol)]);
    }
    println!("{table}");
    println!(
        "{}",
        ui::style_text(
            "Use a symbol with `mfsheet quote <SYMBOL>` or `mfsheet export`",
            ui::StyleType::Subtle
        )
    );
    Ok(())
}
