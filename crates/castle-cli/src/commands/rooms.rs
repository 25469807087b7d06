use colored::Colorize;
use comfy_table::{ContentArrangement, Table};

use castle_core::{RoomId, scene};

pub fn run() -> Result<(), String> {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Room", "Id", "Light", "Exits"]);

    for room in RoomId::ALL {
        let card = scene::card(room);
        let light = if card.fixed_light { "lit" } else { "dark" };
        let exits: Vec<String> = scene::exits_from(room)
            .map(|exit| {
                let needs: Vec<&str> = exit.requires.iter().map(|f| f.as_str()).collect();
                if needs.is_empty() {
                    format!("{} via {}", exit.to.title(), exit.via)
                } else {
                    format!(
                        "{} via {} (needs {})",
                        exit.to.title(),
                        exit.via,
                        needs.join(", ")
                    )
                }
            })
            .collect();
        let exits = if exits.is_empty() {
            "-".to_string()
        } else {
            exits.join("\n")
        };
        table.add_row(vec![card.title, room.as_str(), light, exits.as_str()]);
    }

    println!("{table}");
    println!();
    println!(
        "  {} rooms. The way out is the gate of the {}.",
        RoomId::ALL.len(),
        RoomId::Courtyard.title().bold()
    );

    Ok(())
}
