use anyhow::Result;
use comfy_table::{Cell, Table};
use skillsmith_contracts::Skill;

use super::format_timestamp;

pub fn print_table(table: Table) -> Result<()> {
    println!("{table}");
    Ok(())
}

/// One row per skill, newest data as reported by the service.
pub fn skills_table(skills: &[Skill]) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["ID", "Name", "Type", "Version", "Tags", "Published", "Updated"]);

    for skill in skills {
        table.add_row(vec![
            Cell::new(skill.id),
            Cell::new(&skill.name),
            Cell::new(skill.skill_type),
            Cell::new(format!("v{}", skill.version)),
            Cell::new(skill.metadata.tags.join(", ")),
            Cell::new(if skill.is_published() { "yes" } else { "-" }),
            Cell::new(format_timestamp(&skill.updated_at)),
        ]);
    }

    table
}
