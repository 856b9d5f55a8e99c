//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `heritage_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

use heritage_core::db::open_db_in_memory;
use heritage_core::{initial_members, FamilyService, SqliteMemberRepository, TreeLayout};

fn main() {
    println!("heritage_core version={}", heritage_core::core_version());

    let result = (|| -> Result<(usize, usize), Box<dyn std::error::Error>> {
        let conn = open_db_in_memory()?;
        let repo = SqliteMemberRepository::try_new(&conn)?;
        let mut service = FamilyService::load(repo)?;
        service.seed_if_empty(initial_members()?)?;

        let member_count = service.members().len();
        let tree_count = match service.tree() {
            TreeLayout::Empty => 0,
            TreeLayout::Forest(trees) => trees.len(),
        };
        Ok((member_count, tree_count))
    })();

    match result {
        Ok((member_count, tree_count)) => {
            println!("heritage_core members={member_count} trees={tree_count}");
        }
        Err(err) => {
            eprintln!("heritage_core smoke failed: {err}");
            std::process::exit(1);
        }
    }
}
