//! Plain-text and JSON character sheets

use serde_json::{json, Value};
use std::fmt::Write;
use vagabond_core::builder::{CommitReport, Economy};
use vagabond_core::{Character, SaveKey, SkillKey, StatKey, WeaponSkillKey};

pub fn json(character: &Character, report: &CommitReport) -> Value {
    json!({
        "character": character,
        "derived": character.derived,
        "report": report,
    })
}

pub fn render(character: &Character, economy: &Economy) -> String {
    let derived = &character.derived;
    let mut out = String::new();

    let ancestry = character.ancestry_item().map(|i| i.name.as_str()).unwrap_or("-");
    let class = character.class_item().map(|i| i.name.as_str()).unwrap_or("-");
    let _ = writeln!(out, "{} ({} {}, level {})", character.name, ancestry, class, character.system.level);
    let _ = writeln!(
        out,
        "HP {}/{}  Mana {}/{}  Luck {}/{}  Armor {}",
        character.system.health.current,
        derived.health.max,
        character.system.mana.current,
        derived.mana.max,
        character.system.luck.current,
        derived.luck_max,
        derived.armor,
    );
    if derived.is_spellcaster {
        let _ = writeln!(out, "Casting max {}", derived.mana.casting_max);
    }
    let _ = writeln!(
        out,
        "Speed {} / crawl {} / travel {}",
        derived.speed.base, derived.speed.crawl, derived.speed.travel
    );
    let _ = writeln!(
        out,
        "Slots {}/{}",
        derived.inventory.occupied_slots, derived.inventory.max_slots
    );

    out.push_str("\nStats\n");
    for key in StatKey::all() {
        let _ = writeln!(out, "  {:<10} {:>2}", key.key(), derived.stat_total(*key));
    }

    out.push_str("\nSaves\n");
    for key in SaveKey::all() {
        if let Some(difficulty) = derived.save_difficulty(*key) {
            let _ = writeln!(out, "  {:<10} {:>3}", key.key(), difficulty);
        }
    }

    out.push_str("\nSkills\n");
    for key in SkillKey::all() {
        if let Some(check) = derived.skills.get(key) {
            let mark = if check.trained { "*" } else { " " };
            let _ = writeln!(out, " {}{:<12} {:>3}", mark, key.key(), check.difficulty);
        }
    }
    for key in WeaponSkillKey::all() {
        if let Some(check) = derived.weapon_skills.get(key) {
            let mark = if check.trained { "*" } else { " " };
            let _ = writeln!(out, " {}{:<12} {:>3}", mark, key.key(), check.difficulty);
        }
    }

    out.push_str("\nItems\n");
    for item in &character.items {
        let _ = writeln!(out, "  {} [{}]", item.name, item.type_name());
    }

    let c = &character.system.currency;
    let _ = writeln!(out, "\nPurse {}g {}s {}c", c.gold, c.silver, c.copper);
    if economy.is_over {
        let _ = writeln!(out, "Gear went {} silver over budget", -economy.remaining);
    }
    out
}
