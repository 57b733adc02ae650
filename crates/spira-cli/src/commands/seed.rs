use colored::Colorize;
use spira_rng::RngStreamBank;

const NOTABLE: &[(usize, &str)] = &[
    (1, "encounter"),
    (4, "target"),
    (10, "prize"),
    (11, "rarity"),
    (12, "equipment"),
    (13, "ability"),
    (17, "yojimbo"),
    (20, "slot 0"),
    (21, "slot 1"),
    (22, "slot 2"),
    (23, "slot 3"),
];

pub fn run(seed: u32, count: usize) -> Result<(), String> {
    let mut bank = RngStreamBank::new(seed);

    println!("  {} {seed} (0x{seed:08x})", "Seed".bold());
    println!();
    for &(index, label) in NOTABLE {
        let values = bank.upcoming(index, count);
        let rendered: Vec<String> = values.iter().map(|v| format!("{v:>10}")).collect();
        println!(
            "  {} {}  {}",
            format!("rng{index:<2}").cyan(),
            format!("({label})").dimmed(),
            rendered.join(" ")
        );
    }
    Ok(())
}
