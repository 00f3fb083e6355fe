//! CEA rocket-problem input decks.

use crate::propellant::{PropellantEntry, PropellantPair, PropellantRole, ReactantCard};
use crate::request::{ReportOptions, UnitSystem};
use crate::sample::SampleTriple;
use std::fmt::Write as _;

/// Variables requested in the `.plt` table, in column order.
pub const PLOT_VARIABLES: [&str; 8] = ["p", "t", "rho", "mach", "vis", "cond", "pran", "cp"];

/// Temperature given to reactants that are not in the catalog [K].
pub const DEFAULT_REACTANT_T_K: f64 = 298.15;

/// Reactant lines for one side of the pair.
///
/// Cataloged propellants expand to their cards; anything else is forwarded
/// verbatim as a single species.
pub fn reactant_lines(name: &str, role: PropellantRole, entry: Option<&PropellantEntry>) -> Vec<String> {
    let keyword = match role {
        PropellantRole::Fuel => "fuel",
        PropellantRole::Oxidizer => "oxid",
    };
    let verbatim = [ReactantCard {
        species: "",
        wt_pct: 100.0,
        temp_k: DEFAULT_REACTANT_T_K,
    }];
    let cards: &[ReactantCard] = match entry {
        Some(entry) => entry.cards,
        None => &verbatim,
    };
    cards
        .iter()
        .map(|card| {
            let species = if card.species.is_empty() {
                name.trim()
            } else {
                card.species
            };
            format!(
                "  {}={}  wt%={:.4}  t,k={:.3}",
                keyword, species, card.wt_pct, card.temp_k
            )
        })
        .collect()
}

/// Render the `.inp` deck for one sample.
pub fn render_deck(pair: &PropellantPair, sample: &SampleTriple, options: &ReportOptions) -> String {
    let mut deck = String::new();
    let _ = writeln!(deck, "problem    o/f={:.8},", sample.mixture_ratio);
    deck.push_str("    rocket  equilibrium  tcest,k=3800\n");
    match options.unit_system {
        UnitSystem::Si => {
            let _ = writeln!(deck, "  p,bar={:.8},", sample.pressure_bar);
        }
        UnitSystem::Atmospheres => {
            let _ = writeln!(deck, "  p,atm={:.8},", sample.pressure_atm());
        }
    }
    let _ = writeln!(deck, "  supar={:.8},", sample.area_ratio);
    deck.push_str("react\n");
    for line in reactant_lines(&pair.fuel, PropellantRole::Fuel, pair.fuel_entry()) {
        deck.push_str(&line);
        deck.push('\n');
    }
    for line in reactant_lines(&pair.oxidizer, PropellantRole::Oxidizer, pair.oxidizer_entry()) {
        deck.push_str(&line);
        deck.push('\n');
    }

    let mut output = String::from("output");
    if options.unit_system == UnitSystem::Si {
        output.push_str("  siunits");
    }
    if !options.verbose {
        output.push_str("  short");
    }
    if options.transport {
        output.push_str("  transport");
    }
    deck.push_str(&output);
    deck.push('\n');
    let _ = writeln!(deck, "    plot {}", PLOT_VARIABLES.join(" "));
    deck.push_str("end\n");
    deck
}
