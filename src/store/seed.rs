//! The 18 canonical types, inserted when the `types` table is empty.

use crate::model::PokemonType;

/// (name, weak to, super effective against, immune to)
const TYPE_CHART: &[(&str, &[&str], &[&str], &[&str])] = &[
    ("Normal", &["Fighting"], &[], &["Ghost"]),
    ("Fire", &["Water", "Ground", "Rock"], &["Grass", "Ice", "Bug", "Steel"], &[]),
    ("Water", &["Electric", "Grass"], &["Fire", "Ground", "Rock"], &[]),
    ("Electric", &["Ground"], &["Water", "Flying"], &[]),
    ("Grass", &["Fire", "Ice", "Poison", "Flying", "Bug"], &["Water", "Ground", "Rock"], &[]),
    ("Ice", &["Fire", "Fighting", "Rock", "Steel"], &["Grass", "Ground", "Flying", "Dragon"], &[]),
    ("Fighting", &["Flying", "Psychic", "Fairy"], &["Normal", "Ice", "Rock", "Dark", "Steel"], &[]),
    ("Poison", &["Ground", "Psychic"], &["Grass", "Fairy"], &[]),
    ("Ground", &["Water", "Grass", "Ice"], &["Fire", "Electric", "Poison", "Rock", "Steel"], &["Electric"]),
    ("Flying", &["Electric", "Ice", "Rock"], &["Grass", "Fighting", "Bug"], &["Ground"]),
    ("Psychic", &["Bug", "Ghost", "Dark"], &["Fighting", "Poison"], &[]),
    ("Bug", &["Fire", "Flying", "Rock"], &["Grass", "Psychic", "Dark"], &[]),
    ("Rock", &["Water", "Grass", "Fighting", "Ground", "Steel"], &["Fire", "Ice", "Flying", "Bug"], &[]),
    ("Ghost", &["Ghost", "Dark"], &["Psychic", "Ghost"], &["Normal", "Fighting"]),
    ("Dragon", &["Ice", "Dragon", "Fairy"], &["Dragon"], &[]),
    ("Dark", &["Fighting", "Bug", "Fairy"], &["Psychic", "Ghost"], &["Psychic"]),
    ("Steel", &["Fire", "Fighting", "Ground"], &["Ice", "Rock", "Fairy"], &["Poison"]),
    ("Fairy", &["Poison", "Steel"], &["Fighting", "Dragon", "Dark"], &["Dragon"]),
];

pub fn default_types() -> Vec<PokemonType> {
    let names = |list: &[&str]| list.iter().map(|s| s.to_string()).collect::<Vec<_>>();
    TYPE_CHART
        .iter()
        .map(|(name, weaknesses, strengths, immunities)| PokemonType {
            name: name.to_string(),
            weaknesses: names(weaknesses),
            strengths: names(strengths),
            immunities: names(immunities),
        })
        .collect()
}
