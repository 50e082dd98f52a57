//! Noyau flottant (précision fixe, arbitraire)
//!
//! Organisation interne :
//! - flottant.rs   : flottant binaire ±m·2^e (BigUint) + arrondis (vers zéro / plus proche pair)
//! - reglages.rs   : précision, arrondis, bornes (construits une fois, passés par référence)
//! - erreur.rs     : taxonomie lex / syntaxe / domaine / format
//! - jetons.rs     : tokenisation
//! - analyse.rs    : descente récursive, évaluation à la volée
//! - primitives.rs : + - * /, puissance entière, factorielle, √ (Newton)
//! - format.rs     : affichage 6 décimales compacté
//! - eval.rs       : points d’entrée (expression texte / triplet structuré)

pub mod analyse;
pub mod erreur;
pub mod eval;
pub mod flottant;
pub mod format;
pub mod jetons;
pub mod primitives;
pub mod reglages;

#[cfg(test)]
mod tests_scientifiques;

#[cfg(test)]
mod tests_fuzz_safe;

// API publique minimale
pub use erreur::{Categorie, ErreurCalcul};
pub use eval::{calculer, eval_expression};
pub use flottant::Flottant;
pub use format::formater;
pub use reglages::Reglages;
