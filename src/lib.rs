// src/lib.rs
//
// Calculatrice flottante : évaluateur d’expressions en précision arbitraire (256 bits par défaut).
// - noyau : jetons, analyse, primitives, formatage
// - app   : requête / réponse, rendu texte ou JSON

pub mod app;
pub mod noyau;
