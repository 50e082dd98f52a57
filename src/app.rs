// src/app.rs
//
// Couche d’application (racine)
// -----------------------------
// Rôle:
// - Déclarer les sous-modules (etat.rs + vue.rs)
// - Ré-exporter le nécessaire pour main.rs
//
// Le noyau ne connaît ni JSON ni affichage : tout passe par ici.

pub mod etat;
pub mod vue;

pub use etat::{traiter, Reponse, Requete};
pub use vue::{rendre, rendre_jetons, Rendu};
