// src/app/vue.rs
//
// Vue (texte) : transforme une Réponse en lignes à afficher.
// - Texte : le résultat seul, ou « error: <message> »
// - Json  : un document par ligne (`{"result": ...}` ou `{"error": ..., "kind": ...}`)
// - Jetons : flux de jetons d’une expression (aide au diagnostic)

use super::etat::Reponse;
use crate::noyau::jetons::{format_jetons, tokenize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Rendu {
    #[default]
    Texte,
    Json,
}

/// Une réponse -> une ligne (sans retour final).
pub fn rendre(reponse: &Reponse, rendu: Rendu) -> Result<String, serde_json::Error> {
    match rendu {
        Rendu::Json => serde_json::to_string(reponse),
        Rendu::Texte => Ok(match reponse {
            Reponse::Resultat { result } => result.clone(),
            Reponse::Erreur { error, .. } => format!("error: {error}"),
        }),
    }
}

/// Ligne « jetons: ... » ; une entrée non tokenisable affiche l’erreur lexicale.
pub fn rendre_jetons(expression: &str) -> String {
    match tokenize(expression) {
        Ok(jetons) => format!("jetons: {}", format_jetons(&jetons)),
        Err(e) => format!("jetons: <{e}>"),
    }
}
