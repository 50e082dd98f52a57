//! src/app/etat.rs
//!
//! Modèle requête / réponse (sans vue).
//!
//! Rôle : recevoir une demande (expression texte ou triplet structuré),
//! la confier au noyau et produire une réponse déjà formatée.
//!
//! Contrats :
//! - Aucune logique d’affichage ici (voir vue.rs).
//! - Contrat JSON (équivalent HTTP : 200 / 400) :
//!   `{"result": "..."}` en succès, `{"error": "...", "kind": "..."}` en échec.
//! - Aucun état partagé : `traiter` peut être appelé depuis plusieurs threads.

use serde::{Deserialize, Serialize};

use crate::noyau::{calculer, eval_expression, formater, ErreurCalcul, Reglages};

/// Demande entrante. Désérialisée sans étiquette : la forme des champs choisit la variante.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Requete {
    Expression {
        expression: String,
    },
    Structuree {
        num1: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        num2: Option<String>,
        operator: String,
    },
}

impl Requete {
    pub fn expression(texte: impl Into<String>) -> Self {
        Requete::Expression {
            expression: texte.into(),
        }
    }

    /// Une ligne commençant par `{` est un document JSON, sinon une expression brute.
    pub fn depuis_ligne(ligne: &str) -> Result<Self, serde_json::Error> {
        if ligne.trim_start().starts_with('{') {
            serde_json::from_str(ligne)
        } else {
            Ok(Requete::expression(ligne))
        }
    }
}

/// Réponse sortante.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Reponse {
    Resultat { result: String },
    Erreur { error: String, kind: String },
}

impl Reponse {
    pub fn depuis_erreur(e: &ErreurCalcul) -> Self {
        Reponse::Erreur {
            error: e.to_string(),
            kind: e.categorie().as_str().to_string(),
        }
    }

    /// Document JSON illisible : classé en erreur de format.
    pub fn requete_invalide(e: &serde_json::Error) -> Self {
        Reponse::Erreur {
            error: format!("invalid request: {e}"),
            kind: "format".to_string(),
        }
    }

    pub fn est_succes(&self) -> bool {
        matches!(self, Reponse::Resultat { .. })
    }

    /// Code HTTP équivalent (200 / 400).
    pub fn code_statut(&self) -> u16 {
        if self.est_succes() {
            200
        } else {
            400
        }
    }
}

/// Évalue une requête et formate le résultat selon les réglages.
pub fn traiter(requete: &Requete, reglages: &Reglages) -> Reponse {
    let valeur = match requete {
        Requete::Expression { expression } => eval_expression(expression, reglages),
        Requete::Structuree {
            num1,
            num2,
            operator,
        } => calculer(num1, num2.as_deref(), operator, reglages),
    };

    match valeur {
        Ok(v) => Reponse::Resultat {
            result: formater(&v, reglages),
        },
        Err(e) => {
            log::debug!("requête rejetée ({}): {e}", e.categorie().as_str());
            Reponse::depuis_erreur(&e)
        }
    }
}
